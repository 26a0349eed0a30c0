//! Static table of the repositories coho knows about and the named groups
//! they belong to.

use super::repository::RepoDescriptor;
use std::path::Path;

const PLATFORM_JS: &[&str] = &["bin/templates/project/assets/www/cordova.js"];

static REPOS: &[RepoDescriptor] = &[
    // Platforms
    RepoDescriptor::new("android", "Android", "cordova-android", "cordova-android")
        .with_version_files(&["VERSION"])
        .with_cordova_js(PLATFORM_JS),
    RepoDescriptor::new("ios", "iOS", "cordova-ios", "cordova-ios")
        .with_version_files(&["CordovaLib/VERSION"])
        .with_cordova_js(&["CordovaLib/cordova.js"]),
    RepoDescriptor::new("osx", "OS X", "cordova-osx", "cordova-osx")
        .with_version_files(&["CordovaLib/VERSION"])
        .with_cordova_js(&["CordovaLib/cordova.js"]),
    RepoDescriptor::new("windows", "Windows", "cordova-windows", "cordova-windows")
        .with_version_files(&["VERSION"])
        .with_cordova_js(&["template/www/cordova.js"])
        .retired(),
    RepoDescriptor::new("browser", "Browser", "cordova-browser", "cordova-browser")
        .with_version_files(&["VERSION"])
        .with_cordova_js(&["cordova-lib/cordova.js"]),
    RepoDescriptor::new("electron", "Electron", "cordova-electron", "cordova-electron")
        .with_cordova_js(&["bin/templates/platform_www/cordova.js"]),
    RepoDescriptor::new("ubuntu", "Ubuntu", "cordova-ubuntu", "cordova-ubuntu")
        .with_version_files(&["VERSION"])
        .retired(),
    // Plugins
    RepoDescriptor::new("plugin-battery-status", "Plugin - Battery Status", "cordova-plugin-battery-status", "cordova-plugin-battery-status"),
    RepoDescriptor::new("plugin-camera", "Plugin - Camera", "cordova-plugin-camera", "cordova-plugin-camera"),
    RepoDescriptor::new("plugin-console", "Plugin - Console", "cordova-plugin-console", "cordova-plugin-console").retired(),
    RepoDescriptor::new("plugin-contacts", "Plugin - Contacts", "cordova-plugin-contacts", "cordova-plugin-contacts").retired(),
    RepoDescriptor::new("plugin-device", "Plugin - Device", "cordova-plugin-device", "cordova-plugin-device"),
    RepoDescriptor::new("plugin-device-motion", "Plugin - Device Motion", "cordova-plugin-device-motion", "cordova-plugin-device-motion").retired(),
    RepoDescriptor::new("plugin-device-orientation", "Plugin - Device Orientation", "cordova-plugin-device-orientation", "cordova-plugin-device-orientation").retired(),
    RepoDescriptor::new("plugin-dialogs", "Plugin - Dialogs", "cordova-plugin-dialogs", "cordova-plugin-dialogs"),
    RepoDescriptor::new("plugin-file", "Plugin - File", "cordova-plugin-file", "cordova-plugin-file"),
    RepoDescriptor::new("plugin-file-transfer", "Plugin - File Transfer", "cordova-plugin-file-transfer", "cordova-plugin-file-transfer").retired(),
    RepoDescriptor::new("plugin-geolocation", "Plugin - Geolocation", "cordova-plugin-geolocation", "cordova-plugin-geolocation"),
    RepoDescriptor::new("plugin-globalization", "Plugin - Globalization", "cordova-plugin-globalization", "cordova-plugin-globalization").retired(),
    RepoDescriptor::new("plugin-inappbrowser", "Plugin - InAppBrowser", "cordova-plugin-inappbrowser", "cordova-plugin-inappbrowser"),
    RepoDescriptor::new("plugin-media", "Plugin - Media", "cordova-plugin-media", "cordova-plugin-media"),
    RepoDescriptor::new("plugin-media-capture", "Plugin - Media Capture", "cordova-plugin-media-capture", "cordova-plugin-media-capture"),
    RepoDescriptor::new("plugin-network-information", "Plugin - Network Information", "cordova-plugin-network-information", "cordova-plugin-network-information"),
    RepoDescriptor::new("plugin-screen-orientation", "Plugin - Screen Orientation", "cordova-plugin-screen-orientation", "cordova-plugin-screen-orientation"),
    RepoDescriptor::new("plugin-splashscreen", "Plugin - Splash Screen", "cordova-plugin-splashscreen", "cordova-plugin-splashscreen"),
    RepoDescriptor::new("plugin-statusbar", "Plugin - Statusbar", "cordova-plugin-statusbar", "cordova-plugin-statusbar"),
    RepoDescriptor::new("plugin-vibration", "Plugin - Vibration", "cordova-plugin-vibration", "cordova-plugin-vibration"),
    RepoDescriptor::new("plugin-whitelist", "Plugin - Whitelist", "cordova-plugin-whitelist", "cordova-plugin-whitelist").retired(),
    RepoDescriptor::new("plugin-wkwebview-engine", "Plugin - WKWebView Engine", "cordova-plugin-wkwebview-engine", "cordova-plugin-wkwebview-engine"),
    // Tools
    RepoDescriptor::new("cli", "Command-line Tool", "cordova-cli", "cordova-cli")
        .with_package_name("cordova"),
    RepoDescriptor::new("lib", "Cordova Lib", "cordova-lib", "cordova-lib"),
    RepoDescriptor::new("common", "Cordova Common", "cordova-lib", "cordova-common")
        .with_package_name("cordova-common")
        .module_of("cordova-common"),
    RepoDescriptor::new("fetch", "Cordova Fetch", "cordova-lib", "cordova-fetch")
        .with_package_name("cordova-fetch")
        .module_of("cordova-fetch"),
    RepoDescriptor::new("plugman", "Plugman", "cordova-plugman", "cordova-plugman")
        .with_package_name("plugman"),
    RepoDescriptor::new("js", "Cordova JS", "cordova-js", "cordova-js"),
    RepoDescriptor::new("coho", "Cordova Coho", "cordova-coho", "cordova-coho"),
    RepoDescriptor::new("create", "Cordova Create", "cordova-create", "cordova-create"),
    RepoDescriptor::new("serve", "Cordova Serve", "cordova-serve", "cordova-serve"),
    RepoDescriptor::new("paramedic", "Cordova Paramedic", "cordova-paramedic", "cordova-paramedic"),
    // Other
    RepoDescriptor::new("docs", "Docs", "cordova-docs", "cordova-docs"),
    RepoDescriptor::new("mobile-spec", "Mobile Spec", "cordova-mobile-spec", "cordova-mobile-spec"),
    RepoDescriptor::new("app-hello-world", "App Hello World", "cordova-app-hello-world", "cordova-app-hello-world"),
    RepoDescriptor::new("medic", "Medic", "cordova-medic", "cordova-medic"),
    // SVN
    RepoDescriptor::new("dist", "Cordova Dist", "cordova-dist", "")
        .with_svn("https://dist.apache.org/repos/dist/release/cordova"),
    RepoDescriptor::new("dist/dev", "Cordova Dist Development", "cordova-dist-dev", "")
        .with_svn("https://dist.apache.org/repos/dist/dev/cordova"),
];

/// グループの構成方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupMembers {
    /// IDの列挙
    Ids(&'static [&'static str]),
    /// 他のグループから非アクティブなものを除いたもの
    ActiveOf(&'static str),
    /// 全てのリポジトリ
    All,
    /// ベースディレクトリに既に存在するもの
    ExistingCheckouts,
}

/// 名前付きグループの定義
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDefinition {
    /// グループ名
    pub name: &'static str,
    /// 構成方法
    pub members: GroupMembers,
}

impl GroupDefinition {
    pub const fn new(name: &'static str, members: GroupMembers) -> Self {
        Self { name, members }
    }
}

/// Name of the group probed from the filesystem.
pub const AUTO_GROUP: &str = "auto";

static GROUPS: &[GroupDefinition] = &[
    GroupDefinition::new(
        "platform",
        GroupMembers::Ids(&["android", "ios", "osx", "windows", "browser", "electron", "ubuntu"]),
    ),
    GroupDefinition::new("active-platform", GroupMembers::ActiveOf("platform")),
    GroupDefinition::new(
        "plugins",
        GroupMembers::Ids(&[
            "plugin-battery-status",
            "plugin-camera",
            "plugin-console",
            "plugin-contacts",
            "plugin-device",
            "plugin-device-motion",
            "plugin-device-orientation",
            "plugin-dialogs",
            "plugin-file",
            "plugin-file-transfer",
            "plugin-geolocation",
            "plugin-globalization",
            "plugin-inappbrowser",
            "plugin-media",
            "plugin-media-capture",
            "plugin-network-information",
            "plugin-screen-orientation",
            "plugin-splashscreen",
            "plugin-statusbar",
            "plugin-vibration",
            "plugin-whitelist",
            "plugin-wkwebview-engine",
        ]),
    ),
    GroupDefinition::new("active-plugins", GroupMembers::ActiveOf("plugins")),
    GroupDefinition::new(
        "tools",
        GroupMembers::Ids(&[
            "cli", "lib", "common", "fetch", "plugman", "js", "coho", "create", "serve",
            "paramedic",
        ]),
    ),
    GroupDefinition::new(
        "other",
        GroupMembers::Ids(&["docs", "mobile-spec", "app-hello-world", "medic"]),
    ),
    GroupDefinition::new("svn", GroupMembers::Ids(&["dist", "dist/dev"])),
    GroupDefinition::new(
        "release-repos",
        GroupMembers::Ids(&["cli", "lib", "common", "fetch", "plugman", "js", "create", "serve"]),
    ),
    GroupDefinition::new("all", GroupMembers::All),
    GroupDefinition::new(AUTO_GROUP, GroupMembers::ExistingCheckouts),
];

/// Lookup table over repository descriptors and groups.
#[derive(Debug, Clone)]
pub struct RepoRegistry {
    repos: Vec<RepoDescriptor>,
    groups: Vec<GroupDefinition>,
}

impl Default for RepoRegistry {
    fn default() -> Self {
        Self::cordova()
    }
}

impl RepoRegistry {
    /// Registry over the given repositories and groups.
    pub fn new(repos: Vec<RepoDescriptor>, groups: Vec<GroupDefinition>) -> Self {
        Self { repos, groups }
    }

    /// The built-in registry of Cordova repositories.
    pub fn cordova() -> Self {
        Self::new(REPOS.to_vec(), GROUPS.to_vec())
    }

    pub fn all_repos(&self) -> &[RepoDescriptor] {
        &self.repos
    }

    pub fn groups(&self) -> &[GroupDefinition] {
        &self.groups
    }

    /// Find a repository by id, npm package name, or repo name, in that order
    /// of precedence. `scope` restricts the search to a subset.
    pub fn repo_by_id<'a>(
        &'a self,
        id: &str,
        scope: Option<&[&'a RepoDescriptor]>,
    ) -> Option<&'a RepoDescriptor> {
        let candidates: Vec<&RepoDescriptor> = match scope {
            Some(scope) => scope.to_vec(),
            None => self.repos.iter().collect(),
        };

        candidates
            .iter()
            .find(|r| r.id == id)
            .or_else(|| candidates.iter().find(|r| r.package_name == Some(id)))
            .or_else(|| {
                candidates
                    .iter()
                    .find(|r| r.repo_name == id && !r.is_module)
            })
            .or_else(|| candidates.iter().find(|r| r.repo_name == id))
            .copied()
    }

    /// Members of a named group in declared order, or `None` for an unknown name.
    /// `base_dir` is only consulted by the `auto` group.
    pub fn group_by_name(&self, name: &str, base_dir: &Path) -> Option<Vec<&RepoDescriptor>> {
        let group = self.groups.iter().find(|g| g.name == name)?;
        Some(self.expand(&group.members, base_dir))
    }

    /// Names of the groups containing `repo`, skipping the derived ones.
    pub fn groups_containing(&self, repo: &RepoDescriptor) -> Vec<&'static str> {
        self.groups
            .iter()
            .filter_map(|g| match g.members {
                GroupMembers::Ids(ids) if ids.contains(&repo.id) => Some(g.name),
                _ => None,
            })
            .collect()
    }

    fn expand(&self, members: &GroupMembers, base_dir: &Path) -> Vec<&RepoDescriptor> {
        match members {
            GroupMembers::Ids(ids) => ids
                .iter()
                .filter_map(|id| self.repos.iter().find(|r| r.id == *id))
                .collect(),
            GroupMembers::ActiveOf(parent) => self
                .group_by_name(parent, base_dir)
                .unwrap_or_default()
                .into_iter()
                .filter(|r| !r.inactive)
                .collect(),
            GroupMembers::All => self.repos.iter().collect(),
            GroupMembers::ExistingCheckouts => self
                .repos
                .iter()
                .filter(|r| r.working_dir(base_dir).is_dir())
                .collect(),
        }
    }
}
