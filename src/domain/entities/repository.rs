use crate::domain::value_objects::scm_type::ScmType;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// GitHub organisation hosting every git repository in the registry.
pub const GITHUB_ORG: &str = "apache";

/// レジストリに登録されたリポジトリの記述子
///
/// 静的データとして定義され、実行中に変更されることはない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoDescriptor {
    /// レジストリ内で一意なID
    pub id: &'static str,

    /// 表示用のタイトル
    pub title: &'static str,

    /// チェックアウト先のディレクトリ名（リモートのリポジトリ名でもある）
    pub repo_name: &'static str,

    /// JIRAのコンポーネント名
    pub jira_component_name: &'static str,

    /// npmパッケージ名（リポジトリ名と異なる場合のみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<&'static str>,

    /// バージョン文字列だけを含むファイルのパス
    pub version_file_paths: &'static [&'static str],

    /// 生成されたcordova.jsのコピー先
    pub cordova_js_paths: &'static [&'static str],

    /// 他のリポジトリのサブディレクトリかどうか
    pub is_module: bool,

    /// repo_name配下のサブパス
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'static str>,

    /// SVNリポジトリのURL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svn: Option<&'static str>,

    /// メンテナンスされていないかどうか
    pub inactive: bool,
}

impl RepoDescriptor {
    /// 新しいRepoDescriptorを作成
    pub const fn new(
        id: &'static str,
        title: &'static str,
        repo_name: &'static str,
        jira_component_name: &'static str,
    ) -> Self {
        Self {
            id,
            title,
            repo_name,
            jira_component_name,
            package_name: None,
            version_file_paths: &[],
            cordova_js_paths: &[],
            is_module: false,
            path: None,
            svn: None,
            inactive: false,
        }
    }

    /// npmパッケージ名を設定
    pub const fn with_package_name(self, package_name: &'static str) -> Self {
        Self {
            package_name: Some(package_name),
            ..self
        }
    }

    /// バージョンファイルを設定
    pub const fn with_version_files(self, paths: &'static [&'static str]) -> Self {
        Self {
            version_file_paths: paths,
            ..self
        }
    }

    /// cordova.jsのパスを設定
    pub const fn with_cordova_js(self, paths: &'static [&'static str]) -> Self {
        Self {
            cordova_js_paths: paths,
            ..self
        }
    }

    /// 親リポジトリ内のモジュールとして設定
    pub const fn module_of(self, path: &'static str) -> Self {
        Self {
            is_module: true,
            path: Some(path),
            ..self
        }
    }

    /// SVNリポジトリとして設定
    pub const fn with_svn(self, url: &'static str) -> Self {
        Self {
            svn: Some(url),
            ..self
        }
    }

    /// 非アクティブとして設定
    pub const fn retired(self) -> Self {
        Self {
            inactive: true,
            ..self
        }
    }

    pub fn scm_type(&self) -> ScmType {
        if self.svn.is_some() {
            ScmType::Svn
        } else {
            ScmType::Git
        }
    }

    /// Name published to npm: the explicit package name or the repo name.
    pub fn npm_name(&self) -> &'static str {
        self.package_name.unwrap_or(self.repo_name)
    }

    /// Directory of the checkout root, ignoring any module sub-path.
    pub fn checkout_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(self.repo_name)
    }

    /// Directory commands run in: the checkout root plus the module sub-path.
    pub fn working_dir(&self, base_dir: &Path) -> PathBuf {
        let checkout = self.checkout_dir(base_dir);
        match self.path {
            Some(path) => checkout.join(path),
            None => checkout,
        }
    }

    /// URL to clone from.
    pub fn clone_url(&self) -> String {
        match self.svn {
            Some(url) => url.to_string(),
            None => format!("https://github.com/{}/{}.git", GITHUB_ORG, self.repo_name),
        }
    }
}
