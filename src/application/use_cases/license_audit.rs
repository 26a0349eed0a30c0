use crate::application::services::{ResolveOptions, Session};
use crate::common::{CohoError, CohoResult, ResultExt};
use crate::domain::entities::RepoDescriptor;
use glob::{MatchOptions, Pattern};
use rayon::prelude::*;
use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Extensions of files expected to carry a license header.
const AUDITED_EXTENSIONS: &[&str] = &[
    "js", "ts", "java", "kt", "gradle", "m", "h", "swift", "cs", "cpp", "c", "css", "html", "sh",
    "py", "xml",
];

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "coverage", "build"];

const HEADER_MARKERS: &[&str] = &[
    "Licensed to the Apache Software Foundation",
    "Apache License, Version 2.0",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Only the top of a file is searched for the header.
const HEADER_WINDOW: u64 = 4096;

/// ライセンスヘッダー監査の設定
#[derive(Debug, Clone, Default)]
pub struct LicenseAuditConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// レポートの出力先（未指定の場合は出力しない）
    pub dest: Option<PathBuf>,

    /// 除外するパスのパターン
    pub excludes: Vec<String>,
}

/// 単一リポジトリの監査結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseAuditReport {
    pub repo: &'static str,
    pub repo_name: &'static str,

    /// 確認したファイル数
    pub checked: usize,

    /// ヘッダーのないファイル（リポジトリからの相対パス）
    pub missing: Vec<PathBuf>,
}

/// Exclusion rules for one repository.
#[derive(Debug)]
pub struct ExcludeSet {
    patterns: Vec<(Pattern, bool)>,
}

impl ExcludeSet {
    /// Compile glob patterns: `*` matches within a path segment, `**`
    /// across segments. A pattern without `/` is matched against file names.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> CohoResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| -> CohoResult<(Pattern, bool)> {
                let pattern = p.as_ref();
                let compiled = Pattern::new(pattern).map_err(|e| {
                    CohoError::config_error_with_source(
                        format!("Invalid exclude pattern: {}", pattern),
                        e,
                    )
                })?;
                Ok((compiled, !pattern.contains('/')))
            })
            .collect::<CohoResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, relative: &Path) -> bool {
        let name = relative.file_name().map(Path::new).unwrap_or(relative);
        self.patterns.iter().any(|(pattern, name_only)| {
            let candidate = if *name_only { name } else { relative };
            pattern.matches_path_with(candidate, MATCH_OPTIONS)
        })
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

fn is_audited(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDITED_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// Whether the top of `path` carries the Apache license header.
pub fn has_license_header(path: &Path) -> CohoResult<bool> {
    let file = std::fs::File::open(path)
        .with_filesystem_error("Failed to open file", Some(path.to_path_buf()))?;
    let mut head = Vec::new();
    file.take(HEADER_WINDOW)
        .read_to_end(&mut head)
        .with_filesystem_error("Failed to read file", Some(path.to_path_buf()))?;
    let head = String::from_utf8_lossy(&head);
    Ok(HEADER_MARKERS.iter().any(|marker| head.contains(marker)))
}

/// Walk `root` and check every audited, non-excluded file.
pub fn audit_tree(
    repo: &RepoDescriptor,
    root: &Path,
    excludes: &ExcludeSet,
) -> CohoResult<LicenseAuditReport> {
    let candidates: Vec<(PathBuf, PathBuf)> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_audited(e.path()))
        .filter_map(|e| {
            let relative = pathdiff::diff_paths(e.path(), root)?;
            let generated = repo
                .cordova_js_paths
                .iter()
                .any(|p| relative == Path::new(p));
            (!generated && !excludes.is_excluded(&relative)).then(|| (e.into_path(), relative))
        })
        .collect();

    let checked = candidates.len();
    let mut missing = candidates
        .par_iter()
        .map(|(path, relative)| -> CohoResult<Option<PathBuf>> {
            Ok((!has_license_header(path)?).then(|| relative.clone()))
        })
        .collect::<CohoResult<Vec<Option<PathBuf>>>>()?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    missing.sort();

    debug!(repo = repo.id, checked, missing = missing.len(), "audited");
    Ok(LicenseAuditReport {
        repo: repo.id,
        repo_name: repo.repo_name,
        checked,
        missing,
    })
}

/// Plain-text report of every repo's findings.
pub fn render_report(reports: &[LicenseAuditReport]) -> String {
    let mut out = String::from("License header audit\n");
    for report in reports {
        let _ = writeln!(
            out,
            "\n{}: {} checked, {} missing",
            report.repo_name,
            report.checked,
            report.missing.len()
        );
        for path in &report.missing {
            let _ = writeln!(out, "  {}", path.display());
        }
    }
    out
}

/// ライセンスヘッダーを監査するユースケース
pub struct LicenseAuditUseCase {
    config: LicenseAuditConfig,
}

impl LicenseAuditUseCase {
    pub fn new(config: LicenseAuditConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<Vec<LicenseAuditReport>> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default())?;
        let mut patterns = self.config.excludes.clone();
        patterns.extend(session.config.license_excludes.iter().cloned());
        let excludes = std::sync::Arc::new(ExcludeSet::new(&patterns)?);

        let reports = session
            .walker()
            .for_each_repo(&repos, |dir| {
                let excludes = excludes.clone();
                async move {
                    info!(repo = dir.repo.id, "auditing license headers");
                    tokio::task::spawn_blocking(move || audit_tree(&dir.repo, &dir.path, &excludes))
                        .await
                        .map_err(|e| CohoError::internal_error(format!("audit task failed: {}", e)))?
                }
            })
            .await?;

        if let Some(dest) = &self.config.dest {
            tokio::fs::write(dest, render_report(&reports))
                .await
                .with_filesystem_error("Failed to write report", Some(dest.clone()))?;
        }
        Ok(reports)
    }
}
