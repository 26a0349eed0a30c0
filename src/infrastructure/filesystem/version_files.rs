use crate::common::{CohoError, CohoResult, ResultExt};
use crate::domain::entities::RepoDescriptor;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::debug;

pub const PACKAGE_JSON: &str = "package.json";

fn version_field() -> CohoResult<Regex> {
    Regex::new(r#""version"\s*:\s*"[^"]*""#)
        .map_err(|e| CohoError::internal_error(format!("version pattern: {}", e)))
}

/// Version recorded in `package.json`, or in the first version file when the
/// repo has no package manifest.
pub async fn read_current_version(
    repo: &RepoDescriptor,
    dir: &Path,
) -> CohoResult<Option<String>> {
    let package_json = dir.join(PACKAGE_JSON);
    if package_json.exists() {
        let content = async_fs::read_to_string(&package_json)
            .await
            .with_filesystem_error("Failed to read package.json", Some(package_json.clone()))?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        return Ok(value
            .get("version")
            .and_then(|v| v.as_str())
            .map(str::to_string));
    }

    match repo.version_file_paths.first() {
        Some(relative) => {
            let path = dir.join(relative);
            if !path.exists() {
                return Ok(None);
            }
            let content = async_fs::read_to_string(&path)
                .await
                .with_filesystem_error("Failed to read version file", Some(path.clone()))?;
            Ok(Some(content.trim().to_string()))
        }
        None => Ok(None),
    }
}

/// Write `version` into the repo's version files and `package.json`.
///
/// Returns the files that changed, relative to `dir`, ready for `git add`.
pub async fn write_version(
    repo: &RepoDescriptor,
    dir: &Path,
    version: &str,
) -> CohoResult<Vec<PathBuf>> {
    let mut changed = Vec::new();

    for relative in repo.version_file_paths {
        let path = dir.join(relative);
        let new_content = format!("{}\n", version);
        let current = async_fs::read_to_string(&path).await.unwrap_or_default();
        if current == new_content {
            continue;
        }
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .with_filesystem_error("Failed to create directory", Some(parent.to_path_buf()))?;
        }
        async_fs::write(&path, new_content)
            .await
            .with_filesystem_error("Failed to write version file", Some(path.clone()))?;
        changed.push(PathBuf::from(relative));
    }

    let package_json = dir.join(PACKAGE_JSON);
    if package_json.exists() {
        let content = async_fs::read_to_string(&package_json)
            .await
            .with_filesystem_error("Failed to read package.json", Some(package_json.clone()))?;
        let replacement = format!(r#""version": "{}""#, version);
        let updated = version_field()?.replacen(&content, 1, replacement.as_str());
        if updated != content {
            async_fs::write(&package_json, updated.as_bytes())
                .await
                .with_filesystem_error("Failed to write package.json", Some(package_json.clone()))?;
            changed.push(PathBuf::from(PACKAGE_JSON));
        }
    }

    debug!(repo = repo.id, version, files = changed.len(), "version written");
    Ok(changed)
}
