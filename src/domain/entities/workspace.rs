use super::registry::RepoRegistry;
use std::path::{Path, PathBuf};

/// コマンド実行時のディレクトリ情報
///
/// プロセスのカレントディレクトリは変更せず、全ての操作はここから導出した
/// 絶対パスで行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// リポジトリが兄弟ディレクトリとして並ぶベースディレクトリ
    pub base_dir: PathBuf,

    /// コマンドが起動されたディレクトリ（`.` の解決に使う）
    pub start_dir: PathBuf,
}

impl Workspace {
    /// 新しいWorkspaceインスタンスを作成
    pub fn new(base_dir: impl Into<PathBuf>, start_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            start_dir: start_dir.into(),
        }
    }

    /// 起動ディレクトリからワークスペースを決定
    ///
    /// `chdir` が有効な場合、起動ディレクトリの祖先のうち登録済みリポジトリの
    /// チェックアウトであるものを探し、その親をベースディレクトリとする。
    /// 見つからなければ起動ディレクトリ自体がベースになる。
    pub fn discover(registry: &RepoRegistry, start_dir: &Path, chdir: bool) -> Self {
        let base_dir = if chdir {
            Self::enclosing_checkout(registry, start_dir)
                .and_then(|checkout| checkout.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| start_dir.to_path_buf())
        } else {
            start_dir.to_path_buf()
        };
        Self::new(base_dir, start_dir)
    }

    /// `start_dir` 自身またはその祖先で、名前がリポジトリ名に一致する最も近いもの
    pub fn enclosing_checkout(registry: &RepoRegistry, start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .find(|dir| {
                dir.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| registry.all_repos().iter().any(|r| r.repo_name == name))
                    .unwrap_or(false)
            })
            .map(Path::to_path_buf)
    }
}
