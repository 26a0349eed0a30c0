pub mod activity_report;
pub mod for_each;
pub mod license_audit;
pub mod list_repos;
pub mod print_tags;
pub mod pull_requests;
pub mod release_branch;
pub mod repo_clone;
pub mod repo_push;
pub mod repo_reset;
pub mod repo_status;
pub mod repo_update;
pub mod tag_release;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Branch release branches are cut from.
pub const DEFAULT_BRANCH: &str = "master";

/// Spinner shown while a concurrent batch of subprocesses runs. Hidden when
/// stderr is not a terminal.
pub(crate) fn batch_spinner(message: &str) -> ProgressBar {
    if !atty::is(atty::Stream::Stderr) {
        return ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈", "✓"])
        .template("{spinner:.green} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
