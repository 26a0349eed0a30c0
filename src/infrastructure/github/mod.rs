pub mod client;

pub use client::{GitHubClient, GitHubUser, PullRequest};
