// src/github/mod.rs
// =============================================================================
// Everything that talks to the GitHub REST API.
//
// - client: HTTP plumbing, auth header, timeout, retry, tagged results
// - fetch:  the per-repository metric collection
// - types:  the slices of the API's JSON we deserialize
// =============================================================================

mod client;
mod fetch;
mod types;

pub use client::GitHubClient;
pub use fetch::collect_rows;
