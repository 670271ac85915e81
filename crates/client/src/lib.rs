//! Client code for keydash.
//!
//! This crate provides the favicon fetch pipeline and candidate-URL
//! generation used by the background bridge and the CLI.

pub mod candidates;
pub mod fetch;

pub use candidates::{candidates_for, domain_of};
pub use fetch::{FetchClient, FetchConfig, IconFetcher, encode_data_url};
