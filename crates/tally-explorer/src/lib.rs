pub mod client;
pub mod decode;
pub mod error;
pub mod query;

pub use client::{ExplorerClient, ReportFetcher, SSO_TOKEN_HEADER};
pub use decode::{DecodeIssue, DecodedBatch};
pub use error::ExplorerError;
