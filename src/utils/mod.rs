//! Utility modules supporting reference resolution.
//!
//! - [`HttpClient`]: shared HTTP client with status mapping and retries
//! - [`RetryConfig`] / [`with_retry`]: retry transient upstream failures
//! - [`normalize_query`], [`similarity`], [`title_case`], [`initials`]: text normalization
//! - [`extract_isbn`]: find a checksum-valid ISBN in free text
//! - [`format_citation`] / [`format_inline_citation`]: render resolved references
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use sitasi::sources::SourceError;
//! use sitasi::utils::{with_retry, RetryConfig};
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), SourceError> {
//! let data = with_retry(RetryConfig::with_attempts(3), fetch_data).await?;
//! # Ok(())
//! # }
//! ```

mod cite;
mod http;
mod isbn;
mod retry;
mod text;

pub use cite::{format_citation, format_inline_citation};
pub use http::HttpClient;
pub use isbn::{extract_isbn, Isbn};
pub use retry::{with_retry, RetryConfig, TransientError};
pub use text::{initials, normalize_query, similarity, title_case};
