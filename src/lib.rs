//! # Sitasi
//!
//! Resolve a free-text citation query into a structured bibliographic record.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Reference records, upstream payloads and localized labels
//! - [`sources`]: Upstream service adapters (works index, ISBN, city, NER) behind traits
//! - [`resolver`]: The resolution pipeline, its builders and entity extraction
//! - [`utils`]: HTTP client, retries, text normalization and citation formatting
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use sitasi::config::Config;
//! use sitasi::{resolve_citation, ReferenceResolver};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = ReferenceResolver::from_config(&Config::default())?;
//! let reference = resolve_citation(&resolver, "smith 2020 widget study").await?;
//! println!("{}", sitasi::utils::format_inline_citation(&reference, resolver.locale()));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod models;
pub mod resolver;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::{Locale, Reference};
pub use resolver::{resolve_citation, ReferenceResolver, ResolveError};
pub use sources::{SourceError, SourceLookup};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
