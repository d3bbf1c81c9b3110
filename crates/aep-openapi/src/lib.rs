#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
//! Recovers a resource graph from an OpenAPI 2.0 or 3.x document and
//! regenerates a resource-oriented OpenAPI 3.1 document from it.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use aep_openapi::{Api, BuildOptions, load_document};
//!
//! let document = load_document("openapi.yaml").await?;
//! let output = Api::from_openapi(&document, &BuildOptions::default())?;
//! let regenerated = output.api.to_openapi();
//! # let _ = regenerated;
//! # Ok(())
//! # }
//! ```

pub mod api;
#[cfg(feature = "client")]
pub mod client;
pub mod constants;
pub mod naming;
pub mod openapi;
pub mod tools;

pub use api::{Api, ApiError, BuildOptions, BuildOutput, BuildStats, BuildWarning, Resource};
#[cfg(feature = "client")]
pub use client::{Client, ClientError};
pub use openapi::{DocumentSource, LoadError, OpenApi, load_document};
pub use tools::{ResourceTemplate, ToolDefinition};
