//! # steadfast-http
//!
//! A reliable HTTP client that drives requests through the retry engine in
//! `steadfast-core`:
//! - Non-success responses and transport faults mapped into a typed failure
//!   taxonomy (`HttpFailure`)
//! - Pluggable transient classification (retry everything by default, or only
//!   designated status codes via `StatusClassifier`)
//! - Structured logging of attempts via `tracing`
//!
//! # Example
//!
//! ```no_run
//! use steadfast_http::ReliableClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Customer {
//!     id: u32,
//!     first_name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ReliableClient::new()?;
//!     let customer: Customer = client
//!         .get_json("https://api.example.com/customers/1")
//!         .await?;
//!
//!     println!("{} ({})", customer.first_name, customer.id);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod failure;

pub use client::ReliableClient;
pub use config::ClientConfig;
pub use failure::HttpFailure;
