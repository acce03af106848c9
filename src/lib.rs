//! # roverify
//!
//! Async client for the RoVer Discord-to-Roblox verification API.
//!
//! The client resolves a Discord id to the Roblox id its owner verified as,
//! and the reverse. Answers are cached for a configurable TTL, not-found
//! included, and requests are paced through client-side fixed-window buckets
//! matching the remote service's published limits, so a well-behaved consumer
//! never burns requests it knows will be rejected.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use roverify::{ClientConfig, VerificationClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VerificationClient::new(ClientConfig::default())?;
//!
//!     match client.lookup_forward(212345678901234567).await? {
//!         Some(roblox_id) => println!("verified as {roblox_id}"),
//!         None => println!("no verification on record"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Rate limit handling
//!
//! Lookups fail with [`Error::RateLimited`] when the local window is full
//! (`local: true`, no network traffic) or when the remote service answers
//! 429 (`local: false`). A remote 429 also arms the local bucket, so
//! subsequent lookups fail fast until the advertised back-off has passed.
//! The client never retries on its own; callers are expected to honor
//! [`Error::retry_after`].

#![warn(clippy::all)]
#![warn(missing_docs)]

mod cache;
mod clock;
mod ratelimit;

pub mod client;
pub mod config;
pub mod error;

pub use client::VerificationClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
