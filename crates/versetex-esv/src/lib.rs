//! ESV passage query client for versetex.
//!
//! [`EsvClient`] implements [`versetex_core::PassageSource`] with one blocking
//! HTTP GET per passage against the ESV `passageQuery` endpoint.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use versetex_esv::EsvClient;
//!
//! let client = EsvClient::new("http://www.esvapi.org/v2/rest/passageQuery")
//!     .api_key("IP")
//!     .timeout(Duration::from_secs(10));
//! ```

mod client;
mod consts;

pub use client::EsvClient;
