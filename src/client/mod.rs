//! Spreadsheet API Client
//!
//! Talks to the Apps Script web app that stores studios, rent records and
//! payments.
//!
//! ## Architecture
//!
//! - **ApiClient**: typed operations over a single `call(op, params)`
//! - **Params**: string/number parameters, sent as JSON or query string
//! - **envelope**: response validation and list unwrapping
//!
//! The POST→GET fallback in `ApiClient::call` is a compatibility shim for
//! deployments that only implement `doGet`.

mod envelope;
mod error;
mod http;
mod params;

pub use http::{ApiClient, ClientConfig};
pub use envelope::{looks_like_html, snippet, unwrap_list, validate};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use params::Params;
