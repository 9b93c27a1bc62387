//! Issue Service Library
//!
//! A REST API over an "issue" record set, backed interchangeably by a local SQLite file or a
//! Firebase Realtime Database. The binary (`main.rs`) only parses configuration and serves
//! the router assembled here.
//!
//! ## Modules
//! - **`ranking`**: The due-date ranking policy applied to every listing. Scheduled issues
//!   come first in chronological order, unparseable dates follow, and blank or absent dates
//!   go last. Ties keep their input order.
//! - **`issues`**: HTTP handlers, DTOs and the `Issue` record itself.
//! - **`storage`**: The `IssueStore` capability and its SQLite, Firebase and in-memory backends.
//! - **`config`**: Flag and environment resolution.
//! - **`app`**: Store selection and router assembly (static files, CORS, tracing).
//! - **`errors`**: Store, configuration and API error types.

pub mod app;
pub mod config;
pub mod errors;
pub mod issues;
pub mod ranking;
pub mod storage;
