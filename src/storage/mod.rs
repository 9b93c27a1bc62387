//! Issue Storage Module
//!
//! The data-access capability injected into the HTTP layer.
//!
//! ## Core Concepts
//! - **`IssueStore`**: One async trait covering every operation the API needs. Handlers only
//!   ever see an `Arc<dyn IssueStore>`, so the endpoint logic is written once.
//! - **Relational backend**: `SqliteStore` keeps issues in a single `ISSUE` table on disk.
//! - **Document-tree backend**: `FirebaseStore` talks to a Firebase Realtime Database over
//!   its JSON REST API; filters are applied after reading the whole `issues` node.
//! - **In-process backend**: `MemoryStore` keeps everything in a `DashMap`.

pub mod backend;
pub mod firebase;
pub mod memory;
pub mod sqlite;

pub use backend::IssueStore;
pub use firebase::FirebaseStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
