//! Due-Date Ranking Module
//!
//! Orders issue-like records for display by their optional due date.
//!
//! ## Ordering Policy
//! - **Scheduled first**: records with a parseable due date come first, earliest instant first.
//! - **Unparseable next**: non-blank text matching no accepted format ranks after every
//!   scheduled record.
//! - **Blank last**: blank sentinels (`""`, `" "`) and absent fields rank after every
//!   non-blank record, parseable or not.
//! - **Stable**: records with equal rank keep their relative input order.
//!
//! Each record is classified exactly once before sorting (`DueDate`), so the comparison is a
//! plain total order and never depends on which operand sits on which side.
//!
//! ## Submodules
//! - **`engine`**: The `rank` / `rank_by` entry points.
//! - **`parser`**: Blank detection and the fixed set of accepted date-time formats.
//! - **`types`**: The `Dated` capability trait and the `DueDate` classification.

pub mod engine;
pub mod parser;
pub mod types;

pub use engine::{rank, rank_by};
pub use parser::{classify, is_blank, parse_due_date};
pub use types::{Dated, DueDate};
