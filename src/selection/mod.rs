//! Table selection rules.
//!
//! A [`TableSelectionSet`] collects include/exclude rules over
//! (schema, table) pairs and keeps them minimal as batches arrive:
//!
//! ```text
//!  add_selections([..])
//!          │
//!          ▼
//!  ┌──────────────────────────┐     ┌──────────────────────────┐
//!  │ inclusive (exclude=false) │     │ exclusive (exclude=true) │
//!  │  dedup + subsumption     │     │  dedup + subsumption     │
//!  └──────────────────────────┘     └──────────────────────────┘
//!          │                                 │
//!          └──────────► is_selected ◄────────┘
//! ```
//!
//! A rule names a schema and a table, either of which may be the
//! wildcard [`ANY`]. A more general rule absorbs the more specific rules of
//! the same sign, and a rule that is already covered is ignored.
//!
//! # Example
//!
//! ```
//! use reveng::selection::{TableSelection, TableSelectionSet, ANY};
//!
//! let mut set = TableSelectionSet::new();
//! set.add_selections([
//!     TableSelection::include("sales", "orders").unwrap(),
//!     TableSelection::include("sales", ANY).unwrap(),
//!     TableSelection::exclude(ANY, "audit_log").unwrap(),
//! ]);
//!
//! assert_eq!(set.inclusive_selections().len(), 1);
//! assert!(set.is_selected("sales", "orders").unwrap());
//! assert!(!set.is_selected("sales", "audit_log").unwrap());
//! ```

mod error;
mod selector;
mod set;

pub use error::{Axis, SelectionError, SelectionResult};
pub use selector::{NamePattern, TableSelection, ANY, EXCLUSIVE_ALL, INCLUSIVE_ALL};
pub use set::TableSelectionSet;
