#![forbid(unsafe_code)]
//! ineqcheck-core library.
//!
//! Checks a set of binary relations (`<`, `≤`, `=`, `≥`, `>`) over opaque
//! terms for consistency, groups terms forced equal, and reduces the input
//! to one relation per pair of related groups.
//!
//! ```
//! use ineqcheck_core::{Operator, Relation, check};
//!
//! let relations = vec![
//!     Relation::new("x", Operator::LessEq, "y"),
//!     Relation::new("y", Operator::LessEq, "x"),
//!     Relation::new("x", Operator::Less, "a"),
//! ];
//! let report = check::<&str, String>(&relations).unwrap();
//! assert!(report.consistent);
//! assert_eq!(report.groups[0].members, vec!["x", "y"]);
//! assert_eq!(report.display_grouped(&report.grouped[0]).unwrap(), "x = y < a");
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Use `thiserror` enums with an [`ErrorCode`] per variant.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`) and `#[instrument]`.

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod parse;
pub mod relation;
pub mod scc;

pub use config::{ConfigError, EffectiveConfig, resolve_config};
pub use engine::{Report, check};
pub use error::{CheckError, ErrorCode};
pub use graph::Graph;
pub use parse::{ParseError, ParseOptions, parse_line, parse_lines, parse_str};
pub use relation::{Group, GroupedRelation, Operator, Relation, build_implication_graph};
pub use scc::{Decomposition, decompose};
