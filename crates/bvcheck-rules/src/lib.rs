// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Constraint checks for bvcheck.
//!
//! Rules that decide whether a Bean Validation annotation is used correctly
//! on the element carrying it, how those rules are grouped per element kind
//! and annotation classification, and the diagnostics they produce.
//!
//! - [`check`] - the [`Check`](check::Check) trait, check lists, the dispatcher and every rule
//! - [`error`] - diagnostics and message keys

pub mod check;
pub mod error;

pub use check::{Check, CheckContext, CheckDispatcher, CheckList, Composition, DispatchOptions};
pub use error::{Diagnostic, DiagnosticArg, DiagnosticSet, MessageKey, Severity};
