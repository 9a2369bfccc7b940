// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! bvcheck
//!
//! Unified entry point for checking Bean Validation constraint annotations
//! against the program elements that carry them, before the program runs.
//!
//! # Pipeline
//!
//! ```text
//! Driver → Classify → Dispatch → CheckList → Diagnostics → Reporter
//! ```
//!
//! The driver builds a program model (a [`TypeUniverse`] or its own
//! implementations of [`TypeResolver`] and [`ConstraintClassifier`]), hands
//! annotated elements to a [`ConstraintChecker`], and turns the resulting
//! diagnostics into messages with a [`Reporter`].
//!
//! # Examples
//!
//! ```rust
//! use bvcheck::{Configuration, ConstraintChecker, Reporter};
//! use bvcheck::model::{AnnotationInstance, Modifier, ProgramElement, TypeRef, TypeUniverse};
//!
//! let universe = TypeUniverse::with_platform_types();
//! let config = Configuration::from_options([("diagnosticKind", "WARNING")]).unwrap();
//! let checker = ConstraintChecker::for_universe(&universe, config);
//!
//! let field = ProgramElement::field("com.acme.Order.count", TypeRef::declared("java.lang.Long"))
//!     .with_modifier(Modifier::Static)
//!     .with_annotation(AnnotationInstance::new("javax.validation.constraints.NotNull"));
//!
//! let diagnostics = checker.check_element(&field);
//! let reported = Reporter::new(&config).report_all(&diagnostics);
//! assert_eq!(reported.len(), 1);
//! assert!(reported[0].to_string().starts_with("warning: com.acme.Order.count"));
//! ```

pub mod checker;
pub mod config;
pub mod report;

pub use bvcheck_model as model;
pub use bvcheck_rules as rules;

pub use bvcheck_model::{ConstraintClassifier, TypeResolver, TypeUniverse};
pub use bvcheck_rules::{Diagnostic, DiagnosticSet, MessageKey, Severity};
pub use checker::ConstraintChecker;
pub use config::{ConfigError, Configuration, DiagnosticKind};
pub use report::{to_json_lines, DefaultCatalog, MessageCatalog, ReportedDiagnostic, Reporter};
