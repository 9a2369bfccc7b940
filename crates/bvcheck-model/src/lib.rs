// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Program model for bvcheck.
//!
//! This crate holds the static view of a compilation unit that constraint
//! checks operate on: declared elements, the annotations attached to them,
//! type references, and the two collaborator interfaces (type resolution and
//! constraint classification) the checks query.

pub mod foundation;
pub mod model;
pub mod names;
pub mod services;
pub mod universe;

pub use foundation::{DeclaredType, PrimitiveKind, QualifiedName, TypeRef, WildcardType};
pub use model::{
    AnnotationClassification, AnnotationInstance, AnnotationValue, CheckTarget, ElementKind,
    ElementRef, Modifier, ProgramElement,
};
pub use services::{ConstraintClassifier, TargetAllowance, TypeResolver};
pub use universe::TypeUniverse;
