//! Declared program elements and the annotations attached to them.

mod annotation;
mod element;

pub use annotation::{AnnotationClassification, AnnotationInstance, AnnotationValue};
pub use element::{CheckTarget, ElementKind, ElementRef, Modifier, ProgramElement};
