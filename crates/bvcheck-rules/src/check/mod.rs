//! Constraint checks and their composition.
//!
//! A [`Check`] is a stateless rule with one entry point per [`CheckTarget`].
//! Checks only override the entry points they apply to; the rest report
//! nothing. Checks are grouped into [`CheckList`]s, and the
//! [`CheckDispatcher`] selects the list for an (element kind, annotation
//! classification) pair.
//!
//! # Pipeline Position
//!
//! ```text
//! Driver → Classify → Dispatch → CheckList → Diagnostics → Reporter
//!                     ^^^^^^^^^^^^^^^^^^^^
//!                         YOU ARE HERE
//! ```
//!
//! # Examples
//!
//! ```rust
//! use bvcheck_model::{AnnotationInstance, ConstraintClassifier, ElementKind, ProgramElement, TypeRef, TypeUniverse};
//! use bvcheck_rules::check::{CheckContext, CheckDispatcher, DispatchOptions};
//!
//! let universe = TypeUniverse::with_platform_types();
//! let dispatcher = CheckDispatcher::new(&universe, DispatchOptions::default());
//! let ctx = CheckContext::new(&universe, &universe);
//!
//! let field = ProgramElement::field("com.acme.Order.total", TypeRef::declared("java.lang.Integer"));
//! let annotation = AnnotationInstance::new("javax.validation.constraints.Size");
//! let diagnostics = dispatcher
//!     .resolve(ElementKind::Field, universe.classify(&annotation))
//!     .run(&field, &annotation, &ctx);
//! assert_eq!(diagnostics.len(), 1);
//! ```

use bvcheck_model::{
    AnnotationInstance, CheckTarget, ConstraintClassifier, ProgramElement, TypeResolver,
};

use crate::error::DiagnosticSet;

mod composition;
mod cross_parameter;
mod dispatch;
mod group_sequence;
mod group_sequence_provider;
mod list;
mod members;
mod meta;
mod structural;

pub use composition::MixDirectAndListAnnotationCheck;
pub use cross_parameter::{validator_targets, CrossParameterConstraintCheck, ValidationTarget};
pub use dispatch::{CheckDispatcher, DispatchOptions, WellKnownTypes};
pub use group_sequence::GroupSequenceCheck;
pub use group_sequence_provider::{resolve_provider_subject, GroupSequenceProviderCheck};
pub use list::{CheckList, Composition};
pub use members::AnnotationTypeMemberCheck;
pub use meta::{AnnotationTypeCheck, ConstraintValidatorCheck, RetentionPolicyCheck, TargetCheck};
pub use structural::{GetterCheck, PrimitiveCheck, StaticCheck, TypeCheck};

/// Services checks query while running.
///
/// Borrowed for the duration of one check run; checks hold no reference to
/// it afterward.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    /// Type-system queries
    pub types: &'a dyn TypeResolver,

    /// Validation metadata queries
    pub constraints: &'a dyn ConstraintClassifier,
}

impl<'a> CheckContext<'a> {
    /// Create a new check context.
    pub fn new(types: &'a dyn TypeResolver, constraints: &'a dyn ConstraintClassifier) -> Self {
        Self { types, constraints }
    }
}

/// A stateless rule over annotated elements.
///
/// Each entry point receives the annotated element, the annotation being
/// checked, and the services. Entry points a check does not override report
/// nothing.
pub trait Check: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn check_field(
        &self,
        _element: &ProgramElement,
        _annotation: &AnnotationInstance,
        _ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        DiagnosticSet::new()
    }

    fn check_method(
        &self,
        _element: &ProgramElement,
        _annotation: &AnnotationInstance,
        _ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        DiagnosticSet::new()
    }

    fn check_annotation_type(
        &self,
        _element: &ProgramElement,
        _annotation: &AnnotationInstance,
        _ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        DiagnosticSet::new()
    }

    fn check_non_annotation_type(
        &self,
        _element: &ProgramElement,
        _annotation: &AnnotationInstance,
        _ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        DiagnosticSet::new()
    }
}

/// Invoke the entry point of `check` matching `target`.
pub fn run_check(
    check: &dyn Check,
    target: CheckTarget,
    element: &ProgramElement,
    annotation: &AnnotationInstance,
    ctx: &CheckContext<'_>,
) -> DiagnosticSet {
    match target {
        CheckTarget::Field => check.check_field(element, annotation, ctx),
        CheckTarget::Method => check.check_method(element, annotation, ctx),
        CheckTarget::AnnotationType => check.check_annotation_type(element, annotation, ctx),
        CheckTarget::NonAnnotationType => check.check_non_annotation_type(element, annotation, ctx),
    }
}
