//! Meta-annotation checks on constraint type declarations.
//!
//! A constraint type must be retained at runtime, target at least one
//! supported element type, and either name validators or compose other
//! constraints. Only constraint types may themselves carry constraints.

use bvcheck_model::{names, AnnotationInstance, AnnotationValue, ProgramElement};

use super::{Check, CheckContext};
use crate::error::{Diagnostic, DiagnosticSet, MessageKey};

/// `@Retention(RUNTIME)` is required.
///
/// A missing `@Retention` is reported without anchor; a wrong one is
/// anchored to the `@Retention` annotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetentionPolicyCheck;

impl Check for RetentionPolicyCheck {
    fn name(&self) -> &'static str {
        "retention policy"
    }

    fn check_annotation_type(
        &self,
        element: &ProgramElement,
        _annotation: &AnnotationInstance,
        _ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        let Some(retention) = element.annotation(names::RETENTION) else {
            return Diagnostic::new(element, None, MessageKey::ConstraintTypeWithWrongRetentionPolicy)
                .into_set();
        };

        let policy = retention
            .value(names::members::VALUE)
            .and_then(AnnotationValue::as_enum_constant);
        if policy == Some(names::RUNTIME_RETENTION) {
            DiagnosticSet::new()
        } else {
            Diagnostic::new(
                element,
                Some(retention),
                MessageKey::ConstraintTypeWithWrongRetentionPolicy,
            )
            .into_set()
        }
    }
}

/// `@Target`, when present, must allow at least one supported element type.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetCheck;

impl Check for TargetCheck {
    fn name(&self) -> &'static str {
        "target"
    }

    fn check_annotation_type(
        &self,
        element: &ProgramElement,
        _annotation: &AnnotationInstance,
        _ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        // No @Target means every element type
        let Some(target) = element.annotation(names::TARGET) else {
            return DiagnosticSet::new();
        };

        let allowed = target
            .value(names::members::VALUE)
            .map(AnnotationValue::elements)
            .unwrap_or_default()
            .iter()
            .filter_map(AnnotationValue::as_enum_constant)
            .any(|element_type| names::ALLOWED_TARGETS.contains(&element_type));
        if allowed {
            DiagnosticSet::new()
        } else {
            Diagnostic::new(element, Some(target), MessageKey::ConstraintTypeWithWrongTarget).into_set()
        }
    }
}

/// `@Constraint(validatedBy = ...)` must list a validator unless the type is
/// composed of other constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintValidatorCheck;

impl Check for ConstraintValidatorCheck {
    fn name(&self) -> &'static str {
        "constraint validator"
    }

    fn check_annotation_type(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        let has_validator = annotation
            .value(names::members::VALIDATED_BY)
            .is_some_and(|validators| !validators.elements().is_empty());

        if has_validator || ctx.constraints.is_composed_constraint(element) {
            DiagnosticSet::new()
        } else {
            Diagnostic::new(element, Some(annotation), MessageKey::ConstraintTypeWithoutValidator)
                .into_set()
        }
    }
}

/// Only constraint types may be annotated with constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationTypeCheck;

impl Check for AnnotationTypeCheck {
    fn name(&self) -> &'static str {
        "annotation type"
    }

    fn check_annotation_type(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        if ctx.constraints.is_constraint_annotation(element) {
            DiagnosticSet::new()
        } else {
            Diagnostic::new(
                element,
                Some(annotation),
                MessageKey::OnlyConstraintAnnotationsMayBeAnnotated,
            )
            .into_set()
        }
    }
}
