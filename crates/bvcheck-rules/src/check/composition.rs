//! Consistency between list containers and direct constraint uses.

use bvcheck_model::{AnnotationInstance, ProgramElement};

use super::{Check, CheckContext};
use crate::error::{Diagnostic, DiagnosticSet, MessageKey};

/// A composed constraint type may not declare the same constraint both
/// directly and inside its list container.
///
/// Runs once per decomposed part of the container; annotation types are
/// compared by qualified name.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixDirectAndListAnnotationCheck;

impl Check for MixDirectAndListAnnotationCheck {
    fn name(&self) -> &'static str {
        "mixed list and direct annotation"
    }

    fn check_annotation_type(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        if !ctx.constraints.is_composed_constraint(element) {
            return DiagnosticSet::new();
        }

        let declared_directly = element
            .annotations
            .iter()
            .any(|direct| direct.annotation_type == annotation.annotation_type);
        if declared_directly {
            Diagnostic::new(
                element,
                Some(annotation),
                MessageKey::MixedListAndDirectAnnotationDeclaration,
            )
            .with_arg(annotation.simple_name())
            .into_set()
        } else {
            DiagnosticSet::new()
        }
    }
}
