//! `@GroupSequence` definition check.
//!
//! A group sequence lists interfaces; a class may also list itself to
//! redefine its default group sequence, and must do so when it carries the
//! annotation at all. Interfaces in the sequence may not repeat, a sequence
//! interface should not extend others, and expanding the sequence must not
//! lead back to a type already visited.

use std::collections::HashSet;

use bvcheck_model::{names, AnnotationInstance, AnnotationValue, ElementKind, ProgramElement, TypeRef};
use tracing::{debug, trace};

use super::{Check, CheckContext};
use crate::error::{Diagnostic, DiagnosticSet, MessageKey};

#[derive(Debug, Clone, Copy, Default)]
pub struct GroupSequenceCheck;

impl Check for GroupSequenceCheck {
    fn name(&self) -> &'static str {
        "group sequence"
    }

    fn check_non_annotation_type(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        let mut diagnostics = DiagnosticSet::new();
        let issue = |key| Diagnostic::new(element, Some(annotation), key);

        let mut redefinition = false;
        let mut seen = HashSet::new();
        for group in sequence_values(annotation) {
            if redefines_default_sequence(element, group, ctx) {
                redefinition = true;
            } else {
                let is_interface = match ctx.types.type_element(group) {
                    Some(declaration) => declaration.kind.is_interface(),
                    None => {
                        debug!(group = %group, "group declaration not available");
                        group.as_declared().is_some()
                    }
                };
                if !is_interface {
                    diagnostics.insert(issue(MessageKey::InvalidGroupSequenceValueNotInterfaces));
                    continue;
                }
            }

            if let Some(name) = group.qualified_name() {
                if !seen.insert(name.clone()) {
                    diagnostics.insert(
                        issue(MessageKey::InvalidGroupSequenceValueMultipleDeclarationsOfTheSameInterface)
                            .with_arg(name.to_string()),
                    );
                }
            }
        }

        if element.kind == ElementKind::Interface && !element.interfaces.is_empty() {
            diagnostics.insert(issue(MessageKey::InvalidGroupSequenceExtendInterfaces));
        }

        if element.kind == ElementKind::Class && !redefinition {
            diagnostics.insert(issue(MessageKey::InvalidGroupSequenceValueMissingHostingBeanDeclaration));
        }

        if expands_cyclically(element, &element.ty, &mut HashSet::new(), ctx) {
            diagnostics.insert(issue(MessageKey::InvalidGroupSequenceValueCyclicDefinition));
        }

        diagnostics
    }
}

/// Types listed in a `@GroupSequence` value.
fn sequence_values(annotation: &AnnotationInstance) -> impl Iterator<Item = &TypeRef> {
    annotation
        .value(names::members::VALUE)
        .map(AnnotationValue::elements)
        .unwrap_or_default()
        .iter()
        .filter_map(AnnotationValue::as_type)
}

/// A class listing itself in its own sequence.
fn redefines_default_sequence(host: &ProgramElement, ty: &TypeRef, ctx: &CheckContext<'_>) -> bool {
    host.kind == ElementKind::Class && ctx.types.is_same_type(&host.ty, ty)
}

/// Depth-first expansion of the sequence through nested sequences and
/// extended interfaces. `processed` is shared across branches, so reaching
/// any type twice counts, except the redefining host class.
fn expands_cyclically(
    host: &ProgramElement,
    ty: &TypeRef,
    processed: &mut HashSet<TypeRef>,
    ctx: &CheckContext<'_>,
) -> bool {
    if ty.as_declared().is_none() {
        return false;
    }
    if !processed.insert(ty.clone()) {
        trace!(group = %ty, "group reached twice");
        return !redefines_default_sequence(host, ty, ctx);
    }

    let declaration = if ctx.types.is_same_type(&host.ty, ty) {
        Some(host)
    } else {
        ctx.types.type_element(ty)
    };
    let Some(declaration) = declaration else {
        return false;
    };

    let nested: Vec<&TypeRef> = declaration
        .annotation(names::GROUP_SEQUENCE)
        .map(|sequence| sequence_values(sequence).collect())
        .unwrap_or_default();
    nested
        .into_iter()
        .chain(declaration.interfaces.iter())
        .any(|next| expands_cyclically(host, next, processed, ctx))
}
