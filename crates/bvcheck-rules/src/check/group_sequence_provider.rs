//! `@GroupSequenceProvider` usage check.
//!
//! The annotation names a `DefaultGroupSequenceProvider<T>` implementation
//! that computes the group sequence of the class it annotates. Two groups of
//! rules apply, and both always run:
//!
//! 1. **Hosting element** - only classes may carry the annotation, and not
//!    together with `@GroupSequence`.
//! 2. **Provider value** - the provider must be a concrete class with a
//!    public no-argument constructor, and the `T` it binds must be a
//!    supertype of the annotated class.

use bvcheck_model::{
    names, AnnotationInstance, AnnotationValue, ElementKind, Modifier, ProgramElement, TypeRef,
    TypeResolver,
};
use tracing::debug;

use super::{Check, CheckContext};
use crate::error::{Diagnostic, DiagnosticSet, MessageKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSequenceProviderCheck {
    /// Erasure of the generic provider interface
    provider: TypeRef,
}

impl GroupSequenceProviderCheck {
    pub fn new(provider: TypeRef) -> Self {
        Self { provider }
    }

    fn check_hosting_element(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
    ) -> DiagnosticSet {
        let mut diagnostics = DiagnosticSet::new();

        if element.kind != ElementKind::Class {
            diagnostics.insert(Diagnostic::new(
                element,
                Some(annotation),
                MessageKey::GroupSequenceProviderAnnotationMustBeDefinedOnAClass,
            ));
        }
        if element.annotation(names::GROUP_SEQUENCE).is_some() {
            diagnostics.insert(Diagnostic::new(
                element,
                Some(annotation),
                MessageKey::GroupSequenceProviderAnnotationNotAllowedOnClassWithGroupSequenceAnnotation,
            ));
        }

        diagnostics
    }

    fn check_annotation_value(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        let mut diagnostics = DiagnosticSet::new();
        let Some(value_type) = annotation
            .value(names::members::VALUE)
            .and_then(AnnotationValue::as_type)
        else {
            return diagnostics;
        };

        match ctx.types.type_element(value_type) {
            Some(provider) if provider.kind.is_interface() || provider.has_modifier(Modifier::Abstract) => {
                diagnostics.insert(Diagnostic::new(
                    element,
                    Some(annotation),
                    MessageKey::GroupSequenceProviderAnnotationValueMustBeAnImplementationClass,
                ));
            }
            Some(provider) if !has_public_default_constructor(provider) => {
                diagnostics.insert(
                    Diagnostic::new(
                        element,
                        Some(annotation),
                        MessageKey::GroupSequenceProviderAnnotationValueClassMustHaveDefaultConstructor,
                    )
                    .with_arg(value_type.clone()),
                );
            }
            Some(_) => {}
            None => debug!(provider = %value_type, "provider declaration not available"),
        }

        match resolve_provider_subject(ctx.types, value_type, &self.provider) {
            Some(subject) if !ctx.types.is_subtype(&element.ty, &subject) => {
                diagnostics.insert(
                    Diagnostic::new(
                        element,
                        Some(annotation),
                        MessageKey::GroupSequenceProviderAnnotationValueDefinedProviderClassWithWrongType,
                    )
                    .with_arg(subject)
                    .with_arg(element.ty.clone()),
                );
            }
            Some(_) => {}
            None => debug!(provider = %value_type, "provider binds no subject type"),
        }

        diagnostics
    }
}

impl Check for GroupSequenceProviderCheck {
    fn name(&self) -> &'static str {
        "group sequence provider"
    }

    fn check_non_annotation_type(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        let mut diagnostics = self.check_hosting_element(element, annotation);
        diagnostics.extend(self.check_annotation_value(element, annotation, ctx));
        diagnostics
    }
}

/// A public constructor without parameters, declared by the class itself.
fn has_public_default_constructor(class: &ProgramElement) -> bool {
    class
        .constructors()
        .any(|constructor| constructor.has_modifier(Modifier::Public) && constructor.parameters.is_empty())
}

/// Find the type argument `ty` binds on the generic provider interface.
///
/// Walks the supertype graph depth-first starting at `ty` itself. The first
/// supertype whose erasure is `provider` decides: its first type argument, or
/// nothing if it is used raw (in which case sibling branches are still
/// searched).
pub fn resolve_provider_subject(
    types: &dyn TypeResolver,
    ty: &TypeRef,
    provider: &TypeRef,
) -> Option<TypeRef> {
    let declared = ty.as_declared()?;
    if types.is_same_type(&types.erasure(ty), provider) {
        return declared.args.first().cloned();
    }

    types
        .direct_supertypes(ty)
        .iter()
        .find_map(|supertype| resolve_provider_subject(types, supertype, provider))
}
