//! Structural checks on annotated members and types.
//!
//! These rules look at the annotated element itself (modifiers, name shape,
//! declared type) rather than at the annotation type's declaration.

use bvcheck_model::{AnnotationInstance, Modifier, ProgramElement, TargetAllowance, TypeRef};

use super::{Check, CheckContext};
use crate::error::{Diagnostic, DiagnosticSet, MessageKey};

const GETTER_PREFIXES: [&str; 3] = ["is", "has", "get"];

/// Static fields and methods may not carry constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCheck;

impl Check for StaticCheck {
    fn name(&self) -> &'static str {
        "static"
    }

    fn check_field(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        _ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        if element.has_modifier(Modifier::Static) {
            return Diagnostic::new(element, Some(annotation), MessageKey::StaticFieldsMayNotBeAnnotated)
                .into_set();
        }
        DiagnosticSet::new()
    }

    fn check_method(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        _ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        if element.has_modifier(Modifier::Static) {
            return Diagnostic::new(element, Some(annotation), MessageKey::StaticMethodsMayNotBeAnnotated)
                .into_set();
        }
        DiagnosticSet::new()
    }
}

/// Annotated methods must return a value; optionally they must be getters.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetterCheck {
    getters_mandatory: bool,
}

impl GetterCheck {
    /// `getters_mandatory` restricts annotated methods to bean-style getters.
    pub fn new(getters_mandatory: bool) -> Self {
        Self { getters_mandatory }
    }
}

/// `isX`/`hasX`/`getX`, no parameters, non-void.
pub fn is_getter(method: &ProgramElement) -> bool {
    let name = method.simple_name();
    GETTER_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
        && method.parameters.is_empty()
        && !method.ty.is_void()
}

impl Check for GetterCheck {
    fn name(&self) -> &'static str {
        "getter"
    }

    fn check_method(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        _ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        if self.getters_mandatory && !is_getter(element) {
            Diagnostic::new(element, Some(annotation), MessageKey::OnlyGettersMayBeAnnotated).into_set()
        } else if element.ty.is_void() {
            Diagnostic::new(element, Some(annotation), MessageKey::OnlyNonVoidMethodsMayBeAnnotated)
                .into_set()
        } else {
            DiagnosticSet::new()
        }
    }
}

/// Cascaded validation needs a reference type.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveCheck;

impl Check for PrimitiveCheck {
    fn name(&self) -> &'static str {
        "primitive"
    }

    fn check_field(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        _ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        if element.ty.is_primitive() {
            return Diagnostic::new(element, Some(annotation), MessageKey::AtValidNotAllowedAtPrimitiveField)
                .into_set();
        }
        DiagnosticSet::new()
    }

    fn check_method(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        _ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        if element.ty.is_primitive() {
            return Diagnostic::new(
                element,
                Some(annotation),
                MessageKey::AtValidNotAllowedAtMethodReturningPrimitiveType,
            )
            .into_set();
        }
        DiagnosticSet::new()
    }
}

/// The constraint must have exactly one validator for the annotated type.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCheck;

impl TypeCheck {
    fn check_target(
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        target: &TypeRef,
        ctx: &CheckContext<'_>,
        keys: (MessageKey, MessageKey),
    ) -> DiagnosticSet {
        let (not_supported, multiple) = keys;
        let key = match ctx
            .types
            .check_constraint_target(&annotation.annotation_type, target)
        {
            TargetAllowance::Allowed => return DiagnosticSet::new(),
            TargetAllowance::Disallowed => not_supported,
            TargetAllowance::MultipleValidatorsFound => multiple,
        };
        Diagnostic::new(element, Some(annotation), key)
            .with_arg(annotation.simple_name())
            .into_set()
    }
}

impl Check for TypeCheck {
    fn name(&self) -> &'static str {
        "type"
    }

    fn check_field(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        Self::check_target(
            element,
            annotation,
            &element.ty,
            ctx,
            (MessageKey::NotSupportedType, MessageKey::MultipleValidatorsForType),
        )
    }

    fn check_method(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        Self::check_target(
            element,
            annotation,
            &element.ty,
            ctx,
            (
                MessageKey::NotSupportedReturnType,
                MessageKey::MultipleValidatorsForReturnType,
            ),
        )
    }

    fn check_non_annotation_type(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        Self::check_target(
            element,
            annotation,
            &element.ty,
            ctx,
            (MessageKey::NotSupportedType, MessageKey::MultipleValidatorsForType),
        )
    }
}
