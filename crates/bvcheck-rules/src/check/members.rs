//! Mandatory members of constraint type declarations.
//!
//! Every constraint type declares:
//!
//! ```text
//! String message();
//! Class<?>[] groups() default {};
//! Class<? extends Payload>[] payload() default {};
//! ```
//!
//! A missing member is reported on the declaration; a malformed member on
//! the member itself. For `groups` and `payload` the shape is checked before
//! the default value, and only the first problem is reported.

use bvcheck_model::{names, AnnotationInstance, ProgramElement, TypeRef};

use super::{Check, CheckContext};
use crate::error::{Diagnostic, DiagnosticSet, MessageKey};

/// Keys reported for one `Class<...>[]` member.
struct ClassArrayMember {
    name: &'static str,
    missing: MessageKey,
    wrong_shape: MessageKey,
    non_empty_default: MessageKey,
}

const GROUPS: ClassArrayMember = ClassArrayMember {
    name: names::members::GROUPS,
    missing: MessageKey::ConstraintTypeMustDeclareGroupsMember,
    wrong_shape: MessageKey::ReturnTypeMustBeClassArray,
    non_empty_default: MessageKey::DefaultValueMustBeEmptyArray,
};

const PAYLOAD: ClassArrayMember = ClassArrayMember {
    name: names::members::PAYLOAD,
    missing: MessageKey::ConstraintTypeMustDeclarePayloadMember,
    wrong_shape: MessageKey::PayloadReturnTypeMustBeClassArray,
    non_empty_default: MessageKey::PayloadDefaultValueMustBeEmptyArray,
};

/// Checks the `message`, `groups` and `payload` members; findings for the
/// three members are unioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationTypeMemberCheck {
    string: TypeRef,
    payload: TypeRef,
}

impl AnnotationTypeMemberCheck {
    pub fn new(string: TypeRef, payload: TypeRef) -> Self {
        Self { string, payload }
    }

    fn check_message(&self, declaration: &ProgramElement, ctx: &CheckContext<'_>) -> DiagnosticSet {
        match declaration.member(names::members::MESSAGE) {
            None => {
                Diagnostic::new(declaration, None, MessageKey::ConstraintTypeMustDeclareMessageMember)
                    .into_set()
            }
            Some(member) if !ctx.types.is_same_type(&member.ty, &self.string) => {
                Diagnostic::new(member, None, MessageKey::ReturnTypeMustBeString).into_set()
            }
            Some(_) => DiagnosticSet::new(),
        }
    }

    fn check_class_array(
        &self,
        declaration: &ProgramElement,
        spec: &ClassArrayMember,
        expected_bound: Option<&TypeRef>,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        let Some(member) = declaration.member(spec.name) else {
            return Diagnostic::new(declaration, None, spec.missing).into_set();
        };

        if !is_class_array(&member.ty, expected_bound, ctx) {
            return Diagnostic::new(member, None, spec.wrong_shape).into_set();
        }

        let empty_default = member
            .default_value
            .as_ref()
            .is_some_and(|value| value.is_empty_array());
        if !empty_default {
            return Diagnostic::new(member, None, spec.non_empty_default).into_set();
        }
        DiagnosticSet::new()
    }
}

impl Check for AnnotationTypeMemberCheck {
    fn name(&self) -> &'static str {
        "annotation type members"
    }

    fn check_annotation_type(
        &self,
        element: &ProgramElement,
        _annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        let mut diagnostics = self.check_message(element, ctx);
        diagnostics.extend(self.check_class_array(element, &GROUPS, None, ctx));
        diagnostics.extend(self.check_class_array(element, &PAYLOAD, Some(&self.payload), ctx));
        diagnostics
    }
}

/// Whether `ty` is `Class<? extends expected_bound>[]`, or `Class<?>[]` when
/// no bound is expected.
fn is_class_array(ty: &TypeRef, expected_bound: Option<&TypeRef>, ctx: &CheckContext<'_>) -> bool {
    let Some(component) = ty.component_type() else {
        return false;
    };
    let Some(class) = component.as_declared() else {
        return false;
    };
    let erased = ctx.types.erasure(component);
    if erased.qualified_name().map_or(true, |name| *name != names::CLASS) {
        return false;
    }

    match class.args.as_slice() {
        [arg] => arg.as_wildcard().is_some_and(|wildcard| {
            bound_matches(wildcard.extends_bound.as_deref(), expected_bound, ctx)
                && bound_matches(wildcard.super_bound.as_deref(), None, ctx)
        }),
        _ => false,
    }
}

/// An absent bound matches only an absent expectation; otherwise the types
/// must be identical.
fn bound_matches(actual: Option<&TypeRef>, expected: Option<&TypeRef>, ctx: &CheckContext<'_>) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(actual), Some(expected)) => ctx.types.is_same_type(actual, expected),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bvcheck_model::{AnnotationValue, TypeUniverse};

    fn class_array(arg: TypeRef) -> TypeRef {
        TypeRef::array_of(TypeRef::generic(names::CLASS, vec![arg]))
    }

    fn make_check() -> AnnotationTypeMemberCheck {
        AnnotationTypeMemberCheck::new(TypeRef::declared(names::STRING), TypeRef::declared(names::PAYLOAD))
    }

    fn member(name: &str, ty: TypeRef) -> ProgramElement {
        ProgramElement::method(format!("com.acme.Checked.{}", name), ty)
    }

    fn empty_array() -> AnnotationValue {
        AnnotationValue::Array(Vec::new())
    }

    fn run(declaration: &ProgramElement) -> Vec<(MessageKey, String)> {
        let universe = TypeUniverse::with_platform_types();
        let ctx = CheckContext::new(&universe, &universe);
        make_check()
            .check_annotation_type(declaration, &AnnotationInstance::new(names::CONSTRAINT), &ctx)
            .into_iter()
            .map(|d| (d.key, d.element.path.to_string()))
            .collect()
    }

    fn well_formed() -> ProgramElement {
        ProgramElement::annotation_type("com.acme.Checked")
            .with_member(member(names::members::MESSAGE, TypeRef::declared(names::STRING)))
            .with_member(
                member(names::members::GROUPS, class_array(TypeRef::unbounded_wildcard()))
                    .with_default(empty_array()),
            )
            .with_member(
                member(
                    names::members::PAYLOAD,
                    class_array(TypeRef::wildcard_extends(TypeRef::declared(names::PAYLOAD))),
                )
                .with_default(empty_array()),
            )
    }

    #[test]
    fn test_well_formed_declaration_passes() {
        assert!(run(&well_formed()).is_empty());
    }

    #[test]
    fn test_missing_members_reported_on_declaration() {
        let findings = run(&ProgramElement::annotation_type("com.acme.Checked"));
        assert_eq!(
            findings,
            vec![
                (MessageKey::ConstraintTypeMustDeclareMessageMember, "com.acme.Checked".to_string()),
                (MessageKey::ConstraintTypeMustDeclareGroupsMember, "com.acme.Checked".to_string()),
                (MessageKey::ConstraintTypeMustDeclarePayloadMember, "com.acme.Checked".to_string()),
            ]
        );
    }

    #[test]
    fn test_message_must_be_string() {
        let mut declaration = well_formed();
        declaration.enclosed[0] = member(names::members::MESSAGE, TypeRef::declared(names::CHAR_SEQUENCE));
        assert_eq!(
            run(&declaration),
            vec![(MessageKey::ReturnTypeMustBeString, "com.acme.Checked.message".to_string())]
        );
    }

    #[test]
    fn test_groups_shape_variants() {
        let bounded = TypeRef::wildcard_extends(TypeRef::declared(names::DEFAULT_GROUP));
        let shapes = [
            class_array(bounded),
            class_array(TypeRef::declared(names::DEFAULT_GROUP)),
            TypeRef::generic(names::CLASS, vec![TypeRef::unbounded_wildcard()]),
            TypeRef::array_of(TypeRef::declared(names::CLASS)),
            TypeRef::array_of(TypeRef::declared(names::STRING)),
        ];

        for shape in shapes {
            let mut declaration = well_formed();
            declaration.enclosed[1] = member(names::members::GROUPS, shape.clone()).with_default(empty_array());
            assert_eq!(
                run(&declaration),
                vec![(MessageKey::ReturnTypeMustBeClassArray, "com.acme.Checked.groups".to_string())],
                "shape {}",
                shape
            );
        }
    }

    #[test]
    fn test_groups_default_checked_after_shape() {
        let mut declaration = well_formed();
        declaration.enclosed[1] = member(names::members::GROUPS, class_array(TypeRef::unbounded_wildcard()))
            .with_default(AnnotationValue::Array(vec![AnnotationValue::Type(TypeRef::declared(
                names::DEFAULT_GROUP,
            ))]));
        assert_eq!(
            run(&declaration),
            vec![(MessageKey::DefaultValueMustBeEmptyArray, "com.acme.Checked.groups".to_string())]
        );

        // Wrong shape wins over a wrong default
        declaration.enclosed[1] = member(names::members::GROUPS, TypeRef::declared(names::STRING))
            .with_default(AnnotationValue::Str("x".to_string()));
        assert_eq!(
            run(&declaration),
            vec![(MessageKey::ReturnTypeMustBeClassArray, "com.acme.Checked.groups".to_string())]
        );
    }

    #[test]
    fn test_payload_bound_must_be_exact() {
        let mut declaration = well_formed();
        declaration.enclosed[2] = member(names::members::PAYLOAD, class_array(TypeRef::unbounded_wildcard()))
            .with_default(empty_array());
        assert_eq!(
            run(&declaration),
            vec![(MessageKey::PayloadReturnTypeMustBeClassArray, "com.acme.Checked.payload".to_string())]
        );

        declaration.enclosed[2] = member(
            names::members::PAYLOAD,
            class_array(TypeRef::wildcard_super(TypeRef::declared(names::PAYLOAD))),
        )
        .with_default(empty_array());
        assert_eq!(
            run(&declaration),
            vec![(MessageKey::PayloadReturnTypeMustBeClassArray, "com.acme.Checked.payload".to_string())]
        );

        declaration.enclosed[2] = member(
            names::members::PAYLOAD,
            class_array(TypeRef::wildcard_extends(TypeRef::declared(names::PAYLOAD))),
        );
        assert_eq!(
            run(&declaration),
            vec![(MessageKey::PayloadDefaultValueMustBeEmptyArray, "com.acme.Checked.payload".to_string())]
        );
    }
}
