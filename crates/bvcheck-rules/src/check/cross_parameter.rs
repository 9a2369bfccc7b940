//! Cross-parameter constraint types.
//!
//! A validator carrying `@SupportedValidationTarget(PARAMETERS)` validates
//! the parameter array of an executable instead of the annotated element.
//! A constraint type with such a validator must have exactly one of them,
//! validating `Object` or `Object[]`. When the constraint can also validate
//! annotated elements, it must let users pick through a
//! `ConstraintTarget validationAppliesTo() default ConstraintTarget.IMPLICIT`
//! member.

use std::collections::BTreeSet;

use bvcheck_model::{names, AnnotationInstance, AnnotationValue, ProgramElement, TypeRef, TypeResolver};
use tracing::trace;

use super::{Check, CheckContext};
use crate::error::{Diagnostic, DiagnosticSet, MessageKey};

/// What a constraint validator validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValidationTarget {
    /// The annotated element itself
    AnnotatedElement,
    /// The parameter array of the annotated executable
    Parameters,
}

impl ValidationTarget {
    fn from_constant(constant: &str) -> Option<Self> {
        match constant {
            "ANNOTATED_ELEMENT" => Some(ValidationTarget::AnnotatedElement),
            "PARAMETERS" => Some(ValidationTarget::Parameters),
            _ => None,
        }
    }
}

/// Targets a validator declares through `@SupportedValidationTarget`.
///
/// Validators without the annotation, or unknown to the resolver, validate
/// the annotated element.
pub fn validator_targets(types: &dyn TypeResolver, validator: &TypeRef) -> BTreeSet<ValidationTarget> {
    let supported = types
        .type_element(validator)
        .and_then(|declaration| declaration.annotation(names::SUPPORTED_VALIDATION_TARGET));

    match supported {
        Some(supported) => supported
            .value(names::members::VALUE)
            .map(AnnotationValue::elements)
            .unwrap_or_default()
            .iter()
            .filter_map(AnnotationValue::as_enum_constant)
            .filter_map(ValidationTarget::from_constant)
            .collect(),
        None => BTreeSet::from([ValidationTarget::AnnotatedElement]),
    }
}

/// Cross-parameter validators and the `validationAppliesTo()` member.
///
/// Runs on the `@Constraint` meta-annotation. Constraint types whose
/// validators never target parameters pass untouched. Every finding is
/// anchored to `@Constraint` and names the constraint type.
#[derive(Debug, Clone)]
pub struct CrossParameterConstraintCheck {
    constraint_target: TypeRef,
}

impl CrossParameterConstraintCheck {
    /// `constraint_target` is the resolved `javax.validation.ConstraintTarget`.
    pub fn new(constraint_target: TypeRef) -> Self {
        Self { constraint_target }
    }

    fn validator_problem(
        &self,
        validators: &[(&TypeRef, BTreeSet<ValidationTarget>)],
        ctx: &CheckContext<'_>,
    ) -> Option<MessageKey> {
        let mut cross_parameter = validators
            .iter()
            .filter(|(_, targets)| targets.contains(&ValidationTarget::Parameters))
            .map(|(validator, _)| *validator);

        let validator = cross_parameter.next()?;
        if cross_parameter.next().is_some() {
            return Some(MessageKey::CrossParameterConstraintMultipleValidators);
        }

        let object = TypeRef::declared(names::OBJECT);
        let object_array = TypeRef::array_of(object.clone());
        let valid = ctx
            .types
            .supertype_argument(validator, names::CONSTRAINT_VALIDATOR, 1)
            .map(|validated| ctx.types.erasure(&validated))
            .is_some_and(|validated| {
                ctx.types.is_same_type(&validated, &object) || ctx.types.is_same_type(&validated, &object_array)
            });
        (!valid).then_some(MessageKey::CrossParameterConstraintValidatorHasInvalidType)
    }

    fn applies_to_problem(
        &self,
        element: &ProgramElement,
        targets: &BTreeSet<ValidationTarget>,
        ctx: &CheckContext<'_>,
    ) -> Option<MessageKey> {
        let Some(member) = element.member(names::members::VALIDATION_APPLIES_TO) else {
            return (targets.len() > 1).then_some(MessageKey::CrossParameterValidationAppliesToRequired);
        };

        if !ctx.types.is_same_type(&member.ty, &self.constraint_target) {
            return Some(MessageKey::CrossParameterValidationAppliesToMustHaveConstraintTargetReturnType);
        }

        let implicit = matches!(
            &member.default_value,
            Some(AnnotationValue::Enum { enum_type, constant })
                if *enum_type == names::CONSTRAINT_TARGET && constant == names::IMPLICIT_CONSTRAINT_TARGET
        );
        (!implicit).then_some(MessageKey::CrossParameterValidationAppliesToMustHaveImplicitDefaultValue)
    }
}

impl Check for CrossParameterConstraintCheck {
    fn name(&self) -> &'static str {
        "cross parameter"
    }

    fn check_annotation_type(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        if !ctx.constraints.is_constraint_annotation(element) {
            return DiagnosticSet::new();
        }

        let validators: Vec<(&TypeRef, BTreeSet<ValidationTarget>)> = annotation
            .value(names::members::VALIDATED_BY)
            .map(AnnotationValue::elements)
            .unwrap_or_default()
            .iter()
            .filter_map(AnnotationValue::as_type)
            .map(|validator| (validator, validator_targets(ctx.types, validator)))
            .collect();

        let mut targets: BTreeSet<ValidationTarget> = validators
            .iter()
            .flat_map(|(_, targets)| targets.iter().copied())
            .collect();
        if targets.is_empty() {
            targets.insert(ValidationTarget::AnnotatedElement);
        }
        if !targets.contains(&ValidationTarget::Parameters) {
            return DiagnosticSet::new();
        }

        let problem = self
            .validator_problem(&validators, ctx)
            .or_else(|| self.applies_to_problem(element, &targets, ctx));
        trace!(
            constraint = %element.path,
            targets = ?targets,
            problem = ?problem,
            "cross-parameter constraint type"
        );

        match problem {
            Some(key) => Diagnostic::new(element, Some(annotation), key)
                .with_arg(element.simple_name())
                .into_set(),
            None => DiagnosticSet::new(),
        }
    }
}
