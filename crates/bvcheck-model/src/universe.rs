//! In-memory type universe
//!
//! [`TypeUniverse`] holds every declaration of the analyzed program by
//! qualified name and answers both collaborator interfaces over it. It is the
//! backing store drivers build before running checks, and the fixture every
//! service-dependent test uses.
//!
//! # Subtyping
//!
//! Subtyping follows declared supertypes breadth-first. Generic arguments are
//! compared by containment: `? extends B` contains any subtype of `B`,
//! `? super B` any supertype of `B`, `?` everything, and a concrete argument
//! only itself. Raw references on either side skip the argument comparison.
//! Every reference type is a subtype of `java.lang.Object`.
//!
//! # Constraint targets
//!
//! A constraint's supported types are the types registered for it up front
//! (built-in constraints) plus the validated type of each validator listed in
//! its `@Constraint(validatedBy = ...)`, i.e. the second type argument of the
//! `ConstraintValidator` supertype.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use tracing::trace;

use crate::foundation::{DeclaredType, PrimitiveKind, QualifiedName, TypeRef};
use crate::model::{
    AnnotationClassification, AnnotationInstance, AnnotationValue, Modifier, ProgramElement,
};
use crate::names::{self, members};
use crate::services::{ConstraintClassifier, TargetAllowance, TypeResolver};

/// Declarations of a program, keyed by qualified name.
#[derive(Debug, Clone, Default)]
pub struct TypeUniverse {
    declarations: IndexMap<QualifiedName, ProgramElement>,
    supported_types: IndexMap<QualifiedName, Vec<TypeRef>>,
}

impl TypeUniverse {
    /// Create an empty universe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a universe that already knows the platform and validation
    /// types checks refer to.
    pub fn with_platform_types() -> Self {
        let mut universe = Self::new();
        let object = || TypeRef::declared(names::OBJECT);

        universe.declare(ProgramElement::class(names::OBJECT).with_member(public_constructor(names::OBJECT)));
        universe.declare(ProgramElement::interface(names::CHAR_SEQUENCE));
        universe.declare(
            ProgramElement::class(names::STRING)
                .with_modifier(Modifier::Final)
                .with_superclass(object())
                .with_interface(TypeRef::declared(names::CHAR_SEQUENCE)),
        );
        universe.declare(
            ProgramElement::class(names::NUMBER)
                .with_modifier(Modifier::Abstract)
                .with_superclass(object()),
        );
        for primitive in PRIMITIVES {
            let boxed = ProgramElement::class(primitive.boxed_name()).with_modifier(Modifier::Final);
            let boxed = match primitive {
                PrimitiveKind::Boolean | PrimitiveKind::Char => {
                    boxed.with_superclass(object())
                }
                _ => boxed.with_superclass(TypeRef::declared(names::NUMBER)),
            };
            universe.declare(boxed);
        }
        universe.declare(
            ProgramElement::class(names::CLASS)
                .with_modifier(Modifier::Final)
                .with_type_params(["T"])
                .with_superclass(object()),
        );
        universe.declare(ProgramElement::interface(names::COLLECTION).with_type_params(["E"]));
        universe.declare(
            ProgramElement::interface(names::LIST)
                .with_type_params(["E"])
                .with_interface(TypeRef::generic(names::COLLECTION, vec![TypeRef::type_var("E")])),
        );
        universe.declare(ProgramElement::interface(names::MAP).with_type_params(["K", "V"]));

        universe.declare(ProgramElement::interface(names::PAYLOAD));
        universe.declare(ProgramElement::interface(names::DEFAULT_GROUP));
        universe.declare(ProgramElement::interface(names::CONSTRAINT_VALIDATOR).with_type_params(["A", "T"]));
        universe.declare(
            ProgramElement::interface(names::DEFAULT_GROUP_SEQUENCE_PROVIDER).with_type_params(["T"]),
        );

        universe.declare(ProgramElement::enum_type(names::RETENTION_POLICY));
        universe.declare(ProgramElement::enum_type(names::ELEMENT_TYPE));
        universe.declare(ProgramElement::enum_type(names::CONSTRAINT_TARGET));
        universe.declare(ProgramElement::enum_type(names::VALIDATION_TARGET));
        for meta in [
            names::RETENTION,
            names::TARGET,
            names::CONSTRAINT,
            names::VALID,
            names::GROUP_SEQUENCE,
            names::GROUP_SEQUENCE_PROVIDER,
            names::SUPPORTED_VALIDATION_TARGET,
        ] {
            universe.declare(ProgramElement::annotation_type(meta));
        }

        universe.declare(builtin_constraint(names::builtin::NOT_NULL));
        universe.register_supported_types(names::builtin::NOT_NULL, vec![object()]);
        universe.declare(builtin_constraint(names::builtin::SIZE));
        universe.register_supported_types(
            names::builtin::SIZE,
            vec![
                TypeRef::declared(names::CHAR_SEQUENCE),
                TypeRef::declared(names::COLLECTION),
                TypeRef::declared(names::MAP),
                TypeRef::array_of(object()),
            ],
        );

        universe
    }

    /// Add or replace a declaration.
    pub fn declare(&mut self, declaration: ProgramElement) {
        self.declarations.insert(declaration.path.clone(), declaration);
    }

    /// Add a declaration (builder style).
    pub fn with_declaration(mut self, declaration: ProgramElement) -> Self {
        self.declare(declaration);
        self
    }

    /// Register types a constraint supports without listing validators.
    pub fn register_supported_types(
        &mut self,
        constraint: impl Into<QualifiedName>,
        types: Vec<TypeRef>,
    ) {
        let entry = self.supported_types.entry(constraint.into()).or_default();
        for ty in types {
            if !entry.contains(&ty) {
                entry.push(ty);
            }
        }
    }

    pub fn declaration(&self, name: &QualifiedName) -> Option<&ProgramElement> {
        self.declarations.get(name)
    }

    /// Whether an annotation is a use of a constraint type.
    fn is_constraint_use(&self, annotation: &AnnotationInstance) -> bool {
        self.declarations
            .get(&annotation.annotation_type)
            .is_some_and(|declaration| self.is_constraint_annotation(declaration))
    }

    fn is_multi_valued(&self, annotation: &AnnotationInstance) -> bool {
        let Some(parts) = annotation.value(members::VALUE).and_then(AnnotationValue::as_array) else {
            return false;
        };
        !parts.is_empty()
            && parts.iter().all(|part| {
                part.as_annotation()
                    .is_some_and(|nested| self.is_constraint_use(nested))
            })
    }

    /// Constraints a constraint type is composed of.
    fn composing_constraints<'a>(
        &'a self,
        declaration: &'a ProgramElement,
    ) -> impl Iterator<Item = &'a AnnotationInstance> + 'a {
        declaration
            .annotations
            .iter()
            .filter(move |annotation| self.is_constraint_use(annotation))
    }

    fn supported_types(&self, constraint: &QualifiedName) -> Vec<TypeRef> {
        let mut types = self
            .supported_types
            .get(constraint)
            .cloned()
            .unwrap_or_default();

        let validators = self
            .declarations
            .get(constraint)
            .and_then(|declaration| declaration.annotation(names::CONSTRAINT))
            .and_then(|meta| meta.value(members::VALIDATED_BY))
            .map(AnnotationValue::elements)
            .unwrap_or_default();

        for validator in validators.iter().filter_map(AnnotationValue::as_type) {
            if let Some(validated) = self.supertype_argument(validator, names::CONSTRAINT_VALIDATOR, 1) {
                if !types.contains(&validated) {
                    types.push(validated);
                }
            }
        }
        types
    }

    fn check_constraint_target_inner(
        &self,
        constraint: &QualifiedName,
        target: &TypeRef,
        visiting: &mut Vec<QualifiedName>,
    ) -> TargetAllowance {
        if visiting.contains(constraint) {
            return TargetAllowance::Allowed;
        }
        visiting.push(constraint.clone());

        let declaration = self.declarations.get(constraint);
        let mut composed = false;
        if let Some(declaration) = declaration {
            for composing in self.composing_constraints(declaration) {
                composed = true;
                let result =
                    self.check_constraint_target_inner(&composing.annotation_type, target, visiting);
                if !result.is_allowed() {
                    visiting.pop();
                    return result;
                }
            }
        }
        visiting.pop();

        let supported = self.supported_types(constraint);
        let target = match target {
            TypeRef::Primitive(kind) => TypeRef::declared(kind.boxed_name()),
            other => other.clone(),
        };
        let assignable: Vec<&TypeRef> = supported
            .iter()
            .filter(|supported| self.is_subtype(&target, supported))
            .collect();
        let lowest = keep_lowest_per_hierarchy(self, &assignable);

        trace!(
            constraint = %constraint,
            target = %target,
            supported = supported.len(),
            matching = lowest.len(),
            "constraint target query"
        );

        match lowest.len() {
            0 if supported.is_empty() && composed => TargetAllowance::Allowed,
            0 => TargetAllowance::Disallowed,
            1 => TargetAllowance::Allowed,
            _ => TargetAllowance::MultipleValidatorsFound,
        }
    }

    fn declared_subtype(&self, sub: &TypeRef, target: &DeclaredType) -> bool {
        let mut queue = VecDeque::from([sub.clone()]);
        let mut seen = HashSet::new();

        while let Some(candidate) = queue.pop_front() {
            if !seen.insert(candidate.clone()) {
                continue;
            }
            if let TypeRef::Declared(declared) = &candidate {
                if declared.name == target.name && self.arguments_contained(&declared.args, &target.args)
                {
                    return true;
                }
            }
            queue.extend(self.direct_supertypes(&candidate));
        }
        false
    }

    fn arguments_contained(&self, actual: &[TypeRef], expected: &[TypeRef]) -> bool {
        // Raw references match any parameterization
        if actual.is_empty() || expected.is_empty() {
            return true;
        }
        actual.len() == expected.len()
            && expected
                .iter()
                .zip(actual)
                .all(|(expected, actual)| self.contains(expected, actual))
    }

    fn contains(&self, expected: &TypeRef, actual: &TypeRef) -> bool {
        match expected {
            TypeRef::Wildcard(wildcard) => {
                let upper = wildcard
                    .extends_bound
                    .as_ref()
                    .map_or(true, |bound| self.is_subtype(actual, bound));
                let lower = wildcard.super_bound.as_ref().map_or(true, |bound| {
                    actual.as_wildcard().is_none() && self.is_subtype(bound, actual)
                });
                upper && lower
            }
            _ => expected == actual,
        }
    }
}

const PRIMITIVES: [PrimitiveKind; 8] = [
    PrimitiveKind::Boolean,
    PrimitiveKind::Byte,
    PrimitiveKind::Short,
    PrimitiveKind::Int,
    PrimitiveKind::Long,
    PrimitiveKind::Char,
    PrimitiveKind::Float,
    PrimitiveKind::Double,
];

fn public_constructor(owner: &str) -> ProgramElement {
    ProgramElement::constructor(QualifiedName::from(owner).member("<init>")).with_modifier(Modifier::Public)
}

/// A built-in constraint type with the standard members and meta-annotations.
fn builtin_constraint(name: &str) -> ProgramElement {
    let path = QualifiedName::from(name);
    let class_array = |bound: Option<TypeRef>| {
        let arg = match bound {
            Some(bound) => TypeRef::wildcard_extends(bound),
            None => TypeRef::unbounded_wildcard(),
        };
        TypeRef::array_of(TypeRef::generic(names::CLASS, vec![arg]))
    };

    ProgramElement::annotation_type(path.clone())
        .with_annotation(
            AnnotationInstance::new(names::CONSTRAINT)
                .with_value(members::VALIDATED_BY, AnnotationValue::Array(Vec::new())),
        )
        .with_annotation(AnnotationInstance::new(names::RETENTION).with_value(
            members::VALUE,
            AnnotationValue::enum_constant(names::RETENTION_POLICY, names::RUNTIME_RETENTION),
        ))
        .with_member(
            ProgramElement::method(path.member(members::MESSAGE), TypeRef::declared(names::STRING))
                .with_default(AnnotationValue::Str(format!("{{{}.message}}", name))),
        )
        .with_member(
            ProgramElement::method(path.member(members::GROUPS), class_array(None))
                .with_default(AnnotationValue::Array(Vec::new())),
        )
        .with_member(
            ProgramElement::method(
                path.member(members::PAYLOAD),
                class_array(Some(TypeRef::declared(names::PAYLOAD))),
            )
            .with_default(AnnotationValue::Array(Vec::new())),
        )
}

/// Drop every type that is a proper supertype of another type in the set.
fn keep_lowest_per_hierarchy<'a>(universe: &TypeUniverse, types: &[&'a TypeRef]) -> Vec<&'a TypeRef> {
    types
        .iter()
        .filter(|candidate| {
            !types
                .iter()
                .any(|other| other != *candidate && universe.is_subtype(other, candidate))
        })
        .copied()
        .collect()
}

impl TypeResolver for TypeUniverse {
    fn is_same_type(&self, a: &TypeRef, b: &TypeRef) -> bool {
        a == b
    }

    fn is_subtype(&self, sub: &TypeRef, sup: &TypeRef) -> bool {
        if sub == sup {
            return true;
        }
        match (sub, sup) {
            (TypeRef::Wildcard(_) | TypeRef::TypeVar(_), _) => self.is_subtype(&sub.erasure(), sup),
            (TypeRef::Primitive(_) | TypeRef::Void, _) | (_, TypeRef::Primitive(_) | TypeRef::Void) => {
                false
            }
            (_, TypeRef::Declared(target)) if target.name == names::OBJECT => true,
            (TypeRef::Array(sub_component), TypeRef::Array(sup_component)) => {
                !sub_component.is_primitive()
                    && !sup_component.is_primitive()
                    && self.is_subtype(sub_component, sup_component)
            }
            (TypeRef::Declared(_), TypeRef::Declared(target)) => self.declared_subtype(sub, target),
            _ => false,
        }
    }

    fn direct_supertypes(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let Some(declared) = ty.as_declared() else {
            return Vec::new();
        };
        let Some(declaration) = self.declarations.get(&declared.name) else {
            return Vec::new();
        };

        if declared.args.is_empty() && !declaration.type_params.is_empty() {
            return declaration.declared_supertypes().map(TypeRef::erasure).collect();
        }

        let bindings: HashMap<&str, &TypeRef> = declaration
            .type_params
            .iter()
            .map(String::as_str)
            .zip(declared.args.iter())
            .collect();
        declaration
            .declared_supertypes()
            .map(|supertype| supertype.substitute(&bindings))
            .collect()
    }

    fn type_by_name(&self, name: &str) -> Option<TypeRef> {
        self.declarations
            .get(&QualifiedName::from(name))
            .map(|declaration| declaration.ty.erasure())
    }

    fn type_element(&self, ty: &TypeRef) -> Option<&ProgramElement> {
        ty.qualified_name().and_then(|name| self.declarations.get(name))
    }

    fn check_constraint_target(&self, constraint: &QualifiedName, target: &TypeRef) -> TargetAllowance {
        self.check_constraint_target_inner(constraint, target, &mut Vec::new())
    }
}

impl ConstraintClassifier for TypeUniverse {
    fn classify(&self, annotation: &AnnotationInstance) -> AnnotationClassification {
        if self.is_constraint_use(annotation) {
            AnnotationClassification::ConstraintAnnotation
        } else if self.is_multi_valued(annotation) {
            AnnotationClassification::MultiValuedConstraintAnnotation
        } else if annotation.is_of_type(names::VALID) {
            AnnotationClassification::GraphValidationAnnotation
        } else if annotation.is_of_type(names::CONSTRAINT) {
            AnnotationClassification::ConstraintMetaAnnotation
        } else if annotation.is_of_type(names::GROUP_SEQUENCE) {
            AnnotationClassification::GroupSequenceAnnotation
        } else if annotation.is_of_type(names::GROUP_SEQUENCE_PROVIDER) {
            AnnotationClassification::GroupSequenceProviderAnnotation
        } else {
            AnnotationClassification::NoConstraintAnnotation
        }
    }

    fn is_constraint_annotation(&self, declaration: &ProgramElement) -> bool {
        declaration.annotation(names::CONSTRAINT).is_some()
    }

    fn is_composed_constraint(&self, declaration: &ProgramElement) -> bool {
        self.composing_constraints(declaration).next().is_some()
    }

    fn decompose_multi_valued(&self, annotation: &AnnotationInstance) -> Vec<AnnotationInstance> {
        annotation
            .value(members::VALUE)
            .map(AnnotationValue::elements)
            .unwrap_or_default()
            .iter()
            .filter_map(AnnotationValue::as_annotation)
            .filter(|part| self.is_constraint_use(part))
            .cloned()
            .collect()
    }
}
