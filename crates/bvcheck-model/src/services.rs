//! Collaborator interfaces queried by checks
//!
//! Checks never inspect the type system or the validation metadata directly.
//! They go through two services:
//!
//! - [`TypeResolver`] answers type-system questions (identity, subtyping,
//!   erasure, supertypes, lookup by name) and whether a constraint may be
//!   applied to a given type.
//! - [`ConstraintClassifier`] knows which annotations are constraints, list
//!   containers, or meta-annotations.
//!
//! Both are read-only and shared across threads.

use serde::{Deserialize, Serialize};

use crate::foundation::{QualifiedName, TypeRef};
use crate::model::{AnnotationClassification, AnnotationInstance, ProgramElement};

/// Whether a constraint may be declared on a target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetAllowance {
    /// Exactly one validator handles the target type
    Allowed,
    /// No validator handles the target type
    Disallowed,
    /// Validators for unrelated supported types all match, so the choice is ambiguous
    MultipleValidatorsFound,
}

impl TargetAllowance {
    pub fn is_allowed(self) -> bool {
        self == TargetAllowance::Allowed
    }
}

/// Type-system queries.
pub trait TypeResolver: Send + Sync {
    /// Structural identity, including generic arguments.
    fn is_same_type(&self, a: &TypeRef, b: &TypeRef) -> bool;

    /// Whether `sub` is assignable to `sup` without conversion.
    fn is_subtype(&self, sub: &TypeRef, sup: &TypeRef) -> bool;

    /// The type with generic arguments discarded.
    fn erasure(&self, ty: &TypeRef) -> TypeRef {
        ty.erasure()
    }

    /// Superclass and implemented interfaces of a declared type, with the
    /// type's generic arguments substituted in.
    fn direct_supertypes(&self, ty: &TypeRef) -> Vec<TypeRef>;

    /// Reference to a declared type, if it is known.
    fn type_by_name(&self, name: &str) -> Option<TypeRef>;

    /// Declaration behind a declared type reference.
    fn type_element(&self, ty: &TypeRef) -> Option<&ProgramElement>;

    /// Generic argument `index` that `ty` binds on its supertype `generic`,
    /// e.g. the validated type (index 1) of a `ConstraintValidator`.
    fn supertype_argument(&self, ty: &TypeRef, generic: &str, index: usize) -> Option<TypeRef> {
        self.direct_supertypes(ty).into_iter().find_map(|supertype| {
            if supertype.erasure().qualified_name().is_some_and(|name| *name == generic) {
                supertype
                    .as_declared()
                    .and_then(|declared| declared.args.get(index).cloned())
            } else {
                self.supertype_argument(&supertype, generic, index)
            }
        })
    }

    /// Whether the constraint `constraint` may be applied to `target`.
    fn check_constraint_target(&self, constraint: &QualifiedName, target: &TypeRef)
        -> TargetAllowance;
}

/// Validation metadata queries.
pub trait ConstraintClassifier: Send + Sync {
    /// Categorize an annotation instance.
    fn classify(&self, annotation: &AnnotationInstance) -> AnnotationClassification;

    /// Whether an annotation type declaration is a constraint type.
    fn is_constraint_annotation(&self, declaration: &ProgramElement) -> bool;

    /// Whether a constraint type is composed of other constraints.
    fn is_composed_constraint(&self, declaration: &ProgramElement) -> bool;

    /// Constraint uses wrapped by a list container, in declaration order.
    fn decompose_multi_valued(&self, annotation: &AnnotationInstance) -> Vec<AnnotationInstance>;
}
