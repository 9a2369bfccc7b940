//! Dispatch table from (element kind, annotation classification) to check lists.

use std::sync::Arc;

use bvcheck_model::{
    names, AnnotationClassification, CheckTarget, ElementKind, TypeRef, TypeResolver,
};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::{
    AnnotationTypeCheck, AnnotationTypeMemberCheck, Check, CheckList, ConstraintValidatorCheck,
    CrossParameterConstraintCheck, GetterCheck, GroupSequenceCheck, GroupSequenceProviderCheck, MixDirectAndListAnnotationCheck,
    PrimitiveCheck, RetentionPolicyCheck, StaticCheck, TargetCheck, TypeCheck,
};

/// Options that change which rules are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// When false, only bean-style getters may carry constraints
    pub method_constraints_supported: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            method_constraints_supported: true,
        }
    }
}

/// Type references resolved once when the dispatcher is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellKnownTypes {
    /// `java.lang.String`
    pub string: TypeRef,
    /// `javax.validation.Payload`
    pub payload: TypeRef,
    /// Erasure of `DefaultGroupSequenceProvider<T>`
    pub group_sequence_provider: TypeRef,
    /// `javax.validation.ConstraintTarget`
    pub constraint_target: TypeRef,
}

impl WellKnownTypes {
    /// Look the types up by name.
    ///
    /// Types the resolver does not know fall back to a plain reference by
    /// name, so comparisons still work by qualified name.
    pub fn resolve(types: &dyn TypeResolver) -> Self {
        let lookup = |name: &str| {
            types.type_by_name(name).unwrap_or_else(|| {
                warn!(type_name = name, "well-known type not found, using reference by name");
                TypeRef::declared(name)
            })
        };

        Self {
            string: lookup(names::STRING),
            payload: lookup(names::PAYLOAD),
            group_sequence_provider: lookup(names::DEFAULT_GROUP_SEQUENCE_PROVIDER),
            constraint_target: lookup(names::CONSTRAINT_TARGET),
        }
    }
}

/// Selects the check list for an annotated element.
///
/// Built once, then shared read-only. Every (kind, classification) pair
/// resolves to a list; pairs without rules resolve to the same empty list.
#[derive(Debug)]
pub struct CheckDispatcher {
    table: IndexMap<(CheckTarget, AnnotationClassification), CheckList>,
    empty: CheckList,
    well_known: WellKnownTypes,
}

impl CheckDispatcher {
    /// Build the dispatch table.
    pub fn new(types: &dyn TypeResolver, options: DispatchOptions) -> Self {
        let well_known = WellKnownTypes::resolve(types);

        let static_check = shared(StaticCheck);
        let getter_check = shared(GetterCheck::new(!options.method_constraints_supported));
        let type_check = shared(TypeCheck);
        let primitive_check = shared(PrimitiveCheck);
        let annotation_type_check = shared(AnnotationTypeCheck);

        use AnnotationClassification::*;
        let mut table = IndexMap::new();

        table.insert(
            (CheckTarget::Field, ConstraintAnnotation),
            CheckList::short_circuit(vec![static_check.clone(), type_check.clone()]),
        );
        table.insert(
            (CheckTarget::Field, MultiValuedConstraintAnnotation),
            CheckList::aggregate(vec![static_check.clone(), type_check.clone()]),
        );
        table.insert(
            (CheckTarget::Field, GraphValidationAnnotation),
            CheckList::short_circuit(vec![static_check.clone(), primitive_check.clone()]),
        );

        table.insert(
            (CheckTarget::Method, ConstraintAnnotation),
            CheckList::short_circuit(vec![
                getter_check.clone(),
                static_check.clone(),
                type_check.clone(),
            ]),
        );
        table.insert(
            (CheckTarget::Method, MultiValuedConstraintAnnotation),
            CheckList::aggregate(vec![
                getter_check.clone(),
                static_check.clone(),
                type_check.clone(),
            ]),
        );
        table.insert(
            (CheckTarget::Method, GraphValidationAnnotation),
            CheckList::short_circuit(vec![getter_check, static_check, primitive_check]),
        );

        table.insert(
            (CheckTarget::AnnotationType, ConstraintAnnotation),
            CheckList::short_circuit(vec![annotation_type_check.clone()]),
        );
        table.insert(
            (CheckTarget::AnnotationType, MultiValuedConstraintAnnotation),
            CheckList::aggregate(vec![
                annotation_type_check,
                shared(MixDirectAndListAnnotationCheck),
            ]),
        );
        table.insert(
            (CheckTarget::AnnotationType, ConstraintMetaAnnotation),
            CheckList::short_circuit(vec![
                shared(RetentionPolicyCheck),
                shared(TargetCheck),
                shared(ConstraintValidatorCheck),
                shared(AnnotationTypeMemberCheck::new(
                    well_known.string.clone(),
                    well_known.payload.clone(),
                )),
                shared(CrossParameterConstraintCheck::new(well_known.constraint_target.clone())),
            ]),
        );

        table.insert(
            (CheckTarget::NonAnnotationType, ConstraintAnnotation),
            CheckList::short_circuit(vec![type_check.clone()]),
        );
        table.insert(
            (CheckTarget::NonAnnotationType, MultiValuedConstraintAnnotation),
            CheckList::aggregate(vec![type_check]),
        );
        table.insert(
            (CheckTarget::NonAnnotationType, GroupSequenceAnnotation),
            CheckList::short_circuit(vec![shared(GroupSequenceCheck)]),
        );
        table.insert(
            (CheckTarget::NonAnnotationType, GroupSequenceProviderAnnotation),
            CheckList::short_circuit(vec![shared(GroupSequenceProviderCheck::new(
                well_known.group_sequence_provider.clone(),
            ))]),
        );

        debug!(
            entries = table.len(),
            method_constraints_supported = options.method_constraints_supported,
            "built check dispatch table"
        );

        Self {
            table,
            empty: CheckList::empty(),
            well_known,
        }
    }

    /// Select the check list for an annotated element.
    ///
    /// Total: unknown pairs and kinds without a check target get the shared
    /// empty list.
    pub fn resolve(&self, kind: ElementKind, classification: AnnotationClassification) -> &CheckList {
        let list = kind
            .check_target()
            .and_then(|target| self.table.get(&(target, classification)))
            .unwrap_or(&self.empty);
        trace!(
            kind = %kind,
            classification = ?classification,
            checks = ?list.check_names(),
            "resolved check list"
        );
        list
    }

    /// The type references cached at construction.
    pub fn well_known_types(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

fn shared(check: impl Check + 'static) -> Arc<dyn Check> {
    Arc::new(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Composition;
    use bvcheck_model::TypeUniverse;

    #[test]
    fn test_resolve_is_total() {
        let universe = TypeUniverse::with_platform_types();
        let dispatcher = CheckDispatcher::new(&universe, DispatchOptions::default());

        for kind in ElementKind::ALL {
            for classification in AnnotationClassification::ALL {
                let list = dispatcher.resolve(kind, classification);
                if kind.check_target().is_none()
                    || classification == AnnotationClassification::NoConstraintAnnotation
                {
                    assert!(list.is_empty(), "{:?}/{:?} should have no checks", kind, classification);
                }
            }
        }
    }

    #[test]
    fn test_unpopulated_pairs_share_the_empty_list() {
        let universe = TypeUniverse::with_platform_types();
        let dispatcher = CheckDispatcher::new(&universe, DispatchOptions::default());

        let a = dispatcher.resolve(ElementKind::Constructor, AnnotationClassification::ConstraintAnnotation);
        let b = dispatcher.resolve(ElementKind::Field, AnnotationClassification::NoConstraintAnnotation);
        let c = dispatcher.resolve(ElementKind::Field, AnnotationClassification::GroupSequenceProviderAnnotation);
        assert!(std::ptr::eq(a, b));
        assert!(std::ptr::eq(b, c));
    }

    #[test]
    fn test_table_order_and_composition() {
        let universe = TypeUniverse::with_platform_types();
        let dispatcher = CheckDispatcher::new(&universe, DispatchOptions::default());

        let field = dispatcher.resolve(ElementKind::Field, AnnotationClassification::ConstraintAnnotation);
        assert_eq!(field.check_names(), vec!["static", "type"]);
        assert_eq!(field.composition(), Composition::ShortCircuit);

        let method_list = dispatcher.resolve(
            ElementKind::Method,
            AnnotationClassification::MultiValuedConstraintAnnotation,
        );
        assert_eq!(method_list.check_names(), vec!["getter", "static", "type"]);
        assert_eq!(method_list.composition(), Composition::DecomposeAndAggregate);

        let meta = dispatcher.resolve(
            ElementKind::AnnotationType,
            AnnotationClassification::ConstraintMetaAnnotation,
        );
        assert_eq!(
            meta.check_names(),
            vec![
                "retention policy",
                "target",
                "constraint validator",
                "annotation type members",
                "cross parameter"
            ]
        );

        let enum_list = dispatcher.resolve(
            ElementKind::Enum,
            AnnotationClassification::GroupSequenceProviderAnnotation,
        );
        assert_eq!(enum_list.check_names(), vec!["group sequence provider"]);
    }

    #[test]
    fn test_well_known_types_fall_back_to_names() {
        let empty = TypeUniverse::new();
        let dispatcher = CheckDispatcher::new(&empty, DispatchOptions::default());
        assert_eq!(
            dispatcher.well_known_types().payload,
            TypeRef::declared(names::PAYLOAD)
        );

        let universe = TypeUniverse::with_platform_types();
        let dispatcher = CheckDispatcher::new(&universe, DispatchOptions::default());
        assert_eq!(
            dispatcher.well_known_types().group_sequence_provider,
            TypeRef::declared(names::DEFAULT_GROUP_SEQUENCE_PROVIDER)
        );
        assert_eq!(
            dispatcher.well_known_types().constraint_target,
            TypeRef::declared(names::CONSTRAINT_TARGET)
        );
    }
}
