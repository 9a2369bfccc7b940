// End-to-end checks through ConstraintChecker and Reporter

use bvcheck::model::{
    names, AnnotationInstance, AnnotationValue, Modifier, ProgramElement, TypeRef, TypeUniverse,
};
use bvcheck::rules::DiagnosticArg;
use bvcheck::{Configuration, ConstraintChecker, DiagnosticSet, MessageKey, Reporter, Severity};

// ============================================================================
// Fixtures
// ============================================================================

fn keys(diagnostics: &DiagnosticSet) -> Vec<MessageKey> {
    diagnostics.iter().map(|d| d.key).collect()
}

fn size(min: i64) -> AnnotationInstance {
    AnnotationInstance::new(names::builtin::SIZE).with_value("min", AnnotationValue::Int(min))
}

fn size_list(parts: Vec<AnnotationInstance>) -> AnnotationInstance {
    AnnotationInstance::new("javax.validation.constraints.Size.List").with_value(
        names::members::VALUE,
        AnnotationValue::Array(parts.into_iter().map(AnnotationValue::Annotation).collect()),
    )
}

fn class_array(arg: TypeRef) -> TypeRef {
    TypeRef::array_of(TypeRef::generic(names::CLASS, vec![arg]))
}

fn constraint_meta(validator: &str) -> AnnotationInstance {
    AnnotationInstance::new(names::CONSTRAINT).with_value(
        names::members::VALIDATED_BY,
        AnnotationValue::Array(vec![AnnotationValue::Type(TypeRef::declared(validator))]),
    )
}

fn runtime_retention() -> AnnotationInstance {
    AnnotationInstance::new(names::RETENTION).with_value(
        names::members::VALUE,
        AnnotationValue::enum_constant(names::RETENTION_POLICY, names::RUNTIME_RETENTION),
    )
}

/// `@interface Checked` with `@Constraint`, `@Retention(RUNTIME)`, `message`
/// and `payload`, but no `groups` member.
fn make_constraint_type_without_groups() -> ProgramElement {
    ProgramElement::annotation_type("com.acme.Checked")
        .with_annotation(constraint_meta("com.acme.CheckedValidator"))
        .with_annotation(runtime_retention())
        .with_member(ProgramElement::method(
            "com.acme.Checked.message",
            TypeRef::declared(names::STRING),
        ))
        .with_member(
            ProgramElement::method(
                "com.acme.Checked.payload",
                class_array(TypeRef::wildcard_extends(TypeRef::declared(names::PAYLOAD))),
            )
            .with_default(AnnotationValue::Array(Vec::new())),
        )
}

fn make_checker(universe: &TypeUniverse) -> ConstraintChecker<'_> {
    ConstraintChecker::for_universe(universe, Configuration::default())
}

// ============================================================================
// Constraint type declarations
// ============================================================================

#[test]
fn test_missing_groups_member() {
    let universe = TypeUniverse::with_platform_types();
    let checker = make_checker(&universe);
    let declaration = make_constraint_type_without_groups();

    let found = checker.check(&declaration, &constraint_meta("com.acme.CheckedValidator"));
    assert_eq!(keys(&found), vec![MessageKey::ConstraintTypeMustDeclareGroupsMember]);
}

#[test]
fn test_non_empty_groups_default_only() {
    let universe = TypeUniverse::with_platform_types();
    let checker = make_checker(&universe);
    let declaration = make_constraint_type_without_groups().with_member(
        ProgramElement::method("com.acme.Checked.groups", class_array(TypeRef::unbounded_wildcard()))
            .with_default(AnnotationValue::Array(vec![AnnotationValue::Type(TypeRef::declared(
                names::DEFAULT_GROUP,
            ))])),
    );

    let found = checker.check(&declaration, &constraint_meta("com.acme.CheckedValidator"));
    assert_eq!(keys(&found), vec![MessageKey::DefaultValueMustBeEmptyArray]);
}

#[test]
fn test_meta_checks_short_circuit_in_order() {
    let universe = TypeUniverse::with_platform_types();
    let checker = make_checker(&universe);
    // Wrong retention hides the missing members
    let declaration = ProgramElement::annotation_type("com.acme.Checked")
        .with_annotation(constraint_meta("com.acme.CheckedValidator"));

    let found = checker.check(&declaration, &constraint_meta("com.acme.CheckedValidator"));
    assert_eq!(keys(&found), vec![MessageKey::ConstraintTypeWithWrongRetentionPolicy]);
}

#[test]
fn test_constraint_declared_directly_and_in_list() {
    let universe = TypeUniverse::with_platform_types();
    let checker = make_checker(&universe);
    let listed = size_list(vec![size(1)]);
    let declaration = ProgramElement::annotation_type("com.acme.ShortText")
        .with_annotation(constraint_meta("com.acme.ShortTextValidator"))
        .with_annotation(size(10))
        .with_annotation(listed.clone());

    let found = checker.check(&declaration, &listed);
    assert_eq!(keys(&found), vec![MessageKey::MixedListAndDirectAnnotationDeclaration]);
    assert_eq!(found.first().and_then(|d| d.anchor.clone()), Some(size(1)));
}

#[test]
fn test_generic_and_cross_parameter_constraint_needs_applies_to() {
    let parameters_validator = ProgramElement::class("com.acme.CheckedParametersValidator")
        .with_annotation(AnnotationInstance::new(names::SUPPORTED_VALIDATION_TARGET).with_value(
            names::members::VALUE,
            AnnotationValue::enum_constant(names::VALIDATION_TARGET, "PARAMETERS"),
        ))
        .with_interface(TypeRef::generic(
            names::CONSTRAINT_VALIDATOR,
            vec![
                TypeRef::declared("com.acme.Checked"),
                TypeRef::array_of(TypeRef::declared(names::OBJECT)),
            ],
        ));
    let universe = TypeUniverse::with_platform_types().with_declaration(parameters_validator);
    let checker = make_checker(&universe);

    let meta = AnnotationInstance::new(names::CONSTRAINT).with_value(
        names::members::VALIDATED_BY,
        AnnotationValue::Array(vec![
            AnnotationValue::Type(TypeRef::declared("com.acme.CheckedValidator")),
            AnnotationValue::Type(TypeRef::declared("com.acme.CheckedParametersValidator")),
        ]),
    );
    let groups = ProgramElement::method("com.acme.Checked.groups", class_array(TypeRef::unbounded_wildcard()))
        .with_default(AnnotationValue::Array(Vec::new()));
    let declaration = make_constraint_type_without_groups().with_member(groups);

    let found = checker.check(&declaration, &meta);
    assert_eq!(keys(&found), vec![MessageKey::CrossParameterValidationAppliesToRequired]);

    let with_applies_to = declaration.with_member(
        ProgramElement::method(
            "com.acme.Checked.validationAppliesTo",
            TypeRef::declared(names::CONSTRAINT_TARGET),
        )
        .with_default(AnnotationValue::enum_constant(
            names::CONSTRAINT_TARGET,
            names::IMPLICIT_CONSTRAINT_TARGET,
        )),
    );
    assert!(checker.check(&with_applies_to, &meta).is_empty());
}

// ============================================================================
// Annotated members
// ============================================================================

#[test]
fn test_static_field_stops_before_type_check() {
    let universe = TypeUniverse::with_platform_types();
    let checker = make_checker(&universe);
    // Size does not apply to Integer either; only the first finding is reported
    let field = ProgramElement::field("com.acme.Order.count", TypeRef::declared("java.lang.Integer"))
        .with_modifier(Modifier::Static);

    let found = checker.check(&field, &size(1));
    assert_eq!(keys(&found), vec![MessageKey::StaticFieldsMayNotBeAnnotated]);
}

#[test]
fn test_list_container_reports_each_part() {
    let universe = TypeUniverse::with_platform_types();
    let checker = make_checker(&universe);
    let field = ProgramElement::field("com.acme.Order.count", TypeRef::declared("java.lang.Integer"));

    let found = checker.check(&field, &size_list(vec![size(1), size(5)]));
    assert_eq!(
        keys(&found),
        vec![MessageKey::NotSupportedType, MessageKey::NotSupportedType]
    );
    let anchors: Vec<_> = found.iter().filter_map(|d| d.anchor.clone()).collect();
    assert_eq!(anchors, vec![size(1), size(5)]);
    assert!(found
        .iter()
        .all(|d| d.args == vec![DiagnosticArg::from("Size")]));
}

#[test]
fn test_cascade_on_primitive_getter() {
    let universe = TypeUniverse::with_platform_types();
    let checker = make_checker(&universe);
    let getter = ProgramElement::method(
        "com.acme.Order.getCount",
        TypeRef::Primitive(bvcheck::model::PrimitiveKind::Int),
    )
    .with_annotation(AnnotationInstance::new(names::VALID));

    assert_eq!(
        keys(&checker.check_element(&getter)),
        vec![MessageKey::AtValidNotAllowedAtMethodReturningPrimitiveType]
    );
}

#[test]
fn test_repeated_runs_deduplicate() {
    let universe = TypeUniverse::with_platform_types();
    let checker = make_checker(&universe);
    let field = ProgramElement::field("com.acme.Order.count", TypeRef::declared("java.lang.Integer"))
        .with_annotation(size(1));

    let mut all = checker.check_element(&field);
    all.extend(checker.check_element(&field));
    assert_eq!(all.len(), 1);
}

// ============================================================================
// Group sequence providers
// ============================================================================

fn make_provider_universe() -> TypeUniverse {
    TypeUniverse::with_platform_types()
        .with_declaration(ProgramElement::class("com.acme.Foo"))
        .with_declaration(
            ProgramElement::class("com.acme.SpecialFoo").with_superclass(TypeRef::declared("com.acme.Foo")),
        )
        .with_declaration(
            ProgramElement::class("com.acme.Base")
                .with_type_params(["T"])
                .with_interface(TypeRef::generic(
                    names::DEFAULT_GROUP_SEQUENCE_PROVIDER,
                    vec![TypeRef::type_var("T")],
                )),
        )
        .with_declaration(
            ProgramElement::class("com.acme.FooSequenceProvider")
                .with_superclass(TypeRef::generic("com.acme.Base", vec![TypeRef::declared("com.acme.Foo")]))
                .with_member(
                    ProgramElement::constructor("com.acme.FooSequenceProvider.<init>")
                        .with_modifier(Modifier::Public),
                ),
        )
}

fn provided_by(provider: &str) -> AnnotationInstance {
    AnnotationInstance::new(names::GROUP_SEQUENCE_PROVIDER).with_value(
        names::members::VALUE,
        AnnotationValue::Type(TypeRef::declared(provider)),
    )
}

#[test]
fn test_provider_subject_through_two_levels() {
    let universe = make_provider_universe();
    let checker = make_checker(&universe);
    let annotation = provided_by("com.acme.FooSequenceProvider");

    for host in ["com.acme.Foo", "com.acme.SpecialFoo"] {
        let class = ProgramElement::class(host).with_annotation(annotation.clone());
        assert!(checker.check_element(&class).is_empty(), "{}", host);
    }

    let unrelated = ProgramElement::class("com.acme.Invoice").with_annotation(annotation);
    assert_eq!(
        keys(&checker.check_element(&unrelated)),
        vec![MessageKey::GroupSequenceProviderAnnotationValueDefinedProviderClassWithWrongType]
    );
}

#[test]
fn test_provider_on_enum() {
    let universe = make_provider_universe();
    let checker = make_checker(&universe);
    let status = ProgramElement::enum_type("com.acme.Status")
        .with_annotation(provided_by("com.acme.FooSequenceProvider"));

    let found = checker.check_element(&status);
    assert!(found
        .iter()
        .any(|d| d.key == MessageKey::GroupSequenceProviderAnnotationMustBeDefinedOnAClass));
}

// ============================================================================
// Reporting
// ============================================================================

#[test]
fn test_reporting_with_configured_kind() {
    let universe = TypeUniverse::with_platform_types();
    let config = Configuration::from_options([("diagnosticKind", "NOTE")]).unwrap();
    let checker = ConstraintChecker::for_universe(&universe, config);
    let field = ProgramElement::field("com.acme.Order.count", TypeRef::declared("java.lang.Integer"))
        .with_annotation(size(1));

    let reported = Reporter::new(checker.configuration()).report_all(&checker.check_element(&field));
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].severity, Severity::Note);
    assert_eq!(
        reported[0].to_string(),
        "note: com.acme.Order.count: @Size: The annotation @Size is disallowed for this data type."
    );
}

#[test]
fn test_checker_shared_across_threads() {
    let universe = TypeUniverse::with_platform_types();
    let checker = make_checker(&universe);
    let fields: Vec<ProgramElement> = (0..4)
        .map(|i| {
            ProgramElement::field(format!("com.acme.Order.f{}", i), TypeRef::declared("java.lang.Integer"))
                .with_annotation(size(i))
        })
        .collect();

    let checker = &checker;
    let counts: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = fields
            .iter()
            .map(|field| scope.spawn(move || checker.check_element(field).len()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(counts, vec![1, 1, 1, 1]);
}
