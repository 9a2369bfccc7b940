//! Check findings
//!
//! Checks never fail: every rule violation is a [`Diagnostic`] value.
//!
//! # Design
//!
//! - `Diagnostic` - one finding: element, optional anchor annotation, message key, arguments
//! - `MessageKey` - closed set of findings, each with a stable catalog name
//! - `Severity` - assigned downstream by the reporter, never by checks
//! - `DiagnosticSet` - deduplicating, insertion-ordered collection of findings
//!
//! # Examples
//!
//! ```
//! # use bvcheck_model::{AnnotationInstance, ProgramElement, TypeRef, Modifier};
//! # use bvcheck_rules::error::*;
//! let field = ProgramElement::field("com.acme.Order.count", TypeRef::declared("java.lang.Long"))
//!     .with_modifier(Modifier::Static);
//! let annotation = AnnotationInstance::new("javax.validation.constraints.NotNull");
//!
//! let diagnostic = Diagnostic::new(&field, Some(&annotation), MessageKey::StaticFieldsMayNotBeAnnotated);
//! assert_eq!(diagnostic.key.name(), "STATIC_FIELDS_MAY_NOT_BE_ANNOTATED");
//! ```

use std::fmt;

use bvcheck_model::{AnnotationInstance, ElementRef, ProgramElement, TypeRef};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A single finding produced by a check.
///
/// Two diagnostics are equal iff element, anchor, key and arguments are all
/// equal, so collecting them into a [`DiagnosticSet`] deduplicates repeated
/// findings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Element the finding is reported on
    pub element: ElementRef,
    /// Annotation the finding points at, if any
    pub anchor: Option<AnnotationInstance>,
    /// What was found
    pub key: MessageKey,
    /// Positional message arguments
    pub args: Vec<DiagnosticArg>,
}

/// Positional argument of a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticArg {
    Text(String),
    Type(TypeRef),
}

/// Findings, deduplicated, in the order they were produced.
pub type DiagnosticSet = IndexSet<Diagnostic>;

/// Category of a finding.
///
/// # Invariant
///
/// The discriminant values must match the MESSAGE_KEY_NAMES array indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageKey {
    // Structural
    /// Constraint does not apply to the field or type
    NotSupportedType = 0,
    /// Constraint does not apply to the method return type
    NotSupportedReturnType = 1,
    /// Several validators match the field or type
    MultipleValidatorsForType = 2,
    /// Several validators match the method return type
    MultipleValidatorsForReturnType = 3,
    /// Method is not a bean-style getter
    OnlyGettersMayBeAnnotated = 4,
    /// Method returns nothing to validate
    OnlyNonVoidMethodsMayBeAnnotated = 5,
    StaticFieldsMayNotBeAnnotated = 6,
    StaticMethodsMayNotBeAnnotated = 7,
    /// Cascade on a primitive field
    AtValidNotAllowedAtPrimitiveField = 8,
    /// Cascade on a method returning a primitive
    AtValidNotAllowedAtMethodReturningPrimitiveType = 9,

    // Constraint type declarations
    ConstraintTypeWithWrongRetentionPolicy = 10,
    ConstraintTypeWithWrongTarget = 11,
    /// Neither validators nor composing constraints
    ConstraintTypeWithoutValidator = 12,
    ConstraintTypeMustDeclareMessageMember = 13,
    ConstraintTypeMustDeclareGroupsMember = 14,
    ConstraintTypeMustDeclarePayloadMember = 15,
    ReturnTypeMustBeString = 16,
    ReturnTypeMustBeClassArray = 17,
    DefaultValueMustBeEmptyArray = 18,
    PayloadReturnTypeMustBeClassArray = 19,
    PayloadDefaultValueMustBeEmptyArray = 20,
    /// A non-constraint annotation type carries a constraint
    OnlyConstraintAnnotationsMayBeAnnotated = 21,
    /// Constraint declared both directly and inside its list container
    MixedListAndDirectAnnotationDeclaration = 22,

    // Group sequence providers
    GroupSequenceProviderAnnotationMustBeDefinedOnAClass = 23,
    GroupSequenceProviderAnnotationNotAllowedOnClassWithGroupSequenceAnnotation = 24,
    GroupSequenceProviderAnnotationValueMustBeAnImplementationClass = 25,
    GroupSequenceProviderAnnotationValueClassMustHaveDefaultConstructor = 26,
    GroupSequenceProviderAnnotationValueDefinedProviderClassWithWrongType = 27,

    // Group sequences
    InvalidGroupSequenceValueNotInterfaces = 28,
    InvalidGroupSequenceValueMultipleDeclarationsOfTheSameInterface = 29,
    /// Warning-level: sequence interface extends other interfaces
    InvalidGroupSequenceExtendInterfaces = 30,
    InvalidGroupSequenceValueMissingHostingBeanDeclaration = 31,
    InvalidGroupSequenceValueCyclicDefinition = 32,

    // Cross-parameter constraint types
    /// More than one validator validates the parameter array
    CrossParameterConstraintMultipleValidators = 33,
    /// The parameter-array validator validates neither `Object` nor `Object[]`
    CrossParameterConstraintValidatorHasInvalidType = 34,
    CrossParameterValidationAppliesToRequired = 35,
    CrossParameterValidationAppliesToMustHaveConstraintTargetReturnType = 36,
    CrossParameterValidationAppliesToMustHaveImplicitDefaultValue = 37,
}

/// Catalog names for message keys.
///
/// Index matches MessageKey discriminant.
const MESSAGE_KEY_NAMES: &[&str] = &[
    "NOT_SUPPORTED_TYPE",                                                           // 0
    "NOT_SUPPORTED_RETURN_TYPE",                                                    // 1
    "MULTIPLE_VALIDATORS_FOR_TYPE",                                                 // 2
    "MULTIPLE_VALIDATORS_FOR_RETURN_TYPE",                                          // 3
    "ONLY_GETTERS_MAY_BE_ANNOTATED",                                                // 4
    "ONLY_NON_VOID_METHODS_MAY_BE_ANNOTATED",                                       // 5
    "STATIC_FIELDS_MAY_NOT_BE_ANNOTATED",                                           // 6
    "STATIC_METHODS_MAY_NOT_BE_ANNOTATED",                                          // 7
    "ATVALID_NOT_ALLOWED_AT_PRIMITIVE_FIELD",                                       // 8
    "ATVALID_NOT_ALLOWED_AT_METHOD_RETURNING_PRIMITIVE_TYPE",                       // 9
    "CONSTRAINT_TYPE_WITH_WRONG_RETENTION_POLICY",                                  // 10
    "CONSTRAINT_TYPE_WITH_WRONG_TARGET",                                            // 11
    "CONSTRAINT_TYPE_WITHOUT_VALIDATOR",                                            // 12
    "CONSTRAINT_TYPE_MUST_DECLARE_MESSAGE_MEMBER",                                  // 13
    "CONSTRAINT_TYPE_MUST_DECLARE_GROUPS_MEMBER",                                   // 14
    "CONSTRAINT_TYPE_MUST_DECLARE_PAYLOAD_MEMBER",                                  // 15
    "RETURN_TYPE_MUST_BE_STRING",                                                   // 16
    "RETURN_TYPE_MUST_BE_CLASS_ARRAY",                                              // 17
    "DEFAULT_VALUE_MUST_BE_EMPTY_ARRAY",                                            // 18
    "PAYLOAD_RETURN_TYPE_MUST_BE_CLASS_ARRAY",                                      // 19
    "PAYLOAD_DEFAULT_VALUE_MUST_BE_EMPTY_ARRAY",                                    // 20
    "ONLY_CONSTRAINT_ANNOTATIONS_MAY_BE_ANNOTATED",                                 // 21
    "MIXED_LIST_AND_DIRECT_ANNOTATION_DECLARATION",                                 // 22
    "GROUP_SEQUENCE_PROVIDER_ANNOTATION_MUST_BE_DEFINED_ON_A_CLASS",                // 23
    "GROUP_SEQUENCE_PROVIDER_ANNOTATION_NOT_ALLOWED_ON_CLASS_WITH_GROUP_SEQUENCE_ANNOTATION", // 24
    "GROUP_SEQUENCE_PROVIDER_ANNOTATION_VALUE_MUST_BE_AN_IMPLEMENTATION_CLASS",     // 25
    "GROUP_SEQUENCE_PROVIDER_ANNOTATION_VALUE_CLASS_MUST_HAVE_DEFAULT_CONSTRUCTOR", // 26
    "GROUP_SEQUENCE_PROVIDER_ANNOTATION_VALUE_DEFINED_PROVIDER_CLASS_WITH_WRONG_TYPE", // 27
    "INVALID_GROUP_SEQUENCE_VALUE_NOT_INTERFACES",                                  // 28
    "INVALID_GROUP_SEQUENCE_VALUE_MULTIPLE_DECLARATIONS_OF_THE_SAME_INTERFACE",     // 29
    "INVALID_GROUP_SEQUENCE_EXTEND_INTERFACES",                                     // 30
    "INVALID_GROUP_SEQUENCE_VALUE_MISSING_HOSTING_BEAN_DECLARATION",                // 31
    "INVALID_GROUP_SEQUENCE_VALUE_CYCLIC_DEFINITION",                               // 32
    "CROSS_PARAMETER_CONSTRAINT_MULTIPLE_VALIDATORS",                               // 33
    "CROSS_PARAMETER_CONSTRAINT_VALIDATOR_HAS_INVALID_TYPE",                        // 34
    "CROSS_PARAMETER_VALIDATION_APPLIES_TO_REQUIRED",                               // 35
    "CROSS_PARAMETER_VALIDATION_APPLIES_TO_MUST_HAVE_CONSTRAINT_TARGET_RETURN_TYPE", // 36
    "CROSS_PARAMETER_VALIDATION_APPLIES_TO_MUST_HAVE_IMPLICIT_DEFAULT_VALUE",       // 37
];

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational note
    Note,
    /// Suspicious but accepted declaration
    Warning,
    /// Invalid declaration
    Error,
}

impl Diagnostic {
    /// Creates a finding without arguments.
    ///
    /// # Parameters
    ///
    /// * `element` - Element the finding is reported on
    /// * `anchor` - Annotation the finding points at, if any
    /// * `key` - What was found
    pub fn new(element: &ProgramElement, anchor: Option<&AnnotationInstance>, key: MessageKey) -> Self {
        Self {
            element: element.element_ref(),
            anchor: anchor.cloned(),
            key,
            args: Vec::new(),
        }
    }

    /// Appends a positional message argument.
    ///
    /// # Returns
    ///
    /// Self (for chaining).
    pub fn with_arg(mut self, arg: impl Into<DiagnosticArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Wraps this finding in a one-element set.
    pub fn into_set(self) -> DiagnosticSet {
        IndexSet::from([self])
    }
}

impl MessageKey {
    /// Every key, in discriminant order.
    pub const ALL: [MessageKey; 38] = [
        MessageKey::NotSupportedType,
        MessageKey::NotSupportedReturnType,
        MessageKey::MultipleValidatorsForType,
        MessageKey::MultipleValidatorsForReturnType,
        MessageKey::OnlyGettersMayBeAnnotated,
        MessageKey::OnlyNonVoidMethodsMayBeAnnotated,
        MessageKey::StaticFieldsMayNotBeAnnotated,
        MessageKey::StaticMethodsMayNotBeAnnotated,
        MessageKey::AtValidNotAllowedAtPrimitiveField,
        MessageKey::AtValidNotAllowedAtMethodReturningPrimitiveType,
        MessageKey::ConstraintTypeWithWrongRetentionPolicy,
        MessageKey::ConstraintTypeWithWrongTarget,
        MessageKey::ConstraintTypeWithoutValidator,
        MessageKey::ConstraintTypeMustDeclareMessageMember,
        MessageKey::ConstraintTypeMustDeclareGroupsMember,
        MessageKey::ConstraintTypeMustDeclarePayloadMember,
        MessageKey::ReturnTypeMustBeString,
        MessageKey::ReturnTypeMustBeClassArray,
        MessageKey::DefaultValueMustBeEmptyArray,
        MessageKey::PayloadReturnTypeMustBeClassArray,
        MessageKey::PayloadDefaultValueMustBeEmptyArray,
        MessageKey::OnlyConstraintAnnotationsMayBeAnnotated,
        MessageKey::MixedListAndDirectAnnotationDeclaration,
        MessageKey::GroupSequenceProviderAnnotationMustBeDefinedOnAClass,
        MessageKey::GroupSequenceProviderAnnotationNotAllowedOnClassWithGroupSequenceAnnotation,
        MessageKey::GroupSequenceProviderAnnotationValueMustBeAnImplementationClass,
        MessageKey::GroupSequenceProviderAnnotationValueClassMustHaveDefaultConstructor,
        MessageKey::GroupSequenceProviderAnnotationValueDefinedProviderClassWithWrongType,
        MessageKey::InvalidGroupSequenceValueNotInterfaces,
        MessageKey::InvalidGroupSequenceValueMultipleDeclarationsOfTheSameInterface,
        MessageKey::InvalidGroupSequenceExtendInterfaces,
        MessageKey::InvalidGroupSequenceValueMissingHostingBeanDeclaration,
        MessageKey::InvalidGroupSequenceValueCyclicDefinition,
        MessageKey::CrossParameterConstraintMultipleValidators,
        MessageKey::CrossParameterConstraintValidatorHasInvalidType,
        MessageKey::CrossParameterValidationAppliesToRequired,
        MessageKey::CrossParameterValidationAppliesToMustHaveConstraintTargetReturnType,
        MessageKey::CrossParameterValidationAppliesToMustHaveImplicitDefaultValue,
    ];

    /// Returns the stable catalog name for this key.
    pub fn name(self) -> &'static str {
        MESSAGE_KEY_NAMES[self as usize]
    }

    /// Whether findings with this key are at most warnings.
    pub fn is_warning(self) -> bool {
        matches!(self, MessageKey::InvalidGroupSequenceExtendInterfaces)
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for DiagnosticArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticArg::Text(text) => write!(f, "{}", text),
            DiagnosticArg::Type(ty) => write!(f, "{}", ty),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.element, self.key.name())?;
        if let Some(anchor) = &self.anchor {
            write!(f, " (@{})", anchor.simple_name())?;
        }
        Ok(())
    }
}

impl From<&str> for DiagnosticArg {
    fn from(text: &str) -> Self {
        DiagnosticArg::Text(text.to_string())
    }
}

impl From<String> for DiagnosticArg {
    fn from(text: String) -> Self {
        DiagnosticArg::Text(text)
    }
}

impl From<TypeRef> for DiagnosticArg {
    fn from(ty: TypeRef) -> Self {
        DiagnosticArg::Type(ty)
    }
}
