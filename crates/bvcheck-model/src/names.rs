//! Qualified names of the platform and validation types the checks reference.

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";
pub const CHAR_SEQUENCE: &str = "java.lang.CharSequence";
pub const CLASS: &str = "java.lang.Class";
pub const NUMBER: &str = "java.lang.Number";

pub const RETENTION: &str = "java.lang.annotation.Retention";
pub const RETENTION_POLICY: &str = "java.lang.annotation.RetentionPolicy";
pub const TARGET: &str = "java.lang.annotation.Target";
pub const ELEMENT_TYPE: &str = "java.lang.annotation.ElementType";

/// `RetentionPolicy` constant constraint types must be retained with.
pub const RUNTIME_RETENTION: &str = "RUNTIME";

/// `ElementType` constants a constraint type may target.
pub const ALLOWED_TARGETS: [&str; 4] = ["FIELD", "METHOD", "TYPE", "ANNOTATION_TYPE"];

pub const CONSTRAINT: &str = "javax.validation.Constraint";
pub const GROUP_SEQUENCE: &str = "javax.validation.GroupSequence";
pub const PAYLOAD: &str = "javax.validation.Payload";
pub const VALID: &str = "javax.validation.Valid";
pub const CONSTRAINT_VALIDATOR: &str = "javax.validation.ConstraintValidator";
pub const DEFAULT_GROUP: &str = "javax.validation.groups.Default";
pub const CONSTRAINT_TARGET: &str = "javax.validation.ConstraintTarget";
pub const SUPPORTED_VALIDATION_TARGET: &str =
    "javax.validation.constraintvalidation.SupportedValidationTarget";
pub const VALIDATION_TARGET: &str = "javax.validation.constraintvalidation.ValidationTarget";

/// `ConstraintTarget` constant `validationAppliesTo()` must default to.
pub const IMPLICIT_CONSTRAINT_TARGET: &str = "IMPLICIT";

pub const GROUP_SEQUENCE_PROVIDER: &str = "org.hibernate.validator.group.GroupSequenceProvider";
pub const DEFAULT_GROUP_SEQUENCE_PROVIDER: &str =
    "org.hibernate.validator.spi.group.DefaultGroupSequenceProvider";

pub const COLLECTION: &str = "java.util.Collection";
pub const LIST: &str = "java.util.List";
pub const MAP: &str = "java.util.Map";

/// Built-in constraint types whose supported types are registered up front.
pub mod builtin {
    pub const NOT_NULL: &str = "javax.validation.constraints.NotNull";
    pub const SIZE: &str = "javax.validation.constraints.Size";
}

/// Annotation member names.
pub mod members {
    pub const VALUE: &str = "value";
    pub const MESSAGE: &str = "message";
    pub const GROUPS: &str = "groups";
    pub const PAYLOAD: &str = "payload";
    pub const VALIDATED_BY: &str = "validatedBy";
    pub const VALIDATION_APPLIES_TO: &str = "validationAppliesTo";
}
