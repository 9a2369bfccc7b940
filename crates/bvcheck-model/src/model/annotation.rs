//! Annotation instances and their attribute values.

use serde::{Deserialize, Serialize};

use crate::foundation::{QualifiedName, TypeRef};

/// An annotation attached to a program element.
///
/// Attribute values keep declaration order. A list-container annotation is an
/// instance whose `value` attribute is an array of nested instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationInstance {
    /// Qualified name of the annotation type
    pub annotation_type: QualifiedName,
    /// Explicitly given attributes, in source order
    pub values: Vec<(String, AnnotationValue)>,
}

/// Value of one annotation attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Str(String),
    /// Enum constant, e.g. `RetentionPolicy.RUNTIME`
    Enum {
        enum_type: QualifiedName,
        constant: String,
    },
    /// Class literal, e.g. `Foo.class`
    Type(TypeRef),
    /// Nested annotation
    Annotation(AnnotationInstance),
    Array(Vec<AnnotationValue>),
}

/// Category an annotation instance falls into, computed by the
/// classification service before any check runs.
///
/// Together with the annotated element's kind this is the sole dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationClassification {
    /// Use of a constraint, e.g. `@NotNull`
    ConstraintAnnotation,
    /// List container wrapping repeated uses of one constraint
    MultiValuedConstraintAnnotation,
    /// Marks cascaded (graph) validation
    GraphValidationAnnotation,
    /// Marks an annotation type as a constraint type declaration
    ConstraintMetaAnnotation,
    /// Declares an explicit group sequence
    GroupSequenceAnnotation,
    /// Names a dynamic group sequence provider
    GroupSequenceProviderAnnotation,
    /// Anything else
    NoConstraintAnnotation,
}

impl AnnotationClassification {
    /// Every classification, in declaration order.
    pub const ALL: [AnnotationClassification; 7] = [
        AnnotationClassification::ConstraintAnnotation,
        AnnotationClassification::MultiValuedConstraintAnnotation,
        AnnotationClassification::GraphValidationAnnotation,
        AnnotationClassification::ConstraintMetaAnnotation,
        AnnotationClassification::GroupSequenceAnnotation,
        AnnotationClassification::GroupSequenceProviderAnnotation,
        AnnotationClassification::NoConstraintAnnotation,
    ];
}

impl AnnotationInstance {
    /// Create an instance without attributes.
    pub fn new(annotation_type: impl Into<QualifiedName>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            values: Vec::new(),
        }
    }

    /// Add an attribute (builder style).
    pub fn with_value(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.push((name.into(), value));
        self
    }

    /// Look up an explicitly given attribute.
    pub fn value(&self, name: &str) -> Option<&AnnotationValue> {
        self.values
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value)
    }

    /// Simple name of the annotation type (`NotNull` for `javax.validation.constraints.NotNull`).
    pub fn simple_name(&self) -> &str {
        self.annotation_type.simple_name()
    }

    /// Whether this annotation is of the given type.
    pub fn is_of_type(&self, annotation_type: &str) -> bool {
        self.annotation_type == annotation_type
    }
}

impl AnnotationValue {
    /// Enum constant value.
    pub fn enum_constant(enum_type: impl Into<QualifiedName>, constant: impl Into<String>) -> Self {
        AnnotationValue::Enum {
            enum_type: enum_type.into(),
            constant: constant.into(),
        }
    }

    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            AnnotationValue::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&AnnotationInstance> {
        match self {
            AnnotationValue::Annotation(annotation) => Some(annotation),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AnnotationValue]> {
        match self {
            AnnotationValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_enum_constant(&self) -> Option<&str> {
        match self {
            AnnotationValue::Enum { constant, .. } => Some(constant),
            _ => None,
        }
    }

    /// Whether this is an array without elements.
    pub fn is_empty_array(&self) -> bool {
        matches!(self, AnnotationValue::Array(values) if values.is_empty())
    }

    /// The elements of an array value, or the value itself for the
    /// single-element shorthand (`@Target(FIELD)`).
    pub fn elements(&self) -> &[AnnotationValue] {
        match self {
            AnnotationValue::Array(values) => values,
            single => std::slice::from_ref(single),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_lookup() {
        let annotation = AnnotationInstance::new("javax.validation.constraints.Size")
            .with_value("min", AnnotationValue::Int(1))
            .with_value("max", AnnotationValue::Int(10));

        assert_eq!(annotation.value("max"), Some(&AnnotationValue::Int(10)));
        assert_eq!(annotation.value("message"), None);
        assert_eq!(annotation.simple_name(), "Size");
    }

    #[test]
    fn test_single_element_shorthand() {
        let single = AnnotationValue::enum_constant("java.lang.annotation.ElementType", "FIELD");
        assert_eq!(single.elements().len(), 1);
        assert_eq!(single.elements()[0].as_enum_constant(), Some("FIELD"));
        assert!(AnnotationValue::Array(vec![]).is_empty_array());
        assert!(!single.is_empty_array());
    }

    #[test]
    fn test_annotation_roundtrips_through_json() {
        let annotation = AnnotationInstance::new("com.acme.Checked")
            .with_value("value", AnnotationValue::Type(crate::TypeRef::declared("com.acme.Foo")));
        let json = serde_json::to_string(&annotation).unwrap();
        let back: AnnotationInstance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, annotation);
    }
}
