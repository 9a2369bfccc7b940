//! Program elements
//!
//! A [`ProgramElement`] is anything that can carry annotations: fields,
//! methods, constructors, parameters and type declarations. Type declarations
//! own their members through `enclosed`; annotation type members are modeled
//! as methods whose `ty` is the member's return type and whose
//! `default_value` holds the declared default.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::annotation::{AnnotationInstance, AnnotationValue};
use crate::foundation::{QualifiedName, TypeRef};

/// Kind of a program element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    Field,
    Method,
    Constructor,
    Parameter,
    AnnotationType,
    Class,
    Interface,
    Enum,
}

/// The four element shapes checks distinguish.
///
/// Every check has one entry point per target; kinds without a target
/// (constructors, parameters) are never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckTarget {
    Field,
    Method,
    AnnotationType,
    /// Class, interface or enum declaration
    NonAnnotationType,
}

/// Declaration modifiers relevant to checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
}

impl ElementKind {
    /// Every element kind, in declaration order.
    pub const ALL: [ElementKind; 8] = [
        ElementKind::Field,
        ElementKind::Method,
        ElementKind::Constructor,
        ElementKind::Parameter,
        ElementKind::AnnotationType,
        ElementKind::Class,
        ElementKind::Interface,
        ElementKind::Enum,
    ];

    /// Map this kind onto the check entry point it is routed to.
    pub fn check_target(self) -> Option<CheckTarget> {
        match self {
            ElementKind::Field => Some(CheckTarget::Field),
            ElementKind::Method => Some(CheckTarget::Method),
            ElementKind::AnnotationType => Some(CheckTarget::AnnotationType),
            ElementKind::Class | ElementKind::Interface | ElementKind::Enum => {
                Some(CheckTarget::NonAnnotationType)
            }
            ElementKind::Constructor | ElementKind::Parameter => None,
        }
    }

    pub fn is_interface(self) -> bool {
        matches!(self, ElementKind::Interface | ElementKind::AnnotationType)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Field => "field",
            ElementKind::Method => "method",
            ElementKind::Constructor => "constructor",
            ElementKind::Parameter => "parameter",
            ElementKind::AnnotationType => "annotation type",
            ElementKind::Class => "class",
            ElementKind::Interface => "interface",
            ElementKind::Enum => "enum",
        };
        write!(f, "{}", name)
    }
}

/// A declared element of the analyzed program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramElement {
    pub kind: ElementKind,

    /// Qualified path; members append their simple name to the owner's path
    pub path: QualifiedName,

    /// Field type, method return type, or the declared type itself for type
    /// declarations (generic over its own type parameters)
    pub ty: TypeRef,

    pub modifiers: BTreeSet<Modifier>,

    /// Parameter types of methods and constructors
    pub parameters: Vec<TypeRef>,

    /// Members of a type declaration
    pub enclosed: Vec<ProgramElement>,

    /// Annotations attached directly to this element
    pub annotations: Vec<AnnotationInstance>,

    /// Default value of an annotation type member
    pub default_value: Option<AnnotationValue>,

    /// Declared superclass of a class
    pub superclass: Option<TypeRef>,

    /// Implemented (classes) or extended (interfaces) interfaces
    pub interfaces: Vec<TypeRef>,

    /// Type parameter names of a generic type declaration
    pub type_params: Vec<String>,
}

/// Lightweight identity of a program element, used by diagnostics.
///
/// Overloaded methods share a path, so executables also carry their
/// parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub path: QualifiedName,
    pub parameters: Vec<TypeRef>,
}

impl ElementRef {
    fn is_executable(&self) -> bool {
        matches!(self.kind, ElementKind::Method | ElementKind::Constructor)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if self.is_executable() {
            let parameters: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
            write!(f, "({})", parameters.join(", "))?;
        }
        Ok(())
    }
}

impl ProgramElement {
    /// Create a bare element.
    pub fn new(kind: ElementKind, path: impl Into<QualifiedName>, ty: TypeRef) -> Self {
        Self {
            kind,
            path: path.into(),
            ty,
            modifiers: BTreeSet::new(),
            parameters: Vec::new(),
            enclosed: Vec::new(),
            annotations: Vec::new(),
            default_value: None,
            superclass: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
        }
    }

    pub fn field(path: impl Into<QualifiedName>, ty: TypeRef) -> Self {
        Self::new(ElementKind::Field, path, ty)
    }

    pub fn method(path: impl Into<QualifiedName>, return_type: TypeRef) -> Self {
        Self::new(ElementKind::Method, path, return_type)
    }

    pub fn constructor(path: impl Into<QualifiedName>) -> Self {
        Self::new(ElementKind::Constructor, path, TypeRef::Void)
    }

    pub fn class(path: impl Into<QualifiedName>) -> Self {
        Self::type_declaration(ElementKind::Class, path)
    }

    pub fn interface(path: impl Into<QualifiedName>) -> Self {
        Self::type_declaration(ElementKind::Interface, path)
    }

    pub fn annotation_type(path: impl Into<QualifiedName>) -> Self {
        Self::type_declaration(ElementKind::AnnotationType, path)
    }

    pub fn enum_type(path: impl Into<QualifiedName>) -> Self {
        Self::type_declaration(ElementKind::Enum, path)
    }

    fn type_declaration(kind: ElementKind, path: impl Into<QualifiedName>) -> Self {
        let path = path.into();
        let ty = TypeRef::declared(path.clone());
        Self::new(kind, path, ty)
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn with_parameter(mut self, ty: TypeRef) -> Self {
        self.parameters.push(ty);
        self
    }

    pub fn with_member(mut self, member: ProgramElement) -> Self {
        self.enclosed.push(member);
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_default(mut self, value: AnnotationValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_superclass(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn with_interface(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Declare type parameters; the declared type becomes generic over them.
    pub fn with_type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self.ty = TypeRef::generic(
            self.path.clone(),
            self.type_params.iter().map(TypeRef::type_var).collect(),
        );
        self
    }

    pub fn simple_name(&self) -> &str {
        self.path.simple_name()
    }

    /// Identity used in diagnostics.
    pub fn element_ref(&self) -> ElementRef {
        ElementRef {
            kind: self.kind,
            path: self.path.clone(),
            parameters: self.parameters.clone(),
        }
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Find an enclosed method by simple name.
    ///
    /// Annotation type members are methods, so this is also the lookup for
    /// `message()`, `groups()` and friends.
    pub fn member(&self, name: &str) -> Option<&ProgramElement> {
        self.methods().find(|member| member.simple_name() == name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &ProgramElement> {
        self.enclosed
            .iter()
            .filter(|member| member.kind == ElementKind::Method)
    }

    pub fn constructors(&self) -> impl Iterator<Item = &ProgramElement> {
        self.enclosed
            .iter()
            .filter(|member| member.kind == ElementKind::Constructor)
    }

    /// Find a directly attached annotation by qualified type name.
    pub fn annotation(&self, annotation_type: &str) -> Option<&AnnotationInstance> {
        self.annotations
            .iter()
            .find(|annotation| annotation.is_of_type(annotation_type))
    }

    /// Direct supertypes as declared (superclass first, then interfaces).
    pub fn declared_supertypes(&self) -> impl Iterator<Item = &TypeRef> {
        self.superclass.iter().chain(self.interfaces.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_order() -> ProgramElement {
        ProgramElement::class("com.acme.Order")
            .with_member(ProgramElement::field(
                "com.acme.Order.total",
                TypeRef::declared("java.math.BigDecimal"),
            ))
            .with_member(ProgramElement::constructor("com.acme.Order.<init>").with_modifier(Modifier::Public))
            .with_member(ProgramElement::method(
                "com.acme.Order.getTotal",
                TypeRef::declared("java.math.BigDecimal"),
            ))
    }

    #[test]
    fn test_check_targets() {
        assert_eq!(ElementKind::Field.check_target(), Some(CheckTarget::Field));
        assert_eq!(ElementKind::Enum.check_target(), Some(CheckTarget::NonAnnotationType));
        assert_eq!(
            ElementKind::AnnotationType.check_target(),
            Some(CheckTarget::AnnotationType)
        );
        assert_eq!(ElementKind::Parameter.check_target(), None);
        assert_eq!(ElementKind::Constructor.check_target(), None);
    }

    #[test]
    fn test_member_lookup() {
        let order = make_order();
        assert_eq!(order.member("getTotal").map(|m| m.kind), Some(ElementKind::Method));
        assert_eq!(order.methods().count(), 1);
        assert_eq!(order.constructors().count(), 1);
        // Fields are not members in this sense
        assert!(order.member("total").is_none());
        assert!(order.member("missing").is_none());
    }

    #[test]
    fn test_overloads_have_distinct_refs() {
        let by_name = ProgramElement::method("com.acme.Order.apply", TypeRef::Void)
            .with_parameter(TypeRef::declared("java.lang.String"));
        let by_id = ProgramElement::method("com.acme.Order.apply", TypeRef::Void)
            .with_parameter(TypeRef::declared("java.lang.Integer"));

        assert_ne!(by_name.element_ref(), by_id.element_ref());
        assert_eq!(by_name.element_ref().to_string(), "com.acme.Order.apply(java.lang.String)");
        assert_eq!(
            ProgramElement::field("com.acme.Order.total", TypeRef::declared("java.lang.Integer"))
                .element_ref()
                .to_string(),
            "com.acme.Order.total"
        );
    }

    #[test]
    fn test_type_params_make_declared_type_generic() {
        let base = ProgramElement::class("com.acme.Base").with_type_params(["T"]);
        assert_eq!(base.ty.to_string(), "com.acme.Base<T>");
        assert_eq!(base.element_ref().path, QualifiedName::from("com.acme.Base"));
    }
}
