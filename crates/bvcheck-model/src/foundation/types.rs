//! Type references used by the program model
//!
//! The model distinguishes:
//! - **Primitive types** - `int`, `boolean`, ... (never null, never cascaded)
//! - **Void** - the return type of methods without a value
//! - **Declared types** - classes, interfaces, enums and annotation types,
//!   optionally with generic arguments (`java.lang.Class<?>`)
//! - **Arrays** - `T[]`
//! - **Wildcards** - `?`, `? extends T`, `? super T` (only as generic arguments)
//! - **Type variables** - `T` inside a generic declaration
//!
//! # Examples
//!
//! ```
//! # use bvcheck_model::TypeRef;
//! // Class<?>[]
//! let groups = TypeRef::array_of(TypeRef::generic(
//!     "java.lang.Class",
//!     vec![TypeRef::unbounded_wildcard()],
//! ));
//! assert_eq!(groups.to_string(), "java.lang.Class<?>[]");
//! assert_eq!(groups.erasure().to_string(), "java.lang.Class[]");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::QualifiedName;

/// A reference to a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// Primitive type
    Primitive(PrimitiveKind),

    /// Absence of a value (method return type only)
    Void,

    /// Class, interface, enum or annotation type, with generic arguments
    Declared(DeclaredType),

    /// Array with the given component type
    Array(Box<TypeRef>),

    /// Wildcard generic argument
    Wildcard(WildcardType),

    /// Type variable declared by an enclosing generic declaration
    TypeVar(String),
}

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

/// A declared type reference, e.g. `java.util.List<java.lang.String>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclaredType {
    /// Qualified name of the referenced declaration
    pub name: QualifiedName,
    /// Generic arguments (empty for non-generic or raw references)
    pub args: Vec<TypeRef>,
}

/// A wildcard generic argument.
///
/// `None` bounds mean "no bound present": `?` has neither bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WildcardType {
    /// Upper bound (`? extends T`)
    pub extends_bound: Option<Box<TypeRef>>,
    /// Lower bound (`? super T`)
    pub super_bound: Option<Box<TypeRef>>,
}

impl PrimitiveKind {
    /// Qualified name of the wrapper class this primitive boxes to.
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Char => "java.lang.Character",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Double => "java.lang.Double",
        }
    }

    /// Source keyword for this primitive.
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }
}

impl TypeRef {
    /// Non-generic (or raw) reference to a declared type.
    pub fn declared(name: impl Into<QualifiedName>) -> Self {
        Self::generic(name, Vec::new())
    }

    /// Reference to a declared type with generic arguments.
    pub fn generic(name: impl Into<QualifiedName>, args: Vec<TypeRef>) -> Self {
        TypeRef::Declared(DeclaredType {
            name: name.into(),
            args,
        })
    }

    /// Array of `component`.
    pub fn array_of(component: TypeRef) -> Self {
        TypeRef::Array(Box::new(component))
    }

    /// The `?` wildcard.
    pub fn unbounded_wildcard() -> Self {
        TypeRef::Wildcard(WildcardType {
            extends_bound: None,
            super_bound: None,
        })
    }

    /// The `? extends bound` wildcard.
    pub fn wildcard_extends(bound: TypeRef) -> Self {
        TypeRef::Wildcard(WildcardType {
            extends_bound: Some(Box::new(bound)),
            super_bound: None,
        })
    }

    /// The `? super bound` wildcard.
    pub fn wildcard_super(bound: TypeRef) -> Self {
        TypeRef::Wildcard(WildcardType {
            extends_bound: None,
            super_bound: Some(Box::new(bound)),
        })
    }

    /// Type variable reference.
    pub fn type_var(name: impl Into<String>) -> Self {
        TypeRef::TypeVar(name.into())
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    pub fn as_declared(&self) -> Option<&DeclaredType> {
        match self {
            TypeRef::Declared(declared) => Some(declared),
            _ => None,
        }
    }

    pub fn as_wildcard(&self) -> Option<&WildcardType> {
        match self {
            TypeRef::Wildcard(wildcard) => Some(wildcard),
            _ => None,
        }
    }

    /// Component type if this is an array.
    pub fn component_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Qualified name of a declared type reference.
    pub fn qualified_name(&self) -> Option<&QualifiedName> {
        self.as_declared().map(|declared| &declared.name)
    }

    /// The type with every generic argument discarded.
    ///
    /// Arrays erase their component; wildcards erase to their upper bound
    /// (or `java.lang.Object` when unbounded), as do type variables.
    pub fn erasure(&self) -> TypeRef {
        match self {
            TypeRef::Declared(declared) => TypeRef::declared(declared.name.clone()),
            TypeRef::Array(component) => TypeRef::array_of(component.erasure()),
            TypeRef::Wildcard(wildcard) => match &wildcard.extends_bound {
                Some(bound) => bound.erasure(),
                None => TypeRef::declared(crate::names::OBJECT),
            },
            TypeRef::TypeVar(_) => TypeRef::declared(crate::names::OBJECT),
            TypeRef::Primitive(_) | TypeRef::Void => self.clone(),
        }
    }

    /// Replace type variables bound in `bindings`, leaving others in place.
    pub fn substitute(&self, bindings: &HashMap<&str, &TypeRef>) -> TypeRef {
        match self {
            TypeRef::TypeVar(name) => bindings
                .get(name.as_str())
                .map(|bound| (*bound).clone())
                .unwrap_or_else(|| self.clone()),
            TypeRef::Declared(declared) => TypeRef::generic(
                declared.name.clone(),
                declared
                    .args
                    .iter()
                    .map(|arg| arg.substitute(bindings))
                    .collect(),
            ),
            TypeRef::Array(component) => TypeRef::array_of(component.substitute(bindings)),
            TypeRef::Wildcard(wildcard) => TypeRef::Wildcard(WildcardType {
                extends_bound: wildcard
                    .extends_bound
                    .as_ref()
                    .map(|bound| Box::new(bound.substitute(bindings))),
                super_bound: wildcard
                    .super_bound
                    .as_ref()
                    .map(|bound| Box::new(bound.substitute(bindings))),
            }),
            TypeRef::Primitive(_) | TypeRef::Void => self.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => write!(f, "{}", kind.keyword()),
            TypeRef::Void => write!(f, "void"),
            TypeRef::Declared(declared) => {
                write!(f, "{}", declared.name)?;
                if !declared.args.is_empty() {
                    let args: Vec<String> = declared.args.iter().map(ToString::to_string).collect();
                    write!(f, "<{}>", args.join(", "))?;
                }
                Ok(())
            }
            TypeRef::Array(component) => write!(f, "{}[]", component),
            TypeRef::Wildcard(wildcard) => {
                write!(f, "?")?;
                if let Some(bound) = &wildcard.extends_bound {
                    write!(f, " extends {}", bound)?;
                }
                if let Some(bound) = &wildcard.super_bound {
                    write!(f, " super {}", bound)?;
                }
                Ok(())
            }
            TypeRef::TypeVar(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erasure_drops_arguments() {
        let provider = TypeRef::generic(
            "org.hibernate.validator.spi.group.DefaultGroupSequenceProvider",
            vec![TypeRef::declared("com.acme.Foo")],
        );
        assert_eq!(
            provider.erasure(),
            TypeRef::declared("org.hibernate.validator.spi.group.DefaultGroupSequenceProvider")
        );
    }

    #[test]
    fn test_substitute_type_variables() {
        let foo = TypeRef::declared("com.acme.Foo");
        let bindings: HashMap<&str, &TypeRef> = [("T", &foo)].into_iter().collect();
        let list = TypeRef::generic("java.util.List", vec![TypeRef::type_var("T")]);

        assert_eq!(
            list.substitute(&bindings),
            TypeRef::generic("java.util.List", vec![foo.clone()])
        );
        assert_eq!(TypeRef::type_var("U").substitute(&bindings), TypeRef::type_var("U"));
    }

    #[test]
    fn test_display_wildcards() {
        let payload = TypeRef::generic(
            "java.lang.Class",
            vec![TypeRef::wildcard_extends(TypeRef::declared("javax.validation.Payload"))],
        );
        assert_eq!(
            payload.to_string(),
            "java.lang.Class<? extends javax.validation.Payload>"
        );
        assert_eq!(TypeRef::Primitive(PrimitiveKind::Int).to_string(), "int");
    }
}
