//! Foundation types shared by the model: qualified names and type references.

pub mod name;
pub mod types;

pub use name::QualifiedName;
pub use types::{DeclaredType, PrimitiveKind, TypeRef, WildcardType};
