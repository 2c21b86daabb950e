//! AST node types for parsed eureka schema.

/// Backing type of an enum declared without `: <type>`.
pub const DEFAULT_ENUM_TYPE: &str = "i32";

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Declaration {
    Struct(Struct),
    Interface(Interface),
    Enum(Enum),
    Array(Array),
}

impl Declaration {
    /// Declared name; arrays are anonymous.
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Struct(s) => Some(&s.name),
            Declaration::Interface(i) => Some(&i.name),
            Declaration::Enum(e) => Some(&e.name),
            Declaration::Array(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Declaration::Struct(_) => "struct",
            Declaration::Interface(_) => "interface",
            Declaration::Enum(_) => "enum",
            Declaration::Array(_) => "array",
        }
    }
}

/// The type of a field: a scalar by name, or an inline aggregate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeRef {
    /// Built-in scalar type name, e.g. `i32`.
    Named(String),
    Struct(Struct),
    Interface(Interface),
    Array(Array),
}

/// `name: type`, used for struct fields and function parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Struct {
    pub name: String,
    pub fields: Vec<Field>,
}

/// A method signature inside an interface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Func {
    pub name: String,
    pub params: Vec<Field>,
    /// Return type names (identifiers or scalar types); may be empty.
    pub returns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interface {
    pub name: String,
    pub methods: Vec<Func>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enum {
    pub name: String,
    /// Scalar type backing the members; [`DEFAULT_ENUM_TYPE`] when omitted.
    pub backing_type: String,
    pub members: Vec<String>,
}

/// A fixed-length typed array with an optional initializer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Array {
    pub length: usize,
    pub element_type: String,
    /// Initializer values as written in the source (string literals keep
    /// their quotes). Never longer than `length`.
    pub values: Vec<String>,
}
