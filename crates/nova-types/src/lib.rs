//! Java type model shared by Nova's semantic analyses.
//!
//! The crate owns the declaration table ([`TypeStore`]), the [`Type`] sum type, generic
//! substitution ([`Substitutor`]) and the best-effort subtyping/assignability relation that
//! higher-level checkers (e.g. `nova-lambda`) build on. Everything here is a pure query over
//! immutable data once the store has been populated.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod java;
mod store;
mod subst;

pub use java::format::{format_type, TypeDisplay};
pub use java::helpers::{erasure, instantiate_as_supertype, mentions_type_var, supertype_closure};
pub use java::subtyping::{is_assignable, is_subtype, types_equal};
pub use store::{TypeStore, WellKnownTypes};
pub use subst::Substitutor;

/// A byte-span into a source string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            span,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            span,
        }
    }
}

/// Index of a class declaration inside a [`TypeStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a type parameter declaration inside a [`TypeStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(u32);

impl TypeVarId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// Binary name of the wrapper class used by boxing conversion (JLS 5.1.7).
    pub fn box_class_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    pub fn from_box_class_name(name: &str) -> Option<PrimitiveType> {
        Self::ALL.into_iter().find(|p| p.box_class_name() == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassType {
    pub def: ClassId,
    /// Type arguments. Empty for non-generic classes and for raw uses of generic classes.
    pub args: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<Type>),
    Super(Box<Type>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    /// The type of the `null` literal.
    Null,
    /// A type that could not be computed. Checks treat it permissively so a missing type never
    /// produces a cascade of follow-up diagnostics.
    Unknown,
    Primitive(PrimitiveType),
    Array(Box<Type>),
    Class(ClassType),
    TypeVar(TypeVarId),
    Wildcard(WildcardBound),
    /// `A & B & ...`; always at least two pairwise distinct members (see [`Type::intersection`]).
    Intersection(Vec<Type>),
}

impl Type {
    pub fn class(def: ClassId, args: Vec<Type>) -> Type {
        Type::Class(ClassType { def, args })
    }

    pub fn array(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    pub fn int() -> Type {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn boolean() -> Type {
        Type::Primitive(PrimitiveType::Boolean)
    }

    pub fn wildcard_extends(bound: Type) -> Type {
        Type::Wildcard(WildcardBound::Extends(Box::new(bound)))
    }

    pub fn wildcard_super(bound: Type) -> Type {
        Type::Wildcard(WildcardBound::Super(Box::new(bound)))
    }

    /// Build an intersection type, flattening nested intersections and dropping duplicates.
    ///
    /// A single remaining member is returned as-is, so the result is only an
    /// [`Type::Intersection`] when it has at least two distinct members.
    pub fn intersection(members: Vec<Type>) -> Type {
        let mut out: Vec<Type> = Vec::with_capacity(members.len());
        for member in members {
            match member {
                Type::Intersection(nested) => {
                    for ty in nested {
                        if !out.contains(&ty) {
                            out.push(ty);
                        }
                    }
                }
                other => {
                    if !out.contains(&other) {
                        out.push(other);
                    }
                }
            }
        }

        match out.len() {
            0 => Type::Unknown,
            1 => out.pop().unwrap_or(Type::Unknown),
            _ => Type::Intersection(out),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_reference(&self) -> bool {
        match self {
            Type::Null
            | Type::Array(_)
            | Type::Class(_)
            | Type::TypeVar(_)
            | Type::Wildcard(_)
            | Type::Intersection(_) => true,
            Type::Void | Type::Unknown | Type::Primitive(_) => false,
        }
    }

    pub fn is_unbounded_wildcard(&self) -> bool {
        matches!(self, Type::Wildcard(WildcardBound::Unbounded))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// No body; must be implemented by a subtype.
    Abstract,
    /// Interface method with a body.
    Default,
    Static,
    /// Class (or private interface) method with a body.
    Concrete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub kind: MethodKind,
}

impl MethodDef {
    pub fn is_abstract(&self) -> bool {
        self.kind == MethodKind::Abstract
    }

    pub fn is_static(&self) -> bool {
        self.kind == MethodKind::Static
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
    /// Declared upper bounds only: `<T>` has none, `<T extends Number>` has `[Number]`.
    pub upper_bounds: Vec<Type>,
    pub lower_bound: Option<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.function.Function`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// Direct supertypes in declaration order (superclass first).
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &Type> {
        self.super_class.iter().chain(self.interfaces.iter())
    }
}

/// Read-only view over the declaration table.
///
/// Implementations must be pure: the same query always yields the same answer for the lifetime
/// of the environment. Checkers hold a `&dyn TypeEnv` and are shared across worker threads, so
/// implementations must also be `Send + Sync`.
pub trait TypeEnv: Send + Sync {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;
}
