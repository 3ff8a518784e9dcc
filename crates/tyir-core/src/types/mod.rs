/*! Source-language type model handed to lowering by the type checker.
 *
 * Lowering compares types by identity, so every type lives in a `TypeRegistry` that interns it:
 * structurally equal types share one `SourceTypeId`, while each named type declaration gets its own.
 */

pub mod registry;

pub use registry::TypeRegistry;

use cranelift_entity::entity_impl;
use serde::{Deserialize, Serialize};
use tyir_runtime::abi;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceTypeId(u32);
entity_impl!(SourceTypeId, "t");

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedId(u32);
entity_impl!(NamedId, "named");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
}

impl BasicKind {
    pub fn name(self) -> &'static str {
        self.abi_kind().name()
    }

    pub fn abi_kind(self) -> abi::Kind {
        match self {
            BasicKind::Bool => abi::Kind::Bool,
            BasicKind::Int => abi::Kind::Int,
            BasicKind::Int8 => abi::Kind::Int8,
            BasicKind::Int16 => abi::Kind::Int16,
            BasicKind::Int32 => abi::Kind::Int32,
            BasicKind::Int64 => abi::Kind::Int64,
            BasicKind::Uint => abi::Kind::Uint,
            BasicKind::Uint8 => abi::Kind::Uint8,
            BasicKind::Uint16 => abi::Kind::Uint16,
            BasicKind::Uint32 => abi::Kind::Uint32,
            BasicKind::Uint64 => abi::Kind::Uint64,
            BasicKind::Uintptr => abi::Kind::Uintptr,
            BasicKind::Float32 => abi::Kind::Float32,
            BasicKind::Float64 => abi::Kind::Float64,
            BasicKind::Complex64 => abi::Kind::Complex64,
            BasicKind::Complex128 => abi::Kind::Complex128,
            BasicKind::String => abi::Kind::String,
            BasicKind::UnsafePointer => abi::Kind::UnsafePointer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: SourceTypeId,
    pub embedded: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: SourceTypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            embedded: false,
        }
    }

    pub fn embedded(name: impl Into<String>, ty: SourceTypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            embedded: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method {
    pub name: String,
    pub sig: SourceTypeId,
}

impl Method {
    pub fn new(name: impl Into<String>, sig: SourceTypeId) -> Self {
        Self {
            name: name.into(),
            sig,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<SourceTypeId>,
    pub results: Vec<SourceTypeId>,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceType {
    Basic(BasicKind),
    Pointer(SourceTypeId),
    Array { elem: SourceTypeId, len: u64 },
    Slice(SourceTypeId),
    Map { key: SourceTypeId, value: SourceTypeId },
    Chan { elem: SourceTypeId, dir: ChanDir },
    Struct(Vec<Field>),
    Named(NamedId),
    Signature(Signature),
    Interface(Vec<Method>),
}

/// A named type declaration. The underlying type is filled in after
/// declaration so that it can refer back to the named type.
#[derive(Debug, Clone)]
pub struct NamedType {
    pub pkg: Option<String>,
    pub name: String,
    pub underlying: Option<SourceTypeId>,
}

impl NamedType {
    pub fn qualified_name(&self) -> String {
        match &self.pkg {
            Some(pkg) => format!("{}.{}", pkg, self.name),
            None => self.name.clone(),
        }
    }
}
