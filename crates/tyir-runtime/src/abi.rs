use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::mem;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Invalid,
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
    Array,
    Chan,
    Func,
    Interface,
    Map,
    Pointer,
    Slice,
    String,
    Struct,
    UnsafePointer,
}

impl Kind {
    pub const BASIC: [Kind; 18] = [
        Kind::Bool,
        Kind::Int,
        Kind::Int8,
        Kind::Int16,
        Kind::Int32,
        Kind::Int64,
        Kind::Uint,
        Kind::Uint8,
        Kind::Uint16,
        Kind::Uint32,
        Kind::Uint64,
        Kind::Uintptr,
        Kind::Float32,
        Kind::Float64,
        Kind::Complex64,
        Kind::Complex128,
        Kind::String,
        Kind::UnsafePointer,
    ];

    // Position of `Kind::String` in `BASIC`.
    const STRING_SLOT: usize = 16;

    pub fn is_basic(self) -> bool {
        Self::BASIC.contains(&self)
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Uintptr => "uintptr",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::Complex64 => "complex64",
            Kind::Complex128 => "complex128",
            Kind::Array => "array",
            Kind::Chan => "chan",
            Kind::Func => "func",
            Kind::Interface => "interface",
            Kind::Map => "map",
            Kind::Pointer => "ptr",
            Kind::Slice => "slice",
            Kind::String => "string",
            Kind::Struct => "struct",
            Kind::UnsafePointer => "unsafe.Pointer",
        }
    }

    /// Host size and alignment of a basic kind, `None` for composite kinds.
    fn host_layout(self) -> Option<(usize, usize)> {
        let word = mem::size_of::<usize>();
        let layout = match self {
            Kind::Bool | Kind::Int8 | Kind::Uint8 => (1, 1),
            Kind::Int16 | Kind::Uint16 => (2, 2),
            Kind::Int32 | Kind::Uint32 | Kind::Float32 => (4, 4),
            Kind::Int64 | Kind::Uint64 | Kind::Float64 => (8, mem::align_of::<u64>()),
            Kind::Int | Kind::Uint | Kind::Uintptr | Kind::UnsafePointer => (word, word),
            Kind::Complex64 => (8, 4),
            Kind::Complex128 => (16, mem::align_of::<f64>()),
            Kind::String => (2 * word, word),
            _ => return None,
        };
        Some(layout)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime type descriptor.
///
/// Descriptors are compared by identity of the shared `Arc` (see [`Type::same`]),
/// never by content.
#[derive(Debug, Serialize)]
pub struct Type {
    pub size: usize,
    pub align: u8,
    pub kind: Kind,
    pub hash: u32,
    pub name: String,
}

impl Type {
    pub fn new(name: impl Into<String>, kind: Kind, size: usize, align: u8) -> Self {
        let name = name.into();
        Self {
            size,
            align,
            kind,
            hash: type_hash(&name),
            name,
        }
    }

    pub fn same(a: &Arc<Type>, b: &Arc<Type>) -> bool {
        Arc::ptr_eq(a, b)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// First four bytes of the SHA-256 of a type's name, big endian.
pub fn type_hash(name: &str) -> u32 {
    let digest = Sha256::digest(name.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

static BASIC_TYPES: Lazy<Vec<Arc<Type>>> = Lazy::new(|| {
    Kind::BASIC
        .iter()
        .map(|&kind| {
            let (size, align) = kind.host_layout().unwrap_or((0, 1));
            Arc::new(Type::new(kind.name(), kind, size, align as u8))
        })
        .collect()
});

/// Singleton descriptor for a basic kind.
pub fn basic(kind: Kind) -> Option<Arc<Type>> {
    let slot = Kind::BASIC.iter().position(|&k| k == kind)?;
    Some(BASIC_TYPES[slot].clone())
}

pub fn string_type() -> Arc<Type> {
    BASIC_TYPES[Kind::STRING_SLOT].clone()
}

#[derive(Debug, Clone)]
pub struct Imethod {
    pub name: String,
    pub ty: Arc<Type>,
}

#[derive(Debug, Default)]
pub struct InterfaceType {
    pub pkg_path: String,
    pub methods: Vec<Imethod>,
}

impl InterfaceType {
    pub fn new(pkg_path: impl Into<String>, mut methods: Vec<Imethod>) -> Self {
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            pkg_path: pkg_path.into(),
            methods,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.methods.is_empty() {
            return f.write_str("interface {}");
        }
        let methods = self
            .methods
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "interface {{ {} }}", methods)
    }
}

static TY_ANY: Lazy<Arc<InterfaceType>> = Lazy::new(|| Arc::new(InterfaceType::default()));

/// The shared empty interface every untyped boxing goes through.
pub fn ty_any() -> Arc<InterfaceType> {
    TY_ANY.clone()
}
