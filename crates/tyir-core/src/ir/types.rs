use cranelift_entity::entity_impl;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IrType(u32);
entity_impl!(IrType, "ty");

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrTypeData {
    Void,
    Int(u32),
    Float,
    Double,
    Pointer {
        pointee: IrType,
        addr_space: u32,
    },
    Array {
        elem: IrType,
        len: u64,
    },
    Struct(StructType),
    Function {
        ret: IrType,
        params: Vec<IrType>,
        variadic: bool,
    },
}

impl IrTypeData {
    pub fn is_struct(&self) -> bool {
        matches!(self, IrTypeData::Struct(_))
    }

    pub fn is_named_struct(&self) -> bool {
        matches!(self, IrTypeData::Struct(s) if s.name.is_some())
    }
}

/// A literal struct has no name and always has a body; a named struct may
/// still be waiting for one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructType {
    pub name: Option<String>,
    pub body: Option<Vec<IrType>>,
    pub packed: bool,
}

impl StructType {
    pub fn literal(fields: Vec<IrType>, packed: bool) -> Self {
        Self {
            name: None,
            body: Some(fields),
            packed,
        }
    }

    pub fn opaque(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            body: None,
            packed: false,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.body.is_none()
    }
}
