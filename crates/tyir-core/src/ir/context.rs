use cranelift_entity::PrimaryMap;
use indexmap::IndexMap;
use std::collections::HashMap;

use crate::{
    ir::{
        target::TargetData,
        types::{IrType, IrTypeData, StructType},
    },
    LowerError, Result,
};

#[derive(Debug)]
pub struct IrContext {
    types: PrimaryMap<IrType, IrTypeData>,
    uniqued: HashMap<IrTypeData, IrType>,
    named: IndexMap<String, IrType>,
    target: TargetData,
}

impl IrContext {
    pub fn new(target: TargetData) -> Self {
        Self {
            types: PrimaryMap::new(),
            uniqued: HashMap::new(),
            named: IndexMap::new(),
            target,
        }
    }

    pub fn target(&self) -> &TargetData {
        &self.target
    }

    fn intern(&mut self, data: IrTypeData) -> IrType {
        if let Some(&ty) = self.uniqued.get(&data) {
            return ty;
        }
        let ty = self.types.push(data.clone());
        self.uniqued.insert(data, ty);
        ty
    }

    pub fn void_type(&mut self) -> IrType {
        self.intern(IrTypeData::Void)
    }

    pub fn int_type(&mut self, bits: u32) -> IrType {
        self.intern(IrTypeData::Int(bits))
    }

    pub fn float_type(&mut self) -> IrType {
        self.intern(IrTypeData::Float)
    }

    pub fn double_type(&mut self) -> IrType {
        self.intern(IrTypeData::Double)
    }

    pub fn pointer_type(&mut self, pointee: IrType, addr_space: u32) -> IrType {
        self.intern(IrTypeData::Pointer {
            pointee,
            addr_space,
        })
    }

    pub fn array_type(&mut self, elem: IrType, len: u64) -> IrType {
        self.intern(IrTypeData::Array { elem, len })
    }

    pub fn struct_type(&mut self, fields: &[IrType], packed: bool) -> IrType {
        self.intern(IrTypeData::Struct(StructType::literal(
            fields.to_vec(),
            packed,
        )))
    }

    pub fn function_type(&mut self, ret: IrType, params: &[IrType], variadic: bool) -> IrType {
        self.intern(IrTypeData::Function {
            ret,
            params: params.to_vec(),
            variadic,
        })
    }

    /// Declare a bodyless named struct. Names are unique per context.
    pub fn struct_create_named(&mut self, name: &str) -> Result<IrType> {
        if self.named.contains_key(name) {
            return Err(LowerError::NameCollision(name.to_string()));
        }
        let ty = self.types.push(IrTypeData::Struct(StructType::opaque(name)));
        self.named.insert(name.to_string(), ty);
        Ok(ty)
    }

    pub fn struct_set_body(&mut self, ty: IrType, fields: &[IrType], packed: bool) -> Result<()> {
        match self.data(ty) {
            IrTypeData::Struct(StructType {
                name: Some(name),
                body: Some(_),
                ..
            }) => return Err(LowerError::BodyAlreadySet(name.clone())),
            IrTypeData::Struct(StructType { name: Some(_), .. }) => {}
            _ => {
                return Err(LowerError::Malformed(format!(
                    "{} is not a named struct",
                    self.display(ty)
                )))
            }
        }
        if let IrTypeData::Struct(s) = &mut self.types[ty] {
            s.body = Some(fields.to_vec());
            s.packed = packed;
        }
        Ok(())
    }

    pub fn data(&self, ty: IrType) -> &IrTypeData {
        &self.types[ty]
    }

    pub fn named_struct(&self, name: &str) -> Option<IrType> {
        self.named.get(name).copied()
    }

    /// Named structs in declaration order.
    pub fn named_structs(&self) -> impl Iterator<Item = (&str, IrType)> + '_ {
        self.named.iter().map(|(name, &ty)| (name.as_str(), ty))
    }

    pub fn is_opaque(&self, ty: IrType) -> bool {
        matches!(self.data(ty), IrTypeData::Struct(s) if s.is_opaque())
    }

    pub fn struct_name(&self, ty: IrType) -> Option<&str> {
        match self.data(ty) {
            IrTypeData::Struct(s) => s.name.as_deref(),
            _ => None,
        }
    }

    pub fn struct_fields(&self, ty: IrType) -> Option<&[IrType]> {
        match self.data(ty) {
            IrTypeData::Struct(s) => s.body.as_deref(),
            _ => None,
        }
    }

    pub fn element_type(&self, ty: IrType) -> Option<IrType> {
        match self.data(ty) {
            IrTypeData::Pointer { pointee, .. } => Some(*pointee),
            IrTypeData::Array { elem, .. } => Some(*elem),
            _ => None,
        }
    }

    pub fn array_len(&self, ty: IrType) -> Option<u64> {
        match self.data(ty) {
            IrTypeData::Array { len, .. } => Some(*len),
            _ => None,
        }
    }

    pub fn int_width(&self, ty: IrType) -> Option<u32> {
        match self.data(ty) {
            IrTypeData::Int(bits) => Some(*bits),
            _ => None,
        }
    }

    pub fn return_type(&self, ty: IrType) -> Option<IrType> {
        match self.data(ty) {
            IrTypeData::Function { ret, .. } => Some(*ret),
            _ => None,
        }
    }

    pub fn param_types(&self, ty: IrType) -> Option<&[IrType]> {
        match self.data(ty) {
            IrTypeData::Function { params, .. } => Some(params),
            _ => None,
        }
    }

    pub fn is_variadic(&self, ty: IrType) -> bool {
        matches!(self.data(ty), IrTypeData::Function { variadic: true, .. })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
