use tracing::debug;

use crate::{
    codegen::{
        primitives::{PrimitiveKind, Signedness},
        program::{Program, Type, ValueKind},
    },
    types::{BasicKind, Signature, SourceType, SourceTypeId},
    LowerError, Result,
};

impl<'a> Program<'a> {
    /// Lower a source type, computing it at most once per program.
    pub fn lower(&mut self, id: SourceTypeId) -> Result<Type> {
        if let Some(ty) = self.cache.get(&id) {
            return Ok(ty.clone());
        }
        debug!(ty = %self.types.display(id), "lowering");
        let ty = self.compute(id)?;
        // Named structs insert themselves before their body is lowered.
        Ok(self.cache.entry(id).or_insert(ty).clone())
    }

    pub fn lower_signature(&mut self, id: SourceTypeId) -> Result<Type> {
        match self.types.get(id) {
            SourceType::Signature(_) => self.lower(id),
            _ => Err(LowerError::Malformed(format!(
                "{} is not a function signature",
                self.types.display(id)
            ))),
        }
    }

    pub(crate) fn lower_all(&mut self, ids: &[SourceTypeId]) -> Result<Vec<Type>> {
        ids.iter().map(|&id| self.lower(id)).collect()
    }

    fn compute(&mut self, id: SourceTypeId) -> Result<Type> {
        let types = self.types;
        match types.get(id) {
            SourceType::Basic(kind) => self.lower_basic(id, *kind),
            SourceType::Pointer(elem) => {
                let elem = self.lower(*elem)?;
                let ir = self.ctx.pointer_type(elem.ir(), 0);
                Ok(Type::new(ir, id, ValueKind::Invalid))
            }
            SourceType::Array { elem, len } => {
                let elem = self.lower(*elem)?;
                let ir = self.ctx.array_type(elem.ir(), *len);
                Ok(Type::new(ir, id, ValueKind::Invalid))
            }
            SourceType::Slice(elem) => self.lower_slice(id, *elem),
            SourceType::Struct(fields) => self.lower_struct(id, fields),
            SourceType::Named(named) => self.lower_named(id, *named),
            SourceType::Signature(sig) => self.lower_func(id, sig),
            SourceType::Interface(_) => self.lower_interface(id),
            SourceType::Map { .. } | SourceType::Chan { .. } => Err(self.unsupported(id)),
        }
    }

    fn lower_basic(&mut self, id: SourceTypeId, kind: BasicKind) -> Result<Type> {
        let (prim, value_kind) = match kind {
            BasicKind::Int => {
                let (ir, kind) = self.prims.word_int(&mut self.ctx, Signedness::Signed);
                return Ok(Type::new(ir, id, kind));
            }
            BasicKind::Uint | BasicKind::Uintptr => {
                let (ir, kind) = self.prims.word_int(&mut self.ctx, Signedness::Unsigned);
                return Ok(Type::new(ir, id, kind));
            }
            BasicKind::Bool => (PrimitiveKind::Bool, ValueKind::Bool),
            BasicKind::Int8 => (PrimitiveKind::Int8, ValueKind::Signed),
            BasicKind::Uint8 => (PrimitiveKind::Int8, ValueKind::Unsigned),
            BasicKind::Int16 => (PrimitiveKind::Int16, ValueKind::Signed),
            BasicKind::Uint16 => (PrimitiveKind::Int16, ValueKind::Unsigned),
            BasicKind::Int32 => (PrimitiveKind::Int32, ValueKind::Signed),
            BasicKind::Uint32 => (PrimitiveKind::Int32, ValueKind::Unsigned),
            BasicKind::Int64 => (PrimitiveKind::Int64, ValueKind::Signed),
            BasicKind::Uint64 => (PrimitiveKind::Int64, ValueKind::Unsigned),
            BasicKind::Float32 => (PrimitiveKind::Float, ValueKind::Float),
            BasicKind::Float64 => (PrimitiveKind::Double, ValueKind::Float),
            BasicKind::UnsafePointer => (PrimitiveKind::VoidPtr, ValueKind::Invalid),
            BasicKind::String => return self.lower_string(id),
            BasicKind::Complex64 | BasicKind::Complex128 => return Err(self.unsupported(id)),
        };
        let ir = self.primitive(prim);
        Ok(Type::new(ir, id, value_kind))
    }

    fn lower_func(&mut self, id: SourceTypeId, sig: &Signature) -> Result<Type> {
        let params = self
            .lower_all(&sig.params)?
            .iter()
            .map(Type::ir)
            .collect::<Vec<_>>();
        let ret = match sig.results.as_slice() {
            [] => self.primitive(PrimitiveKind::Void),
            [single] => self.lower(*single)?.ir(),
            results => self.lower_tuple(results)?,
        };
        let ir = self.ctx.function_type(ret, &params, sig.variadic);
        Ok(Type::new(ir, id, ValueKind::Func))
    }

    pub(crate) fn unsupported(&self, id: SourceTypeId) -> LowerError {
        LowerError::Unsupported(self.types.display(id))
    }
}
