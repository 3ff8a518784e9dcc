use std::sync::Arc;
use tracing::debug;
use tyir_runtime::abi;

use crate::{
    codegen::program::{Program, Type},
    types::{SourceType, SourceTypeId},
    LowerError, Result,
};

impl<'a> Program<'a> {
    /// Runtime descriptor for a lowered type, shared by every query for the
    /// same source type. Basic types reuse the runtime's singletons when the
    /// target lays them out the same way the host does.
    pub fn type_descriptor(&mut self, ty: &Type) -> Result<Arc<abi::Type>> {
        let id = ty.source();
        if let Some(desc) = self.descriptors.get(&id) {
            return Ok(desc.clone());
        }
        let types = self.types;
        let kind = self.abi_kind(id)?;
        let (size, align) = if kind == abi::Kind::Func {
            let ptr = u64::from(self.target().pointer_size());
            (ptr, ptr)
        } else {
            (self.ctx.size_of(ty.ir())?, self.ctx.align_of(ty.ir())?)
        };
        let size = usize::try_from(size).map_err(|_| {
            LowerError::Layout(format!("{} is too large for the host", types.display(id)))
        })?;
        let align = u8::try_from(align).map_err(|_| {
            LowerError::Layout(format!("{} is over-aligned", types.display(id)))
        })?;

        let singleton = match types.get(id) {
            SourceType::Basic(basic) => abi::basic(basic.abi_kind())
                .filter(|desc| desc.size == size && desc.align == align),
            _ => None,
        };
        let desc = match singleton {
            Some(desc) => desc,
            None => {
                let name = types.display(id);
                debug!(%name, size, align, "built type descriptor");
                Arc::new(abi::Type::new(name, kind, size, align))
            }
        };
        self.descriptors.insert(id, desc.clone());
        Ok(desc)
    }

    /// Lower `id` and return its runtime descriptor.
    pub fn descriptor_for(&mut self, id: SourceTypeId) -> Result<Arc<abi::Type>> {
        let ty = self.lower(id)?;
        self.type_descriptor(&ty)
    }

    /// Runtime method table for an interface type. The empty interface is
    /// always the shared `abi::ty_any()`.
    pub fn interface_descriptor(&mut self, id: SourceTypeId) -> Result<Arc<abi::InterfaceType>> {
        if let Some(inter) = self.interfaces.get(&id) {
            return Ok(inter.clone());
        }
        let types = self.types;
        let methods = match types.get(types.underlying(id)?) {
            SourceType::Interface(methods) => methods,
            _ => {
                return Err(LowerError::Malformed(format!(
                    "{} is not an interface",
                    types.display(id)
                )))
            }
        };
        let inter = if methods.is_empty() {
            abi::ty_any()
        } else {
            let pkg = match types.get(id) {
                SourceType::Named(named) => types.named_decl(*named).pkg.clone(),
                _ => None,
            };
            let imethods = methods
                .iter()
                .map(|m| -> Result<abi::Imethod> {
                    let sig = self.lower_signature(m.sig)?;
                    Ok(abi::Imethod {
                        name: m.name.clone(),
                        ty: self.type_descriptor(&sig)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Arc::new(abi::InterfaceType::new(pkg.unwrap_or_default(), imethods))
        };
        self.interfaces.insert(id, inter.clone());
        Ok(inter)
    }

    fn abi_kind(&self, id: SourceTypeId) -> Result<abi::Kind> {
        let types = self.types;
        let kind = match types.get(types.underlying(id)?) {
            SourceType::Basic(kind) => kind.abi_kind(),
            SourceType::Pointer(_) => abi::Kind::Pointer,
            SourceType::Array { .. } => abi::Kind::Array,
            SourceType::Slice(_) => abi::Kind::Slice,
            SourceType::Map { .. } => abi::Kind::Map,
            SourceType::Chan { .. } => abi::Kind::Chan,
            SourceType::Struct(_) => abi::Kind::Struct,
            SourceType::Signature(_) => abi::Kind::Func,
            SourceType::Interface(_) => abi::Kind::Interface,
            SourceType::Named(_) => abi::Kind::Invalid,
        };
        Ok(kind)
    }
}
