use tracing::debug;

use crate::{
    codegen::{
        primitives::{PrimitiveKind, Signedness},
        program::{Program, Type, ValueKind},
    },
    ir::IrType,
    types::{Field, NamedId, SourceType, SourceTypeId},
    LowerError, Result,
};

impl<'a> Program<'a> {
    pub(crate) fn lower_fields(&mut self, fields: &[Field]) -> Result<Vec<IrType>> {
        fields
            .iter()
            .map(|field| self.lower(field.ty).map(|ty| ty.ir()))
            .collect()
    }

    pub(crate) fn lower_struct(&mut self, id: SourceTypeId, fields: &[Field]) -> Result<Type> {
        let body = self.lower_fields(fields)?;
        let ir = self.ctx.struct_type(&body, false);
        Ok(Type::new(ir, id, ValueKind::Invalid))
    }

    /// Unnamed struct of the lowered results, used for multi-value returns.
    pub(crate) fn lower_tuple(&mut self, results: &[SourceTypeId]) -> Result<IrType> {
        let fields = self
            .lower_all(results)?
            .iter()
            .map(Type::ir)
            .collect::<Vec<_>>();
        Ok(self.ctx.struct_type(&fields, false))
    }

    /// `{ i8*, word }`
    pub(crate) fn lower_string(&mut self, id: SourceTypeId) -> Result<Type> {
        let byte = self.primitive(PrimitiveKind::Int8);
        let data = self.ctx.pointer_type(byte, 0);
        let (len, _) = self.prims.word_int(&mut self.ctx, Signedness::Signed);
        let ir = self.ctx.struct_type(&[data, len], false);
        Ok(Type::new(ir, id, ValueKind::Invalid))
    }

    /// `{ elem*, word, word }`
    pub(crate) fn lower_slice(&mut self, id: SourceTypeId, elem: SourceTypeId) -> Result<Type> {
        let elem = self.lower(elem)?;
        let data = self.ctx.pointer_type(elem.ir(), 0);
        let (word, _) = self.prims.word_int(&mut self.ctx, Signedness::Signed);
        let ir = self.ctx.struct_type(&[data, word, word], false);
        Ok(Type::new(ir, id, ValueKind::Invalid))
    }

    /// `{ itab*, data* }`, both as byte pointers.
    pub(crate) fn lower_interface(&mut self, id: SourceTypeId) -> Result<Type> {
        let byte = self.primitive(PrimitiveKind::Int8);
        let ptr = self.ctx.pointer_type(byte, 0);
        let ir = self.ctx.struct_type(&[ptr, ptr], false);
        Ok(Type::new(ir, id, ValueKind::Invalid))
    }

    pub(crate) fn lower_named(&mut self, id: SourceTypeId, named: NamedId) -> Result<Type> {
        let types = self.types;
        let decl = types.named_decl(named);
        let underlying = types.underlying(id)?;
        match types.get(underlying) {
            SourceType::Struct(fields) => {
                let ir = match self.abandoned.remove(&id) {
                    Some(ir) => ir,
                    None => {
                        let name = if self.qualify_named {
                            decl.qualified_name()
                        } else {
                            decl.name.clone()
                        };
                        let ir = self.ctx.struct_create_named(&name)?;
                        debug!(%name, "declared opaque named struct");
                        ir
                    }
                };

                // Cached before the body so fields can refer back to it.
                let ty = Type::new(ir, id, ValueKind::Invalid);
                self.cache.insert(id, ty.clone());

                self.named_path.push((id, true));
                let body = self.lower_fields(fields);
                self.named_path.pop();
                let body = match body {
                    Ok(body) => body,
                    Err(err) => {
                        self.cache.shift_remove(&id);
                        self.abandoned.insert(id, ir);
                        return Err(err);
                    }
                };
                self.ctx.struct_set_body(ir, &body, false)?;
                debug!(
                    name = %decl.qualified_name(),
                    fields = body.len(),
                    "attached named struct body"
                );
                Ok(ty)
            }
            _ => {
                // Reaching the same type again is fine once a named struct sits
                // in between: that struct is already cached, so lowering the
                // underlying type again stops there.
                if let Some(pos) = self.named_path.iter().rposition(|&(frame, _)| frame == id) {
                    let through_struct = self.named_path[pos + 1..]
                        .iter()
                        .any(|&(_, is_struct)| is_struct);
                    if !through_struct {
                        return Err(LowerError::Unsupported(format!(
                            "recursive non-struct named type {}",
                            decl.qualified_name()
                        )));
                    }
                }
                self.named_path.push((id, false));
                let result = self.lower(underlying);
                self.named_path.pop();
                let under = result?;
                Ok(Type::new(under.ir(), id, under.kind()))
            }
        }
    }
}
