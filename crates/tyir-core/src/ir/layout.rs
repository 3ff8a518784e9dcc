use crate::{
    ir::{
        context::IrContext,
        types::{IrType, IrTypeData},
    },
    LowerError, Result,
};

fn align_to(offset: u64, align: u64) -> Result<u64> {
    offset
        .div_ceil(align)
        .checked_mul(align)
        .ok_or_else(overflow)
}

fn overflow() -> LowerError {
    LowerError::Layout("type size overflows the address space".to_string())
}

impl IrContext {
    /// Allocation size in bytes, including tail padding.
    pub fn size_of(&self, ty: IrType) -> Result<u64> {
        self.layout(ty, &mut Vec::new()).map(|(size, _)| size)
    }

    pub fn align_of(&self, ty: IrType) -> Result<u64> {
        self.layout(ty, &mut Vec::new()).map(|(_, align)| align)
    }

    /// Byte offset of each field of a struct with a body.
    pub fn field_offsets(&self, ty: IrType) -> Result<Vec<u64>> {
        let (fields, packed) = match self.data(ty) {
            IrTypeData::Struct(s) => match &s.body {
                Some(body) => (body, s.packed),
                None => return Err(self.opaque_error(ty)),
            },
            _ => {
                return Err(LowerError::Layout(format!(
                    "{} is not a struct",
                    self.display(ty)
                )))
            }
        };
        let mut visiting = vec![ty];
        let mut offsets = Vec::with_capacity(fields.len());
        let mut offset = 0;
        for &field in fields {
            let (size, align) = self.layout(field, &mut visiting)?;
            if !packed {
                offset = align_to(offset, align)?;
            }
            offsets.push(offset);
            offset = offset.checked_add(size).ok_or_else(overflow)?;
        }
        Ok(offsets)
    }

    fn layout(&self, ty: IrType, visiting: &mut Vec<IrType>) -> Result<(u64, u64)> {
        let ptr = u64::from(self.target().pointer_size());
        match self.data(ty) {
            IrTypeData::Void => Err(LowerError::Layout("void has no size".to_string())),
            IrTypeData::Function { .. } => Err(LowerError::Layout(format!(
                "function type {} has no size",
                self.display(ty)
            ))),
            IrTypeData::Int(bits) => {
                let size = u64::from(bits.div_ceil(8)).next_power_of_two();
                Ok((size, size.min(8)))
            }
            IrTypeData::Float => Ok((4, 4)),
            IrTypeData::Double => Ok((8, 8)),
            IrTypeData::Pointer { .. } => Ok((ptr, ptr)),
            IrTypeData::Array { elem, len } => {
                let (size, align) = self.layout(*elem, visiting)?;
                let size = size.checked_mul(*len).ok_or_else(overflow)?;
                Ok((size, align))
            }
            IrTypeData::Struct(s) => {
                let fields = match &s.body {
                    Some(body) => body,
                    None => return Err(self.opaque_error(ty)),
                };
                if visiting.contains(&ty) {
                    return Err(LowerError::Layout(format!(
                        "{} contains itself by value",
                        self.display(ty)
                    )));
                }
                visiting.push(ty);
                let mut offset = 0;
                let mut max_align = 1;
                for &field in fields {
                    let (size, align) = self.layout(field, visiting)?;
                    let align = if s.packed { 1 } else { align };
                    offset = align_to(offset, align)?
                        .checked_add(size)
                        .ok_or_else(overflow)?;
                    max_align = max_align.max(align);
                }
                visiting.pop();
                Ok((align_to(offset, max_align)?, max_align))
            }
        }
    }

    fn opaque_error(&self, ty: IrType) -> LowerError {
        LowerError::Layout(format!("{} is opaque", self.display(ty)))
    }
}
