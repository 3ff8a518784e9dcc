use tracing::trace;

use crate::{
    codegen::program::ValueKind,
    ir::{IrContext, IrType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    VoidPtr,
    /// Target word-sized integer.
    Word,
}

impl PrimitiveKind {
    const COUNT: usize = 10;

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signedness {
    Signed,
    Unsigned,
}

/// Lazily created singleton IR types, one slot per `PrimitiveKind`.
#[derive(Debug, Default)]
pub struct Primitives {
    slots: [Option<IrType>; PrimitiveKind::COUNT],
}

impl Primitives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, ctx: &mut IrContext, kind: PrimitiveKind) -> IrType {
        if let Some(ty) = self.slots[kind.slot()] {
            return ty;
        }
        let ty = match kind {
            PrimitiveKind::Void => ctx.void_type(),
            PrimitiveKind::Bool => ctx.int_type(1),
            PrimitiveKind::Int8 => ctx.int_type(8),
            PrimitiveKind::Int16 => ctx.int_type(16),
            PrimitiveKind::Int32 => ctx.int_type(32),
            PrimitiveKind::Int64 => ctx.int_type(64),
            PrimitiveKind::Float => ctx.float_type(),
            PrimitiveKind::Double => ctx.double_type(),
            PrimitiveKind::VoidPtr => {
                let void = self.get(ctx, PrimitiveKind::Void);
                ctx.pointer_type(void, 0)
            }
            PrimitiveKind::Word => {
                let bits = ctx.target().word_bits();
                self.get(
                    ctx,
                    if bits == 32 {
                        PrimitiveKind::Int32
                    } else {
                        PrimitiveKind::Int64
                    },
                )
            }
        };
        trace!(?kind, ty = %ctx.display(ty), "created primitive");
        self.slots[kind.slot()] = Some(ty);
        ty
    }

    /// Word-sized integer; signed and unsigned share the IR type and differ
    /// only in value kind.
    pub fn word_int(&mut self, ctx: &mut IrContext, signedness: Signedness) -> (IrType, ValueKind) {
        let ty = self.get(ctx, PrimitiveKind::Word);
        let kind = match signedness {
            Signedness::Signed => ValueKind::Signed,
            Signedness::Unsigned => ValueKind::Unsigned,
        };
        (ty, kind)
    }

    pub fn is_created(&self, kind: PrimitiveKind) -> bool {
        self.slots[kind.slot()].is_some()
    }
}
