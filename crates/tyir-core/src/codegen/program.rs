use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tyir_runtime::abi;

use crate::{
    codegen::primitives::{PrimitiveKind, Primitives},
    config::ProgramConfig,
    ir::{IrContext, IrType, TargetData},
    types::{SourceTypeId, TypeRegistry},
    Result,
};

/// Arithmetic class of a lowered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Signed,
    Unsigned,
    Bool,
    Float,
    Func,
    /// Not usable in arithmetic: pointers, aggregates.
    Invalid,
}

impl ValueKind {
    pub fn is_integer(self) -> bool {
        matches!(self, ValueKind::Signed | ValueKind::Unsigned)
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            ValueKind::Signed | ValueKind::Unsigned | ValueKind::Float
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Signed => "signed",
            ValueKind::Unsigned => "unsigned",
            ValueKind::Bool => "bool",
            ValueKind::Float => "float",
            ValueKind::Func => "func",
            ValueKind::Invalid => "non-arith",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
struct TypeData {
    ir: IrType,
    source: SourceTypeId,
    kind: ValueKind,
}

/// A lowered type. Equality is handle identity: two `Type`s are equal only
/// when they came from the same cache entry.
#[derive(Clone)]
pub struct Type(Arc<TypeData>);

impl Type {
    pub(crate) fn new(ir: IrType, source: SourceTypeId, kind: ValueKind) -> Self {
        Self(Arc::new(TypeData { ir, source, kind }))
    }

    pub fn ir(&self) -> IrType {
        self.0.ir
    }

    pub fn source(&self) -> SourceTypeId {
        self.0.source
    }

    pub fn kind(&self) -> ValueKind {
        self.0.kind
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("ir", &self.0.ir)
            .field("source", &self.0.source)
            .field("kind", &self.0.kind)
            .finish()
    }
}

/// One compilation context.
pub struct Program<'a> {
    pub(crate) types: &'a TypeRegistry,
    pub(crate) ctx: IrContext,
    pub(crate) prims: Primitives,
    pub(crate) cache: IndexMap<SourceTypeId, Type>,
    /// Named types currently being lowered, innermost last; `true` marks a
    /// named struct whose body is pending.
    pub(crate) named_path: Vec<(SourceTypeId, bool)>,
    /// Opaque structs left behind by a failed body, reused on the next attempt.
    pub(crate) abandoned: HashMap<SourceTypeId, IrType>,
    pub(crate) descriptors: HashMap<SourceTypeId, Arc<abi::Type>>,
    pub(crate) interfaces: HashMap<SourceTypeId, Arc<abi::InterfaceType>>,
    pub(crate) qualify_named: bool,
}

impl<'a> Program<'a> {
    pub fn new(types: &'a TypeRegistry, config: &ProgramConfig) -> Result<Self> {
        let target = config.target.resolve()?;
        let mut program = Self::with_target(types, target);
        program.qualify_named = config.qualify_named;
        Ok(program)
    }

    pub fn with_target(types: &'a TypeRegistry, target: TargetData) -> Self {
        Self {
            types,
            ctx: IrContext::new(target),
            prims: Primitives::new(),
            cache: IndexMap::new(),
            named_path: Vec::new(),
            abandoned: HashMap::new(),
            descriptors: HashMap::new(),
            interfaces: HashMap::new(),
            qualify_named: true,
        }
    }

    pub fn types(&self) -> &'a TypeRegistry {
        self.types
    }

    pub fn ctx(&self) -> &IrContext {
        &self.ctx
    }

    pub fn target(&self) -> &TargetData {
        self.ctx.target()
    }

    pub fn primitive(&mut self, kind: PrimitiveKind) -> IrType {
        self.prims.get(&mut self.ctx, kind)
    }

    pub fn cached(&self, id: SourceTypeId) -> Option<&Type> {
        self.cache.get(&id)
    }

    /// Lowered types in cache insertion order.
    pub fn lowered(&self) -> impl Iterator<Item = &Type> + '_ {
        self.cache.values()
    }
}

impl fmt::Debug for Program<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("target", self.ctx.target())
            .field("lowered", &self.cache.len())
            .field("ir_types", &self.ctx.len())
            .finish()
    }
}
