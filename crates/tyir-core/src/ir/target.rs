use cranelift_codegen::ir::types as clif_types;
use cranelift_codegen::isa::{self, OwnedTargetIsa};
use cranelift_codegen::settings;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use target_lexicon::Triple;

use crate::{
    ir::{context::IrContext, types::IrType, types::IrTypeData},
    LowerError, Result,
};

/// Target parameters lowering depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetData {
    pointer_size: u32,
    triple: Option<String>,
}

impl TargetData {
    pub fn new(pointer_size: u32) -> Self {
        Self {
            pointer_size,
            triple: None,
        }
    }

    /// Resolve a cranelift ISA by name, e.g. `x86_64` or `aarch64-unknown-linux-gnu`.
    pub fn from_isa(name: &str) -> Result<Self> {
        let triple = Triple::from_str(name)
            .map_err(|e| LowerError::Target(format!("Invalid target triple {}: {}", name, e)))?;
        let builder = isa::lookup(triple)
            .map_err(|e| LowerError::Target(format!("Failed to lookup ISA {}: {}", name, e)))?;
        Self::finish(builder)
    }

    pub fn host() -> Result<Self> {
        let builder = cranelift_native::builder()
            .map_err(|e| LowerError::Target(format!("Host ISA unavailable: {}", e)))?;
        Self::finish(builder)
    }

    fn finish(builder: isa::Builder) -> Result<Self> {
        let flags = settings::Flags::new(settings::builder());
        let isa: OwnedTargetIsa = builder
            .finish(flags)
            .map_err(|e| LowerError::Target(format!("Failed to create ISA: {}", e)))?;
        Ok(Self {
            pointer_size: u32::from(isa.pointer_bytes()),
            triple: Some(isa.triple().to_string()),
        })
    }

    pub fn pointer_size(&self) -> u32 {
        self.pointer_size
    }

    pub fn triple(&self) -> Option<&str> {
        self.triple.as_deref()
    }

    /// Width of the source language's word-sized integers.
    pub fn word_bits(&self) -> u32 {
        if self.pointer_size <= 4 {
            32
        } else {
            64
        }
    }

    pub fn pointer_clif_type(&self) -> clif_types::Type {
        if self.pointer_size <= 4 {
            clif_types::I32
        } else {
            clif_types::I64
        }
    }
}

impl IrContext {
    /// Cranelift register class of a scalar IR type; aggregates have none.
    pub fn clif_type(&self, ty: IrType) -> Option<clif_types::Type> {
        match self.data(ty) {
            IrTypeData::Int(1) | IrTypeData::Int(8) => Some(clif_types::I8),
            IrTypeData::Int(16) => Some(clif_types::I16),
            IrTypeData::Int(32) => Some(clif_types::I32),
            IrTypeData::Int(64) => Some(clif_types::I64),
            IrTypeData::Int(128) => Some(clif_types::I128),
            IrTypeData::Float => Some(clif_types::F32),
            IrTypeData::Double => Some(clif_types::F64),
            IrTypeData::Pointer { .. } => Some(self.target().pointer_clif_type()),
            _ => None,
        }
    }
}
