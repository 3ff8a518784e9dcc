/*! Lower source-language types to IR types for native code generation.
 *
 * Every source type maps to exactly one lowered `Type` per `Program`, so later code generation can
 * compare types by identity. Named structs are declared before their bodies are lowered, which is
 * what lets self-referential and mutually recursive types terminate.
 */

pub mod codegen;
pub mod config;
pub mod ir;
pub mod types;

pub use codegen::{PrimitiveKind, Program, Signedness, Type, ValueKind};
pub use config::{ProgramConfig, TargetSpec};
pub use ir::{IrContext, IrType, IrTypeData, TargetData};
pub use types::{BasicKind, Field, Method, NamedId, SourceType, SourceTypeId, TypeRegistry};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LowerError {
    #[error("Unsupported type: {0}")]
    Unsupported(String),
    #[error("Named type collision: {0}")]
    NameCollision(String),
    #[error("Malformed type: {0}")]
    Malformed(String),
    #[error("Struct body already set: {0}")]
    BodyAlreadySet(String),
    #[error("Layout error: {0}")]
    Layout(String),
    #[error("Target error: {0}")]
    Target(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LowerError>;

#[cfg(test)]
mod tests;
