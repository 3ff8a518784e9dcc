/*! Unified interface for type lowering and the interface runtime.
 *
 * Single import for lowering source types to IR types, building the runtime descriptors those types
 * box with, and printing what a program lowered.
 */

pub use tyir_core as core;
pub use tyir_emit as emit;
pub use tyir_runtime as runtime;

pub use tyir_core::{
    BasicKind, Field, LowerError, Method, Program, ProgramConfig, SourceTypeId, TargetData,
    TargetSpec, Type, TypeRegistry, ValueKind,
};

pub use tyir_emit::{listing_to_string, EmitterConfig, TypeEmitter};

pub use tyir_runtime::{
    assert_int, box_any, box_scalar, box_string, check_int, make_interface, Interface,
    StringHeader, TypeAssertionError,
};
