/*! The IR type system lowering targets.
 *
 * Scalars, pointers, arrays, literal structs and function types are uniqued inside an `IrContext`,
 * so building the same shape twice returns the same handle. Named structs are the exception: they
 * are nominal, start out opaque, and receive their body in a second step.
 */

pub mod context;
pub mod format;
pub mod layout;
pub mod target;
pub mod types;

pub use context::IrContext;
pub use format::DisplayType;
pub use target::TargetData;
pub use types::{IrType, IrTypeData, StructType};
