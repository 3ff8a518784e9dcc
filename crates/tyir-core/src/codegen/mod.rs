/*! Lower source types to IR types.
 *
 * `Program` is the per-compilation context: it owns the IR context, the primitive registry and the
 * cache that makes lowering return one canonical `Type` per source type. It also produces the
 * runtime type descriptors that interface boxing and type assertions compare by identity.
 */

pub mod aggregate;
pub mod descriptor;
pub mod lowering;
pub mod primitives;
pub mod program;

pub use primitives::{PrimitiveKind, Primitives, Signedness};
pub use program::{Program, Type, ValueKind};
