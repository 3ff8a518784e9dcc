/*! Render lowered type tables as text or JSON.
 *
 * When a value has the wrong shape at runtime the first question is what its type lowered to. These
 * emitters print the named struct definitions of a program followed by every source type it has
 * lowered, in the order lowering first reached them.
 */

pub mod config;
pub mod emitter;
pub mod type_emitter;

pub use config::{EmitterConfig, OutputFormat};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
pub use type_emitter::{listing_to_string, LoweredEntry, TypeEmitter, TypeListing};
