/*! Runtime side of the dynamic interface ABI.
 *
 * Lowered programs box polymorphic values into a fixed two-word record: an itab that names the
 * interface and the concrete type, and a data word. This crate defines that record, the type
 * descriptors it points at, and the boxing and type-assertion operations generated code relies on.
 */

pub mod abi;
pub mod iface;

pub use abi::{basic, string_type, ty_any, type_hash, Imethod, InterfaceType, Kind, Type};
pub use iface::{
    assert_int, box_any, box_scalar, box_string, check_int, itab, make_interface, Interface,
    Itab, StringHeader,
};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("interface conversion: {interface} is {concrete}, not {asserted}")]
pub struct TypeAssertionError {
    pub interface: String,
    pub concrete: String,
    pub asserted: String,
}
