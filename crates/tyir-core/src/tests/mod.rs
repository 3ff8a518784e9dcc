/*! Test coverage for type lowering.
 *
 * Code generation trusts lowered types blindly: a wrong field order or a second handle for the same
 * type surfaces much later as a miscompile. These tests pin down the lowering rules, the named-type
 * protocol and the runtime descriptors built on top of them.
 */

mod descriptor_tests;
mod named_tests;

use crate::{ir::TargetData, Program, TypeRegistry};

pub(crate) fn program(types: &TypeRegistry) -> Program<'_> {
    Program::with_target(types, TargetData::new(8))
}

pub(crate) fn program_32(types: &TypeRegistry) -> Program<'_> {
    Program::with_target(types, TargetData::new(4))
}

/// Pointer width of the machine running the tests, so basic descriptors line
/// up with the runtime's singletons.
pub(crate) fn program_host(types: &TypeRegistry) -> Program<'_> {
    Program::with_target(types, TargetData::new(std::mem::size_of::<usize>() as u32))
}
