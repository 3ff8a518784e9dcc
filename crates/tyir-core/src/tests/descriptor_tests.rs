use super::{program, program_32, program_host};
use crate::{
    types::{BasicKind, Field, Method},
    LowerError, TypeRegistry,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tyir_runtime::abi;

#[test]
fn test_basic_descriptors_are_runtime_singletons() {
    let mut types = TypeRegistry::new();
    let int = types.basic(BasicKind::Int);
    let uint8 = types.basic(BasicKind::Uint8);
    let string = types.basic(BasicKind::String);
    let mut program = program_host(&types);

    let desc = program.descriptor_for(int).unwrap();
    assert!(abi::Type::same(&desc, &abi::basic(abi::Kind::Int).unwrap()));

    let desc = program.descriptor_for(uint8).unwrap();
    assert!(abi::Type::same(&desc, &abi::basic(abi::Kind::Uint8).unwrap()));
    assert_eq!(desc.size, 1);

    let desc = program.descriptor_for(string).unwrap();
    assert!(abi::Type::same(&desc, &abi::string_type()));
}

#[test]
fn test_basic_descriptors_follow_target_layout() {
    let mut types = TypeRegistry::new();
    let int = types.basic(BasicKind::Int);
    let int8 = types.basic(BasicKind::Int8);
    let string = types.basic(BasicKind::String);
    let my_int = types.named(Some("main"), "MyInt", int);
    let mut program = program_32(&types);

    let int_ty = program.lower(int).unwrap();
    let desc = program.type_descriptor(&int_ty).unwrap();
    assert_eq!(desc.kind, abi::Kind::Int);
    assert_eq!(desc.size as u64, program.ctx().size_of(int_ty.ir()).unwrap());
    assert_eq!((desc.size, desc.align), (4, 4));
    assert_eq!(program.descriptor_for(my_int).unwrap().size, desc.size);
    assert!(abi::Type::same(&desc, &program.descriptor_for(int).unwrap()));

    let desc = program.descriptor_for(string).unwrap();
    assert_eq!(desc.kind, abi::Kind::String);
    assert_eq!((desc.size, desc.align), (8, 4));

    let desc = program.descriptor_for(int8).unwrap();
    assert!(abi::Type::same(&desc, &abi::basic(abi::Kind::Int8).unwrap()));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_narrow_target_does_not_reuse_wide_singletons() {
    let mut types = TypeRegistry::new();
    let int = types.basic(BasicKind::Int);
    let string = types.basic(BasicKind::String);
    let mut program = program_32(&types);

    let desc = program.descriptor_for(int).unwrap();
    assert!(!abi::Type::same(&desc, &abi::basic(abi::Kind::Int).unwrap()));
    assert_eq!(desc.name, "int");
    let desc = program.descriptor_for(string).unwrap();
    assert!(!abi::Type::same(&desc, &abi::string_type()));
}

#[test]
fn test_oversized_descriptor_is_layout_error() {
    let mut types = TypeRegistry::new();
    let int64 = types.basic(BasicKind::Int64);
    let huge = types.array(int64, u64::MAX / 4);
    let mut program = program(&types);

    assert!(matches!(
        program.descriptor_for(huge),
        Err(LowerError::Layout(_))
    ));
    assert!(program.cached(huge).is_some());
}

#[test]
fn test_composite_descriptor() {
    let mut types = TypeRegistry::new();
    let int32 = types.basic(BasicKind::Int32);
    let int8 = types.basic(BasicKind::Int8);
    let ptr = types.pointer(int8);
    let body = types.struct_(vec![Field::new("a", int32), Field::new("b", ptr)]);
    let mut wide = program(&types);
    let mut narrow = program_32(&types);

    let desc = wide.descriptor_for(body).unwrap();
    assert_eq!(desc.kind, abi::Kind::Struct);
    assert_eq!(desc.name, "struct{a int32; b *int8}");
    assert_eq!((desc.size, desc.align), (16, 8));
    assert_eq!(desc.hash, abi::type_hash("struct{a int32; b *int8}"));

    let again = wide.descriptor_for(body).unwrap();
    assert!(abi::Type::same(&desc, &again));

    let desc = narrow.descriptor_for(body).unwrap();
    assert_eq!((desc.size, desc.align), (8, 4));

    let desc = narrow.descriptor_for(ptr).unwrap();
    assert_eq!(desc.kind, abi::Kind::Pointer);
    assert_eq!(desc.size, 4);
}

#[test]
fn test_named_descriptor_is_distinct() {
    let mut types = TypeRegistry::new();
    let int = types.basic(BasicKind::Int);
    let my_int = types.named(Some("main"), "MyInt", int);
    let mut program = program(&types);

    let named = program.descriptor_for(my_int).unwrap();
    let plain = program.descriptor_for(int).unwrap();

    assert!(!abi::Type::same(&named, &plain));
    assert_eq!(named.kind, abi::Kind::Int);
    assert_eq!(named.name, "main.MyInt");
    assert_eq!(named.size, 8);
}

#[test]
fn test_func_descriptor_is_pointer_sized() {
    let mut types = TypeRegistry::new();
    let int = types.basic(BasicKind::Int);
    let sig = types.signature(vec![int], vec![], false);
    let mut program = program_32(&types);

    let desc = program.descriptor_for(sig).unwrap();
    assert_eq!(desc.kind, abi::Kind::Func);
    assert_eq!((desc.size, desc.align), (4, 4));
    assert_eq!(desc.name, "func(int)");
}

#[test]
fn test_descriptor_requires_lowering() {
    let mut types = TypeRegistry::new();
    let string = types.basic(BasicKind::String);
    let map = types.map(string, string);
    let mut program = program(&types);

    assert!(matches!(
        program.descriptor_for(map),
        Err(LowerError::Unsupported(_))
    ));
}

#[test]
fn test_empty_interface_is_ty_any() {
    let mut types = TypeRegistry::new();
    let any = types.interface(vec![]);
    let named_any = types.named(Some("main"), "Any", any);
    let mut program = program(&types);

    let inter = program.interface_descriptor(any).unwrap();
    assert!(Arc::ptr_eq(&inter, &abi::ty_any()));
    let inter = program.interface_descriptor(named_any).unwrap();
    assert!(Arc::ptr_eq(&inter, &abi::ty_any()));
}

#[test]
fn test_interface_methods() {
    let mut types = TypeRegistry::new();
    let string = types.basic(BasicKind::String);
    let int = types.basic(BasicKind::Int);
    let to_string = types.signature(vec![], vec![string], false);
    let len = types.signature(vec![], vec![int], false);
    let body = types.interface(vec![
        Method::new("String", to_string),
        Method::new("Len", len),
    ]);
    let named = types.named(Some("fmt"), "Sized", body);
    let mut program = program(&types);

    let inter = program.interface_descriptor(named).unwrap();
    assert_eq!(inter.pkg_path, "fmt");
    assert_eq!(inter.to_string(), "interface { Len; String }");
    assert_eq!(inter.methods[0].ty.kind, abi::Kind::Func);
    assert_eq!(inter.methods[1].ty.name, "func() string");

    let again = program.interface_descriptor(named).unwrap();
    assert!(Arc::ptr_eq(&inter, &again));

    let unnamed = program.interface_descriptor(body).unwrap();
    assert!(!Arc::ptr_eq(&inter, &unnamed));
    assert_eq!(unnamed.pkg_path, "");
}

#[test]
fn test_interface_descriptor_rejects_concrete_types() {
    let mut types = TypeRegistry::new();
    let int = types.basic(BasicKind::Int);
    let mut program = program(&types);

    assert_eq!(
        program.interface_descriptor(int).unwrap_err(),
        LowerError::Malformed("int is not an interface".to_string())
    );
}
