use super::program;
use crate::{
    codegen::ValueKind,
    config::{ProgramConfig, TargetSpec},
    types::{BasicKind, Field, Method, SourceTypeId},
    LowerError, Program, TypeRegistry,
};
use pretty_assertions::assert_eq;

#[test]
fn test_self_referential_struct() {
    let mut types = TypeRegistry::new();
    let int = types.basic(BasicKind::Int);
    let (node, node_id) = types.declare_named(Some("list"), "Node");
    let next = types.pointer(node_id);
    let body = types.struct_(vec![Field::new("value", int), Field::new("next", next)]);
    types.set_underlying(node, body).unwrap();
    let mut program = program(&types);

    let ty = program.lower(node_id).unwrap();
    let ctx = program.ctx();
    assert_eq!(ctx.struct_name(ty.ir()), Some("list.Node"));
    assert!(!ctx.is_opaque(ty.ir()));

    let fields = ctx.struct_fields(ty.ir()).unwrap().to_vec();
    assert_eq!(fields.len(), 2);
    assert_eq!(ctx.element_type(fields[1]), Some(ty.ir()));
    assert_eq!(
        ctx.definition(ty.ir()).unwrap(),
        "%list.Node = type { i64, %list.Node* }"
    );

    let ptr = program.lower(next).unwrap();
    assert_eq!(ptr.ir(), fields[1]);
}

#[test]
fn test_mutually_recursive_structs() {
    let mut types = TypeRegistry::new();
    let (a, a_id) = types.declare_named(Some("main"), "A");
    let (b, b_id) = types.declare_named(Some("main"), "B");
    let a_ptr = types.pointer(a_id);
    let b_ptr = types.pointer(b_id);
    let a_body = types.struct_(vec![Field::new("b", b_ptr)]);
    let b_body = types.struct_(vec![Field::new("a", a_ptr)]);
    types.set_underlying(a, a_body).unwrap();
    types.set_underlying(b, b_body).unwrap();
    let mut program = program(&types);

    let a_ty = program.lower(a_id).unwrap();
    let b_ty = program.cached(b_id).cloned().unwrap();
    let ctx = program.ctx();

    assert!(!ctx.is_opaque(a_ty.ir()));
    assert!(!ctx.is_opaque(b_ty.ir()));
    assert_eq!(
        ctx.definition(a_ty.ir()).unwrap(),
        "%main.A = type { %main.B* }"
    );
    assert_eq!(
        ctx.definition(b_ty.ir()).unwrap(),
        "%main.B = type { %main.A* }"
    );

    let names = ctx.named_structs().map(|(n, _)| n).collect::<Vec<_>>();
    assert_eq!(names, vec!["main.A", "main.B"]);
}

#[test]
fn test_slice_of_self() {
    let mut types = TypeRegistry::new();
    let (tree, tree_id) = types.declare_named(Some("main"), "Tree");
    let kids = types.slice(tree_id);
    let body = types.struct_(vec![Field::new("kids", kids)]);
    types.set_underlying(tree, body).unwrap();
    let mut program = program(&types);

    let ty = program.lower(tree_id).unwrap();
    assert_eq!(
        program.ctx().definition(ty.ir()).unwrap(),
        "%main.Tree = type { { %main.Tree*, i64, i64 } }"
    );
}

#[test]
fn test_named_non_struct_gets_own_handle() {
    let mut types = TypeRegistry::new();
    let int = types.basic(BasicKind::Int);
    let my_int = types.named(Some("main"), "MyInt", int);
    let mut program = program(&types);

    let named = program.lower(my_int).unwrap();
    let plain = program.lower(int).unwrap();

    assert_eq!(named.ir(), plain.ir());
    assert_eq!(named.kind(), ValueKind::Signed);
    assert_ne!(named, plain);
    assert_eq!(program.ctx().named_structs().count(), 0);
}

#[test]
fn test_named_over_named_struct() {
    let mut types = TypeRegistry::new();
    let int32 = types.basic(BasicKind::Int32);
    let body = types.struct_(vec![Field::new("x", int32)]);
    let b = types.named(Some("main"), "B", body);
    let a = types.named(Some("main"), "A", b);
    let mut program = program(&types);

    let a_ty = program.lower(a).unwrap();
    let b_ty = program.lower(b).unwrap();

    assert_ne!(a_ty.ir(), b_ty.ir());
    assert_eq!(
        program.ctx().definition(a_ty.ir()).unwrap(),
        "%main.A = type { i32 }"
    );
    assert_eq!(
        program.ctx().definition(b_ty.ir()).unwrap(),
        "%main.B = type { i32 }"
    );
}

#[test]
fn test_named_interface() {
    let mut types = TypeRegistry::new();
    let string = types.basic(BasicKind::String);
    let sig = types.signature(vec![], vec![string], false);
    let body = types.interface(vec![Method::new("String", sig)]);
    let stringer = types.named(Some("fmt"), "Stringer", body);
    let mut program = program(&types);

    let named = program.lower(stringer).unwrap();
    let plain = program.lower(body).unwrap();
    assert_eq!(named.ir(), plain.ir());
    assert_ne!(named, plain);
    assert_eq!(
        program.ctx().display(named.ir()).to_string(),
        "{ i8*, i8* }"
    );
}

#[test]
fn test_recursion_through_non_struct_is_unsupported() {
    let mut types = TypeRegistry::new();
    let (p, p_id) = types.declare_named(Some("main"), "P");
    let p_ptr = types.pointer(p_id);
    types.set_underlying(p, p_ptr).unwrap();

    let (f, f_id) = types.declare_named(Some("main"), "F");
    let f_sig = types.signature(vec![f_id], vec![], false);
    types.set_underlying(f, f_sig).unwrap();

    let (t, t_id) = types.declare_named(Some("main"), "T");
    let t_slice = types.slice(t_id);
    types.set_underlying(t, t_slice).unwrap();

    let mut program = program(&types);
    assert_eq!(
        program.lower(p_id),
        Err(LowerError::Unsupported(
            "recursive non-struct named type main.P".to_string()
        ))
    );
    assert_eq!(
        program.lower(f_id),
        Err(LowerError::Unsupported(
            "recursive non-struct named type main.F".to_string()
        ))
    );
    assert_eq!(
        program.lower(t_id),
        Err(LowerError::Unsupported(
            "recursive non-struct named type main.T".to_string()
        ))
    );
    assert!(program.cached(p_id).is_none());
}

/// `type F func(*S)` and `type S struct{ f F }`.
fn func_struct_cycle(types: &mut TypeRegistry) -> (SourceTypeId, SourceTypeId) {
    let (f, f_id) = types.declare_named(Some("main"), "F");
    let (s, s_id) = types.declare_named(Some("main"), "S");
    let s_ptr = types.pointer(s_id);
    let sig = types.signature(vec![s_ptr], vec![], false);
    types.set_underlying(f, sig).unwrap();
    let body = types.struct_(vec![Field::new("f", f_id)]);
    types.set_underlying(s, body).unwrap();
    (f_id, s_id)
}

#[test]
fn test_cycle_through_struct_is_order_independent() {
    let mut types = TypeRegistry::new();
    let (f, s) = func_struct_cycle(&mut types);

    let mut struct_first = program(&types);
    let s_ty = struct_first.lower(s).unwrap();
    let f_ty = struct_first.lower(f).unwrap();
    let expected_def = struct_first.ctx().definition(s_ty.ir()).unwrap();
    let expected_func = struct_first.ctx().display(f_ty.ir()).to_string();

    let mut func_first = program(&types);
    let f_ty = func_first.lower(f).unwrap();
    let s_ty = func_first.lower(s).unwrap();

    assert_eq!(expected_def, "%main.S = type { void (%main.S*) }");
    assert_eq!(func_first.ctx().definition(s_ty.ir()).unwrap(), expected_def);
    assert_eq!(
        func_first.ctx().display(f_ty.ir()).to_string(),
        expected_func
    );
    assert_eq!(f_ty.kind(), ValueKind::Func);
    assert_eq!(func_first.cached(f), Some(&f_ty));
    assert_eq!(func_first.lower(f).unwrap(), f_ty);
}

#[test]
fn test_direct_recursion_next_to_struct_cycle() {
    let mut types = TypeRegistry::new();
    let (f, f_id) = types.declare_named(Some("main"), "F");
    let (s, s_id) = types.declare_named(Some("main"), "S");
    let s_ptr = types.pointer(s_id);
    let sig = types.signature(vec![s_ptr, f_id], vec![], false);
    types.set_underlying(f, sig).unwrap();
    let body = types.struct_(vec![Field::new("f", f_id)]);
    types.set_underlying(s, body).unwrap();

    let expected = Err(LowerError::Unsupported(
        "recursive non-struct named type main.F".to_string(),
    ));
    assert_eq!(program(&types).lower(f_id), expected);
    assert_eq!(program(&types).lower(s_id), expected);
}

#[test]
fn test_same_name_collides() {
    let mut types = TypeRegistry::new();
    let int = types.basic(BasicKind::Int);
    let boolean = types.basic(BasicKind::Bool);
    let first_body = types.struct_(vec![Field::new("n", int)]);
    let second_body = types.struct_(vec![Field::new("b", boolean)]);
    let first = types.named(Some("main"), "T", first_body);
    let second = types.named(Some("main"), "T", second_body);
    let mut program = program(&types);

    program.lower(first).unwrap();
    assert_eq!(
        program.lower(second),
        Err(LowerError::NameCollision("main.T".to_string()))
    );
}

#[test]
fn test_same_name_in_different_packages() {
    let mut types = TypeRegistry::new();
    let int = types.basic(BasicKind::Int);
    let body = types.struct_(vec![Field::new("n", int)]);
    let a = types.named(Some("a"), "T", body);
    let b = types.named(Some("b"), "T", body);
    let mut program = program(&types);

    let a_ty = program.lower(a).unwrap();
    let b_ty = program.lower(b).unwrap();
    assert_ne!(a_ty.ir(), b_ty.ir());
    assert_eq!(program.ctx().struct_name(a_ty.ir()), Some("a.T"));
    assert_eq!(program.ctx().struct_name(b_ty.ir()), Some("b.T"));
}

#[test]
fn test_unqualified_names() {
    let mut types = TypeRegistry::new();
    let int = types.basic(BasicKind::Int);
    let body = types.struct_(vec![Field::new("n", int)]);
    let point = types.named(Some("geo"), "Point", body);
    let config = ProgramConfig {
        target: TargetSpec::PointerSize(8),
        qualify_named: false,
    };
    let mut program = Program::new(&types, &config).unwrap();

    let ty = program.lower(point).unwrap();
    assert_eq!(program.ctx().struct_name(ty.ir()), Some("Point"));
}

#[test]
fn test_missing_underlying_is_malformed() {
    let mut types = TypeRegistry::new();
    let (_, pending) = types.declare_named(Some("main"), "Pending");
    let mut program = program(&types);

    assert_eq!(
        program.lower(pending),
        Err(LowerError::Malformed(
            "main.Pending has no underlying type".to_string()
        ))
    );
}

#[test]
fn test_failed_body_is_not_cached() {
    let mut types = TypeRegistry::new();
    let string = types.basic(BasicKind::String);
    let map = types.map(string, string);
    let body = types.struct_(vec![Field::new("m", map)]);
    let holder = types.named(Some("main"), "Holder", body);
    let mut program = program(&types);

    assert_eq!(
        program.lower(holder),
        Err(LowerError::Unsupported("map[string]string".to_string()))
    );
    assert!(program.cached(holder).is_none());

    // A second attempt reuses the opaque struct instead of colliding with it.
    assert_eq!(
        program.lower(holder),
        Err(LowerError::Unsupported("map[string]string".to_string()))
    );
    assert_eq!(program.ctx().named_structs().count(), 1);
}

#[test]
fn test_by_value_recursion_has_no_layout() {
    let mut types = TypeRegistry::new();
    let (s, s_id) = types.declare_named(Some("main"), "S");
    let body = types.struct_(vec![Field::new("s", s_id)]);
    types.set_underlying(s, body).unwrap();
    let mut program = program(&types);

    let ty = program.lower(s_id).unwrap();
    assert!(matches!(
        program.ctx().size_of(ty.ir()),
        Err(LowerError::Layout(_))
    ));
}
