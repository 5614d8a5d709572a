#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use tide_ir::builder::Fixture;
use tide_types::Type;

use crate::element::{ContextualTypes, ElementKind, ResolutionState};
use crate::test_support::{find, program};

fn generic_box() -> Fixture {
    Fixture::main(|b| {
        let t = b.type_param("T");
        let t_ty = b.ty("T");
        let i32_ty = b.ty("i32");
        let value = b.field("value", t_ty.clone());
        let getter = b.getter("size", i32_ty.clone());
        let setter = b.setter("size", i32_ty.clone());
        let p1 = b.param("x", i32_ty);
        let p2 = b.param("x", t_ty.clone());
        vec![b
            .class("Box")
            .type_param(t)
            .field(value)
            .method(b.func("get").returns(t_ty))
            .method(b.func("put").param(p1))
            .method(b.func("put").param(p2))
            .method(getter)
            .method(setter)
            .item()]
    })
}

#[test]
fn test_instances_are_cached_by_key() {
    let fixture = generic_box();
    let mut program = program(&fixture);
    let proto = find(&program, "main/Box");

    let boxed = program.publish_class_instance(proto, vec![Type::I32], ContextualTypes::new());
    assert_eq!(program.instance_key(&[Type::I32]), "i32");
    assert_eq!(program.cached_instance(proto, "i32"), Some(boxed));
    assert_eq!(program.name_of(boxed), "Box<i32>");
    assert_eq!(program.internal_name(boxed), "main/Box<i32>");
    assert_eq!(program.kind(boxed), ElementKind::Class);
    assert_eq!(program.class(boxed).expect("class").state, ResolutionState::Pending);
    assert_eq!(program.element(boxed).parent, program.element(proto).parent);

    let wide = program.publish_class_instance(proto, vec![Type::I64], ContextualTypes::new());
    assert_ne!(wide, boxed);
    assert_eq!(program.instance_count(proto), 2);
    assert_eq!(program.element_by_internal_name("main/Box<i64>"), Some(wide));
}

#[test]
fn test_nested_instance_names_use_canonical_arguments() {
    let fixture = generic_box();
    let mut program = program(&fixture);
    let proto = find(&program, "main/Box");
    let inner = program.publish_class_instance(proto, vec![Type::I32], ContextualTypes::new());
    let outer = program.publish_class_instance(
        proto,
        vec![program.class_type(inner).as_nullable()],
        ContextualTypes::new(),
    );

    assert_eq!(program.name_of(outer), "Box<Box<i32> | null>");
    assert_eq!(program.internal_name(outer), "main/Box<main/Box<i32> | null>");
}

#[test]
fn test_bind_prototype_is_memoized_and_binds_overloads() {
    let fixture = generic_box();
    let mut program = program(&fixture);
    let proto = find(&program, "main/Box");
    let boxed = program.publish_class_instance(proto, vec![Type::I32], ContextualTypes::new());

    let get = find(&program, "main/Box#get");
    let bound = program.bind_prototype(get, boxed).expect("bindable");
    assert_eq!(program.bind_prototype(get, boxed), Some(bound));
    assert_eq!(program.internal_name(bound), "main/Box<i32>#get");
    let data = program.function_prototype(bound).expect("function prototype");
    assert_eq!(data.bound_class, Some(boxed));
    assert_eq!(data.unbound, Some(get));
    assert_eq!(program.element(bound).parent, Some(boxed));

    let put = find(&program, "main/Box#put");
    let bound_put = program.bind_prototype(put, boxed).expect("bindable");
    let overloads = program
        .function_prototype(bound_put)
        .expect("function prototype")
        .overloads
        .clone();
    assert_eq!(
        overloads,
        vec![bound_put, find(&program, "main/Box<i32>#put|1")]
    );
}

#[test]
fn test_bind_property_binds_accessors() {
    let fixture = generic_box();
    let mut program = program(&fixture);
    let proto = find(&program, "main/Box");
    let boxed = program.publish_class_instance(proto, vec![Type::I32], ContextualTypes::new());

    let size = find(&program, "main/Box#size");
    let bound = program.bind_prototype(size, boxed).expect("bindable");
    assert_eq!(program.kind(bound), ElementKind::Property);
    let data = program.property(bound).expect("property");
    assert_eq!(data.getter, Some(find(&program, "main/Box<i32>#get:size")));
    assert_eq!(data.setter, Some(find(&program, "main/Box<i32>#set:size")));
}

#[test]
fn test_fields_are_not_bindable() {
    let fixture = generic_box();
    let mut program = program(&fixture);
    let proto = find(&program, "main/Box");
    let boxed = program.publish_class_instance(proto, vec![Type::I32], ContextualTypes::new());
    assert_eq!(program.bind_prototype(find(&program, "main/Box#value"), boxed), None);
}

#[test]
fn test_function_instances() {
    let fixture = Fixture::main(|b| {
        let t = b.type_param("T");
        vec![b.func("identity").type_param(t).item()]
    });
    let mut program = program(&fixture);
    let proto = find(&program, "main/identity");

    let mut ctx = ContextualTypes::new();
    ctx.insert(program.intern("T"), Type::F64);
    let instance = program.publish_function_instance(proto, vec![Type::F64], ctx);
    assert_eq!(program.internal_name(instance), "main/identity<f64>");
    assert_eq!(program.cached_instance(proto, "f64"), Some(instance));
    let data = program.function(instance).expect("function");
    assert_eq!(data.prototype, proto);
    assert_eq!(data.ctx_types.get(&program.intern("T")), Some(&Type::F64));
}

#[test]
fn test_fields_and_index_signature_attach_to_instance() {
    let fixture = generic_box();
    let mut program = program(&fixture);
    let proto = find(&program, "main/Box");
    let boxed = program.publish_class_instance(proto, vec![Type::I32], ContextualTypes::new());

    let value = program.add_field(boxed, find(&program, "main/Box#value"), Type::I32, 0);
    assert_eq!(program.internal_name(value), "main/Box<i32>#value");
    assert_eq!(program.lookup_instance_member(boxed, program.intern("value")), Some(value));
    assert_eq!(program.class(boxed).expect("class").fields, vec![value]);

    let index = program.add_index_signature(boxed);
    assert_eq!(program.kind(index), ElementKind::IndexSignature);
    assert_eq!(program.class(boxed).expect("class").index_signature, Some(index));
}
