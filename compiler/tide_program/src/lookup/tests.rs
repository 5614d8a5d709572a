#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use tide_ir::builder::Fixture;
use tide_ir::{CommonFlags, Item, Source};

use crate::element::ContextualTypes;
use crate::test_support::{find, program};

#[test]
fn test_nearest_scope_wins() {
    let fixture = Fixture::main(|b| {
        let inner = b.func("x").item();
        let other = b.func("y").item();
        vec![
            b.func("x").item(),
            Item::Namespace(b.namespace("ns", vec![inner, other])),
        ]
    });
    let program = program(&fixture);
    let ns = find(&program, "main/ns");
    let file = find(&program, "main");
    let x = program.intern("x");

    assert_eq!(program.lookup(ns, x), Some(find(&program, "main/ns.x")));
    assert_eq!(program.lookup(file, x), Some(find(&program, "main/x")));
    assert_eq!(program.lookup(file, program.intern("y")), None);
    assert_eq!(
        program.lookup_member(ns, program.intern("y")),
        Some(find(&program, "main/ns.y"))
    );
}

#[test]
fn test_class_instances_see_base_statics() {
    let fixture = Fixture::main(|b| {
        vec![
            b.class("Base")
                .method(b.func("create").flags(CommonFlags::STATIC))
                .item(),
            b.class("Derived").item(),
        ]
    });
    let mut program = program(&fixture);
    let base_proto = find(&program, "main/Base");
    let derived_proto = find(&program, "main/Derived");
    let base = program.publish_class_instance(base_proto, Vec::new(), ContextualTypes::new());
    let derived = program.publish_class_instance(derived_proto, Vec::new(), ContextualTypes::new());
    program.class_mut(derived).expect("class").base = Some(base);

    let create = program.intern("create");
    assert_eq!(program.lookup_static(derived, create), Some(find(&program, "main/Base.create")));
    assert_eq!(program.lookup(derived, create), Some(find(&program, "main/Base.create")));
    assert_eq!(program.lookup_static(base, program.intern("missing")), None);
}

#[test]
fn test_instance_members_are_not_lexically_visible() {
    let fixture = Fixture::main(|b| {
        let i32_ty = b.ty("i32");
        let field = b.field("value", i32_ty);
        vec![b.class("Box").field(field).item()]
    });
    let mut program = program(&fixture);
    let proto = find(&program, "main/Box");
    let class = program.publish_class_instance(proto, Vec::new(), ContextualTypes::new());
    let value = program.intern("value");
    let field = find(&program, "main/Box#value");
    program.element_mut(class).members.insert(value, field);

    assert_eq!(program.lookup_instance_member(class, value), Some(field));
    assert_eq!(program.lookup(class, value), None);
}

#[test]
fn test_export_star_cycles_terminate() {
    let fixture = Fixture::build(|b| {
        let a = Source::new("a", vec![b.export_star("b")]);
        let b_file = Source::new("b", vec![b.export_star("a")]);
        vec![a, b_file]
    });
    let program = program(&fixture);

    assert_eq!(program.lookup_export(find(&program, "a"), program.intern("nothing")), None);
}
