#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use tide_ir::builder::Fixture;
use tide_types::{NameStyle, Type, TypeContext};

use crate::element::ContextualTypes;
use crate::test_support::{find, program};

#[test]
fn test_subtyping_follows_bases_and_interfaces() {
    let fixture = Fixture::main(|b| {
        vec![
            b.interface("Shape").item(),
            b.class("Base").item(),
            b.class("Derived").item(),
            b.class("Other").item(),
        ]
    });
    let mut program = program(&fixture);
    let mut instance = |path: &str| {
        let proto = find(&program, path);
        program.publish_class_instance(proto, Vec::new(), ContextualTypes::new())
    };
    let shape = instance("main/Shape");
    let base = instance("main/Base");
    let derived = instance("main/Derived");
    let other = instance("main/Other");
    program.class_mut(base).expect("class").interfaces.push(shape);
    program.class_mut(derived).expect("class").base = Some(base);

    assert_eq!(program.base_chain(derived).collect::<Vec<_>>(), vec![derived, base]);
    assert!(program.extends_class(derived, base));
    assert!(!program.extends_class(base, derived));
    assert!(program.is_subtype_of(derived, shape));
    assert!(!program.is_subtype_of(other, shape));

    let derived_ty = program.class_type(derived);
    let shape_ty = program.class_type(shape);
    assert!(derived_ty.is_assignable_to(shape_ty, true, &program));
    assert!(!shape_ty.is_assignable_to(derived_ty, true, &program));
}

#[test]
fn test_class_names_for_display() {
    let fixture = Fixture::main(|b| {
        let t = b.type_param("T");
        vec![b.class("Box").type_param(t).item()]
    });
    let mut program = program(&fixture);
    let proto = find(&program, "main/Box");
    let boxed = program.publish_class_instance(proto, vec![Type::U8], ContextualTypes::new());

    assert_eq!(program.class_name(boxed, NameStyle::Display), "Box<u8>");
    assert_eq!(program.class_name(boxed, NameStyle::Internal), "main/Box<u8>");
    assert_eq!(program.class_type(boxed).display(&program).to_string(), "Box<u8>");
}

#[test]
fn test_base_chain_is_bounded() {
    let fixture = Fixture::main(|b| vec![b.class("A").item()]);
    let mut program = program(&fixture);
    let proto = find(&program, "main/A");
    let a = program.publish_class_instance(proto, Vec::new(), ContextualTypes::new());
    program.class_mut(a).expect("class").base = Some(a);

    assert!(program.base_chain(a).count() <= program.element_count());
}
