#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use tide_diagnostic::ErrorCode;
use tide_ir::builder::{AstBuilder, Fixture};
use tide_ir::{CommonFlags, DecoratorFlags, Item, Source};

use crate::element::ElementKind;
use crate::test_support::{find, program};

fn i32_fn(b: &mut AstBuilder<'_>, name: &str, ty: &str) -> Item {
    let t = b.ty(ty);
    let p = b.param("x", t);
    let ret = b.ty("void");
    b.func(name).param(p).returns(ret).item()
}

#[test]
fn test_registers_top_level_declarations() {
    let fixture = Fixture::main(|b| {
        let init = b.int(1);
        let i32_ty = b.ty("i32");
        vec![
            b.class("Foo").item(),
            b.func("f").item(),
            Item::Variable(b.var("x", None, Some(init))),
            Item::TypeAlias(b.type_alias("Int", vec![], i32_ty)),
        ]
    });
    let program = program(&fixture);

    assert!(program.diagnostics().is_empty());
    assert_eq!(program.kind(find(&program, "main")), ElementKind::File);
    assert_eq!(program.kind(find(&program, "main/Foo")), ElementKind::ClassPrototype);
    assert_eq!(program.kind(find(&program, "main/f")), ElementKind::FunctionPrototype);
    assert_eq!(program.kind(find(&program, "main/x")), ElementKind::Global);
    assert_eq!(program.kind(find(&program, "main/Int")), ElementKind::TypeDefinition);
    assert_eq!(
        program.element(find(&program, "main/Foo")).parent,
        Some(find(&program, "main"))
    );
}

#[test]
fn test_duplicate_declaration_reported_once() {
    let fixture = Fixture::main(|b| vec![b.class("Foo").item(), b.func("Foo").item()]);
    let program = program(&fixture);

    assert_eq!(program.diagnostics().count_code(ErrorCode::DUPLICATE_ELEMENT), 1);
    assert_eq!(program.kind(find(&program, "main/Foo")), ElementKind::ClassPrototype);
}

#[test]
fn test_overloads_form_a_set() {
    let fixture = Fixture::main(|b| vec![i32_fn(b, "f", "i32"), i32_fn(b, "f", "i64")]);
    let program = program(&fixture);

    assert!(program.diagnostics().is_empty());
    let head = find(&program, "main/f");
    let second = find(&program, "main/f|1");
    let data = program.function_prototype(head).expect("function prototype");
    assert_eq!(data.overloads, vec![head, second]);
    let file = find(&program, "main");
    assert_eq!(program.lookup(file, program.intern("f")), Some(head));
}

#[test]
fn test_identical_overload_is_duplicate() {
    let fixture = Fixture::main(|b| vec![i32_fn(b, "f", "i32"), i32_fn(b, "f", "i32")]);
    let program = program(&fixture);

    assert_eq!(program.diagnostics().count_code(ErrorCode::DUPLICATE_ELEMENT), 1);
    assert!(program.element_by_internal_name("main/f|1").is_none());
}

#[test]
fn test_class_members_are_split_by_namespace() {
    let fixture = Fixture::main(|b| {
        let i32_ty = b.ty("i32");
        let field = b.field("count", i32_ty.clone());
        let prop = b.param_property("size", i32_ty.clone(), CommonFlags::READONLY);
        vec![b
            .class("Foo")
            .field(field)
            .method(b.constructor().param(prop))
            .method(b.func("create").flags(CommonFlags::STATIC))
            .method(b.func("run"))
            .method(b.getter("value", i32_ty.clone()))
            .method(b.setter("value", i32_ty))
            .item()]
    });
    let program = program(&fixture);
    assert!(program.diagnostics().is_empty());

    let class = find(&program, "main/Foo");
    let proto = program.class_prototype(class).expect("class prototype");
    let name = |s| program.intern(s);

    assert_eq!(
        program.element(class).members.get(&name("create")),
        Some(&find(&program, "main/Foo.create"))
    );
    assert!(program.element(class).members.get(&name("run")).is_none());
    assert_eq!(proto.instance_members.get(&name("run")), Some(&find(&program, "main/Foo#run")));
    assert_eq!(proto.constructor, Some(find(&program, "main/Foo#constructor")));

    let size = find(&program, "main/Foo#size");
    assert!(program.element(size).is(CommonFlags::PARAMETER_PROPERTY | CommonFlags::READONLY));
    assert_eq!(
        proto.member_order,
        vec![
            find(&program, "main/Foo#count"),
            size,
            find(&program, "main/Foo#run"),
            find(&program, "main/Foo#value"),
        ]
    );

    let property = program
        .property_prototype(find(&program, "main/Foo#value"))
        .expect("property prototype");
    assert_eq!(property.getter, Some(find(&program, "main/Foo#get:value")));
    assert_eq!(property.setter, Some(find(&program, "main/Foo#set:value")));
}

#[test]
fn test_operator_methods_are_recorded() {
    let fixture = Fixture::main(|b| {
        vec![b
            .class("Vec2")
            .method(b.operator("add", tide_ir::OperatorKind::Add))
            .item()]
    });
    let program = program(&fixture);

    let proto = program
        .class_prototype(find(&program, "main/Vec2"))
        .expect("class prototype");
    assert_eq!(
        proto.operators.get(&tide_ir::OperatorKind::Add),
        Some(&find(&program, "main/Vec2#add"))
    );
}

#[test]
fn test_namespace_merges_into_class() {
    let fixture = Fixture::main(|b| {
        let helper = b.func("helper").item();
        vec![b.class("Foo").item(), Item::Namespace(b.namespace("Foo", vec![helper]))]
    });
    let program = program(&fixture);

    assert!(program.diagnostics().is_empty());
    let class = find(&program, "main/Foo");
    assert_eq!(
        program.lookup_member(class, program.intern("helper")),
        Some(find(&program, "main/Foo.helper"))
    );
}

#[test]
fn test_namespaces_merge() {
    let fixture = Fixture::main(|b| {
        let a = b.func("a").item();
        let c = b.func("c").item();
        vec![
            Item::Namespace(b.namespace("ns", vec![a])),
            Item::Namespace(b.namespace("ns", vec![c])),
        ]
    });
    let program = program(&fixture);

    assert!(program.diagnostics().is_empty());
    let ns = find(&program, "main/ns");
    assert_eq!(program.element(ns).members.len(), 2);
    find(&program, "main/ns.c");
}

#[test]
fn test_enum_values_are_numbered() {
    let fixture = Fixture::main(|b| {
        let mut decl = b.enum_("Color", &["Red", "Green", "Blue"]);
        decl.values[1].initializer = Some(b.int(5));
        vec![Item::Enum(decl)]
    });
    let program = program(&fixture);

    let value = |path| match &program.element(find(&program, path)).data {
        crate::ElementData::EnumValue(data) => data.value,
        _ => panic!("not an enum value"),
    };
    assert_eq!(value("main/Color.Red"), 0);
    assert_eq!(value("main/Color.Green"), 5);
    assert_eq!(value("main/Color.Blue"), 6);
}

#[test]
fn test_imports_follow_export_stars() {
    let fixture = Fixture::build(|b| {
        let lib = Source::new("lib", vec![b.class("Foo").flags(CommonFlags::EXPORT).item()]);
        let mid = Source::new("mid", vec![b.export_star("lib")]);
        let main = Source::new("main", vec![b.import("mid", &[("Foo", "Bar")])]);
        vec![main, mid, lib]
    });
    let program = program(&fixture);

    assert!(program.diagnostics().is_empty());
    let main = find(&program, "main");
    assert_eq!(
        program.lookup(main, program.intern("Bar")),
        Some(find(&program, "lib/Foo"))
    );
}

#[test]
fn test_reexport_chains_resolve_to_fixpoint() {
    let fixture = Fixture::build(|b| {
        let main = Source::new("main", vec![b.import("a", &[("X", "X")])]);
        let a = Source::new("a", vec![b.export(Some("b"), &[("Y", "X")])]);
        let inner = b.func("inner").item();
        let b_file = Source::new("b", vec![inner, b.export(None, &[("inner", "Y")])]);
        vec![main, a, b_file]
    });
    let program = program(&fixture);

    assert!(program.diagnostics().is_empty());
    assert_eq!(
        program.lookup(find(&program, "main"), program.intern("X")),
        Some(find(&program, "b/inner"))
    );
}

#[test]
fn test_namespace_import_binds_file() {
    let fixture = Fixture::build(|b| {
        let lib = Source::new("lib", vec![b.func("f").flags(CommonFlags::EXPORT).item()]);
        let main = Source::new("main", vec![b.import_namespace("lib", "lib")]);
        vec![lib, main]
    });
    let program = program(&fixture);

    let ns = program
        .lookup(find(&program, "main"), program.intern("lib"))
        .expect("namespace import");
    assert_eq!(ns, find(&program, "lib"));
    assert_eq!(program.lookup_member(ns, program.intern("f")), Some(find(&program, "lib/f")));
}

#[test]
fn test_unresolvable_imports_are_reported() {
    let fixture = Fixture::build(|b| {
        let lib = Source::new("lib", vec![b.func("f").item()]);
        let main = Source::new(
            "main",
            vec![b.import("lib", &[("f", "f")]), b.import("missing", &[("g", "g")])],
        );
        vec![lib, main]
    });
    let program = program(&fixture);

    assert_eq!(program.diagnostics().count_code(ErrorCode::IMPORT_NOT_FOUND), 1);
    assert_eq!(program.diagnostics().count_code(ErrorCode::FILE_NOT_FOUND), 1);
}

#[test]
fn test_global_decorator_registers_globally() {
    let fixture = Fixture::build(|b| {
        let lib = Source::new(
            "lib",
            vec![b.func("trace").decorators(DecoratorFlags::GLOBAL).item()],
        );
        let main = Source::new("main", vec![b.func("main").item()]);
        vec![lib, main]
    });
    let program = program(&fixture);

    let main_fn = find(&program, "main/main");
    assert_eq!(
        program.lookup(main_fn, program.intern("trace")),
        Some(find(&program, "lib/trace"))
    );
}

#[test]
fn test_initialize_is_idempotent() {
    let fixture = Fixture::main(|b| vec![b.class("Foo").item()]);
    let mut program = program(&fixture);
    let count = program.element_count();
    program.initialize();
    assert_eq!(program.element_count(), count);
}

#[test]
fn test_expressions_register_once_per_expression() {
    let mut exprs = Vec::new();
    let fixture = Fixture::main(|b| {
        let lambda = b.func("").build();
        exprs.push(b.function_expr(lambda));
        let class = b.class("Local").field({
            let ty = b.ty("i32");
            b.field("x", ty)
        });
        exprs.push(b.expr(tide_ir::ExprKind::Class(Box::new(class.build()))));
        Vec::new()
    });
    let mut program = program(&fixture);
    let file = find(&program, "main");
    let (tide_ir::ExprKind::Function(lambda), tide_ir::ExprKind::Class(class)) =
        (&fixture.arena.get(exprs[0]).kind, &fixture.arena.get(exprs[1]).kind)
    else {
        panic!("unexpected expression kinds");
    };

    let function = program.register_function_expression(file, exprs[0], lambda);
    assert_eq!(program.register_function_expression(file, exprs[0], lambda), function);
    assert_eq!(program.internal_name(function), "main~anonymous|0");
    assert_eq!(program.name_of(function), "anonymous");
    assert_eq!(program.kind(function), ElementKind::FunctionPrototype);

    let class_element = program.register_class_expression(file, exprs[1], class);
    assert_eq!(program.internal_name(class_element), "main~Local|1");
    assert_eq!(program.kind(class_element), ElementKind::ClassPrototype);
    assert_eq!(program.element(class_element).parent, Some(file));
    assert!(program.lookup(file, program.intern("Local")).is_none());
}
