#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use tide_diagnostic::ErrorCode;
use tide_ir::builder::{AstBuilder, Fixture};
use tide_ir::{Item, OperatorKind, TypeNode};
use tide_types::Type;

use crate::test_support::{codes, find, global_type, program, show};
use crate::Resolver;

fn global(b: &mut AstBuilder<'_>, name: &str, ty: TypeNode) -> Item {
    Item::Variable(b.var(name, Some(ty), None))
}

fn map_class(b: &mut AstBuilder<'_>) -> Item {
    let k = b.type_param("K");
    let v = b.type_param("V");
    let v_ty = b.ty("V");
    let value = b.field("value", v_ty);
    b.class("Map").type_param(k).type_param(v).field(value).item()
}

fn map_of(b: &mut AstBuilder<'_>, key: &str, value: &str) -> TypeNode {
    let key = b.ty(key);
    let value = b.ty(value);
    b.generic("Map", vec![key, value])
}

#[test]
fn test_builtin_names() {
    let fixture = Fixture::main(|b| {
        let ty = b.ty("i64");
        let number = b.ty("number");
        vec![global(b, "a", ty), global(b, "b", number)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);
    assert_eq!(global_type(&mut resolver, "main/a"), Some(Type::I64));
    assert_eq!(global_type(&mut resolver, "main/b"), Some(Type::F64));
}

#[test]
fn test_instances_are_distinct_per_type_arguments() {
    let fixture = Fixture::main(|b| {
        let string = b.class("String").item();
        let map = map_class(b);
        let a = map_of(b, "string", "i32");
        let wide = map_of(b, "string", "i64");
        let again = map_of(b, "String", "i32");
        vec![
            string,
            map,
            global(b, "a", a),
            global(b, "wide", wide),
            global(b, "again", again),
        ]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    let a = global_type(&mut resolver, "main/a").expect("a");
    let wide = global_type(&mut resolver, "main/wide").expect("wide");
    let again = global_type(&mut resolver, "main/again").expect("again");
    assert_ne!(a, wide);
    assert_eq!(a, again);
    assert_eq!(show(resolver.program(), a), "Map<String,i32>");

    let instance = find(resolver.program(), "main/Map<main/String,i32>");
    assert_eq!(a.class_reference(), Some(instance));
    assert!(codes(resolver.program()).is_empty());
}

#[test]
fn test_self_referencing_generic_terminates() {
    let fixture = Fixture::main(|b| {
        let t = b.type_param("T");
        let t_ty = b.ty("T");
        let next_ty = {
            let arg = b.ty("T");
            AstBuilder::nullable(b.generic("Node", vec![arg]))
        };
        let value = b.field("value", t_ty);
        let next = b.field("next", next_ty);
        let node = b.class("Node").type_param(t).field(value).field(next).item();
        let arg = b.ty("i32");
        let annotation = b.generic("Node", vec![arg]);
        vec![node, global(b, "head", annotation)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    let head = global_type(&mut resolver, "main/head").expect("head");
    let class = head.class_reference().expect("class");
    let next = resolver
        .program()
        .lookup_instance_member(class, resolver.program().intern("next"))
        .expect("next");
    let next_ty = resolver.program().field(next).expect("field").ty;
    assert_eq!(next_ty, head.as_nullable());
    assert_eq!(resolver.program().instance_count(find(resolver.program(), "main/Node")), 1);
}

#[test]
fn test_missing_and_surplus_type_arguments() {
    let fixture = Fixture::main(|b| {
        let map = map_class(b);
        let bare = b.ty("Map");
        let one = {
            let arg = b.ty("i32");
            b.generic("Map", vec![arg])
        };
        let three = {
            let args = vec![b.ty("i32"), b.ty("i32"), b.ty("i32")];
            b.generic("Map", args)
        };
        vec![map, global(b, "bare", bare), global(b, "one", one), global(b, "three", three)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/bare"), None);
    assert_eq!(global_type(&mut resolver, "main/one"), None);
    assert_eq!(global_type(&mut resolver, "main/three"), None);
    assert_eq!(
        codes(resolver.program()),
        vec![
            ErrorCode::MISSING_TYPE_ARGUMENTS,
            ErrorCode::WRONG_TYPE_ARGUMENT_COUNT,
            ErrorCode::WRONG_TYPE_ARGUMENT_COUNT,
        ]
    );
}

#[test]
fn test_defaults_see_earlier_arguments() {
    let fixture = Fixture::main(|b| {
        let first = b.type_param("A");
        let second = {
            let default = b.ty("A");
            b.type_param_with("B", None, Some(default))
        };
        let pair = b.class("Pair").type_param(first).type_param(second).item();
        let arg = b.ty("i64");
        let annotation = b.generic("Pair", vec![arg]);
        vec![pair, global(b, "p", annotation)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    let pair = global_type(&mut resolver, "main/p").expect("pair");
    let class = resolver.program().class(pair.class_reference().expect("class")).expect("data");
    assert_eq!(class.type_arguments, vec![Type::I64, Type::I64]);
}

#[test]
fn test_bound_violation() {
    let fixture = Fixture::main(|b| {
        let base = b.class("Base").item();
        let t = {
            let bound = b.ty("Base");
            b.type_param_with("T", Some(bound), None)
        };
        let holder = b.class("Holder").type_param(t).item();
        let bad = {
            let arg = b.ty("i32");
            b.generic("Holder", vec![arg])
        };
        let good = {
            let arg = b.ty("Base");
            b.generic("Holder", vec![arg])
        };
        vec![base, holder, global(b, "bad", bad), global(b, "good", good)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/bad"), None);
    assert!(global_type(&mut resolver, "main/good").is_some());
    assert_eq!(codes(resolver.program()), vec![ErrorCode::TYPE_CONSTRAINT_VIOLATION]);
}

#[test]
fn test_alias_cycle_reported_once() {
    let fixture = Fixture::main(|b| {
        let to_b = b.ty("B");
        let to_a = b.ty("A");
        let a = Item::TypeAlias(b.type_alias("A", Vec::new(), to_b));
        let alias_b = Item::TypeAlias(b.type_alias("B", Vec::new(), to_a));
        let annotation = b.ty("A");
        vec![a, alias_b, global(b, "x", annotation)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/x"), None);
    assert_eq!(codes(resolver.program()), vec![ErrorCode::CYCLIC_DEFINITION]);
}

#[test]
fn test_generic_alias_expands_in_its_own_scope() {
    let fixture = Fixture::main(|b| {
        let map = map_class(b);
        let t = b.type_param("T");
        let target = map_of(b, "i32", "T");
        let alias = Item::TypeAlias(b.type_alias("ByIndex", vec![t], target));
        let annotation = {
            let arg = b.ty("f64");
            b.generic("ByIndex", vec![arg])
        };
        vec![map, alias, global(b, "m", annotation)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    let ty = global_type(&mut resolver, "main/m").expect("alias");
    assert_eq!(show(resolver.program(), ty), "Map<i32,f64>");
}

#[test]
fn test_value_types_reject_null() {
    let fixture = Fixture::main(|b| {
        let annotation = {
            let inner = b.ty("i32");
            AstBuilder::nullable(inner)
        };
        vec![global(b, "x", annotation)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/x"), None);
    assert_eq!(codes(resolver.program()), vec![ErrorCode::BASIC_TYPE_NOT_NULLABLE]);
}

#[test]
fn test_function_types() {
    let fixture = Fixture::main(|b| {
        let annotation = {
            let a_ty = b.ty("i32");
            let b_ty = b.ty("f64");
            let params = vec![b.param("a", a_ty), b.optional_param("b", b_ty)];
            let ret = b.ty("void");
            b.fn_type(params, ret)
        };
        vec![global(b, "f", annotation)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    let ty = global_type(&mut resolver, "main/f").expect("function type");
    assert_eq!(show(resolver.program(), ty), "(i32, f64?) => void");
    let signature = resolver.program().signature_of(ty.signature_reference().expect("signature"));
    assert_eq!(signature.required_params, 1);
}

#[test]
fn test_pseudo_types() {
    let fixture = Fixture::main(|b| {
        let index = b.ty("i32");
        let element = b.ty("f32");
        let param = b.param("i", index);
        let getter = b.operator("get", OperatorKind::IndexedGet).param(param).returns(element);
        let vector = b.class("Vec").method(getter).item();
        let value_of = {
            let arg = b.ty("Vec");
            b.generic("valueof", vec![arg])
        };
        let index_of = {
            let arg = b.ty("Vec");
            b.generic("indexof", vec![arg])
        };
        let return_of = {
            let ret = b.ty("f64");
            let func = b.fn_type(Vec::new(), ret);
            b.generic("returnof", vec![func])
        };
        let non_null = {
            let inner = b.ty("Vec");
            let arg = AstBuilder::nullable(inner);
            b.generic("nonnull", vec![arg])
        };
        let missing = {
            let arg = b.ty("i32");
            b.generic("valueof", vec![arg])
        };
        vec![
            vector,
            global(b, "v", value_of),
            global(b, "i", index_of),
            global(b, "r", return_of),
            global(b, "n", non_null),
            global(b, "missing", missing),
        ]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/v"), Some(Type::F32));
    assert_eq!(global_type(&mut resolver, "main/i"), Some(Type::I32));
    assert_eq!(global_type(&mut resolver, "main/r"), Some(Type::F64));
    let non_null = global_type(&mut resolver, "main/n").expect("nonnull");
    assert!(!non_null.is_nullable());
    assert_eq!(show(resolver.program(), non_null), "Vec");
    assert_eq!(global_type(&mut resolver, "main/missing"), None);
    assert_eq!(codes(resolver.program()), vec![ErrorCode::INDEX_SIGNATURE_MISSING]);
}

#[test]
fn test_qualified_enum_and_non_type_names() {
    let fixture = Fixture::main(|b| {
        let inner = b.class("Inner").item();
        let ns = Item::Namespace(b.namespace("ns", vec![inner]));
        let color = Item::Enum(b.enum_("Color", &["Red", "Green"]));
        let func = b.func("f").item();
        let qualified = b.qualified(&["ns", "Inner"], Vec::new());
        let enum_ty = b.ty("Color");
        let not_a_type = b.ty("f");
        let unknown = b.ty("Nope");
        vec![
            ns,
            color,
            func,
            global(b, "q", qualified),
            global(b, "c", enum_ty),
            global(b, "f_ty", not_a_type),
            global(b, "u", unknown),
        ]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    let q = global_type(&mut resolver, "main/q").expect("qualified");
    assert_eq!(show(resolver.program(), q), "Inner");
    assert_eq!(global_type(&mut resolver, "main/c"), Some(Type::I32));
    assert_eq!(global_type(&mut resolver, "main/f_ty"), None);
    assert_eq!(global_type(&mut resolver, "main/u"), None);
    assert_eq!(
        codes(resolver.program()),
        vec![ErrorCode::NOT_A_TYPE, ErrorCode::NOT_FOUND]
    );
}
