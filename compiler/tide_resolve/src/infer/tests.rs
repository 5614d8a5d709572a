#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use tide_diagnostic::ErrorCode;
use tide_ir::builder::{AstBuilder, Fixture};
use tide_ir::{ExprId, Item};
use tide_program::BlockFlow;
use tide_types::Type;

use crate::test_support::{codes, find, global_type, program};
use crate::{ReportMode, Resolver};

fn init(b: &mut AstBuilder<'_>, name: &str, value: ExprId) -> Item {
    Item::Variable(b.var(name, None, Some(value)))
}

fn call(b: &mut AstBuilder<'_>, callee: &str, args: Vec<ExprId>) -> ExprId {
    let callee = b.ident(callee);
    b.call(callee, args)
}

/// `function name<T>(x: T): T { return x }`
fn identity(b: &mut AstBuilder<'_>, name: &str) -> Item {
    let t = b.type_param("T");
    let param_ty = b.ty("T");
    let ret = b.ty("T");
    let x = b.param("x", param_ty);
    let value = b.ident("x");
    let body = vec![b.ret(value)];
    b.func(name).type_param(t).param(x).returns(ret).body(body).item()
}

#[test]
fn test_identity_infers_from_argument() {
    let mut direct = None;
    let fixture = Fixture::main(|b| {
        let id = identity(b, "identity");
        let int = b.int(5);
        let by_int = call(b, "identity", vec![int]);
        direct = Some(by_int);
        let float = b.float(2.5);
        let by_float = call(b, "identity", vec![float]);
        let explicit = {
            let callee = b.ident("identity");
            let arg = b.int(5);
            let ty = b.ty("i64");
            b.call_generic(callee, vec![ty], vec![arg])
        };
        vec![
            id,
            init(b, "a", by_int),
            init(b, "b", by_float),
            init(b, "c", explicit),
        ]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);
    let prototype = find(resolver.program(), "main/identity");

    assert_eq!(global_type(&mut resolver, "main/a"), Some(Type::I32));
    assert_eq!(global_type(&mut resolver, "main/b"), Some(Type::F64));
    assert_eq!(global_type(&mut resolver, "main/c"), Some(Type::I64));
    assert!(codes(resolver.program()).is_empty());

    let file = resolver.program().file("main").expect("file");
    let flow = BlockFlow::new(file);
    let instance = resolver
        .maybe_infer_call(direct.expect("call"), prototype, &flow, ReportMode::Report)
        .expect("instance");
    assert_eq!(resolver.program().internal_name(instance), "main/identity<i32>");
}

#[test]
fn test_uninferable_parameter_uses_default_or_fails() {
    let fixture = Fixture::main(|b| {
        let make = {
            let t = b.type_param("T");
            let ret = b.ty("T");
            b.func("make").type_param(t).returns(ret).bodiless().item()
        };
        let make_or = {
            let default = b.ty("u16");
            let t = b.type_param_with("T", None, Some(default));
            let ret = b.ty("T");
            b.func("makeOr").type_param(t).returns(ret).bodiless().item()
        };
        let bare = call(b, "make", Vec::new());
        let defaulted = call(b, "makeOr", Vec::new());
        vec![make, make_or, init(b, "bare", bare), init(b, "defaulted", defaulted)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/bare"), None);
    assert_eq!(global_type(&mut resolver, "main/defaulted"), Some(Type::U16));
    assert_eq!(codes(resolver.program()), vec![ErrorCode::CANNOT_INFER_TYPE_ARGUMENTS]);
    let diagnostic = resolver.program().diagnostics().peek().next().expect("diagnostic");
    assert!(diagnostic.related_span().is_some());
}

#[test]
fn test_inference_through_generic_class() {
    let fixture = Fixture::main(|b| {
        let boxed = {
            let t = b.type_param("T");
            let ty = b.ty("T");
            let value = b.field("value", ty);
            b.class("Box").type_param(t).field(value).item()
        };
        let first = {
            let t = b.type_param("T");
            let arg = b.ty("T");
            let param_ty = b.generic("Box", vec![arg]);
            let param = b.param("b", param_ty);
            let ret = b.ty("T");
            b.func("first").type_param(t).param(param).returns(ret).bodiless().item()
        };
        let holder = {
            let arg = b.ty("i64");
            let ty = b.generic("Box", vec![arg]);
            Item::Variable(b.var("held", Some(ty), None))
        };
        let held = b.ident("held");
        let unwrapped = call(b, "first", vec![held]);
        vec![boxed, first, holder, init(b, "value", unwrapped)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/value"), Some(Type::I64));
    assert!(codes(resolver.program()).is_empty());
}

#[test]
fn test_conflicting_bindings_widen() {
    let fixture = Fixture::main(|b| {
        let pick = {
            let t = b.type_param("T");
            let a_ty = b.ty("T");
            let b_ty = b.ty("T");
            let ret = b.ty("T");
            let a = b.param("a", a_ty);
            let second = b.param("b", b_ty);
            b.func("pick").type_param(t).param(a).param(second).returns(ret).bodiless().item()
        };
        let int = b.int(1);
        let float = b.float(2.5);
        let picked = call(b, "pick", vec![int, float]);
        vec![pick, init(b, "p", picked)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/p"), Some(Type::F64));
    assert!(codes(resolver.program()).is_empty());
}

#[test]
fn test_inferred_argument_must_satisfy_bound() {
    let fixture = Fixture::main(|b| {
        let narrow = {
            let bound = b.ty("f32");
            let t = b.type_param_with("T", Some(bound), None);
            let param_ty = b.ty("T");
            let x = b.param("x", param_ty);
            let ret = b.ty("T");
            b.func("narrow").type_param(t).param(x).returns(ret).bodiless().item()
        };
        let arg = b.int(5);
        let narrowed = call(b, "narrow", vec![arg]);
        vec![narrow, init(b, "n", narrowed)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/n"), None);
    assert_eq!(codes(resolver.program()), vec![ErrorCode::TYPE_CONSTRAINT_VIOLATION]);
}

#[test]
fn test_untyped_function_expression_is_typed_from_inferred_parameters() {
    let fixture = Fixture::main(|b| {
        let apply = {
            let t = b.type_param("T");
            let x_ty = b.ty("T");
            let x = b.param("x", x_ty);
            let f_ty = {
                let v_ty = b.ty("T");
                let v = b.param("v", v_ty);
                let ret = b.ty("T");
                b.fn_type(vec![v], ret)
            };
            let f = b.param("f", f_ty);
            let ret = b.ty("T");
            b.func("apply").type_param(t).param(x).param(f).returns(ret).bodiless().item()
        };
        let lambda = {
            let v = b.untyped_param("v");
            let value = b.ident("v");
            let body = vec![b.ret(value)];
            let decl = b.func("").param(v).body(body).build();
            b.function_expr(decl)
        };
        let arg = b.int(3);
        let applied = call(b, "apply", vec![arg, lambda]);
        vec![apply, init(b, "r", applied)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/r"), Some(Type::I32));
    assert!(codes(resolver.program()).is_empty());
    let lambda = find(resolver.program(), "main~anonymous|0");
    assert_eq!(resolver.program().name_of(lambda), "anonymous");
}

#[test]
fn test_type_arguments_on_plain_function() {
    let fixture = Fixture::main(|b| {
        let plain = b.func("plain").bodiless().item();
        let generic_call = {
            let callee = b.ident("plain");
            let ty = b.ty("i32");
            b.call_generic(callee, vec![ty], Vec::new())
        };
        vec![plain, init(b, "x", generic_call)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/x"), None);
    assert_eq!(codes(resolver.program()), vec![ErrorCode::WRONG_TYPE_ARGUMENT_COUNT]);
}
