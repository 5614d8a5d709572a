#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use tide_diagnostic::ErrorCode;
use tide_ir::builder::{AstBuilder, Fixture};
use tide_ir::{CommonFlags, DecoratorFlags, Item, TypeNode};
use tide_program::{ContextualTypes, ResolutionState};
use tide_types::Type;

use crate::test_support::{codes, find, global_type, program, show};
use crate::Resolver;

fn global(b: &mut AstBuilder<'_>, name: &str, ty: TypeNode) -> Item {
    Item::Variable(b.var(name, Some(ty), None))
}

fn field_named(resolver: &Resolver<'_, '_>, class: tide_ir::ElementId, name: &str) -> (Type, u32) {
    let program = resolver.program();
    let field = program
        .lookup_instance_member(class, program.intern(name))
        .expect("field");
    let data = program.field(field).expect("field data");
    (data.ty, data.offset)
}

#[test]
fn test_cyclic_base_reported_once() {
    let fixture = Fixture::main(|b| {
        let to_b = b.ty("B");
        let to_a = b.ty("A");
        let a = b.class("A").extends(to_b).item();
        let class_b = b.class("B").extends(to_a).item();
        let x = b.ty("A");
        let y = b.ty("B");
        vec![a, class_b, global(b, "x", x), global(b, "y", y)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);
    let a = find(resolver.program(), "main/A");

    assert_eq!(global_type(&mut resolver, "main/x"), None);
    assert_eq!(global_type(&mut resolver, "main/y"), None);
    assert_eq!(codes(resolver.program()), vec![ErrorCode::CYCLIC_DEFINITION]);

    let instance = resolver.program().cached_instance(a, "").expect("published");
    assert_eq!(
        resolver.program().class(instance).expect("class").state,
        ResolutionState::Failed
    );
}

#[test]
fn test_self_base_is_cyclic() {
    let fixture = Fixture::main(|b| {
        let own = b.ty("Loop");
        let class = b.class("Loop").extends(own).item();
        let x = b.ty("Loop");
        vec![class, global(b, "x", x)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/x"), None);
    assert_eq!(codes(resolver.program()), vec![ErrorCode::CYCLIC_DEFINITION]);
}

#[test]
fn test_managed_and_unmanaged_do_not_mix() {
    let fixture = Fixture::main(|b| {
        let raw = b.class("Raw").decorators(DecoratorFlags::UNMANAGED).item();
        let base = b.ty("Raw");
        let derived = b.class("Managed").extends(base).item();
        let x = b.ty("Managed");
        vec![raw, derived, global(b, "x", x)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/x"), None);
    assert_eq!(codes(resolver.program()), vec![ErrorCode::MANAGED_UNMANAGED_MIX]);
}

#[test]
fn test_field_layout_and_inheritance() {
    let fixture = Fixture::main(|b| {
        let fields = [("a", "u8"), ("b", "i32"), ("c", "u8")]
            .map(|(name, ty)| {
                let ty = b.ty(ty);
                b.field(name, ty)
            });
        let [fa, fb, fc] = fields;
        let get = {
            let ret = b.ty("i32");
            b.func("get").returns(ret)
        };
        let base = b.class("Base").field(fa).field(fb).field(fc).method(get).item();
        let d_ty = b.ty("i64");
        let d = b.field("d", d_ty);
        let extends = b.ty("Base");
        let derived = b.class("Derived").extends(extends).field(d).item();
        let x = b.ty("Derived");
        vec![base, derived, global(b, "x", x)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    let derived = global_type(&mut resolver, "main/x")
        .and_then(Type::class_reference)
        .expect("derived");
    let base = resolver.program().class(derived).and_then(|data| data.base).expect("base");

    assert_eq!(field_named(&resolver, base, "a"), (Type::U8, 0));
    assert_eq!(field_named(&resolver, base, "b"), (Type::I32, 4));
    assert_eq!(field_named(&resolver, base, "c"), (Type::U8, 8));
    assert_eq!(field_named(&resolver, derived, "d"), (Type::I64, 16));
    assert_eq!(resolver.program().class(base).expect("base").next_memory_offset, 9);
    assert_eq!(resolver.program().class(derived).expect("derived").next_memory_offset, 24);

    let program = resolver.program();
    let a = program.intern("a");
    assert_eq!(
        program.lookup_instance_member(derived, a),
        program.lookup_instance_member(base, a)
    );
    let get = program
        .lookup_instance_member(derived, program.intern("get"))
        .expect("inherited method");
    assert_eq!(program.internal_name(get), "main/Base#get");
    assert!(program.element(derived).flags.contains(CommonFlags::RESOLVED));
}

#[test]
fn test_uninitialized_reference_fields() {
    let fixture = Fixture::main(|b| {
        let thing = b.class("Thing").item();
        let fields = ["assigned", "missing", "marked"].map(|name| {
            let ty = b.ty("Thing");
            b.field(name, ty)
        });
        let [assigned, missing, mut marked] = fields;
        marked.flags |= CommonFlags::DEFINITELY_ASSIGNED;
        let optional = {
            let inner = b.ty("Thing");
            let ty = AstBuilder::nullable(inner);
            b.field("optional", ty)
        };
        let constructor = {
            let this = b.this();
            let target = b.prop(this, "assigned");
            let value = b.new_("Thing", Vec::new());
            let assign = b.assign(target, value);
            b.constructor().body(vec![AstBuilder::expr_stmt(assign)])
        };
        let holder = b
            .class("Holder")
            .field(assigned)
            .field(missing)
            .field(marked)
            .field(optional)
            .method(constructor)
            .item();
        let x = b.ty("Holder");
        vec![thing, holder, global(b, "x", x)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    let holder = global_type(&mut resolver, "main/x").expect("class still resolves");
    assert!(holder.class_reference().is_some());
    assert_eq!(codes(resolver.program()), vec![ErrorCode::FIELD_NOT_INITIALIZED]);
    let diagnostic = resolver.program().diagnostics().peek().next().expect("diagnostic");
    assert_eq!(diagnostic.args[0], "missing");
}

#[test]
fn test_function_instances_per_type_arguments() {
    let fixture = Fixture::main(|b| {
        let t = b.type_param("T");
        let param_ty = b.ty("T");
        let ret = b.ty("T");
        let x = b.param("x", param_ty);
        let value = b.ident("x");
        let body = vec![b.ret(value)];
        vec![b.func("identity").type_param(t).param(x).returns(ret).body(body).item()]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);
    let prototype = find(resolver.program(), "main/identity");

    let ctx = ContextualTypes::new();
    let narrow = resolver.resolve_function(prototype, vec![Type::I32], &ctx, None).expect("i32");
    let wide = resolver.resolve_function(prototype, vec![Type::I64], &ctx, None).expect("i64");
    let again = resolver.resolve_function(prototype, vec![Type::I32], &ctx, None).expect("cached");
    assert_ne!(narrow, wide);
    assert_eq!(narrow, again);
    assert_eq!(resolver.program().internal_name(narrow), "main/identity<i32>");

    let signature = resolver.function_signature(narrow).expect("signature");
    assert_eq!(
        show(resolver.program(), Type::function(signature)),
        "(i32) => i32"
    );
    let params = &resolver.program().function(narrow).expect("function").params;
    assert_eq!(params.len(), 1);
}

#[test]
fn test_methods_and_constructors_take_this() {
    let fixture = Fixture::main(|b| {
        let method = b.func("run");
        let stat = b.func("make").flags(CommonFlags::STATIC);
        let ctor = b.constructor();
        let class = b.class("Job").method(method).method(stat).method(ctor).item();
        let x = b.ty("Job");
        vec![class, global(b, "x", x)]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);
    let job = global_type(&mut resolver, "main/x").expect("class");
    let class = job.class_reference().expect("class");
    let ctx = ContextualTypes::new();

    let run = resolver
        .program()
        .lookup_instance_member(class, resolver.program().intern("run"))
        .expect("run");
    let run = resolver.resolve_function(run, Vec::new(), &ctx, None).expect("instance");
    let signature = resolver.program().signature_of(resolver.function_signature(run).expect("sig"));
    assert_eq!(signature.this_type, Some(job));
    assert_eq!(signature.ret, Type::VOID);

    let make = find(resolver.program(), "main/Job.make");
    let make = resolver.resolve_function(make, Vec::new(), &ctx, None).expect("static");
    let signature = resolver.program().signature_of(resolver.function_signature(make).expect("sig"));
    assert_eq!(signature.this_type, None);

    let ctor = resolver.program().class(class).and_then(|data| data.constructor).expect("ctor");
    let ctor = resolver.resolve_function(ctor, Vec::new(), &ctx, None).expect("ctor instance");
    let signature = resolver.program().signature_of(resolver.function_signature(ctor).expect("sig"));
    assert_eq!(signature.this_type, Some(job));
    assert_eq!(signature.ret, job);
}

#[test]
fn test_missing_return_type() {
    let fixture = Fixture::main(|b| {
        let quiet = b.func("quiet").item();
        let value = b.int(1);
        let body = vec![b.ret(value)];
        let loud = b.func("loud").body(body).item();
        vec![quiet, loud]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);
    let ctx = ContextualTypes::new();

    let quiet = find(resolver.program(), "main/quiet");
    let quiet = resolver.resolve_function(quiet, Vec::new(), &ctx, None).expect("void");
    let ret = resolver.program().signature_of(resolver.function_signature(quiet).expect("sig")).ret;
    assert_eq!(ret, Type::VOID);

    let loud = find(resolver.program(), "main/loud");
    assert_eq!(resolver.resolve_function(loud, Vec::new(), &ctx, None), None);
    assert_eq!(resolver.resolve_function(loud, Vec::new(), &ctx, None), None);
    assert_eq!(codes(resolver.program()), vec![ErrorCode::TYPE_EXPECTED]);
}

#[test]
fn test_globals_resolve_lazily_and_detect_cycles() {
    let fixture = Fixture::main(|b| {
        let late_ref = b.ident("late");
        let early = Item::Variable(b.var("early", None, Some(late_ref)));
        let late_ty = b.ty("i64");
        let late = global(b, "late", late_ty);
        let to_pong = b.ident("pong");
        let ping = Item::Variable(b.var("ping", None, Some(to_pong)));
        let to_ping = b.ident("ping");
        let pong = Item::Variable(b.var("pong", None, Some(to_ping)));
        vec![early, late, ping, pong]
    });
    let mut program = program(&fixture);
    let mut resolver = Resolver::new(&mut program);

    assert_eq!(global_type(&mut resolver, "main/early"), Some(Type::I64));
    assert_eq!(global_type(&mut resolver, "main/ping"), None);
    assert_eq!(global_type(&mut resolver, "main/pong"), None);
    assert_eq!(codes(resolver.program()), vec![ErrorCode::CYCLIC_DEFINITION]);
}
