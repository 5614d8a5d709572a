#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use tide_ir::builder::Fixture;
use tide_ir::Span;
use tide_types::Type;

use super::*;
use crate::element::ContextualTypes;
use crate::test_support::{find, program};

#[test]
fn test_blocks_shadow_and_restore() {
    let fixture = Fixture::main(|b| vec![b.func("f").item()]);
    let mut program = program(&fixture);
    let proto = find(&program, "main/f");
    let function = program.publish_function_instance(proto, Vec::new(), ContextualTypes::new());
    let x = program.intern("x");

    let mut flow = BlockFlow::new(function);
    let outer = flow.add_local(&mut program, x, Type::I32, Span::DUMMY);
    flow.enter_block();
    let inner = flow.add_local(&mut program, x, Type::F64, Span::DUMMY);
    assert_eq!(flow.lookup_local(x), Some(inner));
    assert_eq!(flow.depth(), 2);
    flow.exit_block();
    assert_eq!(flow.lookup(x), Some(outer));

    flow.exit_block();
    assert_eq!(flow.depth(), 1);
    assert_eq!(program.local(inner).expect("local").index, 1);
    assert_eq!(program.local(inner).expect("local").ty, Type::F64);
    assert_eq!(program.internal_name(outer), "main/f~x");
}

#[test]
fn test_function_flow_starts_with_parameters() {
    let fixture = Fixture::main(|b| vec![b.func("f").item()]);
    let mut program = program(&fixture);
    let proto = find(&program, "main/f");
    let function = program.publish_function_instance(proto, Vec::new(), ContextualTypes::new());
    let (a, b) = (program.intern("a"), program.intern("b"));
    let params = program.add_parameter_locals(
        function,
        &[(a, Type::I32, Span::DUMMY), (b, Type::I64, Span::DUMMY)],
    );

    let mut flow = BlockFlow::for_function(&program, function);
    assert_eq!(flow.scope(), function);
    assert_eq!(flow.lookup_local(b), Some(params[1]));

    let c = program.intern("c");
    let local = flow.add_local(&mut program, c, Type::BOOL, Span::DUMMY);
    assert_eq!(program.local(local).expect("local").index, 2);
}
