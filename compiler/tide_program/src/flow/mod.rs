//! The scoping interface the resolver consumes while walking bodies.

use rustc_hash::FxHashMap;
use tide_ir::{CommonFlags, DecoratorFlags, ElementId, Name, Span};
use tide_types::Type;

use crate::element::{Element, ElementData, ElementKind, LocalData};
use crate::mangle::{self, MemberPosition};
use crate::Program;

/// Block-scoped locals visible at a point in a body.
///
/// The resolver asks the flow first and falls back to lexical lookup from
/// [`Flow::scope`].
pub trait Flow {
    /// Function instance (or file, for top-level code) the flow runs in.
    fn scope(&self) -> ElementId;

    /// Local declared in the current block or an enclosing block of the
    /// same function.
    fn lookup_local(&self, name: Name) -> Option<ElementId>;

    /// Any element the flow itself knows about by name.
    fn lookup(&self, name: Name) -> Option<ElementId> {
        self.lookup_local(name)
    }
}

/// A flow with a stack of block scopes.
#[derive(Clone, Debug)]
pub struct BlockFlow {
    scope: ElementId,
    blocks: Vec<FxHashMap<Name, ElementId>>,
}

impl BlockFlow {
    /// Flow with one empty block.
    pub fn new(scope: ElementId) -> Self {
        BlockFlow {
            scope,
            blocks: vec![FxHashMap::default()],
        }
    }

    /// Flow for the body of a resolved function, with its parameters in
    /// the outermost block.
    pub fn for_function(program: &Program<'_>, function: ElementId) -> Self {
        let mut flow = BlockFlow::new(function);
        if let Some(data) = program.function(function) {
            for &param in &data.params {
                flow.declare(program.element(param).name, param);
            }
        }
        flow
    }

    pub fn enter_block(&mut self) {
        self.blocks.push(FxHashMap::default());
    }

    /// Leave the innermost block. The outermost block is never left.
    pub fn exit_block(&mut self) {
        if self.blocks.len() > 1 {
            self.blocks.pop();
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    fn declare(&mut self, name: Name, local: ElementId) {
        if let Some(block) = self.blocks.last_mut() {
            block.insert(name, local);
        }
    }

    /// Allocate a local in the program and declare it in the innermost
    /// block, shadowing outer declarations of the same name.
    pub fn add_local(&mut self, program: &mut Program<'_>, name: Name, ty: Type, span: Span) -> ElementId {
        let index = match program.function_mut(self.scope) {
            Some(data) => {
                let index = data.local_count;
                data.local_count += 1;
                index
            }
            None => 0,
        };
        let local = new_local(program, self.scope, name, ty, index, span);
        self.declare(name, local);
        local
    }
}

impl Flow for BlockFlow {
    fn scope(&self) -> ElementId {
        self.scope
    }

    fn lookup_local(&self, name: Name) -> Option<ElementId> {
        self.blocks
            .iter()
            .rev()
            .find_map(|block| block.get(&name).copied())
    }
}

/// Allocate a local element owned by `function`.
pub(crate) fn new_local(
    program: &mut Program<'_>,
    function: ElementId,
    name: Name,
    ty: Type,
    index: u32,
    span: Span,
) -> ElementId {
    let internal_name = mangle::member(
        program.internal_name(function),
        MemberPosition::Inner,
        program.str(name),
    );
    let element = Element::new(ElementKind::Local, name, internal_name, ElementData::Local(LocalData { ty, index }))
        .with_parent(function)
        .with_flags(CommonFlags::LET, DecoratorFlags::empty())
        .with_span(span);
    program.alloc(element)
}

impl Program<'_> {
    /// Create the parameter locals of a function instance, in order.
    pub fn add_parameter_locals(&mut self, function: ElementId, params: &[(Name, Type, Span)]) -> Vec<ElementId> {
        let locals: Vec<ElementId> = params
            .iter()
            .enumerate()
            .map(|(index, &(name, ty, span))| {
                new_local(self, function, name, ty, u32::try_from(index).unwrap_or(u32::MAX), span)
            })
            .collect();
        if let Some(data) = self.function_mut(function) {
            data.params.clone_from(&locals);
            data.local_count = u32::try_from(locals.len()).unwrap_or(u32::MAX);
        }
        locals
    }
}

#[cfg(test)]
mod tests;
