//! The resolver service and the state it keeps across resolutions.

use rustc_hash::{FxHashMap, FxHashSet};
use tide_ir::{ElementId, ExprId, Name};
use tide_program::{ContextualTypes, Program};
use tide_types::Type;

use crate::report::Sink;

/// Memoization key of an expression: the node, the element it is resolved
/// in and the contextual type it is resolved against.
pub(crate) type MemoKey = (ExprId, ElementId, Option<Type>);

/// Resolves syntax against a [`Program`], creating instances as needed.
///
/// Holds the program mutably for its lifetime; everything the resolver
/// creates lives in the program and outlives the resolver.
pub struct Resolver<'p, 'a> {
    pub(crate) program: &'p mut Program<'a>,
    /// Diagnostic destinations, innermost last. Empty means the program
    /// queue.
    pub(crate) sinks: Vec<Sink>,
    type_memo: FxHashMap<MemoKey, Type>,
    element_memo: FxHashMap<MemoKey, ElementId>,
    /// Derived classes waiting for a base that is still resolving its
    /// members.
    pub(crate) pending_derived: FxHashMap<ElementId, Vec<ElementId>>,
    /// Type aliases being expanded.
    pub(crate) resolving_aliases: FxHashSet<ElementId>,
}

impl<'p, 'a> Resolver<'p, 'a> {
    /// Resolver over an initialized program.
    pub fn new(program: &'p mut Program<'a>) -> Self {
        program.initialize();
        Resolver {
            program,
            sinks: Vec::new(),
            type_memo: FxHashMap::default(),
            element_memo: FxHashMap::default(),
            pending_derived: FxHashMap::default(),
            resolving_aliases: FxHashSet::default(),
        }
    }

    #[inline]
    pub fn program(&self) -> &Program<'a> {
        &*self.program
    }

    #[inline]
    pub fn program_mut(&mut self) -> &mut Program<'a> {
        &mut *self.program
    }

    /// Forget memoized expression results. Called between passes over the
    /// same bodies, since a pass may declare locals that change what a
    /// name refers to.
    pub fn begin_pass(&mut self) {
        self.type_memo.clear();
        self.element_memo.clear();
    }

    // === Memoization ===

    pub(crate) fn memoized_type(&self, key: &MemoKey) -> Option<Type> {
        self.type_memo.get(key).copied()
    }

    /// Remember a successful result. Results found inside a probe are not
    /// kept; the probe's assumptions may not hold for the real resolution.
    pub(crate) fn memoize_type(&mut self, key: MemoKey, ty: Type) {
        if !self.in_probe() {
            self.type_memo.insert(key, ty);
        }
    }

    pub(crate) fn memoized_element(&self, key: &MemoKey) -> Option<ElementId> {
        self.element_memo.get(key).copied()
    }

    pub(crate) fn memoize_element(&mut self, key: MemoKey, element: ElementId) {
        if !self.in_probe() {
            self.element_memo.insert(key, element);
        }
    }

    // === Small helpers ===

    /// Type-parameter bindings visible inside `scope`.
    pub(crate) fn scope_ctx(&self, scope: ElementId) -> ContextualTypes {
        self.program
            .contextual_types(scope)
            .cloned()
            .unwrap_or_default()
    }

    /// Display form of a type, for diagnostics.
    pub(crate) fn type_name(&self, ty: Type) -> String {
        ty.display(&*self.program).to_string()
    }

    pub(crate) fn element_name(&self, id: ElementId) -> String {
        self.program.name_of(id).to_owned()
    }

    #[inline]
    pub(crate) fn name_str(&self, name: Name) -> &'static str {
        self.program.str(name)
    }

    /// Implicit assignability under the program's hierarchy.
    #[inline]
    pub(crate) fn assignable(&self, from: Type, to: Type) -> bool {
        from.is_assignable_to(to, false, &*self.program)
    }
}
