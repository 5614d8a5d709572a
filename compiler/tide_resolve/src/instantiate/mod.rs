//! Creation and resolution of class, function and global instances.
//!
//! An instance is published in its prototype's cache before any of its
//! parts are resolved. Resolving those parts may request the same instance
//! again (a class whose field mentions the class, a generic that refers to
//! itself); the request finds the published instance and stops there.

use rustc_hash::FxHashSet;
use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::{
    BinaryOp, ClassDecl, CommonFlags, DecoratorFlags, ElementId, ExprArena, ExprKind, FunctionDecl,
    Name, OperatorKind, Statement, TypeNode,
};
use tide_program::{BlockFlow, ContextualTypes, ElementKind, ResolutionState};
use tide_stack::ensure_sufficient_stack;
use tide_types::{Signature, SignatureId, Type};
use tracing::{debug, trace};

use crate::type_args::UseSite;
use crate::{ReportMode, Resolver};

impl Resolver<'_, '_> {
    /// Instantiate a class prototype with the type arguments written at
    /// `site`.
    pub fn instantiate_class(
        &mut self,
        prototype: ElementId,
        nodes: &[TypeNode],
        site: UseSite<'_>,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let decl = self.program.class_prototype(prototype)?.decl;
        let (type_arguments, bindings) = self.resolve_type_arguments(
            prototype,
            &decl.type_params,
            nodes,
            site,
            ContextualTypes::new(),
            mode,
        )?;
        self.resolve_class(prototype, type_arguments, bindings)
    }

    /// The instance of a class prototype for `type_arguments`, created and
    /// resolved on first request.
    ///
    /// `ctx_types` are the bindings visible inside the instance, its own
    /// type parameters included. The instance's own failures are always
    /// reported; a failed instance stays cached and yields `None`.
    #[tracing::instrument(level = "debug", skip_all, fields(class = %self.program.internal_name(prototype)))]
    pub fn resolve_class(
        &mut self,
        prototype: ElementId,
        type_arguments: Vec<Type>,
        ctx_types: ContextualTypes,
    ) -> Option<ElementId> {
        ensure_sufficient_stack(|| {
            let key = self.program.instance_key(&type_arguments);
            if let Some(instance) = self.program.cached_instance(prototype, &key) {
                trace!(instance = %self.program.internal_name(instance), "class instance cache hit");
                self.replay_deferred(instance);
                return self.usable_class(instance);
            }
            let instance = self
                .program
                .publish_class_instance(prototype, type_arguments, ctx_types);
            if self.resolve_instance(instance, |r| r.resolve_class_parts(instance)) {
                Some(instance)
            } else {
                None
            }
        })
    }

    fn usable_class(&self, instance: ElementId) -> Option<ElementId> {
        match self.program.class(instance)?.state {
            ResolutionState::Failed => None,
            _ => Some(instance),
        }
    }

    fn set_class_state(&mut self, instance: ElementId, state: ResolutionState) {
        if let Some(data) = self.program.class_mut(instance) {
            data.state = state;
        }
        match state {
            ResolutionState::Resolved => self.program.element_mut(instance).flags |= CommonFlags::RESOLVED,
            ResolutionState::Failed => debug!(class = %self.program.internal_name(instance), "class failed"),
            _ => {}
        }
    }

    /// Resolve the base and interfaces, then the members unless the base is
    /// still resolving its own.
    fn resolve_class_parts(&mut self, instance: ElementId) -> bool {
        let Some(data) = self.program.class(instance) else {
            return false;
        };
        let prototype = data.prototype;
        let ctx = data.ctx_types.clone();
        let Some(decl) = self.program.class_prototype(prototype).map(|proto| proto.decl) else {
            return false;
        };
        self.set_class_state(instance, ResolutionState::ResolvingBase);

        let mut ok = true;
        let mut base = None;
        if let Some(extends) = &decl.extends {
            base = self.resolve_base(instance, extends, &ctx);
            ok &= base.is_some();
        }
        for node in &decl.implements {
            let Some(ty) = self.resolve_type(node, instance, &ctx, ReportMode::Report) else {
                ok = false;
                continue;
            };
            match ty.class_reference() {
                Some(interface) => {
                    if let Some(data) = self.program.class_mut(instance) {
                        data.interfaces.push(interface);
                    }
                }
                None => {
                    self.report(
                        ReportMode::Report,
                        Diagnostic::error(ErrorCode::OPERATION_NOT_SUPPORTED)
                            .with_args(["implements".to_owned(), self.type_name(ty)])
                            .with_label(node.span(), "not a class or interface"),
                    );
                    ok = false;
                }
            }
        }
        if !ok {
            self.set_class_state(instance, ResolutionState::Failed);
            return false;
        }
        if let Some(data) = self.program.class_mut(instance) {
            data.base = base;
        }
        self.set_class_state(instance, ResolutionState::ResolvingMembers);

        if let Some(base) = base {
            if self.program.class(base).is_some_and(|data| data.state.is_in_progress()) {
                debug!(
                    class = %self.program.internal_name(instance),
                    base = %self.program.internal_name(base),
                    "members deferred until base is resolved"
                );
                self.pending_derived.entry(base).or_default().push(instance);
                return true;
            }
        }
        self.finish_class(instance)
    }

    fn resolve_base(&mut self, instance: ElementId, node: &TypeNode, ctx: &ContextualTypes) -> Option<ElementId> {
        let ty = self.resolve_type(node, instance, ctx, ReportMode::Report)?;
        let Some(base) = ty.class_reference() else {
            self.report(
                ReportMode::Report,
                Diagnostic::error(ErrorCode::OPERATION_NOT_SUPPORTED)
                    .with_args(["extends".to_owned(), self.type_name(ty)])
                    .with_label(node.span(), "not a class"),
            );
            return None;
        };
        let base_state = self.program.class(base).map(|data| data.state);
        if base == instance || base_state == Some(ResolutionState::ResolvingBase) {
            debug!(class = %self.program.internal_name(instance), "cyclic base class");
            self.report(
                ReportMode::Report,
                Diagnostic::error(ErrorCode::CYCLIC_DEFINITION)
                    .with_args([self.element_name(instance)])
                    .with_label(node.span(), "base class depends on this class"),
            );
            return None;
        }
        let unmanaged = |id: ElementId| {
            self.program
                .element(id)
                .decorators
                .contains(DecoratorFlags::UNMANAGED)
        };
        if unmanaged(instance) != unmanaged(base) {
            self.report(
                ReportMode::Report,
                Diagnostic::error(ErrorCode::MANAGED_UNMANAGED_MIX)
                    .with_args([self.element_name(instance), self.element_name(base)])
                    .with_label(node.span(), "incompatible base class"),
            );
            return None;
        }
        Some(base)
    }

    /// Inherit from the base, lay out own fields, bind own methods,
    /// accessors, constructor and operators.
    fn finish_class(&mut self, instance: ElementId) -> bool {
        let Some(data) = self.program.class(instance) else {
            return false;
        };
        let (prototype, base, ctx) = (data.prototype, data.base, data.ctx_types.clone());
        let Some(proto) = self.program.class_prototype(prototype) else {
            return false;
        };
        let decl = proto.decl;
        let member_order = proto.member_order.clone();
        let constructor = proto.constructor;
        let mut operators: Vec<(OperatorKind, ElementId)> =
            proto.operators.iter().map(|(&op, &method)| (op, method)).collect();
        operators.sort_by_key(|&(_, method)| method);

        let mut next_offset = 0;
        if let Some(base) = base {
            let inherited = self.program.element(base).members.clone();
            self.program.element_mut(instance).members.extend(inherited);
            if let Some(base_data) = self.program.class(base).cloned() {
                next_offset = base_data.next_memory_offset;
                if let Some(data) = self.program.class_mut(instance) {
                    data.operators = base_data.operators;
                    data.constructor = base_data.constructor;
                }
            }
        }

        let mut ok = true;
        for member in member_order {
            match self.program.kind(member) {
                ElementKind::FieldPrototype => ok &= self.lay_out_field(instance, member, &ctx, &mut next_offset),
                ElementKind::FunctionPrototype | ElementKind::PropertyPrototype => {
                    if let Some(bound) = self.program.bind_prototype(member, instance) {
                        let name = self.program.element(member).name;
                        self.program.element_mut(instance).members.insert(name, bound);
                    }
                }
                _ => {}
            }
        }
        if let Some(constructor) = constructor.and_then(|ctor| self.program.bind_prototype(ctor, instance)) {
            if let Some(data) = self.program.class_mut(instance) {
                data.constructor = Some(constructor);
            }
        }
        for (op, method) in operators {
            if let Some(bound) = self.program.bind_prototype(method, instance) {
                if let Some(data) = self.program.class_mut(instance) {
                    data.operators.insert(op, bound);
                }
            }
        }
        let has_index = match self.program.class_mut(instance) {
            Some(data) => {
                data.next_memory_offset = next_offset;
                data.operators.contains_key(&OperatorKind::IndexedGet)
            }
            None => false,
        };
        if has_index {
            self.program.add_index_signature(instance);
        }
        if !decl.is_interface && !decl.flags.contains(CommonFlags::DECLARE) {
            self.check_field_initialization(instance, decl);
        }

        self.set_class_state(
            instance,
            if ok {
                ResolutionState::Resolved
            } else {
                ResolutionState::Failed
            },
        );
        debug!(class = %self.program.internal_name(instance), size = next_offset, "class resolved");

        if let Some(derived) = self.pending_derived.remove(&instance) {
            for class in derived {
                self.finish_class(class);
            }
        }
        ok
    }

    /// Give a field prototype a type and an offset aligned to its size. A
    /// field redeclared in a derived class keeps the inherited slot.
    fn lay_out_field(
        &mut self,
        class: ElementId,
        prototype: ElementId,
        ctx: &ContextualTypes,
        next_offset: &mut u32,
    ) -> bool {
        let name = self.program.element(prototype).name;
        if self
            .program
            .lookup_instance_member(class, name)
            .is_some_and(|existing| self.program.kind(existing) == ElementKind::Field)
        {
            return true;
        }
        let Some(source) = self.program.field_prototype(prototype).map(|data| data.decl) else {
            return false;
        };
        let ty = match (source.type_node(), source.initializer()) {
            (Some(node), _) => self.resolve_type(node, class, ctx, ReportMode::Report),
            (None, Some(init)) => {
                let flow = BlockFlow::new(class);
                self.resolve_expression(init, &flow, None, ReportMode::Report)
            }
            (None, None) => {
                let span = self.program.element(prototype).span;
                self.report(
                    ReportMode::Report,
                    Diagnostic::error(ErrorCode::TYPE_EXPECTED).with_label(span, "field type missing"),
                );
                None
            }
        };
        let Some(ty) = ty else {
            return false;
        };
        let size = ty.byte_size();
        let offset = next_offset.next_multiple_of(size.max(1));
        *next_offset = offset + size;
        self.program.add_field(class, prototype, ty, offset);
        true
    }

    /// Own fields of non-nullable reference type must be initialized: by an
    /// initializer, a `!` marker, a parameter property or a top-level
    /// `this.field = ...` in the constructor.
    fn check_field_initialization(&mut self, instance: ElementId, decl: &ClassDecl) {
        let assigned = decl
            .constructor()
            .map(|ctor| constructor_assignments(ctor, self.program.arena()))
            .unwrap_or_default();
        let fields = self
            .program
            .class(instance)
            .map(|data| data.fields.clone())
            .unwrap_or_default();
        for field in fields {
            let Some(data) = self.program.field(field) else {
                continue;
            };
            if !data.ty.is_reference() || data.ty.is_nullable() {
                continue;
            }
            let prototype = data.prototype;
            let Some(source) = self.program.field_prototype(prototype).map(|proto| proto.decl) else {
                continue;
            };
            let name = self.program.element(field).name;
            if source.initializer().is_some() || source.is_definitely_assigned() || assigned.contains(&name) {
                continue;
            }
            let span = self.program.element(field).span;
            self.report(
                ReportMode::Report,
                Diagnostic::error(ErrorCode::FIELD_NOT_INITIALIZED)
                    .with_args([self.name_str(name)])
                    .with_label(span, "not initialized"),
            );
        }
    }

    // === Functions ===

    /// The instance of a function prototype for `type_arguments`, created
    /// and given a signature on first request.
    ///
    /// `ctx_types` are the bindings of the enclosing context; bindings of
    /// a bound class and of the function's own type parameters are added.
    /// A function expression without annotations takes its parameter and
    /// return types from `contextual`.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %self.program.internal_name(prototype)))]
    pub fn resolve_function(
        &mut self,
        prototype: ElementId,
        type_arguments: Vec<Type>,
        ctx_types: &ContextualTypes,
        contextual: Option<SignatureId>,
    ) -> Option<ElementId> {
        ensure_sufficient_stack(|| {
            let key = self.program.instance_key(&type_arguments);
            if let Some(instance) = self.program.cached_instance(prototype, &key) {
                trace!(instance = %self.program.internal_name(instance), "function instance cache hit");
                self.replay_deferred(instance);
                return match self.program.function(instance)?.state {
                    ResolutionState::Failed => None,
                    _ => Some(instance),
                };
            }
            let data = self.program.function_prototype(prototype)?;
            let (decl, bound_class) = (data.decl, data.bound_class);
            let mut ctx = ctx_types.clone();
            if let Some(class) = bound_class {
                ctx.extend(self.scope_ctx(class));
            }
            for (param, &ty) in decl.type_params.iter().zip(&type_arguments) {
                ctx.insert(param.name, ty);
            }
            let instance = self
                .program
                .publish_function_instance(prototype, type_arguments, ctx);
            if self.resolve_instance(instance, |r| r.resolve_signature(instance, decl, bound_class, contextual)) {
                Some(instance)
            } else {
                None
            }
        })
    }

    fn resolve_signature(
        &mut self,
        instance: ElementId,
        decl: &FunctionDecl,
        bound_class: Option<ElementId>,
        contextual: Option<SignatureId>,
    ) -> bool {
        let ctx = self.scope_ctx(instance);
        let contextual: Option<Signature> = contextual.map(|id| self.program.signature_of(id).clone());
        if let Some(data) = self.program.function_mut(instance) {
            data.state = ResolutionState::ResolvingMembers;
        }

        let mut ok = true;
        let is_instance_member = self.program.element(instance).is_instance_member();
        let this_type = match (&decl.explicit_this, bound_class) {
            (Some(node), _) => {
                let ty = self.resolve_type(node, instance, &ctx, ReportMode::Report);
                ok &= ty.is_some();
                ty
            }
            (None, Some(class)) if is_instance_member || decl.flags.contains(CommonFlags::CONSTRUCTOR) => {
                Some(self.program.class_type(class))
            }
            (None, _) => contextual.as_ref().and_then(|signature| signature.this_type),
        };

        let mut params = Vec::with_capacity(decl.params.len());
        let mut locals = Vec::with_capacity(decl.params.len());
        for (index, param) in decl.params.iter().enumerate() {
            let ty = match &param.ty {
                Some(node) => self.resolve_type(node, instance, &ctx, ReportMode::Report),
                None => match contextual.as_ref().and_then(|signature| signature.params.get(index)) {
                    Some(&ty) => Some(ty),
                    None => {
                        self.report(
                            ReportMode::Report,
                            Diagnostic::error(ErrorCode::TYPE_EXPECTED)
                                .with_label(param.span, "parameter type missing"),
                        );
                        None
                    }
                },
            };
            match ty {
                Some(ty) => {
                    params.push(ty);
                    locals.push((param.name, ty, param.span));
                }
                None => ok = false,
            }
        }

        let ret = match &decl.return_type {
            Some(node) => self.resolve_type(node, instance, &ctx, ReportMode::Report),
            None => self.implicit_return_type(decl, bound_class, contextual.as_ref()),
        };
        let (true, Some(ret)) = (ok, ret) else {
            if let Some(data) = self.program.function_mut(instance) {
                data.state = ResolutionState::Failed;
            }
            debug!(function = %self.program.internal_name(instance), "function failed");
            return false;
        };

        let mut signature = Signature::new(params, ret).with_required(decl.required_params());
        if let Some(this_type) = this_type {
            signature = signature.with_this(this_type);
        }
        if decl.has_rest() {
            signature = signature.with_rest();
        }
        let signature = self.program.intern_signature(signature);
        if let Some(data) = self.program.function_mut(instance) {
            data.signature = Some(signature);
            data.state = ResolutionState::Resolved;
        }
        self.program.element_mut(instance).flags |= CommonFlags::RESOLVED;
        self.program.add_parameter_locals(instance, &locals);
        true
    }

    /// Return type of a function declared without one.
    fn implicit_return_type(
        &mut self,
        decl: &FunctionDecl,
        bound_class: Option<ElementId>,
        contextual: Option<&Signature>,
    ) -> Option<Type> {
        if decl.flags.contains(CommonFlags::CONSTRUCTOR) {
            if let Some(class) = bound_class {
                return Some(self.program.class_type(class));
            }
        } else if decl.flags.contains(CommonFlags::SET) {
            return Some(Type::VOID);
        } else if let Some(signature) = contextual {
            return Some(signature.ret);
        } else if !decl.body.as_deref().is_some_and(returns_value) {
            return Some(Type::VOID);
        }
        self.report(
            ReportMode::Report,
            Diagnostic::error(ErrorCode::TYPE_EXPECTED).with_label(decl.name_span, "return type missing"),
        );
        None
    }

    /// Signature of a resolved function instance.
    pub fn function_signature(&self, function: ElementId) -> Option<SignatureId> {
        self.program.function(function)?.signature
    }

    // === Globals ===

    /// Type of a global, from its annotation or else its initializer.
    #[tracing::instrument(level = "debug", skip_all, fields(global = %self.program.internal_name(global)))]
    pub fn resolve_global(&mut self, global: ElementId, mode: ReportMode) -> Option<Type> {
        let data = self.program.global(global)?;
        let (ty, decl, state) = (data.ty, data.decl, data.state);
        if ty.is_some() {
            self.replay_deferred(global);
            return ty;
        }
        match state {
            ResolutionState::Failed => {
                self.replay_deferred(global);
                return None;
            }
            state if state.is_in_progress() => {
                let span = self.program.element(global).span;
                self.report(
                    mode,
                    Diagnostic::error(ErrorCode::CYCLIC_DEFINITION)
                        .with_args([self.element_name(global)])
                        .with_label(span, "initializer depends on this global"),
                );
                return None;
            }
            _ => {}
        }
        self.set_global_state(global, ResolutionState::ResolvingMembers);

        let scope = self.program.element(global).parent.unwrap_or(global);
        let ty = self.resolve_instance(global, |r| {
            let ctx = r.scope_ctx(scope);
            let flow = BlockFlow::new(scope);
            match (decl.type_node(), decl.initializer()) {
                (Some(node), _) => r.resolve_type(node, scope, &ctx, ReportMode::Report),
                (None, Some(init)) => r.resolve_expression(init, &flow, None, ReportMode::Report),
                (None, None) => {
                    let span = r.program.element(global).span;
                    r.report(
                        ReportMode::Report,
                        Diagnostic::error(ErrorCode::TYPE_EXPECTED).with_label(span, "type annotation missing"),
                    );
                    None
                }
            }
        });

        match ty {
            Some(ty) => {
                if let Some(data) = self.program.global_mut(global) {
                    data.ty = Some(ty);
                }
                self.set_global_state(global, ResolutionState::Resolved);
            }
            None => self.set_global_state(global, ResolutionState::Failed),
        }
        ty
    }

    fn set_global_state(&mut self, global: ElementId, state: ResolutionState) {
        if let Some(data) = self.program.global_mut(global) {
            data.state = state;
        }
    }
}

/// Fields assigned by a top-level `this.field = ...` statement.
fn constructor_assignments(constructor: &FunctionDecl, arena: &ExprArena) -> FxHashSet<Name> {
    let Some(body) = &constructor.body else {
        return FxHashSet::default();
    };
    body.iter()
        .filter_map(|statement| match statement {
            Statement::Expression(expr) => Some(*expr),
            _ => None,
        })
        .filter_map(|expr| match &arena.get(expr).kind {
            ExprKind::Binary {
                op: BinaryOp::Assign,
                left,
                ..
            } => Some(*left),
            _ => None,
        })
        .filter_map(|target| match &arena.get(target).kind {
            ExprKind::PropertyAccess { target, property, .. }
                if matches!(arena.get(*target).kind, ExprKind::This) =>
            {
                Some(*property)
            }
            _ => None,
        })
        .collect()
}

/// Whether any `return` in `body` carries a value.
fn returns_value(body: &[Statement]) -> bool {
    body.iter().any(|statement| match statement {
        Statement::Return { value, .. } => value.is_some(),
        Statement::Block(inner) => returns_value(inner),
        Statement::If {
            then_branch,
            else_branch,
            ..
        } => {
            returns_value(std::slice::from_ref(then_branch))
                || else_branch
                    .as_deref()
                    .is_some_and(|branch| returns_value(std::slice::from_ref(branch)))
        }
        Statement::While { body, .. } => returns_value(std::slice::from_ref(body)),
        Statement::Expression(_) | Statement::Variable(_) => false,
    })
}

#[cfg(test)]
mod tests;
