//! Type-argument inference for calls and `new` expressions.
//!
//! Argument types are resolved without a contextual type and unified with
//! the declared, still generic parameter types. Untyped function
//! expressions are held back until the parameters they depend on are
//! known, then resolved against the partially instantiated parameter type.

use smallvec::SmallVec;
use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::{ElementId, ExprId, ExprKind, Parameter, ParameterKind, TypeNode, TypeParameter};
use tide_program::{ContextualTypes, Flow};
use tide_types::{common_denominator, SignatureId, Type};
use tracing::trace;

use crate::expr::CallSite;
use crate::type_args::UseSite;
use crate::{ReportMode, Resolver};

impl Resolver<'_, '_> {
    /// The function instance a call to `prototype` resolves to.
    ///
    /// Explicit type arguments are resolved at the call; omitted ones are
    /// inferred from the arguments. Non-generic prototypes resolve
    /// directly.
    pub fn maybe_infer_call(
        &mut self,
        call: ExprId,
        prototype: ElementId,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let site = CallSite::of(self.program.arena(), call)?;
        self.instantiate_call(prototype, site, flow, mode)
    }

    pub(crate) fn instantiate_call(
        &mut self,
        prototype: ElementId,
        site: CallSite<'_>,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let data = self.program.function_prototype(prototype)?;
        let (decl, generic) = (data.decl, data.is_generic());
        let outer = self
            .program
            .element(prototype)
            .parent
            .map(|parent| self.scope_ctx(parent))
            .unwrap_or_default();
        let span = self.program.arena().span(site.expr);

        let type_arguments = match (generic, site.type_args) {
            (false, None) => Vec::new(),
            (false, Some(nodes)) if nodes.is_empty() => Vec::new(),
            (false, Some(nodes)) => {
                self.report(
                    mode,
                    Diagnostic::error(ErrorCode::WRONG_TYPE_ARGUMENT_COUNT)
                        .with_args(["0".to_owned(), nodes.len().to_string()])
                        .with_label(span, "function is not generic"),
                );
                return None;
            }
            (true, Some(nodes)) => {
                let scope_ctx = self.scope_ctx(flow.scope());
                let use_site = UseSite::new(flow.scope(), &scope_ctx, span);
                self.resolve_type_arguments(prototype, &decl.type_params, nodes, use_site, outer.clone(), mode)?
                    .0
            }
            (true, None) => self.infer_type_arguments(
                prototype,
                &decl.type_params,
                &decl.params,
                site,
                flow,
                &outer,
                mode,
            )?,
        };
        self.resolve_function(prototype, type_arguments, &outer, None)
    }

    /// Infer the type arguments of `generic` from the arguments at `site`.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(level = "trace", skip_all, fields(generic = %self.program.internal_name(generic)))]
    pub(crate) fn infer_type_arguments(
        &mut self,
        generic: ElementId,
        type_params: &[TypeParameter],
        params: &[Parameter],
        site: CallSite<'_>,
        flow: &dyn Flow,
        outer: &ContextualTypes,
        mode: ReportMode,
    ) -> Option<Vec<Type>> {
        let span = self.program.arena().span(site.expr);
        let mut inferred = ContextualTypes::new();
        let mut deferred: SmallVec<[(&TypeNode, ExprId); 2]> = SmallVec::new();

        for (param, &arg) in params.iter().zip(site.args) {
            let Some(node) = &param.ty else {
                continue;
            };
            if param.kind == ParameterKind::Rest || !node.mentions_any(type_params) {
                continue;
            }
            if self.is_untyped_function_expression(arg) {
                deferred.push((node, arg));
                continue;
            }
            let arg_ty = self.resolve_expression(arg, flow, None, mode)?;
            self.unify(node, arg_ty, type_params, &mut inferred);
        }

        for (node, arg) in deferred {
            let mut ctx = outer.clone();
            ctx.extend(inferred.iter().map(|(&name, &ty)| (name, ty)));
            let Some(contextual) = self.contextual_signature(node, generic, &ctx) else {
                continue;
            };
            let arg_ty = self.resolve_expression(arg, flow, Some(Type::function(contextual)), mode)?;
            self.unify(node, arg_ty, type_params, &mut inferred);
        }

        let mut folded = outer.clone();
        let mut types = Vec::with_capacity(type_params.len());
        for param in type_params {
            let ty = match (inferred.get(&param.name), &param.default) {
                (Some(&ty), _) => ty,
                (None, Some(default)) => self.resolve_type(default, generic, &folded, mode)?,
                (None, None) => {
                    self.report(
                        mode,
                        Diagnostic::error(ErrorCode::CANNOT_INFER_TYPE_ARGUMENTS)
                            .with_args([self.name_str(param.name).to_owned(), self.element_name(generic)])
                            .with_label(span, "type argument cannot be inferred")
                            .with_related(param.span, "type parameter declared here"),
                    );
                    return None;
                }
            };
            folded.insert(param.name, ty);
            if !self.check_type_argument_bound(generic, param, ty, &folded, span, mode) {
                return None;
            }
            types.push(ty);
        }
        trace!(count = types.len(), "type arguments inferred");
        Some(types)
    }

    /// Function expression missing a parameter or return annotation.
    fn is_untyped_function_expression(&self, expr: ExprId) -> bool {
        match &self.program.arena().get(expr).kind {
            ExprKind::Function(decl) => {
                decl.return_type.is_none() || decl.params.iter().any(|param| param.ty.is_none())
            }
            _ => false,
        }
    }

    /// Signature of a function-type parameter with the bindings known so
    /// far, if it no longer mentions unbound type parameters.
    fn contextual_signature(
        &mut self,
        node: &TypeNode,
        generic: ElementId,
        ctx: &ContextualTypes,
    ) -> Option<SignatureId> {
        if !matches!(node, TypeNode::Function(_)) {
            return None;
        }
        let (ty, _) = self.probe(|r| r.resolve_type(node, generic, ctx, ReportMode::Swallow));
        ty?.signature_reference()
    }

    /// Bind the type parameters `node` mentions by matching it against
    /// `arg`. Conflicting bindings widen to their common denominator.
    fn unify(&self, node: &TypeNode, arg: Type, type_params: &[TypeParameter], inferred: &mut ContextualTypes) {
        match node {
            TypeNode::Named(named) if named.name.is_simple() && named.type_args.is_empty() => {
                let name = named.name.first();
                if !type_params.iter().any(|param| param.name == name) {
                    return;
                }
                let ty = if named.nullable { arg.non_nullable() } else { arg };
                match inferred.get(&name).copied() {
                    None => {
                        inferred.insert(name, ty);
                    }
                    Some(previous) if previous != ty => {
                        if let Some(common) = common_denominator(previous, ty, false, &*self.program) {
                            inferred.insert(name, common);
                        }
                    }
                    Some(_) => {}
                }
            }
            TypeNode::Named(named) => {
                let Some(class) = arg.class_reference() else {
                    return;
                };
                let wanted = named.name.last();
                let matched = self.program.base_chain(class).find_map(|id| {
                    let data = self.program.class(id)?;
                    (self.program.element(data.prototype).name == wanted).then_some(data)
                });
                if let Some(data) = matched {
                    for (arg_node, &ty) in named.type_args.iter().zip(&data.type_arguments) {
                        self.unify(arg_node, ty, type_params, inferred);
                    }
                }
            }
            TypeNode::Function(func) => {
                let Some(signature) = arg.signature_reference() else {
                    return;
                };
                let signature = self.program.signature_of(signature);
                for (param, &ty) in func.params.iter().zip(&signature.params) {
                    if let Some(param_node) = &param.ty {
                        self.unify(param_node, ty, type_params, inferred);
                    }
                }
                self.unify(&func.ret, signature.ret, type_params, inferred);
            }
        }
    }
}

#[cfg(test)]
mod tests;
