//! Calls and `new` expressions.

use smallvec::SmallVec;
use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::{CommonFlags, ElementId, ExprArena, ExprId, ExprKind, Span, TypeNode};
use tide_program::{ContextualTypes, ElementKind, Flow};
use tide_types::{Signature, SignatureId, Type};

use crate::type_args::UseSite;
use crate::{ReportMode, Resolver};

/// What a call expression invokes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CallTarget {
    /// The function instance; `None` for a call through a function-typed
    /// value.
    pub function: Option<ElementId>,
    pub signature: SignatureId,
}

/// Type and value arguments of a call or `new` expression.
#[derive(Copy, Clone, Debug)]
pub(crate) struct CallSite<'e> {
    pub(crate) expr: ExprId,
    /// `None` when omitted, so inference applies.
    pub(crate) type_args: Option<&'e [TypeNode]>,
    pub(crate) args: &'e [ExprId],
}

impl<'e> CallSite<'e> {
    pub(crate) fn of(arena: &'e ExprArena, expr: ExprId) -> Option<Self> {
        match &arena.get(expr).kind {
            ExprKind::Call { type_args, args, .. } | ExprKind::New { type_args, args, .. } => Some(CallSite {
                expr,
                type_args: type_args.as_deref(),
                args,
            }),
            _ => None,
        }
    }

    /// The same arguments without type arguments; those of a `new`
    /// expression belong to the class, not the constructor.
    fn without_type_args(self) -> Self {
        CallSite {
            type_args: None,
            ..self
        }
    }
}

impl Resolver<'_, '_> {
    /// The function and signature a call expression invokes, with its
    /// arguments checked against the signature.
    pub fn resolve_call(
        &mut self,
        expr: ExprId,
        flow: &dyn Flow,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<CallTarget> {
        let arena = self.program.arena();
        let ExprKind::Call { callee, .. } = &arena.get(expr).kind else {
            return None;
        };
        let site = CallSite::of(arena, expr)?;
        let callee_span = arena.span(*callee);
        tracing::trace!(?expr, ?ctx_type, "resolving call");

        let target = match &arena.get(*callee).kind {
            ExprKind::Super => self.resolve_super_call(site, callee_span, flow, mode)?,
            ExprKind::Identifier(_) | ExprKind::PropertyAccess { .. } | ExprKind::Paren(_) => {
                let element = self.lookup_expression(*callee, flow, None, mode)?;
                self.call_target_of_element(element, site, callee_span, flow, mode)?
            }
            _ => {
                let ty = self.resolve_expression(*callee, flow, None, mode)?;
                self.call_target_of_type(ty, callee_span, mode)?
            }
        };
        self.check_call_arguments(target, site, flow, mode)?;
        Some(target)
    }

    fn call_target_of_element(
        &mut self,
        element: ElementId,
        site: CallSite<'_>,
        span: Span,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<CallTarget> {
        match self.program.kind(element) {
            ElementKind::FunctionPrototype => {
                let function = self.resolve_overloads(element, site, flow, mode)?;
                let signature = self.function_signature(function)?;
                Some(CallTarget {
                    function: Some(function),
                    signature,
                })
            }
            ElementKind::Function => Some(CallTarget {
                function: Some(element),
                signature: self.function_signature(element)?,
            }),
            _ => {
                let ty = self.element_type(element, span, None, mode)?;
                self.call_target_of_type(ty, span, mode)
            }
        }
    }

    fn call_target_of_type(&mut self, ty: Type, span: Span, mode: ReportMode) -> Option<CallTarget> {
        if let Some(signature) = ty.signature_reference() {
            return Some(CallTarget {
                function: None,
                signature,
            });
        }
        self.report(
            mode,
            Diagnostic::error(ErrorCode::NOT_CALLABLE)
                .with_args([self.type_name(ty)])
                .with_label(span, "not a function"),
        );
        None
    }

    /// `super(...)` inside a constructor calls the base constructor.
    fn resolve_super_call(
        &mut self,
        site: CallSite<'_>,
        span: Span,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<CallTarget> {
        let base = self.super_class(flow, span, mode)?;
        match self.program.class(base).and_then(|data| data.constructor) {
            Some(constructor) => {
                let function = self.resolve_overloads(constructor, site, flow, mode)?;
                Some(CallTarget {
                    function: Some(function),
                    signature: self.function_signature(function)?,
                })
            }
            None => {
                let base_ty = self.program.class_type(base);
                let signature = self
                    .program
                    .intern_signature(Signature::new(Vec::new(), base_ty).with_this(base_ty));
                Some(CallTarget {
                    function: None,
                    signature,
                })
            }
        }
    }

    /// Check argument count and argument types against the target's
    /// signature. Arguments bound to a rest parameter are checked against
    /// its element type.
    pub(crate) fn check_call_arguments(
        &mut self,
        target: CallTarget,
        site: CallSite<'_>,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<()> {
        let signature = self.program.signature_of(target.signature).clone();
        let count = site.args.len();
        if !signature.accepts_arg_count(count) {
            let total = signature.params.len();
            let expected = if signature.has_rest {
                format!("{}+", signature.required_params)
            } else if signature.required_params == total {
                total.to_string()
            } else {
                format!("{}-{total}", signature.required_params)
            };
            let span = self.program.arena().span(site.expr);
            self.report(
                mode,
                Diagnostic::error(ErrorCode::ARGUMENT_COUNT_MISMATCH)
                    .with_args([expected, count.to_string()])
                    .with_label(span, "wrong number of arguments"),
            );
            return None;
        }

        let params = self.argument_params(&signature, count);
        for (&arg, &param) in site.args.iter().zip(&params) {
            let arg_ty = self.resolve_expression(arg, flow, param, mode)?;
            if let Some(param) = param {
                let span = self.program.arena().span(arg);
                if !self.check_assignable(arg_ty, param, span, mode) {
                    return None;
                }
            }
        }
        Some(())
    }

    /// The parameter type each of `count` arguments is checked against.
    /// Arguments bound to a rest parameter get its element type; arguments
    /// past the last parameter get `None`.
    pub(crate) fn argument_params(&self, signature: &Signature, count: usize) -> SmallVec<[Option<Type>; 4]> {
        let rest_start = signature.has_rest.then(|| signature.params.len().saturating_sub(1));
        let rest_element = signature
            .params
            .last()
            .filter(|_| signature.has_rest)
            .and_then(|&rest| self.array_element_type(rest));
        (0..count)
            .map(|index| match rest_start {
                Some(start) if index >= start => rest_element,
                _ => signature.params.get(index).copied(),
            })
            .collect()
    }

    /// The class instance a `new` expression creates.
    ///
    /// Omitted type arguments come from a contextual type of the same
    /// class, or are inferred from the constructor arguments.
    pub fn resolve_new(
        &mut self,
        expr: ExprId,
        flow: &dyn Flow,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let arena = self.program.arena();
        let ExprKind::New { class, .. } = &arena.get(expr).kind else {
            return None;
        };
        let site = CallSite::of(arena, expr)?;
        let span = arena.span(expr);
        let scope = flow.scope();

        let Some(prototype) = self.lookup_type_name(class, scope) else {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::NOT_FOUND)
                    .with_args([self.type_path(class)])
                    .with_label(class.span, "cannot find this class"),
            );
            return None;
        };
        let decl = match self.program.kind(prototype) {
            ElementKind::ClassPrototype => self.program.class_prototype(prototype)?.decl,
            ElementKind::InterfacePrototype => {
                self.report_abstract(prototype, span, mode);
                return None;
            }
            _ => {
                self.report(
                    mode,
                    Diagnostic::error(ErrorCode::NOT_CALLABLE)
                        .with_args([self.type_path(class)])
                        .with_label(class.span, "not a class"),
                );
                return None;
            }
        };
        if decl.flags.contains(CommonFlags::ABSTRACT) {
            self.report_abstract(prototype, span, mode);
            return None;
        }

        let instance = match site.type_args {
            Some(nodes) => {
                let ctx = self.scope_ctx(scope);
                self.instantiate_class(prototype, nodes, UseSite::new(scope, &ctx, span), mode)?
            }
            None if decl.type_params.is_empty() => {
                let ctx = self.scope_ctx(scope);
                self.instantiate_class(prototype, &[], UseSite::new(scope, &ctx, span), mode)?
            }
            None => {
                let from_context = ctx_type
                    .and_then(Type::class_reference)
                    .filter(|&class| self.program.class(class).is_some_and(|data| data.prototype == prototype));
                match from_context {
                    Some(class) => class,
                    None => {
                        let params = decl.constructor().map_or(&[][..], |ctor| ctor.params.as_slice());
                        let outer = ContextualTypes::new();
                        let types = self.infer_type_arguments(
                            prototype,
                            &decl.type_params,
                            params,
                            site,
                            flow,
                            &outer,
                            mode,
                        )?;
                        let bindings = decl
                            .type_params
                            .iter()
                            .map(|param| param.name)
                            .zip(types.iter().copied())
                            .collect();
                        self.resolve_class(prototype, types, bindings)?
                    }
                }
            }
        };

        let site = site.without_type_args();
        match self.program.class(instance).and_then(|data| data.constructor) {
            Some(constructor) => {
                let function = self.resolve_overloads(constructor, site, flow, mode)?;
                let target = CallTarget {
                    function: Some(function),
                    signature: self.function_signature(function)?,
                };
                self.check_call_arguments(target, site, flow, mode)?;
            }
            None if !site.args.is_empty() => {
                self.report(
                    mode,
                    Diagnostic::error(ErrorCode::ARGUMENT_COUNT_MISMATCH)
                        .with_args(["0".to_owned(), site.args.len().to_string()])
                        .with_label(span, "class has no constructor"),
                );
                return None;
            }
            None => {}
        }
        Some(instance)
    }

    fn report_abstract(&mut self, prototype: ElementId, span: Span, mode: ReportMode) {
        self.report(
            mode,
            Diagnostic::error(ErrorCode::ABSTRACT_INSTANTIATION)
                .with_args([self.element_name(prototype)])
                .with_label(span, "cannot be instantiated"),
        );
    }
}
