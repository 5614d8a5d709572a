//! Expression resolution.
//!
//! [`Resolver::resolve_expression`] yields the static type of an expression
//! and [`Resolver::lookup_expression`] the element it refers to. Both are
//! memoized per expression, scope and contextual type until the next
//! [`Resolver::begin_pass`].

mod access;
mod call;
mod operators;

pub use call::CallTarget;
pub(crate) use call::CallSite;

use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::{ClassDecl, ElementId, ExprId, ExprKind, FunctionDecl, Literal, Name, Span};
use tide_program::{ContextualTypes, ElementKind, Flow};
use tide_stack::ensure_sufficient_stack;
use tide_types::{common_denominator, Type};

use crate::types::STRING_CLASS;
use crate::{ReportMode, Resolver};

const ARRAY_CLASS: &str = "Array";

impl Resolver<'_, '_> {
    /// Static type of `expr` resolved in `flow`, against `ctx_type` if the
    /// surrounding code expects one.
    pub fn resolve_expression(
        &mut self,
        expr: ExprId,
        flow: &dyn Flow,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<Type> {
        let key = (expr, flow.scope(), ctx_type);
        if let Some(ty) = self.memoized_type(&key) {
            return Some(ty);
        }
        let ty = ensure_sufficient_stack(|| self.resolve_expression_uncached(expr, flow, ctx_type, mode))?;
        self.memoize_type(key, ty);
        Some(ty)
    }

    /// Element `expr` refers to: a local, global, member, function or class
    /// instance.
    pub fn lookup_expression(
        &mut self,
        expr: ExprId,
        flow: &dyn Flow,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let key = (expr, flow.scope(), ctx_type);
        if let Some(element) = self.memoized_element(&key) {
            return Some(element);
        }
        let element = ensure_sufficient_stack(|| self.lookup_expression_uncached(expr, flow, ctx_type, mode))?;
        self.memoize_element(key, element);
        Some(element)
    }

    fn resolve_expression_uncached(
        &mut self,
        expr: ExprId,
        flow: &dyn Flow,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<Type> {
        let arena = self.program.arena();
        let node = arena.get(expr);
        let span = node.span;
        match &node.kind {
            ExprKind::Identifier(name) => {
                let element = self.lookup_identifier(*name, span, flow, mode)?;
                self.element_type(element, span, ctx_type, mode)
            }
            ExprKind::Literal(literal) => self.resolve_literal(literal, span, flow, ctx_type, mode),
            ExprKind::True | ExprKind::False => Some(Type::BOOL),
            ExprKind::Null => Some(match ctx_type {
                Some(ty) if ty.is_reference() => ty.as_nullable(),
                _ => self.program.target().usize_type(),
            }),
            ExprKind::This => self.this_type(flow, span, mode),
            ExprKind::Super => {
                let base = self.super_class(flow, span, mode)?;
                Some(self.program.class_type(base))
            }
            ExprKind::Call { .. } => {
                let target = self.resolve_call(expr, flow, ctx_type, mode)?;
                Some(self.program.signature_of(target.signature).ret)
            }
            ExprKind::New { .. } => {
                let class = self.resolve_new(expr, flow, ctx_type, mode)?;
                Some(self.program.class_type(class))
            }
            ExprKind::Binary { op, left, right } => self.resolve_binary(*op, *left, *right, span, flow, ctx_type, mode),
            ExprKind::Unary { op, operand } => self.resolve_unary(*op, *operand, span, flow, ctx_type, mode),
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                self.resolve_expression(*condition, flow, Some(Type::BOOL), mode)?;
                let then_ty = self.resolve_expression(*then_expr, flow, ctx_type, mode)?;
                let else_ty = self.resolve_expression(*else_expr, flow, ctx_type.or(Some(then_ty)), mode)?;
                let common = common_denominator(then_ty, else_ty, false, &*self.program);
                if common.is_none() {
                    self.report_not_assignable(else_ty, then_ty, arena.span(*else_expr), mode);
                }
                common
            }
            ExprKind::PropertyAccess { .. } => {
                let element = self.lookup_property_access(expr, flow, mode)?;
                self.element_type(element, span, ctx_type, mode)
            }
            ExprKind::ElementAccess { target, index } => self.resolve_element_access(*target, *index, span, flow, mode),
            ExprKind::As { expr: inner, to } => {
                let scope = flow.scope();
                let ctx = self.scope_ctx(scope);
                let target = self.resolve_type(to, scope, &ctx, mode)?;
                self.resolve_expression(*inner, flow, Some(target), mode)?;
                Some(target)
            }
            ExprKind::NonNull(inner) => {
                let ty = self.resolve_expression(*inner, flow, ctx_type, mode)?;
                if !ty.is_nullable() {
                    self.report(
                        mode,
                        Diagnostic::pedantic(ErrorCode::NEVER_NULL)
                            .with_args([self.type_name(ty)])
                            .with_label(span, "assertion is redundant"),
                    );
                }
                Some(ty.non_nullable())
            }
            ExprKind::InstanceOf { expr: inner, is_type } => {
                self.resolve_expression(*inner, flow, None, mode)?;
                let scope = flow.scope();
                let ctx = self.scope_ctx(scope);
                self.resolve_type(is_type, scope, &ctx, mode)?;
                Some(Type::BOOL)
            }
            ExprKind::Comma(exprs) => {
                let (&last, init) = exprs.split_last()?;
                for &inner in init {
                    self.resolve_expression(inner, flow, None, mode)?;
                }
                self.resolve_expression(last, flow, ctx_type, mode)
            }
            ExprKind::Paren(inner) => self.resolve_expression(*inner, flow, ctx_type, mode),
            ExprKind::Function(decl) => {
                let function = self.resolve_function_expression(expr, decl, flow, ctx_type, mode)?;
                let signature = self.function_signature(function)?;
                Some(Type::function(signature))
            }
            ExprKind::Class(decl) => {
                self.reject_class_expression(expr, decl, flow, mode);
                None
            }
        }
    }

    fn lookup_expression_uncached(
        &mut self,
        expr: ExprId,
        flow: &dyn Flow,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let arena = self.program.arena();
        let node = arena.get(expr);
        let span = node.span;
        match &node.kind {
            ExprKind::Identifier(name) => self.lookup_identifier(*name, span, flow, mode),
            ExprKind::PropertyAccess { .. } => self.lookup_property_access(expr, flow, mode),
            ExprKind::ElementAccess { target, index } => self.lookup_element_access(*target, *index, span, flow, mode),
            ExprKind::Call { .. } => match self.resolve_call(expr, flow, ctx_type, mode)?.function {
                Some(function) => Some(function),
                None => self.class_of_expression(expr, span, flow, ctx_type, mode),
            },
            ExprKind::New { .. } => self.resolve_new(expr, flow, ctx_type, mode),
            ExprKind::This => {
                let ty = self.this_type(flow, span, mode)?;
                ty.class_reference()
            }
            ExprKind::Super => self.super_class(flow, span, mode),
            ExprKind::Paren(inner) => self.lookup_expression(*inner, flow, ctx_type, mode),
            ExprKind::Function(decl) => self.resolve_function_expression(expr, decl, flow, ctx_type, mode),
            ExprKind::Class(decl) => Some(self.program.register_class_expression(flow.scope(), expr, decl)),
            _ => self.class_of_expression(expr, span, flow, ctx_type, mode),
        }
    }

    /// Class instance of an expression that names no element itself.
    fn class_of_expression(
        &mut self,
        expr: ExprId,
        span: Span,
        flow: &dyn Flow,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let ty = self.resolve_expression(expr, flow, ctx_type, mode)?;
        if let Some(class) = ty.class_reference() {
            return Some(class);
        }
        self.report(
            mode,
            Diagnostic::error(ErrorCode::OPERATION_NOT_SUPPORTED)
                .with_args(["element lookup".to_owned(), self.type_name(ty)])
                .with_label(span, "expression does not refer to an element"),
        );
        None
    }

    // === Names ===

    /// Block-scoped locals first, then the lexical scope of the flow.
    fn lookup_identifier(&mut self, name: Name, span: Span, flow: &dyn Flow, mode: ReportMode) -> Option<ElementId> {
        let found = flow
            .lookup(name)
            .or_else(|| self.program.lookup(flow.scope(), name));
        if found.is_none() {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::NOT_FOUND)
                    .with_args([self.name_str(name)])
                    .with_label(span, "not found in this scope"),
            );
        }
        found
    }

    /// Type of a value-carrying element.
    pub(crate) fn element_type(
        &mut self,
        element: ElementId,
        span: Span,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<Type> {
        match self.program.kind(element) {
            ElementKind::Local => self.program.local(element).map(|data| data.ty),
            ElementKind::Global => self.resolve_global(element, mode),
            ElementKind::EnumValue => Some(Type::I32),
            ElementKind::Field => self.program.field(element).map(|data| data.ty),
            ElementKind::FunctionPrototype => self.function_value_type(element, span, ctx_type, mode),
            ElementKind::Function => self.function_signature(element).map(Type::function),
            ElementKind::Property => {
                let getter = self.program.property(element).and_then(|data| data.getter);
                self.accessor_type(element, getter, span, mode)
            }
            ElementKind::PropertyPrototype => {
                let getter = self.program.property_prototype(element).and_then(|data| data.getter);
                self.accessor_type(element, getter, span, mode)
            }
            _ => {
                self.report(
                    mode,
                    Diagnostic::error(ErrorCode::OPERATION_NOT_SUPPORTED)
                        .with_args(["value use".to_owned(), self.element_name(element)])
                        .with_label(span, "not a value"),
                );
                None
            }
        }
    }

    fn accessor_type(
        &mut self,
        property: ElementId,
        getter: Option<ElementId>,
        span: Span,
        mode: ReportMode,
    ) -> Option<Type> {
        let Some(getter) = getter else {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::OPERATION_NOT_SUPPORTED)
                    .with_args(["read".to_owned(), self.element_name(property)])
                    .with_label(span, "property has no getter"),
            );
            return None;
        };
        let ctx = self.accessor_scope_ctx(getter);
        let instance = self.resolve_function(getter, Vec::new(), &ctx, None)?;
        let signature = self.function_signature(instance)?;
        Some(self.program.signature_of(signature).ret)
    }

    fn accessor_scope_ctx(&self, accessor: ElementId) -> ContextualTypes {
        self.program
            .element(accessor)
            .parent
            .map(|parent| self.scope_ctx(parent))
            .unwrap_or_default()
    }

    /// A function used as a value. Overloaded functions are picked by the
    /// contextual function type.
    fn function_value_type(
        &mut self,
        prototype: ElementId,
        span: Span,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<Type> {
        let data = self.program.function_prototype(prototype)?;
        let overloads = data.overloads.clone();
        if data.is_generic() {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::UNRESOLVED_GENERIC)
                    .with_args([self.element_name(prototype)])
                    .with_label(span, "type arguments cannot be inferred here"),
            );
            return None;
        }
        let ctx = self.accessor_scope_ctx(prototype);
        if overloads.len() <= 1 {
            let instance = self.resolve_function(prototype, Vec::new(), &ctx, None)?;
            return self.function_signature(instance).map(Type::function);
        }
        if let Some(wanted) = ctx_type.and_then(Type::signature_reference) {
            for candidate in overloads {
                let generic = self
                    .program
                    .function_prototype(candidate)
                    .is_some_and(|data| data.is_generic());
                if generic {
                    continue;
                }
                let Some(signature) = self
                    .resolve_function(candidate, Vec::new(), &ctx, None)
                    .and_then(|instance| self.function_signature(instance))
                else {
                    continue;
                };
                let fits = signature == wanted
                    || self
                        .program
                        .signature_of(signature)
                        .is_assignable_to(self.program.signature_of(wanted), &*self.program);
                if fits {
                    return Some(Type::function(signature));
                }
            }
        }
        self.report(
            mode,
            Diagnostic::error(ErrorCode::AMBIGUOUS_OVERLOAD)
                .with_args([self.element_name(prototype)])
                .with_label(span, "overloaded function used as a value"),
        );
        None
    }

    // === this / super ===

    fn this_type(&mut self, flow: &dyn Flow, span: Span, mode: ReportMode) -> Option<Type> {
        let scope = flow.scope();
        let found = match self.program.kind(scope) {
            ElementKind::Function => self
                .function_signature(scope)
                .and_then(|signature| self.program.signature_of(signature).this_type),
            ElementKind::Class | ElementKind::Interface => Some(self.program.class_type(scope)),
            _ => None,
        };
        if found.is_none() {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::THIS_NOT_AVAILABLE).with_label(span, "`this` used outside of a method"),
            );
        }
        found
    }

    pub(crate) fn super_class(&mut self, flow: &dyn Flow, span: Span, mode: ReportMode) -> Option<ElementId> {
        let scope = flow.scope();
        let this_class = match self.program.kind(scope) {
            ElementKind::Function => self
                .function_signature(scope)
                .and_then(|signature| self.program.signature_of(signature).this_type)
                .and_then(Type::class_reference),
            ElementKind::Class => Some(scope),
            _ => None,
        };
        let base = this_class.and_then(|class| self.program.class(class)?.base);
        if base.is_none() {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::SUPER_NOT_AVAILABLE).with_label(span, "no base class here"),
            );
        }
        base
    }

    // === Literals ===

    fn resolve_literal(
        &mut self,
        literal: &Literal,
        span: Span,
        flow: &dyn Flow,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<Type> {
        let arena = self.program.arena();
        match literal {
            Literal::Integer(value) => Some(integer_literal_type(*value, ctx_type)),
            Literal::Float(_) => Some(if ctx_type == Some(Type::F32) {
                Type::F32
            } else {
                Type::F64
            }),
            Literal::String(_) => {
                let string = self.instantiate_library_class(STRING_CLASS, Vec::new(), flow, span, mode)?;
                Some(self.program.class_type(string))
            }
            Literal::Array(elements) => {
                if let Some(element_ty) = ctx_type.and_then(|ty| self.array_element_type(ty)) {
                    for &element in elements {
                        let ty = self.resolve_expression(element, flow, Some(element_ty), mode)?;
                        if !self.check_assignable(ty, element_ty, arena.span(element), mode) {
                            return None;
                        }
                    }
                    return ctx_type.map(Type::non_nullable);
                }
                let mut common: Option<Type> = None;
                for &element in elements {
                    let ty = self.resolve_expression(element, flow, None, mode)?;
                    common = match common {
                        None => Some(ty),
                        Some(previous) => {
                            let widened = common_denominator(previous, ty, false, &*self.program);
                            if widened.is_none() {
                                self.report_not_assignable(ty, previous, arena.span(element), mode);
                                return None;
                            }
                            widened
                        }
                    };
                }
                let Some(element_ty) = common else {
                    self.report(
                        mode,
                        Diagnostic::error(ErrorCode::TYPE_EXPECTED)
                            .with_label(span, "element type of an empty array cannot be inferred"),
                    );
                    return None;
                };
                let array = self.instantiate_library_class(ARRAY_CLASS, vec![element_ty], flow, span, mode)?;
                Some(self.program.class_type(array))
            }
            Literal::Object(fields) => {
                let Some(class) = ctx_type.and_then(Type::class_reference) else {
                    self.report(
                        mode,
                        Diagnostic::error(ErrorCode::TYPE_EXPECTED)
                            .with_label(span, "object literal needs a class type"),
                    );
                    return None;
                };
                for &(name, value) in fields {
                    let field_ty = self
                        .program
                        .lookup_instance_member(class, name)
                        .and_then(|member| self.program.field(member))
                        .map(|data| data.ty);
                    let Some(field_ty) = field_ty else {
                        self.report(
                            mode,
                            Diagnostic::error(ErrorCode::PROPERTY_NOT_FOUND)
                                .with_args([self.name_str(name).to_owned(), self.element_name(class)])
                                .with_label(arena.span(value), "no such field"),
                        );
                        return None;
                    };
                    let ty = self.resolve_expression(value, flow, Some(field_ty), mode)?;
                    if !self.check_assignable(ty, field_ty, arena.span(value), mode) {
                        return None;
                    }
                }
                ctx_type.map(Type::non_nullable)
            }
        }
    }

    /// Instance of a non-generic or explicitly instantiated library class
    /// visible from the flow, such as `String` or `Array<T>`.
    fn instantiate_library_class(
        &mut self,
        name: &str,
        type_arguments: Vec<Type>,
        flow: &dyn Flow,
        span: Span,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let found = self
            .program
            .lookup(flow.scope(), self.program.intern(name))
            .and_then(|element| Some((element, self.program.class_prototype(element)?.decl)));
        let Some((prototype, decl)) = found else {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::NOT_FOUND)
                    .with_args([name])
                    .with_label(span, "library class is not declared"),
            );
            return None;
        };
        if decl.type_params.len() != type_arguments.len() {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::WRONG_TYPE_ARGUMENT_COUNT)
                    .with_args([decl.type_params.len().to_string(), type_arguments.len().to_string()])
                    .with_label(span, "unexpected library class shape"),
            );
            return None;
        }
        let bindings = decl
            .type_params
            .iter()
            .map(|param| param.name)
            .zip(type_arguments.iter().copied())
            .collect();
        self.resolve_class(prototype, type_arguments, bindings)
    }

    /// Element type of an `Array<T>` instance.
    pub(crate) fn array_element_type(&self, ty: Type) -> Option<Type> {
        let data = self.program.class(ty.class_reference()?)?;
        if self.program.name_of(data.prototype) != ARRAY_CLASS {
            return None;
        }
        data.type_arguments.first().copied()
    }

    // === Function and class expressions ===

    fn resolve_function_expression(
        &mut self,
        expr: ExprId,
        decl: &FunctionDecl,
        flow: &dyn Flow,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let scope = flow.scope();
        let prototype = self.register_expression(scope, expr)?;
        if !decl.type_params.is_empty() {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::UNRESOLVED_GENERIC)
                    .with_args([self.element_name(prototype)])
                    .with_label(decl.span, "generic function expression"),
            );
            return None;
        }
        let contextual = ctx_type.and_then(Type::signature_reference);
        let ctx = self.scope_ctx(scope);
        self.resolve_function(prototype, Vec::new(), &ctx, contextual)
    }

    /// Register the function or class expression `expr` under `scope`.
    fn register_expression(&mut self, scope: ElementId, expr: ExprId) -> Option<ElementId> {
        let arena = self.program.arena();
        match &arena.get(expr).kind {
            ExprKind::Function(decl) => Some(self.program.register_function_expression(scope, expr, decl)),
            ExprKind::Class(decl) => Some(self.program.register_class_expression(scope, expr, decl)),
            _ => None,
        }
    }

    /// Class expressions are registered, but have no value type.
    fn reject_class_expression(&mut self, expr: ExprId, decl: &ClassDecl, flow: &dyn Flow, mode: ReportMode) {
        let Some(class) = self.register_expression(flow.scope(), expr) else {
            return;
        };
        self.report(
            mode,
            Diagnostic::error(ErrorCode::OPERATION_NOT_SUPPORTED)
                .with_args(["class expression".to_owned(), self.element_name(class)])
                .with_label(decl.span, "class expressions cannot be used as values"),
        );
    }

    // === Shared checks ===

    /// Report `NotAssignable` unless `from` converts implicitly to `to`.
    pub fn check_assignable(&mut self, from: Type, to: Type, span: Span, mode: ReportMode) -> bool {
        if self.assignable(from, to) {
            return true;
        }
        self.report_not_assignable(from, to, span, mode);
        false
    }

    pub(crate) fn report_not_assignable(&mut self, from: Type, to: Type, span: Span, mode: ReportMode) {
        self.report(
            mode,
            Diagnostic::error(ErrorCode::NOT_ASSIGNABLE)
                .with_args([self.type_name(from), self.type_name(to)])
                .with_label(span, "type mismatch"),
        );
    }
}

/// Type of an integer literal: the contextual numeric type if the value
/// fits, else `i32` or `i64` by magnitude.
fn integer_literal_type(value: i64, ctx_type: Option<Type>) -> Type {
    match ctx_type {
        Some(ty) if ty.is_float_value() => ty,
        Some(ty) if ty.is_integer_value() && integer_fits(value, ty) => ty,
        _ if i32::try_from(value).is_ok() => Type::I32,
        _ => Type::I64,
    }
}

fn integer_fits(value: i64, ty: Type) -> bool {
    if ty.is_bool() {
        return value == 0 || value == 1;
    }
    let bits = ty.size();
    if bits >= 64 {
        return ty.is_signed() || value >= 0;
    }
    if ty.is_signed() {
        let half = 1_i64 << (bits - 1);
        (-half..half).contains(&value)
    } else {
        (0..(1_i64 << bits)).contains(&value)
    }
}
