//! Binary and unary operators, including `@operator` overloads.

use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::{BinaryOp, ElementId, ExprId, OperatorKind, Span, UnaryOp};
use tide_program::Flow;
use tide_types::{common_denominator, SignatureId, Type};

use crate::{ReportMode, Resolver};

impl Resolver<'_, '_> {
    /// Function instance implementing `op` for a class instance.
    pub(crate) fn operator_overload(&mut self, class: ElementId, op: OperatorKind) -> Option<ElementId> {
        let method = self.program.class(class)?.operators.get(&op).copied()?;
        let ctx = self.scope_ctx(class);
        self.resolve_function(method, Vec::new(), &ctx, None)
    }

    /// Signature of the `[]` operator of a class instance.
    pub(crate) fn indexed_get_signature(&mut self, class: ElementId) -> Option<SignatureId> {
        let function = self.operator_overload(class, OperatorKind::IndexedGet)?;
        self.function_signature(function)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn resolve_binary(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        span: Span,
        flow: &dyn Flow,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<Type> {
        if op.is_assignment() {
            return self.resolve_assignment(op, left, right, span, flow, mode);
        }
        if matches!(op, BinaryOp::LogicalAnd | BinaryOp::LogicalOr) {
            let left_ty = self.resolve_expression(left, flow, ctx_type, mode)?;
            let right_ty = self.resolve_expression(right, flow, Some(left_ty), mode)?;
            return self.binary_common_type(op, left_ty, right_ty, span, mode);
        }

        let left_ctx = if op.is_comparison() { None } else { ctx_type };
        let left_ty = self.resolve_expression(left, flow, left_ctx, mode)?;
        self.apply_binary(op, left_ty, right, span, flow, mode)
    }

    /// Result type of `left_ty op right`, with `left_ty` already resolved.
    fn apply_binary(
        &mut self,
        op: BinaryOp,
        left_ty: Type,
        right: ExprId,
        span: Span,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<Type> {
        if let Some(class) = left_ty.class_reference() {
            let overload = op
                .overload_kind()
                .and_then(|kind| self.operator_overload(class, kind));
            if let Some(function) = overload {
                return self.apply_binary_overload(function, right, flow, mode);
            }
            if matches!(
                op,
                BinaryOp::Eq | BinaryOp::Ne | BinaryOp::StrictEq | BinaryOp::StrictNe
            ) {
                self.resolve_expression(right, flow, Some(left_ty), mode)?;
                return Some(Type::BOOL);
            }
            self.report_unsupported(binary_token(op), left_ty, span, mode);
            return None;
        }

        let right_ty = self.resolve_expression(right, flow, Some(left_ty), mode)?;
        if op.is_shift() {
            if left_ty.is_integer_value() && right_ty.is_integer_value() {
                return Some(left_ty);
            }
            self.report_unsupported(binary_token(op), left_ty, span, mode);
            return None;
        }
        let common = self.binary_common_type(op, left_ty, right_ty, span, mode)?;
        if op.is_comparison() {
            return Some(Type::BOOL);
        }
        if !common.is_numeric_value() {
            self.report_unsupported(binary_token(op), common, span, mode);
            return None;
        }
        Some(common)
    }

    fn binary_common_type(
        &mut self,
        op: BinaryOp,
        left_ty: Type,
        right_ty: Type,
        span: Span,
        mode: ReportMode,
    ) -> Option<Type> {
        let common = common_denominator(left_ty, right_ty, false, &*self.program);
        if common.is_none() {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::OPERATION_NOT_SUPPORTED)
                    .with_args([
                        binary_token(op).to_owned(),
                        format!("{}, {}", self.type_name(left_ty), self.type_name(right_ty)),
                    ])
                    .with_label(span, "operand types are incompatible"),
            );
        }
        common
    }

    /// An instance operator takes the right operand; a static one both.
    fn apply_binary_overload(
        &mut self,
        function: ElementId,
        right: ExprId,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<Type> {
        let signature = self.program.signature_of(self.function_signature(function)?).clone();
        let param = if signature.this_type.is_some() {
            signature.params.first().copied()
        } else {
            signature.params.get(1).copied()
        };
        let right_ty = self.resolve_expression(right, flow, param, mode)?;
        if let Some(param) = param {
            let span = self.program.arena().span(right);
            if !self.check_assignable(right_ty, param, span, mode) {
                return None;
            }
        }
        Some(signature.ret)
    }

    fn resolve_assignment(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        span: Span,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<Type> {
        let target_ty = self.resolve_expression(left, flow, None, mode)?;
        let value_ty = if op == BinaryOp::Assign {
            self.resolve_expression(right, flow, Some(target_ty), mode)?
        } else {
            self.apply_binary(op, target_ty, right, span, flow, mode)?
        };
        let value_span = self.program.arena().span(right);
        if self.check_assignable(value_ty, target_ty, value_span, mode) {
            Some(target_ty)
        } else {
            None
        }
    }

    pub(crate) fn resolve_unary(
        &mut self,
        op: UnaryOp,
        operand: ExprId,
        span: Span,
        flow: &dyn Flow,
        ctx_type: Option<Type>,
        mode: ReportMode,
    ) -> Option<Type> {
        let operand_ctx = if op == UnaryOp::Not { None } else { ctx_type };
        let ty = self.resolve_expression(operand, flow, operand_ctx, mode)?;
        if let Some(class) = ty.class_reference() {
            let overload = op
                .overload_kind()
                .and_then(|kind| self.operator_overload(class, kind));
            if let Some(function) = overload {
                let signature = self.function_signature(function)?;
                return Some(self.program.signature_of(signature).ret);
            }
            if op == UnaryOp::Not {
                return Some(Type::BOOL);
            }
            self.report_unsupported(unary_token(op), ty, span, mode);
            return None;
        }
        match op {
            UnaryOp::Not => Some(Type::BOOL),
            UnaryOp::BitNot if ty.is_integer_value() => Some(ty),
            UnaryOp::Plus
            | UnaryOp::Minus
            | UnaryOp::PreIncrement
            | UnaryOp::PreDecrement
            | UnaryOp::PostIncrement
            | UnaryOp::PostDecrement
                if ty.is_numeric_value() =>
            {
                Some(ty)
            }
            _ => {
                self.report_unsupported(unary_token(op), ty, span, mode);
                None
            }
        }
    }

    fn report_unsupported(&mut self, token: &str, ty: Type, span: Span, mode: ReportMode) {
        self.report(
            mode,
            Diagnostic::error(ErrorCode::OPERATION_NOT_SUPPORTED)
                .with_args([token.to_owned(), self.type_name(ty)])
                .with_label(span, "operator not defined for this type"),
        );
    }
}

fn binary_token(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Assign => "=",
        BinaryOp::AddAssign => "+=",
        BinaryOp::SubAssign => "-=",
        BinaryOp::MulAssign => "*=",
        BinaryOp::DivAssign => "/=",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Rem => "%",
        BinaryOp::Pow => "**",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::ShrU => ">>>",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::StrictEq => "===",
        BinaryOp::StrictNe => "!==",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::Le => "<=",
        BinaryOp::Ge => ">=",
        BinaryOp::LogicalAnd => "&&",
        BinaryOp::LogicalOr => "||",
    }
}

fn unary_token(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Plus => "+",
        UnaryOp::Minus => "-",
        UnaryOp::Not => "!",
        UnaryOp::BitNot => "~",
        UnaryOp::PreIncrement | UnaryOp::PostIncrement => "++",
        UnaryOp::PreDecrement | UnaryOp::PostDecrement => "--",
    }
}
