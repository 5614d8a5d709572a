//! Property and element access.

use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::{ElementId, ExprId, ExprKind, Name, Span};
use tide_program::{ElementKind, Flow};
use tide_types::Type;

use crate::{ReportMode, Resolver};

impl Resolver<'_, '_> {
    /// Member named by `target.property`.
    ///
    /// A target naming a file, namespace, enum or class prototype is
    /// searched for static members; any other target is a value whose
    /// class is searched for instance members, inherited ones included.
    pub(crate) fn lookup_property_access(&mut self, expr: ExprId, flow: &dyn Flow, mode: ReportMode) -> Option<ElementId> {
        let arena = self.program.arena();
        let ExprKind::PropertyAccess {
            target,
            property,
            property_span,
        } = &arena.get(expr).kind
        else {
            return None;
        };
        let (target, property, property_span) = (*target, *property, *property_span);

        let receiver = match &arena.get(target).kind {
            ExprKind::Identifier(_) | ExprKind::PropertyAccess { .. } => {
                let element = self.lookup_expression(target, flow, None, mode)?;
                if is_container(self.program.kind(element)) {
                    return self.lookup_static_member(element, property, property_span, mode);
                }
                self.element_type(element, arena.span(target), None, mode)?
            }
            _ => self.resolve_expression(target, flow, None, mode)?,
        };
        self.lookup_instance_property(receiver, property, property_span, mode)
    }

    fn lookup_static_member(
        &mut self,
        container: ElementId,
        property: Name,
        span: Span,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let found = self.program.lookup_member(container, property);
        if found.is_none() {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::PROPERTY_NOT_FOUND)
                    .with_args([self.name_str(property).to_owned(), self.element_name(container)])
                    .with_label(span, "no such member"),
            );
        }
        found
    }

    fn lookup_instance_property(
        &mut self,
        receiver: Type,
        property: Name,
        span: Span,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let found = receiver
            .class_reference()
            .and_then(|class| self.program.lookup_instance_member(class, property));
        if found.is_none() {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::PROPERTY_NOT_FOUND)
                    .with_args([self.name_str(property).to_owned(), self.type_name(receiver)])
                    .with_label(span, "no such property"),
            );
        }
        found
    }

    /// Type of `target[index]`, read through the class's `[]` operator.
    pub(crate) fn resolve_element_access(
        &mut self,
        target: ExprId,
        index: ExprId,
        span: Span,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<Type> {
        let target_ty = self.resolve_expression(target, flow, None, mode)?;
        let signature = target_ty
            .class_reference()
            .and_then(|class| self.indexed_get_signature(class));
        let Some(signature) = signature else {
            self.report_missing_index_signature(target_ty, span, mode);
            return None;
        };
        let signature = self.program.signature_of(signature).clone();
        if let Some(&key) = signature.params.first() {
            let index_ty = self.resolve_expression(index, flow, Some(key), mode)?;
            let index_span = self.program.arena().span(index);
            if !self.check_assignable(index_ty, key, index_span, mode) {
                return None;
            }
        }
        Some(signature.ret)
    }

    /// The index signature element of the class `target` evaluates to.
    pub(crate) fn lookup_element_access(
        &mut self,
        target: ExprId,
        index: ExprId,
        span: Span,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<ElementId> {
        self.resolve_element_access(target, index, span, flow, mode)?;
        let target_ty = self.resolve_expression(target, flow, None, mode)?;
        let found = target_ty
            .class_reference()
            .and_then(|class| self.program.class(class)?.index_signature);
        if found.is_none() {
            self.report_missing_index_signature(target_ty, span, mode);
        }
        found
    }

    fn report_missing_index_signature(&mut self, ty: Type, span: Span, mode: ReportMode) {
        self.report(
            mode,
            Diagnostic::error(ErrorCode::INDEX_SIGNATURE_MISSING)
                .with_args([self.type_name(ty)])
                .with_label(span, "not indexable"),
        );
    }
}

/// Elements whose members are reached statically with `.`.
fn is_container(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::File
            | ElementKind::Namespace
            | ElementKind::Enum
            | ElementKind::ClassPrototype
            | ElementKind::InterfacePrototype
    )
}
