//! Type-argument lists: arity, defaults, bounds and folding.

use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::{ElementId, Span, TypeNode, TypeParameter};
use tide_program::ContextualTypes;
use tide_types::Type;

use crate::{ReportMode, Resolver};

/// Where a list of type arguments is written: the element whose scope
/// names are looked up in, the bindings in effect there, and the range to
/// report against.
#[derive(Copy, Clone, Debug)]
pub struct UseSite<'c> {
    pub scope: ElementId,
    pub ctx_types: &'c ContextualTypes,
    pub span: Span,
}

impl<'c> UseSite<'c> {
    pub fn new(scope: ElementId, ctx_types: &'c ContextualTypes, span: Span) -> Self {
        UseSite {
            scope,
            ctx_types,
            span,
        }
    }
}

impl Resolver<'_, '_> {
    /// Resolve the type arguments written for `generic`.
    ///
    /// Written arguments resolve at the use site; omitted trailing ones take
    /// their declared default, which resolves in the declaration with the
    /// bindings made so far. Each binding is folded into `base` before the
    /// next parameter is processed, so defaults and bounds may refer to
    /// earlier parameters. Returns the arguments and the folded bindings.
    #[tracing::instrument(level = "trace", skip_all, fields(generic = %self.program.internal_name(generic)))]
    pub fn resolve_type_arguments(
        &mut self,
        generic: ElementId,
        type_params: &[TypeParameter],
        nodes: &[TypeNode],
        site: UseSite<'_>,
        base: ContextualTypes,
        mode: ReportMode,
    ) -> Option<(Vec<Type>, ContextualTypes)> {
        let max = type_params.len();
        let min = required_type_params(type_params);
        if nodes.is_empty() && min > 0 {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::MISSING_TYPE_ARGUMENTS)
                    .with_args([self.element_name(generic), min.to_string()])
                    .with_label(site.span, "type arguments required"),
            );
            return None;
        }
        if nodes.len() > max || nodes.len() < min {
            let expected = if min == max {
                max.to_string()
            } else {
                format!("{min}-{max}")
            };
            self.report(
                mode,
                Diagnostic::error(ErrorCode::WRONG_TYPE_ARGUMENT_COUNT)
                    .with_args([expected, nodes.len().to_string()])
                    .with_label(site.span, "wrong number of type arguments"),
            );
            return None;
        }

        let mut folded = base;
        let mut types = Vec::with_capacity(max);
        for (index, param) in type_params.iter().enumerate() {
            let (ty, span) = match nodes.get(index) {
                Some(node) => (
                    self.resolve_type(node, site.scope, site.ctx_types, mode)?,
                    node.span(),
                ),
                None => {
                    let default = param.default.as_ref()?;
                    (self.resolve_type(default, generic, &folded, mode)?, site.span)
                }
            };
            folded.insert(param.name, ty);
            if !self.check_type_argument_bound(generic, param, ty, &folded, span, mode) {
                return None;
            }
            types.push(ty);
        }
        Some((types, folded))
    }

    /// Check `ty` against the `extends` bound of `param`, resolved inside
    /// `generic` with `folded` bindings.
    pub(crate) fn check_type_argument_bound(
        &mut self,
        generic: ElementId,
        param: &TypeParameter,
        ty: Type,
        folded: &ContextualTypes,
        span: Span,
        mode: ReportMode,
    ) -> bool {
        let Some(bound_node) = &param.extends else {
            return true;
        };
        let Some(bound) = self.resolve_type(bound_node, generic, folded, mode) else {
            return false;
        };
        if self.assignable(ty, bound) {
            return true;
        }
        self.report(
            mode,
            Diagnostic::error(ErrorCode::TYPE_CONSTRAINT_VIOLATION)
                .with_args([self.type_name(ty), self.type_name(bound)])
                .with_label(span, "constraint not satisfied")
                .with_related(bound_node.span(), "constraint declared here"),
        );
        false
    }
}

/// Number of leading type parameters without a default.
pub(crate) fn required_type_params(type_params: &[TypeParameter]) -> usize {
    type_params
        .iter()
        .rposition(|param| param.default.is_none())
        .map_or(0, |index| index + 1)
}
