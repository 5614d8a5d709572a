//! Selection among overloads sharing a name.
//!
//! Each candidate is tried in a probe: its arity must accept the call, it
//! must instantiate, and every argument must be assignable to its
//! parameter. Survivors are ranked by the number of arguments whose type
//! differs from the parameter type.

use smallvec::SmallVec;
use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::{ElementId, Span};
use tide_program::{Flow, OverloadPolicy};
use tracing::{debug, trace};

use crate::expr::CallSite;
use crate::{ReportMode, Resolver};

/// A candidate that accepted the call.
#[derive(Copy, Clone, Debug)]
struct Viable {
    instance: ElementId,
    /// Arguments needing an implicit conversion.
    cost: usize,
}

impl Resolver<'_, '_> {
    /// The function instance a call to `head` selects among its overloads.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %self.program.name_of(head)))]
    pub(crate) fn resolve_overloads(
        &mut self,
        head: ElementId,
        site: CallSite<'_>,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<ElementId> {
        let candidates = self.overload_candidates(head);
        if let [single] = candidates.as_slice() {
            return self.instantiate_call(*single, site, flow, mode);
        }

        let mut viable: SmallVec<[Viable; 4]> = SmallVec::new();
        for &candidate in &candidates {
            if !self.accepts_arity(candidate, site.args.len()) {
                trace!(candidate = %self.program.internal_name(candidate), "arity rejects candidate");
                continue;
            }
            let (found, _) = self.probe(|r| r.try_candidate(candidate, site, flow));
            if let Some(found) = found {
                viable.push(found);
            }
        }

        let span = self.program.arena().span(site.expr);
        let Some(best) = viable.iter().map(|v| v.cost).min() else {
            self.report_no_match(head, &candidates, site, flow, span, mode);
            return None;
        };
        let mut tied: SmallVec<[ElementId; 2]> = SmallVec::new();
        for v in viable.iter().filter(|v| v.cost == best) {
            if !tied.contains(&v.instance) {
                tied.push(v.instance);
            }
        }
        match tied.as_slice() {
            [] => None,
            [chosen] => {
                debug!(chosen = %self.program.internal_name(*chosen), cost = best, "overload selected");
                self.finish_candidate(*chosen, site, flow, mode)
            }
            [first, ..] if self.program.options().overload_policy == OverloadPolicy::FirstDeclared => {
                debug!(chosen = %self.program.internal_name(*first), "first declared of tied overloads");
                self.finish_candidate(*first, site, flow, mode)
            }
            [first, second, ..] => {
                let (first_span, second_span) = (self.program.element(*first).span, self.program.element(*second).span);
                self.report(
                    mode,
                    Diagnostic::error(ErrorCode::AMBIGUOUS_OVERLOAD)
                        .with_args([self.program.name_of(head).to_owned()])
                        .with_label(span, "more than one overload matches")
                        .with_related(first_span, "candidate")
                        .with_related(second_span, "candidate"),
                );
                None
            }
        }
    }

    /// The overload set of `head`, plus same-named methods of base classes
    /// that no candidate overrides.
    fn overload_candidates(&self, head: ElementId) -> SmallVec<[ElementId; 4]> {
        let Some(data) = self.program.function_prototype(head) else {
            return SmallVec::new();
        };
        let mut candidates: SmallVec<[ElementId; 4]> = if data.overloads.is_empty() {
            SmallVec::from_elem(head, 1)
        } else {
            data.overloads.iter().copied().collect()
        };
        let Some(class) = data.bound_class else {
            return candidates;
        };
        let name = self.program.element(head).name;
        let bases: SmallVec<[ElementId; 4]> = self.program.base_chain(class).skip(1).collect();
        for base in bases {
            let Some(inherited) = self.program.lookup_instance_member(base, name) else {
                continue;
            };
            let Some(inherited_data) = self.program.function_prototype(inherited) else {
                continue;
            };
            let set: SmallVec<[ElementId; 4]> = if inherited_data.overloads.is_empty() {
                SmallVec::from_elem(inherited, 1)
            } else {
                inherited_data.overloads.iter().copied().collect()
            };
            for candidate in set {
                if !self.is_overridden(candidate, &candidates) {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }

    /// Whether a candidate with the same parameter shape is already in
    /// `candidates`.
    fn is_overridden(&self, candidate: ElementId, candidates: &[ElementId]) -> bool {
        let Some(decl) = self.program.function_prototype(candidate).map(|data| data.decl) else {
            return true;
        };
        candidates.iter().any(|&other| {
            other == candidate
                || self
                    .program
                    .function_prototype(other)
                    .is_some_and(|data| tide_ir::Parameter::same_shapes(&data.decl.params, &decl.params))
        })
    }

    fn accepts_arity(&self, candidate: ElementId, count: usize) -> bool {
        self.program.function_prototype(candidate).is_some_and(|data| {
            let decl = data.decl;
            count >= decl.required_params() && (decl.has_rest() || count <= decl.params.len())
        })
    }

    /// Instantiate `candidate` and rank the arguments against it, silently.
    fn try_candidate(&mut self, candidate: ElementId, site: CallSite<'_>, flow: &dyn Flow) -> Option<Viable> {
        let instance = self.instantiate_call(candidate, site, flow, ReportMode::Swallow)?;
        let signature = self.function_signature(instance)?;
        let signature = self.program.signature_of(signature).clone();
        let params = self.argument_params(&signature, site.args.len());
        let mut cost = 0;
        for (&arg, &param) in site.args.iter().zip(&params) {
            // A rest parameter whose element type is unknown accepts anything.
            let Some(param) = param else {
                self.resolve_expression(arg, flow, None, ReportMode::Swallow)?;
                cost += 1;
                continue;
            };
            let arg_ty = self.resolve_expression(arg, flow, Some(param), ReportMode::Swallow)?;
            if !self.assignable(arg_ty, param) {
                return None;
            }
            if arg_ty != param {
                cost += 1;
            }
        }
        trace!(candidate = %self.program.internal_name(instance), cost, "candidate accepts call");
        Some(Viable { instance, cost })
    }

    /// Re-run the chosen candidate's arguments in the caller's mode so that
    /// the expressions are memoized against their parameter types. Reports
    /// the chosen instance held from its trial surface here.
    fn finish_candidate(
        &mut self,
        instance: ElementId,
        site: CallSite<'_>,
        flow: &dyn Flow,
        mode: ReportMode,
    ) -> Option<ElementId> {
        if mode.is_report() {
            self.replay_deferred(instance);
        }
        let signature = self.function_signature(instance)?;
        let signature = self.program.signature_of(signature).clone();
        let params = self.argument_params(&signature, site.args.len());
        for (&arg, &param) in site.args.iter().zip(&params) {
            self.resolve_expression(arg, flow, param, mode)?;
        }
        Some(instance)
    }

    fn report_no_match(
        &mut self,
        head: ElementId,
        candidates: &[ElementId],
        site: CallSite<'_>,
        flow: &dyn Flow,
        span: Span,
        mode: ReportMode,
    ) {
        if !mode.is_report() {
            return;
        }
        let mut arg_types = Vec::with_capacity(site.args.len());
        for &arg in site.args {
            let (ty, _) = self.probe(|r| r.resolve_expression(arg, flow, None, ReportMode::Swallow));
            arg_types.push(ty.map_or_else(|| "?".to_owned(), |ty| self.type_name(ty)));
        }
        let closest = candidates
            .iter()
            .copied()
            .find(|&candidate| self.accepts_arity(candidate, site.args.len()))
            .or_else(|| candidates.first().copied());
        let mut diagnostic = Diagnostic::error(ErrorCode::NO_MATCHING_OVERLOAD)
            .with_args([self.program.name_of(head).to_owned(), arg_types.join(", ")])
            .with_label(span, "no overload accepts these arguments");
        if let Some(closest) = closest {
            diagnostic = diagnostic.with_related(self.program.element(closest).span, "closest candidate");
        }
        self.report(mode, diagnostic);
    }
}
