//! Resolution of type syntax to [`Type`]s.
//!
//! Named types consult the contextual bindings first, then the builtin
//! names, then the lexical scope. Generic classes are instantiated through
//! the program caches; generic aliases expand in their own context.

use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::{ElementId, FunctionTypeNode, NamedTypeNode, ParameterKind, TypeName, TypeNode};
use tide_program::{ContextualTypes, ElementData, ElementKind};
use tide_stack::ensure_sufficient_stack;
use tide_types::{Signature, Type};

use crate::type_args::UseSite;
use crate::{ReportMode, Resolver};

/// Type operators written like a generic type with one argument.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum PseudoType {
    /// Key type of a class's `[]` operator.
    IndexOf,
    /// Value type of a class's `[]` operator.
    ValueOf,
    /// Return type of a function type.
    ReturnOf,
    NonNull,
}

impl PseudoType {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "indexof" => PseudoType::IndexOf,
            "valueof" => PseudoType::ValueOf,
            "returnof" => PseudoType::ReturnOf,
            "nonnull" => PseudoType::NonNull,
            _ => return None,
        })
    }
}

/// Lowercase alias of the `String` class.
const STRING_ALIAS: &str = "string";
pub(crate) const STRING_CLASS: &str = "String";

impl Resolver<'_, '_> {
    /// Resolve type syntax written inside `ctx_element` with `ctx_types`
    /// bound.
    pub fn resolve_type(
        &mut self,
        node: &TypeNode,
        ctx_element: ElementId,
        ctx_types: &ContextualTypes,
        mode: ReportMode,
    ) -> Option<Type> {
        ensure_sufficient_stack(|| match node {
            TypeNode::Named(named) => self.resolve_named_type(named, ctx_element, ctx_types, mode),
            TypeNode::Function(func) => self.resolve_function_type(func, ctx_element, ctx_types, mode),
        })
    }

    fn resolve_named_type(
        &mut self,
        node: &NamedTypeNode,
        ctx_element: ElementId,
        ctx_types: &ContextualTypes,
        mode: ReportMode,
    ) -> Option<Type> {
        if node.name.is_simple() {
            let name = node.name.first();
            let direct = ctx_types
                .get(&name)
                .copied()
                .or_else(|| self.program.builtin_type(name));
            if let Some(ty) = direct {
                if !node.type_args.is_empty() {
                    self.report(
                        mode,
                        Diagnostic::error(ErrorCode::WRONG_TYPE_ARGUMENT_COUNT)
                            .with_args(["0".to_owned(), node.type_args.len().to_string()])
                            .with_label(node.span, "not generic"),
                    );
                    return None;
                }
                return self.apply_nullable(ty, node, mode);
            }
            if node.type_args.len() == 1 {
                if let Some(pseudo) = PseudoType::from_name(self.name_str(name)) {
                    return self.resolve_pseudo_type(pseudo, node, ctx_element, ctx_types, mode);
                }
            }
        }

        let Some(element) = self.lookup_type_name(&node.name, ctx_element) else {
            self.report(
                mode,
                Diagnostic::error(ErrorCode::NOT_FOUND)
                    .with_args([self.type_path(&node.name)])
                    .with_label(node.name.span, "cannot find this type"),
            );
            return None;
        };

        let site = UseSite::new(ctx_element, ctx_types, node.span);
        let ty = match self.program.kind(element) {
            ElementKind::ClassPrototype | ElementKind::InterfacePrototype => {
                let class = self.instantiate_class(element, &node.type_args, site, mode)?;
                self.program.class_type(class)
            }
            ElementKind::Class | ElementKind::Interface if node.type_args.is_empty() => {
                self.program.class_type(element)
            }
            ElementKind::TypeDefinition => self.resolve_type_alias(element, node, site, mode)?,
            ElementKind::Enum if node.type_args.is_empty() => Type::I32,
            _ => {
                self.report(
                    mode,
                    Diagnostic::error(ErrorCode::NOT_A_TYPE)
                        .with_args([self.type_path(&node.name)])
                        .with_label(node.name.span, "not a type"),
                );
                return None;
            }
        };
        self.apply_nullable(ty, node, mode)
    }

    /// Element a possibly qualified type name refers to.
    pub(crate) fn lookup_type_name(&self, name: &TypeName, ctx_element: ElementId) -> Option<ElementId> {
        let (&first, rest) = name.segments.split_first()?;
        let mut current = self.program.lookup(ctx_element, first).or_else(|| {
            if name.is_simple() && self.name_str(first) == STRING_ALIAS {
                self.program.lookup(ctx_element, self.program.intern(STRING_CLASS))
            } else {
                None
            }
        })?;
        for &segment in rest {
            current = self.program.lookup_member(current, segment)?;
        }
        Some(current)
    }

    pub(crate) fn type_path(&self, name: &TypeName) -> String {
        name.segments
            .iter()
            .map(|&segment| self.name_str(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn apply_nullable(&mut self, ty: Type, node: &NamedTypeNode, mode: ReportMode) -> Option<Type> {
        if !node.nullable {
            return Some(ty);
        }
        if ty.is_reference() {
            return Some(ty.as_nullable());
        }
        self.report(
            mode,
            Diagnostic::error(ErrorCode::BASIC_TYPE_NOT_NULLABLE)
                .with_args([self.type_name(ty)])
                .with_label(node.span, "value types cannot be null"),
        );
        None
    }

    /// Expand a type alias. Generic aliases bind their parameters first;
    /// the target always resolves in the alias's own scope.
    fn resolve_type_alias(
        &mut self,
        alias: ElementId,
        node: &NamedTypeNode,
        site: UseSite<'_>,
        mode: ReportMode,
    ) -> Option<Type> {
        let ElementData::TypeDefinition(data) = &self.program.element(alias).data else {
            return None;
        };
        let decl = data.decl;
        if !self.resolving_aliases.insert(alias) {
            tracing::debug!(alias = %self.program.internal_name(alias), "cyclic type alias");
            self.report(
                mode,
                Diagnostic::error(ErrorCode::CYCLIC_DEFINITION)
                    .with_args([self.element_name(alias)])
                    .with_label(node.span, "alias refers to itself"),
            );
            return None;
        }
        let scope = self.program.element(alias).parent.unwrap_or(site.scope);
        let result = self
            .resolve_type_arguments(alias, &decl.type_params, &node.type_args, site, site.ctx_types.clone(), mode)
            .and_then(|(_, bindings)| self.resolve_type(&decl.ty, scope, &bindings, mode));
        self.resolving_aliases.remove(&alias);
        result
    }

    fn resolve_function_type(
        &mut self,
        node: &FunctionTypeNode,
        ctx_element: ElementId,
        ctx_types: &ContextualTypes,
        mode: ReportMode,
    ) -> Option<Type> {
        let mut params = Vec::with_capacity(node.params.len());
        for param in &node.params {
            let Some(param_node) = &param.ty else {
                self.report(
                    mode,
                    Diagnostic::error(ErrorCode::TYPE_EXPECTED).with_label(param.span, "parameter type missing"),
                );
                return None;
            };
            params.push(self.resolve_type(param_node, ctx_element, ctx_types, mode)?);
        }
        let ret = self.resolve_type(&node.ret, ctx_element, ctx_types, mode)?;
        let this_type = match &node.explicit_this {
            Some(this_node) => Some(self.resolve_type(this_node, ctx_element, ctx_types, mode)?),
            None => None,
        };

        let required = node
            .params
            .iter()
            .rposition(|param| param.kind == ParameterKind::Default)
            .map_or(0, |index| index + 1);
        let mut signature = Signature::new(params, ret).with_required(required);
        if let Some(this_type) = this_type {
            signature = signature.with_this(this_type);
        }
        if node.params.last().is_some_and(|param| param.kind == ParameterKind::Rest) {
            signature = signature.with_rest();
        }
        let ty = Type::function(self.program.intern_signature(signature));
        Some(if node.nullable { ty.as_nullable() } else { ty })
    }

    fn resolve_pseudo_type(
        &mut self,
        pseudo: PseudoType,
        node: &NamedTypeNode,
        ctx_element: ElementId,
        ctx_types: &ContextualTypes,
        mode: ReportMode,
    ) -> Option<Type> {
        let operand_node = node.type_args.first()?;
        let operand = self.resolve_type(operand_node, ctx_element, ctx_types, mode)?;
        let ty = match pseudo {
            PseudoType::NonNull => operand.non_nullable(),
            PseudoType::ReturnOf => match operand.signature_reference() {
                Some(signature) => self.program.signature_of(signature).ret,
                None => {
                    self.report(
                        mode,
                        Diagnostic::error(ErrorCode::OPERATION_NOT_SUPPORTED)
                            .with_args(["returnof".to_owned(), self.type_name(operand)])
                            .with_label(operand_node.span(), "not a function type"),
                    );
                    return None;
                }
            },
            PseudoType::IndexOf | PseudoType::ValueOf => {
                let getter = operand
                    .class_reference()
                    .and_then(|class| self.indexed_get_signature(class));
                let projected = getter.and_then(|signature| {
                    let signature = self.program.signature_of(signature);
                    if pseudo == PseudoType::IndexOf {
                        signature.params.first().copied()
                    } else {
                        Some(signature.ret)
                    }
                });
                let Some(projected) = projected else {
                    self.report(
                        mode,
                        Diagnostic::error(ErrorCode::INDEX_SIGNATURE_MISSING)
                            .with_args([self.type_name(operand)])
                            .with_label(operand_node.span(), "no `[]` operator"),
                    );
                    return None;
                };
                projected
            }
        };
        self.apply_nullable(ty, node, mode)
    }
}

#[cfg(test)]
mod tests;
