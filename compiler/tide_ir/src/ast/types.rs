//! Type syntax: named types, function types, type parameters, parameters.

use crate::{CommonFlags, ExprId, Name, Span};

/// A possibly qualified type name: `Foo` or `ns.Foo`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeName {
    /// Name segments, outermost first. Never empty.
    pub segments: Vec<Name>,
    pub span: Span,
}

impl TypeName {
    /// Create a single-segment name.
    pub fn simple(name: Name, span: Span) -> Self {
        TypeName {
            segments: vec![name],
            span,
        }
    }

    /// First segment, looked up lexically.
    #[inline]
    pub fn first(&self) -> Name {
        self.segments.first().copied().unwrap_or(Name::EMPTY)
    }

    /// Last segment, the name of the referenced element.
    #[inline]
    pub fn last(&self) -> Name {
        self.segments.last().copied().unwrap_or(Name::EMPTY)
    }

    /// Whether this is an unqualified name.
    #[inline]
    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }
}

/// A type annotation as written.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeNode {
    /// `Foo`, `Map<K, V>`, `ns.Foo | null`
    Named(NamedTypeNode),
    /// `(a: i32, b: T) => R`
    Function(FunctionTypeNode),
}

/// A named type reference with optional type arguments.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct NamedTypeNode {
    pub name: TypeName,
    /// Type arguments, empty if none were written.
    pub type_args: Vec<TypeNode>,
    /// Written as `T | null`.
    pub nullable: bool,
    pub span: Span,
}

/// A function type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionTypeNode {
    pub params: Vec<Parameter>,
    pub ret: Box<TypeNode>,
    /// Explicit `this: T` parameter.
    pub explicit_this: Option<Box<TypeNode>>,
    pub nullable: bool,
    pub span: Span,
}

impl TypeNode {
    /// Source range of the whole annotation.
    pub fn span(&self) -> Span {
        match self {
            TypeNode::Named(named) => named.span,
            TypeNode::Function(func) => func.span,
        }
    }

    /// Whether the annotation is written as nullable.
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeNode::Named(named) => named.nullable,
            TypeNode::Function(func) => func.nullable,
        }
    }

    /// Structural equality ignoring spans.
    pub fn same_shape(&self, other: &TypeNode) -> bool {
        match (self, other) {
            (TypeNode::Named(a), TypeNode::Named(b)) => {
                a.name.segments == b.name.segments
                    && a.nullable == b.nullable
                    && a.type_args.len() == b.type_args.len()
                    && a.type_args.iter().zip(&b.type_args).all(|(x, y)| x.same_shape(y))
            }
            (TypeNode::Function(a), TypeNode::Function(b)) => {
                a.nullable == b.nullable
                    && a.ret.same_shape(&b.ret)
                    && Parameter::same_shapes(&a.params, &b.params)
            }
            _ => false,
        }
    }

    /// Whether this annotation mentions any of the given type parameters,
    /// at any depth.
    pub fn mentions_any(&self, type_params: &[TypeParameter]) -> bool {
        match self {
            TypeNode::Named(named) => {
                (named.name.is_simple()
                    && named.type_args.is_empty()
                    && type_params.iter().any(|p| p.name == named.name.first()))
                    || named.type_args.iter().any(|arg| arg.mentions_any(type_params))
            }
            TypeNode::Function(func) => {
                func.ret.mentions_any(type_params)
                    || func
                        .explicit_this
                        .as_ref()
                        .is_some_and(|this| this.mentions_any(type_params))
                    || func.params.iter().any(|p| {
                        p.ty
                            .as_ref()
                            .is_some_and(|ty| ty.mentions_any(type_params))
                    })
            }
        }
    }
}

/// A declared type parameter: `T extends Bound = Default`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeParameter {
    pub name: Name,
    pub extends: Option<TypeNode>,
    pub default: Option<TypeNode>,
    pub span: Span,
}

/// How a parameter participates in arity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ParameterKind {
    /// Required positional parameter.
    #[default]
    Default,
    /// `x?: T` or `x: T = init`
    Optional,
    /// `...xs: T[]`
    Rest,
}

/// A function or function-type parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Parameter {
    pub name: Name,
    /// `None` when omitted, e.g. in a contextually typed function expression.
    pub ty: Option<TypeNode>,
    pub initializer: Option<ExprId>,
    pub kind: ParameterKind,
    /// Visibility/readonly modifiers on a constructor parameter property;
    /// empty for ordinary parameters.
    pub implicit_field: CommonFlags,
    pub span: Span,
}

impl Parameter {
    /// Whether this constructor parameter also declares a field.
    #[inline]
    pub fn is_parameter_property(&self) -> bool {
        !self.implicit_field.is_empty()
    }

    /// Whether two parameter lists agree on kinds and annotated types,
    /// ignoring names and spans.
    pub fn same_shapes(a: &[Parameter], b: &[Parameter]) -> bool {
        a.len() == b.len()
            && a.iter().zip(b).all(|(x, y)| {
                x.kind == y.kind
                    && match (&x.ty, &y.ty) {
                        (Some(tx), Some(ty)) => tx.same_shape(ty),
                        (None, None) => true,
                        _ => false,
                    }
            })
    }
}
