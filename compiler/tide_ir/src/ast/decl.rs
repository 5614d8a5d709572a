//! Declarations, statements and source files.

use super::{Parameter, TypeNode, TypeParameter};
use crate::{CommonFlags, DecoratorFlags, ExprId, Name, Span};

/// A parsed source file.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Source {
    /// Normalized path without extension, e.g. `lib/array` or `main`.
    pub path: String,
    pub items: Vec<Item>,
}

impl Source {
    pub fn new(path: impl Into<String>, items: Vec<Item>) -> Self {
        Source {
            path: path.into(),
            items,
        }
    }
}

/// Top-level or namespace-level item.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Item {
    Class(ClassDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
    Enum(EnumDecl),
    Namespace(NamespaceDecl),
    TypeAlias(TypeAliasDecl),
    Import(ImportDecl),
    Export(ExportDecl),
    ExportStar(ExportStarDecl),
    /// Top-level statement, part of the file's start code.
    Statement(Statement),
}

/// Operator named by an `@operator("...")` decorator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OperatorKind {
    /// `[]`
    IndexedGet,
    /// `[]=`
    IndexedSet,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    /// prefix `!`
    Not,
    /// prefix `-`
    Neg,
}

impl OperatorKind {
    /// Parse the decorator argument.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "[]" => OperatorKind::IndexedGet,
            "[]=" => OperatorKind::IndexedSet,
            "+" => OperatorKind::Add,
            "-" => OperatorKind::Sub,
            "*" => OperatorKind::Mul,
            "/" => OperatorKind::Div,
            "%" => OperatorKind::Rem,
            "==" => OperatorKind::Eq,
            "!=" => OperatorKind::Ne,
            "<" => OperatorKind::Lt,
            ">" => OperatorKind::Gt,
            "<=" => OperatorKind::Le,
            ">=" => OperatorKind::Ge,
            "!" => OperatorKind::Not,
            "neg" => OperatorKind::Neg,
            _ => return None,
        })
    }
}

/// Class or interface declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassDecl {
    pub name: Name,
    pub name_span: Span,
    pub type_params: Vec<TypeParameter>,
    /// Base class. For interfaces, extended interfaces go to `implements`.
    pub extends: Option<TypeNode>,
    pub implements: Vec<TypeNode>,
    pub members: Vec<ClassMember>,
    pub flags: CommonFlags,
    pub decorators: DecoratorFlags,
    pub is_interface: bool,
    pub span: Span,
}

impl ClassDecl {
    /// The explicit constructor, if declared.
    pub fn constructor(&self) -> Option<&FunctionDecl> {
        self.members.iter().find_map(|member| match member {
            ClassMember::Method(method) if method.flags.contains(CommonFlags::CONSTRUCTOR) => {
                Some(method)
            }
            _ => None,
        })
    }
}

/// A class body member.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClassMember {
    Field(FieldDecl),
    /// Methods, accessors (`GET`/`SET` flags) and the constructor.
    Method(FunctionDecl),
}

/// Field declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldDecl {
    pub name: Name,
    pub name_span: Span,
    pub ty: Option<TypeNode>,
    pub initializer: Option<ExprId>,
    pub flags: CommonFlags,
    pub decorators: DecoratorFlags,
    pub span: Span,
}

/// Function, method, accessor, constructor or function expression.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionDecl {
    pub name: Name,
    pub name_span: Span,
    pub type_params: Vec<TypeParameter>,
    pub params: Vec<Parameter>,
    /// `None` when omitted.
    pub return_type: Option<TypeNode>,
    pub explicit_this: Option<TypeNode>,
    /// `None` for ambient declarations and interface/abstract members.
    pub body: Option<Vec<Statement>>,
    pub flags: CommonFlags,
    pub decorators: DecoratorFlags,
    pub operator: Option<OperatorKind>,
    pub span: Span,
}

impl FunctionDecl {
    /// Number of parameters that must be supplied by a call.
    pub fn required_params(&self) -> usize {
        self.params
            .iter()
            .rposition(|p| p.kind == super::ParameterKind::Default)
            .map_or(0, |idx| idx + 1)
    }

    /// Whether the last parameter is a rest parameter.
    pub fn has_rest(&self) -> bool {
        self.params
            .last()
            .is_some_and(|p| p.kind == super::ParameterKind::Rest)
    }
}

/// `let`/`const`/`var` declaration of a single name.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct VariableDecl {
    pub name: Name,
    pub name_span: Span,
    pub ty: Option<TypeNode>,
    pub initializer: Option<ExprId>,
    pub flags: CommonFlags,
    pub decorators: DecoratorFlags,
    pub span: Span,
}

/// Enum declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct EnumDecl {
    pub name: Name,
    pub name_span: Span,
    pub values: Vec<EnumValueDecl>,
    pub flags: CommonFlags,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct EnumValueDecl {
    pub name: Name,
    pub name_span: Span,
    pub initializer: Option<ExprId>,
    pub span: Span,
}

/// `namespace ns { ... }`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct NamespaceDecl {
    pub name: Name,
    pub name_span: Span,
    pub items: Vec<Item>,
    pub flags: CommonFlags,
    pub span: Span,
}

/// `type Alias<T> = ...`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeAliasDecl {
    pub name: Name,
    pub name_span: Span,
    pub type_params: Vec<TypeParameter>,
    pub ty: TypeNode,
    pub flags: CommonFlags,
    pub span: Span,
}

/// `import { a as b } from "path"` or `import * as ns from "path"`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ImportDecl {
    /// Normalized path of the imported file.
    pub path: String,
    pub members: Vec<ImportMember>,
    /// `* as ns`
    pub namespace: Option<(Name, Span)>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ImportMember {
    /// Name exported by the foreign file.
    pub foreign: Name,
    /// Name bound in the importing file.
    pub local: Name,
    pub span: Span,
}

/// `export { a as b }` or `export { a as b } from "path"`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExportDecl {
    /// Re-export source; `None` exports local declarations.
    pub path: Option<String>,
    pub members: Vec<ExportMember>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExportMember {
    pub local: Name,
    pub exported: Name,
    pub span: Span,
}

/// `export * from "path"`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExportStarDecl {
    pub path: String,
    pub span: Span,
}

/// Statements. Only the forms the resolver and driver need to see.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Statement {
    Expression(ExprId),
    Variable(VariableDecl),
    Return {
        value: Option<ExprId>,
        span: Span,
    },
    Block(Vec<Statement>),
    If {
        condition: ExprId,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    While {
        condition: ExprId,
        body: Box<Statement>,
    },
}
