//! Syntax tree consumed by the program initializer and the resolver.
//!
//! Declarations and type nodes are ordinary owned trees; expressions are
//! flattened into an [`ExprArena`] and referenced by [`ExprId`].

mod decl;
mod expr;
mod types;

pub use decl::{
    ClassDecl, ClassMember, EnumDecl, EnumValueDecl, ExportDecl, ExportMember, ExportStarDecl,
    FieldDecl, FunctionDecl, ImportDecl, ImportMember, Item, NamespaceDecl, OperatorKind, Source,
    Statement, TypeAliasDecl, VariableDecl,
};
pub use expr::{BinaryOp, Expr, ExprArena, ExprId, ExprKind, Literal, UnaryOp};
pub use types::{
    FunctionTypeNode, NamedTypeNode, Parameter, ParameterKind, TypeName, TypeNode, TypeParameter,
};
