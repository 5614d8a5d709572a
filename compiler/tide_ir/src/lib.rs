//! Tide IR - syntax and identifier types
//!
//! This crate contains the data structures shared by every phase of the Tide
//! compiler:
//! - Spans for source locations
//! - Names for interned identifiers
//! - The syntax tree produced by the parser (type nodes, expressions,
//!   declarations) with expressions flattened into an `ExprArena`
//! - `ElementId`, the handle of a program element in the program arena
//! - Modifier and decorator flags carried by declarations
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → `Name(u32)`
//! - **Flatten Expressions**: expressions are referenced by `ExprId`, so the
//!   resolver can memoize per node and borrow the arena independently of the
//!   program it mutates
//! - Types that contain floats store them as u64 bits for Hash compatibility

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
pub mod builder;
mod element_id;
mod flags;
mod interner;
mod name;
mod span;

pub use ast::{
    BinaryOp, ClassDecl, ClassMember, EnumDecl, EnumValueDecl, ExportDecl, ExportMember,
    ExportStarDecl, Expr, ExprArena, ExprId, ExprKind, FieldDecl, FunctionDecl, FunctionTypeNode,
    ImportDecl, ImportMember, Item, Literal, NamedTypeNode, NamespaceDecl, OperatorKind,
    Parameter, ParameterKind, Source, Statement, TypeAliasDecl, TypeName, TypeNode,
    TypeParameter, UnaryOp, VariableDecl,
};
pub use element_id::ElementId;
pub use flags::{CommonFlags, DecoratorFlags};
pub use interner::StringInterner;
pub use name::Name;
pub use span::Span;

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{ElementId, ExprId, Name, Span};
    crate::static_assert_size!(Span, 8);
    crate::static_assert_size!(Name, 4);
    crate::static_assert_size!(ExprId, 4);
    crate::static_assert_size!(ElementId, 4);
}
