//! Expression nodes and the arena that owns them.

use std::fmt;
use std::ops::Index;

use super::{ClassDecl, FunctionDecl, OperatorKind, TypeName, TypeNode};
use crate::{Name, Span};

/// Index of an expression in an [`ExprArena`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ExprId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Expression node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Literal values.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Integer(i64),
    /// IEEE-754 bits of an `f64`.
    Float(u64),
    String(Name),
    Array(Vec<ExprId>),
    /// `{ a: 1, b: x }`, typed by its contextual class type.
    Object(Vec<(Name, ExprId)>),
}

impl Literal {
    /// Float literal from a value.
    pub fn float(value: f64) -> Self {
        Literal::Float(value.to_bits())
    }
}

/// Binary operators, including assignments.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Shl,
    Shr,
    ShrU,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Gt,
    Le,
    Ge,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    /// Plain or compound assignment.
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
        )
    }

    /// Produces `bool` for value operands.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::StrictEq
                | BinaryOp::StrictNe
                | BinaryOp::Lt
                | BinaryOp::Gt
                | BinaryOp::Le
                | BinaryOp::Ge
        )
    }

    /// Shift operators keep the left operand's type.
    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr | BinaryOp::ShrU)
    }

    /// Operator overload consulted when the left operand is a class.
    pub fn overload_kind(self) -> Option<OperatorKind> {
        Some(match self {
            BinaryOp::Add | BinaryOp::AddAssign => OperatorKind::Add,
            BinaryOp::Sub | BinaryOp::SubAssign => OperatorKind::Sub,
            BinaryOp::Mul | BinaryOp::MulAssign => OperatorKind::Mul,
            BinaryOp::Div | BinaryOp::DivAssign => OperatorKind::Div,
            BinaryOp::Rem => OperatorKind::Rem,
            BinaryOp::Eq | BinaryOp::StrictEq => OperatorKind::Eq,
            BinaryOp::Ne | BinaryOp::StrictNe => OperatorKind::Ne,
            BinaryOp::Lt => OperatorKind::Lt,
            BinaryOp::Gt => OperatorKind::Gt,
            BinaryOp::Le => OperatorKind::Le,
            BinaryOp::Ge => OperatorKind::Ge,
            _ => return None,
        })
    }
}

/// Unary operators, prefix and postfix.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    /// Operator overload consulted when the operand is a class.
    pub fn overload_kind(self) -> Option<OperatorKind> {
        match self {
            UnaryOp::Not => Some(OperatorKind::Not),
            UnaryOp::Minus => Some(OperatorKind::Neg),
            _ => None,
        }
    }
}

/// Expression variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Identifier(Name),
    Literal(Literal),
    True,
    False,
    Null,
    This,
    Super,
    Call {
        callee: ExprId,
        /// Explicit type arguments; `None` when omitted (inference applies).
        type_args: Option<Vec<TypeNode>>,
        args: Vec<ExprId>,
    },
    New {
        class: TypeName,
        type_args: Option<Vec<TypeNode>>,
        args: Vec<ExprId>,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Ternary {
        condition: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    PropertyAccess {
        target: ExprId,
        property: Name,
        property_span: Span,
    },
    ElementAccess {
        target: ExprId,
        index: ExprId,
    },
    /// `x as T` / `<T>x`
    As {
        expr: ExprId,
        to: TypeNode,
    },
    /// `x!`
    NonNull(ExprId),
    InstanceOf {
        expr: ExprId,
        is_type: TypeNode,
    },
    Comma(Vec<ExprId>),
    Paren(ExprId),
    Function(Box<FunctionDecl>),
    Class(Box<ClassDecl>),
}

/// Owner of every expression of a program.
///
/// The parser allocates all files' expressions into one arena so that an
/// `ExprId` identifies a node program-wide.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` expressions are allocated.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = u32::try_from(self.exprs.len())
            .unwrap_or_else(|_| panic!("expression arena exceeded u32::MAX entries"));
        self.exprs.push(expr);
        ExprId(id)
    }

    /// Get an expression by id.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Span of an expression.
    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.exprs[id.index()].span
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

impl Index<ExprId> for ExprArena {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        self.get(id)
    }
}
