//! Programmatic AST construction.
//!
//! The parser is an external collaborator, so the resolver's tests and the
//! driver's integration tests build their syntax trees through this builder.
//! Every node gets a fresh, distinct span so diagnostics can be told apart
//! by location.

use crate::ast::{
    BinaryOp, ClassDecl, ClassMember, EnumDecl, EnumValueDecl, ExportDecl, ExportMember,
    ExportStarDecl, Expr, ExprArena, ExprId, ExprKind, FieldDecl, FunctionDecl, FunctionTypeNode,
    ImportDecl, ImportMember, Item, Literal, NamedTypeNode, NamespaceDecl, OperatorKind,
    Parameter, ParameterKind, Statement, TypeAliasDecl, TypeName, TypeNode, TypeParameter,
    UnaryOp, VariableDecl,
};
use crate::{CommonFlags, DecoratorFlags, Name, Span, StringInterner};

/// Builds syntax nodes into an owned [`ExprArena`].
pub struct AstBuilder<'i> {
    interner: &'i StringInterner,
    arena: ExprArena,
    next_pos: u32,
}

impl<'i> AstBuilder<'i> {
    pub fn new(interner: &'i StringInterner) -> Self {
        AstBuilder {
            interner,
            arena: ExprArena::new(),
            next_pos: 0,
        }
    }

    /// Intern a name.
    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Allocate a fresh span.
    pub fn span(&mut self) -> Span {
        let start = self.next_pos;
        self.next_pos += 2;
        Span::new(start, start + 1)
    }

    /// Consume the builder, returning the expression arena.
    pub fn finish(self) -> ExprArena {
        self.arena
    }

    /// Read back an allocated expression.
    pub fn expr_span(&self, id: ExprId) -> Span {
        self.arena.span(id)
    }

    // === Types ===

    /// `Name`
    pub fn ty(&mut self, name: &str) -> TypeNode {
        self.generic(name, Vec::new())
    }

    /// `Name<args...>`
    pub fn generic(&mut self, name: &str, type_args: Vec<TypeNode>) -> TypeNode {
        self.qualified(&[name], type_args)
    }

    /// `a.b.Name<args...>`
    pub fn qualified(&mut self, path: &[&str], type_args: Vec<TypeNode>) -> TypeNode {
        let span = self.span();
        TypeNode::Named(NamedTypeNode {
            name: TypeName {
                segments: path.iter().map(|s| self.interner.intern(s)).collect(),
                span,
            },
            type_args,
            nullable: false,
            span,
        })
    }

    /// `(params) => ret`
    pub fn fn_type(&mut self, params: Vec<Parameter>, ret: TypeNode) -> TypeNode {
        let span = self.span();
        TypeNode::Function(FunctionTypeNode {
            params,
            ret: Box::new(ret),
            explicit_this: None,
            nullable: false,
            span,
        })
    }

    /// `T | null`
    pub fn nullable(ty: TypeNode) -> TypeNode {
        match ty {
            TypeNode::Named(mut named) => {
                named.nullable = true;
                TypeNode::Named(named)
            }
            TypeNode::Function(mut func) => {
                func.nullable = true;
                TypeNode::Function(func)
            }
        }
    }

    /// `T`
    pub fn type_param(&mut self, name: &str) -> TypeParameter {
        self.type_param_with(name, None, None)
    }

    /// `T extends Bound = Default`
    pub fn type_param_with(
        &mut self,
        name: &str,
        extends: Option<TypeNode>,
        default: Option<TypeNode>,
    ) -> TypeParameter {
        TypeParameter {
            name: self.interner.intern(name),
            extends,
            default,
            span: self.span(),
        }
    }

    // === Parameters ===

    /// `name: ty`
    pub fn param(&mut self, name: &str, ty: TypeNode) -> Parameter {
        self.make_param(name, Some(ty), ParameterKind::Default)
    }

    /// `name?: ty`
    pub fn optional_param(&mut self, name: &str, ty: TypeNode) -> Parameter {
        self.make_param(name, Some(ty), ParameterKind::Optional)
    }

    /// `name: ty = init`
    pub fn default_param(&mut self, name: &str, ty: TypeNode, init: ExprId) -> Parameter {
        let mut param = self.make_param(name, Some(ty), ParameterKind::Optional);
        param.initializer = Some(init);
        param
    }

    /// `...name: ty`
    pub fn rest_param(&mut self, name: &str, ty: TypeNode) -> Parameter {
        self.make_param(name, Some(ty), ParameterKind::Rest)
    }

    /// `name` without annotation, for contextually typed function expressions.
    pub fn untyped_param(&mut self, name: &str) -> Parameter {
        self.make_param(name, None, ParameterKind::Default)
    }

    /// `public name: ty` on a constructor.
    pub fn param_property(&mut self, name: &str, ty: TypeNode, modifiers: CommonFlags) -> Parameter {
        let mut param = self.make_param(name, Some(ty), ParameterKind::Default);
        param.implicit_field = modifiers | CommonFlags::PUBLIC;
        param
    }

    fn make_param(&mut self, name: &str, ty: Option<TypeNode>, kind: ParameterKind) -> Parameter {
        Parameter {
            name: self.interner.intern(name),
            ty,
            initializer: None,
            kind,
            implicit_field: CommonFlags::empty(),
            span: self.span(),
        }
    }

    // === Expressions ===

    /// Allocate an expression with a fresh span.
    pub fn expr(&mut self, kind: ExprKind) -> ExprId {
        let span = self.span();
        self.arena.alloc(Expr::new(kind, span))
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.expr(ExprKind::Identifier(name))
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Integer(value)))
    }

    pub fn float(&mut self, value: f64) -> ExprId {
        self.expr(ExprKind::Literal(Literal::float(value)))
    }

    pub fn string(&mut self, value: &str) -> ExprId {
        let name = self.interner.intern(value);
        self.expr(ExprKind::Literal(Literal::String(name)))
    }

    pub fn array(&mut self, elements: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Array(elements)))
    }

    pub fn object(&mut self, fields: &[(&str, ExprId)]) -> ExprId {
        let fields = fields
            .iter()
            .map(|&(name, value)| (self.interner.intern(name), value))
            .collect();
        self.expr(ExprKind::Literal(Literal::Object(fields)))
    }

    pub fn true_(&mut self) -> ExprId {
        self.expr(ExprKind::True)
    }

    pub fn false_(&mut self) -> ExprId {
        self.expr(ExprKind::False)
    }

    pub fn null(&mut self) -> ExprId {
        self.expr(ExprKind::Null)
    }

    pub fn this(&mut self) -> ExprId {
        self.expr(ExprKind::This)
    }

    pub fn super_(&mut self) -> ExprId {
        self.expr(ExprKind::Super)
    }

    /// `callee(args...)`
    pub fn call(&mut self, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Call {
            callee,
            type_args: None,
            args,
        })
    }

    /// `callee<type_args...>(args...)`
    pub fn call_generic(
        &mut self,
        callee: ExprId,
        type_args: Vec<TypeNode>,
        args: Vec<ExprId>,
    ) -> ExprId {
        self.expr(ExprKind::Call {
            callee,
            type_args: Some(type_args),
            args,
        })
    }

    /// `new Class(args...)`, inferring type arguments.
    pub fn new_(&mut self, class: &str, args: Vec<ExprId>) -> ExprId {
        let span = self.span();
        let class = TypeName::simple(self.interner.intern(class), span);
        self.expr(ExprKind::New {
            class,
            type_args: None,
            args,
        })
    }

    /// `new Class<type_args...>(args...)`
    pub fn new_generic(&mut self, class: &str, type_args: Vec<TypeNode>, args: Vec<ExprId>) -> ExprId {
        let span = self.span();
        let class = TypeName::simple(self.interner.intern(class), span);
        self.expr(ExprKind::New {
            class,
            type_args: Some(type_args),
            args,
        })
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right })
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> ExprId {
        self.binary(BinaryOp::Assign, target, value)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, operand })
    }

    pub fn ternary(&mut self, condition: ExprId, then_expr: ExprId, else_expr: ExprId) -> ExprId {
        self.expr(ExprKind::Ternary {
            condition,
            then_expr,
            else_expr,
        })
    }

    /// `target.property`
    pub fn prop(&mut self, target: ExprId, property: &str) -> ExprId {
        let property = self.interner.intern(property);
        let property_span = self.span();
        self.expr(ExprKind::PropertyAccess {
            target,
            property,
            property_span,
        })
    }

    /// `target[index]`
    pub fn index(&mut self, target: ExprId, index: ExprId) -> ExprId {
        self.expr(ExprKind::ElementAccess { target, index })
    }

    /// `expr as ty`
    pub fn as_(&mut self, expr: ExprId, to: TypeNode) -> ExprId {
        self.expr(ExprKind::As { expr, to })
    }

    /// `expr!`
    pub fn non_null(&mut self, expr: ExprId) -> ExprId {
        self.expr(ExprKind::NonNull(expr))
    }

    pub fn instance_of(&mut self, expr: ExprId, is_type: TypeNode) -> ExprId {
        self.expr(ExprKind::InstanceOf { expr, is_type })
    }

    pub fn comma(&mut self, exprs: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Comma(exprs))
    }

    pub fn paren(&mut self, inner: ExprId) -> ExprId {
        self.expr(ExprKind::Paren(inner))
    }

    /// Function expression from a declaration built with [`Self::func`].
    pub fn function_expr(&mut self, decl: FunctionDecl) -> ExprId {
        self.expr(ExprKind::Function(Box::new(decl)))
    }

    // === Statements ===

    pub fn expr_stmt(expr: ExprId) -> Statement {
        Statement::Expression(expr)
    }

    pub fn ret(&mut self, value: ExprId) -> Statement {
        Statement::Return {
            value: Some(value),
            span: self.span(),
        }
    }

    pub fn ret_void(&mut self) -> Statement {
        Statement::Return {
            value: None,
            span: self.span(),
        }
    }

    /// `let name: ty = init`
    pub fn var(&mut self, name: &str, ty: Option<TypeNode>, init: Option<ExprId>) -> VariableDecl {
        VariableDecl {
            name: self.interner.intern(name),
            name_span: self.span(),
            ty,
            initializer: init,
            flags: CommonFlags::LET,
            decorators: DecoratorFlags::empty(),
            span: self.span(),
        }
    }

    /// `let` statement.
    pub fn let_(&mut self, name: &str, ty: Option<TypeNode>, init: Option<ExprId>) -> Statement {
        Statement::Variable(self.var(name, ty, init))
    }

    // === Declarations ===

    /// Function with an empty body.
    pub fn func(&mut self, name: &str) -> FunctionBuilder {
        FunctionBuilder {
            decl: FunctionDecl {
                name: self.interner.intern(name),
                name_span: self.span(),
                type_params: Vec::new(),
                params: Vec::new(),
                return_type: None,
                explicit_this: None,
                body: Some(Vec::new()),
                flags: CommonFlags::empty(),
                decorators: DecoratorFlags::empty(),
                operator: None,
                span: self.span(),
            },
        }
    }

    /// Class constructor.
    pub fn constructor(&mut self) -> FunctionBuilder {
        self.func("constructor").flags(CommonFlags::CONSTRUCTOR)
    }

    /// `get name()`
    pub fn getter(&mut self, name: &str, ty: TypeNode) -> FunctionBuilder {
        self.func(name).flags(CommonFlags::GET).returns(ty)
    }

    /// `set name(value)`
    pub fn setter(&mut self, name: &str, ty: TypeNode) -> FunctionBuilder {
        let value = self.param("value", ty);
        self.func(name).flags(CommonFlags::SET).param(value)
    }

    /// `@operator(token)` method.
    pub fn operator(&mut self, name: &str, op: OperatorKind) -> FunctionBuilder {
        let mut builder = self.func(name);
        builder.decl.operator = Some(op);
        builder.decl.decorators |= DecoratorFlags::OPERATOR;
        builder
    }

    pub fn class(&mut self, name: &str) -> ClassBuilder {
        ClassBuilder {
            decl: ClassDecl {
                name: self.interner.intern(name),
                name_span: self.span(),
                type_params: Vec::new(),
                extends: None,
                implements: Vec::new(),
                members: Vec::new(),
                flags: CommonFlags::empty(),
                decorators: DecoratorFlags::empty(),
                is_interface: false,
                span: self.span(),
            },
        }
    }

    pub fn interface(&mut self, name: &str) -> ClassBuilder {
        let mut builder = self.class(name);
        builder.decl.is_interface = true;
        builder
    }

    /// `name: ty`
    pub fn field(&mut self, name: &str, ty: TypeNode) -> FieldDecl {
        FieldDecl {
            name: self.interner.intern(name),
            name_span: self.span(),
            ty: Some(ty),
            initializer: None,
            flags: CommonFlags::empty(),
            decorators: DecoratorFlags::empty(),
            span: self.span(),
        }
    }

    /// `name: ty = init`
    pub fn field_init(&mut self, name: &str, ty: Option<TypeNode>, init: ExprId) -> FieldDecl {
        FieldDecl {
            name: self.interner.intern(name),
            name_span: self.span(),
            ty,
            initializer: Some(init),
            flags: CommonFlags::empty(),
            decorators: DecoratorFlags::empty(),
            span: self.span(),
        }
    }

    pub fn namespace(&mut self, name: &str, items: Vec<Item>) -> NamespaceDecl {
        NamespaceDecl {
            name: self.interner.intern(name),
            name_span: self.span(),
            items,
            flags: CommonFlags::empty(),
            span: self.span(),
        }
    }

    /// Enum with implicitly numbered values.
    pub fn enum_(&mut self, name: &str, values: &[&str]) -> EnumDecl {
        let values = values
            .iter()
            .map(|value| EnumValueDecl {
                name: self.interner.intern(value),
                name_span: self.span(),
                initializer: None,
                span: self.span(),
            })
            .collect();
        EnumDecl {
            name: self.interner.intern(name),
            name_span: self.span(),
            values,
            flags: CommonFlags::empty(),
            span: self.span(),
        }
    }

    /// `type name<type_params> = ty`
    pub fn type_alias(
        &mut self,
        name: &str,
        type_params: Vec<TypeParameter>,
        ty: TypeNode,
    ) -> TypeAliasDecl {
        TypeAliasDecl {
            name: self.interner.intern(name),
            name_span: self.span(),
            type_params,
            ty,
            flags: CommonFlags::empty(),
            span: self.span(),
        }
    }

    /// `import { foreign as local, ... } from "path"`
    pub fn import(&mut self, path: &str, members: &[(&str, &str)]) -> Item {
        let members = members
            .iter()
            .map(|&(foreign, local)| ImportMember {
                foreign: self.interner.intern(foreign),
                local: self.interner.intern(local),
                span: self.span(),
            })
            .collect();
        Item::Import(ImportDecl {
            path: path.to_owned(),
            members,
            namespace: None,
            span: self.span(),
        })
    }

    /// `import * as ns from "path"`
    pub fn import_namespace(&mut self, path: &str, ns: &str) -> Item {
        let ns = (self.interner.intern(ns), self.span());
        Item::Import(ImportDecl {
            path: path.to_owned(),
            members: Vec::new(),
            namespace: Some(ns),
            span: self.span(),
        })
    }

    /// `export { local as exported, ... }`, optionally `from "path"`.
    pub fn export(&mut self, path: Option<&str>, members: &[(&str, &str)]) -> Item {
        let members = members
            .iter()
            .map(|&(local, exported)| ExportMember {
                local: self.interner.intern(local),
                exported: self.interner.intern(exported),
                span: self.span(),
            })
            .collect();
        Item::Export(ExportDecl {
            path: path.map(str::to_owned),
            members,
            span: self.span(),
        })
    }

    /// `export * from "path"`
    pub fn export_star(&mut self, path: &str) -> Item {
        Item::ExportStar(ExportStarDecl {
            path: path.to_owned(),
            span: self.span(),
        })
    }
}

/// Incremental [`FunctionDecl`] construction.
#[derive(Clone, Debug)]
#[must_use]
pub struct FunctionBuilder {
    decl: FunctionDecl,
}

impl FunctionBuilder {
    pub fn type_param(mut self, type_param: TypeParameter) -> Self {
        self.decl.type_params.push(type_param);
        self.decl.flags |= CommonFlags::GENERIC;
        self
    }

    pub fn param(mut self, param: Parameter) -> Self {
        self.decl.params.push(param);
        self
    }

    pub fn returns(mut self, ty: TypeNode) -> Self {
        self.decl.return_type = Some(ty);
        self
    }

    pub fn this_type(mut self, ty: TypeNode) -> Self {
        self.decl.explicit_this = Some(ty);
        self
    }

    pub fn body(mut self, statements: Vec<Statement>) -> Self {
        self.decl.body = Some(statements);
        self
    }

    /// Ambient declaration without a body.
    pub fn bodiless(mut self) -> Self {
        self.decl.body = None;
        self
    }

    pub fn flags(mut self, flags: CommonFlags) -> Self {
        self.decl.flags |= flags;
        self
    }

    pub fn decorators(mut self, decorators: DecoratorFlags) -> Self {
        self.decl.decorators |= decorators;
        self
    }

    pub fn build(self) -> FunctionDecl {
        self.decl
    }

    pub fn item(self) -> Item {
        Item::Function(self.decl)
    }

    pub fn member(self) -> ClassMember {
        ClassMember::Method(self.decl)
    }
}

/// Incremental [`ClassDecl`] construction.
#[derive(Clone, Debug)]
#[must_use]
pub struct ClassBuilder {
    decl: ClassDecl,
}

impl ClassBuilder {
    pub fn type_param(mut self, type_param: TypeParameter) -> Self {
        self.decl.type_params.push(type_param);
        self.decl.flags |= CommonFlags::GENERIC;
        self
    }

    pub fn extends(mut self, base: TypeNode) -> Self {
        self.decl.extends = Some(base);
        self
    }

    pub fn implements(mut self, iface: TypeNode) -> Self {
        self.decl.implements.push(iface);
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.decl.members.push(ClassMember::Field(field));
        self
    }

    pub fn method(mut self, method: FunctionBuilder) -> Self {
        self.decl.members.push(method.member());
        self
    }

    pub fn flags(mut self, flags: CommonFlags) -> Self {
        self.decl.flags |= flags;
        self
    }

    pub fn decorators(mut self, decorators: DecoratorFlags) -> Self {
        self.decl.decorators |= decorators;
        self
    }

    pub fn build(self) -> ClassDecl {
        self.decl
    }

    pub fn item(self) -> Item {
        Item::Class(self.decl)
    }
}

/// Owned inputs of a program built with an [`AstBuilder`]: the interner,
/// the expression arena and the sources, kept together so a program can
/// borrow all three.
#[derive(Debug)]
pub struct Fixture {
    pub interner: StringInterner,
    pub arena: ExprArena,
    pub sources: Vec<crate::Source>,
}

impl Fixture {
    /// Run `build` against a fresh builder and keep what it produced.
    pub fn build(build: impl FnOnce(&mut AstBuilder<'_>) -> Vec<crate::Source>) -> Self {
        let interner = StringInterner::new();
        let (arena, sources) = {
            let mut builder = AstBuilder::new(&interner);
            let sources = build(&mut builder);
            (builder.finish(), sources)
        };
        Fixture {
            interner,
            arena,
            sources,
        }
    }

    /// Single-file fixture with path `main`.
    pub fn main(build: impl FnOnce(&mut AstBuilder<'_>) -> Vec<Item>) -> Self {
        Fixture::build(|b| vec![crate::Source::new("main", build(b))])
    }
}
