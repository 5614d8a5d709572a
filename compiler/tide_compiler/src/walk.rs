//! Body walking.
//!
//! Every statement of a resolved function body is visited in a block-scoped
//! flow, so each expression is resolved with the locals and contextual type
//! code generation would see.

use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::{ElementId, ExprId, Item, Span, Statement, VariableDecl};
use tide_program::{BlockFlow, Flow};
use tide_resolve::{ReportMode, Resolver};
use tide_stack::ensure_sufficient_stack;
use tide_types::Type;
use tracing::trace;

const MODE: ReportMode = ReportMode::Report;

pub(crate) struct BodyWalker<'r, 'p, 'a> {
    resolver: &'r mut Resolver<'p, 'a>,
}

impl<'r, 'p, 'a> BodyWalker<'r, 'p, 'a> {
    pub(crate) fn new(resolver: &'r mut Resolver<'p, 'a>) -> Self {
        BodyWalker { resolver }
    }

    /// Top-level statements of every source, one flow per file.
    pub(crate) fn walk_files(&mut self) {
        let sources = self.resolver.program().sources();
        for source in sources {
            let Some(file) = self.resolver.program().file(&source.path) else {
                continue;
            };
            let mut flow = BlockFlow::new(file);
            for item in &source.items {
                if let Item::Statement(statement) = item {
                    self.walk_statement(statement, &mut flow, None);
                }
            }
        }
    }

    /// The body of a function instance, checked against its return type.
    pub(crate) fn walk_function(&mut self, function: ElementId) {
        let program = self.resolver.program();
        let Some(data) = program.function(function) else {
            return;
        };
        let Some(decl) = program.function_prototype(data.prototype).map(|proto| proto.decl) else {
            return;
        };
        let Some(body) = decl.body.as_ref() else {
            return;
        };
        let ret = data.signature.map(|signature| program.signature_of(signature).ret);
        trace!(function = %program.internal_name(function), "walking body");
        let mut flow = BlockFlow::for_function(program, function);
        for statement in body {
            self.walk_statement(statement, &mut flow, ret);
        }
    }

    fn walk_statement(&mut self, statement: &'a Statement, flow: &mut BlockFlow, ret: Option<Type>) {
        ensure_sufficient_stack(|| match statement {
            Statement::Expression(expr) => {
                self.resolver.resolve_expression(*expr, &*flow, None, MODE);
            }
            Statement::Variable(decl) => self.declare_local(decl, flow),
            Statement::Return { value, span } => self.check_return(*value, *span, flow, ret),
            Statement::Block(statements) => {
                flow.enter_block();
                for statement in statements {
                    self.walk_statement(statement, flow, ret);
                }
                flow.exit_block();
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolver.resolve_expression(*condition, &*flow, Some(Type::BOOL), MODE);
                self.walk_branch(then_branch, flow, ret);
                if let Some(else_branch) = else_branch {
                    self.walk_branch(else_branch, flow, ret);
                }
            }
            Statement::While { condition, body } => {
                self.resolver.resolve_expression(*condition, &*flow, Some(Type::BOOL), MODE);
                self.walk_branch(body, flow, ret);
            }
        });
    }

    /// A branch body gets its own block even when written without braces.
    fn walk_branch(&mut self, statement: &'a Statement, flow: &mut BlockFlow, ret: Option<Type>) {
        flow.enter_block();
        self.walk_statement(statement, flow, ret);
        flow.exit_block();
    }

    fn declare_local(&mut self, decl: &'a VariableDecl, flow: &mut BlockFlow) {
        let scope = flow.scope();
        let annotated = match &decl.ty {
            Some(node) => {
                let ctx = self
                    .resolver
                    .program()
                    .contextual_types(scope)
                    .cloned()
                    .unwrap_or_default();
                let Some(ty) = self.resolver.resolve_type(node, scope, &ctx, MODE) else {
                    return;
                };
                Some(ty)
            }
            None => None,
        };
        let ty = match (annotated, decl.initializer) {
            (Some(ty), Some(init)) => {
                if let Some(value) = self.resolver.resolve_expression(init, &*flow, Some(ty), MODE) {
                    let span = self.resolver.program().arena().span(init);
                    self.resolver.check_assignable(value, ty, span, MODE);
                }
                ty
            }
            (Some(ty), None) => ty,
            (None, Some(init)) => match self.resolver.resolve_expression(init, &*flow, None, MODE) {
                Some(ty) => ty,
                None => return,
            },
            (None, None) => {
                self.resolver.program_mut().report(
                    Diagnostic::error(ErrorCode::TYPE_EXPECTED)
                        .with_label(decl.name_span, "needs a type annotation or an initializer"),
                );
                return;
            }
        };
        flow.add_local(self.resolver.program_mut(), decl.name, ty, decl.name_span);
    }

    fn check_return(&mut self, value: Option<ExprId>, span: Span, flow: &BlockFlow, ret: Option<Type>) {
        let Some(ret) = ret else {
            if let Some(value) = value {
                self.resolver.resolve_expression(value, flow, None, MODE);
            }
            return;
        };
        let Some(value) = value else {
            if ret != Type::VOID {
                let expected = ret.display(self.resolver.program()).to_string();
                self.resolver.program_mut().report(
                    Diagnostic::error(ErrorCode::NOT_ASSIGNABLE)
                        .with_args(["void".to_owned(), expected])
                        .with_label(span, "missing return value"),
                );
            }
            return;
        };
        let ctx_type = (ret != Type::VOID).then_some(ret);
        let Some(ty) = self.resolver.resolve_expression(value, flow, ctx_type, MODE) else {
            return;
        };
        let value_span = self.resolver.program().arena().span(value);
        self.resolver.check_assignable(ty, ret, value_span, MODE);
    }
}
