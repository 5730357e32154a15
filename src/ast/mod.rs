//! The bound AST the analysis core consumes.
//!
//! Lexing, parsing and binding are external collaborators; this module
//! defines only the shape the core needs from them: modules, functions,
//! classes, interfaces, enums, delegates, all carrying a [`Span`], and a
//! statement / expression model built as tagged sum types, so every analysis
//! can match over the tag and let the compiler check exhaustiveness.

use crate::shared::ids::FunctionId;
use crate::shared::span::Span;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub id: FunctionId,
    pub name: String,
    pub visibility: Visibility,
    /// Declaring type for methods/getters/setters/constructors (`None` for
    /// module-level functions). Used to build the `Type::Member(Sig)` signature the
    /// resolver and built-in catalog key on.
    pub owner_type: Option<String>,
    pub parameters: Vec<Parameter>,
    pub output_type: Option<String>,
    /// Declared effects in surface syntax (comma-separated surface codes), as
    /// written in source; `None` when no `effects(...)` clause is present.
    pub declared_effects: Option<String>,
    pub preconditions: Vec<String>,
    pub postconditions: Vec<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Function {
    /// The full signature string the built-in catalog and resolver key on:
    /// `Type::Member(Param,Param)` for methods, `Member(Param,Param)` for free
    /// functions.
    pub fn signature(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| p.type_name.clone().unwrap_or_else(|| "Any".to_string()))
            .collect::<Vec<_>>()
            .join(",");
        match &self.owner_type {
            Some(ty) => format!("{}::{}({})", ty, self.name, params),
            None => format!("{}({})", self.name, params),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub type_name: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub getter: Option<Function>,
    pub setter: Option<Function>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub fields: Vec<Field>,
    pub methods: Vec<Function>,
    pub properties: Vec<Property>,
    pub constructors: Vec<Function>,
    pub base_class: Option<String>,
    pub interfaces: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub method_signatures: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub variants: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delegate {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub functions: Vec<Function>,
    pub classes: Vec<Class>,
    pub interfaces: Vec<Interface>,
    pub enums: Vec<Enum>,
    pub delegates: Vec<Delegate>,
    pub span: Span,
}

impl Module {
    /// All functions in the module, including class methods/constructors and
    /// property accessors, in the order diagnostics must be reported in: the
    /// order of the bound AST's own function list.
    pub fn all_functions(&self) -> Vec<&Function> {
        let mut out: Vec<&Function> = self.functions.iter().collect();
        for class in &self.classes {
            out.extend(class.constructors.iter());
            out.extend(class.methods.iter());
            for prop in &class.properties {
                if let Some(g) = &prop.getter {
                    out.push(g);
                }
                if let Some(s) = &prop.setter {
                    out.push(s);
                }
            }
        }
        out
    }
}

// ── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    If(IfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    Match(MatchStmt),
    Try(TryStmt),
    Return(ReturnStmt),
    Throw(ThrowStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Binding(BindingStmt),
    Assignment(AssignmentStmt),
    Expr(ExprStmt),
    Block(BlockStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForEach(s) => s.span,
            Stmt::Match(s) => s.span,
            Stmt::Try(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Throw(s) => s.span,
            Stmt::Break(s) => s.span,
            Stmt::Continue(s) => s.span,
            Stmt::Binding(s) => s.span,
            Stmt::Assignment(s) => s.span,
            Stmt::Expr(s) => s.span,
            Stmt::Block(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Vec<Stmt>,
    pub else_branch: Option<Vec<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoWhileStmt {
    pub body: Vec<Stmt>,
    pub condition: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub update: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForEachStmt {
    pub variable: String,
    pub iterable: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchArm {
    pub pattern: String,
    pub guard: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStmt {
    pub scrutinee: Expr,
    pub arms: Vec<MatchArm>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub exception_type: Option<String>,
    pub binding: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryStmt {
    pub body: Vec<Stmt>,
    pub catches: Vec<CatchClause>,
    pub finally: Option<Vec<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrowStmt {
    pub value: Option<Expr>,
    pub is_rethrow: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinueStmt {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingStmt {
    pub name: String,
    pub type_name: Option<String>,
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignTarget {
    Local(String),
    Field { base: Box<Expr>, field: String },
    Index { base: Box<Expr>, index: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentStmt {
    pub target: AssignTarget,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStmt {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

// ── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Str(String),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnwrapKind {
    /// `x.unwrap()` / `x!` style forced unwrap.
    Unwrap,
    /// `x.unwrap_or(default)` — never a null-dereference risk.
    UnwrapOr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(LiteralExpr),
    Identifier(IdentifierExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(CallExpr),
    MethodCall(MethodCallExpr),
    New(NewExpr),
    FieldAccess(FieldAccessExpr),
    Index(IndexExpr),
    Lambda(LambdaExpr),
    Unwrap(UnwrapExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(e) => e.span,
            Expr::Identifier(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::MethodCall(e) => e.span,
            Expr::New(e) => e.span,
            Expr::FieldAccess(e) => e.span,
            Expr::Index(e) => e.span,
            Expr::Lambda(e) => e.span,
            Expr::Unwrap(e) => e.span,
        }
    }

    /// Direct child expressions, for generic recursive walks (effect inference,
    /// taint propagation) that don't care about the statement/expr distinction.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Literal(_) | Expr::Identifier(_) => vec![],
            Expr::Binary(e) => vec![e.lhs.as_ref(), e.rhs.as_ref()],
            Expr::Unary(e) => vec![e.operand.as_ref()],
            Expr::Call(e) => e.args.iter().collect(),
            Expr::MethodCall(e) => {
                let mut v = vec![e.receiver.as_ref()];
                v.extend(e.args.iter());
                v
            }
            Expr::New(e) => e.args.iter().collect(),
            Expr::FieldAccess(e) => vec![e.base.as_ref()],
            Expr::Index(e) => vec![e.base.as_ref(), e.index.as_ref()],
            Expr::Lambda(_) => vec![],
            Expr::Unwrap(e) => {
                let mut v = vec![e.base.as_ref()];
                if let UnwrapKind::UnwrapOr(default) = &e.kind {
                    v.push(default.as_ref());
                }
                v
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpr {
    pub value: Literal,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierExpr {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCallExpr {
    pub receiver: Box<Expr>,
    /// Static type of the receiver, when known to the binder; drives
    /// `Type::Member` signature resolution.
    pub receiver_type: Option<String>,
    pub method: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

impl MethodCallExpr {
    /// The `Type::Member(Param,Param)` signature used for resolver/catalog lookup.
    pub fn signature(&self, param_types: &[&str]) -> String {
        let ty = self.receiver_type.as_deref().unwrap_or("Any");
        format!("{}::{}({})", ty, self.method, param_types.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpr {
    pub type_name: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAccessExpr {
    pub base: Box<Expr>,
    pub field: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexExpr {
    pub base: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaExpr {
    pub parameters: Vec<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnwrapExpr {
    pub base: Box<Expr>,
    pub kind: UnwrapKind,
    pub span: Span,
}
