//! Phase 1 of effect enforcement: visits every function body
//! and records one [`CallEdge`] per call expression or statement, resolving
//! the callee to an internal [`FunctionId`] when the module declares it.

use super::call_index::CallIndex;
use crate::ast::{self, Expr, Module, Stmt};
use crate::features::effect_enforcement::domain::{CallEdge, CallGraph, CallTarget};
use crate::shared::FunctionId;

pub fn build(module: &Module) -> (CallGraph, CallIndex) {
    let functions = module.all_functions();
    let index = CallIndex::build(&functions);

    let mut edges = Vec::new();
    for f in &functions {
        walk_stmts(&f.body, f.id, &index, &mut edges);
    }

    let graph = CallGraph::new(functions.iter().map(|f| f.id).collect(), edges);
    (graph, index)
}

fn target_for_call(index: &CallIndex, name: &str) -> CallTarget {
    match index.resolve_free(name) {
        Some(id) => CallTarget::Internal(id),
        None => CallTarget::External(name.to_string()),
    }
}

fn target_for_method(index: &CallIndex, owner: Option<&str>, name: &str) -> CallTarget {
    match owner {
        Some(owner) => match index.resolve_member(owner, name) {
            Some(id) => CallTarget::Internal(id),
            None => CallTarget::External(format!("{owner}::{name}")),
        },
        None => CallTarget::External(name.to_string()),
    }
}

fn record(edges: &mut Vec<CallEdge>, caller: FunctionId, callee: CallTarget, span: crate::shared::Span) {
    edges.push(CallEdge { caller, callee, span });
}

fn walk_stmts(stmts: &[Stmt], caller: FunctionId, index: &CallIndex, edges: &mut Vec<CallEdge>) {
    for stmt in stmts {
        walk_stmt(stmt, caller, index, edges);
    }
}

fn walk_stmt(stmt: &Stmt, caller: FunctionId, index: &CallIndex, edges: &mut Vec<CallEdge>) {
    match stmt {
        Stmt::If(s) => {
            walk_expr(&s.condition, caller, index, edges);
            walk_stmts(&s.then_branch, caller, index, edges);
            if let Some(else_branch) = &s.else_branch {
                walk_stmts(else_branch, caller, index, edges);
            }
        }
        Stmt::While(s) => {
            walk_expr(&s.condition, caller, index, edges);
            walk_stmts(&s.body, caller, index, edges);
        }
        Stmt::DoWhile(s) => {
            walk_stmts(&s.body, caller, index, edges);
            walk_expr(&s.condition, caller, index, edges);
        }
        Stmt::For(s) => {
            if let Some(init) = &s.init {
                walk_stmt(init, caller, index, edges);
            }
            if let Some(cond) = &s.condition {
                walk_expr(cond, caller, index, edges);
            }
            walk_stmts(&s.body, caller, index, edges);
            if let Some(update) = &s.update {
                walk_stmt(update, caller, index, edges);
            }
        }
        Stmt::ForEach(s) => {
            walk_expr(&s.iterable, caller, index, edges);
            walk_stmts(&s.body, caller, index, edges);
        }
        Stmt::Match(s) => {
            walk_expr(&s.scrutinee, caller, index, edges);
            for arm in &s.arms {
                if let Some(guard) = &arm.guard {
                    walk_expr(guard, caller, index, edges);
                }
                walk_stmts(&arm.body, caller, index, edges);
            }
        }
        Stmt::Try(s) => {
            walk_stmts(&s.body, caller, index, edges);
            for catch in &s.catches {
                walk_stmts(&catch.body, caller, index, edges);
            }
            if let Some(finally) = &s.finally {
                walk_stmts(finally, caller, index, edges);
            }
        }
        Stmt::Return(s) => {
            if let Some(value) = &s.value {
                walk_expr(value, caller, index, edges);
            }
        }
        Stmt::Throw(s) => {
            if let Some(value) = &s.value {
                walk_expr(value, caller, index, edges);
            }
        }
        Stmt::Break(_) | Stmt::Continue(_) => {}
        Stmt::Binding(s) => {
            if let Some(value) = &s.value {
                walk_expr(value, caller, index, edges);
            }
        }
        Stmt::Assignment(s) => {
            match &s.target {
                ast::AssignTarget::Local(_) => {}
                ast::AssignTarget::Field { base, .. } => walk_expr(base, caller, index, edges),
                ast::AssignTarget::Index { base, index: idx } => {
                    walk_expr(base, caller, index, edges);
                    walk_expr(idx, caller, index, edges);
                }
            }
            walk_expr(&s.value, caller, index, edges);
        }
        Stmt::Expr(s) => walk_expr(&s.expr, caller, index, edges),
        Stmt::Block(s) => walk_stmts(&s.stmts, caller, index, edges),
    }
}

fn walk_expr(expr: &Expr, caller: FunctionId, index: &CallIndex, edges: &mut Vec<CallEdge>) {
    match expr {
        Expr::Call(call) => {
            record(edges, caller, target_for_call(index, &call.callee), call.span);
            for arg in &call.args {
                walk_expr(arg, caller, index, edges);
            }
        }
        Expr::MethodCall(call) => {
            record(
                edges,
                caller,
                target_for_method(index, call.receiver_type.as_deref(), &call.method),
                call.span,
            );
            walk_expr(&call.receiver, caller, index, edges);
            for arg in &call.args {
                walk_expr(arg, caller, index, edges);
            }
        }
        Expr::New(new_expr) => {
            record(
                edges,
                caller,
                target_for_method(index, Some(new_expr.type_name.as_str()), &new_expr.type_name),
                new_expr.span,
            );
            for arg in &new_expr.args {
                walk_expr(arg, caller, index, edges);
            }
        }
        Expr::Lambda(lambda) => walk_stmts(&lambda.body, caller, index, edges),
        other => {
            for child in other.children() {
                walk_expr(child, caller, index, edges);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::shared::Span;

    fn span() -> Span {
        Span::zero()
    }

    fn free_fn(id: u32, name: &str, body: Vec<Stmt>) -> Function {
        Function {
            id: FunctionId(id),
            name: name.to_string(),
            visibility: Visibility::Public,
            owner_type: None,
            parameters: vec![],
            output_type: None,
            declared_effects: None,
            preconditions: vec![],
            postconditions: vec![],
            body,
            span: span(),
        }
    }

    fn call_stmt(callee: &str) -> Stmt {
        Stmt::Expr(ExprStmt {
            expr: Expr::Call(CallExpr {
                callee: callee.to_string(),
                args: vec![],
                span: span(),
            }),
            span: span(),
        })
    }

    fn module(functions: Vec<Function>) -> Module {
        Module {
            name: "m".into(),
            functions,
            classes: vec![],
            interfaces: vec![],
            enums: vec![],
            delegates: vec![],
            span: span(),
        }
    }

    #[test]
    fn internal_call_resolves_to_function_id() {
        let m = module(vec![
            free_fn(0, "a", vec![call_stmt("b")]),
            free_fn(1, "b", vec![]),
        ]);
        let (graph, _) = build(&m);
        assert_eq!(graph.internal_callees(FunctionId(0)), vec![FunctionId(1)]);
    }

    #[test]
    fn unresolved_call_is_external() {
        let m = module(vec![free_fn(0, "a", vec![call_stmt("Console.WriteLine")])]);
        let (graph, _) = build(&m);
        let edges: Vec<_> = graph.edges_from(FunctionId(0)).collect();
        assert_eq!(edges.len(), 1);
        assert!(matches!(edges[0].callee, crate::features::effect_enforcement::domain::CallTarget::External(_)));
    }

    #[test]
    fn mutual_recursion_produces_edges_both_ways() {
        let m = module(vec![
            free_fn(0, "f", vec![call_stmt("g")]),
            free_fn(1, "g", vec![call_stmt("f")]),
        ]);
        let (graph, _) = build(&m);
        assert_eq!(graph.internal_callees(FunctionId(0)), vec![FunctionId(1)]);
        assert_eq!(graph.internal_callees(FunctionId(1)), vec![FunctionId(0)]);
    }
}
