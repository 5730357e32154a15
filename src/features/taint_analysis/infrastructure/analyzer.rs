//! Intraprocedural, flow-sensitive taint propagation: a
//! forward dataflow analysis whose fact is a map from variable name to the
//! [`TaintLabel`] it currently carries, built as another client of the
//! generic lattice/worklist solver — the same shape as the three analyses in
//! [`crate::features::dataflow`], just with a richer fact type than a plain
//! set.

use crate::ast::{Expr, Function, Stmt};
use crate::config::TaintToggles;
use crate::features::flow_graph::{BasicBlock, ControlFlowGraph};
use crate::features::lattice::{solve, Analysis, Direction, Lattice, SolverResult};
use crate::features::taint_analysis::domain::TaintLabel;
use crate::features::taint_analysis::infrastructure::catalog::{
    classify_sink_name, classify_source_name, is_sanitizer,
};
use crate::shared::{DiagnosticSink, Severity};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TaintState(pub FxHashMap<String, TaintLabel>);

impl Lattice for TaintState {
    fn bottom() -> Self {
        TaintState(FxHashMap::default())
    }

    fn join(&self, other: &Self) -> Self {
        let mut merged = self.0.clone();
        for (k, v) in &other.0 {
            merged.entry(k.clone()).or_default().merge(v);
        }
        TaintState(merged)
    }
}

pub struct TaintAnalysis {
    pub toggles: TaintToggles,
}

impl Analysis for TaintAnalysis {
    type Fact = TaintState;

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn initial_entry(&self) -> Self::Fact {
        TaintState::bottom()
    }

    fn transfer(&self, block: &BasicBlock, input: &Self::Fact) -> Self::Fact {
        let mut state = input.0.clone();
        for stmt in &block.stmts {
            apply_stmt(stmt, &mut state, &self.toggles);
        }
        TaintState(state)
    }
}

pub fn analyze(cfg: &ControlFlowGraph, toggles: TaintToggles) -> SolverResult<TaintState> {
    solve(cfg, &TaintAnalysis { toggles })
}

/// The taint carried by evaluating `expr` given the current variable labels.
/// A variable not yet recorded falls back to the name-pattern heuristic, so a
/// parameter that looks like a source (`user_id`) is treated as tainted from
/// its very first read without needing a separate entry-seeding pass.
fn expr_taint(expr: &Expr, state: &FxHashMap<String, TaintLabel>, toggles: &TaintToggles) -> TaintLabel {
    match expr {
        Expr::Identifier(id) => state.get(&id.name).cloned().unwrap_or_else(|| {
            classify_source_name(&id.name, toggles)
                .map(TaintLabel::single)
                .unwrap_or_default()
        }),
        Expr::MethodCall(m) if is_sanitizer(&m.method) => TaintLabel::default(),
        Expr::Call(c) if is_sanitizer(&c.callee) => TaintLabel::default(),
        _ => {
            let mut label = TaintLabel::default();
            for child in expr.children() {
                label.merge(&expr_taint(child, state, toggles));
            }
            label
        }
    }
}

fn apply_stmt(stmt: &Stmt, state: &mut FxHashMap<String, TaintLabel>, toggles: &TaintToggles) {
    match stmt {
        Stmt::Binding(b) => {
            let label = b
                .value
                .as_ref()
                .map(|v| expr_taint(v, state, toggles))
                .unwrap_or_default();
            state.insert(b.name.clone(), label);
        }
        Stmt::Assignment(a) => {
            if let crate::ast::AssignTarget::Local(name) = &a.target {
                let label = expr_taint(&a.value, state, toggles);
                state.insert(name.clone(), label);
            }
        }
        Stmt::ForEach(f) => {
            let label = expr_taint(&f.iterable, state, toggles);
            state.insert(f.variable.clone(), label);
        }
        _ => {}
    }
}

/// Every `Call`/`MethodCall` subexpression reachable from `expr`, innermost
/// first doesn't matter — order is irrelevant to the sink check.
fn collect_calls<'e>(expr: &'e Expr, out: &mut Vec<&'e Expr>) {
    if matches!(expr, Expr::Call(_) | Expr::MethodCall(_)) {
        out.push(expr);
    }
    for child in expr.children() {
        collect_calls(child, out);
    }
}

fn stmt_expressions(stmt: &Stmt) -> Vec<&Expr> {
    match stmt {
        Stmt::Binding(b) => b.value.iter().collect(),
        Stmt::Assignment(a) => vec![&a.value],
        Stmt::Expr(e) => vec![&e.expr],
        Stmt::Return(r) => r.value.iter().collect(),
        Stmt::Throw(t) => t.value.iter().collect(),
        Stmt::If(s) => vec![&s.condition],
        Stmt::While(s) => vec![&s.condition],
        Stmt::DoWhile(s) => vec![&s.condition],
        Stmt::For(s) => s.condition.iter().collect(),
        Stmt::ForEach(s) => vec![&s.iterable],
        Stmt::Match(s) => vec![&s.scrutinee],
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Try(_) | Stmt::Block(_) => vec![],
    }
}

/// Walks each block from its entry fact, replaying statements, and reports
/// every sink call whose argument carries taint at the point of the call
///. Sanitizer calls are transparent here since they already
/// clear taint during `apply_stmt`/`expr_taint`.
pub fn check_taint_sinks(
    cfg: &ControlFlowGraph,
    result: &SolverResult<TaintState>,
    toggles: &TaintToggles,
    sink: &dyn DiagnosticSink,
) {
    for block in cfg.blocks() {
        let mut state = result.at_entry(block.id).0.clone();
        for stmt in &block.stmts {
            for expr in stmt_expressions(stmt) {
                let mut calls = Vec::new();
                collect_calls(expr, &mut calls);
                for call in calls {
                    let (name, args): (&str, &[Expr]) = match call {
                        Expr::Call(c) => (&c.callee, &c.args),
                        Expr::MethodCall(m) => (&m.method, &m.args),
                        _ => unreachable!(),
                    };
                    let Some(sink_kind) = classify_sink_name(name, toggles) else {
                        continue;
                    };
                    for arg in args {
                        let label = expr_taint(arg, &state, toggles);
                        if label.is_tainted() {
                            let severity = match sink_kind {
                                crate::features::taint_analysis::domain::SinkKind::Sql
                                | crate::features::taint_analysis::domain::SinkKind::Command
                                | crate::features::taint_analysis::domain::SinkKind::Eval => {
                                    Severity::Error
                                }
                                _ => Severity::Warning,
                            };
                            sink.report(
                                call.span(),
                                sink_kind.diagnostic_code(),
                                format!(
                                    "tainted value (from {:?}) reaches `{}` unsanitized",
                                    label.sources, name
                                ),
                                severity,
                            );
                        }
                    }
                }
            }
            apply_stmt(stmt, &mut state, toggles);
        }
    }
}

pub fn analyze_function(
    function: &Function,
    cfg: &ControlFlowGraph,
    toggles: TaintToggles,
    sink: &dyn DiagnosticSink,
) {
    let _ = function;
    let result = analyze(cfg, toggles.clone());
    check_taint_sinks(cfg, &result, &toggles, sink);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::features::flow_graph;
    use crate::shared::{Diagnostic, DiagnosticCode, Span};
    use std::sync::Mutex;

    struct RecordingSink(Mutex<Vec<Diagnostic>>);
    impl DiagnosticSink for RecordingSink {
        fn report(&self, span: Span, code: DiagnosticCode, message: String, severity: Severity) {
            self.0.lock().unwrap().push(Diagnostic {
                span,
                code,
                message,
                severity,
                fix: None,
            });
        }
    }

    fn span() -> Span {
        Span::zero()
    }

    fn ident(name: &str) -> Expr {
        Expr::Identifier(IdentifierExpr {
            name: name.into(),
            span: span(),
        })
    }

    #[test]
    fn tainted_parameter_reaching_sql_sink_is_flagged() {
        let body = vec![Stmt::Expr(ExprStmt {
            expr: Expr::Call(CallExpr {
                callee: "execute".into(),
                args: vec![ident("user_query")],
                span: span(),
            }),
            span: span(),
        })];
        let cfg = flow_graph::build(&body);
        let toggles = TaintToggles::default();
        let result = analyze(&cfg, toggles.clone());
        let recording = RecordingSink(Mutex::new(Vec::new()));
        check_taint_sinks(&cfg, &result, &toggles, &recording);
        let diags = recording.0.lock().unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.as_str(), "sql-injection");
    }

    #[test]
    fn sanitized_value_reaching_sink_is_clean() {
        let body = vec![
            Stmt::Binding(BindingStmt {
                name: "safe".into(),
                type_name: None,
                value: Some(Expr::Call(CallExpr {
                    callee: "sanitize_input".into(),
                    args: vec![ident("user_query")],
                    span: span(),
                })),
                span: span(),
            }),
            Stmt::Expr(ExprStmt {
                expr: Expr::Call(CallExpr {
                    callee: "execute".into(),
                    args: vec![ident("safe")],
                    span: span(),
                }),
                span: span(),
            }),
        ];
        let cfg = flow_graph::build(&body);
        let toggles = TaintToggles::default();
        let result = analyze(&cfg, toggles.clone());
        let recording = RecordingSink(Mutex::new(Vec::new()));
        check_taint_sinks(&cfg, &result, &toggles, &recording);
        assert!(recording.0.lock().unwrap().is_empty());
    }

    #[test]
    fn untainted_literal_argument_is_clean() {
        let body = vec![Stmt::Expr(ExprStmt {
            expr: Expr::Call(CallExpr {
                callee: "execute".into(),
                args: vec![Expr::Literal(LiteralExpr {
                    value: Literal::Str("select 1".into()),
                    span: span(),
                })],
                span: span(),
            }),
            span: span(),
        })];
        let cfg = flow_graph::build(&body);
        let toggles = TaintToggles::default();
        let result = analyze(&cfg, toggles.clone());
        let recording = RecordingSink(Mutex::new(Vec::new()));
        check_taint_sinks(&cfg, &result, &toggles, &recording);
        assert!(recording.0.lock().unwrap().is_empty());
    }
}
