//! Uninitialized-variable detection: a may-uninitialized,
//! forward analysis seeded with every local (never a parameter) at function
//! entry. A binding or assignment removes the variable from the set; a read
//! of a variable still in the set is reported as a use-before-init.

use crate::ast::Function;
use crate::features::dataflow::domain::{collect_bound_locals, stmt_local_def, stmt_reads};
use crate::features::flow_graph::{BasicBlock, ControlFlowGraph};
use crate::features::lattice::{solve, Analysis, Direction, MaySet, SolverResult};
use crate::shared::{DiagnosticCode, DiagnosticSink, Severity};
use rustc_hash::FxHashSet;

pub struct UninitializedVariables {
    locals: FxHashSet<String>,
}

impl Analysis for UninitializedVariables {
    type Fact = MaySet<String>;

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn initial_entry(&self) -> Self::Fact {
        MaySet(self.locals.clone())
    }

    fn transfer(&self, block: &BasicBlock, input: &Self::Fact) -> Self::Fact {
        let mut set = input.0.clone();
        for stmt in &block.stmts {
            if let Some(name) = stmt_local_def(stmt) {
                set.remove(name);
            }
        }
        MaySet(set)
    }
}

pub fn analyze(func: &Function, cfg: &ControlFlowGraph) -> SolverResult<MaySet<String>> {
    let locals = collect_bound_locals(&func.body);
    solve(cfg, &UninitializedVariables { locals })
}

/// Walks each block from its entry fact, statement by statement, reporting
/// every read of a variable still in the may-uninitialized set.
pub fn check_uninitialized_use(
    cfg: &ControlFlowGraph,
    result: &SolverResult<MaySet<String>>,
    sink: &dyn DiagnosticSink,
) {
    for block in cfg.blocks() {
        let mut set = result.at_entry(block.id).0.clone();
        for stmt in &block.stmts {
            let mut reads = Vec::new();
            stmt_reads(stmt, &mut reads);
            for r in &reads {
                if set.contains(r) {
                    sink.report(
                        stmt.span(),
                        DiagnosticCode::UninitializedUse,
                        format!("`{r}` may be used before it is initialized"),
                        Severity::Warning,
                    );
                }
            }
            if let Some(name) = stmt_local_def(stmt) {
                set.remove(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::features::flow_graph;
    use crate::shared::{Diagnostic, Span};
    use std::sync::Mutex;

    struct RecordingSink(Mutex<Vec<Diagnostic>>);
    impl DiagnosticSink for RecordingSink {
        fn report(
            &self,
            span: Span,
            code: DiagnosticCode,
            message: String,
            severity: Severity,
        ) {
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

    fn func(body: Vec<Stmt>) -> Function {
        Function {
            id: crate::shared::FunctionId(0),
            name: "f".into(),
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

    fn ident(name: &str) -> Expr {
        Expr::Identifier(IdentifierExpr {
            name: name.into(),
            span: span(),
        })
    }

    #[test]
    fn read_before_binding_is_flagged() {
        // `x` is bound later in the function, so collect_bound_locals seeds it
        // into the may-uninitialized set; the read above the binding is flagged.
        let f = func(vec![
            Stmt::Return(ReturnStmt {
                value: Some(ident("x")),
                span: span(),
            }),
            Stmt::Binding(BindingStmt {
                name: "x".into(),
                type_name: None,
                value: None,
                span: span(),
            }),
        ]);
        let cfg = flow_graph::build(&f.body);
        let result = analyze(&f, &cfg);
        let sink = RecordingSink(Mutex::new(Vec::new()));
        check_uninitialized_use(&cfg, &result, &sink);
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn read_after_binding_is_clean() {
        let f = func(vec![
            Stmt::Binding(BindingStmt {
                name: "x".into(),
                type_name: None,
                value: Some(Expr::Literal(LiteralExpr {
                    value: Literal::Int(1),
                    span: span(),
                })),
                span: span(),
            }),
            Stmt::Return(ReturnStmt {
                value: Some(ident("x")),
                span: span(),
            }),
        ]);
        let cfg = flow_graph::build(&f.body);
        let result = analyze(&f, &cfg);
        let sink = RecordingSink(Mutex::new(Vec::new()));
        check_uninitialized_use(&cfg, &result, &sink);
        assert!(sink.0.lock().unwrap().is_empty());
    }
}
