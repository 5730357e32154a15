//! Lowers a function body to a [`ControlFlowGraph`].
//!
//! The builder walks statements with a "cursor" block: straight-line
//! statements are appended to the cursor; a control construct closes the
//! cursor with a branch and opens fresh blocks for its arms, returning the
//! merge block (or `None` when every arm transfers control away, e.g. every
//! arm returns). `try`/`finally` clones the finally body onto each exit edge
//! that leaves the protected region, per its structural rule.

use crate::ast::{self, Stmt};
use crate::features::flow_graph::domain::{BasicBlock, CfgEdge, CfgEdgeKind, ControlFlowGraph};
use crate::shared::BlockId;

struct LoopTargets {
    header: BlockId,
    exit: BlockId,
}

struct Builder {
    blocks: Vec<BasicBlock>,
    edges: Vec<CfgEdge>,
}

impl Builder {
    fn alloc(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BasicBlock::new(id));
        id
    }

    fn push_stmt(&mut self, block: BlockId, stmt: Stmt) {
        self.blocks[block.index()].stmts.push(stmt);
    }

    fn set_branch_condition(&mut self, block: BlockId, cond: ast::Expr) {
        self.blocks[block.index()].branch_condition = Some(cond);
    }

    fn edge(&mut self, from: BlockId, to: BlockId, kind: CfgEdgeKind) {
        self.edges.push(CfgEdge { from, to, kind });
    }
}

/// Builds the CFG for one function body. An empty body produces a two-block
/// graph (entry falling straight through to exit).
pub fn build(body: &[Stmt]) -> ControlFlowGraph {
    let mut b = Builder {
        blocks: Vec::new(),
        edges: Vec::new(),
    };
    let entry = b.alloc();
    let exit = b.alloc();

    let mut loops: Vec<LoopTargets> = Vec::new();
    let mut finallies: Vec<Vec<Stmt>> = Vec::new();

    let tail = lower_stmts(&mut b, body, entry, exit, &mut loops, &mut finallies);
    if let Some(tail) = tail {
        b.edge(tail, exit, CfgEdgeKind::Sequential);
    }

    ControlFlowGraph::new(b.blocks, b.edges, entry, exit)
}

/// Routes a non-local jump (`return`, `throw`, `break`, `continue`) from
/// `from` to `target`, threading it through clones of every pending `finally`
/// body along the way — each exit path gets its own copy of the finally
/// statements.
fn emit_jump(b: &mut Builder, from: BlockId, target: BlockId, finallies: &[Vec<Stmt>]) {
    let mut current = from;
    for finally_stmts in finallies.iter().rev() {
        let clone_block = b.alloc();
        b.edge(current, clone_block, CfgEdgeKind::Finally);
        for stmt in finally_stmts {
            b.push_stmt(clone_block, stmt.clone());
        }
        current = clone_block;
    }
    b.edge(current, target, CfgEdgeKind::Sequential);
}

/// Lowers a statement sequence starting at `cursor`. Returns the block normal
/// control flow continues at, or `None` if every path out of this sequence
/// already transferred control elsewhere (return/throw/break/continue).
fn lower_stmts(
    b: &mut Builder,
    stmts: &[Stmt],
    cursor: BlockId,
    exit: BlockId,
    loops: &mut Vec<LoopTargets>,
    finallies: &mut Vec<Vec<Stmt>>,
) -> Option<BlockId> {
    let mut cursor = Some(cursor);
    for stmt in stmts {
        let current = cursor?;
        cursor = lower_stmt(b, stmt, current, exit, loops, finallies);
    }
    cursor
}

fn lower_stmt(
    b: &mut Builder,
    stmt: &Stmt,
    cursor: BlockId,
    exit: BlockId,
    loops: &mut Vec<LoopTargets>,
    finallies: &mut Vec<Vec<Stmt>>,
) -> Option<BlockId> {
    match stmt {
        Stmt::Binding(_) | Stmt::Assignment(_) | Stmt::Expr(_) => {
            b.push_stmt(cursor, stmt.clone());
            Some(cursor)
        }
        Stmt::Block(block) => lower_stmts(b, &block.stmts, cursor, exit, loops, finallies),
        Stmt::Return(_) => {
            b.push_stmt(cursor, stmt.clone());
            emit_jump(b, cursor, exit, finallies);
            None
        }
        Stmt::Throw(_) => {
            b.push_stmt(cursor, stmt.clone());
            emit_jump(b, cursor, exit, finallies);
            None
        }
        Stmt::Break(_) => {
            let target = loops.last().map(|l| l.exit).unwrap_or(exit);
            emit_jump(b, cursor, target, finallies);
            None
        }
        Stmt::Continue(_) => {
            let target = loops.last().map(|l| l.header).unwrap_or(exit);
            emit_jump(b, cursor, target, finallies);
            None
        }
        Stmt::If(if_stmt) => lower_if(b, if_stmt, cursor, exit, loops, finallies),
        Stmt::While(while_stmt) => lower_while(b, while_stmt, cursor, exit, finallies),
        Stmt::DoWhile(do_while) => lower_do_while(b, do_while, cursor, exit, finallies),
        Stmt::For(for_stmt) => lower_for(b, for_stmt, cursor, exit, finallies),
        Stmt::ForEach(for_each) => lower_for_each(b, for_each, cursor, exit, finallies),
        Stmt::Match(match_stmt) => lower_match(b, match_stmt, cursor, exit, loops, finallies),
        Stmt::Try(try_stmt) => lower_try(b, try_stmt, cursor, exit, loops, finallies),
    }
}

fn lower_if(
    b: &mut Builder,
    if_stmt: &ast::IfStmt,
    cursor: BlockId,
    exit: BlockId,
    loops: &mut Vec<LoopTargets>,
    finallies: &mut Vec<Vec<Stmt>>,
) -> Option<BlockId> {
    b.set_branch_condition(cursor, if_stmt.condition.clone());

    let then_start = b.alloc();
    b.edge(cursor, then_start, CfgEdgeKind::TrueBranch);
    let then_end = lower_stmts(b, &if_stmt.then_branch, then_start, exit, loops, finallies);

    // `else_end` is `None` when an explicit else branch terminates control;
    // `Some(cursor)` stands for the implicit fallthrough when there's no else
    // branch at all — the FalseBranch edge is emitted below once we know
    // whether a merge block is actually needed.
    let has_else = if_stmt.else_branch.is_some();
    let else_end = match &if_stmt.else_branch {
        Some(else_stmts) => {
            let else_start = b.alloc();
            b.edge(cursor, else_start, CfgEdgeKind::FalseBranch);
            lower_stmts(b, else_stmts, else_start, exit, loops, finallies)
        }
        None => Some(cursor),
    };

    match (then_end, else_end) {
        (None, None) => None,
        (Some(a), None) => Some(a),
        (None, Some(fallthrough)) if !has_else => {
            let merge = b.alloc();
            b.edge(fallthrough, merge, CfgEdgeKind::FalseBranch);
            Some(merge)
        }
        (None, Some(b_end)) => Some(b_end),
        (Some(a), Some(fallthrough)) if !has_else => {
            let merge = b.alloc();
            b.edge(a, merge, CfgEdgeKind::Sequential);
            b.edge(fallthrough, merge, CfgEdgeKind::FalseBranch);
            Some(merge)
        }
        (Some(a), Some(b_end)) => {
            if a == b_end {
                return Some(a);
            }
            let merge = b.alloc();
            b.edge(a, merge, CfgEdgeKind::Sequential);
            b.edge(b_end, merge, CfgEdgeKind::Sequential);
            Some(merge)
        }
    }
}

fn lower_while(
    b: &mut Builder,
    while_stmt: &ast::WhileStmt,
    cursor: BlockId,
    _exit: BlockId,
    finallies: &mut Vec<Vec<Stmt>>,
) -> Option<BlockId> {
    let header = b.alloc();
    b.edge(cursor, header, CfgEdgeKind::Sequential);
    b.set_branch_condition(header, while_stmt.condition.clone());

    let loop_exit = b.alloc();
    let body_start = b.alloc();
    b.edge(header, body_start, CfgEdgeKind::TrueBranch);
    b.edge(header, loop_exit, CfgEdgeKind::FalseBranch);

    let mut loops = vec![LoopTargets {
        header,
        exit: loop_exit,
    }];
    let body_end = lower_stmts(b, &while_stmt.body, body_start, loop_exit, &mut loops, finallies);
    if let Some(end) = body_end {
        b.edge(end, header, CfgEdgeKind::LoopBack);
    }
    Some(loop_exit)
}

fn lower_do_while(
    b: &mut Builder,
    do_while: &ast::DoWhileStmt,
    cursor: BlockId,
    _exit: BlockId,
    finallies: &mut Vec<Vec<Stmt>>,
) -> Option<BlockId> {
    let body_start = b.alloc();
    b.edge(cursor, body_start, CfgEdgeKind::Sequential);

    let header = b.alloc();
    let loop_exit = b.alloc();

    let mut loops = vec![LoopTargets {
        header,
        exit: loop_exit,
    }];
    let body_end = lower_stmts(b, &do_while.body, body_start, loop_exit, &mut loops, finallies);
    if let Some(end) = body_end {
        b.edge(end, header, CfgEdgeKind::Sequential);
    }
    b.set_branch_condition(header, do_while.condition.clone());
    b.edge(header, body_start, CfgEdgeKind::LoopBack);
    b.edge(header, loop_exit, CfgEdgeKind::LoopExit);
    Some(loop_exit)
}

fn lower_for(
    b: &mut Builder,
    for_stmt: &ast::ForStmt,
    cursor: BlockId,
    _exit: BlockId,
    finallies: &mut Vec<Vec<Stmt>>,
) -> Option<BlockId> {
    let mut cursor = cursor;
    if let Some(init) = &for_stmt.init {
        b.push_stmt(cursor, (**init).clone());
    }

    let header = b.alloc();
    b.edge(cursor, header, CfgEdgeKind::Sequential);
    if let Some(cond) = &for_stmt.condition {
        b.set_branch_condition(header, cond.clone());
    }

    let loop_exit = b.alloc();
    let body_start = b.alloc();
    b.edge(header, body_start, CfgEdgeKind::TrueBranch);
    b.edge(header, loop_exit, CfgEdgeKind::FalseBranch);

    let mut loops = vec![LoopTargets {
        header,
        exit: loop_exit,
    }];
    let body_end = lower_stmts(b, &for_stmt.body, body_start, loop_exit, &mut loops, finallies);
    if let Some(end) = body_end {
        if let Some(update) = &for_stmt.update {
            b.push_stmt(end, (**update).clone());
        }
        b.edge(end, header, CfgEdgeKind::LoopBack);
    }
    cursor = loop_exit;
    Some(cursor)
}

fn lower_for_each(
    b: &mut Builder,
    for_each: &ast::ForEachStmt,
    cursor: BlockId,
    _exit: BlockId,
    finallies: &mut Vec<Vec<Stmt>>,
) -> Option<BlockId> {
    let header = b.alloc();
    b.edge(cursor, header, CfgEdgeKind::Sequential);
    b.set_branch_condition(header, for_each.iterable.clone());

    let loop_exit = b.alloc();
    let body_start = b.alloc();
    b.edge(header, body_start, CfgEdgeKind::TrueBranch);
    b.edge(header, loop_exit, CfgEdgeKind::FalseBranch);

    let mut loops = vec![LoopTargets {
        header,
        exit: loop_exit,
    }];
    let body_end = lower_stmts(b, &for_each.body, body_start, loop_exit, &mut loops, finallies);
    if let Some(end) = body_end {
        b.edge(end, header, CfgEdgeKind::LoopBack);
    }
    Some(loop_exit)
}

fn lower_match(
    b: &mut Builder,
    match_stmt: &ast::MatchStmt,
    cursor: BlockId,
    exit: BlockId,
    loops: &mut Vec<LoopTargets>,
    finallies: &mut Vec<Vec<Stmt>>,
) -> Option<BlockId> {
    let mut arm_ends = Vec::new();
    for arm in &match_stmt.arms {
        let arm_start = b.alloc();
        b.edge(cursor, arm_start, CfgEdgeKind::Sequential);
        if let Some(end) = lower_stmts(b, &arm.body, arm_start, exit, loops, finallies) {
            arm_ends.push(end);
        }
    }
    if arm_ends.is_empty() {
        return None;
    }
    if arm_ends.len() == 1 {
        return Some(arm_ends[0]);
    }
    let merge = b.alloc();
    for end in arm_ends {
        b.edge(end, merge, CfgEdgeKind::Sequential);
    }
    Some(merge)
}

fn lower_try(
    b: &mut Builder,
    try_stmt: &ast::TryStmt,
    cursor: BlockId,
    exit: BlockId,
    loops: &mut Vec<LoopTargets>,
    finallies: &mut Vec<Vec<Stmt>>,
) -> Option<BlockId> {
    if let Some(finally_stmts) = &try_stmt.finally {
        finallies.push(finally_stmts.clone());
    }

    let try_start = b.alloc();
    b.edge(cursor, try_start, CfgEdgeKind::Sequential);
    let try_end = lower_stmts(b, &try_stmt.body, try_start, exit, loops, finallies);

    let mut catch_ends = Vec::new();
    for catch in &try_stmt.catches {
        let catch_start = b.alloc();
        b.edge(try_start, catch_start, CfgEdgeKind::Exception);
        if let Some(end) = lower_stmts(b, &catch.body, catch_start, exit, loops, finallies) {
            catch_ends.push(end);
        }
    }

    if try_stmt.finally.is_some() {
        finallies.pop();
    }

    let mut normal_ends: Vec<BlockId> = Vec::new();
    if let Some(end) = try_end {
        normal_ends.push(end);
    }
    normal_ends.extend(catch_ends);

    if normal_ends.is_empty() {
        return None;
    }

    let merge = match &try_stmt.finally {
        Some(finally_stmts) => {
            let mut finally_ends = Vec::new();
            for end in normal_ends {
                let finally_block = b.alloc();
                b.edge(end, finally_block, CfgEdgeKind::Finally);
                for stmt in finally_stmts {
                    b.push_stmt(finally_block, stmt.clone());
                }
                finally_ends.push(finally_block);
            }
            if finally_ends.len() == 1 {
                return Some(finally_ends[0]);
            }
            let merge = b.alloc();
            for end in finally_ends {
                b.edge(end, merge, CfgEdgeKind::Sequential);
            }
            merge
        }
        None => {
            if normal_ends.len() == 1 {
                return Some(normal_ends[0]);
            }
            let merge = b.alloc();
            for end in normal_ends {
                b.edge(end, merge, CfgEdgeKind::Sequential);
            }
            merge
        }
    };
    Some(merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::shared::Span;

    fn span() -> Span {
        Span::zero()
    }

    fn expr_stmt() -> Stmt {
        Stmt::Expr(ExprStmt {
            expr: Expr::Literal(LiteralExpr {
                value: Literal::Int(1),
                span: span(),
            }),
            span: span(),
        })
    }

    #[test]
    fn empty_body_is_entry_to_exit() {
        let cfg = build(&[]);
        assert!(cfg.check_invariants().is_ok());
        assert_eq!(cfg.block_count(), 2);
    }

    #[test]
    fn straight_line_body_stays_in_one_block_between_entry_and_exit() {
        let cfg = build(&[expr_stmt(), expr_stmt()]);
        assert!(cfg.check_invariants().is_ok());
        assert_eq!(cfg.block(cfg.entry).stmts.len(), 2);
    }

    #[test]
    fn if_without_else_produces_merge_block() {
        let body = vec![Stmt::If(IfStmt {
            condition: Expr::Literal(LiteralExpr {
                value: Literal::Bool(true),
                span: span(),
            }),
            then_branch: vec![expr_stmt()],
            else_branch: None,
            span: span(),
        })];
        let cfg = build(&body);
        assert!(cfg.check_invariants().is_ok());
    }

    #[test]
    fn while_loop_has_back_edge_to_header() {
        let body = vec![Stmt::While(WhileStmt {
            condition: Expr::Literal(LiteralExpr {
                value: Literal::Bool(true),
                span: span(),
            }),
            body: vec![expr_stmt()],
            span: span(),
        })];
        let cfg = build(&body);
        assert!(cfg.check_invariants().is_ok());
        assert!(cfg
            .edges()
            .any(|e| matches!(e.kind, CfgEdgeKind::LoopBack)));
    }

    #[test]
    fn return_statement_routes_directly_to_exit() {
        let body = vec![Stmt::Return(ReturnStmt {
            value: None,
            span: span(),
        })];
        let cfg = build(&body);
        assert!(cfg.check_invariants().is_ok());
        assert!(cfg
            .predecessors(cfg.exit)
            .contains(&cfg.entry));
    }

    #[test]
    fn try_finally_duplicates_finally_onto_normal_and_return_paths() {
        let body = vec![Stmt::Try(TryStmt {
            body: vec![Stmt::Return(ReturnStmt {
                value: None,
                span: span(),
            })],
            catches: vec![],
            finally: Some(vec![expr_stmt()]),
            span: span(),
        })];
        let cfg = build(&body);
        assert!(cfg.check_invariants().is_ok());
        let finally_edges = cfg
            .edges()
            .filter(|e| matches!(e.kind, CfgEdgeKind::Finally))
            .count();
        assert_eq!(finally_edges, 1);
    }
}
