//! Post-processing of a recovered Pascal parse.
//!
//! A `;` right before `fin` or `termina-ejecución` is optional in practice,
//! so the diagnostics recovery recorded for those are dropped. Synthesized
//! terminators are then moved right after the statement they close, which
//! keeps token offsets increasing for anything laying out comments.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::frontend::cst::Syntax;
use crate::frontend::pascal::cst::{DefOrProto, Program, SingleStatement, Statement};

/// Spellings of the tokens that close a statement list.
const CLOSERS: [&str; 3] = ["fin", "termina-ejecución", "termina-ejecucion"];

/// Whether `diagnostic` only reports a `;` missing before a closing keyword.
pub fn is_benign(diagnostic: &Diagnostic) -> bool {
    diagnostic.kind == DiagnosticKind::MismatchedToken
        && diagnostic.text().is_some_and(|t| CLOSERS.contains(&t))
        && diagnostic
            .expected()
            .is_some_and(|e| e.len() == 1 && e[0] == ";")
}

/// Splits off benign diagnostics. The flag tells whether any were dropped.
pub fn filter(diagnostics: Vec<Diagnostic>) -> (Vec<Diagnostic>, bool) {
    let total = diagnostics.len();
    let kept: Vec<Diagnostic> = diagnostics.into_iter().filter(|d| !is_benign(d)).collect();
    let dropped = kept.len() != total;
    (kept, dropped)
}

/// Moves every synthesized statement terminator to just past the last
/// source token of its statement.
///
/// Prototype terminators are left where recovery put them.
pub fn reposition(program: &mut Program) {
    for def in &mut program.defs {
        if let DefOrProto::Def(def) = def {
            fix_statement(&mut def.body);
        }
    }
    program.main.statements.iter_mut().for_each(fix_statement);
}

fn fix_statement(statement: &mut Statement) {
    let Some(single) = statement.single.as_mut() else {
        return;
    };
    fix_single(single);
    if !statement.semicolon.inserted {
        return;
    }
    let anchor = single.syntax().last_real_token().cloned();
    if let Some(last) = anchor {
        let semicolon = &mut statement.semicolon;
        semicolon.offset = last.end_offset + 1;
        semicolon.end_offset = last.end_offset + 1;
        semicolon.line = last.end_line;
        semicolon.end_line = last.end_line;
        semicolon.column = last.end_column();
    }
}

fn fix_single(single: &mut SingleStatement) {
    match single {
        SingleStatement::Block(block) => block.statements.iter_mut().for_each(fix_statement),
        SingleStatement::Cond(cond) => {
            fix_single(&mut cond.then);
            if let Some((_, otherwise)) = &mut cond.otherwise {
                fix_single(otherwise);
            }
        }
        SingleStatement::Loop(l) => fix_single(&mut l.body),
        SingleStatement::Repeat(r) => fix_single(&mut r.body),
        SingleStatement::Builtin { .. } | SingleStatement::Call(_) => {}
    }
}
