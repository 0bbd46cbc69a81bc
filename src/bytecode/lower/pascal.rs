use crate::bytecode::lower::{self, Case};
use crate::bytecode::{Fragment, FunctionDef};
use crate::frontend::pascal::cst::{DefOrProto, Program, SingleStatement, Statement};

/// Names are case-insensitive in this dialect.
const CASE: Case = Case::Insensitive;

/// Prototypes and definitions, in source order, and the entry fragment.
pub fn program(root: &Program) -> (Vec<FunctionDef>, Fragment) {
    let functions = root
        .defs
        .iter()
        .map(|def| match def {
            DefOrProto::Def(def) => {
                lower::function(&def.name, def.param_name(), statement(&def.body), CASE)
            }
            DefOrProto::Proto(proto) => lower::prototype(&proto.name, proto.has_param(), CASE),
        })
        .collect();
    let main = statements(&root.main.statements);
    (functions, lower::entry(main, &root.end))
}

fn statements(statements: &[Statement]) -> Fragment {
    statements.iter().flat_map(statement).collect()
}

/// An empty statement (a lone `;`) produces no code.
fn statement(statement: &Statement) -> Fragment {
    statement.single.as_ref().map(single).unwrap_or_default()
}

fn single(statement: &SingleStatement) -> Fragment {
    match statement {
        SingleStatement::Builtin { builtin, token } => lower::builtin(*builtin, token),
        SingleStatement::Call(call) => lower::call(
            CASE.name(&call.name),
            &call.name,
            call.argument.as_ref().map(|(_, a, _)| lower::integer(a, CASE)),
        ),
        SingleStatement::Cond(c) => lower::cond(
            &c.if_token,
            lower::term(&c.term, CASE),
            single(&c.then),
            c.otherwise.as_ref().map(|(_, s)| single(s)),
        ),
        SingleStatement::Loop(l) => {
            lower::while_loop(&l.while_token, lower::term(&l.term, CASE), single(&l.body))
        }
        SingleStatement::Repeat(r) => lower::repeat(
            &r.repeat_token,
            lower::integer(&r.count, CASE),
            single(&r.body),
        ),
        SingleStatement::Block(b) => statements(&b.statements),
    }
}
