use crate::bytecode::lower::{self, Case};
use crate::bytecode::{Fragment, FunctionDef};
use crate::frontend::java::cst::{Action, Block, Def, ProgramClass, SingleStatement, Statement};

const CASE: Case = Case::Sensitive;

/// Function definitions, in source order, and the entry fragment.
pub fn program(root: &ProgramClass) -> (Vec<FunctionDef>, Fragment) {
    let functions = root.defs.iter().map(def).collect();
    let main = block(&root.main.block);
    (functions, lower::entry(main, &root.right))
}

fn def(def: &Def) -> FunctionDef {
    lower::function(&def.name, def.param.name.as_ref(), block(&def.block), CASE)
}

/// Blocks emit no `LINE` of their own.
fn block(block: &Block) -> Fragment {
    block.statements.iter().flat_map(statement).collect()
}

fn statement(statement: &Statement) -> Fragment {
    match statement {
        Statement::Single(s) => single(s),
        Statement::Cond(c) => lower::cond(
            &c.if_token,
            lower::term(&c.term, CASE),
            self::statement(&c.then),
            c.otherwise.as_ref().map(|(_, s)| self::statement(s)),
        ),
        Statement::Loop(l) => lower::while_loop(
            &l.while_token,
            lower::term(&l.term, CASE),
            self::statement(&l.body),
        ),
        Statement::Repeat(r) => lower::repeat(
            &r.iterate,
            lower::integer(&r.count, CASE),
            self::statement(&r.body),
        ),
        Statement::Block(b) => block(b),
    }
}

fn single(statement: &SingleStatement) -> Fragment {
    match &statement.action {
        Some(Action::Builtin { builtin, token, .. }) => lower::builtin(*builtin, token),
        Some(Action::Call(call)) => lower::call(
            CASE.name(&call.name),
            &call.name,
            call.argument.as_ref().map(|a| lower::integer(a, CASE)),
        ),
        None => Vec::new(),
    }
}
