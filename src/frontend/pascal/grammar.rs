use crate::frontend::cst::Builtin;
use crate::frontend::parser::{Parsed, Parser};
use crate::frontend::pascal::cst::{
    self, Block, Call, Cond, Def, DefOrProto, Loop, ProgramDef, Proto, SingleStatement, Statement,
};
use crate::frontend::token::TokenKind::{self, *};

/// First tokens of each `singleStatement` alternative, in grammar order.
const SINGLE_FIRST: [TokenKind; 11] = [
    Move, TurnLeft, PickBeeper, PutBeeper, TurnOff, Return, Identifier, If, While, Repeat, Begin,
];

/// Tokens that may start a `statement`.
const STATEMENT_FIRST: [TokenKind; 12] = [
    Move, TurnLeft, PickBeeper, PutBeeper, TurnOff, Return, Identifier, If, While, Repeat, Begin,
    Semicolon,
];

// Tokens that may follow the `;` of a statement, by context. A missing `;`
// is only synthesized in front of one of these.
const BLOCK_FOLLOW: [TokenKind; 13] = [
    Move, TurnLeft, PickBeeper, PutBeeper, TurnOff, Return, Identifier, If, While, Repeat, Begin,
    Semicolon, End,
];
const EXECUTION_FOLLOW: [TokenKind; 13] = [
    Move, TurnLeft, PickBeeper, PutBeeper, TurnOff, Return, Identifier, If, While, Repeat, Begin,
    Semicolon, EndExecution,
];
const DEF_FOLLOW: [TokenKind; 3] = [Define, Prototype, BeginExecution];

// Where a statement list gives up skipping garbage: anything an enclosing
// rule could resume at.
const EXECUTION_RESYNC: [TokenKind; 1] = [EndProgram];
const BLOCK_RESYNC: [TokenKind; 7] = [
    Else, End, EndExecution, Define, Prototype, BeginExecution, EndProgram,
];

/// Parses a whole Pascal-dialect program, including the end-of-input check.
///
/// ```text
/// program := 'iniciar-programa' defOrProto* programDef 'finalizar-programa'
/// ```
///
/// # Errors
///
/// Aborts at the first error recovery cannot get past; every diagnostic,
/// recovered or not, is left in `p`.
pub fn program(p: &mut Parser) -> Parsed<cst::Program> {
    let begin = p.expect(BeginProgram)?;
    let mut defs = Vec::new();
    while p.at_any(&[Define, Prototype]) {
        defs.push(def_or_proto(p)?);
    }
    let main = program_def(p)?;
    let end = p.expect(EndProgram)?;
    p.finish()?;
    Ok(cst::Program {
        begin,
        defs,
        main,
        end,
    })
}

/// `programDef := 'inicia-ejecución' statement* 'termina-ejecución'`
fn program_def(p: &mut Parser) -> Parsed<ProgramDef> {
    let begin = p.expect(BeginExecution)?;
    let mut statements = Vec::new();
    loop {
        while p.at_any(&STATEMENT_FIRST) {
            statements.push(statement(p, &EXECUTION_FOLLOW)?);
        }
        if !p.recover_repetition(&STATEMENT_FIRST, EndExecution, &EXECUTION_RESYNC) {
            break;
        }
    }
    let end = p.expect(EndExecution)?;
    Ok(ProgramDef {
        begin,
        statements,
        end,
    })
}

/// `block := 'inicio' statement* 'fin'`
fn block(p: &mut Parser) -> Parsed<Block> {
    let begin = p.expect(Begin)?;
    let mut statements = Vec::new();
    loop {
        while p.at_any(&STATEMENT_FIRST) {
            statements.push(statement(p, &BLOCK_FOLLOW)?);
        }
        if !p.recover_repetition(&STATEMENT_FIRST, End, &BLOCK_RESYNC) {
            break;
        }
    }
    let end = p.expect(End)?;
    Ok(Block {
        begin,
        statements,
        end,
    })
}

fn def_or_proto(p: &mut Parser) -> Parsed<DefOrProto> {
    match p.peek() {
        Define => def(p).map(DefOrProto::Def),
        Prototype => proto(p).map(DefOrProto::Proto),
        _ => Err(p.no_viable_alt(&[Define, Prototype])),
    }
}

/// `def := 'define-nueva-instrucción' <var> defParam? 'como' statement`
fn def(p: &mut Parser) -> Parsed<Def> {
    let keyword = p.expect(Define)?;
    let name = p.expect(Identifier)?;
    let param = match p.at(LeftParen) {
        true => Some(p.def_param()?),
        false => None,
    };
    let as_token = p.expect(As)?;
    let body = statement(p, &DEF_FOLLOW)?;
    Ok(Def {
        keyword,
        name,
        param,
        as_token,
        body,
    })
}

/// `proto := 'define-prototipo-instrucción' <var> defParam? ';'`
fn proto(p: &mut Parser) -> Parsed<Proto> {
    let keyword = p.expect(Prototype)?;
    let name = p.expect(Identifier)?;
    let param = match p.at(LeftParen) {
        true => Some(p.def_param()?),
        false => None,
    };
    let semicolon = p.expect_terminator(&DEF_FOLLOW)?;
    Ok(Proto {
        keyword,
        name,
        param,
        semicolon,
    })
}

/// `statement := singleStatement? ';'`
///
/// `follow` lists what may come after the `;` in the enclosing rule.
fn statement(p: &mut Parser, follow: &[TokenKind]) -> Parsed<Statement> {
    let single = match p.at_any(&SINGLE_FIRST) {
        true => Some(single_statement(p)?),
        false => None,
    };
    let semicolon = p.expect_terminator(follow)?;
    Ok(Statement { single, semicolon })
}

/// `singleStatement := statementFun | call | cond | loop | repeat | block`
fn single_statement(p: &mut Parser) -> Parsed<SingleStatement> {
    match p.peek() {
        Identifier => call(p).map(SingleStatement::Call),
        If => cond(p).map(SingleStatement::Cond),
        While => while_loop(p).map(SingleStatement::Loop),
        Repeat => repeat(p).map(SingleStatement::Repeat),
        Begin => block(p).map(SingleStatement::Block),
        kind => match Builtin::from_kind(kind) {
            Some(builtin) => Ok(SingleStatement::Builtin {
                builtin,
                token: p.advance(),
            }),
            None => Err(p.no_viable_alt(&SINGLE_FIRST)),
        },
    }
}

/// `call := <var> ('(' integer ')')?`
fn call(p: &mut Parser) -> Parsed<Call> {
    let name = p.expect(Identifier)?;
    let argument = match p.eat(LeftParen) {
        Some(left) => {
            let integer = p.integer()?;
            let right = p.expect(RightParen)?;
            Some((left, integer, right))
        }
        None => None,
    };
    Ok(Call { name, argument })
}

/// `cond := 'si' term 'entonces' singleStatement ('si-no' singleStatement)?`
fn cond(p: &mut Parser) -> Parsed<Cond> {
    let if_token = p.expect(If)?;
    let term = p.term()?;
    let then_token = p.expect(Then)?;
    let then = Box::new(single_statement(p)?);
    let otherwise = match p.eat(Else) {
        Some(else_token) => Some((else_token, Box::new(single_statement(p)?))),
        None => None,
    };
    Ok(Cond {
        if_token,
        term,
        then_token,
        then,
        otherwise,
    })
}

/// `loop := 'mientras' term 'hacer' singleStatement`
fn while_loop(p: &mut Parser) -> Parsed<Loop> {
    let while_token = p.expect(While)?;
    let term = p.term()?;
    let do_token = p.expect(Do)?;
    let body = Box::new(single_statement(p)?);
    Ok(Loop {
        while_token,
        term,
        do_token,
        body,
    })
}

/// `repeat := 'repetir' integer 'veces' singleStatement`
fn repeat(p: &mut Parser) -> Parsed<cst::Repeat> {
    let repeat_token = p.expect(Repeat)?;
    let count = p.integer()?;
    let times = p.expect(Times)?;
    let body = Box::new(single_statement(p)?);
    Ok(cst::Repeat {
        repeat_token,
        count,
        times,
        body,
    })
}
