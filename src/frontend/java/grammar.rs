use crate::frontend::cst::Builtin;
use crate::frontend::java::cst::{
    Action, Block, Call, Cond, Def, Loop, ProgramClass, ProgramDef, Repeat, SingleStatement,
    Statement,
};
use crate::frontend::parser::{Parsed, Parser};
use crate::frontend::token::TokenKind;

/// Parses a whole Java-dialect program, including the end-of-input check.
///
/// ```text
/// programClass := 'class' 'program' '{' def* programDef '}'
/// ```
///
/// # Errors
///
/// Aborts at the first syntax error; the diagnostic is left in `p`.
pub fn program_class(p: &mut Parser) -> Parsed<ProgramClass> {
    let class = p.expect(TokenKind::Class)?;
    let program = p.expect(TokenKind::Program)?;
    let left = p.expect(TokenKind::LeftBrace)?;
    let mut defs = Vec::new();
    while p.at(TokenKind::Define) {
        defs.push(def(p)?);
    }
    let main = program_def(p)?;
    let right = p.expect(TokenKind::RightBrace)?;
    p.finish()?;
    Ok(ProgramClass {
        class,
        program,
        left,
        defs,
        main,
        right,
    })
}

/// `programDef := 'program' '(' ')' block`
fn program_def(p: &mut Parser) -> Parsed<ProgramDef> {
    let program = p.expect(TokenKind::Program)?;
    let left = p.expect(TokenKind::LeftParen)?;
    let right = p.expect(TokenKind::RightParen)?;
    let block = block(p)?;
    Ok(ProgramDef {
        program,
        left,
        right,
        block,
    })
}

/// `def := 'void' <var> defParam block`
fn def(p: &mut Parser) -> Parsed<Def> {
    let define = p.expect(TokenKind::Define)?;
    let name = p.expect(TokenKind::Identifier)?;
    let param = p.def_param()?;
    let block = block(p)?;
    Ok(Def {
        define,
        name,
        param,
        block,
    })
}

/// `block := '{' statement* '}'`
fn block(p: &mut Parser) -> Parsed<Block> {
    let left = p.expect(TokenKind::LeftBrace)?;
    let mut statements = Vec::new();
    while p.at_any(&STATEMENT_FIRST) {
        statements.push(statement(p)?);
    }
    let right = p.expect(TokenKind::RightBrace)?;
    Ok(Block {
        left,
        statements,
        right,
    })
}

/// Tokens that can start a statement, in the order the alternatives are tried.
const STATEMENT_FIRST: [TokenKind; 12] = [
    TokenKind::Move,
    TokenKind::TurnLeft,
    TokenKind::PickBeeper,
    TokenKind::PutBeeper,
    TokenKind::TurnOff,
    TokenKind::Return,
    TokenKind::Identifier,
    TokenKind::Semicolon,
    TokenKind::If,
    TokenKind::While,
    TokenKind::Repeat,
    TokenKind::LeftBrace,
];

/// ```text
/// statement       := singleStatement | cond | loop | repeat | block
/// singleStatement := (builtin '(' ')' | call)? ';'
/// ```
fn statement(p: &mut Parser) -> Parsed<Statement> {
    match p.peek() {
        TokenKind::If => cond(p).map(Statement::Cond),
        TokenKind::While => while_loop(p).map(Statement::Loop),
        TokenKind::Repeat => repeat(p).map(Statement::Repeat),
        TokenKind::LeftBrace => block(p).map(Statement::Block),
        TokenKind::Identifier => {
            let call = call(p)?;
            let semicolon = p.expect(TokenKind::Semicolon)?;
            Ok(Statement::Single(SingleStatement {
                action: Some(Action::Call(call)),
                semicolon,
            }))
        }
        TokenKind::Semicolon => Ok(Statement::Single(SingleStatement {
            action: None,
            semicolon: p.advance(),
        })),
        kind => {
            let Some(builtin) = Builtin::from_kind(kind) else {
                return Err(p.no_viable_alt(&STATEMENT_FIRST));
            };
            let token = p.advance();
            let left = p.expect(TokenKind::LeftParen)?;
            let right = p.expect(TokenKind::RightParen)?;
            let semicolon = p.expect(TokenKind::Semicolon)?;
            Ok(Statement::Single(SingleStatement {
                action: Some(Action::Builtin {
                    builtin,
                    token,
                    left,
                    right,
                }),
                semicolon,
            }))
        }
    }
}

/// `call := <var> '(' integer? ')'`
fn call(p: &mut Parser) -> Parsed<Call> {
    let name = p.expect(TokenKind::Identifier)?;
    let left = p.expect(TokenKind::LeftParen)?;
    let argument = match p.at(TokenKind::RightParen) {
        true => None,
        false => Some(p.integer()?),
    };
    let right = p.expect(TokenKind::RightParen)?;
    Ok(Call {
        name,
        left,
        argument,
        right,
    })
}

/// `cond := 'if' '(' term ')' statement ('else' statement)?`
fn cond(p: &mut Parser) -> Parsed<Cond> {
    let if_token = p.expect(TokenKind::If)?;
    let left = p.expect(TokenKind::LeftParen)?;
    let term = p.term()?;
    let right = p.expect(TokenKind::RightParen)?;
    let then = Box::new(statement(p)?);
    let otherwise = match p.eat(TokenKind::Else) {
        Some(else_token) => Some((else_token, Box::new(statement(p)?))),
        None => None,
    };
    Ok(Cond {
        if_token,
        left,
        term,
        right,
        then,
        otherwise,
    })
}

/// `loop := 'while' '(' term ')' statement`
fn while_loop(p: &mut Parser) -> Parsed<Loop> {
    let while_token = p.expect(TokenKind::While)?;
    let left = p.expect(TokenKind::LeftParen)?;
    let term = p.term()?;
    let right = p.expect(TokenKind::RightParen)?;
    let body = Box::new(statement(p)?);
    Ok(Loop {
        while_token,
        left,
        term,
        right,
        body,
    })
}

/// `repeat := 'iterate' '(' integer ')' statement`
fn repeat(p: &mut Parser) -> Parsed<Repeat> {
    let iterate = p.expect(TokenKind::Repeat)?;
    let left = p.expect(TokenKind::LeftParen)?;
    let count = p.integer()?;
    let right = p.expect(TokenKind::RightParen)?;
    let body = Box::new(statement(p)?);
    Ok(Repeat {
        iterate,
        left,
        count,
        right,
        body,
    })
}
