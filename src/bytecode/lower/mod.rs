//! Lowering of syntax trees into unlinked fragments.
//!
//! The builders in this module are shared by both dialects; `java` and
//! `pascal` only walk their own statement trees and feed the builders.

pub mod java;
pub mod pascal;

use crate::bytecode::{Fault, Fragment, FunctionDef, Instr, Opcode};
use crate::frontend::cst::{AndTerm, Builtin, Clause, Integer, NotTerm, Term};
use crate::frontend::token::{Predicate, Token};

/// How identifiers are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Sensitive,
    /// Names are lowercased before they reach the linker.
    Insensitive,
}

impl Case {
    pub fn name(self, token: &Token) -> String {
        match self {
            Case::Sensitive => token.image.clone(),
            Case::Insensitive => token.image.to_lowercase(),
        }
    }
}

fn ops<const N: usize>(ops: [Opcode; N]) -> Fragment {
    ops.into_iter().map(Instr::Op).collect()
}

fn jump_len(fragment: &[Instr]) -> i32 {
    fragment.len() as i32
}

/// `LINE` pointing at the (0-based) line `token` starts on.
pub fn line(token: &Token) -> Instr {
    Instr::Op(Opcode::Line(token.line.saturating_sub(1) as u32))
}

pub fn builtin(builtin: Builtin, token: &Token) -> Fragment {
    let mut result = vec![line(token)];
    result.extend(match builtin {
        Builtin::Move => ops([
            Opcode::WorldWalls,
            Opcode::Orientation,
            Opcode::Mask,
            Opcode::And,
            Opcode::Not,
            Opcode::Ez(Fault::Wall),
            Opcode::Forward,
        ]),
        Builtin::TurnLeft => ops([Opcode::Left]),
        Builtin::PickBeeper => ops([
            Opcode::WorldBuzzers,
            Opcode::Ez(Fault::WorldUnderflow),
            Opcode::PickBuzzer,
        ]),
        Builtin::PutBeeper => ops([
            Opcode::BagBuzzers,
            Opcode::Ez(Fault::BagUnderflow),
            Opcode::LeaveBuzzer,
        ]),
        Builtin::TurnOff => ops([Opcode::Halt]),
        Builtin::Return => ops([Opcode::Ret]),
    });
    result
}

/// A call site. Without an argument a `LOAD 0` fills the parameter slot.
///
/// The trailing `LINE` restores the caller's line after the callee returns.
pub fn call(name: String, token: &Token, argument: Option<Fragment>) -> Fragment {
    let mut result = vec![line(token)];
    let arity = match argument {
        Some(argument) => {
            result.extend(argument);
            2
        }
        None => {
            result.push(Instr::Op(Opcode::Load(0)));
            1
        }
    };
    result.push(Instr::Call { name, arity });
    result.push(line(token));
    result
}

///   LINE
///   <term>
///   JZ(then_len + 1)   ; skip then + jump (then_len without else)
///   <then>
///   JMP(else_len)
///   <else>
pub fn cond(token: &Token, term: Fragment, then: Fragment, otherwise: Option<Fragment>) -> Fragment {
    let mut result = vec![line(token)];
    result.extend(term);
    match otherwise {
        Some(otherwise) => {
            result.push(Instr::Op(Opcode::Jz(1 + jump_len(&then))));
            result.extend(then);
            result.push(Instr::Op(Opcode::Jmp(jump_len(&otherwise))));
            result.extend(otherwise);
        }
        None => {
            result.push(Instr::Op(Opcode::Jz(jump_len(&then))));
            result.extend(then);
        }
    }
    result
}

///   LINE
///   <term>
///   JZ(body_len + 1)
///   <body>
///   JMP(-(term_len + body_len + 2))   ; back to the first term instruction
pub fn while_loop(token: &Token, term: Fragment, body: Fragment) -> Fragment {
    let back = -(jump_len(&term) + jump_len(&body) + 2);
    let mut result = vec![line(token)];
    result.extend(term);
    result.push(Instr::Op(Opcode::Jz(1 + jump_len(&body))));
    result.extend(body);
    result.push(Instr::Op(Opcode::Jmp(back)));
    result
}

/// Counted loop; the counter lives on the stack for the whole loop.
///
///   0: LINE
///      <count>
///   1: DUP
///   2: LOAD 0
///   3: EQ
///   4: NOT
///   5: JZ(body_len + 2)           ; exit when the counter hit zero
///      <body>
///   6: DEC
///   7: JMP(-(body_len + 7))       ; back to DUP
///   8: POP
pub fn repeat(token: &Token, count: Fragment, body: Fragment) -> Fragment {
    let body_len = jump_len(&body);
    let mut result = vec![line(token)];
    result.extend(count);
    result.extend(ops([
        Opcode::Dup,
        Opcode::Load(0),
        Opcode::Eq,
        Opcode::Not,
        Opcode::Jz(body_len + 2),
    ]));
    result.extend(body);
    result.extend(ops([Opcode::Dec, Opcode::Jmp(-(body_len + 7)), Opcode::Pop]));
    result
}

pub fn term(term: &Term, case: Case) -> Fragment {
    let mut result = and_term(&term.first, case);
    for (_, rest) in &term.rest {
        result.extend(and_term(rest, case));
        result.push(Instr::Op(Opcode::Or));
    }
    result
}

fn and_term(term: &AndTerm, case: Case) -> Fragment {
    let mut result = not_term(&term.first, case);
    for (_, rest) in &term.rest {
        result.extend(not_term(rest, case));
        result.push(Instr::Op(Opcode::And));
    }
    result
}

fn not_term(term: &NotTerm, case: Case) -> Fragment {
    let mut result = clause(&term.clause, case);
    if term.not.is_some() {
        result.push(Instr::Op(Opcode::Not));
    }
    result
}

fn clause(clause: &Clause, case: Case) -> Fragment {
    match clause {
        Clause::IsZero(c) => {
            let mut result = integer(&c.integer, case);
            result.push(Instr::Op(Opcode::Not));
            result
        }
        Clause::BoolFun(c) => predicate(c.predicate),
        Clause::Paren { term: inner, .. } => term(inner, case),
    }
}

/// Sensor code leaving one boolean on the stack.
pub fn predicate(predicate: Predicate) -> Fragment {
    use Opcode::*;

    match predicate {
        Predicate::FrontIsClear => ops([WorldWalls, Orientation, Mask, And, Not]),
        Predicate::FrontIsBlocked => ops([WorldWalls, Orientation, Mask, And]),
        Predicate::LeftIsClear => ops([WorldWalls, Orientation, Rotl, Mask, And, Not]),
        Predicate::LeftIsBlocked => ops([WorldWalls, Orientation, Rotl, Mask, And]),
        Predicate::RightIsClear => ops([WorldWalls, Orientation, Rotr, Mask, And, Not]),
        Predicate::RightIsBlocked => ops([WorldWalls, Orientation, Rotr, Mask, And]),
        Predicate::NextToABeeper => ops([WorldBuzzers, Load(0), Eq, Not]),
        Predicate::NotNextToABeeper => ops([WorldBuzzers, Not]),
        Predicate::AnyBeepersInBeeperBag => ops([BagBuzzers, Load(0), Eq, Not]),
        Predicate::NoBeepersInBeeperBag => ops([BagBuzzers, Not]),
        Predicate::FacingWest => ops([Orientation, Load(0), Eq]),
        Predicate::FacingNorth => ops([Orientation, Load(1), Eq]),
        Predicate::FacingEast => ops([Orientation, Load(2), Eq]),
        Predicate::FacingSouth => ops([Orientation, Load(3), Eq]),
        Predicate::NotFacingWest => ops([Orientation, Load(0), Eq, Not]),
        Predicate::NotFacingNorth => ops([Orientation, Load(1), Eq, Not]),
        Predicate::NotFacingEast => ops([Orientation, Load(2), Eq, Not]),
        Predicate::NotFacingSouth => ops([Orientation, Load(3), Eq, Not]),
    }
}

/// Parameter references stay symbolic until `function` resolves them.
pub fn integer(integer: &Integer, case: Case) -> Fragment {
    match integer {
        Integer::Variable(token) => vec![Instr::Param(case.name(token))],
        Integer::Literal { value, .. } => vec![Instr::Op(Opcode::Load(*value))],
        Integer::Step {
            increment, inner, ..
        } => {
            let mut result = self::integer(inner, case);
            let step = if *increment { Opcode::Inc } else { Opcode::Dec };
            result.push(Instr::Op(step));
            result
        }
    }
}

/// Wraps a lowered body into a function definition.
///
/// References to the declared parameter become `PARAM 0`; any other name is
/// left for the linker to report.
pub fn function(name: &Token, param: Option<&Token>, body: Fragment, case: Case) -> FunctionDef {
    let param = param.map(|p| case.name(p));
    let mut code = Vec::with_capacity(body.len() + 2);
    code.push(line(name));
    for instr in body {
        code.push(match instr {
            Instr::Param(n) if Some(&n) == param.as_ref() => Instr::Op(Opcode::Param(0)),
            other => other,
        });
    }
    code.push(Instr::Op(Opcode::Ret));
    FunctionDef {
        name: case.name(name),
        body: Some(code),
        param_count: u8::from(param.is_some()),
        line: name.line,
    }
}

/// A forward declaration.
pub fn prototype(name: &Token, has_param: bool, case: Case) -> FunctionDef {
    FunctionDef {
        name: case.name(name),
        body: None,
        param_count: u8::from(has_param),
        line: name.line,
    }
}

/// The program entry point: the main body, then a halt on the closing line.
pub fn entry(main: Fragment, end: &Token) -> Fragment {
    let mut result = main;
    result.push(Instr::Op(Opcode::Line(end.end_line.saturating_sub(1) as u32)));
    result.push(Instr::Op(Opcode::Halt));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::token::TokenKind;

    fn tok(kind: TokenKind, image: &str, line: usize) -> Token {
        Token {
            kind,
            image: image.to_string(),
            line,
            column: 1,
            end_line: line,
            offset: 0,
            end_offset: image.chars().count().saturating_sub(1),
            inserted: false,
        }
    }

    fn op(o: Opcode) -> Instr {
        Instr::Op(o)
    }

    fn filler(n: usize) -> Fragment {
        vec![op(Opcode::Left); n]
    }

    #[test]
    fn test_builtin_move() {
        let code = builtin(Builtin::Move, &tok(TokenKind::Move, "move", 3));
        assert_eq!(code[0], op(Opcode::Line(2)));
        assert_eq!(code[6], op(Opcode::Ez(Fault::Wall)));
        assert_eq!(code.last(), Some(&op(Opcode::Forward)));
        assert_eq!(code.len(), 8);
    }

    #[test]
    fn test_call_without_argument() {
        let name = tok(TokenKind::Identifier, "foo", 5);
        assert_eq!(
            call("foo".to_string(), &name, None),
            vec![
                op(Opcode::Line(4)),
                op(Opcode::Load(0)),
                Instr::Call {
                    name: "foo".to_string(),
                    arity: 1
                },
                op(Opcode::Line(4)),
            ]
        );
    }

    #[test]
    fn test_call_with_argument() {
        let name = tok(TokenKind::Identifier, "foo", 1);
        let code = call("foo".to_string(), &name, Some(vec![op(Opcode::Load(7))]));
        assert_eq!(code[1], op(Opcode::Load(7)));
        assert!(matches!(code[2], Instr::Call { arity: 2, .. }));
    }

    #[test]
    fn test_cond_jumps() {
        let t = tok(TokenKind::If, "if", 1);
        let code = cond(&t, filler(2), filler(3), Some(filler(4)));
        assert_eq!(code[3], op(Opcode::Jz(4)));
        assert_eq!(code[7], op(Opcode::Jmp(4)));
        assert_eq!(code.len(), 1 + 2 + 1 + 3 + 1 + 4);

        let code = cond(&t, filler(2), filler(3), None);
        assert_eq!(code[3], op(Opcode::Jz(3)));
        assert_eq!(code.len(), 7);
    }

    #[test]
    fn test_while_jumps_back_to_the_term() {
        let t = tok(TokenKind::While, "while", 1);
        let code = while_loop(&t, filler(2), filler(3));
        assert_eq!(code[3], op(Opcode::Jz(4)));
        // relative to the next instruction, -7 lands on index 1
        assert_eq!(code[7], op(Opcode::Jmp(-7)));
    }

    #[test]
    fn test_repeat_layout() {
        let t = tok(TokenKind::Repeat, "iterate", 2);
        let code = repeat(&t, vec![op(Opcode::Load(5))], filler(1));
        assert_eq!(
            code,
            vec![
                op(Opcode::Line(1)),
                op(Opcode::Load(5)),
                op(Opcode::Dup),
                op(Opcode::Load(0)),
                op(Opcode::Eq),
                op(Opcode::Not),
                op(Opcode::Jz(3)),
                op(Opcode::Left),
                op(Opcode::Dec),
                op(Opcode::Jmp(-8)),
                op(Opcode::Pop),
            ]
        );
    }

    #[test]
    fn test_facing_directions() {
        assert_eq!(
            predicate(Predicate::FacingWest),
            vec![op(Opcode::Orientation), op(Opcode::Load(0)), op(Opcode::Eq)]
        );
        assert_eq!(predicate(Predicate::NotFacingSouth)[1], op(Opcode::Load(3)));
        assert_eq!(predicate(Predicate::LeftIsClear)[2], op(Opcode::Rotl));
    }

    #[test]
    fn test_function_resolves_its_parameter() {
        let name = tok(TokenKind::Identifier, "Foo", 4);
        let param = tok(TokenKind::Identifier, "N", 4);
        let body = vec![Instr::Param("n".to_string()), Instr::Param("m".to_string())];
        let def = function(&name, Some(&param), body, Case::Insensitive);
        assert_eq!(def.name, "foo");
        assert_eq!(def.param_count, 1);
        assert_eq!(def.line, 4);
        assert_eq!(
            def.body.unwrap(),
            vec![
                op(Opcode::Line(3)),
                op(Opcode::Param(0)),
                Instr::Param("m".to_string()),
                op(Opcode::Ret),
            ]
        );
    }

    #[test]
    fn test_function_case_sensitive() {
        let name = tok(TokenKind::Identifier, "foo", 1);
        let param = tok(TokenKind::Identifier, "N", 1);
        let def = function(&name, Some(&param), vec![Instr::Param("n".to_string())], Case::Sensitive);
        assert_eq!(def.body.unwrap()[1], Instr::Param("n".to_string()));
    }

    #[test]
    fn test_entry_halts_on_the_closing_line() {
        let end = tok(TokenKind::RightBrace, "}", 9);
        assert_eq!(
            entry(vec![], &end),
            vec![op(Opcode::Line(8)), op(Opcode::Halt)]
        );
    }
}
