use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::bytecode::Opcode;

/// An instruction as produced by lowering, before linking.
///
/// Calls and parameter references are still symbolic here; the linker turns
/// every fragment into plain opcodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    Op(Opcode),
    /// `arity` counts the implicit slot: 1 for `foo`, 2 for `foo(x)`.
    Call { name: String, arity: u8 },
    /// A parameter reference the enclosing function did not declare.
    Param(String),
}

impl From<Opcode> for Instr {
    fn from(op: Opcode) -> Self {
        Instr::Op(op)
    }
}

/// Lowered code for one construct. Jumps inside are relative to the
/// fragment itself, so fragments can be concatenated freely.
pub type Fragment = Vec<Instr>;

/// A linked Karel program.
/// Convention: execution starts at index 0, which is the entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program {
    pub ops: Vec<Opcode>,
}

impl Program {
    pub fn new(ops: Vec<Opcode>) -> Self {
        Self { ops }
    }

    /// Compact binary encoding of the program.
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

impl Deref for Program {
    type Target = [Opcode];

    fn deref(&self) -> &[Opcode] {
        &self.ops
    }
}

impl From<Program> for Vec<Opcode> {
    fn from(program: Program) -> Self {
        program.ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Fault;

    fn sample() -> Program {
        Program::new(vec![
            Opcode::Line(0),
            Opcode::Load(0),
            Opcode::Call {
                target: 5,
                name: "foo".to_string(),
            },
            Opcode::Line(0),
            Opcode::Halt,
            Opcode::Line(1),
            Opcode::WorldWalls,
            Opcode::Orientation,
            Opcode::Mask,
            Opcode::And,
            Opcode::Not,
            Opcode::Ez(Fault::Wall),
            Opcode::Forward,
            Opcode::Jz(-3),
            Opcode::Ret,
        ])
    }

    #[test]
    fn test_program_serializes_as_bare_list() {
        let program = Program::new(vec![Opcode::Line(0), Opcode::Halt]);
        assert_eq!(
            serde_json::to_string(&program).unwrap(),
            r#"[["LINE",0],["HALT"]]"#
        );
    }

    #[test]
    fn test_postcard_bytes() {
        let program = sample();
        let bytes = program.to_bytes().unwrap();
        assert!(bytes.len() < serde_json::to_string(&program).unwrap().len());
        assert_eq!(Program::from_bytes(&bytes).unwrap(), program);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(Program::from_bytes(&[3, 200, 1]).is_err());
    }

    #[test]
    fn test_deref_to_slice() {
        let program = sample();
        assert_eq!(program.len(), 15);
        assert_eq!(program[4], Opcode::Halt);
    }
}
