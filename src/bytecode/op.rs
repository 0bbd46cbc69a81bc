use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// OPCODE - Karel machine instructions
// =============================================================================

/// Runtime fault raised by `EZ` when the popped counter is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fault {
    #[serde(rename = "WALL")]
    Wall,
    #[serde(rename = "WORLDUNDERFLOW")]
    WorldUnderflow,
    #[serde(rename = "BAGUNDERFLOW")]
    BagUnderflow,
}

impl Fault {
    pub fn name(self) -> &'static str {
        match self {
            Fault::Wall => "WALL",
            Fault::WorldUnderflow => "WORLDUNDERFLOW",
            Fault::BagUnderflow => "BAGUNDERFLOW",
        }
    }
}

/// A single instruction of a linked program.
///
/// On the wire each opcode is an array of its mnemonic followed by its
/// operands, e.g. `["LINE", 3]`, `["CALL", 12, "foo"]`, `["EZ", "WALL"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// 0-based source line, for the interpreter's debugger.
    Line(u32),
    Halt,

    // robot actions
    Forward,
    Left,
    PickBuzzer,
    LeaveBuzzer,

    // calls
    /// Absolute index into the program, and the callee name for diagnostics.
    Call {
        target: usize,
        name: String,
    },
    Ret,
    /// Always slot 0: functions take at most one parameter.
    Param(u32),

    // stack
    Load(i64),
    Dup,
    Pop,
    Inc,
    Dec,

    // logic
    Eq,
    And,
    Or,
    Not,

    // control flow
    /// Relative to the instruction following the jump.
    Jmp(i32),
    /// Pops a boolean; jumps when it is false.
    Jz(i32),
    Ez(Fault),

    // sensors
    WorldWalls,
    Orientation,
    Mask,
    Rotl,
    Rotr,
    WorldBuzzers,
    BagBuzzers,
}

impl Opcode {
    pub const NAMES: &'static [&'static str] = &[
        "LINE",
        "HALT",
        "FORWARD",
        "LEFT",
        "PICKBUZZER",
        "LEAVEBUZZER",
        "CALL",
        "RET",
        "PARAM",
        "LOAD",
        "DUP",
        "POP",
        "INC",
        "DEC",
        "EQ",
        "AND",
        "OR",
        "NOT",
        "JMP",
        "JZ",
        "EZ",
        "WORLDWALLS",
        "ORIENTATION",
        "MASK",
        "ROTL",
        "ROTR",
        "WORLDBUZZERS",
        "BAGBUZZERS",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Line(_) => "LINE",
            Opcode::Halt => "HALT",
            Opcode::Forward => "FORWARD",
            Opcode::Left => "LEFT",
            Opcode::PickBuzzer => "PICKBUZZER",
            Opcode::LeaveBuzzer => "LEAVEBUZZER",
            Opcode::Call { .. } => "CALL",
            Opcode::Ret => "RET",
            Opcode::Param(_) => "PARAM",
            Opcode::Load(_) => "LOAD",
            Opcode::Dup => "DUP",
            Opcode::Pop => "POP",
            Opcode::Inc => "INC",
            Opcode::Dec => "DEC",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Jmp(_) => "JMP",
            Opcode::Jz(_) => "JZ",
            Opcode::Ez(_) => "EZ",
            Opcode::WorldWalls => "WORLDWALLS",
            Opcode::Orientation => "ORIENTATION",
            Opcode::Mask => "MASK",
            Opcode::Rotl => "ROTL",
            Opcode::Rotr => "ROTR",
            Opcode::WorldBuzzers => "WORLDBUZZERS",
            Opcode::BagBuzzers => "BAGBUZZERS",
        }
    }

    fn operand_count(&self) -> usize {
        match self {
            Opcode::Call { .. } => 2,
            Opcode::Line(_)
            | Opcode::Param(_)
            | Opcode::Load(_)
            | Opcode::Jmp(_)
            | Opcode::Jz(_)
            | Opcode::Ez(_) => 1,
            _ => 0,
        }
    }

    /// Relative offset of a jump, if this is one.
    pub fn jump_offset(&self) -> Option<i32> {
        match self {
            Opcode::Jmp(k) | Opcode::Jz(k) => Some(*k),
            _ => None,
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Opcode::Line(n) => write!(f, "LINE {}", n),
            Opcode::Call { target, name } => write!(f, "CALL {} {}", target, name),
            Opcode::Param(i) => write!(f, "PARAM {}", i),
            Opcode::Load(v) => write!(f, "LOAD {}", v),
            Opcode::Jmp(k) => write!(f, "JMP {}", k),
            Opcode::Jz(k) => write!(f, "JZ {}", k),
            Opcode::Ez(fault) => write!(f, "EZ {}", fault.name()),
            other => f.write_str(other.name()),
        }
    }
}

impl Serialize for Opcode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(1 + self.operand_count()))?;
        seq.serialize_element(self.name())?;
        match self {
            Opcode::Line(n) | Opcode::Param(n) => seq.serialize_element(n)?,
            Opcode::Call { target, name } => {
                seq.serialize_element(target)?;
                seq.serialize_element(name)?;
            }
            Opcode::Load(v) => seq.serialize_element(v)?,
            Opcode::Jmp(k) | Opcode::Jz(k) => seq.serialize_element(k)?,
            Opcode::Ez(fault) => seq.serialize_element(fault)?,
            _ => {}
        }
        seq.end()
    }
}

struct OpcodeVisitor;

fn operand<'de, A, T>(seq: &mut A, index: usize) -> Result<T, A::Error>
where
    A: SeqAccess<'de>,
    T: Deserialize<'de>,
{
    seq.next_element()?
        .ok_or_else(|| de::Error::invalid_length(index, &"an opcode with all of its operands"))
}

impl<'de> Visitor<'de> for OpcodeVisitor {
    type Value = Opcode;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("an opcode array such as [\"LINE\", 0]")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Opcode, A::Error> {
        let name: String = operand(&mut seq, 0)?;
        let op = match name.as_str() {
            "LINE" => Opcode::Line(operand(&mut seq, 1)?),
            "HALT" => Opcode::Halt,
            "FORWARD" => Opcode::Forward,
            "LEFT" => Opcode::Left,
            "PICKBUZZER" => Opcode::PickBuzzer,
            "LEAVEBUZZER" => Opcode::LeaveBuzzer,
            "CALL" => Opcode::Call {
                target: operand(&mut seq, 1)?,
                name: operand(&mut seq, 2)?,
            },
            "RET" => Opcode::Ret,
            "PARAM" => Opcode::Param(operand(&mut seq, 1)?),
            "LOAD" => Opcode::Load(operand(&mut seq, 1)?),
            "DUP" => Opcode::Dup,
            "POP" => Opcode::Pop,
            "INC" => Opcode::Inc,
            "DEC" => Opcode::Dec,
            "EQ" => Opcode::Eq,
            "AND" => Opcode::And,
            "OR" => Opcode::Or,
            "NOT" => Opcode::Not,
            "JMP" => Opcode::Jmp(operand(&mut seq, 1)?),
            "JZ" => Opcode::Jz(operand(&mut seq, 1)?),
            "EZ" => Opcode::Ez(operand(&mut seq, 1)?),
            "WORLDWALLS" => Opcode::WorldWalls,
            "ORIENTATION" => Opcode::Orientation,
            "MASK" => Opcode::Mask,
            "ROTL" => Opcode::Rotl,
            "ROTR" => Opcode::Rotr,
            "WORLDBUZZERS" => Opcode::WorldBuzzers,
            "BAGBUZZERS" => Opcode::BagBuzzers,
            other => return Err(de::Error::unknown_variant(other, Opcode::NAMES)),
        };
        Ok(op)
    }
}

impl<'de> Deserialize<'de> for Opcode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(OpcodeVisitor)
    }
}
