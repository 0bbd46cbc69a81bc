pub mod disasm;
pub mod ir;
pub mod link;
pub mod lower;
pub mod op;

pub use ir::{Fragment, Instr, Program};
pub use link::{FunctionDef, link};
pub use op::{Fault, Opcode};
