use std::collections::HashMap;

use crate::bytecode::{Fragment, Instr, Opcode, Program};
use crate::diagnostic::{CompileError, Diagnostic, DiagnosticKind};

/// A lowered function definition, or a prototype when `body` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub body: Option<Fragment>,
    /// Declared parameters: 0 or 1.
    pub param_count: u8,
    /// 1-based line of the function's name.
    pub line: usize,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    /// Absolute position of the body, once placed.
    offset: Option<usize>,
    param_count: u8,
}

/// Name -> signature, built in declaration order.
#[derive(Debug, Default)]
pub struct FunctionTable {
    entries: HashMap<String, Entry>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registers a prototype. Fails if the name was seen before in any form.
    fn declare(&mut self, def: &FunctionDef) -> Result<(), DiagnosticKind> {
        if self.is_known(&def.name) {
            return Err(DiagnosticKind::PrototypeRedefinition);
        }
        self.entries.insert(
            def.name.clone(),
            Entry {
                offset: None,
                param_count: def.param_count,
            },
        );
        Ok(())
    }

    /// Places a definition's body at `offset`.
    fn define(&mut self, def: &FunctionDef, offset: usize) -> Result<(), DiagnosticKind> {
        match self.entries.get_mut(&def.name) {
            Some(entry) if entry.offset.is_some() => Err(DiagnosticKind::FunctionRedefinition),
            Some(entry) if entry.param_count != def.param_count => {
                Err(DiagnosticKind::PrototypeParameterMismatch)
            }
            Some(entry) => {
                entry.offset = Some(offset);
                Ok(())
            }
            None => {
                self.entries.insert(
                    def.name.clone(),
                    Entry {
                        offset: Some(offset),
                        param_count: def.param_count,
                    },
                );
                Ok(())
            }
        }
    }

    /// Absolute target of a call with the given arity (declared parameters plus one).
    fn resolve(&self, name: &str, arity: u8) -> Result<usize, DiagnosticKind> {
        let entry = self.entries.get(name);
        let Some(Entry {
            offset: Some(offset),
            param_count,
        }) = entry.copied()
        else {
            return Err(DiagnosticKind::UndefinedFunction);
        };
        if param_count + 1 != arity {
            return Err(DiagnosticKind::FunctionParameterMismatch);
        }
        Ok(offset)
    }
}

/// Tracks the 1-based source line while walking lowered code.
///
/// `LINE` carries a 0-based line, so the current line becomes its operand + 1.
struct LineTracker(usize);

impl LineTracker {
    fn new() -> Self {
        LineTracker(1)
    }

    fn observe(&mut self, instr: &Instr) {
        if let Instr::Op(Opcode::Line(n)) = instr {
            self.0 = *n as usize + 1;
        }
    }
}

/// Checks that every call in `body` names a function seen so far.
fn check_declared(body: &[Instr], table: &FunctionTable, diagnostics: &mut Vec<Diagnostic>) {
    let mut line = LineTracker::new();
    for instr in body {
        line.observe(instr);
        if let Instr::Call { name, .. } = instr {
            if !table.is_known(name) {
                diagnostics.push(Diagnostic::at_line(
                    DiagnosticKind::UndefinedFunction,
                    name.as_str(),
                    line.0,
                ));
            }
        }
    }
}

/// Assembles the entry fragment and every function body into one program.
///
/// The entry comes first, so execution starts at index 0; bodies follow in
/// declaration order. Declaration problems are reported in declaration order,
/// then call and parameter problems in program order. With
/// `require_declaration`, a body may only call functions declared or defined
/// above it (or itself).
///
/// # Errors
///
/// Returns every diagnostic found, with the message `failed to parse`.
pub fn link(
    functions: Vec<FunctionDef>,
    entry: Fragment,
    require_declaration: bool,
) -> Result<Program, CompileError> {
    let mut table = FunctionTable::new();
    let mut diagnostics = Vec::new();
    let mut code = entry;

    for def in functions {
        let placed = match def.body {
            None => table.declare(&def),
            Some(_) => table.define(&def, code.len()),
        };
        if let Err(kind) = placed {
            diagnostics.push(Diagnostic::at_line(kind, def.name.as_str(), def.line));
            continue;
        }
        if let Some(body) = def.body {
            if require_declaration {
                check_declared(&body, &table, &mut diagnostics);
            }
            code.extend(body);
        }
    }

    let mut ops = Vec::with_capacity(code.len());
    let mut line = LineTracker::new();
    for instr in code {
        line.observe(&instr);
        match instr {
            Instr::Op(op) => ops.push(op),
            Instr::Call { name, arity } => match table.resolve(&name, arity) {
                Ok(target) => ops.push(Opcode::Call { target, name }),
                Err(kind) => diagnostics.push(Diagnostic::at_line(kind, name, line.0)),
            },
            Instr::Param(name) => diagnostics.push(Diagnostic::at_line(
                DiagnosticKind::UndefinedVariable,
                name,
                line.0,
            )),
        }
    }

    if !diagnostics.is_empty() {
        return Err(CompileError::linking(diagnostics));
    }
    Ok(Program::new(ops))
}
