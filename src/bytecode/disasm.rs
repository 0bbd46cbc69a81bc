use std::collections::{BTreeMap, HashMap};

use crate::bytecode::{Opcode, Program};

/// Renders a listing of a linked program.
///
/// Function bodies are introduced by a header named after the first call
/// that targets them; jump targets are marked with `►`.
pub fn disassemble(program: &Program) -> String {
    let jump_targets = collect_jump_targets(program);
    let functions = collect_functions(program);
    let mut output = String::new();

    output.push_str(&header("main", entry_len(program, &functions)));
    for (ip, op) in program.iter().enumerate() {
        if let Some(name) = functions.get(&ip) {
            let len = function_len(program, &functions, ip);
            output.push('\n');
            output.push_str(&header(name, len));
        }
        if jump_targets.contains(&ip) {
            output.push_str("      ┌──────────────────────────────────\n");
        }

        output.push_str(&format!("{:04} ", ip));
        output.push_str(if jump_targets.contains(&ip) { "► " } else { "  " });
        output.push_str(&format_op(op, ip));
        output.push('\n');
    }

    output
}

fn header(name: &str, len: usize) -> String {
    format!(
        "════════════════════════════════════════\n {}\n {} instructions\n════════════════════════════════════════\n",
        name, len
    )
}

/// Jumps are relative to the instruction after the jump.
fn jump_target(ip: usize, offset: i32) -> usize {
    (ip as i64 + 1 + offset as i64).max(0) as usize
}

fn collect_jump_targets(ops: &[Opcode]) -> Vec<usize> {
    let mut targets = Vec::new();
    for (ip, op) in ops.iter().enumerate() {
        if let Some(offset) = op.jump_offset() {
            let target = jump_target(ip, offset);
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
    }
    targets
}

/// Function start -> name, ordered by position.
fn collect_functions(ops: &[Opcode]) -> BTreeMap<usize, &str> {
    let mut functions = BTreeMap::new();
    for op in ops {
        if let Opcode::Call { target, name } = op {
            functions.entry(*target).or_insert(name.as_str());
        }
    }
    functions
}

fn entry_len(program: &Program, functions: &BTreeMap<usize, &str>) -> usize {
    functions.keys().next().copied().unwrap_or(program.len())
}

fn function_len(program: &Program, functions: &BTreeMap<usize, &str>, start: usize) -> usize {
    let end = functions
        .range(start + 1..)
        .next()
        .map(|(ip, _)| *ip)
        .unwrap_or(program.len());
    end - start
}

fn format_op(op: &Opcode, ip: usize) -> String {
    match op {
        Opcode::Jmp(offset) | Opcode::Jz(offset) => {
            let direction = if *offset < 0 { "↑" } else { "↓" };
            format!(
                "{:<12}{:+} {} (→ {:04})",
                op.name(),
                offset,
                direction,
                jump_target(ip, *offset)
            )
        }
        Opcode::Call { target, name } => format!("{:<12}\"{}\" (→ {:04})", op.name(), name, target),
        Opcode::Line(n) => format!("{:<12}{}", op.name(), n),
        Opcode::Load(v) => format!("{:<12}{}", op.name(), v),
        Opcode::Param(i) => format!("{:<12}{}", op.name(), i),
        Opcode::Ez(fault) => format!("{:<12}{}", op.name(), fault.name()),
        other => other.name().to_string(),
    }
}

/// Opcode histogram, most frequent first.
pub fn stats(program: &Program) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for op in program.iter() {
        *counts.entry(op.name()).or_insert(0) += 1;
    }
    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let mut output = format!("Instructions:     {}\n", program.len());
    output.push_str(&format!(
        "Functions:        {}\n\n",
        collect_functions(program).len()
    ));
    for (name, count) in counts {
        output.push_str(&format!("  {:<14}{}\n", name, count));
    }
    output
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
            Opcode::BagBuzzers,
            Opcode::Jz(1),
            Opcode::Ez(Fault::BagUnderflow),
            Opcode::Ret,
        ])
    }

    #[test]
    fn test_listing_marks_functions_and_targets() {
        let text = disassemble(&sample());
        assert!(text.contains(" main\n 5 instructions"));
        assert!(text.contains(" foo\n 5 instructions"));
        assert!(text.contains("0002   CALL        \"foo\" (→ 0005)"));
        assert!(text.contains("0007   JZ          +1 ↓ (→ 0009)"));
        assert!(text.contains("0009 ► RET"));
        assert!(text.contains("0008   EZ          BAGUNDERFLOW"));
    }

    #[test]
    fn test_backward_jump() {
        let program = Program::new(vec![Opcode::Left, Opcode::Jmp(-2)]);
        let text = disassemble(&program);
        assert!(text.contains("0000 ► LEFT"));
        assert!(text.contains("JMP         -2 ↑ (→ 0000)"));
    }

    #[test]
    fn test_stats() {
        let text = stats(&sample());
        assert!(text.starts_with("Instructions:     10\n"));
        assert!(text.contains("Functions:        1\n"));
        assert!(text.contains("  LINE          3\n"));
    }
}
