//! The Spanish, Pascal-flavoured Karel dialect (`.kp`).
//!
//! Lenient: unknown characters are dropped, and a missing statement `;` is
//! synthesized so parsing can go on and report more than one problem.

pub mod cst;
pub mod grammar;
pub mod lexicon;
pub mod recovery;

use crate::bytecode::{Program, link, lower};
use crate::diagnostic::CompileError;
use crate::frontend::cst::{Syntax, SyntaxNode};
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::frontend::token::Token;

pub use lexicon::LEXICON;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cst {
    pub root: cst::Program,
    pub comments: Vec<Token>,
}

impl Syntax for Cst {
    fn syntax(&self) -> SyntaxNode {
        self.root.syntax()
    }
}

/// Parses Pascal-dialect source into a concrete syntax tree.
///
/// A `;` missing right before `fin` or `termina-ejecución` is accepted; the
/// synthesized terminator is placed right after the statement it closes.
///
/// # Errors
///
/// `parse errors detected` with every syntax diagnostic recorded, once any
/// remains after dropping the accepted ones or the parse aborted.
pub fn parse(source: &str, filename: Option<&str>) -> Result<Cst, CompileError> {
    let lexed = Lexer::new(source, &LEXICON).tokenize();
    if !lexed.errors.is_empty() {
        return Err(CompileError::lexing(lexed.errors).with_source(source, filename));
    }

    let mut parser = Parser::new(lexed.tokens, &LEXICON).with_recovery();
    let result = grammar::program(&mut parser);
    let errors = parser.into_errors();
    let Ok(mut root) = result else {
        return Err(CompileError::parsing(errors).with_source(source, filename));
    };

    let (errors, dropped) = recovery::filter(errors);
    if !errors.is_empty() {
        return Err(CompileError::parsing(errors).with_source(source, filename));
    }
    if dropped {
        recovery::reposition(&mut root);
    }
    Ok(Cst {
        root,
        comments: lexed.comments,
    })
}

/// Compiles Pascal-dialect source into a linked program.
///
/// Names are case-insensitive. A function body may only call functions
/// declared above it; prototypes make mutual recursion possible.
///
/// # Errors
///
/// Anything `parse` reports, or `failed to parse` with every semantic
/// problem the linker found.
pub fn compile(source: &str, filename: Option<&str>) -> Result<Program, CompileError> {
    let cst = parse(source, filename)?;
    let (functions, entry) = lower::pascal::program(&cst.root);
    link(functions, entry, true).map_err(|e| e.with_source(source, filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Opcode;
    use crate::diagnostic::DiagnosticKind;
    use crate::frontend::pascal::cst::SingleStatement;

    fn semantic(err: &CompileError) -> Vec<(DiagnosticKind, String, usize)> {
        err.diagnostics
            .iter()
            .map(|d| {
                (
                    d.kind,
                    d.text().unwrap_or_default().to_string(),
                    d.line().unwrap_or_default(),
                )
            })
            .collect()
    }

    fn one(kind: DiagnosticKind, text: &str, line: usize) -> Vec<(DiagnosticKind, String, usize)> {
        vec![(kind, text.to_string(), line)]
    }

    #[test]
    fn test_unknown_characters_are_skipped() {
        let cst = parse(
            "\niniciar-programa: inicia-ejecución: termina-ejecución finalizar-programa",
            None,
        )
        .unwrap();
        assert!(cst.comments.is_empty());
    }

    #[test]
    fn test_mismatch_with_one_alternative() {
        let err = parse(
            "\niniciar-programa foo termina-ejecución finalizar-programa",
            None,
        )
        .unwrap_err();
        assert_eq!(err.message, "parse errors detected");
        assert_eq!(err.diagnostics.len(), 1);
        let d = &err.diagnostics[0];
        assert_eq!(d.kind, DiagnosticKind::MismatchedToken);
        assert_eq!((d.text(), d.line(), d.column()), (Some("foo"), Some(2), Some(18)));
        assert_eq!(d.expected().unwrap(), &["inicia-ejecución"]);
    }

    #[test]
    fn test_mismatch_with_multiple_alternatives() {
        let err = parse(
            "\niniciar-programa inicia-ejecución si 5 entonces ; termina-ejecución finalizar-programa",
            None,
        )
        .unwrap_err();
        assert_eq!(err.diagnostics.len(), 1);
        let d = &err.diagnostics[0];
        assert_eq!((d.text(), d.line(), d.column()), (Some("5"), Some(2), Some(38)));
        assert_eq!(
            d.expected().unwrap(),
            &[
                "si-es-cero",
                "frente-libre",
                "frente-bloqueado",
                "izquierda-libre",
                "izquierda-bloqueada",
                "derecha-libre",
                "derecha-bloqueada",
                "junto-a-zumbador",
                "no-junto-a-zumbador",
                "algún-zumbador-en-la-mochila",
                "ningún-zumbador-en-la-mochila",
                "orientado-al-norte",
                "orientado-al-sur",
                "orientado-al-este",
                "orientado-al-oeste",
                "no-orientado-al-norte",
                "no-orientado-al-sur",
                "no-orientado-al-este",
                "no-orientado-al-oeste",
                "(",
            ]
        );
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse(
            "\niniciar-programa inicia-ejecución termina-ejecución finalizar-programa foo",
            None,
        )
        .unwrap_err();
        let d = &err.diagnostics[0];
        assert_eq!(d.kind, DiagnosticKind::ExpectedEof);
        assert_eq!((d.text(), d.line(), d.column()), (Some("foo"), Some(2), Some(72)));
        assert_eq!(d.expected(), Some(&[][..]));
    }

    #[test]
    fn test_basic_program() {
        let cst = parse(
            "iniciar-programa inicia-ejecución termina-ejecución finalizar-programa",
            None,
        )
        .unwrap();
        assert!(cst.comments.is_empty());
        assert!(cst.root.defs.is_empty());
    }

    #[test]
    fn test_comments() {
        for (src, image) in [
            (
                "\niniciar-programa inicia-ejecución termina-ejecución finalizar-programa { foo }",
                "{ foo }",
            ),
            (
                "\niniciar-programa inicia-ejecución termina-ejecución finalizar-programa (* foo *)",
                "(* foo *)",
            ),
            (
                "\niniciar-programa inicia-ejecución (* foo *) termina-ejecución finalizar-programa",
                "(* foo *)",
            ),
        ] {
            let cst = parse(src, None).unwrap();
            let comments: Vec<(&str, usize)> =
                cst.comments.iter().map(|c| (c.image.as_str(), c.line)).collect();
            assert_eq!(comments, vec![(image, 2)]);
        }
    }

    #[test]
    fn test_missing_terminator_before_closer() {
        let src = "iniciar-programa inicia-ejecución avanza termina-ejecución finalizar-programa";
        let cst = parse(src, None).unwrap();
        let statement = &cst.root.main.statements[0];
        assert!(matches!(statement.single, Some(SingleStatement::Builtin { .. })));

        let semicolon = &statement.semicolon;
        assert!(semicolon.inserted);
        assert_eq!(semicolon.image, ";");
        // right after `avanza`, which spans offsets 34..=39
        assert_eq!((semicolon.offset, semicolon.end_offset), (40, 40));
        assert_eq!((semicolon.line, semicolon.column), (1, 41));
    }

    #[test]
    fn test_missing_terminators_in_nested_blocks() {
        let src = "iniciar-programa
              inicia-ejecución
                mientras frente-libre hacer inicio
                  avanza
                fin
              termina-ejecución
            finalizar-programa";
        let cst = parse(src, None).unwrap();
        let outer = &cst.root.main.statements[0];
        assert!(outer.semicolon.inserted);
        assert_eq!(outer.semicolon.line, 5);

        let Some(SingleStatement::Loop(l)) = &outer.single else {
            panic!("expected a loop");
        };
        let SingleStatement::Block(block) = l.body.as_ref() else {
            panic!("expected a block");
        };
        let inner = &block.statements[0].semicolon;
        assert!(inner.inserted);
        assert_eq!(inner.line, 4);

        assert!(compile(src, None).is_ok());
    }

    #[test]
    fn test_missing_terminators_between_statements() {
        let err = parse(
            "iniciar-programa inicia-ejecución avanza gira-izquierda avanza; termina-ejecución finalizar-programa",
            None,
        )
        .unwrap_err();
        assert_eq!(err.message, "parse errors detected");
        let found: Vec<(Option<&str>, Option<&[String]>)> = err
            .diagnostics
            .iter()
            .map(|d| (d.text(), d.expected()))
            .collect();
        let semicolon = [";".to_string()];
        assert_eq!(
            found,
            vec![
                (Some("gira-izquierda"), Some(&semicolon[..])),
                (Some("avanza"), Some(&semicolon[..])),
            ]
        );
    }

    #[test]
    fn test_stray_tokens_are_all_reported() {
        let err = parse(
            "iniciar-programa\ninicia-ejecución avanza; 5 avanza; 6 termina-ejecución\nfinalizar-programa",
            None,
        )
        .unwrap_err();
        let found: Vec<(Option<&str>, Option<usize>, Option<usize>, Option<&[String]>)> = err
            .diagnostics
            .iter()
            .map(|d| (d.text(), d.line(), d.column(), d.expected()))
            .collect();
        let end = ["termina-ejecución".to_string()];
        assert_eq!(
            found,
            vec![
                (Some("5"), Some(2), Some(26), Some(&end[..])),
                (Some("6"), Some(2), Some(36), Some(&end[..])),
            ]
        );

        let err = parse(
            "iniciar-programa\n  inicia-ejecución\n    inicio avanza; 7 8 gira-izquierda; fin;\n  termina-ejecución\nfinalizar-programa",
            None,
        )
        .unwrap_err();
        assert_eq!(err.diagnostics.len(), 1);
        let d = &err.diagnostics[0];
        assert_eq!((d.text(), d.line(), d.column()), (Some("7"), Some(3), Some(20)));
        assert_eq!(d.expected().unwrap(), &["fin"]);
    }

    #[test]
    fn test_missing_prototype_terminator() {
        let err = parse(
            "iniciar-programa define-prototipo-instrucción foo inicia-ejecución termina-ejecución finalizar-programa",
            None,
        )
        .unwrap_err();
        assert_eq!(err.diagnostics.len(), 1);
        assert_eq!(err.diagnostics[0].text(), Some("inicia-ejecución"));
    }

    #[test]
    fn test_function_redefinition() {
        let err = compile(
            "
            iniciar-programa
              define-nueva-instrucción foo como inicio fin;
              define-nueva-instrucción foo como inicio fin;
              inicia-ejecución
              termina-ejecución
            finalizar-programa
            ",
            None,
        )
        .unwrap_err();
        assert_eq!(err.message, "failed to parse");
        assert_eq!(
            semantic(&err),
            one(DiagnosticKind::FunctionRedefinition, "foo", 4)
        );
    }

    #[test]
    fn test_prototype_redefinition() {
        let err = compile(
            "
            iniciar-programa
              define-prototipo-instrucción foo;
              define-prototipo-instrucción foo;
              inicia-ejecución
              termina-ejecución
            finalizar-programa
            ",
            None,
        )
        .unwrap_err();
        assert_eq!(
            semantic(&err),
            one(DiagnosticKind::PrototypeRedefinition, "foo", 4)
        );
    }

    #[test]
    fn test_prototype_parameter_mismatch() {
        let more = "
            iniciar-programa
              define-prototipo-instrucción foo;
              define-nueva-instrucción foo(n) como inicio fin;
              inicia-ejecución
              termina-ejecución
            finalizar-programa
            ";
        let fewer = "
            iniciar-programa
              define-prototipo-instrucción foo(n);
              define-nueva-instrucción foo como inicio fin;
              inicia-ejecución
              termina-ejecución
            finalizar-programa
            ";
        for src in [more, fewer] {
            assert_eq!(
                semantic(&compile(src, None).unwrap_err()),
                one(DiagnosticKind::PrototypeParameterMismatch, "foo", 4)
            );
        }
    }

    #[test]
    fn test_empty_prototype_parens_declare_a_parameter() {
        let without = "
            iniciar-programa
              define-prototipo-instrucción foo();
              define-nueva-instrucción foo como inicio avanza fin;
              inicia-ejecución
              termina-ejecución
            finalizar-programa
            ";
        assert_eq!(
            semantic(&compile(without, None).unwrap_err()),
            one(DiagnosticKind::PrototypeParameterMismatch, "foo", 4)
        );

        let with = "
            iniciar-programa
              define-prototipo-instrucción foo();
              define-nueva-instrucción foo(n) como repetir n veces avanza;
              inicia-ejecución
                foo(2);
              termina-ejecución
            finalizar-programa
            ";
        let program = compile(with, None).unwrap();
        assert!(program.iter().any(|op| matches!(op, Opcode::Param(0))));
        assert!(
            program
                .iter()
                .any(|op| matches!(op, Opcode::Call { name, .. } if name == "foo"))
        );
    }

    #[test]
    fn test_undefined_function_not_yet_declared() {
        let err = compile(
            "
            iniciar-programa
              define-nueva-instrucción foo como inicio bar; fin;
              define-nueva-instrucción bar como inicio foo; fin;
              inicia-ejecución
                foo;
              termina-ejecución
            finalizar-programa
            ",
            None,
        )
        .unwrap_err();
        assert_eq!(
            semantic(&err),
            one(DiagnosticKind::UndefinedFunction, "bar", 3)
        );
    }

    #[test]
    fn test_undefined_function() {
        let err = compile(
            "
            iniciar-programa
              inicia-ejecución
                foo;
              termina-ejecución
            finalizar-programa
            ",
            None,
        )
        .unwrap_err();
        assert_eq!(
            semantic(&err),
            one(DiagnosticKind::UndefinedFunction, "foo", 4)
        );
    }

    #[test]
    fn test_function_parameter_mismatch() {
        let more = "
            iniciar-programa
              define-nueva-instrucción foo como inicio fin;
              inicia-ejecución
                foo(5);
              termina-ejecución
            finalizar-programa
            ";
        let fewer = "
            iniciar-programa
              define-nueva-instrucción foo(n) como inicio fin;
              inicia-ejecución
                foo;
              termina-ejecución
            finalizar-programa
            ";
        for src in [more, fewer] {
            assert_eq!(
                semantic(&compile(src, None).unwrap_err()),
                one(DiagnosticKind::FunctionParameterMismatch, "foo", 5)
            );
        }
    }

    #[test]
    fn test_undefined_variable() {
        let in_function = "
            iniciar-programa
              define-nueva-instrucción foo como si si-es-cero(n) entonces inicio fin;
              inicia-ejecución
                foo;
              termina-ejecución
            finalizar-programa
            ";
        assert_eq!(
            semantic(&compile(in_function, None).unwrap_err()),
            one(DiagnosticKind::UndefinedVariable, "n", 3)
        );

        let in_program = "
            iniciar-programa
              inicia-ejecución
                si si-es-cero(n) entonces inicio fin;
              termina-ejecución
            finalizar-programa
            ";
        assert_eq!(
            semantic(&compile(in_program, None).unwrap_err()),
            one(DiagnosticKind::UndefinedVariable, "n", 4)
        );
    }

    #[test]
    fn test_multiple_errors() {
        let err = compile(
            "
            iniciar-programa
              define-nueva-instrucción foo como si si-es-cero(n) entonces inicio fin;
              define-nueva-instrucción foo(n) como inicio fin;
              inicia-ejecución
                bar;
                foo(n);
              termina-ejecución
            finalizar-programa
            ",
            None,
        )
        .unwrap_err();
        let expected: Vec<(DiagnosticKind, String, usize)> = [
            (DiagnosticKind::FunctionRedefinition, "foo", 4),
            (DiagnosticKind::UndefinedFunction, "bar", 6),
            (DiagnosticKind::UndefinedVariable, "n", 7),
            (DiagnosticKind::FunctionParameterMismatch, "foo", 7),
            (DiagnosticKind::UndefinedVariable, "n", 3),
        ]
        .into_iter()
        .map(|(k, t, l)| (k, t.to_string(), l))
        .collect();
        assert_eq!(semantic(&err), expected);
    }

    #[test]
    fn test_basic_program_compiles() {
        let program = compile(
            "iniciar-programa inicia-ejecución termina-ejecución finalizar-programa",
            None,
        )
        .unwrap();
        assert_eq!(program.ops, vec![Opcode::Line(0), Opcode::Halt]);
    }

    #[test]
    fn test_prototype_enables_mutual_recursion() {
        let program = compile(
            "
        iniciar-programa
          define-prototipo-instrucción bar;
          define-nueva-instrucción foo como inicio bar; fin;
          define-nueva-instrucción bar como inicio foo; fin;
          inicia-ejecución
            foo;
          termina-ejecución
        finalizar-programa
            ",
            None,
        )
        .unwrap();
        assert!(!program.is_empty());
    }

    #[test]
    fn test_names_ignore_case() {
        let program = compile(
            "iniciar-programa
               define-nueva-instrucción Gira-Derecha(N) como
                 repetir sucede(n) veces gira-izquierda;
               inicia-ejecución
                 GIRA-DERECHA(2);
               termina-ejecución
             finalizar-programa",
            None,
        )
        .unwrap();
        assert!(program.contains(&Opcode::Param(0)));
        assert!(program.iter().any(|op| matches!(
            op,
            Opcode::Call { name, .. } if name == "gira-derecha"
        )));
    }

    #[test]
    fn test_empty_statements() {
        let program = compile(
            "iniciar-programa inicia-ejecución ; ; avanza; termina-ejecución finalizar-programa",
            None,
        )
        .unwrap();
        assert_eq!(program[0], Opcode::Line(0));
        assert_eq!(program.last(), Some(&Opcode::Halt));
        assert!(program.contains(&Opcode::Forward));
    }
}
