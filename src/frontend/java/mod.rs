//! The Java-flavoured Karel dialect (`.kj`).
//!
//! Strict: the first lexing or syntax problem ends the parse.

pub mod cst;
pub mod grammar;
pub mod lexicon;

use crate::bytecode::{Program, link, lower};
use crate::diagnostic::CompileError;
use crate::frontend::cst::{Syntax, SyntaxNode};
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::frontend::token::Token;

pub use lexicon::LEXICON;

/// A parsed program plus its comments, which the grammar never sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cst {
    pub root: cst::ProgramClass,
    pub comments: Vec<Token>,
}

impl Syntax for Cst {
    fn syntax(&self) -> SyntaxNode {
        self.root.syntax()
    }
}

/// Parses Java-dialect source into a concrete syntax tree.
///
/// `filename` is only used to render the error report.
///
/// # Errors
///
/// `lexing errors detected` with one diagnostic per unrecognized run of
/// characters, or `parse errors detected` with the first syntax error.
pub fn parse(source: &str, filename: Option<&str>) -> Result<Cst, CompileError> {
    let lexed = Lexer::new(source, &LEXICON).tokenize();
    if !lexed.errors.is_empty() {
        return Err(CompileError::lexing(lexed.errors).with_source(source, filename));
    }

    let mut parser = Parser::new(lexed.tokens, &LEXICON).with_predicate_parens();
    let result = grammar::program_class(&mut parser);
    match result {
        Ok(root) if parser.errors().is_empty() => Ok(Cst {
            root,
            comments: lexed.comments,
        }),
        _ => Err(CompileError::parsing(parser.into_errors()).with_source(source, filename)),
    }
}

/// Compiles Java-dialect source into a linked program.
///
/// Functions may be called before they are defined.
///
/// # Errors
///
/// Anything `parse` reports, or `failed to parse` with every semantic
/// problem the linker found.
pub fn compile(source: &str, filename: Option<&str>) -> Result<Program, CompileError> {
    let cst = parse(source, filename)?;
    let (functions, entry) = lower::java::program(&cst.root);
    link(functions, entry, false).map_err(|e| e.with_source(source, filename))
}
