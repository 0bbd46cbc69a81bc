//! A compiler for the Karel robot language.
//!
//! Two source dialects are supported: the Java-like `.kj` and the
//! Spanish, Pascal-like `.kp`. Both compile to the same flat [`Program`] of
//! stack-machine [`Opcode`]s.
//!
//! ```no_run
//! use karel::Dialect;
//!
//! let program = Dialect::Java.compile("class program { program() { move(); } }", None)?;
//! println!("{}", serde_json::to_string(&program)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bytecode;
pub mod diagnostic;
pub mod frontend;

use std::path::Path;

pub use bytecode::{Fault, Opcode, Program};
pub use diagnostic::{CompileError, Diagnostic, DiagnosticKind, Location};

use frontend::cst::{Syntax, SyntaxNode};
use frontend::lexer::{Lexed, Lexer, Lexicon};
use frontend::token::Token;
use frontend::{java, pascal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Java,
    Pascal,
}

impl Dialect {
    /// `kj` is Java, `kp` is Pascal.
    pub fn from_extension(extension: &str) -> Option<Dialect> {
        match extension {
            "kj" => Some(Dialect::Java),
            "kp" => Some(Dialect::Pascal),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Dialect> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Dialect::from_extension)
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Java => "java",
            Dialect::Pascal => "pascal",
        }
    }

    pub fn lexicon(self) -> &'static Lexicon {
        match self {
            Dialect::Java => &java::LEXICON,
            Dialect::Pascal => &pascal::LEXICON,
        }
    }

    /// Raw lexer output, errors included.
    pub fn tokenize(self, source: &str) -> Lexed {
        Lexer::new(source, self.lexicon()).tokenize()
    }

    /// Parses `source` into the dialect-neutral syntax view plus comments.
    ///
    /// # Errors
    ///
    /// Whatever the dialect's `parse` reports.
    pub fn parse(
        self,
        source: &str,
        filename: Option<&str>,
    ) -> Result<(SyntaxNode, Vec<Token>), CompileError> {
        match self {
            Dialect::Java => java::parse(source, filename).map(|cst| (cst.syntax(), cst.comments)),
            Dialect::Pascal => {
                pascal::parse(source, filename).map(|cst| (cst.syntax(), cst.comments))
            }
        }
    }

    /// Compiles `source` in this dialect.
    ///
    /// # Errors
    ///
    /// The first failing phase's `CompileError`, with its report rendered
    /// against `source` and `filename`.
    pub fn compile(self, source: &str, filename: Option<&str>) -> Result<Program, CompileError> {
        match self {
            Dialect::Java => java::compile(source, filename),
            Dialect::Pascal => pascal::compile(source, filename),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
