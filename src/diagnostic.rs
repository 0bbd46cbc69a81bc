use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frontend::token::Token;

/// What went wrong. Serialized as the kebab-case wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    LexingError,
    MismatchedToken,
    ExpectedEof,
    ParseError,
    FunctionRedefinition,
    PrototypeRedefinition,
    PrototypeParameterMismatch,
    FunctionParameterMismatch,
    UndefinedFunction,
    UndefinedVariable,
}

impl DiagnosticKind {
    pub const ALL: [DiagnosticKind; 10] = [
        DiagnosticKind::LexingError,
        DiagnosticKind::MismatchedToken,
        DiagnosticKind::ExpectedEof,
        DiagnosticKind::ParseError,
        DiagnosticKind::FunctionRedefinition,
        DiagnosticKind::PrototypeRedefinition,
        DiagnosticKind::PrototypeParameterMismatch,
        DiagnosticKind::FunctionParameterMismatch,
        DiagnosticKind::UndefinedFunction,
        DiagnosticKind::UndefinedVariable,
    ];

    /// Same spelling as the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::LexingError => "lexing-error",
            DiagnosticKind::MismatchedToken => "mismatched-token",
            DiagnosticKind::ExpectedEof => "expected-eof",
            DiagnosticKind::ParseError => "parse-error",
            DiagnosticKind::FunctionRedefinition => "function-redefinition",
            DiagnosticKind::PrototypeRedefinition => "prototype-redefinition",
            DiagnosticKind::PrototypeParameterMismatch => "prototype-parameter-mismatch",
            DiagnosticKind::FunctionParameterMismatch => "function-parameter-mismatch",
            DiagnosticKind::UndefinedFunction => "undefined-function",
            DiagnosticKind::UndefinedVariable => "undefined-variable",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a diagnostic points: the offending text plus whatever position
/// information the reporting phase had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(rename = "message")]
    pub kind: DiagnosticKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    /// A syntax diagnostic at `token`, with the labels the parser would have accepted.
    pub fn at_token(kind: DiagnosticKind, token: &Token, expected: Option<Vec<String>>) -> Self {
        Diagnostic {
            kind,
            location: Some(Location {
                text: token.image.clone(),
                line: Some(token.line),
                column: Some(token.column),
                expected,
            }),
        }
    }

    /// A semantic diagnostic; the linker only knows names and lines.
    pub fn at_line(kind: DiagnosticKind, text: impl Into<String>, line: usize) -> Self {
        Diagnostic {
            kind,
            location: Some(Location {
                text: text.into(),
                line: Some(line),
                column: None,
                expected: None,
            }),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.text.as_str())
    }

    pub fn line(&self) -> Option<usize> {
        self.location.as_ref().and_then(|l| l.line)
    }

    pub fn column(&self) -> Option<usize> {
        self.location.as_ref().and_then(|l| l.column)
    }

    pub fn expected(&self) -> Option<&[String]> {
        self.location.as_ref().and_then(|l| l.expected.as_deref())
    }
}

/// The one failure type of the compiler: a phase message plus every
/// diagnostic collected in that phase, in detection order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    pub diagnostics: Vec<Diagnostic>,
    /// The output of `format`, once the failing source is known.
    pub report: Option<String>,
}

impl CompileError {
    pub fn lexing(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new("lexing errors detected", diagnostics)
    }

    pub fn parsing(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new("parse errors detected", diagnostics)
    }

    pub fn linking(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new("failed to parse", diagnostics)
    }

    fn new(message: &str, diagnostics: Vec<Diagnostic>) -> Self {
        CompileError {
            message: message.to_string(),
            diagnostics,
            report: None,
        }
    }

    /// Attaches the rendered report for `source`.
    pub fn with_source(mut self, source: &str, filename: Option<&str>) -> Self {
        self.report = Some(self.format(source, filename));
        self
    }

    /// The rendered report if one was attached, the bare message otherwise.
    pub fn report(&self) -> &str {
        self.report.as_deref().unwrap_or(&self.message)
    }

    /// Renders a multi-line report with source context.
    ///
    /// ```text
    /// parse errors detected
    /// hello.kj:2:17: mismatched-token
    ///   2: class program { foo() {} }
    ///                      ^^^
    /// Expected one of "program"
    ///
    /// ```
    ///
    /// Diagnostics without a line, or whose line is past the end of `source`,
    /// render as the header alone.
    pub fn format(&self, source: &str, filename: Option<&str>) -> String {
        let lines: Vec<&str> = source.split('\n').collect();
        let mut chunks = vec![self.message.clone()];

        for diagnostic in &self.diagnostics {
            let mut header = filename.unwrap_or("<source>").to_string();
            if let Some(line) = diagnostic.line() {
                header.push_str(&format!(":{}", line));
                if let Some(column) = diagnostic.column() {
                    header.push_str(&format!(":{}", column));
                }
            }
            chunks.push(format!("{}: {}", header, diagnostic.kind));

            let Some(line) = diagnostic.line().filter(|l| *l >= 1 && *l <= lines.len()) else {
                chunks.push(String::new());
                continue;
            };

            let prefix = format!("{:>3}: ", line);
            chunks.push(format!("{}{}", prefix, lines[line - 1]));

            if let (Some(column), Some(text)) = (diagnostic.column(), diagnostic.text()) {
                let pad = prefix.chars().count() + column.saturating_sub(1);
                chunks.push(format!(
                    "{}{}",
                    " ".repeat(pad),
                    "^".repeat(text.chars().count())
                ));
            }

            if let Some(expected) = diagnostic.expected() {
                let quoted: Vec<String> = expected.iter().map(|e| format!("\"{}\"", e)).collect();
                chunks.push(format!("Expected one of {}", quoted.join(", ")));
            }

            chunks.push(String::new());
        }

        chunks.join("\n")
    }
}
