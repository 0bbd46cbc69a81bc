use crate::diagnostic::{Diagnostic, DiagnosticKind, Location};
use crate::frontend::token::{Token, TokenKind};

/// The shape of text a lexical rule recognizes.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// A run of one or more whitespace characters.
    Whitespace,
    /// One of the listed spellings, tried in order.
    Words(&'static [&'static str]),
    /// The dialect's identifier shape (see `Lexicon::ident_start`).
    Identifier,
    /// A run of ASCII digits.
    Digits,
    /// The prefix followed by everything up to (not including) the next newline.
    LineComment(&'static str),
    /// `open`, then everything up to and including the first `close`.
    /// Does not match when `close` never appears.
    Enclosed(&'static str, &'static str),
    /// Any single character.
    AnyChar,
}

#[derive(Debug, Clone, Copy)]
pub enum Action {
    Skip,
    Emit(TokenKind),
    Comment(TokenKind),
}

/// One entry of a lexical priority table.
#[derive(Debug, Clone, Copy)]
pub struct LexRule {
    pub pattern: Pattern,
    pub action: Action,
    /// When the identifier shape matches strictly more text at the same
    /// position, an identifier is emitted instead. This is what makes
    /// `moveAhead` an identifier rather than `move` + `Ahead`.
    pub longer_alt: bool,
}

impl LexRule {
    pub const fn keyword(words: &'static [&'static str], kind: TokenKind) -> Self {
        LexRule {
            pattern: Pattern::Words(words),
            action: Action::Emit(kind),
            longer_alt: true,
        }
    }

    pub const fn symbol(words: &'static [&'static str], kind: TokenKind) -> Self {
        LexRule {
            pattern: Pattern::Words(words),
            action: Action::Emit(kind),
            longer_alt: false,
        }
    }

    pub const fn emit(pattern: Pattern, kind: TokenKind) -> Self {
        LexRule {
            pattern,
            action: Action::Emit(kind),
            longer_alt: false,
        }
    }

    pub const fn comment(pattern: Pattern, kind: TokenKind) -> Self {
        LexRule {
            pattern,
            action: Action::Comment(kind),
            longer_alt: false,
        }
    }

    pub const fn skip(pattern: Pattern) -> Self {
        LexRule {
            pattern,
            action: Action::Skip,
            longer_alt: false,
        }
    }
}

/// A dialect's complete lexical definition.
///
/// Rules are tried in order and the first one that matches wins; the only
/// exception is the `longer_alt` tie-break against identifiers.
pub struct Lexicon {
    pub rules: &'static [LexRule],
    pub ident_start: fn(char) -> bool,
    pub ident_continue: fn(char) -> bool,
    /// Human-facing name of a token kind, used in expected-token lists.
    pub label: fn(TokenKind) -> &'static str,
}

/// Output of a lexing pass.
#[derive(Debug, Clone)]
pub struct Lexed {
    /// Significant tokens, always terminated by an `Eof` token.
    pub tokens: Vec<Token>,
    pub comments: Vec<Token>,
    /// One `lexing-error` per run of characters no rule matched.
    pub errors: Vec<Diagnostic>,
}

pub struct Lexer<'a> {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    lexicon: &'a Lexicon,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &str, lexicon: &'a Lexicon) -> Self {
        Lexer {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            lexicon,
        }
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current();
        if ch == Some('\n') {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += 1;
        ch
    }

    fn starts_with(&self, offset: usize, word: &str) -> bool {
        word.chars()
            .enumerate()
            .all(|(i, c)| self.char_at(offset + i) == Some(c))
    }

    fn count_while(&self, from: usize, pred: impl Fn(char) -> bool) -> usize {
        let mut n = 0;
        while self.char_at(from + n).is_some_and(&pred) {
            n += 1;
        }
        n
    }

    /// Length in characters of the text `pattern` matches at the current position.
    fn match_len(&self, pattern: Pattern) -> Option<usize> {
        let len = match pattern {
            Pattern::Whitespace => self.count_while(0, char::is_whitespace),
            Pattern::Words(words) => words
                .iter()
                .find(|w| self.starts_with(0, w))
                .map(|w| w.chars().count())?,
            Pattern::Identifier => {
                if !self.current().is_some_and(self.lexicon.ident_start) {
                    return None;
                }
                1 + self.count_while(1, self.lexicon.ident_continue)
            }
            Pattern::Digits => self.count_while(0, |c| c.is_ascii_digit()),
            Pattern::LineComment(prefix) => {
                if !self.starts_with(0, prefix) {
                    return None;
                }
                let start = prefix.chars().count();
                start + self.count_while(start, |c| c != '\n')
            }
            Pattern::Enclosed(open, close) => {
                if !self.starts_with(0, open) {
                    return None;
                }
                let mut n = open.chars().count();
                loop {
                    self.char_at(n)?;
                    if self.starts_with(n, close) {
                        break n + close.chars().count();
                    }
                    n += 1;
                }
            }
            Pattern::AnyChar => usize::from(self.current().is_some()),
        };
        (len > 0).then_some(len)
    }

    /// Finds the rule that applies at the current position.
    fn next_rule(&self) -> Option<(Action, usize)> {
        for rule in self.lexicon.rules {
            let Some(len) = self.match_len(rule.pattern) else {
                continue;
            };
            if rule.longer_alt {
                let longer = self.match_len(Pattern::Identifier).filter(|&n| n > len);
                if let Some(ident) = longer {
                    return Some((Action::Emit(TokenKind::Identifier), ident));
                }
            }
            return Some((rule.action, len));
        }
        None
    }

    fn take(&mut self, kind: TokenKind, len: usize) -> Token {
        let (line, column, offset) = (self.line, self.col, self.pos);
        let mut image = String::new();
        for _ in 0..len {
            if let Some(ch) = self.advance() {
                image.push(ch);
            }
        }
        // A trailing newline belongs to the line it ends.
        let end_line = if image.ends_with('\n') {
            self.line - 1
        } else {
            self.line
        };
        Token {
            kind,
            image,
            line,
            column,
            end_line,
            offset,
            end_offset: offset + len - 1,
            inserted: false,
        }
    }

    /// Lexes the whole input.
    ///
    /// Never fails: characters no rule recognizes are grouped into maximal
    /// runs and reported in `Lexed::errors`, and lexing resumes after each run.
    pub fn tokenize(mut self) -> Lexed {
        let mut tokens = Vec::new();
        let mut comments = Vec::new();
        let mut errors = Vec::new();
        let mut garbage: Option<(String, usize, usize)> = None;

        while self.current().is_some() {
            match self.next_rule() {
                Some((action, len)) => {
                    if let Some((text, line, column)) = garbage.take() {
                        errors.push(lexing_error(text, line, column));
                    }
                    match action {
                        Action::Skip => {
                            for _ in 0..len {
                                self.advance();
                            }
                        }
                        Action::Emit(kind) => tokens.push(self.take(kind, len)),
                        Action::Comment(kind) => comments.push(self.take(kind, len)),
                    }
                }
                None => {
                    let (line, col) = (self.line, self.col);
                    let run = garbage.get_or_insert_with(|| (String::new(), line, col));
                    if let Some(ch) = self.advance() {
                        run.0.push(ch);
                    }
                }
            }
        }
        if let Some((text, line, column)) = garbage.take() {
            errors.push(lexing_error(text, line, column));
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            image: String::new(),
            line: self.line,
            column: self.col,
            end_line: self.line,
            offset: self.pos,
            end_offset: self.pos,
            inserted: false,
        });

        Lexed {
            tokens,
            comments,
            errors,
        }
    }
}

fn lexing_error(text: String, line: usize, column: usize) -> Diagnostic {
    Diagnostic {
        kind: DiagnosticKind::LexingError,
        location: Some(Location {
            text,
            line: Some(line),
            column: Some(column),
            expected: None,
        }),
    }
}
