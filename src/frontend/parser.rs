use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::frontend::cst::{
    AndTerm, BoolFunClause, Clause, DefParam, Integer, IsZeroClause, NotTerm, Term,
};
use crate::frontend::lexer::Lexicon;
use crate::frontend::token::{Predicate, Token, TokenKind};

/// Marker returned when parsing cannot continue.
///
/// The reason is already recorded in the parser's error list by the time
/// this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abort;

pub type Parsed<T> = Result<T, Abort>;

/// Recursive-descent machinery shared by both dialect grammars.
///
/// Dialect grammars drive it with `expect`/`eat` and report unexpected input
/// through `no_viable_alt`. Diagnostics accumulate in `errors`; the first
/// non-recoverable one aborts the parse.
///
/// Recovery, when enabled, synthesizes a missing `;` if the token at hand
/// could legally follow it, drops a single stray token in front of an
/// expected one, and lets statement lists skip over garbage. Every recovered
/// problem is still recorded.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    lexicon: &'a Lexicon,
    errors: Vec<Diagnostic>,
    recovery: bool,
    predicate_parens: bool,
}

impl<'a> Parser<'a> {
    /// Creates a strict parser over lexer output.
    ///
    /// The token list is expected to end with `Eof`; one is appended if it
    /// does not.
    pub fn new(mut tokens: Vec<Token>, lexicon: &'a Lexicon) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column, offset) = tokens
                .last()
                .map(|t| (t.end_line, t.end_column(), t.end_offset + 1))
                .unwrap_or((1, 1, 0));
            tokens.push(Token {
                kind: TokenKind::Eof,
                image: String::new(),
                line,
                column,
                end_line: line,
                offset,
                end_offset: offset,
                inserted: false,
            });
        }
        Parser {
            tokens,
            pos: 0,
            lexicon,
            errors: Vec::new(),
            recovery: false,
            predicate_parens: false,
        }
    }

    /// Recover from missing terminators and stray tokens instead of aborting.
    pub fn with_recovery(mut self) -> Self {
        self.recovery = true;
        self
    }

    /// Accept `frontIsClear()` as well as `frontIsClear`.
    pub fn with_predicate_parens(mut self) -> Self {
        self.predicate_parens = true;
        self
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Diagnostic> {
        self.errors
    }

    // -------------------------------------------------------------------------
    // Token stream
    // -------------------------------------------------------------------------

    /// The token at the cursor. Never past `Eof`.
    pub fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub fn peek(&self) -> TokenKind {
        self.current().kind
    }

    /// Kind of the token `n` places past the cursor.
    pub fn peek_nth(&self, n: usize) -> TokenKind {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)].kind
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    pub fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.peek())
    }

    pub fn at_predicate(&self) -> Option<Predicate> {
        match self.peek() {
            TokenKind::Predicate(p) => Some(p),
            _ => None,
        }
    }

    /// Consumes the current token. `Eof` is never consumed.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        self.at(kind).then(|| self.advance())
    }

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------

    pub fn label(&self, kind: TokenKind) -> String {
        (self.lexicon.label)(kind).to_string()
    }

    fn mismatch(&mut self, expected: Vec<String>) {
        let diagnostic = Diagnostic::at_token(
            DiagnosticKind::MismatchedToken,
            self.current(),
            Some(expected),
        );
        self.errors.push(diagnostic);
    }

    /// Consumes a token of `kind` or aborts with a `mismatched-token`.
    ///
    /// With recovery on, a single stray token in front of `kind` is dropped
    /// after recording the mismatch.
    ///
    /// # Errors
    ///
    /// Returns `Abort` when the current token is of another kind.
    pub fn expect(&mut self, kind: TokenKind) -> Parsed<Token> {
        if let Some(token) = self.eat(kind) {
            return Ok(token);
        }
        let label = self.label(kind);
        self.mismatch(vec![label]);
        self.delete_before(kind).ok_or(Abort)
    }

    fn delete_before(&mut self, kind: TokenKind) -> Option<Token> {
        if !self.recovery || self.at(TokenKind::Eof) || self.peek_nth(1) != kind {
            return None;
        }
        self.advance();
        Some(self.advance())
    }

    /// Consumes a `;`, synthesizing one when recovery is on and the current
    /// token is in `follow`.
    ///
    /// A synthesized terminator still records a `mismatched-token` expecting
    /// `;` at the current token; parsing then carries on.
    ///
    /// # Errors
    ///
    /// Returns `Abort` when the `;` is missing and cannot be synthesized.
    pub fn expect_terminator(&mut self, follow: &[TokenKind]) -> Parsed<Token> {
        if let Some(token) = self.eat(TokenKind::Semicolon) {
            return Ok(token);
        }
        let label = self.label(TokenKind::Semicolon);
        self.mismatch(vec![label.clone()]);
        if self.recovery && self.at_any(follow) {
            return Ok(Token::synthesized(TokenKind::Semicolon, &label, self.current()));
        }
        self.delete_before(TokenKind::Semicolon).ok_or(Abort)
    }

    /// Resynchronizes a repetition that stopped short of its `closer`.
    ///
    /// Skips ahead to a token in `first` or to `closer` and records one
    /// `mismatched-token` at the first token skipped, expecting `closer`.
    /// Returns `true` when the caller should keep repeating. Rewinds and
    /// returns `false` when a token in `resync` (or `Eof`) comes first, or
    /// when `expect(closer)` can drop the stray token by itself.
    pub fn recover_repetition(
        &mut self,
        first: &[TokenKind],
        closer: TokenKind,
        resync: &[TokenKind],
    ) -> bool {
        if !self.recovery || self.at(closer) || self.peek_nth(1) == closer {
            return false;
        }
        let start = self.pos;
        let stray = self.current().clone();
        loop {
            let resumed = self.at_any(first);
            if resumed || self.at(closer) {
                let expected = vec![self.label(closer)];
                let diagnostic =
                    Diagnostic::at_token(DiagnosticKind::MismatchedToken, &stray, Some(expected));
                self.errors.push(diagnostic);
                return resumed;
            }
            if self.at(TokenKind::Eof) || self.at_any(resync) {
                self.pos = start;
                return false;
            }
            self.advance();
        }
    }

    /// Aborts because none of the alternatives of a choice can start here.
    ///
    /// `first` lists the first token of every alternative, in grammar order.
    pub fn no_viable_alt(&mut self, first: &[TokenKind]) -> Abort {
        let expected = first.iter().map(|k| self.label(*k)).collect();
        self.mismatch(expected);
        Abort
    }

    /// Reports leftover input after the root rule.
    ///
    /// # Errors
    ///
    /// Returns `Abort` unless the cursor is at `Eof`.
    pub fn finish(&mut self) -> Parsed<()> {
        if self.at(TokenKind::Eof) {
            return Ok(());
        }
        let diagnostic =
            Diagnostic::at_token(DiagnosticKind::ExpectedEof, self.current(), Some(vec![]));
        self.errors.push(diagnostic);
        Err(Abort)
    }

    // -------------------------------------------------------------------------
    // Shared rules
    // -------------------------------------------------------------------------

    /// `defParam := '(' <var>? ')'`
    pub fn def_param(&mut self) -> Parsed<DefParam> {
        let left = self.expect(TokenKind::LeftParen)?;
        let name = self.eat(TokenKind::Identifier);
        let right = self.expect(TokenKind::RightParen)?;
        Ok(DefParam { left, name, right })
    }

    /// Parses a boolean expression.
    ///
    /// ```text
    /// term    := andTerm (OR andTerm)*
    /// andTerm := notTerm (AND notTerm)*
    /// notTerm := NOT? clause
    /// ```
    pub fn term(&mut self) -> Parsed<Term> {
        let first = self.and_term()?;
        let mut rest = Vec::new();
        while let Some(or) = self.eat(TokenKind::Or) {
            rest.push((or, self.and_term()?));
        }
        Ok(Term { first, rest })
    }

    fn and_term(&mut self) -> Parsed<AndTerm> {
        let first = self.not_term()?;
        let mut rest = Vec::new();
        while let Some(and) = self.eat(TokenKind::And) {
            rest.push((and, self.not_term()?));
        }
        Ok(AndTerm { first, rest })
    }

    fn not_term(&mut self) -> Parsed<NotTerm> {
        let not = self.eat(TokenKind::Not);
        let clause = self.clause()?;
        Ok(NotTerm { not, clause })
    }

    /// `clause := iszero '(' integer ')' | predicate | '(' term ')'`
    fn clause(&mut self) -> Parsed<Clause> {
        if self.at(TokenKind::IsZero) {
            let keyword = self.advance();
            let left = self.expect(TokenKind::LeftParen)?;
            let integer = self.integer()?;
            let right = self.expect(TokenKind::RightParen)?;
            return Ok(Clause::IsZero(IsZeroClause {
                keyword,
                left,
                integer,
                right,
            }));
        }
        if let Some(predicate) = self.at_predicate() {
            let token = self.advance();
            let mut parens = None;
            if self.predicate_parens {
                if let Some(left) = self.eat(TokenKind::LeftParen) {
                    parens = Some((left, self.expect(TokenKind::RightParen)?));
                }
            }
            return Ok(Clause::BoolFun(BoolFunClause {
                predicate,
                token,
                parens,
            }));
        }
        if let Some(left) = self.eat(TokenKind::LeftParen) {
            let term = Box::new(self.term()?);
            let right = self.expect(TokenKind::RightParen)?;
            return Ok(Clause::Paren { left, term, right });
        }

        let mut first = vec![TokenKind::IsZero];
        first.extend(Predicate::ALL.iter().map(|p| TokenKind::Predicate(*p)));
        first.push(TokenKind::LeftParen);
        Err(self.no_viable_alt(&first))
    }

    /// `integer := <var> | <int> | (succ | pred) '(' integer ')'`
    pub fn integer(&mut self) -> Parsed<Integer> {
        match self.peek() {
            TokenKind::Identifier => Ok(Integer::Variable(self.advance())),
            TokenKind::IntegerLiteral => {
                let token = self.advance();
                match token.image.parse::<i64>() {
                    Ok(value) => Ok(Integer::Literal { token, value }),
                    Err(_) => {
                        let diagnostic =
                            Diagnostic::at_token(DiagnosticKind::ParseError, &token, None);
                        self.errors.push(diagnostic);
                        Err(Abort)
                    }
                }
            }
            TokenKind::Succ | TokenKind::Pred => {
                let op = self.advance();
                let left = self.expect(TokenKind::LeftParen)?;
                let inner = Box::new(self.integer()?);
                let right = self.expect(TokenKind::RightParen)?;
                Ok(Integer::Step {
                    increment: op.kind == TokenKind::Succ,
                    op,
                    left,
                    inner,
                    right,
                })
            }
            _ => Err(self.no_viable_alt(&[
                TokenKind::Identifier,
                TokenKind::IntegerLiteral,
                TokenKind::Succ,
                TokenKind::Pred,
            ])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::{LexRule, Lexer, Pattern};

    fn label(kind: TokenKind) -> &'static str {
        match kind {
            TokenKind::Semicolon => ";",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::IsZero => "iszero",
            TokenKind::Identifier => "<var>",
            TokenKind::IntegerLiteral => "<int>",
            TokenKind::Succ => "succ",
            TokenKind::Pred => "pred",
            TokenKind::Predicate(_) => "<pred>",
            TokenKind::End => "fin",
            _ => "?",
        }
    }

    static RULES: &[LexRule] = &[
        LexRule::skip(Pattern::Whitespace),
        LexRule::keyword(&["iszero"], TokenKind::IsZero),
        LexRule::keyword(&["succ"], TokenKind::Succ),
        LexRule::keyword(&["pred"], TokenKind::Pred),
        LexRule::keyword(&["clear"], TokenKind::Predicate(Predicate::FrontIsClear)),
        LexRule::keyword(&["fin"], TokenKind::End),
        LexRule::emit(Pattern::Digits, TokenKind::IntegerLiteral),
        LexRule::emit(Pattern::Identifier, TokenKind::Identifier),
        LexRule::symbol(&["!"], TokenKind::Not),
        LexRule::symbol(&["||"], TokenKind::Or),
        LexRule::symbol(&["&&"], TokenKind::And),
        LexRule::symbol(&["("], TokenKind::LeftParen),
        LexRule::symbol(&[")"], TokenKind::RightParen),
        LexRule::symbol(&[";"], TokenKind::Semicolon),
    ];

    static LEXICON: Lexicon = Lexicon {
        rules: RULES,
        ident_start: char::is_alphabetic,
        ident_continue: char::is_alphanumeric,
        label,
    };

    fn parser(src: &str) -> Parser<'static> {
        let lexed = Lexer::new(src, &LEXICON).tokenize();
        Parser::new(lexed.tokens, &LEXICON)
    }

    #[test]
    fn test_term_precedence() {
        let mut p = parser("clear || !clear && (clear)");
        let term = p.term().unwrap();
        assert_eq!(term.rest.len(), 1);
        assert!(term.first.rest.is_empty());
        let (_, right) = &term.rest[0];
        assert_eq!(right.rest.len(), 1);
        assert!(right.first.not.is_some());
        assert!(matches!(right.rest[0].1.clause, Clause::Paren { .. }));
        assert!(p.finish().is_ok());
    }

    #[test]
    fn test_predicate_parens_only_when_enabled() {
        let mut p = parser("clear()").with_predicate_parens();
        let term = p.term().unwrap();
        assert!(matches!(
            term.first.first.clause,
            Clause::BoolFun(BoolFunClause { parens: Some(_), .. })
        ));

        let mut p = parser("clear()");
        p.term().unwrap();
        assert!(p.finish().is_err());
        assert_eq!(p.errors()[0].kind, DiagnosticKind::ExpectedEof);
        assert_eq!(p.errors()[0].text(), Some("("));
    }

    #[test]
    fn test_clause_no_viable_alt() {
        let mut p = parser("5");
        assert_eq!(p.term(), Err(Abort));
        let expected = p.errors()[0].expected().unwrap();
        assert_eq!(expected.len(), 20);
        assert_eq!(expected[0], "iszero");
        assert_eq!(expected[19], "(");
    }

    #[test]
    fn test_nested_integer() {
        let mut p = parser("iszero(succ(pred(n)))");
        let term = p.term().unwrap();
        let Clause::IsZero(c) = &term.first.first.clause else {
            panic!("expected iszero");
        };
        let Integer::Step { increment, inner, .. } = &c.integer else {
            panic!("expected succ");
        };
        assert!(*increment);
        assert!(matches!(**inner, Integer::Step { increment: false, .. }));
    }

    #[test]
    fn test_integer_alternatives() {
        let mut p = parser(";");
        assert!(p.integer().is_err());
        assert_eq!(
            p.errors()[0].expected().unwrap(),
            &["<var>", "<int>", "succ", "pred"]
        );
    }

    #[test]
    fn test_integer_overflow_is_a_parse_error() {
        let mut p = parser("99999999999999999999");
        assert!(p.integer().is_err());
        assert_eq!(p.errors()[0].kind, DiagnosticKind::ParseError);
        assert_eq!(p.errors()[0].expected(), None);
    }

    #[test]
    fn test_expect_reports_label() {
        let mut p = parser("foo");
        assert!(p.expect(TokenKind::LeftParen).is_err());
        let d = &p.errors()[0];
        assert_eq!(d.kind, DiagnosticKind::MismatchedToken);
        assert_eq!((d.text(), d.line(), d.column()), (Some("foo"), Some(1), Some(1)));
        assert_eq!(d.expected().unwrap(), &["("]);
    }

    #[test]
    fn test_terminator_strict() {
        let mut p = parser("foo fin");
        p.advance();
        assert!(p.expect_terminator(&[TokenKind::End]).is_err());
    }

    #[test]
    fn test_terminator_recovery() {
        let mut p = parser("foo fin").with_recovery();
        p.advance();
        let semi = p.expect_terminator(&[TokenKind::End]).unwrap();
        assert!(semi.inserted);
        assert!(p.at(TokenKind::End));
        assert_eq!(p.errors().len(), 1);
        assert_eq!(p.errors()[0].text(), Some("fin"));
        assert_eq!(p.errors()[0].expected().unwrap(), &[";"]);

        // a token outside the follow set still aborts
        let mut p = parser("foo bar").with_recovery();
        p.advance();
        assert!(p.expect_terminator(&[TokenKind::End]).is_err());
    }

    #[test]
    fn test_single_token_deletion() {
        let mut p = parser("foo 5 (").with_recovery();
        p.advance();
        let left = p.expect(TokenKind::LeftParen).unwrap();
        assert_eq!(left.image, "(");
        assert_eq!(p.errors().len(), 1);
        assert_eq!(p.errors()[0].text(), Some("5"));
        assert_eq!(p.errors()[0].expected().unwrap(), &["("]);

        let mut p = parser("foo 5 ;").with_recovery();
        p.advance();
        let semi = p.expect_terminator(&[TokenKind::End]).unwrap();
        assert!(!semi.inserted);
        assert!(p.at(TokenKind::Eof));

        // two stray tokens are too many
        let mut p = parser("5 6 (").with_recovery();
        assert!(p.expect(TokenKind::LeftParen).is_err());

        let mut p = parser("5 (");
        assert!(p.expect(TokenKind::LeftParen).is_err());
    }

    #[test]
    fn test_repetition_recovery() {
        let first = [TokenKind::Identifier];

        let mut p = parser("5 6 foo fin").with_recovery();
        assert!(p.recover_repetition(&first, TokenKind::End, &[]));
        assert!(p.at(TokenKind::Identifier));
        assert_eq!(p.errors().len(), 1);
        assert_eq!(p.errors()[0].text(), Some("5"));
        assert_eq!(p.errors()[0].expected().unwrap(), &["fin"]);

        let mut p = parser("5 6 fin").with_recovery();
        assert!(!p.recover_repetition(&first, TokenKind::End, &[]));
        assert!(p.at(TokenKind::End));
        assert_eq!(p.errors().len(), 1);

        // left to `expect`, which drops the single stray token
        let mut p = parser("5 fin").with_recovery();
        assert!(!p.recover_repetition(&first, TokenKind::End, &[]));
        assert!(p.errors().is_empty());
        assert_eq!(p.current().image, "5");

        let mut p = parser("5 6 ; foo").with_recovery();
        assert!(!p.recover_repetition(&first, TokenKind::End, &[TokenKind::Semicolon]));
        assert!(p.errors().is_empty());
        assert_eq!(p.current().image, "5");

        let mut p = parser("5 6 foo");
        assert!(!p.recover_repetition(&first, TokenKind::End, &[]));
        assert!(p.errors().is_empty());
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut p = parser("");
        assert_eq!(p.advance().kind, TokenKind::Eof);
        assert_eq!(p.advance().kind, TokenKind::Eof);
        assert!(p.finish().is_ok());
    }
}
