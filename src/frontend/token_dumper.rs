use crate::frontend::token::{Token, TokenKind};

/// Renders a token stream one token per line, for `karelc --tokens`.
pub struct TokenDumper {
    pub color: bool,
    pub show_debug_repr: bool, // if false, prints the image instead of the Debug kind
}

impl Default for TokenDumper {
    fn default() -> Self {
        Self {
            color: true,
            show_debug_repr: true,
        }
    }
}

impl TokenDumper {
    // ANSI colors
    const RESET: &'static str = "\x1b[0m";
    const DIM: &'static str = "\x1b[2m";
    const YEL: &'static str = "\x1b[33m";
    const CYN: &'static str = "\x1b[36m";
    const MAG: &'static str = "\x1b[35m";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn pretty(mut self) -> Self {
        self.show_debug_repr = false;
        self
    }

    /// Tokens and comments are merged back into source order.
    pub fn dump(&self, tokens: &[Token], comments: &[Token]) -> String {
        let mut all: Vec<&Token> = tokens.iter().chain(comments).collect();
        all.sort_by_key(|t| (t.offset, t.kind == TokenKind::Eof));
        all.into_iter().map(|t| self.format_one(t)).collect()
    }

    fn format_one(&self, t: &Token) -> String {
        let kind = Self::kind(t.kind);
        let colr = if self.color { Self::color(t.kind) } else { "" };
        let reset = if self.color { Self::RESET } else { "" };

        if self.show_debug_repr {
            format!(
                "[{:02}:{:02}] {}{:<8} {:?} {:?}{}\n",
                t.line, t.column, colr, kind, t.kind, t.image, reset
            )
        } else {
            let image = match t.kind {
                TokenKind::Eof => "<eof>",
                _ => t.image.as_str(),
            };
            format!(
                "[{:02}:{:02}] {}{:<8} {}{}\n",
                t.line, t.column, colr, kind, image, reset
            )
        }
    }

    fn kind(kind: TokenKind) -> &'static str {
        use TokenKind::*;
        match kind {
            LineComment | BlockComment => "COMMENT",
            Eof => "EOF",
            IntegerLiteral => "INT",
            Identifier => "IDENT",
            Predicate(_) => "SENSOR",
            Not | And | Or => "OP",
            LeftParen | RightParen | LeftBrace | RightBrace | Semicolon => "PUNCT",
            _ => "KEYWORD",
        }
    }

    fn color(kind: TokenKind) -> &'static str {
        use TokenKind::*;
        match kind {
            LineComment | BlockComment | Eof => Self::DIM,
            IntegerLiteral => Self::CYN,
            Identifier => Self::YEL,
            Predicate(_) | Not | And | Or => Self::MAG,
            _ => Self::RESET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::java::LEXICON;
    use crate::frontend::lexer::Lexer;

    #[test]
    fn test_pretty_listing() {
        let lexed = Lexer::new("move(); // go\nx", &LEXICON).tokenize();
        let text = TokenDumper::new()
            .no_color()
            .pretty()
            .dump(&lexed.tokens, &lexed.comments);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "[01:01] KEYWORD  move",
                "[01:05] PUNCT    (",
                "[01:06] PUNCT    )",
                "[01:07] PUNCT    ;",
                "[01:09] COMMENT  // go",
                "[02:01] IDENT    x",
                "[02:02] EOF      <eof>",
            ]
        );
    }

    #[test]
    fn test_debug_listing_is_colored() {
        let lexed = Lexer::new("7", &LEXICON).tokenize();
        let text = TokenDumper::new().dump(&lexed.tokens, &lexed.comments);
        assert!(text.starts_with("[01:01] \x1b[36mINT      IntegerLiteral \"7\"\x1b[0m\n"));
    }
}
