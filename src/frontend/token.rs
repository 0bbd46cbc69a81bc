/// One of the eighteen built-in boolean sensors.
///
/// Both dialects spell these differently but lower them identically, so the
/// lexer tags every predicate keyword with the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    FrontIsClear,
    FrontIsBlocked,
    LeftIsClear,
    LeftIsBlocked,
    RightIsClear,
    RightIsBlocked,
    NextToABeeper,
    NotNextToABeeper,
    AnyBeepersInBeeperBag,
    NoBeepersInBeeperBag,
    FacingNorth,
    FacingSouth,
    FacingEast,
    FacingWest,
    NotFacingNorth,
    NotFacingSouth,
    NotFacingEast,
    NotFacingWest,
}

impl Predicate {
    /// Grammar order; expected-token lists enumerate predicates in this order.
    pub const ALL: [Predicate; 18] = [
        Predicate::FrontIsClear,
        Predicate::FrontIsBlocked,
        Predicate::LeftIsClear,
        Predicate::LeftIsBlocked,
        Predicate::RightIsClear,
        Predicate::RightIsBlocked,
        Predicate::NextToABeeper,
        Predicate::NotNextToABeeper,
        Predicate::AnyBeepersInBeeperBag,
        Predicate::NoBeepersInBeeperBag,
        Predicate::FacingNorth,
        Predicate::FacingSouth,
        Predicate::FacingEast,
        Predicate::FacingWest,
        Predicate::NotFacingNorth,
        Predicate::NotFacingSouth,
        Predicate::NotFacingEast,
        Predicate::NotFacingWest,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // program structure
    Class,
    Program,
    BeginProgram,
    EndProgram,
    BeginExecution,
    EndExecution,
    Define,
    Prototype,
    As,
    Begin,
    End,

    // actions
    Move,
    TurnLeft,
    PickBeeper,
    PutBeeper,
    TurnOff,
    Return,

    // control flow
    If,
    Then,
    Else,
    While,
    Do,
    Repeat,
    Times,

    // integer expressions
    Pred,
    Succ,
    IsZero,
    IntegerLiteral,
    Identifier,

    // boolean expressions
    Predicate(Predicate),
    Not,
    And,
    Or,

    // punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Semicolon,

    // side channel
    LineComment,
    BlockComment,

    Eof,
}

impl TokenKind {
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// A lexed token with its source span.
///
/// Lines and columns are 1-based; offsets are 0-based character indices and
/// `end_offset` is inclusive. All positions count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub image: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub offset: usize,
    pub end_offset: usize,
    /// Set on terminators synthesized during recovery. Their image is the
    /// terminator's spelling even though it never appeared in the source.
    pub inserted: bool,
}

impl Token {
    /// Column just past the last character of this token.
    ///
    /// Only meaningful for single-line tokens, which is every token the parser
    /// sees (multi-line comments go to the side channel).
    pub fn end_column(&self) -> usize {
        self.column + self.image.chars().count()
    }

    /// Synthesizes a token of `kind` in front of `at`.
    pub fn synthesized(kind: TokenKind, image: &str, at: &Token) -> Self {
        Token {
            kind,
            image: image.to_string(),
            line: at.line,
            column: at.column,
            end_line: at.line,
            offset: at.offset,
            end_offset: at.offset,
            inserted: true,
        }
    }
}
