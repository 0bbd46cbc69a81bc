use crate::frontend::lexer::{LexRule, Lexicon, Pattern};
use crate::frontend::token::{Predicate, TokenKind};

use TokenKind::*;

const fn predicate(word: &'static [&'static str], p: Predicate) -> LexRule {
    LexRule::keyword(word, TokenKind::Predicate(p))
}

static RULES: &[LexRule] = &[
    LexRule::skip(Pattern::Whitespace),
    // keywords
    LexRule::keyword(&["class"], Class),
    LexRule::keyword(&["program"], Program),
    LexRule::keyword(&["define", "void"], Define),
    LexRule::keyword(&["return"], Return),
    LexRule::keyword(&["turnoff"], TurnOff),
    LexRule::keyword(&["turnleft"], TurnLeft),
    LexRule::keyword(&["move"], Move),
    LexRule::keyword(&["pickbeeper"], PickBeeper),
    LexRule::keyword(&["putbeeper"], PutBeeper),
    LexRule::keyword(&["while"], While),
    LexRule::keyword(&["iterate"], Repeat),
    LexRule::keyword(&["pred"], Pred),
    LexRule::keyword(&["succ"], Succ),
    LexRule::keyword(&["iszero"], IsZero),
    predicate(&["frontIsClear"], Predicate::FrontIsClear),
    predicate(&["frontIsBlocked"], Predicate::FrontIsBlocked),
    predicate(&["leftIsClear"], Predicate::LeftIsClear),
    predicate(&["leftIsBlocked"], Predicate::LeftIsBlocked),
    predicate(&["rightIsClear"], Predicate::RightIsClear),
    predicate(&["rightIsBlocked"], Predicate::RightIsBlocked),
    predicate(&["nextToABeeper"], Predicate::NextToABeeper),
    predicate(&["notNextToABeeper"], Predicate::NotNextToABeeper),
    predicate(&["anyBeepersInBeeperBag"], Predicate::AnyBeepersInBeeperBag),
    predicate(&["noBeepersInBeeperBag"], Predicate::NoBeepersInBeeperBag),
    predicate(&["facingNorth"], Predicate::FacingNorth),
    predicate(&["facingSouth"], Predicate::FacingSouth),
    predicate(&["facingEast"], Predicate::FacingEast),
    predicate(&["facingWest"], Predicate::FacingWest),
    predicate(&["notFacingNorth"], Predicate::NotFacingNorth),
    predicate(&["notFacingSouth"], Predicate::NotFacingSouth),
    predicate(&["notFacingEast"], Predicate::NotFacingEast),
    predicate(&["notFacingWest"], Predicate::NotFacingWest),
    LexRule::keyword(&["else"], Else),
    LexRule::keyword(&["if"], If),
    // literals and names
    LexRule::emit(Pattern::Digits, IntegerLiteral),
    LexRule::emit(Pattern::Identifier, Identifier),
    // operators and punctuation
    LexRule::symbol(&["!"], Not),
    LexRule::symbol(&["||"], Or),
    LexRule::symbol(&["&&", "&"], And),
    LexRule::symbol(&["("], LeftParen),
    LexRule::symbol(&[")"], RightParen),
    LexRule::symbol(&["{"], LeftBrace),
    LexRule::symbol(&["}"], RightBrace),
    LexRule::symbol(&[";"], Semicolon),
    // comments
    LexRule::comment(Pattern::LineComment("//"), LineComment),
    LexRule::comment(Pattern::Enclosed("/*", "*/"), BlockComment),
];

fn ident_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn predicate_label(p: Predicate) -> &'static str {
    match p {
        Predicate::FrontIsClear => "frontIsClear",
        Predicate::FrontIsBlocked => "frontIsBlocked",
        Predicate::LeftIsClear => "leftIsClear",
        Predicate::LeftIsBlocked => "leftIsBlocked",
        Predicate::RightIsClear => "rightIsClear",
        Predicate::RightIsBlocked => "rightIsBlocked",
        Predicate::NextToABeeper => "nextToABeeper",
        Predicate::NotNextToABeeper => "notNextToABeeper",
        Predicate::AnyBeepersInBeeperBag => "anyBeepersInBeeperBag",
        Predicate::NoBeepersInBeeperBag => "noBeepersInBeeperBag",
        Predicate::FacingNorth => "facingNorth",
        Predicate::FacingSouth => "facingSouth",
        Predicate::FacingEast => "facingEast",
        Predicate::FacingWest => "facingWest",
        Predicate::NotFacingNorth => "notFacingNorth",
        Predicate::NotFacingSouth => "notFacingSouth",
        Predicate::NotFacingEast => "notFacingEast",
        Predicate::NotFacingWest => "notFacingWest",
    }
}

/// Spelling of a token kind in expected-token lists.
pub fn label(kind: TokenKind) -> &'static str {
    match kind {
        Class => "class",
        Program => "program",
        Define => "void",
        Return => "return",
        TurnOff => "turnoff",
        TurnLeft => "turnleft",
        Move => "move",
        PickBeeper => "pickbeeper",
        PutBeeper => "putbeeper",
        While => "while",
        Repeat => "iterate",
        Pred => "pred",
        Succ => "succ",
        IsZero => "iszero",
        TokenKind::Predicate(p) => predicate_label(p),
        Else => "else",
        If => "if",
        IntegerLiteral => "<int>",
        Identifier => "<var>",
        Not => "!",
        Or => "||",
        And => "&&",
        LeftParen => "(",
        RightParen => ")",
        LeftBrace => "{",
        RightBrace => "}",
        Semicolon => ";",
        LineComment => "LineComment",
        BlockComment => "BlockComment",
        Eof => "EOF",
        BeginProgram | EndProgram | BeginExecution | EndExecution | Prototype | As | Begin
        | End | Then | Do | Times => "<unused>",
    }
}

/// Lexical table of the Java dialect.
pub static LEXICON: Lexicon = Lexicon {
    rules: RULES,
    ident_start,
    ident_continue,
    label,
};
