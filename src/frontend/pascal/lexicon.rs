use crate::frontend::lexer::{LexRule, Lexicon, Pattern};
use crate::frontend::token::{Predicate, TokenKind};

use TokenKind::*;

const fn predicate(words: &'static [&'static str], p: Predicate) -> LexRule {
    LexRule::keyword(words, TokenKind::Predicate(p))
}

// Accented spellings come first; both are accepted everywhere.
static RULES: &[LexRule] = &[
    LexRule::skip(Pattern::Whitespace),
    // keywords
    LexRule::keyword(&["iniciar-programa"], BeginProgram),
    LexRule::keyword(&["inicia-ejecución", "inicia-ejecucion"], BeginExecution),
    LexRule::keyword(&["termina-ejecución", "termina-ejecucion"], EndExecution),
    LexRule::keyword(&["finalizar-programa"], EndProgram),
    LexRule::keyword(
        &["define-nueva-instrucción", "define-nueva-instruccion"],
        Define,
    ),
    LexRule::keyword(
        &["define-prototipo-instrucción", "define-prototipo-instruccion"],
        Prototype,
    ),
    LexRule::keyword(&["sal-de-instrucción", "sal-de-instruccion"], Return),
    LexRule::keyword(&["como"], As),
    LexRule::keyword(&["apágate", "apagate"], TurnOff),
    LexRule::keyword(&["gira-izquierda"], TurnLeft),
    LexRule::keyword(&["avanza"], Move),
    LexRule::keyword(&["coge-zumbador"], PickBeeper),
    LexRule::keyword(&["deja-zumbador"], PutBeeper),
    LexRule::keyword(&["inicio"], Begin),
    LexRule::keyword(&["fin"], End),
    LexRule::keyword(&["entonces"], Then),
    LexRule::keyword(&["mientras"], While),
    LexRule::keyword(&["hacer"], Do),
    LexRule::keyword(&["repetir"], Repeat),
    LexRule::keyword(&["veces"], Times),
    LexRule::keyword(&["precede"], Pred),
    LexRule::keyword(&["sucede"], Succ),
    LexRule::keyword(&["si-es-cero"], IsZero),
    predicate(&["frente-libre"], Predicate::FrontIsClear),
    predicate(&["frente-bloqueado"], Predicate::FrontIsBlocked),
    predicate(&["izquierda-libre"], Predicate::LeftIsClear),
    predicate(&["izquierda-bloqueada"], Predicate::LeftIsBlocked),
    predicate(&["derecha-libre"], Predicate::RightIsClear),
    predicate(&["derecha-bloqueada"], Predicate::RightIsBlocked),
    predicate(&["junto-a-zumbador"], Predicate::NextToABeeper),
    predicate(&["no-junto-a-zumbador"], Predicate::NotNextToABeeper),
    predicate(
        &["algún-zumbador-en-la-mochila", "algun-zumbador-en-la-mochila"],
        Predicate::AnyBeepersInBeeperBag,
    ),
    predicate(
        &["ningún-zumbador-en-la-mochila", "ningun-zumbador-en-la-mochila"],
        Predicate::NoBeepersInBeeperBag,
    ),
    predicate(&["orientado-al-norte"], Predicate::FacingNorth),
    predicate(&["orientado-al-sur"], Predicate::FacingSouth),
    predicate(&["orientado-al-este"], Predicate::FacingEast),
    predicate(&["orientado-al-oeste"], Predicate::FacingWest),
    predicate(&["no-orientado-al-norte"], Predicate::NotFacingNorth),
    predicate(&["no-orientado-al-sur"], Predicate::NotFacingSouth),
    predicate(&["no-orientado-al-este"], Predicate::NotFacingEast),
    predicate(&["no-orientado-al-oeste"], Predicate::NotFacingWest),
    LexRule::keyword(&["si-no", "sino"], Else),
    LexRule::keyword(&["si"], If),
    LexRule::keyword(&["no"], Not),
    LexRule::keyword(&["o", "u"], Or),
    LexRule::keyword(&["y", "e"], And),
    // literals and names
    LexRule::emit(Pattern::Digits, IntegerLiteral),
    LexRule::emit(Pattern::Identifier, Identifier),
    // comments
    LexRule::comment(Pattern::Enclosed("{", "}"), LineComment),
    LexRule::comment(Pattern::Enclosed("(*", "*)"), BlockComment),
    // punctuation
    LexRule::symbol(&["("], LeftParen),
    LexRule::symbol(&[")"], RightParen),
    LexRule::symbol(&[";"], Semicolon),
    // Anything else is silently dropped.
    LexRule::skip(Pattern::AnyChar),
];

fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || ('À'..='Ö').contains(&c)
        || ('Ø'..='ö').contains(&c)
        || ('ø'..='ÿ').contains(&c)
}

fn ident_start(c: char) -> bool {
    is_latin_letter(c) || c == '_'
}

fn ident_continue(c: char) -> bool {
    is_latin_letter(c) || c.is_ascii_digit() || c == '_' || c == '-'
}

pub fn predicate_label(p: Predicate) -> &'static str {
    match p {
        Predicate::FrontIsClear => "frente-libre",
        Predicate::FrontIsBlocked => "frente-bloqueado",
        Predicate::LeftIsClear => "izquierda-libre",
        Predicate::LeftIsBlocked => "izquierda-bloqueada",
        Predicate::RightIsClear => "derecha-libre",
        Predicate::RightIsBlocked => "derecha-bloqueada",
        Predicate::NextToABeeper => "junto-a-zumbador",
        Predicate::NotNextToABeeper => "no-junto-a-zumbador",
        Predicate::AnyBeepersInBeeperBag => "algún-zumbador-en-la-mochila",
        Predicate::NoBeepersInBeeperBag => "ningún-zumbador-en-la-mochila",
        Predicate::FacingNorth => "orientado-al-norte",
        Predicate::FacingSouth => "orientado-al-sur",
        Predicate::FacingEast => "orientado-al-este",
        Predicate::FacingWest => "orientado-al-oeste",
        Predicate::NotFacingNorth => "no-orientado-al-norte",
        Predicate::NotFacingSouth => "no-orientado-al-sur",
        Predicate::NotFacingEast => "no-orientado-al-este",
        Predicate::NotFacingWest => "no-orientado-al-oeste",
    }
}

/// Spelling of a token kind in expected-token lists.
pub fn label(kind: TokenKind) -> &'static str {
    match kind {
        BeginProgram => "iniciar-programa",
        BeginExecution => "inicia-ejecución",
        EndExecution => "termina-ejecución",
        EndProgram => "finalizar-programa",
        Define => "define-nueva-instrucción",
        Prototype => "define-prototipo-instrucción",
        Return => "sal-de-instrucción",
        As => "como",
        TurnOff => "apágate",
        TurnLeft => "gira-izquierda",
        Move => "avanza",
        PickBeeper => "coge-zumbador",
        PutBeeper => "deja-zumbador",
        Begin => "inicio",
        End => "fin",
        Then => "entonces",
        While => "mientras",
        Do => "hacer",
        Repeat => "repetir",
        Times => "veces",
        Pred => "precede",
        Succ => "sucede",
        IsZero => "si-es-cero",
        TokenKind::Predicate(p) => predicate_label(p),
        Else => "si-no",
        If => "si",
        Not => "no",
        Or => "o",
        And => "y",
        IntegerLiteral => "<int>",
        Identifier => "<var>",
        LeftParen => "(",
        RightParen => ")",
        Semicolon => ";",
        LineComment => "LineComment",
        BlockComment => "BlockComment",
        Eof => "EOF",
        Class | Program | LeftBrace | RightBrace => "<unused>",
    }
}

/// Lexical table of the Pascal dialect.
pub static LEXICON: Lexicon = Lexicon {
    rules: RULES,
    ident_start,
    ident_continue,
    label,
};
