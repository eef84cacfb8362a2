use std::ops::Range;

#[derive(Clone, Debug, PartialEq)]
pub(super) struct Token {
    pub(super) typ: TokenType,
    /// Byte offset of the first character of the lexeme.
    pub(super) start: usize,
    pub(super) len: u32,
    /// 1-based source line the lexeme starts on.
    pub(super) line: usize,
}

#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum TokenType {
    // Keywords
    To, End, Write,
    Turtle(TurtleKw),
    // Operator symbols
    Plus, Minus, Star, Slash, Caret,
    // Assignment and comparison
    Assign, EqEq,
    // Brackets
    LParen, RParen, LCurly, RCurly,
    // Other symbols
    Colon, Comma,
    // Others
    Identifier,
    LiteralInt,
    LiteralFloat,
    LiteralString,

    EndOfFile,
}

/// A fixed-vocabulary turtle command. Several source lexemes may map to one
/// command (`cs`, `clearscreen` and `reset` all mean `Reset`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum TurtleKw {
    Forward,
    Backward,
    Right,
    Left,
    Heading,
    SetXY,
    Home,
    WipeClean,
    Reset,
    PenUp,
    PenDown,
    XCor,
    YCor,
    TypeIn,
}

/// How many arguments a turtle command takes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Arity {
    Zero,
    One,
    /// Exactly two expressions, in braces: `setxy { e1 , e2 }`.
    Pair,
}

impl Token {
    pub(super) fn new(typ: TokenType, start: usize, len: u32, line: usize) -> Self {
        Token {
            typ,
            start,
            len,
            line,
        }
    }

    pub(super) fn range(&self) -> Range<usize> {
        let start = self.start;
        let end = start + self.len as usize;
        start..end
    }
}

impl TurtleKw {
    /// The name emitted in the `Call` instruction for this command. The
    /// execution engine dispatches on these exact strings.
    pub(super) fn canonical_name(self) -> &'static str {
        match self {
            TurtleKw::Forward => "Forward",
            TurtleKw::Backward => "Backward",
            TurtleKw::Right => "Right",
            TurtleKw::Left => "Left",
            TurtleKw::Heading => "Heading",
            TurtleKw::SetXY => "SetXY",
            TurtleKw::Home => "Home",
            TurtleKw::WipeClean => "WipeClean",
            TurtleKw::Reset => "Reset",
            TurtleKw::PenUp => "PenUp",
            TurtleKw::PenDown => "PenDown",
            TurtleKw::XCor => "XCor",
            TurtleKw::YCor => "YCor",
            TurtleKw::TypeIn => "TypeIn",
        }
    }

    pub(super) fn arity(self) -> Arity {
        match self {
            TurtleKw::Forward
            | TurtleKw::Backward
            | TurtleKw::Right
            | TurtleKw::Left
            | TurtleKw::Heading
            | TurtleKw::TypeIn => Arity::One,
            TurtleKw::SetXY => Arity::Pair,
            TurtleKw::Home
            | TurtleKw::WipeClean
            | TurtleKw::Reset
            | TurtleKw::PenUp
            | TurtleKw::PenDown
            | TurtleKw::XCor
            | TurtleKw::YCor => Arity::Zero,
        }
    }
}
