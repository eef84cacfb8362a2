//! This module contains functions which can tokenize a string input.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::Diagnostic;

use super::Token;
use super::TokenType::{self, *};

/// A `TokenStream` is a wrapper around a `Lexer`. It provides a lookahead
/// buffer and several helper methods.
#[derive(Debug)]
pub(super) struct TokenStream<'a> {
    lexer: Lexer<'a>,
    lookahead: Option<Token>,
}

/// A `Lexer` handles the raw conversion of characters to tokens.
///
/// It never aborts: unscannable characters are reported and skipped, and once
/// the input is exhausted every further token is `EndOfFile`.
#[derive(Debug)]
pub(super) struct Lexer<'a> {
    /// The starting position of the next character.
    pos: usize,
    /// The line the next character is on, counting from 1.
    line: usize,
    iter: Peekable<CharIndices<'a>>,
    source: &'a str,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> TokenStream<'a> {
    pub(super) fn new(source: &'a str) -> Self {
        TokenStream {
            lexer: Lexer::new(source),
            lookahead: None,
        }
    }

    /// Return the next Token.
    pub(super) fn next(&mut self) -> Token {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token(),
        }
    }

    pub(super) fn peek(&mut self) -> &Token {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lexer.next_token());
        }
        self.lookahead.as_ref().unwrap()
    }

    /// Return the type of the next token without popping it.
    pub(super) fn peek_type(&mut self) -> TokenType {
        self.peek().typ
    }

    pub(super) fn check_type(&mut self, expected_type: TokenType) -> bool {
        self.peek_type() == expected_type
    }

    /// Checks the next token's type. If it matches `expected_type`, it is
    /// popped off and returned as `Some`. Else, we return `None`.
    pub(super) fn try_pop(&mut self, expected_type: TokenType) -> Option<Token> {
        if self.check_type(expected_type) {
            Some(self.next())
        } else {
            None
        }
    }

    /// The lexical diagnostics accumulated so far. Only complete once the
    /// stream has been read through to `EndOfFile`.
    pub(super) fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.lexer.diagnostics)
    }
}

impl<'a> Lexer<'a> {
    pub(super) fn new(source: &'a str) -> Self {
        Lexer {
            iter: source.char_indices().peekable(),
            pos: 0,
            line: 1,
            source,
            diagnostics: Vec::new(),
        }
    }

    pub(super) fn next_token(&mut self) -> Token {
        loop {
            self.consume_whitespace();
            let tok_start = self.pos;
            let line = self.line;
            let first_char = match self.next_char() {
                Some(c) => c,
                None => return Token::new(EndOfFile, self.pos, 0, self.line),
            };
            let typ = match first_char {
                '(' => LParen,
                ')' => RParen,
                '{' => LCurly,
                '}' => RCurly,
                ':' => Colon,
                ',' => Comma,
                '+' => Plus,
                '-' => Minus,
                '*' => Star,
                '/' => Slash,
                '^' => Caret,

                // `==` must win over `=`.
                '=' => {
                    if self.try_next('=') {
                        EqEq
                    } else {
                        Assign
                    }
                }

                '\"' => match self.lex_string() {
                    Some(typ) => typ,
                    None => return Token::new(EndOfFile, self.pos, 0, self.line),
                },

                '.' => match self.peek_char() {
                    Some(c) if c.is_ascii_digit() => {
                        self.lex_digits();
                        LiteralFloat
                    }
                    _ => {
                        self.diagnostics
                            .push(Diagnostic::IllegalCharacter { ch: '.', line });
                        continue;
                    }
                },

                c if c.is_ascii_digit() => self.lex_number(),

                c if c.is_ascii_alphabetic() || c == '_' => {
                    self.lex_word();
                    keyword_match(&self.source[tok_start..self.pos])
                }

                c => {
                    self.diagnostics
                        .push(Diagnostic::IllegalCharacter { ch: c, line });
                    continue;
                }
            };
            let len = self.pos - tok_start;
            return Token::new(typ, tok_start, len as u32, line);
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.iter.peek().map(|(_, c)| *c)
    }

    /// The character after the next one, without consuming anything.
    fn peek_second(&self) -> Option<char> {
        let mut iter = self.iter.clone();
        iter.next();
        iter.next().map(|(_, c)| c)
    }

    fn next_char(&mut self) -> Option<char> {
        match self.iter.next() {
            Some((pos, c)) => {
                self.pos = pos + c.len_utf8();
                if c == '\n' {
                    self.line += 1;
                }
                Some(c)
            }
            None => None,
        }
    }

    /// Consume spaces, tabs and newlines. Newlines only bump the line
    /// counter; no token is produced for them.
    fn consume_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_ascii_whitespace() {
                break;
            }
            self.next_char();
        }
    }

    /// Move a character forward, only if the current character matches
    /// `expected`.
    fn try_next(&mut self, expected: char) -> bool {
        match self.peek_char() {
            Some(c) if c == expected => {
                self.next_char();
                true
            }
            _ => false,
        }
    }

    /// Scan a string literal: everything up to the next double quote. There
    /// are no escapes, and the string may span several lines. If the input
    /// runs out first, the string is reported and `None` is returned.
    fn lex_string(&mut self) -> Option<TokenType> {
        while let Some(c) = self.next_char() {
            if c == '\"' {
                return Some(LiteralString);
            }
        }
        self.diagnostics.push(Diagnostic::UnexpectedEndOfInput);
        None
    }

    /// Read in a number which starts with a digit (as opposed to a decimal
    /// point).
    fn lex_number(&mut self) -> TokenType {
        self.lex_digits();
        // A dot only joins the number when digits follow it; `1.` is the
        // integer 1 followed by a stray dot.
        if self.peek_char() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.next_char();
            self.lex_digits();
            LiteralFloat
        } else {
            LiteralInt
        }
    }

    /// Read in an unbroken sequence of digits.
    fn lex_digits(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn lex_word(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphabetic() || c.is_ascii_digit() || c == '_' {
                self.next_char();
            } else {
                break;
            }
        }
    }
}

fn keyword_match(s: &str) -> TokenType {
    use super::token::TurtleKw::*;
    match s {
        "to" => To,
        "end" => End,
        "write" => Write,
        "fo" | "forward" => Turtle(Forward),
        "bk" | "back" => Turtle(Backward),
        "rt" | "right" => Turtle(Right),
        "lt" | "left" => Turtle(Left),
        "heading" => Turtle(Heading),
        "setxy" => Turtle(SetXY),
        "home" => Turtle(Home),
        "wc" | "wipeclean" => Turtle(WipeClean),
        "cs" | "clearscreen" | "reset" => Turtle(Reset),
        "pu" | "penup" => Turtle(PenUp),
        "pd" | "pendown" => Turtle(PenDown),
        "xcor" => Turtle(XCor),
        "ycor" => Turtle(YCor),
        "typein" => Turtle(TypeIn),
        _ => Identifier,
    }
}

#[cfg(test)]
mod tests {
    use super::super::token::TurtleKw;
    use super::*;

    fn lex_all(input: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if token.typ == EndOfFile {
                break;
            }
            tokens.push(token);
        }
        (tokens, lexer.diagnostics)
    }

    fn check(input: &str, expected: &[(TokenType, usize, u32, usize)]) {
        let (tokens, diagnostics) = lex_all(input);
        let expected: Vec<Token> = expected
            .iter()
            .map(|&(typ, start, len, line)| Token::new(typ, start, len, line))
            .collect();
        assert_eq!(tokens, expected);
        assert_eq!(diagnostics, Vec::new());
    }

    #[test]
    fn test_lexer01() {
        check("50", &[(LiteralInt, 0, 2, 1)]);
    }

    #[test]
    fn test_lexer02() {
        check(
            "fo 50",
            &[(Turtle(TurtleKw::Forward), 0, 2, 1), (LiteralInt, 3, 2, 1)],
        );
    }

    #[test]
    fn test_lexer03() {
        check(
            "a = 8",
            &[(Identifier, 0, 1, 1), (Assign, 2, 1, 1), (LiteralInt, 4, 1, 1)],
        );
    }

    #[test]
    fn test_lexer04() {
        check("== =", &[(EqEq, 0, 2, 1), (Assign, 3, 1, 1)]);
    }

    #[test]
    fn test_lexer05() {
        check(
            "3.14 .5 7",
            &[
                (LiteralFloat, 0, 4, 1),
                (LiteralFloat, 5, 2, 1),
                (LiteralInt, 8, 1, 1),
            ],
        );
    }

    #[test]
    fn test_lexer06() {
        // `1.` is an integer followed by a stray dot.
        let (tokens, diagnostics) = lex_all("1.");
        assert_eq!(tokens, vec![Token::new(LiteralInt, 0, 1, 1)]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::IllegalCharacter { ch: '.', line: 1 }]
        );
    }

    #[test]
    fn test_lexer07() {
        // A string may span physical lines.
        check(
            "write \"hi\nthere\"",
            &[(Write, 0, 5, 1), (LiteralString, 6, 10, 1)],
        );
    }

    #[test]
    fn test_lexer08() {
        let (tokens, diagnostics) = lex_all("a = 8 # b = 5");
        let expected = vec![
            Token::new(Identifier, 0, 1, 1),
            Token::new(Assign, 2, 1, 1),
            Token::new(LiteralInt, 4, 1, 1),
            Token::new(Identifier, 8, 1, 1),
            Token::new(Assign, 10, 1, 1),
            Token::new(LiteralInt, 12, 1, 1),
        ];
        assert_eq!(tokens, expected);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::IllegalCharacter { ch: '#', line: 1 }]
        );
    }

    #[test]
    fn test_lexer09() {
        check(
            "wc cs clearscreen reset",
            &[
                (Turtle(TurtleKw::WipeClean), 0, 2, 1),
                (Turtle(TurtleKw::Reset), 3, 2, 1),
                (Turtle(TurtleKw::Reset), 6, 11, 1),
                (Turtle(TurtleKw::Reset), 18, 5, 1),
            ],
        );
    }

    #[test]
    fn test_lexer10() {
        // Blank lines still count towards line numbers.
        check(
            "a\nb\n\nc",
            &[
                (Identifier, 0, 1, 1),
                (Identifier, 2, 1, 2),
                (Identifier, 5, 1, 4),
            ],
        );
    }

    #[test]
    fn test_lexer11() {
        let (tokens, diagnostics) = lex_all("\"abc");
        assert_eq!(tokens, Vec::new());
        assert_eq!(diagnostics, vec![Diagnostic::UnexpectedEndOfInput]);
    }

    #[test]
    fn test_lexer12() {
        // Keywords are case-sensitive; `_x9` is identifier-shaped.
        check(
            "Forward _x9",
            &[(Identifier, 0, 7, 1), (Identifier, 8, 3, 1)],
        );
    }
}
