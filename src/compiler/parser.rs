//! The statement and expression grammars, and the instruction emission that
//! goes with them.
//!
//! Emission is interleaved with recognition: there is no AST. Each parse
//! function returns the instruction fragment for the construct it recognized,
//! and callers concatenate fragments in grammar order. Nothing is written to
//! shared state, so a construct's instructions appear exactly once in the
//! output.

use tracing::trace;

use crate::error::Diagnostic;
use crate::instr::{BinOp, Instr, Procedure, ProcedureTable, Program, Value};

use super::lexer::TokenStream;
use super::token::{Arity, TurtleKw};
use super::Compilation;
use super::Token;
use super::TokenType;

/// Tracks the current state, to make parsing easier.
#[derive(Debug)]
struct Parser<'a> {
    /// The input token stream.
    input: TokenStream<'a>,
    /// The raw source code.
    text: &'a str,
    /// Procedure records registered by `to ... end` blocks seen so far.
    procedures: ProcedureTable,
    /// Problems found so far. Parsing continues past all of them.
    diagnostics: Vec<Diagnostic>,
}

/// Parses Logo source code into a [`Compilation`].
pub(super) fn parse(source: &str) -> Compilation {
    let parser = Parser {
        input: TokenStream::new(source),
        text: source,
        procedures: ProcedureTable::default(),
        diagnostics: Vec::new(),
    };
    parser.parse_program()
}

type Result<T> = std::result::Result<T, Diagnostic>;

impl<'a> Parser<'a> {
    // Helper functions

    /// Constructs the diagnostic for an unexpected token, without consuming
    /// it. The statement loop is responsible for discarding the token.
    fn err_unexpected(&mut self) -> Diagnostic {
        let token = self.input.peek().clone();
        if token.typ == TokenType::EndOfFile {
            Diagnostic::UnexpectedEndOfInput
        } else {
            Diagnostic::SyntaxError {
                lexeme: self.text[token.range()].to_string(),
                line: token.line,
            }
        }
    }

    /// Pulls a token off the input and checks it against `expected`. On a
    /// mismatch the token is left in place and an `Err` is returned.
    fn expect(&mut self, expected: TokenType) -> Result<Token> {
        if self.input.peek_type() == expected {
            Ok(self.input.next())
        } else {
            Err(self.err_unexpected())
        }
    }

    /// Expect an identifier token and get the actual identifier from the text.
    fn expect_identifier(&mut self) -> Result<String> {
        let token = self.expect(TokenType::Identifier)?;
        Ok(self.text[token.range()].to_string())
    }

    /// Whether the next token can begin an expression.
    fn starts_expression(&mut self) -> bool {
        matches!(
            self.input.peek_type(),
            TokenType::LParen
                | TokenType::Minus
                | TokenType::Colon
                | TokenType::LiteralInt
                | TokenType::LiteralFloat
        )
    }

    fn int_value(&self, token: &Token) -> Result<i64> {
        let lexeme = &self.text[token.range()];
        lexeme.parse().map_err(|_| Diagnostic::SyntaxError {
            lexeme: lexeme.to_string(),
            line: token.line,
        })
    }

    fn float_value(&self, token: &Token) -> Result<f64> {
        let lexeme = &self.text[token.range()];
        lexeme.parse().map_err(|_| Diagnostic::SyntaxError {
            lexeme: lexeme.to_string(),
            line: token.line,
        })
    }

    // Actual parsing

    /// Entry point for the parser.
    fn parse_program(mut self) -> Compilation {
        let program = self.parse_statements(false);
        let mut diagnostics = self.input.take_diagnostics();
        diagnostics.append(&mut self.diagnostics);
        Compilation {
            program,
            procedures: self.procedures,
            diagnostics,
        }
    }

    /// Parse statements up to `end` (inside a procedure definition) or the
    /// end of input (at top level), concatenating their fragments.
    ///
    /// This is also where error recovery happens: a statement that fails to
    /// parse contributes no instructions, its diagnostic is recorded, the
    /// offending token is discarded, and parsing resumes.
    fn parse_statements(&mut self, in_procedure: bool) -> Program {
        let mut code = Program::new();
        loop {
            match self.input.peek_type() {
                TokenType::EndOfFile => {
                    if in_procedure {
                        // The `end` keyword is missing. There is nothing left
                        // to resynchronize on.
                        self.diagnostics.push(Diagnostic::UnexpectedEndOfInput);
                    }
                    break;
                }
                TokenType::End if in_procedure => {
                    self.input.next();
                    break;
                }
                _ => {}
            }
            match self.parse_statement() {
                Ok(fragment) => code.extend(fragment),
                Err(diagnostic) => {
                    let at_eof = matches!(diagnostic, Diagnostic::UnexpectedEndOfInput);
                    self.diagnostics.push(diagnostic);
                    if at_eof {
                        break;
                    }
                    self.input.next();
                }
            }
        }
        code
    }

    fn parse_statement(&mut self) -> Result<Program> {
        let typ = self.input.peek_type();
        match typ {
            TokenType::Turtle(kw) => self.parse_turtle_instruction(kw),
            TokenType::Identifier => self.parse_assign_or_call(),
            TokenType::To => self.parse_procedure_definition(),
            TokenType::Write => self.parse_write(),
            _ if self.starts_expression() => self.parse_expr(),
            _ => Err(self.err_unexpected()),
        }
    }

    /// Parse a fixed turtle command. Arguments are emitted left to right,
    /// then a single `Call` with the command's canonical name.
    fn parse_turtle_instruction(&mut self, kw: TurtleKw) -> Result<Program> {
        self.input.next();
        let mut code = match kw.arity() {
            Arity::Zero => Program::new(),
            Arity::One => self.parse_expr()?,
            Arity::Pair => {
                self.expect(TokenType::LCurly)?;
                let mut code = self.parse_expr()?;
                self.expect(TokenType::Comma)?;
                code.extend(self.parse_expr()?);
                self.expect(TokenType::RCurly)?;
                code
            }
        };
        code.push(Instr::Call(kw.canonical_name().to_string()));
        Ok(code)
    }

    /// Parse a statement which begins with an identifier: either a variable
    /// declaration (`name = expr`) or a call to a user-defined procedure.
    fn parse_assign_or_call(&mut self) -> Result<Program> {
        let name = self.expect_identifier()?;
        if self.input.try_pop(TokenType::Assign).is_some() {
            let mut code = self.parse_expr()?;
            code.push(Instr::Store(name));
            Ok(code)
        } else {
            // Unlike turtle instructions, the call marker precedes its
            // arguments in the emitted stream. The execution engine depends
            // on this ordering.
            let mut code = vec![Instr::Call(name)];
            if self.starts_expression() {
                code.extend(self.parse_expr()?);
                while self.input.try_pop(TokenType::Comma).is_some() {
                    code.extend(self.parse_expr()?);
                }
            }
            Ok(code)
        }
    }

    /// Parse `to name parameters statements end`. The body is compiled into
    /// its own fragment; the surrounding code only receives the
    /// `DefineProcedure` marker.
    fn parse_procedure_definition(&mut self) -> Result<Program> {
        self.input.next();
        let name = self.expect_identifier()?;
        let params = self.parse_parameters()?;
        let body = self.parse_statements(true);
        let procedure = Procedure { name, params, body };
        trace!(name = %procedure.name, params = procedure.params.len(), "defined procedure");
        self.procedures.define(procedure.clone());
        Ok(vec![Instr::DefineProcedure(procedure)])
    }

    /// Parse a comma-separated formal parameter list. Each parameter is
    /// either `:name` or absent; absent parameters are dropped from the
    /// stored list.
    fn parse_parameters(&mut self) -> Result<Vec<String>> {
        let mut params = Vec::new();
        loop {
            if self.input.try_pop(TokenType::Colon).is_some() {
                params.push(self.expect_identifier()?);
            }
            if self.input.try_pop(TokenType::Comma).is_none() {
                break;
            }
        }
        Ok(params)
    }

    /// Parse a `write` statement: one or two operands, each either a string
    /// word or an expression. A second operand must be of the other kind.
    /// Operands are emitted in source order, then `Call(Write)`.
    fn parse_write(&mut self) -> Result<Program> {
        self.input.next();
        let mut code;
        if self.input.check_type(TokenType::LiteralString) {
            code = vec![self.parse_word()?];
            if self.starts_expression() {
                code.extend(self.parse_expr()?);
            }
        } else if self.starts_expression() {
            code = self.parse_expr()?;
            if self.input.check_type(TokenType::LiteralString) {
                code.push(self.parse_word()?);
            }
        } else {
            return Err(self.err_unexpected());
        }
        code.push(Instr::Call("Write".to_string()));
        Ok(code)
    }

    /// Parse a string word, keeping only the text between the quotes.
    fn parse_word(&mut self) -> Result<Instr> {
        let token = self.expect(TokenType::LiteralString)?;
        let inner = self.text[(token.start + 1)..(token.start + token.len as usize - 1)].to_string();
        Ok(Instr::Push(Value::Str(inner)))
    }

    /// Parse the input as a single expression.
    fn parse_expr(&mut self) -> Result<Program> {
        self.parse_additive()
    }

    /// Parse an additive expression, the loosest tier.
    ///
    /// `+`, `-`
    fn parse_additive(&mut self) -> Result<Program> {
        let mut code = self.parse_multiplicative()?;
        loop {
            let op = match self.input.peek_type() {
                TokenType::Plus => BinOp::Add,
                TokenType::Minus => BinOp::Sub,
                _ => break,
            };
            self.input.next();
            code.extend(self.parse_multiplicative()?);
            code.push(Instr::BinaryOp(op));
        }
        Ok(code)
    }

    /// Parse a multiplicative expression.
    ///
    /// `*`, `/`
    fn parse_multiplicative(&mut self) -> Result<Program> {
        let mut code = self.parse_unary()?;
        loop {
            let op = match self.input.peek_type() {
                TokenType::Star => BinOp::Mul,
                TokenType::Slash => BinOp::Div,
                _ => break,
            };
            self.input.next();
            code.extend(self.parse_unary()?);
            code.push(Instr::BinaryOp(op));
        }
        Ok(code)
    }

    /// Parse a unary expression. Note that `^` binds tighter than unary
    /// minus: `-2 ^ 2` negates the whole power.
    fn parse_unary(&mut self) -> Result<Program> {
        if self.input.try_pop(TokenType::Minus).is_some() {
            let mut code = self.parse_unary()?;
            code.push(Instr::UnaryMinus);
            Ok(code)
        } else {
            self.parse_power()
        }
    }

    /// Parse a power expression. `^` is the tightest binary operator and is
    /// left-associative, as the language declares it: `2 ^ 3 ^ 2` is
    /// `(2 ^ 3) ^ 2`.
    fn parse_power(&mut self) -> Result<Program> {
        let mut code = self.parse_primary()?;
        while self.input.try_pop(TokenType::Caret).is_some() {
            code.extend(self.parse_power_operand()?);
            code.push(Instr::BinaryOp(BinOp::Pow));
        }
        Ok(code)
    }

    /// The right operand of `^`: a primary, or a negated power chain.
    /// A minus here applies to everything the `^`s to its right bind:
    /// `2 ^ -3 ^ 2` is `2 ^ -(3 ^ 2)`.
    fn parse_power_operand(&mut self) -> Result<Program> {
        if self.input.try_pop(TokenType::Minus).is_some() {
            let mut code = self.parse_power()?;
            code.push(Instr::UnaryMinus);
            Ok(code)
        } else {
            self.parse_primary()
        }
    }

    /// Parse an expression, after eliminating any operators. This can be:
    ///
    /// * A parenthesized expression (transparent, no instruction of its own)
    /// * A variable reference `:name`
    /// * An integer or float literal
    fn parse_primary(&mut self) -> Result<Program> {
        match self.input.peek_type() {
            TokenType::LParen => {
                self.input.next();
                let code = self.parse_expr()?;
                self.expect(TokenType::RParen)?;
                Ok(code)
            }
            TokenType::Colon => {
                self.input.next();
                let name = self.expect_identifier()?;
                Ok(vec![Instr::Load(name)])
            }
            TokenType::LiteralInt => {
                let token = self.input.next();
                let value = self.int_value(&token)?;
                Ok(vec![Instr::Push(Value::Int(value))])
            }
            TokenType::LiteralFloat => {
                let token = self.input.next();
                let value = self.float_value(&token)?;
                Ok(vec![Instr::Push(Value::Float(value))])
            }
            _ => Err(self.err_unexpected()),
        }
    }
}
