//! Functions and types associated with converting source code into
//! stack-machine instructions.

mod lexer;
mod parser;
mod token;

use tracing::debug;

use crate::error::Diagnostic;
use crate::instr::{Program, ProcedureTable};

use token::Token;
use token::TokenType;

/// Everything produced by one compilation: the instruction sequence, the
/// user-defined procedures, and any problems found along the way.
///
/// A non-empty `diagnostics` list means the program is best-effort output of
/// an invalid source text; callers deciding success must check it, not just
/// the program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compilation {
    pub program: Program,
    pub procedures: ProcedureTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Compile a Logo source text into a [`Compilation`].
///
/// Every call starts from an empty program and an empty procedure table, so
/// compiling the same text twice yields identical output.
pub fn compile(source: impl AsRef<str>) -> Compilation {
    let compilation = parser::parse(source.as_ref());
    debug!(
        instructions = compilation.program.len(),
        procedures = compilation.procedures.len(),
        diagnostics = compilation.diagnostics.len(),
        "compiled program"
    );
    compilation
}
