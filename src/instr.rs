//! The compiled intermediate representation: stack-machine instructions,
//! literal values, and the table of user-defined procedures.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// The full compiled unit: instructions in execution order.
pub type Program = Vec<Instr>;

/// A literal value pushed onto the operand stack.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

/// A binary arithmetic operator. Pops two operands, pushes one result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// One stack-machine instruction. Instructions are immutable once emitted and
/// their order is significant: operands are produced left to right,
/// depth-first over the source expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Instr {
    /// Push a literal value.
    Push(Value),
    /// Push the value of a variable.
    Load(String),
    /// Pop a value and store it into a variable.
    Store(String),
    /// Invoke a turtle instruction or a user-defined procedure. Resolving the
    /// name is the execution engine's job, not ours.
    Call(String),
    /// Pop a value, push its negation.
    UnaryMinus,
    BinaryOp(BinOp),
    /// Marks the definition of a procedure. The body is carried inside the
    /// record, not inlined into the surrounding code.
    DefineProcedure(Procedure),
}

/// The compiled form of a `to ... end` block.
#[derive(Clone, Debug, PartialEq)]
pub struct Procedure {
    pub name: String,
    /// Formal parameter names, in declaration order. Absent (placeholder)
    /// parameters have already been filtered out.
    pub params: Vec<String>,
    pub body: Program,
}

/// Procedures keyed by name, populated as `to ... end` blocks are parsed.
/// Redefining a name silently replaces the previous record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcedureTable {
    procedures: HashMap<String, Procedure>,
}

impl ProcedureTable {
    pub fn define(&mut self, procedure: Procedure) {
        self.procedures.insert(procedure.name.clone(), procedure);
    }

    pub fn lookup(&self, name: &str) -> Option<&Procedure> {
        self.procedures.get(name)
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Procedure> {
        self.procedures.values()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mnemonic = match self {
            BinOp::Add => "ADD",
            BinOp::Sub => "SUB",
            BinOp::Mul => "MUL",
            BinOp::Div => "DIV",
            BinOp::Pow => "POW",
        };
        f.write_str(mnemonic)
    }
}

impl Display for Instr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Push(value) => write!(f, "PUSH {}", value),
            Instr::Load(name) => write!(f, "LOAD {}", name),
            Instr::Store(name) => write!(f, "STORE {}", name),
            Instr::Call(name) => write!(f, "CALL {}", name),
            Instr::UnaryMinus => f.write_str("UMINUS"),
            Instr::BinaryOp(op) => write!(f, "{}", op),
            Instr::DefineProcedure(procedure) => write!(f, "DEF {}", procedure.name),
        }
    }
}
