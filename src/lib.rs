//! A compiler front end for a turtle-graphics dialect of the Logo language.
//!
//! Source text goes in; a linear sequence of stack-machine instructions comes
//! out, together with a table of user-defined procedures and a list of
//! diagnostics. Executing the instructions (moving the turtle, storing
//! variables, resolving calls) is the job of a downstream interpreter.
//!
//! ```
//! use logo::{Instr, Value};
//!
//! let result = logo::compile("a = 8 write :a");
//! assert!(result.diagnostics.is_empty());
//! assert_eq!(
//!     result.program,
//!     vec![
//!         Instr::Push(Value::Int(8)),
//!         Instr::Store("a".to_string()),
//!         Instr::Load("a".to_string()),
//!         Instr::Call("Write".to_string()),
//!     ],
//! );
//! ```

#![warn(future_incompatible)]
#![warn(non_ascii_idents)]
#![warn(rust_2018_idioms)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused)]
#![warn(variant_size_differences)]

mod compiler;
mod error;
mod instr;

pub use compiler::{compile, Compilation};
pub use error::{Diagnostic, DiagnosticKind};
pub use instr::{BinOp, Instr, Procedure, ProcedureTable, Program, Value};
