//! # pipelox
//!
//! A tree-walking interpreter for Lox, a small dynamically typed scripting
//! language, with closures, `break`/`continue` and a pipe operator.
//!
//! Source text goes through four phases:
//!
//! ``` markdown
//! source ── Scanner ──> tokens ── Parser ──> AST ── Desugarer ──> AST ── Interpreter
//! ```
//!
//! ## Scanning
//!
//! [`scanner::Scanner`] groups characters into tokens. Whitespace and
//! comments are dropped; `var average = (min + max) / 2;` becomes
//! `["var", "average", "=", "(", "min", "+", "max", ")", "/", "2", ";"]`.
//!
//! ## Parsing
//!
//! [`parser::Parser`] builds the syntax tree by recursive descent. A syntax
//! error is reported, the parser skips to the next statement, and parsing
//! goes on so that one run reports every error it can find. `for` loops are
//! lowered to `while` here.
//!
//! ## Pipes
//!
//! `left |> right` threads `left` into every `$` placeholder of `right`.
//! [`desugar::Desugarer`] rewrites `5 |> double($) |> inc($)` to
//! `inc(double(5))`, so the evaluator never sees a pipe.
//!
//! ## Evaluation
//!
//! [`Interpreter`] walks the tree. Scopes are shared frames, so closures see
//! later writes to the variables they captured.
//!
//! Errors of every phase are collected in a [`diagnostics::Diagnostics`]
//! sink; [`Loxer`] renders them and maps the outcome to an exit status.

pub mod cli;
pub mod desugar;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod interpreter;
mod loxer;
pub mod parser;
pub mod scanner;
pub mod statement;
mod utils;

pub use error::{LoxError, interpreter::{InterpreterError, RuntimeError, RuntimeErrorType}, parser::{ParseError, ParseErrorType, ParserError}, scanner::{ScanError, ScanErrorType, ScannerError}};
pub use interpreter::{Interpreter, value::Value};
pub use loxer::Loxer;
