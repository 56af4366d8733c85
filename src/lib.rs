//! An interactive editor for a small XML-like document.
//!
//! The user builds a tree of named elements with short commands (`add element`,
//! `add attribute`, `print`, `write`, `delete`, `help`, `quit`). When a name
//! matches several elements the user is asked which one was meant.
//!
//! The main entry point is [`Interpreter`], which owns the [`document::Document`]
//! for the session and runs the read-parse-execute loop, interactively or from
//! an autoexec script. The grammar ([`parser`]), the name resolver
//! ([`resolver`]) and the table renderer ([`table`]) are usable on their own.

pub mod command;
pub mod document;
pub mod error;
pub mod io_adapters;
mod interpreter;
mod lexer;
pub mod parser;
pub mod prompt;
pub mod resolver;
pub mod table;

/// The session loop and the constants that shape its console protocol.
pub use interpreter::{DEFAULT_ROOT_NAME, Interpreter, PROMPT, SessionState};
