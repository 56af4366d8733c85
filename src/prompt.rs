//! Blocking console prompts.

use crate::error::SessionError;
use crate::io_adapters::LineSource;
use crate::resolver::Chooser;
use regex::{Regex, RegexBuilder};
use std::io::Write;

const KEY_PROMPT: &str = " (y/n) ";
const INDEX_PROMPT: &str = "Select by index: ";
const INDEX_RETRY: &str = "Invalid input, please try again: ";

/// The user-facing side of a session: one line source and one output stream.
pub struct Console {
    input: Box<dyn LineSource>,
    output: Box<dyn Write>,
    yes: Regex,
    no: Regex,
}

impl Console {
    pub fn new(input: Box<dyn LineSource>, output: Box<dyn Write>) -> Self {
        Self {
            input,
            output,
            yes: yes_no_regex(r"^\s*y(es)?\s*$"),
            no: yes_no_regex(r"^\s*no?\s*$"),
        }
    }

    /// Writer for everything the session prints.
    pub fn out(&mut self) -> &mut dyn Write {
        self.output.as_mut()
    }

    /// Read one line after showing `prompt`. `None` when input is exhausted.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>, SessionError> {
        self.input.next_line(prompt, self.output.as_mut())
    }

    /// Like [`Console::read_line`], but running out of input is a failure:
    /// the caller is blocked on an answer that can never arrive.
    fn require_line(&mut self, prompt: &str) -> Result<String, SessionError> {
        self.read_line(prompt)?
            .ok_or_else(|| SessionError::StreamFailure("input ended while waiting for an answer".to_string()))
    }

    /// Ask a yes/no question until the answer is recognisable.
    ///
    /// Accepts `y`, `yes`, `n` and `no` in any case, with surrounding whitespace.
    pub fn confirm(&mut self, message: &str) -> Result<bool, SessionError> {
        let mut prompt = format!("{}{}", message, KEY_PROMPT);
        loop {
            let answer = self.require_line(&prompt)?;
            if self.yes.is_match(&answer) {
                return Ok(true);
            }
            if self.no.is_match(&answer) {
                return Ok(false);
            }
            prompt = format!("Invalid input. {}{}", message, KEY_PROMPT);
        }
    }
}

impl Chooser for Console {
    fn choose(&mut self, descriptions: &[String]) -> Result<usize, SessionError> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "You have entered an Element name that matches more than one element."
        )?;
        for (i, description) in descriptions.iter().enumerate() {
            writeln!(self.output, "{}) {}", i + 1, description)?;
        }

        let mut prompt = INDEX_PROMPT;
        loop {
            let answer = self.require_line(prompt)?;
            if let Some(index) = parse_index(&answer, descriptions.len()) {
                return Ok(index);
            }
            log::debug!("rejected selection {:?}", answer);
            prompt = INDEX_RETRY;
        }
    }
}

/// Parse a 1-based selection in `[1, count]` and return it 0-based.
///
/// Surrounding whitespace is ignored; anything else that is not part of the
/// number (signs aside) makes the input invalid.
pub fn parse_index(input: &str, count: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}

fn yes_no_regex(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid built-in pattern {}: {}", pattern, e))
}
