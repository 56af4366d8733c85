//! Lexical analysis of a single command line.
//!
//! Commands are plain whitespace-separated words. Each word remembers where it
//! starts in the original line so the parser can take "the rest of the line"
//! as one field (element content) without re-joining words.

/// A word of the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    /// The word text, never empty and never containing whitespace.
    pub text: &'a str,
    /// Byte offset of the first character in the line.
    pub start: usize,
}

impl Word<'_> {
    /// Case-insensitive comparison against a keyword.
    pub fn is(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }

    /// Whether every character is a word character (ASCII letter, digit or `_`).
    pub fn is_identifier(&self) -> bool {
        self.text.chars().all(is_word_char)
    }

    /// Whether the word is a valid file path: word characters and `.`.
    pub fn is_path(&self) -> bool {
        self.text.chars().all(|c| is_word_char(c) || c == '.')
    }
}

pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split a line into words.
pub fn split_into_words(line: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut start = None;

    for (pos, ch) in line.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                words.push(Word {
                    text: &line[s..pos],
                    start: s,
                });
                start = None;
            }
            (false, None) => start = Some(pos),
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push(Word {
            text: &line[s..],
            start: s,
        });
    }

    words
}
