//! Command grammar.
//!
//! A line is classified by its first word (the verb) and then checked against
//! the argument shape of that verb:
//!
//! | verb                | arguments                                  |
//! |---------------------|--------------------------------------------|
//! | `quit`, `exit`      | none                                       |
//! | `add element`       | parent, child, optional trailing content   |
//! | `add attribute`     | parent, key, value                         |
//! | `print`             | optional name                              |
//! | `write`             | path (word characters and `.`)             |
//! | `delete`, `del`     | name                                       |
//! | `help`              | none                                       |
//!
//! Verbs are case-insensitive. Names, keys and values are made of word
//! characters only. Parsing never fails: a line that does not fit becomes
//! [`Command::Invalid`] carrying the usage class to show.

use crate::command::{Command, Usage};
use crate::lexer::{self, Word};

/// Parse one raw input line.
pub fn parse_line(line: &str) -> Command {
    let words = lexer::split_into_words(line);

    let Some((verb, args)) = words.split_first() else {
        return Command::Empty;
    };

    if verb.is("quit") || verb.is("exit") {
        return if args.is_empty() {
            Command::Quit
        } else {
            Command::Invalid(Usage::General)
        };
    }

    if verb.is("add") {
        parse_add(line, args)
    } else if verb.is("print") {
        parse_print(args)
    } else if verb.is("write") {
        parse_write(args)
    } else if verb.is("delete") || verb.is("del") {
        parse_delete(args)
    } else if verb.is("help") && args.is_empty() {
        Command::Help
    } else {
        Command::Invalid(Usage::General)
    }
}

fn parse_add(line: &str, args: &[Word<'_>]) -> Command {
    match args.split_first() {
        Some((kind, rest)) if kind.is("element") => parse_add_element(line, rest),
        Some((kind, rest)) if kind.is("attribute") => parse_add_attribute(rest),
        _ => Command::Invalid(Usage::Add),
    }
}

fn parse_add_element(line: &str, args: &[Word<'_>]) -> Command {
    let invalid = Command::Invalid(Usage::AddElement);
    let [parent, child, content @ ..] = args else {
        return invalid;
    };
    if !parent.is_identifier() || !child.is_identifier() {
        return invalid;
    }
    if !content.iter().all(Word::is_identifier) {
        return invalid;
    }

    // Content keeps its inner spacing, so it is cut from the line rather than
    // re-joined from words.
    let content = content
        .first()
        .map(|first| line[first.start..].trim_end().to_string());

    Command::AddElement {
        parent: parent.text.to_string(),
        child: child.text.to_string(),
        content,
    }
}

fn parse_add_attribute(args: &[Word<'_>]) -> Command {
    match args {
        [parent, key, value] if args.iter().all(Word::is_identifier) => Command::AddAttribute {
            parent: parent.text.to_string(),
            key: key.text.to_string(),
            value: value.text.to_string(),
        },
        _ => Command::Invalid(Usage::AddAttribute),
    }
}

fn parse_print(args: &[Word<'_>]) -> Command {
    match args {
        [] => Command::Print { root: None },
        [name] if name.is_identifier() => Command::Print {
            root: Some(name.text.to_string()),
        },
        _ => Command::Invalid(Usage::Print),
    }
}

fn parse_write(args: &[Word<'_>]) -> Command {
    match args {
        [path] if path.is_path() => Command::Write {
            path: path.text.to_string(),
        },
        _ => Command::Invalid(Usage::Write),
    }
}

fn parse_delete(args: &[Word<'_>]) -> Command {
    match args {
        [name] if name.is_identifier() => Command::Delete {
            name: name.text.to_string(),
        },
        _ => Command::Invalid(Usage::Delete),
    }
}
