/// A parsed command line.
///
/// Commands are transient: the parser produces one per input line and the
/// interpreter consumes it in a single dispatch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The line was blank.
    Empty,
    /// `quit` or `exit`.
    Quit,
    /// `add element <parent> <child> [content]`
    AddElement {
        parent: String,
        child: String,
        content: Option<String>,
    },
    /// `add attribute <parent> <key> <value>`
    AddAttribute {
        parent: String,
        key: String,
        value: String,
    },
    /// `print [name]`
    Print { root: Option<String> },
    /// `write <path>`
    Write { path: String },
    /// `delete <name>` or `del <name>`
    Delete { name: String },
    /// `help`
    Help,
    /// The line did not match the command vocabulary.
    Invalid(Usage),
}

impl Command {
    /// Short verb name, used for logging.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Empty => "empty",
            Command::Quit => "quit",
            Command::AddElement { .. } => "add-element",
            Command::AddAttribute { .. } => "add-attribute",
            Command::Print { .. } => "print",
            Command::Write { .. } => "write",
            Command::Delete { .. } => "delete",
            Command::Help => "help",
            Command::Invalid(_) => "invalid",
        }
    }
}

/// Which usage message to show for an invalid command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    /// Unknown verb.
    General,
    /// `add` with a second word other than `element` or `attribute`.
    Add,
    AddElement,
    AddAttribute,
    Print,
    Write,
    Delete,
}

impl Usage {
    /// The exact text printed for this usage class, one line per `\n`.
    pub fn message(self) -> &'static str {
        match self {
            Usage::General => {
                "Invalid command.  Acceptable commands are \"add\", \"print\", \
                 \"write\", \"delete\", \"help\", and \"quit\"."
            }
            Usage::Add => {
                "Invalid \"add\" command: 2nd parameter must be \"element\" or \"attribute\".\n\
                 Valid signatures for add are:\n\
                 > add element [parent name] [child name]\n\
                 > add element [parent name] [child name] [child content]\n\
                 > add attribute [parent name] [key] [value]"
            }
            Usage::AddElement => {
                "Invalid \"add element\" command. Valid signatures for add element are:\n\
                 > add element [parent name] [child name]\n\
                 > add element [parent name] [child name] [child content]"
            }
            Usage::AddAttribute => {
                "Invalid \"add attribute\" command. Valid signature for add attribute is:\n\
                 > add attribute [parent name] [key] [value]"
            }
            Usage::Print => {
                "Invalid print command. The optional parameter specifies the node to \
                 treat as the root of the output.\n\
                 Valid signatures for print are:\n\
                 > print\n\
                 > print [root name]"
            }
            Usage::Write => {
                "Invalid Write Command. Valid signature for write is:\n\
                 > write [file path]"
            }
            Usage::Delete => {
                "Invalid \"delete\" command. Valid signature for delete is:\n\
                 > delete [element name]"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_lists_every_signature() {
        let add = Usage::Add.message();
        assert!(add.contains("> add element [parent name] [child name]\n"));
        assert!(add.contains("> add attribute [parent name] [key] [value]"));
        assert_eq!(Usage::Print.message().lines().count(), 4);
        assert!(Usage::Delete.message().ends_with("> delete [element name]"));
    }

    #[test]
    fn test_general_usage_is_one_line() {
        assert_eq!(Usage::General.message().lines().count(), 1);
        assert!(Usage::General.message().contains("Acceptable commands are \"add\""));
    }

    #[test]
    fn test_verb_names() {
        assert_eq!(Command::Help.verb(), "help");
        assert_eq!(Command::Invalid(Usage::Write).verb(), "invalid");
    }
}
