use crate::command::Command;
use crate::document::{Document, NodeId};
use crate::error::SessionError;
use crate::io_adapters::{self, EditorSource, LineSource, ReaderSource};
use crate::parser;
use crate::prompt::Console;
use crate::resolver;
use crate::table;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Main command prompt.
pub const PROMPT: &str = "Your command: ";

/// Name argument that always designates the root element.
pub const ROOT_KEYWORD: &str = "root";

/// Name given to the root element of a fresh session.
pub const DEFAULT_ROOT_NAME: &str = "document";

const DISPLAY_WIDTH: usize = 80;
const HELP_LEFT_WIDTH: usize = "add attribute".len() + 1;
const TAB_SIZE: usize = 4;

const HELP_NAMES: [&str; 7] = [
    "add element",
    "add attribute",
    "print",
    "write",
    "delete",
    "help",
    "quit",
];

const HELP_DESCRIPTIONS: [&str; 7] = [
    "Add Element [parent name] [child name] <child content?>: Adds an element with the \
     specified name to the specified parent. Optionally, element content can be specified. \
     Specify \"root\" as the parent name to add a child to the root.",
    "Add Attribute [parent name] [key] [value]: Adds an attribute with the specified \
     key/value pair to the specified parent.",
    "Print <node name?>: Outputs the document, starting with its root element and the \
     root's attributes, to standard out. If a <node name> is specified, it will be used \
     as the root of the output document.",
    "Write [file path]: Outputs the current document to a file specified by [file path].",
    "Delete [element name]: Finds the element specified by [element name] and removes it \
     and everything below it from the document.",
    "Help: Displays this help menu.",
    "Quit: \"quit\" or \"exit\" may be used to quit the program.",
];

/// Whether the session keeps reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Terminated,
}

/// Read-parse-execute loop over a single document.
///
/// The interpreter owns the document for the whole session. Commands come
/// either from the console or from an autoexec script; nested questions
/// (which element did you mean, are you sure) are always asked on the console.
///
/// Example
/// ```
/// use dom_shell::document::Document;
/// use dom_shell::io_adapters::{MemWriter, ScriptedSource};
/// use dom_shell::prompt::Console;
/// use dom_shell::Interpreter;
///
/// let console = Console::new(
///     Box::new(ScriptedSource::new(["add element root a", "quit"])),
///     Box::new(MemWriter::new()),
/// );
/// let mut sh = Interpreter::new(Document::new("document").unwrap(), console);
/// sh.run_interactive().unwrap();
/// assert_eq!(sh.document().find_by_name("a").len(), 1);
/// ```
pub struct Interpreter {
    doc: Document,
    console: Console,
}

impl Interpreter {
    pub fn new(doc: Document, console: Console) -> Self {
        Self { doc, console }
    }

    /// An interpreter on the terminal: `rustyline` for input, stdout for output.
    ///
    /// Falls back to plain buffered stdin when the line editor is unavailable.
    pub fn with_terminal() -> Result<Self, SessionError> {
        let doc = Document::new(DEFAULT_ROOT_NAME)?;
        let input: Box<dyn LineSource> = match EditorSource::new() {
            Ok(editor) => Box::new(editor),
            Err(e) => {
                log::warn!("line editor unavailable, reading stdin directly: {}", e);
                Box::new(ReaderSource::new(io::stdin().lock()))
            }
        };
        Ok(Self::new(doc, Console::new(input, Box::new(io::stdout()))))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Print the program banner.
    pub fn greet(&mut self) -> Result<(), SessionError> {
        let out = self.console.out();
        writeln!(out, "DOM shell: build an XML document one command at a time")?;
        writeln!(out, "Type \"help\" for command reference")?;
        Ok(())
    }

    /// Run a session, replaying `script` first when one is given.
    pub fn run(&mut self, script: Option<&Path>) -> Result<(), SessionError> {
        match script {
            Some(path) => self.run_script_file(path),
            None => self.run_interactive(),
        }
    }

    /// Prompt for commands until `quit` or the end of input.
    pub fn run_interactive(&mut self) -> Result<(), SessionError> {
        loop {
            writeln!(self.console.out())?;
            let Some(line) = self.console.read_line(PROMPT)? else {
                log::info!("input closed, ending session");
                writeln!(self.console.out())?;
                return Ok(());
            };
            if self.execute_line(&line)? == SessionState::Terminated {
                return Ok(());
            }
        }
    }

    /// Open an autoexec script and run it; an unreadable script only
    /// produces a notice before the interactive prompt takes over.
    pub fn run_script_file(&mut self, path: &Path) -> Result<(), SessionError> {
        writeln!(self.console.out())?;
        match File::open(path) {
            Ok(file) => {
                log::info!("loaded autoexec script {}", path.display());
                writeln!(
                    self.console.out(),
                    "Autoexec successfully loaded from file: {}",
                    path.display()
                )?;
                self.run_script(BufReader::new(file))
            }
            Err(e) => {
                log::warn!("cannot open autoexec script {}: {}", path.display(), e);
                writeln!(
                    self.console.out(),
                    "Error: Failed to load autoexec from file: {}",
                    path.display()
                )?;
                self.run_interactive()
            }
        }
    }

    /// Replay commands from `script`, echoing each one. A `quit` line ends
    /// the session; otherwise the interactive prompt follows.
    pub fn run_script<R: BufRead>(&mut self, mut script: R) -> Result<(), SessionError> {
        while let Some(line) = io_adapters::read_lossy_line(&mut script)? {
            if line.len() <= 1 {
                continue;
            }
            writeln!(self.console.out(), "\nAutoexec: {}", line)?;
            if self.execute_line(&line)? == SessionState::Terminated {
                return Ok(());
            }
        }
        self.run_interactive()
    }

    /// Parse and execute one line.
    pub fn execute_line(&mut self, line: &str) -> Result<SessionState, SessionError> {
        let command = parser::parse_line(line);
        log::debug!("parsed {:?} as {}", line, command.verb());
        self.execute(command)
    }

    fn execute(&mut self, command: Command) -> Result<SessionState, SessionError> {
        match command {
            Command::Quit => return Ok(SessionState::Terminated),
            Command::Empty => {}
            Command::AddElement {
                parent,
                child,
                content,
            } => self.add_element(&parent, &child, content.as_deref())?,
            Command::AddAttribute { parent, key, value } => self.add_attribute(&parent, &key, &value)?,
            Command::Print { root } => self.print(root.as_deref())?,
            Command::Write { path } => self.write(&path)?,
            Command::Delete { name } => self.delete(&name)?,
            Command::Help => self.help()?,
            Command::Invalid(usage) => writeln!(self.console.out(), "{}", usage.message())?,
        }
        Ok(SessionState::Running)
    }

    /// Candidate set for a name argument.
    fn lookup(&self, name: &str) -> Vec<NodeId> {
        if name.eq_ignore_ascii_case(ROOT_KEYWORD) {
            vec![self.doc.root()]
        } else {
            self.doc.find_by_name(name)
        }
    }

    /// Resolve a name argument to one element, asking the user if needed.
    fn select(&mut self, name: &str) -> Result<Option<NodeId>, SessionError> {
        let candidates = self.lookup(name);
        resolver::resolve(&self.doc, &candidates, &mut self.console)
    }

    fn not_found(&mut self, name: &str) -> Result<(), SessionError> {
        writeln!(
            self.console.out(),
            "No element with the name \"{}\" could be found.",
            name
        )?;
        Ok(())
    }

    fn add_element(&mut self, parent_name: &str, child: &str, content: Option<&str>) -> Result<(), SessionError> {
        let Some(parent) = self.select(parent_name)? else {
            return self.not_found(parent_name);
        };
        let Some(node) = self.doc.create_element(parent, child) else {
            return self.not_found(parent_name);
        };

        let content_note = match content {
            Some(text) => {
                self.doc.create_text(node, text);
                format!("with content \"{}\"", text)
            }
            None => "(with no content)".to_string(),
        };
        let parent_label = self.doc.name(parent).unwrap_or(parent_name).to_string();
        writeln!(
            self.console.out(),
            "Element \"{}\" {} was successfully appended to parent Element \"{}\".",
            child,
            content_note,
            parent_label
        )?;
        Ok(())
    }

    fn add_attribute(&mut self, parent_name: &str, key: &str, value: &str) -> Result<(), SessionError> {
        let Some(parent) = self.select(parent_name)? else {
            return self.not_found(parent_name);
        };
        if !self.doc.set_attribute(parent, key, value) {
            return self.not_found(parent_name);
        }
        writeln!(
            self.console.out(),
            "Attribute \"{}\" with value \"{}\" was successfully added to Element \"{}\".",
            key,
            value,
            parent_name
        )?;
        Ok(())
    }

    fn print(&mut self, root_name: Option<&str>) -> Result<(), SessionError> {
        let target = match root_name {
            Some(name) => match self.select(name)? {
                Some(node) => node,
                None => return self.not_found(name),
            },
            None => {
                let root = self.doc.root();
                if self.doc.children(root).is_empty() && self.doc.attributes(root).next().is_none() {
                    writeln!(self.console.out(), "Document is empty.")?;
                    return Ok(());
                }
                root
            }
        };

        let mut rendered = String::new();
        self.render_subtree(target, 0, &mut rendered);
        write!(self.console.out(), "{}", rendered)?;
        Ok(())
    }

    /// Indented outline of `node`: the element line, its attributes, then its
    /// element children one level deeper.
    fn render_subtree(&self, node: NodeId, depth: usize, out: &mut String) {
        let Some(name) = self.doc.name(node) else { return };
        let indent = " ".repeat(depth * TAB_SIZE);
        let inner = " ".repeat((depth + 1) * TAB_SIZE);

        out.push_str(&format!("{}[Node] {}", indent, name));
        if let Some(text) = self.doc.first_text(node) {
            out.push_str(&format!(": {}", text));
        }
        out.push('\n');

        for (key, value) in self.doc.attributes(node) {
            out.push_str(&format!("{}[Attribute] {}: {}\n", inner, key, value));
        }
        for child in self.doc.children(node) {
            self.render_subtree(*child, depth + 1, out);
        }
    }

    fn write(&mut self, path: &str) -> Result<(), SessionError> {
        let message = match self.doc.serialize(Path::new(path)) {
            Ok(()) => "The document was successfully written to the file:",
            Err(e) => {
                log::warn!("serializing to {} failed: {}", path, e);
                "There was an error writing the document to the file:"
            }
        };
        writeln!(self.console.out(), "{} \"{}\"", message, path)?;
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), SessionError> {
        let Some(target) = self.select(name)? else {
            return self.not_found(name);
        };
        if !self
            .console
            .confirm("Are you sure you would like to delete this node?")?
        {
            return Ok(());
        }

        if self.doc.remove_from_parent(target) {
            writeln!(self.console.out(), "Successfully deleted element \"{}\"", name)?;
        } else {
            writeln!(
                self.console.out(),
                "Error: Element \"{}\" could not be removed from the document.",
                name
            )?;
        }
        Ok(())
    }

    fn help(&mut self) -> Result<(), SessionError> {
        match table::render_two_columns(
            &HELP_NAMES,
            &HELP_DESCRIPTIONS,
            HELP_LEFT_WIDTH,
            DISPLAY_WIDTH - HELP_LEFT_WIDTH,
        ) {
            Ok(text) => write!(self.console.out(), "{}", text)?,
            Err(e) => {
                log::error!("help table: {}", e);
                writeln!(self.console.out(), "Error: {}", e)?;
            }
        }
        Ok(())
    }
}
