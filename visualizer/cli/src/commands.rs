//! Interactive stdin commands

/// One line of interactive input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start a run, optionally naming the algorithm
    Start(Option<String>),
    /// Pause the active run
    Pause,
    /// Resume a paused run
    Resume,
    /// Pause or resume, whichever applies
    Toggle,
    /// Request a new bar count (raw text, debounced)
    Size(String),
    /// Regenerate the input at its current size
    Shuffle,
    /// Cancel the active run
    Cancel,
    /// Show the current state
    Status,
    /// List the algorithms
    List,
    /// Show the command list
    Help,
    /// Leave the session
    Quit,
    /// Blank line
    Empty,
    /// Anything else
    Unknown(String),
}

pub const HELP: &str = "\
commands:
  start [name]   sort the current input (default algorithm if no name)
  pause | resume pause or resume the run (p toggles)
  size <n>       change the number of bars
  shuffle        generate a new input
  cancel         stop the run
  status         show the playback state
  list           list the algorithms
  quit           leave";

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Self::Empty;
        };
        let rest = words.collect::<Vec<_>>().join(" ");
        let arg = (!rest.is_empty()).then_some(rest);

        match head.to_ascii_lowercase().as_str() {
            "start" | "run" | "s" => Self::Start(arg),
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "p" | "toggle" => Self::Toggle,
            "size" | "n" => Self::Size(arg.unwrap_or_default()),
            "shuffle" | "new" => Self::Shuffle,
            "cancel" | "stop" => Self::Cancel,
            "status" => Self::Status,
            "list" | "ls" => Self::List,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Unknown(line.trim().to_string()),
        }
    }
}
