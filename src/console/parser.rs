//! Command line parser
//!
//! Whitespace split, command plus at most two arguments. Extra tokens are
//! ignored.

/// Maximum number of arguments kept.
pub const MAX_ARGS: usize = 2;

/// Parsed command line, borrowing from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    /// First token, empty for a blank line
    pub command: &'a str,
    pub args: [Option<&'a str>; MAX_ARGS],
}

impl<'a> ParsedCommand<'a> {
    /// Get argument by index (0-based)
    pub fn arg(&self, idx: usize) -> Option<&'a str> {
        self.args.get(idx).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }
}

/// Parse a command line into command and arguments
pub fn parse_line(line: &str) -> ParsedCommand<'_> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");

    let mut args = [None; MAX_ARGS];
    for (slot, arg) in args.iter_mut().zip(parts) {
        *slot = Some(arg);
    }

    ParsedCommand { command, args }
}
