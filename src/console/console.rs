//! Byte-at-a-time line editor feeding the command table.

use core::fmt::Write;

use super::{execute, parse_line, ConsoleError, LineBuffer};

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Prompt shown after every line.
pub const PROMPT: &str = "cw> ";

/// Console line state
pub struct Console {
    line: LineBuffer,
}

impl Console {
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    /// Process a single input byte
    ///
    /// Returns Some(result) once a non-blank line was executed, None while
    /// the line is still being typed.
    pub fn process_byte(&mut self, byte: u8, out: &mut dyn Write) -> Option<Result<(), ConsoleError>> {
        match byte {
            // Enter
            b'\r' | b'\n' => {
                let _ = writeln!(out);
                if self.line.is_empty() {
                    self.print_prompt(out);
                    return None;
                }

                let result = execute(&parse_line(self.line.as_str()), out);
                if let Err(e) = result {
                    let _ = writeln!(out, "{}", e);
                }
                self.line.clear();
                self.print_prompt(out);
                Some(result)
            }

            // Backspace / DEL
            0x7F | 0x08 => {
                if self.line.backspace() {
                    let _ = write!(out, "\x08 \x08");
                }
                None
            }

            // Ctrl+C
            0x03 => {
                let _ = writeln!(out, "^C");
                self.line.clear();
                self.print_prompt(out);
                None
            }

            // Ctrl+U
            0x15 => {
                for _ in 0..self.line.len() {
                    let _ = write!(out, "\x08 \x08");
                }
                self.line.clear();
                None
            }

            0x20..=0x7E => {
                if self.line.push(byte) {
                    let _ = out.write_char(byte as char);
                }
                None
            }

            _ => None,
        }
    }

    /// Current line contents.
    pub fn line(&self) -> &str {
        self.line.as_str()
    }

    pub fn print_prompt(&self, out: &mut dyn Write) {
        let _ = write!(out, "{}", PROMPT);
    }

    pub fn print_banner(&self, out: &mut dyn Write) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", VERSION);
        let _ = writeln!(out, "Type 'help' for commands.");
        self.print_prompt(out);
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
