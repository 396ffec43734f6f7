use console::Term;
use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;

/// Operator-facing line I/O used by the interactive session and by batch
/// confirmations
pub trait Terminal {
    fn write_line(&mut self, line: &str);

    /// Shows `prompt` and reads one line without its newline. `None` means
    /// the input stream is closed.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    fn clear(&mut self);

    fn pause(&mut self, duration: Duration);
}

/// All output goes through `console::Term`; input comes from std stdin
pub struct ConsoleTerminal {
    term: Term,
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for ConsoleTerminal {
    fn write_line(&mut self, line: &str) {
        let _ = self.term.write_line(line);
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let _ = self.term.write_str(prompt);
        let _ = self.term.flush();

        // `Term::read_line` gives an empty string when stdin is not a tty
        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input.trim_end_matches(['\n', '\r']).to_string()),
        }
    }

    fn clear(&mut self) {
        let _ = self.term.clear_screen();
    }

    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// `s`, `sim`, `y` or `yes`, case-insensitive
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}

/// Words that end the engine recovery loop
pub fn is_quit(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "sair" | "exit" | "quit" | "q"
    )
}
