use std::io::{self, Write};

use chrono::{Local, NaiveDateTime};

/// Console status printer with an optional timestamp prefix and in-place
/// refresh of the current line.
pub struct TerminalPrinter<W: Write = io::Stdout> {
    out: W,
    quiet: bool,
    /// The previous message was written with `\r` and left the line open.
    was_refreshed: bool,
}

impl TerminalPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Default for TerminalPrinter<io::Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> TerminalPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            quiet: false,
            was_refreshed: false,
        }
    }

    /// Discard every message from now on.
    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    pub fn was_refreshed(&self) -> bool {
        self.was_refreshed
    }

    /// Print `text`.
    ///
    /// With `flush`, the message overwrites the current line and leaves it
    /// open; the next regular message starts on a fresh line. With
    /// `show_time`, the message is prefixed by `[DD:MM:YYYY-HH:MM:SS] `.
    pub fn print(&mut self, text: &str, flush: bool, show_time: bool) {
        if self.quiet {
            return;
        }

        let prefix = if show_time {
            format!("{} ", format_time(Local::now().naive_local()))
        } else {
            String::new()
        };

        // Status output is best effort; a closed stdout must not abort a run.
        if flush {
            let _ = write!(self.out, "\r{}{}", prefix, text);
            let _ = self.out.flush();
            self.was_refreshed = true;
        } else {
            let lead = if self.was_refreshed { "\n" } else { "" };
            let _ = writeln!(self.out, "{}{}{}", lead, prefix, text);
            self.was_refreshed = false;
        }
    }

    /// Timestamped message on its own line.
    pub fn message(&mut self, text: &str) {
        self.print(text, false, true);
    }

    /// Timestamped message refreshing the current line.
    pub fn progress(&mut self, text: &str) {
        self.print(text, true, true);
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Bracketed `[DD:MM:YYYY-HH:MM:SS]` stamp used in front of status messages.
pub fn format_time(now: NaiveDateTime) -> String {
    format!("[{}]", now.format("%d:%m:%Y-%H:%M:%S"))
}
