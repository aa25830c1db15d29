use std::io::Write;
use tracing::debug;

/// Width of the message printer, dash rule included
pub const LINE_WIDTH: usize = 79;

/// Operator-facing output of the shell.
pub struct Console {
    out: Box<dyn Write>,
}

impl Console {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self { out }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            debug!(error = %e, "console write failed");
        }
    }

    pub fn line(&mut self, text: &str) {
        self.emit(&format!("{}\n", text));
    }

    /// Print without a trailing newline, for input prompts.
    pub fn prompt(&mut self, text: &str) {
        self.emit(text);
    }

    pub fn warn(&mut self, message: &str) {
        self.line(&format!("!!! {} !!!", message));
    }

    pub fn success(&mut self) {
        self.line("Success!");
    }

    /// Title framed above and below by dashes of the same length.
    pub fn banner(&mut self, title: &str) {
        let rule = "-".repeat(title.chars().count());
        self.emit(&format!("{}\n{}\n{}\n", rule, title, rule));
    }

    /// Word-wrapped messages closed by a dash rule.
    pub fn messages(&mut self, messages: &[String], prefix: Option<&str>) {
        let mut text = wrap_messages(messages, LINE_WIDTH, prefix).join("\n");
        text.push('\n');
        self.emit(&text);
    }
}

/// Wrap messages to `width` columns.
///
/// The first line of each message carries the prefix right-aligned in three
/// columns (or its number when there is no prefix); continuation lines are
/// indented by four spaces. Newlines inside a message force a break.
pub fn wrap_messages(messages: &[String], width: usize, prefix: Option<&str>) -> Vec<String> {
    let limit = width.saturating_sub(4);
    let mut out = Vec::new();

    for (i, message) in messages.iter().enumerate() {
        let mut lines: Vec<String> = Vec::new();
        for paragraph in message.replace('\r', "").split('\n') {
            let mut line = String::new();
            for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
                if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > limit {
                    lines.push(std::mem::take(&mut line));
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
            }
            if !line.is_empty() {
                lines.push(line);
            }
        }

        for (k, line) in lines.iter().enumerate() {
            let rendered = match (k, prefix) {
                (0, Some(prefix)) => {
                    let prefix: String = prefix.chars().take(2).collect();
                    format!("{:>3} {}", prefix, line)
                }
                (0, None) => format!("{:2}. {}", i + 1, line),
                _ => format!("    {}", line),
            };
            out.push(rendered);
        }
    }

    out.push("-".repeat(width));
    out
}
