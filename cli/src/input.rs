use std::io::BufRead;
use tracing::debug;

/// Line-oriented operator input.
pub trait LineInput {
    /// Next line without its line terminator; `None` at end of input.
    fn read_line(&mut self) -> Option<String>;
}

/// Reads from standard input; works with pipes as well as terminals.
#[derive(Debug, Default)]
pub struct StdinInput;

impl LineInput for StdinInput {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                debug!(error = %e, "stdin read failed");
                None
            }
        }
    }
}
