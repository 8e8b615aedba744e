use std::io::{BufRead, BufReader, Stdin, Write};

use itinera_core::planner::Confirm;

/// Asks on the terminal, or answers "yes" when run with `--yes`.
pub struct Prompt<R> {
    assume_yes: bool,
    input: R,
}

impl Prompt<BufReader<Stdin>> {
    /// Stdin is only locked while an answer is read.
    pub fn stdin(assume_yes: bool) -> Self {
        Self::new(assume_yes, BufReader::new(std::io::stdin()))
    }
}

impl<R: BufRead> Prompt<R> {
    pub fn new(assume_yes: bool, input: R) -> Self {
        Self { assume_yes, input }
    }
}

impl<R: BufRead> Confirm for Prompt<R> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            tracing::debug!(prompt, "Confirmed by --yes");
            return true;
        }

        eprint!("{prompt} [y/N] ");
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
