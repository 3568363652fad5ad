//! The interactive gate in front of the irreversible edit phase.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::error::JobError;

/// Asks the operator to type back the number of comments before editing.
pub struct ConfirmationGate<R, W> {
    input: R,
    output: W,
}

impl<R, W> ConfirmationGate<R, W>
where
    R: BufRead,
    W: Write,
{
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompt until the exact `total` or a cancel (`n`/`N`) is entered.
    ///
    /// Any other answer re-prompts. End of input counts as a cancel.
    ///
    /// # Errors
    ///
    /// - `JobError::Declined` if the operator cancels
    /// - `JobError::Prompt` if reading or writing the terminal fails
    pub fn ask(&mut self, total: usize, unique: usize, workspace: &Path) -> Result<(), JobError> {
        writeln!(
            self.output,
            "Found {} ({} unique) comments to edit, to continue, enter the number of comments, 'n'/'N' to cancel.",
            group_thousands(total),
            group_thousands(unique),
        )
        .map_err(JobError::Prompt)?;
        writeln!(
            self.output,
            "Note: It is recommended to view the comments that will be edited (by looking at the files in the {}/ directory) before continuing.",
            workspace.display()
        )
        .map_err(JobError::Prompt)?;

        let expected = total.to_string();
        let mut line = String::new();
        loop {
            self.output.flush().map_err(JobError::Prompt)?;
            line.clear();
            let read = self.input.read_line(&mut line).map_err(JobError::Prompt)?;
            let answer = line.trim();

            if read == 0 || answer.eq_ignore_ascii_case("n") {
                writeln!(self.output, "Exiting...").map_err(JobError::Prompt)?;
                return Err(JobError::Declined);
            }
            if answer == expected {
                return Ok(());
            }
            writeln!(self.output, "Invalid input, try again.").map_err(JobError::Prompt)?;
        }
    }
}

/// `1234567` -> `1,234,567`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
