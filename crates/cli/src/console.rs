use chatstat_core::application::DailyTopWords;
use chatstat_core::ports::{Confirmation, Result};
use std::io::{BufRead, Write};
use std::path::Path;

/// Asks the operator after each render whether to keep the word cloud.
pub struct PromptConfirmation<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirmation<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirmation for PromptConfirmation<R, W> {
    fn confirm(&mut self, attempt: u32, output: &Path) -> Result<bool> {
        write!(
            self.output,
            "Word cloud written to {} (attempt {}). Satisfied? [1/y keeps it, anything else regenerates] ",
            output.display(),
            attempt
        )?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            // stdin closed, nobody left to ask
            writeln!(self.output)?;
            return Ok(true);
        }
        Ok(is_affirmative(&answer))
    }
}

/// Accepts the first render.
#[derive(Debug, Default)]
pub struct AlwaysAccept;

impl Confirmation for AlwaysAccept {
    fn confirm(&mut self, _attempt: u32, _output: &Path) -> Result<bool> {
        Ok(true)
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "1" | "y" | "yes")
}

/// One word per line.
pub fn write_words<W: Write>(out: &mut W, words: &[String]) -> std::io::Result<()> {
    for word in words {
        writeln!(out, "{}", word)?;
    }
    Ok(())
}

/// A date line followed by that day's words.
pub fn write_daily<W: Write>(out: &mut W, daily: &[DailyTopWords]) -> std::io::Result<()> {
    for day in daily {
        writeln!(out, "{}", day.date)?;
        write_words(out, &day.words)?;
    }
    Ok(())
}
