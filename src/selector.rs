use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};

use crate::model::{CandidateSet, Level};

/// Numbered single-shot prompt over the operator's streams.
///
/// A lone candidate is picked without reading input. Anything else reads one
/// line; a non-numeric or out-of-range answer aborts instead of re-prompting.
pub struct Selector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Selector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn select(&mut self, level: Level, mut candidates: CandidateSet) -> Result<String> {
        if candidates.is_empty() {
            bail!("no {level} found");
        }

        self.render(level, &candidates)
            .context("failed to write selection prompt")?;

        let number = if candidates.len() == 1 {
            writeln!(self.output, "1").context("failed to write selection prompt")?;
            1
        } else {
            self.output
                .flush()
                .context("failed to flush selection prompt")?;
            self.read_number()?
        };

        let Some(position) = usize::try_from(number)
            .ok()
            .filter(|position| (1..=candidates.len()).contains(position))
        else {
            bail!("invalid number: {number}");
        };
        Ok(candidates.swap_remove(position - 1))
    }

    fn render(&mut self, level: Level, candidates: &[String]) -> std::io::Result<()> {
        writeln!(self.output, "\nchoose {level}:")?;
        for (index, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "{}: {candidate}", index + 1)?;
        }
        write!(self.output, "input number: ")
    }

    fn read_number(&mut self) -> Result<i64> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read selection")?;
        if read == 0 {
            bail!("no selection entered");
        }
        let raw = line.trim();
        raw.parse::<i64>()
            .with_context(|| format!("failed to parse selection {raw:?}"))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
