//! Interactive multi-choice prompt on a terminal.
//!
//! Choices are listed a page at a time. The operator answers with indices and
//! ranges (`1 3 5-7`), `all`, or an empty line for none; `n`/`p` page through
//! the list.

use std::collections::BTreeSet;
use std::io::{BufRead, Write};

use crate::error::EngineError;
use crate::select::{Choice, Selector};

/// Lines taken by the title and the instructions around each page.
const CHROME_LINES: usize = 6;

/// Page size used when the terminal height is unknown.
const DEFAULT_PAGE_SIZE: usize = 10;

/// Page size derived from the terminal height in `LINES`.
///
/// Most shells set `LINES` without exporting it, so child processes usually
/// see no terminal height and get a page of 10. Pass an explicit page size
/// (`--page-size`) to use more of a tall terminal.
pub fn default_page_size() -> usize {
    page_size_for(std::env::var("LINES").ok().as_deref())
}

fn page_size_for(lines: Option<&str>) -> usize {
    lines
        .and_then(|l| l.trim().parse::<usize>().ok())
        .map(|rows| rows.saturating_sub(CHROME_LINES))
        .filter(|&size| size > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// [`Selector`] that asks an operator through a line-oriented terminal.
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl PromptSelector<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr and read answers from stdin.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    /// Read answers from `input` and write pages and prompts to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn show_page(
        &mut self,
        title: &str,
        choices: &[Choice<'_>],
        page: usize,
        page_size: usize,
    ) -> std::io::Result<()> {
        let pages = choices.len().div_ceil(page_size).max(1);
        writeln!(self.output, "{title}")?;
        for (index, choice) in choices
            .iter()
            .enumerate()
            .skip(page * page_size)
            .take(page_size)
        {
            writeln!(self.output, "  [{:>3}] {}", index + 1, choice.label())?;
        }
        if pages > 1 {
            writeln!(
                self.output,
                "  page {}/{} (`n` next, `p` previous)",
                page + 1,
                pages
            )?;
        }
        write!(
            self.output,
            "Select (e.g. `1 3 5-7`, `all`, empty for none): "
        )?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> Selector for PromptSelector<R, W> {
    fn select(
        &mut self,
        title: &str,
        choices: &[Choice<'_>],
        page_size: usize,
    ) -> Result<Vec<String>, EngineError> {
        if choices.is_empty() {
            return Ok(Vec::new());
        }
        let page_size = page_size.max(1);
        let last_page = (choices.len() - 1) / page_size;
        let mut page = 0;

        loop {
            self.show_page(title, choices, page, page_size)
                .map_err(|source| EngineError::Prompt { source })?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|source| EngineError::Prompt { source })?;
            if read == 0 {
                // Input closed: nothing chosen.
                return Ok(Vec::new());
            }

            match line.trim() {
                "n" => page = (page + 1).min(last_page),
                "p" => page = page.saturating_sub(1),
                answer => match parse_selection(answer, choices.len()) {
                    Ok(indices) => {
                        return Ok(indices
                            .into_iter()
                            .filter_map(|i| choices.get(i))
                            .map(Choice::key)
                            .collect())
                    }
                    Err(message) => {
                        writeln!(self.output, "  {message}")
                            .map_err(|source| EngineError::Prompt { source })?;
                    }
                },
            }
        }
    }
}

/// Parse an answer into sorted, de-duplicated zero-based indices below `count`.
pub fn parse_selection(answer: &str, count: usize) -> Result<Vec<usize>, String> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("all") {
        return Ok((0..count).collect());
    }

    let mut indices = BTreeSet::new();
    for token in answer.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let (start, end) = match token.split_once('-') {
            Some((a, b)) => (parse_index(a, count)?, parse_index(b, count)?),
            None => {
                let i = parse_index(token, count)?;
                (i, i)
            }
        };
        if start > end {
            return Err(format!("`{token}` is not an ascending range"));
        }
        indices.extend(start..=end);
    }
    Ok(indices.into_iter().collect())
}

fn parse_index(token: &str, count: usize) -> Result<usize, String> {
    match token.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
        _ => Err(format!("`{token}` is not a number between 1 and {count}")),
    }
}
