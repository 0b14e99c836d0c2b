//! Ordering cached coordinates and choosing which ones to generate typings for.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use typings_util::coordinate::DependencyCoordinate;

use crate::error::EngineError;

/// One selectable entry shown to a [`Selector`].
#[derive(Debug, Clone, Copy)]
pub struct Choice<'a> {
    /// The coordinate behind this choice.
    pub coordinate: &'a DependencyCoordinate,
}

impl Choice<'_> {
    /// Label shown to the operator.
    pub fn label(&self) -> String {
        self.coordinate.label()
    }

    /// Key returned by the selector to identify this choice.
    pub fn key(&self) -> String {
        self.coordinate.identity_key()
    }
}

/// Strategy that picks a subset of choices.
pub trait Selector {
    /// Return the keys of the chosen entries.
    ///
    /// # Errors
    /// Returns an error if the selection cannot be obtained (e.g. the terminal closed).
    fn select(
        &mut self,
        title: &str,
        choices: &[Choice<'_>],
        page_size: usize,
    ) -> Result<Vec<String>, EngineError>;
}

/// Non-interactive selection for headless runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSelector {
    /// Every matching archive.
    All,
    /// The highest version of each `group:artifact`.
    Latest,
}

impl Selector for RuleSelector {
    fn select(
        &mut self,
        _title: &str,
        choices: &[Choice<'_>],
        _page_size: usize,
    ) -> Result<Vec<String>, EngineError> {
        match self {
            RuleSelector::All => Ok(choices.iter().map(Choice::key).collect()),
            RuleSelector::Latest => Ok(latest_versions(choices)),
        }
    }
}

fn latest_versions(choices: &[Choice<'_>]) -> Vec<String> {
    let mut best: HashMap<(&str, &str), &DependencyCoordinate> = HashMap::new();
    for choice in choices {
        let c = choice.coordinate;
        best.entry((c.group.as_str(), c.artifact.as_str()))
            .and_modify(|current| {
                if compare_versions(&c.version, &current.version) == Ordering::Greater {
                    *current = c;
                }
            })
            .or_insert(c);
    }
    // Report in presentation order, not hash order.
    choices
        .iter()
        .filter(|choice| {
            let c = choice.coordinate;
            best.get(&(c.group.as_str(), c.artifact.as_str()))
                .is_some_and(|winner| std::ptr::eq(*winner, c))
        })
        .map(Choice::key)
        .collect()
}

/// Sort by artifact, then by version with numeric-aware comparison, and drop
/// duplicate identity keys (first occurrence wins). The sort is stable.
pub fn sort_coordinates(coordinates: &mut Vec<DependencyCoordinate>) {
    coordinates.sort_by(|a, b| {
        a.artifact
            .cmp(&b.artifact)
            .then_with(|| compare_versions(&a.version, &b.version))
    });
    let mut seen = HashSet::new();
    coordinates.retain(|c| seen.insert(c.identity_key()));
}

/// Compare two version strings treating digit runs as numbers and ignoring
/// ASCII case elsewhere, so `"2" < "10"` and `"1.0-rc" == "1.0-RC"`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = compare_chunks(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn compare_chunks(l: &str, r: &str) -> Ordering {
    let l_digits = l.starts_with(|c: char| c.is_ascii_digit());
    let r_digits = r.starts_with(|c: char| c.is_ascii_digit());
    match (l_digits, r_digits) {
        (true, true) => {
            let l = l.trim_start_matches('0');
            let r = r.trim_start_matches('0');
            l.len().cmp(&r.len()).then_with(|| l.cmp(r))
        }
        // Digits sort before letters and punctuation.
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => l
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .cmp(r.chars().map(|c| c.to_ascii_lowercase())),
    }
}

/// Splits a string into alternating runs of ASCII digits and non-digits.
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}

/// Sort `coordinates`, let `selector` choose among them, and return the absolute
/// paths of the chosen archives in sorted order.
///
/// # Errors
/// Returns an error if the selector fails.
pub fn select_dependencies(
    target: &str,
    mut coordinates: Vec<DependencyCoordinate>,
    selector: &mut dyn Selector,
    page_size: usize,
) -> Result<Vec<PathBuf>, EngineError> {
    sort_coordinates(&mut coordinates);

    let choices: Vec<Choice<'_>> = coordinates
        .iter()
        .map(|coordinate| Choice { coordinate })
        .collect();
    let title = format!("Select dependencies to generate typings for ({target})");
    let chosen: HashSet<String> = selector
        .select(&title, &choices, page_size)?
        .into_iter()
        .collect();

    Ok(coordinates
        .into_iter()
        .filter(|c| chosen.contains(&c.identity_key()))
        .inspect(|c| tracing::debug!(entry = %c.relative_path().display(), "selected"))
        .map(|c| c.absolute_path)
        .collect())
}
