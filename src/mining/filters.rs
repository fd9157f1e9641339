//! Composable token filters
//!
//! A filter decides, position by position, which tokens it claims. Applied
//! normally it returns the tokens it does not claim, applied with `negate` it
//! returns the tokens it does claim. The two results always partition the
//! input, in order.

use std::path::Path;

use super::error::MiningError;
use crate::util::shell::{split_line, PatternSet};

/// A token classifier with "pass everything" as its default
pub trait TokenFilter {
    /// One entry per token, `true` where the token is claimed
    fn claims(&self, tokens: &[String]) -> Vec<bool>;

    fn apply(&self, tokens: &[String], negate: bool) -> Vec<String> {
        tokens
            .iter()
            .zip(self.claims(tokens))
            .filter(|(_, claimed)| *claimed == negate)
            .map(|(token, _)| token.clone())
            .collect()
    }
}

/// Claims nothing: passes every token, and nothing when negated
#[derive(Debug, Default, Clone, Copy)]
pub struct PassAll;

impl TokenFilter for PassAll {
    fn claims(&self, tokens: &[String]) -> Vec<bool> {
        vec![false; tokens.len()]
    }
}

impl<F> TokenFilter for F
where
    F: Fn(&[String]) -> Vec<bool>,
{
    fn claims(&self, tokens: &[String]) -> Vec<bool> {
        self(tokens)
    }
}

fn claimed_by<P>(tokens: &[String], claimed: P) -> Vec<bool>
where
    P: Fn(usize, &str) -> bool,
{
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| claimed(index, token))
        .collect()
}

/// A command line flag the flag filter recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flag {
    pub name: &'static str,
    /// Whether a standalone occurrence consumes the following token
    pub takes_argument: bool,
}

impl Flag {
    pub const fn switch(name: &'static str) -> Self {
        Self {
            name,
            takes_argument: false,
        }
    }

    pub const fn with_argument(name: &'static str) -> Self {
        Self {
            name,
            takes_argument: true,
        }
    }
}

/// Claims tokens starting with a known flag, plus the argument after a standalone flag
#[derive(Debug, Clone)]
pub struct FlagFilter {
    flags: Vec<Flag>,
}

impl FlagFilter {
    pub fn new(flags: impl IntoIterator<Item = Flag>) -> Self {
        Self {
            flags: flags.into_iter().collect(),
        }
    }

    fn claims_token(&self, token: &str, previous: Option<&str>) -> bool {
        self.flags.iter().any(|flag| token.starts_with(flag.name))
            || previous.is_some_and(|previous| {
                self.flags
                    .iter()
                    .any(|flag| flag.takes_argument && previous == flag.name)
            })
    }
}

impl TokenFilter for FlagFilter {
    fn claims(&self, tokens: &[String]) -> Vec<bool> {
        claimed_by(tokens, |index, token| {
            let previous = index.checked_sub(1).map(|i| tokens[i].as_str());
            self.claims_token(token, previous)
        })
    }
}

/// Claims tokens matched by any of a set of regular expressions
#[derive(Debug, Clone)]
pub struct PatternFilter {
    patterns: PatternSet,
}

impl PatternFilter {
    pub fn new<I, S>(patterns: I) -> Result<Self, MiningError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            patterns: PatternSet::new(patterns)?,
        })
    }
}

impl TokenFilter for PatternFilter {
    fn claims(&self, tokens: &[String]) -> Vec<bool> {
        claimed_by(tokens, |_, token| self.patterns.matches_any(token))
    }
}

/// Claims tokens naming one of a set of files, either bare or as a path's last component
#[derive(Debug, Clone)]
pub struct FileNameFilter {
    names: Vec<String>,
}

impl FileNameFilter {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    fn claims_token(&self, token: &str) -> bool {
        let base = Path::new(token)
            .file_name()
            .map(|name| name.to_string_lossy());
        self.names
            .iter()
            .any(|name| token == name || base.as_deref() == Some(name.as_str()))
    }
}

impl TokenFilter for FileNameFilter {
    fn claims(&self, tokens: &[String]) -> Vec<bool> {
        claimed_by(tokens, |_, token| self.claims_token(token))
    }
}

/// Two filters run as a cleaning pipeline: `second` only sees what `first` left
#[derive(Debug)]
pub struct Chain<'a, A: ?Sized, B: ?Sized> {
    first: &'a A,
    second: &'a B,
}

/// Runs `first` then `second`; a token is claimed when either filter claims it
pub fn chain<'a, A, B>(first: &'a A, second: &'a B) -> Chain<'a, A, B>
where
    A: TokenFilter + ?Sized,
    B: TokenFilter + ?Sized,
{
    Chain { first, second }
}

impl<A, B> TokenFilter for Chain<'_, A, B>
where
    A: TokenFilter + ?Sized,
    B: TokenFilter + ?Sized,
{
    fn claims(&self, tokens: &[String]) -> Vec<bool> {
        let first = self.first.claims(tokens);
        let survivors: Vec<String> = tokens
            .iter()
            .zip(&first)
            .filter(|(_, claimed)| !**claimed)
            .map(|(token, _)| token.clone())
            .collect();
        let mut second = self.second.claims(&survivors).into_iter();

        first
            .into_iter()
            .map(|claimed| claimed || second.next().unwrap_or(false))
            .collect()
    }
}

/// A tokenized invocation split into its program and classified arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedLine {
    pub program: String,
    /// Arguments the sorter did not claim
    pub unclaimed: Vec<String>,
    /// Arguments the sorter claimed
    pub claimed: Vec<String>,
}

/// Tokenizes `line`, cleans it, and partitions the arguments after the program with `sorter`
pub fn sort_line<C, S>(line: &str, cleaner: &C, sorter: &S) -> Result<SortedLine, MiningError>
where
    C: TokenFilter + ?Sized,
    S: TokenFilter + ?Sized,
{
    let tokens = cleaner.apply(&split_line(line)?, false);
    let (program, arguments) = tokens
        .split_first()
        .ok_or_else(|| MiningError::EmptyInvocation(line.to_string()))?;

    Ok(SortedLine {
        program: program.clone(),
        unclaimed: sorter.apply(arguments, false),
        claimed: sorter.apply(arguments, true),
    })
}
