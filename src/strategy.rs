//! Typo mutation strategies.
//!
//! Each strategy is a lazy, deterministic producer of variants of one input:
//! the three name strategies mutate the label part of a domain, while
//! [`ChangeSuffix`] only replaces the public suffix. Nothing here deduplicates
//! across strategies; that is the generator's job.

use std::fmt;

use serde::Serialize;

/// Commonly confused adjacent character pairs. Either spelling of an entry is
/// replaced by the other.
pub const SWAP_PAIRS: [(&str, &str); 12] = [
    ("ie", "ei"),
    ("ou", "uo"),
    ("ea", "ae"),
    ("ai", "ia"),
    ("au", "ua"),
    ("io", "oi"),
    ("ue", "eu"),
    ("ui", "iu"),
    ("th", "ht"),
    ("ch", "hc"),
    ("ck", "kc"),
    ("rn", "nr"),
];

/// Suffixes tried by [`ChangeSuffix`] unless the caller supplies its own list.
pub const DEFAULT_ALTERNATE_SUFFIXES: [&str; 17] = [
    ".com", ".net", ".org", ".info", ".biz", ".co", ".io", ".us", ".me", ".app", ".dev",
    ".online", ".site", ".xyz", ".co.uk", ".cm", ".om",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    OmitRepeated,
    RepeatSingle,
    SwapPair,
    ChangeSuffix,
}

impl Strategy {
    /// Evaluation order used by the generator.
    pub const ALL: [Strategy; 4] = [
        Strategy::OmitRepeated,
        Strategy::RepeatSingle,
        Strategy::SwapPair,
        Strategy::ChangeSuffix,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::OmitRepeated => "omit-repeated",
            Strategy::RepeatSingle => "repeat-single",
            Strategy::SwapPair => "swap-pair",
            Strategy::ChangeSuffix => "change-suffix",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Collapses each maximal run of two or more identical characters, one run
/// per variant, left to right.
#[derive(Debug, Clone)]
pub struct OmitRepeated {
    chars: Vec<char>,
    pos: usize,
}

impl OmitRepeated {
    pub fn new(word: &str) -> Self {
        OmitRepeated {
            chars: word.chars().collect(),
            pos: 0,
        }
    }
}

impl Iterator for OmitRepeated {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.pos < self.chars.len() {
            let start = self.pos;
            let c = self.chars[start];
            let mut end = start + 1;
            while end < self.chars.len() && self.chars[end] == c {
                end += 1;
            }
            self.pos = end;

            if end - start >= 2 {
                let mut variant = String::with_capacity(self.chars.len());
                variant.extend(&self.chars[..=start]);
                variant.extend(&self.chars[end..]);
                return Some(variant);
            }
        }
        None
    }
}

/// Duplicates the character at each position in turn.
#[derive(Debug, Clone)]
pub struct RepeatSingle {
    chars: Vec<char>,
    pos: usize,
}

impl RepeatSingle {
    pub fn new(word: &str) -> Self {
        RepeatSingle {
            chars: word.chars().collect(),
            pos: 0,
        }
    }
}

impl Iterator for RepeatSingle {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let i = self.pos;
        let c = *self.chars.get(i)?;
        self.pos += 1;

        let mut variant = String::with_capacity(self.chars.len() + 1);
        variant.extend(&self.chars[..=i]);
        variant.push(c);
        variant.extend(&self.chars[i + 1..]);
        Some(variant)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.chars.len().saturating_sub(self.pos);
        (left, Some(left))
    }
}

impl ExactSizeIterator for RepeatSingle {}

/// Replaces one occurrence of a [`SWAP_PAIRS`] digraph per variant.
/// Overlapping occurrences (`eie`) each produce their own variant.
#[derive(Debug, Clone)]
pub struct SwapPair {
    chars: Vec<char>,
    pos: usize,
}

impl SwapPair {
    pub fn new(word: &str) -> Self {
        SwapPair {
            chars: word.chars().collect(),
            pos: 0,
        }
    }
}

fn counterpart(first: char, second: char) -> Option<&'static str> {
    let mut buf = [0u8; 8];
    let len = first.encode_utf8(&mut buf).len();
    let len = len + second.encode_utf8(&mut buf[len..]).len();
    let digraph = std::str::from_utf8(&buf[..len]).ok()?;

    SWAP_PAIRS.iter().find_map(|&(a, b)| {
        if digraph == a {
            Some(b)
        } else if digraph == b {
            Some(a)
        } else {
            None
        }
    })
}

impl Iterator for SwapPair {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.pos + 1 < self.chars.len() {
            let i = self.pos;
            self.pos += 1;

            if let Some(replacement) = counterpart(self.chars[i], self.chars[i + 1]) {
                let mut variant = String::with_capacity(self.chars.len());
                variant.extend(&self.chars[..i]);
                variant.push_str(replacement);
                variant.extend(&self.chars[i + 2..]);
                return Some(variant);
            }
        }
        None
    }
}

/// Yields every alternate suffix that differs from the original.
#[derive(Debug, Clone)]
pub struct ChangeSuffix<'a> {
    original: &'a str,
    alternates: std::slice::Iter<'a, String>,
}

impl<'a> ChangeSuffix<'a> {
    pub fn new(original: &'a str, alternates: &'a [String]) -> Self {
        ChangeSuffix {
            original,
            alternates: alternates.iter(),
        }
    }
}

impl<'a> Iterator for ChangeSuffix<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let original = self.original;
        self.alternates
            .by_ref()
            .map(String::as_str)
            .find(|s| !s.eq_ignore_ascii_case(original))
    }
}

/// Normalizes a user supplied suffix to the `.tld` form.
pub fn normalize_suffix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('.').trim_start_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!(".{}", trimmed.to_ascii_lowercase()))
    }
}

pub fn default_alternate_suffixes() -> Vec<String> {
    DEFAULT_ALTERNATE_SUFFIXES.iter().map(|s| s.to_string()).collect()
}
