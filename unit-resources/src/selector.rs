// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Filtering rules applied to resource name listings. */

use regex::Regex;

/// Reports whether `haystack` contains `needle`.
///
/// Comparison is on the exact character sequence, or on the
/// `str::to_lowercase` folding of both strings when `ignore_case` is
/// set.
///
/// An empty `needle` matches everything. An empty `haystack` also
/// matches, whatever the needle. Callers relying on substring search
/// proper must ensure both strings are non-empty.
pub fn name_contains(haystack: &str, needle: &str, ignore_case: bool) -> bool {
    if needle.is_empty() || haystack.is_empty() {
        return true;
    }

    if ignore_case {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    } else {
        haystack.contains(needle)
    }
}

/// A rule selecting resources by name out of a listing.
#[derive(Clone, Debug)]
pub enum Selector {
    /// Select every resource.
    All,

    /// Select names containing a substring, per [name_contains].
    NameContains { pattern: String, ignore_case: bool },

    /// Select names containing any of a list of substrings.
    ///
    /// Equivalent to evaluating [Selector::NameContains] once per
    /// pattern and concatenating the selections in pattern order. A name
    /// matched by multiple patterns is selected once per matching
    /// pattern. No patterns selects nothing, even though a single empty
    /// pattern selects everything.
    NameIn {
        patterns: Vec<String>,
        ignore_case: bool,
    },

    /// Select names the regular expression finds a match in.
    ///
    /// The match is unanchored: the expression needs to match somewhere
    /// in the name, not span it.
    NameMatchesRegex(Regex),
}

impl Selector {
    /// Evaluate the selector against a name listing.
    ///
    /// Returns indices into `names` in selection order.
    pub fn select(&self, names: &[String]) -> Vec<usize> {
        match self {
            Selector::All => (0..names.len()).collect(),
            Selector::NameContains {
                pattern,
                ignore_case,
            } => names
                .iter()
                .enumerate()
                .filter(|(_, name)| name_contains(name, pattern, *ignore_case))
                .map(|(i, _)| i)
                .collect(),
            Selector::NameIn {
                patterns,
                ignore_case,
            } => patterns
                .iter()
                .flat_map(|pattern| {
                    names
                        .iter()
                        .enumerate()
                        .filter(move |(_, name)| name_contains(name, pattern, *ignore_case))
                        .map(|(i, _)| i)
                })
                .collect(),
            Selector::NameMatchesRegex(re) => names
                .iter()
                .enumerate()
                .filter(|(_, name)| re.is_match(name))
                .map(|(i, _)| i)
                .collect(),
        }
    }
}
