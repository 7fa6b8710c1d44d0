// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Static lookup tables from tracker labels to portal categories.
//!
//! Resolution is two-tier: an exact, case-sensitive match against the
//! declared table, then a case-insensitive scan in declared order. A label
//! that matches neither is unmapped; that is a normal answer, not an error.

/// An ordered, immutable label → target table.
#[derive(Debug, Clone, Copy)]
pub struct LookupTable {
    entries: &'static [(&'static str, &'static str)],
}

/// A successful lookup: the declared source key and its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// Source label as declared in the table.
    pub source: &'static str,
    /// Portal-side value.
    pub target: &'static str,
    /// True when only the case-insensitive fallback matched.
    pub by_fallback: bool,
}

impl LookupTable {
    /// Wraps a static slice of `(source, target)` pairs.
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        LookupTable { entries }
    }

    /// Resolves `label` using exact match, then case-insensitive fallback.
    pub fn resolve(&self, label: &str) -> Option<Resolved> {
        if let Some(&(source, target)) = self.entries.iter().find(|(s, _)| *s == label) {
            return Some(Resolved {
                source,
                target,
                by_fallback: false,
            });
        }
        self.entries
            .iter()
            .find(|(s, _)| s.eq_ignore_ascii_case(label))
            .map(|&(source, target)| Resolved {
                source,
                target,
                by_fallback: true,
            })
    }

    /// Target for `label`, if any.
    pub fn lookup(&self, label: &str) -> Option<&'static str> {
        self.resolve(label).map(|r| r.target)
    }

    /// Entries in declared order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    /// Targets in declared order.
    pub fn targets(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(_, t)| t)
    }

    /// Number of declared entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table declares no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tracker platform label → portal project name.
pub const PLATFORMS: LookupTable = LookupTable::new(&[
    ("WebOS", "LSI (ex KCTS) - WebOS"),
    ("FireTV", "LSI (ex KCTS) - Fire OS"),
    ("iOS", "LSI (ex KCTS) - iOS"),
    ("Tizen", "LSI (ex KCTS) - Tizen"),
    ("Android", "LSI (ex KCTS) - Android"),
    ("AndroidTV", "LSI (ex KCTS) - Android TV"),
    ("AppleTV", "LSI (ex KCTS) - tvOS"),
]);

/// Tracker severity (priority) label → portal numeric field key.
pub const SEVERITIES: LookupTable = LookupTable::new(&[
    ("Highest", "blocker"),
    ("High", "critical"),
    ("Medium", "major"),
    ("Low", "minor"),
    ("Lowest", "trivial"),
]);

/// Portal project for a tracker platform label.
pub fn map_platform(label: &str) -> Option<&'static str> {
    PLATFORMS.lookup(label)
}

/// Portal field key for a tracker severity label.
pub fn map_severity(label: &str) -> Option<&'static str> {
    SEVERITIES.lookup(label)
}

/// Declared platform key a label resolves to (merges casing variants).
pub fn canonical_platform(label: &str) -> Option<&'static str> {
    PLATFORMS.resolve(label).map(|r| r.source)
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod tests;
