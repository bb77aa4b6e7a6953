//! Frequent-dependency detection and the bounded marker alphabet.

use std::collections::HashSet;

use tracing::debug;

use cmgraph_error::{Error, Result};
use cmgraph_model::Snapshot;

/// Fixed marker symbol sequence: Greek lowercase, then Latin letters, then
/// digits. Markers are assigned in this order, first-flagged first.
pub const MARKER_SYMBOLS: [&str; 86] = [
    "α", "β", "γ", "δ", "ε", "ζ", "η", "θ", "ι", "κ", "λ", "μ", "ν", "ξ", "ο", "π", "ρ", "σ",
    "τ", "υ", "φ", "χ", "ψ", "ω", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L",
    "M", "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "a", "b", "c", "d",
    "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s", "t", "u", "v",
    "w", "x", "y", "z", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9",
];

/// Explicitly-sized source of marker symbols.
///
/// Each instance hands out every symbol at most once; exhaustion is a typed
/// error, not a wrap-around.
#[derive(Debug, Default)]
pub struct MarkerAlphabet {
    next: usize,
}

impl MarkerAlphabet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(&self) -> usize {
        MARKER_SYMBOLS.len()
    }

    pub fn remaining(&self) -> usize {
        MARKER_SYMBOLS.len() - self.next
    }

    /// Hand out the next unused symbol.
    pub fn assign(&mut self) -> Result<&'static str> {
        let Some(&symbol) = MARKER_SYMBOLS.get(self.next) else {
            return Err(Error::marker_alphabet_exhausted(self.capacity())
                .with_operation("markers::assign"));
        };
        self.next += 1;
        Ok(symbol)
    }
}

/// Targets flagged frequent, with the usage count of every target.
#[derive(Debug, Default)]
pub struct FrequentSet {
    indices: HashSet<usize>,
    /// Incoming-dependency count per target, indexed like the snapshot.
    pub usage_counts: Vec<usize>,
}

impl FrequentSet {
    pub fn contains(&self, target: usize) -> bool {
        self.indices.contains(&target)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Flag every target whose usage count strictly exceeds `threshold` and
/// assign each a marker in first-flagged order.
///
/// Usage counts are over dependency records, so duplicate raw dependencies
/// count every occurrence.
pub fn detect_frequent(
    snapshot: &mut Snapshot,
    threshold: usize,
    alphabet: &mut MarkerAlphabet,
) -> Result<FrequentSet> {
    let mut usage_counts = vec![0usize; snapshot.targets.len()];
    for dep in &snapshot.dependencies {
        usage_counts[dep.dest] += 1;
    }

    let mut indices = HashSet::new();
    for (index, &count) in usage_counts.iter().enumerate() {
        if count > threshold {
            let symbol = alphabet.assign()?;
            snapshot.targets[index].set_marker(symbol, count);
            indices.insert(index);
            debug!(
                target = %snapshot.targets[index].name,
                symbol,
                count,
                "frequent target"
            );
        }
    }

    Ok(FrequentSet {
        indices,
        usage_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{make_directory, make_project, make_snapshot, make_target};

    #[test]
    fn test_alphabet_symbols_are_unique() {
        let unique: HashSet<&str> = MARKER_SYMBOLS.into_iter().collect();
        assert_eq!(unique.len(), MARKER_SYMBOLS.len());
    }

    #[test]
    fn test_alphabet_exhaustion_is_typed() {
        let mut alphabet = MarkerAlphabet::new();
        let mut seen = HashSet::new();
        for _ in 0..alphabet.capacity() {
            assert!(seen.insert(alphabet.assign().unwrap()));
        }
        assert_eq!(alphabet.remaining(), 0);

        let err = alphabet.assign().unwrap_err();
        assert_eq!(err.kind(), cmgraph_error::ErrorKind::MarkerAlphabetExhausted);
    }

    /// Six users of one library tip it over the default threshold.
    #[test]
    fn test_detect_frequent_assigns_first_symbol() {
        let mut targets = vec![make_target("util", 0, 0)];
        for i in 1..=6 {
            targets.push(make_target(&format!("t{i}"), 0, 1));
        }
        let mut resolved = vec![vec![]];
        resolved.extend(std::iter::repeat_n(vec![0], 6));

        let mut snapshot = make_snapshot(
            vec![make_project("root", vec![0, 1, 2, 3, 4, 5, 6], vec![0, 1])],
            vec![
                make_directory("lib", 0, vec![0]),
                make_directory("apps", 0, vec![1, 2, 3, 4, 5, 6]),
            ],
            targets,
            resolved,
            true,
        );

        let mut alphabet = MarkerAlphabet::new();
        let frequent = detect_frequent(&mut snapshot, 5, &mut alphabet).unwrap();

        assert_eq!(frequent.len(), 1);
        assert!(frequent.contains(0));
        assert_eq!(frequent.usage_counts[0], 6);

        let marker = snapshot.targets[0].marker().unwrap();
        assert_eq!(marker.symbol, "α");
        assert_eq!(marker.usage_count, 6);
        assert_eq!(snapshot.targets[0].display_label(), "@α(6) util");
    }

    /// Exactly threshold-many users is not frequent; the cutoff is strict.
    #[test]
    fn test_detect_frequent_strict_threshold() {
        let mut targets = vec![make_target("util", 0, 0)];
        for i in 1..=5 {
            targets.push(make_target(&format!("t{i}"), 0, 1));
        }
        let mut resolved = vec![vec![]];
        resolved.extend(std::iter::repeat_n(vec![0], 5));

        let mut snapshot = make_snapshot(
            vec![make_project("root", vec![0, 1, 2, 3, 4, 5], vec![0, 1])],
            vec![
                make_directory("lib", 0, vec![0]),
                make_directory("apps", 0, vec![1, 2, 3, 4, 5]),
            ],
            targets,
            resolved,
            true,
        );

        let mut alphabet = MarkerAlphabet::new();
        let frequent = detect_frequent(&mut snapshot, 5, &mut alphabet).unwrap();

        assert!(frequent.is_empty());
        assert!(snapshot.targets[0].marker().is_none());
    }

    /// Markers follow target iteration order, so re-running an identical
    /// snapshot reproduces identical assignments.
    #[test]
    fn test_marker_assignment_is_deterministic() {
        let build = || {
            let mut targets = vec![make_target("alpha", 0, 0), make_target("beta", 0, 0)];
            for i in 0..6 {
                targets.push(make_target(&format!("t{i}"), 0, 1));
            }
            let mut resolved = vec![vec![], vec![]];
            resolved.extend(std::iter::repeat_n(vec![0, 1], 6));

            let mut snapshot = make_snapshot(
                vec![make_project("root", (0..8).collect(), vec![0, 1])],
                vec![
                    make_directory("lib", 0, vec![0, 1]),
                    make_directory("apps", 0, (2..8).collect()),
                ],
                targets,
                resolved,
                true,
            );
            let mut alphabet = MarkerAlphabet::new();
            detect_frequent(&mut snapshot, 5, &mut alphabet).unwrap();
            (
                snapshot.targets[0].marker().unwrap().symbol,
                snapshot.targets[1].marker().unwrap().symbol,
            )
        };

        assert_eq!(build(), ("α", "β"));
        assert_eq!(build(), build());
    }
}
