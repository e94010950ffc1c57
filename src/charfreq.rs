//! # Parallel character-frequency analysis.
//!
//! Splits a text into chunks, counts alphabetic characters (uppercased) in
//! each chunk on the rayon pool, and merges the partial counts. Used by the
//! `charfreq` demo; the pure [`scan`] core is what the tests exercise.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use rayon::prelude::*;

/// Characters per parallel chunk.
const CHUNK: usize = 64 * 1024;

/// Reads the file at `path` and returns its character-frequency mapping.
pub fn scan_file(path: impl AsRef<Path>) -> io::Result<HashMap<char, usize>> {
    let text = std::fs::read_to_string(path)?;
    Ok(scan(&text))
}

/// Counts alphabetic characters in `text`, uppercased.
///
/// ## Example
/// ```
/// let counts = unitvisor::charfreq::scan("aAb!");
/// assert_eq!(counts[&'A'], 2);
/// assert_eq!(counts[&'B'], 1);
/// assert_eq!(counts.get(&'!'), None);
/// ```
pub fn scan(text: &str) -> HashMap<char, usize> {
    let chars: Vec<char> = text.chars().collect();
    chars.par_chunks(CHUNK).map(count_chunk).reduce(HashMap::new, merge)
}

fn count_chunk(chunk: &[char]) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for ch in chunk.iter().filter(|ch| ch.is_alphabetic()) {
        for upper in ch.to_uppercase() {
            *counts.entry(upper).or_insert(0) += 1;
        }
    }
    counts
}

fn merge(mut left: HashMap<char, usize>, right: HashMap<char, usize>) -> HashMap<char, usize> {
    for (ch, n) in right {
        *left.entry(ch).or_insert(0) += n;
    }
    left
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_alphabetic_uppercased() {
        let counts = scan("Hello, World!");
        assert_eq!(counts[&'L'], 3);
        assert_eq!(counts[&'O'], 2);
        assert_eq!(counts[&'H'], 1);
        assert_eq!(counts.get(&','), None);
        assert_eq!(counts.get(&'!'), None);
    }

    #[test]
    fn test_case_folds_into_one_bucket() {
        let counts = scan("aAaA bBbB");
        assert_eq!(counts[&'A'], 4);
        assert_eq!(counts[&'B'], 4);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_empty_and_symbol_only_texts() {
        assert!(scan("").is_empty());
        assert!(scan("123 !?&").is_empty());
    }

    #[test]
    fn test_large_input_spans_chunks() {
        let text = "ab".repeat(CHUNK);
        let counts = scan(&text);
        assert_eq!(counts[&'A'], CHUNK);
        assert_eq!(counts[&'B'], CHUNK);
    }
}
