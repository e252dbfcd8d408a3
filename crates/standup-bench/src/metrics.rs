//! Aggregation math for benchmark statistics.

use std::collections::HashSet;

/// Nearest-rank percentile over an ascending-sorted sample.
///
/// Indexes `floor(p/100 * (n-1))`, clamped to the sample bounds; no
/// interpolation. An empty sample yields 0.
#[must_use]
pub fn percentile(sorted_values: &[u64], p: f64) -> u64 {
    if sorted_values.is_empty() {
        return 0;
    }
    let index = ((p / 100.0) * (sorted_values.len() - 1) as f64) as usize;
    sorted_values[index.min(sorted_values.len() - 1)]
}

/// Median of an ascending-sorted sample: the element at `n / 2`.
#[must_use]
pub fn median(sorted_values: &[f64]) -> f64 {
    if sorted_values.is_empty() {
        0.0
    } else {
        sorted_values[sorted_values.len() / 2]
    }
}

/// Determinism score: average pairwise Jaccard similarity of lowercased,
/// whitespace-tokenized word sets across all unordered output pairs.
///
/// A lightweight proxy for output stability across repeated generations.
/// Fewer than two outputs score 1.0; a pair of empty word sets counts as
/// fully similar.
#[must_use]
pub fn determinism(outputs: &[String]) -> f64 {
    if outputs.len() < 2 {
        return 1.0;
    }

    let word_sets: Vec<HashSet<String>> = outputs
        .iter()
        .map(|output| {
            output
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect()
        })
        .collect();

    let mut total = 0.0;
    let mut pairs = 0u32;
    for i in 0..word_sets.len() {
        for j in (i + 1)..word_sets.len() {
            let intersection = word_sets[i].intersection(&word_sets[j]).count() as f64;
            let union = word_sets[i].union(&word_sets[j]).count() as f64;
            total += if union == 0.0 { 1.0 } else { intersection / union };
            pairs += 1;
        }
    }

    if pairs == 0 { 1.0 } else { total / f64::from(pairs) }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
