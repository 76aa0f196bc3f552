//! String similarity scores
//!
//! Both scores are computed as an integer percentage (rounded half to even)
//! and reported on a 0.0-1.0 scale. An empty input on either side scores 0.0.

use rapidfuzz::distance::indel;

/// Whole-string similarity based on indel distance.
///
/// `(len(a) + len(b) - distance) / (len(a) + len(b))` where distance counts
/// insertions and deletions only. Lengths are in characters.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    percent(indel::normalized_similarity(a.chars(), b.chars()))
}

/// Best [`ratio`] of the shorter string against windows of the longer one.
///
/// Windows start where a matching block would line the shorter string up
/// with the longer one, and are cut short at the end of the longer string.
/// Tolerates one side being a fragment of the other:
/// `partial_ratio("ao", "ao so mi") == 1.0`.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if shorter.is_empty() {
        return 0.0;
    }

    let mut best = 0.0_f64;
    for (i, j, _) in matching_blocks(&shorter, &longer) {
        let start = j.saturating_sub(i);
        let end = (start + shorter.len()).min(longer.len());
        let window = &longer[start..end];
        let r = indel::normalized_similarity(shorter.iter().copied(), window.iter().copied());
        if r > best {
            best = r;
            if best >= 1.0 {
                break;
            }
        }
    }
    percent(best)
}

fn percent(r: f64) -> f64 {
    (r * 100.0).round_ties_even() / 100.0
}

/// Non-overlapping common blocks `(i, j, size)` found by repeatedly taking
/// the longest match and recursing on both sides of it. Always ends with the
/// `(a.len(), b.len(), 0)` sentinel.
fn matching_blocks(a: &[char], b: &[char]) -> Vec<(usize, usize, usize)> {
    let mut blocks = Vec::new();
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        blocks.push((i, j, k));
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    blocks.sort_unstable();
    blocks.push((a.len(), b.len(), 0));
    blocks
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]`; earliest in `a`,
/// then earliest in `b`, on ties.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best) = (alo, blo, 0);
    // run length ending at b[j - 1], indexed by j - blo
    let mut prev = vec![0usize; bhi - blo + 1];
    let mut curr = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = if a[i] == b[j] { prev[j - blo] + 1 } else { 0 };
            curr[j - blo + 1] = k;
            if k > best {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best = k;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    (best_i, best_j, best)
}
