//! Text similarity based on longest matching blocks
//!
//! Ratcliff/Obershelp alignment: find the longest common block, then recurse
//! into the unmatched regions on either side. The ratio is `2*M / T` where
//! `M` counts matched characters and `T` is the combined length. Elements of
//! the second text that occur in more than 1% of its positions (texts of 200
//! characters or more) are not used to seed a match, which keeps long inputs
//! fast. The measure is not symmetric under argument swap.

use std::collections::HashMap;

/// Length from which popular characters of the second text stop seeding matches
const AUTOJUNK_MIN_LEN: usize = 200;

/// Case-insensitive similarity of two texts as a percentage in [0, 100]
///
/// Returns 0 when either text is empty.
#[must_use]
pub fn similarity(recognized: &str, expected: &str) -> f64 {
    if recognized.is_empty() || expected.is_empty() {
        return 0.0;
    }

    let a: Vec<char> = recognized.to_lowercase().chars().collect();
    let b: Vec<char> = expected.to_lowercase().chars().collect();

    BlockMatcher::new(&a, &b).ratio() * 100.0
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of every seedable character in `b`
    b_index: HashMap<char, Vec<usize>>,
}

/// A matching block: `a[i..i+size] == b[j..j+size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    i: usize,
    j: usize,
    size: usize,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &ch) in b.iter().enumerate() {
            b_index.entry(ch).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b_index.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b_index }
    }

    fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = 2.0 * self.matched_len() as f64 / total as f64;
        ratio
    }

    fn matched_len(&self) -> usize {
        let mut matched = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
            let block = self.longest_match(a_lo, a_hi, b_lo, b_hi);
            if block.size == 0 {
                continue;
            }
            matched += block.size;
            if a_lo < block.i && b_lo < block.j {
                pending.push((a_lo, block.i, b_lo, block.j));
            }
            if block.i + block.size < a_hi && block.j + block.size < b_hi {
                pending.push((block.i + block.size, a_hi, block.j + block.size, b_hi));
            }
        }

        matched
    }

    /// Longest block within `a[a_lo..a_hi]` and `b[b_lo..b_hi]`
    ///
    /// Ties resolve to the block starting earliest in `a`, then in `b`.
    fn longest_match(&self, a_lo: usize, a_hi: usize, b_lo: usize, b_hi: usize) -> Block {
        let mut best = Block {
            i: a_lo,
            j: b_lo,
            size: 0,
        };

        // run_len[j] = length of the match ending at a[i-1], b[j]
        let mut run_len: HashMap<usize, usize> = HashMap::new();
        for i in a_lo..a_hi {
            let mut next_run_len = HashMap::new();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < b_lo {
                        continue;
                    }
                    if j >= b_hi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run_len.insert(j, k);
                    if k > best.size {
                        best = Block {
                            i: i + 1 - k,
                            j: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            run_len = next_run_len;
        }

        // Popular characters never seed a block but may still extend one
        while best.i > a_lo && best.j > b_lo && self.a[best.i - 1] == self.b[best.j - 1] {
            best.i -= 1;
            best.j -= 1;
            best.size += 1;
        }
        while best.i + best.size < a_hi
            && best.j + best.size < b_hi
            && self.a[best.i + best.size] == self.b[best.j + best.size]
        {
            best.size += 1;
        }

        best
    }
}
