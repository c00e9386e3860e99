//! Shared helpers for markup lexer tests: deterministic chunk planning,
//! token snapshot rendering, and golden-case loading.

pub mod snapshot;

/// Split `input` at the given ascending byte positions.
///
/// Panics if a position is out of order, out of range, or not a character
/// boundary; chunk plans are test data and a bad plan is a bug in the test.
pub fn split_at<'a>(input: &'a str, boundaries: &[usize]) -> Vec<&'a str> {
    let mut chunks = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0;
    for &end in boundaries {
        assert!(end >= start && end <= input.len(), "boundary {end} out of range");
        assert!(input.is_char_boundary(end), "boundary {end} splits a character");
        chunks.push(&input[start..end]);
        start = end;
    }
    chunks.push(&input[start..]);
    chunks
}

/// Every byte position in `input` that is a character boundary and not
/// inside any of the `excluded` half-open ranges. Positions 0 and `len`
/// are omitted since splitting there produces an empty chunk.
pub fn interior_boundaries(input: &str, excluded: &[std::ops::Range<usize>]) -> Vec<usize> {
    (1..input.len())
        .filter(|&pos| input.is_char_boundary(pos))
        .filter(|&pos| !excluded.iter().any(|range| range.contains(&pos)))
        .collect()
}

/// Small deterministic generator for reproducible chunk plans. Same
/// constants as `rand`'s historical LCG; quality is irrelevant here, only
/// determinism matters.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Lcg(seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform-ish value in `0..n`.
    pub fn below(&mut self, n: usize) -> usize {
        assert!(n > 0);
        self.next_u32() as usize % n
    }

    /// A sorted subset of `positions` of size at most `max_len`.
    pub fn subset(&mut self, positions: &[usize], max_len: usize) -> Vec<usize> {
        if positions.is_empty() {
            return Vec::new();
        }
        let len = self.below(max_len.min(positions.len())) + 1;
        let mut picked: Vec<usize> = (0..len).map(|_| positions[self.below(positions.len())]).collect();
        picked.sort_unstable();
        picked.dedup();
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::{Lcg, interior_boundaries, split_at};

    #[test]
    fn split_reassembles_to_the_input() {
        let input = "abcdef";
        let chunks = split_at(input, &[2, 4]);
        assert_eq!(chunks, vec!["ab", "cd", "ef"]);
        assert_eq!(chunks.concat(), input);
    }

    #[test]
    fn interior_boundaries_respect_char_boundaries_and_exclusions() {
        let input = "a\u{e9}b";
        let positions = interior_boundaries(input, &[]);
        assert_eq!(positions, vec![1, 3]);
        let positions = interior_boundaries(input, &[1..2]);
        assert_eq!(positions, vec![3]);
    }

    #[test]
    fn lcg_is_deterministic() {
        let mut a = Lcg::new(7);
        let mut b = Lcg::new(7);
        assert_eq!(a.next_u32(), b.next_u32());
        assert_eq!(a.subset(&[1, 2, 3, 4], 3), b.subset(&[1, 2, 3, 4], 3));
    }
}
