//! Hash chain match finder
//!
//! Every position is hashed on its first three bytes, `head` keeps the
//! most recent position per hash and `prev` links each position to the
//! previous one with the same hash, so walking a chain visits candidates
//! nearest first. The walk stops after `max_chain` candidates.
use alloc::vec;
use alloc::vec::Vec;

use crate::constants::{DEFLATE_MAX_MATCH_LEN, DEFLATE_MIN_MATCH_LEN, DEFLATE_WINDOW_SIZE};

const HASH_BITS: u32 = 15;
const HASH_SIZE: usize = 1 << HASH_BITS;
const WINDOW_MASK: usize = DEFLATE_WINDOW_SIZE - 1;
const NIL: usize = usize::MAX;

/// Matches at least this long end the chain walk early
const NICE_LENGTH: usize = 128;

pub(crate) struct HashChain
{
    head:      Vec<usize>,
    prev:      Vec<usize>,
    max_chain: usize
}

impl HashChain
{
    pub fn new(max_chain: usize) -> HashChain
    {
        HashChain {
            head:      vec![NIL; HASH_SIZE],
            prev:      vec![NIL; DEFLATE_WINDOW_SIZE],
            max_chain: max_chain.max(1)
        }
    }

    #[inline(always)]
    fn hash(data: &[u8], pos: usize) -> usize
    {
        let value = u32::from(data[pos])
            | (u32::from(data[pos + 1]) << 8)
            | (u32::from(data[pos + 2]) << 16);

        (value.wrapping_mul(0x9E37_79B1) >> (32 - HASH_BITS)) as usize
    }

    /// Record `pos` so later positions can match against it
    #[inline(always)]
    pub fn insert(&mut self, data: &[u8], pos: usize)
    {
        if pos + DEFLATE_MIN_MATCH_LEN > data.len()
        {
            return;
        }
        let hash = Self::hash(data, pos);

        self.prev[pos & WINDOW_MASK] = self.head[hash];
        self.head[hash] = pos;
    }

    /// Find the longest match for `pos`, returning `(length, distance)`
    ///
    /// Among equally long matches the nearest one wins.
    /// `pos` itself must not have been inserted yet.
    pub fn find(&self, data: &[u8], pos: usize) -> Option<(usize, usize)>
    {
        if pos + DEFLATE_MIN_MATCH_LEN > data.len()
        {
            return None;
        }
        let max_len = (data.len() - pos).min(DEFLATE_MAX_MATCH_LEN);

        let mut best_len = DEFLATE_MIN_MATCH_LEN - 1;
        let mut best_dist = 0;
        let mut candidate = self.head[Self::hash(data, pos)];
        let mut chain = self.max_chain;

        while candidate != NIL && chain > 0
        {
            let distance = pos - candidate;

            if distance > DEFLATE_WINDOW_SIZE
            {
                break;
            }
            // a candidate can only beat the current best if it agrees
            // on the byte just past it
            if data[candidate + best_len] == data[pos + best_len]
            {
                let length = match_length(data, candidate, pos, max_len);

                if length > best_len
                {
                    best_len = length;
                    best_dist = distance;

                    if length >= NICE_LENGTH || length == max_len
                    {
                        break;
                    }
                }
            }
            let next = self.prev[candidate & WINDOW_MASK];

            // slots are reused once the window slides, a link that does
            // not go backwards belongs to a newer position
            if next >= candidate
            {
                break;
            }
            candidate = next;
            chain -= 1;
        }

        if best_len >= DEFLATE_MIN_MATCH_LEN
        {
            return Some((best_len, best_dist));
        }
        None
    }
}

/// Number of equal bytes at `a` and `b`, capped at `max_len`
#[inline(always)]
fn match_length(data: &[u8], a: usize, b: usize, max_len: usize) -> usize
{
    let mut length = 0;

    while length + 8 <= max_len
    {
        let mut x = [0; 8];
        let mut y = [0; 8];
        x.copy_from_slice(&data[a + length..a + length + 8]);
        y.copy_from_slice(&data[b + length..b + length + 8]);

        let diff = u64::from_le_bytes(x) ^ u64::from_le_bytes(y);

        if diff != 0
        {
            return length + (diff.trailing_zeros() / 8) as usize;
        }
        length += 8;
    }
    while length < max_len && data[a + length] == data[b + length]
    {
        length += 1;
    }
    length
}

#[cfg(test)]
mod tests
{
    use super::{match_length, HashChain};

    fn find_after_inserting(data: &[u8], pos: usize, chain: usize) -> Option<(usize, usize)>
    {
        let mut matcher = HashChain::new(chain);
        for i in 0..pos
        {
            matcher.insert(data, i);
        }
        matcher.find(data, pos)
    }

    #[test]
    fn finds_repeated_pixel()
    {
        let data = [10, 20, 30, 10, 20, 30, 10, 20, 30, 7];
        assert_eq!(find_after_inserting(&data, 3, 8), Some((6, 3)));
    }

    #[test]
    fn nearest_match_wins_ties()
    {
        // "abc" occurs at 0 and 4, both give a 3 byte match at 8
        let data = *b"abcXabcYabcZ";
        assert_eq!(find_after_inserting(&data, 8, 8), Some((3, 4)));
    }

    #[test]
    fn longer_far_match_beats_short_near_one()
    {
        let data = *b"abcdefXabcYabcdef";
        assert_eq!(find_after_inserting(&data, 11, 8), Some((6, 11)));
    }

    #[test]
    fn no_match_near_the_end()
    {
        let data = [1, 2, 1, 2];
        assert_eq!(find_after_inserting(&data, 2, 8), None);
    }

    #[test]
    fn overlapping_run()
    {
        let data = [0_u8; 600];
        assert_eq!(find_after_inserting(&data, 1, 1), Some((258, 1)));
    }

    #[test]
    fn match_length_caps()
    {
        let data = [5_u8; 40];
        assert_eq!(match_length(&data, 0, 3, 20), 20);
        let data = *b"0123456789abcdefXY0123456789abcdefZY";
        assert_eq!(match_length(&data, 0, 18, 18), 16);
    }
}
