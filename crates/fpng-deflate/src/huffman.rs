//! Huffman code construction for the compressor
//!
//! Code lengths come from a plain two-smallest-merge Huffman tree,
//! then lengths over the limit are folded back in with the kraft
//! rebalancing loop used by miniz. The result is always a complete
//! code when at least two symbols are used.
use alloc::collections::BinaryHeap;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Reverse;

use crate::bitwriter::BitWriter;
use crate::constants::{
    DEFLATE_MAX_PRE_CODEWORD_LEN, DEFLATE_NUM_PRECODE_SYMS, DEFLATE_PRECODE_LENS_PERMUTATION
};

/// Make sure at least two symbols have a non-zero frequency.
///
/// A single used symbol would get an incomplete one-bit code,
/// which some decoders refuse for the literal/length alphabet.
pub(crate) fn ensure_two_used(freqs: &mut [u32])
{
    let mut used = freqs.iter().filter(|f| **f != 0).count();

    for freq in freqs.iter_mut()
    {
        if used >= 2
        {
            break;
        }
        if *freq == 0
        {
            *freq = 1;
            used += 1;
        }
    }
}

/// Compute length limited huffman code lengths for `freqs`
///
/// Symbols with zero frequency get a zero length.
pub(crate) fn compute_code_lengths(freqs: &[u32], max_len: u8, lens: &mut [u8])
{
    let max_len = usize::from(max_len);

    lens.fill(0);

    // (frequency, symbol), ascending
    let mut syms: Vec<(u32, usize)> = freqs
        .iter()
        .enumerate()
        .filter(|(_, f)| **f != 0)
        .map(|(s, f)| (*f, s))
        .collect();

    match syms.len()
    {
        0 => return,
        1 =>
        {
            lens[syms[0].1] = 1;
            return;
        }
        _ => ()
    }
    syms.sort_unstable();

    let leaves = syms.len();
    // leaves are 0..leaves, internal nodes follow
    let mut parent = vec![0_usize; 2 * leaves - 1];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = syms
        .iter()
        .enumerate()
        .map(|(node, (f, _))| Reverse((u64::from(*f), node)))
        .collect();

    let mut next = leaves;

    while let (Some(Reverse(a)), Some(Reverse(b))) = (heap.pop(), heap.pop())
    {
        parent[a.1] = next;
        parent[b.1] = next;
        heap.push(Reverse((a.0 + b.0, next)));
        next += 1;
    }
    let root = next - 1;

    // parents always have a larger index than their children
    let mut depth = vec![0_usize; 2 * leaves - 1];

    for node in (0..root).rev()
    {
        depth[node] = depth[parent[node]] + 1;
    }

    let mut num_codes = [0_u32; 33];

    for d in &depth[..leaves]
    {
        num_codes[(*d).min(max_len)] += 1;
    }
    // fold over-long codes back, see tdefl_huffman_enforce_max_code_size
    let mut total: u32 = (1..=max_len)
        .map(|i| num_codes[i] << (max_len - i))
        .sum();

    while total != (1 << max_len)
    {
        num_codes[max_len] -= 1;

        for i in (1..max_len).rev()
        {
            if num_codes[i] != 0
            {
                num_codes[i] -= 1;
                num_codes[i + 1] += 2;
                break;
            }
        }
        total -= 1;
    }

    // rarest symbols take the longest codes
    let mut sym_iter = syms.iter();

    for len in (1..=max_len).rev()
    {
        for _ in 0..num_codes[len]
        {
            if let Some((_, sym)) = sym_iter.next()
            {
                lens[*sym] = len as u8;
            }
        }
    }
}

/// Assign canonical codes for `lens`, bit reversed so they
/// can be written least significant bit first
pub(crate) fn compute_codes(lens: &[u8], codes: &mut [u16])
{
    let mut len_counts = [0_u16; 16];

    for len in lens
    {
        len_counts[usize::from(*len)] += 1;
    }
    len_counts[0] = 0;

    let mut next_code = [0_u16; 16];
    let mut code = 0_u16;

    for len in 1..16
    {
        code = (code + len_counts[len - 1]) << 1;
        next_code[len] = code;
    }

    for (len, out) in lens.iter().zip(codes.iter_mut())
    {
        let len = usize::from(*len);

        if len == 0
        {
            *out = 0;
            continue;
        }
        *out = next_code[len].reverse_bits() >> (16 - len);
        next_code[len] += 1;
    }
}

/// A huffman code ready for the writer, lengths plus
/// reversed codewords
#[derive(Clone)]
pub(crate) struct HuffmanCode
{
    pub lens:  Vec<u8>,
    pub codes: Vec<u16>
}

impl HuffmanCode
{
    pub fn from_lens(lens: &[u8]) -> HuffmanCode
    {
        let mut codes = vec![0; lens.len()];
        compute_codes(lens, &mut codes);

        HuffmanCode {
            lens: lens.to_vec(),
            codes
        }
    }

    pub fn from_freqs(freqs: &[u32], max_len: u8) -> HuffmanCode
    {
        let mut lens = vec![0; freqs.len()];
        compute_code_lengths(freqs, max_len, &mut lens);
        HuffmanCode::from_lens(&lens)
    }

    #[inline(always)]
    pub fn write(&self, writer: &mut BitWriter, symbol: usize)
    {
        writer.put_bits(self.lens[symbol], u64::from(self.codes[symbol]));
    }

    /// Bits needed to code symbols occurring with `freqs`
    pub fn cost(&self, freqs: &[u32]) -> u64
    {
        self.lens
            .iter()
            .zip(freqs)
            .map(|(l, f)| u64::from(*l) * u64::from(*f))
            .sum()
    }
}

/// The code length header of a dynamic block
///
/// The litlen and offset lengths are run length coded with
/// precode symbols 16 (repeat previous), 17 and 18 (repeat zero).
pub(crate) struct DynamicHeader
{
    num_litlen:  usize,
    num_offset:  usize,
    num_precode: usize,
    precode:     HuffmanCode,
    // (precode symbol, extra bits value)
    items:       Vec<(u8, u8)>
}

impl DynamicHeader
{
    pub fn new(litlen_lens: &[u8], offset_lens: &[u8]) -> DynamicHeader
    {
        let mut num_litlen = litlen_lens.len();

        while num_litlen > 257 && litlen_lens[num_litlen - 1] == 0
        {
            num_litlen -= 1;
        }
        let mut num_offset = offset_lens.len();

        while num_offset > 1 && offset_lens[num_offset - 1] == 0
        {
            num_offset -= 1;
        }

        let mut all_lens = Vec::with_capacity(num_litlen + num_offset);
        all_lens.extend_from_slice(&litlen_lens[..num_litlen]);
        all_lens.extend_from_slice(&offset_lens[..num_offset]);

        let items = run_length_code(&all_lens);

        let mut freqs = [0_u32; DEFLATE_NUM_PRECODE_SYMS];

        for (sym, _) in &items
        {
            freqs[usize::from(*sym)] += 1;
        }
        ensure_two_used(&mut freqs);

        let precode = HuffmanCode::from_freqs(&freqs, DEFLATE_MAX_PRE_CODEWORD_LEN as u8);

        let mut num_precode = DEFLATE_NUM_PRECODE_SYMS;

        while num_precode > 4
            && precode.lens[usize::from(DEFLATE_PRECODE_LENS_PERMUTATION[num_precode - 1])] == 0
        {
            num_precode -= 1;
        }

        DynamicHeader {
            num_litlen,
            num_offset,
            num_precode,
            precode,
            items
        }
    }

    /// Size of the header in bits, not counting the 3 block header bits
    pub fn cost(&self) -> u64
    {
        let items: u64 = self
            .items
            .iter()
            .map(|(sym, _)| u64::from(self.precode.lens[usize::from(*sym)]) + extra_bits(*sym))
            .sum();

        5 + 5 + 4 + 3 * self.num_precode as u64 + items
    }

    pub fn write(&self, writer: &mut BitWriter)
    {
        writer.put_bits(5, (self.num_litlen - 257) as u64);
        writer.put_bits(5, (self.num_offset - 1) as u64);
        writer.put_bits(4, (self.num_precode - 4) as u64);

        for sym in &DEFLATE_PRECODE_LENS_PERMUTATION[..self.num_precode]
        {
            writer.put_bits(3, u64::from(self.precode.lens[usize::from(*sym)]));
        }
        for (sym, extra) in &self.items
        {
            self.precode.write(writer, usize::from(*sym));

            let extra_len = extra_bits(*sym);

            if extra_len != 0
            {
                writer.put_bits(extra_len as u8, u64::from(*extra));
            }
        }
    }
}

const fn extra_bits(precode_sym: u8) -> u64
{
    match precode_sym
    {
        16 => 2,
        17 => 3,
        18 => 7,
        _ => 0
    }
}

fn run_length_code(lens: &[u8]) -> Vec<(u8, u8)>
{
    let mut items = Vec::with_capacity(lens.len());
    let mut i = 0;

    while i < lens.len()
    {
        let value = lens[i];
        let mut run = lens[i..].iter().take_while(|l| **l == value).count();

        i += run;

        if value == 0
        {
            while run >= 11
            {
                let count = run.min(138);
                items.push((18, (count - 11) as u8));
                run -= count;
            }
            if run >= 3
            {
                items.push((17, (run - 3) as u8));
                run = 0;
            }
        }
        else if run >= 4
        {
            items.push((value, 0));
            run -= 1;

            while run >= 3
            {
                let count = run.min(6);
                items.push((16, (count - 3) as u8));
                run -= count;
            }
        }
        for _ in 0..run
        {
            items.push((value, 0));
        }
    }
    items
}

#[cfg(test)]
mod tests
{
    use super::{compute_code_lengths, compute_codes, run_length_code, DynamicHeader};
    use crate::constants::{GLOBAL_LITLEN_LENS, GLOBAL_OFFSET_LENS};

    fn kraft_sum(lens: &[u8], max: u8) -> u64
    {
        lens.iter()
            .filter(|l| **l != 0)
            .map(|l| 1_u64 << (max - l))
            .sum()
    }

    #[test]
    fn global_tables_are_complete()
    {
        assert_eq!(kraft_sum(&GLOBAL_LITLEN_LENS, 15), 1 << 15);
        assert_eq!(kraft_sum(&GLOBAL_OFFSET_LENS, 15), 1 << 15);
        assert!(GLOBAL_LITLEN_LENS.iter().all(|l| (1..=15).contains(l)));
        assert!(GLOBAL_OFFSET_LENS.iter().all(|l| (1..=15).contains(l)));
    }

    #[test]
    fn skewed_frequencies_respect_limit()
    {
        // fibonacci weights produce a maximally deep tree
        let mut freqs = vec![0_u32; 30];
        let (mut a, mut b) = (1_u32, 1_u32);
        for f in freqs.iter_mut()
        {
            *f = a;
            let c = a.saturating_add(b);
            a = b;
            b = c;
        }
        let mut lens = vec![0; 30];
        compute_code_lengths(&freqs, 7, &mut lens);

        assert!(lens.iter().all(|l| (1..=7).contains(l)));
        assert_eq!(kraft_sum(&lens, 7), 1 << 7);
        // the most frequent symbol never gets a longer code than the rarest
        assert!(lens[29] <= lens[0]);
    }

    #[test]
    fn single_symbol_gets_one_bit()
    {
        let mut lens = [0; 4];
        compute_code_lengths(&[0, 9, 0, 0], 15, &mut lens);
        assert_eq!(lens, [0, 1, 0, 0]);
    }

    #[test]
    fn canonical_codes_match_rfc_example()
    {
        // RFC 1951 section 3.2.2, lengths (3, 3, 3, 3, 3, 2, 4, 4)
        let lens = [3, 3, 3, 3, 3, 2, 4, 4];
        let mut codes = [0; 8];
        compute_codes(&lens, &mut codes);

        let expected = [0b010, 0b011, 0b100, 0b101, 0b110, 0b00, 0b1110, 0b1111];

        for i in 0..8
        {
            let reversed = codes[i].reverse_bits() >> (16 - lens[i]);
            assert_eq!(reversed, expected[i]);
        }
    }

    #[test]
    fn run_length_coding()
    {
        let mut lens = vec![8; 10];
        lens.extend_from_slice(&[0; 150]);
        lens.extend_from_slice(&[5, 5, 0, 0]);

        let items = run_length_code(&lens);
        assert_eq!(
            items,
            [
                (8, 0),
                (16, 3),
                (16, 0),
                (18, 127),
                (18, 1),
                (5, 0),
                (5, 0),
                (0, 0),
                (0, 0)
            ]
        );
    }

    #[test]
    fn header_cost_counts_written_bits()
    {
        let header = DynamicHeader::new(&GLOBAL_LITLEN_LENS, &GLOBAL_OFFSET_LENS);
        let mut writer = crate::bitwriter::BitWriter::with_capacity(256);
        header.write(&mut writer);
        assert_eq!(writer.bits_written() as u64, header.cost());
    }
}
