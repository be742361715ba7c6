/// Number of symbols in each Huffman code.  Note: for the literal/length
/// and offset codes, these are actually the maximum values; a given block
/// might use fewer symbols.
pub const DEFLATE_NUM_PRECODE_SYMS: usize = 19;
pub const DEFLATE_NUM_LITLEN_SYMS: usize = 288;
pub const DEFLATE_NUM_OFFSET_SYMS: usize = 32;

/// Symbols that may legally appear in a stream, the two
/// trailing litlen and offset symbols are reserved
pub const DEFLATE_MAX_USED_LITLEN_SYMS: usize = 286;
pub const DEFLATE_MAX_USED_OFFSET_SYMS: usize = 30;

/// Division between literals and lengths in the literal/length alphabet
pub const DEFLATE_END_OF_BLOCK: usize = 256;
pub const DEFLATE_FIRST_LEN_SYM: usize = 257;

/// Order which precode lengths are stored
pub static DEFLATE_PRECODE_LENS_PERMUTATION: [u8; DEFLATE_NUM_PRECODE_SYMS] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15
];

/// Maximum codeword length across all codes.
pub const DEFLATE_MAX_CODEWORD_LENGTH: usize = 15;
pub const DEFLATE_MAX_PRE_CODEWORD_LEN: usize = 7;
pub const DEFLATE_MAX_LITLEN_CODEWORD_LENGTH: usize = 15;
pub const DEFLATE_MAX_OFFSET_CODEWORD_LENGTH: usize = 15;

pub const DEFLATE_MIN_MATCH_LEN: usize = 3;
pub const DEFLATE_MAX_MATCH_LEN: usize = 258;
pub const DEFLATE_WINDOW_SIZE: usize = 32768;

/// Largest payload a stored block can carry
pub const DEFLATE_MAX_STORED_LEN: usize = 65535;

pub const DEFLATE_BLOCKTYPE_UNCOMPRESSED: u64 = 0;
pub const DEFLATE_BLOCKTYPE_STATIC: u64 = 1;
pub const DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN: u64 = 2;

pub const PRECODE_TABLE_BITS: usize = 7;
pub const LITLEN_TABLE_BITS: usize = 11;
pub const OFFSET_TABLE_BITS: usize = 8;

/// Table sizes large enough for any complete code, computed with
/// the `enough` utility from zlib for the table bits above
pub const PRECODE_ENOUGH: usize = 128;
pub const LITLEN_ENOUGH: usize = 2342;
pub const OFFSET_ENOUGH: usize = 402;

/// A decode table entry pointing to a subtable
pub const HUFFDEC_SUBTABLE_POINTER: u32 = 0x4000;
pub const HUFFDEC_EXCEPTIONAL: u32 = 0x8000;

pub const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115,
    131, 163, 195, 227, 258
];

pub const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0
];

pub static OFFSET_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577
];

pub static OFFSET_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13
];

/// Maps `match_length - 3` to its length symbol offset from 257
pub static LENGTH_TO_SYMBOL: [u8; 256] = build_length_symbols();

const fn build_length_symbols() -> [u8; 256] {
    let mut table = [0_u8; 256];
    let mut sym = 0;

    while sym < 29 {
        let base = LENGTH_BASE[sym] as usize - 3;
        let count = 1 << LENGTH_EXTRA[sym];
        let mut i = 0;

        while i < count && base + i < 256 {
            table[base + i] = sym as u8;
            i += 1;
        }
        sym += 1;
    }
    // 258 has its own symbol even though 227 + 31 reaches it
    table[255] = 28;
    table
}

/// Global literal/length code lengths used when the caller does not ask
/// for per-file tables.
///
/// Built offline from a model of filtered image residuals, short codes
/// sit around 0 and 255 (small positive and negative deltas) and every
/// legal symbol has a code so any token stream can be expressed.
pub static GLOBAL_LITLEN_LENS: [u8; DEFLATE_MAX_USED_LITLEN_SYMS] = [
    3, 4, 4, 5, 5, 5, 6, 6, 7, 7, 7, 8, 8, 8, 8, 8,
    8, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
    9, 9, 9, 9, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10,
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10,
    10, 10, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12,
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12,
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12,
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 10,
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10,
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 9, 9, 9, 9,
    9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
    8, 8, 8, 8, 8, 8, 7, 7, 7, 6, 6, 5, 5, 4, 4, 4,
    15, 6, 7, 7, 7, 8, 8, 8, 9, 9, 9, 10, 10, 10, 11, 11,
    12, 12, 12, 13, 13, 13, 13, 14, 15, 15, 15, 15, 15, 7
];

/// Global offset code lengths, near offsets are favoured since the
/// previous pixel is the most common back reference
pub static GLOBAL_OFFSET_LENS: [u8; DEFLATE_MAX_USED_OFFSET_SYMS] = [
    2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 7, 7, 7,
    8, 8, 8, 9, 9, 9, 10, 10, 10, 10, 11, 11, 11, 11
];
