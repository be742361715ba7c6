/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A fast deflate/zlib compressor tuned for filtered image rows
//!
//! Matching is greedy over a short hash chain and literals/matches are
//! coded with either a fixed global table or, when asked for, tables
//! built from this input's symbol statistics.
use alloc::vec::Vec;

use log::trace;

use crate::bitwriter::BitWriter;
use crate::constants::{
    DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN, DEFLATE_BLOCKTYPE_UNCOMPRESSED, DEFLATE_END_OF_BLOCK,
    DEFLATE_FIRST_LEN_SYM, DEFLATE_MAX_LITLEN_CODEWORD_LENGTH, DEFLATE_MAX_OFFSET_CODEWORD_LENGTH,
    DEFLATE_MAX_STORED_LEN, DEFLATE_MAX_USED_LITLEN_SYMS, DEFLATE_MAX_USED_OFFSET_SYMS,
    GLOBAL_LITLEN_LENS, GLOBAL_OFFSET_LENS, LENGTH_BASE, LENGTH_EXTRA, LENGTH_TO_SYMBOL,
    OFFSET_BASE, OFFSET_EXTRA
};
use crate::huffman::{ensure_two_used, DynamicHeader, HuffmanCode};
use crate::matcher::HashChain;

/// Input bytes tokenized before a block's tables are chosen
/// when per-file tables are requested
const CUSTOM_BLOCK_SIZE: usize = 1 << 18;

/// Set on tokens that are matches, literals are the byte value
const MATCH_FLAG: u32 = 1 << 31;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DeflateEncodingStrategy
{
    /// Stored blocks only
    NoCompression,
    /// One dynamic block coded with the precomputed global tables
    GlobalTables,
    /// Tables built per block from symbol frequencies, falling back to
    /// the global tables or stored blocks when those are smaller
    CustomTables
}

impl DeflateEncodingStrategy
{
    fn to_level(self) -> u8
    {
        match self
        {
            Self::NoCompression => 0,
            Self::GlobalTables => 1,
            Self::CustomTables => 2
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct DeflateEncodingOptions
{
    strategy:  DeflateEncodingStrategy,
    max_chain: usize
}

impl Default for DeflateEncodingOptions
{
    fn default() -> Self
    {
        DeflateEncodingOptions {
            strategy:  DeflateEncodingStrategy::GlobalTables,
            max_chain: 8
        }
    }
}

impl DeflateEncodingOptions
{
    pub const fn get_strategy(&self) -> DeflateEncodingStrategy
    {
        self.strategy
    }
    pub fn set_strategy(mut self, strategy: DeflateEncodingStrategy) -> Self
    {
        self.strategy = strategy;
        self
    }
    pub const fn get_max_chain(&self) -> usize
    {
        self.max_chain
    }
    /// Set how many hash chain candidates are tried per position
    ///
    /// Higher values find longer matches at a cost of speed
    pub fn set_max_chain(mut self, max_chain: usize) -> Self
    {
        self.max_chain = max_chain.max(1);
        self
    }
}

struct GlobalTables
{
    litlen: HuffmanCode,
    offset: HuffmanCode,
    header: DynamicHeader
}

impl GlobalTables
{
    fn new() -> GlobalTables
    {
        GlobalTables {
            litlen: HuffmanCode::from_lens(&GLOBAL_LITLEN_LENS),
            offset: HuffmanCode::from_lens(&GLOBAL_OFFSET_LENS),
            header: DynamicHeader::new(&GLOBAL_LITLEN_LENS, &GLOBAL_OFFSET_LENS)
        }
    }
}

/// Symbol statistics of a block
struct BlockStats
{
    litlen:     [u32; DEFLATE_MAX_USED_LITLEN_SYMS],
    offset:     [u32; DEFLATE_MAX_USED_OFFSET_SYMS],
    extra_bits: u64
}

impl BlockStats
{
    fn new(tokens: &[u32]) -> BlockStats
    {
        let mut stats = BlockStats {
            litlen:     [0; DEFLATE_MAX_USED_LITLEN_SYMS],
            offset:     [0; DEFLATE_MAX_USED_OFFSET_SYMS],
            extra_bits: 0
        };

        for token in tokens
        {
            if token & MATCH_FLAG == 0
            {
                stats.litlen[*token as usize] += 1;
                continue;
            }
            let (len_sym, offset_sym) = match_symbols(*token);

            stats.litlen[DEFLATE_FIRST_LEN_SYM + len_sym] += 1;
            stats.offset[offset_sym] += 1;
            stats.extra_bits +=
                u64::from(LENGTH_EXTRA[len_sym]) + u64::from(OFFSET_EXTRA[offset_sym]);
        }
        stats.litlen[DEFLATE_END_OF_BLOCK] += 1;

        stats
    }

    fn cost(&self, litlen: &HuffmanCode, offset: &HuffmanCode, header: &DynamicHeader) -> u64
    {
        header.cost() + litlen.cost(&self.litlen) + offset.cost(&self.offset) + self.extra_bits
    }
}

#[inline(always)]
fn make_match(length: usize, distance: usize) -> u32
{
    MATCH_FLAG | (((length - 3) as u32) << 15) | ((distance - 1) as u32)
}

/// Offset symbol for `distance - 1`
#[inline(always)]
fn offset_symbol(dist_minus_one: usize) -> usize
{
    if dist_minus_one < 4
    {
        return dist_minus_one;
    }
    let nbits = (usize::BITS - 1 - dist_minus_one.leading_zeros()) as usize;

    2 * nbits + ((dist_minus_one >> (nbits - 1)) & 1)
}

/// (length symbol - 257, offset symbol) of a match token
#[inline(always)]
fn match_symbols(token: u32) -> (usize, usize)
{
    let len_minus_three = ((token >> 15) & 0xFF) as usize;
    let dist_minus_one = (token & 0x7FFF) as usize;

    (
        usize::from(LENGTH_TO_SYMBOL[len_minus_three]),
        offset_symbol(dist_minus_one)
    )
}

#[inline(always)]
fn write_token(writer: &mut BitWriter, litlen: &HuffmanCode, offset: &HuffmanCode, token: u32)
{
    if token & MATCH_FLAG == 0
    {
        litlen.write(writer, token as usize);
        return;
    }
    let length = ((token >> 15) & 0xFF) as usize + 3;
    let distance = (token & 0x7FFF) as usize + 1;
    let (len_sym, offset_sym) = match_symbols(token);

    litlen.write(writer, DEFLATE_FIRST_LEN_SYM + len_sym);

    if LENGTH_EXTRA[len_sym] != 0
    {
        writer.put_bits(
            LENGTH_EXTRA[len_sym],
            (length - usize::from(LENGTH_BASE[len_sym])) as u64
        );
    }
    offset.write(writer, offset_sym);

    if OFFSET_EXTRA[offset_sym] != 0
    {
        writer.put_bits(
            OFFSET_EXTRA[offset_sym],
            (distance - usize::from(OFFSET_BASE[offset_sym])) as u64
        );
    }
}

/// Greedily tokenize `data[start..]` until at least `limit`,
/// returning where the last token ended
fn find_tokens<F: FnMut(u32)>(
    data: &[u8], matcher: &mut HashChain, start: usize, limit: usize, mut emit: F
) -> usize
{
    let mut pos = start;

    while pos < limit
    {
        match matcher.find(data, pos)
        {
            Some((length, distance)) =>
            {
                emit(make_match(length, distance));

                for p in pos..pos + length
                {
                    matcher.insert(data, p);
                }
                pos += length;
            }
            None =>
            {
                emit(u32::from(data[pos]));
                matcher.insert(data, pos);
                pos += 1;
            }
        }
    }
    pos
}

pub struct DeflateEncoder<'a>
{
    data:    &'a [u8],
    options: DeflateEncodingOptions
}

impl<'a> DeflateEncoder<'a>
{
    /// Create a new deflate encoder using the global tables
    pub fn new(data: &'a [u8]) -> DeflateEncoder<'a>
    {
        DeflateEncoder::new_with_options(data, DeflateEncodingOptions::default())
    }
    pub fn new_with_options(data: &'a [u8], options: DeflateEncodingOptions) -> DeflateEncoder<'a>
    {
        DeflateEncoder { data, options }
    }

    fn estimate_output_size(&self) -> usize
    {
        match self.options.strategy
        {
            DeflateEncodingStrategy::NoCompression =>
            {
                self.data.len() + 5 * (self.data.len() / DEFLATE_MAX_STORED_LEN + 1) + 16
            }
            _ => self.data.len() / 2 + 1024
        }
    }

    /// Compress the data into a zlib stream
    ///
    /// Two header bytes, the raw deflate stream and the
    /// big endian adler32 of the input
    #[cfg(feature = "zlib")]
    pub fn encode_zlib(&self) -> Vec<u8>
    {
        const ZLIB_CM_DEFLATE: u16 = 8;
        const ZLIB_CINFO_32K_WINDOW: u16 = 7;

        let mut writer = BitWriter::with_capacity(self.estimate_output_size() + 6);

        let level_hint = self.options.strategy.to_level();

        let mut hdr = (ZLIB_CM_DEFLATE << 8) | (ZLIB_CINFO_32K_WINDOW << 12);

        hdr |= u16::from(level_hint) << 6;
        hdr |= 31 - (hdr % 31);

        writer.write_aligned_bytes(&hdr.to_be_bytes());

        self.encode_blocks(&mut writer);

        let adler = crate::utils::calc_adler_hash(self.data);

        writer.write_aligned_bytes(&adler.to_be_bytes());
        writer.finish()
    }

    /// Compress the data into a raw deflate stream
    pub fn encode_deflate(&self) -> Vec<u8>
    {
        let mut writer = BitWriter::with_capacity(self.estimate_output_size());
        self.encode_blocks(&mut writer);
        writer.finish()
    }

    fn encode_blocks(&self, writer: &mut BitWriter)
    {
        match self.options.strategy
        {
            DeflateEncodingStrategy::NoCompression => write_stored_blocks(writer, self.data, true),
            DeflateEncodingStrategy::GlobalTables => self.encode_global(writer),
            DeflateEncodingStrategy::CustomTables => self.encode_custom(writer)
        }
    }

    /// Single dynamic block, tokens go straight to the writer
    fn encode_global(&self, writer: &mut BitWriter)
    {
        let data = self.data;
        let tables = GlobalTables::new();
        let mut matcher = HashChain::new(self.options.max_chain);

        writer.put_bits(1, 1);
        writer.put_bits(2, DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN);
        tables.header.write(writer);

        find_tokens(data, &mut matcher, 0, data.len(), |token| {
            write_token(writer, &tables.litlen, &tables.offset, token);
        });

        tables.litlen.write(writer, DEFLATE_END_OF_BLOCK);
    }

    fn encode_custom(&self, writer: &mut BitWriter)
    {
        let data = self.data;
        let tables = GlobalTables::new();
        let mut matcher = HashChain::new(self.options.max_chain);
        let mut tokens = Vec::with_capacity(CUSTOM_BLOCK_SIZE.min(data.len() + 1));
        let mut block_start = 0;

        loop
        {
            tokens.clear();

            let limit = (block_start + CUSTOM_BLOCK_SIZE).min(data.len());
            let block_end = find_tokens(data, &mut matcher, block_start, limit, |token| {
                tokens.push(token)
            });
            let last = block_end >= data.len();

            write_best_block(
                writer,
                &tables,
                &tokens,
                &data[block_start..block_end],
                last
            );

            if last
            {
                break;
            }
            block_start = block_end;
        }
    }
}

/// Write `tokens` with whichever of custom tables, global tables
/// or stored blocks gives the smallest output
fn write_best_block(
    writer: &mut BitWriter, global: &GlobalTables, tokens: &[u32], raw: &[u8], last: bool
)
{
    let stats = BlockStats::new(tokens);

    let mut litlen_freqs = stats.litlen;
    let mut offset_freqs = stats.offset;

    ensure_two_used(&mut litlen_freqs);
    ensure_two_used(&mut offset_freqs);

    let litlen = HuffmanCode::from_freqs(&litlen_freqs, DEFLATE_MAX_LITLEN_CODEWORD_LENGTH as u8);
    let offset = HuffmanCode::from_freqs(&offset_freqs, DEFLATE_MAX_OFFSET_CODEWORD_LENGTH as u8);
    let header = DynamicHeader::new(&litlen.lens, &offset.lens);

    let custom_cost = stats.cost(&litlen, &offset, &header);
    let global_cost = stats.cost(&global.litlen, &global.offset, &global.header);
    // block header, worst case padding and LEN/NLEN per stored block
    let stored_blocks = (raw.len() / DEFLATE_MAX_STORED_LEN + 1) as u64;
    let stored_cost = 8 * raw.len() as u64 + stored_blocks * (3 + 7 + 32);

    trace!(
        "Block of {} bytes, custom: {custom_cost} bits, global: {global_cost} bits, stored: {stored_cost} bits",
        raw.len()
    );

    if stored_cost < custom_cost.min(global_cost)
    {
        write_stored_blocks(writer, raw, last);
        return;
    }
    let (litlen, offset, header) = if custom_cost < global_cost
    {
        (&litlen, &offset, &header)
    }
    else
    {
        (&global.litlen, &global.offset, &global.header)
    };

    writer.put_bits(1, u64::from(last));
    writer.put_bits(2, DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN);
    header.write(writer);

    for token in tokens
    {
        write_token(writer, litlen, offset, *token);
    }
    litlen.write(writer, DEFLATE_END_OF_BLOCK);
}

/// Write `data` as stored blocks, the last one final if `last` is set
///
/// Empty input still produces one (empty) block so the stream is valid
fn write_stored_blocks(writer: &mut BitWriter, data: &[u8], last: bool)
{
    let mut chunks = data.chunks(DEFLATE_MAX_STORED_LEN).peekable();

    if chunks.peek().is_none()
    {
        write_stored_block(writer, &[], last);
        return;
    }
    while let Some(chunk) = chunks.next()
    {
        let is_final = last && chunks.peek().is_none();
        write_stored_block(writer, chunk, is_final);
    }
}

fn write_stored_block(writer: &mut BitWriter, chunk: &[u8], is_final: bool)
{
    let len = chunk.len() as u16;

    writer.put_bits(1, u64::from(is_final));
    writer.put_bits(2, DEFLATE_BLOCKTYPE_UNCOMPRESSED);

    let mut len_nlen = [0; 4];
    len_nlen[..2].copy_from_slice(&len.to_le_bytes());
    len_nlen[2..].copy_from_slice(&(!len).to_le_bytes());

    writer.write_aligned_bytes(&len_nlen);
    writer.write_aligned_bytes(chunk);
}
