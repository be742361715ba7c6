/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Byte stream readers and writers
//!
//! The png container stores every multi-byte integer in big endian,
//! so the reader and writer here are tuned for that, with the reader
//! borrowing an in-memory slice and the writer appending to an owned vector
use core::fmt::Formatter;

pub use reader::ZByteReader;
pub use writer::ZByteWriter;

mod reader;
mod writer;

pub enum ZByteIoError {
    // requested, remaining
    NotEnoughBytes(usize, usize)
}

impl core::fmt::Debug for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ZByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
        }
    }
}

impl core::fmt::Display for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ZByteIoError {}

