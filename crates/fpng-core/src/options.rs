/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoder and Encoder Options
//!
//! This module exposes a struct for which all the png
//! encoding and decoding routines can use to configure
//! themselves
pub use decoder::DecoderOptions;
pub use encoder::{CompressionFlags, EncoderOptions, FilterStrategy};

mod decoder;
mod encoder;
