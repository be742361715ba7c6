/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the fpng crates
//!
//! This crate provides a set of core routines shared
//! by the png codec and the deflate engine
//!
//! It currently contains
//!
//! - A bytestream reader and writer with big endian aware reads and writes
//! - Colorspace information for the supported pixel layouts
//! - Encoder and decoder options, including [`CompressionFlags`](options::CompressionFlags)
//! - A process wide cpu capability probe
//!
//! This library is `#[no_std]` with `alloc` needed for defining `Vec`
//!
//! # Features
//!  - `std`: Enables runtime cpu feature detection and caching of the result.
//!     Without it, only compile time target features are consulted
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod bytestream;
pub mod colorspace;
pub mod cpu;
pub mod options;
