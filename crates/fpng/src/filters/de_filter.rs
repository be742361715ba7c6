/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Inverse filters, turning residuals back into pixels
use crate::enums::FilterMethod;

/// Undo `filter` for one scanline
///
/// `prev_row` is the already reconstructed row above, all zeroes for the
/// first row, and `raw`, `prev_row` and `current` share the same length.
pub(crate) fn de_filter_row(
    filter: FilterMethod, prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize,
    use_sse41: bool
)
{
    match filter
    {
        FilterMethod::None => current.copy_from_slice(raw),
        FilterMethod::Sub => handle_sub(raw, current, components, use_sse41),
        FilterMethod::Up => handle_up(prev_row, raw, current),
        FilterMethod::Average => handle_avg(prev_row, raw, current, components, use_sse41),
        FilterMethod::Paeth => handle_paeth(prev_row, raw, current, components, use_sse41)
    }
}

#[allow(clippy::manual_memcpy)]
fn handle_sub(raw: &[u8], current: &mut [u8], components: usize, use_sse41: bool)
{
    if current.len() < components || raw.len() < components
    {
        return;
    }
    #[cfg(feature = "sse")]
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if use_sse41
        {
            // SAFETY: use_sse41 is only set after the capability probe succeeded
            unsafe {
                match components
                {
                    3 => return crate::filters::sse4::de_filter_sub_sse2::<3>(raw, current),
                    4 => return crate::filters::sse4::de_filter_sub_sse2::<4>(raw, current),
                    _ => ()
                }
            }
        }
    }
    #[cfg(not(all(feature = "sse", any(target_arch = "x86", target_arch = "x86_64"))))]
    let _ = use_sse41;

    // handle leftmost pixel explicitly
    for i in 0..components
    {
        current[i] = raw[i];
    }
    // raw length is one row,so always keep it in check
    let end = current.len().min(raw.len());

    for i in components..end
    {
        let a = current[i - components];
        current[i] = raw[i].wrapping_add(a);
    }
}

fn handle_up(prev_row: &[u8], raw: &[u8], current: &mut [u8])
{
    for ((filt, recon), up) in raw.iter().zip(current).zip(prev_row)
    {
        *recon = (*filt).wrapping_add(*up)
    }
}

#[allow(clippy::manual_memcpy)]
fn handle_avg(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize, use_sse41: bool)
{
    if raw.len() < components || current.len() < components || prev_row.len() < components
    {
        return;
    }

    #[cfg(feature = "sse")]
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if use_sse41
        {
            // SAFETY: use_sse41 is only set after the capability probe succeeded
            unsafe {
                match components
                {
                    3 => return crate::filters::sse4::de_filter_avg_sse2::<3>(prev_row, raw, current),
                    4 => return crate::filters::sse4::de_filter_avg_sse2::<4>(prev_row, raw, current),
                    _ => ()
                }
            }
        }
    }
    #[cfg(not(all(feature = "sse", any(target_arch = "x86", target_arch = "x86_64"))))]
    let _ = use_sse41;

    // handle leftmost pixel explicitly
    for i in 0..components
    {
        current[i] = raw[i].wrapping_add(prev_row[i] >> 1);
    }
    let end = current.len().min(raw.len()).min(prev_row.len());

    for i in components..end
    {
        let a = current[i - components];
        let b = prev_row[i];

        // truncating average without leaving 8 bits,
        // from the stanford bit hacks
        let c = (a & b) + ((a ^ b) >> 1);

        current[i] = raw[i].wrapping_add(c);
    }
}

#[allow(clippy::manual_memcpy)]
fn handle_paeth(
    prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize, use_sse41: bool
)
{
    if raw.len() < components || current.len() < components || prev_row.len() < components
    {
        return;
    }

    #[cfg(feature = "sse")]
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if use_sse41
        {
            // SAFETY: use_sse41 is only set after the capability probe succeeded
            unsafe {
                match components
                {
                    3 =>
                    {
                        return crate::filters::sse4::de_filter_paeth_sse41::<3>(
                            prev_row, raw, current
                        )
                    }
                    4 =>
                    {
                        return crate::filters::sse4::de_filter_paeth_sse41::<4>(
                            prev_row, raw, current
                        )
                    }
                    _ => ()
                }
            }
        }
    }
    #[cfg(not(all(feature = "sse", any(target_arch = "x86", target_arch = "x86_64"))))]
    let _ = use_sse41;

    // leftmost pixel has no left neighbour, so paeth picks up
    for i in 0..components
    {
        current[i] = raw[i].wrapping_add(prev_row[i]);
    }
    let end = current.len().min(raw.len()).min(prev_row.len());

    for i in components..end
    {
        let paeth_res = paeth(
            current[i - components],
            prev_row[i],
            prev_row[i - components]
        );
        current[i] = raw[i].wrapping_add(paeth_res)
    }
}

#[inline(always)]
pub(crate) fn paeth(a: u8, b: u8, c: u8) -> u8
{
    // FROM STB
    // This formulation looks very different from the reference in the PNG spec, but is
    // actually equivalent and has favorable data dependencies and admits straightforward
    // generation of branch-free code, which helps performance significantly.
    let a = i32::from(a);
    let b = i32::from(b);
    let c = i32::from(c);
    let thresh = c * 3 - (a + b);
    let lo = if a < b { a } else { b };
    let hi = if a < b { b } else { a };

    let t0 = if hi <= thresh { lo } else { c };
    let t1 = if thresh <= lo { hi } else { t0 };

    t1 as u8
}

#[cfg(test)]
mod tests
{
    use alloc::vec;

    use super::{de_filter_row, paeth};
    use crate::enums::FilterMethod;

    fn reference_paeth(a: u8, b: u8, c: u8) -> u8
    {
        let p = i16::from(a) + i16::from(b) - i16::from(c);
        let pa = (p - i16::from(a)).abs();
        let pb = (p - i16::from(b)).abs();
        let pc = (p - i16::from(c)).abs();

        if pa <= pb && pa <= pc
        {
            a
        }
        else if pb <= pc
        {
            b
        }
        else
        {
            c
        }
    }

    #[test]
    fn paeth_matches_reference()
    {
        for a in (0..=255).step_by(5)
        {
            for b in (0..=255).step_by(3)
            {
                for c in (0..=255).step_by(7)
                {
                    assert_eq!(paeth(a, b, c), reference_paeth(a, b, c));
                }
            }
        }
    }

    #[test]
    fn sse_and_scalar_agree()
    {
        let prev: vec::Vec<u8> = (0..96_u32).map(|x| (x * 37 % 256) as u8).collect();
        let raw: vec::Vec<u8> = (0..96_u32).map(|x| (x * 101 % 253) as u8).collect();

        for components in [3, 4]
        {
            for filter in FilterMethod::ALL
            {
                let mut scalar = vec![0; 96];
                let mut simd = vec![0; 96];

                de_filter_row(filter, &prev, &raw, &mut scalar, components, false);
                de_filter_row(
                    filter,
                    &prev,
                    &raw,
                    &mut simd,
                    components,
                    fpng_core::cpu::capabilities_supported()
                );
                assert_eq!(scalar, simd, "{filter:?} with {components} components");
            }
        }
    }
}
