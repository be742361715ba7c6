/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Process wide cpu capability probe
//!
//! The accelerated filter routines need SSE2, SSSE3 and SSE4.1.
//! Detection runs at most once per process when the `std` feature
//! is enabled, concurrent first callers wait on that single run.

/// Return true if the accelerated (SIMD) code paths
/// can be used on this machine
///
/// This is a pure query, the first call caches the result
/// and later calls read the cached value.
///
/// ```
/// let supported = fpng_core::cpu::capabilities_supported();
/// // asking twice always gives the same answer
/// assert_eq!(supported, fpng_core::cpu::capabilities_supported());
/// ```
#[cfg(feature = "std")]
pub fn capabilities_supported() -> bool {
    static SUPPORTED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();

    *SUPPORTED.get_or_init(|| {
        let supported = detect();
        log::debug!("SIMD capability probe: {supported}");
        supported
    })
}

/// Return true if the accelerated (SIMD) code paths
/// can be used on this machine
///
/// Without `std` there is no runtime detection, so this
/// reports what the compilation target guarantees.
#[cfg(not(feature = "std"))]
pub const fn capabilities_supported() -> bool {
    cfg!(all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse2",
        target_feature = "ssse3",
        target_feature = "sse4.1"
    ))
}

#[cfg(all(feature = "std", any(target_arch = "x86", target_arch = "x86_64")))]
fn detect() -> bool {
    is_x86_feature_detected!("sse2")
        && is_x86_feature_detected!("ssse3")
        && is_x86_feature_detected!("sse4.1")
}

#[cfg(all(feature = "std", not(any(target_arch = "x86", target_arch = "x86_64"))))]
fn detect() -> bool {
    false
}

#[cfg(test)]
mod tests {
    #[test]
    fn probe_is_stable() {
        let first = super::capabilities_supported();
        for _ in 0..4 {
            assert_eq!(first, super::capabilities_supported());
        }
    }

    #[cfg(all(feature = "std", not(any(target_arch = "x86", target_arch = "x86_64"))))]
    #[test]
    fn probe_is_false_off_x86() {
        assert!(!super::capabilities_supported());
    }

    #[cfg(feature = "std")]
    #[test]
    fn probe_is_race_tolerant() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(super::capabilities_supported))
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }
}
