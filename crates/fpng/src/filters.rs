//! Scanline filtering
//!
//! The encoder side picks a predictor per row and writes residuals,
//! the decoder side (in `de_filter`) reverses that.
use alloc::vec;
use alloc::vec::Vec;

use fpng_core::options::FilterStrategy;

pub(crate) use crate::filters::de_filter::{de_filter_row, paeth};
use crate::enums::FilterMethod;

mod de_filter;
mod sse4;

/// Compute the residuals of `current` under `method` into `out`
///
/// `prev_row` is the row above, all zeroes for the first row.
pub(crate) fn filter_row(
    method: FilterMethod, prev_row: &[u8], current: &[u8], components: usize, out: &mut [u8],
    use_sse41: bool
)
{
    let lead = components.min(current.len());

    match method
    {
        FilterMethod::None => out.copy_from_slice(current),
        FilterMethod::Sub =>
        {
            #[cfg(all(feature = "sse", any(target_arch = "x86", target_arch = "x86_64")))]
            {
                if use_sse41
                {
                    // SAFETY: use_sse41 is only set after the capability probe succeeded
                    unsafe { sse4::filter_sub_sse2(current, components, out) };
                    return;
                }
            }
            out[..lead].copy_from_slice(&current[..lead]);

            for i in lead..current.len()
            {
                out[i] = current[i].wrapping_sub(current[i - components]);
            }
        }
        FilterMethod::Up =>
        {
            #[cfg(all(feature = "sse", any(target_arch = "x86", target_arch = "x86_64")))]
            {
                if use_sse41
                {
                    // SAFETY: as above
                    unsafe { sse4::filter_up_sse2(prev_row, current, out) };
                    return;
                }
            }
            for ((o, x), b) in out.iter_mut().zip(current).zip(prev_row)
            {
                *o = x.wrapping_sub(*b);
            }
        }
        FilterMethod::Average =>
        {
            for i in 0..lead
            {
                out[i] = current[i].wrapping_sub(prev_row[i] >> 1);
            }
            for i in lead..current.len()
            {
                let a = current[i - components];
                let b = prev_row[i];

                out[i] = current[i].wrapping_sub((a & b) + ((a ^ b) >> 1));
            }
        }
        FilterMethod::Paeth =>
        {
            for i in 0..lead
            {
                out[i] = current[i].wrapping_sub(prev_row[i]);
            }
            for i in lead..current.len()
            {
                let predictor = paeth(
                    current[i - components],
                    prev_row[i],
                    prev_row[i - components]
                );
                out[i] = current[i].wrapping_sub(predictor);
            }
        }
    }
    #[cfg(not(all(feature = "sse", any(target_arch = "x86", target_arch = "x86_64"))))]
    let _ = use_sse41;
}

/// Sum of the residuals read as signed bytes, smaller compresses better
fn residual_cost(residuals: &[u8]) -> u64
{
    residuals
        .iter()
        .map(|x| u64::from((*x as i8).unsigned_abs()))
        .sum()
}

const fn candidates(strategy: FilterStrategy) -> &'static [FilterMethod]
{
    match strategy
    {
        FilterStrategy::Fast => &[FilterMethod::Sub, FilterMethod::Up],
        FilterStrategy::Adaptive => &FilterMethod::ALL,
        FilterStrategy::None => &[FilterMethod::None],
        FilterStrategy::Sub => &[FilterMethod::Sub],
        FilterStrategy::Up => &[FilterMethod::Up],
        FilterStrategy::Average => &[FilterMethod::Average],
        FilterStrategy::Paeth => &[FilterMethod::Paeth]
    }
}

/// Picks a predictor per row, keeping two scratch rows around
pub(crate) struct FilterSelector
{
    strategy:   FilterStrategy,
    components: usize,
    use_sse41:  bool,
    best:       Vec<u8>,
    trial:      Vec<u8>
}

impl FilterSelector
{
    pub fn new(
        strategy: FilterStrategy, row_bytes: usize, components: usize, use_sse41: bool
    ) -> FilterSelector
    {
        FilterSelector {
            strategy,
            components,
            use_sse41,
            best: vec![0; row_bytes],
            trial: vec![0; row_bytes]
        }
    }

    /// Choose the cheapest predictor for `current`, ties go to the
    /// earlier method in filter byte order.
    ///
    /// Returns the method and its residuals
    pub fn select(&mut self, prev_row: &[u8], current: &[u8]) -> (FilterMethod, &[u8])
    {
        let methods = candidates(self.strategy);

        let mut best_method = methods[0];

        filter_row(
            best_method,
            prev_row,
            current,
            self.components,
            &mut self.best,
            self.use_sse41
        );

        if methods.len() > 1
        {
            let mut best_cost = residual_cost(&self.best);

            for method in &methods[1..]
            {
                filter_row(
                    *method,
                    prev_row,
                    current,
                    self.components,
                    &mut self.trial,
                    self.use_sse41
                );
                let cost = residual_cost(&self.trial);

                if cost < best_cost
                {
                    best_cost = cost;
                    best_method = *method;
                    core::mem::swap(&mut self.best, &mut self.trial);
                }
            }
        }
        (best_method, &self.best)
    }
}

/// Filter a whole image, each row prefixed by its filter byte
pub(crate) fn filter_scanlines(
    data: &[u8], width: usize, height: usize, components: usize, strategy: FilterStrategy,
    use_sse41: bool
) -> Vec<u8>
{
    let row_bytes = width * components;
    let mut out = Vec::with_capacity((row_bytes + 1) * height);

    if row_bytes == 0
    {
        return out;
    }
    let zero_row = vec![0; row_bytes];
    let mut selector = FilterSelector::new(strategy, row_bytes, components, use_sse41);
    let mut prev_row: &[u8] = &zero_row;

    for current in data.chunks_exact(row_bytes).take(height)
    {
        let (method, residuals) = selector.select(prev_row, current);

        out.push(method.to_int());
        out.extend_from_slice(residuals);

        prev_row = current;
    }
    out
}

#[cfg(test)]
mod tests
{
    use alloc::vec;
    use alloc::vec::Vec;

    use fpng_core::options::FilterStrategy;

    use super::{de_filter_row, filter_row, filter_scanlines, FilterSelector};
    use crate::enums::FilterMethod;

    fn gradient(width: usize, height: usize, components: usize) -> Vec<u8>
    {
        (0..width * height * components)
            .map(|i| {
                let px = i / components;
                ((px % width) * 3 + (px / width) * 7 + (i % components) * 40) as u8
            })
            .collect()
    }

    #[test]
    fn filters_invert()
    {
        let prev: Vec<u8> = (0..60_u32).map(|x| (x * 13) as u8).collect();
        let current: Vec<u8> = (0..60_u32).map(|x| (x * 29 + 7) as u8).collect();

        for components in [3, 4]
        {
            for method in FilterMethod::ALL
            {
                for sse in [false, true]
                {
                    let sse = sse && fpng_core::cpu::capabilities_supported();
                    let mut residuals = vec![0; 60];
                    let mut restored = vec![0; 60];

                    filter_row(method, &prev, &current, components, &mut residuals, sse);
                    de_filter_row(method, &prev, &residuals, &mut restored, components, sse);

                    assert_eq!(restored, current, "{method:?}, {components} components");
                }
            }
        }
    }

    #[test]
    fn first_row_sees_zero_row()
    {
        let current = [10_u8, 20, 30, 11, 21, 31];
        let zero = [0_u8; 6];
        let mut selector = FilterSelector::new(FilterStrategy::Up, 6, 3, false);

        let (method, residuals) = selector.select(&zero, &current);

        assert_eq!(method, FilterMethod::Up);
        assert_eq!(residuals, &current);
    }

    #[test]
    fn ties_pick_earlier_method()
    {
        // a flat row costs the same under none/sub/up when the previous row matches
        let row = [0_u8; 12];
        let mut selector = FilterSelector::new(FilterStrategy::Adaptive, 12, 4, false);

        assert_eq!(selector.select(&row, &row).0, FilterMethod::None);

        let mut selector = FilterSelector::new(FilterStrategy::Fast, 12, 4, false);
        assert_eq!(selector.select(&row, &row).0, FilterMethod::Sub);
    }

    #[test]
    fn horizontal_gradient_prefers_sub()
    {
        let row: Vec<u8> = (0..30_u8).map(|x| x * 5).collect();
        let prev = [200_u8; 30];
        let mut selector = FilterSelector::new(FilterStrategy::Fast, 30, 3, false);

        assert_eq!(selector.select(&prev, &row).0, FilterMethod::Sub);
    }

    #[test]
    fn filtered_image_layout()
    {
        let (width, height) = (7, 5);
        let data = gradient(width, height, 3);

        for strategy in [FilterStrategy::Fast, FilterStrategy::Adaptive, FilterStrategy::Paeth]
        {
            let filtered = filter_scanlines(&data, width, height, 3, strategy, false);
            assert_eq!(filtered.len(), height * (width * 3 + 1));

            // undo it row by row
            let mut prev = vec![0; width * 3];
            for (row, expected) in filtered.chunks_exact(width * 3 + 1).zip(data.chunks_exact(width * 3))
            {
                let method = FilterMethod::from_int(row[0]).unwrap();
                let mut out = vec![0; width * 3];

                de_filter_row(method, &prev, &row[1..], &mut out, 3, false);
                assert_eq!(out, expected);
                prev = out;
            }
        }
    }
}
