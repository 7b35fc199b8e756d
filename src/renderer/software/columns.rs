//! Column-bucketed wall pass.
//!
//! The screen width is cut into at most [`MAX_THREADS`] contiguous buckets
//! (the last one takes the remainder). Each bucket owns disjoint slices of a
//! column-major strip buffer, the z-buffer and the span list, so workers
//! need no locking. A serial composite then copies every column's written
//! rows into the row-major colour buffer.

use std::ops::Range;

use log::trace;
use smallvec::SmallVec;

use super::{
    buffers::RenderBuffers,
    walls::{ColumnTarget, WallCaster},
};
use crate::renderer::Rgba;

pub const MAX_THREADS: usize = 4;

/// Rows `start..end` of a column that the wall pass wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnSpan {
    pub start: u32,
    pub end: u32,
}

impl ColumnSpan {
    pub const EMPTY: ColumnSpan = ColumnSpan { start: 0, end: 0 };

    #[inline]
    pub fn rows(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

pub type Buckets = SmallVec<[Range<usize>; MAX_THREADS]>;

/// Split `0..width` into `n` contiguous ranges of `width / n` columns, the
/// last range absorbing the remainder.
pub fn bucket_ranges(width: usize, n: usize) -> Buckets {
    let n = n.clamp(1, MAX_THREADS).min(width.max(1));
    let base = width / n;
    (0..n)
        .map(|i| {
            let start = i * base;
            let end = if i + 1 == n { width } else { start + base };
            start..end
        })
        .collect()
}

/// Per-frame strip storage, kept alive between frames.
#[derive(Default)]
pub struct ColumnStrips {
    /// `width * height` texels, column-major.
    texels: Vec<Rgba>,
    spans: Vec<ColumnSpan>,
}

impl ColumnStrips {
    fn resize(&mut self, width: usize, height: usize) {
        self.texels.resize(width * height, 0);
        self.spans.resize(width, ColumnSpan::EMPTY);
    }

    /// Cast and draw every column, then composite into `buffers.color`.
    pub fn render(&mut self, caster: &WallCaster<'_>, threads: usize, buffers: &mut RenderBuffers) {
        let (w, h) = (buffers.width, buffers.height);
        self.resize(w, h);

        let buckets = bucket_ranges(w, threads);
        trace!("wall pass: {} bucket(s)", buckets.len());

        if buckets.len() == 1 {
            render_bucket(caster, 0..w, h, &mut self.texels, &mut buffers.depth, &mut self.spans);
        } else {
            let mut texels: &mut [Rgba] = &mut self.texels;
            let mut depth: &mut [f32] = &mut buffers.depth;
            let mut spans: &mut [ColumnSpan] = &mut self.spans;
            rayon::scope(|s| {
                for range in buckets {
                    let n = range.len();
                    let (t, rest) = std::mem::take(&mut texels).split_at_mut(n * h);
                    texels = rest;
                    let (d, rest) = std::mem::take(&mut depth).split_at_mut(n);
                    depth = rest;
                    let (sp, rest) = std::mem::take(&mut spans).split_at_mut(n);
                    spans = rest;
                    s.spawn(move |_| render_bucket(caster, range, h, t, d, sp));
                }
            });
        }

        self.composite(&mut buffers.color, w, h);
    }

    fn composite(&self, color: &mut [Rgba], w: usize, h: usize) {
        for (x, span) in self.spans.iter().enumerate() {
            let column = &self.texels[x * h..(x + 1) * h];
            for y in span.rows() {
                color[y * w + x] = column[y];
            }
        }
    }
}

/// Render columns `range`; slices are local to the bucket.
fn render_bucket(
    caster: &WallCaster<'_>,
    range: Range<usize>,
    h: usize,
    texels: &mut [Rgba],
    depth: &mut [f32],
    spans: &mut [ColumnSpan],
) {
    let columns = texels.chunks_exact_mut(h.max(1));
    for (((x, col), d), span) in range.zip(columns).zip(depth).zip(spans) {
        caster.render_column(
            x,
            ColumnTarget {
                texels: col,
                depth: d,
                span,
            },
        );
    }
}
