// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact squared Euclidean distance transform with closest-point tracking.
//!
//! This is the separable lower-envelope-of-parabolas algorithm: one 1-D pass
//! along every row, then one along every column over the row results. Each
//! pass is linear in the line length, so the whole transform is `O(n²)` for
//! an `n × n` grid.

use alloc::vec::Vec;

use crate::GridPoint;

/// Squared distance stored in non-seed cells before a transform, and left in
/// cells no seed can reach.
pub const FAR: f32 = 1e20;

/// Reusable working storage for [`exact_transform`].
///
/// Buffers retain their capacity across runs, so a field recomputed every
/// frame allocates only once.
#[derive(Debug, Default)]
pub(crate) struct EdtScratch {
    /// Input values of the current line.
    f: Vec<f64>,
    /// Output values of the current line.
    d: Vec<f64>,
    /// Index of the winning parabola for each output.
    arg: Vec<usize>,
    /// Vertices of the parabolas in the lower envelope.
    v: Vec<usize>,
    /// Boundaries between envelope parabolas; `z[k]..z[k + 1]` belongs to `v[k]`.
    z: Vec<f64>,
    /// Source column of the row-pass winner, per cell.
    src_col: Vec<usize>,
}

impl EdtScratch {
    fn prepare(&mut self, n: usize) {
        self.f.resize(n, 0.0);
        self.d.resize(n, 0.0);
        self.arg.resize(n, 0);
        self.v.resize(n, 0);
        self.z.resize(n + 1, 0.0);
        self.src_col.clear();
        self.src_col.resize(n * n, 0);
    }

    /// 1-D transform of `self.f[..n]` into `self.d` / `self.arg`.
    fn transform_line(&mut self, n: usize) {
        let Self { f, d, arg, v, z, .. } = self;
        let mut k = 0_usize;
        v[0] = 0;
        z[0] = f64::NEG_INFINITY;
        z[1] = f64::INFINITY;
        for q in 1..n {
            let s = loop {
                let s = intersect(f, v[k], q);
                if s <= z[k] && k > 0 {
                    k -= 1;
                } else {
                    break s;
                }
            };
            // With `k == 0`, `z[0]` is -inf, so only a -inf crossing can
            // dominate the first parabola; replace it outright.
            if s <= z[k] {
                v[0] = q;
                z[1] = f64::INFINITY;
                continue;
            }
            k += 1;
            v[k] = q;
            z[k] = s;
            z[k + 1] = f64::INFINITY;
        }

        k = 0;
        for q in 0..n {
            let qf = to_f64(q);
            while z[k + 1] < qf {
                k += 1;
            }
            let p = v[k];
            let dx = qf - to_f64(p);
            d[q] = dx * dx + f[p];
            arg[q] = p;
        }
    }
}

fn to_f64(i: usize) -> f64 {
    i as f64
}

/// Abscissa where the parabolas rooted at `p` and `q` (with `p < q`) cross.
fn intersect(f: &[f64], p: usize, q: usize) -> f64 {
    let (pf, qf) = (to_f64(p), to_f64(q));
    ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "squared distances fit f32; FAR saturates to itself"
)]
fn to_f32(v: f64) -> f32 {
    if v >= f64::from(FAR) { FAR } else { v as f32 }
}

/// Transforms `edt` in place and fills `cpt` with each cell's nearest seed.
///
/// On input, `edt` holds `0.0` for seed cells and [`FAR`] elsewhere. On
/// output it holds squared distances, with [`FAR`] (and `None` in `cpt`) for
/// cells that no seed reaches, which only happens when there are no seeds.
pub(crate) fn exact_transform(
    edt: &mut [f32],
    cpt: &mut [Option<GridPoint>],
    n: usize,
    scratch: &mut EdtScratch,
) {
    debug_assert_eq!(edt.len(), n * n, "edt buffer does not match grid size");
    debug_assert_eq!(cpt.len(), n * n, "cpt buffer does not match grid size");
    if n == 0 {
        return;
    }
    scratch.prepare(n);

    // Rows: distance along x to the nearest seed in the same row.
    for y in 0..n {
        let row = y * n;
        for x in 0..n {
            scratch.f[x] = f64::from(edt[row + x]);
        }
        scratch.transform_line(n);
        for x in 0..n {
            edt[row + x] = to_f32(scratch.d[x]);
            scratch.src_col[row + x] = scratch.arg[x];
        }
    }

    // Columns: combine the row results vertically.
    for x in 0..n {
        for y in 0..n {
            scratch.f[y] = f64::from(edt[y * n + x]);
        }
        scratch.transform_line(n);
        for y in 0..n {
            let value = to_f32(scratch.d[y]);
            let r = scratch.arg[y];
            edt[y * n + x] = value;
            cpt[y * n + x] = (value < FAR).then(|| GridPoint::new(scratch.src_col[r * n + x], r));
        }
    }
}
