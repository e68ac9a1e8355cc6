// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Approximate nearest-seed propagation by jump flooding.
//!
//! Each round, every cell looks at its eight neighbours `step` cells away
//! (plus itself) and adopts whichever recorded seed is closest. `step` starts
//! at half the grid size and halves down to one. Results are written to a
//! second buffer and the two are swapped between rounds, so every round reads
//! a consistent snapshot of the previous one.
//!
//! The result is exact for a single seed and usually exact otherwise; rare
//! cells may settle on a seed that is slightly farther than the true nearest.

use alloc::vec::Vec;

use crate::GridPoint;
use crate::edt::FAR;

/// Reusable ping-pong buffer for [`jump_flood`].
#[derive(Debug, Default)]
pub(crate) struct JumpFloodScratch {
    back: Vec<Option<GridPoint>>,
}

/// Fills `cpt` with approximate nearest seeds and `edt` with squared distances.
///
/// On input, `edt` holds `0.0` for seed cells and [`FAR`] elsewhere; `cpt` is
/// overwritten.
pub(crate) fn jump_flood(
    edt: &mut [f32],
    cpt: &mut [Option<GridPoint>],
    n: usize,
    scratch: &mut JumpFloodScratch,
) {
    debug_assert_eq!(edt.len(), n * n, "edt buffer does not match grid size");
    debug_assert_eq!(cpt.len(), n * n, "cpt buffer does not match grid size");
    if n == 0 {
        return;
    }

    for (i, (slot, &d)) in cpt.iter_mut().zip(edt.iter()).enumerate() {
        *slot = (d == 0.0).then(|| GridPoint::new(i % n, i / n));
    }

    let back = &mut scratch.back;
    back.clear();
    back.resize(n * n, None);

    let mut step = n.next_power_of_two() / 2;
    while step > 0 {
        flood_round(cpt, back, n, step);
        // `cpt` holds the newest round after the swap.
        cpt.swap_with_slice(back);
        step /= 2;
    }

    for (i, (d, seed)) in edt.iter_mut().zip(cpt.iter()).enumerate() {
        let here = GridPoint::new(i % n, i / n);
        *d = seed.map_or(FAR, |s| to_f32(s.distance_squared(here)));
    }
}

fn to_f32(d: usize) -> f32 {
    d as f32
}

fn flood_round(read: &[Option<GridPoint>], write: &mut [Option<GridPoint>], n: usize, step: usize) {
    for y in 0..n {
        for x in 0..n {
            let here = GridPoint::new(x, y);
            let mut best = read[y * n + x];
            let mut best_d = best.map_or(usize::MAX, |s| s.distance_squared(here));
            for ny in neighbours(y, step, n) {
                for nx in neighbours(x, step, n) {
                    if let Some(seed) = read[ny * n + nx] {
                        let d = seed.distance_squared(here);
                        if d < best_d {
                            best = Some(seed);
                            best_d = d;
                        }
                    }
                }
            }
            write[y * n + x] = best;
        }
    }
}

/// `v - step`, `v`, `v + step`, keeping only those inside `0..n`.
fn neighbours(v: usize, step: usize, n: usize) -> impl Iterator<Item = usize> {
    [v.checked_sub(step), Some(v), v.checked_add(step).filter(|&w| w < n)]
        .into_iter()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edt::{EdtScratch, exact_transform};
    use alloc::vec;

    fn seeded(n: usize, seeds: &[(usize, usize)]) -> Vec<f32> {
        let mut edt = vec![FAR; n * n];
        for &(x, y) in seeds {
            edt[y * n + x] = 0.0;
        }
        edt
    }

    #[test]
    fn single_seed_is_exact() {
        for n in [1, 5, 16, 33] {
            let seeds = [(n / 3, n / 2)];
            let mut jfa = seeded(n, &seeds);
            let mut jfa_cpt = vec![None; n * n];
            jump_flood(&mut jfa, &mut jfa_cpt, n, &mut JumpFloodScratch::default());

            let mut exact = seeded(n, &seeds);
            let mut exact_cpt = vec![None; n * n];
            exact_transform(&mut exact, &mut exact_cpt, n, &mut EdtScratch::default());

            assert_eq!(jfa, exact, "n = {n}");
            assert_eq!(jfa_cpt, exact_cpt, "n = {n}");
        }
    }

    #[test]
    fn every_cell_points_at_a_seed() {
        let n = 24;
        let seeds = [(0, 0), (23, 2), (7, 19), (15, 11), (2, 22)];
        let mut edt = seeded(n, &seeds);
        let mut cpt = vec![None; n * n];
        jump_flood(&mut edt, &mut cpt, n, &mut JumpFloodScratch::default());
        for (i, seed) in cpt.iter().enumerate() {
            let seed = seed.unwrap();
            assert!(seeds.contains(&(seed.x, seed.y)), "cell {i} -> {seed:?}");
            let here = GridPoint::new(i % n, i / n);
            assert_eq!(edt[i], to_f32(seed.distance_squared(here)));
        }
    }

    #[test]
    fn close_to_exact_with_several_seeds() {
        let n = 32;
        let seeds = [(3, 3), (28, 5), (16, 16), (6, 27), (25, 25), (12, 9)];
        let mut jfa = seeded(n, &seeds);
        let mut cpt = vec![None; n * n];
        jump_flood(&mut jfa, &mut cpt, n, &mut JumpFloodScratch::default());
        let mut exact = seeded(n, &seeds);
        let mut exact_cpt = vec![None; n * n];
        exact_transform(&mut exact, &mut exact_cpt, n, &mut EdtScratch::default());

        let matching = jfa.iter().zip(&exact).filter(|(a, b)| a == b).count();
        assert!(matching * 100 >= n * n * 95, "{matching} of {} exact", n * n);
        assert!(jfa.iter().zip(&exact).all(|(a, b)| a >= b));
    }

    #[test]
    fn no_seeds() {
        let mut edt = seeded(4, &[]);
        let mut cpt = vec![None; 16];
        jump_flood(&mut edt, &mut cpt, 4, &mut JumpFloodScratch::default());
        assert!(edt.iter().all(|&d| d == FAR));
        assert!(cpt.iter().all(Option::is_none));
    }
}
