//! CPU reference of the per-cell transition kernel.
//!
//! `shaders/sim.wgsl` is the GPU version of the same program; both read only
//! the source grid and write every cell of the destination grid.

use rayon::prelude::*;

use crate::config::RESET_ALIVE_THRESHOLD;
use crate::rules::RuleMasks;
use crate::simulation::cell::GpuCell;
use crate::simulation::grid::CpuGrid;
use crate::simulation::params::PassUniforms;

/// Moore neighborhood offsets
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Count live cells among the 8 neighbors of (x, y).
pub fn live_neighbor_count(grid: &CpuGrid, x: u32, y: u32, wrap: bool) -> u32 {
    NEIGHBOR_OFFSETS
        .iter()
        .filter(|(dx, dy)| grid.sample(x as i64 + dx, y as i64 + dy, wrap).is_alive())
        .count() as u32
}

/// Birth, survival and ageing of one cell, before the brush override.
pub fn apply_rule(cell: GpuCell, neighbors: u32, rule: &RuleMasks, age_decay: f32) -> GpuCell {
    let alive = cell.is_alive();
    let survive = alive && rule.survives(neighbors);
    let born = !alive && rule.births(neighbors);

    if born {
        GpuCell::NEWBORN
    } else if survive {
        GpuCell::new(true, (cell.age - age_decay).max(0.0))
    } else {
        GpuCell::DEAD
    }
}

/// Whether the brush disc covers the center of cell (x, y).
pub fn brush_covers(x: u32, y: u32, uniforms: &PassUniforms) -> bool {
    if uniforms.brush_down == 0 {
        return false;
    }
    let size = uniforms.grid_size as f32;
    let dx = x as f32 + 0.5 - uniforms.brush_u * size;
    let dy = y as f32 + 0.5 - uniforms.brush_v * size;
    (dx * dx + dy * dy).sqrt() <= uniforms.brush_radius_px
}

/// Next state of cell (x, y) on an evolution pass.
pub fn evolve_cell(source: &CpuGrid, x: u32, y: u32, uniforms: &PassUniforms) -> GpuCell {
    if brush_covers(x, y, uniforms) {
        return GpuCell::NEWBORN;
    }
    let rule = RuleMasks {
        birth_mask: uniforms.birth_mask,
        survive_mask: uniforms.survive_mask,
    };
    let neighbors = live_neighbor_count(source, x, y, uniforms.wrap_edges != 0);
    apply_rule(source.get(x, y), neighbors, &rule, uniforms.age_decay)
}

/// State of cell (x, y) written by a reset pass.
pub fn reset_cell(x: u32, y: u32, uniforms: &PassUniforms) -> GpuCell {
    match uniforms.reset_mode {
        2 => {
            let r = hash12(x as f32 + uniforms.reset_seed, y as f32 + uniforms.reset_seed);
            let alive = r >= RESET_ALIVE_THRESHOLD;
            GpuCell::new(alive, if alive { 1.0 } else { 0.0 })
        }
        _ => GpuCell::DEAD,
    }
}

fn fract(v: f32) -> f32 {
    v - v.floor()
}

/// Sine-free 2D -> 1D hash in [0, 1), the same arithmetic as `hash12` in the shader.
pub fn hash12(px: f32, py: f32) -> f32 {
    let mut p3 = [fract(px * 0.1031), fract(py * 0.1031), fract(px * 0.1031)];
    let d = p3[0] * (p3[1] + 33.33) + p3[1] * (p3[2] + 33.33) + p3[2] * (p3[0] + 33.33);
    for c in &mut p3 {
        *c += d;
    }
    fract((p3[0] + p3[1]) * p3[2])
}

/// Run one full-grid pass from `source` into `dest`, rows in parallel.
pub fn run_pass(source: &CpuGrid, dest: &mut CpuGrid, uniforms: &PassUniforms) {
    let size = dest.size() as usize;
    if size == 0 {
        return;
    }
    dest.cells_mut()
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = if uniforms.is_reset() {
                    reset_cell(x as u32, y as u32, uniforms)
                } else {
                    evolve_cell(source, x as u32, y as u32, uniforms)
                };
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{HIGHLIFE_MASKS, LIFE_MASKS};
    use crate::simulation::params::{BrushState, ResetMode, SimulationParams};

    fn uniforms(size: u32) -> PassUniforms {
        PassUniforms::evolve(size, &SimulationParams::default(), &BrushState::default())
    }

    fn step(grid: &CpuGrid, uniforms: &PassUniforms) -> CpuGrid {
        let mut next = CpuGrid::new(grid.size());
        run_pass(grid, &mut next, uniforms);
        next
    }

    #[test]
    fn test_life_survival() {
        let decay = 0.1;
        for n in 0..=8 {
            let next = apply_rule(GpuCell::new(true, 0.5), n, &LIFE_MASKS, decay);
            assert_eq!(next.is_alive(), n == 2 || n == 3, "live cell with {} neighbors", n);
            if next.is_alive() {
                assert!((next.age - 0.4).abs() < 1e-6);
            } else {
                assert_eq!(next.age, 0.0);
            }
        }
    }

    #[test]
    fn test_life_birth() {
        for n in 0..=8 {
            let next = apply_rule(GpuCell::DEAD, n, &LIFE_MASKS, 0.1);
            assert_eq!(next.is_alive(), n == 3, "dead cell with {} neighbors", n);
            if n == 3 {
                assert_eq!(next.age, 1.0);
            }
        }
    }

    #[test]
    fn test_highlife_birth_on_six() {
        let next = apply_rule(GpuCell::DEAD, 6, &HIGHLIFE_MASKS, 0.1);
        assert_eq!(next, GpuCell::NEWBORN);
        assert!(!apply_rule(GpuCell::DEAD, 6, &LIFE_MASKS, 0.1).is_alive());
    }

    #[test]
    fn test_age_floors_at_zero() {
        let next = apply_rule(GpuCell::new(true, 0.05), 2, &LIFE_MASKS, 0.1);
        assert!(next.is_alive());
        assert_eq!(next.age, 0.0);
    }

    #[test]
    fn test_neighbor_count_wrap() {
        // Corner cell with neighbors only across the edges
        let grid = CpuGrid::with_live_cells(8, &[(7, 7), (0, 7), (7, 0)]);
        assert_eq!(live_neighbor_count(&grid, 0, 0, true), 3);
        assert_eq!(live_neighbor_count(&grid, 0, 0, false), 0);
    }

    #[test]
    fn test_blinker_oscillates() {
        let grid = CpuGrid::with_live_cells(8, &[(3, 4), (4, 4), (5, 4)]);
        let u = uniforms(8);

        let next = step(&grid, &u);
        assert_eq!(next.live_cells(), vec![(4, 3), (4, 4), (4, 5)]);
        // The center survived and aged; the tips were born
        assert!(next.get(4, 4).age < 1.0);
        assert_eq!(next.get(4, 3).age, 1.0);

        let back = step(&next, &u);
        assert_eq!(back.live_cells(), grid.live_cells());
    }

    #[test]
    fn test_block_is_still() {
        let grid = CpuGrid::with_live_cells(6, &[(2, 2), (3, 2), (2, 3), (3, 3)]);
        let next = step(&grid, &uniforms(6));
        assert_eq!(next.live_cells(), grid.live_cells());
    }

    #[test]
    fn test_glider_crosses_wrapped_edge() {
        let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
        let mut grid = CpuGrid::with_live_cells(8, &glider);
        let u = uniforms(8);
        // A glider moves one cell diagonally every 4 generations
        for _ in 0..32 {
            grid = step(&grid, &u);
        }
        assert_eq!(grid.population(), 5);
        let mut expected: Vec<(u32, u32)> = glider.to_vec();
        expected.sort_by_key(|&(x, y)| (y, x));
        assert_eq!(grid.live_cells(), expected);
    }

    #[test]
    fn test_empty_grid_stays_empty() {
        let grid = CpuGrid::new(8);
        let next = step(&grid, &uniforms(8));
        assert_eq!(next.population(), 0);
        assert!(next.cells().iter().all(|c| c.age == 0.0));
    }

    #[test]
    fn test_brush_overrides_rule() {
        let params = SimulationParams::default();
        let brush = BrushState {
            down: true,
            position: (0.5, 0.5),
            radius_px: 0.5,
        };
        let u = PassUniforms::evolve(8, &params, &brush);
        // (4, 4) is a cell corner; the nearest centers are ~0.71px away
        let next = step(&CpuGrid::new(8), &u);
        assert_eq!(next.population(), 0);

        let brush = BrushState {
            radius_px: 1.0,
            ..brush
        };
        let u = PassUniforms::evolve(8, &params, &brush);
        let next = step(&CpuGrid::new(8), &u);
        assert_eq!(next.live_cells(), vec![(3, 3), (4, 3), (3, 4), (4, 4)]);
        assert!(next.cells().iter().filter(|c| c.is_alive()).all(|c| c.age == 1.0));
    }

    #[test]
    fn test_reset_clear_and_random() {
        let params = SimulationParams::default();
        let brush = BrushState::default();
        let full = CpuGrid::with_live_cells(4, &[(0, 0), (1, 1)]);

        let clear = PassUniforms::reset(4, &params, &brush, ResetMode::Clear, 0.0);
        let cleared = step(&full, &clear);
        assert!(cleared.cells().iter().all(|c| *c == GpuCell::DEAD));

        let random = PassUniforms::reset(64, &params, &brush, ResetMode::Random, 17.0);
        let a = step(&CpuGrid::new(64), &random);
        let b = step(&CpuGrid::new(64), &random);
        assert_eq!(a, b);
        for cell in a.cells() {
            assert_eq!(cell.age, if cell.is_alive() { 1.0 } else { 0.0 });
        }
    }

    #[test]
    fn test_random_density() {
        let params = SimulationParams::default();
        let brush = BrushState::default();
        for seed in [0.0, 3.5, 123.0, 871.25] {
            let u = PassUniforms::reset(128, &params, &brush, ResetMode::Random, seed);
            let grid = step(&CpuGrid::new(128), &u);
            let density = grid.population() as f64 / (128.0 * 128.0);
            assert!(
                (0.09..0.19).contains(&density),
                "seed {} gave density {}",
                seed,
                density
            );
        }
    }

    #[test]
    fn test_hash_range() {
        for i in 0..500 {
            let h = hash12(i as f32 * 1.7, i as f32 * 0.3 + 11.0);
            assert!((0.0..1.0).contains(&h));
        }
    }
}
