mod buffers;
mod context;
mod dispatch;

pub use buffers::grid_buffer_bytes;
pub use context::GpuContext;
pub use dispatch::WgpuDispatcher;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{BrushUpdate, CpuDispatcher, ResetMode, RunnerOptions, SimRunner};

    /// The WGSL kernel must agree with the CPU reference cell for cell
    #[test]
    #[ignore = "requires a GPU adapter"]
    fn test_gpu_matches_cpu_kernel() {
        let context = GpuContext::headless().expect("GPU context");
        let options = RunnerOptions::new(48).with_initial_state(ResetMode::Clear, None);

        let mut gpu = SimRunner::new(WgpuDispatcher::new(&context), options).unwrap();
        let mut cpu = SimRunner::new(CpuDispatcher::new(), options).unwrap();

        // Paint a disc for one tick, then let it evolve
        let paint = BrushUpdate {
            down: Some(true),
            radius_px: Some(6.0),
            ..BrushUpdate::at(0.3, 0.6)
        };
        let lift = BrushUpdate {
            down: Some(false),
            ..Default::default()
        };
        let dt = 1.0 / 30.0 + 1e-6;

        for runner_step in 0..12 {
            let brush = if runner_step == 0 { paint } else { lift };
            gpu.set_brush(brush).unwrap();
            cpu.set_brush(brush).unwrap();
            gpu.step(dt).unwrap();
            cpu.step(dt).unwrap();
        }

        let gpu_cells = gpu
            .dispatcher()
            .read_cells(gpu.current_buffer().unwrap())
            .unwrap();
        let cpu_grid = cpu.current_buffer().unwrap();
        assert!(cpu_grid.population() > 0);
        assert_eq!(gpu_cells.len(), cpu_grid.cells().len());
        for (i, (g, c)) in gpu_cells.iter().zip(cpu_grid.cells()).enumerate() {
            assert_eq!(g.is_alive(), c.is_alive(), "cell {} alive", i);
            assert!((g.age - c.age).abs() < 1e-5, "cell {} age {} vs {}", i, g.age, c.age);
        }

        gpu.dispose().unwrap();
    }
}
