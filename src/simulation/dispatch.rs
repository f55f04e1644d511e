use crate::error::SimResult;
use crate::simulation::grid::CpuGrid;
use crate::simulation::kernel;
use crate::simulation::params::PassUniforms;

/// Graphics capability the runner needs: allocate grid buffers and run the
/// transition kernel over a whole grid.
///
/// A pass must read only `source` and overwrite every cell of `dest`, and
/// must be complete before the call returns from the runner's point of view
/// (later passes may depend on it).
pub trait GridDispatcher {
    /// Backend handle to one `grid_size x grid_size` RGBA float buffer
    type Buffer;

    /// Allocate a zero-filled grid buffer.
    fn create_grid_buffer(&mut self, grid_size: u32) -> SimResult<Self::Buffer>;

    /// Render one full-grid pass of the kernel from `source` into `dest`.
    fn run_full_grid_pass(
        &mut self,
        source: &Self::Buffer,
        dest: &mut Self::Buffer,
        uniforms: &PassUniforms,
    ) -> SimResult<()>;

    /// Release a buffer's backing storage.
    fn release_grid_buffer(&mut self, buffer: Self::Buffer) {
        drop(buffer);
    }
}

/// Software dispatcher running the reference kernel on host memory.
#[derive(Debug, Default)]
pub struct CpuDispatcher {
    passes: u64,
}

impl CpuDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of passes run so far, resets included
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

impl GridDispatcher for CpuDispatcher {
    type Buffer = CpuGrid;

    fn create_grid_buffer(&mut self, grid_size: u32) -> SimResult<CpuGrid> {
        Ok(CpuGrid::new(grid_size))
    }

    fn run_full_grid_pass(
        &mut self,
        source: &CpuGrid,
        dest: &mut CpuGrid,
        uniforms: &PassUniforms,
    ) -> SimResult<()> {
        debug_assert_eq!(source.size(), dest.size());
        kernel::run_pass(source, dest, uniforms);
        self.passes += 1;
        Ok(())
    }
}
