mod cell;
mod dispatch;
mod grid;
pub mod kernel;
mod params;
mod runner;
mod scheduler;

pub use cell::GpuCell;
pub use dispatch::{CpuDispatcher, GridDispatcher};
pub use grid::CpuGrid;
pub use params::{
    BrushState, BrushUpdate, ParamsUpdate, PassUniforms, ResetMode, SimulationParams,
};
pub use runner::{BufferSlot, RunnerOptions, SimRunner};
pub use scheduler::TickScheduler;
