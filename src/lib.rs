//! Double-buffered Life-like cellular automaton stepped on the GPU.
//!
//! [`SimRunner`] owns a pair of `grid_size x grid_size` RGBA float buffers
//! (R = alive, A = age) and advances them at a fixed tick rate through a
//! [`GridDispatcher`]: [`WgpuDispatcher`] on a real device, [`CpuDispatcher`]
//! for headless hosts and tests.

pub mod config;
pub mod error;
pub mod gpu;
pub mod math;
pub mod rules;
pub mod simulation;

pub use error::{SimError, SimResult};
pub use gpu::{GpuContext, WgpuDispatcher};
pub use rules::{parse_rule_string, resolve_rule_masks, RuleMasks, RulePreset, RuleSpec};
pub use simulation::{
    BrushUpdate, BufferSlot, CpuDispatcher, GridDispatcher, ParamsUpdate, ResetMode,
    RunnerOptions, SimRunner,
};
