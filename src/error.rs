//! Error types for the simulation core and the GPU dispatcher.

use thiserror::Error;

/// Errors raised by the simulation.
///
/// All of them are synchronous and reported at the call that caused them;
/// nothing is retried internally.
#[derive(Error, Debug)]
pub enum SimError {
    /// The rule string does not match `B<digits>/S<digits>`.
    #[error("invalid rule string '{0}', expected a form like 'B3/S23' or 'B36/S23'")]
    InvalidRuleSyntax(String),

    /// A neighbor count outside 0..=8.
    #[error("invalid neighbor count {0}, expected an integer 0..=8")]
    InvalidNeighborDigit(u32),

    /// A custom rule was requested without a rule string.
    #[error("missing rule string for a custom rule")]
    MissingRuleString,

    /// The grid must have at least one cell per side.
    #[error("invalid grid size {0}, expected a positive size")]
    InvalidGridSize(u32),

    /// The runner was used after `dispose`.
    #[error("simulation runner used after dispose")]
    UseAfterDispose,

    /// Failed to request GPU adapter.
    #[error("failed to request GPU adapter")]
    AdapterNotFound,

    /// Failed to request GPU device.
    #[error("failed to request GPU device: {0}")]
    DeviceRequestFailed(#[from] wgpu::RequestDeviceError),

    /// Mapping a buffer for read-back failed.
    #[error("buffer mapping failed: {0}")]
    BufferMapFailed(#[from] wgpu::BufferAsyncError),

    /// The device was lost before a read-back completed.
    #[error("buffer read-back interrupted")]
    ReadbackInterrupted,

    /// The grid does not fit in a single storage buffer binding.
    #[error("grid size {grid_size} needs {bytes} bytes, device limit is {limit}")]
    GridTooLarge { grid_size: u32, bytes: u64, limit: u64 },
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
