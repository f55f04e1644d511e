use crate::config::ALIVE_THRESHOLD;

/// GPU-compatible cell, one RGBA float texel of the grid buffer.
///
/// Layout: 16 bytes, read by the kernel as `vec4<f32>`.
/// - alive: f32 (R) - 0.0 or 1.0
/// - reserved: [f32; 2] (G, B) - unused, kept at 0.0
/// - age: f32 (A) - 1.0 at birth, decays toward 0.0
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuCell {
    pub alive: f32,
    pub reserved: [f32; 2],
    pub age: f32,
}

impl GpuCell {
    /// A dead cell with zero age.
    pub const DEAD: GpuCell = GpuCell {
        alive: 0.0,
        reserved: [0.0, 0.0],
        age: 0.0,
    };

    /// A live cell at full age.
    pub const NEWBORN: GpuCell = GpuCell {
        alive: 1.0,
        reserved: [0.0, 0.0],
        age: 1.0,
    };

    pub fn new(alive: bool, age: f32) -> Self {
        Self {
            alive: if alive { 1.0 } else { 0.0 },
            reserved: [0.0, 0.0],
            age,
        }
    }

    /// Thresholded alive flag.
    pub fn is_alive(&self) -> bool {
        self.alive >= ALIVE_THRESHOLD
    }
}
