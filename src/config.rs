/// Compute shader workgroup size (16x16 threads per group)
pub const WORKGROUP_SIZE: u32 = 16;

// ============================================
// Simulation defaults
// ============================================

/// Logical ticks per second
pub const DEFAULT_TICKS_PER_SECOND: f64 = 30.0;

/// Kernel passes run for every tick
pub const DEFAULT_STEPS_PER_TICK: u32 = 1;

/// Toroidal neighbor lookup
pub const DEFAULT_WRAP_EDGES: bool = true;

/// Derive the decay from `DEFAULT_AGE_DURATION_SECONDS` instead of using a fixed step
pub const DEFAULT_USE_AGE_DURATION: bool = true;

/// Seconds for a newborn cell's age to fall from 1.0 to 0.0
pub const DEFAULT_AGE_DURATION_SECONDS: f64 = 4.0;

/// Fixed age decay per pass, used when the duration mode is off
pub const DEFAULT_AGE_DECAY_PER_STEP: f32 = 0.03;

/// Brush radius in grid pixels
pub const DEFAULT_BRUSH_RADIUS_PX: f32 = 10.0;

/// Brush position in normalized grid coordinates
pub const DEFAULT_BRUSH_POSITION: (f32, f32) = (0.5, 0.5);

// ============================================
// Limits
// ============================================

pub const MIN_TICKS_PER_SECOND: f64 = 0.1;
pub const MAX_TICKS_PER_SECOND: f64 = 240.0;

/// Shortest age duration accepted by the decay derivation
pub const MIN_AGE_DURATION_SECONDS: f64 = 0.1;

/// Bounds of the per-pass age decay
pub const MIN_AGE_DECAY_PER_STEP: f32 = 1e-6;
pub const MAX_AGE_DECAY_PER_STEP: f32 = 1.0;

/// Catch-up bursts longer than this many ticks are logged
pub const BURST_LOG_TICKS: u64 = 8;

// ============================================
// Kernel constants (mirrored in shaders/sim.wgsl)
// ============================================

/// A channel value at or above this counts as alive
pub const ALIVE_THRESHOLD: f32 = 0.5;

/// Hash values at or above this are seeded alive on a random reset,
/// which gives a live density of 14%
pub const RESET_ALIVE_THRESHOLD: f32 = 0.86;

/// Upper bound (exclusive) of a seed drawn when the host passes none
pub const RANDOM_SEED_RANGE: f32 = 1000.0;

// ============================================
// Demo host
// ============================================

/// Grid dimensions of the demo (256x256 = 65K cells)
pub const DEMO_GRID_SIZE: u32 = 256;

/// Initial window size in logical pixels
pub const DEMO_WINDOW_SIZE: u32 = 768;

/// Frame deltas are clamped to this so a stalled window does not
/// replay a long burst of ticks
pub const DEMO_MAX_FRAME_DELTA: f64 = 0.25;

/// Multiplier applied by the tick rate keys
pub const DEMO_TPS_STEP: f64 = 1.25;
