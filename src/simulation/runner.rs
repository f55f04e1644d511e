use rand::Rng;

use crate::config::{BURST_LOG_TICKS, RANDOM_SEED_RANGE};
use crate::error::{SimError, SimResult};
use crate::simulation::dispatch::GridDispatcher;
use crate::simulation::params::{
    BrushState, BrushUpdate, ParamsUpdate, PassUniforms, ResetMode, SimulationParams,
};
use crate::simulation::scheduler::TickScheduler;

/// Which of the two grid buffers holds the current state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferSlot {
    Front,
    Back,
}

impl BufferSlot {
    pub fn other(self) -> Self {
        match self {
            BufferSlot::Front => BufferSlot::Back,
            BufferSlot::Back => BufferSlot::Front,
        }
    }
}

/// Ping-pong pair of grid buffers
struct PingPong<B> {
    front: B,
    back: B,
    current: BufferSlot,
}

impl<B> PingPong<B> {
    fn current(&self) -> &B {
        match self.current {
            BufferSlot::Front => &self.front,
            BufferSlot::Back => &self.back,
        }
    }

    /// (input, output) for the next pass
    fn io_buffers(&mut self) -> (&B, &mut B) {
        match self.current {
            BufferSlot::Front => (&self.front, &mut self.back),
            BufferSlot::Back => (&self.back, &mut self.front),
        }
    }

    /// Make the last output the current state
    fn swap(&mut self) {
        self.current = self.current.other();
    }
}

/// Construction options for [`SimRunner`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunnerOptions {
    /// Cells per side
    pub grid_size: u32,
    /// Reset applied before the first buffer is exposed
    pub initial_state: Option<ResetMode>,
    /// Seed for a random initial state
    pub initial_seed: Option<f32>,
}

impl RunnerOptions {
    pub fn new(grid_size: u32) -> Self {
        Self {
            grid_size,
            initial_state: None,
            initial_seed: None,
        }
    }

    pub fn with_initial_state(mut self, mode: ResetMode, seed: Option<f32>) -> Self {
        self.initial_state = Some(mode);
        self.initial_seed = seed;
        self
    }
}

/// Double-buffered automaton stepper.
///
/// Owns both grid buffers, the parameters, the brush and the tick
/// accumulator. Each kernel pass reads the current buffer, writes the other
/// one, then flips which of the two is current.
pub struct SimRunner<D: GridDispatcher> {
    dispatcher: D,
    /// `None` once disposed
    buffers: Option<PingPong<D::Buffer>>,
    grid_size: u32,
    params: SimulationParams,
    brush: BrushState,
    scheduler: TickScheduler,
}

impl<D: GridDispatcher> SimRunner<D> {
    /// Allocate the buffer pair and apply the optional initial reset.
    pub fn new(mut dispatcher: D, options: RunnerOptions) -> SimResult<Self> {
        let grid_size = options.grid_size;
        if grid_size == 0 {
            return Err(SimError::InvalidGridSize(grid_size));
        }

        let front = dispatcher.create_grid_buffer(grid_size)?;
        let back = dispatcher.create_grid_buffer(grid_size)?;
        log::debug!("Created {}x{} grid buffers", grid_size, grid_size);

        let mut runner = Self {
            dispatcher,
            buffers: Some(PingPong {
                front,
                back,
                current: BufferSlot::Front,
            }),
            grid_size,
            params: SimulationParams::default(),
            brush: BrushState::default(),
            scheduler: TickScheduler::new(),
        };

        if let Some(mode) = options.initial_state {
            runner.reset(mode, options.initial_seed)?;
        }
        Ok(runner)
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn is_disposed(&self) -> bool {
        self.buffers.is_none()
    }

    /// Time banked toward the next tick
    pub fn banked_ms(&self) -> f64 {
        self.scheduler.banked_ms()
    }

    /// Buffer holding the latest state. Valid until the next `step` or `reset`.
    pub fn current_buffer(&self) -> SimResult<&D::Buffer> {
        self.live().map(PingPong::current)
    }

    /// Slot of the current buffer; changes whenever an odd number of passes ran.
    pub fn current_slot(&self) -> SimResult<BufferSlot> {
        self.live().map(|b| b.current)
    }

    fn live(&self) -> SimResult<&PingPong<D::Buffer>> {
        self.buffers.as_ref().ok_or(SimError::UseAfterDispose)
    }

    /// Advance by `delta_seconds` of real time and return the current buffer.
    ///
    /// Runs `steps_per_tick` passes for every tick the scheduler says is owed.
    /// Nothing runs when no tick is owed.
    pub fn step(&mut self, delta_seconds: f64) -> SimResult<&D::Buffer> {
        let buffers = self.buffers.as_mut().ok_or(SimError::UseAfterDispose)?;

        let ticks = self
            .scheduler
            .advance(delta_seconds, self.params.ticks_per_second);
        if ticks > BURST_LOG_TICKS {
            log::debug!("Catching up {} ticks in one step", ticks);
        }

        let passes = ticks.saturating_mul(self.params.steps_per_tick as u64);
        for _ in 0..passes {
            let uniforms = PassUniforms::evolve(self.grid_size, &self.params, &self.brush);
            let (input, output) = buffers.io_buffers();
            self.dispatcher.run_full_grid_pass(input, output, &uniforms)?;
            buffers.swap();
        }
        if passes > 0 {
            log::trace!("Ran {} passes ({} ticks)", passes, ticks);
        }

        Ok(buffers.current())
    }

    /// Overwrite the whole grid in one pass, bypassing the rule.
    ///
    /// A random reset without a seed draws one. The tick accumulator is left as is.
    pub fn reset(&mut self, mode: ResetMode, seed: Option<f32>) -> SimResult<()> {
        let buffers = self.buffers.as_mut().ok_or(SimError::UseAfterDispose)?;

        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen::<f32>() * RANDOM_SEED_RANGE);
        let uniforms = PassUniforms::reset(self.grid_size, &self.params, &self.brush, mode, seed);

        let (input, output) = buffers.io_buffers();
        self.dispatcher.run_full_grid_pass(input, output, &uniforms)?;
        buffers.swap();

        log::debug!("Reset grid ({:?}, seed {})", mode, seed);
        Ok(())
    }

    /// Merge a parameter update; effective from the next pass.
    pub fn set_params(&mut self, update: ParamsUpdate) -> SimResult<()> {
        self.live()?;
        self.params.merge(update)
    }

    /// Merge a brush update; effective from the next pass.
    pub fn set_brush(&mut self, update: BrushUpdate) -> SimResult<()> {
        self.live()?;
        self.brush.merge(update);
        Ok(())
    }

    /// Release both buffers. Every later call fails with `UseAfterDispose`.
    pub fn dispose(&mut self) -> SimResult<()> {
        let buffers = self.buffers.take().ok_or(SimError::UseAfterDispose)?;
        self.dispatcher.release_grid_buffer(buffers.front);
        self.dispatcher.release_grid_buffer(buffers.back);
        log::debug!("Disposed {}x{} runner", self.grid_size, self.grid_size);
        Ok(())
    }
}
