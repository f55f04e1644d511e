use crate::config::{
    DEFAULT_AGE_DECAY_PER_STEP, DEFAULT_AGE_DURATION_SECONDS, DEFAULT_BRUSH_POSITION,
    DEFAULT_BRUSH_RADIUS_PX, DEFAULT_STEPS_PER_TICK, DEFAULT_TICKS_PER_SECOND,
    DEFAULT_USE_AGE_DURATION, DEFAULT_WRAP_EDGES, MAX_AGE_DECAY_PER_STEP, MAX_TICKS_PER_SECOND,
    MIN_AGE_DECAY_PER_STEP, MIN_AGE_DURATION_SECONDS, MIN_TICKS_PER_SECOND,
};
use crate::error::SimResult;
use crate::math::{clamp, compute_age_decay_per_step};
use crate::rules::{resolve_rule_masks, RuleMasks, RulePreset, RuleSpec};

/// Simulation parameters owned by the runner, replaced through `set_params`.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParams {
    /// Logical ticks per second, within [0.1, 240]
    pub ticks_per_second: f64,
    /// Kernel passes per tick, at least 1
    pub steps_per_tick: u32,
    pub wrap_edges: bool,
    /// Derive the decay from `age_duration_seconds` rather than `age_decay_per_step`
    pub use_age_duration: bool,
    pub age_duration_seconds: f64,
    /// Explicit decay per pass, within (0, 1]
    pub age_decay_per_step: f32,
    /// The preset the masks were resolved from
    pub rule_spec: RuleSpec,
    pub rule: RuleMasks,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            steps_per_tick: DEFAULT_STEPS_PER_TICK,
            wrap_edges: DEFAULT_WRAP_EDGES,
            use_age_duration: DEFAULT_USE_AGE_DURATION,
            age_duration_seconds: DEFAULT_AGE_DURATION_SECONDS,
            age_decay_per_step: DEFAULT_AGE_DECAY_PER_STEP,
            rule_spec: RuleSpec::default(),
            rule: RuleMasks::default(),
        }
    }
}

/// Partial update for [`SimulationParams`]. `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamsUpdate {
    pub ticks_per_second: Option<f64>,
    pub steps_per_tick: Option<u32>,
    pub wrap_edges: Option<bool>,
    pub use_age_duration: Option<bool>,
    pub age_duration_seconds: Option<f64>,
    pub age_decay_per_step: Option<f32>,
    pub rule: Option<RulePreset>,
    /// Consulted when the resulting preset is [`RulePreset::Custom`]
    pub rule_string: Option<String>,
}

impl SimulationParams {
    /// Merge `update` into the parameters.
    ///
    /// Numbers are clamped to their valid ranges and non-finite values are
    /// ignored. A rule change is resolved before anything is applied, so a bad
    /// rule string leaves the parameters untouched.
    pub fn merge(&mut self, update: ParamsUpdate) -> SimResult<()> {
        if update.rule.is_some() || update.rule_string.is_some() {
            let spec = RuleSpec {
                rule: update.rule.unwrap_or(self.rule_spec.rule),
                rule_string: update
                    .rule_string
                    .or_else(|| self.rule_spec.rule_string.clone()),
            };
            self.rule = resolve_rule_masks(&spec)?;
            if spec != self.rule_spec {
                log::info!("Rule set to {} ({:?})", self.rule, spec.rule);
            }
            self.rule_spec = spec;
        }

        if let Some(tps) = update.ticks_per_second.filter(|v| v.is_finite()) {
            self.ticks_per_second = clamp(tps, MIN_TICKS_PER_SECOND, MAX_TICKS_PER_SECOND);
        }
        if let Some(spt) = update.steps_per_tick {
            self.steps_per_tick = spt.max(1);
        }
        if let Some(wrap) = update.wrap_edges {
            self.wrap_edges = wrap;
        }
        if let Some(use_duration) = update.use_age_duration {
            self.use_age_duration = use_duration;
        }
        if let Some(secs) = update.age_duration_seconds.filter(|v| v.is_finite()) {
            self.age_duration_seconds = secs.max(MIN_AGE_DURATION_SECONDS);
        }
        if let Some(decay) = update.age_decay_per_step.filter(|v| v.is_finite()) {
            self.age_decay_per_step = decay.clamp(MIN_AGE_DECAY_PER_STEP, MAX_AGE_DECAY_PER_STEP);
        }
        Ok(())
    }

    /// The decay applied to surviving cells on each pass.
    pub fn effective_age_decay(&self) -> f32 {
        if self.use_age_duration {
            compute_age_decay_per_step(
                self.age_duration_seconds,
                self.ticks_per_second,
                self.steps_per_tick as f64,
            )
        } else {
            self.age_decay_per_step
        }
    }
}

/// Circular paint region that forces cells alive at full age.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushState {
    pub down: bool,
    /// Normalized grid coordinates, (0, 0) is the first cell of the first row
    pub position: (f32, f32),
    /// Radius in grid pixels
    pub radius_px: f32,
}

impl Default for BrushState {
    fn default() -> Self {
        Self {
            down: false,
            position: DEFAULT_BRUSH_POSITION,
            radius_px: DEFAULT_BRUSH_RADIUS_PX,
        }
    }
}

/// Partial update for [`BrushState`]; the two position axes merge independently.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BrushUpdate {
    pub down: Option<bool>,
    pub u: Option<f32>,
    pub v: Option<f32>,
    pub radius_px: Option<f32>,
}

impl BrushUpdate {
    /// Move the brush to `(u, v)`, leaving the other fields alone.
    pub fn at(u: f32, v: f32) -> Self {
        Self {
            u: Some(u),
            v: Some(v),
            ..Default::default()
        }
    }
}

impl BrushState {
    pub fn merge(&mut self, update: BrushUpdate) {
        if let Some(down) = update.down {
            self.down = down;
        }
        if let Some(u) = update.u.filter(|v| v.is_finite()) {
            self.position.0 = u.clamp(0.0, 1.0);
        }
        if let Some(v) = update.v.filter(|v| v.is_finite()) {
            self.position.1 = v.clamp(0.0, 1.0);
        }
        if let Some(radius) = update.radius_px.filter(|v| v.is_finite()) {
            self.radius_px = radius.max(0.0);
        }
    }
}

/// How a reset overwrites the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResetMode {
    /// Every cell dead with zero age
    Clear,
    /// 14% of cells alive at full age, chosen by a seeded per-cell hash
    Random,
}

impl ResetMode {
    /// Value of the `reset_mode` uniform
    fn uniform_value(self) -> u32 {
        match self {
            ResetMode::Clear => 1,
            ResetMode::Random => 2,
        }
    }
}

/// Immutable parameter snapshot for a single kernel pass.
///
/// Matches the `PassUniforms` struct in `shaders/sim.wgsl` (48 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PassUniforms {
    // Grid and mode (16 bytes)
    pub grid_size: u32,
    pub wrap_edges: u32,
    /// 0 = evolve, 1 = clear, 2 = random
    pub reset_mode: u32,
    pub brush_down: u32,

    // Rule and decay (16 bytes)
    pub birth_mask: u32,
    pub survive_mask: u32,
    pub age_decay: f32,
    pub reset_seed: f32,

    // Brush (16 bytes)
    pub brush_u: f32,
    pub brush_v: f32,
    pub brush_radius_px: f32,
    pub _padding: f32,
}

impl PassUniforms {
    /// Snapshot for a regular evolution pass.
    pub fn evolve(grid_size: u32, params: &SimulationParams, brush: &BrushState) -> Self {
        Self {
            grid_size,
            wrap_edges: params.wrap_edges as u32,
            reset_mode: 0,
            brush_down: brush.down as u32,
            birth_mask: params.rule.birth_mask,
            survive_mask: params.rule.survive_mask,
            age_decay: params.effective_age_decay(),
            reset_seed: 0.0,
            brush_u: brush.position.0,
            brush_v: brush.position.1,
            brush_radius_px: brush.radius_px,
            _padding: 0.0,
        }
    }

    /// Snapshot for a full-grid overwrite.
    pub fn reset(
        grid_size: u32,
        params: &SimulationParams,
        brush: &BrushState,
        mode: ResetMode,
        seed: f32,
    ) -> Self {
        Self {
            reset_mode: mode.uniform_value(),
            reset_seed: seed,
            ..Self::evolve(grid_size, params, brush)
        }
    }

    pub fn is_reset(&self) -> bool {
        self.reset_mode != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::rules::{HIGHLIFE_MASKS, LIFE_MASKS};

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<PassUniforms>(), 48);
    }

    #[test]
    fn test_merge_clamps_numbers() {
        let mut params = SimulationParams::default();
        params
            .merge(ParamsUpdate {
                ticks_per_second: Some(1000.0),
                steps_per_tick: Some(0),
                age_duration_seconds: Some(-3.0),
                age_decay_per_step: Some(7.0),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(params.ticks_per_second, MAX_TICKS_PER_SECOND);
        assert_eq!(params.steps_per_tick, 1);
        assert_eq!(params.age_duration_seconds, MIN_AGE_DURATION_SECONDS);
        assert_eq!(params.age_decay_per_step, 1.0);
    }

    #[test]
    fn test_merge_ignores_non_finite() {
        let mut params = SimulationParams::default();
        params
            .merge(ParamsUpdate {
                ticks_per_second: Some(f64::NAN),
                age_decay_per_step: Some(f32::INFINITY),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(params, SimulationParams::default());
    }

    #[test]
    fn test_merge_rule_preset_and_string() {
        let mut params = SimulationParams::default();
        params
            .merge(ParamsUpdate {
                rule: Some(RulePreset::HighLife),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(params.rule, HIGHLIFE_MASKS);

        params
            .merge(ParamsUpdate {
                rule: Some(RulePreset::Custom),
                rule_string: Some("B2/S".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(params.rule.birth_mask, 1 << 2);
        assert_eq!(params.rule.survive_mask, 0);

        // The stored string is kept when switching back and forth
        params
            .merge(ParamsUpdate {
                rule: Some(RulePreset::Life),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(params.rule, LIFE_MASKS);
        params
            .merge(ParamsUpdate {
                rule: Some(RulePreset::Custom),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(params.rule.birth_mask, 1 << 2);
    }

    #[test]
    fn test_bad_rule_leaves_params_untouched() {
        let mut params = SimulationParams::default();
        let result = params.merge(ParamsUpdate {
            ticks_per_second: Some(5.0),
            rule: Some(RulePreset::Custom),
            ..Default::default()
        });
        assert!(matches!(result, Err(SimError::MissingRuleString)));
        assert_eq!(params, SimulationParams::default());

        let result = params.merge(ParamsUpdate {
            rule: Some(RulePreset::Custom),
            rule_string: Some("B9/S23".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(SimError::InvalidNeighborDigit(9))));
        assert_eq!(params, SimulationParams::default());
    }

    #[test]
    fn test_effective_decay() {
        let mut params = SimulationParams::default();
        assert!((params.effective_age_decay() - 1.0 / 120.0).abs() < 1e-6);

        params
            .merge(ParamsUpdate {
                use_age_duration: Some(false),
                age_decay_per_step: Some(0.25),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(params.effective_age_decay(), 0.25);
    }

    #[test]
    fn test_brush_merge() {
        let mut brush = BrushState::default();
        brush.merge(BrushUpdate {
            down: Some(true),
            u: Some(0.2),
            ..Default::default()
        });
        assert!(brush.down);
        assert_eq!(brush.position, (0.2, 0.5));

        brush.merge(BrushUpdate {
            v: Some(1.5),
            radius_px: Some(-4.0),
            ..Default::default()
        });
        assert_eq!(brush.position, (0.2, 1.0));
        assert_eq!(brush.radius_px, 0.0);
    }

    #[test]
    fn test_reset_snapshot() {
        let params = SimulationParams::default();
        let brush = BrushState::default();
        let evolve = PassUniforms::evolve(64, &params, &brush);
        assert!(!evolve.is_reset());
        assert_eq!(evolve.birth_mask, LIFE_MASKS.birth_mask);

        let reset = PassUniforms::reset(64, &params, &brush, ResetMode::Random, 42.0);
        assert_eq!(reset.reset_mode, 2);
        assert_eq!(reset.reset_seed, 42.0);
        assert_eq!(reset.grid_size, 64);
    }
}
