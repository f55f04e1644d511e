use std::error::Error;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use neon_life::config::{DEMO_GRID_SIZE, DEMO_MAX_FRAME_DELTA, DEMO_TPS_STEP, DEMO_WINDOW_SIZE};
use neon_life::{
    BrushUpdate, GpuContext, ParamsUpdate, ResetMode, RulePreset, RunnerOptions, SimResult,
    SimRunner, WgpuDispatcher,
};

use crate::display::DisplayPipeline;

/// Surface, device and simulation, created once the window exists
struct GpuState {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    context: GpuContext,
    display: DisplayPipeline,
    runner: SimRunner<WgpuDispatcher>,
}

impl GpuState {
    fn new(window: Arc<Window>, rule_string: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let instance = GpuContext::create_instance();
        let surface = instance.create_surface(window.clone())?;
        let context = pollster::block_on(GpuContext::request(instance, Some(&surface)))?;

        let size = window.inner_size();
        let config = surface
            .get_default_config(&context.adapter, size.width.max(1), size.height.max(1))
            .ok_or("surface not supported by adapter")?;
        surface.configure(&context.device, &config);

        let options = RunnerOptions::new(DEMO_GRID_SIZE).with_initial_state(ResetMode::Random, None);
        let mut runner = SimRunner::new(WgpuDispatcher::new(&context), options)?;
        if let Some(rule) = rule_string {
            runner.set_params(ParamsUpdate {
                rule: Some(RulePreset::Custom),
                rule_string: Some(rule.to_string()),
                ..Default::default()
            })?;
        }

        let display = DisplayPipeline::new(&context.device, config.format);

        Ok(Self {
            surface,
            config,
            context,
            display,
            runner,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.context.device, &self.config);
        }
    }

    /// Step the simulation (unless paused) and draw the current buffer
    fn render(&mut self, delta_seconds: f64, paused: bool) -> SimResult<()> {
        if !paused {
            self.runner.step(delta_seconds)?;
        }

        let output = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure surface
                self.surface.configure(&self.context.device, &self.config);
                return Ok(());
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return Ok(());
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        self.display.update_params(
            &self.context.queue,
            self.runner.grid_size(),
            self.config.width,
            self.config.height,
        );
        let bind_group = self
            .display
            .create_bind_group(&self.context.device, self.runner.current_buffer()?);
        self.display.draw(&mut encoder, &view, &bind_group);

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    rule_string: Option<String>,
    paused: bool,
    last_frame: Instant,
    /// Cursor in physical window pixels
    cursor: Option<(f64, f64)>,
    brush_down: bool,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new(rule_string: Option<String>) -> Self {
        Self {
            window: None,
            gpu: None,
            rule_string,
            paused: false,
            last_frame: Instant::now(),
            cursor: None,
            brush_down: false,
            fps_counter: FpsCounter::new(),
        }
    }

    fn render(&mut self) {
        let now = Instant::now();
        // Clamped so a stalled window does not replay every missed tick
        let delta = now
            .duration_since(self.last_frame)
            .as_secs_f64()
            .min(DEMO_MAX_FRAME_DELTA);
        self.last_frame = now;

        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return;
        };

        // Brush follows the pointer every frame, paused or not
        let mut brush = BrushUpdate {
            down: Some(self.brush_down),
            ..Default::default()
        };
        if let Some((x, y)) = self.cursor {
            let size = window.inner_size();
            brush.u = Some((x / size.width.max(1) as f64) as f32);
            brush.v = Some((y / size.height.max(1) as f64) as f32);
        }

        let result = gpu
            .runner
            .set_brush(brush)
            .and_then(|_| gpu.render(delta, self.paused));
        if let Err(e) = result {
            log::error!("Frame failed: {}", e);
        }

        if let Some(fps) = self.fps_counter.tick() {
            let params = gpu.runner.params();
            let state = if self.paused { " [Paused]" } else { "" };
            window.set_title(&format!(
                "Neon Life - {:.0} FPS - {} @ {:.1} tps{}",
                fps, params.rule, params.ticks_per_second, state
            ));
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let runner = &mut gpu.runner;

        let result = match key_code {
            KeyCode::Space => {
                self.paused = !self.paused;
                log::info!("{}", if self.paused { "Paused" } else { "Running" });
                Ok(())
            }
            KeyCode::KeyR => runner.reset(ResetMode::Random, None),
            KeyCode::KeyC => runner.reset(ResetMode::Clear, None),
            KeyCode::KeyL => runner.set_params(ParamsUpdate {
                rule: Some(RulePreset::Life),
                ..Default::default()
            }),
            KeyCode::KeyH => runner.set_params(ParamsUpdate {
                rule: Some(RulePreset::HighLife),
                ..Default::default()
            }),
            KeyCode::KeyU if self.rule_string.is_some() => runner.set_params(ParamsUpdate {
                rule: Some(RulePreset::Custom),
                ..Default::default()
            }),
            KeyCode::KeyW => {
                let wrap = !runner.params().wrap_edges;
                log::info!("Edge wrapping: {}", if wrap { "ON" } else { "OFF" });
                runner.set_params(ParamsUpdate {
                    wrap_edges: Some(wrap),
                    ..Default::default()
                })
            }
            KeyCode::ArrowUp | KeyCode::ArrowDown => {
                let tps = runner.params().ticks_per_second;
                let tps = if key_code == KeyCode::ArrowUp {
                    tps * DEMO_TPS_STEP
                } else {
                    tps / DEMO_TPS_STEP
                };
                let result = runner.set_params(ParamsUpdate {
                    ticks_per_second: Some(tps),
                    ..Default::default()
                });
                log::info!("Ticks per second: {:.1}", runner.params().ticks_per_second);
                result
            }
            KeyCode::BracketLeft | KeyCode::BracketRight => {
                let radius = runner.brush().radius_px;
                let radius = if key_code == KeyCode::BracketRight {
                    radius + 2.0
                } else {
                    radius - 2.0
                };
                let result = runner.set_brush(BrushUpdate {
                    radius_px: Some(radius),
                    ..Default::default()
                });
                log::info!("Brush radius: {:.0}px", runner.brush().radius_px);
                result
            }
            _ => Ok(()),
        };

        if let Err(e) = result {
            log::error!("Key {:?} failed: {}", key_code, e);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing Neon Life...");
        log::info!("Grid size: {}x{}", DEMO_GRID_SIZE, DEMO_GRID_SIZE);

        let window_attrs = Window::default_attributes()
            .with_title("Neon Life - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(DEMO_WINDOW_SIZE, DEMO_WINDOW_SIZE));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match GpuState::new(window.clone(), self.rule_string.as_deref()) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                log::error!("Failed to initialize GPU: {}", e);
                event_loop.exit();
                return;
            }
        }

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Left mouse: Paint");
        log::info!("  Space: Pause/resume");
        log::info!("  R / C: Random reset / clear");
        log::info!("  L / H / U: Life / HighLife / command-line rule");
        log::info!("  W: Toggle edge wrapping");
        log::info!("  Up/Down: Tick rate");
        log::info!("  [/]: Brush radius");
        log::info!("  Escape: Quit");

        self.last_frame = Instant::now();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                if let Some(gpu) = &mut self.gpu {
                    if let Err(e) = gpu.runner.dispose() {
                        log::warn!("Dispose failed: {}", e);
                    }
                }
                self.gpu = None;
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.brush_down = false;
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.brush_down = state == ElementState::Pressed;
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                // Request another frame immediately
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
