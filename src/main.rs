mod app;
mod display;

use std::error::Error;
use winit::event_loop::{ControlFlow, EventLoop};

use app::App;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional custom rule, e.g. `neon-life B36/S23`
    let rule_string = std::env::args().nth(1);
    if let Some(rule) = &rule_string {
        let masks = neon_life::parse_rule_string(rule)?;
        log::info!("Using custom rule {}", masks);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(rule_string);
    event_loop.run_app(&mut app)?;

    Ok(())
}
