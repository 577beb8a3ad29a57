//! touchsynth - play the touch synth from a terminal keyboard
//!
//! Run with: cargo run --features tui

mod app;
mod ui;

use std::fs::File;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use touch_synth::io::CpalBackend;
use touch_synth::{Engine, EngineConfig};

use app::App;
use ui::VIS_BUFFER_SIZE;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    let config = EngineConfig::default().with_monitor(VIS_BUFFER_SIZE * 16);
    let mut engine = Engine::new(config, CpalBackend::new());
    engine
        .initialize_if_needed()
        .wrap_err("failed to start audio output")?;

    let mut terminal = ratatui::init();
    let result = App::new(engine).run(&mut terminal);
    ratatui::restore();
    result
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging() -> EyreResult<()> {
    let path = std::env::temp_dir().join("touchsynth.log");
    let file = File::create(&path).wrap_err_with(|| format!("cannot create {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
