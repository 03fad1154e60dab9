use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use energy_panel_core::{PanelConfig, PanelSession, SilentBackend};
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> energy_panel_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { frames } => run_demo(frames),
        Commands::Simulate { config, frames } => run_simulate(config.as_deref(), frames),
    }
}

/// Walks the panel through its staged power-up, a fault, and shutdown,
/// logging each observable snapshot.
fn run_demo(frames: u32) -> energy_panel_core::Result<()> {
    tracing::info!(frames, "starting panel demo");

    let config = PanelConfig::default();
    let mut panel = PanelSession::new(&config, SilentBackend);

    panel.set_inverter_active(true);
    log_state(&panel, "inverter on");
    panel.set_switch_active(true);
    panel.set_bulb_active(true);
    panel.set_word_active(true);
    log_state(&panel, "fully lit");

    panel.set_fan_speed(60.0);
    for _ in 0..frames / 2 {
        panel.advance_frame(FRAME);
    }

    panel.set_fault(true);
    panel.click();
    let update = panel.advance_frame(FRAME);
    tracing::info!(marquee = update.marquee_position, "fault raised");
    panel.set_fault(false);

    for _ in 0..frames / 2 {
        panel.advance_frame(FRAME);
    }

    panel.set_inverter_active(false);
    log_state(&panel, "shut down");
    panel.shutdown();
    Ok(())
}

/// Runs the fully-activated panel for a number of frames, optionally from a
/// JSON configuration, and reports the accumulated savings.
fn run_simulate(config: Option<&std::path::Path>, frames: u32) -> energy_panel_core::Result<()> {
    let config = match config {
        Some(path) => PanelConfig::from_json_file(path)?,
        None => PanelConfig::default(),
    };
    tracing::info!(frames, "simulating active panel");

    let mut panel = PanelSession::new(&config, SilentBackend);
    panel.activate_full_system();
    for _ in 0..frames {
        panel.advance_frame(FRAME);
    }

    let state = panel.snapshot();
    tracing::info!(
        energy_saved = state.energy_saved,
        co2_reduced = state.co2_reduced,
        "simulation finished"
    );
    Ok(())
}

fn log_state(panel: &PanelSession<SilentBackend>, label: &str) {
    let state = panel.snapshot();
    tracing::info!(
        inverter = state.inverter_active,
        switch = state.switch_active,
        bulb = state.bulb_active,
        word = state.word_active,
        phase = state.animation_phase,
        label
    );
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive energy device panel simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Walk through the scripted power-up / fault / shutdown sequence.
    Demo {
        /// Number of frames to run between stages.
        #[arg(short, long, default_value_t = 240)]
        frames: u32,
    },
    /// Run the fully-activated panel and report accumulated savings.
    Simulate {
        /// Optional JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 600)]
        frames: u32,
    },
}
