mod app;
mod engine;
mod logging;
mod renderer;

use std::error::Error;
use std::path::PathBuf;

use app::GameApp;
use clap::Parser;
use engine::window::GameWindow;
use ledgerun::level::Level;
use ledgerun::sim::{InputScript, Simulation};
use ledgerun::MovementConfig;
use tracing::info;

const HEADLESS_DT: f32 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "ledgerun", about = "Auto-runner locomotion sandbox")]
struct Args {
    /// RON file with movement tuning (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the effective movement config as RON and exit
    #[arg(long)]
    dump_config: bool,
    /// Run without a window, feeding scripted input
    #[arg(long)]
    headless: bool,
    /// Seconds to simulate in headless mode
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,
    /// Frames (at 60 fps) on which to press jump in headless mode
    #[arg(long, value_delimiter = ',')]
    jump_at: Vec<u64>,
    /// Frames each scripted jump is held
    #[arg(long, default_value_t = 20)]
    hold: u64,
    /// Physics tick rate
    #[arg(long, default_value_t = 50)]
    fixed_hz: u32,
    /// Number of platforms in the course
    #[arg(long, default_value_t = 12)]
    segments: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init();

    let config = MovementConfig::load_or_default(args.config.as_deref());
    if args.dump_config {
        println!("{}", config.to_ron_string());
        return Ok(());
    }

    let sim = Simulation::new(config, Level::course(args.segments), args.fixed_hz)?;

    if args.headless {
        run_headless(sim, &args)
    } else {
        let sdl = sdl2::init()?;
        let mut window = GameWindow::new(&sdl, "ledgerun", 960, 540)?;
        GameApp::new(sim).run(&sdl, &mut window)
    }
}

fn run_headless(mut sim: Simulation, args: &Args) -> Result<(), Box<dyn Error>> {
    let script = args
        .jump_at
        .iter()
        .fold(InputScript::new(), |script, &frame| script.jump_at(frame, args.hold));
    let frames = (args.seconds.max(0.0) / HEADLESS_DT).round() as u64;

    for (frame, state) in sim.run(&script, frames, HEADLESS_DT)? {
        info!(frame, state = state.label(), "transition");
    }

    let pos = sim.position();
    info!(
        frames = sim.frame_count(),
        distance = -pos.z,
        height = pos.y,
        respawns = sim.respawns(),
        state = ?sim.state(),
        "headless run finished"
    );
    Ok(())
}
