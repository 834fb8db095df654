use std::error::Error;

use ledgerun::clock::FrameTimer;
use ledgerun::sim::Simulation;
use sdl2::Sdl;
use tracing::info;

use crate::engine::input::InputState;
use crate::engine::window::GameWindow;
use crate::renderer;

/// How often the window title is refreshed with state and position.
const TITLE_INTERVAL: f32 = 0.2;

pub struct GameApp {
    sim: Simulation,
    title_timer: f32,
}

impl GameApp {
    pub fn new(sim: Simulation) -> Self {
        Self {
            sim,
            title_timer: 0.0,
        }
    }

    pub fn run(&mut self, sdl: &Sdl, window: &mut GameWindow) -> Result<(), Box<dyn Error>> {
        let mut event_pump = sdl.event_pump()?;
        let mut input = InputState::new();
        let mut timer = FrameTimer::new();
        info!("space: jump, A/D: dash, escape: quit");

        loop {
            timer.tick();
            input.update(&mut event_pump);

            if input.should_quit() {
                break;
            }

            self.sim.frame(timer.dt, input.frame())?;

            renderer::begin_frame(self.sim.state());
            self.refresh_title(window, timer.dt);
            window.swap();
        }

        info!(
            seconds = timer.elapsed,
            respawns = self.sim.respawns(),
            "session over"
        );
        Ok(())
    }

    fn refresh_title(&mut self, window: &mut GameWindow, dt: f32) {
        self.title_timer += dt;
        if self.title_timer < TITLE_INTERVAL {
            return;
        }
        self.title_timer = 0.0;

        let label = self.sim.state().map_or("-", |s| s.label());
        let pos = self.sim.position();
        let vy = self.sim.player().actor().velocity.y;
        window.set_title(&format!(
            "ledgerun | {} | z {:.1} y {:.1} x {:.1} vy {:.1} | respawns {}",
            label,
            -pos.z,
            pos.y,
            pos.x,
            vy,
            self.sim.respawns()
        ));
    }
}
