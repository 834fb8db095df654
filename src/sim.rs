use glam::Vec3;
use tracing::{debug, info};

use crate::clock::FixedTimestep;
use crate::config::MovementConfig;
use crate::fsm::FsmError;
use crate::level::{KinematicBody, Level};
use crate::player::{InputFrame, Player, PlayerState};

pub const BODY_HALF_EXTENTS: Vec3 = Vec3::new(0.4, 0.9, 0.4);
pub const SPAWN: Vec3 = Vec3::new(0.0, 2.0, 0.0);

/// Pre-recorded input: jump presses with a hold length, plus dash spans.
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    jumps: Vec<(u64, u64)>,
    dashes: Vec<(u64, u64, f32)>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press jump on `frame` and release it `hold` frames later.
    pub fn jump_at(mut self, frame: u64, hold: u64) -> Self {
        self.jumps.push((frame, hold.max(1)));
        self
    }

    /// Hold the dash axis at `axis` for frames `start..end`.
    pub fn dash(mut self, start: u64, end: u64, axis: f32) -> Self {
        self.dashes.push((start, end, axis));
        self
    }

    pub fn input_at(&self, frame: u64) -> InputFrame {
        let pressed = self.jumps.iter().any(|&(at, _)| at == frame);
        let released = self
            .jumps
            .iter()
            .any(|&(at, hold)| at.checked_add(hold) == Some(frame));
        let axis = self
            .dashes
            .iter()
            .rev()
            .find(|&&(start, end, _)| (start..end).contains(&frame))
            .map_or(0.0, |&(_, _, axis)| axis);
        InputFrame::new(pressed, released, axis)
    }
}

/// Headless host loop: a runner on a level, driven by fixed ticks and frames
/// the same way a windowed loop would drive it.
pub struct Simulation {
    player: Player<KinematicBody>,
    clock: FixedTimestep,
    kill_height: f32,
    frame: u64,
    respawns: u32,
}

impl Simulation {
    pub fn new(config: MovementConfig, level: Level, fixed_hz: u32) -> Result<Self, FsmError> {
        let kill_height = level.kill_height();
        let body = KinematicBody::new(level, SPAWN, BODY_HALF_EXTENTS);
        Ok(Self {
            player: Player::new(config, body)?,
            clock: FixedTimestep::from_hz(fixed_hz),
            kill_height,
            frame: 0,
            respawns: 0,
        })
    }

    /// Advance one rendered frame: every due fixed tick first, then the
    /// frame update. Returns the new state if it changed during the frame.
    pub fn frame(&mut self, dt: f32, input: InputFrame) -> Result<Option<PlayerState>, FsmError> {
        let before = self.player.state();

        for _ in 0..self.clock.advance(dt) {
            self.player.fixed_update(self.clock.step())?;
        }
        self.player.update(dt, input)?;

        if self.position().y < self.kill_height {
            self.respawn()?;
        }

        let after = self.player.state();
        self.frame += 1;
        if before == after {
            return Ok(None);
        }
        debug!(
            frame = self.frame,
            from = ?before,
            to = ?after,
            position = ?self.position(),
            "player state changed"
        );
        Ok(after)
    }

    /// Run `frames` frames of `dt` seconds each, feeding input from `script`.
    /// Returns every state change as `(frame, state)`.
    pub fn run(
        &mut self,
        script: &InputScript,
        frames: u64,
        dt: f32,
    ) -> Result<Vec<(u64, PlayerState)>, FsmError> {
        let mut changes = Vec::new();
        for _ in 0..frames {
            let frame = self.frame;
            if let Some(state) = self.frame(dt, script.input_at(frame))? {
                changes.push((frame, state));
            }
        }
        Ok(changes)
    }

    fn respawn(&mut self) -> Result<(), FsmError> {
        self.respawns += 1;
        info!(respawns = self.respawns, frame = self.frame, "fell off the course, respawning");
        self.player.mover_mut().respawn();
        let actor = self.player.actor_mut();
        actor.velocity = Vec3::ZERO;
        actor.jump_enabled = false;
        self.player.force_state(PlayerState::Falling)
    }

    pub fn player(&self) -> &Player<KinematicBody> {
        &self.player
    }

    pub fn state(&self) -> Option<PlayerState> {
        self.player.state()
    }

    pub fn position(&self) -> Vec3 {
        self.player.mover().position
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn respawns(&self) -> u32 {
        self.respawns
    }
}
