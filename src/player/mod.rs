mod states;

pub use states::{Falling, Jumping, Running};

use glam::Vec3;

use crate::config::MovementConfig;
use crate::fsm::{FsmError, StateMachine};

// ---------------------------------------------------------------------------
// Collaborator interfaces
// ---------------------------------------------------------------------------

/// Per-frame input snapshot. `jump_pressed` / `jump_released` are edges:
/// true only on the frame the button changed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub jump_pressed: bool,
    pub jump_released: bool,
    /// Lateral dash axis in `[-1, 1]`.
    pub dash_axis: f32,
}

impl InputFrame {
    pub fn new(jump_pressed: bool, jump_released: bool, dash_axis: f32) -> Self {
        Self {
            jump_pressed,
            jump_released,
            dash_axis: dash_axis.clamp(-1.0, 1.0),
        }
    }

    pub fn press_jump() -> Self {
        Self::new(true, false, 0.0)
    }

    pub fn release_jump() -> Self {
        Self::new(false, true, 0.0)
    }
}

/// Physical body that resolves collisions for the actor.
pub trait Mover {
    /// Whether the last move ended in contact with the ground.
    fn is_grounded(&self) -> bool;
    /// Displace the body, resolving collisions along the way.
    fn move_by(&mut self, displacement: Vec3);
}

/// Orientation of the actor. `forward` is the run direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub up: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for Basis {
    fn default() -> Self {
        Self {
            up: Vec3::Y,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
        }
    }
}

// ---------------------------------------------------------------------------
// Movement actor
// ---------------------------------------------------------------------------

/// Shared model every locomotion state reads and writes.
///
/// `velocity` and `jump_enabled` are the only runtime-mutable pieces of
/// locomotion; `config` is fixed at construction. The jump gate starts
/// closed and first opens on a landing from Falling.
pub struct Locomotion<M> {
    config: MovementConfig,
    pub velocity: Vec3,
    pub jump_enabled: bool,
    pub basis: Basis,
    /// Most recent frame's input. Fixed ticks read the dash axis from here.
    pub input: InputFrame,
    pub mover: M,
}

impl<M: Mover> Locomotion<M> {
    pub fn new(config: MovementConfig, mover: M) -> Self {
        Self {
            config,
            velocity: Vec3::ZERO,
            jump_enabled: false,
            basis: Basis::default(),
            input: InputFrame::default(),
            mover,
        }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn is_grounded(&self) -> bool {
        self.mover.is_grounded()
    }

    /// Velocity with the component along `up` removed.
    pub fn horizontal_velocity(&self) -> Vec3 {
        let up = self.basis.up;
        self.velocity - up * self.velocity.dot(up)
    }
}

/// All locomotion states the player can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Running,
    Jumping,
    Falling,
}

impl PlayerState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Jumping => "Jumping",
            Self::Falling => "Falling",
        }
    }
}

pub type PlayerFsm<M> = StateMachine<PlayerState, Locomotion<M>>;

/// One controllable runner: the movement actor plus the machine driving it.
///
/// The host loop calls [`update`](Self::update) once per rendered frame and
/// [`fixed_update`](Self::fixed_update) once per physics tick, never both at once.
pub struct Player<M: Mover + 'static> {
    actor: Locomotion<M>,
    fsm: PlayerFsm<M>,
}

impl<M: Mover + 'static> Player<M> {
    /// Build the actor, register all locomotion states and enter `Running`.
    pub fn new(config: MovementConfig, mover: M) -> Result<Self, FsmError> {
        let mut actor = Locomotion::new(config, mover);
        let mut fsm: PlayerFsm<M> = StateMachine::new();
        fsm.register(PlayerState::Running, Box::new(Running))?;
        fsm.register(PlayerState::Jumping, Box::new(Jumping::default()))?;
        fsm.register(PlayerState::Falling, Box::new(Falling::default()))?;
        fsm.transition(PlayerState::Running, &mut actor)?;
        Ok(Self { actor, fsm })
    }

    pub fn update(&mut self, dt: f32, input: InputFrame) -> Result<(), FsmError> {
        self.actor.input = input;
        self.fsm.dispatch_update(&mut self.actor, dt)
    }

    pub fn fixed_update(&mut self, dt: f32) -> Result<(), FsmError> {
        self.fsm.dispatch_fixed_update(&mut self.actor, dt)
    }

    /// Force a state change from outside the states themselves (e.g. a respawn).
    pub fn force_state(&mut self, state: PlayerState) -> Result<(), FsmError> {
        self.fsm.transition(state, &mut self.actor)
    }

    pub fn state(&self) -> Option<PlayerState> {
        self.fsm.current()
    }

    pub fn actor(&self) -> &Locomotion<M> {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Locomotion<M> {
        &mut self.actor
    }

    pub fn mover(&self) -> &M {
        &self.actor.mover
    }

    pub fn mover_mut(&mut self) -> &mut M {
        &mut self.actor.mover
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StubMover;
    use super::*;

    const DT: f32 = 1.0 / 60.0;
    const FIXED_DT: f32 = 0.02;

    /// Walk off the ground and come back down once, opening the jump gate.
    fn land_once(player: &mut Player<StubMover>) {
        player.mover_mut().grounded = false;
        player.update(DT, InputFrame::default()).unwrap();
        player.mover_mut().grounded = true;
        player.update(DT, InputFrame::default()).unwrap();
        assert_eq!(player.state(), Some(PlayerState::Running));
    }

    #[test]
    fn starts_running_with_jump_gate_closed() {
        let player = Player::new(MovementConfig::default(), StubMover::grounded()).unwrap();
        assert_eq!(player.state(), Some(PlayerState::Running));
        assert!(!player.actor().jump_enabled);
        assert_eq!(player.actor().velocity, Vec3::ZERO);
    }

    #[test]
    fn no_coyote_jump_before_the_first_landing() {
        let mut player = Player::new(MovementConfig::default(), StubMover::grounded()).unwrap();
        player.mover_mut().grounded = false;
        player.update(DT, InputFrame::default()).unwrap();
        assert_eq!(player.state(), Some(PlayerState::Falling));

        player.update(DT, InputFrame::press_jump()).unwrap();
        assert_eq!(player.state(), Some(PlayerState::Falling));
    }

    #[test]
    fn losing_ground_switches_to_falling_before_next_tick() {
        let mut player = Player::new(MovementConfig::default(), StubMover::grounded()).unwrap();
        land_once(&mut player);
        assert!(player.actor().jump_enabled);

        player.mover_mut().grounded = false;
        player.update(DT, InputFrame::default()).unwrap();
        assert_eq!(player.state(), Some(PlayerState::Falling));

        // Jump edge inside the coyote window is served by Falling, not Running.
        player.update(DT, InputFrame::press_jump()).unwrap();
        assert_eq!(player.state(), Some(PlayerState::Jumping));
        assert!(!player.actor().jump_enabled);
    }

    #[test]
    fn grounded_jump_press_enters_jumping_with_impulse() {
        let config = MovementConfig {
            jump_force: 5.0,
            fall_speed: 10.0,
            ..Default::default()
        };
        let mut player = Player::new(config, StubMover::grounded()).unwrap();
        player.update(DT, InputFrame::press_jump()).unwrap();
        assert_eq!(player.state(), Some(PlayerState::Jumping));
        assert!((player.actor().velocity.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn running_zeroes_velocity_on_quiet_grounded_frames() {
        let config = MovementConfig {
            fall_speed: 10.0,
            ..Default::default()
        };
        let mut player = Player::new(config, StubMover::grounded()).unwrap();
        player.fixed_update(FIXED_DT).unwrap();
        assert_eq!(player.actor().velocity.y, -10.0);

        player.update(DT, InputFrame::default()).unwrap();
        assert_eq!(player.actor().velocity, Vec3::ZERO);
    }

    #[test]
    fn landing_restores_running_and_jump_gate() {
        let mut player = Player::new(MovementConfig::default(), StubMover::grounded()).unwrap();
        player.update(DT, InputFrame::press_jump()).unwrap();
        player.mover_mut().grounded = false;
        player.update(DT, InputFrame::release_jump()).unwrap();
        assert_eq!(player.state(), Some(PlayerState::Falling));
        assert!(!player.actor().jump_enabled);

        player.fixed_update(FIXED_DT).unwrap();
        player.mover_mut().grounded = true;
        player.update(DT, InputFrame::default()).unwrap();
        assert_eq!(player.state(), Some(PlayerState::Running));
        assert!(player.actor().jump_enabled);
        assert_eq!(player.actor().velocity, Vec3::ZERO);
    }

    #[test]
    fn double_jump_allows_a_second_jump_after_release() {
        let config = MovementConfig {
            double_jump: true,
            ..Default::default()
        };
        let mut player = Player::new(config, StubMover::grounded()).unwrap();
        land_once(&mut player);
        player.update(DT, InputFrame::press_jump()).unwrap();
        player.mover_mut().grounded = false;
        assert!(player.actor().jump_enabled);

        player.update(DT, InputFrame::release_jump()).unwrap();
        assert_eq!(player.state(), Some(PlayerState::Falling));
        player.update(DT, InputFrame::press_jump()).unwrap();
        assert_eq!(player.state(), Some(PlayerState::Jumping));
    }

    #[test]
    fn input_axis_is_clamped() {
        assert_eq!(InputFrame::new(false, false, 3.0).dash_axis, 1.0);
        assert_eq!(InputFrame::new(false, false, -3.0).dash_axis, -1.0);
    }
}
