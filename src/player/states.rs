use glam::Vec3;
use tracing::trace;

use super::{Locomotion, Mover, PlayerState};
use crate::fsm::State;

/// Fixed-tick step shared by every locomotion state: add one tick of fall
/// speed, then move by constant forward run + lateral dash + accumulated
/// velocity. Only the move is scaled by `dt`.
///
/// Gravity is applied even while grounded, otherwise the mover never
/// reports ground contact.
fn integrate<M: Mover>(actor: &mut Locomotion<M>, dt: f32) {
    let Locomotion {
        config,
        velocity,
        basis,
        input,
        mover,
        ..
    } = actor;

    *velocity -= basis.up * config.fall_speed;

    let movement = basis.forward * config.speed - basis.right * input.dash_axis * config.dash_speed;
    mover.move_by((movement + *velocity) * dt);
}

// ---------------------------------------------------------------------------
// Running
// ---------------------------------------------------------------------------

/// Grounded locomotion.
#[derive(Debug, Default)]
pub struct Running;

impl<M: Mover> State<PlayerState, Locomotion<M>> for Running {
    fn update(&mut self, actor: &mut Locomotion<M>, _dt: f32) -> Option<PlayerState> {
        if !actor.is_grounded() {
            Some(PlayerState::Falling)
        } else if actor.input.jump_pressed {
            Some(PlayerState::Jumping)
        } else {
            // Drop whatever gravity the last tick accumulated.
            actor.velocity = Vec3::ZERO;
            None
        }
    }

    fn fixed_update(&mut self, actor: &mut Locomotion<M>, dt: f32) -> Option<PlayerState> {
        integrate(actor, dt);
        None
    }
}

// ---------------------------------------------------------------------------
// Falling
// ---------------------------------------------------------------------------

/// Airborne and not ascending. Honours a late jump for `coyote_time`
/// seconds after it became current.
#[derive(Debug, Default)]
pub struct Falling {
    falling_time: f32,
}

impl Falling {
    pub fn falling_time(&self) -> f32 {
        self.falling_time
    }

    fn can_jump<M>(&self, actor: &Locomotion<M>) -> bool {
        actor.jump_enabled && self.falling_time <= actor.config.coyote_time
    }
}

impl<M: Mover> State<PlayerState, Locomotion<M>> for Falling {
    fn update(&mut self, actor: &mut Locomotion<M>, dt: f32) -> Option<PlayerState> {
        let next = if actor.is_grounded() {
            actor.velocity = Vec3::ZERO;
            actor.jump_enabled = true;
            Some(PlayerState::Running)
        } else if actor.input.jump_pressed && self.can_jump(actor) {
            trace!(falling_time = self.falling_time, "coyote jump");
            actor.jump_enabled = false;
            Some(PlayerState::Jumping)
        } else {
            None
        };

        self.falling_time += dt;
        next
    }

    fn fixed_update(&mut self, actor: &mut Locomotion<M>, dt: f32) -> Option<PlayerState> {
        integrate(actor, dt);
        None
    }

    fn exit(&mut self, _actor: &mut Locomotion<M>) {
        self.falling_time = 0.0;
    }
}

// ---------------------------------------------------------------------------
// Jumping
// ---------------------------------------------------------------------------

/// Ascending after a jump. Ends after `jump_time` seconds or on early release.
#[derive(Debug, Default)]
pub struct Jumping {
    current_jump_time: f32,
}

impl Jumping {
    pub fn current_jump_time(&self) -> f32 {
        self.current_jump_time
    }
}

impl<M: Mover> State<PlayerState, Locomotion<M>> for Jumping {
    fn init(&mut self, actor: &mut Locomotion<M>) {
        let impulse = actor.config.jump_impulse();
        actor.velocity += actor.basis.up * impulse;
        if !actor.config.double_jump {
            actor.jump_enabled = false;
        }
        trace!(impulse, jump_enabled = actor.jump_enabled, "jump");
    }

    fn update(&mut self, actor: &mut Locomotion<M>, dt: f32) -> Option<PlayerState> {
        let next = if self.current_jump_time > actor.config.jump_time || actor.input.jump_released {
            actor.velocity = actor.horizontal_velocity();
            Some(PlayerState::Falling)
        } else {
            None
        };

        self.current_jump_time += dt;
        next
    }

    fn fixed_update(&mut self, actor: &mut Locomotion<M>, dt: f32) -> Option<PlayerState> {
        integrate(actor, dt);
        None
    }

    fn exit(&mut self, _actor: &mut Locomotion<M>) {
        self.current_jump_time = 0.0;
    }
}
