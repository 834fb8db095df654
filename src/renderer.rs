use ledgerun::PlayerState;

/// Background colour per locomotion state, so transitions are visible at a glance.
fn state_color(state: Option<PlayerState>) -> (f32, f32, f32) {
    match state {
        Some(PlayerState::Running) => (0.10, 0.22, 0.12),
        Some(PlayerState::Jumping) => (0.12, 0.16, 0.35),
        Some(PlayerState::Falling) => (0.35, 0.12, 0.10),
        None => (0.1, 0.1, 0.15),
    }
}

pub fn begin_frame(state: Option<PlayerState>) {
    let (r, g, b) = state_color(state);
    unsafe {
        gl::ClearColor(r, g, b, 1.0);
        gl::Clear(gl::COLOR_BUFFER_BIT);
    }
}
