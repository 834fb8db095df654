use std::collections::HashSet;

use ledgerun::InputFrame;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::EventPump;

const JUMP_KEY: Scancode = Scancode::Space;

/// Keyboard state: keys held right now, plus the edges seen this frame.
pub struct InputState {
    keys: HashSet<Scancode>,
    pressed: HashSet<Scancode>,
    released: HashSet<Scancode>,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
            quit: false,
        }
    }

    pub fn update(&mut self, event_pump: &mut EventPump) {
        self.pressed.clear();
        self.released.clear();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => self.quit = true,
                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => self.quit = true,
                // Auto-repeat is not a new press.
                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if self.keys.insert(sc) {
                        self.pressed.insert(sc);
                    }
                }
                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if self.keys.remove(&sc) {
                        self.released.insert(sc);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn is_key_held(&self, sc: Scancode) -> bool {
        self.keys.contains(&sc)
    }

    pub fn was_pressed(&self, sc: Scancode) -> bool {
        self.pressed.contains(&sc)
    }

    pub fn was_released(&self, sc: Scancode) -> bool {
        self.released.contains(&sc)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Snapshot for the locomotion states. A/D (or arrows) drive the dash axis.
    pub fn frame(&self) -> InputFrame {
        let mut axis = 0.0;
        if self.is_key_held(Scancode::D) || self.is_key_held(Scancode::Right) {
            axis += 1.0;
        }
        if self.is_key_held(Scancode::A) || self.is_key_held(Scancode::Left) {
            axis -= 1.0;
        }
        InputFrame::new(self.was_pressed(JUMP_KEY), self.was_released(JUMP_KEY), axis)
    }
}
