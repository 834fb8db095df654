use sdl2::video::{GLContext, GLProfile, Window};
use sdl2::Sdl;
use tracing::warn;

pub struct GameWindow {
    _gl_context: GLContext,
    window: Window,
}

impl GameWindow {
    pub fn new(sdl: &Sdl, title: &str, width: u32, height: u32) -> Result<Self, String> {
        let video = sdl.video()?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);

        let window = video
            .window(title, width, height)
            .opengl()
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let gl_context = window.gl_create_context()?;
        gl::load_with(|s| video.gl_get_proc_address(s) as *const _);

        Ok(Self {
            _gl_context: gl_context,
            window,
        })
    }

    pub fn set_title(&mut self, title: &str) {
        if let Err(err) = self.window.set_title(title) {
            warn!(?err, "could not set window title");
        }
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }
}
