use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use ratatui::layout::Rect;

use crate::color::Rgba;
use crate::config::Config;
use crate::render::braille::BrailleSurface;
use crate::render::effects::RngJitter;
use crate::render::lifecycle::{Animator, FrameOutcome, SessionHandle};
use crate::ui;

pub const BACKGROUND: Rgba = Rgba::rgb(6, 8, 18);

pub enum Background {
    /// Disabled or no surface: nothing is drawn.
    Hidden,
    Animating {
        animator: Animator<BrailleSurface>,
        handle: SessionHandle,
    },
}

pub struct App {
    pub should_quit: bool,
    pub background: Background,
}

impl App {
    /// `field` is the terminal area the animation will occupy.
    pub fn new(config: &Config, field: Rect) -> Self {
        let surface = BrailleSurface::new(field.width as usize, field.height as usize, BACKGROUND);
        let jitter = Box::new(RngJitter(rand::thread_rng()));
        let background = match Animator::start(config, surface, jitter) {
            Ok((animator, handle)) => Background::Animating { animator, handle },
            Err(e) => {
                debug!("Not animating: {}", e);
                Background::Hidden
            }
        };
        Self {
            should_quit: false,
            background,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self.background, Background::Hidden)
    }

    pub fn on_tick(&mut self) {
        match &mut self.background {
            Background::Hidden => {}
            Background::Animating { animator, .. } => {
                if animator.on_frame() == FrameOutcome::Stopped {
                    self.should_quit = true;
                }
            }
        }
    }

    /// Resizes the surface now so the next tick repaints it before the next draw.
    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        debug!("Terminal resized to {}x{}", cols, rows);
        if let Background::Animating { animator, .. } = &mut self.background {
            let field = ui::field_area(Rect::new(0, 0, cols, rows));
            animator
                .surface_mut()
                .resize(field.width as usize, field.height as usize);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc);
        if !(ctrl_c || quit) {
            return;
        }
        match &self.background {
            // Let the frame loop observe the stop and wind down.
            Background::Animating { handle, .. } => handle.stop(),
            Background::Hidden => self.should_quit = true,
        }
    }
}
