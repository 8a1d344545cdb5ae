use std::cell::Cell;
use std::rc::Rc;

use log::{info, warn};

use super::effects::Jitter;
use super::session::{AnimationSession, FrameSnapshot};
use super::Surface;
use crate::config::Config;
use crate::error::DeltaError;

/// A disabled background never gets an `Animator`; `start` refuses instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Returned by each frame callback: whether the host should schedule another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Stopped,
}

/// Cancels a running animation. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle {
    stopped: Rc<Cell<bool>>,
}

impl SessionHandle {
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

/// A started animation bound to its surface.
pub struct Animator<S: Surface> {
    session: AnimationSession,
    surface: S,
    handle: SessionHandle,
    state: LoopState,
    last_frame: Option<FrameSnapshot>,
}

impl<S: Surface> Animator<S> {
    /// Enters `Running`, or refuses when disabled or when the surface has no area.
    pub fn start(
        config: &Config,
        surface: S,
        jitter: Box<dyn Jitter>,
    ) -> Result<(Self, SessionHandle), DeltaError> {
        if !config.enabled {
            info!("Delta background disabled; staying hidden");
            return Err(DeltaError::Disabled);
        }
        if !surface.is_drawable() {
            warn!(
                "Delta background has no surface ({}x{}); staying hidden",
                surface.width(),
                surface.height()
            );
            return Err(DeltaError::SurfaceUnavailable {
                width: surface.width(),
                height: surface.height(),
            });
        }

        let origin = (surface.width() / 2.0, surface.height() / 2.0);
        let session = AnimationSession::new(config, origin, jitter);
        let handle = SessionHandle::default();
        info!(
            "Delta background running on {}x{} surface",
            surface.width(),
            surface.height()
        );
        let animator = Self {
            session,
            surface,
            handle: handle.clone(),
            state: LoopState::Running,
            last_frame: None,
        };
        Ok((animator, handle))
    }

    /// One frame callback. Checks for cancellation before drawing.
    pub fn on_frame(&mut self) -> FrameOutcome {
        if self.state == LoopState::Stopped {
            return FrameOutcome::Stopped;
        }
        if self.handle.is_stopped() {
            info!("Delta background stopped after {} frames", self.session.frames());
            self.state = LoopState::Stopped;
            return FrameOutcome::Stopped;
        }
        // A resize can momentarily collapse the surface; skip painting but keep the loop alive.
        if self.surface.is_drawable() {
            self.last_frame = Some(self.session.advance(&mut self.surface));
        }
        FrameOutcome::Continue
    }

    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn session(&self) -> &AnimationSession {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn last_frame(&self) -> Option<&FrameSnapshot> {
        self.last_frame.as_ref()
    }
}
