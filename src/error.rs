use std::io;

#[derive(Debug, thiserror::Error)]
pub enum DeltaError {
    #[error("background animation is disabled")]
    Disabled,

    #[error("drawing surface unavailable ({width}x{height} px)")]
    SurfaceUnavailable { width: f64, height: f64 },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
