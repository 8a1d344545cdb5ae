pub mod math;
pub mod params;
pub mod path;
pub mod projector;

pub use math::{apply_orientation, Point3};
pub use path::ControlPath;
pub use projector::{Projected, Projector};
