pub mod constraint;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod mass;
pub mod placement;
pub mod scenarios;

pub use constraint::ConstraintKind;
pub use error::{ConfigError, GeometryError};
pub use layout::{Layout, LayoutConfig};
pub use mass::Mass;
