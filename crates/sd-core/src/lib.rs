pub mod config;
pub mod error;
pub mod model;
pub mod raster;

pub use config::EditorConfig;
pub use error::{Result, SketchError};
pub use model::*;
pub use raster::BackgroundImage;
