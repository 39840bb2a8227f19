pub mod export;
pub mod fits;

pub use export::{export_image, ExportedImage};
pub use fits::write_fits;
