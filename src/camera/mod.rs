pub mod store;
pub mod types;

pub use store::CameraStore;
pub use types::{CameraProfile, QuantumEfficiency};
