pub mod params;
pub mod progress;
pub mod supervisor;

pub use params::{GeneticParameters, RunParameters};
pub use progress::{parse_progress, Progress};
pub use supervisor::{run_runtime, RunOutcome};
