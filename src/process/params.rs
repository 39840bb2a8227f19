use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::camera::CameraProfile;

/// Tuning scalars for the runtime's genetic algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParameters {
    pub population_size: usize,
    pub generations: u32,
    /// Individuals carried over unchanged into each generation.
    pub elitism: usize,
    /// Initial standard deviation of the mutation distribution.
    pub initial_std: f32,
    /// Per-generation decay of the mutation standard deviation.
    pub decay_rate: f32,
}

impl Default for GeneticParameters {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 250,
            elitism: 5,
            initial_std: 0.5,
            decay_rate: 0.1,
        }
    }
}

/// Everything one runtime invocation needs. Built fresh for each run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub camera: CameraProfile,
    pub genetics: GeneticParameters,
    pub output_dir: PathBuf,
    /// Ask the runtime to print per-stage timings.
    pub timings: bool,
    pub input: PathBuf,
}

impl RunParameters {
    /// Command-line arguments for the runtime, positional input last.
    pub fn to_args(&self) -> Vec<OsString> {
        let camera = &self.camera;
        let genetics = &self.genetics;

        let mut args: Vec<OsString> = Vec::with_capacity(24);
        let mut flag = |name: &str, value: String| {
            args.push(name.into());
            args.push(value.into());
        };

        flag("--qrh", camera.red.ha.to_string());
        flag("--qgh", camera.green.ha.to_string());
        flag("--qbh", camera.blue.ha.to_string());
        flag("--qro", camera.red.oiii.to_string());
        flag("--qgo", camera.green.oiii.to_string());
        flag("--qbo", camera.blue.oiii.to_string());
        flag("--population-size", genetics.population_size.to_string());
        flag("--generations", genetics.generations.to_string());
        flag("--elitism", genetics.elitism.to_string());
        flag("--initial-std", genetics.initial_std.to_string());
        flag("--decay-rate", genetics.decay_rate.to_string());

        args.push("--output".into());
        args.push(self.output_dir.clone().into_os_string());
        if self.timings {
            args.push("--timings".into());
        }
        args.push(self.input.clone().into_os_string());
        args
    }
}
