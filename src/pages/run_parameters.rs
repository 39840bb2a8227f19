use std::path::PathBuf;

use dialoguer::theme::Theme;

use crate::components::number_field::{prompt_field, prompt_number, prompt_toggle};
use crate::process::params::GeneticParameters;

/// Values collected on the second screen.
#[derive(Debug, Clone, PartialEq)]
pub struct RunForm {
    pub genetics: GeneticParameters,
    pub output_dir: PathBuf,
    pub timings: bool,
}

/// Second screen: genetic-algorithm tuning and output options.
pub fn run_parameters_screen(theme: &dyn Theme, initial: RunForm) -> anyhow::Result<RunForm> {
    let d = initial.genetics;
    let genetics = GeneticParameters {
        population_size: prompt_number(theme, "Population size", d.population_size)?,
        generations: prompt_number(theme, "Generations", d.generations)?,
        elitism: prompt_number(theme, "Elite individuals per generation", d.elitism)?,
        initial_std: prompt_number(theme, "Initial mutation standard deviation", d.initial_std)?,
        decay_rate: prompt_number(theme, "Mutation decay rate", d.decay_rate)?,
    };

    let output_dir = prompt_field(
        theme,
        "Output directory",
        Some(initial.output_dir.display().to_string()),
        |s| {
            let s = s.trim();
            if s.is_empty() {
                Err("Output directory cannot be empty".to_string())
            } else {
                Ok(s.to_string())
            }
        },
    )?;

    let timings = prompt_toggle(theme, "Print stage timings", initial.timings)?;

    Ok(RunForm {
        genetics,
        output_dir: PathBuf::from(output_dir),
        timings,
    })
}
