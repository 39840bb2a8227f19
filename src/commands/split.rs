use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{bail, Context};
use dialoguer::theme::ColorfulTheme;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::camera::{CameraProfile, CameraStore};
use crate::config::LauncherConfig;
use crate::host::Host;
use crate::imaging::export_image;
use crate::pages::{camera_profile_screen, run_parameters_screen, RunForm};
use crate::process::{run_runtime, GeneticParameters, RunOutcome, RunParameters};

/// File extensions the runtime writes its results with.
const OUTPUT_EXTENSIONS: [&str; 3] = ["fit", "fits", "fts"];

/// File timestamps come from a coarser clock than `SystemTime::now`.
const MTIME_SLACK: Duration = Duration::from_secs(2);

/// Command-line values for a split. Unset values come from the form or config.
#[derive(Debug, Clone, Default)]
pub struct SplitRequest {
    pub camera: Option<String>,
    pub population_size: Option<usize>,
    pub generations: Option<u32>,
    pub elitism: Option<usize>,
    pub initial_std: Option<f32>,
    pub decay_rate: Option<f32>,
    pub output_dir: Option<PathBuf>,
    pub timings: bool,
    /// Show the two form screens before running.
    pub interactive: bool,
}

impl SplitRequest {
    fn genetics(&self, defaults: GeneticParameters) -> GeneticParameters {
        GeneticParameters {
            population_size: self.population_size.unwrap_or(defaults.population_size),
            generations: self.generations.unwrap_or(defaults.generations),
            elitism: self.elitism.unwrap_or(defaults.elitism),
            initial_std: self.initial_std.unwrap_or(defaults.initial_std),
            decay_rate: self.decay_rate.unwrap_or(defaults.decay_rate),
        }
    }
}

/// Result of a finished split.
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub outcome: RunOutcome,
    pub output_dir: PathBuf,
    /// Result files written during this run.
    pub outputs: Vec<PathBuf>,
}

/// Stage two: hand the host's current image to the runtime at `runtime`.
pub fn split_current_image<H: Host + ?Sized>(
    host: &H,
    config: &LauncherConfig,
    runtime: &Path,
    request: &SplitRequest,
) -> anyhow::Result<SplitReport> {
    let image = host.current_image().context("No image to process")?;
    let exported = export_image(&image)?;
    host.log(&format!(
        "Prepared {}x{} image for duosplit",
        image.width, image.height
    ));

    let mut store = CameraStore::open_in(&host.user_config_dir())?;
    let output_dir = match &request.output_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let initial = RunForm {
        genetics: request.genetics(config.defaults),
        output_dir,
        timings: request.timings,
    };

    let (camera, form) = if request.interactive {
        let theme = ColorfulTheme::default();
        let (_, camera) = camera_profile_screen(&theme, &mut store, request.camera.as_deref())?;
        let form = run_parameters_screen(&theme, initial)?;
        (camera, form)
    } else {
        (select_camera(&store, request.camera.as_deref())?, initial)
    };

    std::fs::create_dir_all(&form.output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", form.output_dir))?;

    let params = RunParameters {
        camera,
        genetics: form.genetics,
        output_dir: form.output_dir.clone(),
        timings: form.timings,
        input: exported.path().to_path_buf(),
    };

    let started = SystemTime::now() - MTIME_SLACK;
    host.log("Running duosplit...");
    let outcome = run_runtime(host, runtime, &params)?;
    drop(exported);

    let outputs = match &outcome {
        RunOutcome::Success => {
            let outputs = collect_outputs(&form.output_dir, started);
            for path in &outputs {
                host.log(&format!("Wrote {}", path.display()));
            }
            host.info_message(
                "duosplit",
                &format!(
                    "Channel split complete. Results are in {}",
                    form.output_dir.display()
                ),
            );
            outputs
        }
        RunOutcome::UserError(message) => {
            let message = if message.trim().is_empty() {
                "duosplit rejected the input but gave no reason."
            } else {
                message.as_str()
            };
            host.error_message("duosplit", message);
            Vec::new()
        }
        RunOutcome::Crash { code, stderr } => {
            let code = code.map_or_else(|| "a signal".to_string(), |c| format!("exit code {}", c));
            host.error_message(
                "duosplit crashed",
                &format!("duosplit terminated with {}.\n{}", code, stderr.trim()),
            );
            Vec::new()
        }
    };

    Ok(SplitReport {
        outcome,
        output_dir: form.output_dir,
        outputs,
    })
}

/// The named camera, or the only saved camera when no name is given.
pub fn select_camera(store: &CameraStore, name: Option<&str>) -> anyhow::Result<CameraProfile> {
    match name {
        Some(name) => store
            .get(name)
            .copied()
            .with_context(|| format!("No saved camera named '{}'", name.trim())),
        None => match store.names().as_slice() {
            [only] => {
                info!("Using the only saved camera '{}'", only);
                store
                    .get(only)
                    .copied()
                    .with_context(|| format!("Camera '{}' vanished from the store", only))
            }
            [] => bail!("No cameras saved yet. Add one with `camera set` or use the form."),
            _ => bail!("Several cameras are saved; choose one with --camera."),
        },
    }
}

/// Result files in `dir` modified at or after `since`.
pub fn collect_outputs(dir: &Path, since: SystemTime) -> Vec<PathBuf> {
    let mut outputs: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable output entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| OUTPUT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .filter(|e| {
            e.metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .is_some_and(|modified| modified >= since)
        })
        .map(|e| e.into_path())
        .collect();
    outputs.sort();
    outputs
}
