use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use duosplit_launcher::commands::camera::{
    format_entries, list_cameras, remove_camera, set_camera, show_camera,
};
use duosplit_launcher::commands::config::resolve_config;
use duosplit_launcher::commands::health::run_health_check;
use duosplit_launcher::commands::split::{split_current_image, SplitRequest};
use duosplit_launcher::commands::update::{describe_status, update_runtime};
use duosplit_launcher::host::{Host, TerminalHost};
use duosplit_launcher::init_tracing;
use duosplit_launcher::process::RunOutcome;

/// Exit status for launcher failures and runtime crashes.
const FAILURE_EXIT_CODE: u8 = 2;

/// Split a one-shot-color narrowband image into Ha and OIII with duosplit.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Configuration file. Defaults to `config.toml` in the config directory.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the directory the runtime is installed into.
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Override the directory holding cameras.json and config.toml.
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Install the runtime, or update it if a newer release is published.
    Update,

    /// Split an image into Ha and OIII.
    Split(SplitArgs),

    /// Manage saved camera QE profiles.
    #[command(subcommand)]
    Camera(CameraCommand),

    /// Report platform, runtime and directory status as JSON.
    Health,

    /// Print the effective configuration.
    Config,
}

#[derive(clap::Args)]
struct SplitArgs {
    /// Image to split (FITS output of the host, or any format `image` reads).
    image: PathBuf,

    /// Saved camera to use.
    #[arg(long)]
    camera: Option<String>,

    #[arg(long, value_name = "N")]
    population_size: Option<usize>,

    #[arg(long, value_name = "N")]
    generations: Option<u32>,

    #[arg(long, value_name = "N")]
    elitism: Option<usize>,

    #[arg(long, value_name = "STD")]
    initial_std: Option<f32>,

    #[arg(long, value_name = "RATE")]
    decay_rate: Option<f32>,

    /// Directory the Ha and OIII results are written to.
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Ask the runtime to print stage timings.
    #[arg(long)]
    timings: bool,

    /// Skip the form and run with the given values.
    #[arg(long)]
    no_form: bool,
}

#[derive(Subcommand)]
enum CameraCommand {
    /// List saved cameras.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one camera.
    Show { name: String },
    /// Create or replace a camera.
    Set {
        name: String,
        #[arg(long)]
        red_ha: f64,
        #[arg(long)]
        green_ha: f64,
        #[arg(long)]
        blue_ha: f64,
        #[arg(long)]
        red_oiii: f64,
        #[arg(long)]
        green_oiii: f64,
        #[arg(long)]
        blue_oiii: f64,
    },
    /// Delete a camera.
    Remove { name: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut host = TerminalHost::new()?;
    if let Some(dir) = cli.data_dir {
        host.set_data_dir(dir);
    }
    if let Some(dir) = cli.config_dir {
        host.set_config_dir(dir);
    }

    let view = resolve_config(cli.config.as_deref(), &host.user_config_dir())?;
    init_tracing(&view.config.logging.filter);
    info!("Configuration: {}", view.source());
    let config = view.config.clone();

    match cli.command {
        Command::Update => {
            let info = update_runtime(&host, &config).await?;
            println!("{}: {}", info.path.display(), describe_status(&info.status));
        }
        Command::Split(args) => {
            host.load_image(&args.image);
            let info = update_runtime(&host, &config).await?;
            let request = SplitRequest {
                camera: args.camera,
                population_size: args.population_size,
                generations: args.generations,
                elitism: args.elitism,
                initial_std: args.initial_std,
                decay_rate: args.decay_rate,
                output_dir: args.output,
                timings: args.timings,
                interactive: !args.no_form && std::io::stdin().is_terminal(),
            };
            let report = split_current_image(&host, &config, &info.path, &request)?;
            for path in &report.outputs {
                println!("{}", path.display());
            }
            return Ok(match report.outcome {
                RunOutcome::Success => ExitCode::SUCCESS,
                RunOutcome::UserError(_) => ExitCode::from(1),
                RunOutcome::Crash { .. } => ExitCode::from(FAILURE_EXIT_CODE),
            });
        }
        Command::Camera(command) => {
            let dir = host.user_config_dir();
            match command {
                CameraCommand::List { json } => {
                    let entries = list_cameras(&dir)?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&entries)?);
                    } else if entries.is_empty() {
                        println!("No cameras saved.");
                    } else {
                        print!("{}", format_entries(&entries));
                    }
                }
                CameraCommand::Show { name } => {
                    print!("{}", format_entries(&[show_camera(&dir, &name)?]));
                }
                CameraCommand::Set {
                    name,
                    red_ha,
                    green_ha,
                    blue_ha,
                    red_oiii,
                    green_oiii,
                    blue_oiii,
                } => {
                    let entry = set_camera(
                        &dir,
                        &name,
                        [red_ha, green_ha, blue_ha, red_oiii, green_oiii, blue_oiii],
                    )?;
                    println!("Saved camera '{}'", entry.name);
                }
                CameraCommand::Remove { name } => {
                    if remove_camera(&dir, &name)? {
                        println!("Removed camera '{}'", name.trim());
                    } else {
                        println!("No camera named '{}'", name.trim());
                    }
                }
            }
        }
        Command::Health => {
            let report = run_health_check(&host, &config, &view.path);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Config => {
            print!("{}", view.render()?);
        }
    }
    Ok(ExitCode::SUCCESS)
}
