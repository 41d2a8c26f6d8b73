mod cli;
mod shell;

use mediaflip::{config, render::ConversionReport};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use mf_av::{FfmpegFactory, ToolRegistry};
use mf_core::config::Config;
use mf_core::{DropTarget, Mode};
use mf_session::{ConvertOutcome, PathSource, Session, ZoneOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediaflip=trace,mf_session=debug,mf_av=debug".to_string()
        } else {
            "mediaflip=info,mf_session=info,mf_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::ToVideo {
            audio,
            image,
            out,
            json,
        } => {
            let inputs = [(DropTarget::Primary, audio), (DropTarget::Image, image)];
            convert_files(Mode::AudioToVideo, &inputs, out, json, cli.config.as_deref())
        }
        Commands::ToAudio { video, out, json } => {
            let inputs = [(DropTarget::Primary, video)];
            convert_files(Mode::VideoToAudio, &inputs, out, json, cli.config.as_deref())
        }
        Commands::Shell => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(shell::run(config))
        }
        Commands::CheckTools { json } => check_tools(cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mediaflip {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn convert_files(
    mode: Mode,
    inputs: &[(DropTarget, PathBuf)],
    out: Option<PathBuf>,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    // Verify input files exist
    for (_, path) in inputs {
        if !path.exists() {
            anyhow::bail!("Input file does not exist: {:?}", path);
        }
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_conversion(config, mode, inputs, out, json))
}

async fn run_conversion(
    config: Config,
    mode: Mode,
    inputs: &[(DropTarget, PathBuf)],
    out: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let factory = Arc::new(FfmpegFactory::new(config.tools.clone()));
    let session = Session::new(factory);
    session.set_mode(mode);

    for (target, path) in inputs {
        let outcome = session
            .drop_from(*target, &mut PathSource::new([path]))
            .await
            .with_context(|| format!("Failed to read {:?}", path))?;
        if outcome == ZoneOutcome::Ignored {
            anyhow::bail!("{:?} was not accepted", path);
        }
    }

    // The first press only loads the engine.
    let mut outcome = session.convert().await?;
    if let ConvertOutcome::EngineLoading { ready } = outcome {
        if !ready {
            let status = session.view().output.status().map(ToString::to_string);
            anyhow::bail!("{}", status.unwrap_or_else(|| "Engine failed to load".into()));
        }
        outcome = session.convert().await?;
    }

    let result = match outcome {
        ConvertOutcome::Converted(result) => result,
        ConvertOutcome::Failed { detail } => {
            anyhow::bail!("Conversion failed: {detail}")
        }
        other => anyhow::bail!("Conversion did not complete: {other:?}"),
    };

    let dir = out.unwrap_or_else(|| config.output.dir.clone());
    let path = session
        .download(&dir)
        .await
        .with_context(|| format!("Failed to save into {:?}", dir))?;

    if json {
        let report = ConversionReport {
            mode,
            path: &path,
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Converted: {}", path.display());
        println!("Type: {} ({})", result.kind, result.mime);
        println!("Size: {} bytes", result.size);
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools).check_all();

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    println!("Checking external tools...\n");
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to enable conversions.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match config::resolve_config_path(path) {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(&p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    match &config.tools.ffmpeg_path {
        Some(p) => println!("  ffmpeg: {}", p.display()),
        None => println!("  ffmpeg: from PATH"),
    }
    println!("  Timeout: {}s", config.tools.timeout_secs);
    println!("  Output dir: {}", config.output.dir.display());

    for warning in config.validate() {
        println!("  warning: {}", warning);
    }

    Ok(())
}
