//! Interactive terminal front-end.
//!
//! Reads one command per line from stdin and drives a [`Session`] exactly the
//! way the graphical surface would: toggling, dropping or picking files,
//! pressing convert and download. The view is re-rendered after every change.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use mf_av::FfmpegFactory;
use mf_core::config::Config;
use mf_core::{DropTarget, Error};
use mf_session::{ConvertOutcome, PathSource, Session, ZoneEvent, ZoneOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use mediaflip::render::render_view;

const HELP: &str = "\
Commands:
  toggle                          switch conversion direction
  drop <primary|image> <paths..>  drop files on a zone
  pick <primary|image> <paths..>  select files through a zone's picker
  click <primary|image>           click a zone
  drag <primary|image>            drag over a zone
  leave <primary|image>           drag out of a zone
  convert                         press convert (first press loads the engine)
  download [DIR]                  save the converted file
  status                          show the surface
  help                            show this help
  quit                            exit";

pub async fn run(config: Config) -> Result<()> {
    let factory = Arc::new(FfmpegFactory::new(config.tools.clone()));
    let session = Session::new(factory);

    println!("mediaflip {} - type `help` for commands\n", env!("CARGO_PKG_VERSION"));
    println!("{}", render_view(&session.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            continue;
        };

        match command {
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            other => {
                if let Err(e) = dispatch(&session, &config, other, args).await {
                    println!("Error: {e:#}");
                }
            }
        }
    }

    Ok(())
}

async fn dispatch(session: &Session, config: &Config, command: &str, args: &[&str]) -> Result<()> {
    match command {
        "status" => {}
        "toggle" => session.toggle_mode(),
        "click" | "drag" | "leave" => {
            let target = parse_target(args)?;
            let event = match command {
                "click" => ZoneEvent::Click,
                "drag" => ZoneEvent::DragOver,
                _ => ZoneEvent::DragLeave,
            };
            if session.handle_zone_event(target, event) == ZoneOutcome::OpenPicker {
                println!("Picker open: use `pick {target} <paths..>` to choose a file");
            }
        }
        "drop" | "pick" => {
            let target = parse_target(args)?;
            let mut source = PathSource::new(args[1..].iter().map(PathBuf::from));
            let outcome = if command == "drop" {
                session.drop_from(target, &mut source).await?
            } else {
                session.pick_from(target, &mut source).await?
            };
            if outcome == ZoneOutcome::Ignored {
                println!("Nothing selected");
            }
        }
        "convert" => match session.convert().await {
            Ok(ConvertOutcome::EngineLoading { ready: true }) => {
                println!("Engine ready; run `convert` again to convert")
            }
            Ok(ConvertOutcome::Failed { detail }) => tracing::debug!("Failure detail: {detail}"),
            Ok(_) => {}
            Err(Error::Busy) => println!("A conversion is already running"),
            // The alert is part of the rendered view.
            Err(Error::MissingInput(_)) => {}
            Err(e) => return Err(e.into()),
        },
        "download" => {
            let dir = args
                .first()
                .map(PathBuf::from)
                .unwrap_or_else(|| config.output.dir.clone());
            let path = session.download(&dir).await?;
            println!("Saved {}", path.display());
        }
        other => anyhow::bail!("unknown command `{other}`; type `help`"),
    }

    let view = session.view();
    println!("{}", render_view(&view));
    if view.alert.is_some() {
        session.dismiss_alert();
    }
    Ok(())
}

fn parse_target(args: &[&str]) -> Result<DropTarget> {
    let Some(name) = args.first() else {
        anyhow::bail!("expected a zone: primary or image");
    };
    name.parse().map_err(anyhow::Error::msg)
}
