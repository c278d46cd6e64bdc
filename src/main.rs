//! LWC Preview - binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;

use lwc_preview::{run, RunOptions};
use lwcp_app::{find_project_root, init_config_dir};
use lwcp_core::prelude::*;
use lwcp_core::PlatformKind;

/// Preview a Lightning Web Component on desktop, iOS or Android
#[derive(Parser, Debug)]
#[command(name = "lwcp", version)]
#[command(about = "Preview Lightning Web Components on desktop, iOS and Android", long_about = None)]
struct Args {
    /// Component file or bundle directory (defaults to $LWC_PREVIEW_ACTIVE_FILE)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Skip the platform prompt: desktop, ios or android
    #[arg(long, value_parser = parse_platform)]
    platform: Option<PlatformKind>,

    /// Skip the device prompt with this simulator/emulator name
    #[arg(long)]
    target: Option<String>,

    /// Run without prompts and print NDJSON events to stdout
    #[arg(long)]
    headless: bool,

    /// Project root (defaults to the nearest directory with sfdx-project.json)
    #[arg(long, value_name = "DIR")]
    project: Option<PathBuf>,

    /// Write a default .lwc-preview/config.toml into the project and exit
    #[arg(long)]
    init: bool,
}

fn parse_platform(value: &str) -> std::result::Result<PlatformKind, String> {
    PlatformKind::from_name(value)
        .ok_or_else(|| format!("unknown platform '{}' (expected desktop, ios or android)", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;
    lwcp_core::logging::init()?;

    if args.init {
        let project = args
            .project
            .clone()
            .or_else(|| std::env::current_dir().ok().as_deref().and_then(find_project_root))
            .unwrap_or_else(|| PathBuf::from("."));
        let path = init_config_dir(&project)?;
        eprintln!("Configuration at {}", path.display());
        return Ok(());
    }

    let status = run(RunOptions {
        source: args.path,
        platform: args.platform,
        target: args.target,
        headless: args.headless,
        project: args.project,
    })
    .await;

    match status {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(e) => {
            error!("Application error: {:?}", e);
            Err(e)
        }
    }
}
