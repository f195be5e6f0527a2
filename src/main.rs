use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use liz_gateway::{AudioPayload, Credentials, VOICES, VoicePipeline, default_voice};

/// Liz - talking-avatar voice assistant gateway
#[derive(Parser)]
#[command(name = "liz", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one voice exchange from a captured audio file
    Ask {
        /// Path to the captured clip (webm, mp3 or wav)
        file: PathBuf,
    },
    /// Show which provider credentials are configured
    Check,
    /// List the available synthesis voices
    Voices,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,liz_gateway=info",
        1 => "info,liz_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Ask { file } => ask(&file).await,
        Command::Check => check(),
        Command::Voices => voices(),
    }
}

/// Feed one finished audio clip through the full pipeline
async fn ask(file: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(file)?;
    let extension = file.extension().and_then(|e| e.to_str());
    let audio = AudioPayload::from_extension(extension, bytes);

    let credentials = Credentials::from_env();
    let mut pipeline = VoicePipeline::from_credentials(&credentials)?;

    match pipeline.run(audio).await {
        Ok(result) => {
            println!("you:   {}", result.transcription);
            println!("liz:   {}", result.reply);
            println!("video: {}", result.video_url);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_hint());
            Err(e.into())
        }
    }
}

/// Report per-provider credential presence
fn check() -> anyhow::Result<()> {
    let credentials = Credentials::from_env();

    for (provider, configured) in credentials.provider_status() {
        let mark = if configured { "ok" } else { "missing" };
        println!("{provider:<12} {mark}");
    }
    println!("{}", credentials.status_message());

    Ok(())
}

/// List the configured voice catalog
fn voices() -> anyhow::Result<()> {
    for voice in VOICES {
        let marker = if voice.id == default_voice().id {
            " (default)"
        } else {
            ""
        };
        println!("{:<10} {}{marker}", voice.name, voice.description);
    }

    Ok(())
}
