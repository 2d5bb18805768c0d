mod paths;
mod record;
mod settings;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use record::RecordArgs;
use settings::RecordingSettings;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recorder")]
#[command(about = "Ultra-light screen recorder for Teamfight Tactics", long_about = None)]
struct Cli {
    /// Settings file to read instead of the one in the config directory
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a window to an MP4 file
    Record(RecordArgs),
    /// List recordings, newest first
    List,
    /// Print the settings file location and the effective settings
    Settings,
    /// List failpoints compiled into this binary
    Failpoints,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let settings_path = cli.settings.or_else(RecordingSettings::default_path);
    let settings = match &settings_path {
        Some(path) => RecordingSettings::load(path)?,
        None => RecordingSettings::default(),
    };

    match cli.command {
        Commands::Record(args) => args.run(&settings).await,
        Commands::List => {
            let dir = settings
                .output_dir
                .clone()
                .unwrap_or_else(paths::recordings_dir);

            let recordings = match paths::list_recordings(&dir) {
                Ok(recordings) => recordings,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to read '{}'", dir.display()));
                }
            };

            if recordings.is_empty() {
                println!("No recordings yet in {}", dir.display());
            }
            for recording in recordings {
                println!("{}", recording.display());
            }
            Ok(())
        }
        Commands::Settings => {
            match &settings_path {
                Some(path) => println!("Settings file: {}", path.display()),
                None => println!("Settings file: <no config directory>"),
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        Commands::Failpoints => {
            let failpoints = recorder_fail::list();
            if failpoints.is_empty() {
                println!("No failpoints (release build)");
            }
            for (name, armed) in failpoints {
                println!("{name}: {}", if armed { "armed" } else { "off" });
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_settings_flag() {
        let cli = Cli::parse_from(["recorder", "settings", "--settings", "/tmp/s.json"]);
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/s.json")));
        assert!(matches!(cli.command, Commands::Settings));
    }

    #[test]
    fn list_subcommand() {
        let cli = Cli::parse_from(["recorder", "list"]);
        assert!(matches!(cli.command, Commands::List));
    }
}
