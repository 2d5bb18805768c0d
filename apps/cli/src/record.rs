use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use recorder_core::{CaptureRequest, Recorder};
use tracing::*;

use crate::{paths, settings::RecordingSettings};

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Window title to capture
    #[arg(long)]
    window: Option<String>,
    /// Video width in pixels
    #[arg(long)]
    width: Option<u32>,
    /// Video height in pixels
    #[arg(long)]
    height: Option<u32>,
    /// Video bitrate in bits per second
    #[arg(long)]
    bitrate: Option<u32>,
    /// Output file path (defaults to a timestamped file in the recordings directory)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Duration in seconds (0 for manual stop)
    #[arg(long, default_value_t = 0)]
    duration: u64,
    /// Arm a failpoint for this run, e.g. `recorder-core::session::start`
    #[arg(long = "fail", value_name = "NAME")]
    failpoints: Vec<String>,
}

impl RecordArgs {
    /// Flags win over the settings file.
    fn request(&self, settings: &RecordingSettings) -> CaptureRequest {
        let output_path = match &self.out {
            Some(out) => out.clone(),
            None => paths::next_output_path(
                &settings
                    .output_dir
                    .clone()
                    .unwrap_or_else(paths::recordings_dir),
            ),
        };

        CaptureRequest::new(
            self.window.clone().unwrap_or_else(|| settings.window.clone()),
            self.width.unwrap_or(settings.width),
            self.height.unwrap_or(settings.height),
            self.bitrate.unwrap_or(settings.bitrate),
            output_path,
        )
    }

    fn arm_failpoints(&self) {
        let known = recorder_fail::list();
        for name in &self.failpoints {
            if !known.contains_key(name) {
                warn!(failpoint = %name, "Unknown failpoint");
            }
            recorder_fail::set_fail(name.clone(), true);
        }
    }

    pub async fn run(self, settings: &RecordingSettings) -> anyhow::Result<()> {
        self.arm_failpoints();

        let request = self.request(settings);
        let output_path = request.output_path.clone();

        // Only the default recordings directory is created on demand
        let created_dirs = match (&self.out, output_path.parent()) {
            (None, Some(dir)) => paths::create_missing_dirs(dir)?,
            _ => Vec::new(),
        };

        println!("Starting recording...");
        println!("Window: {}", request.window_title);
        println!("Resolution: {}x{}", request.width, request.height);
        println!("Bitrate: {} bps", request.bitrate);
        println!("Output: {}", output_path.display());

        let recorder = Recorder::new();
        if let Err(e) = recorder.start_request(request) {
            paths::remove_created_dirs(&created_dirs);
            return Err(e).context("Failed to start recording");
        }

        if self.duration > 0 {
            println!("Recording for {} seconds, press Ctrl+C to stop early", self.duration);
        } else {
            println!("Recording started. Press Ctrl+C to stop.");
        }

        wait_for_stop(self.duration).await?;

        recorder.stop();
        println!("Recording saved to: {}", output_path.display());

        Ok(())
    }
}

async fn wait_for_stop(duration: u64) -> anyhow::Result<()> {
    let timer = async {
        if duration == 0 {
            std::future::pending::<()>().await
        } else {
            tokio::time::sleep(Duration::from_secs(duration)).await
        }
    };

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res.context("Failed to listen for Ctrl+C")?;
            info!("Interrupted, stopping recording");
        }
        _ = timer => {
            info!(duration, "Duration elapsed, stopping recording");
        }
    }

    Ok(())
}
