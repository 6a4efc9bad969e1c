//! hidg-typist entry point.
//!
//! Loads the TOML config, applies command-line overrides, opens the gadget
//! keyboard device, and serves the HTTP ingress until Ctrl+C.
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML file, or defaults
//!  └─ Cli::apply_overrides()   -- flags win over the file
//!  └─ open_keyboard()          -- /dev/hidg0 by default
//!  └─ run_server()             -- axum listener until shutdown
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hidg_server::application::{SerializedKeyboard, Typist};
use hidg_server::infrastructure::{load_config, run_server, AppConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Types text posted over HTTP on a USB HID gadget keyboard.
#[derive(Debug, Parser)]
#[command(
    name = "hidg-typist",
    about = "HTTP ingress that types posted text on a USB HID gadget keyboard",
    version
)]
struct Cli {
    /// Path to the TOML configuration file.
    ///
    /// A missing file is not an error; built-in defaults are used instead.
    #[arg(short = 'c', long = "config-path", env = "HIDG_CONFIG")]
    config_path: Option<PathBuf>,

    /// Keyboard gadget device node (overrides `keyboard.file`).
    #[arg(short = 'k', long)]
    keyboard_file: Option<PathBuf>,

    /// HTTP port (overrides `server.port`).
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Pause after each report in paced mode (overrides
    /// `keyboard.stroke_delay_ms`).
    #[arg(long)]
    stroke_delay_ms: Option<u64>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(file) = &self.keyboard_file {
            config.keyboard.file = file.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(delay) = self.stroke_delay_ms {
            config.keyboard.stroke_delay_ms = delay;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config_path.as_deref()).context("failed to load config")?;
    cli.apply_overrides(&mut config);

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let settings = config.into_settings().context("invalid configuration")?;

    info!(
        "hidg-typist starting: device={}, listen={}, stroke_delay={:?}",
        settings.device_path.display(),
        settings.bind_addr,
        settings.stroke_delay
    );

    let writer = hidg_core::open_keyboard(&settings.device_path, settings.stroke_delay)
        .context("failed to open keyboard device")?;

    // Set on Ctrl+C; stops the listener and any paced typing in progress.
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = Arc::clone(&shutdown);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; shutting down");
                shutdown_clone.store(true, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    let keyboard: Arc<dyn Typist> =
        Arc::new(SerializedKeyboard::new(writer, Arc::clone(&shutdown)));
    run_server(&settings, keyboard, shutdown).await?;

    info!("hidg-typist stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
