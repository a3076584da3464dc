//! xr-interact-cli: command line tools for the interaction core
//!
//! - `inspect` / `author`: read and write binary pose templates
//! - `resolve` / `fetch`: template URL resolution and cached loading
//! - `match`: recognise a synthetic hand against the pose library
//! - `replay-grab`: drive a grabbable with a scripted pointer sequence
//! - `profile`: input profile resolution

pub mod cli;
mod commands;
pub mod matching;
pub mod replay;
pub mod scenario;

use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use xr_interact_core::InteractionConfig;

pub use cli::{Cli, Commands};

/// Install the fmt subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let config = InteractionConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Inspect { file, json } => commands::inspect(&file, json),
        Commands::Author {
            shape,
            output,
            hand,
            mirror,
        } => commands::author(shape, hand.into(), mirror, &output),
        Commands::Resolve { paths, base_url } => {
            commands::resolve(&config, &paths, base_url.as_deref());
            Ok(())
        }
        Commands::Fetch { names } => commands::fetch(&config, &names).await,
        Commands::Match {
            shape,
            hand,
            frames,
            tick_ms,
            min_margin,
        } => {
            commands::match_shape(
                &config,
                shape,
                hand.into(),
                frames,
                Duration::from_millis(tick_ms),
                min_margin,
            )
            .await
        }
        Commands::ReplayGrab { script, steps, tick_ms } => {
            commands::replay_grab(&config, script, steps, Duration::from_millis(tick_ms)).await
        }
        Commands::Profile { candidates } => commands::profile(&config, &candidates),
    }
}
