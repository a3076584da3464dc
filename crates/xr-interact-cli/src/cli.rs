//! Command line definition

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use xr_interact_core::Handedness;

use crate::scenario::{GrabScript, HandShape};

/// Grab replay and hand pose template tooling
#[derive(Parser, Debug)]
#[command(name = "xr-interact")]
#[command(about = "Grab replay and hand pose template tooling", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a pose template file and list its joints
    Inspect {
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write a pose template captured from a synthetic hand shape
    Author {
        #[arg(value_enum)]
        shape: HandShape,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Hand the shape is captured from
        #[arg(long, value_enum, default_value = "right")]
        hand: HandArg,

        /// Store the capture mirrored into the other hand's space
        #[arg(long)]
        mirror: bool,
    },

    /// Print the URL each template path resolves to
    Resolve {
        #[arg(required = true)]
        paths: Vec<String>,

        /// Override poses.base_url from the config
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Fetch templates through the cache (every library pose when none named)
    Fetch { names: Vec<String> },

    /// Recognise a synthetic hand shape against the pose library
    Match {
        #[arg(value_enum)]
        shape: HandShape,

        #[arg(long, value_enum, default_value = "right")]
        hand: HandArg,

        /// Frames to run
        #[arg(long, default_value_t = 30)]
        frames: u64,

        /// Milliseconds per frame
        #[arg(long, default_value_t = 11)]
        tick_ms: u64,

        /// Minimum confidence margin before a pose counts
        #[arg(long, default_value_t = 0.05)]
        min_margin: f32,
    },

    /// Replay a scripted grab and print the object's transform per frame
    ReplayGrab {
        #[arg(value_enum, default_value = "drag")]
        script: GrabScript,

        /// Frames per drag
        #[arg(long, default_value_t = 10)]
        steps: u32,

        /// Milliseconds per frame
        #[arg(long, default_value_t = 11)]
        tick_ms: u64,
    },

    /// Pick an input profile from candidate names, most specific first
    Profile { candidates: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HandArg {
    Left,
    Right,
}

impl From<HandArg> for Handedness {
    fn from(hand: HandArg) -> Self {
        match hand {
            HandArg::Left => Handedness::Left,
            HandArg::Right => Handedness::Right,
        }
    }
}
