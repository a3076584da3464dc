//! xr-interact: grab replay and hand pose template tooling
//!
//! Usage:
//!   xr-interact author fist -o poses/fist.bin     # capture a synthetic pose
//!   xr-interact inspect poses/fist.bin            # list a template's joints
//!   xr-interact fetch                             # load the configured library
//!   xr-interact match point --hand left           # recognise a synthetic hand
//!   xr-interact replay-grab stretch --steps 20    # scripted two-handed scale

use clap::Parser;
use xr_interact_cli::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli).await
}
