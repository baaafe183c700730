use std::path::PathBuf;

use clap::Parser;
use headless::config::load_sim_config;
use headless::init::{self, RunOptions};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "headless/config/default.ron")]
    config: PathBuf,

    #[arg(short, long, default_value_t = 3000)]
    ticks: u64,

    /// Overrides the tick rate from the config file
    #[arg(long)]
    tick_rate: Option<u64>,

    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    #[arg(short, long, default_value_t = 50)]
    log_every: u64,
}

fn main() {
    let args = Args::parse();

    let mut config = match load_sim_config(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load {}: {err}", args.config.display());
            std::process::exit(1);
        }
    };

    if let Some(tick_rate) = args.tick_rate {
        if tick_rate == 0 {
            eprintln!("Error: tick_rate must be at least 1.");
            std::process::exit(1);
        }
        config.tick_rate = tick_rate;
    }

    let options = RunOptions {
        ticks: args.ticks,
        seed: args.seed,
        log_every: args.log_every,
    };

    if let Err(err) = init::run(config, options) {
        eprintln!("Simulation failed: {err}");
        std::process::exit(1);
    }
}
