use spectral_ic::init::Preset;
use spectral_ic::{run, Config};
use std::env;
use std::process;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("spectral_ic=info")),
        )
        .with(fmt::layer())
        .init();

    // spectral_ic <preset> [config.toml]
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        println!("{}", Preset::usage());
        process::exit(1);
    }
    let preset: Preset = match args[1].parse() {
        Ok(preset) => preset,
        Err(e) => {
            println!("{}", e);
            process::exit(1);
        }
    };

    let cfg = match args.get(2) {
        Some(path) => Config::new(path),
        None => Ok(Config::default()),
    };

    if let Err(e) = cfg.and_then(|cfg| run(&cfg, preset)) {
        eprintln!("Application error: {:?}", e);
        process::exit(1);
    }
}
