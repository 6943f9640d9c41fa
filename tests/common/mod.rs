#![allow(dead_code)]
use spectral_ic::{Config, DomainParams, Float, Output, RandomParams, PI};
use std::path::PathBuf;

pub const E_TOL: Float = 1E-8;

pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("spectral_ic_it_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

pub fn small_config(root: PathBuf) -> Config {
    // This sets up a config small enough to run every
    // preset in a test, but keeps the default mode ranges.
    Config {
        domain_2d: DomainParams {
            sizes: vec![32, 32],
            lengths: vec![2.0 * PI, 2.0 * PI],
        },
        domain_3d: DomainParams {
            sizes: vec![16, 16, 16],
            lengths: vec![2.0 * PI, 2.0 * PI, 2.0 * PI],
        },
        random: RandomParams::default(),
        output: Output {
            root: root.to_string_lossy().into_owned(),
            write_output: true,
        },
    }
}
