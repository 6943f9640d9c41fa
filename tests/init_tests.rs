mod common;

use ndarray::{Array, Ix0, Ix1, IxDyn};
use ndarray_npy::read_npy;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use rustfft::num_complex::Complex;
use spectral_ic::flds::field::{PhysicalField, SpectralField};
use spectral_ic::flds::SpectralOps;
use spectral_ic::init::{check_metrics, initialise, Preset};
use spectral_ic::{run, Float, DIV_TOL};
use std::path::Path;

fn read_spectral(path: &Path, ops: &SpectralOps) -> SpectralField {
    let arr: Array<Complex<f64>, IxDyn> = read_npy(path).unwrap();
    assert_eq!(arr.shape(), ops.fft.spectral_dim().shape());
    let data = arr
        .iter()
        .map(|v| Complex::new(v.re as Float, v.im as Float))
        .collect();
    SpectralField::from_vec(ops.fft.spectral_dim().clone(), data)
}

#[test]
fn every_preset_runs_and_saves() {
    for preset in Preset::ALL.iter() {
        let dir = common::scratch_dir(&format!("preset_{}", preset.id()));
        let cfg = common::small_config(dir.clone());
        run(&cfg, *preset).unwrap();

        let step: Array<u64, Ix0> = read_npy(dir.join("step.npy")).unwrap();
        assert_eq!(step[()], 0);
        let glsizes: Array<u64, Ix1> = read_npy(dir.join("glsizes.npy")).unwrap();
        let expected: Vec<u64> = cfg
            .domain(preset.ndim())
            .unwrap()
            .sizes()
            .iter()
            .map(|&n| n as u64)
            .collect();
        assert_eq!(glsizes.to_vec(), expected);

        let names: &[&str] = if preset.ndim() == 2 {
            &["ux", "uy", "sc"]
        } else {
            &["ux", "uy", "uz", "sc"]
        };
        for name in names {
            assert!(dir.join(format!("{}.npy", name)).exists());
        }
        assert_eq!(dir.join("uz.npy").exists(), preset.ndim() == 3);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

#[test]
fn saved_velocity_is_divergence_free() {
    // recompute the divergence from what the solver would load
    for &preset in &[Preset::VortexPair, Preset::Turbulence2d, Preset::Turbulence3d] {
        let dir = common::scratch_dir(&format!("div_{}", preset.id()));
        let cfg = common::small_config(dir.clone());
        run(&cfg, preset).unwrap();

        let domain = cfg.domain(preset.ndim()).unwrap();
        let ops = SpectralOps::new(&domain);
        let names = ["ux", "uy", "uz"];
        let velocity: Vec<PhysicalField> = names[..preset.ndim()]
            .iter()
            .map(|name| {
                let u_hat = read_spectral(&dir.join(format!("{}.npy", name)), &ops);
                ops.fft.to_physical(&u_hat)
            })
            .collect();
        let div = ops.max_divergence(&velocity);
        assert!(div <= DIV_TOL * ops.divergence_scale(&velocity));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

#[test]
fn saved_fields_transform_back() {
    let dir = common::scratch_dir("roundtrip");
    let cfg = common::small_config(dir.clone());
    run(&cfg, Preset::ShearLayer).unwrap();

    let domain = cfg.domain(2).unwrap();
    let ops = SpectralOps::new(&domain);
    let mut rng = Pcg64Mcg::seed_from_u64(cfg.random.seed);
    let fields = initialise(Preset::ShearLayer, &domain, &ops, &cfg.random, &mut rng).unwrap();

    let sc = ops
        .fft
        .to_physical(&read_spectral(&dir.join("sc.npy"), &ops));
    for (v1, v2) in sc.data.iter().zip(fields.scalar.data.iter()) {
        assert!((v1 - v2).abs() < common::E_TOL);
    }
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn same_seed_same_turbulence() {
    let cfg = common::small_config(common::scratch_dir("unused"));
    let domain = cfg.domain(3).unwrap();
    let ops = SpectralOps::new(&domain);
    let mut a = Pcg64Mcg::seed_from_u64(9);
    let mut b = Pcg64Mcg::seed_from_u64(9);
    let u1 = initialise(Preset::Turbulence3d, &domain, &ops, &cfg.random, &mut a).unwrap();
    let u2 = initialise(Preset::Turbulence3d, &domain, &ops, &cfg.random, &mut b).unwrap();
    assert_eq!(u1.velocity, u2.velocity);

    let peak = u1
        .velocity
        .iter()
        .map(|u| u.max_abs())
        .fold(0.0, Float::max);
    assert!((peak - 1.0).abs() < common::E_TOL);
    check_metrics(&ops, &u1).verify().unwrap();
}

#[test]
fn constant_stream_function_end_to_end() {
    let cfg = common::small_config(common::scratch_dir("unused"));
    let domain = cfg.domain(2).unwrap();
    let ops = SpectralOps::new(&domain);
    let psi = PhysicalField::from_vec(domain.physical_dim(), vec![1.0; domain.num_cells()]);
    for u in ops.streamfunction_to_velocity(&psi) {
        assert!(u.data.iter().all(|v| v.is_finite() && v.abs() < common::E_TOL));
    }
}

#[test]
fn unresolved_mode_range_fails_before_output() {
    let dir = common::scratch_dir("unresolved");
    let mut cfg = common::small_config(dir.clone());
    // 11 is past the Nyquist index of 16 cells
    cfg.domain_2d.sizes = vec![16, 16];
    assert!(run(&cfg, Preset::Turbulence2d).is_err());
    assert!(!dir.exists());
}

#[test]
fn zero_modes_fail_before_output() {
    let dir = common::scratch_dir("zero_modes");
    let mut cfg = common::small_config(dir.clone());
    cfg.random.modes_3d = 0;
    assert!(run(&cfg, Preset::Turbulence3d).is_err());
    assert!(!dir.exists());
}

#[test]
fn skipping_output_writes_nothing() {
    let dir = common::scratch_dir("no_output");
    let mut cfg = common::small_config(dir.clone());
    cfg.output.write_output = false;
    run(&cfg, Preset::TaylorGreen2d).unwrap();
    assert!(!dir.exists());
}
