use crate::flds::field::SpectralField;
use crate::Domain;
use anyhow::{Context, Result};
use ndarray::{arr0, Array, Array1, IxDyn};
use ndarray_npy::write_npy;
use rustfft::num_complex::Complex;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Creates `root`. An existing directory is reused, its files get
/// overwritten.
pub(crate) fn prepare_dir(root: &Path) -> Result<()> {
    match fs::create_dir(root) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!("{} already exists, overwriting its contents", root.display());
            Ok(())
        }
        Err(e) => Err(e)
            .with_context(|| format!("Unable to create output directory {}", root.display())),
    }
}

pub(crate) fn save_spectral(fld: &SpectralField, name: &str, root: &Path) -> Result<()> {
    // The solver always reads double precision, row-major, which is the
    // layout fld.data already has.
    let data: Vec<Complex<f64>> = fld
        .data
        .iter()
        .map(|v| Complex::new(v.re as f64, v.im as f64))
        .collect();
    let arr = Array::from_shape_vec(IxDyn(fld.dim().shape()), data)
        .with_context(|| format!("{} does not match its own shape", name))?;
    write_npy(root.join(format!("{}.npy", name)), &arr)
        .with_context(|| format!("Could not save {} data to file", name))?;
    debug!("saved {} with shape {:?}", name, fld.dim().shape());
    Ok(())
}

/// Writes a step-0 snapshot into `root`: the step counter, the time, the
/// grid sizes and box lengths (coordinate order), and every named spectral
/// field.
pub fn save_snapshot(root: &Path, domain: &Domain, fields: &[(&str, SpectralField)]) -> Result<()> {
    prepare_dir(root)?;

    write_npy(root.join("step.npy"), &arr0(0u64)).context("Could not save step")?;
    write_npy(root.join("time.npy"), &arr0(0f64)).context("Could not save time")?;

    let glsizes: Array1<u64> = domain.sizes().iter().map(|&n| n as u64).collect();
    write_npy(root.join("glsizes.npy"), &glsizes).context("Could not save glsizes")?;
    let lengths: Array1<f64> = domain.lengths().iter().map(|&l| l as f64).collect();
    write_npy(root.join("lengths.npy"), &lengths).context("Could not save lengths")?;

    for (name, fld) in fields {
        save_spectral(fld, name, root)?;
    }
    info!("saved {} fields to {}", fields.len(), root.display());
    Ok(())
}
