use crate::flds::field::{FieldDim, PhysicalField, SpectralField};
use crate::{Domain, Float};
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Real <-> spectral transforms on a 2D or 3D periodic grid.
///
/// Forward: real-to-complex along axis 0, then complex-to-complex along
/// axes 1, 2, ... Inverse undoes the same axes in reverse order, finishing
/// with complex-to-real along axis 0. The forward transform is unnormalised
/// and the inverse carries the full 1/N, so `to_physical(to_spectral(x))`
/// gives back `x`.
///
/// Plans are immutable and scratch space is allocated per call, so one
/// `FftNd` can be shared between threads.
pub struct FftNd {
    physical_dim: FieldDim,
    spectral_dim: FieldDim,
    fwd: Vec<Arc<dyn Fft<Float>>>,
    inv: Vec<Arc<dyn Fft<Float>>>,
}

impl FftNd {
    pub fn new(domain: &Domain) -> FftNd {
        let mut planner = FftPlanner::new();
        let physical_dim = domain.physical_dim();
        let spectral_dim = domain.spectral_dim();
        let fwd = physical_dim
            .shape()
            .iter()
            .map(|&n| planner.plan_fft_forward(n))
            .collect();
        let inv = physical_dim
            .shape()
            .iter()
            .map(|&n| planner.plan_fft_inverse(n))
            .collect();

        FftNd {
            physical_dim,
            spectral_dim,
            fwd,
            inv,
        }
    }

    pub fn physical_dim(&self) -> &FieldDim {
        &self.physical_dim
    }

    pub fn spectral_dim(&self) -> &FieldDim {
        &self.spectral_dim
    }

    pub fn to_spectral(&self, fld: &PhysicalField) -> SpectralField {
        assert_eq!(fld.dim(), &self.physical_dim);

        let mut data = self.rfft_axis0(&fld.data);
        for axis in 1..self.spectral_dim.ndim() {
            FftNd::cfft_axis(&self.spectral_dim, &mut data, axis, &self.fwd[axis], 1.0);
        }
        SpectralField::from_vec(self.spectral_dim.clone(), data)
    }

    pub fn to_physical(&self, fld: &SpectralField) -> PhysicalField {
        assert_eq!(fld.dim(), &self.spectral_dim);

        let mut data = fld.data.clone();
        for axis in (1..self.spectral_dim.ndim()).rev() {
            let norm = (self.physical_dim.shape()[axis] as Float).powi(-1);
            FftNd::cfft_axis(&self.spectral_dim, &mut data, axis, &self.inv[axis], norm);
        }
        PhysicalField::from_vec(self.physical_dim.clone(), self.irfft_axis0(&data))
    }

    fn rfft_axis0(&self, real: &[Float]) -> Vec<Complex<Float>> {
        let n = self.physical_dim.shape()[0];
        let n_half = self.spectral_dim.shape()[0];
        // axis 0 is the slowest one, every other axis has the same extent in
        // both layouts so the stride is shared.
        let stride = self.physical_dim.stride(0);
        let fft = &self.fwd[0];
        let mut buf = vec![Complex::zero(); n];
        let mut scratch = vec![Complex::zero(); fft.get_inplace_scratch_len()];
        let mut out = vec![Complex::zero(); n_half * stride];

        for inner in 0..stride {
            for (j, b) in buf.iter_mut().enumerate() {
                *b = Complex::new(real[j * stride + inner], 0.0);
            }
            fft.process_with_scratch(&mut buf, &mut scratch);
            // the negative frequencies are the complex conjugates of these,
            // drop them
            for (j, b) in buf.iter().take(n_half).enumerate() {
                out[j * stride + inner] = *b;
            }
        }
        out
    }

    fn irfft_axis0(&self, spectral: &[Complex<Float>]) -> Vec<Float> {
        let n = self.physical_dim.shape()[0];
        let n_half = self.spectral_dim.shape()[0];
        let stride = self.spectral_dim.stride(0);
        let ifft = &self.inv[0];
        let norm = (n as Float).powi(-1);
        let mut buf = vec![Complex::zero(); n];
        let mut scratch = vec![Complex::zero(); ifft.get_inplace_scratch_len()];
        let mut out = vec![0.0; n * stride];

        for inner in 0..stride {
            for (j, b) in buf.iter_mut().take(n_half).enumerate() {
                *b = spectral[j * stride + inner];
            }
            // The mean and (even n) Nyquist coefficients of a real signal are
            // real. Whatever imaginary part got there upstream is dropped.
            buf[0].im = 0.0;
            if n % 2 == 0 {
                buf[n / 2].im = 0.0;
            }
            // rebuild the negative frequencies by conjugate symmetry
            for j in 1..(n - n / 2) {
                buf[n - j] = buf[j].conj();
            }
            ifft.process_with_scratch(&mut buf, &mut scratch);
            for (j, b) in buf.iter().enumerate() {
                out[j * stride + inner] = b.re * norm;
            }
        }
        out
    }

    fn cfft_axis(
        dim: &FieldDim,
        data: &mut [Complex<Float>],
        axis: usize,
        fft: &Arc<dyn Fft<Float>>,
        norm: Float,
    ) {
        assert_eq!(data.len(), dim.len());
        let n = dim.shape()[axis];
        let stride = dim.stride(axis);
        let mut scratch = vec![Complex::zero(); fft.get_inplace_scratch_len()];

        if stride == 1 {
            // lanes are contiguous, transform them where they are
            fft.process_with_scratch(data, &mut scratch);
        } else {
            let mut buf = vec![Complex::zero(); n];
            for start in dim.lane_starts(axis) {
                for (j, b) in buf.iter_mut().enumerate() {
                    *b = data[start + j * stride];
                }
                fft.process_with_scratch(&mut buf, &mut scratch);
                for (j, b) in buf.iter().enumerate() {
                    data[start + j * stride] = *b;
                }
            }
        }

        if norm != 1.0 {
            for v in data.iter_mut() {
                *v *= norm;
            }
        }
    }
}
