use crate::flds::field::{PhysicalField, SpectralField};
use crate::flds::SpectralOps;
use crate::Float;
use itertools::izip;
use rustfft::num_complex::Complex;

impl SpectralOps {
    /// Velocity of a 2D stream function, `u_x = i k_y Psi / |k|^2` and
    /// `u_y = -i k_x Psi / |k|^2` in spectral space.
    ///
    /// The mean of `psi` carries no velocity. Coefficients without a
    /// conjugate partner (see `wave_num::is_paired`) are dropped as well,
    /// which keeps `k_x U_x + k_y U_y` exactly zero after the real inverse
    /// transform.
    pub fn streamfunction_to_velocity(&self, psi: &PhysicalField) -> Vec<PhysicalField> {
        assert_eq!(self.ndim(), 2, "stream functions only exist in 2D");
        let psi_hat = self.fft.to_spectral(psi);
        let dim = psi_hat.dim().clone();
        let mut ux_hat = SpectralField::zeros(dim.clone());
        let mut uy_hat = SpectralField::zeros(dim);
        let k_x = self.wave_nums.k_x();
        let k_y = self.wave_nums.k_y();

        for (ind, (ux, uy, p, &kx, &ky)) in izip!(
            ux_hat.data.iter_mut(),
            uy_hat.data.iter_mut(),
            psi_hat.data.iter(),
            k_x,
            k_y
        )
        .enumerate()
        {
            // |k|^2 vanishes only at the origin
            if ind == 0 || !self.wave_nums.is_paired(ind) {
                continue;
            }
            let k2_inv = 1.0 / self.wave_nums.k_squared(ind);
            *ux = Complex::new(0.0, ky) * p * k2_inv;
            *uy = Complex::new(0.0, -kx) * p * k2_inv;
        }

        vec![self.fft.to_physical(&ux_hat), self.fft.to_physical(&uy_hat)]
    }

    /// `sum_d k_d * u_hat_d`, one entry per spectral coefficient.
    pub fn spectral_divergence(&self, components: &[PhysicalField]) -> SpectralField {
        assert_eq!(components.len(), self.ndim());
        let mut div = SpectralField::zeros(self.fft.spectral_dim().clone());
        for (coord, u) in components.iter().enumerate() {
            let u_hat = self.fft.to_spectral(u);
            for (d, v, &k) in izip!(
                div.data.iter_mut(),
                u_hat.data.iter(),
                self.wave_nums.along(coord)
            ) {
                *d += *v * k;
            }
        }
        div
    }

    pub fn max_divergence(&self, components: &[PhysicalField]) -> Float {
        self.spectral_divergence(components).max_norm()
    }

    /// Magnitude the spectral divergence of `components` is measured
    /// against. The forward transform is unscaled, so a field of size `u`
    /// maps to coefficients of order `N u`.
    pub fn divergence_scale(&self, components: &[PhysicalField]) -> Float {
        let u_max = components
            .iter()
            .map(|u| u.max_abs())
            .fold(0.0, Float::max);
        self.fft.physical_dim().len() as Float * u_max
    }

    /// `omega = d u_y / dx - d u_x / dy`, optionally restricted to the
    /// modes that survive the 2/3 rule.
    pub fn vorticity_2d(
        &self,
        ux: &PhysicalField,
        uy: &PhysicalField,
        dealias: bool,
    ) -> PhysicalField {
        assert_eq!(self.ndim(), 2, "scalar vorticity only exists in 2D");
        let ux_hat = self.fft.to_spectral(ux);
        let uy_hat = self.fft.to_spectral(uy);
        let data = izip!(
            ux_hat.data.iter(),
            uy_hat.data.iter(),
            self.wave_nums.k_x(),
            self.wave_nums.k_y()
        )
        .map(|(&u, &v, &kx, &ky)| Complex::new(0.0, kx) * v - Complex::new(0.0, ky) * u)
        .collect();
        let mut omega = SpectralField::from_vec(ux_hat.dim().clone(), data);
        if dealias {
            omega = self.mask.apply(&omega);
        }
        self.fft.to_physical(&omega)
    }
}
