use crate::flds::field::{FieldDim, SpectralField};
use crate::flds::wave_num::WaveNumbers;
use crate::Domain;
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

/// Whether wave number index `k` survives 2/3-rule truncation on an axis of
/// `n` points, i.e. |k| < n / 3 with real division.
#[inline(always)]
pub fn passes(n: usize, k: i64) -> bool {
    3 * k.unsigned_abs() < n as u64
}

/// 2/3-rule mask on the spectral grid. An entry is kept only if its index
/// passes on every axis.
pub struct DealiasMask {
    dim: FieldDim,
    keep: Vec<bool>,
}

impl DealiasMask {
    pub fn new(domain: &Domain) -> DealiasMask {
        DealiasMask::from_wave_numbers(domain, &WaveNumbers::new(domain))
    }

    pub fn from_wave_numbers(domain: &Domain, wave_nums: &WaveNumbers) -> DealiasMask {
        let dim = wave_nums.dim().clone();
        let ndim = dim.ndim();
        let keep = (0..dim.len())
            .map(|ind| {
                (0..ndim).all(|axis| {
                    passes(domain.axis_size(axis), wave_nums.axis_indices(axis)[ind])
                })
            })
            .collect();
        DealiasMask { dim, keep }
    }

    pub fn dim(&self) -> &FieldDim {
        &self.dim
    }

    pub fn is_kept(&self, ind: usize) -> bool {
        self.keep[ind]
    }

    pub fn n_kept(&self) -> usize {
        self.keep.iter().filter(|&&k| k).count()
    }

    /// Copy of `fld` with every masked coefficient set to zero.
    pub fn apply(&self, fld: &SpectralField) -> SpectralField {
        assert_eq!(fld.dim(), &self.dim);
        let data = fld
            .data
            .iter()
            .zip(self.keep.iter())
            .map(|(&v, &k)| if k { v } else { Complex::zero() })
            .collect();
        SpectralField::from_vec(self.dim.clone(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_test_domain, Float};

    #[test]
    fn boundary_uses_real_division() {
        // n = 9: 3 * 3 == 9 is not < 9
        assert!(passes(9, 0));
        assert!(passes(9, 2));
        assert!(passes(9, -2));
        assert!(!passes(9, 3));
        assert!(!passes(9, -3));
        // n = 8: 8 / 3 = 2.67
        assert!(passes(8, 2));
        assert!(!passes(8, 3));
        assert!(!passes(8, -4));
    }

    #[test]
    fn mask_is_product_over_axes() {
        let domain = Domain::new(vec![9, 9], vec![1.0, 1.0]).unwrap();
        let mask = DealiasMask::new(&domain);
        // y: 0, 1, 2 of the 5 stored; x: 0, 1, 2, -2, -1 of 9
        assert_eq!(mask.n_kept(), 3 * 5);
        let dim = mask.dim().clone();
        assert!(mask.is_kept(dim.get_index(&[2, 7])));
        assert!(!mask.is_kept(dim.get_index(&[3, 0])));
        assert!(!mask.is_kept(dim.get_index(&[0, 3])));
        assert!(!mask.is_kept(dim.get_index(&[0, 6])));
    }

    #[test]
    fn apply_zeroes_high_modes_only() {
        let domain = build_test_domain();
        let mask = DealiasMask::new(&domain);
        let dim = domain.spectral_dim();
        let data = (0..dim.len())
            .map(|i| Complex::new(i as Float + 1.0, -1.0))
            .collect();
        let fld = SpectralField::from_vec(dim.clone(), data);
        let out = mask.apply(&fld);
        for (ind, (a, b)) in out.data.iter().zip(fld.data.iter()).enumerate() {
            if mask.is_kept(ind) {
                assert_eq!(a, b);
            } else {
                assert!(a.is_zero());
            }
        }
        // input is untouched
        assert!(fld.data.iter().all(|v| !v.is_zero()));
    }
}
