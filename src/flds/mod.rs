use crate::Domain;

pub mod dealias;
pub mod fft_nd;
pub mod field;
pub mod projection;
pub mod random_modes;
pub mod wave_num;

use crate::flds::dealias::DealiasMask;
use crate::flds::fft_nd::FftNd;
use crate::flds::wave_num::WaveNumbers;

/// Everything that only depends on the grid: transform plans, the k basis
/// and the 2/3 mask. Built once per domain and shared read-only.
pub struct SpectralOps {
    pub fft: FftNd,
    pub wave_nums: WaveNumbers,
    pub mask: DealiasMask,
}

impl SpectralOps {
    pub fn new(domain: &Domain) -> SpectralOps {
        let wave_nums = WaveNumbers::new(domain);
        let mask = DealiasMask::from_wave_numbers(domain, &wave_nums);
        SpectralOps {
            fft: FftNd::new(domain),
            wave_nums,
            mask,
        }
    }

    pub fn ndim(&self) -> usize {
        self.fft.physical_dim().ndim()
    }
}
