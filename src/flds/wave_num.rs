use crate::flds::field::FieldDim;
use crate::{Domain, Float, PI};

/// Signed wave number of entry `i` on a full length axis of `n` points.
/// e.g. n == 8 -> 0 +1 +2 +3 -4 -3 -2 -1
///      n == 7 -> 0 +1 +2 -4 -3 -2 -1
#[inline(always)]
pub fn wave_index(n: usize, i: usize) -> i64 {
    if i < n / 2 {
        i as i64
    } else {
        i as i64 - n as i64
    }
}

/// Wave number of entry `i` on the Hermitian-truncated axis. Only the
/// n / 2 + 1 non-negative frequencies are stored there.
#[inline(always)]
pub fn hermitian_index(n: usize, i: usize) -> i64 {
    assert!(i <= n / 2);
    i as i64
}

/// Whether entry `i` of an axis of `n` points has a conjugate partner
/// carrying the opposite wave number. Entries without one (the Nyquist
/// entry of an even axis, the two middle entries of an odd full axis) can't
/// be given an odd derivative that survives a real inverse transform.
pub fn is_paired(n: usize, i: usize, hermitian: bool) -> bool {
    if hermitian {
        2 * i != n
    } else {
        wave_index(n, i) + wave_index(n, (n - i) % n) == 0
    }
}

/// Wave numbers broadcast onto the spectral grid, one array per array axis.
pub struct WaveNumbers {
    dim: FieldDim,
    indices: Vec<Vec<i64>>,
    k: Vec<Vec<Float>>,
    paired: Vec<bool>,
}

impl WaveNumbers {
    pub fn new(domain: &Domain) -> WaveNumbers {
        let dim = domain.spectral_dim();
        let mut indices = Vec::with_capacity(dim.ndim());
        let mut k = Vec::with_capacity(dim.ndim());
        let mut paired = vec![true; dim.len()];

        // Build the k basis of the FFT
        for axis in 0..dim.ndim() {
            let n = domain.axis_size(axis);
            let line: Vec<i64> = (0..dim.shape()[axis])
                .map(|i| {
                    if axis == 0 {
                        hermitian_index(n, i)
                    } else {
                        wave_index(n, i)
                    }
                })
                .collect();
            let idx: Vec<i64> = (0..dim.len())
                .map(|ind| line[dim.axis_index(ind, axis)])
                .collect();
            for (ind, p) in paired.iter_mut().enumerate() {
                *p &= is_paired(n, dim.axis_index(ind, axis), axis == 0);
            }
            let dk = 2.0 * PI / domain.axis_length(axis);
            k.push(idx.iter().map(|&m| dk * m as Float).collect());
            indices.push(idx);
        }

        WaveNumbers {
            dim,
            indices,
            k,
            paired,
        }
    }

    pub fn dim(&self) -> &FieldDim {
        &self.dim
    }

    /// Integer wave numbers along array axis `axis`.
    pub fn axis_indices(&self, axis: usize) -> &[i64] {
        &self.indices[axis]
    }

    /// Angular wave numbers of coordinate `coord` (0 = x).
    pub fn along(&self, coord: usize) -> &[Float] {
        assert!(coord < self.dim.ndim());
        &self.k[self.dim.ndim() - 1 - coord]
    }

    pub fn k_x(&self) -> &[Float] {
        self.along(0)
    }

    pub fn k_y(&self) -> &[Float] {
        self.along(1)
    }

    pub fn k_z(&self) -> &[Float] {
        self.along(2)
    }

    /// False where some axis sits on an entry without a conjugate partner,
    /// see `is_paired`.
    pub fn is_paired(&self, ind: usize) -> bool {
        self.paired[ind]
    }

    #[inline(always)]
    pub fn k_squared(&self, ind: usize) -> Float {
        self.k.iter().map(|k| k[ind] * k[ind]).sum()
    }
}
