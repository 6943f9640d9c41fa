use crate::{Domain, Float};
use rustfft::num_complex::Complex;
use num_traits::Zero;

/// Shape of a dense row-major array, slowest axis first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDim {
    shape: Vec<usize>,
}

impl FieldDim {
    pub fn new(shape: Vec<usize>) -> FieldDim {
        FieldDim { shape }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Distance in the flat vec between neighbours along `axis`.
    pub fn stride(&self, axis: usize) -> usize {
        self.shape[axis + 1..].iter().product()
    }

    pub fn get_index(&self, pos: &[usize]) -> usize {
        // Convenience method to get a position in the array.
        // Using a 1d vec to represent an nd array, last axis
        // fastest. Here is the layout of a 2d array with the
        // 1D vec position in []
        // ----------------------------------
        // |   [0]    |   [1]    |   [2]    |
        // |  pos 0,0 |  pos 0,1 |  pos 0,2 |
        // ----------------------------------
        // |   [3]    |   [4]    |   [5]    |
        // |  pos 1,0 |  pos 1,1 |  pos 1,2 |
        // ----------------------------------
        assert_eq!(pos.len(), self.ndim());
        pos.iter()
            .zip(self.shape.iter())
            .fold(0, |index, (&p, &n)| {
                assert!(p < n);
                index * n + p
            })
    }

    /// Inverse of `get_index`.
    pub fn get_pos(&self, mut index: usize) -> Vec<usize> {
        assert!(index < self.len());
        let mut pos = vec![0; self.ndim()];
        for (p, &n) in pos.iter_mut().zip(self.shape.iter()).rev() {
            *p = index % n;
            index /= n;
        }
        pos
    }

    /// Flat offsets of the first element of every 1D lane running along
    /// `axis`. Element `j` of a lane starting at `s` sits at
    /// `s + j * self.stride(axis)`.
    pub fn lane_starts(&self, axis: usize) -> Vec<usize> {
        let stride = self.stride(axis);
        let outer: usize = self.shape[..axis].iter().product();
        let block = self.shape[axis] * stride;
        let mut starts = Vec::with_capacity(outer * stride);
        for o in 0..outer {
            for inner in 0..stride {
                starts.push(o * block + inner);
            }
        }
        starts
    }

    /// Index of the entry at flat `index` along `axis`.
    #[inline(always)]
    pub fn axis_index(&self, index: usize, axis: usize) -> usize {
        (index / self.stride(axis)) % self.shape[axis]
    }
}

/// Real valued field on the physical grid.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicalField {
    dim: FieldDim,
    pub data: Vec<Float>,
}

/// Fourier coefficients of a real field. Only the non-negative frequencies
/// of axis 0 are stored.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralField {
    dim: FieldDim,
    pub data: Vec<Complex<Float>>,
}

impl PhysicalField {
    pub fn zeros(dim: FieldDim) -> PhysicalField {
        PhysicalField {
            data: vec![0.0; dim.len()],
            dim,
        }
    }

    pub fn from_vec(dim: FieldDim, data: Vec<Float>) -> PhysicalField {
        assert_eq!(data.len(), dim.len());
        PhysicalField { dim, data }
    }

    /// Samples `f` at every grid point of `domain`. `f` gets the position in
    /// coordinate order, i.e. `[x, y]` or `[x, y, z]`.
    pub fn from_fn<F>(domain: &Domain, f: F) -> PhysicalField
    where
        F: Fn(&[Float]) -> Float,
    {
        let dim = domain.physical_dim();
        let data = (0..dim.len()).map(|i| f(&domain.position(i))).collect();
        PhysicalField { dim, data }
    }

    pub fn dim(&self) -> &FieldDim {
        &self.dim
    }

    pub fn max(&self) -> Float {
        self.data.iter().cloned().fold(Float::NEG_INFINITY, Float::max)
    }

    pub fn min(&self) -> Float {
        self.data.iter().cloned().fold(Float::INFINITY, Float::min)
    }

    pub fn sum(&self) -> Float {
        self.data.iter().sum()
    }

    pub fn mean(&self) -> Float {
        self.sum() / (self.data.len() as Float)
    }

    pub fn max_abs(&self) -> Float {
        self.data.iter().fold(0.0, |m: Float, v| m.max(v.abs()))
    }

    pub fn scale(&mut self, factor: Float) {
        for v in self.data.iter_mut() {
            *v *= factor;
        }
    }
}

impl SpectralField {
    pub fn zeros(dim: FieldDim) -> SpectralField {
        SpectralField {
            data: vec![Complex::zero(); dim.len()],
            dim,
        }
    }

    pub fn from_vec(dim: FieldDim, data: Vec<Complex<Float>>) -> SpectralField {
        assert_eq!(data.len(), dim.len());
        SpectralField { dim, data }
    }

    pub fn dim(&self) -> &FieldDim {
        &self.dim
    }

    pub fn max_norm(&self) -> Float {
        self.data.iter().fold(0.0, |m: Float, v| m.max(v.norm()))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::{build_test_domain, build_test_domain_3d};

    #[test]
    fn field_init() {
        // checks that fields are intialized to the correct
        // size and to zero
        let domain = build_test_domain();
        let fld = PhysicalField::zeros(domain.physical_dim());
        assert_eq!(fld.data.len(), 24 * 12);
        assert!(fld.data.iter().all(|&v| v == 0.0));
        let fld = SpectralField::zeros(domain.spectral_dim());
        assert_eq!(fld.data.len(), 24 * 7);
        assert!(fld.data.iter().all(|v| v.is_zero()));
    }

    #[test]
    fn row_major_order() {
        let dim = FieldDim::new(vec![3, 4, 5]);
        let mut index = 0;
        for i in 0..3 {
            for j in 0..4 {
                for k in 0..5 {
                    assert_eq!(dim.get_index(&[i, j, k]), index);
                    assert_eq!(dim.get_pos(index), vec![i, j, k]);
                    assert_eq!(dim.axis_index(index, 0), i);
                    assert_eq!(dim.axis_index(index, 1), j);
                    assert_eq!(dim.axis_index(index, 2), k);
                    index += 1;
                }
            }
        }
        assert_eq!(dim.stride(0), 20);
        assert_eq!(dim.stride(1), 5);
        assert_eq!(dim.stride(2), 1);
    }

    #[test]
    fn lanes_cover_every_element_once() {
        let dim = FieldDim::new(vec![3, 4, 5]);
        for axis in 0..3 {
            let stride = dim.stride(axis);
            let mut seen = vec![0; dim.len()];
            let starts = dim.lane_starts(axis);
            assert_eq!(starts.len() * dim.shape()[axis], dim.len());
            for s in starts {
                for j in 0..dim.shape()[axis] {
                    seen[s + j * stride] += 1;
                }
            }
            assert!(seen.iter().all(|&c| c == 1));
        }
    }

    #[test]
    fn from_fn_samples_coordinates() {
        let domain = build_test_domain_3d();
        let fld = PhysicalField::from_fn(&domain, |r| r[0] + 10.0 * r[1] + 100.0 * r[2]);
        let dim = fld.dim().clone();
        let pos = [2, 3, 4];
        let expected = domain.grid_point(0, 4)
            + 10.0 * domain.grid_point(1, 3)
            + 100.0 * domain.grid_point(2, 2);
        assert_eq!(fld.data[dim.get_index(&pos)], expected);
    }

    #[test]
    fn reductions() {
        let fld = PhysicalField::from_vec(FieldDim::new(vec![2, 2]), vec![1.0, -3.0, 2.0, 4.0]);
        assert_eq!(fld.max(), 4.0);
        assert_eq!(fld.min(), -3.0);
        assert_eq!(fld.sum(), 4.0);
        assert_eq!(fld.mean(), 1.0);
        assert_eq!(fld.max_abs(), 4.0);
    }

    #[test]
    #[should_panic]
    fn from_vec_rejects_wrong_length() {
        PhysicalField::from_vec(FieldDim::new(vec![2, 2]), vec![0.0; 5]);
    }
}
