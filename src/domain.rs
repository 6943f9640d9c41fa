use crate::flds::field::FieldDim;
use crate::Float;
use anyhow::{bail, Result};

/// Periodic box the fields live on.
///
/// `sizes` and `lengths` are stored in coordinate order (x, y[, z]), which is
/// also the order the solver reads `glsizes.npy` and `lengths.npy` in. Arrays
/// are laid out row-major with the slowest axis first, so array axis `a`
/// belongs to coordinate `ndim - 1 - a`:
///
/// ```text
///  2D: [ny, nx]       3D: [nz, ny, nx]
/// ```
///
/// Array axis 0 is the one that carries the Hermitian truncation in
/// spectral space.
#[derive(Clone, Debug, PartialEq)]
pub struct Domain {
    sizes: Vec<usize>,
    lengths: Vec<Float>,
}

impl Domain {
    pub fn new(sizes: Vec<usize>, lengths: Vec<Float>) -> Result<Domain> {
        if sizes.len() != lengths.len() {
            bail!(
                "Domain has {} grid sizes but {} lengths",
                sizes.len(),
                lengths.len()
            );
        }
        if sizes.len() != 2 && sizes.len() != 3 {
            bail!(
                "Domain must be two or three dimensional, got {} axes",
                sizes.len()
            );
        }
        for (dim, (&n, &l)) in sizes.iter().zip(lengths.iter()).enumerate() {
            if n == 0 {
                bail!("Number of cells along axis {} must be positive", dim);
            }
            if !(l.is_finite() && l > 0.0) {
                bail!("Domain length along axis {} must be positive, got {}", dim, l);
            }
        }
        Ok(Domain { sizes, lengths })
    }

    pub fn ndim(&self) -> usize {
        self.sizes.len()
    }

    /// Grid sizes in coordinate order.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Domain lengths in coordinate order.
    pub fn lengths(&self) -> &[Float] {
        &self.lengths
    }

    /// Coordinate (0 = x) that array axis `axis` runs along.
    pub fn coord_of(&self, axis: usize) -> usize {
        assert!(axis < self.ndim());
        self.ndim() - 1 - axis
    }

    pub fn axis_size(&self, axis: usize) -> usize {
        self.sizes[self.coord_of(axis)]
    }

    pub fn axis_length(&self, axis: usize) -> Float {
        self.lengths[self.coord_of(axis)]
    }

    pub fn physical_shape(&self) -> Vec<usize> {
        self.sizes.iter().rev().cloned().collect()
    }

    pub fn spectral_shape(&self) -> Vec<usize> {
        let mut shape = self.physical_shape();
        shape[0] = shape[0] / 2 + 1;
        shape
    }

    pub fn physical_dim(&self) -> FieldDim {
        FieldDim::new(self.physical_shape())
    }

    pub fn spectral_dim(&self) -> FieldDim {
        FieldDim::new(self.spectral_shape())
    }

    pub fn num_cells(&self) -> usize {
        self.sizes.iter().product()
    }

    /// Position of grid point `i` along coordinate `coord`. The grid is
    /// periodic so the far end `L` itself is not a grid point.
    #[inline(always)]
    pub fn grid_point(&self, coord: usize, i: usize) -> Float {
        self.lengths[coord] * (i as Float) / (self.sizes[coord] as Float)
    }

    /// Physical position, in coordinate order, of the cell stored at flat
    /// index `flat` of a physical field.
    pub fn position(&self, flat: usize) -> Vec<Float> {
        let mut r = vec![0.0; self.ndim()];
        let mut rem = flat;
        // the fastest varying array axis is x, so peel x off first
        for (coord, v) in r.iter_mut().enumerate() {
            let n = self.sizes[coord];
            *v = self.grid_point(coord, rem % n);
            rem /= n;
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_test_domain, build_test_domain_3d, PI};

    #[test]
    fn shapes_follow_row_major_convention() {
        let domain = build_test_domain();
        assert_eq!(domain.sizes(), &[24, 12]);
        assert_eq!(domain.physical_shape(), vec![12, 24]);
        assert_eq!(domain.spectral_shape(), vec![7, 24]);
        assert_eq!(domain.axis_size(0), 12);
        assert_eq!(domain.axis_size(1), 24);

        let domain = build_test_domain_3d();
        assert_eq!(domain.physical_shape(), vec![5, 6, 8]);
        assert_eq!(domain.spectral_shape(), vec![3, 6, 8]);
        assert_eq!(domain.coord_of(0), 2);
        assert_eq!(domain.coord_of(2), 0);
    }

    #[test]
    fn positions_unravel_x_fastest() {
        let domain = Domain::new(vec![4, 2], vec![2.0, 1.0]).unwrap();
        assert_eq!(domain.position(0), vec![0.0, 0.0]);
        assert_eq!(domain.position(1), vec![0.5, 0.0]);
        assert_eq!(domain.position(3), vec![1.5, 0.0]);
        assert_eq!(domain.position(4), vec![0.0, 0.5]);
        assert_eq!(domain.position(7), vec![1.5, 0.5]);
    }

    #[test]
    fn rejects_bad_domains() {
        assert!(Domain::new(vec![8], vec![1.0]).is_err());
        assert!(Domain::new(vec![8, 8, 8, 8], vec![1.0; 4]).is_err());
        assert!(Domain::new(vec![8, 8], vec![1.0]).is_err());
        assert!(Domain::new(vec![8, 0], vec![1.0, 1.0]).is_err());
        assert!(Domain::new(vec![8, 8], vec![1.0, 0.0]).is_err());
        assert!(Domain::new(vec![8, 8], vec![-2.0 * PI, 1.0]).is_err());
        assert!(Domain::new(vec![8, 8], vec![Float::NAN, 1.0]).is_err());
        assert!(Domain::new(vec![1, 1], vec![1.0, 1.0]).is_ok());
    }
}
