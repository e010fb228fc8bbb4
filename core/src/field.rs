use crate::error::{Result, TerrainError};

// Rectangular grid of heights stored row-major in one buffer.
// Access as `field.get(row, col)`, the same (y, x) order as `map[y][x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl HeightField {
    // Allocate a rows×cols field filled with 0.0.
    // Reports `Allocation` instead of aborting when the buffer cannot be reserved.
    pub fn zeroed(rows: usize, cols: usize) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .ok_or(TerrainError::Allocation { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| TerrainError::Allocation { rows, cols })?;
        data.resize(len, 0.0);
        Ok(Self { rows, cols, data })
    }

    // Build from nested rows; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|r| r.len() == cols),
            "all rows must have the same length"
        );
        let n = rows.len();
        let data = rows.into_iter().flatten().collect();
        Self {
            rows: n,
            cols,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    // (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(
            row < self.rows && col < self.cols,
            "({row}, {col}) outside {}x{} field",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.idx(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let i = self.idx(row, col);
        self.data[i] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    // Flat row-major view, e.g. for building an image buffer
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    // Smallest and largest height, None for an empty field
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}
