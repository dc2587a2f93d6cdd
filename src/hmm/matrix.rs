use std::ops::{Index, IndexMut};

use serde::Serialize;

/// Dense row-major matrix. Element `(i, j)` lives at `cols * i + j`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> Matrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }
}

impl<T> Matrix<T> {
    /// Builds a matrix from its rows. Returns `None` when the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<T>>, cols: usize) -> Option<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * cols);
        for row in rows {
            if row.len() != cols {
                return None;
            }
            data.extend(row);
        }
        Some(Self {
            rows: n,
            cols,
            data,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[self.cols * i..self.cols * (i + 1)]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.data[self.cols * i..self.cols * (i + 1)]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks() panics on a zero width
        (0..self.rows).map(move |i| self.row(i))
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[self.cols * i + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.data[self.cols * i + j]
    }
}
