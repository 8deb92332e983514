/// Subplot grid, cells numbered row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}
impl GridShape {
    /// Near-square grid holding `n` cells: `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`.
    pub fn near_square(n: usize) -> Self {
        if n == 0 {
            return Self { rows: 0, cols: 0 };
        }
        let mut cols = (n as f64).sqrt().ceil() as usize;
        // guard against sqrt rounding on large perfect squares
        while cols * cols < n {
            cols += 1;
        }
        while cols > 1 && (cols - 1) * (cols - 1) >= n {
            cols -= 1;
        }
        Self {
            rows: n.div_ceil(cols),
            cols,
        }
    }
    pub fn single_row(cols: usize) -> Self {
        Self { rows: 1, cols }
    }
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }
    pub fn position(&self, idx: usize) -> (usize, usize) {
        (idx / self.cols.max(1), idx % self.cols.max(1))
    }
    pub fn is_last_row(&self, idx: usize) -> bool {
        self.position(idx).0 + 1 == self.rows
    }
    pub fn is_first_col(&self, idx: usize) -> bool {
        self.position(idx).1 == 0
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn grid_never_wastes_a_row() {
        for n in 1..=500 {
            let grid = GridShape::near_square(n);
            assert!(grid.cells() >= n, "n={n} {grid:?}");
            assert!(grid.cells() - n < grid.cols, "n={n} {grid:?}");
        }
    }
    #[test]
    fn known_shapes() {
        assert_eq!(GridShape::near_square(1), GridShape { rows: 1, cols: 1 });
        assert_eq!(GridShape::near_square(3), GridShape { rows: 2, cols: 2 });
        assert_eq!(GridShape::near_square(5), GridShape { rows: 2, cols: 3 });
        assert_eq!(GridShape::near_square(9), GridShape { rows: 3, cols: 3 });
        assert_eq!(GridShape::near_square(10), GridShape { rows: 3, cols: 4 });
    }
    #[test]
    fn outer_cells() {
        let grid = GridShape::near_square(5);
        assert!(grid.is_first_col(3));
        assert!(!grid.is_first_col(4));
        assert!(grid.is_last_row(4));
        assert!(!grid.is_last_row(2));
    }
    #[test]
    fn empty_grid() {
        assert_eq!(GridShape::near_square(0).cells(), 0);
    }
}
