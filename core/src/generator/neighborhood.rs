use crate::Cell;

/// Cells within a Manhattan radius of a center, walked row by row from `di = -radius` upward.
#[derive(Clone, Debug)]
pub struct Neighborhood {
    center: Cell,
    radius: i64,
    di: i64,
    dj: i64,
    done: bool,
}

impl Neighborhood {
    pub fn new(center: Cell, radius: u32) -> Self {
        let radius = i64::from(radius);
        Self {
            center,
            radius,
            di: -radius,
            dj: 0,
            done: false,
        }
    }

    /// Number of cells the walk yields, `2r² + 2r + 1`.
    pub const fn cell_count(radius: u32) -> u64 {
        let r = radius as u64;
        2 * r * r + 2 * r + 1
    }

    fn row_reach(&self) -> i64 {
        self.radius - self.di.abs()
    }
}

impl Iterator for Neighborhood {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self.center.offset(self.di, self.dj);

        self.dj += 1;
        if self.dj > self.row_reach() {
            self.di += 1;
            if self.di > self.radius {
                self.done = true;
            } else {
                self.dj = -self.row_reach();
            }
        }

        Some(item)
    }
}
