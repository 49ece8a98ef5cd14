use serde::{Deserialize, Serialize};

/// Zero-based board coordinates, `x` grows to the right and `y` downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Iterator over the in-bounds positions surrounding a center cell.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Pos,
    width: usize,
    height: usize,
    index: usize,
}

impl Neighbors {
    pub fn new(center: Pos, width: usize, height: usize) -> Self {
        Self {
            center,
            width,
            height,
            index: 0,
        }
    }
}

impl Iterator for Neighbors {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(dx, dy)) = DISPLACEMENTS.get(self.index) {
            self.index += 1;

            let Some(x) = self.center.x.checked_add_signed(dx) else {
                continue;
            };
            let Some(y) = self.center.y.checked_add_signed(dy) else {
                continue;
            };
            if x < self.width && y < self.height {
                return Some(Pos { x, y });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = Neighbors::new(Pos::new(0, 0), 3, 3).collect();
        assert_eq!(
            neighbors,
            vec![Pos::new(1, 0), Pos::new(0, 1), Pos::new(1, 1)]
        );
    }

    #[test]
    fn interior_has_eight_neighbors() {
        assert_eq!(Neighbors::new(Pos::new(1, 1), 3, 3).count(), 8);
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert_eq!(Neighbors::new(Pos::new(0, 0), 1, 1).count(), 0);
    }
}
