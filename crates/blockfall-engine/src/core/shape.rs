use std::fmt;

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use crate::GridError;

/// One rotation state of a falling shape as a rectangular binary matrix.
///
/// Shapes are immutable values: [`Shape::rotated_clockwise`] returns a new shape whose
/// width and height are swapped. Each row is stored as a bitmask (bit `x` = column `x`).
///
/// # Example
///
/// ```
/// use blockfall_engine::Shape;
///
/// let l = Shape::from_ascii(
///     r"
///     ..#
///     ####
///     ",
/// );
/// let rotated = l.rotated_clockwise();
/// assert_eq!((rotated.width(), rotated.height()), (2, 3));
/// assert_eq!(rotated.to_string(), "#.\n#.\n##");
/// assert_eq!(rotated.rotated(3), l);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: usize,
    height: usize,
    rows: [u8; Shape::MAX_EXTENT],
}

impl Shape {
    /// Largest width or height of a shape.
    pub const MAX_EXTENT: usize = 8;

    const fn from_cells(cells: &[&[bool]]) -> Self {
        let height = cells.len();
        let width = cells[0].len();
        assert!(height <= Self::MAX_EXTENT && width <= Self::MAX_EXTENT);
        let mut rows = [0; Self::MAX_EXTENT];
        let mut y = 0;
        while y < height {
            assert!(cells[y].len() == width);
            let mut x = 0;
            while x < width {
                if cells[y][x] {
                    rows[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        Self {
            width,
            height,
            rows,
        }
    }

    /// Builds a shape from a row-major cell matrix, top row first.
    ///
    /// Any non-zero cell is occupied. The matrix must be rectangular, at most
    /// [`Shape::MAX_EXTENT`] cells in each direction, and contain at least one occupied cell.
    pub fn from_matrix<R>(cells: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[u8]>,
    {
        let height = cells.len();
        let width = cells.first().map_or(0, |row| row.as_ref().len());
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        if width > Self::MAX_EXTENT || height > Self::MAX_EXTENT {
            return Err(GridError::TooLarge {
                width,
                height,
                max_width: Self::MAX_EXTENT,
                max_height: Self::MAX_EXTENT,
            });
        }
        let mut rows = [0; Self::MAX_EXTENT];
        for (y, row) in cells.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (x, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    rows[y] |= 1 << x;
                }
            }
        }
        if rows.iter().all(|row| *row == 0) {
            return Err(GridError::NoOccupiedCell);
        }
        Ok(Self {
            width,
            height,
            rows,
        })
    }

    /// Creates a shape from ASCII art (`#` occupied, `.` empty) for testing.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let cells: Vec<Vec<u8>> = art
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.chars()
                    .filter(|c| *c == '#' || *c == '.')
                    .map(|c| u8::from(c == '#'))
                    .collect()
            })
            .collect();
        Self::from_matrix(&cells).unwrap_or_else(|e| panic!("invalid shape art: {e}"))
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && (self.rows[y] & (1 << x)) != 0
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }

    /// Returns the row bitmasks, top to bottom.
    pub fn row_masks(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows[..self.height].iter().copied()
    }

    /// Returns this shape rotated 90° clockwise.
    ///
    /// Cell `(x, y)` of the result is cell `(y, height - 1 - x)` of the source, i.e. the
    /// rows are reversed and the matrix transposed. Four rotations give back the source.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let mut rows = [0; Self::MAX_EXTENT];
        for (y, row) in rows[..self.width].iter_mut().enumerate() {
            for x in 0..self.height {
                if self.is_occupied(y, self.height - 1 - x) {
                    *row |= 1 << x;
                }
            }
        }
        Self {
            width: self.height,
            height: self.width,
            rows,
        }
    }

    /// Returns this shape rotated clockwise `count` times.
    #[must_use]
    pub fn rotated(&self, count: usize) -> Self {
        (0..count % 4).fold(*self, |shape, _| shape.rotated_clockwise())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                f.write_str(if self.is_occupied(x, y) { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

/// Kind of shape in the standard catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// I-shape (bar).
    I = 0,
    /// O-shape (square).
    O = 1,
    /// T-shape.
    T = 2,
    /// J-shape.
    J = 3,
    /// L-shape.
    L = 4,
    /// S-shape.
    S = 5,
    /// Z-shape.
    Z = 6,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shape kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::S,
        ShapeKind::Z,
    ];

    /// Returns the spawn orientation of this kind.
    #[must_use]
    pub const fn shape(self) -> Shape {
        SHAPE_TEMPLATES[self as usize]
    }

    /// Returns the spawn orientations of every kind, in [`ShapeKind::ALL`] order.
    #[must_use]
    pub fn catalog() -> [Shape; Self::LEN] {
        SHAPE_TEMPLATES
    }

    /// Returns the single character representation of this shape kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::I.as_char(), 'I');
    /// assert_eq!(ShapeKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::T => 'T',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
        }
    }

    /// Parses a shape kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_char('O'), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(ShapeKind::I),
            'O' => Some(ShapeKind::O),
            'T' => Some(ShapeKind::T),
            'J' => Some(ShapeKind::J),
            'L' => Some(ShapeKind::L),
            'S' => Some(ShapeKind::S),
            'Z' => Some(ShapeKind::Z),
            _ => None,
        }
    }
}

const SHAPE_TEMPLATES: [Shape; ShapeKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    [
        // I
        Shape::from_cells(&[&[C, C, C, C]]),
        // O
        Shape::from_cells(&[&[C, C], &[C, C]]),
        // T
        Shape::from_cells(&[&[E, C, E], &[C, C, C]]),
        // J
        Shape::from_cells(&[&[C, E, E], &[C, C, C]]),
        // L
        Shape::from_cells(&[&[E, E, C], &[C, C, C]]),
        // S
        Shape::from_cells(&[&[C, C, E], &[E, C, C]]),
        // Z
        Shape::from_cells(&[&[E, C, C], &[C, C, E]]),
    ]
};

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn random_shape(rng: &mut Pcg32) -> Shape {
        loop {
            let width = rng.random_range(1..=Shape::MAX_EXTENT);
            let height = rng.random_range(1..=Shape::MAX_EXTENT);
            let cells: Vec<Vec<u8>> = (0..height)
                .map(|_| (0..width).map(|_| u8::from(rng.random_bool(0.4))).collect())
                .collect();
            if let Ok(shape) = Shape::from_matrix(&cells) {
                return shape;
            }
        }
    }

    #[test]
    fn test_catalog_shapes_have_four_cells() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.shape().occupied_count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_catalog_matches_spawn_art() {
        assert_eq!(ShapeKind::I.shape(), Shape::from_ascii("####"));
        assert_eq!(ShapeKind::T.shape(), Shape::from_ascii(".#.\n###"));
        assert_eq!(ShapeKind::S.shape(), Shape::from_ascii("##.\n.##"));
        assert_eq!(ShapeKind::Z.shape(), Shape::from_ascii(".##\n##."));
    }

    #[test]
    fn test_rotate_bar() {
        let bar = ShapeKind::I.shape();
        let vertical = bar.rotated_clockwise();
        assert_eq!((vertical.width(), vertical.height()), (1, 4));
        assert_eq!(vertical.occupied_count(), 4);
        assert_eq!(vertical.rotated_clockwise(), bar);
    }

    #[test]
    fn test_rotate_t_clockwise() {
        let t = ShapeKind::T.shape();
        assert_eq!(t.rotated(1).to_string(), "#.\n##\n#.");
        assert_eq!(t.rotated(2).to_string(), "###\n.#.");
        assert_eq!(t.rotated(3).to_string(), ".#\n##\n.#");
    }

    #[test]
    fn test_rotate_does_not_mutate_source() {
        let j = ShapeKind::J.shape();
        let copy = j;
        let _ = j.rotated_clockwise();
        assert_eq!(j, copy);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in ShapeKind::ALL {
            let shape = kind.shape();
            assert_eq!(shape.rotated(4), shape, "{kind:?}");
            assert_eq!(
                shape
                    .rotated_clockwise()
                    .rotated_clockwise()
                    .rotated_clockwise()
                    .rotated_clockwise(),
                shape
            );
        }

        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let shape = random_shape(&mut rng);
            let once = shape.rotated_clockwise();
            assert_eq!(once.occupied_count(), shape.occupied_count());
            assert_eq!(
                once.rotated_clockwise()
                    .rotated_clockwise()
                    .rotated_clockwise(),
                shape,
                "\n{shape}"
            );
        }
    }

    #[test]
    fn test_from_matrix_errors() {
        assert_eq!(Shape::from_matrix::<Vec<u8>>(&[]), Err(GridError::Empty));
        assert_eq!(
            Shape::from_matrix(&[vec![0_u8, 0], vec![0, 0]]),
            Err(GridError::NoOccupiedCell)
        );
        assert!(matches!(
            Shape::from_matrix(&[vec![1_u8; Shape::MAX_EXTENT + 1]]),
            Err(GridError::TooLarge { .. })
        ));
        assert!(matches!(
            Shape::from_matrix(&[vec![1_u8, 1], vec![1]]),
            Err(GridError::Ragged { row: 1, .. })
        ));
    }

    #[test]
    fn test_shape_kind_char_conversion() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(ShapeKind::from_char('x'), None);
    }

    #[test]
    fn test_random_kind_covers_catalog() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seen = [false; ShapeKind::LEN];
        for _ in 0..500 {
            let kind: ShapeKind = rng.random();
            seen[kind as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
