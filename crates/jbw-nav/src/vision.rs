use jbw_core::Position;

use crate::NavError;

/// Read-only view over an egocentric observation buffer.
///
/// The buffer covers the square `[-r, r] × [-r, r]` around the agent with
/// `color_dimension` floats per cell, laid out x-major: cell `(x, y)` starts
/// at `((x + r) * (2r + 1) + (y + r)) * color_dimension`. `+y` is the
/// direction the agent faces.
#[derive(Debug, Clone, Copy)]
pub struct VisionWindow<'a> {
    buffer: &'a [f32],
    radius: i64,
    side: usize,
    color_dimension: usize,
}

impl<'a> VisionWindow<'a> {
    pub fn new(buffer: &'a [f32], radius: i32, color_dimension: usize) -> Result<Self, NavError> {
        let expected = Self::buffer_len(radius, color_dimension)?;
        if color_dimension == 0 {
            return Err(NavError::ZeroColorDimension);
        }
        if buffer.len() != expected {
            return Err(NavError::BufferLength {
                expected,
                found: buffer.len(),
            });
        }
        Ok(Self {
            buffer,
            radius: i64::from(radius),
            side: 2 * radius as usize + 1,
            color_dimension,
        })
    }

    /// Number of floats a window of this shape needs.
    pub fn buffer_len(radius: i32, color_dimension: usize) -> Result<usize, NavError> {
        if radius < 0 {
            return Err(NavError::NegativeRadius(radius));
        }
        let side = 2 * radius as usize + 1;
        Ok(side * side * color_dimension)
    }

    pub fn radius(&self) -> i64 {
        self.radius
    }

    /// Cells per side, `2r + 1`.
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn color_dimension(&self) -> usize {
        self.color_dimension
    }

    pub fn contains(&self, offset: Position) -> bool {
        offset.x.abs() <= self.radius && offset.y.abs() <= self.radius
    }

    /// Index of `offset` among the window's cells, `None` outside the window.
    pub fn cell_index(&self, offset: Position) -> Option<usize> {
        if !self.contains(offset) {
            return None;
        }
        let x = (offset.x + self.radius) as usize;
        let y = (offset.y + self.radius) as usize;
        Some(x * self.side + y)
    }

    pub fn cell(&self, offset: Position) -> Option<&'a [f32]> {
        let start = self.cell_index(offset)? * self.color_dimension;
        self.buffer.get(start..start + self.color_dimension)
    }

    /// Exact per-channel comparison. Cells outside the window never match.
    pub fn matches(&self, offset: Position, signature: &[f32]) -> bool {
        self.cell(offset).is_some_and(|cell| cell == signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_cells_x_major() {
        // r = 1, one channel: value = cell index.
        let buffer: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let window = VisionWindow::new(&buffer, 1, 1).unwrap();
        assert_eq!(window.cell(Position::new(-1, -1)), Some(&[0.0][..]));
        assert_eq!(window.cell(Position::new(-1, 1)), Some(&[2.0][..]));
        assert_eq!(window.cell(Position::new(0, 0)), Some(&[4.0][..]));
        assert_eq!(window.cell(Position::new(1, 0)), Some(&[7.0][..]));
        assert_eq!(window.cell(Position::new(2, 0)), None);
        assert!(window.matches(Position::new(1, 1), &[8.0]));
        assert!(!window.matches(Position::new(0, 2), &[0.0]));
    }

    #[test]
    fn rejects_malformed_shapes() {
        assert_eq!(
            VisionWindow::new(&[], -1, 3).unwrap_err(),
            NavError::NegativeRadius(-1)
        );
        assert_eq!(
            VisionWindow::new(&[], 0, 0).unwrap_err(),
            NavError::ZeroColorDimension
        );
        assert_eq!(
            VisionWindow::new(&[0.0; 10], 1, 1).unwrap_err(),
            NavError::BufferLength {
                expected: 9,
                found: 10
            }
        );
        assert_eq!(VisionWindow::buffer_len(2, 3), Ok(75));
        assert_eq!(
            VisionWindow::buffer_len(-2, 3),
            Err(NavError::NegativeRadius(-2))
        );
    }
}
