use crate::error::Chip8Error;

/// # Frame Buffer
/// A monochrome grid of `width` x `height` pixels, lit or unlit.
///
/// Cells are stored row-major and indexed as (x, y) with the origin at the top left.
/// Draw instructions write into it and the renderer reads it once per tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<bool, Chip8Error> {
        let index = self.index(x, y)?;
        Ok(self.cells[index])
    }

    pub fn set(&mut self, x: usize, y: usize, lit: bool) -> Result<(), Chip8Error> {
        let index = self.index(x, y)?;
        self.cells[index] = lit;
        Ok(())
    }

    /// Fails unless (x, y) names a cell of the buffer
    pub fn check(&self, x: usize, y: usize) -> Result<(), Chip8Error> {
        self.index(x, y).map(|_| ())
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = false);
    }

    /// Iterates over the rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width)
    }

    /// Number of lit pixels
    pub fn lit(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, Chip8Error> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(Chip8Error::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unlit() {
        let frame = FrameBuffer::new(64, 32);
        assert_eq!(frame.lit(), 0);
        assert_eq!(frame.rows().count(), 32);
        assert!(frame.rows().all(|row| row.len() == 64));
    }

    #[test]
    fn test_set_and_get() {
        let mut frame = FrameBuffer::new(64, 32);
        frame.set(63, 31, true).unwrap();
        assert!(frame.get(63, 31).unwrap());
        assert!(!frame.get(62, 31).unwrap());
        assert!(frame.rows().last().unwrap()[63]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut frame = FrameBuffer::new(64, 32);
        assert!(matches!(
            frame.set(64, 0, true),
            Err(Chip8Error::PixelOutOfBounds { x: 64, y: 0, .. })
        ));
        assert!(frame.get(0, 32).is_err());
        assert_eq!(frame.lit(), 0);
    }

    #[test]
    fn test_clear() {
        let mut frame = FrameBuffer::new(8, 4);
        frame.set(1, 1, true).unwrap();
        frame.set(2, 3, true).unwrap();
        frame.clear();
        assert_eq!(frame.lit(), 0);
    }
}
