use crate::definitions::display;

/// The graphics of the Chip 8 are black and white and the screen has a total of `2048` pixels
/// `(64 x 32)`, stored row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [[bool; display::WIDTH]; display::HEIGHT],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            pixels: [[false; display::WIDTH]; display::HEIGHT],
        }
    }
}

impl Framebuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        for row in self.pixels.iter_mut() {
            row.fill(false);
        }
    }

    /// Returns the pixel, the coordinates wrap around the screen.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y % display::HEIGHT][x % display::WIDTH]
    }

    /// Xors the pixel with `on`, the coordinates wrap around the screen.
    ///
    /// Returns true if a set pixel was turned off.
    pub fn flip(&mut self, x: usize, y: usize, on: bool) -> bool {
        let pixel = &mut self.pixels[y % display::HEIGHT][x % display::WIDTH];
        let collision = *pixel && on;
        *pixel ^= on;
        collision
    }

    /// Will xor an 8 pixel wide sprite onto the screen with its top left corner
    /// at the given coordinates. Rows and pixels running over an edge wrap around
    /// to the opposite side.
    ///
    /// Returns true if any set pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        const BYTE: usize = 8;

        let mut collision = false;
        for (row, line) in sprite.iter().enumerate() {
            // most significant bit is the leftmost pixel
            for column in 0..BYTE {
                let on = (line >> (BYTE - 1 - column)) & 1 == 1;
                if on {
                    collision |= self.flip(x + column, y + row, true);
                }
            }
        }
        collision
    }

    /// The rows of the screen, top first.
    pub fn rows(&self) -> &[[bool; display::WIDTH]] {
        &self.pixels[..]
    }

    /// The amount of pixels turned on.
    pub fn count_lit(&self) -> usize {
        self.pixels
            .iter()
            .map(|row| row.iter().filter(|p| **p).count())
            .sum()
    }
}
