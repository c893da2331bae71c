use super::{DISPLAY_X, DISPLAY_Y, Display, Frame};

/// 64x32 monochrome pixels, drawn by XOR with wraparound at the edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: Display<bool>,
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            pixels: [[false; DISPLAY_X]; DISPLAY_Y],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_X]; DISPLAY_Y];
    }

    /// XORs `rows` onto the screen with the top-left corner at (`x`, `y`).
    ///
    /// Each row is 8 pixels wide, most significant bit leftmost. Pixels past
    /// an edge continue on the opposite edge. Returns true if any pixel was
    /// turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: &[u8]) -> bool {
        let x_pos = x % DISPLAY_X;
        let y_pos = y % DISPLAY_Y;

        let mut any_erased = false;
        for (row, sprite_byte) in rows.iter().enumerate() {
            let py = (y_pos + row) % DISPLAY_Y;

            for col in 0..8 {
                // If current sprite bit is non-zero
                if (sprite_byte & (0x80 >> col)) != 0 {
                    let pixel = &mut self.pixels[py][(x_pos + col) % DISPLAY_X];

                    *pixel ^= true;

                    if !*pixel {
                        any_erased = true;
                    }
                }
            }
        }

        any_erased
    }

    /// Get the state of the pixel at column `x`, row `y` (true = on, false = off).
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y][x]
    }

    pub fn rows(&self) -> &Display<bool> {
        &self.pixels
    }

    pub fn snapshot(&self) -> Frame {
        self.pixels
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}
