use crate::Coord;
use crate::ScreenSize;
use crate::cell::Cell;
use crate::population::Population;
use crate::viewport::Viewport;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// Draws a window of the world to braille characters, one dot per cell.
pub struct Camera {
    /// The cell buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width of the cell buffer
    w: usize,

    /// Height of the cell buffer
    h: usize,

    /// World `x` shown at the left edge
    x: Coord,

    /// World `y` shown at the top edge
    y: Coord,
}

impl Camera {
    pub fn new(w: usize, h: usize) -> Self {
        // For each braille character, we need 3 bytes:
        //  - The leader byte:     0b11100010
        //  - Continuation byte 1: 0b101000xx
        //  - Continuation byte 2: 0b10xxxxxx
        // For each newline, we need one byte: 0b00001010
        //
        // Let `w` and `h` refer to width and height of the cell buffer. Then `bw = ceil(w / 2)`
        // and `bh = ceil(h / 4)` are the width and height of braille characters of our framebuffer
        // (that is, not accounting for the trailing newlines expected at the end of each line).

        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));

        Self {
            cb: vec![false; w * h],
            fb: String::with_capacity(3 * (bw * bh) + bh),
            cp: vec![BRAILLE_EMPTY; bw * bh],
            w,
            h,
            x: 0,
            y: 0,
        }
    }

    /// A camera filling a terminal of `cols` by `rows` characters. Each character holds 2x4
    /// cells.
    pub fn for_terminal(cols: ScreenSize, rows: ScreenSize) -> Self {
        Self::new(cols as usize * 2, rows as usize * 4)
    }

    /// Change the size of the cell buffer, keeping the top left corner in place.
    pub fn resize(&mut self, w: usize, h: usize) {
        let (x, y) = (self.x, self.y);

        *self = Self::new(w, h);
        self.x = x;
        self.y = y;
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn offset_x(&mut self, offset: Coord) {
        self.x = self.x.saturating_add(offset);
    }

    pub fn offset_y(&mut self, offset: Coord) {
        self.y = self.y.saturating_add(offset);
    }

    /// The world cell under the top left pixel.
    pub fn origin(&self) -> Cell {
        Cell::new(self.x, self.y)
    }

    /// Move the camera so that `center` is in the middle of the frame.
    pub fn look_at(&mut self, center: Cell) {
        self.x = center.x().saturating_sub((self.w / 2) as Coord);
        self.y = center.y().saturating_sub((self.h / 2) as Coord);
    }

    /// The part of the world the camera sees.
    pub fn viewport(&self) -> Viewport {
        Viewport::from_origin(self.x, self.y, self.w as u64, self.h as u64)
    }

    /// Turns on a single pixel of the framebuffer
    pub fn draw_pixel(&mut self, x: usize, y: usize) {
        assert!(x < self.w, "x is out of bounds");
        assert!(y < self.h, "y is out of bounds");

        let i = self.xy_from(x, y);

        self.cb[i] = true;
    }

    /// Turn on a pixel for every living cell in view.
    pub fn draw(&mut self, population: &Population) {
        for cell in population.visible_in(self.viewport()) {
            let x = cell.x().abs_diff(self.x) as usize;
            let y = cell.y().abs_diff(self.y) as usize;

            self.draw_pixel(x, y);
        }
    }

    /// Reset the cell buffer
    pub fn reset(&mut self) {
        self.cb.fill(false);
    }

    /// Fundamentally, we have a framebuffer of every pixel on our screen, and we ask ourselves "Is
    /// this pixel on or off?".
    pub fn render(&mut self) -> &str {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            if px {
                let (x, y) = (n % self.w, n / self.w);
                self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
            }
        }

        // update framebuffer
        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            let Some(c) = char::from_u32(c) else {
                unreachable!("braille codepoints are always valid chars")
            };

            self.fb.push(c);
        }
        self.fb.push('\n');

        &self.fb
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}
