//! Drawing surface handed to games each frame.

/// Index into the fixed 16-colour palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u8);

impl Color {
    pub const BLACK: Color = Color(0);
    pub const NAVY: Color = Color(1);
    pub const PURPLE: Color = Color(2);
    pub const GREEN: Color = Color(3);
    pub const BROWN: Color = Color(4);
    pub const DARK_BLUE: Color = Color(5);
    pub const LIGHT_BLUE: Color = Color(6);
    pub const WHITE: Color = Color(7);
    pub const RED: Color = Color(8);
    pub const ORANGE: Color = Color(9);
    pub const YELLOW: Color = Color(10);
    pub const LIME: Color = Color(11);
    pub const CYAN: Color = Color(12);
    pub const GRAY: Color = Color(13);
    pub const PINK: Color = Color(14);
    pub const PEACH: Color = Color(15);

    const PALETTE: [(u8, u8, u8); 16] = [
        (0x00, 0x00, 0x00),
        (0x2B, 0x33, 0x5F),
        (0x7E, 0x20, 0x72),
        (0x19, 0x95, 0x9C),
        (0x8B, 0x48, 0x52),
        (0x39, 0x5C, 0x98),
        (0xA9, 0xC1, 0xFF),
        (0xEE, 0xEE, 0xEE),
        (0xD4, 0x18, 0x6C),
        (0xD3, 0x84, 0x41),
        (0xE9, 0xC3, 0x5B),
        (0x70, 0xC6, 0xA9),
        (0x76, 0x96, 0xDE),
        (0xA3, 0xA3, 0xA3),
        (0xFF, 0x97, 0x98),
        (0xED, 0xC7, 0xB0),
    ];

    /// RGB value; indices wrap modulo 16.
    pub fn rgb(self) -> (u8, u8, u8) {
        Self::PALETTE[(self.0 % 16) as usize]
    }
}

/// Pixel drawing primitives. Coordinates outside the screen are clipped.
///
/// Text is laid out on the terminal cell grid: each character is one pixel
/// wide and covers the two-pixel cell row containing `y`.
pub trait Screen {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn cls(&mut self, color: Color);
    fn pset(&mut self, x: i32, y: i32, color: Color);
    fn text(&mut self, x: i32, y: i32, text: &str, color: Color);

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.pset(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Filled rectangle.
    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for py in y..y + h {
            for px in x..x + w {
                self.pset(px, py, color);
            }
        }
    }

    /// Rectangle outline.
    fn rectb(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.line(x, y, x + w - 1, y, color);
        self.line(x, y + h - 1, x + w - 1, y + h - 1, color);
        self.line(x, y, x, y + h - 1, color);
        self.line(x + w - 1, y, x + w - 1, y + h - 1, color);
    }

    /// Filled circle.
    fn circ(&mut self, cx: i32, cy: i32, r: i32, color: Color) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.pset(cx + dx, cy + dy, color);
                }
            }
        }
    }
}

/// Column at which `text` starts when centered on a screen `width` wide.
pub fn centered_x(width: i32, text: &str) -> i32 {
    (width - text.chars().count() as i32) / 2
}
