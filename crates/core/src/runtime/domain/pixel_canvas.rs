use super::screen::{Color, Screen};

/// A run of text anchored to a terminal cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub column: i32,
    /// Cell row, i.e. pixel row / 2.
    pub row: i32,
    pub text: String,
    pub color: Color,
}

/// In-memory frame buffer the runtime presents after each draw.
#[derive(Clone, Debug)]
pub struct PixelCanvas {
    width: i32,
    height: i32,
    pixels: Vec<Color>,
    labels: Vec<Label>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            pixels: vec![Color::BLACK; width as usize * height as usize],
            labels: Vec::new(),
        }
    }

    /// `None` outside the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// All label text joined by newlines, in draw order.
    pub fn text_content(&self) -> String {
        self.labels
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }
}

impl Screen for PixelCanvas {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn cls(&mut self, color: Color) {
        self.pixels.fill(color);
        self.labels.clear();
    }

    fn pset(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        if y < 0 || y >= self.height || text.is_empty() {
            return;
        }
        self.labels.push(Label {
            column: x,
            row: y / 2,
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pset_clips_out_of_bounds() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.pset(-1, 0, Color::RED);
        canvas.pset(4, 0, Color::RED);
        canvas.pset(1, 2, Color::RED);
        assert_eq!(canvas.pixel(1, 2), Some(Color::RED));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_cls_fills_and_drops_labels() {
        let mut canvas = PixelCanvas::new(3, 2);
        canvas.text(0, 0, "hi", Color::WHITE);
        canvas.cls(Color::NAVY);
        assert!(canvas.labels().is_empty());
        assert_eq!(canvas.pixel(2, 1), Some(Color::NAVY));
    }

    #[test]
    fn test_text_snaps_to_cell_rows() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.text(2, 5, "A", Color::WHITE);
        canvas.text(0, 20, "offscreen", Color::WHITE);
        assert_eq!(
            canvas.labels(),
            &[Label {
                column: 2,
                row: 2,
                text: "A".into(),
                color: Color::WHITE
            }]
        );
    }

    #[test]
    fn test_default_shapes() {
        let mut canvas = PixelCanvas::new(8, 8);
        canvas.rect(1, 1, 2, 2, Color::LIME);
        canvas.rectb(4, 4, 3, 3, Color::RED);
        canvas.line(0, 7, 7, 7, Color::GRAY);
        canvas.circ(6, 1, 1, Color::YELLOW);

        assert_eq!(canvas.pixel(2, 2), Some(Color::LIME));
        assert_eq!(canvas.pixel(3, 3), Some(Color::BLACK));
        assert_eq!(canvas.pixel(4, 4), Some(Color::RED));
        assert_eq!(canvas.pixel(5, 5), Some(Color::BLACK));
        assert_eq!(canvas.pixel(6, 6), Some(Color::RED));
        assert_eq!(canvas.pixel(3, 7), Some(Color::GRAY));
        assert_eq!(canvas.pixel(6, 0), Some(Color::YELLOW));
        assert_eq!(canvas.pixel(7, 2), Some(Color::BLACK));
    }
}
