use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color as TermColor;
use ratatui::widgets::Widget;

use crate::runtime::domain::pixel_canvas::PixelCanvas;
use crate::runtime::domain::screen::{Color, Screen};

const HALF_BLOCK: char = '▀';

/// Renders a [`PixelCanvas`] centered in the area, two pixels per cell:
/// the upper pixel as the glyph colour, the lower one as the background.
pub struct CanvasWidget<'a> {
    canvas: &'a PixelCanvas,
}

impl<'a> CanvasWidget<'a> {
    pub fn new(canvas: &'a PixelCanvas) -> Self {
        Self { canvas }
    }
}

fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.rgb();
    TermColor::Rgb(r, g, b)
}

impl Widget for CanvasWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let canvas = self.canvas;
        let cols = (canvas.width().max(0) as u16).min(area.width);
        let rows = (((canvas.height().max(0) + 1) / 2) as u16).min(area.height);
        let left = area.x + (area.width - cols) / 2;
        let top = area.y + (area.height - rows) / 2;

        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = (i32::from(col), i32::from(row) * 2);
                let upper = canvas.pixel(x, y).unwrap_or_default();
                let lower = canvas.pixel(x, y + 1).unwrap_or(upper);
                buf.get_mut(left + col, top + row)
                    .set_char(HALF_BLOCK)
                    .set_fg(term_color(upper))
                    .set_bg(term_color(lower));
            }
        }

        for label in canvas.labels() {
            if label.row < 0 || label.row >= i32::from(rows) {
                continue;
            }
            for (i, ch) in label.text.chars().enumerate() {
                let col = label.column + i as i32;
                if col < 0 || col >= i32::from(cols) {
                    continue;
                }
                let background = canvas.pixel(col, label.row * 2).unwrap_or_default();
                buf.get_mut(left + col as u16, top + label.row as u16)
                    .set_char(ch)
                    .set_fg(term_color(label.color))
                    .set_bg(term_color(background));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(canvas: &PixelCanvas, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        CanvasWidget::new(canvas).render(area, &mut buf);
        buf
    }

    #[test]
    fn test_two_pixels_per_cell() {
        let mut canvas = PixelCanvas::new(2, 2);
        canvas.pset(0, 0, Color::RED);
        canvas.pset(0, 1, Color::LIME);

        let buf = render(&canvas, 2, 1);
        let cell = buf.get(0, 0);
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, term_color(Color::RED));
        assert_eq!(cell.bg, term_color(Color::LIME));
    }

    #[test]
    fn test_canvas_is_centered() {
        let mut canvas = PixelCanvas::new(2, 2);
        canvas.cls(Color::WHITE);

        let buf = render(&canvas, 6, 3);
        assert_eq!(buf.get(2, 1).symbol(), "▀");
        assert_eq!(buf.get(0, 0).symbol(), " ");
    }

    #[test]
    fn test_labels_overlay_pixels_and_clip() {
        let mut canvas = PixelCanvas::new(4, 2);
        canvas.cls(Color::NAVY);
        canvas.text(2, 0, "HEY", Color::WHITE);

        let buf = render(&canvas, 4, 1);
        assert_eq!(buf.get(2, 0).symbol(), "H");
        assert_eq!(buf.get(3, 0).symbol(), "E");
        assert_eq!(buf.get(2, 0).fg, term_color(Color::WHITE));
        assert_eq!(buf.get(2, 0).bg, term_color(Color::NAVY));
    }
}
