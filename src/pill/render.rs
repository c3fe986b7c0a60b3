//! Rendering adapter contract.
//!
//! The core never paints. A host rendering layer implements [`RenderHost`] for
//! glyph geometry and text measurement; the functions here turn token state
//! into sizes and drawing instructions the host executes.

use std::ops::Range;

use super::attributes::Font;
use super::storage::StyledBuffer;
use super::token::Token;
use crate::theme::Color;

/// A point in buffer-local coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Convert a view point into text-container coordinates.
pub fn to_container(point: Point, container_origin: Point) -> Point {
    Point::new(point.x - container_origin.x, point.y - container_origin.y)
}

/// Drawing configuration shared by every token of one view.
#[derive(Debug, Clone, PartialEq)]
pub struct PillStyle {
    /// Font for token label text
    pub font: Font,
    /// Corner radius; `None` uses a fifth of the pill height
    pub corner_radius: Option<f32>,
    /// Padding between each pill side and its label
    pub text_width_padding: f32,
}

impl Default for PillStyle {
    fn default() -> Self {
        Self {
            font: Font::system(),
            corner_radius: None,
            text_width_padding: 7.0,
        }
    }
}

impl PillStyle {
    pub fn corner_radius_for(&self, height: f32) -> f32 {
        self.corner_radius.unwrap_or(height / 5.0)
    }
}

/// What the core needs from the host rendering layer.
pub trait RenderHost {
    /// Character under `point` (container coordinates), or None when the
    /// point does not lie over a glyph.
    fn character_index_at(&self, point: Point) -> Option<usize>;

    /// Insertion point nearest to `point`, for default caret placement.
    fn insertion_point_at(&self, point: Point) -> usize;

    /// Size of `text` drawn in `font`.
    fn measure(&self, text: &str, font: &Font) -> Size;
}

/// The size a token's cell takes up in the line.
pub fn cell_size(token: &Token, host: &impl RenderHost, style: &PillStyle) -> Size {
    let label = token.display_label(&style.font);
    let mut size = host.measure(&label.text, &style.font);
    size.width += 2.0 * style.text_width_padding;
    size
}

/// Baseline offset keeping the pill aligned with surrounding text.
pub fn baseline_offset(style: &PillStyle) -> f32 {
    style.font.descender.floor()
}

/// Drawing instructions for one pill.
#[derive(Debug, Clone, PartialEq)]
pub struct PillDrawing {
    /// Rounded rectangle frame
    pub frame: Rect,
    pub corner_radius: f32,
    pub fill: Color,
    /// Border color and width; None when no border is drawn
    pub border: Option<(Color, f32)>,
    pub label: String,
    pub label_color: Color,
    /// Lower-left origin of the label, horizontally centred in the frame
    pub label_origin: Point,
}

/// Lay out a pill inside the cell frame the host assigned it.
///
/// The pill takes the full line height; the label sits on the line baseline
/// (`baseline` is measured down from the top of the line fragment).
pub fn layout_pill(
    token: &Token,
    cell_frame: Rect,
    line_height: f32,
    baseline: f32,
    host: &impl RenderHost,
    style: &PillStyle,
) -> PillDrawing {
    let frame = Rect::new(cell_frame.x, cell_frame.y, cell_frame.width, line_height);
    let label = token.display_label(&style.font);
    let text_size = host.measure(&label.text, &style.font);
    let text_x = frame.x + (frame.width - text_size.width) / 2.0;
    let border = token
        .border_color
        .map(|color| (color, token.border_width));

    PillDrawing {
        frame,
        corner_radius: style.corner_radius_for(frame.height),
        fill: token.fill_color(),
        border,
        label: label.text,
        label_color: token.text_color,
        label_origin: Point::new(text_x, frame.max_y() - (line_height - baseline)),
    }
}

/// Whether the host should paint the selection background for `range`.
/// A selection that is exactly one token is shown by the token highlight
/// instead.
pub fn should_fill_selection_background(buffer: &StyledBuffer, range: Range<usize>) -> bool {
    buffer.token_exactly_at(range).is_none()
}

/// Ranges that need layout and display invalidation after a style change.
pub fn token_ranges(buffer: &StyledBuffer) -> Vec<Range<usize>> {
    buffer
        .iter_tokens()
        .map(|(offset, _)| offset..offset + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedWidthHost;

    impl RenderHost for FixedWidthHost {
        fn character_index_at(&self, point: Point) -> Option<usize> {
            (point.x >= 0.0).then(|| (point.x / 10.0) as usize)
        }

        fn insertion_point_at(&self, point: Point) -> usize {
            (point.x.max(0.0) / 10.0).round() as usize
        }

        fn measure(&self, text: &str, font: &Font) -> Size {
            Size::new(text.chars().count() as f32 * 10.0, font.size)
        }
    }

    #[test]
    fn test_cell_size_adds_padding() {
        let token = Token::new("abc");
        let size = cell_size(&token, &FixedWidthHost, &PillStyle::default());
        assert_eq!(size.width, 30.0 + 14.0);
        assert_eq!(size.height, 13.0);
    }

    #[test]
    fn test_empty_token_cell_is_padding_only() {
        let token = Token::new("");
        let style = PillStyle {
            text_width_padding: 3.0,
            ..PillStyle::default()
        };
        assert_eq!(cell_size(&token, &FixedWidthHost, &style).width, 6.0);
    }

    #[test]
    fn test_corner_radius_defaults_to_fifth_of_height() {
        let style = PillStyle::default();
        assert_eq!(style.corner_radius_for(20.0), 4.0);
        let style = PillStyle {
            corner_radius: Some(2.5),
            ..PillStyle::default()
        };
        assert_eq!(style.corner_radius_for(20.0), 2.5);
    }

    #[test]
    fn test_layout_pill_fill_and_border() {
        let mut token = Token::new("ab");
        token.border_color = Some(Color::rgb(0, 0, 0));
        token.border_width = 2.0;
        let drawing = layout_pill(
            &token,
            Rect::new(100.0, 0.0, 34.0, 13.0),
            20.0,
            16.0,
            &FixedWidthHost,
            &PillStyle::default(),
        );
        assert_eq!(drawing.frame, Rect::new(100.0, 0.0, 34.0, 20.0));
        assert_eq!(drawing.corner_radius, 4.0);
        assert_eq!(drawing.fill, token.background_color);
        assert_eq!(drawing.border, Some((Color::rgb(0, 0, 0), 2.0)));
        assert_eq!(drawing.label_origin, Point::new(107.0, 16.0));

        token.set_selected(true);
        let drawing = layout_pill(
            &token,
            Rect::new(0.0, 0.0, 34.0, 13.0),
            20.0,
            16.0,
            &FixedWidthHost,
            &PillStyle::default(),
        );
        assert_eq!(drawing.fill, token.highlight_color);
    }

    #[test]
    fn test_baseline_offset_floors_descender() {
        let style = PillStyle {
            font: Font::new("mono", 12.0).with_descender(-2.4),
            ..PillStyle::default()
        };
        assert_eq!(baseline_offset(&style), -3.0);
    }

    #[test]
    fn test_selection_background_suppressed_for_single_token() {
        let mut buffer = StyledBuffer::from_text("ab");
        buffer.insert_token(Token::new("x"), 1);
        assert!(!should_fill_selection_background(&buffer, 1..2));
        assert!(should_fill_selection_background(&buffer, 0..2));
        assert!(should_fill_selection_background(&buffer, 0..1));
    }

    #[test]
    fn test_to_container() {
        let p = to_container(Point::new(15.0, 12.0), Point::new(5.0, 5.0));
        assert_eq!(p, Point::new(10.0, 7.0));
    }

    #[test]
    fn test_token_ranges() {
        let mut buffer = StyledBuffer::from_text("ab");
        buffer.insert_token(Token::new("x"), 1);
        buffer.append_token(Token::new("y"));
        assert_eq!(token_ranges(&buffer), vec![1..2, 3..4]);
    }
}
