use crate::{surface::SurfaceSize, ui::Rect};

pub type Color = [u8; 4];

/// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn parse_hex_color(text: &str) -> Option<Color> {
    let hex = text.trim().trim_start_matches('#');
    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
    Some([byte(0)?, byte(2)?, byte(4)?, alpha])
}

/// Multiplies the RGB channels by `factor` (clamped), keeping alpha.
pub fn shade(color: Color, factor: f32) -> Color {
    let f = factor.max(0.0);
    let ch = |c: u8| (c as f32 * f).round().clamp(0.0, 255.0) as u8;
    [ch(color[0]), ch(color[1]), ch(color[2]), color[3]]
}

// Block font: 3x5 glyphs, scaled by whole pixels.
pub const DEFAULT_TEXT_SCALE: u32 = 2;
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

pub fn glyph_advance_x(scale: u32) -> u32 {
    (GLYPH_W + 1) * scale.max(1)
}

pub fn line_advance_y(scale: u32) -> u32 {
    (GLYPH_H + 2) * scale.max(1)
}

/// Pixel width of `text` on a single line.
pub fn text_width(text: &str, scale: u32) -> u32 {
    (text.chars().count() as u32).saturating_mul(glyph_advance_x(scale))
}

/// Greedy word wrap to at most `max_width` pixels per line.
///
/// Words wider than a line are hard-split. Explicit newlines are kept.
pub fn wrap_text(text: &str, max_width: u32, scale: u32) -> Vec<String> {
    let max_chars = (max_width / glyph_advance_x(scale)).max(1) as usize;
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if line.is_empty() {
                word.len()
            } else {
                line.chars().count() + 1 + word.len()
            };
            if needed > max_chars && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        lines.push(line);
    }
    lines
}

/// Screen-space drawing interface shared by the scene painter and the overlay UI.
pub trait Renderer2d {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn size(&self) -> SurfaceSize;

    /// Opaque fill.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Alpha-blended rect over existing content.
    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8);

    /// Opaque filled triangle with vertices in pixel coordinates (may lie off-screen).
    fn fill_triangle(&mut self, a: [f32; 2], b: [f32; 2], c: [f32; 2], color: Color);

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32);

    fn rect_outline(&mut self, rect: Rect, color: Color) {
        if rect.w == 0 || rect.h == 0 {
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - 1, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        self.fill_rect(Rect::new(rect.right() - 1, rect.y, 1, rect.h), color);
    }

    fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Color) {
        self.draw_text_scaled(x, y, text, color, DEFAULT_TEXT_SCALE);
    }

    fn clear(&mut self, color: Color) {
        let s = self.size();
        self.fill_rect(Rect::from_size(s.width, s.height), color);
    }
}

/// CPU renderer that draws into an RGBA frame buffer.
pub struct CpuRenderer<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
}

impl<'a> CpuRenderer<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self { frame, size }
    }

    fn frame_ok(&self) -> bool {
        let len = self.size.rgba_len();
        len != 0 && self.frame.len() >= len
    }

    fn span(&mut self, y: u32, x0: u32, x1: u32, mut shade: impl FnMut(&mut [u8])) {
        if x0 >= x1 {
            return;
        }
        let stride = self.size.width as usize * 4;
        let start = y as usize * stride + x0 as usize * 4;
        let end = y as usize * stride + x1 as usize * 4;
        for px in self.frame[start..end].chunks_exact_mut(4) {
            shade(px);
        }
    }
}

impl Renderer2d for CpuRenderer<'_> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if !self.frame_ok() {
            return;
        }
        let max_x = rect.right().min(self.size.width);
        let max_y = rect.bottom().min(self.size.height);
        for y in rect.y..max_y {
            self.span(y, rect.x, max_x, |px| px.copy_from_slice(&color));
        }
    }

    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        if alpha == 0 {
            return;
        }
        if alpha == 255 {
            self.fill_rect(rect, color);
            return;
        }
        if !self.frame_ok() {
            return;
        }
        let a = alpha as u32;
        let inv = 255 - a;
        let max_x = rect.right().min(self.size.width);
        let max_y = rect.bottom().min(self.size.height);
        for y in rect.y..max_y {
            self.span(y, rect.x, max_x, |px| {
                for c in 0..3 {
                    px[c] = ((px[c] as u32 * inv + color[c] as u32 * a + 127) / 255) as u8;
                }
                px[3] = 255;
            });
        }
    }

    fn fill_triangle(&mut self, a: [f32; 2], b: [f32; 2], c: [f32; 2], color: Color) {
        if !self.frame_ok() {
            return;
        }
        let mut v = [a, b, c];
        v.sort_by(|p, q| p[1].total_cmp(&q[1]));
        let [top, mid, bot] = v;
        if (bot[1] - top[1]).abs() < f32::EPSILON {
            return;
        }

        let height = self.size.height as f32;
        let width = self.size.width as f32;
        let y_start = top[1].max(0.0).ceil() as u32;
        let y_end = bot[1].min(height).ceil().max(0.0) as u32;

        for y in y_start..y_end {
            // Sample at the pixel center.
            let sy = y as f32 + 0.5;
            if sy < top[1] || sy > bot[1] {
                continue;
            }
            let xa = lerp_x(top, bot, sy);
            let xb = if sy < mid[1] {
                lerp_x(top, mid, sy)
            } else {
                lerp_x(mid, bot, sy)
            };
            let (l, r) = if xa < xb { (xa, xb) } else { (xb, xa) };
            let x0 = l.max(0.0).round().min(width) as u32;
            let x1 = r.max(0.0).round().min(width) as u32;
            self.span(y, x0, x1, |px| px.copy_from_slice(&color));
        }
    }

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32) {
        let scale = scale.max(1);
        let adv_x = glyph_advance_x(scale);
        let adv_y = line_advance_y(scale);

        let mut cursor_x = x;
        let mut cursor_y = y;
        for ch in text.chars() {
            if cursor_y >= self.size.height {
                break;
            }
            match ch {
                '\n' => {
                    cursor_x = x;
                    cursor_y = cursor_y.saturating_add(adv_y);
                    continue;
                }
                ' ' => {}
                _ => self.draw_glyph(cursor_x, cursor_y, ch, color, scale),
            }
            cursor_x = cursor_x.saturating_add(adv_x);
        }
    }
}

impl CpuRenderer<'_> {
    fn draw_glyph(&mut self, x: u32, y: u32, ch: char, color: Color, scale: u32) {
        for (row, bits) in glyph_rows(ch).into_iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1u8 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                let px = x.saturating_add(col * scale);
                let py = y.saturating_add(row as u32 * scale);
                self.fill_rect(Rect::new(px, py, scale, scale), color);
            }
        }
    }
}

fn lerp_x(p: [f32; 2], q: [f32; 2], y: f32) -> f32 {
    let dy = q[1] - p[1];
    if dy.abs() < f32::EPSILON {
        return p[0];
    }
    p[0] + (q[0] - p[0]) * ((y - p[1]) / dy)
}

fn glyph_rows(ch: char) -> [u8; GLYPH_H as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],

        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],

        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ';' => [0b000, 0b010, 0b000, 0b010, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b010, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '"' => [0b101, 0b101, 0b000, 0b000, 0b000],
        '@' => [0b111, 0b101, 0b111, 0b100, 0b111],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '&' => [0b010, 0b101, 0b010, 0b101, 0b011],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],

        // Anything the font lacks (emoji included) renders as a hollow box.
        _ => [0b111, 0b101, 0b101, 0b101, 0b111],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    }

    #[test]
    fn fill_rect_clips_to_surface() {
        let size = SurfaceSize::new(4, 4);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuRenderer::new(&mut frame, size);
        gfx.fill_rect(Rect::new(2, 2, 10, 10), [9, 9, 9, 255]);
        assert_eq!(pixel(&frame, 4, 3, 3), [9, 9, 9, 255]);
        assert_eq!(pixel(&frame, 4, 1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn blend_rect_mixes_with_background() {
        let size = SurfaceSize::new(2, 2);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuRenderer::new(&mut frame, size);
        gfx.clear([0, 0, 0, 255]);
        gfx.blend_rect(Rect::from_size(2, 2), [255, 255, 255, 255], 128);
        assert_eq!(pixel(&frame, 2, 0, 0), [128, 128, 128, 255]);
    }

    #[test]
    fn fill_triangle_covers_interior_only() {
        let size = SurfaceSize::new(10, 10);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuRenderer::new(&mut frame, size);
        gfx.fill_triangle([0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [1, 2, 3, 255]);
        assert_eq!(pixel(&frame, 10, 1, 1), [1, 2, 3, 255]);
        assert_eq!(pixel(&frame, 10, 9, 9), [0, 0, 0, 0]);
    }

    #[test]
    fn fill_triangle_tolerates_offscreen_vertices() {
        let size = SurfaceSize::new(8, 8);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuRenderer::new(&mut frame, size);
        gfx.fill_triangle([-50.0, -50.0], [100.0, -50.0], [-50.0, 100.0], [7, 7, 7, 255]);
        assert_eq!(pixel(&frame, 8, 0, 0), [7, 7, 7, 255]);
    }

    #[test]
    fn parse_hex_color_accepts_rgb_and_rgba() {
        assert_eq!(parse_hex_color("#658ebf"), Some([0x65, 0x8e, 0xbf, 255]));
        assert_eq!(parse_hex_color("#2b7fbfff"), Some([0x2b, 0x7f, 0xbf, 255]));
        assert_eq!(parse_hex_color("ea7b3680"), Some([0xea, 0x7b, 0x36, 0x80]));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn shade_scales_rgb_and_keeps_alpha() {
        assert_eq!(shade([100, 200, 50, 7], 0.5), [50, 100, 25, 7]);
        assert_eq!(shade([200, 200, 200, 255], 2.0), [255, 255, 255, 255]);
    }

    #[test]
    fn wrap_text_breaks_on_word_boundaries() {
        // Scale 1 => 4px per char, so 40px fits 10 characters.
        let lines = wrap_text("hello there general kenobi", 40, 1);
        assert_eq!(lines, vec!["hello", "there", "general", "kenobi"]);
        let lines = wrap_text("ab cd ef", 40, 1);
        assert_eq!(lines, vec!["ab cd ef"]);
    }

    #[test]
    fn wrap_text_hard_splits_long_words() {
        let lines = wrap_text("abcdefghijkl", 16, 1);
        assert_eq!(lines, vec!["abcd", "efgh", "ijkl"]);
    }
}
