use pixels::Pixels;

use crate::graphics::{CpuRenderer, Renderer2d};
use crate::surface::SurfaceSize;

/// Headful presenter built on `pixels`.
///
/// The frame is rasterized on the CPU at `size * render_scale` and `pixels` upscales it to the
/// window surface, which keeps large windows affordable for the software painter.
pub struct PixelsRenderer2d {
    pixels: Pixels,
    window_size: SurfaceSize,
    buffer_size: SurfaceSize,
    render_scale: f32,
}

impl PixelsRenderer2d {
    pub fn new(
        mut pixels: Pixels,
        window_size: SurfaceSize,
        render_scale: f32,
    ) -> Result<Self, pixels::Error> {
        let render_scale = render_scale.clamp(0.25, 1.0);
        let buffer_size = scaled(window_size, render_scale);
        pixels.resize_buffer(buffer_size.width, buffer_size.height)?;
        Ok(Self {
            pixels,
            window_size,
            buffer_size,
            render_scale,
        })
    }

    /// Size of the window surface in physical pixels.
    pub fn window_size(&self) -> SurfaceSize {
        self.window_size
    }

    /// Size of the CPU frame that game code draws into.
    pub fn buffer_size(&self) -> SurfaceSize {
        self.buffer_size
    }

    /// Converts a window-space pointer position into buffer space.
    pub fn window_to_buffer(&self, x: f64, y: f64) -> (u32, u32) {
        let sx = (x.max(0.0) as f32 * self.render_scale) as u32;
        let sy = (y.max(0.0) as f32 * self.render_scale) as u32;
        (
            sx.min(self.buffer_size.width.saturating_sub(1)),
            sy.min(self.buffer_size.height.saturating_sub(1)),
        )
    }

    pub fn resize(&mut self, window_size: SurfaceSize) -> Result<(), pixels::Error> {
        if window_size.is_empty() {
            return Ok(());
        }
        self.window_size = window_size;
        self.buffer_size = scaled(window_size, self.render_scale);
        self.pixels
            .resize_surface(window_size.width, window_size.height)?;
        self.pixels
            .resize_buffer(self.buffer_size.width, self.buffer_size.height)?;
        Ok(())
    }

    pub fn draw_frame<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut dyn Renderer2d) -> R,
    {
        let size = self.buffer_size;
        let mut cpu = CpuRenderer::new(self.pixels.frame_mut(), size);
        cpu.begin_frame(size);
        f(&mut cpu)
    }

    pub fn present(&mut self) -> Result<(), pixels::Error> {
        self.pixels.render()
    }
}

fn scaled(size: SurfaceSize, scale: f32) -> SurfaceSize {
    SurfaceSize::new(
        ((size.width as f32 * scale) as u32).max(1),
        ((size.height as f32 * scale) as u32).max(1),
    )
}
