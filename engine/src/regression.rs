//! Frame hashing helpers for render determinism tests.

use sha2::{Digest, Sha256};

use crate::graphics::CpuRenderer;
use crate::graphics::Renderer2d;
use crate::surface::{FrameBuffer, SurfaceSize};

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    hex::encode(hasher.finalize())
}

/// Renders one offscreen frame of `size` with `draw` and returns its digest.
pub fn render_hash<F>(size: SurfaceSize, draw: F) -> String
where
    F: FnOnce(&mut dyn Renderer2d),
{
    let mut buffer = FrameBuffer::new(size);
    {
        let mut gfx = CpuRenderer::new(buffer.frame_mut(), size);
        gfx.begin_frame(size);
        draw(&mut gfx);
    }
    rgba_sha256_hex(buffer.frame())
}
