//! Screen-space layout primitives for overlay UI (modal panels, toolbars, loading screen).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Inner content area. Oversized insets saturate the size to 0.
    pub fn inset(&self, insets: Insets) -> Self {
        Self {
            x: self.x.saturating_add(insets.left),
            y: self.y.saturating_add(insets.top),
            w: self.w.saturating_sub(insets.left.saturating_add(insets.right)),
            h: self.h.saturating_sub(insets.top.saturating_add(insets.bottom)),
        }
    }

    /// Places a child of `size` inside this rect at `anchor`, clamping the child to fit.
    pub fn place(&self, size: Size, anchor: Anchor) -> Self {
        let w = size.w.min(self.w);
        let h = size.h.min(self.h);
        let (hx, vy) = anchor.fractions();
        let x = self.x + align(self.w - w, hx);
        let y = self.y + align(self.h - h, vy);
        Self { x, y, w, h }
    }

    /// Splits off a strip of height `h` from the top. Returns `(strip, rest)`.
    pub fn split_top(&self, h: u32) -> (Self, Self) {
        let h = h.min(self.h);
        (
            Self::new(self.x, self.y, self.w, h),
            Self::new(self.x, self.y + h, self.w, self.h - h),
        )
    }

    /// Splits off a strip of height `h` from the bottom. Returns `(rest, strip)`.
    pub fn split_bottom(&self, h: u32) -> (Self, Self) {
        let h = h.min(self.h);
        (
            Self::new(self.x, self.y, self.w, self.h - h),
            Self::new(self.x, self.bottom() - h, self.w, h),
        )
    }

    /// Lays out `count` equally sized cells in a row, separated by `gap`, right-aligned.
    pub fn row_from_right(&self, count: u32, cell: Size, gap: u32) -> Vec<Rect> {
        let mut out = Vec::with_capacity(count as usize);
        let mut right = self.right();
        for _ in 0..count {
            if right <= self.x {
                break;
            }
            let x = right.saturating_sub(cell.w).max(self.x);
            out.push(Rect::new(x, self.y, cell.w.min(right - x), cell.h.min(self.h)));
            right = x.saturating_sub(gap);
        }
        out.reverse();
        out
    }
}

fn align(free: u32, fraction: u32) -> u32 {
    match fraction {
        0 => 0,
        1 => free / 2,
        _ => free,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Insets {
    pub fn all(v: u32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }

    pub fn symmetric(horizontal: u32, vertical: u32) -> Self {
        Self {
            left: horizontal,
            top: vertical,
            right: horizontal,
            bottom: vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    Center,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// Horizontal and vertical alignment as 0 (start), 1 (center), 2 (end).
    fn fractions(self) -> (u32, u32) {
        match self {
            Anchor::TopLeft => (0, 0),
            Anchor::TopCenter => (1, 0),
            Anchor::TopRight => (2, 0),
            Anchor::Center => (1, 1),
            Anchor::BottomLeft => (0, 2),
            Anchor::BottomCenter => (1, 2),
            Anchor::BottomRight => (2, 2),
        }
    }
}
