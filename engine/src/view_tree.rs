use serde::{Deserialize, Serialize};

use crate::graphics::{Color, Renderer2d, text_width};
use crate::ui::Rect;

/// Immediate-mode overlay description, rebuilt every frame from app state.
///
/// Nodes are painted in order; later nodes sit on top and win hit tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewTree<A> {
    pub nodes: Vec<ViewNode<A>>,
}

impl<A> Default for ViewTree<A> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<A> ViewTree<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: ViewNode<A>) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn buttons(&self) -> impl Iterator<Item = &ButtonNode<A>> {
        self.nodes.iter().filter_map(|n| match n {
            ViewNode::Button(b) => Some(b),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ViewNode<A> {
    Button(ButtonNode<A>),
    Text(TextNode),
    Panel(PanelNode),
    Image(ImageNode),
}

/// When a button reports its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// On pointer release over the button (regular click).
    Release,
    /// On pointer press over the button (hold-style controls).
    Press,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonNode<A> {
    pub id: u32,
    pub rect: Rect,
    pub label: String,
    pub action: A,
    pub trigger: Trigger,
    pub fill: Color,
    /// Invisible buttons still hit-test (e.g. a modal backdrop).
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextNode {
    pub pos: (u32, u32),
    pub text: String,
    pub color: Color,
    pub scale: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelNode {
    pub rect: Rect,
    pub color: Color,
    /// 255 = opaque.
    pub alpha: u8,
    /// Panels that block swallow pointer input for everything beneath them.
    pub blocks_pointer: bool,
}

/// Placeholder frame for an image asset; the painter shows its path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageNode {
    pub rect: Rect,
    pub path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiInput {
    pub mouse_pos: Option<(u32, u32)>,
    pub mouse_down: bool,
    pub mouse_up: bool,
}

/// Returns the topmost node under `pos` that reacts to the pointer.
fn topmost_at<A>(view: &ViewTree<A>, pos: (u32, u32)) -> Option<&ViewNode<A>> {
    view.nodes.iter().rev().find(|node| match node {
        ViewNode::Button(b) => b.rect.contains(pos.0, pos.1),
        ViewNode::Panel(p) => p.blocks_pointer && p.rect.contains(pos.0, pos.1),
        ViewNode::Text(_) | ViewNode::Image(_) => false,
    })
}

/// Actions fired by this frame's pointer input.
///
/// Only the topmost button under the pointer fires; a blocking panel above a button shields it.
pub fn hit_test_actions<A: Clone>(view: &ViewTree<A>, input: UiInput) -> Vec<A> {
    let Some(pos) = input.mouse_pos else {
        return Vec::new();
    };
    let Some(ViewNode::Button(button)) = topmost_at(view, pos) else {
        return Vec::new();
    };
    let fires = match button.trigger {
        Trigger::Release => input.mouse_up,
        Trigger::Press => input.mouse_down,
    };
    if fires {
        vec![button.action.clone()]
    } else {
        Vec::new()
    }
}

/// True when the overlay owns the pointer at `pos`, i.e. the scene below must not react.
pub fn blocks_pointer<A>(view: &ViewTree<A>, pos: (u32, u32)) -> bool {
    topmost_at(view, pos).is_some()
}

pub fn draw_view_tree<A>(view: &ViewTree<A>, gfx: &mut dyn Renderer2d) {
    const LABEL_COLOR: Color = [245, 245, 245, 255];
    const OUTLINE: Color = [20, 20, 24, 255];
    const LABEL_SCALE: u32 = 2;

    for node in &view.nodes {
        match node {
            ViewNode::Panel(p) => gfx.blend_rect(p.rect, p.color, p.alpha),
            ViewNode::Text(t) => gfx.draw_text_scaled(t.pos.0, t.pos.1, &t.text, t.color, t.scale),
            ViewNode::Image(img) => {
                gfx.fill_rect(img.rect, [36, 36, 44, 255]);
                gfx.rect_outline(img.rect, LABEL_COLOR);
                let tw = text_width(&img.path, 1);
                let x = img.rect.x + img.rect.w.saturating_sub(tw) / 2;
                let y = img.rect.y + img.rect.h / 2;
                gfx.draw_text_scaled(x, y, &img.path, LABEL_COLOR, 1);
            }
            ViewNode::Button(b) => {
                if !b.visible {
                    continue;
                }
                gfx.fill_rect(b.rect, b.fill);
                gfx.rect_outline(b.rect, OUTLINE);
                let tw = text_width(&b.label, LABEL_SCALE);
                let x = b.rect.x + b.rect.w.saturating_sub(tw) / 2;
                let y = b.rect.y + b.rect.h.saturating_sub(5 * LABEL_SCALE) / 2;
                gfx.draw_text_scaled(x, y, &b.label, LABEL_COLOR, LABEL_SCALE);
            }
        }
    }
}
