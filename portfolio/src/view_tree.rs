use engine::graphics::{Color, line_advance_y, parse_hex_color, wrap_text};
use engine::ui::{self, Anchor, Insets, Size};
use engine::view_tree::{ButtonNode, ImageNode, PanelNode, TextNode, Trigger, ViewNode, ViewTree};

use crate::input::Direction;
use crate::lifecycle::Lifecycle;
use crate::state::PortfolioState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Enter,
    CloseModal,
    PrevImage,
    NextImage,
    VisitLink,
    ToggleTheme,
    ToggleAudio,
    /// Held on-screen arrow; released with the pointer.
    MobileDirection(Direction),
}

const TEXT: Color = [245, 245, 245, 255];
const BUTTON: Color = [40, 40, 48, 255];
const ACCENT_FALLBACK: Color = [26, 26, 26, 255];
const MARGIN: u32 = 16;
const CORNER_BUTTON: Size = Size { w: 72, h: 32 };
const ARROW: u32 = 44;

/// Builds the overlay for the current page state.
///
/// Later nodes sit on top, so the loading overlay is pushed last.
pub fn build_view(state: &PortfolioState, muted: bool) -> ViewTree<UiAction> {
    let mut tree = ViewTree::new();
    let (width, height) = (state.viewport.width, state.viewport.height);
    let screen = ui::Rect::from_size(width, height);
    if screen.w == 0 || screen.h == 0 {
        return tree;
    }

    push_corner_buttons(&mut tree, state, muted, screen);
    push_mobile_arrows(&mut tree, screen);

    if state.is_modal_open() {
        push_modal(&mut tree, state, screen);
    }

    if state.lifecycle != Lifecycle::Entered {
        push_loading(&mut tree, state, screen);
    }
    tree
}

fn push_button(
    tree: &mut ViewTree<UiAction>,
    id: u32,
    rect: ui::Rect,
    label: &str,
    action: UiAction,
    trigger: Trigger,
) {
    tree.push(ViewNode::Button(ButtonNode {
        id,
        rect,
        label: label.to_string(),
        action,
        trigger,
        fill: BUTTON,
        visible: true,
    }));
}

fn push_text(tree: &mut ViewTree<UiAction>, pos: (u32, u32), text: &str, scale: u32) {
    tree.push(ViewNode::Text(TextNode {
        pos,
        text: text.to_string(),
        color: TEXT,
        scale,
    }));
}

fn push_corner_buttons(tree: &mut ViewTree<UiAction>, state: &PortfolioState, muted: bool, screen: ui::Rect) {
    let (top, _) = screen.inset(Insets::all(MARGIN)).split_top(CORNER_BUTTON.h);
    let cells = top.row_from_right(2, CORNER_BUTTON, 8);
    let [theme, audio] = cells.as_slice() else {
        return;
    };
    let audio_label = if muted { "UNMUTE" } else { "MUTE" };
    push_button(tree, 1, *theme, state.theme.button_label(), UiAction::ToggleTheme, Trigger::Release);
    push_button(tree, 2, *audio, audio_label, UiAction::ToggleAudio, Trigger::Release);
}

fn push_mobile_arrows(tree: &mut ViewTree<UiAction>, screen: ui::Rect) {
    let pad = screen.inset(Insets::all(MARGIN));
    let pad_size = Size::new(ARROW * 3, ARROW * 2);
    let area = pad.place(pad_size, Anchor::BottomLeft);
    if area.w < pad_size.w || area.h < pad_size.h {
        return;
    }
    let cell = |col: u32, row: u32| ui::Rect::new(area.x + col * ARROW, area.y + row * ARROW, ARROW - 4, ARROW - 4);
    let arrows = [
        (cell(1, 0), "^", Direction::Up),
        (cell(0, 1), "<", Direction::Left),
        (cell(1, 1), "V", Direction::Down),
        (cell(2, 1), ">", Direction::Right),
    ];
    for (i, (rect, label, dir)) in arrows.into_iter().enumerate() {
        push_button(tree, 10 + i as u32, rect, label, UiAction::MobileDirection(dir), Trigger::Press);
    }
}

fn push_modal(tree: &mut ViewTree<UiAction>, state: &PortfolioState, screen: ui::Rect) {
    let Some(entry) = state.modal.entry() else {
        return;
    };

    // Clicking outside the panel closes it.
    tree.push(ViewNode::Button(ButtonNode {
        id: 20,
        rect: screen,
        label: String::new(),
        action: UiAction::CloseModal,
        trigger: Trigger::Release,
        fill: [0, 0, 0, 0],
        visible: false,
    }));
    tree.push(ViewNode::Panel(PanelNode {
        rect: screen,
        color: [0, 0, 0, 255],
        alpha: 120,
        blocks_pointer: false,
    }));

    let panel_size = Size::new(screen.w.saturating_sub(2 * MARGIN).min(560), screen.h.saturating_sub(2 * MARGIN).min(460));
    let panel = screen.place(panel_size, Anchor::Center);
    let accent = parse_hex_color(entry.accent()).unwrap_or(ACCENT_FALLBACK);
    tree.push(ViewNode::Panel(PanelNode {
        rect: panel,
        color: accent,
        alpha: 240,
        blocks_pointer: true,
    }));

    let content = panel.inset(Insets::all(MARGIN));
    let (header, body) = content.split_top(32);
    let close_rect = header.place(Size::new(32, 32), Anchor::TopRight);
    push_text(tree, (header.x, header.y + 8), entry.title, 3);
    push_button(tree, 21, close_rect, "X", UiAction::CloseModal, Trigger::Release);

    let (mut rest, footer) = body.split_bottom(36);
    if state.modal.show_visit() {
        let visit = footer.place(Size::new(96, 32), Anchor::BottomCenter);
        push_button(tree, 22, visit, "VISIT", UiAction::VisitLink, Trigger::Release);
    }

    if let Some(image) = state.modal.current_image() {
        let (gallery, below) = rest.split_top(rest.h / 2);
        rest = below;
        let frame = gallery.inset(Insets::symmetric(44, 4));
        tree.push(ViewNode::Image(ImageNode {
            rect: frame,
            path: image.to_string(),
        }));
        let prev = gallery.place(Size::new(36, 36), Anchor::BottomLeft);
        let next = gallery.place(Size::new(36, 36), Anchor::BottomRight);
        push_button(tree, 23, prev, "<", UiAction::PrevImage, Trigger::Release);
        push_button(tree, 24, next, ">", UiAction::NextImage, Trigger::Release);
    }

    if let Some(text) = entry.body {
        let scale = 2;
        let mut y = rest.y + 8;
        for line in wrap_text(text, rest.w, scale) {
            if y + line_advance_y(scale) > rest.bottom() {
                break;
            }
            push_text(tree, (rest.x, y), &line, scale);
            y += line_advance_y(scale);
        }
    }
}

fn push_loading(tree: &mut ViewTree<UiAction>, state: &PortfolioState, screen: ui::Rect) {
    tree.push(ViewNode::Panel(PanelNode {
        rect: screen,
        color: [12, 12, 16, 255],
        alpha: 255,
        blocks_pointer: true,
    }));
    let center = screen.place(Size::new(200, 48), Anchor::Center);
    match state.lifecycle {
        Lifecycle::Ready => push_button(tree, 30, center, "ENTER", UiAction::Enter, Trigger::Release),
        _ => push_text(tree, (center.x, center.y + 16), state.loading.phrase(), 2),
    }
}
