use engine::surface::SurfaceSize;

use crate::animations::Animator;
use crate::input::{Direction, InputState};
use crate::lifecycle::{Lifecycle, LoadingTicker};
use crate::modal::ModalState;
use crate::movement::Player;
use crate::theme::Theme;

/// All mutable page state in one place.
#[derive(Debug)]
pub struct PortfolioState {
    pub input: InputState,
    pub modal: ModalState,
    pub theme: Theme,
    pub lifecycle: Lifecycle,
    pub loading: LoadingTicker,
    /// None when the scene has no character node.
    pub player: Option<Player>,
    /// Running timelines plus per-actor in-flight flags.
    pub animator: Animator,
    /// An interactable was under the pointer as of the last frame.
    pub hovered: bool,
    /// Direction held through an on-screen arrow, released with the pointer.
    pub mobile_held: Option<Direction>,
    pub viewport: SurfaceSize,
}

impl PortfolioState {
    pub fn new(viewport: SurfaceSize, player: Option<Player>) -> Self {
        Self {
            input: InputState::default(),
            modal: ModalState::default(),
            theme: Theme::default(),
            lifecycle: Lifecycle::Loading,
            loading: LoadingTicker::default(),
            player,
            animator: Animator::new(),
            hovered: false,
            mobile_held: None,
            viewport,
        }
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_open()
    }
}
