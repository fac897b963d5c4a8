pub mod animations;
pub mod content;
pub mod error;
pub mod headful;
pub mod input;
pub mod interaction;
pub mod lifecycle;
pub mod modal;
pub mod movement;
pub mod picking;
pub mod portfolio;
pub mod render;
pub mod settings;
pub mod sfx;
pub mod state;
pub mod theme;
pub mod view_tree;
