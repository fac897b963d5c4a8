pub mod app;
pub mod audio;
pub mod camera;
pub mod collision;
pub mod graphics;
pub mod pixels_renderer;
pub mod raycast;
pub mod regression;
pub mod scene;
pub mod surface;
pub mod tween;
pub mod ui;
pub mod view_tree;
