pub mod app;
pub mod audio;
pub mod browser;
pub mod input_adapter;
