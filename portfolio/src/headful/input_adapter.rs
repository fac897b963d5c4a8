use engine::app::InputFrame;
use engine::surface::SurfaceSize;
use glam::Vec2;
use winit::event::VirtualKeyCode;

use crate::input::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Move(Direction),
    Respawn,
}

pub fn map_key(key: VirtualKeyCode) -> Option<KeyCommand> {
    match key {
        VirtualKeyCode::W | VirtualKeyCode::Up => Some(KeyCommand::Move(Direction::Up)),
        VirtualKeyCode::S | VirtualKeyCode::Down => Some(KeyCommand::Move(Direction::Down)),
        VirtualKeyCode::A | VirtualKeyCode::Left => Some(KeyCommand::Move(Direction::Left)),
        VirtualKeyCode::D | VirtualKeyCode::Right => Some(KeyCommand::Move(Direction::Right)),
        VirtualKeyCode::R => Some(KeyCommand::Respawn),
        _ => None,
    }
}

/// Buffer pixel to NDC, sampling the pixel center.
pub fn pixel_to_ndc(size: SurfaceSize, (x, y): (u32, u32)) -> Vec2 {
    size.to_ndc(x as f32 + 0.5, y as f32 + 0.5)
}

/// Key presses and releases of this frame, mapped and in arrival order.
pub fn key_commands(input: &InputFrame) -> (Vec<KeyCommand>, Vec<Direction>) {
    let pressed = input.keys_pressed.iter().filter_map(|k| map_key(*k)).collect();
    let released = input
        .keys_released
        .iter()
        .filter_map(|k| match map_key(*k) {
            Some(KeyCommand::Move(dir)) => Some(dir),
            _ => None,
        })
        .collect();
    (pressed, released)
}
