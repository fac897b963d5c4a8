use std::collections::HashSet;
use std::time::{Duration, Instant};

use pixels::{PixelsBuilder, SurfaceTexture};
use thiserror::Error;
use winit::dpi::PhysicalSize;
use winit::event::{
    ElementState, Event, KeyboardInput, MouseButton, MouseScrollDelta, Touch, TouchPhase,
    VirtualKeyCode, WindowEvent,
};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{CursorIcon, Window, WindowBuilder};

use crate::graphics::Renderer2d;
use crate::pixels_renderer::PixelsRenderer2d;
use crate::surface::SurfaceSize;
use crate::view_tree::{ViewTree, UiInput, blocks_pointer, hit_test_actions};

/// Pointer travel (window pixels) after which a left press becomes a drag instead of a click.
pub const DRAG_THRESHOLD_PX: f64 = 4.0;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to initialise the pixel surface: {0}")]
    Pixels(#[from] pixels::Error),
}

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub clamp_to_monitor: bool,
    pub vsync: Option<bool>,
    /// Fraction of the window resolution the CPU painter renders at.
    pub render_scale: f32,
}

pub struct AppContext {
    pub window: Window,
    pub renderer: PixelsRenderer2d,
    pub surface_size: SurfaceSize,
}

impl AppContext {
    /// Size of the frame game code draws into (and of pointer coordinates).
    pub fn buffer_size(&self) -> SurfaceSize {
        self.renderer.buffer_size()
    }

    pub fn set_pointer_cursor(&self, pointer: bool) {
        self.window.set_cursor_icon(if pointer {
            CursorIcon::Hand
        } else {
            CursorIcon::Default
        });
    }
}

/// Everything that happened since the previous frame. Positions are in buffer pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    pub mouse_pos: Option<(u32, u32)>,
    pub mouse_down: bool,
    pub mouse_up: bool,
    /// Left press and release without crossing the drag threshold.
    pub click: Option<(u32, u32)>,
    pub cursor_moved: bool,
    /// Left-button (or single touch) drag travel this frame.
    pub drag_delta: (f32, f32),
    /// Right-button drag travel this frame.
    pub pan_delta: (f32, f32),
    /// Wheel steps; positive is away from the user.
    pub wheel: f32,
    pub touch_end: Option<(u32, u32)>,
    pub keys_pressed: Vec<VirtualKeyCode>,
    pub keys_released: Vec<VirtualKeyCode>,
    pub focus_lost: bool,
    pub resized: Option<SurfaceSize>,
    /// The overlay owns the pointer position (buttons, modal panels).
    pub pointer_over_ui: bool,
}

impl InputFrame {
    fn end_frame(&mut self) {
        let mouse_pos = self.mouse_pos;
        *self = Self {
            mouse_pos,
            ..Self::default()
        };
    }
}

pub trait GameApp {
    type State;
    type Action: Clone;
    type Effect;

    fn init_state(&mut self, ctx: &mut AppContext) -> Self::State;

    fn build_view(&self, state: &Self::State, ctx: &AppContext) -> ViewTree<Self::Action>;

    fn update_state(
        &mut self,
        state: &mut Self::State,
        input: &InputFrame,
        dt: Duration,
        actions: &[Self::Action],
        ctx: &mut AppContext,
    ) -> Vec<Self::Effect>;

    fn render(
        &mut self,
        state: &Self::State,
        view: &ViewTree<Self::Action>,
        renderer: &mut dyn Renderer2d,
    );

    fn handle_effects(&mut self, _effects: Vec<Self::Effect>, _ctx: &mut AppContext) {}
}

#[derive(Debug, Default)]
struct PointerTracker {
    window_pos: Option<(f64, f64)>,
    left_press: Option<(f64, f64)>,
    dragging: bool,
    right_held: bool,
    touch_id: Option<u64>,
}

impl PointerTracker {
    fn moved(&mut self, x: f64, y: f64, scale: f32) -> ((f32, f32), (f32, f32)) {
        let (dx, dy) = match self.window_pos {
            Some((px, py)) => (((x - px) as f32) * scale, ((y - py) as f32) * scale),
            None => (0.0, 0.0),
        };
        self.window_pos = Some((x, y));
        let mut drag = (0.0, 0.0);
        let mut pan = (0.0, 0.0);
        if let Some((sx, sy)) = self.left_press {
            if !self.dragging && ((x - sx).powi(2) + (y - sy).powi(2)).sqrt() > DRAG_THRESHOLD_PX {
                self.dragging = true;
            }
            if self.dragging {
                drag = (dx, dy);
            }
        }
        if self.right_held {
            pan = (dx, dy);
        }
        (drag, pan)
    }
}

pub fn run_game<G: GameApp + 'static>(config: AppConfig, mut game: G) -> Result<(), AppError> {
    let event_loop = EventLoop::new();
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = if let Some(monitor) = monitor_size {
        PhysicalSize::new(
            config.desired_size.width.min(monitor.width),
            config.desired_size.height.min(monitor.height),
        )
    } else {
        config.desired_size
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width.max(1), window_size.height.max(1));

    let pixels = {
        let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
        let mut builder = PixelsBuilder::new(surface_size.width, surface_size.height, surface_texture);
        if let Some(vsync) = config.vsync {
            builder = builder.enable_vsync(vsync);
        }
        builder.build()?
    };
    let renderer = PixelsRenderer2d::new(pixels, surface_size, config.render_scale)?;
    let render_scale = renderer.buffer_size().width as f32 / surface_size.width as f32;
    log::info!(
        "window {}x{}, painting at {}x{}",
        surface_size.width,
        surface_size.height,
        renderer.buffer_size().width,
        renderer.buffer_size().height
    );

    let mut ctx = AppContext {
        window,
        renderer,
        surface_size,
    };
    let mut state = game.init_state(&mut ctx);
    let mut input = InputFrame::default();
    let mut pointer = PointerTracker::default();
    let mut keys_down: HashSet<VirtualKeyCode> = HashSet::new();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    let new_size = SurfaceSize::new(size.width, size.height);
                    if new_size.is_empty() {
                        return;
                    }
                    ctx.surface_size = new_size;
                    if let Err(err) = ctx.renderer.resize(new_size) {
                        log::error!("resize failed: {err}");
                    }
                    input.resized = Some(ctx.buffer_size());
                    ctx.window.request_redraw();
                }
                WindowEvent::Focused(false) => {
                    input.focus_lost = true;
                    keys_down.clear();
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(key),
                            state: key_state,
                            ..
                        },
                    ..
                } => match key_state {
                    // Auto-repeat arrives as repeated presses; only the first counts.
                    ElementState::Pressed => {
                        if keys_down.insert(*key) {
                            input.keys_pressed.push(*key);
                        }
                    }
                    ElementState::Released => {
                        keys_down.remove(key);
                        input.keys_released.push(*key);
                    }
                },
                WindowEvent::CursorMoved { position, .. } => {
                    let (drag, pan) = pointer.moved(position.x, position.y, render_scale);
                    input.drag_delta.0 += drag.0;
                    input.drag_delta.1 += drag.1;
                    input.pan_delta.0 += pan.0;
                    input.pan_delta.1 += pan.1;
                    input.mouse_pos = Some(ctx.renderer.window_to_buffer(position.x, position.y));
                    input.cursor_moved = true;
                }
                WindowEvent::MouseInput {
                    state: mouse_state,
                    button,
                    ..
                } => match (button, mouse_state) {
                    (MouseButton::Left, ElementState::Pressed) => {
                        input.mouse_down = true;
                        pointer.left_press = pointer.window_pos;
                        pointer.dragging = false;
                    }
                    (MouseButton::Left, ElementState::Released) => {
                        input.mouse_up = true;
                        if pointer.left_press.take().is_some() && !pointer.dragging {
                            input.click = input.mouse_pos;
                        }
                        pointer.dragging = false;
                    }
                    (MouseButton::Right, ElementState::Pressed) => pointer.right_held = true,
                    (MouseButton::Right, ElementState::Released) => pointer.right_held = false,
                    _ => {}
                },
                WindowEvent::MouseWheel { delta, .. } => {
                    input.wheel += match delta {
                        MouseScrollDelta::LineDelta(_, y) => *y,
                        MouseScrollDelta::PixelDelta(p) => (p.y / 50.0) as f32,
                    };
                }
                WindowEvent::Touch(Touch {
                    phase, location, id, ..
                }) => {
                    let pos = ctx.renderer.window_to_buffer(location.x, location.y);
                    match phase {
                        TouchPhase::Started => {
                            if pointer.touch_id.is_none() {
                                pointer.touch_id = Some(*id);
                                pointer.window_pos = Some((location.x, location.y));
                                pointer.left_press = Some((location.x, location.y));
                                pointer.dragging = false;
                                input.mouse_pos = Some(pos);
                                input.mouse_down = true;
                            }
                        }
                        TouchPhase::Moved => {
                            if pointer.touch_id == Some(*id) {
                                let (drag, _) = pointer.moved(location.x, location.y, render_scale);
                                input.drag_delta.0 += drag.0;
                                input.drag_delta.1 += drag.1;
                                input.mouse_pos = Some(pos);
                            }
                        }
                        TouchPhase::Ended | TouchPhase::Cancelled => {
                            if pointer.touch_id == Some(*id) {
                                pointer.touch_id = None;
                                pointer.left_press = None;
                                input.mouse_pos = Some(pos);
                                input.mouse_up = true;
                                if *phase == TouchPhase::Ended && !pointer.dragging {
                                    input.touch_end = Some(pos);
                                }
                                pointer.dragging = false;
                            }
                        }
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                let view_for_input = game.build_view(&state, &ctx);
                input.pointer_over_ui = input
                    .mouse_pos
                    .is_some_and(|pos| blocks_pointer(&view_for_input, pos));
                let actions = hit_test_actions(
                    &view_for_input,
                    UiInput {
                        mouse_pos: input.mouse_pos,
                        mouse_down: input.mouse_down,
                        mouse_up: input.mouse_up,
                    },
                );
                let effects = game.update_state(&mut state, &input, dt, &actions, &mut ctx);

                let view_for_render = game.build_view(&state, &ctx);
                ctx.renderer.draw_frame(|gfx| {
                    game.render(&state, &view_for_render, gfx);
                });
                if let Err(err) = ctx.renderer.present() {
                    log::error!("present failed: {err}");
                    *control_flow = ControlFlow::Exit;
                }

                game.handle_effects(effects, &mut ctx);
                input.end_frame();
            }
            Event::MainEventsCleared => {
                ctx.window.request_redraw();
            }
            _ => {}
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_motion_is_not_a_drag() {
        let mut p = PointerTracker::default();
        p.moved(10.0, 10.0, 1.0);
        p.left_press = Some((10.0, 10.0));
        let (drag, _) = p.moved(12.0, 11.0, 1.0);
        assert_eq!(drag, (0.0, 0.0));
        assert!(!p.dragging);
    }

    #[test]
    fn crossing_threshold_starts_drag_and_reports_delta() {
        let mut p = PointerTracker::default();
        p.moved(10.0, 10.0, 1.0);
        p.left_press = Some((10.0, 10.0));
        let (drag, _) = p.moved(20.0, 10.0, 0.5);
        assert!(p.dragging);
        assert_eq!(drag, (5.0, 0.0));
    }

    #[test]
    fn right_button_pans() {
        let mut p = PointerTracker::default();
        p.moved(0.0, 0.0, 1.0);
        p.right_held = true;
        let (drag, pan) = p.moved(3.0, -2.0, 1.0);
        assert_eq!(drag, (0.0, 0.0));
        assert_eq!(pan, (3.0, -2.0));
    }

    #[test]
    fn end_frame_keeps_only_pointer_position() {
        let mut input = InputFrame {
            mouse_pos: Some((4, 5)),
            mouse_up: true,
            wheel: 2.0,
            keys_pressed: vec![VirtualKeyCode::W],
            ..InputFrame::default()
        };
        input.end_frame();
        assert_eq!(
            input,
            InputFrame {
                mouse_pos: Some((4, 5)),
                ..InputFrame::default()
            }
        );
    }
}
