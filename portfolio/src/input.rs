use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed processing order for simultaneous keys; later entries win the facing.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Held directions and the last pointer position, fed by keyboard, mouse and touch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Last pointer position in NDC.
    pub pointer: Vec2,
    /// Set by a touch tap; the click that may follow it is swallowed.
    pub touch_happened: bool,
}

impl InputState {
    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn any_held(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn held(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.is_held(*d))
    }

    /// Focus loss: nothing stays held.
    pub fn release_all(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
    }

    pub fn pointer_moved(&mut self, ndc: Vec2) {
        self.pointer = ndc;
        self.touch_happened = false;
    }

    pub fn touch_ended(&mut self, ndc: Vec2) {
        self.pointer = ndc;
        self.touch_happened = true;
    }

    /// Whether a mouse click should reach the scene.
    pub fn accepts_click(&self) -> bool {
        !self.touch_happened
    }
}
