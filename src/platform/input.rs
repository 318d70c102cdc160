//! Input mapping
//!
//! Keyboard and virtual joystick state, reduced to a grid-space direction.
//! The board is drawn isometrically, so "up" on screen is diagonal on the
//! grid; all mapping to grid axes happens here.

use glam::{IVec2, Vec2};

use crate::screen_to_grid;
use crate::sim::Direction;

/// A key the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Grid west
    Q,
    /// Grid north
    E,
    /// Grid south
    Z,
    /// Grid east
    C,
    Reset,
}

impl Key {
    pub const MOVEMENT: [Key; 8] = [
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Q,
        Key::E,
        Key::Z,
        Key::C,
    ];

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "w" | "W" | "ArrowUp" => Some(Key::Up),
            "s" | "S" | "ArrowDown" => Some(Key::Down),
            "a" | "A" | "ArrowLeft" => Some(Key::Left),
            "d" | "D" | "ArrowRight" => Some(Key::Right),
            "q" | "Q" => Some(Key::Q),
            "e" | "E" => Some(Key::E),
            "z" | "Z" => Some(Key::Z),
            "c" | "C" => Some(Key::C),
            " " => Some(Key::Reset),
            _ => None,
        }
    }

    /// Grid delta for a movement key
    pub fn grid_delta(self) -> IVec2 {
        match self {
            Key::Up => IVec2::new(-1, -1),
            Key::Down => IVec2::new(1, 1),
            Key::Left => IVec2::new(-1, 1),
            Key::Right => IVec2::new(1, -1),
            Key::Q => IVec2::new(-1, 0),
            Key::E => IVec2::new(0, -1),
            Key::Z => IVec2::new(0, 1),
            Key::C => IVec2::new(1, 0),
            Key::Reset => IVec2::ZERO,
        }
    }

    /// Single-step direction for discrete movement
    pub fn direction(self) -> Option<Direction> {
        Direction::from_vector(self.grid_delta().as_vec2())
    }
}

/// Held movement keys
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: Vec<Key>,
    direction: Vec2,
}

impl KeyboardState {
    pub fn key_down(&mut self, key: Key) {
        if key != Key::Reset && !self.held.contains(&key) {
            self.held.push(key);
            self.recompute();
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if let Some(i) = self.held.iter().position(|&k| k == key) {
            self.held.remove(i);
            self.recompute();
        }
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.direction = Vec2::ZERO;
    }

    /// Sum of held deltas, clamped to [-1, 1] per axis
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    fn recompute(&mut self) {
        let sum: IVec2 = self.held.iter().map(|k| k.grid_delta()).sum();
        self.direction = sum.clamp(IVec2::NEG_ONE, IVec2::ONE).as_vec2();
    }
}

/// Virtual joystick driven by pointer or touch
#[derive(Debug, Clone)]
pub struct Joystick {
    dead_zone: f32,
    /// Screen-space pointer offset from the stick centre while held
    offset: Option<Vec2>,
    direction: Vec2,
}

impl Joystick {
    pub fn new(dead_zone: f32) -> Self {
        Self {
            dead_zone,
            offset: None,
            direction: Vec2::ZERO,
        }
    }

    pub fn is_active(&self) -> bool {
        self.offset.is_some()
    }

    pub fn begin(&mut self, offset: Vec2) {
        self.offset = Some(offset);
        self.sample();
    }

    pub fn move_to(&mut self, offset: Vec2) {
        if self.offset.is_some() {
            self.offset = Some(offset);
        }
    }

    pub fn end(&mut self) {
        self.offset = None;
        self.direction = Vec2::ZERO;
    }

    /// Recompute the grid direction from the last pointer offset.
    ///
    /// Inside the dead zone the previous direction is kept.
    pub fn sample(&mut self) -> Vec2 {
        if let Some(offset) = self.offset {
            if offset.length() > self.dead_zone {
                self.direction = screen_to_grid(offset.normalize());
            }
        }
        self.direction
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }
}
