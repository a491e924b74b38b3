//! Input events and the winit adapter
//!
//! The session only understands [`InputEvent`]s. [`PointerTracker`] turns raw
//! window input (pixel positions, buttons, wheel, touches) into them, keeping
//! the little state needed for that: the last cursor position, the pressed
//! button and the shift modifier.

use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};

/// Wheel units per scrolled line
const WHEEL_LINE_UNITS: f64 = 120.0;

/// Input understood by the viewer session
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown,
    PointerUp,
    /// Movement while pressed, in pixels
    PointerDrag { dx: f64, dy: f64 },
    /// Cursor position as a fraction of the viewport, origin top-left
    PointerMove { x_frac: f64, y_frac: f64 },
    /// Positive zooms in
    Zoom { delta: f64 },
    Click { modifier: bool },
    TouchStart,
    TouchEnd,
    Resize { width: u32, height: u32 },
    ToggleDataset { title: String, visible: bool },
    ToggleGrid(bool),
    /// Search an identifier and select the match
    Find(String),
}

/// Turns window input into [`InputEvent`]s
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    width: u32,
    height: u32,
    last_position: Option<(f64, f64)>,
    pressed: bool,
    shift: bool,
    touch_id: Option<u64>,
}

impl PointerTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn resized(&mut self, width: u32, height: u32) -> Vec<InputEvent> {
        self.width = width;
        self.height = height;
        vec![InputEvent::Resize { width, height }]
    }

    /// Cursor moved to a pixel position
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Vec<InputEvent> {
        let mut events = Vec::with_capacity(2);
        if self.pressed {
            if let Some((last_x, last_y)) = self.last_position {
                events.push(InputEvent::PointerDrag {
                    dx: x - last_x,
                    dy: y - last_y,
                });
            }
        }
        self.last_position = Some((x, y));
        events.extend(self.pointer_move(x, y));
        events
    }

    /// Primary button pressed or released
    pub fn button(&mut self, pressed: bool) -> Vec<InputEvent> {
        match (pressed, self.pressed) {
            (true, false) => {
                self.pressed = true;
                vec![InputEvent::PointerDown]
            }
            (false, true) => {
                self.pressed = false;
                vec![
                    InputEvent::PointerUp,
                    InputEvent::Click {
                        modifier: self.shift,
                    },
                ]
            }
            _ => Vec::new(),
        }
    }

    /// Vertical wheel movement in wheel units
    pub fn wheel(&mut self, delta: f64) -> Vec<InputEvent> {
        if delta == 0.0 {
            return Vec::new();
        }
        vec![InputEvent::Zoom { delta }]
    }

    pub fn set_shift(&mut self, shift: bool) {
        self.shift = shift;
    }

    /// A touch point changed; only the first finger down is followed
    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f64, y: f64) -> Vec<InputEvent> {
        match phase {
            TouchPhase::Started if self.touch_id.is_none() => {
                self.touch_id = Some(id);
                self.pressed = false;
                let mut events = self.cursor_moved(x, y);
                events.push(InputEvent::TouchStart);
                events.extend(self.button(true));
                events
            }
            TouchPhase::Moved if self.touch_id == Some(id) => self.cursor_moved(x, y),
            TouchPhase::Ended if self.touch_id == Some(id) => {
                self.touch_id = None;
                let mut events = vec![InputEvent::TouchEnd];
                events.extend(self.button(false));
                events
            }
            TouchPhase::Cancelled if self.touch_id == Some(id) => {
                self.touch_id = None;
                self.pressed = false;
                vec![InputEvent::TouchEnd, InputEvent::PointerUp]
            }
            _ => Vec::new(),
        }
    }

    fn pointer_move(&self, x: f64, y: f64) -> Option<InputEvent> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(InputEvent::PointerMove {
            x_frac: x / self.width as f64,
            y_frac: y / self.height as f64,
        })
    }
}

/// Map a winit window event to viewer input
pub fn translate_window_event(tracker: &mut PointerTracker, event: &WindowEvent) -> Vec<InputEvent> {
    match event {
        WindowEvent::Resized(size) => tracker.resized(size.width, size.height),
        WindowEvent::CursorMoved { position, .. } => tracker.cursor_moved(position.x, position.y),
        WindowEvent::MouseInput {
            state,
            button: MouseButton::Left,
            ..
        } => tracker.button(*state == ElementState::Pressed),
        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y as f64 * WHEEL_LINE_UNITS,
                MouseScrollDelta::PixelDelta(pos) => pos.y,
            };
            tracker.wheel(delta)
        }
        WindowEvent::ModifiersChanged(modifiers) => {
            tracker.set_shift(modifiers.state().shift_key());
            Vec::new()
        }
        WindowEvent::Touch(touch) => {
            tracker.touch(touch.id, touch.phase, touch.location.x, touch.location.y)
        }
        _ => Vec::new(),
    }
}
