// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides translation from a concrete windowing backend (`winit`) to
//! Oriel's event records.
//!
//! This module acts as an adapter layer, decoupling the collector from the
//! specific event format of the `winit` crate. Translated payloads carry
//! only plain data (conventional desktop key and button codes, modifier
//! bits, coordinates), so nothing from the backend is retained after a
//! callback returns.

use oriel_core::event::{modifiers, mouse_button, EventRecorder, InputEvent, StateChangeEvent};
use winit::event::{
    ElementState, Modifiers, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent,
};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Bridges `winit` window events into an [`EventRecorder`].
///
/// Keeps the current keyboard modifier state, which winit reports as a
/// separate event rather than attaching it to each key or button event.
/// Feed it every window event not consumed by the application shell.
#[derive(Debug)]
pub struct WinitEventPump {
    recorder: EventRecorder,
    modifiers: u32,
}

impl WinitEventPump {
    /// Creates a pump that records into `recorder`.
    pub fn new(recorder: EventRecorder) -> Self {
        Self {
            recorder,
            modifiers: 0,
        }
    }

    /// Records whatever `event` translates to, if anything.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::ModifiersChanged(state) => {
                self.modifiers = map_modifiers(state);
            }
            WindowEvent::Resized(size) => {
                // winit reports physical pixels, so window and framebuffer
                // sizes coincide; both records are still carried, as the
                // callback layer always has.
                self.recorder
                    .record_state_change(StateChangeEvent::WindowResized {
                        width: size.width as i32,
                        height: size.height as i32,
                    });
                self.recorder
                    .record_state_change(StateChangeEvent::FramebufferResized {
                        width: size.width as i32,
                        height: size.height as i32,
                    });
            }
            _ => {
                if let Some(state_change) = translate_state_change(event) {
                    self.recorder.record_state_change(state_change);
                } else if let Some(input) = translate_input(event, self.modifiers) {
                    self.recorder.record_input(input);
                }
            }
        }
    }
}

/// Translates a `winit::event::WindowEvent` into a window state-change
/// event, or `None` for events that are not state changes.
pub fn translate_state_change(event: &WindowEvent) -> Option<StateChangeEvent> {
    match event {
        WindowEvent::Moved(position) => Some(StateChangeEvent::WindowMoved {
            x: position.x,
            y: position.y,
        }),
        WindowEvent::Resized(size) => Some(StateChangeEvent::WindowResized {
            width: size.width as i32,
            height: size.height as i32,
        }),
        WindowEvent::Focused(focused) => Some(StateChangeEvent::WindowFocusChanged {
            focused: *focused,
        }),
        // Becoming un-occluded is the closest winit gets to a damage event.
        WindowEvent::Occluded(false) => Some(StateChangeEvent::WindowRefreshRequired),
        _ => None,
    }
}

/// Translates a `winit::event::WindowEvent` into a user-input event.
///
/// # Arguments
///
/// * `event`: A reference to a `WindowEvent` from the `winit` library.
/// * `mods`: The currently held modifier bits, tracked by the caller.
///
/// # Returns
///
/// Returns `Some(InputEvent)` if the event is a recognized input action, or
/// `None` otherwise.
pub fn translate_input(event: &WindowEvent, mods: u32) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput {
            event: key_event, ..
        } => {
            if let PhysicalKey::Code(keycode) = key_event.physical_key {
                let key = map_keycode(keycode);
                match key_event.state {
                    ElementState::Pressed if key_event.repeat => Some(InputEvent::KeyRepeated {
                        key,
                        modifiers: mods,
                    }),
                    ElementState::Pressed => Some(InputEvent::KeyPressed {
                        key,
                        modifiers: mods,
                    }),
                    ElementState::Released => Some(InputEvent::KeyReleased {
                        key,
                        modifiers: mods,
                    }),
                }
            } else {
                None
            }
        }
        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButtonChanged {
            button: map_mouse_button(*button),
            pressed: *state == ElementState::Pressed,
            modifiers: mods,
        }),
        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy): (f64, f64) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x as f64, *y as f64),
                MouseScrollDelta::PixelDelta(pos) => (pos.x, pos.y),
            };
            if dx != 0.0 || dy != 0.0 {
                Some(InputEvent::MouseScrolled {
                    delta_x: dx,
                    delta_y: dy,
                })
            } else {
                None
            }
        }
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
            x: position.x,
            y: position.y,
        }),
        WindowEvent::CursorEntered { .. } => {
            Some(InputEvent::CursorEnteredOrLeft { entered: true })
        }
        WindowEvent::CursorLeft { .. } => Some(InputEvent::CursorEnteredOrLeft { entered: false }),
        // winit delivers one event per dropped file.
        WindowEvent::DroppedFile(_) => Some(InputEvent::FilesDropped { count: 1 }),
        _ => None,
    }
}

// --- Private Helper Functions ---

/// (Internal) Collapses winit's modifier state into Oriel's modifier bits.
fn map_modifiers(state: &Modifiers) -> u32 {
    let state = state.state();
    let mut bits = 0;
    if state.shift_key() {
        bits |= modifiers::SHIFT;
    }
    if state.control_key() {
        bits |= modifiers::CONTROL;
    }
    if state.alt_key() {
        bits |= modifiers::ALT;
    }
    if state.super_key() {
        bits |= modifiers::SUPER;
    }
    bits
}

/// (Internal) Maps a `winit::event::MouseButton` to a conventional button code.
fn map_mouse_button(button: WinitMouseButton) -> i32 {
    match button {
        WinitMouseButton::Left => mouse_button::LEFT,
        WinitMouseButton::Right => mouse_button::RIGHT,
        WinitMouseButton::Middle => mouse_button::MIDDLE,
        WinitMouseButton::Back => mouse_button::BACK,
        WinitMouseButton::Forward => mouse_button::FORWARD,
        WinitMouseButton::Other(id) => id as i32,
    }
}

/// (Internal) Maps a `winit::keyboard::KeyCode` to a conventional desktop
/// key code. Letters are ASCII uppercase, digits ASCII, and function and
/// navigation keys use the common 256+ range; unmapped keys yield -1.
fn map_keycode(keycode: KeyCode) -> i32 {
    match keycode {
        KeyCode::Space => 32,
        KeyCode::Quote => 39,
        KeyCode::Comma => 44,
        KeyCode::Minus => 45,
        KeyCode::Period => 46,
        KeyCode::Slash => 47,
        KeyCode::Digit0 => 48,
        KeyCode::Digit1 => 49,
        KeyCode::Digit2 => 50,
        KeyCode::Digit3 => 51,
        KeyCode::Digit4 => 52,
        KeyCode::Digit5 => 53,
        KeyCode::Digit6 => 54,
        KeyCode::Digit7 => 55,
        KeyCode::Digit8 => 56,
        KeyCode::Digit9 => 57,
        KeyCode::Semicolon => 59,
        KeyCode::Equal => 61,
        KeyCode::KeyA => 65,
        KeyCode::KeyB => 66,
        KeyCode::KeyC => 67,
        KeyCode::KeyD => 68,
        KeyCode::KeyE => 69,
        KeyCode::KeyF => 70,
        KeyCode::KeyG => 71,
        KeyCode::KeyH => 72,
        KeyCode::KeyI => 73,
        KeyCode::KeyJ => 74,
        KeyCode::KeyK => 75,
        KeyCode::KeyL => 76,
        KeyCode::KeyM => 77,
        KeyCode::KeyN => 78,
        KeyCode::KeyO => 79,
        KeyCode::KeyP => 80,
        KeyCode::KeyQ => 81,
        KeyCode::KeyR => 82,
        KeyCode::KeyS => 83,
        KeyCode::KeyT => 84,
        KeyCode::KeyU => 85,
        KeyCode::KeyV => 86,
        KeyCode::KeyW => 87,
        KeyCode::KeyX => 88,
        KeyCode::KeyY => 89,
        KeyCode::KeyZ => 90,
        KeyCode::BracketLeft => 91,
        KeyCode::Backslash => 92,
        KeyCode::BracketRight => 93,
        KeyCode::Backquote => 96,
        KeyCode::Escape => 256,
        KeyCode::Enter => 257,
        KeyCode::Tab => 258,
        KeyCode::Backspace => 259,
        KeyCode::Insert => 260,
        KeyCode::Delete => 261,
        KeyCode::ArrowRight => 262,
        KeyCode::ArrowLeft => 263,
        KeyCode::ArrowDown => 264,
        KeyCode::ArrowUp => 265,
        KeyCode::PageUp => 266,
        KeyCode::PageDown => 267,
        KeyCode::Home => 268,
        KeyCode::End => 269,
        KeyCode::CapsLock => 280,
        KeyCode::ScrollLock => 281,
        KeyCode::NumLock => 282,
        KeyCode::PrintScreen => 283,
        KeyCode::Pause => 284,
        KeyCode::F1 => 290,
        KeyCode::F2 => 291,
        KeyCode::F3 => 292,
        KeyCode::F4 => 293,
        KeyCode::F5 => 294,
        KeyCode::F6 => 295,
        KeyCode::F7 => 296,
        KeyCode::F8 => 297,
        KeyCode::F9 => 298,
        KeyCode::F10 => 299,
        KeyCode::F11 => 300,
        KeyCode::F12 => 301,
        KeyCode::ShiftLeft => 340,
        KeyCode::ControlLeft => 341,
        KeyCode::AltLeft => 342,
        KeyCode::SuperLeft => 343,
        KeyCode::ShiftRight => 344,
        KeyCode::ControlRight => 345,
        KeyCode::AltRight => 346,
        KeyCode::SuperRight => 347,
        _ => -1,
    }
}
