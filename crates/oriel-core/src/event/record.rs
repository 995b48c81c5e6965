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

//! The event record model: two closed families of plain-data events.
//!
//! Every variant carries only integers, doubles and booleans, so a record is
//! fixed-size, `Copy`, and independently interpretable without consulting
//! any mutable external state. Payload decoding (key codes, coordinates,
//! modifier bits) is the responsibility of the platform adapter that
//! produces the events.

use serde::{Deserialize, Serialize};

/// Modifier-key bits carried by keyboard and mouse-button records.
pub mod modifiers {
    /// A shift key was held.
    pub const SHIFT: u32 = 1 << 0;
    /// A control key was held.
    pub const CONTROL: u32 = 1 << 1;
    /// An alt key was held.
    pub const ALT: u32 = 1 << 2;
    /// A platform "super" (logo) key was held.
    pub const SUPER: u32 = 1 << 3;
}

/// Conventional desktop mouse-button codes.
pub mod mouse_button {
    /// The left mouse button.
    pub const LEFT: i32 = 0;
    /// The right mouse button.
    pub const RIGHT: i32 = 1;
    /// The middle mouse button.
    pub const MIDDLE: i32 = 2;
    /// The back side button.
    pub const BACK: i32 = 3;
    /// The forward side button.
    pub const FORWARD: i32 = 4;
}

/// A change in window or monitor state observed by the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum StateChangeEvent {
    /// Sentinel used to pre-fill slot storage; never produced by a backend.
    #[default]
    NoEvent,
    /// The window was moved to a new position, in screen coordinates.
    WindowMoved {
        /// New x position of the window's upper-left corner.
        x: i32,
        /// New y position of the window's upper-left corner.
        y: i32,
    },
    /// The window contents were damaged and need to be redrawn.
    WindowRefreshRequired,
    /// The window's inner area was resized.
    WindowResized {
        /// New width of the inner area.
        width: i32,
        /// New height of the inner area.
        height: i32,
    },
    /// The window's framebuffer was resized, in pixels.
    FramebufferResized {
        /// New framebuffer width in pixels.
        width: i32,
        /// New framebuffer height in pixels.
        height: i32,
    },
    /// The window gained or lost input focus.
    WindowFocusChanged {
        /// `true` when focus was gained.
        focused: bool,
    },
    /// A joystick was connected to or disconnected from the system.
    JoystickConnectionChanged {
        /// Backend-assigned joystick identifier.
        joystick_id: i32,
        /// `true` when the joystick was connected.
        connected: bool,
    },
}

/// A user-input event observed by the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum InputEvent {
    /// Sentinel used to pre-fill slot storage; never produced by a backend.
    #[default]
    NullEvent,
    /// A keyboard key was pressed.
    KeyPressed {
        /// Conventional desktop key code (letters are ASCII uppercase).
        key: i32,
        /// Modifier bits from [`modifiers`] held at the time.
        modifiers: u32,
    },
    /// A keyboard key was released.
    KeyReleased {
        /// Conventional desktop key code.
        key: i32,
        /// Modifier bits held at the time.
        modifiers: u32,
    },
    /// A held key produced an auto-repeat.
    KeyRepeated {
        /// Conventional desktop key code.
        key: i32,
        /// Modifier bits held at the time.
        modifiers: u32,
    },
    /// A mouse button was pressed or released.
    MouseButtonChanged {
        /// Button code from [`mouse_button`].
        button: i32,
        /// `true` when the button was pressed.
        pressed: bool,
        /// Modifier bits held at the time.
        modifiers: u32,
    },
    /// The mouse wheel or trackpad was scrolled.
    MouseScrolled {
        /// Horizontal scroll delta.
        delta_x: f64,
        /// Vertical scroll delta.
        delta_y: f64,
    },
    /// The cursor entered or left the window's inner area.
    CursorEnteredOrLeft {
        /// `true` when the cursor entered.
        entered: bool,
    },
    /// The cursor moved within the window's inner area.
    CursorMoved {
        /// New cursor x position.
        x: f64,
        /// New cursor y position.
        y: f64,
    },
    /// One or more files were dropped onto the window.
    FilesDropped {
        /// Number of files dropped.
        count: u32,
    },
}

/// A state-change event stamped with its creation-order sequence number.
///
/// Sequence 0 is reserved for the storage sentinel; real records start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StateChangeRecord {
    /// Globally unique, monotonically assigned creation-order number,
    /// shared with the input-record family.
    pub sequence: u64,
    /// The recorded event.
    pub event: StateChangeEvent,
}

/// An input event stamped with its creation-order sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputRecord {
    /// Globally unique, monotonically assigned creation-order number,
    /// shared with the state-change family.
    pub sequence: u64,
    /// The recorded event.
    pub event: InputEvent,
}
