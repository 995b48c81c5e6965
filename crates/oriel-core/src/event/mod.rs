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

//! Event records and the rotating collector that buffers them between
//! application cycles.
//!
//! Windowing and input callbacks fire at arbitrary points outside the main
//! loop's control. The [`EventCollector`] decouples those producers from the
//! per-cycle consumer: any number of callbacks append typed records into the
//! currently active buffer slot, and once per cycle the consumer rotates to
//! a fresh slot and takes the previous generation, without ever copying
//! records out of the way of a writer.

mod chunked;
mod collector;
mod error;
mod record;
mod sequence;

pub use self::collector::{
    EventCollector, EventRecorder, FrameEvents, DEFAULT_QUIESCE_TIMEOUT, INPUT_CAPACITY,
    SLOT_COUNT, STATE_CHANGE_CAPACITY,
};
pub use self::error::DrainError;
pub use self::record::{
    modifiers, mouse_button, InputEvent, InputRecord, StateChangeEvent, StateChangeRecord,
};
