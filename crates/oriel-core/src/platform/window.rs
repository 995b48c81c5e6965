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

/// A trait that abstracts the behavior of a window.
///
/// Any windowing backend (winit, SDL2, GLFW, etc.) can implement this trait
/// to host the event-collection layer.
pub trait OrielWindow: Send + Sync {
    /// Returns the physical dimensions (width, height) of the window's inner area.
    fn inner_size(&self) -> (u32, u32);

    /// Returns the scale factor of the window.
    fn scale_factor(&self) -> f64;

    /// Requests that the window be redrawn.
    fn request_redraw(&self);

    /// Returns a stable, unique identifier for the window.
    fn id(&self) -> u64;
}
