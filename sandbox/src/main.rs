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

// Oriel Sandbox
// Opens a window, pumps every callback into the event collector, and drains
// one generation per redraw cycle.

use anyhow::Result;
use oriel_core::event::EventCollector;
use oriel_core::platform::window::OrielWindow;
use oriel_infra::platform::input::WinitEventPump;
use oriel_infra::platform::window::{WinitWindow, WinitWindowBuilder};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

/// The application state driven by the winit event loop.
struct SandboxApp {
    window: Option<WinitWindow>,
    collector: EventCollector,
    pump: WinitEventPump,
    cycle: u64,
}

impl SandboxApp {
    fn new() -> Self {
        let collector = EventCollector::new();
        let pump = WinitEventPump::new(collector.recorder());
        Self {
            window: None,
            collector,
            pump,
            cycle: 0,
        }
    }

    /// Consumes one generation of buffered events. Called exactly once per
    /// redraw cycle.
    fn drain_cycle(&mut self) {
        self.cycle += 1;
        let cycle = self.cycle;

        let frame = match self.collector.drain() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("Event drain failed on cycle {cycle}: {e}");
                return;
            }
        };

        if frame.is_empty() {
            return;
        }

        log::debug!(
            "Cycle {cycle}: {} state-change, {} input event(s).",
            frame.state_change_count(),
            frame.input_count()
        );
        for record in frame.state_changes() {
            log::info!(" -> #{} {:?}", record.sequence, record.event);
        }
        for record in frame.inputs() {
            log::trace!(" -> #{} {:?}", record.sequence, record.event);
        }
    }

    fn is_own_window(&self, id: WindowId) -> bool {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        self.window
            .as_ref()
            .is_some_and(|window| window.id() == hasher.finish())
    }
}

impl ApplicationHandler for SandboxApp {
    /// Called when the event loop is ready to start processing events.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Avoid re-initializing if the app is resumed multiple times.
        }

        let window = WinitWindowBuilder::new()
            .with_title("Oriel Sandbox")
            .with_dimensions(1024, 768)
            .build(event_loop)
            .unwrap();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if !self.is_own_window(id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Shutdown requested, exiting event loop...");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.drain_cycle();
            }
            other => self.pump.handle_window_event(&other),
        }
    }

    /// Requests a redraw once all pending events are processed, so the
    /// drain above runs continuously, one generation per cycle.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new()?;
    let mut app = SandboxApp::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
