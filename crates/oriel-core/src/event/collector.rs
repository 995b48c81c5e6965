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

//! The rotating event collector.
//!
//! The [`EventCollector`] owns a fixed pool of buffer slots and cycles
//! through them, one rotation per application cycle. Callbacks append into
//! whichever slot is active at the moment of the call; the consumer's
//! [`drain()`](EventCollector::drain) advances the active index and takes
//! the previous generation once its writers have finished.
//!
//! # Architecture
//!
//! ```text
//! Cycle N:     [Slot 0: writers append] ← callbacks record here
//! Cycle N+1:   [Slot 1: writers append]   [Slot 0: consumer reads]
//! Cycle N+2:   [Slot 2: writers append]   [Slot 1: consumer reads]
//! Cycle N+3:   [Slot 0: writers append]   (slot 0 was reset first)
//! ```
//!
//! With three slots a handed-out generation is not reactivated until one
//! other slot has completed a full cycle, so the consumer always has a full
//! rotation of grace to finish reading before the storage is reused.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::event::chunked::AppendLog;
use crate::event::error::DrainError;
use crate::event::record::{InputEvent, InputRecord, StateChangeEvent, StateChangeRecord};
use crate::event::sequence::SequenceCounter;

/// Number of slots in the rotation.
pub const SLOT_COUNT: usize = 3;

/// Initial per-slot capacity for state-change records.
pub const STATE_CHANGE_CAPACITY: usize = 128;

/// Initial per-slot capacity for input records.
pub const INPUT_CAPACITY: usize = 1024;

/// Default bound on the wait for a retiring slot's writers to finish.
///
/// The guarded region is a handful of field writes, so a wait anywhere near
/// this long means a wedged writer rather than contention.
pub const DEFAULT_QUIESCE_TIMEOUT: Duration = Duration::from_millis(100);

/// Spins with a CPU hint this many times before falling back to yielding.
const SPIN_LIMIT: u32 = 128;

/// One generation's worth of storage plus its writer bookkeeping.
#[derive(Debug)]
struct EventSlot {
    state_changes: AppendLog<StateChangeRecord>,
    inputs: AppendLog<InputRecord>,
    /// Writers currently between registration and completed append.
    in_flight: AtomicUsize,
}

impl EventSlot {
    fn new() -> Self {
        Self {
            state_changes: AppendLog::with_capacity(STATE_CHANGE_CAPACITY),
            inputs: AppendLog::with_capacity(INPUT_CAPACITY),
            in_flight: AtomicUsize::new(0),
        }
    }
}

/// State shared between the consumer end and every recorder handle.
#[derive(Debug)]
struct CollectorCore {
    slots: [EventSlot; SLOT_COUNT],
    /// Index of the slot currently accepting appends. Stored only by the
    /// consumer's rotation; re-read by writers on every append.
    active: AtomicUsize,
    sequence: SequenceCounter,
    /// Best-effort count of records since the last drain.
    pending: AtomicUsize,
}

impl CollectorCore {
    fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| EventSlot::new()),
            active: AtomicUsize::new(0),
            sequence: SequenceCounter::new(),
            pending: AtomicUsize::new(0),
        }
    }

    /// Registers the caller as an in-flight writer on the active slot and
    /// returns that slot's index.
    ///
    /// Slot selection and registration must act as one atomic step, so the
    /// increment is validated by re-reading the active index: a writer that
    /// observes a rotation in between backs out without having touched the
    /// slot's data. The rotation store and all three accesses here are
    /// `SeqCst`; in that total order a successfully validated registration
    /// precedes the rotation, which in turn precedes the rotation's first
    /// look at the in-flight counter, so a validated writer is always
    /// waited on.
    fn begin_append(&self) -> usize {
        loop {
            let slot = self.active.load(Ordering::SeqCst);
            self.slots[slot].in_flight.fetch_add(1, Ordering::SeqCst);
            if self.active.load(Ordering::SeqCst) == slot {
                return slot;
            }
            // Lost a race with a rotation. The increment never guarded a
            // write, so undo it and re-register on the new active slot.
            self.slots[slot].in_flight.fetch_sub(1, Ordering::Release);
        }
    }

    #[inline]
    fn finish_append(&self, slot: usize) {
        self.slots[slot].in_flight.fetch_sub(1, Ordering::Release);
    }

    fn record_state_change(&self, event: StateChangeEvent) {
        let slot = self.begin_append();
        let sequence = self.sequence.claim();
        self.pending.fetch_add(1, Ordering::Relaxed);
        self.slots[slot]
            .state_changes
            .push(StateChangeRecord { sequence, event });
        self.finish_append(slot);
    }

    fn record_input(&self, event: InputEvent) {
        let slot = self.begin_append();
        let sequence = self.sequence.claim();
        self.pending.fetch_add(1, Ordering::Relaxed);
        self.slots[slot].inputs.push(InputRecord { sequence, event });
        self.finish_append(slot);
    }

    /// Waits for every writer registered on `slot` to finish.
    fn wait_quiescent(&self, slot: usize, timeout: Duration) -> Result<(), DrainError> {
        let in_flight = &self.slots[slot].in_flight;
        let started = Instant::now();
        let mut spins = 0u32;

        loop {
            let writers = in_flight.load(Ordering::SeqCst);
            if writers == 0 {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(DrainError::QuiesceTimeout {
                    slot,
                    writers,
                    waited: timeout,
                });
            }
            if spins < SPIN_LIMIT {
                spins += 1;
                std::hint::spin_loop();
            } else {
                std::thread::yield_now();
            }
        }
    }
}

/// Collects window state-change and input events from any number of
/// concurrent producers and hands them to a single per-cycle consumer.
///
/// The collector is the consumer end: it is deliberately not `Clone`, and
/// [`drain()`](Self::drain) takes `&mut self`, so the single-consumer
/// discipline is enforced by the type system rather than left to callers.
/// Producers record through cheap [`EventRecorder`] handles (or directly
/// through the collector's own record methods).
#[derive(Debug)]
pub struct EventCollector {
    core: Arc<CollectorCore>,
}

impl EventCollector {
    /// Creates a collector with all slots pre-sized to their initial
    /// capacities, so steady-state recording never allocates.
    pub fn new() -> Self {
        log::info!(
            "EventCollector initialized ({SLOT_COUNT} slots, {STATE_CHANGE_CAPACITY}+{INPUT_CAPACITY} records pre-sized per slot)."
        );
        Self {
            core: Arc::new(CollectorCore::new()),
        }
    }

    /// Returns a clonable producer handle for the callback layer.
    ///
    /// ## Returns
    /// A thread-safe handle that records into this collector's active slot.
    pub fn recorder(&self) -> EventRecorder {
        EventRecorder {
            core: Arc::clone(&self.core),
        }
    }

    /// Appends a state-change record to the currently active slot.
    ///
    /// Safe to call concurrently with any number of other appends and with
    /// a drain in progress; never blocks beyond the cost of a few atomic
    /// operations.
    pub fn record_state_change(&self, event: StateChangeEvent) {
        self.core.record_state_change(event);
    }

    /// Appends an input record to the currently active slot.
    ///
    /// Same contract as [`record_state_change`](Self::record_state_change).
    pub fn record_input(&self, event: InputEvent) {
        self.core.record_input(event);
    }

    /// Best-effort number of records since the last drain.
    ///
    /// Reads a separately tracked counter rather than the per-slot storage,
    /// so it may overcount appends still in flight. Diagnostic only.
    pub fn pending_count(&self) -> usize {
        self.core.pending.load(Ordering::Relaxed)
    }

    /// Rotates the active slot and returns the previous generation,
    /// waiting at most [`DEFAULT_QUIESCE_TIMEOUT`] for its writers.
    ///
    /// # Errors
    /// See [`drain_timeout`](Self::drain_timeout).
    pub fn drain(&mut self) -> Result<FrameEvents<'_>, DrainError> {
        self.drain_timeout(DEFAULT_QUIESCE_TIMEOUT)
    }

    /// Rotates the active slot and returns the previous generation.
    ///
    /// Every append that begins after this call targets the new active
    /// slot. The returned [`FrameEvents`] borrows the collector, so it must
    /// be dropped before the next drain; the generation's storage is reused
    /// two rotations later.
    ///
    /// # Errors
    /// [`DrainError::QuiesceTimeout`] if a writer registered on the
    /// retiring slot fails to finish within `timeout`. The collector is
    /// wedged at that point: the rotation has already advanced, and records
    /// buffered in the affected slot are dropped when its storage is
    /// eventually reset for reuse.
    pub fn drain_timeout(&mut self, timeout: Duration) -> Result<FrameEvents<'_>, DrainError> {
        let core = &*self.core;
        let retiring = core.active.load(Ordering::SeqCst);
        let reactivated = (retiring + 1) % SLOT_COUNT;

        // The slot taking over was handed out two drains ago; the borrow on
        // the previous `FrameEvents` guarantees the caller has released it.
        core.slots[reactivated].state_changes.reset();
        core.slots[reactivated].inputs.reset();
        core.active.store(reactivated, Ordering::SeqCst);

        if let Err(e) = core.wait_quiescent(retiring, timeout) {
            log::warn!("Drain gave up waiting on slot {retiring}: {e}");
            return Err(e);
        }
        core.pending.store(0, Ordering::Relaxed);

        let slot = &core.slots[retiring];
        log::trace!(
            "Drained slot {retiring}: {} state-change, {} input record(s).",
            slot.state_changes.len(),
            slot.inputs.len()
        );
        Ok(FrameEvents { slot })
    }
}

impl Default for EventCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// A clonable, thread-safe producer handle.
///
/// Hand one to each callback layer that needs to record events; cloning is
/// a reference-count bump.
#[derive(Debug, Clone)]
pub struct EventRecorder {
    core: Arc<CollectorCore>,
}

impl EventRecorder {
    /// Appends a state-change record to the currently active slot.
    pub fn record_state_change(&self, event: StateChangeEvent) {
        self.core.record_state_change(event);
    }

    /// Appends an input record to the currently active slot.
    pub fn record_input(&self, event: InputEvent) {
        self.core.record_input(event);
    }
}

/// One drained generation of events.
///
/// Read-only by construction: the borrow on the collector forces this to be
/// released before the next drain, matching the slot-reuse contract.
#[derive(Debug)]
pub struct FrameEvents<'a> {
    slot: &'a EventSlot,
}

impl FrameEvents<'_> {
    /// Iterates the generation's state-change records in claim order.
    pub fn state_changes(&self) -> impl ExactSizeIterator<Item = StateChangeRecord> + '_ {
        // The slot stays retired and quiescent while `self` is alive.
        unsafe { self.slot.state_changes.iter_claimed() }
    }

    /// Iterates the generation's input records in claim order.
    pub fn inputs(&self) -> impl ExactSizeIterator<Item = InputRecord> + '_ {
        unsafe { self.slot.inputs.iter_claimed() }
    }

    /// Number of state-change records in the generation.
    pub fn state_change_count(&self) -> usize {
        self.slot.state_changes.len()
    }

    /// Number of input records in the generation.
    pub fn input_count(&self) -> usize {
        self.slot.inputs.len()
    }

    /// `true` when the generation holds no records of either family.
    pub fn is_empty(&self) -> bool {
        self.state_change_count() == 0 && self.input_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::record::modifiers;
    use std::thread;

    #[test]
    fn collector_creation() {
        let mut collector = EventCollector::new();
        assert_eq!(collector.pending_count(), 0);

        let frame = collector.drain().expect("Empty drain should succeed");
        assert!(frame.is_empty());
    }

    #[test]
    fn end_to_end_key_scenario() {
        let mut collector = EventCollector::new();
        for key in 65..=69 {
            collector.record_input(InputEvent::KeyPressed { key, modifiers: 0 });
        }

        let frame = collector.drain().expect("Drain should succeed");
        let records: Vec<InputRecord> = frame.inputs().collect();
        assert_eq!(records.len(), 5);

        for (i, record) in records.iter().enumerate() {
            assert_eq!(
                record.event,
                InputEvent::KeyPressed {
                    key: 65 + i as i32,
                    modifiers: 0
                }
            );
        }
        for pair in records.windows(2) {
            assert!(
                pair[0].sequence < pair[1].sequence,
                "Sequences must strictly increase for serialized appends"
            );
        }
    }

    #[test]
    fn both_families_share_one_sequence() {
        let mut collector = EventCollector::new();
        collector.record_state_change(StateChangeEvent::WindowMoved { x: 10, y: 20 });
        collector.record_input(InputEvent::CursorMoved { x: 1.0, y: 2.0 });
        collector.record_state_change(StateChangeEvent::WindowFocusChanged { focused: true });

        let frame = collector.drain().expect("Drain should succeed");
        let states: Vec<StateChangeRecord> = frame.state_changes().collect();
        let inputs: Vec<InputRecord> = frame.inputs().collect();

        assert_eq!(states.len(), 2);
        assert_eq!(inputs.len(), 1);
        assert!(states[0].sequence < inputs[0].sequence);
        assert!(inputs[0].sequence < states[1].sequence);
    }

    #[test]
    fn no_double_handout() {
        let mut collector = EventCollector::new();
        for _ in 0..3 {
            collector.record_input(InputEvent::MouseScrolled {
                delta_x: 0.0,
                delta_y: 1.0,
            });
        }

        let first: Vec<u64> = {
            let frame = collector.drain().expect("First drain should succeed");
            frame.inputs().map(|r| r.sequence).collect()
        };
        assert_eq!(first.len(), 3);

        collector.record_input(InputEvent::CursorMoved { x: 5.0, y: 5.0 });
        let second: Vec<u64> = {
            let frame = collector.drain().expect("Second drain should succeed");
            frame.inputs().map(|r| r.sequence).collect()
        };
        assert_eq!(second.len(), 1);
        assert!(first.iter().all(|seq| !second.contains(seq)));

        let frame = collector.drain().expect("Third drain should succeed");
        assert!(frame.is_empty(), "A generation must not be handed out twice");
    }

    #[test]
    fn growth_past_initial_capacity() {
        let mut collector = EventCollector::new();
        for i in 0..(STATE_CHANGE_CAPACITY as i32 + 72) {
            collector.record_state_change(StateChangeEvent::WindowMoved { x: i, y: -i });
        }

        let frame = collector.drain().expect("Drain should succeed");
        assert_eq!(frame.state_change_count(), STATE_CHANGE_CAPACITY + 72);
        for (i, record) in frame.state_changes().enumerate() {
            let i = i as i32;
            assert_eq!(record.event, StateChangeEvent::WindowMoved { x: i, y: -i });
        }
    }

    #[test]
    fn pending_count_resets_on_drain() {
        let mut collector = EventCollector::new();
        for _ in 0..5 {
            collector.record_input(InputEvent::FilesDropped { count: 1 });
        }
        assert_eq!(collector.pending_count(), 5);

        collector.drain().expect("Drain should succeed");
        assert_eq!(collector.pending_count(), 0);
    }

    #[test]
    fn sequences_stay_monotonic_across_drains() {
        let mut collector = EventCollector::new();
        collector.record_input(InputEvent::KeyPressed {
            key: 65,
            modifiers: 0,
        });
        let first_seq = {
            let frame = collector.drain().expect("Drain should succeed");
            let seq = frame.inputs().next().expect("One record expected").sequence;
            seq
        };

        collector.record_input(InputEvent::KeyReleased {
            key: 65,
            modifiers: 0,
        });
        let second_seq = {
            let frame = collector.drain().expect("Drain should succeed");
            let seq = frame.inputs().next().expect("One record expected").sequence;
            seq
        };
        assert!(first_seq < second_seq);
    }

    #[test]
    fn recorder_appends_from_another_thread() {
        let mut collector = EventCollector::new();
        let recorder = collector.recorder();

        let handle = thread::spawn(move || {
            recorder.record_input(InputEvent::KeyPressed {
                key: 32,
                modifiers: modifiers::SHIFT,
            });
        });
        handle.join().expect("Recording thread panicked");

        let frame = collector.drain().expect("Drain should succeed");
        let records: Vec<InputRecord> = frame.inputs().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].event,
            InputEvent::KeyPressed {
                key: 32,
                modifiers: modifiers::SHIFT,
            }
        );
    }

    #[test]
    fn recorder_outlives_held_frame() {
        let mut collector = EventCollector::new();
        let recorder = collector.recorder();

        collector.record_input(InputEvent::CursorEnteredOrLeft { entered: true });
        let frame = collector.drain().expect("Drain should succeed");

        // Appends made while the consumer still holds a generation land in
        // the new active slot and stay invisible until the next drain.
        recorder.record_input(InputEvent::CursorEnteredOrLeft { entered: false });
        assert_eq!(frame.input_count(), 1);
        drop(frame);

        let frame = collector.drain().expect("Drain should succeed");
        let records: Vec<InputRecord> = frame.inputs().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].event,
            InputEvent::CursorEnteredOrLeft { entered: false }
        );
    }

    #[test]
    fn drain_times_out_on_stuck_writer() {
        let mut collector = EventCollector::new();
        collector.record_input(InputEvent::KeyPressed {
            key: 65,
            modifiers: 0,
        });

        // Register a writer that never finishes its append.
        let core = Arc::clone(&collector.core);
        let stuck_slot = core.begin_append();

        let err = collector
            .drain_timeout(Duration::from_millis(20))
            .expect_err("Drain must not hand out a slot with an in-flight writer");
        assert_eq!(
            err,
            DrainError::QuiesceTimeout {
                slot: stuck_slot,
                writers: 1,
                waited: Duration::from_millis(20),
            }
        );

        // Once the writer finishes, later drains succeed again.
        core.finish_append(stuck_slot);
        collector.drain().expect("Drain should recover");
    }
}
