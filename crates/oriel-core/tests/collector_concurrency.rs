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

//! Cross-thread behavior of the rotating event collector: concurrent
//! appends, drain churn, and the no-lost-writes / no-double-handout
//! guarantees.

use std::collections::HashSet;
use std::thread;
use std::time::{Duration, Instant};

use oriel_core::event::{EventCollector, InputEvent, InputRecord};

const WRITERS: u64 = 4;

#[test]
fn concurrent_scroll_appends_before_one_drain() {
    const PER_WRITER: u64 = 1000;

    let mut collector = EventCollector::new();
    let mut handles = Vec::new();

    for writer in 0..WRITERS {
        let recorder = collector.recorder();
        handles.push(thread::spawn(move || {
            for i in 0..PER_WRITER {
                recorder.record_input(InputEvent::MouseScrolled {
                    delta_x: writer as f64,
                    delta_y: i as f64,
                });
            }
        }));
    }
    for handle in handles {
        handle.join().expect("Writer thread panicked");
    }

    let frame = collector.drain().expect("Drain should succeed");
    let records: Vec<InputRecord> = frame.inputs().collect();
    assert_eq!(records.len(), (WRITERS * PER_WRITER) as usize);

    let sequences: HashSet<u64> = records.iter().map(|r| r.sequence).collect();
    assert_eq!(
        sequences.len(),
        records.len(),
        "Every record must carry a distinct sequence number"
    );

    // Every payload must be exactly one of the values actually sent.
    let mut payloads = HashSet::new();
    for record in &records {
        match record.event {
            InputEvent::MouseScrolled { delta_x, delta_y } => {
                let writer = delta_x as u64;
                let i = delta_y as u64;
                assert!(writer < WRITERS && i < PER_WRITER, "Corrupted payload");
                assert!(
                    payloads.insert((writer, i)),
                    "Payload ({writer}, {i}) appeared twice"
                );
            }
            other => panic!("Unexpected record: {other:?}"),
        }
    }
    assert_eq!(payloads.len(), (WRITERS * PER_WRITER) as usize);
}

#[test]
fn no_lost_writes_under_drain_churn() {
    const PER_WRITER: u64 = 2000;
    const TOTAL: usize = (WRITERS * PER_WRITER) as usize;

    let mut collector = EventCollector::new();
    let mut handles = Vec::new();

    for writer in 0..WRITERS {
        let recorder = collector.recorder();
        handles.push(thread::spawn(move || {
            for i in 0..PER_WRITER {
                recorder.record_input(InputEvent::KeyPressed {
                    key: (writer * 10_000 + i) as i32,
                    modifiers: 0,
                });
                if i % 256 == 0 {
                    thread::yield_now();
                }
            }
        }));
    }

    // Drain concurrently with the writers until every record has shown up.
    let mut keys = HashSet::new();
    let mut sequences = HashSet::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    while keys.len() < TOTAL {
        assert!(
            Instant::now() < deadline,
            "Collected only {} of {TOTAL} records before the deadline",
            keys.len()
        );
        let frame = collector.drain().expect("Drain should succeed");
        for record in frame.inputs() {
            match record.event {
                InputEvent::KeyPressed { key, .. } => {
                    assert!(
                        keys.insert(key),
                        "Record with key {key} handed out twice"
                    );
                }
                other => panic!("Unexpected record: {other:?}"),
            }
            assert!(
                sequences.insert(record.sequence),
                "Sequence {} handed out twice",
                record.sequence
            );
        }
        thread::yield_now();
    }

    for handle in handles {
        handle.join().expect("Writer thread panicked");
    }

    assert_eq!(keys.len(), TOTAL);
    assert_eq!(sequences.len(), TOTAL);
    for writer in 0..WRITERS {
        for i in 0..PER_WRITER {
            assert!(keys.contains(&((writer * 10_000 + i) as i32)));
        }
    }
}

#[test]
fn serialized_appends_drain_in_order_across_generations() {
    let mut collector = EventCollector::new();
    let mut last_sequence = 0;

    for round in 0..6 {
        for key in 0..10 {
            collector.record_input(InputEvent::KeyPressed {
                key: round * 10 + key,
                modifiers: 0,
            });
        }
        let frame = collector.drain().expect("Drain should succeed");
        let records: Vec<InputRecord> = frame.inputs().collect();
        assert_eq!(records.len(), 10);
        for record in &records {
            assert!(
                record.sequence > last_sequence,
                "Sequence order must survive rotation"
            );
            last_sequence = record.sequence;
        }
    }
}
