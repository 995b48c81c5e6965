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

//! Creation-order sequencing shared by both record families.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out globally unique, monotonically increasing sequence numbers.
///
/// The counter starts at 1 so that 0 stays reserved for storage sentinels.
/// Every claim consumes exactly one value; at 64-bit width the counter does
/// not wrap within any realistic process lifetime.
#[derive(Debug)]
pub(crate) struct SequenceCounter {
    next: AtomicU64,
}

impl SequenceCounter {
    pub(crate) fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Claims the next sequence number. Claim order defines record order.
    #[inline]
    pub(crate) fn claim(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
