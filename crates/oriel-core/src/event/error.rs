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

//! Errors surfaced by the rotating event collector.

use std::fmt;
use std::time::Duration;

/// An error raised while draining a generation of events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainError {
    /// The retiring slot's in-flight writers did not finish within the
    /// allowed wait. A writer wedged between registering and completing its
    /// append is unrecoverable; the collector should be torn down.
    QuiesceTimeout {
        /// Index of the slot that failed to quiesce.
        slot: usize,
        /// Writers still registered when the wait gave up.
        writers: usize,
        /// How long the drain waited before giving up.
        waited: Duration,
    },
}

impl fmt::Display for DrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrainError::QuiesceTimeout {
                slot,
                writers,
                waited,
            } => {
                write!(
                    f,
                    "slot {slot} failed to quiesce within {waited:?}: {writers} writer(s) still in flight"
                )
            }
        }
    }
}

impl std::error::Error for DrainError {}
