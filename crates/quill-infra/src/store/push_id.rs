//! Chronologically sortable push keys, in the Realtime Database format.
//!
//! A key is 20 characters: 8 encoding the creation millisecond, then 12
//! random ones. Keys made within the same millisecond reuse the previous
//! random suffix incremented by one, so consecutive keys from one process
//! always sort in creation order.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rand::Rng;

/// Alphabet in ascending ASCII order, so string order matches numeric order.
const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIME_CHARS: usize = 8;
const RANDOM_CHARS: usize = 12;

/// Length of every generated key.
pub const PUSH_ID_LEN: usize = TIME_CHARS + RANDOM_CHARS;

struct PushState {
    last_millis: i64,
    last_random: [u8; RANDOM_CHARS],
}

/// Push key generator.
pub struct PushIdGenerator {
    state: Mutex<PushState>,
}

impl PushIdGenerator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PushState {
                last_millis: i64::MIN,
                last_random: [0; RANDOM_CHARS],
            }),
        }
    }

    /// Next key for the current wall-clock millisecond.
    pub fn next_id(&self) -> String {
        self.next_id_at(Utc::now().timestamp_millis())
    }

    pub(crate) fn next_id_at(&self, now_millis: i64) -> String {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if now_millis == state.last_millis {
            // Same millisecond: bump the suffix, carrying like an odometer.
            for digit in state.last_random.iter_mut().rev() {
                if *digit == 63 {
                    *digit = 0;
                } else {
                    *digit += 1;
                    break;
                }
            }
        } else {
            let mut rng = rand::thread_rng();
            for digit in state.last_random.iter_mut() {
                *digit = rng.gen_range(0..64);
            }
        }
        state.last_millis = now_millis;

        let mut time_chars = [0u8; TIME_CHARS];
        let mut remaining = now_millis;
        for slot in time_chars.iter_mut().rev() {
            *slot = PUSH_CHARS[remaining.rem_euclid(64) as usize];
            remaining = remaining.div_euclid(64);
        }

        time_chars
            .iter()
            .copied()
            .chain(state.last_random.iter().map(|&d| PUSH_CHARS[d as usize]))
            .map(char::from)
            .collect()
    }
}

impl Default for PushIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
