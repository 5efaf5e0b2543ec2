//! Post store implementations.

mod memory;
mod push_id;

#[cfg(feature = "firebase")]
mod firebase;

pub use memory::InMemoryPostStore;
pub use push_id::{PUSH_ID_LEN, PushIdGenerator};

#[cfg(feature = "firebase")]
pub use firebase::{FirebaseConfig, FirebasePostStore};
