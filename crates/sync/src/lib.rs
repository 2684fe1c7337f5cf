#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::dbg_macro
)]
#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

//! The remote shared store that every device reconciles through.
//!
//! [`SharedStore`] is the whole capability surface the rest of the workspace depends on: a keyed
//! collection of JSON values with key generation, single writes and deletes, a one-shot read of
//! the collection, and a push feed of child additions and removals. [`MemoryStore`] is the
//! in-process implementation.

mod error;
mod memory;
mod store;

pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use store::{listener_channel, ChildEvent, ChildListener, SharedStore};

pub use serde_json::Value;
