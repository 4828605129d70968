//! Domain models for order entry.

mod candidate;
mod entry;
mod lab;

pub use candidate::*;
pub use entry::*;
pub use lab::*;
