//! Read-mostly boards shown to hospital staff and the control center.
//!
//! Both boards are seeded with demo data. The hospital board supports bed
//! adjustments; the fleet board keeps units in a concurrent map so status
//! updates can come from any task.

mod error;
mod fleet;
mod hospital;

pub use error::*;
pub use fleet::*;
pub use hospital::*;
