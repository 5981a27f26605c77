//! Reference protocol drivers.
//!
//! None of them touch real hardware. They exist to run scripts on a host and
//! to show how a bus mode fills in trace entries.

mod dummy;
mod hiz;
mod i2c;
mod spi;

pub use dummy::Dummy;
pub use hiz::HiZ;
pub use i2c::SimI2c;
pub use spi::SimSpi;
