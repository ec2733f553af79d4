//! Configuration types and helpers.

mod device;
mod manager;
mod option;
mod restart;
mod run_as;
mod volume;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use device::*;
pub use manager::*;
pub use option::*;
pub use restart::*;
pub use run_as::*;
pub use volume::*;
