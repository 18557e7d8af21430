//! Model component traits
//!
//! One trait per hook the host filter calls: regime dynamics, measurement,
//! noise covariances, initial conditions, regime switching, and parameter
//! transforms.

mod initial;
mod noise;
mod observation;
mod switching;
mod transform;
mod transition;

pub use initial::*;
pub use noise::*;
pub use observation::*;
pub use switching::*;
pub use transform::*;
pub use transition::*;
