//! Numerical algorithms shared by the photometry code

pub mod misc;

pub use misc::{interp, interp_all, InterpError};
