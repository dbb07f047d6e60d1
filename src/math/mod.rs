//! Mathematical utilities: rolling-window smoothing kernels.

pub mod rolling;

pub use rolling::*;
