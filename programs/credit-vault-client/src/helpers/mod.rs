pub mod format;
pub mod math;

pub use format::*;
pub use math::*;
