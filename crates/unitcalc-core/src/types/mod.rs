//! Value types for unitcalc calculations

pub mod angle;
mod arithmetic;
mod compare;
pub mod dimensions;
pub mod format;
mod operand;
mod quantity;

pub use angle::Degrees;
pub use dimensions::Dimensions;
pub use format::{DisplayConfig, Markup};
pub use operand::Operand;
pub use quantity::Quantity;
