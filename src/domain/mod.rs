pub mod dateops;
pub mod focus;
pub mod matcher;
pub mod modifiers;
pub mod navigation;
pub mod range;
pub mod selection;

pub use focus::*;
pub use matcher::*;
pub use modifiers::*;
pub use navigation::*;
pub use range::*;
pub use selection::*;
