pub mod core;
pub mod source;


pub use self::core::*;
pub use self::source::*;
