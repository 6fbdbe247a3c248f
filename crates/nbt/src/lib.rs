mod repr;
mod tag;

pub mod io;
pub mod snbt;

mod raw;

pub use self::repr::*;
pub use self::tag::*;
