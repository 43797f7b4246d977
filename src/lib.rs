pub mod camera;
pub mod cell;
pub mod pattern;
pub mod population;
pub mod rule;
pub mod rle;
pub mod viewport;

mod parse_util;

pub use cell::Cell;
pub use population::Population;
pub use viewport::Viewport;

pub type ScreenSize = u16;
pub type Coord = i64;
