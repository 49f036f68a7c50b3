pub mod point;
pub mod space;

pub use point::Point;
pub use space::Space;
