//! Sphere primitives the regions are tested against: points, pixelization cells and
//! angular separation bins.

pub mod angular_bin;
pub mod pixel;
pub mod point;
