pub mod geometry;
pub mod stl;

pub use geometry::{Geometry, MESH_RGB};
pub use stl::{load_geometry, parse_stl, read_stl};
