mod boundaries;
mod schools;

pub use boundaries::{collect_boundaries, load_boundaries, Boundary, BoundarySet};
pub use schools::{load_schools, parse_coordinates, read_schools, Dataset, SchoolRecord, TypeSchema};
