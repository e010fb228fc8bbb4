// core holds the diamond-square generator for arbitrary width×height grids:
// planning the padded working grid, seeding, the refinement passes,
// and cutting the result back to the requested shape
pub mod diamond_square;
pub mod error;
pub mod field;
pub mod params;
pub mod plan;
pub mod post;
pub mod random;
pub mod render;

pub use diamond_square::{DiamondSquare, generate};
pub use error::{ParamsError, TerrainError};
pub use field::HeightField;
pub use params::GeneratorParams;
pub use plan::{PlannedSize, plan};
pub use random::{RandomSource, ReplaySource, RngSource};
