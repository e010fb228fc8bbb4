use thiserror::Error;

// Failures the generator can report before or while building the working grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerrainError {
    // Either side is below 2, where log2(n - 1) has no meaning
    #[error("invalid dimensions {width}x{height}: width and height must both be at least 2")]
    InvalidDimension { height: usize, width: usize },

    // rows * cols overflowed or the allocator refused the buffer
    #[error("cannot allocate a {rows}x{cols} height field")]
    Allocation { rows: usize, cols: usize },
}

pub type Result<T> = std::result::Result<T, TerrainError>;

// Failures loading a JSON parameters file
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("cannot read parameters file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid parameters: {0}")]
    Parse(#[from] serde_json::Error),
}
