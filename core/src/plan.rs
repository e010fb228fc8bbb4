use crate::error::{Result, TerrainError};

// Working size the diamond-square pass runs on.
// Both sides are 2^k + 1 and the width exponent is strictly larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedSize {
    pub gen_height: usize,
    pub gen_width: usize,
    // height and width were swapped so the longer side runs along the width
    pub transposed: bool,
}

impl PlannedSize {
    // Number of refinement rounds: floor(log2(gen_height - 1))
    pub fn iterations(&self) -> u32 {
        (self.gen_height - 1).ilog2()
    }

    // Side of the square tiles the working grid is cut into
    pub fn tile(&self) -> usize {
        self.gen_height - 1
    }
}

// ceil(log2(n)) for n >= 1, in integers; None past the largest usize power of two
fn ceil_log2(n: usize) -> Option<u32> {
    n.checked_next_power_of_two().map(usize::trailing_zeros)
}

// Pad a requested height×width to the working grid.
pub fn plan(height: usize, width: usize) -> Result<PlannedSize> {
    if height < 2 || width < 2 {
        return Err(TerrainError::InvalidDimension { height, width });
    }

    let (height, width, transposed) = if height > width {
        (width, height, true)
    } else {
        (height, width, false)
    };

    let too_large = TerrainError::Allocation {
        rows: height,
        cols: width,
    };
    let log_height = ceil_log2(height - 1).ok_or(too_large.clone())?;
    let mut log_width = ceil_log2(width - 1).ok_or(too_large.clone())?;
    // The square pass needs the width to span at least two tiles
    if log_width <= log_height {
        log_width += 1;
    }

    let side = |log: u32| {
        1usize
            .checked_shl(log)
            .and_then(|p| p.checked_add(1))
            .ok_or(too_large.clone())
    };

    Ok(PlannedSize {
        gen_height: side(log_height)?,
        gen_width: side(log_width)?,
        transposed,
    })
}
