use crate::error::Result;
use crate::field::HeightField;

// Swap rows and columns: result[x][y] = field[y][x]
pub fn transpose(field: &HeightField) -> Result<HeightField> {
    let (rows, cols) = field.shape();
    let mut turned = HeightField::zeroed(cols, rows)?;
    for r in 0..rows {
        for (c, &v) in field.row(r).iter().enumerate() {
            turned.set(c, r, v);
        }
    }
    Ok(turned)
}

// Keep the top-left rows×cols corner; anything past it is dropped
pub fn truncate(field: &HeightField, rows: usize, cols: usize) -> Result<HeightField> {
    assert!(
        rows <= field.rows() && cols <= field.cols(),
        "cannot truncate {}x{} to {rows}x{cols}",
        field.rows(),
        field.cols()
    );
    let mut cut = HeightField::zeroed(rows, cols)?;
    for r in 0..rows {
        cut.as_mut_slice()[r * cols..(r + 1) * cols].copy_from_slice(&field.row(r)[..cols]);
    }
    Ok(cut)
}

// Bring the working grid back to the caller's height×width
pub fn finalize(
    field: HeightField,
    transposed: bool,
    height: usize,
    width: usize,
) -> Result<HeightField> {
    let field = if transposed { transpose(&field)? } else { field };
    if field.shape() == (height, width) {
        return Ok(field);
    }
    truncate(&field, height, width)
}
