use std::error::Error;
use std::path::Path;

use terrain_core::render::{normalize, to_grayscale_image, to_terrain_image};
use terrain_core::{DiamondSquare, RngSource};

fn main() -> Result<(), Box<dyn Error>> {
    // 16:9, deliberately not 2^n + 1
    let (width, height) = (800, 450);
    let mut rng = RngSource::seeded(2025);
    let mut terrain = DiamondSquare::new(width, height, 0.45).generate(&mut rng)?;

    let raw = Path::new("terrain_raw.png");
    to_grayscale_image(&terrain).save(raw)?;
    println!("Saved raw heights to {:?}", raw);

    // Stretch to 0.0..1.0 so the gradient uses its full range
    normalize(&mut terrain);
    let colored = Path::new("terrain_colored.png");
    to_terrain_image(&terrain).save(colored)?;
    println!("Saved colored terrain to {:?}", colored);
    Ok(())
}
