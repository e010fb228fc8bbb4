use tracing::{debug, trace};

use crate::error::Result;
use crate::field::HeightField;
use crate::params::GeneratorParams;
use crate::plan::plan;
use crate::post::finalize;
use crate::random::RandomSource;

// Blend a random draw into a neighbour average.
// weight 1.0 gives the raw draw, 0.0 gives pure interpolation.
#[inline]
pub fn weighted_average(weight: f64, value: f64, avg: f64) -> f64 {
    weight * value + avg * (1.0 - weight)
}

// Allocate a height×width working grid and seed its top and bottom rows.
//
// The grid is a row of square tiles of side `height - 1`; every tile corner gets a draw.
// Order: the four grid corners, then the inner tile corners on the top row left to right,
// then the same columns on the bottom row. For the usual two-tile grid this is
// (0,0), (0,w-1), (h-1,0), (h-1,w-1), (0,(w-1)/2), (h-1,(w-1)/2).
pub fn seed<R: RandomSource + ?Sized>(
    height: usize,
    width: usize,
    rng: &mut R,
) -> Result<HeightField> {
    let mut map = HeightField::zeroed(height, width)?;
    let tile = height - 1;
    debug_assert!(
        tile > 0 && (width - 1) % tile == 0,
        "{height}x{width} is not a row of square tiles"
    );

    // Initialize corners
    map.set(0, 0, rng.next_unit());
    map.set(0, width - 1, rng.next_unit());
    map.set(height - 1, 0, rng.next_unit());
    map.set(height - 1, width - 1, rng.next_unit());

    for row in [0, height - 1] {
        for col in (tile..width - 1).step_by(tile) {
            map.set(row, col, rng.next_unit());
        }
    }
    Ok(map)
}

// Mutable context of one run; dropped once the result is finalized
struct GenerationState {
    roughness: f64,
    // roughness^i for the current iteration
    current_roughness: f64,
    // distance between the samples known before this iteration, times two
    step_size: usize,
    map: HeightField,
}

impl GenerationState {
    fn run<R: RandomSource + ?Sized>(&mut self, iterations: u32, rng: &mut R) {
        let tile = self.map.rows() - 1;
        for i in 0..iterations {
            self.current_roughness = self.roughness.powi(i as i32);
            self.step_size = (2 * tile) >> i;
            trace!(
                iteration = i,
                step_size = self.step_size,
                current_roughness = self.current_roughness,
                "diamond-square iteration"
            );
            // square reads the centers diamond just wrote
            self.diamond(rng);
            self.square(rng);
        }
    }

    // Fill cell centers from their four diagonal neighbours
    fn diamond<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let (height, width) = self.map.shape();
        let (half, quarter) = (self.step_size / 2, self.step_size / 4);
        for i in (quarter..height).step_by(half) {
            // columns stop one short of the right edge
            for j in (quarter..width - 1).step_by(half) {
                let v = self.diamond_displace(i, j, rng);
                self.map.set(i, j, v);
            }
        }
    }

    fn diamond_displace<R: RandomSource + ?Sized>(&self, i: usize, j: usize, rng: &mut R) -> f64 {
        let q = self.step_size / 4;
        let ul = self.map.get(i - q, j - q);
        let ur = self.map.get(i - q, j + q);
        let ll = self.map.get(i + q, j - q);
        let lr = self.map.get(i + q, j + q);
        let avg = (ul + ur + ll + lr) / 4.0;
        weighted_average(self.current_roughness, rng.next_unit(), avg)
    }

    // Fill edge midpoints: known rows with new columns, then new rows with known columns
    fn square<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let (height, width) = self.map.shape();
        let (half, quarter) = (self.step_size / 2, self.step_size / 4);
        for i in (0..height).step_by(half) {
            for j in (quarter..width).step_by(half) {
                let v = self.square_displace(i, j, rng);
                self.map.set(i, j, v);
            }
        }
        for i in (quarter..height).step_by(half) {
            for j in (0..width).step_by(half) {
                let v = self.square_displace(i, j, rng);
                self.map.set(i, j, v);
            }
        }
    }

    // Average whichever orthogonal neighbours are inside the grid
    fn square_displace<R: RandomSource + ?Sized>(&self, i: usize, j: usize, rng: &mut R) -> f64 {
        let (height, width) = self.map.shape();
        let q = self.step_size / 4;
        let mut total = 0.0;
        let mut count = 0;
        if i >= q {
            total += self.map.get(i - q, j);
            count += 1;
        }
        if j >= q {
            total += self.map.get(i, j - q);
            count += 1;
        }
        if i + q < height {
            total += self.map.get(i + q, j);
            count += 1;
        }
        if j + q < width {
            total += self.map.get(i, j + q);
            count += 1;
        }
        let avg = total / count as f64;
        weighted_average(self.current_roughness, rng.next_unit(), avg)
    }
}

// 2D fractal terrain generator using the Diamond–Square algorithm on any width×height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiamondSquare {
    width: usize,
    height: usize,
    roughness: f64, // how much the random draw still counts at each finer level
}

impl DiamondSquare {
    pub fn new(width: usize, height: usize, roughness: f64) -> Self {
        Self {
            width,
            height,
            roughness,
        }
    }

    pub fn from_params(width: usize, height: usize, params: &GeneratorParams) -> Self {
        Self::new(width, height, params.roughness)
    }

    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    // Generate a height×width field. Values start in [0, 1) but are not clamped.
    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<HeightField> {
        let planned = plan(self.height, self.width)?;
        debug!(
            width = self.width,
            height = self.height,
            gen_width = planned.gen_width,
            gen_height = planned.gen_height,
            transposed = planned.transposed,
            iterations = planned.iterations(),
            "planned working grid"
        );

        let map = seed(planned.gen_height, planned.gen_width, rng)?;
        let mut state = GenerationState {
            roughness: self.roughness,
            current_roughness: 1.0,
            step_size: 2 * planned.tile(),
            map,
        };
        state.run(planned.iterations(), rng);

        finalize(state.map, planned.transposed, self.height, self.width)
    }
}

// Generate a height-row × width-column field in one call
pub fn generate<R: RandomSource + ?Sized>(
    width: usize,
    height: usize,
    roughness: f64,
    rng: &mut R,
) -> Result<HeightField> {
    DiamondSquare::new(width, height, roughness).generate(rng)
}

#[cfg(test)]
mod tests {
    use super::{DiamondSquare, generate, seed, weighted_average};
    use crate::error::TerrainError;
    use crate::random::{RandomSource, ReplaySource, RngSource};

    // Source whose k-th draw is `k + offset`, so cells show which draw filled them
    fn counting(offset: f64) -> ReplaySource {
        ReplaySource::new((0..1024).map(|k| k as f64 + offset).collect())
    }

    #[test]
    fn weighted_average_endpoints() {
        assert_eq!(weighted_average(1.0, 0.7, 0.2), 0.7);
        assert_eq!(weighted_average(0.0, 0.7, 0.2), 0.2);
        assert!((weighted_average(0.25, 1.0, 0.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn seeds_six_cells_in_order() {
        let mut src = ReplaySource::new(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        let map = seed(5, 9, &mut src).unwrap();
        assert_eq!(src.draws(), 6);
        assert_eq!(map.get(0, 0), 0.1);
        assert_eq!(map.get(0, 8), 0.2);
        assert_eq!(map.get(4, 0), 0.3);
        assert_eq!(map.get(4, 8), 0.4);
        assert_eq!(map.get(0, 4), 0.5);
        assert_eq!(map.get(4, 4), 0.6);
        let seeded = map.as_slice().iter().filter(|&&v| v != 0.0).count();
        assert_eq!(seeded, 6);
    }

    #[test]
    fn wide_grid_seeds_every_tile_corner() {
        let mut src = counting(1.0);
        let map = seed(3, 9, &mut src).unwrap();
        assert_eq!(src.draws(), 10);
        assert_eq!(map.row(0), &[1.0, 0.0, 5.0, 0.0, 6.0, 0.0, 7.0, 0.0, 2.0]);
        assert_eq!(map.row(1), &[0.0; 9]);
        assert_eq!(map.row(2), &[3.0, 0.0, 8.0, 0.0, 9.0, 0.0, 10.0, 0.0, 4.0]);
    }

    #[test]
    fn draw_order_on_smallest_square() {
        // roughness 1 makes every cell equal to the draw that filled it.
        // 3x3 pads to 3x5: seeds 0..6, diamond 6..8, square rows 8..12, square columns 12..15
        let mut src = counting(0.0);
        let map = generate(3, 3, 1.0, &mut src).unwrap();
        assert_eq!(src.draws(), 15);
        assert_eq!(
            map.to_rows(),
            vec![
                vec![0.0, 8.0, 4.0],
                vec![12.0, 6.0, 13.0],
                vec![2.0, 10.0, 5.0],
            ]
        );
    }

    #[test]
    fn every_working_cell_is_written_exactly_once() {
        // Requests already at working size, so nothing is cut away
        for (w, h) in [(9, 5), (17, 9), (17, 3), (33, 5), (3, 2), (9, 2)] {
            let mut src = counting(1.0);
            let map = generate(w, h, 1.0, &mut src).unwrap();
            assert_eq!(src.draws(), w * h, "{w}x{h}");
            let mut seen: Vec<f64> = map.as_slice().to_vec();
            seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let expected: Vec<f64> = (1..=w * h).map(|k| k as f64).collect();
            assert_eq!(seen, expected, "{w}x{h}");
        }
    }

    #[test]
    fn square_request_keeps_seeded_corners() {
        let mut src = RngSource::seeded(7);
        let mut probe = RngSource::seeded(7);
        let draws: Vec<f64> = (0..6).map(|_| probe.next_unit()).collect();

        let map = generate(5, 5, 0.45, &mut src).unwrap();
        assert_eq!(map.shape(), (5, 5));
        assert_eq!(map.get(0, 0), draws[0]);
        assert_eq!(map.get(4, 0), draws[2]);
        // the right edge of a 5x5 request is the midpoint column of the 5x9 working grid
        assert_eq!(map.get(0, 4), draws[4]);
        assert_eq!(map.get(4, 4), draws[5]);
    }

    #[test]
    fn zero_roughness_only_uses_first_level_draws() {
        // 5x5 pads to 5x9: 6 seeds + 9 first-level cells, the rest is interpolation
        let head: Vec<f64> = (0..15).map(|k| (k as f64 * 0.37).fract()).collect();
        let mut low = head.clone();
        low.extend(std::iter::repeat_n(0.0, 64));
        let mut high = head;
        high.extend(std::iter::repeat_n(0.99, 64));

        let a = generate(5, 5, 0.0, &mut ReplaySource::new(low)).unwrap();
        let b = generate(5, 5, 0.0, &mut ReplaySource::new(high)).unwrap();
        assert_eq!(a, b);

        let c = generate(5, 5, 0.5, &mut ReplaySource::new(vec![0.3, 0.9])).unwrap();
        let d = generate(5, 5, 0.5, &mut ReplaySource::new(vec![0.3, 0.9, 0.1])).unwrap();
        assert_ne!(c, d);
    }

    #[test]
    fn tall_request_is_transposed_back() {
        // 9 rows by 3 columns runs on a 3x9 grid and comes back turned
        let mut src = counting(0.0);
        let map = generate(3, 9, 1.0, &mut src).unwrap();
        assert_eq!(map.shape(), (9, 3));
        assert_eq!(src.draws(), 27);
        assert_eq!(map.get(0, 0), 0.0);
        assert_eq!(map.get(8, 0), 1.0);
        assert_eq!(map.get(0, 2), 2.0);
        assert_eq!(map.get(8, 2), 3.0);
        assert_eq!(map.get(2, 0), 4.0);
    }

    #[test]
    fn same_seed_same_terrain() {
        let g = DiamondSquare::new(100, 60, 0.45);
        let a = g.generate(&mut RngSource::seeded(42)).unwrap();
        let b = g.generate(&mut RngSource::seeded(42)).unwrap();
        let c = g.generate(&mut RngSource::seeded(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.shape(), (60, 100));
    }

    #[test]
    fn invalid_sizes_fail_before_drawing() {
        let mut src = counting(0.0);
        let err = generate(1, 5, 0.5, &mut src).unwrap_err();
        assert_eq!(
            err,
            TerrainError::InvalidDimension {
                height: 5,
                width: 1
            }
        );
        assert_eq!(src.draws(), 0);
    }
}
