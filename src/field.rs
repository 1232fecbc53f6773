use crate::grid::Grid2;
use rayon::prelude::*;
use std::sync::OnceLock;

const PAR_THRESHOLD_DEFAULT: usize = 262_144;
const PAR_MIN_WORK_PER_THREAD: usize = 4096;

fn parallel_threshold() -> usize {
    static THRESHOLD: OnceLock<usize> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var("SIM_PAR_THRESHOLD")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(PAR_THRESHOLD_DEFAULT)
    })
}

fn should_parallel(len: usize) -> bool {
    if len < parallel_threshold() {
        return false;
    }
    let threads = rayon::current_num_threads().max(1);
    len / threads >= PAR_MIN_WORK_PER_THREAD
}

/// Scalar field over a padded [`Grid2`], halo included.
#[derive(Clone, Debug, PartialEq)]
pub struct Field2 {
    grid: Grid2,
    data: Vec<f32>,
}

impl Field2 {
    pub fn new(grid: Grid2, fill: f32) -> Self {
        let data = vec![fill; grid.size()];
        Self { grid, data }
    }

    pub fn from_fn(grid: Grid2, f: impl Fn(usize, usize) -> f32) -> Self {
        let stride = grid.stride();
        let data = (0..grid.size())
            .map(|n| f(n % stride, n / stride))
            .collect();
        Self { grid, data }
    }

    pub fn grid(&self) -> Grid2 {
        self.grid
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[self.grid.idx(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        let idx = self.grid.idx(i, j);
        self.data[idx] = value;
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn copy_from(&mut self, other: &Self) {
        self.assert_same_grid(other);
        self.data.copy_from_slice(&other.data);
    }

    /// Bilinear sample at a world-space position.
    ///
    /// The lower corner is floored and then clamped to the padded range on
    /// each axis independently; the blend weights come from the unclamped
    /// floor, so traces that leave the grid saturate at the halo.
    pub fn sample_linear(&self, pos: (f32, f32)) -> f32 {
        let dx = self.grid.dx();
        let gx = pos.0 / dx - 0.5;
        let gy = pos.1 / dx - 0.5;
        let fx = gx.floor();
        let fy = gy.floor();
        let sx = gx - fx;
        let sy = gy - fy;
        let (i0, j0) = self.grid.clamp_coord(fx as i32, fy as i32);
        let (i1, j1) = self.grid.clamp_coord(i0 as i32 + 1, j0 as i32 + 1);
        let q00 = self.get(i0, j0);
        let q10 = self.get(i1, j0);
        let q01 = self.get(i0, j1);
        let q11 = self.get(i1, j1);
        let down = q00 + (q10 - q00) * sx;
        let up = q01 + (q11 - q01) * sx;
        down + (up - down) * sy
    }

    /// Overwrites every interior cell with `f(i, j)`; halo cells are untouched.
    pub fn fill_interior(&mut self, f: impl Fn(usize, usize) -> f32 + Sync) {
        let stride = self.grid.stride();
        let nx = self.grid.nx();
        let ny = self.grid.ny();
        let write_row = |(j, row): (usize, &mut [f32])| {
            for (i, value) in row.iter_mut().enumerate().take(nx + 1).skip(1) {
                *value = f(i, j);
            }
        };
        if should_parallel(self.data.len()) {
            self.data
                .par_chunks_mut(stride)
                .enumerate()
                .skip(1)
                .take(ny)
                .for_each(write_row);
        } else {
            self.data
                .chunks_mut(stride)
                .enumerate()
                .skip(1)
                .take(ny)
                .for_each(write_row);
        }
    }

    pub fn update_interior(&mut self, f: impl Fn(usize, usize, f32) -> f32 + Sync) {
        let stride = self.grid.stride();
        let nx = self.grid.nx();
        let ny = self.grid.ny();
        let update_row = |(j, row): (usize, &mut [f32])| {
            for (i, value) in row.iter_mut().enumerate().take(nx + 1).skip(1) {
                *value = f(i, j, *value);
            }
        };
        if should_parallel(self.data.len()) {
            self.data
                .par_chunks_mut(stride)
                .enumerate()
                .skip(1)
                .take(ny)
                .for_each(update_row);
        } else {
            self.data
                .chunks_mut(stride)
                .enumerate()
                .skip(1)
                .take(ny)
                .for_each(update_row);
        }
    }

    pub fn fill_with_index(&mut self, f: impl Fn(usize, usize) -> f32) {
        let stride = self.grid.stride();
        for (n, value) in self.data.iter_mut().enumerate() {
            *value = f(n % stride, n / stride);
        }
    }

    pub fn scale_in_place(&mut self, scale: f32) {
        for value in &mut self.data {
            *value *= scale;
        }
    }

    pub fn add_scaled_in_place(&mut self, other: &Self, scale: f32) {
        self.assert_same_grid(other);
        for (value, other_value) in self.data.iter_mut().zip(other.data.iter()) {
            *value += other_value * scale;
        }
    }

    fn interior(&self) -> impl Iterator<Item = f32> + '_ {
        let nx = self.grid.nx();
        self.data
            .chunks(self.grid.stride())
            .skip(1)
            .take(self.grid.ny())
            .flat_map(move |row| row[1..=nx].iter().copied())
    }

    pub fn interior_sum(&self) -> f32 {
        self.interior().sum()
    }

    pub fn interior_rms(&self) -> f32 {
        let sum_sq: f32 = self.interior().map(|value| value * value).sum();
        (sum_sq / self.grid.interior_count() as f32).sqrt()
    }

    pub fn min_max(&self) -> (f32, f32) {
        let mut iter = self.interior().filter(|value| value.is_finite());
        let Some(first) = iter.next() else {
            return (0.0, 0.0);
        };
        iter.fold((first, first), |(lo, hi), value| (lo.min(value), hi.max(value)))
    }

    fn assert_same_grid(&self, other: &Self) {
        assert_eq!(self.grid, other.grid, "field grid mismatch");
    }
}
