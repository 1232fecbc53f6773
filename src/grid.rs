/// Padded cell layout: `nx * ny` interior cells wrapped in a one-cell halo.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid2 {
    nx: usize,
    ny: usize,
    dx: f32,
}

impl Grid2 {
    pub fn new(nx: usize, ny: usize, dx: f32) -> Self {
        assert!(nx > 0, "nx must be > 0");
        assert!(ny > 0, "ny must be > 0");
        assert!(dx > 0.0, "dx must be > 0");
        Self { nx, ny, dx }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn dx(&self) -> f32 {
        self.dx
    }

    /// Row stride of the padded layout.
    pub fn stride(&self) -> usize {
        self.nx + 2
    }

    pub fn padded_height(&self) -> usize {
        self.ny + 2
    }

    pub fn size(&self) -> usize {
        self.stride() * self.padded_height()
    }

    pub fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(i <= self.nx + 1 && j <= self.ny + 1);
        i + self.stride() * j
    }

    pub fn clamp_coord(&self, i: i32, j: i32) -> (usize, usize) {
        let max_i = (self.nx + 1) as i32;
        let max_j = (self.ny + 1) as i32;
        (i.clamp(0, max_i) as usize, j.clamp(0, max_j) as usize)
    }

    /// World-space center of cell `(i, j)`, halo cells included.
    pub fn cell_center(&self, i: usize, j: usize) -> (f32, f32) {
        (
            (i as f32 + 0.5) * self.dx,
            (j as f32 + 0.5) * self.dx,
        )
    }

    pub fn interior_count(&self) -> usize {
        self.nx * self.ny
    }
}
