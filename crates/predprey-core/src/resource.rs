use crate::rng::SimRng;
use crate::spatial::Position;

/// Per-cell food matrix with a fixed per-cell growth increment.
/// Every cell value stays within `[0, max_food]`.
#[derive(Clone, Debug)]
pub struct ResourceField {
    width: usize,
    height: usize,
    max_food: f64,
    data: Vec<f64>,
    growth: Vec<f64>,
    total: f64,
}

impl ResourceField {
    /// Uniform field: every cell holds `initial_value` and grows by `growth_per_tick`.
    pub fn new(
        width: usize,
        height: usize,
        max_food: f64,
        initial_value: f64,
        growth_per_tick: f64,
    ) -> Self {
        assert!(width > 0 && height > 0, "field dimensions must be positive");
        let n_cells = width * height;
        let value = initial_value.clamp(0.0, max_food);
        Self {
            width,
            height,
            max_food,
            data: vec![value; n_cells],
            growth: vec![growth_per_tick; n_cells],
            total: value * n_cells as f64,
        }
    }

    /// Random field: food uniform in `[0, max_food)`, growth uniform in `[0, growth_max)`.
    ///
    /// Food is drawn for every cell first, then growth, both in row-major order.
    pub fn new_random(
        width: usize,
        height: usize,
        max_food: f64,
        growth_max: f64,
        rng: &mut SimRng,
    ) -> Self {
        let mut field = Self::new(width, height, max_food, 0.0, 0.0);
        for cell in &mut field.data {
            *cell = rng.uniform_below(max_food);
        }
        for g in &mut field.growth {
            *g = rng.uniform_below(growth_max);
        }
        field.total = field.data.iter().sum();
        field
    }

    /// Add each cell's growth increment, then clamp into `[0, max_food]`.
    pub fn grow(&mut self) {
        let mut total = 0.0;
        for (cell, g) in self.data.iter_mut().zip(&self.growth) {
            *cell = (*cell + g).clamp(0.0, self.max_food);
            total += *cell;
        }
        self.total = total;
    }

    /// Withdraw up to `requested` from `pos` and return the amount actually taken.
    pub fn consume(&mut self, pos: Position, requested: f64) -> f64 {
        let idx = self.index(pos);
        let available = self.data[idx];
        let transfer = requested.max(0.0).min(available);
        self.data[idx] = (available - transfer).clamp(0.0, self.max_food);
        self.total -= transfer;
        transfer
    }

    pub fn get(&self, pos: Position) -> f64 {
        self.data[self.index(pos)]
    }

    /// Overwrite one cell; the value is clamped into `[0, max_food]`.
    pub fn set(&mut self, pos: Position, value: f64) {
        let idx = self.index(pos);
        let value = value.clamp(0.0, self.max_food);
        self.total += value - self.data[idx];
        self.data[idx] = value;
    }

    /// Overwrite every cell; the value is clamped into `[0, max_food]`.
    pub fn fill(&mut self, value: f64) {
        let value = value.clamp(0.0, self.max_food);
        self.data.fill(value);
        self.total = value * self.data.len() as f64;
    }

    pub fn growth_at(&self, pos: Position) -> f64 {
        self.growth[self.index(pos)]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_food(&self) -> f64 {
        self.max_food
    }

    /// Row-major cell values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    fn index(&self, pos: Position) -> usize {
        debug_assert!(
            pos.x < self.width && pos.y < self.height,
            "position {pos:?} out of bounds"
        );
        pos.y * self.width + pos.x
    }
}
