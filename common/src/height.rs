use rand::RngCore;

/// Draws node heights from a geometric distribution.
///
/// Every draw starts at 1 and climbs one level for each successful trial,
/// where a trial succeeds with probability `1 / branching_factor`. A factor
/// of 2 is a fair coin and gives an expected height of about 2.
#[derive(Debug, Clone)]
pub struct HeightGenerator<R> {
    rng: R,
    max_height: usize,
    branching_factor: u32,
}

impl<R: RngCore> HeightGenerator<R> {
    /// `max_height` is raised to 1 and `branching_factor` to 2 if given lower.
    pub fn new(rng: R, max_height: usize, branching_factor: u32) -> Self {
        Self {
            rng,
            max_height: max_height.max(1),
            branching_factor: branching_factor.max(2),
        }
    }

    /// Returns a height in `1..=max_height`.
    pub fn next_height(&mut self) -> usize {
        let mut height = 1;
        while height < self.max_height && self.rng.next_u32() % self.branching_factor == 0 {
            height += 1;
        }
        height
    }

    pub fn max_height(&self) -> usize {
        self.max_height
    }

    pub fn branching_factor(&self) -> u32 {
        self.branching_factor
    }
}
