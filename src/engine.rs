use tracing::trace;

use crate::grid::Grid;
use crate::neighborhood::CountNeighbors;
use crate::rule_set::B3S23;
use crate::rule_set::RuleSet;

/// Compute the next generation of `grid` under Conway's rules (B3/S23).
pub fn step<N>(grid: &Grid, neighborhood: &N) -> Grid
where
    N: CountNeighbors + ?Sized,
{
    step_with(grid, neighborhood, B3S23)
}

/// Like [`step`], for any birth/survival rule.
pub fn step_with<N>(grid: &Grid, neighborhood: &N, rule: RuleSet) -> Grid
where
    N: CountNeighbors + ?Sized,
{
    let mut next = grid.clone();
    step_into(grid, neighborhood, rule, &mut next);

    next
}

/// Write the next generation of `grid` into `next`, reusing its allocation.
///
/// Every cell of `next` is overwritten, and `next` takes the dimensions of `grid`. Reads only
/// ever go to `grid`, so no cell sees a partially computed generation.
pub fn step_into<N>(grid: &Grid, neighborhood: &N, rule: RuleSet, next: &mut Grid)
where
    N: CountNeighbors + ?Sized,
{
    let (width, height) = grid.dimensions();
    next.reshape_like(grid);

    for row in 0..height {
        for col in 0..width {
            let n = neighborhood.count(grid, row, col);
            next.put(row, col, rule.next(grid.at(row, col), n));
        }
    }

    trace!(
        before = grid.population(),
        after = next.population(),
        "Stepped {width}x{height} grid"
    );
}

/// Iterator over successive generations, starting with the seed itself.
pub struct Generations<N> {
    current: Option<Grid>,
    neighborhood: N,
    rule: RuleSet,
}

impl<N: CountNeighbors> Generations<N> {
    pub fn new(seed: Grid, neighborhood: N, rule: RuleSet) -> Self {
        Self {
            current: Some(seed),
            neighborhood,
            rule,
        }
    }
}

impl<N: CountNeighbors> Iterator for Generations<N> {
    type Item = Grid;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        self.current = Some(step_with(&current, &self.neighborhood, self.rule));

        Some(current)
    }
}
