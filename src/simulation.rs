use std::convert::Infallible;
use std::mem;
use std::time::Duration;

use tracing::debug;
use tracing::info;

use crate::cancel::CancelToken;
use crate::engine;
use crate::grid::Grid;
use crate::neighborhood::CountNeighbors;
use crate::neighborhood::Neighborhood;
use crate::rule_set::RuleSet;

/// Consumer of generations. Renderers only ever see a finished generation, and can't feed
/// anything back into it.
pub trait Render {
    type Error;

    fn render(&mut self, generation: u64, grid: &Grid) -> Result<(), Self::Error>;
}

impl<F, E> Render for F
where
    F: FnMut(u64, &Grid) -> Result<(), E>,
{
    type Error = E;

    fn render(&mut self, generation: u64, grid: &Grid) -> Result<(), Self::Error> {
        self(generation, grid)
    }
}

/// Renderer that throws every generation away
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl Render for Discard {
    type Error = Infallible;

    fn render(&mut self, _generation: u64, _grid: &Grid) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The [`CancelToken`] was cancelled
    Cancelled,

    /// The `should_continue` predicate returned `false`
    Halted,

    /// The configured number of generations was rendered
    LimitReached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// How many generations were rendered
    pub generations: u64,

    /// The last rendered generation, or the seed if nothing was rendered
    pub last: Grid,

    pub reason: StopReason,
}

/// Drives the engine: render, step, wait, repeat.
///
/// The neighborhood, rule and delay are fixed for the whole run.
#[derive(Debug, Clone)]
pub struct Simulation<N = Neighborhood> {
    neighborhood: N,
    rule: RuleSet,
    delay: Duration,
    limit: Option<u64>,
}

impl<N: CountNeighbors> Simulation<N> {
    pub fn new(neighborhood: N) -> Self {
        Self {
            neighborhood,
            rule: RuleSet::default(),
            delay: Duration::ZERO,
            limit: None,
        }
    }

    pub fn with_rule(mut self, rule: RuleSet) -> Self {
        self.rule = rule;
        self
    }

    /// Pause between two generations
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Stop after rendering `generations` generations (the seed counts as one)
    pub fn with_limit(mut self, generations: u64) -> Self {
        self.limit = Some(generations);
        self
    }

    pub fn neighborhood(&self) -> &N {
        &self.neighborhood
    }

    pub fn rule(&self) -> RuleSet {
        self.rule
    }

    /// Run until cancelled, or until the generation limit is reached.
    pub fn run<R>(
        &self,
        seed: Grid,
        renderer: &mut R,
        cancel: &CancelToken,
    ) -> Result<Outcome, R::Error>
    where
        R: Render + ?Sized,
    {
        self.run_while(seed, renderer, cancel, |_, _| true)
    }

    /// Like [`Simulation::run`], also stopping as soon as `should_continue` returns `false`
    /// for the generation about to be rendered.
    pub fn run_while<R, F>(
        &self,
        seed: Grid,
        renderer: &mut R,
        cancel: &CancelToken,
        mut should_continue: F,
    ) -> Result<Outcome, R::Error>
    where
        R: Render + ?Sized,
        F: FnMut(u64, &Grid) -> bool,
    {
        let (width, height) = seed.dimensions();
        info!(
            rule = %self.rule,
            delay = ?self.delay,
            limit = ?self.limit,
            "Starting {width}x{height} simulation"
        );

        let limit_reached = |rendered: u64| self.limit.is_some_and(|l| rendered >= l);

        let mut current = seed;
        let mut next = current.clone();
        let mut rendered = 0;

        let reason = loop {
            if cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            if limit_reached(rendered) {
                break StopReason::LimitReached;
            }

            if !should_continue(rendered, &current) {
                break StopReason::Halted;
            }

            renderer.render(rendered, &current)?;
            debug!(generation = rendered, population = current.population(), "Rendered");
            rendered += 1;

            if limit_reached(rendered) {
                break StopReason::LimitReached;
            }

            engine::step_into(&current, &self.neighborhood, self.rule, &mut next);

            if !self.delay.is_zero() && cancel.wait_timeout(self.delay) {
                break StopReason::Cancelled;
            }

            mem::swap(&mut current, &mut next);
        };

        info!(generations = rendered, ?reason, "Simulation stopped");

        Ok(Outcome {
            generations: rendered,
            last: current,
            reason,
        })
    }
}
