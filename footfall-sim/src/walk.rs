// Walk simulation: one customer at a time takes weighted random steps
// over the shared site graph until the session ends.

use crate::error::{Result, SimError};
use crate::graph::{PageId, SiteGraph, Transition};
use crate::identity::Identity;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use tracing::{debug, trace};

/// One completed transition in a customer's history.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub at: DateTime<Utc>,
    pub source: PageId,
    pub transition: Transition,
}

/// A simulated visitor. Owns its walk state; only its own step mutates it.
#[derive(Debug, Clone)]
pub struct Customer {
    pub identity: Identity,
    pub current: Option<PageId>,
    pub clock: DateTime<Utc>,
    pub history: Vec<Visit>,
}

impl Customer {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            current: None,
            clock: DateTime::UNIX_EPOCH,
            history: Vec::new(),
        }
    }
}

/// What a single step decided.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The page's quit probability fired; session over, nothing recorded.
    Quit,
    /// The page has no outgoing transitions; session over, nothing recorded.
    NoTransitions,
    /// A weighted transition was followed and recorded.
    Routed(Transition),
}

/// Why a full walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// Quit probability fired.
    Quit,
    /// Landed on a page with no outgoing transitions.
    DeadEnd,
    /// Followed a transition with no destination.
    Exited,
    /// The history reached the configured step bound.
    StepCap,
}

/// Normalized running totals of a weight list, in list order. The last
/// entry sums to 1.0 up to float rounding.
pub fn cumulative_weights(weights: &[f64]) -> std::result::Result<Vec<f64>, String> {
    if weights.is_empty() {
        return Err("empty transition list".to_string());
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err("negative or non-finite weight".to_string());
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err("all weights are zero".to_string());
    }
    let mut acc = 0.0;
    Ok(weights
        .iter()
        .map(|w| {
            acc += w / total;
            acc
        })
        .collect())
}

/// Index of the first entry whose cumulative weight exceeds `p`. `p` at or
/// past the final total (p = 1.0 included) maps to the last entry; the
/// upper bound is inclusive on purpose. `cumulative` must be non-empty.
pub fn pick(cumulative: &[f64], p: f64) -> usize {
    cumulative
        .iter()
        .position(|&c| c > p)
        .unwrap_or(cumulative.len() - 1)
}

/// Drives customers across a shared, read-only site graph.
pub struct Walker<'g, R> {
    graph: &'g SiteGraph,
    rng: R,
}

impl<'g, R: Rng> Walker<'g, R> {
    pub fn new(graph: &'g SiteGraph, rng: R) -> Self {
        Self { graph, rng }
    }

    /// Put the customer on its entry page at the given simulated time and
    /// discard any previous history.
    pub fn start(&self, customer: &mut Customer, entry: PageId, at: DateTime<Utc>) {
        customer.current = Some(entry);
        customer.clock = at;
        customer.history.clear();
    }

    /// Advance the customer by exactly one transition, or end the session.
    pub fn step(&mut self, customer: &mut Customer) -> Result<StepOutcome> {
        let Some(current) = customer.current else {
            return Ok(StepOutcome::NoTransitions);
        };
        let page = self.graph.page(current);

        if self.rng.random::<f64>() < page.quit_probability {
            debug!(user = %customer.identity.user_id, page = %page.address(), "session quit");
            customer.current = None;
            return Ok(StepOutcome::Quit);
        }
        if page.outlinks.is_empty() {
            debug!(user = %customer.identity.user_id, page = %page.address(), "dead end");
            customer.current = None;
            return Ok(StepOutcome::NoTransitions);
        }

        let weights: Vec<f64> = page.outlinks.iter().map(|(w, _)| *w).collect();
        let cumulative = cumulative_weights(&weights)
            .map_err(|reason| SimError::InvalidWeights(format!("{}: {}", page.address(), reason)))?;
        let p = self.rng.random::<f64>();
        let (_, transition) = &page.outlinks[pick(&cumulative, p)];
        let transition = transition.clone();

        let dwell = self.dwell_seconds(transition.mean_seconds)?;
        customer.clock = customer.clock + Duration::seconds(dwell);
        customer.current = transition.destination;
        customer.history.push(Visit {
            at: customer.clock,
            source: current,
            transition: transition.clone(),
        });
        trace!(
            user = %customer.identity.user_id,
            from = %page.address(),
            dwell,
            "routed"
        );
        Ok(StepOutcome::Routed(transition))
    }

    /// Step until the session ends naturally or the history holds
    /// `max_steps` entries. A bound of 0 means unbounded.
    pub fn run(&mut self, customer: &mut Customer, max_steps: usize) -> Result<WalkEnd> {
        while customer.current.is_some() {
            if max_steps != 0 && customer.history.len() >= max_steps {
                debug!(
                    user = %customer.identity.user_id,
                    steps = customer.history.len(),
                    "step bound reached"
                );
                return Ok(WalkEnd::StepCap);
            }
            match self.step(customer)? {
                StepOutcome::Quit => return Ok(WalkEnd::Quit),
                StepOutcome::NoTransitions => return Ok(WalkEnd::DeadEnd),
                StepOutcome::Routed(t) if t.destination.is_none() => return Ok(WalkEnd::Exited),
                StepOutcome::Routed(_) => {}
            }
        }
        Ok(WalkEnd::DeadEnd)
    }

    /// Poisson-distributed dwell in whole seconds. The configured mean is
    /// authoritative; a mean of 0 advances nothing.
    fn dwell_seconds(&mut self, mean: f64) -> Result<i64> {
        if mean <= 0.0 {
            return Ok(0);
        }
        let poisson = Poisson::new(mean).map_err(|e| SimError::Sampling(e.to_string()))?;
        Ok(poisson.sample(&mut self.rng) as i64)
    }
}
