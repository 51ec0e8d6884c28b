// ===== chromaforge/src/adjuster.rs =====
use crate::config::{Parameters, ScoringStrategy};
use crate::consts::AUTO_ACCEPT_DEGREE;
use crate::domain::{AdaptiveDomainFactory, DomainFactory, UniformDomainFactory};
use crate::palette::{Candidates, Scheme};
use crate::relation::{
    FixedTargetFactory, RatioAggregation, RatioFactory, RelationFactory, Side,
};
use crate::solver::{self, Problem, SolveOptions};
use std::rc::Rc;
use std::time::Duration;
use strum_macros::Display;
use tracing::{debug, warn};

/// Where the last `adjust` call got to; diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AdjustState {
    Idle,
    ProblemBuilt,
    Solving,
    Solved,
    NoResult,
}

/// Observes each improved scheme during a solve. Returning `true`
/// accepts the scheme and stops the search.
pub trait AdjustListener {
    fn accept(&mut self, scheme: &Scheme) -> bool;
}

impl<F: FnMut(&Scheme) -> bool> AdjustListener for F {
    fn accept(&mut self, scheme: &Scheme) -> bool {
        self(scheme)
    }
}

/// Drives one adjustment: builds candidate domains and scoring
/// relations per the configured strategy pairing, hands the problem
/// to the fuzzy solver and rebuilds a Scheme from each improved
/// assignment.
pub struct Adjuster {
    params: Parameters,
    listeners: Vec<Box<dyn AdjustListener>>,
    state: AdjustState,
}

impl Adjuster {
    pub fn new(params: Parameters) -> Self {
        Self {
            params,
            listeners: Vec::new(),
            state: AdjustState::Idle,
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn AdjustListener>) {
        self.listeners.push(listener);
    }

    pub fn last_state(&self) -> AdjustState {
        self.state
    }

    /// Adjust the scheme's colors so adjacent pairs stay apart under
    /// the enabled visions. The input scheme gets its quality set to
    /// the baseline degree of its current colors; the best adjusted
    /// scheme found is returned, `None` when the search produced no
    /// full assignment or failed outright.
    pub fn adjust(&mut self, scheme: &mut Scheme) -> Option<Scheme> {
        self.state = AdjustState::Idle;

        if scheme.adjacencies().is_empty() {
            // Nothing constrains anything; the scheme is already
            // perfect.
            scheme.set_quality(1.0);
            let mut out = scheme.clone();
            out.set_quality(1.0);
            self.state = AdjustState::Solved;
            return Some(out);
        }

        let omit = self
            .params
            .search
            .bottleneck_mode
            .then(|| scheme.bottleneck_index());

        let domains: Vec<Rc<Candidates>> = match self.params.search.scoring {
            ScoringStrategy::FixedTarget => UniformDomainFactory::new(scheme, &self.params)
                .build(omit)
                .into_iter()
                .map(Rc::new)
                .collect(),
            ScoringStrategy::RatioAverage | ScoringStrategy::RatioMinimum => {
                AdaptiveDomainFactory::new(scheme, &self.params)
                    .build(omit)
                    .into_iter()
                    .map(Rc::new)
                    .collect()
            }
        };

        let mut factory: Box<dyn RelationFactory> = match self.params.search.scoring {
            ScoringStrategy::FixedTarget => {
                Box::new(FixedTargetFactory::new(scheme, &self.params))
            }
            ScoringStrategy::RatioAverage => Box::new(RatioFactory::new(
                scheme,
                &self.params,
                RatioAggregation::Average,
                omit,
            )),
            ScoringStrategy::RatioMinimum => Box::new(RatioFactory::new(
                scheme,
                &self.params,
                RatioAggregation::Minimum,
                omit,
            )),
        };

        for &(i, j) in scheme.adjacencies() {
            if scheme.is_fixed(i) && scheme.is_fixed(j) {
                continue;
            }
            // The omitted bottleneck keeps its edges but is exempt
            // from preservation on them.
            let skip = match omit {
                Some(k) if k == i => Some(Side::Left),
                Some(k) if k == j => Some(Side::Right),
                _ => None,
            };
            factory.add_edge(i, j, Rc::clone(&domains[i]), Rc::clone(&domains[j]), skip);
        }

        let problem = Problem {
            domains: domains.iter().map(|d| d.len()).collect(),
            constraints: factory.seal(),
        };
        self.state = AdjustState::ProblemBuilt;

        // Degree of leaving every color as it is.
        let baseline_assignment: Vec<usize> = domains
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let current = scheme.value(i).rgb();
                d.list
                    .iter()
                    .position(|v| v.rgb() == current)
                    .unwrap_or(0)
            })
            .collect();
        let baseline = problem.worst_degree(&baseline_assignment);
        scheme.set_quality(baseline);
        debug!(baseline, ?omit, "adjustment problem built");

        let options = SolveOptions {
            time_limit: Duration::from_millis(self.params.search.time_limit_ms),
            target_degree: self.params.search.target_degree,
            seed: self.params.search.seed,
        };

        let adjacency = scheme.adjacencies().to_vec();
        let listeners = &mut self.listeners;
        let mut retained: Option<Scheme> = None;
        self.state = AdjustState::Solving;

        let mut on_improved = |assignment: &[usize], degree: f64| -> bool {
            let colors = assignment
                .iter()
                .enumerate()
                .map(|(i, &v)| domains[i].value(v).rgb())
                .collect();
            let mut improved = match Scheme::new(colors, Some(adjacency.clone())) {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "could not rebuild scheme from assignment");
                    return false;
                }
            };
            improved.set_quality(degree);

            // Every listener sees every improvement.
            let mut accepted = false;
            for listener in listeners.iter_mut() {
                if listener.accept(&improved) {
                    accepted = true;
                }
            }
            retained = Some(improved);
            accepted || degree > AUTO_ACCEPT_DEGREE
        };

        match solver::solve(
            &problem,
            self.params.search.solver,
            &options,
            &mut on_improved,
        ) {
            Ok(best) => {
                debug!(?best, "solve finished");
                self.state = if retained.is_some() {
                    AdjustState::Solved
                } else {
                    AdjustState::NoResult
                };
                retained
            }
            Err(e) => {
                warn!(error = %e, "solve failed");
                self.state = AdjustState::NoResult;
                None
            }
        }
    }
}
