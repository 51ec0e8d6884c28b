// ===== chromaforge/src/solver/mod.rs =====
pub mod breakout;
pub mod forward_checking;
pub mod repair;

use crate::error::{CfResult, ChromaForgeError};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::{Duration, Instant};
use strum_macros::{Display, EnumString};

/// A fuzzy relation over two bounded-integer variables: a
/// satisfaction degree in [0, 1] per value pair.
pub trait Relation {
    fn degree(&self, a: usize, b: usize) -> f64;
}

pub struct Constraint {
    pub scope: (usize, usize),
    pub relation: Rc<dyn Relation>,
}

/// A fuzzy constraint problem: one bounded-integer domain size per
/// variable plus pairwise constraints.
pub struct Problem {
    pub domains: Vec<usize>,
    pub constraints: Vec<Constraint>,
}

impl Problem {
    /// Worst per-constraint degree of a full assignment; 1 when there
    /// are no constraints.
    pub fn worst_degree(&self, assignment: &[usize]) -> f64 {
        self.constraints
            .iter()
            .map(|c| {
                c.relation
                    .degree(assignment[c.scope.0], assignment[c.scope.1])
            })
            .fold(1.0, f64::min)
    }

    fn validate(&self) -> CfResult<()> {
        if let Some(var) = self.domains.iter().position(|&d| d == 0) {
            return Err(ChromaForgeError::Solver(format!(
                "variable {var} has an empty domain"
            )));
        }
        for c in &self.constraints {
            let (i, j) = c.scope;
            if i >= self.domains.len() || j >= self.domains.len() {
                return Err(ChromaForgeError::Solver(format!(
                    "constraint scope ({i}, {j}) out of range"
                )));
            }
        }
        Ok(())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum SearchStrategy {
    /// Branch and bound on the worst fuzzy degree with look-ahead
    /// pruning against assigned neighbors.
    ForwardChecking,
    /// Min-conflicts hill climbing with random walk and restarts.
    StochasticRepair,
    /// Weighted-penalty local search; constraint weights escalate at
    /// local minima.
    Breakout,
}

pub struct SolveOptions {
    pub time_limit: Duration,
    /// Worst degree at which the search may stop.
    pub target_degree: f64,
    pub seed: Option<u64>,
}

/// Invoked for each full assignment strictly improving the incumbent
/// worst degree. Returning `true` stops the search.
pub type OnImproved<'a> = &'a mut dyn FnMut(&[usize], f64) -> bool;

/// Run the selected strategy until the target degree is reached, the
/// time budget is spent, or the callback accepts. Returns the best
/// worst-degree found, `None` when no full assignment was reported.
pub fn solve(
    problem: &Problem,
    strategy: SearchStrategy,
    options: &SolveOptions,
    on_improved: OnImproved,
) -> CfResult<Option<f64>> {
    problem.validate()?;
    let deadline = Instant::now() + options.time_limit;
    match strategy {
        SearchStrategy::ForwardChecking => {
            forward_checking::run(problem, options, deadline, on_improved)
        }
        SearchStrategy::StochasticRepair => repair::run(problem, options, deadline, on_improved),
        SearchStrategy::Breakout => breakout::run(problem, options, deadline, on_improved),
    }
}

/// Constraints touching each variable: (constraint index, other
/// variable, true when the variable is the scope's left side).
pub(crate) fn constraints_by_var(problem: &Problem) -> Vec<Vec<(usize, usize, bool)>> {
    let mut by_var = vec![Vec::new(); problem.domains.len()];
    for (ci, c) in problem.constraints.iter().enumerate() {
        let (i, j) = c.scope;
        by_var[i].push((ci, j, true));
        by_var[j].push((ci, i, false));
    }
    by_var
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fully satisfied when the two values differ.
    struct Distinct;

    impl Relation for Distinct {
        fn degree(&self, a: usize, b: usize) -> f64 {
            if a == b {
                0.2
            } else {
                1.0
            }
        }
    }

    fn distinct_pair() -> Problem {
        Problem {
            domains: vec![3, 3],
            constraints: vec![Constraint {
                scope: (0, 1),
                relation: Rc::new(Distinct),
            }],
        }
    }

    fn options() -> SolveOptions {
        SolveOptions {
            time_limit: Duration::from_millis(500),
            target_degree: 0.9,
            seed: Some(42),
        }
    }

    #[test]
    fn worst_degree_is_the_minimum_over_constraints() {
        let problem = distinct_pair();
        assert_eq!(problem.worst_degree(&[0, 0]), 0.2);
        assert_eq!(problem.worst_degree(&[0, 1]), 1.0);
    }

    #[test]
    fn no_constraints_means_fully_satisfied() {
        let problem = Problem {
            domains: vec![2],
            constraints: vec![],
        };
        assert_eq!(problem.worst_degree(&[0]), 1.0);
    }

    #[test]
    fn empty_domains_and_bad_scopes_are_rejected() {
        let empty = Problem {
            domains: vec![3, 0],
            constraints: vec![],
        };
        assert!(empty.validate().is_err());

        let out_of_range = Problem {
            domains: vec![3],
            constraints: vec![Constraint {
                scope: (0, 4),
                relation: Rc::new(Distinct),
            }],
        };
        assert!(out_of_range.validate().is_err());
    }

    #[test]
    fn every_strategy_solves_the_distinct_pair() {
        for strategy in [
            SearchStrategy::ForwardChecking,
            SearchStrategy::StochasticRepair,
            SearchStrategy::Breakout,
        ] {
            let problem = distinct_pair();
            let mut last = Vec::new();
            let best = solve(&problem, strategy, &options(), &mut |a: &[usize], _| {
                last = a.to_vec();
                false
            })
            .expect("solve");
            assert_eq!(best, Some(1.0), "{strategy}");
            assert_ne!(last[0], last[1], "{strategy}");
        }
    }

    #[test]
    fn accepting_callback_stops_the_search() {
        let problem = distinct_pair();
        let mut calls = 0;
        let best = solve(
            &problem,
            SearchStrategy::ForwardChecking,
            &options(),
            &mut |_: &[usize], _| {
                calls += 1;
                true
            },
        )
        .expect("solve");
        // The first full assignment is all zeros and already reported.
        assert_eq!(calls, 1);
        assert_eq!(best, Some(0.2));
    }
}
