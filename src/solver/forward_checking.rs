// ===== chromaforge/src/solver/forward_checking.rs =====
use crate::error::CfResult;
use crate::solver::{OnImproved, Problem, SolveOptions};
use std::time::Instant;

const TIME_CHECK_MASK: u64 = 0x3ff;

/// Depth-first branch and bound on the worst fuzzy degree. Variables
/// are assigned in index order; a value is pruned as soon as its
/// degree against the already-assigned neighbors cannot beat the
/// incumbent. Value 0 is tried first, so the unmodified palette is
/// the first full assignment reached.
pub(crate) fn run(
    problem: &Problem,
    options: &SolveOptions,
    deadline: Instant,
    on_improved: OnImproved,
) -> CfResult<Option<f64>> {
    let mut search = Search {
        problem,
        adjacency: super::constraints_by_var(problem),
        assignment: vec![0; problem.domains.len()],
        best: -1.0,
        target: options.target_degree,
        deadline,
        nodes: 0,
        stop: false,
        on_improved,
    };
    search.descend(0, 1.0);
    Ok(if search.best < 0.0 {
        None
    } else {
        Some(search.best)
    })
}

struct Search<'a> {
    problem: &'a Problem,
    adjacency: Vec<Vec<(usize, usize, bool)>>,
    assignment: Vec<usize>,
    best: f64,
    target: f64,
    deadline: Instant,
    nodes: u64,
    stop: bool,
    on_improved: OnImproved<'a>,
}

impl Search<'_> {
    fn descend(&mut self, var: usize, floor: f64) {
        if self.stop {
            return;
        }
        if var == self.problem.domains.len() {
            // floor is the exact worst degree: every constraint has
            // both endpoints assigned by now.
            if floor > self.best {
                self.best = floor;
                if (self.on_improved)(&self.assignment, floor) || floor >= self.target {
                    self.stop = true;
                }
            }
            return;
        }

        for value in 0..self.problem.domains[var] {
            self.nodes += 1;
            if self.nodes & TIME_CHECK_MASK == 0 && Instant::now() >= self.deadline {
                self.stop = true;
            }
            if self.stop {
                return;
            }

            let mut bound = floor;
            for &(ci, other, _) in &self.adjacency[var] {
                if other < var {
                    let c = &self.problem.constraints[ci];
                    let (a, b) = if c.scope.0 == var {
                        (value, self.assignment[other])
                    } else {
                        (self.assignment[other], value)
                    };
                    bound = bound.min(c.relation.degree(a, b));
                    if bound <= self.best {
                        break;
                    }
                }
            }
            if bound > self.best {
                self.assignment[var] = value;
                self.descend(var + 1, bound);
            }
        }
    }
}
