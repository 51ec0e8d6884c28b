// ===== chromaforge/src/solver/breakout.rs =====
use crate::error::CfResult;
use crate::solver::{OnImproved, Problem, SolveOptions};
use std::time::Instant;

const TIME_CHECK_MASK: u64 = 0xff;

/// Breakout local search: minimize the weighted sum of constraint
/// dissatisfaction (weight * (1 - degree)). When no single-variable
/// move improves the objective, the weights of the currently worst
/// constraints are raised so the search climbs out of the minimum.
pub(crate) fn run(
    problem: &Problem,
    options: &SolveOptions,
    deadline: Instant,
    on_improved: OnImproved,
) -> CfResult<Option<f64>> {
    let mut rng = match options.seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    };
    let by_var = super::constraints_by_var(problem);
    let n = problem.domains.len();

    let mut assignment = vec![0usize; n];
    let mut weights = vec![1.0f64; problem.constraints.len()];
    let mut best = -1.0f64;
    let mut steps = 0u64;

    loop {
        let worst = problem.worst_degree(&assignment);
        if worst > best {
            best = worst;
            if (on_improved)(&assignment, worst) || worst >= options.target_degree {
                break;
            }
        }

        steps += 1;
        if steps & TIME_CHECK_MASK == 0 && Instant::now() >= deadline {
            break;
        }
        if problem.constraints.is_empty() {
            break;
        }

        let current = objective(problem, &weights, &assignment);

        // Best single-variable move, ties broken at random.
        let mut move_to: Option<(usize, usize)> = None;
        let mut move_obj = current;
        let mut ties = 0usize;
        for var in 0..n {
            for value in 0..problem.domains[var] {
                if value == assignment[var] {
                    continue;
                }
                let delta = objective_delta(problem, &by_var, &weights, &assignment, var, value);
                let obj = current + delta;
                if obj < move_obj - 1e-12 {
                    move_obj = obj;
                    move_to = Some((var, value));
                    ties = 1;
                } else if move_to.is_some() && (obj - move_obj).abs() <= 1e-12 {
                    ties += 1;
                    if rng.usize(0..ties) == 0 {
                        move_to = Some((var, value));
                    }
                }
            }
        }

        match move_to {
            Some((var, value)) => assignment[var] = value,
            None => {
                // Local minimum: escalate the worst constraints.
                let worst_now = problem.worst_degree(&assignment);
                for (ci, c) in problem.constraints.iter().enumerate() {
                    let d = c
                        .relation
                        .degree(assignment[c.scope.0], assignment[c.scope.1]);
                    if d <= worst_now + 1e-9 {
                        weights[ci] += 1.0;
                    }
                }
            }
        }
    }

    Ok(if best < 0.0 { None } else { Some(best) })
}

fn objective(problem: &Problem, weights: &[f64], assignment: &[usize]) -> f64 {
    problem
        .constraints
        .iter()
        .zip(weights)
        .map(|(c, w)| {
            w * (1.0
                - c.relation
                    .degree(assignment[c.scope.0], assignment[c.scope.1]))
        })
        .sum()
}

/// Objective change from assigning `value` to `var`, touching only
/// that variable's constraints.
fn objective_delta(
    problem: &Problem,
    by_var: &[Vec<(usize, usize, bool)>],
    weights: &[f64],
    assignment: &[usize],
    var: usize,
    value: usize,
) -> f64 {
    let mut delta = 0.0;
    for &(ci, other, var_is_left) in &by_var[var] {
        let rel = &problem.constraints[ci].relation;
        let (old, new) = if var_is_left {
            (
                rel.degree(assignment[var], assignment[other]),
                rel.degree(value, assignment[other]),
            )
        } else {
            (
                rel.degree(assignment[other], assignment[var]),
                rel.degree(assignment[other], value),
            )
        };
        delta += weights[ci] * (old - new);
    }
    delta
}
