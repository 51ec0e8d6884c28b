// ===== chromaforge/src/solver/repair.rs =====
use crate::error::CfResult;
use crate::solver::{OnImproved, Problem, SolveOptions};
use std::time::Instant;

/// Chance of taking a random value instead of the greedy best, to
/// escape plateaus.
const RANDOM_WALK_P: f64 = 0.1;

/// Steps without improvement before the assignment is re-randomized.
const RESTART_AFTER: u64 = 2000;

const TIME_CHECK_MASK: u64 = 0xff;

/// Min-conflicts style repair over fuzzy degrees: repeatedly pick one
/// of the worst-satisfied constraints, reassign one of its variables
/// to the value that best satisfies that variable's constraints, and
/// report whenever the global worst degree improves.
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
    let mut best = -1.0f64;
    let mut steps = 0u64;
    let mut since_improved = 0u64;

    loop {
        let worst = problem.worst_degree(&assignment);
        if worst > best {
            best = worst;
            since_improved = 0;
            if (on_improved)(&assignment, worst) || worst >= options.target_degree {
                break;
            }
        } else {
            since_improved += 1;
        }

        steps += 1;
        if steps & TIME_CHECK_MASK == 0 && Instant::now() >= deadline {
            break;
        }
        if problem.constraints.is_empty() {
            break;
        }

        if since_improved >= RESTART_AFTER {
            for (var, slot) in assignment.iter_mut().enumerate() {
                *slot = rng.usize(0..problem.domains[var]);
            }
            since_improved = 0;
            continue;
        }

        // Pick a constraint tied for the worst degree, then one of
        // its two variables.
        let worst_now = problem.worst_degree(&assignment);
        let culprits: Vec<usize> = problem
            .constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.relation
                    .degree(assignment[c.scope.0], assignment[c.scope.1])
                    <= worst_now + 1e-9
            })
            .map(|(i, _)| i)
            .collect();
        let ci = culprits[rng.usize(0..culprits.len())];
        let scope = problem.constraints[ci].scope;
        let var = if rng.bool() { scope.0 } else { scope.1 };

        if rng.f64() < RANDOM_WALK_P {
            assignment[var] = rng.usize(0..problem.domains[var]);
            continue;
        }
        assignment[var] = best_value_for(problem, &by_var, &assignment, var, &mut rng);
    }

    Ok(if best < 0.0 { None } else { Some(best) })
}

/// The value maximizing the minimum degree over the variable's own
/// constraints, ties broken at random.
pub(crate) fn best_value_for(
    problem: &Problem,
    by_var: &[Vec<(usize, usize, bool)>],
    assignment: &[usize],
    var: usize,
    rng: &mut fastrand::Rng,
) -> usize {
    let mut best_value = assignment[var];
    let mut best_local = f64::NEG_INFINITY;
    let mut ties = 0usize;
    for value in 0..problem.domains[var] {
        let mut local = 1.0f64;
        for &(ci, other, var_is_left) in &by_var[var] {
            let rel = &problem.constraints[ci].relation;
            let d = if var_is_left {
                rel.degree(value, assignment[other])
            } else {
                rel.degree(assignment[other], value)
            };
            local = local.min(d);
        }
        if local > best_local + 1e-12 {
            best_local = local;
            best_value = value;
            ties = 1;
        } else if (local - best_local).abs() <= 1e-12 {
            // Reservoir choice among equally good values.
            ties += 1;
            if rng.usize(0..ties) == 0 {
                best_value = value;
            }
        }
    }
    best_value
}
