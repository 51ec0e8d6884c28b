use chromaforge::color::{Rgb, Vision};
use chromaforge::config::Parameters;
use chromaforge::domain::{AdaptiveDomainFactory, DomainFactory, UniformDomainFactory};
use chromaforge::palette::{Candidates, Scheme};
use chromaforge::relation::{
    FixedTargetFactory, RatioAggregation, RatioFactory, RelationFactory, Side,
};
use chromaforge::solver::Constraint;
use std::rc::Rc;

fn shared(domains: Vec<Candidates>) -> Vec<Rc<Candidates>> {
    domains.into_iter().map(Rc::new).collect()
}

fn fixed_target_constraints(scheme: &Scheme, params: &Parameters) -> Vec<Constraint> {
    let domains = shared(UniformDomainFactory::new(scheme, params).build(None));
    let mut factory = Box::new(FixedTargetFactory::new(scheme, params));
    for &(i, j) in scheme.adjacencies() {
        factory.add_edge(i, j, Rc::clone(&domains[i]), Rc::clone(&domains[j]), None);
    }
    factory.seal()
}

#[test]
fn one_constraint_per_added_edge_in_order() {
    let scheme = Scheme::new(
        vec![
            Rgb::new(200, 40, 40),
            Rgb::new(60, 180, 70),
            Rgb::new(50, 90, 200),
        ],
        None,
    )
    .expect("scheme");
    let params = Parameters::default();
    let constraints = fixed_target_constraints(&scheme, &params);
    assert_eq!(constraints.len(), scheme.adjacencies().len());
    for (c, &(i, j)) in constraints.iter().zip(scheme.adjacencies()) {
        assert_eq!(c.scope, (i, j));
    }
}

#[test]
fn meeting_every_target_scores_near_one() {
    // Black and white exceed every default target under every vision,
    // so the unmodified pair satisfies the relation almost fully.
    let scheme = Scheme::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)], None)
        .expect("scheme");
    let params = Parameters::default();
    let constraints = fixed_target_constraints(&scheme, &params);
    let degree = constraints[0].relation.degree(0, 0);
    assert!(degree > 0.95, "degree {degree}");
}

#[test]
fn coincident_colors_score_near_zero() {
    let scheme = Scheme::new(vec![Rgb::new(128, 128, 128), Rgb::new(128, 128, 128)], None)
        .expect("scheme");
    let params = Parameters::default();
    let constraints = fixed_target_constraints(&scheme, &params);
    let degree = constraints[0].relation.degree(0, 0);
    assert!(degree < 0.05, "degree {degree}");
}

#[test]
fn degrees_stay_in_the_unit_interval() {
    let scheme = Scheme::new(
        vec![Rgb::new(220, 40, 30), Rgb::new(50, 160, 60)],
        None,
    )
    .expect("scheme");
    let params = Parameters::default();
    let constraints = fixed_target_constraints(&scheme, &params);
    let domains = UniformDomainFactory::new(&scheme, &params).build(None);
    for a in 0..domains[0].len() {
        for b in 0..domains[1].len() {
            let d = constraints[0].relation.degree(a, b);
            assert!((0.0..=1.0).contains(&d), "degree {d}");
        }
    }
}

#[test]
fn ratio_bound_starts_at_one_and_never_rises() {
    let scheme = Scheme::new(
        vec![
            Rgb::new(220, 40, 30),
            Rgb::new(50, 160, 60),
            Rgb::new(50, 90, 200),
        ],
        None,
    )
    .expect("scheme");
    let params = Parameters::default();
    let domains = shared(AdaptiveDomainFactory::new(&scheme, &params).build(None));
    let mut factory = RatioFactory::new(&scheme, &params, RatioAggregation::Minimum, None);

    for v in Vision::ALL {
        assert_eq!(factory.ratio_bound(v), 1.0);
    }
    let mut previous = [1.0f64; Vision::COUNT];
    for &(i, j) in scheme.adjacencies() {
        factory.add_edge(i, j, Rc::clone(&domains[i]), Rc::clone(&domains[j]), None);
        for v in Vision::ALL {
            let bound = factory.ratio_bound(v);
            assert!(bound <= previous[v.index()] + 1e-12);
            assert!(bound <= 1.0);
            previous[v.index()] = bound;
        }
    }
    // A red/green edge forces the deutan ratio well below 1.
    assert!(factory.ratio_bound(Vision::Deuteranopia) < 1.0);
}

#[test]
fn minimum_aggregation_never_beats_average() {
    let scheme = Scheme::new(
        vec![Rgb::new(220, 40, 30), Rgb::new(50, 160, 60)],
        None,
    )
    .expect("scheme");
    // One deficient vision keeps the discovered ratios identical for
    // both aggregations, so the orderings compare like for like.
    let mut params = Parameters::default();
    params.targets.enable_protanopia = false;
    let domains = shared(AdaptiveDomainFactory::new(&scheme, &params).build(None));

    let seal_with = |aggregation| {
        let mut factory = RatioFactory::new(&scheme, &params, aggregation, None);
        factory.add_edge(0, 1, Rc::clone(&domains[0]), Rc::clone(&domains[1]), None);
        Box::new(factory).seal()
    };
    let average = seal_with(RatioAggregation::Average);
    let minimum = seal_with(RatioAggregation::Minimum);

    // Same ratios after the Average collapse, and min(raw) <= avg(raw)
    // pointwise; the squash preserves the order.
    for a in 0..domains[0].len().min(12) {
        for b in 0..domains[1].len().min(12) {
            let avg = average[0].relation.degree(a, b);
            let min = minimum[0].relation.degree(a, b);
            assert!(min <= avg + 1e-9, "min {min} avg {avg}");
        }
    }
}

#[test]
fn skipped_side_is_exempt_from_preservation() {
    let scheme = Scheme::new(
        vec![Rgb::new(220, 40, 30), Rgb::new(50, 160, 60)],
        None,
    )
    .expect("scheme");
    let params = Parameters::default();
    let domains = shared(UniformDomainFactory::new(&scheme, &params).build(None));
    // Hand the left slot a candidate drifted far past the tolerances.
    let mut drifted = Candidates::singleton(scheme.value(0).clone());
    drifted.list.push(
        chromaforge::palette::Value::from_rgb(Rgb::new(30, 40, 220)),
    );
    let drifted = Rc::new(drifted);

    let seal_with = |skip| {
        let mut factory = Box::new(FixedTargetFactory::new(&scheme, &params));
        factory.add_edge(0, 1, Rc::clone(&drifted), Rc::clone(&domains[1]), skip);
        factory.seal()
    };
    let scored = seal_with(None)[0].relation.degree(1, 0);
    let exempt = seal_with(Some(Side::Left))[0].relation.degree(1, 0);
    assert!(exempt > scored, "exempt {exempt} scored {scored}");
}
