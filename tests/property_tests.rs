use chromaforge::color::space::{conspicuity, delta_e, hue_distance};
use chromaforge::color::{Rgb, Vision};
use chromaforge::config::Parameters;
use chromaforge::palette::Value;
use proptest::prelude::*;

prop_compose! {
    fn arb_rgb()(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) -> Rgb {
        Rgb::new(r, g, b)
    }
}

prop_compose! {
    fn arb_lab()(
        l in 0.0..100.0f64,
        a in -127.0..127.0f64,
        b in -127.0..127.0f64
    ) -> [f64; 3] {
        [l, a, b]
    }
}

proptest! {
    #[test]
    fn difference_is_a_semimetric(x in arb_rgb(), y in arb_rgb()) {
        let vx = Value::from_rgb(x);
        let vy = Value::from_rgb(y);
        for vision in Vision::ALL {
            let d = vx.difference(&vy, vision);
            prop_assert!(d >= 0.0);
            prop_assert_eq!(d, vy.difference(&vx, vision));
            prop_assert_eq!(vx.difference(&vx, vision), 0.0);
        }
    }

    #[test]
    fn delta_e_obeys_the_triangle_inequality(
        a in arb_lab(), b in arb_lab(), c in arb_lab()
    ) {
        prop_assert!(delta_e(a, c) <= delta_e(a, b) + delta_e(b, c) + 1e-9);
    }

    #[test]
    fn hue_distance_is_circular_and_bounded(
        a in 0.0..24.0f64, b in 0.0..24.0f64
    ) {
        let d = hue_distance(a, b);
        prop_assert!((0.0..=12.0).contains(&d));
        prop_assert_eq!(d, hue_distance(b, a));
        prop_assert!(hue_distance(a, a) < 1e-12);
    }

    #[test]
    fn conspicuity_is_non_negative(lab in arb_lab()) {
        prop_assert!(conspicuity(lab) >= 0.0);
    }

    #[test]
    fn trichromacy_projection_is_the_identity(rgb in arb_rgb()) {
        let value = Value::from_rgb(rgb);
        prop_assert_eq!(value.projected(Vision::Trichromacy), rgb);
    }

    #[test]
    fn monochromacy_projection_is_gray(rgb in arb_rgb()) {
        let gray = Value::from_rgb(rgb).projected(Vision::Monochromacy);
        prop_assert_eq!(gray.r, gray.g);
        prop_assert_eq!(gray.g, gray.b);
    }

    #[test]
    fn red_green_simulation_stays_displayable(rgb in arb_rgb()) {
        // Simulated channels are clamped back into range, so the
        // projections always survive a Value rebuild.
        let value = Value::from_rgb(rgb);
        for vision in [Vision::Protanopia, Vision::Deuteranopia] {
            let projected = value.projected(vision);
            let roundtrip = Value::from_rgb(projected);
            prop_assert_eq!(roundtrip.rgb(), projected);
        }
    }
}

#[test]
fn parameters_round_trip_through_serde() {
    let params = Parameters::default();
    let json = serde_json::to_string(&params).expect("serialize");
    let back: Parameters = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, params);
}
