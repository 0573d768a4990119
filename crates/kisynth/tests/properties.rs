use kisynth::geometry::normalize_degrees;
use kisynth::{
    Board, FootprintDef, NetRegistry, Pad, PadShape, Placement, Point, transform_point,
};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -500.0f64..500.0
}

fn angle() -> impl Strategy<Value = f64> {
    -720.0f64..720.0
}

proptest! {
    #[test]
    fn rotations_compose(x in coord(), y in coord(), a in angle(), b in angle()) {
        let p = Point::new(x, y);
        let stepwise = p.rotated(a).rotated(b);
        let combined = p.rotated(a + b);
        prop_assert!(stepwise.approx_eq(combined, 1e-6));
    }

    #[test]
    fn translation_applies_after_rotation(
        x in coord(),
        y in coord(),
        px in coord(),
        py in coord(),
        a in angle(),
    ) {
        let p = Point::new(x, y);
        let pos = Point::new(px, py);
        let about_origin = transform_point(p, Point::ORIGIN, a, false);
        let shifted = transform_point(about_origin, pos, 0.0, false);
        prop_assert!(shifted.approx_eq(transform_point(p, pos, a, false), 1e-9));
    }

    #[test]
    fn rotation_is_undone_by_its_negative(x in coord(), y in coord(), a in angle()) {
        let p = Point::new(x, y);
        prop_assert!(p.rotated(a).rotated(-a).approx_eq(p, 1e-6));
    }

    #[test]
    fn transform_preserves_distance_from_origin(
        x in coord(),
        y in coord(),
        ox in coord(),
        oy in coord(),
        a in angle(),
        mirrored in any::<bool>(),
    ) {
        let origin = Point::new(ox, oy);
        let local = Point::new(x, y);
        let placed = transform_point(local, origin, a, mirrored);
        let radius = local.distance(Point::ORIGIN);
        prop_assert!((placed.distance(origin) - radius).abs() < 1e-6);
    }

    #[test]
    fn normalized_angles_stay_in_range(a in -1.0e6f64..1.0e6) {
        let folded = normalize_degrees(a);
        prop_assert!((0.0..360.0).contains(&folded));
    }

    #[test]
    fn registry_is_idempotent_and_dense(names in prop::collection::vec("[A-Z][A-Z0-9_]{0,6}", 1..20)) {
        let mut registry = NetRegistry::new();
        let mut seen: Vec<&str> = Vec::new();
        for name in &names {
            let first = registry.get_or_create(name);
            let again = registry.get_or_create(name);
            prop_assert_eq!(first, again);
            if !seen.contains(&name.as_str()) {
                seen.push(name);
                prop_assert_eq!(first.get() as usize, seen.len());
            }
            prop_assert_eq!(registry.lookup_name(first), name.as_str());
        }
        prop_assert_eq!(registry.len(), seen.len() + 1);
    }

    #[test]
    fn each_connection_adds_one_track(pairs in prop::collection::vec((0usize..4, 0usize..4), 1..12)) {
        let pad = |n: &str, x: f64| Pad::smd(n, (x, 0.0), (1.0, 1.0), PadShape::Rect);
        let def = FootprintDef::builder("R")
            .terminal(pad("1", -1.0))
            .terminal(pad("2", 1.0))
            .build()
            .unwrap();
        let mut board = Board::new("prop", 100.0, 100.0);
        for i in 0..4 {
            board
                .place(format!("R{i}"), "1k", def.clone(), Placement::at(10.0 + 20.0 * i as f64, 50.0))
                .unwrap();
        }

        for (count, (a, b)) in pairs.into_iter().enumerate() {
            let before = board.nets().len();
            board
                .connect(&format!("R{a}"), "2", &format!("R{b}"), "1", Some(&format!("N{count}")))
                .unwrap();
            prop_assert_eq!(board.tracks().len(), count + 1);
            prop_assert_eq!(board.nets().len(), before + 1);
        }
    }
}
