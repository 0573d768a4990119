use std::sync::Arc;

use kisynth::{
    Board, ConnectOptions, CopperLayer, Error, FootprintDef, GeneratorConfig, NetId, Pad,
    PadShape, Placement, Point, SequentialIds, Side,
};
use kisynth_sexpr::{Sexpr, parse};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn resistor() -> Arc<FootprintDef> {
    FootprintDef::builder("R_0805_2012Metric")
        .reference_prefix("R")
        .terminal(Pad::smd("1", (-1.025, 0.0), (1.15, 1.05), PadShape::RoundRect))
        .terminal(Pad::smd("2", (1.025, 0.0), (1.15, 1.05), PadShape::RoundRect))
        .build()
        .unwrap()
}

fn led() -> Arc<FootprintDef> {
    FootprintDef::builder("LED_D5.0mm")
        .reference_prefix("D")
        .terminal(Pad::through_hole("1", (-2.0, 0.0), (1.8, 1.8), PadShape::Rect, 0.9))
        .terminal(Pad::through_hole("2", (2.0, 0.0), (1.8, 1.8), PadShape::Circle, 0.9))
        .build()
        .unwrap()
}

fn top_level<'a>(root: &'a Sexpr, tag: &str) -> Vec<&'a Sexpr> {
    root.as_list()
        .unwrap_or_default()
        .iter()
        .filter(|i| i.tag() == Some(tag))
        .collect()
}

fn point_of(list: &[Sexpr]) -> Point {
    Point::new(
        list[1].as_number().unwrap(),
        list[2].as_number().unwrap(),
    )
}

#[test]
fn resistor_to_led_round_trip() -> anyhow::Result<()> {
    init_logger();
    let mut board = Board::new("blinky", 40.0, 20.0).with_ids(SequentialIds);
    board.place("R1", "330", resistor(), Placement::at(10.0, 10.0))?;
    board.place("LED1", "red", led(), Placement::at(30.0, 10.0).rotated(180.0))?;

    let net = board.connect("R1", "2", "LED1", "1", Some("LED_A"))?;
    assert_eq!(net.get(), 1);

    let track = &board.tracks()[0];
    assert!(track.start.approx_eq(Point::new(11.025, 10.0), 1e-9));
    assert!(track.end.approx_eq(Point::new(32.0, 10.0), 1e-9));
    assert_eq!(track.width, 0.25);
    assert_eq!(track.layer, CopperLayer::Front);

    assert_eq!(board.footprint("R1").unwrap().net_of("2"), net);
    assert_eq!(board.footprint("LED1").unwrap().net_of("1"), net);
    assert_eq!(board.footprint("LED1").unwrap().net_of("2"), NetId::NONE);

    let root = parse(&board.render())?;
    let segments = top_level(&root, "segment");
    assert_eq!(segments.len(), 1);
    let end = segments[0].find_list("end").unwrap();
    assert!(point_of(end).approx_eq(Point::new(32.0, 10.0), 1e-6));
    Ok(())
}

#[test]
fn named_net_between_rotated_parts() -> anyhow::Result<()> {
    init_logger();
    let r = FootprintDef::builder("R_Axial")
        .reference_prefix("R")
        .terminal(Pad::smd("1", (-2.0, 0.0), (1.0, 1.0), PadShape::Rect))
        .terminal(Pad::smd("2", (2.0, 0.0), (1.0, 1.0), PadShape::Rect))
        .build()?;
    let mut board = Board::new("demo", 40.0, 20.0);
    board.place("R1", "330", r, Placement::at(10.0, 10.0))?;
    board.place("LED1", "red", led(), Placement::at(30.0, 10.0).rotated(180.0))?;

    let net = board.connect("R1", "2", "LED1", "1", Some("SIG"))?;
    assert_eq!(net.get(), 1);
    assert_eq!(board.nets().lookup_name(net), "SIG");
    assert_eq!(board.tracks().len(), 1);
    let track = &board.tracks()[0];
    assert!(track.start.approx_eq(Point::new(12.0, 10.0), 1e-9));
    assert!(track.end.approx_eq(Point::new(32.0, 10.0), 1e-9));
    assert_eq!(track.net, net);
    Ok(())
}

#[test]
fn unknown_reference_leaves_board_untouched() {
    init_logger();
    let mut board = Board::new("b", 20.0, 20.0);
    board.place("R1", "1k", resistor(), Placement::default()).unwrap();
    let before = board.render();

    let err = board.connect("R1", "1", "R99", "1", Some("X")).unwrap_err();
    assert!(matches!(err, Error::UnknownReference { ref reference } if reference == "R99"));
    assert!(board.tracks().is_empty());
    assert_eq!(board.nets().len(), 1);
    assert_eq!(board.render(), before);
}

#[test]
fn outline_is_closed_with_edge_cuts_lines() {
    let mut board = Board::new("b", 50.0, 30.0);
    board
        .set_outline([(0.0, 0.0), (50.0, 0.0), (50.0, 30.0), (0.0, 30.0)])
        .unwrap();

    let root = parse(&board.render()).unwrap();
    let lines = top_level(&root, "gr_line");
    assert_eq!(lines.len(), 4);
    for line in &lines {
        let layer = line.find_list("layer").unwrap();
        assert_eq!(layer[1].as_str(), Some("Edge.Cuts"));
    }
    let last_end = lines[3].find_list("end").unwrap();
    assert!(point_of(last_end).approx_eq(Point::ORIGIN, 1e-9));
}

#[test]
fn degenerate_outline_is_rejected() {
    let mut board = Board::new("b", 50.0, 30.0);
    let err = board
        .set_outline([(0.0, 0.0), (10.0, 0.0), (0.0, 0.0)])
        .unwrap_err();
    assert!(matches!(err, Error::MalformedOutline { points: 2 }));
    assert!(board.outline().is_none());
}

#[test]
fn renders_are_deterministic() {
    let build = || {
        let mut board = Board::new("det", 40.0, 20.0);
        board.place("R1", "1k", resistor(), Placement::at(5.0, 5.0)).unwrap();
        board.place("R2", "1k", resistor(), Placement::at(15.0, 5.0)).unwrap();
        board.connect("R1", "2", "R2", "1", None).unwrap();
        board.set_rect_outline().unwrap();
        board
    };
    let a = build();
    let b = build();
    assert_eq!(a.render(), a.render());
    assert_eq!(a.render(), b.render());

    let renamed = Board::new("other", 40.0, 20.0);
    assert_ne!(
        parse(&renamed.render()).unwrap(),
        parse(&Board::new("det", 40.0, 20.0).render()).unwrap()
    );
}

#[test]
fn back_side_parts_are_mirrored() {
    let mut board = Board::new("b", 40.0, 20.0).with_ids(SequentialIds);
    board
        .place("R1", "1k", resistor(), Placement::at(10.0, 10.0).on_back())
        .unwrap();

    let r1 = board.footprint("R1").unwrap();
    assert_eq!(r1.side(), Side::Back);
    let p2 = r1.terminal_position("2").unwrap();
    assert!(p2.approx_eq(Point::new(8.975, 10.0), 1e-9));

    let root = parse(&board.render()).unwrap();
    let fp = top_level(&root, "footprint")[0];
    assert_eq!(fp.find_list("layer").unwrap()[1].as_str(), Some("B.Cu"));
    let pads: Vec<_> = fp
        .as_list()
        .unwrap()
        .iter()
        .filter(|i| i.tag() == Some("pad"))
        .collect();
    let pad2_at = pads[1].find_list("at").unwrap();
    assert_eq!(pad2_at[1].as_number(), Some(-1.025));
    let layers = pads[1].find_list("layers").unwrap();
    assert_eq!(layers[1].as_str(), Some("B.Cu"));
}

#[test]
fn duplicate_reference_is_rejected() {
    let mut board = Board::new("b", 10.0, 10.0);
    board.place("R1", "1k", resistor(), Placement::default()).unwrap();
    let err = board
        .place("R1", "2k", resistor(), Placement::at(5.0, 5.0))
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateReference { ref reference } if reference == "R1"));
    assert_eq!(board.footprints().len(), 1);
    assert_eq!(board.footprint("R1").unwrap().value(), "1k");
}

#[test]
fn configured_defaults_drive_connections() {
    let config = GeneratorConfig::from_toml_str(
        r#"
        track_width = 0.5
        trace_layer = "B.Cu"
        "#,
    )
    .unwrap();
    let mut board = Board::with_config("cfg", 20.0, 20.0, config).unwrap();
    board.place("R1", "1k", resistor(), Placement::at(0.0, 0.0)).unwrap();
    board.place("R2", "1k", resistor(), Placement::at(10.0, 0.0)).unwrap();
    board.connect("R1", "2", "R2", "1", None).unwrap();

    let track = &board.tracks()[0];
    assert_eq!(track.width, 0.5);
    assert_eq!(track.layer, CopperLayer::Back);
}

#[test]
fn inner_layers_need_a_multilayer_board() {
    let mut board = Board::new("b", 20.0, 20.0);
    board.place("R1", "1k", resistor(), Placement::at(0.0, 0.0)).unwrap();
    board.place("R2", "1k", resistor(), Placement::at(10.0, 0.0)).unwrap();
    let inner = ConnectOptions::default().layer(CopperLayer::Inner(1));

    let err = board.connect_with("R1", "2", "R2", "1", &inner).unwrap_err();
    assert!(matches!(err, Error::UnknownLayer(CopperLayer::Inner(1))));
    assert_eq!(board.nets().len(), 1);

    board.set_layer_count(4).unwrap();
    board.connect_with("R1", "2", "R2", "1", &inner).unwrap();
    assert_eq!(board.tracks()[0].layer, CopperLayer::Inner(1));
    assert!(board.render().contains("(1 \"In1.Cu\" signal)"));
}

#[test]
fn router_tracks_must_use_registered_nets() {
    let mut board = Board::new("b", 20.0, 20.0);
    let gnd = board.net("GND");
    let track = kisynth::Track {
        start: Point::new(1.0, 1.0),
        end: Point::new(5.0, 1.0),
        width: 0.3,
        layer: CopperLayer::Front,
        net: gnd,
    };
    board.add_track(track.clone()).unwrap();

    let mut stray = track;
    stray.net = {
        let mut other = kisynth::NetRegistry::new();
        other.get_or_create("A");
        other.get_or_create("B")
    };
    assert!(matches!(board.add_track(stray), Err(Error::UnknownNet(_))));
    assert_eq!(board.tracks().len(), 1);
}
