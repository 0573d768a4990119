use std::sync::Arc;

use kisynth::{
    ElectricalRole, Error, GeneratorConfig, Label, NetId, Pin, PinDirection, Placement, Point,
    Schematic, SequentialIds, SymbolDef,
};
use kisynth_sexpr::{Sexpr, parse};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn resistor() -> Arc<SymbolDef> {
    SymbolDef::builder("R")
        .library("Device")
        .reference_prefix("R")
        .terminal(Pin::new("1", "~", (-5.08, 0.0), PinDirection::Left))
        .terminal(Pin::new("2", "~", (5.08, 0.0), PinDirection::Right))
        .build()
        .unwrap()
}

fn ground() -> Arc<SymbolDef> {
    SymbolDef::builder("GND")
        .library("power")
        .power()
        .terminal(Pin::new("1", "GND", (0.0, 0.0), PinDirection::Down).with_role(ElectricalRole::PowerIn))
        .build()
        .unwrap()
}

fn top_level<'a>(root: &'a Sexpr, tag: &str) -> Vec<&'a Sexpr> {
    root.as_list()
        .map(|items| items.iter().filter(|i| i.tag() == Some(tag)).collect())
        .unwrap_or_default()
}

fn property<'a>(symbol: &'a Sexpr, name: &str) -> Option<&'a str> {
    symbol
        .find_all_lists("property")
        .into_iter()
        .find(|p| p.get(1).and_then(Sexpr::as_str) == Some(name))
        .and_then(|p| p.get(2).and_then(Sexpr::as_str))
}

#[test]
fn divider_wires_run_pin_to_pin() -> anyhow::Result<()> {
    init_logger();
    let mut sch = Schematic::new("divider").with_ids(SequentialIds);
    sch.place("R1", "10k", resistor(), Placement::at(50.0, 50.0))?;
    sch.place("R2", "10k", resistor(), Placement::at(70.0, 50.0))?;

    let mid = sch.connect("R1", "2", "R2", "1", Some("MID"))?;
    assert_eq!(mid.get(), 1);
    assert_eq!(sch.wires().len(), 1);
    let wire = &sch.wires()[0];
    assert!(wire.start.approx_eq(Point::new(55.08, 50.0), 1e-9));
    assert!(wire.end.approx_eq(Point::new(64.92, 50.0), 1e-9));
    assert_eq!(wire.net, mid);
    assert_eq!(sch.symbol("R2").unwrap().net_of("1"), mid);

    let root = parse(&sch.render())?;
    assert_eq!(root.tag(), Some("kicad_sch"));
    let lib = root.find_list("lib_symbols").unwrap();
    // one library entry however many times it is placed
    assert_eq!(lib.iter().filter(|i| i.tag() == Some("symbol")).count(), 1);

    let symbols = top_level(&root, "symbol");
    assert_eq!(symbols.len(), 2);
    assert_eq!(property(symbols[0], "Reference"), Some("R1"));
    assert_eq!(property(symbols[1], "Value"), Some("10k"));

    let labels = top_level(&root, "label");
    assert_eq!(labels.len(), 1);
    let label = labels[0].as_list().unwrap();
    assert_eq!(label[1].as_str(), Some("MID"));
    let at = labels[0].find_list("at").unwrap();
    assert_eq!(at[1].as_number(), Some(55.08));
    Ok(())
}

#[test]
fn power_markers_number_themselves() -> anyhow::Result<()> {
    let mut sch = Schematic::new("pwr");
    sch.place("#PWR01", "GND", ground(), Placement::at(0.0, 0.0))?;
    let first = sch.place_power(ground(), (10.0, 10.0))?;
    let second = sch.place_power(ground(), (20.0, 10.0))?;
    assert_eq!(first, "#PWR02");
    assert_eq!(second, "#PWR03");
    assert_eq!(sch.symbol(&second).unwrap().value(), "GND");

    let text = sch.render();
    let root = parse(&text)?;
    let lib = root.find_list("lib_symbols").unwrap();
    let gnd = lib.iter().find(|i| i.tag() == Some("symbol")).unwrap();
    assert!(gnd.find_list("power").is_some());
    assert!(text.contains("(lib_id \"power:GND\")"));
    Ok(())
}

#[test]
fn hand_drawn_items_render_in_order() -> anyhow::Result<()> {
    let mut sch = Schematic::new("notes").with_ids(SequentialIds);
    sch.add_wire((10.0, 10.0), (20.0, 10.0));
    sch.add_wire((20.0, 10.0), (20.0, 20.0));
    sch.add_junction((20.0, 10.0));
    sch.add_label(Label::local("SDA", (10.0, 10.0)));
    sch.add_label(Label::global("VBUS", (20.0, 20.0)).rotated(90.0));

    assert!(sch.wires().iter().all(|w| w.net == NetId::NONE));
    assert!(sch.nets().is_empty());

    let root = parse(&sch.render())?;
    let tags: Vec<_> = root
        .as_list()
        .unwrap()
        .iter()
        .filter_map(Sexpr::tag)
        .filter(|t| matches!(*t, "junction" | "label" | "global_label" | "wire"))
        .collect();
    assert_eq!(
        tags,
        ["junction", "label", "global_label", "wire", "wire"]
    );

    let global = top_level(&root, "global_label")[0];
    let at = global.find_list("at").unwrap();
    assert_eq!(at[3].as_number(), Some(90.0));
    assert_eq!(global.find_list("shape").unwrap()[1].as_sym(), Some("passive"));
    Ok(())
}

#[test]
fn mirrored_symbols_flip_their_pins() -> anyhow::Result<()> {
    let mut sch = Schematic::new("m");
    sch.place("R1", "1k", resistor(), Placement::at(50.0, 50.0).mirrored())?;
    let pin1 = sch.symbol("R1").unwrap().terminal_position("1").unwrap();
    assert!(pin1.approx_eq(Point::new(55.08, 50.0), 1e-9));

    let root = parse(&sch.render())?;
    let symbol = top_level(&root, "symbol")[0];
    assert_eq!(symbol.find_list("mirror").unwrap()[1].as_sym(), Some("y"));
    Ok(())
}

#[test]
fn unknown_pin_is_reported_without_changes() {
    init_logger();
    let mut sch = Schematic::new("e");
    sch.place("R1", "1k", resistor(), Placement::default()).unwrap();
    sch.place("R2", "1k", resistor(), Placement::at(20.0, 0.0)).unwrap();

    let err = sch.connect("R1", "1", "R2", "9", Some("X")).unwrap_err();
    match err {
        Error::UnknownPin { reference, pin } => {
            assert_eq!(reference, "R2");
            assert_eq!(pin, "9");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(sch.wires().is_empty());
    assert!(sch.nets().is_empty());
    assert_eq!(sch.symbol("R1").unwrap().net_of("1"), NetId::NONE);
}

#[test]
fn namespaced_ids_are_stable_per_name() {
    let build = |name: &str| {
        let mut sch = Schematic::new(name);
        sch.place("R1", "1k", resistor(), Placement::at(10.0, 10.0)).unwrap();
        sch.place("R2", "1k", resistor(), Placement::at(30.0, 10.0)).unwrap();
        sch.connect("R1", "2", "R2", "1", None).unwrap();
        sch.render()
    };
    assert_eq!(build("same"), build("same"));
    assert_ne!(build("same"), build("different"));
}

#[test]
fn project_name_comes_from_config() -> anyhow::Result<()> {
    let config = GeneratorConfig::from_toml_str(
        r#"
        project = "psu_rev_b"

        [title]
        company = "Acme"
        "#,
    )?;
    let mut sch = Schematic::with_config("main", config)?;
    sch.place("R1", "1k", resistor(), Placement::default())?;
    assert_eq!(sch.title().company.as_deref(), Some("Acme"));

    let text = sch.render();
    assert!(text.contains("(project \"psu_rev_b\""));
    assert!(text.contains("(company \"Acme\")"));
    Ok(())
}

#[test]
fn save_writes_the_rendered_text() -> anyhow::Result<()> {
    init_logger();
    let dir = tempfile::tempdir()?;
    let mut sch = Schematic::new("saved");
    sch.place("R1", "1k", resistor(), Placement::at(10.0, 10.0))?;
    let expected = sch.render();

    let path = dir.path().join("saved.kicad_sch");
    sch.save(&path)?;
    assert_eq!(std::fs::read_to_string(&path)?, expected);
    Ok(())
}
