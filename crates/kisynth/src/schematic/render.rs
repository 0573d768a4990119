//! `.kicad_sch` writer.

use std::collections::BTreeSet;

use kisynth_sexpr::formatter::{FormatMode, format_tree};
use kisynth_sexpr::{ListBuilder, Sexpr, kv};
use uuid::Uuid;

use super::{Junction, Label, LabelKind, Schematic, Wire};
use crate::definition::SymbolDef;
use crate::emit::{at, effects, font, pt, pts, str_lit, stroke, uuid};
use crate::geometry::{Point, arc_points};
use crate::ids::IdSequence;
use crate::placement::PlacedInstance;
use crate::primitive::{Graphic, GraphicPrimitive};
use crate::terminal::Pin;

const TEXT_SIZE: f64 = 1.27;
const PIN_NAME_OFFSET: f64 = 1.016;
/// Distance from a symbol's origin to its Reference and Value fields.
const FIELD_OFFSET: f64 = 2.54;

pub(super) fn render_schematic(sch: &Schematic) -> String {
    let mut ids = IdSequence::new(sch.ids.as_ref());
    let config = &sch.config;
    let root_uuid = ids.next_id();

    let mut root = ListBuilder::node("kicad_sch");
    root.push(kv("version", config.schematic_version))
        .push(kv("generator", str_lit(&config.generator)))
        .push(kv("generator_version", str_lit(&config.generator_version)))
        .push(uuid(root_uuid))
        .push(sch.paper.to_sexpr())
        .push(sch.title.to_sexpr())
        .push(lib_symbols(sch));

    for (net, name) in sch.nets.iter() {
        if net.is_none() {
            continue;
        }
        if let Some(wire) = sch.wires.iter().find(|w| w.net == net) {
            root.push(label(&Label::local(name, wire.start), &mut ids));
        }
    }

    let project = config.project.as_deref().unwrap_or(&sch.name);
    let (power, parts): (Vec<_>, Vec<_>) = sch
        .symbols
        .iter()
        .partition(|s| s.definition().is_power());
    for instance in parts.into_iter().chain(power) {
        root.push(symbol_instance(instance, project, root_uuid, &mut ids));
    }

    for junction in &sch.junctions {
        root.push(junction_sexpr(junction, &mut ids));
    }
    for l in &sch.labels {
        root.push(label(l, &mut ids));
    }
    for wire in &sch.wires {
        root.push(wire_sexpr(wire, &mut ids));
    }

    let mut page = ListBuilder::node("path");
    page.push(str_lit("/")).push(kv("page", str_lit("1")));
    root.push(Sexpr::list(vec![Sexpr::symbol("sheet_instances"), page.build()]));

    format_tree(&root.build(), FormatMode::CompactTextProperties)
}

fn text_effects(justify: &[&str], hide: bool) -> Sexpr {
    effects(font(TEXT_SIZE, None), justify, hide)
}

fn yes_no(flag: bool) -> Sexpr {
    Sexpr::symbol(if flag { "yes" } else { "no" })
}

/// One library entry per distinct lib id, in first-use order.
fn lib_symbols(sch: &Schematic) -> Sexpr {
    let mut seen = BTreeSet::new();
    let mut lib = ListBuilder::node("lib_symbols");
    for instance in &sch.symbols {
        let def = instance.definition();
        if seen.insert(def.lib_id()) {
            lib.push(lib_symbol(def));
        }
    }
    lib.build()
}

fn lib_symbol(def: &SymbolDef) -> Sexpr {
    let power = def.is_power();
    let mut node = ListBuilder::node("symbol");
    node.push(str_lit(def.lib_id()))
        .push_if(power, Sexpr::list(vec![Sexpr::symbol("power")]))
        .push(Sexpr::list(vec![
            Sexpr::symbol("pin_names"),
            kv("offset", if power { 0.0 } else { PIN_NAME_OFFSET }),
        ]))
        .push(kv("exclude_from_sim", yes_no(false)))
        .push(kv("in_bom", yes_no(true)))
        .push(kv("on_board", yes_no(true)));

    let reference = if power { "#PWR" } else { def.reference_prefix() };
    let keywords = def.keywords().join(" ");
    let fields = [
        ("Reference", reference, power),
        ("Value", def.name(), false),
        ("Footprint", "", true),
        ("Datasheet", "~", true),
        ("Description", def.description(), true),
    ];
    for (name, value, hide) in fields {
        node.push(property(name, value, Point::ORIGIN, 0.0, &[], hide));
    }
    if !keywords.is_empty() {
        node.push(property("ki_keywords", &keywords, Point::ORIGIN, 0.0, &[], true));
    }

    let mut body = ListBuilder::node("symbol");
    body.push(str_lit(format!("{}_0_1", def.name())));
    for graphic in def.graphics() {
        body.push(body_graphic(graphic));
    }
    node.push(body.build());

    let mut pins = ListBuilder::node("symbol");
    pins.push(str_lit(format!("{}_1_1", def.name())));
    for pin in def.pins() {
        pins.push(pin_sexpr(pin, power));
    }
    node.push(pins.build());

    node.build()
}

fn property(name: &str, value: &str, position: Point, rotation: f64, justify: &[&str], hide: bool) -> Sexpr {
    let mut node = ListBuilder::node("property");
    node.push(str_lit(name))
        .push(str_lit(value))
        .push(at(position, rotation))
        .push(text_effects(justify, hide));
    node.build()
}

fn body_graphic(graphic: &Graphic) -> Sexpr {
    let width = graphic.layer.stroke_width();
    let finish = |node: &mut ListBuilder| {
        node.push(stroke(width, "default")).push(Sexpr::list(vec![
            Sexpr::symbol("fill"),
            kv("type", Sexpr::symbol("none")),
        ]));
    };

    match &graphic.primitive {
        GraphicPrimitive::Line { start, end } => {
            let mut node = ListBuilder::node("polyline");
            node.push(pts([start, end]));
            finish(&mut node);
            node.build()
        }
        GraphicPrimitive::Rect { start, end } => {
            let mut node = ListBuilder::node("rectangle");
            node.push(pt("start", *start)).push(pt("end", *end));
            finish(&mut node);
            node.build()
        }
        GraphicPrimitive::Circle { center, radius } => {
            let mut node = ListBuilder::node("circle");
            node.push(pt("center", *center)).push(kv("radius", *radius));
            finish(&mut node);
            node.build()
        }
        GraphicPrimitive::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        } => {
            let [start, mid, end] = arc_points(*center, *radius, *start_angle, *end_angle);
            let mut node = ListBuilder::node("arc");
            node.push(pt("start", start))
                .push(pt("mid", mid))
                .push(pt("end", end));
            finish(&mut node);
            node.build()
        }
        GraphicPrimitive::Polyline { points } => {
            let mut node = ListBuilder::node("polyline");
            node.push(pts(points));
            finish(&mut node);
            node.build()
        }
        GraphicPrimitive::Text { content, position } => {
            let mut node = ListBuilder::node("text");
            node.push(str_lit(content))
                .push(at(*position, 0.0))
                .push(text_effects(&[], false));
            node.build()
        }
    }
}

fn pin_sexpr(pin: &Pin, hide: bool) -> Sexpr {
    let mut node = ListBuilder::node("pin");
    node.push(Sexpr::symbol(pin.role.as_kicad()))
        .push(Sexpr::symbol("line"))
        .push(at(pin.offset, pin.direction.degrees()))
        .push(kv("length", pin.length))
        .push_if(hide, Sexpr::symbol("hide"));
    for (tag, text) in [("name", &pin.name), ("number", &pin.number)] {
        node.push(Sexpr::list(vec![
            Sexpr::symbol(tag),
            str_lit(text.as_str()),
            text_effects(&[], false),
        ]));
    }
    node.build()
}

fn symbol_instance(
    instance: &PlacedInstance<Pin>,
    project: &str,
    root_uuid: Uuid,
    ids: &mut IdSequence<'_>,
) -> Sexpr {
    let def = instance.definition();
    let position = instance.position();
    let rotation = instance.rotation();

    let mut node = ListBuilder::node("symbol");
    node.push(kv("lib_id", str_lit(def.lib_id())))
        .push(at(position, rotation))
        .push_if(
            instance.is_mirrored(),
            kv("mirror", Sexpr::symbol("y")),
        )
        .push(kv("unit", 1i64))
        .push(kv("exclude_from_sim", yes_no(false)))
        .push(kv("in_bom", yes_no(true)))
        .push(kv("on_board", yes_no(true)))
        .push(kv("dnp", yes_no(false)))
        .push(uuid(ids.next_id()));

    if def.is_power() {
        let reference_at = position + Point::new(0.0, -3.81);
        let value_at = position + Point::new(0.0, -1.27);
        node.push(property("Reference", instance.reference(), reference_at, 0.0, &[], true))
            .push(property("Value", instance.value(), value_at, 0.0, &[], false));
    } else {
        let reference_at = position + Point::new(FIELD_OFFSET, -FIELD_OFFSET);
        let value_at = position + Point::new(FIELD_OFFSET, FIELD_OFFSET);
        node.push(property("Reference", instance.reference(), reference_at, 0.0, &["left"], false))
            .push(property("Value", instance.value(), value_at, 0.0, &["left"], false))
            .push(property("Footprint", "", position, 0.0, &[], true))
            .push(property("Datasheet", "~", position, 0.0, &[], true));
    }

    for pin in def.pins() {
        node.push(Sexpr::list(vec![
            Sexpr::symbol("pin"),
            str_lit(pin.number.as_str()),
            uuid(ids.next_id()),
        ]));
    }

    let mut path = ListBuilder::node("path");
    path.push(str_lit(format!("/{root_uuid}")))
        .push(kv("reference", str_lit(instance.reference())))
        .push(kv("unit", 1i64));
    let mut proj = ListBuilder::node("project");
    proj.push(str_lit(project)).push(path.build());
    node.push(Sexpr::list(vec![Sexpr::symbol("instances"), proj.build()]));

    node.build()
}

fn label(l: &Label, ids: &mut IdSequence<'_>) -> Sexpr {
    let tag = match l.kind {
        LabelKind::Local => "label",
        LabelKind::Global => "global_label",
    };
    let mut node = ListBuilder::node(tag);
    node.push(str_lit(l.text.as_str()))
        .push_if(
            l.kind == LabelKind::Global,
            kv("shape", Sexpr::symbol("passive")),
        )
        .push(at(l.position, l.rotation))
        .push(kv("fields_autoplaced", yes_no(true)))
        .push(text_effects(&["left", "bottom"], false))
        .push(uuid(ids.next_id()));
    node.build()
}

fn junction_sexpr(junction: &Junction, ids: &mut IdSequence<'_>) -> Sexpr {
    let mut node = ListBuilder::node("junction");
    node.push(pt("at", junction.position))
        .push(kv("diameter", 0i64))
        .push(Sexpr::list(vec![
            Sexpr::symbol("color"),
            0i64.into(),
            0i64.into(),
            0i64.into(),
            0i64.into(),
        ]))
        .push(uuid(ids.next_id()));
    node.build()
}

fn wire_sexpr(wire: &Wire, ids: &mut IdSequence<'_>) -> Sexpr {
    let mut node = ListBuilder::node("wire");
    node.push(pts([&wire.start, &wire.end]))
        .push(stroke(0.0, "default"))
        .push(uuid(ids.next_id()));
    node.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::net::NetId;

    fn text(s: &Sexpr) -> String {
        format_tree(s, FormatMode::CompactTextProperties)
    }

    #[test]
    fn wire_block() {
        let wire = Wire {
            start: Point::new(47.46, 50.0),
            end: Point::new(47.46, 60.0),
            net: NetId::NONE,
        };
        let mut ids = IdSequence::new(&SequentialIds);
        assert_eq!(
            text(&wire_sexpr(&wire, &mut ids)),
            "(wire\n\t(pts\n\t\t(xy 47.46 50) (xy 47.46 60)\n\t)\n\t(stroke (width 0) (type default))\n\t(uuid \"00000000-0000-0000-0000-000000000001\")\n)\n"
        );
    }

    #[test]
    fn global_label_carries_shape() {
        let mut ids = IdSequence::new(&SequentialIds);
        let out = text(&label(&Label::global("VIN", (10.0, 5.0)), &mut ids));
        assert!(out.starts_with("(global_label \"VIN\"\n\t(shape passive)\n\t(at 10 5 0)"));
    }

    #[test]
    fn power_pins_are_hidden() {
        let pin = Pin::new("1", "GND", (0.0, 0.0), crate::terminal::PinDirection::Up);
        let parsed = kisynth_sexpr::parse(&text(&pin_sexpr(&pin, true))).unwrap();
        let items = parsed.as_list().unwrap();
        assert!(items.iter().any(|i| i.as_sym() == Some("hide")));
        assert_eq!(
            parsed.find_list("at").unwrap()[3].as_number(),
            Some(90.0)
        );
    }
}
