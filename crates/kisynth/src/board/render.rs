//! `.kicad_pcb` writer.

use kisynth_sexpr::formatter::{FormatMode, format_tree};
use kisynth_sexpr::{ListBuilder, Sexpr, kv};

use super::{Board, Track, Via};
use crate::emit::{at_opt, effects, font, layer, pt, pts, str_lit, stroke, uuid};
use crate::geometry::{Point, arc_points};
use crate::ids::IdSequence;
use crate::placement::{PlacedInstance, Side};
use crate::primitive::{Graphic, GraphicPrimitive};
use crate::terminal::{Pad, PadShape};

const EDGE_CUTS_WIDTH: f64 = 0.1;
const FP_TEXT_SIZE: f64 = 1.0;
const FP_TEXT_THICKNESS: f64 = 0.15;
const ROUNDRECT_RATIO: f64 = 0.25;

/// Non-copper layers: (ordinal, canonical name, user name).
const TECH_LAYERS: &[(u8, &str, Option<&str>)] = &[
    (32, "B.Adhes", Some("B.Adhesive")),
    (33, "F.Adhes", Some("F.Adhesive")),
    (34, "B.Paste", None),
    (35, "F.Paste", None),
    (36, "B.SilkS", Some("B.Silkscreen")),
    (37, "F.SilkS", Some("F.Silkscreen")),
    (38, "B.Mask", None),
    (39, "F.Mask", None),
    (40, "Dwgs.User", Some("User.Drawings")),
    (41, "Cmts.User", Some("User.Comments")),
    (42, "Eco1.User", Some("User.Eco1")),
    (43, "Eco2.User", Some("User.Eco2")),
    (44, "Edge.Cuts", None),
    (45, "Margin", None),
    (46, "B.CrtYd", Some("B.Courtyard")),
    (47, "F.CrtYd", Some("F.Courtyard")),
    (48, "B.Fab", None),
    (49, "F.Fab", None),
];

pub(super) fn render_board(board: &Board) -> String {
    let mut ids = IdSequence::new(board.ids.as_ref());
    let config = &board.config;

    let mut root = ListBuilder::node("kicad_pcb");
    root.push(kv("version", config.board_version))
        .push(kv("generator", str_lit(&config.generator)))
        .push(kv("generator_version", str_lit(&config.generator_version)))
        .push(general(board))
        .push(board.paper.to_sexpr())
        .push(board.title.to_sexpr())
        .push(layers(board.layer_count))
        .push(setup());

    root.extend(board.nets.iter().map(|(id, name)| {
        Sexpr::list(vec![Sexpr::symbol("net"), id.get().into(), str_lit(name)])
    }));

    for instance in &board.footprints {
        root.push(footprint(board, instance, &mut ids));
    }

    if let Some(outline) = &board.outline {
        for edge in outline.windows(2) {
            let mut line = ListBuilder::node("gr_line");
            line.push(pt("start", edge[0]))
                .push(pt("end", edge[1]))
                .push(stroke(EDGE_CUTS_WIDTH, "default"))
                .push(layer("Edge.Cuts"))
                .push(uuid(ids.next_id()));
            root.push(line.build());
        }
    }

    for track in &board.tracks {
        root.push(segment(track, &mut ids));
    }
    for via in &board.vias {
        root.push(via_sexpr(via, &mut ids));
    }

    format_tree(&root.build(), FormatMode::CompactTextProperties)
}

fn general(board: &Board) -> Sexpr {
    Sexpr::list(vec![
        Sexpr::symbol("general"),
        kv("thickness", board.thickness),
        kv("legacy_teardrops", false),
    ])
}

fn layers(copper: u8) -> Sexpr {
    let mut table = ListBuilder::node("layers");
    let inner = copper.saturating_sub(2);
    let copper_layers = std::iter::once((0u8, "F.Cu".to_string()))
        .chain((1..=inner).map(|n| (n, format!("In{n}.Cu"))))
        .chain(std::iter::once((31u8, "B.Cu".to_string())));
    for (ordinal, name) in copper_layers {
        table.push(Sexpr::list(vec![
            Sexpr::int(i64::from(ordinal)),
            str_lit(name),
            Sexpr::symbol("signal"),
        ]));
    }
    for &(ordinal, name, user_name) in TECH_LAYERS {
        let mut entry = vec![Sexpr::int(i64::from(ordinal)), str_lit(name), Sexpr::symbol("user")];
        entry.extend(user_name.map(str_lit));
        table.push(Sexpr::list(entry));
    }
    table.build()
}

fn setup() -> Sexpr {
    let mut plot = ListBuilder::node("pcbplotparams");
    plot.push(kv("layerselection", Sexpr::symbol("0x00010fc_ffffffff")))
        .push(kv(
            "plot_on_all_layers_selection",
            Sexpr::symbol("0x0000000_00000000"),
        ))
        .push(kv("disableapertmacros", false))
        .push(kv("usegerberextensions", false))
        .push(kv("usegerberattributes", true))
        .push(kv("usegerberadvancedattributes", true))
        .push(kv("creategerberjobfile", true))
        .push(kv("dashed_line_dash_ratio", 12.0))
        .push(kv("dashed_line_gap_ratio", 3.0))
        .push(kv("svgprecision", 4i64))
        .push(kv("plotframeref", false))
        .push(kv("viasonmask", false))
        .push(kv("mode", 1i64))
        .push(kv("useauxorigin", false))
        .push(kv("outputdirectory", str_lit("")));

    Sexpr::list(vec![
        Sexpr::symbol("setup"),
        kv("pad_to_mask_clearance", 0i64),
        plot.build(),
    ])
}

/// Local coordinates as written inside a footprint; back-side parts are
/// stored with x negated.
struct LocalFrame {
    mirrored: bool,
    front: bool,
    rotation: f64,
}

impl LocalFrame {
    fn map(&self, p: Point) -> Point {
        if self.mirrored { p.mirrored() } else { p }
    }

    fn text_effects(&self) -> Sexpr {
        let justify: &[&str] = if self.front { &[] } else { &["mirror"] };
        effects(font(FP_TEXT_SIZE, Some(FP_TEXT_THICKNESS)), justify, false)
    }
}

fn footprint(board: &Board, instance: &PlacedInstance<Pad>, ids: &mut IdSequence<'_>) -> Sexpr {
    let def = instance.definition();
    let frame = LocalFrame {
        mirrored: instance.is_mirrored(),
        front: instance.side() == Side::Front,
        rotation: instance.rotation(),
    };
    let side_layer = |front: &str, back: &str| -> String {
        (if frame.front { front } else { back }).to_string()
    };

    let mut fp = ListBuilder::node("footprint");
    fp.push(str_lit(def.lib_id()))
        .push(layer(&side_layer("F.Cu", "B.Cu")))
        .push(uuid(ids.next_id()))
        .push(at_opt(instance.position(), frame.rotation))
        .push_if(!def.description().is_empty(), kv("descr", str_lit(def.description())))
        .push_if(
            !def.keywords().is_empty(),
            kv("tags", str_lit(def.keywords().join(" "))),
        );

    for (name, value, offset, text_layer) in [
        (
            "Reference",
            instance.reference(),
            -2.5,
            side_layer("F.SilkS", "B.SilkS"),
        ),
        ("Value", instance.value(), 2.5, side_layer("F.Fab", "B.Fab")),
    ] {
        let mut property = ListBuilder::node("property");
        property
            .push(str_lit(name))
            .push(str_lit(value))
            .push(at_opt(Point::new(0.0, offset), frame.rotation))
            .push(layer(&text_layer))
            .push(uuid(ids.next_id()))
            .push(frame.text_effects());
        fp.push(property.build());
    }

    let attr = if def.is_through_hole() { "through_hole" } else { "smd" };
    fp.push(kv("attr", Sexpr::symbol(attr)));

    for graphic in def.graphics() {
        fp.extend(fp_graphic(graphic, &frame, ids));
    }

    for pad in def.pads() {
        fp.push(pad_sexpr(board, instance, pad, &frame, ids));
    }

    fp.build()
}

fn fp_graphic(graphic: &Graphic, frame: &LocalFrame, ids: &mut IdSequence<'_>) -> Vec<Sexpr> {
    let layer_name = graphic.layer.board_layer(frame.front);
    let width = graphic.layer.stroke_width();
    let finish = |node: &mut ListBuilder, ids: &mut IdSequence<'_>| {
        node.push(layer(layer_name)).push(uuid(ids.next_id()));
    };
    let line = |start: Point, end: Point, ids: &mut IdSequence<'_>| {
        let mut node = ListBuilder::node("fp_line");
        node.push(pt("start", frame.map(start)))
            .push(pt("end", frame.map(end)))
            .push(stroke(width, "solid"));
        finish(&mut node, ids);
        node.build()
    };

    match &graphic.primitive {
        GraphicPrimitive::Line { start, end } => vec![line(*start, *end, ids)],
        GraphicPrimitive::Rect { start, end } => {
            let mut node = ListBuilder::node("fp_rect");
            node.push(pt("start", frame.map(*start)))
                .push(pt("end", frame.map(*end)))
                .push(stroke(width, "solid"))
                .push(kv("fill", Sexpr::symbol("none")));
            finish(&mut node, ids);
            vec![node.build()]
        }
        GraphicPrimitive::Circle { center, radius } => {
            let mut node = ListBuilder::node("fp_circle");
            node.push(pt("center", frame.map(*center)))
                .push(pt("end", frame.map(*center + Point::new(*radius, 0.0))))
                .push(stroke(width, "solid"))
                .push(kv("fill", Sexpr::symbol("none")));
            finish(&mut node, ids);
            vec![node.build()]
        }
        GraphicPrimitive::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        } => {
            let [start, mid, end] = arc_points(*center, *radius, *start_angle, *end_angle);
            let mut node = ListBuilder::node("fp_arc");
            node.push(pt("start", frame.map(start)))
                .push(pt("mid", frame.map(mid)))
                .push(pt("end", frame.map(end)))
                .push(stroke(width, "solid"));
            finish(&mut node, ids);
            vec![node.build()]
        }
        GraphicPrimitive::Text { content, position } => {
            let mut node = ListBuilder::node("fp_text");
            node.push(Sexpr::symbol("user"))
                .push(str_lit(content))
                .push(at_opt(frame.map(*position), frame.rotation));
            finish(&mut node, ids);
            node.push(frame.text_effects());
            vec![node.build()]
        }
        GraphicPrimitive::Polyline { points } => {
            let closed = points.len() > 3 && points.first() == points.last();
            if closed {
                let ring: Vec<Point> = points[..points.len() - 1]
                    .iter()
                    .map(|p| frame.map(*p))
                    .collect();
                let mut node = ListBuilder::node("fp_poly");
                node.push(pts(&ring))
                    .push(stroke(width, "solid"))
                    .push(kv("fill", Sexpr::symbol("none")));
                finish(&mut node, ids);
                vec![node.build()]
            } else {
                points
                    .windows(2)
                    .map(|seg| line(seg[0], seg[1], ids))
                    .collect()
            }
        }
    }
}

fn pad_sexpr(
    board: &Board,
    instance: &PlacedInstance<Pad>,
    pad: &Pad,
    frame: &LocalFrame,
    ids: &mut IdSequence<'_>,
) -> Sexpr {
    let kind = if pad.is_through_hole() { "thru_hole" } else { "smd" };
    let copper: &[&str] = match (pad.is_through_hole(), frame.front) {
        (true, _) => &["*.Cu", "*.Mask"],
        (false, true) => &["F.Cu", "F.Paste", "F.Mask"],
        (false, false) => &["B.Cu", "B.Paste", "B.Mask"],
    };

    let mut node = ListBuilder::node("pad");
    node.push(str_lit(&pad.number))
        .push(Sexpr::symbol(kind))
        .push(Sexpr::symbol(pad.shape.as_kicad()))
        .push(at_opt(frame.map(pad.offset), frame.rotation))
        .push(Sexpr::list(vec![
            Sexpr::symbol("size"),
            pad.size.0.into(),
            pad.size.1.into(),
        ]))
        .push_if(pad.is_through_hole(), kv("drill", pad.drill));

    let mut layers = vec![Sexpr::symbol("layers")];
    layers.extend(copper.iter().map(|l| str_lit(*l)));
    node.push(Sexpr::list(layers))
        .push_if(
            pad.shape == PadShape::RoundRect,
            kv("roundrect_rratio", ROUNDRECT_RATIO),
        );

    let net = instance.net_of(&pad.number);
    if !net.is_none() {
        node.push(Sexpr::list(vec![
            Sexpr::symbol("net"),
            net.get().into(),
            str_lit(board.nets.lookup_name(net)),
        ]));
    }
    node.push(uuid(ids.next_id()));
    node.build()
}

fn segment(track: &Track, ids: &mut IdSequence<'_>) -> Sexpr {
    let mut node = ListBuilder::node("segment");
    node.push(pt("start", track.start))
        .push(pt("end", track.end))
        .push(kv("width", track.width))
        .push(layer(&track.layer.to_string()))
        .push(kv("net", track.net.get()))
        .push(uuid(ids.next_id()));
    node.build()
}

fn via_sexpr(via: &Via, ids: &mut IdSequence<'_>) -> Sexpr {
    let mut node = ListBuilder::node("via");
    node.push(pt("at", via.position))
        .push(kv("size", via.size))
        .push(kv("drill", via.drill))
        .push(Sexpr::list(vec![
            Sexpr::symbol("layers"),
            str_lit("F.Cu"),
            str_lit("B.Cu"),
        ]))
        .push(kv("net", via.net.get()))
        .push(uuid(ids.next_id()));
    node.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    #[test]
    fn segment_block() {
        let track = Track {
            start: Point::new(12.0, 10.0),
            end: Point::new(32.0, 10.0),
            width: 0.25,
            layer: crate::board::CopperLayer::Front,
            net: crate::net::NetRegistry::new().get_or_create("SIG"),
        };
        let mut ids = IdSequence::new(&SequentialIds);
        let text = format_tree(&segment(&track, &mut ids), FormatMode::CompactTextProperties);
        assert_eq!(
            text,
            "(segment\n\t(start 12 10)\n\t(end 32 10)\n\t(width 0.25)\n\t(layer \"F.Cu\")\n\t(net 1)\n\t(uuid \"00000000-0000-0000-0000-000000000001\")\n)\n"
        );
    }

    #[test]
    fn four_layer_table_lists_inner_copper() {
        let text = format_tree(&layers(4), FormatMode::Normal);
        assert!(text.contains("(0 \"F.Cu\" signal)"));
        assert!(text.contains("(1 \"In1.Cu\" signal)"));
        assert!(text.contains("(2 \"In2.Cu\" signal)"));
        assert!(text.contains("(31 \"B.Cu\" signal)"));
        assert!(text.contains("(44 \"Edge.Cuts\" user)"));
        assert!(!text.contains("In3.Cu"));
    }
}
