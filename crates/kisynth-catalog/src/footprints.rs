//! Board footprints.
//!
//! Pad positions and artwork follow the KiCad standard library footprints of
//! the same name, trimmed to what the generated boards need.

use std::sync::Arc;

use kisynth::{FootprintDef, Graphic, GraphicPrimitive as Shape, Pad, PadShape, Result};

fn smd(number: &str, x: f64, y: f64, w: f64, h: f64, shape: PadShape) -> Pad {
    Pad::smd(number, (x, y), (w, h), shape)
}

/// Square or round through-hole pad.
fn tht(number: &str, x: f64, y: f64, size: f64, shape: PadShape, drill: f64) -> Pad {
    Pad::through_hole(number, (x, y), (size, size), shape, drill)
}

fn silk_line(start: (f64, f64), end: (f64, f64)) -> Graphic {
    Graphic::silkscreen(Shape::line(start, end))
}

fn silk_rect(start: (f64, f64), end: (f64, f64)) -> Graphic {
    Graphic::silkscreen(Shape::rect(start, end))
}

fn silk_circle(center: (f64, f64), radius: f64) -> Graphic {
    Graphic::silkscreen(Shape::circle(center, radius))
}

fn fab_rect(start: (f64, f64), end: (f64, f64)) -> Graphic {
    Graphic::fabrication(Shape::rect(start, end))
}

fn fab_circle(radius: f64) -> Graphic {
    Graphic::fabrication(Shape::circle((0.0, 0.0), radius))
}

/// Two round pads on the X axis, `pitch` apart.
fn axial_pads(pitch: f64, size: f64, drill: f64, first: PadShape) -> [Pad; 2] {
    let half = pitch / 2.0;
    [
        tht("1", -half, 0.0, size, first, drill),
        tht("2", half, 0.0, size, PadShape::Circle, drill),
    ]
}

pub fn r_0805() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("R_0805_2012Metric")
        .description("Resistor SMD 0805 (2012 Metric)")
        .reference_prefix("R")
        .keywords(["resistor"])
        .terminal(smd("1", -1.025, 0.0, 1.15, 1.05, PadShape::RoundRect))
        .terminal(smd("2", 1.025, 0.0, 1.15, 1.05, PadShape::RoundRect))
        .graphic(silk_line((-0.227, 0.735), (0.227, 0.735)))
        .graphic(silk_line((-0.227, -0.735), (0.227, -0.735)))
        .graphic(fab_rect((-1.0, -0.625), (1.0, 0.625)))
        .graphic(Graphic::courtyard(Shape::polygon([
            (-1.68, -0.95),
            (1.68, -0.95),
            (1.68, 0.95),
            (-1.68, 0.95),
        ])))
        .build()
}

pub fn r_1206() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("R_1206_3216Metric")
        .description("Resistor SMD 1206 (3216 Metric)")
        .reference_prefix("R")
        .keywords(["resistor"])
        .terminal(smd("1", -1.4625, 0.0, 1.125, 1.75, PadShape::RoundRect))
        .terminal(smd("2", 1.4625, 0.0, 1.125, 1.75, PadShape::RoundRect))
        .graphic(silk_line((-0.5, 1.0), (0.5, 1.0)))
        .graphic(silk_line((-0.5, -1.0), (0.5, -1.0)))
        .graphic(fab_rect((-1.6, -0.8), (1.6, 0.8)))
        .build()
}

pub fn r_axial() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("R_Axial_DIN0207_L6.3mm_D2.5mm_P10.16mm_Horizontal")
        .description("Resistor, Axial, 1/4W, 6.3mm body")
        .reference_prefix("R")
        .keywords(["resistor", "axial"])
        .terminals(axial_pads(10.16, 1.8, 0.8, PadShape::Circle))
        .graphic(silk_rect((-3.0, -1.25), (3.0, 1.25)))
        .graphic(silk_line((-5.08, 0.0), (-3.0, 0.0)))
        .graphic(silk_line((3.0, 0.0), (5.08, 0.0)))
        .graphic(fab_rect((-3.15, -1.25), (3.15, 1.25)))
        .build()
}

pub fn c_0805() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("C_0805_2012Metric")
        .description("Capacitor SMD 0805 (2012 Metric)")
        .reference_prefix("C")
        .keywords(["capacitor"])
        .terminal(smd("1", -0.95, 0.0, 1.0, 1.25, PadShape::RoundRect))
        .terminal(smd("2", 0.95, 0.0, 1.0, 1.25, PadShape::RoundRect))
        .graphic(silk_line((-0.5, 0.85), (0.5, 0.85)))
        .graphic(silk_line((-0.5, -0.85), (0.5, -0.85)))
        .graphic(fab_rect((-1.0, -0.625), (1.0, 0.625)))
        .build()
}

pub fn c_elec_8x10() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("CP_Radial_D8.0mm_P3.50mm")
        .description("Electrolytic Capacitor, 8mm diameter, 3.5mm pitch")
        .reference_prefix("C")
        .keywords(["capacitor", "electrolytic"])
        // pad 1 is the positive lead
        .terminals(axial_pads(3.5, 2.0, 1.0, PadShape::Rect))
        .graphic(silk_circle((0.0, 0.0), 4.2))
        .graphic(silk_line((-4.2, -2.0), (-4.2, 2.0)))
        .graphic(fab_circle(4.0))
        .build()
}

pub fn c_elec_10x10() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("CP_Radial_D10.0mm_P5.00mm")
        .description("Electrolytic Capacitor, 10mm diameter, 5mm pitch")
        .reference_prefix("C")
        .keywords(["capacitor", "electrolytic"])
        .terminals(axial_pads(5.0, 2.5, 1.0, PadShape::Rect))
        .graphic(silk_circle((0.0, 0.0), 5.2))
        .graphic(silk_line((-5.2, -2.5), (-5.2, 2.5)))
        .graphic(fab_circle(5.0))
        .build()
}

pub fn c_disc() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("C_Disc_D7.5mm_W4.4mm_P5.00mm")
        .description("Disc Capacitor, 7.5mm diameter, 5mm pitch")
        .reference_prefix("C")
        .keywords(["capacitor", "disc"])
        .terminals(axial_pads(5.0, 2.0, 0.8, PadShape::Circle))
        .graphic(silk_rect((-3.75, -2.2), (3.75, 2.2)))
        .graphic(fab_rect((-3.75, -2.2), (3.75, 2.2)))
        .build()
}

pub fn d_sod123() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("D_SOD-123")
        .description("Diode SOD-123")
        .reference_prefix("D")
        .keywords(["diode"])
        // 1 = cathode
        .terminal(smd("1", -1.4, 0.0, 1.1, 0.9, PadShape::Rect))
        .terminal(smd("2", 1.4, 0.0, 1.1, 0.9, PadShape::RoundRect))
        .graphic(silk_line((-0.4, 0.7), (-0.4, -0.7)))
        .graphic(silk_line((-0.4, 0.7), (0.8, 0.0)))
        .graphic(silk_line((-0.4, -0.7), (0.8, 0.0)))
        .graphic(silk_line((0.8, 0.7), (0.8, -0.7)))
        .graphic(fab_rect((-0.775, -0.55), (0.775, 0.55)))
        .build()
}

pub fn d_do41() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("D_DO-41_SOD81_P10.16mm_Horizontal")
        .description("Diode DO-41 (SOD81), Axial")
        .reference_prefix("D")
        .keywords(["diode", "axial"])
        .terminals(axial_pads(10.16, 2.0, 1.0, PadShape::Rect))
        .graphic(silk_rect((-2.5, -1.3), (2.5, 1.3)))
        .graphic(silk_line((-1.5, 1.3), (-1.5, -1.3)))
        .graphic(silk_line((-5.08, 0.0), (-2.5, 0.0)))
        .graphic(silk_line((2.5, 0.0), (5.08, 0.0)))
        .graphic(fab_rect((-2.5, -1.3), (2.5, 1.3)))
        .build()
}

pub fn d_bridge() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("Diode_Bridge_DIP-4")
        .description("Diode Bridge, DIP-4")
        .reference_prefix("D")
        .keywords(["bridge", "rectifier"])
        .terminal(tht("1", -3.81, -2.54, 1.5, PadShape::Rect, 0.8))
        .terminal(tht("2", -3.81, 2.54, 1.5, PadShape::Circle, 0.8))
        .terminal(tht("3", 3.81, 2.54, 1.5, PadShape::Circle, 0.8))
        .terminal(tht("4", 3.81, -2.54, 1.5, PadShape::Circle, 0.8))
        .graphic(silk_rect((-5.0, -4.0), (5.0, 4.0)))
        .graphic(silk_circle((-4.0, -3.0), 0.3))
        .graphic(fab_rect((-4.8, -3.8), (4.8, 3.8)))
        .build()
}

pub fn d_schottky_to220() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("D_TO-220AC")
        .description("Diode TO-220AC")
        .reference_prefix("D")
        .keywords(["diode", "schottky", "TO-220"])
        .terminals(axial_pads(5.08, 2.5, 1.2, PadShape::Rect))
        .graphic(silk_rect((-5.0, -7.0), (5.0, 2.0)))
        .graphic(silk_circle((-4.0, -6.0), 0.5))
        .graphic(fab_rect((-5.0, -7.0), (5.0, 2.0)))
        .build()
}

/// Dual-row package numbered counter-clockwise from the bottom-left.
fn dual_row(half_width: f64, first_y: f64, pitch: f64, make: impl Fn(&str, f64, f64) -> Pad) -> Vec<Pad> {
    let mut pads: Vec<Pad> = (0..4u32)
        .flat_map(|i| {
            let step = f64::from(i) * pitch;
            [
                make(&(i + 1).to_string(), -half_width, first_y - step),
                make(&(i + 5).to_string(), half_width, -first_y + step),
            ]
        })
        .collect();
    pads.sort_by_key(|p| p.number.parse::<u32>().unwrap_or(u32::MAX));
    pads
}

pub fn dip8() -> Result<Arc<FootprintDef>> {
    let pads = dual_row(3.81, 3.81, 2.54, |n, x, y| {
        let shape = if n == "1" { PadShape::Rect } else { PadShape::Circle };
        tht(n, x, y, 1.5, shape, 0.8)
    });
    FootprintDef::builder("DIP-8_W7.62mm")
        .description("DIP-8, 7.62mm width")
        .reference_prefix("U")
        .keywords(["DIP", "THT"])
        .terminals(pads)
        .graphic(silk_rect((-5.0, -5.5), (5.0, 5.5)))
        .graphic(Graphic::silkscreen(Shape::arc((-5.0, 5.5), 0.8, 0.0, 180.0)))
        .graphic(fab_rect((-4.8, -5.3), (4.8, 5.3)))
        .build()
}

pub fn sop8() -> Result<Arc<FootprintDef>> {
    let pads = dual_row(2.7, 2.275, 1.27, |n, x, y| {
        smd(n, x, y, 1.5, 0.6, PadShape::RoundRect)
    });
    FootprintDef::builder("SOIC-8_3.9x4.9mm_P1.27mm")
        .description("SOIC-8, 3.9x4.9mm, 1.27mm pitch")
        .reference_prefix("U")
        .keywords(["SOIC", "SMD"])
        .terminals(pads)
        .graphic(silk_rect((-2.0, -2.5), (2.0, 2.5)))
        .graphic(silk_circle((-2.5, 2.5), 0.3))
        .graphic(fab_rect((-1.95, -2.45), (1.95, 2.45)))
        .build()
}

pub fn to92() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("TO-92_Inline")
        .description("TO-92, Inline")
        .reference_prefix("Q")
        .keywords(["TO-92", "transistor"])
        .terminal(tht("1", -2.54, 0.0, 1.5, PadShape::Rect, 0.8))
        .terminal(tht("2", 0.0, 0.0, 1.5, PadShape::Circle, 0.8))
        .terminal(tht("3", 2.54, 0.0, 1.5, PadShape::Circle, 0.8))
        .graphic(silk_circle((0.0, 0.0), 2.0))
        // flat side
        .graphic(silk_line((-2.0, -1.0), (2.0, -1.0)))
        .graphic(fab_circle(2.0))
        .build()
}

pub fn terminal_block_2p() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("TerminalBlock_Phoenix_MKDS-1,5-2-5.08_1x02_P5.08mm_Horizontal")
        .description("Terminal Block, 2 pins, 5.08mm pitch")
        .reference_prefix("J")
        .keywords(["terminal", "screw"])
        .terminals(axial_pads(5.08, 2.5, 1.3, PadShape::Rect))
        .graphic(silk_rect((-5.0, -4.0), (5.0, 4.0)))
        .graphic(silk_circle((-4.0, -3.0), 0.5))
        .graphic(fab_rect((-5.0, -4.0), (5.0, 4.0)))
        .build()
}

pub fn header_2p() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("PinHeader_1x02_P2.54mm_Vertical")
        .description("Pin Header, 1x2, 2.54mm pitch, Vertical")
        .reference_prefix("J")
        .keywords(["header", "THT"])
        .terminal(tht("1", 0.0, -1.27, 1.7, PadShape::Rect, 1.0))
        .terminal(tht("2", 0.0, 1.27, 1.7, PadShape::Circle, 1.0))
        .graphic(silk_rect((-1.25, -2.5), (1.25, 2.5)))
        .graphic(silk_rect((-1.25, -2.5), (0.0, -1.25)))
        .graphic(fab_rect((-1.25, -2.5), (1.25, 2.5)))
        .build()
}

pub fn inductor_radial() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("L_Radial_D7.0mm_P5.00mm")
        .description("Inductor, Radial, 7mm diameter, 5mm pitch")
        .reference_prefix("L")
        .keywords(["inductor"])
        .terminals(axial_pads(5.0, 2.0, 0.8, PadShape::Circle))
        .graphic(silk_circle((0.0, 0.0), 3.5))
        .graphic(fab_circle(3.5))
        .build()
}

/// Six-pin EE-25 bobbin: primary left, auxiliary centre, secondary right.
pub fn transformer_ee25() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("Transformer_EE25")
        .description("Transformer, EE-25 core, 6 pins")
        .reference_prefix("T")
        .keywords(["transformer", "EE25"])
        .terminal(tht("1", -7.5, 5.0, 2.5, PadShape::Rect, 1.0))
        .terminal(tht("2", -7.5, -5.0, 2.5, PadShape::Circle, 1.0))
        .terminal(tht("3", 0.0, 5.0, 2.0, PadShape::Circle, 1.0))
        .terminal(tht("4", 0.0, -5.0, 2.0, PadShape::Circle, 1.0))
        .terminal(tht("5", 7.5, 5.0, 2.5, PadShape::Circle, 1.0))
        .terminal(tht("6", 7.5, -5.0, 2.5, PadShape::Circle, 1.0))
        .graphic(silk_rect((-10.0, -7.5), (10.0, 7.5)))
        // isolation slots
        .graphic(silk_line((-3.0, -7.5), (-3.0, 7.5)))
        .graphic(silk_line((3.0, -7.5), (3.0, 7.5)))
        .graphic(silk_circle((-9.0, -6.5), 0.5))
        .graphic(fab_rect((-10.0, -7.5), (10.0, 7.5)))
        .build()
}

pub fn fuse_5x20() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("Fuseholder_Cylinder-5x20mm_StaggeredPins")
        .description("Fuse Holder, 5x20mm cylinder")
        .reference_prefix("F")
        .keywords(["fuse", "holder"])
        .terminals(axial_pads(10.16, 2.5, 1.3, PadShape::Circle))
        .graphic(silk_rect((-8.0, -3.0), (8.0, 3.0)))
        .graphic(silk_line((-5.08, 0.0), (-3.0, 0.0)))
        .graphic(silk_line((3.0, 0.0), (5.08, 0.0)))
        .graphic(fab_rect((-8.0, -3.0), (8.0, 3.0)))
        .build()
}

pub fn fuse_1206() -> Result<Arc<FootprintDef>> {
    FootprintDef::builder("Fuse_1206_3216Metric")
        .description("Fuse SMD 1206")
        .reference_prefix("F")
        .keywords(["fuse"])
        .terminal(smd("1", -1.5, 0.0, 1.0, 1.6, PadShape::RoundRect))
        .terminal(smd("2", 1.5, 0.0, 1.0, 1.6, PadShape::RoundRect))
        .graphic(silk_line((-0.8, 1.0), (0.8, 1.0)))
        .graphic(silk_line((-0.8, -1.0), (0.8, -1.0)))
        .graphic(fab_rect((-1.6, -0.8), (1.6, 0.8)))
        .build()
}
