//! Schematic symbols and power markers.

use std::sync::Arc;

use kisynth::{
    DefinitionBuilder, ElectricalRole, Graphic, GraphicPrimitive as Shape, Pin, PinDirection,
    Result, SymbolDef,
};

use PinDirection::{Down, Left, Right, Up};

const DEVICE_LIB: &str = "Device";
const POWER_LIB: &str = "power";

fn pin(number: &str, name: &str, x: f64, y: f64, direction: PinDirection) -> Pin {
    Pin::new(number, name, (x, y), direction)
}

fn body_line<const N: usize>(points: [(f64, f64); N]) -> Graphic {
    Graphic::body(Shape::polyline(points))
}

fn body_rect(start: (f64, f64), end: (f64, f64)) -> Graphic {
    Graphic::body(Shape::rect(start, end))
}

fn body_text(content: &str, x: f64, y: f64) -> Graphic {
    Graphic::body(Shape::text(content, (x, y)))
}

fn device(name: &str, prefix: &str) -> DefinitionBuilder<Pin> {
    SymbolDef::builder(name)
        .library(DEVICE_LIB)
        .reference_prefix(prefix)
}

/// Two passive pins either side of the origin at `reach`.
fn two_terminal(reach: f64) -> [Pin; 2] {
    [pin("1", "~", -reach, 0.0, Left), pin("2", "~", reach, 0.0, Right)]
}

pub fn resistor() -> Result<Arc<SymbolDef>> {
    device("R", "R")
        .description("Resistor")
        .keywords(["R", "res", "resistor"])
        .graphic(body_rect((-1.016, -2.54), (1.016, 2.54)))
        .terminals(two_terminal(2.54))
        .build()
}

/// Unpolarized capacitor, or the electrolytic variant with a `+` mark.
pub fn capacitor(polarized: bool) -> Result<Arc<SymbolDef>> {
    let name = if polarized { "C_Polarized" } else { "C" };
    let mut builder = device(name, "C")
        .description(if polarized { "Polarized capacitor" } else { "Unpolarized capacitor" })
        .keywords(["cap", "capacitor"])
        .graphic(body_line([(-1.27, 0.635), (1.27, 0.635)]))
        .graphic(body_line([(-1.27, -0.635), (1.27, -0.635)]))
        .terminal(pin("1", "~", 0.0, 2.54, Up))
        .terminal(pin("2", "~", 0.0, -2.54, Down));
    if polarized {
        builder = builder.graphic(body_text("+", -1.5, 1.5));
    }
    builder.build()
}

pub fn inductor() -> Result<Arc<SymbolDef>> {
    let turns = [-1.905, -0.635, 0.635, 1.905]
        .map(|x| Graphic::body(Shape::arc((x, 0.0), 0.635, 0.0, 180.0)));
    device("L", "L")
        .description("Inductor")
        .keywords(["inductor", "choke", "coil"])
        .graphics(turns)
        .terminals(two_terminal(3.81))
        .build()
}

fn diode_body() -> [Graphic; 2] {
    [
        body_line([(-1.27, -1.27), (1.27, 0.0), (-1.27, 1.27), (-1.27, -1.27)]),
        body_line([(1.27, -1.27), (1.27, 1.27)]),
    ]
}

fn diode_pins() -> [Pin; 2] {
    [pin("1", "K", -3.81, 0.0, Left), pin("2", "A", 3.81, 0.0, Right)]
}

pub fn diode() -> Result<Arc<SymbolDef>> {
    device("D", "D")
        .description("Diode")
        .keywords(["diode"])
        .graphics(diode_body())
        .terminals(diode_pins())
        .build()
}

pub fn schottky_diode() -> Result<Arc<SymbolDef>> {
    device("D_Schottky", "D")
        .description("Schottky diode")
        .keywords(["diode", "Schottky"])
        .graphics(diode_body())
        .graphic(body_line([(0.5, -1.0), (0.8, -0.8), (0.8, -0.3)]))
        .graphic(body_line([(0.0, -1.0), (0.3, -0.8), (0.3, -0.3)]))
        .terminals(diode_pins())
        .build()
}

pub fn bridge_rectifier() -> Result<Arc<SymbolDef>> {
    device("Bridge_Rectifier", "BR")
        .description("Single-phase bridge rectifier")
        .keywords(["rectifier", "ACDC"])
        .graphic(Graphic::body(Shape::polygon([
            (0.0, -2.54),
            (2.54, 0.0),
            (0.0, 2.54),
            (-2.54, 0.0),
        ])))
        .graphic(body_line([(-1.0, -0.5), (0.0, 0.0), (-1.0, 0.5)]))
        .graphic(body_line([(0.5, -1.0), (0.0, 0.0), (0.5, 1.0)]))
        .terminal(pin("1", "+", 0.0, -3.81, Down))
        .terminal(pin("2", "~", -3.81, 0.0, Left))
        .terminal(pin("3", "-", 0.0, 3.81, Up))
        .terminal(pin("4", "~", 3.81, 0.0, Right))
        .build()
}

/// Off-line switcher in DIP-8.
pub fn viper22a() -> Result<Arc<SymbolDef>> {
    let left = [
        ("1", "SOURCE", ElectricalRole::PowerOut),
        ("2", "SOURCE", ElectricalRole::PowerOut),
        ("3", "FB", ElectricalRole::Input),
        ("4", "VDD", ElectricalRole::PowerIn),
        ("5", "DRAIN", ElectricalRole::PowerIn),
        ("6", "DRAIN", ElectricalRole::PowerIn),
        ("7", "DRAIN", ElectricalRole::PowerIn),
    ];
    let mut pins: Vec<Pin> = left
        .iter()
        .zip(0u32..)
        .map(|(&(number, name, role), row)| {
            pin(number, name, -10.16, 7.62 - f64::from(row) * 2.54, Left).with_role(role)
        })
        .collect();
    pins.push(pin("8", "DRAIN", 10.16, 7.62, Right).with_role(ElectricalRole::PowerIn));

    device("VIPer22A", "U")
        .description("Off-line SMPS primary switcher")
        .keywords(["SMPS", "switcher"])
        .graphic(body_rect((-7.62, -10.16), (7.62, 10.16)))
        .graphic(body_text("VIPer22A", 0.0, 0.0))
        .terminals(pins)
        .build()
}

pub fn tl431() -> Result<Arc<SymbolDef>> {
    device("TL431", "U")
        .description("Programmable shunt regulator")
        .keywords(["shunt", "reference"])
        .graphic(body_line([(-2.54, -2.54), (2.54, 0.0), (-2.54, 2.54), (-2.54, -2.54)]))
        .graphic(body_text("TL", 0.0, 0.8))
        .graphic(body_text("431", 0.0, -0.8))
        .terminal(pin("1", "REF", -5.08, 0.0, Left).with_role(ElectricalRole::Input))
        .terminal(pin("2", "A", 0.0, -3.81, Down).with_role(ElectricalRole::PowerIn))
        .terminal(pin("3", "K", 0.0, 3.81, Up).with_role(ElectricalRole::PowerOut))
        .build()
}

/// Optocoupler: LED on pins 1-2, phototransistor on 3-4.
pub fn optocoupler() -> Result<Arc<SymbolDef>> {
    device("PC817", "U")
        .description("Optocoupler, phototransistor output")
        .keywords(["optocoupler", "isolator"])
        .graphic(body_rect((-5.08, -5.08), (5.08, 5.08)))
        .graphic(body_line([(-3.81, 1.27), (-2.54, 0.0), (-3.81, -1.27), (-3.81, 1.27)]))
        .graphic(body_line([(-3.0, 1.5), (-2.0, 2.5)]))
        .graphic(body_line([(-2.5, 1.3), (-1.5, 2.3)]))
        .graphic(body_line([(2.54, -1.27), (2.54, 1.27)]))
        .graphic(body_line([(2.54, 0.0), (3.81, -1.27)]))
        .graphic(body_line([(2.54, 0.0), (3.81, 1.27)]))
        .terminal(pin("1", "A", -7.62, 2.54, Left))
        .terminal(pin("2", "K", -7.62, -2.54, Left))
        .terminal(pin("3", "E", 7.62, -2.54, Right))
        .terminal(pin("4", "C", 7.62, 2.54, Right))
        .build()
}

/// Flyback transformer with primary, auxiliary and secondary windings.
pub fn transformer() -> Result<Arc<SymbolDef>> {
    let rows = [3.81, 1.27, -1.27, -3.81];
    let primary = rows.map(|y| Graphic::body(Shape::arc((-3.81, y), 0.8, 0.0, 180.0)));
    let secondary = rows.map(|y| Graphic::body(Shape::arc((3.81, y), 0.8, 180.0, 0.0)));
    device("Transformer", "T")
        .description("Transformer, primary/auxiliary/secondary")
        .keywords(["transformer", "flyback"])
        .graphics(primary)
        .graphics(secondary)
        .graphic(body_line([(0.0, -5.08), (0.0, 5.08)]))
        .terminal(pin("1", "PRI+", -7.62, 5.08, Left))
        .terminal(pin("2", "PRI-", -7.62, -5.08, Left))
        .terminal(pin("3", "AUX+", -7.62, 2.54, Left))
        .terminal(pin("4", "AUX-", -7.62, -2.54, Left))
        .terminal(pin("5", "SEC+", 7.62, 5.08, Right))
        .terminal(pin("6", "SEC-", 7.62, -5.08, Right))
        .build()
}

/// Screw terminal with `pins` positions, named `Screw_Terminal_01xNN`.
pub fn screw_terminal(pins: usize) -> Result<Arc<SymbolDef>> {
    let count = pins as f64;
    let terminals = (0..pins).map(|i| {
        let y = (count - 1.0) * 1.27 / 2.0 - i as f64 * 2.54;
        pin(&(i + 1).to_string(), &format!("Pin{}", i + 1), -5.08, y, Left)
    });
    device(&format!("Screw_Terminal_01x{pins:02}"), "J")
        .description("Generic screw terminal")
        .keywords(["screw", "terminal", "connector"])
        .graphic(body_rect((-2.54, -1.27 * count), (2.54, 1.27 * count)))
        .terminals(terminals)
        .build()
}

pub fn fuse() -> Result<Arc<SymbolDef>> {
    device("Fuse", "F")
        .description("Fuse")
        .keywords(["fuse"])
        .graphic(body_rect((-2.54, -1.27), (2.54, 1.27)))
        .graphic(body_line([(-1.5, 0.0), (1.5, 0.0)]))
        .terminals(two_terminal(5.08))
        .build()
}

pub fn varistor() -> Result<Arc<SymbolDef>> {
    device("Varistor", "RV")
        .description("Voltage dependent resistor")
        .keywords(["VDR", "varistor", "MOV"])
        .graphic(body_rect((-2.54, -1.27), (2.54, 1.27)))
        .graphic(body_line([(-1.5, -0.5), (1.5, 0.5)]))
        .graphic(body_line([(-1.5, 0.5), (1.5, -0.5)]))
        .terminals(two_terminal(5.08))
        .build()
}

pub fn gnd() -> Result<Arc<SymbolDef>> {
    SymbolDef::builder("GND")
        .library(POWER_LIB)
        .power()
        .description("Power symbol creates a global label with name \"GND\", ground")
        .keywords(["global", "power"])
        .graphic(body_line([(0.0, 0.0), (0.0, -1.27)]))
        .graphic(body_line([(-1.27, -1.27), (1.27, -1.27)]))
        .graphic(body_line([(-0.762, -1.905), (0.762, -1.905)]))
        .graphic(body_line([(-0.254, -2.54), (0.254, -2.54)]))
        .terminal(pin("1", "GND", 0.0, 0.0, Up).with_role(ElectricalRole::PowerIn))
        .build()
}

/// Supply rail marker such as `+5V` or `+12V`.
pub fn supply(voltage: &str) -> Result<Arc<SymbolDef>> {
    SymbolDef::builder(voltage)
        .library(POWER_LIB)
        .power()
        .description(format!("Power symbol creates a global label with name \"{voltage}\""))
        .keywords(["global", "power"])
        .graphic(body_line([(0.0, 0.0), (0.0, -1.27)]))
        .graphic(body_line([(-0.762, -1.27), (0.0, -2.54), (0.762, -1.27)]))
        .graphic(body_text(voltage, 0.5, -3.0))
        .terminal(pin("1", voltage, 0.0, 0.0, Down).with_role(ElectricalRole::PowerOut))
        .build()
}
