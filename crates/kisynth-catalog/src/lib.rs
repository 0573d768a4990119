//! Built-in starter catalog for `kisynth`.
//!
//! Each family has a builder function returning a fully populated, shared
//! definition. [`standard_footprints`] and [`standard_symbols`] collect them
//! into [`Catalog`]s under short keys such as `R_0805` or `GND`.

pub mod footprints;
pub mod symbols;

use kisynth::{Catalog, Pad, Pin, Result};

/// Every built-in footprint, keyed by its short handle.
pub fn standard_footprints() -> Result<Catalog<Pad>> {
    use footprints::*;

    let catalog = Catalog::new()
        .with("R_0805", r_0805()?)
        .with("R_1206", r_1206()?)
        .with("R_Axial", r_axial()?)
        .with("C_0805", c_0805()?)
        .with("C_Elec_8x10", c_elec_8x10()?)
        .with("C_Elec_10x10", c_elec_10x10()?)
        .with("C_Disc", c_disc()?)
        .with("D_SOD123", d_sod123()?)
        .with("D_DO41", d_do41()?)
        .with("D_Bridge", d_bridge()?)
        .with("D_Schottky_TO220", d_schottky_to220()?)
        .with("DIP8", dip8()?)
        .with("SOP8", sop8()?)
        .with("TO92", to92()?)
        .with("TerminalBlock_2P", terminal_block_2p()?)
        .with("Header_2P", header_2p()?)
        .with("L_Radial", inductor_radial()?)
        .with("Transformer_EE25", transformer_ee25()?)
        .with("Fuse_5x20", fuse_5x20()?)
        .with("Fuse_1206", fuse_1206()?);
    log::debug!("loaded {} built-in footprints", catalog.len());
    Ok(catalog)
}

/// Every built-in symbol, keyed by symbol name.
pub fn standard_symbols() -> Result<Catalog<Pin>> {
    use symbols::*;

    let mut catalog = Catalog::new();
    for symbol in [
        resistor()?,
        capacitor(false)?,
        capacitor(true)?,
        inductor()?,
        diode()?,
        schottky_diode()?,
        bridge_rectifier()?,
        viper22a()?,
        tl431()?,
        optocoupler()?,
        transformer()?,
        screw_terminal(2)?,
        fuse()?,
        varistor()?,
        gnd()?,
        supply("+5V")?,
    ] {
        catalog.insert(symbol.name().to_string(), symbol);
    }
    log::debug!("loaded {} built-in symbols", catalog.len());
    Ok(catalog)
}
