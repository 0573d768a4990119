//! Printed-circuit-board document.

mod render;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::connect::{Endpoint, bind_net, locate_endpoints};
use crate::definition::FootprintDef;
use crate::error::{Error, Result, ensure_positive};
use crate::geometry::Point;
use crate::ids::{IdGenerator, NamespacedIds};
use crate::metadata::{Paper, TitleBlock};
use crate::net::{NetId, NetRegistry};
use crate::output::write_atomic;
use crate::placement::{PlacedInstance, Placement, Placements};
use crate::terminal::Pad;

/// Most copper layers a board can carry.
pub const MAX_COPPER_LAYERS: u8 = 32;

/// A copper layer a track can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CopperLayer {
    #[default]
    Front,
    Back,
    /// Inner layer, numbered from 1.
    Inner(u8),
}

impl CopperLayer {
    /// Layer ordinal in the `layers` table.
    pub fn ordinal(self) -> u8 {
        match self {
            CopperLayer::Front => 0,
            CopperLayer::Inner(n) => n,
            CopperLayer::Back => 31,
        }
    }

    /// Whether a board with `layer_count` copper layers has this layer.
    pub fn exists_on(self, layer_count: u8) -> bool {
        match self {
            CopperLayer::Front | CopperLayer::Back => true,
            CopperLayer::Inner(n) => n >= 1 && n <= layer_count.saturating_sub(2),
        }
    }
}

impl fmt::Display for CopperLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopperLayer::Front => f.write_str("F.Cu"),
            CopperLayer::Back => f.write_str("B.Cu"),
            CopperLayer::Inner(n) => write!(f, "In{n}.Cu"),
        }
    }
}

impl FromStr for CopperLayer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "F.Cu" => Ok(CopperLayer::Front),
            "B.Cu" => Ok(CopperLayer::Back),
            _ => s
                .strip_prefix("In")
                .and_then(|rest| rest.strip_suffix(".Cu"))
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=30).contains(n))
                .map(CopperLayer::Inner)
                .ok_or_else(|| Error::Config(format!("unknown copper layer `{s}`"))),
        }
    }
}

impl TryFrom<String> for CopperLayer {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CopperLayer> for String {
    fn from(layer: CopperLayer) -> Self {
        layer.to_string()
    }
}

/// A straight copper segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub start: Point,
    pub end: Point,
    pub width: f64,
    pub layer: CopperLayer,
    pub net: NetId,
}

/// A plated through-hole joining front and back copper.
#[derive(Debug, Clone, PartialEq)]
pub struct Via {
    pub position: Point,
    pub size: f64,
    pub drill: f64,
    pub net: NetId,
}

/// Overrides for a single board connection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectOptions {
    pub net: Option<String>,
    pub width: Option<f64>,
    pub layer: Option<CopperLayer>,
}

impl ConnectOptions {
    pub fn net(mut self, name: impl Into<String>) -> Self {
        self.net = Some(name.into());
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn layer(mut self, layer: CopperLayer) -> Self {
        self.layer = Some(layer);
        self
    }
}

/// A board being assembled: footprints, nets, copper and outline.
///
/// Build it up with [`Board::place`] and [`Board::connect`], then
/// [`Board::render`] or [`Board::save`].
#[derive(Debug)]
pub struct Board {
    name: String,
    width: f64,
    height: f64,
    layer_count: u8,
    thickness: f64,
    paper: Paper,
    title: TitleBlock,
    nets: NetRegistry,
    footprints: Placements<Pad>,
    tracks: Vec<Track>,
    vias: Vec<Via>,
    /// Closed polygon; first point repeated at the end.
    outline: Option<Vec<Point>>,
    ids: Box<dyn IdGenerator>,
    config: GeneratorConfig,
}

impl Board {
    /// Two-layer board with default settings.
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self::build(name.into(), width, height, GeneratorConfig::default())
    }

    /// Board using `config` for defaults; the config is validated first.
    pub fn with_config(
        name: impl Into<String>,
        width: f64,
        height: f64,
        config: GeneratorConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(name.into(), width, height, config))
    }

    fn build(name: String, width: f64, height: f64, config: GeneratorConfig) -> Self {
        let mut title = TitleBlock::new(&name);
        title.company = config.title.company.clone();
        title.revision = config.title.revision.clone();
        Self {
            ids: Box::new(NamespacedIds::new(&name)),
            paper: config.paper,
            thickness: config.board_thickness,
            name,
            width,
            height,
            layer_count: 2,
            title,
            nets: NetRegistry::new(),
            footprints: Placements::default(),
            tracks: Vec::new(),
            vias: Vec::new(),
            outline: None,
            config,
        }
    }

    /// Replace the uuid source used by rendering.
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn layer_count(&self) -> u8 {
        self.layer_count
    }

    /// Set the number of copper layers; must be even and between 2 and 32.
    pub fn set_layer_count(&mut self, count: u8) -> Result<()> {
        if count < 2 || count % 2 != 0 || count > MAX_COPPER_LAYERS {
            return Err(Error::InvalidLayerCount(count));
        }
        if let Some(track) = self.tracks.iter().find(|t| !t.layer.exists_on(count)) {
            return Err(Error::UnknownLayer(track.layer));
        }
        self.layer_count = count;
        Ok(())
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: f64) -> Result<()> {
        ensure_positive("board thickness", thickness)?;
        self.thickness = thickness;
        Ok(())
    }

    pub fn paper(&self) -> Paper {
        self.paper
    }

    pub fn set_paper(&mut self, paper: Paper) {
        self.paper = paper;
    }

    pub fn title(&self) -> &TitleBlock {
        &self.title
    }

    pub fn title_mut(&mut self) -> &mut TitleBlock {
        &mut self.title
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn nets(&self) -> &NetRegistry {
        &self.nets
    }

    /// Register (or look up) a net by name, e.g. for an external router.
    pub fn net(&mut self, name: &str) -> NetId {
        self.nets.get_or_create(name)
    }

    pub fn footprints(&self) -> &Placements<Pad> {
        &self.footprints
    }

    pub fn footprint(&self, reference: &str) -> Option<&PlacedInstance<Pad>> {
        self.footprints.get(reference)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn vias(&self) -> &[Via] {
        &self.vias
    }

    pub fn outline(&self) -> Option<&[Point]> {
        self.outline.as_deref()
    }

    pub fn place(
        &mut self,
        reference: impl Into<String>,
        value: impl Into<String>,
        footprint: Arc<FootprintDef>,
        placement: Placement,
    ) -> Result<()> {
        self.footprints
            .insert(PlacedInstance::new(reference, value, footprint, placement))
    }

    /// Set the board edge; the polygon is closed if it is not already.
    pub fn set_outline<I, P>(&mut self, points: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let mut points = points
            .into_iter()
            .map(Into::<Point>::into)
            .map(|p| p.ensure_finite("outline point"))
            .collect::<Result<Vec<Point>>>()?;
        let mut distinct: Vec<Point> = Vec::new();
        for p in &points {
            if !distinct.iter().any(|d| d.approx_eq(*p, 1e-9)) {
                distinct.push(*p);
            }
        }
        if distinct.len() < 3 {
            return Err(Error::MalformedOutline {
                points: distinct.len(),
            });
        }
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last {
                points.push(first);
            }
        }
        self.outline = Some(points);
        Ok(())
    }

    /// Rectangular outline from the origin to the board size.
    pub fn set_rect_outline(&mut self) -> Result<()> {
        let (w, h) = (self.width, self.height);
        self.set_outline([(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)])
    }

    /// Append a track, e.g. one produced by an external router.
    pub fn add_track(&mut self, track: Track) -> Result<()> {
        if !self.nets.contains(track.net) {
            return Err(Error::UnknownNet(track.net));
        }
        ensure_positive("track width", track.width)?;
        track.start.ensure_finite("track start")?;
        track.end.ensure_finite("track end")?;
        if !track.layer.exists_on(self.layer_count) {
            return Err(Error::UnknownLayer(track.layer));
        }
        log::debug!(
            "track {} -> {} on {} net {}",
            track.start,
            track.end,
            track.layer,
            track.net
        );
        self.tracks.push(track);
        Ok(())
    }

    /// Via with the configured default size and drill.
    pub fn default_via(&self, position: Point, net: NetId) -> Via {
        Via {
            position,
            size: self.config.via_size,
            drill: self.config.via_drill,
            net,
        }
    }

    pub fn add_via(&mut self, via: Via) -> Result<()> {
        if !self.nets.contains(via.net) {
            return Err(Error::UnknownNet(via.net));
        }
        ensure_positive("via drill", via.drill)?;
        ensure_positive("via size", via.size)?;
        if via.size <= via.drill {
            return Err(Error::InvalidDimension {
                what: "via size",
                value: via.size,
            });
        }
        via.position.ensure_finite("via position")?;
        log::debug!("via at {} net {}", via.position, via.net);
        self.vias.push(via);
        Ok(())
    }

    /// Join two pads with a track on the default layer and width.
    ///
    /// Without a name (or with an empty one) the net is called
    /// `Net-(<ref1>-<pin1>)-(<ref2>-<pin2>)`.
    pub fn connect(
        &mut self,
        ref1: &str,
        pin1: &str,
        ref2: &str,
        pin2: &str,
        net: Option<&str>,
    ) -> Result<NetId> {
        let options = ConnectOptions {
            net: net.map(str::to_string),
            ..Default::default()
        };
        self.connect_with(ref1, pin1, ref2, pin2, &options)
    }

    pub fn connect_with(
        &mut self,
        ref1: &str,
        pin1: &str,
        ref2: &str,
        pin2: &str,
        options: &ConnectOptions,
    ) -> Result<NetId> {
        let from = Endpoint::new(ref1, pin1);
        let to = Endpoint::new(ref2, pin2);
        let (start, end) = locate_endpoints(&self.footprints, from, to)?;

        let width = options.width.unwrap_or(self.config.track_width);
        let layer = options.layer.unwrap_or(self.config.trace_layer);
        ensure_positive("track width", width)?;
        if !layer.exists_on(self.layer_count) {
            return Err(Error::UnknownLayer(layer));
        }

        let net = bind_net(
            &mut self.footprints,
            &mut self.nets,
            from,
            to,
            options.net.as_deref(),
        );
        self.tracks.push(Track {
            start,
            end,
            width,
            layer,
            net,
        });
        Ok(net)
    }

    /// Render the board as `.kicad_pcb` text.
    pub fn render(&self) -> String {
        render::render_board(self)
    }

    /// Render and write atomically to `path`, consuming the board.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.render();
        write_atomic(path, &text)?;
        log::info!(
            "saved board `{}`: {} footprints, {} tracks, {} nets",
            self.name,
            self.footprints.len(),
            self.tracks.len(),
            self.nets.len()
        );
        Ok(())
    }
}
