//! Pin-to-pin connection resolution shared by boards and schematics.

use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::net::{NetId, NetRegistry, synthesize_net_name};
use crate::placement::Placements;
use crate::terminal::Terminal;

/// One side of a connection: a placed reference and one of its terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Endpoint<'a> {
    pub reference: &'a str,
    pub pin: &'a str,
}

impl<'a> Endpoint<'a> {
    pub(crate) fn new(reference: &'a str, pin: &'a str) -> Self {
        Self { reference, pin }
    }
}

/// Geometry and net of a resolved connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Resolved {
    pub start: Point,
    pub end: Point,
    pub net: NetId,
}

fn locate<T: Terminal>(placements: &Placements<T>, endpoint: Endpoint<'_>) -> Result<Point> {
    let instance = placements
        .get(endpoint.reference)
        .ok_or_else(|| Error::UnknownReference {
            reference: endpoint.reference.to_string(),
        })?;
    instance
        .terminal_position(endpoint.pin)
        .ok_or_else(|| Error::UnknownPin {
            reference: endpoint.reference.to_string(),
            pin: endpoint.pin.to_string(),
        })
}

/// Positions of both endpoints, or the first lookup error.
///
/// References are checked before pins, so a missing part is reported even
/// when the other endpoint names a bad pin.
pub(crate) fn locate_endpoints<T: Terminal>(
    placements: &Placements<T>,
    from: Endpoint<'_>,
    to: Endpoint<'_>,
) -> Result<(Point, Point)> {
    for endpoint in [from, to] {
        if !placements.contains(endpoint.reference) {
            return Err(Error::UnknownReference {
                reference: endpoint.reference.to_string(),
            });
        }
    }
    Ok((locate(placements, from)?, locate(placements, to)?))
}

/// Register the net and annotate both terminals. An empty `net_name` counts
/// as absent. Both endpoints must already have been located.
pub(crate) fn bind_net<T: Terminal>(
    placements: &mut Placements<T>,
    nets: &mut NetRegistry,
    from: Endpoint<'_>,
    to: Endpoint<'_>,
    net_name: Option<&str>,
) -> NetId {
    let net = match net_name.filter(|name| !name.is_empty()) {
        Some(name) => nets.get_or_create(name),
        None => nets.get_or_create(&synthesize_net_name(
            from.reference,
            from.pin,
            to.reference,
            to.pin,
        )),
    };

    for endpoint in [from, to] {
        if let Some(instance) = placements.get_mut(endpoint.reference) {
            instance.assign_net(endpoint.pin, net);
        }
    }

    log::debug!(
        "connected {}.{} -> {}.{} on net {} `{}`",
        from.reference,
        from.pin,
        to.reference,
        to.pin,
        net,
        nets.lookup_name(net)
    );
    net
}

/// Resolve both endpoints, register the net and annotate both terminals.
///
/// Both endpoints are located before anything is written, so an error leaves
/// `placements` and `nets` untouched.
pub(crate) fn resolve_connection<T: Terminal>(
    placements: &mut Placements<T>,
    nets: &mut NetRegistry,
    from: Endpoint<'_>,
    to: Endpoint<'_>,
    net_name: Option<&str>,
) -> Result<Resolved> {
    let (start, end) = locate_endpoints(placements, from, to)?;
    let net = bind_net(placements, nets, from, to, net_name);
    Ok(Resolved { start, end, net })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::SymbolDef;
    use crate::placement::{PlacedInstance, Placement};
    use crate::terminal::{Pin, PinDirection};
    use std::sync::Arc;

    fn resistor() -> Arc<SymbolDef> {
        SymbolDef::builder("R")
            .terminal(Pin::new("1", "~", (-2.54, 0.0), PinDirection::Left))
            .terminal(Pin::new("2", "~", (2.54, 0.0), PinDirection::Right))
            .build()
            .unwrap()
    }

    fn setup() -> (Placements<Pin>, NetRegistry) {
        let mut placements = Placements::default();
        for (reference, x) in [("R1", 0.0), ("R2", 20.0)] {
            placements
                .insert(PlacedInstance::new(reference, "1k", resistor(), Placement::at(x, 0.0)))
                .unwrap();
        }
        (placements, NetRegistry::new())
    }

    #[test]
    fn synthesizes_a_name_when_none_given() {
        let (mut placements, mut nets) = setup();
        let resolved = resolve_connection(
            &mut placements,
            &mut nets,
            Endpoint::new("R1", "2"),
            Endpoint::new("R2", "1"),
            Some(""),
        )
        .unwrap();

        assert_eq!(nets.lookup_name(resolved.net), "Net-(R1-2)-(R2-1)");
        assert!(resolved.start.approx_eq(Point::new(2.54, 0.0), 1e-9));
        assert!(resolved.end.approx_eq(Point::new(17.46, 0.0), 1e-9));
        assert_eq!(placements.get("R1").unwrap().net_of("2"), resolved.net);
        assert_eq!(placements.get("R2").unwrap().net_of("1"), resolved.net);
    }

    #[test]
    fn unknown_reference_wins_over_unknown_pin() {
        let (mut placements, mut nets) = setup();
        let err = resolve_connection(
            &mut placements,
            &mut nets,
            Endpoint::new("R1", "9"),
            Endpoint::new("R7", "1"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownReference { ref reference } if reference == "R7"));
    }

    #[test]
    fn failure_leaves_state_untouched() {
        let (mut placements, mut nets) = setup();
        let err = resolve_connection(
            &mut placements,
            &mut nets,
            Endpoint::new("R1", "1"),
            Endpoint::new("R2", "3"),
            Some("VIN"),
        )
        .unwrap_err();

        assert!(matches!(err, Error::UnknownPin { ref pin, .. } if pin == "3"));
        assert_eq!(nets.len(), 1);
        assert_eq!(placements.get("R1").unwrap().net_of("1"), NetId::NONE);
    }
}
