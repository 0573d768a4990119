//! Small S-expression constructors shared by the board and schematic writers.

use kisynth_sexpr::{Sexpr, kv};
use uuid::Uuid;

use crate::geometry::{Point, normalize_degrees};

pub(crate) fn str_lit(s: impl Into<String>) -> Sexpr {
    Sexpr::string(s)
}

/// `(name x y)`
pub(crate) fn pt(name: &str, p: Point) -> Sexpr {
    Sexpr::list(vec![Sexpr::symbol(name), p.x.into(), p.y.into()])
}

/// `(xy x y)`
pub(crate) fn xy(p: Point) -> Sexpr {
    pt("xy", p)
}

/// `(pts (xy ..) ..)`
pub(crate) fn pts<'a>(points: impl IntoIterator<Item = &'a Point>) -> Sexpr {
    let mut items = vec![Sexpr::symbol("pts")];
    items.extend(points.into_iter().copied().map(xy));
    Sexpr::list(items)
}

/// `(at x y angle)`, always carrying the angle.
pub(crate) fn at(p: Point, degrees: f64) -> Sexpr {
    Sexpr::list(vec![
        Sexpr::symbol("at"),
        p.x.into(),
        p.y.into(),
        normalize_degrees(degrees).into(),
    ])
}

/// `(at x y)` with the angle only when it is not zero, as pcbnew writes it.
pub(crate) fn at_opt(p: Point, degrees: f64) -> Sexpr {
    let angle = normalize_degrees(degrees);
    if angle == 0.0 {
        pt("at", p)
    } else {
        at(p, angle)
    }
}

pub(crate) fn uuid(id: Uuid) -> Sexpr {
    kv("uuid", str_lit(id.to_string()))
}

pub(crate) fn layer(name: &str) -> Sexpr {
    kv("layer", str_lit(name))
}

/// `(font (size s s))`, plus thickness on boards.
pub(crate) fn font(size: f64, thickness: Option<f64>) -> Sexpr {
    let mut items = vec![
        Sexpr::symbol("font"),
        Sexpr::list(vec![Sexpr::symbol("size"), size.into(), size.into()]),
    ];
    if let Some(t) = thickness {
        items.push(kv("thickness", t));
    }
    Sexpr::list(items)
}

/// `(effects (font ..) [(justify ..)] [hide])`
pub(crate) fn effects(font: Sexpr, justify: &[&str], hide: bool) -> Sexpr {
    let mut items = vec![Sexpr::symbol("effects"), font];
    if !justify.is_empty() {
        let mut j = vec![Sexpr::symbol("justify")];
        j.extend(justify.iter().map(|s| Sexpr::symbol(*s)));
        items.push(Sexpr::list(j));
    }
    if hide {
        items.push(Sexpr::symbol("hide"));
    }
    Sexpr::list(items)
}

/// `(stroke (width w) (type t))`
pub(crate) fn stroke(width: f64, kind: &str) -> Sexpr {
    Sexpr::list(vec![
        Sexpr::symbol("stroke"),
        kv("width", width),
        kv("type", Sexpr::symbol(kind)),
    ])
}
