//! Orthogonal connector routing between placed primitives.

use super::primitive::{Bounds, Point};

/// Endpoints closer than this vertically are drawn as one horizontal line.
pub const ALIGN_TOLERANCE: f32 = 5.0;
/// Horizontal offset of the `BottomShifted` anchor from the left edge; lines
/// the root's drop up with the connective circle below it.
pub const BOTTOM_SHIFT: f32 = 35.0;
/// How far right the target must sit before an elbow is preferred.
pub const ELBOW_MARGIN: f32 = 5.0;

/// Where a connector attaches to a primitive.
///
/// Horizontal and vertical placement are independent: `Left` is the left
/// edge at the vertical centre, `Bottom` is the left edge at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Left,
    Right,
    Center,
    Bottom,
    BottomShifted,
}

impl Anchor {
    pub fn is_bottom(self) -> bool {
        matches!(self, Anchor::Bottom | Anchor::BottomShifted)
    }

    pub fn resolve(self, bounds: &Bounds) -> Point {
        let x = match self {
            Anchor::Right => bounds.right(),
            Anchor::Center => bounds.center_x(),
            Anchor::BottomShifted => bounds.x + BOTTOM_SHIFT,
            Anchor::Left | Anchor::Bottom => bounds.x,
        };
        let y = if self.is_bottom() {
            bounds.bottom()
        } else {
            bounds.center_y()
        };
        Point::new(x, y)
    }
}

/// Arrowhead at the end of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Filled triangle used by every non-subsumption edge.
    Filled,
    /// White triangle with an outline, reserved for is-a edges.
    Clear,
}

impl Marker {
    pub fn id(self) -> &'static str {
        match self {
            Marker::Filled => "BlackTriangle",
            Marker::Clear => "ClearTriangle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route {
    /// Horizontal segment at the averaged height of both endpoints.
    Straight { from: Point, to: Point },
    /// Vertical run at the source x, then horizontal run to the target.
    Elbow { from: Point, corner: Point, to: Point },
    /// Degenerate fallback when neither rule applies.
    Direct { from: Point, to: Point },
}

impl Route {
    pub fn start(&self) -> Point {
        match *self {
            Route::Straight { from, .. } | Route::Elbow { from, .. } | Route::Direct { from, .. } => {
                from
            }
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Route::Straight { to, .. } | Route::Elbow { to, .. } | Route::Direct { to, .. } => to,
        }
    }

    pub fn points(&self) -> Vec<Point> {
        match *self {
            Route::Straight { from, to } | Route::Direct { from, to } => vec![from, to],
            Route::Elbow { from, corner, to } => vec![from, corner, to],
        }
    }

    /// SVG path data, `M x y L x y ...`.
    pub fn path_data(&self) -> String {
        let mut data = String::new();
        for (i, point) in self.points().iter().enumerate() {
            let command = if i == 0 { "M" } else { " L" };
            data.push_str(&format!("{} {:.2} {:.2}", command, point.x, point.y));
        }
        data
    }
}

/// Routes a connector from `from` (at `from_anchor`) to `to` (at `to_anchor`).
pub fn route(from: &Bounds, from_anchor: Anchor, to: &Bounds, to_anchor: Anchor) -> Route {
    let start = from_anchor.resolve(from);
    let end = to_anchor.resolve(to);

    if (start.y - end.y).abs() <= ALIGN_TOLERANCE {
        let y = (start.y + end.y) / 2.0;
        Route::Straight {
            from: Point::new(start.x, y),
            to: Point::new(end.x, y),
        }
    } else if (from_anchor.is_bottom() && to_anchor == Anchor::Left)
        || end.x > start.x + ELBOW_MARGIN
    {
        Route::Elbow {
            from: start,
            corner: Point::new(start.x, end.y),
            to: end,
        }
    } else {
        Route::Direct {
            from: start,
            to: end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Bounds {
        Bounds::new(x, y, w, h)
    }

    #[test]
    fn anchors_resolve_on_box_edges() {
        let b = rect(10.0, 20.0, 100.0, 40.0);

        assert_eq!(Anchor::Left.resolve(&b), Point::new(10.0, 40.0));
        assert_eq!(Anchor::Right.resolve(&b), Point::new(110.0, 40.0));
        assert_eq!(Anchor::Center.resolve(&b), Point::new(60.0, 40.0));
        assert_eq!(Anchor::Bottom.resolve(&b), Point::new(10.0, 60.0));
        assert_eq!(Anchor::BottomShifted.resolve(&b), Point::new(45.0, 60.0));
    }

    #[test]
    fn nearly_aligned_endpoints_become_one_horizontal_line() {
        let a = rect(0.0, 0.0, 20.0, 20.0);
        let b = rect(100.0, 4.0, 50.0, 20.0);

        let route = route(&a, Anchor::Right, &b, Anchor::Left);

        assert_eq!(
            route,
            Route::Straight {
                from: Point::new(20.0, 12.0),
                to: Point::new(100.0, 12.0),
            }
        );
        assert_eq!(route.path_data(), "M 20.00 12.00 L 100.00 12.00");
    }

    #[test]
    fn six_units_apart_is_no_longer_aligned() {
        let a = rect(0.0, 0.0, 20.0, 20.0);
        let b = rect(100.0, 6.0, 50.0, 20.0);
        assert!(matches!(route(&a, Anchor::Right, &b, Anchor::Left), Route::Elbow { .. }));
    }

    #[test]
    fn bottom_to_left_drops_then_turns() {
        let root = rect(10.0, 10.0, 200.0, 45.0);
        let connective = rect(100.0, 95.0, 50.0, 50.0);

        let route = route(&root, Anchor::BottomShifted, &connective, Anchor::Left);

        assert_eq!(
            route,
            Route::Elbow {
                from: Point::new(45.0, 55.0),
                corner: Point::new(45.0, 120.0),
                to: Point::new(100.0, 120.0),
            }
        );
    }

    #[test]
    fn bottom_to_left_elbows_even_when_target_is_behind() {
        let a = rect(100.0, 0.0, 50.0, 20.0);
        let b = rect(40.0, 80.0, 50.0, 20.0);
        assert!(matches!(route(&a, Anchor::Bottom, &b, Anchor::Left), Route::Elbow { .. }));
    }

    #[test]
    fn leftward_targets_fall_back_to_a_direct_segment() {
        let a = rect(200.0, 0.0, 20.0, 20.0);
        let b = rect(50.0, 100.0, 20.0, 20.0);

        let route = route(&a, Anchor::Center, &b, Anchor::Left);

        assert_eq!(
            route,
            Route::Direct {
                from: Point::new(210.0, 10.0),
                to: Point::new(50.0, 110.0),
            }
        );
    }

    #[test]
    fn marker_ids_match_defs() {
        assert_eq!(Marker::Filled.id(), "BlackTriangle");
        assert_eq!(Marker::Clear.id(), "ClearTriangle");
    }
}
