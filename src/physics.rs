use crate::geom::{Bounds, Circle, Rect};

/// Signed overlap of a shape past its container's edges, in pixels.
/// Zero on an axis means the shape is inside on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Penetration {
    pub dx: f32,
    pub dy: f32,
}

impl Penetration {
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Edge-containment test: how far `inner` sticks out of `outer`.
///
/// Per axis, the overlap is negative when penetrating the near (left/top)
/// edge and positive when penetrating the far (right/bottom) edge. The far
/// edge uses `>=`, so a shape exactly touching the right or bottom edge
/// counts as out of bounds while one touching the left or top edge does not.
/// This is not a general intersection test; it exists to detect "shape has
/// left the arena".
pub fn contains(inner: &impl Bounds, outer: &impl Bounds) -> Penetration {
    let mut dx = 0.0;
    let mut dy = 0.0;

    if inner.left() < outer.left() {
        dx = inner.left() - outer.left();
    } else if inner.right() >= outer.right() {
        dx = inner.right() - outer.right();
    }

    if inner.top() < outer.top() {
        dy = inner.top() - outer.top();
    } else if inner.bottom() >= outer.bottom() {
        dy = inner.bottom() - outer.bottom();
    }

    Penetration { dx, dy }
}

/// True when the circles overlap. Strict inequality: tangent circles do not
/// collide.
pub fn circle_circle(c1: &Circle, c2: &Circle) -> bool {
    let dx = c2.x - c1.x;
    let dy = c2.y - c1.y;
    let dr = c1.radius + c2.radius;

    dx * dx + dy * dy < dr * dr
}

/// True when the rectangles overlap. Inclusive on all edges: rectangles that
/// merely touch count as colliding (tie-break differs from `circle_circle`).
pub fn rect_rect(r1: &Rect, r2: &Rect) -> bool {
    r1.right() >= r2.left()
        && r1.left() <= r2.right()
        && r1.bottom() >= r2.top()
        && r1.top() <= r2.bottom()
}

/// True when the circle overlaps the rectangle, measured from the nearest
/// point of the rectangle to the circle center. Inclusive at the radius.
pub fn circle_rect(c: &Circle, r: &Rect) -> bool {
    let dx = r.left().max(c.x.min(r.right())) - c.x;
    let dy = r.top().max(c.y.min(r.bottom())) - c.y;

    dx * dx + dy * dy <= c.radius * c.radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circles_eight_apart_with_radius_five_collide() {
        let c1 = Circle::new(0.0, 0.0, 5.0);
        let c2 = Circle::new(8.0, 0.0, 5.0);
        assert!(circle_circle(&c1, &c2));
    }

    #[test]
    fn circles_twelve_apart_with_radius_five_do_not_collide() {
        let c1 = Circle::new(0.0, 0.0, 5.0);
        let c2 = Circle::new(12.0, 0.0, 5.0);
        assert!(!circle_circle(&c1, &c2));
    }

    #[test]
    fn tangent_circles_do_not_collide() {
        // Distance exactly equals sum of radii; strict `<` says no.
        let c1 = Circle::new(0.0, 0.0, 5.0);
        let c2 = Circle::new(10.0, 0.0, 5.0);
        assert!(!circle_circle(&c1, &c2));
    }

    #[test]
    fn circle_circle_is_symmetric() {
        let c1 = Circle::new(1.0, 2.0, 3.0);
        let c2 = Circle::new(4.0, 5.0, 2.0);
        assert_eq!(circle_circle(&c1, &c2), circle_circle(&c2, &c1));
    }

    #[test]
    fn touching_rects_collide() {
        let r1 = Rect::new(0.0, 0.0, 10.0, 10.0);
        let r2 = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(rect_rect(&r1, &r2));
    }

    #[test]
    fn rect_rect_is_symmetric_and_reflexive() {
        let r1 = Rect::new(0.0, 0.0, 10.0, 10.0);
        let r2 = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(rect_rect(&r1, &r2), rect_rect(&r2, &r1));
        assert!(rect_rect(&r1, &r1));
    }

    #[test]
    fn separated_rects_do_not_collide() {
        let r1 = Rect::new(0.0, 0.0, 10.0, 10.0);
        let r2 = Rect::new(10.1, 0.0, 10.0, 10.0);
        assert!(!rect_rect(&r1, &r2));
    }

    #[test]
    fn circle_touching_rect_edge_collides() {
        // Nearest point is at distance exactly radius; inclusive `<=` says yes.
        let c = Circle::new(15.0, 5.0, 5.0);
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(circle_rect(&c, &r));
    }

    #[test]
    fn circle_inside_rect_collides() {
        let c = Circle::new(5.0, 5.0, 1.0);
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(circle_rect(&c, &r));
    }

    #[test]
    fn circle_away_from_rect_does_not_collide() {
        let c = Circle::new(20.0, 20.0, 5.0);
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!circle_rect(&c, &r));
    }

    #[test]
    fn contains_reports_zero_when_strictly_inside() {
        let inner = Rect::new(10.0, 10.0, 5.0, 5.0);
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(contains(&inner, &outer), Penetration::default());
    }

    #[test]
    fn contains_reports_negative_overlap_past_near_edges() {
        let inner = Circle::new(2.0, 3.0, 5.0);
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let p = contains(&inner, &outer);
        assert_eq!(p.dx, -3.0);
        assert_eq!(p.dy, -2.0);
    }

    #[test]
    fn contains_reports_positive_overlap_past_far_edges() {
        let inner = Rect::new(95.0, 98.0, 10.0, 10.0);
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let p = contains(&inner, &outer);
        assert_eq!(p.dx, 5.0);
        assert_eq!(p.dy, 8.0);
    }

    #[test]
    fn touching_far_edge_counts_as_out() {
        // right == outer.right -> `>=` flags a zero-width overlap as out...
        let inner = Rect::new(90.0, 10.0, 10.0, 10.0);
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(contains(&inner, &outer).dx, 0.0);
        // ...which reads as dx == 0 only because the overlap amount is zero;
        // nudge past and the sign shows.
        let inner = Rect::new(90.5, 10.0, 10.0, 10.0);
        assert_eq!(contains(&inner, &outer).dx, 0.5);
    }

    #[test]
    fn touching_near_edge_counts_as_in() {
        let inner = Rect::new(0.0, 0.0, 10.0, 10.0);
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(contains(&inner, &outer).dx, 0.0);
    }
}
