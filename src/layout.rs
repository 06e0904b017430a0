//! Canvas geometry: grid snapping, collision-free placement, alignment
//! guides and the space left for an element to grow into.
//!
//! Coordinates are pixels with the origin at the top-left of the canvas and
//! `y` growing downwards.
use serde::{Deserialize, Serialize};

pub const GRID_SIZE: f64 = 16.0;
pub const MAX_SEARCH_DISTANCE: f64 = 500.0;
pub const ALIGNMENT_THRESHOLD: f64 = 8.0;
pub const GUIDE_OVERHANG: f64 = 20.0;

pub const CANVAS_WIDTH: f64 = 1240.0;
pub const CANVAS_HEIGHT: f64 = 1754.0;
const CANVAS_MARGIN: f64 = 50.0;
const ELEMENT_GAP: f64 = 20.0;
const MIN_WIDTH: f64 = 400.0;
const MIN_HEIGHT: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn left(&self) -> f64 {
        self.position.x
    }

    pub fn right(&self) -> f64 {
        self.position.x + self.size.width
    }

    pub fn top(&self) -> f64 {
        self.position.y
    }

    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }

    pub fn center_x(&self) -> f64 {
        self.position.x + self.size.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.position.y + self.size.height / 2.0
    }

    /// Open-interval intersection: rectangles sharing only an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A guide line drawn while dragging. `position` is the x of a vertical
/// line or the y of a horizontal one; `start`/`end` span the other axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentLine {
    #[serde(rename = "type")]
    pub orientation: Orientation,
    pub position: f64,
    pub start: f64,
    pub end: f64,
}

/// Nearest grid line, halves rounding towards positive infinity
pub fn snap_to_grid(value: f64) -> f64 {
    (value / GRID_SIZE + 0.5).floor() * GRID_SIZE
}

fn collides(position: Point, size: Size, obstacles: &[Rect]) -> bool {
    let candidate = Rect { position, size };
    obstacles.iter().any(|o| candidate.overlaps(o))
}

/// Grid-snapped position closest to `desired` where an element of `size`
/// overlaps none of `obstacles`.
///
/// Candidates move outward one grid step at a time, trying right, down,
/// left and up at each distance. When nothing within the search radius is
/// free the element goes below the lowest obstacle.
pub fn find_free_position(desired: Point, size: Size, obstacles: &[Rect]) -> Point {
    let origin = Point::new(snap_to_grid(desired.x), snap_to_grid(desired.y));
    if !collides(origin, size, obstacles) {
        return origin;
    }

    let mut distance = GRID_SIZE;
    while distance < MAX_SEARCH_DISTANCE {
        let candidates = [
            Point::new(origin.x + distance, origin.y),
            Point::new(origin.x, origin.y + distance),
            Point::new((origin.x - distance).max(0.0), origin.y),
            Point::new(origin.x, (origin.y - distance).max(0.0)),
        ];
        if let Some(free) = candidates
            .into_iter()
            .find(|candidate| !collides(*candidate, size, obstacles))
        {
            return Point::new(snap_to_grid(free.x), snap_to_grid(free.y));
        }
        distance += GRID_SIZE;
    }

    let lowest = obstacles.iter().map(Rect::bottom).fold(0.0, f64::max);
    Point::new(origin.x, snap_to_grid(lowest + GRID_SIZE))
}

/// Guides for every edge or centre of `dragged` within the alignment
/// threshold of the matching edge or centre of an obstacle.
///
/// Opposite edges also align, so an element can be butted against another.
/// Each line spans both rectangles plus a fixed overhang.
pub fn alignment_guides(dragged: &Rect, obstacles: &[Rect]) -> Vec<AlignmentLine> {
    let mut lines = vec![];
    for other in obstacles {
        let vertical_span = (
            dragged.top().min(other.top()) - GUIDE_OVERHANG,
            dragged.bottom().max(other.bottom()) + GUIDE_OVERHANG,
        );
        let vertical = [
            (dragged.left(), other.left()),
            (dragged.right(), other.right()),
            (dragged.center_x(), other.center_x()),
            (dragged.left(), other.right()),
            (dragged.right(), other.left()),
        ];
        push_guides(&mut lines, Orientation::Vertical, &vertical, vertical_span);

        let horizontal_span = (
            dragged.left().min(other.left()) - GUIDE_OVERHANG,
            dragged.right().max(other.right()) + GUIDE_OVERHANG,
        );
        let horizontal = [
            (dragged.top(), other.top()),
            (dragged.bottom(), other.bottom()),
            (dragged.center_y(), other.center_y()),
            (dragged.top(), other.bottom()),
            (dragged.bottom(), other.top()),
        ];
        push_guides(&mut lines, Orientation::Horizontal, &horizontal, horizontal_span);
    }
    lines
}

fn push_guides(
    lines: &mut Vec<AlignmentLine>,
    orientation: Orientation,
    pairs: &[(f64, f64)],
    (start, end): (f64, f64),
) {
    for &(dragged, target) in pairs {
        if (dragged - target).abs() < ALIGNMENT_THRESHOLD {
            lines.push(AlignmentLine {
                orientation,
                position: target,
                start,
                end,
            });
        }
    }
}

/// Largest grid-snapped size an element at `position` can take before
/// running into the canvas margin or the next element to its right or
/// below, never smaller than the minimum visual size.
pub fn available_space(position: Point, obstacles: &[Rect], canvas: Size) -> Size {
    let mut max_width = canvas.width - position.x - CANVAS_MARGIN;
    let mut max_height = canvas.height - position.y - CANVAS_MARGIN;

    for other in obstacles {
        if other.left() > position.x
            && other.top() < position.y + max_height
            && other.bottom() > position.y
        {
            max_width = max_width.min(other.left() - position.x - ELEMENT_GAP);
        }
        if other.top() > position.y
            && other.left() < position.x + max_width
            && other.right() > position.x
        {
            max_height = max_height.min(other.top() - position.y - ELEMENT_GAP);
        }
    }

    Size::new(
        snap_to_grid(max_width).max(MIN_WIDTH),
        snap_to_grid(max_height).max(MIN_HEIGHT),
    )
}

/// The fixed A4-proportioned canvas
pub fn canvas_size() -> Size {
    Size::new(CANVAS_WIDTH, CANVAS_HEIGHT)
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case::exact(32.0, 32.0)]
    #[case::down(39.9, 32.0)]
    #[case::half_up(40.0, 48.0)]
    #[case::negative_half(-8.0, 0.0)]
    fn test_snap_to_grid(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(snap_to_grid(value), expected);
    }

    #[rstest]
    #[case::touching_edges(Rect::new(100.0, 0.0, 100.0, 100.0), false)]
    #[case::touching_corner(Rect::new(100.0, 100.0, 50.0, 50.0), false)]
    #[case::inside(Rect::new(10.0, 10.0, 10.0, 10.0), true)]
    #[case::partial(Rect::new(90.0, 90.0, 50.0, 50.0), true)]
    #[case::apart(Rect::new(300.0, 300.0, 10.0, 10.0), false)]
    fn test_overlaps(#[case] other: Rect, #[case] expected: bool) {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(rect.overlaps(&other), expected);
        assert_eq!(other.overlaps(&rect), expected);
    }

    #[test]
    fn test_free_spot_is_only_snapped() {
        let obstacles = [Rect::new(500.0, 500.0, 100.0, 100.0)];
        let position = find_free_position(Point::new(21.0, 35.0), Size::new(100.0, 100.0), &obstacles);
        assert_eq!(position, Point::new(16.0, 32.0));
    }

    #[test]
    fn test_search_prefers_right() {
        // right and down both clear at 112px; right is tried first
        let obstacles = [Rect::new(0.0, 0.0, 100.0, 100.0)];
        let position = find_free_position(Point::new(0.0, 0.0), Size::new(100.0, 100.0), &obstacles);
        assert_eq!(position, Point::new(112.0, 0.0));
    }

    #[test]
    fn test_search_goes_down_when_right_is_blocked() {
        // a wide obstacle pushes the right-hand candidate past the down one
        let obstacles = [Rect::new(0.0, 0.0, 1000.0, 48.0)];
        let position = find_free_position(Point::new(0.0, 0.0), Size::new(100.0, 100.0), &obstacles);
        assert_eq!(position, Point::new(0.0, 48.0));
    }

    #[test]
    fn test_fallback_below_lowest_obstacle() {
        let obstacles = [
            Rect::new(0.0, 0.0, 2000.0, 1000.0),
            Rect::new(0.0, 1000.0, 100.0, 210.0),
        ];
        let position = find_free_position(Point::new(100.0, 100.0), Size::new(100.0, 100.0), &obstacles);
        assert_eq!(position, Point::new(96.0, 1232.0));
    }

    #[test]
    fn test_result_never_overlaps_when_searched() {
        let obstacles = [
            Rect::new(0.0, 0.0, 400.0, 300.0),
            Rect::new(416.0, 0.0, 400.0, 300.0),
        ];
        let size = Size::new(400.0, 300.0);
        let position = find_free_position(Point::new(200.0, 100.0), size, &obstacles);
        assert!(!collides(position, size, &obstacles));
        assert_eq!(position.x % GRID_SIZE, 0.0);
        assert_eq!(position.y % GRID_SIZE, 0.0);
    }

    #[test]
    fn test_alignment_guides_on_matching_edges() {
        let other = Rect::new(100.0, 100.0, 200.0, 100.0);
        let dragged = Rect::new(104.0, 400.0, 50.0, 50.0);
        let lines = alignment_guides(&dragged, &[other]);

        assert_eq!(
            lines,
            vec![AlignmentLine {
                orientation: Orientation::Vertical,
                position: 100.0,
                start: 80.0,
                end: 470.0,
            }]
        );
    }

    #[test]
    fn test_alignment_guides_for_adjacent_edges() {
        let other = Rect::new(0.0, 0.0, 100.0, 100.0);
        // left edge sits 5px right of the other's right edge, tops match
        let dragged = Rect::new(105.0, 0.0, 100.0, 100.0);
        let lines = alignment_guides(&dragged, &[other]);

        let vertical: Vec<f64> = lines
            .iter()
            .filter(|l| l.orientation == Orientation::Vertical)
            .map(|l| l.position)
            .collect();
        assert_eq!(vertical, vec![100.0]);

        // top, bottom and centre all match
        let horizontal: Vec<f64> = lines
            .iter()
            .filter(|l| l.orientation == Orientation::Horizontal)
            .map(|l| l.position)
            .collect();
        assert_eq!(horizontal, vec![0.0, 100.0, 50.0]);
        assert!(lines
            .iter()
            .filter(|l| l.orientation == Orientation::Horizontal)
            .all(|l| l.start == -20.0 && l.end == 225.0));
    }

    #[test]
    fn test_no_guides_outside_threshold() {
        let other = Rect::new(0.0, 0.0, 100.0, 100.0);
        let dragged = Rect::new(300.0, 300.0, 40.0, 40.0);
        assert!(alignment_guides(&dragged, &[other]).is_empty());
    }

    #[test]
    fn test_available_space_on_empty_canvas() {
        let size = available_space(Point::new(50.0, 50.0), &[], canvas_size());
        assert_eq!(size, Size::new(1136.0, 1648.0));
    }

    #[test]
    fn test_available_space_stops_before_neighbours() {
        let obstacles = [
            Rect::new(700.0, 0.0, 300.0, 300.0),
            Rect::new(0.0, 600.0, 300.0, 300.0),
        ];
        let size = available_space(Point::new(50.0, 50.0), &obstacles, canvas_size());
        assert_eq!(size, Size::new(624.0, 528.0));
    }

    #[test]
    fn test_available_space_has_a_floor() {
        let obstacles = [Rect::new(100.0, 0.0, 300.0, 300.0)];
        let size = available_space(Point::new(50.0, 50.0), &obstacles, canvas_size());
        assert_eq!(size.width, 400.0);
    }
}
