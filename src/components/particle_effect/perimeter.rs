//! Weighted rounded-rectangle outline for perimeter spawning.
//!
//! The outline is walked clockwise starting at the top edge: top, top-right
//! arc, right, bottom-right arc, bottom, bottom-left arc, left, top-left arc.
//! Corner arcs count `corner_weight` times their length so a uniform position
//! along the weighted walk concentrates spawns at the corners.

use std::f64::consts::{FRAC_PI_2, PI};

use rand::Rng;

use super::config::PerimeterStyle;
use super::types::{Direction, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Segment {
	Top,
	TopRight,
	Right,
	BottomRight,
	Bottom,
	BottomLeft,
	Left,
	TopLeft,
}

const WALK: [Segment; 8] = [
	Segment::Top,
	Segment::TopRight,
	Segment::Right,
	Segment::BottomRight,
	Segment::Bottom,
	Segment::BottomLeft,
	Segment::Left,
	Segment::TopLeft,
];

impl Segment {
	fn is_corner(self) -> bool {
		matches!(
			self,
			Segment::TopRight | Segment::BottomRight | Segment::BottomLeft | Segment::TopLeft
		)
	}
}

/// A point on the outline, in the same coordinate space as the source rect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerimeterPoint {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Drift direction away from the outline.
	pub direction: Direction,
}

/// Outline geometry of one target rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedPerimeter {
	rect: Rect,
	radius: f64,
	horizontal_edge: f64,
	vertical_edge: f64,
	arc: f64,
	corner_weight: f64,
	top_inset: f64,
	bottom_inset: f64,
}

impl RoundedPerimeter {
	/// Builds the outline for `rect`; the corner radius follows its height.
	pub fn new(rect: Rect, style: &PerimeterStyle) -> Self {
		let radius = (rect.height * style.corner_radius_ratio).max(0.0);
		Self {
			rect,
			radius,
			horizontal_edge: (rect.width - 2.0 * radius).max(0.0),
			vertical_edge: (rect.height - 2.0 * radius).max(0.0),
			arc: FRAC_PI_2 * radius,
			corner_weight: style.corner_weight.max(0.0),
			top_inset: style.top_inset,
			bottom_inset: style.bottom_inset,
		}
	}

	/// Corner radius in source pixels.
	pub fn corner_radius(&self) -> f64 {
		self.radius
	}

	/// Length of one quarter-circle corner arc.
	pub fn corner_arc_length(&self) -> f64 {
		self.arc
	}

	fn weight(&self, segment: Segment) -> f64 {
		match segment {
			Segment::Top | Segment::Bottom => self.horizontal_edge,
			Segment::Left | Segment::Right => self.vertical_edge,
			_ => self.arc * self.corner_weight,
		}
	}

	/// Sum of edge lengths plus weighted corner arcs.
	pub fn total_weight(&self) -> f64 {
		WALK.iter().map(|&s| self.weight(s)).sum()
	}

	/// Expected fraction of spawns landing on a corner arc.
	pub fn corner_share(&self) -> f64 {
		let total = self.total_weight();
		if total > 0.0 {
			4.0 * self.arc * self.corner_weight / total
		} else {
			0.0
		}
	}

	/// Maps a position along the weighted walk, `0..total_weight()`, to a
	/// point and drift direction. Returns `None` for a degenerate outline.
	pub fn point_at(&self, position: f64) -> Option<PerimeterPoint> {
		let total = self.total_weight();
		if total.is_nan() || total <= 0.0 {
			return None;
		}
		let mut remaining = position.clamp(0.0, total);
		let mut last = None;
		for segment in WALK {
			let weight = self.weight(segment);
			if weight <= 0.0 {
				continue;
			}
			if remaining < weight {
				return Some(self.point_on(segment, remaining / weight));
			}
			remaining -= weight;
			last = Some(segment);
		}
		// position == total lands on the far end of the last non-empty segment
		last.map(|segment| self.point_on(segment, 1.0))
	}

	/// Draws a uniformly random point along the weighted walk.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PerimeterPoint> {
		let total = self.total_weight();
		if total.is_nan() || total <= 0.0 {
			return None;
		}
		self.point_at(rng.gen_range(0.0..total))
	}

	/// `t` is the fraction travelled along `segment` in walk order. Weighting
	/// only stretches the walk, so the fraction already maps onto the real
	/// arc length.
	fn point_on(&self, segment: Segment, t: f64) -> PerimeterPoint {
		let Rect {
			left, top, height, ..
		} = self.rect;
		let (right, bottom) = (self.rect.right(), self.rect.bottom());
		let r = self.radius;

		if segment.is_corner() {
			// Corner angles are measured y-up, hence the minus on sin.
			let sweep = t * FRAC_PI_2;
			let (cx, cy, angle) = match segment {
				Segment::TopRight => (right - r, top + r, FRAC_PI_2 - sweep),
				Segment::BottomRight => (right - r, bottom - r, -sweep),
				Segment::BottomLeft => (left + r, bottom - r, 3.0 * FRAC_PI_2 - sweep),
				_ => (left + r, top + r, PI - sweep),
			};
			return PerimeterPoint {
				x: cx + angle.cos() * r,
				y: cy - angle.sin() * r,
				direction: Direction::Corner(angle),
			};
		}

		match segment {
			Segment::Top => PerimeterPoint {
				x: left + r + t * self.horizontal_edge,
				y: top + height * self.top_inset,
				direction: Direction::Up,
			},
			Segment::Right => PerimeterPoint {
				x: right,
				y: top + r + t * self.vertical_edge,
				direction: Direction::Right,
			},
			Segment::Bottom => PerimeterPoint {
				x: right - r - t * self.horizontal_edge,
				y: top + height * self.bottom_inset,
				direction: Direction::Down,
			},
			_ => PerimeterPoint {
				x: left,
				y: bottom - r - t * self.vertical_edge,
				direction: Direction::Left,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn perimeter() -> RoundedPerimeter {
		RoundedPerimeter::new(Rect::new(100.0, 200.0, 400.0, 100.0), &PerimeterStyle::default())
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn weighted_lengths() {
		let p = perimeter();
		assert!(close(p.corner_radius(), 15.0));
		assert!(close(p.corner_arc_length(), FRAC_PI_2 * 15.0));
		let edges = 2.0 * 370.0 + 2.0 * 70.0;
		assert!(close(p.total_weight(), edges + 8.0 * FRAC_PI_2 * 15.0));
	}

	#[test]
	fn walk_starts_on_top_edge() {
		let point = perimeter().point_at(0.0).unwrap();
		assert_eq!(point.direction, Direction::Up);
		assert!(close(point.x, 115.0));
		assert!(close(point.y, 225.0));
	}

	#[test]
	fn corner_points_lie_on_their_arc() {
		let p = perimeter();
		// start of the top-right arc is the top of the circle
		let start = p.point_at(370.0).unwrap();
		assert!(matches!(start.direction, Direction::Corner(a) if close(a, FRAC_PI_2)));
		assert!(close(start.x, 485.0));
		assert!(close(start.y, 200.0));

		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..500 {
			let point = p.sample(&mut rng).unwrap();
			if let Direction::Corner(angle) = point.direction {
				let cx = if angle.cos() >= 0.0 { 485.0 } else { 115.0 };
				let cy = if angle.sin() >= 0.0 { 215.0 } else { 285.0 };
				let r = ((point.x - cx).powi(2) + (point.y - cy).powi(2)).sqrt();
				assert!((r - 15.0).abs() < 1e-6, "corner point off arc: {point:?}");
			}
		}
	}

	#[test]
	fn corner_normals_point_away_from_the_box() {
		let p = perimeter();
		let mut rng = StdRng::seed_from_u64(11);
		for _ in 0..500 {
			let point = p.sample(&mut rng).unwrap();
			if let Direction::Corner(angle) = point.direction {
				// drift is (cos, -sin) in canvas space
				let (dx, dy) = (angle.cos(), -angle.sin());
				let outward_x = if point.x > 300.0 { dx >= -1e-9 } else { dx <= 1e-9 };
				let outward_y = if point.y > 250.0 { dy >= -1e-9 } else { dy <= 1e-9 };
				assert!(outward_x && outward_y, "inward normal at {point:?}");
			}
		}
	}

	#[test]
	fn end_of_walk_is_end_of_top_left_arc() {
		let p = perimeter();
		let end = p.point_at(p.total_weight()).unwrap();
		assert!(matches!(end.direction, Direction::Corner(a) if close(a, FRAC_PI_2)));
		assert!(close(end.x, 115.0));
		assert!(close(end.y, 200.0));
	}

	#[test]
	fn degenerate_rect_yields_nothing() {
		let p = RoundedPerimeter::new(Rect::default(), &PerimeterStyle::default());
		assert_eq!(p.total_weight(), 0.0);
		assert!(p.point_at(0.0).is_none());
		assert_eq!(p.corner_share(), 0.0);
	}
}
