use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A point or vector in scene coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y).sqrt()
	}

	pub fn distance(self, other: Point) -> f64 {
		(self - other).length()
	}

	pub fn dot(self, other: Point) -> f64 {
		self.x * other.x + self.y * other.y
	}

	/// Unit vector in the same direction, or zero for the zero vector.
	pub fn normalized(self) -> Point {
		let len = self.length();
		if len > 0.0 { self / len } else { Point::ZERO }
	}
}

impl Add for Point {
	type Output = Point;
	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Point {
	fn add_assign(&mut self, rhs: Point) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl Sub for Point {
	type Output = Point;
	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl SubAssign for Point {
	fn sub_assign(&mut self, rhs: Point) {
		self.x -= rhs.x;
		self.y -= rhs.y;
	}
}

impl Mul<f64> for Point {
	type Output = Point;
	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

impl Div<f64> for Point {
	type Output = Point;
	fn div(self, rhs: f64) -> Point {
		Point::new(self.x / rhs, self.y / rhs)
	}
}

impl Neg for Point {
	type Output = Point;
	fn neg(self) -> Point {
		Point::new(-self.x, -self.y)
	}
}

/// Distance from `p` to the segment `a`-`b`. Projections outside the segment
/// clamp to the nearest endpoint; a degenerate segment is treated as point `a`.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
	let (ap, ab) = (p - a, b - a);
	let len_sq = ab.dot(ab);
	let t = if len_sq != 0.0 { ap.dot(ab) / len_sq } else { -1.0 };

	let nearest = if t < 0.0 {
		a
	} else if t > 1.0 {
		b
	} else {
		a + ab * t
	};
	p.distance(nearest)
}

pub fn circle_contains(center: Point, radius: f64, p: Point) -> bool {
	center.distance(p) <= radius
}
