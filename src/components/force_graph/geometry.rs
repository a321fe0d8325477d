//! Plain-math helpers for edge trimming, arrowheads and hit-testing.

/// Point on the circle of radius `r` around `center`, along the direction
/// from `center` toward `toward`. Degenerate (coincident) inputs return the
/// center itself so callers can skip the segment.
pub fn circle_intersection(
	center: (f64, f64),
	toward: (f64, f64),
	r: f64,
) -> (f64, f64) {
	let (dx, dy) = (toward.0 - center.0, toward.1 - center.1);
	let length = (dx * dx + dy * dy).sqrt();
	if length < f64::EPSILON {
		return center;
	}
	(center.0 + dx / length * r, center.1 + dy / length * r)
}

/// The two base points of an arrowhead triangle whose tip sits at `tip`,
/// pointing along `angle`, with sides swept back by `spread` on either side.
pub fn arrowhead_base(
	tip: (f64, f64),
	angle: f64,
	length: f64,
	spread: f64,
) -> [(f64, f64); 2] {
	[
		(
			tip.0 - length * (angle - spread).cos(),
			tip.1 - length * (angle - spread).sin(),
		),
		(
			tip.0 - length * (angle + spread).cos(),
			tip.1 - length * (angle + spread).sin(),
		),
	]
}

pub fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
	((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

/// Distance from point `p` to the segment `a`-`b`. Used for edge hover
/// hit-testing in graph space.
pub fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (abx, aby) = (b.0 - a.0, b.1 - a.1);
	let len_sq = abx * abx + aby * aby;
	if len_sq < f64::EPSILON {
		return ((p.0 - a.0).powi(2) + (p.1 - a.1).powi(2)).sqrt();
	}
	let t = (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0);
	let (cx, cy) = (a.0 + t * abx, a.1 + t * aby);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}
