use crate::{distance, Coordinate};

/// Whether `point` lies at most `max_radius` meters from `center`.
#[must_use]
pub fn is_within_radius(center: Coordinate, point: Coordinate, max_radius: f64) -> bool {
	distance(center, point) <= max_radius
}

const CLAMP_TOLERANCE_METERS: f64 = 0.01;
const MAX_CLAMP_ITERATIONS: usize = 64;

/// Pulls `point` back onto the circle of `max_radius` meters around `center`.
///
/// Points already inside the circle are returned unchanged. Points outside are moved along the
/// straight lat/lon segment toward `center`. The linear guess `max_radius / distance` is exact
/// enough for nearby points; far or polar targets are bisected along the same segment until the
/// result sits within a centimeter inside the circle.
#[must_use]
pub fn clamp_to_radius(center: Coordinate, point: Coordinate, max_radius: f64) -> Coordinate {
	let full = distance(center, point);
	if full <= max_radius {
		return point;
	}

	let delta_latitude = point.latitude - center.latitude;
	// Take the short way around the antimeridian
	let delta_longitude = wrap_longitude(point.longitude - center.longitude);

	let along = |ratio: f64| Coordinate {
		latitude: delta_latitude.mul_add(ratio, center.latitude),
		longitude: wrap_longitude(delta_longitude.mul_add(ratio, center.longitude)),
	};

	let guess = max_radius / full;
	let guessed = along(guess);
	let guessed_distance = distance(center, guessed);
	if guessed_distance <= max_radius && max_radius - guessed_distance <= CLAMP_TOLERANCE_METERS {
		return guessed;
	}

	// `low` stays inside the circle, `high` outside
	let (mut low, mut high) = if guessed_distance <= max_radius {
		(guess, 1.0)
	} else {
		(0.0, guess)
	};

	for _ in 0..MAX_CLAMP_ITERATIONS {
		let middle = (low + high) / 2.0;
		let d = distance(center, along(middle));

		if d <= max_radius {
			low = middle;
			if max_radius - d <= CLAMP_TOLERANCE_METERS {
				break;
			}
		} else {
			high = middle;
		}
	}

	along(low)
}

fn wrap_longitude(longitude: f64) -> f64 {
	if (-180.0..=180.0).contains(&longitude) {
		longitude
	} else {
		(longitude + 180.0).rem_euclid(360.0) - 180.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MAX_RADIUS: f64 = 100.0;
	const EPSILON: f64 = 0.5;

	fn coord(latitude: f64, longitude: f64) -> Coordinate {
		Coordinate {
			latitude,
			longitude,
		}
	}

	#[test]
	fn candidate_150_meters_away_is_outside_the_radius() {
		let center = coord(40.0, -74.0);
		// ~150 meters due north
		let candidate = coord(40.001_351, -74.0);

		let d = distance(center, candidate);
		assert!((149.0..151.0).contains(&d), "got {d}");
		assert!(!is_within_radius(center, candidate, MAX_RADIUS));
	}

	#[test]
	fn points_inside_are_untouched() {
		let center = coord(40.0, -74.0);
		let point = coord(40.000_4, -74.000_3);

		assert!(is_within_radius(center, point, MAX_RADIUS));
		assert_eq!(clamp_to_radius(center, point, MAX_RADIUS), point);
	}

	#[test]
	fn clamped_points_land_on_the_circle() {
		let centers = [coord(40.0, -74.0), coord(-33.86, 151.2), coord(64.13, -21.9)];

		for center in centers {
			for step in -8..=8 {
				for other in [-1.0, 1.0] {
					let offset = f64::from(step) * 0.002;
					let point = coord(center.latitude + offset, center.longitude + other * 0.01);

					let clamped = clamp_to_radius(center, point, MAX_RADIUS);
					let d = distance(center, clamped);

					assert!(d <= MAX_RADIUS + EPSILON, "{center} -> {point}: {d}");
					if distance(center, point) > MAX_RADIUS {
						assert!(d >= MAX_RADIUS - EPSILON, "{center} -> {point}: {d}");
					}
				}
			}
		}
	}

	#[test]
	fn clamping_is_deterministic_and_keeps_direction() {
		let center = coord(40.0, -74.0);
		let point = coord(40.01, -73.99);

		let first = clamp_to_radius(center, point, MAX_RADIUS);
		let second = clamp_to_radius(center, point, MAX_RADIUS);
		assert_eq!(first, second);

		assert!(first.latitude > center.latitude && first.latitude < point.latitude);
		assert!(first.longitude > center.longitude && first.longitude < point.longitude);
	}

	#[test]
	fn clamping_across_the_antimeridian() {
		let center = coord(0.0, 179.999_5);
		let point = coord(0.0, -179.99);

		let clamped = clamp_to_radius(center, point, MAX_RADIUS);
		assert!((distance(center, clamped) - MAX_RADIUS).abs() <= EPSILON);
	}

	#[test]
	fn far_targets_land_on_the_circle() {
		let cases = [
			(coord(60.0, 0.0), coord(60.0, 170.0)),
			(coord(10.0, 10.0), coord(-40.0, -100.0)),
			(coord(-33.86, 151.2), coord(51.5, -0.12)),
			(coord(40.0, -74.0), coord(41.0, -73.0)),
			(coord(0.0, 179.9), coord(5.0, -170.0)),
		];

		for (center, point) in cases {
			let clamped = clamp_to_radius(center, point, MAX_RADIUS);
			let d = distance(center, clamped);

			assert!(d <= MAX_RADIUS + EPSILON, "{center} -> {point}: {d}");
			assert!(d >= MAX_RADIUS - EPSILON, "{center} -> {point}: {d}");
		}
	}

	#[test]
	fn clamping_near_the_poles() {
		let cases = [
			(coord(89.9, 0.0), coord(89.9, 180.0)),
			(coord(89.95, 45.0), coord(0.0, 45.0)),
			(coord(-89.95, 30.0), coord(-80.0, -150.0)),
			(coord(-89.99, -120.0), coord(-89.9, 60.0)),
		];

		for (center, point) in cases {
			let clamped = clamp_to_radius(center, point, MAX_RADIUS);
			let d = distance(center, clamped);

			assert!((-90.0..=90.0).contains(&clamped.latitude), "{clamped}");
			assert!((-180.0..=180.0).contains(&clamped.longitude), "{clamped}");
			assert!(d <= MAX_RADIUS + EPSILON, "{center} -> {point}: {d}");
			assert!(d >= MAX_RADIUS - EPSILON, "{center} -> {point}: {d}");
		}
	}

	#[test]
	fn clamping_holds_at_every_scale() {
		let centers = [
			coord(40.0, -74.0),
			coord(-33.86, 151.2),
			coord(64.13, -21.9),
			coord(89.5, 10.0),
			coord(-89.5, -170.0),
		];
		let bearings = [
			(1.0, 0.0),
			(1.0, 1.0),
			(0.0, 1.0),
			(-1.0, 1.0),
			(-1.0, 0.0),
			(-1.0, -1.0),
			(0.0, -1.0),
			(1.0, -1.0),
		];

		for center in centers {
			for scale in [0.01, 0.5, 5.0, 40.0] {
				for (north, east) in bearings {
					let point = coord(
						(center.latitude + north * scale).clamp(-90.0, 90.0),
						wrap_longitude(center.longitude + east * scale),
					);
					if distance(center, point) <= MAX_RADIUS {
						continue;
					}

					let clamped = clamp_to_radius(center, point, MAX_RADIUS);
					let d = distance(center, clamped);

					assert!(d <= MAX_RADIUS + EPSILON, "{center} -> {point}: {d}");
					assert!(d >= MAX_RADIUS - EPSILON, "{center} -> {point}: {d}");
				}
			}
		}
	}
}
