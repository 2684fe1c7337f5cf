use crate::Coordinate;

/// WGS-84 semi-major axis, in meters.
const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS-84 semi-minor axis, in meters.
const WGS84_B: f64 = (1.0 - WGS84_F) * WGS84_A;

/// Mean earth radius used by the great-circle fallback, in meters.
const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

const VINCENTY_MAX_ITERATIONS: usize = 200;
const VINCENTY_TOLERANCE: f64 = 1e-12;

/// Geodesic distance in meters between two coordinates on the WGS-84 ellipsoid.
///
/// Uses Vincenty's inverse formula. Nearly antipodal points can make the iteration diverge, in
/// which case the great-circle distance is returned instead.
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
	vincenty_distance(a, b).unwrap_or_else(|| haversine_distance(a, b))
}

/// Great-circle distance in meters on a sphere of the mean earth radius.
#[must_use]
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
	let phi_1 = a.latitude.to_radians();
	let phi_2 = b.latitude.to_radians();
	let delta_phi = (b.latitude - a.latitude).to_radians();
	let delta_lambda = (b.longitude - a.longitude).to_radians();

	let h = (delta_phi / 2.0).sin().powi(2)
		+ phi_1.cos() * phi_2.cos() * (delta_lambda / 2.0).sin().powi(2);

	2.0 * MEAN_EARTH_RADIUS * h.sqrt().min(1.0).asin()
}

#[allow(clippy::many_single_char_names, clippy::similar_names)]
fn vincenty_distance(a: Coordinate, b: Coordinate) -> Option<f64> {
	let l = (b.longitude - a.longitude).to_radians();
	let u_1 = ((1.0 - WGS84_F) * a.latitude.to_radians().tan()).atan();
	let u_2 = ((1.0 - WGS84_F) * b.latitude.to_radians().tan()).atan();
	let (sin_u1, cos_u1) = u_1.sin_cos();
	let (sin_u2, cos_u2) = u_2.sin_cos();

	let mut lambda = l;

	for _ in 0..VINCENTY_MAX_ITERATIONS {
		let (sin_lambda, cos_lambda) = lambda.sin_cos();

		let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
			+ (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
		.sqrt();

		if sin_sigma == 0.0 {
			// Coincident points
			return Some(0.0);
		}

		let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
		let sigma = sin_sigma.atan2(cos_sigma);
		let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
		let cos_sq_alpha = 1.0 - sin_alpha.powi(2);

		// Equatorial lines have cos_sq_alpha == 0
		let cos_2sigma_m = if cos_sq_alpha == 0.0 {
			0.0
		} else {
			cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
		};

		let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));

		let previous = lambda;
		lambda = l
			+ (1.0 - c)
				* WGS84_F * sin_alpha
				* (sigma
					+ c * sin_sigma
						* (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

		if (lambda - previous).abs() < VINCENTY_TOLERANCE {
			let u_sq = cos_sq_alpha * (WGS84_A.powi(2) - WGS84_B.powi(2)) / WGS84_B.powi(2);
			let big_a =
				1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
			let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

			let delta_sigma = big_b
				* sin_sigma * (cos_2sigma_m
				+ big_b / 4.0
					* (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
						- big_b / 6.0
							* cos_2sigma_m * (-3.0 + 4.0 * sin_sigma.powi(2))
							* (-3.0 + 4.0 * cos_2sigma_m.powi(2))));

			return Some(WGS84_B * big_a * (sigma - delta_sigma));
		}
	}

	None
}

#[cfg(test)]
mod tests {
	use super::*;

	fn coord(latitude: f64, longitude: f64) -> Coordinate {
		Coordinate {
			latitude,
			longitude,
		}
	}

	#[test]
	fn same_point_is_zero() {
		let c = coord(40.0, -74.0);
		assert!(distance(c, c).abs() < f64::EPSILON);
	}

	#[test]
	fn one_thousandth_of_a_degree_of_latitude() {
		// One degree of latitude at 40N is ~111_035 meters on WGS-84
		let d = distance(coord(40.0, -74.0), coord(40.001, -74.0));
		assert!((110.9..111.2).contains(&d), "got {d}");
	}

	#[test]
	fn symmetric() {
		let pairs = [
			(coord(40.0, -74.0), coord(40.001_3, -73.998_7)),
			(coord(-33.86, 151.2), coord(-33.861, 151.201_5)),
			(coord(0.0, 0.0), coord(0.0, 0.000_9)),
			(coord(51.5, -0.12), coord(48.85, 2.35)),
		];

		for (a, b) in pairs {
			assert!((distance(a, b) - distance(b, a)).abs() < 1e-6);
		}
	}

	#[test]
	fn triangle_inequality() {
		let a = coord(40.0, -74.0);
		let b = coord(40.000_5, -74.000_3);
		let c = coord(39.999_4, -73.999_1);

		assert!(distance(a, c) <= distance(a, b) + distance(b, c) + 1e-6);
		assert!(distance(a, b) <= distance(a, c) + distance(c, b) + 1e-6);
		assert!(distance(b, c) <= distance(b, a) + distance(a, c) + 1e-6);
	}

	#[test]
	fn close_to_great_circle_at_short_range() {
		let a = coord(40.0, -74.0);
		let b = coord(40.000_7, -74.000_8);
		let relative = (distance(a, b) - haversine_distance(a, b)).abs() / distance(a, b);
		assert!(relative < 0.005, "relative difference {relative}");
	}

	#[test]
	fn antipodal_points_fall_back_to_great_circle() {
		let d = distance(coord(0.0, 0.0), coord(0.5, 179.7));
		assert!(d.is_finite());
		assert!(d > 19_000_000.0);
	}
}
