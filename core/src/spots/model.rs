use ph_geo::Coordinate;
use ph_images::SanitizedPhoto;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned spot identifier. Empty only on a spot that was never admitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(String);

impl SpotId {
	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for SpotId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<String> for SpotId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl From<&str> for SpotId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

/// A parking spot somebody marked as available.
///
/// Serialized with the field names the shared collection has always used, so records written by
/// older clients keep decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
	#[serde(default)]
	pub id: SpotId,
	pub latitude: f64,
	pub longitude: f64,
	#[serde(rename = "addedBy")]
	pub owner_id: String,
	/// Epoch milliseconds
	#[serde(rename = "addedAt")]
	pub created_at: i64,
	#[serde(default)]
	pub description: String,
	#[serde(rename = "imageBase64", default, with = "image_base64")]
	pub image_data: Option<Vec<u8>>,
	#[serde(default)]
	pub image_redacted: bool,
}

impl Spot {
	#[must_use]
	pub const fn has_image(&self) -> bool {
		self.image_data.is_some()
	}

	pub fn coordinate(&self) -> Result<Coordinate, ph_geo::Error> {
		Coordinate::new(self.latitude, self.longitude)
	}

	/// Human readable age, like "5 min ago".
	#[must_use]
	pub fn time_ago(&self, now: i64) -> String {
		let minutes = now.saturating_sub(self.created_at) / (1000 * 60);
		let hours = minutes / 60;
		let days = hours / 24;

		if minutes < 1 {
			"Just now".to_string()
		} else if minutes < 60 {
			format!("{minutes} min ago")
		} else if hours < 24 {
			format!("{hours} hours ago")
		} else {
			format!("{days} days ago")
		}
	}
}

/// Everything a proposer supplies, the store fills in identity and creation time.
#[derive(Debug, Clone)]
pub struct NewSpot {
	pub coordinate: Coordinate,
	pub owner_id: String,
	pub description: String,
	pub photo: Option<SanitizedPhoto>,
}

impl NewSpot {
	#[must_use]
	pub fn new(coordinate: Coordinate, owner_id: impl Into<String>) -> Self {
		Self {
			coordinate,
			owner_id: owner_id.into(),
			description: String::new(),
			photo: None,
		}
	}

	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	#[must_use]
	pub fn with_photo(mut self, photo: SanitizedPhoto) -> Self {
		self.photo = Some(photo);
		self
	}

	pub(crate) fn into_spot(self, id: SpotId, created_at: i64) -> Spot {
		let (image_data, image_redacted) = self
			.photo
			.map_or((None, false), |photo| (Some(photo.bytes), photo.applied));

		Spot {
			id,
			latitude: self.coordinate.latitude,
			longitude: self.coordinate.longitude,
			owner_id: self.owner_id,
			created_at,
			description: self.description,
			image_data,
			image_redacted,
		}
	}
}

/// Images travel as a base64 string, empty when there is no image.
mod image_base64 {
	use base64::{engine::general_purpose::STANDARD, Engine};
	use serde::{de::Error, Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(
		data: &Option<Vec<u8>>,
		serializer: S,
	) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(
			&data
				.as_deref()
				.map(|bytes| STANDARD.encode(bytes))
				.unwrap_or_default(),
		)
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<Option<Vec<u8>>, D::Error> {
		let encoded = String::deserialize(deserializer)?;
		// Some clients wrap base64 output at 76 columns
		let encoded = encoded
			.chars()
			.filter(|c| !c.is_ascii_whitespace())
			.collect::<String>();

		if encoded.is_empty() {
			return Ok(None);
		}

		STANDARD.decode(encoded).map(Some).map_err(D::Error::custom)
	}
}
