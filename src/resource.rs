//! Paths of the Planora CRUD resources, for use with [`ApiRequest`](crate::transport::ApiRequest).

// self
use crate::_prelude::*;

/// CRUD collections exposed under `/api`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
	/// Planned trips.
	Trips,
	/// Bookings tying trips to transports and accommodations.
	Bookings,
	/// Transport options.
	Transports,
	/// Accommodation options.
	Accommodations,
	/// User accounts (admin only).
	Users,
}
impl Resource {
	/// Every resource, in navigation order.
	pub const ALL: [Resource; 5] = [
		Resource::Trips,
		Resource::Bookings,
		Resource::Transports,
		Resource::Accommodations,
		Resource::Users,
	];

	/// Path segment under `/api`.
	pub const fn as_str(self) -> &'static str {
		match self {
			Resource::Trips => "trips",
			Resource::Bookings => "bookings",
			Resource::Transports => "transports",
			Resource::Accommodations => "accommodations",
			Resource::Users => "users",
		}
	}

	/// Collection path, e.g. `/api/trips`.
	pub fn collection(self) -> String {
		format!("/api/{}", self.as_str())
	}

	/// Single-item path, e.g. `/api/trips/42`.
	pub fn item(self, id: impl Display) -> String {
		format!("/api/{}/{id}", self.as_str())
	}

	/// Zero-based page of the collection; `None` leaves the page size to the server.
	pub fn page(self, page: u32, size: Option<u32>) -> String {
		match size {
			Some(size) => format!("/api/{}?page={page}&size={size}", self.as_str()),
			None => format!("/api/{}?page={page}", self.as_str()),
		}
	}

	/// Creation path, e.g. `/api/trips/save`.
	pub fn save(self) -> String {
		format!("/api/{}/save", self.as_str())
	}
}
impl Display for Resource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
