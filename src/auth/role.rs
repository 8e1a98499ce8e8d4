//! Account roles and the authoritative profile document returned by the API.

// self
use crate::_prelude::*;

/// Account role, ordered by privilege.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
	/// Regular traveller.
	User,
	/// Administrator managing users and shared catalogues.
	Admin,
	/// Administrator allowed to manage other administrators.
	SuperAdmin,
}
impl Role {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::User => "USER",
			Role::Admin => "ADMIN",
			Role::SuperAdmin => "SUPER_ADMIN",
		}
	}

	/// Returns `true` when this role grants at least the privileges of `required`.
	pub fn satisfies(self, required: Role) -> bool {
		self >= required
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Role {
	type Err = UnknownRole;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		let label = trimmed.strip_prefix("ROLE_").unwrap_or(trimmed);

		match label.to_ascii_uppercase().as_str() {
			"USER" => Ok(Role::User),
			"ADMIN" => Ok(Role::Admin),
			"SUPER_ADMIN" | "SUPERADMIN" => Ok(Role::SuperAdmin),
			_ => Err(UnknownRole(s.to_owned())),
		}
	}
}

/// Error returned when a role label is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown role `{0}`.")]
pub struct UnknownRole(pub String);

/// Profile of the signed-in account as reported by `/api/users/profile`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
	/// Account identifier.
	pub id: i64,
	/// Account email.
	pub email: String,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Role assigned by the server.
	pub role: Role,
	/// Super-admin flag, reported separately by some server versions.
	#[serde(default)]
	pub super_admin: bool,
	/// Whether the account is scheduled for deletion.
	#[serde(default)]
	pub deleted: bool,
}
impl UserProfile {
	/// Role after folding in the separate super-admin flag.
	pub fn effective_role(&self) -> Role {
		if self.super_admin { Role::SuperAdmin } else { self.role }
	}
}
