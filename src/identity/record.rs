use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::role::Role;

/// Shown when a stored record carries neither `full_name` nor `first_name`.
pub const GENERIC_DISPLAY_NAME: &str = "User";

/// The authenticated user as produced by the auth form and persisted in the session store.
///
/// `role` is kept as the raw string: the store must round-trip whatever the auth form handed
/// over, known role or not. Use [`Identity::known_role`] for the typed view.
///
/// Any JSON object is a valid record. `role`, `full_name` and `first_name` are only lifted out
/// when they hold strings; other values (numbers, null, objects) stay in `profile` under their
/// original key, so they read as absent here and are written back unchanged.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Identity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Profile fields beyond the ones this crate reads (id, email, student number, ...).
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(_)) => match map.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

impl From<Map<String, Value>> for Identity {
    fn from(mut profile: Map<String, Value>) -> Self {
        let role = take_string(&mut profile, "role");
        let full_name = take_string(&mut profile, "full_name");
        let first_name = take_string(&mut profile, "first_name");
        Self { role, full_name, first_name, profile }
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Identity::from)
    }
}

impl Identity {
    pub fn with_role(role: impl Into<String>) -> Self {
        Self { role: Some(role.into()), ..Default::default() }
    }

    pub fn full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    pub fn first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    pub fn known_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    /// `full_name`, else `first_name`, else the generic label. Empty strings count as missing.
    pub fn display_name(&self) -> &str {
        [self.full_name.as_deref(), self.first_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(GENERIC_DISPLAY_NAME)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_full_name() {
        let id = Identity::with_role("student").full_name("Jane Doe").first_name("Jane");
        assert_eq!(id.display_name(), "Jane Doe");
    }

    #[test]
    fn display_name_falls_back() {
        let id = Identity::with_role("faculty").first_name("Ada");
        assert_eq!(id.display_name(), "Ada");
        let id = Identity::with_role("faculty").full_name("").first_name("Ada");
        assert_eq!(id.display_name(), "Ada");
        assert_eq!(Identity::default().display_name(), GENERIC_DISPLAY_NAME);
    }

    #[test]
    fn extra_profile_fields_survive_json() {
        let text = r#"{"role":"sbo","full_name":"Sam Ortiz","id":42,"email":"sam@example.edu"}"#;
        let id = Identity::from_json(text).unwrap();
        assert_eq!(id.known_role(), Some(Role::Sbo));
        assert_eq!(id.profile.get("id"), Some(&Value::from(42)));
        let back = Identity::from_json(&id.to_json().unwrap()).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn missing_fields_are_not_an_error() {
        let id = Identity::from_json("{}").unwrap();
        assert_eq!(id.role, None);
        assert_eq!(id.known_role(), None);
        assert_eq!(id.display_name(), GENERIC_DISPLAY_NAME);
    }

    #[test]
    fn null_fields_read_as_absent() {
        let id = Identity::from_json(r#"{"role":null,"full_name":null,"first_name":"Lee"}"#).unwrap();
        assert_eq!(id.role, None);
        assert_eq!(id.display_name(), "Lee");
    }

    #[test]
    fn non_string_known_fields_are_kept_in_profile() {
        let text = r#"{"role":3,"full_name":42,"first_name":{"given":"Jo"},"id":9}"#;
        let id = Identity::from_json(text).unwrap();
        assert_eq!(id.role, None);
        assert_eq!(id.known_role(), None);
        assert_eq!(id.display_name(), GENERIC_DISPLAY_NAME);
        assert_eq!(id.profile.get("role"), Some(&Value::from(3)));
        let written: Value = serde_json::from_str(&id.to_json().unwrap()).unwrap();
        let original: Value = serde_json::from_str(text).unwrap();
        assert_eq!(written, original);
        assert_eq!(Identity::from_json(&id.to_json().unwrap()).unwrap(), id);
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(Identity::from_json("[1,2]").is_err());
        assert!(Identity::from_json("\"student\"").is_err());
        assert!(Identity::from_json("{oops").is_err());
    }
}
