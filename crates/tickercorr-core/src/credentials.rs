//! Shared-secret credential set exchanged for a bearer token.

use std::fmt::{Debug, Formatter};

use serde::Serialize;

use crate::ValidationError;

/// Environment variable names, in wire-field order.
pub const CREDENTIAL_ENV_VARS: [(&str, &str); 6] = [
    ("email", "EMAIL"),
    ("name", "NAME"),
    ("rollNo", "ROLL_NO"),
    ("accessCode", "ACCESS_CODE"),
    ("clientID", "CLIENT_ID"),
    ("clientSecret", "CLIENT_SECRET"),
];

/// The six fields posted to the auth endpoint. Loaded once at startup and
/// never mutated afterwards.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct CredentialSet {
    pub email: String,
    pub name: String,
    #[serde(rename = "rollNo")]
    pub roll_no: String,
    #[serde(rename = "accessCode")]
    pub access_code: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

impl CredentialSet {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        roll_no: impl Into<String>,
        access_code: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            roll_no: roll_no.into(),
            access_code: access_code.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read the credential set from process environment variables.
    ///
    /// Missing variables become empty fields; [`CredentialSet::validate`]
    /// reports them when the first token exchange is attempted.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).unwrap_or_default();
        Self {
            email: read("EMAIL"),
            name: read("NAME"),
            roll_no: read("ROLL_NO"),
            access_code: read("ACCESS_CODE"),
            client_id: read("CLIENT_ID"),
            client_secret: read("CLIENT_SECRET"),
        }
    }

    /// Wire names of fields that are empty or whitespace-only.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let values = [
            &self.email,
            &self.name,
            &self.roll_no,
            &self.access_code,
            &self.client_id,
            &self.client_secret,
        ];

        CREDENTIAL_ENV_VARS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.trim().is_empty())
            .map(|((field, _), _)| *field)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = self.missing_fields();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingCredentials { fields })
        }
    }
}

impl Debug for CredentialSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSet")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("roll_no", &self.roll_no)
            .field("access_code", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn complete() -> CredentialSet {
        CredentialSet::new("a@b.test", "Ada", "R-1", "code", "client", "secret")
    }

    #[test]
    fn serializes_with_provider_field_names() {
        let value = serde_json::to_value(complete()).expect("serializable");
        assert_eq!(value["rollNo"], "R-1");
        assert_eq!(value["accessCode"], "code");
        assert_eq!(value["clientID"], "client");
        assert_eq!(value["clientSecret"], "secret");
        assert_eq!(value.as_object().map(|o| o.len()), Some(6));
    }

    #[test]
    fn reports_missing_fields_by_wire_name() {
        let env = HashMap::from([
            ("EMAIL", "a@b.test"),
            ("NAME", "Ada"),
            ("ROLL_NO", "  "),
            ("ACCESS_CODE", "code"),
            ("CLIENT_ID", "client"),
        ]);
        let credentials = CredentialSet::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(credentials.missing_fields(), vec!["rollNo", "clientSecret"]);
        assert!(matches!(
            credentials.validate(),
            Err(ValidationError::MissingCredentials { .. })
        ));
    }

    #[test]
    fn complete_set_validates() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", complete());
        assert!(!rendered.contains("secret\""));
        assert!(!rendered.contains("\"code\""));
        assert!(rendered.contains("<redacted>"));
    }
}
