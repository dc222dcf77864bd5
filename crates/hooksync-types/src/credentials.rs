//! Credential material supplied by the host.
//!
//! The host resolves credentials out of its own storage before a lifecycle
//! call runs; this crate only models the resolved result. Secret values are
//! wrapped in [`secrecy::SecretString`] so they never appear in `Debug`
//! output or logs.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::SecretString;

/// A resolved credential object: the authentication scheme it is for, plus
/// the named secret fields that scheme reads.
///
/// The `apiKey` scheme, for example, reads the `sharedSecret` field.
#[derive(Clone)]
pub struct CredentialSet {
    scheme: String,
    fields: BTreeMap<String, SecretString>,
}

impl CredentialSet {
    /// Create an empty credential set for the given scheme.
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a named secret field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<SecretString>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The authentication scheme this credential set is configured for.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Look up a secret field by name.
    pub fn field(&self, name: &str) -> Option<&SecretString> {
        self.fields.get(name)
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Field names are safe to show; values never are.
        f.debug_struct("CredentialSet")
            .field("scheme", &self.scheme)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Authentication material ready to attach to an outgoing request.
///
/// Produced by a scheme resolver; the transport layer decides placement per
/// variant and is the only place that knows about headers.
#[derive(Clone)]
pub enum AuthMaterial {
    /// A shared API key sent with every request.
    ApiKey(SecretString),
}

impl fmt::Debug for AuthMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMaterial::ApiKey(_) => f.write_str("ApiKey(***)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn field_lookup() {
        let creds = CredentialSet::new("apiKey").with_field("sharedSecret", "hunter2");
        assert_eq!(creds.scheme(), "apiKey");
        assert_eq!(creds.field("sharedSecret").unwrap().expose_secret(), "hunter2");
        assert!(creds.field("missing").is_none());
    }

    #[test]
    fn debug_hides_secret_values() {
        let creds = CredentialSet::new("apiKey").with_field("sharedSecret", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("sharedSecret"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn auth_material_debug_is_redacted() {
        let material = AuthMaterial::ApiKey("hunter2".into());
        assert_eq!(format!("{material:?}"), "ApiKey(***)");
    }
}
