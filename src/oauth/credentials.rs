use serde::{Deserialize, Serialize};

use crate::config::ConfigStore;
use crate::error::Ya360Error;

pub const CREDENTIALS_SECTION: &str = "Yandex360ClientSecret";

/// OAuth application credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub verification_code: Option<String>,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            verification_code: None,
        }
    }

    pub fn with_verification_code(mut self, code: impl Into<String>) -> Self {
        self.verification_code = Some(code.into());
        self
    }

    /// The verification code, treating an empty string as absent.
    pub fn verification_code(&self) -> Option<&str> {
        self.verification_code.as_deref().filter(|c| !c.is_empty())
    }

    /// Parse credentials from a JSON object; `client_id` and `client_secret` are required.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, Ya360Error> {
        serde_json::from_value(value.clone())
            .map_err(|e| Ya360Error::Parse(format!("Invalid client credentials: {e}")))
    }

    /// Load credentials from the store.
    ///
    /// Returns `Ok(None)` when the section is absent and an error when it is
    /// present but incomplete.
    pub fn load(store: &dyn ConfigStore) -> Result<Option<Self>, Ya360Error> {
        if !store.has_section(CREDENTIALS_SECTION) {
            return Ok(None);
        }
        let required = |key: &str| {
            store.get(CREDENTIALS_SECTION, key).ok_or_else(|| {
                Ya360Error::Parse(format!(
                    "Section [{CREDENTIALS_SECTION}] is missing '{key}'"
                ))
            })
        };
        Ok(Some(Self {
            client_id: required("client_id")?,
            client_secret: required("client_secret")?,
            verification_code: store
                .get(CREDENTIALS_SECTION, "verification_code")
                .filter(|c| !c.is_empty()),
        }))
    }

    /// Write credentials into the store. The caller decides when to flush.
    pub fn save(&self, store: &mut dyn ConfigStore) {
        store.set(CREDENTIALS_SECTION, "client_id", &self.client_id);
        store.set(CREDENTIALS_SECTION, "client_secret", &self.client_secret);
        store.set(
            CREDENTIALS_SECTION,
            "verification_code",
            self.verification_code.as_deref().unwrap_or(""),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;

    #[test]
    fn empty_verification_code_is_absent() {
        let creds = ClientCredentials::new("abc", "xyz").with_verification_code("");
        assert!(creds.verification_code().is_none());
        let creds = creds.with_verification_code("code1");
        assert_eq!(creds.verification_code(), Some("code1"));
    }

    #[test]
    fn from_json_requires_id_and_secret() {
        let creds = ClientCredentials::from_json(&serde_json::json!({
            "client_id": "abc",
            "client_secret": "xyz"
        }))
        .unwrap();
        assert_eq!(creds.client_id, "abc");
        assert!(creds.verification_code.is_none());

        let err = ClientCredentials::from_json(&serde_json::json!({ "client_id": "abc" }))
            .unwrap_err();
        assert!(matches!(err, Ya360Error::Parse(_)));
    }

    #[test]
    fn load_absent_section() {
        let store = MemoryConfigStore::new();
        assert!(ClientCredentials::load(&store).unwrap().is_none());
    }

    #[test]
    fn load_incomplete_section_errors() {
        let mut store = MemoryConfigStore::new();
        store.set(CREDENTIALS_SECTION, "client_id", "abc");
        let err = ClientCredentials::load(&store).unwrap_err();
        assert!(err.to_string().contains("client_secret"));
    }

    #[test]
    fn save_then_load() {
        let mut store = MemoryConfigStore::new();
        let creds = ClientCredentials::new("abc", "xyz").with_verification_code("code1");
        creds.save(&mut store);
        let loaded = ClientCredentials::load(&store).unwrap().unwrap();
        assert_eq!(loaded, creds);
    }

    #[test]
    fn saved_without_code_loads_as_none() {
        let mut store = MemoryConfigStore::new();
        ClientCredentials::new("abc", "xyz").save(&mut store);
        assert_eq!(
            store.get(CREDENTIALS_SECTION, "verification_code").as_deref(),
            Some("")
        );
        let loaded = ClientCredentials::load(&store).unwrap().unwrap();
        assert!(loaded.verification_code.is_none());
    }
}
