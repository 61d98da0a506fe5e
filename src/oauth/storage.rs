use keyring::Entry;

use super::{AuthError, Token};

/// The keyring service our token pairs live under.
const KEYRING_SERVICE: &str = "upworkctl";

/// Keeps a [`Token`] in the user's keyring between runs.
///
/// We store the whole token as one JSON credential. Keeping access and
/// refresh tokens apart would mean two entries that can drift out of sync.
pub struct TokenStorage {
    entry: Entry,
}

impl TokenStorage {
    /// Opens the credential for the given OAuth2 client ID.
    pub fn new(client_id: &str) -> Result<Self, AuthError> {
        let entry = Entry::new(KEYRING_SERVICE, client_id)?;
        Ok(Self { entry })
    }

    /// Returns `None` when nothing has been stored yet.
    pub fn load(&self) -> Result<Option<Token>, AuthError> {
        match self.entry.get_password() {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, token: &Token) -> Result<(), AuthError> {
        let contents = serde_json::to_string(token)?;
        self.entry.set_password(&contents)?;
        Ok(())
    }

    /// Forgets the stored token. Clearing an empty entry is not an error.
    pub fn clear(&self) -> Result<(), AuthError> {
        match self.entry.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    #[ignore = "requires system keyring"]
    fn test_save_load_clear_via_keyring() {
        let storage = TokenStorage::new("upwork-api-test-client").unwrap();
        let token = Token::new(
            "stored-access",
            Some("stored-refresh".to_string()),
            Some(Utc::now() + Duration::hours(1)),
        );

        storage.save(&token).unwrap();
        assert_eq!(storage.load().unwrap(), Some(token));

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        storage.clear().unwrap();
    }
}
