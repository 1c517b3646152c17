//! Identity persistence under the `user` key.

use super::{Database, DbResult, IDENTITY_KEY};
use crate::models::Identity;

impl Database {
    /// Load the signed-in identity.
    ///
    /// A blob that no longer parses is treated as signed out rather than an
    /// error, so a corrupted entry degrades to empty credentials.
    pub fn load_identity(&self) -> DbResult<Option<Identity>> {
        let Some(raw) = self.get_item(IDENTITY_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(identity) => Ok(Some(identity)),
            Err(e) => {
                tracing::warn!(error = %e, "stored identity is unreadable, treating as signed out");
                Ok(None)
            }
        }
    }

    /// Persist the identity, replacing any previous one.
    pub fn save_identity(&self, identity: &Identity) -> DbResult<()> {
        let json = serde_json::to_string(identity)?;
        self.set_item(IDENTITY_KEY, &json)
    }

    /// Forget the identity. Returns whether one was stored.
    pub fn clear_identity(&self) -> DbResult<bool> {
        self.remove_item(IDENTITY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;

    fn identity() -> Identity {
        Identity {
            user_id: RecordId::from(42),
            name: "Sam Patel".into(),
            email: Some("sam@example.com".into()),
            role: Some("client".into()),
        }
    }

    #[test]
    fn test_save_load_clear() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.load_identity().unwrap(), None);

        db.save_identity(&identity()).unwrap();
        assert_eq!(db.load_identity().unwrap(), Some(identity()));

        assert!(db.clear_identity().unwrap());
        assert_eq!(db.load_identity().unwrap(), None);
    }

    #[test]
    fn test_corrupt_blob_reads_as_signed_out() {
        let db = Database::open_in_memory().unwrap();
        db.set_item(IDENTITY_KEY, "{not json").unwrap();
        assert_eq!(db.load_identity().unwrap(), None);
    }
}
