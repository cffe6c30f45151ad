//! Account lookups shared by registration, login and the statistics page

use crate::store::{Store, StoreError};

const FIND_ACCOUNT: &str = "SELECT id FROM users WHERE name = ?1";
const FIND_CREDENTIAL: &str = "SELECT id, passwd FROM users WHERE name = ?1";

/// Resolves a username to its account id. Names match case-sensitively.
pub fn find_account_id<S: Store>(store: &mut S, username: &str) -> Result<Option<i64>, StoreError> {
    let rows = store.query(FIND_ACCOUNT, &[username.into()])?;
    rows.first().map(|row| row.get_i64("id")).transpose()
}

/// Account id together with the stored (transformed) credential.
pub fn find_credential<S: Store>(
    store: &mut S,
    username: &str,
) -> Result<Option<(i64, Vec<u8>)>, StoreError> {
    let rows = store.query(FIND_CREDENTIAL, &[username.into()])?;
    match rows.first() {
        Some(row) => Ok(Some((row.get_i64("id")?, row.get_blob("passwd")?.to_vec()))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::SqliteStore;

    #[test]
    fn test_lookup_existing_and_missing() {
        let mut store = SqliteStore::in_memory().unwrap();
        let id = store
            .execute(
                "INSERT INTO users (name, passwd) VALUES (?1, ?2)",
                &["alice".into(), b"u|".as_slice().into()],
            )
            .unwrap()
            .last_insert_id;

        assert_eq!(find_account_id(&mut store, "alice").unwrap(), Some(id));
        assert_eq!(find_account_id(&mut store, "ALICE").unwrap(), None);
        assert_eq!(find_account_id(&mut store, "bob").unwrap(), None);

        let (found, credential) = find_credential(&mut store, "alice").unwrap().unwrap();
        assert_eq!(found, id);
        assert_eq!(credential, b"u|".to_vec());
        assert!(find_credential(&mut store, "bob").unwrap().is_none());
    }
}
