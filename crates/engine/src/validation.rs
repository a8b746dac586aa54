//! Identifier validation shared by every lookup coming from the outside.
//!
//! [`is_valid_and_exist`] rejects malformed identifiers before any query is
//! issued, then hands the lookup to the given [`FindById`] implementation.

use std::future::Future;

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// A lookup able to resolve one entity by its identifier.
pub trait FindById {
    type Output;

    fn find_by_id(&self, id: &str) -> impl Future<Output = ResultEngine<Self::Output>> + Send;
}

/// Whether `id` is a syntactically valid document identifier.
pub fn is_valid_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

/// The stored spelling of `id`: lower-case and hyphenated.
///
/// Every form accepted by [`is_valid_id`] (upper-case, simple, braced, urn)
/// maps to the same stored id.
pub fn canonical_id(id: &str) -> ResultEngine<String> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.hyphenated().to_string())
        .map_err(|_| EngineError::InvalidId(format!("document id is invalid: {id}")))
}

/// Check that `entity_id` is a valid identifier and that `lookup` finds it.
///
/// An invalid identifier fails with [`EngineError::InvalidId`] and the lookup
/// is never called. Otherwise the lookup receives the canonical id and its
/// result is returned as is.
pub async fn is_valid_and_exist<L>(entity_id: &str, lookup: &L) -> ResultEngine<L::Output>
where
    L: FindById + Sync,
{
    let entity_id = canonical_id(entity_id)?;

    lookup.find_by_id(&entity_id).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingLookup {
        calls: AtomicUsize,
        found: bool,
    }

    impl CountingLookup {
        fn new(found: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                found,
            }
        }
    }

    impl FindById for CountingLookup {
        type Output = String;

        async fn find_by_id(&self, id: &str) -> ResultEngine<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.found {
                Ok(id.to_string())
            } else {
                Err(EngineError::KeyNotFound("thing not exists".to_string()))
            }
        }
    }

    #[test]
    fn uuid_ids_are_valid() {
        assert!(is_valid_id("5b0a3c6e-0a34-4f57-9d7c-6f1d1d7b1c55"));
        assert!(!is_valid_id("not-an-id"));
        assert!(!is_valid_id(""));
    }

    #[tokio::test]
    async fn invalid_id_short_circuits_without_lookup() {
        let lookup = CountingLookup::new(true);

        let err = is_valid_and_exist("not-an-id", &lookup).await.unwrap_err();

        assert_eq!(
            err,
            EngineError::InvalidId("document id is invalid: not-an-id".to_string())
        );
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_id_resolves_with_lookup_result() {
        let lookup = CountingLookup::new(true);
        let id = Uuid::new_v4().to_string();

        let found = is_valid_and_exist(&id, &lookup).await.unwrap();

        assert_eq!(found, id);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn every_uuid_spelling_has_one_canonical_id() {
        let id = "5b0a3c6e-0a34-4f57-9d7c-6f1d1d7b1c55";

        for spelling in [
            id.to_string(),
            id.to_uppercase(),
            id.replace('-', ""),
            format!("{{{id}}}"),
            format!("urn:uuid:{id}"),
        ] {
            assert_eq!(canonical_id(&spelling).unwrap(), id);
        }
        assert_eq!(
            canonical_id("not-an-id").unwrap_err(),
            EngineError::InvalidId("document id is invalid: not-an-id".to_string())
        );
    }

    #[tokio::test]
    async fn lookup_receives_the_canonical_id() {
        let lookup = CountingLookup::new(true);
        let id = Uuid::new_v4().to_string();

        let found = is_valid_and_exist(&id.to_uppercase(), &lookup)
            .await
            .unwrap();

        assert_eq!(found, id);
    }

    #[tokio::test]
    async fn lookup_error_is_returned_verbatim() {
        let lookup = CountingLookup::new(false);
        let id = Uuid::new_v4().to_string();

        let err = is_valid_and_exist(&id, &lookup).await.unwrap_err();

        assert_eq!(err, EngineError::KeyNotFound("thing not exists".to_string()));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }
}
