//! Durable code -> contact mapping.
//!
//! Each entry pairs a unique 4-digit code with an opaque contact reference,
//! the channel it came from, and optionally the path of a generated code
//! image. Deleting an entry cascades to its image file, except for the
//! shared stock placeholder. Backed by SQLite through a pooled handle.

mod error;
mod store;
mod types;

pub use error::RegistryError;
pub use store::ContactRegistry;
pub use types::{ContactEntry, ContactSummary, SENTINEL_IMAGE};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    async fn registry() -> ContactRegistry {
        ContactRegistry::in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_add_and_lookup() {
        let registry = registry().await;

        registry.add_entry("1234", "42", -100500).await.unwrap();

        let entry = registry.lookup("1234").await.unwrap().unwrap();
        assert_eq!(entry.code, "1234");
        assert_eq!(entry.contact_reference, "42");
        assert_eq!(entry.origin_channel_id, -100500);
        assert_eq!(entry.image_path, None);
    }

    #[tokio::test]
    async fn test_duplicate_code_is_rejected() {
        let registry = registry().await;

        registry.add_entry("1234", "42", 1).await.unwrap();
        let err = registry.add_entry("1234", "43", 2).await.unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCode(code) if code == "1234"));

        // The first entry survives unchanged.
        let entry = registry.lookup("1234").await.unwrap().unwrap();
        assert_eq!(entry.contact_reference, "42");
    }

    #[tokio::test]
    async fn test_lookup_on_empty_registry() {
        let registry = registry().await;
        assert!(registry.lookup("9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_image_path_requires_existing_code() {
        let registry = registry().await;

        let err = registry.set_image_path("9999", "x.png").await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(code) if code == "9999"));

        registry.add_entry("1234", "42", 1).await.unwrap();
        registry.set_image_path("1234", "x.png").await.unwrap();
        assert_eq!(
            registry.image_path("1234").await.unwrap(),
            Some("x.png".into())
        );

        // Overwrite is allowed.
        registry.set_image_path("1234", "y.png").await.unwrap();
        assert_eq!(
            registry.image_path("1234").await.unwrap(),
            Some("y.png".into())
        );
    }

    #[tokio::test]
    async fn test_image_path_absent() {
        let registry = registry().await;
        registry.add_entry("1234", "42", 1).await.unwrap();

        assert_eq!(registry.image_path("1234").await.unwrap(), None);
        assert_eq!(registry.image_path("9999").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_entry_deletes_image_and_row() {
        let registry = registry().await;
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("code_1234.png");
        std::fs::write(&image, b"png").unwrap();

        registry.add_entry("1234", "42", 1).await.unwrap();
        registry
            .set_image_path("1234", image.to_str().unwrap())
            .await
            .unwrap();

        registry.remove_entry("1234").await.unwrap();

        assert!(!image.exists());
        assert!(registry.lookup("1234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_entry_spares_sentinel_image() {
        let registry = registry().await;
        let dir = tempfile::tempdir().unwrap();
        let sentinel = dir.path().join(SENTINEL_IMAGE);
        std::fs::write(&sentinel, b"png").unwrap();

        registry.add_entry("1234", "42", 1).await.unwrap();
        registry
            .set_image_path("1234", sentinel.to_str().unwrap())
            .await
            .unwrap();

        registry.remove_entry("1234").await.unwrap();

        assert!(sentinel.exists());
        assert!(registry.lookup("1234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_entry_unknown_code() {
        let registry = registry().await;
        registry.add_entry("1234", "42", 1).await.unwrap();

        let err = registry.remove_entry("9999").await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(code) if code == "9999"));

        // No side effects on the existing entry.
        assert!(registry.lookup("1234").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remove_entry_with_missing_image_file() {
        let registry = registry().await;

        registry.add_entry("1234", "42", 1).await.unwrap();
        registry
            .set_image_path("1234", "/nonexistent/code_1234.png")
            .await
            .unwrap();

        // File deletion is best-effort; the row still goes away.
        registry.remove_entry("1234").await.unwrap();
        assert!(registry.lookup("1234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_all_removes_rows_and_non_sentinel_images() {
        let registry = registry().await;
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("code_1111.png");
        let sentinel = dir.path().join(SENTINEL_IMAGE);
        std::fs::write(&image, b"png").unwrap();
        std::fs::write(&sentinel, b"png").unwrap();

        registry.add_entry("1111", "1", 1).await.unwrap();
        registry.add_entry("2222", "2", 2).await.unwrap();
        registry.add_entry("3333", "3", 3).await.unwrap();
        registry
            .set_image_path("1111", image.to_str().unwrap())
            .await
            .unwrap();
        registry
            .set_image_path("2222", sentinel.to_str().unwrap())
            .await
            .unwrap();

        registry.clear_all().await.unwrap();

        assert!(!image.exists());
        assert!(sentinel.exists());
        assert!(registry.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let registry = registry().await;

        registry.add_entry("3333", "c", 3).await.unwrap();
        registry.add_entry("1111", "a", 1).await.unwrap();
        registry.add_entry("2222", "b", 2).await.unwrap();

        let listed = registry.list_all().await.unwrap();
        let codes: Vec<&str> = listed.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["3333", "1111", "2222"]);
        assert_eq!(listed[1].contact_reference, "a");
        assert_eq!(listed[1].origin_channel_id, 1);
    }

    #[tokio::test]
    async fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("db").join("contacts.sqlite3");

        let registry = ContactRegistry::open(&db_path).await.unwrap();
        registry.add_entry("1234", "42", 1).await.unwrap();

        assert!(Path::new(&db_path).exists());

        // Reopening sees the persisted entry.
        drop(registry);
        let reopened = ContactRegistry::open(&db_path).await.unwrap();
        assert!(reopened.lookup("1234").await.unwrap().is_some());
    }
}
