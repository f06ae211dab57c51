//! Contact entry types.

/// Placeholder image filename that registry cleanup never deletes.
pub const SENTINEL_IMAGE: &str = "stock_image.png";

/// A stored contact entry.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ContactEntry {
    /// Unique 4-digit lookup key, stored exactly as the caller supplied it.
    pub code: String,
    /// Opaque pointer to the original content, replayed on a successful lookup.
    pub contact_reference: String,
    /// Channel the content was stored from.
    pub origin_channel_id: i64,
    /// Path of the code image, once one has been attached.
    pub image_path: Option<String>,
}

/// Listing row: the code plus its content tuple, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ContactSummary {
    pub code: String,
    pub contact_reference: String,
    pub origin_channel_id: i64,
}
