//! In-memory binary objects addressed by transient URLs.
//!
//! Conversion results are kept here and referenced by an [`ObjectUrl`] that
//! a front-end can bind a player or a download to. Revoking the URL drops
//! the bytes.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

/// A transient, session-local reference to a [`Blob`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    fn generate() -> Self {
        Self(format!("blob:mediaflip/{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bytes tagged with a MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Bytes,
    pub mime: &'static str,
}

/// Registry of live object URLs.
#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: HashMap<ObjectUrl, Blob>,
}

impl BlobStore {
    /// Register `blob` and return a fresh URL for it.
    pub fn create_object_url(&mut self, blob: Blob) -> ObjectUrl {
        let url = ObjectUrl::generate();
        self.blobs.insert(url.clone(), blob);
        url
    }

    /// Release the blob behind `url`. Returns whether it was live.
    pub fn revoke(&mut self, url: &ObjectUrl) -> bool {
        self.blobs.remove(url).is_some()
    }

    pub fn get(&self, url: &ObjectUrl) -> Option<&Blob> {
        self.blobs.get(url)
    }

    /// Number of live URLs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(data: &'static [u8]) -> Blob {
        Blob {
            bytes: Bytes::from_static(data),
            mime: "audio/mp3",
        }
    }

    #[test]
    fn create_get_revoke() {
        let mut store = BlobStore::default();
        let url = store.create_object_url(blob(b"ID3"));
        assert!(url.as_str().starts_with("blob:mediaflip/"));
        assert_eq!(store.get(&url).unwrap().bytes.as_ref(), b"ID3");

        assert!(store.revoke(&url));
        assert!(store.get(&url).is_none());
        assert!(!store.revoke(&url));
        assert!(store.is_empty());
    }

    #[test]
    fn urls_are_unique() {
        let mut store = BlobStore::default();
        let a = store.create_object_url(blob(b"same"));
        let b = store.create_object_url(blob(b"same"));
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }
}
