use aws_sdk_s3::Client;

use clerkship_core::models::record::Document;

use crate::error::StorageError;
use crate::objects;

/// A stored document together with the ETag it was read at.
pub struct LoadedDocument {
    pub doc: Document,
    pub etag: String,
}

/// Load a JSON document from S3. Returns `Ok(None)` when no object exists.
pub async fn load_document(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<Option<LoadedDocument>, StorageError> {
    let output = match objects::get_object(client, bucket, key).await {
        Ok(output) => output,
        Err(StorageError::NotFound { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };
    let value: serde_json::Value = serde_json::from_slice(&output.body)?;
    let serde_json::Value::Object(doc) = value else {
        return Err(StorageError::NotADocument {
            key: key.to_string(),
        });
    };
    Ok(Some(LoadedDocument {
        doc,
        etag: output.etag.unwrap_or_default(),
    }))
}

/// Save a JSON document, guarded by the ETag it was loaded at, or by
/// absence when it is new. Returns the new ETag.
pub async fn save_document(
    client: &Client,
    bucket: &str,
    key: &str,
    doc: &Document,
    loaded_etag: Option<&str>,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(doc)?;
    match loaded_etag {
        Some(etag) if !etag.is_empty() => {
            objects::put_object_if_match(client, bucket, key, body, etag).await
        }
        _ => objects::put_object_if_absent(client, bucket, key, body).await,
    }
}
