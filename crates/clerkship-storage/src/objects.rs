use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;

use crate::error::StorageError;

/// Result of a GET operation, including the body and ETag.
pub struct GetObjectOutput {
    pub body: Vec<u8>,
    pub etag: Option<String>,
}

/// Get an object from S3.
pub async fn get_object(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<GetObjectOutput, StorageError> {
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.is_no_such_key() {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::GetObject(err.to_string())
            }
        })?;

    let etag = resp.e_tag().map(|s| s.to_string());
    let body = resp
        .body
        .collect()
        .await
        .map_err(|e| StorageError::GetObject(e.to_string()))?
        .into_bytes()
        .to_vec();

    Ok(GetObjectOutput { body, etag })
}

/// Put an object to S3 with an If-Match precondition (ETag optimistic locking).
/// Returns the new ETag on success, or `StorageError::PreconditionFailed` if the
/// object changed since it was read.
pub async fn put_object_if_match(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    expected_etag: &str,
) -> Result<String, StorageError> {
    let resp = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type("application/json")
        .if_match(expected_etag)
        .send()
        .await
        .map_err(|e| precondition_or_put_error(e.into_service_error().to_string(), key))?;

    Ok(resp.e_tag().unwrap_or_default().to_string())
}

/// Create an object only if nothing exists at `key` yet (`If-None-Match: *`).
pub async fn put_object_if_absent(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
) -> Result<String, StorageError> {
    let resp = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type("application/json")
        .if_none_match("*")
        .send()
        .await
        .map_err(|e| precondition_or_put_error(e.into_service_error().to_string(), key))?;

    Ok(resp.e_tag().unwrap_or_default().to_string())
}

/// Confirm the bucket exists and the credentials can reach it.
pub async fn head_bucket(client: &Client, bucket: &str) -> Result<(), StorageError> {
    client
        .head_bucket()
        .bucket(bucket)
        .send()
        .await
        .map_err(|e| StorageError::Unavailable(format!("{bucket}: {}", e.into_service_error())))?;
    Ok(())
}

fn precondition_or_put_error(message: String, key: &str) -> StorageError {
    // S3 answers 412 Precondition Failed when If-Match / If-None-Match loses
    if message.contains("PreconditionFailed") {
        StorageError::PreconditionFailed {
            key: key.to_string(),
        }
    } else {
        StorageError::PutObject(message)
    }
}
