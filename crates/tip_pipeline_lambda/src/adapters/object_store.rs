use aws_sdk_s3::primitives::ByteStream;

use super::block_on;

pub trait ObjectStore {
    /// Writes `body` at `key`, replacing any existing object.
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String>;
}

pub struct S3ObjectStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(bucket: impl Into<String>, s3_client: aws_sdk_s3::Client) -> Self {
        Self {
            bucket: bucket.into(),
            s3_client,
        }
    }
}

impl ObjectStore for S3ObjectStore {
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String> {
        let request = self
            .s3_client
            .put_object()
            .bucket(self.bucket.clone())
            .key(key)
            .body(ByteStream::from(body.to_vec()));

        block_on(request.send())
            .map(|_| ())
            .map_err(|error| format!("failed to write object to s3: {error}"))
    }
}
