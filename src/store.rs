use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use log::info;
use std::path::Path;

/// Destination for the final dataset partitions. The pipeline only ever
/// needs to put whole files, so that is the entire surface.
#[async_trait]
pub trait ObjectStore {
    async fn put_object(&self, key: &str, path: &Path) -> Result<()>;
}

/// S3-backed store. Credentials and region come from the ambient AWS
/// configuration (environment, profile, instance metadata).
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, key: &str, path: &Path) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .with_context(|| format!("upload to s3://{}/{} failed", self.bucket, key))?;

        info!("Uploaded {:?} to s3://{}/{}", path, self.bucket, key);
        Ok(())
    }
}

/// Upload each named file from `dir` under `prefix + filename`.
/// The first failure aborts; earlier files may already have landed.
pub async fn upload_files(
    store: &dyn ObjectStore,
    dir: &Path,
    prefix: &str,
    filenames: &[&str],
) -> Result<()> {
    for name in filenames {
        let key = format!("{prefix}{name}");
        store.put_object(&key, &dir.join(name)).await?;
    }
    info!("Uploaded all files");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use std::sync::Mutex;

    // In-memory stand-in for S3
    #[derive(Default)]
    struct MemoryStore {
        objects: Mutex<BTreeMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn put_object(&self, key: &str, path: &Path) -> Result<()> {
            let bytes = fs::read(path)?;
            self.objects.lock().unwrap().insert(key.to_string(), bytes);
            Ok(())
        }
    }

    #[tokio::test]
    async fn uploads_every_file_under_the_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("train.jsonl"), b"{\"text\":\"a\"}\n").unwrap();
        fs::write(dir.path().join("eval.jsonl"), b"{\"text\":\"b\"}\n").unwrap();

        let store = MemoryStore::default();
        upload_files(&store, dir.path(), "data/", &["train.jsonl", "eval.jsonl"])
            .await
            .unwrap();

        let objects = store.objects.lock().unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects["data/train.jsonl"], b"{\"text\":\"a\"}\n");
        assert_eq!(objects["data/eval.jsonl"], b"{\"text\":\"b\"}\n");
    }

    #[tokio::test]
    async fn missing_local_file_fails_the_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::default();

        let result = upload_files(&store, dir.path(), "data/", &["train.jsonl"]).await;
        assert!(result.is_err());
    }
}
