//! Integration tests for [`ya_disk::UploadPipeline`] against an in-memory backend.
//!
//! Covers: rename-on-conflict, the attempt ceiling, immediate propagation of non-conflict errors,
//! the token gate, the streamed (link + chunks) path, and the connect/disconnect lifecycle.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};
use loader_core::{ByteStream, DocumentSource, StorageError};
use ya_disk::{RemoteStorage, UploadPipeline, UploadSource, YaDiskConfig};

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Normal,
    AlwaysExists,
    NetworkDown,
    LockedOnce,
}

struct FakeDisk {
    mode: Mode,
    token_ok: bool,
    dirs: Mutex<HashSet<String>>,
    files: Mutex<HashSet<String>>,
    attempted: Mutex<Vec<String>>,
    token_checks: AtomicUsize,
    link_requests: AtomicUsize,
    chunks_received: AtomicUsize,
    mkdirs: AtomicUsize,
    closes: AtomicUsize,
    locked_served: AtomicUsize,
}

impl FakeDisk {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            token_ok: true,
            dirs: Mutex::new(HashSet::new()),
            files: Mutex::new(HashSet::new()),
            attempted: Mutex::new(Vec::new()),
            token_checks: AtomicUsize::new(0),
            link_requests: AtomicUsize::new(0),
            chunks_received: AtomicUsize::new(0),
            mkdirs: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            locked_served: AtomicUsize::new(0),
        }
    }

    fn with_invalid_token(mut self) -> Self {
        self.token_ok = false;
        self
    }

    fn with_files(self, files: &[&str]) -> Self {
        self.files
            .lock()
            .unwrap()
            .extend(files.iter().map(|f| f.to_string()));
        self
    }

    fn with_dir(self, dir: &str) -> Self {
        self.dirs.lock().unwrap().insert(dir.to_string());
        self
    }

    fn attempted(&self) -> Vec<String> {
        self.attempted.lock().unwrap().clone()
    }

    fn reserve(&self, path: &str) -> Result<(), StorageError> {
        self.attempted.lock().unwrap().push(path.to_string());
        match self.mode {
            Mode::AlwaysExists => return Err(StorageError::path_exists(path)),
            Mode::NetworkDown => return Err(StorageError::Transport("connection refused".into())),
            Mode::LockedOnce if self.locked_served.fetch_add(1, Ordering::SeqCst) == 0 => {
                return Err(StorageError::locked(path))
            }
            _ => {}
        }
        if !self.files.lock().unwrap().insert(path.to_string()) {
            return Err(StorageError::path_exists(path));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStorage for FakeDisk {
    async fn check_token(&self, _token: &str) -> Result<bool, StorageError> {
        self.token_checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.token_ok)
    }

    async fn is_dir(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.dirs.lock().unwrap().contains(path))
    }

    async fn mkdir(&self, path: &str) -> Result<(), StorageError> {
        self.mkdirs.fetch_add(1, Ordering::SeqCst);
        self.dirs.lock().unwrap().insert(path.to_string());
        Ok(())
    }

    async fn upload_buffer(&self, _bytes: Bytes, path: &str) -> Result<(), StorageError> {
        self.reserve(path)
    }

    async fn request_upload_link(&self, path: &str) -> Result<String, StorageError> {
        self.link_requests.fetch_add(1, Ordering::SeqCst);
        self.reserve(path)?;
        Ok(format!("https://uploader.test/{path}"))
    }

    async fn upload_by_link(&self, mut chunks: ByteStream, _url: &str) -> Result<(), StorageError> {
        while let Some(chunk) = chunks.next().await {
            chunk?;
            self.chunks_received.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

struct ChunkedDocument {
    chunks: usize,
    opens: AtomicUsize,
}

#[async_trait]
impl DocumentSource for ChunkedDocument {
    async fn open(&self) -> Result<ByteStream, StorageError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let chunks = (0..self.chunks).map(|i| Ok(Bytes::from(vec![i as u8; 16])));
        Ok(stream::iter(chunks).boxed())
    }
}

fn pipeline(disk: Arc<FakeDisk>) -> UploadPipeline {
    UploadPipeline::new(disk, &YaDiskConfig::new("token"))
}

fn buffer() -> UploadSource {
    UploadSource::Buffer(Bytes::from_static(b"PK\x03\x04xlsx"))
}

/// **Test: Free name is used as-is on the first attempt.**
#[tokio::test]
async fn test_upload_first_attempt_keeps_name() {
    let disk = Arc::new(FakeDisk::new(Mode::Normal));
    let path = pipeline(disk.clone()).upload(&buffer(), "report.xlsx").await.unwrap();

    assert_eq!(path, "temp_folder/report.xlsx");
    assert_eq!(disk.attempted(), vec!["temp_folder/report.xlsx"]);
}

/// **Test: Existing names are skipped with increasing counters.**
#[tokio::test]
async fn test_upload_renames_on_collision() {
    let disk = Arc::new(
        FakeDisk::new(Mode::Normal)
            .with_files(&["temp_folder/report.xlsx", "temp_folder/report(1).xlsx"]),
    );
    let path = pipeline(disk.clone()).upload(&buffer(), "report.xlsx").await.unwrap();

    assert_eq!(path, "temp_folder/report(2).xlsx");
    assert_eq!(
        disk.attempted(),
        vec![
            "temp_folder/report.xlsx",
            "temp_folder/report(1).xlsx",
            "temp_folder/report(2).xlsx",
        ]
    );
}

/// **Test: A locked target is retried under the next name.**
#[tokio::test]
async fn test_upload_renames_on_locked() {
    let disk = Arc::new(FakeDisk::new(Mode::LockedOnce));
    let path = pipeline(disk.clone()).upload(&buffer(), "pl.xlsx").await.unwrap();

    assert_eq!(path, "temp_folder/pl(1).xlsx");
}

/// **Test: Backend that always reports "path exists" gets exactly the ceiling of attempts.**
///
/// **Expected:** 10 attempts (default), then Exhausted naming the logical file.
#[tokio::test]
async fn test_upload_exhausts_after_ceiling() {
    let disk = Arc::new(FakeDisk::new(Mode::AlwaysExists));
    let err = pipeline(disk.clone()).upload(&buffer(), "report.xlsx").await.unwrap_err();

    match err {
        StorageError::Exhausted { name, attempts } => {
            assert_eq!(name, "report.xlsx");
            assert_eq!(attempts, 10);
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
    let attempted = disk.attempted();
    assert_eq!(attempted.len(), 10);
    assert_eq!(attempted.last().unwrap(), "temp_folder/report(9).xlsx");
    assert_eq!(disk.token_checks.load(Ordering::SeqCst), 10);
}

/// **Test: Configured ceiling is honoured for the streamed path too.**
#[tokio::test]
async fn test_stream_upload_exhausts_after_configured_ceiling() {
    let disk = Arc::new(FakeDisk::new(Mode::AlwaysExists));
    let config = YaDiskConfig::new("token").with_attempt_count(3);
    let source = UploadSource::Stream(Arc::new(ChunkedDocument {
        chunks: 2,
        opens: AtomicUsize::new(0),
    }));

    let err = UploadPipeline::new(disk.clone(), &config)
        .upload(&source, "a.xlsx")
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Exhausted { attempts: 3, .. }));
    assert_eq!(disk.link_requests.load(Ordering::SeqCst), 3);
}

/// **Test: Non-conflict error stops after a single attempt and propagates unchanged.**
#[tokio::test]
async fn test_upload_propagates_network_error_without_retry() {
    let disk = Arc::new(FakeDisk::new(Mode::NetworkDown));
    let err = pipeline(disk.clone()).upload(&buffer(), "report.xlsx").await.unwrap_err();

    match err {
        StorageError::Transport(msg) => assert_eq!(msg, "connection refused"),
        other => panic!("expected Transport, got {other:?}"),
    }
    assert_eq!(disk.attempted().len(), 1);
}

/// **Test: Rejected token fails fast without touching the target.**
#[tokio::test]
async fn test_upload_with_invalid_token_does_not_write() {
    let disk = Arc::new(FakeDisk::new(Mode::Normal).with_invalid_token());
    let err = pipeline(disk.clone()).upload(&buffer(), "report.xlsx").await.unwrap_err();

    assert!(matches!(err, StorageError::TokenInvalid));
    assert!(disk.attempted().is_empty());
    assert_eq!(disk.token_checks.load(Ordering::SeqCst), 1);
}

/// **Test: Chunked source requests one link and streams every chunk through it.**
#[tokio::test]
async fn test_stream_upload_requests_link_and_streams_chunks() {
    let disk = Arc::new(FakeDisk::new(Mode::Normal));
    let document = Arc::new(ChunkedDocument {
        chunks: 5,
        opens: AtomicUsize::new(0),
    });
    let source = UploadSource::Stream(document.clone());

    let path = pipeline(disk.clone()).upload(&source, "data.xlsx").await.unwrap();

    assert_eq!(path, "temp_folder/data.xlsx");
    assert_eq!(disk.link_requests.load(Ordering::SeqCst), 1);
    assert_eq!(disk.chunks_received.load(Ordering::SeqCst), 5);
    assert_eq!(document.opens.load(Ordering::SeqCst), 1);
}

/// **Test: connect creates the missing directory; an existing one is left alone.**
#[tokio::test]
async fn test_connect_ensures_directory() {
    let disk = Arc::new(FakeDisk::new(Mode::Normal));
    pipeline(disk.clone()).connect().await.unwrap();
    assert_eq!(disk.mkdirs.load(Ordering::SeqCst), 1);
    assert!(disk.dirs.lock().unwrap().contains("temp_folder"));

    let disk = Arc::new(FakeDisk::new(Mode::Normal).with_dir("temp_folder"));
    pipeline(disk.clone()).connect().await.unwrap();
    assert_eq!(disk.mkdirs.load(Ordering::SeqCst), 0);
}

/// **Test: connect with a rejected token fails with TokenInvalid.**
#[tokio::test]
async fn test_connect_with_invalid_token() {
    let disk = Arc::new(FakeDisk::new(Mode::Normal).with_invalid_token());
    let err = pipeline(disk.clone()).connect().await.unwrap_err();
    assert!(matches!(err, StorageError::TokenInvalid));
    assert_eq!(disk.mkdirs.load(Ordering::SeqCst), 0);
}

/// **Test: disconnect is idempotent and works without connect.**
#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let disk = Arc::new(FakeDisk::new(Mode::Normal));
    let pipeline = pipeline(disk.clone());
    pipeline.disconnect().await;
    pipeline.disconnect().await;
    assert_eq!(disk.closes.load(Ordering::SeqCst), 1);
}
