//! Tests for the disk fallback sink

use tempfile::TempDir;

use crate::fallback::{DiskFallback, FallbackSink};

fn collect_files(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current).expect("read_dir") {
            let path = entry.expect("entry").path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

#[tokio::test]
async fn test_write_persists_exact_buffer() {
    let dir = TempDir::new().expect("tempdir");
    let sink = DiskFallback::new(dir.path());

    let buffer = b"target,timestamp\nt1,100\n";
    sink.write(buffer, "operations").await.expect("write");

    let files = collect_files(dir.path());
    assert_eq!(files.len(), 1);
    assert_eq!(std::fs::read(&files[0]).expect("read"), buffer);

    // Bucketed under the destination table name.
    assert!(files[0].starts_with(dir.path().join("operations")));
    assert_eq!(files[0].extension().and_then(|e| e.to_str()), Some("csv"));
}

#[tokio::test]
async fn test_writes_never_collide() {
    let dir = TempDir::new().expect("tempdir");
    let sink = DiskFallback::new(dir.path());

    for i in 0..5u8 {
        sink.write(&[i], "operations").await.expect("write");
    }
    sink.write(b"reg", "operation_collection")
        .await
        .expect("write");

    let files = collect_files(dir.path());
    assert_eq!(files.len(), 6);
}

#[tokio::test]
async fn test_destinations_are_bucketed_separately() {
    let dir = TempDir::new().expect("tempdir");
    let sink = DiskFallback::new(dir.path());

    sink.write(b"ops", "operations").await.expect("write");
    sink.write(b"reg", "operation_collection")
        .await
        .expect("write");

    assert!(dir.path().join("operations").is_dir());
    assert!(dir.path().join("operation_collection").is_dir());
}
