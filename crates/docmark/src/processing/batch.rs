//! Offline variant: convert a fixed list and wait for every result

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::job::ConversionJob;
use super::status_store::StatusStore;
use super::worker::WorkerPool;
use crate::config::batch_worker_count;
use crate::conversion::Converter;
use crate::types::{JobOutcome, JobState};

/// Convert `paths` on a private pool and return each file's outcome
///
/// The pool defaults to one worker per core (never more than there are files).
pub async fn batch_convert(
    paths: Vec<PathBuf>,
    converter: Arc<dyn Converter>,
    workers: Option<usize>,
) -> HashMap<PathBuf, JobOutcome> {
    let capacity = workers
        .filter(|n| *n > 0)
        .unwrap_or_else(|| batch_worker_count(paths.len()));
    let store = StatusStore::new();
    let pool = WorkerPool::start(capacity, converter);

    tracing::info!("Converting {} files with {} workers", paths.len(), capacity);

    for path in paths {
        let job = ConversionJob::queue(path, store.clone());
        if let Err(e) = pool.submit(job.clone()) {
            job.record(&JobOutcome::Error(e.to_string()));
        }
    }

    pool.shutdown().await;

    store
        .snapshot()
        .into_iter()
        .map(|(path, record)| {
            let outcome = match record.state {
                JobState::Completed => JobOutcome::Completed(record.message),
                JobState::Error => JobOutcome::Error(record.message),
                JobState::Queued | JobState::Processing => {
                    JobOutcome::Error(format!("Error: job ended in state {}", record.state))
                }
            };
            (path, outcome)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::path::Path;

    struct FailsOnBad;

    #[async_trait]
    impl Converter for FailsOnBad {
        async fn convert(&self, path: &Path) -> crate::Result<String> {
            if path.ends_with("bad.docx") {
                Err(Error::conversion("bad.docx", "corrupt archive"))
            } else {
                Ok(format!("Successfully converted to: {}", path.with_extension("md").display()))
            }
        }
    }

    struct Panicking;

    #[async_trait]
    impl Converter for Panicking {
        async fn convert(&self, _path: &Path) -> crate::Result<String> {
            panic!("segfault in disguise");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_every_file_gets_an_outcome() {
        let paths: Vec<PathBuf> = ["a.pdf", "bad.docx", "c.pptx"].iter().map(PathBuf::from).collect();
        let results = batch_convert(paths, Arc::new(FailsOnBad), Some(2)).await;

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[Path::new("a.pdf")],
            JobOutcome::Completed("Successfully converted to: a.md".into())
        );
        assert_eq!(
            results[Path::new("bad.docx")],
            JobOutcome::Error("Conversion failed for 'bad.docx': corrupt archive".into())
        );
        assert!(results[Path::new("c.pptx")].is_success());
    }

    #[tokio::test]
    async fn test_panics_become_errors() {
        let results = batch_convert(vec![PathBuf::from("x.pdf")], Arc::new(Panicking), None).await;
        assert_eq!(
            results[Path::new("x.pdf")],
            JobOutcome::Error("Error: segfault in disguise".into())
        );
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results = batch_convert(Vec::new(), Arc::new(FailsOnBad), None).await;
        assert!(results.is_empty());
    }
}
