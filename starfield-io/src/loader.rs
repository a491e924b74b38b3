//! Background dataset loading
//!
//! Loads run as tokio tasks. A dataset is decoded completely before it is
//! sent to the [`DatasetInbox`]; the frame loop drains the inbox and
//! registers what arrived, so the picking pass sees a dataset either fully
//! present or not at all.

use crate::binary::decode_dataset;
use crate::catalog::DatasetSource;
use starfield_core::{Error, PointDataset};
use std::path::PathBuf;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Result of one background load
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(PointDataset),
    Failed { title: String, error: Error },
}

/// Receiving end, drained once per frame
#[derive(Debug)]
pub struct DatasetInbox {
    rx: UnboundedReceiver<LoadOutcome>,
}

impl DatasetInbox {
    /// Take every outcome that has arrived so far, without waiting
    pub fn drain(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(outcome) => outcomes.push(outcome),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        outcomes
    }

    /// Wait for the next outcome; `None` once every loader is gone
    pub async fn recv(&mut self) -> Option<LoadOutcome> {
        self.rx.recv().await
    }
}

/// Spawns loads of point buffer files from a data directory
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    tx: UnboundedSender<LoadOutcome>,
    runtime: Handle,
    data_dir: PathBuf,
}

impl DatasetLoader {
    /// Create a loader and the inbox its results arrive in
    pub fn new(runtime: Handle, data_dir: impl Into<PathBuf>) -> (Self, DatasetInbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            tx,
            runtime,
            data_dir: data_dir.into(),
        };
        (loader, DatasetInbox { rx })
    }

    /// Start loading one catalog source
    pub fn load(&self, source: &DatasetSource) -> JoinHandle<()> {
        let path = self.data_dir.join(&source.file);
        let title = source.title.clone();
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            log::debug!("Loading '{}' from {}", title, path.display());
            let outcome = match tokio::fs::read(&path).await {
                Ok(bytes) => match decode_dataset(&title, &bytes) {
                    Ok(dataset) => LoadOutcome::Loaded(dataset),
                    Err(error) => LoadOutcome::Failed { title, error },
                },
                Err(e) => LoadOutcome::Failed {
                    title,
                    error: Error::Io(e),
                },
            };
            if tx.send(outcome).is_err() {
                log::warn!("Dataset inbox closed before load finished");
            }
        })
    }

    /// Hand over a dataset that was built in memory
    pub fn publish(&self, dataset: PointDataset) {
        if self.tx.send(LoadOutcome::Loaded(dataset)).is_err() {
            log::warn!("Dataset inbox closed, dropping published dataset");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::write_points;
    use starfield_core::Point3f;
    use std::fs;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_load_publishes_complete_dataset() {
        let dir = std::env::temp_dir().join(format!("starfield_loader_ok_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        write_points(&[Point3f::new(1.0, 2.0, 3.0)], dir.join("2mrs.f32")).unwrap();

        let (loader, mut inbox) = DatasetLoader::new(Handle::current(), &dir);
        let source = DatasetSource::new("2MRS", "2mrs.f32", "http://example.org");
        loader.load(&source).await.unwrap();

        match inbox.recv().await {
            Some(LoadOutcome::Loaded(dataset)) => {
                assert_eq!(dataset.title(), "2MRS");
                assert_eq!(dataset.len(), 1);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_malformed_file_fails_only_that_dataset() {
        let dir = std::env::temp_dir().join(format!("starfield_loader_bad_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("bad.f32"), [0u8; 8]).unwrap();
        write_points(&[Point3f::origin()], dir.join("good.f32")).unwrap();

        let (loader, mut inbox) = DatasetLoader::new(Handle::current(), &dir);
        loader
            .load(&DatasetSource::new("bad", "bad.f32", ""))
            .await
            .unwrap();
        loader
            .load(&DatasetSource::new("good", "good.f32", ""))
            .await
            .unwrap();

        let outcomes = inbox.drain();
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            &outcomes[0],
            LoadOutcome::Failed { title, error: Error::MalformedBuffer { .. } } if title == "bad"
        ));
        assert!(matches!(&outcomes[1], LoadOutcome::Loaded(d) if d.title() == "good"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_drain_empty_inbox() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (loader, mut inbox) = DatasetLoader::new(runtime.handle().clone(), ".");
        assert!(inbox.drain().is_empty());

        loader.publish(PointDataset::new("memory", vec![Point3f::origin()]));
        let outcomes = inbox.drain();
        assert!(matches!(&outcomes[..], [LoadOutcome::Loaded(d)] if d.title() == "memory"));
    }
}
