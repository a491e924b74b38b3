//! Search, detail and article lookups
//!
//! Each lookup runs as a tokio task and reports back over a channel that the
//! frame loop drains. A newer request aborts the older task, and results
//! tagged with an outdated generation are dropped, so a slow reply can never
//! overwrite a newer selection. Failures show as a transient status that
//! clears itself.

use starfield_core::{
    Article, ArticleService, DatasetKind, DetailService, Error, PointRecord, Result, SearchService,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Indicator shown next to a lookup control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    Idle,
    Pending,
    /// Cleared automatically after the error display timeout
    Failed { since: Instant },
}

/// The external services lookups go through; any of them may be absent
#[derive(Clone, Default)]
pub struct LookupServices {
    pub search: Option<Arc<dyn SearchService>>,
    pub detail: Option<Arc<dyn DetailService>>,
    pub article: Option<Arc<dyn ArticleService>>,
}

impl LookupServices {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: Arc<dyn SearchService>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_detail(mut self, detail: Arc<dyn DetailService>) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_article(mut self, article: Arc<dyn ArticleService>) -> Self {
        self.article = Some(article);
        self
    }
}

enum LookupEvent {
    Search { generation: u64, result: Result<Vec<usize>> },
    Record { generation: u64, record: PointRecord },
    Article { generation: u64, article: Article },
    DetailFailed { generation: u64, error: Error },
}

/// Owns the in-flight lookup tasks and their latest results
pub struct LookupCoordinator {
    runtime: Handle,
    services: LookupServices,
    tx: UnboundedSender<LookupEvent>,
    rx: UnboundedReceiver<LookupEvent>,
    error_display: Duration,

    search_task: Option<JoinHandle<()>>,
    search_generation: u64,
    search_status: LookupStatus,

    detail_task: Option<JoinHandle<()>>,
    detail_generation: u64,
    detail_status: LookupStatus,
    record: Option<PointRecord>,
    article: Option<Article>,
}

impl LookupCoordinator {
    pub fn new(runtime: Handle, services: LookupServices, error_display: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            services,
            tx,
            rx,
            error_display,
            search_task: None,
            search_generation: 0,
            search_status: LookupStatus::Idle,
            detail_task: None,
            detail_generation: 0,
            detail_status: LookupStatus::Idle,
            record: None,
            article: None,
        }
    }

    pub fn search_status(&self) -> LookupStatus {
        self.search_status
    }

    pub fn detail_status(&self) -> LookupStatus {
        self.detail_status
    }

    /// Detail record of the current selection, once it arrived
    pub fn record(&self) -> Option<&PointRecord> {
        self.record.as_ref()
    }

    pub fn article(&self) -> Option<&Article> {
        self.article.as_ref()
    }

    /// Whether any lookup task is still running
    pub fn is_busy(&self) -> bool {
        let running = |task: &Option<JoinHandle<()>>| task.as_ref().is_some_and(|t| !t.is_finished());
        running(&self.search_task) || running(&self.detail_task)
    }

    /// Search the SIMBAD catalog for an identifier
    pub fn search(&mut self, ident: &str) {
        if let Some(task) = self.search_task.take() {
            task.abort();
        }
        self.search_generation += 1;
        let generation = self.search_generation;
        let tx = self.tx.clone();

        let service = match self.services.search.clone() {
            Some(service) => service,
            None => {
                let _ = tx.send(LookupEvent::Search {
                    generation,
                    result: Err(Error::Lookup("no search service".to_string())),
                });
                return;
            }
        };

        log::debug!("Searching for '{}'", ident);
        self.search_status = LookupStatus::Pending;
        let ident = ident.to_string();
        self.search_task = Some(self.runtime.spawn(async move {
            let result = service.find_by_identifier(&ident).await;
            let _ = tx.send(LookupEvent::Search { generation, result });
        }));
    }

    /// Describe a newly selected point, then fetch its article
    ///
    /// Cancels the lookup of the previous selection. Kinds without a detail
    /// service just clear the previous record.
    pub fn request_detail(&mut self, kind: DatasetKind, index: usize) {
        self.clear_detail();

        let detail = match (&self.services.detail, kind.has_lookup()) {
            (Some(detail), true) => Arc::clone(detail),
            _ => return,
        };
        let article = self.services.article.clone();
        let tx = self.tx.clone();
        let generation = self.detail_generation;

        log::debug!("Looking up point {} of {:?}", index, kind);
        self.detail_status = LookupStatus::Pending;
        self.detail_task = Some(self.runtime.spawn(async move {
            let record = match detail.describe_point(kind, index).await {
                Ok(record) => record,
                Err(error) => {
                    let _ = tx.send(LookupEvent::DetailFailed { generation, error });
                    return;
                }
            };

            let title = record.article_title();
            let _ = tx.send(LookupEvent::Record { generation, record });

            if let Some(service) = article {
                let event = match service.fetch_article(&title).await {
                    Ok(article) => LookupEvent::Article { generation, article },
                    Err(error) => LookupEvent::DetailFailed { generation, error },
                };
                let _ = tx.send(event);
            }
        }));
    }

    /// Drop the current record and cancel its lookup
    pub fn clear_detail(&mut self) {
        if let Some(task) = self.detail_task.take() {
            task.abort();
        }
        self.detail_generation += 1;
        self.detail_status = LookupStatus::Idle;
        self.record = None;
        self.article = None;
    }

    /// Flag the search as failed, e.g. when its dataset is not loaded
    pub fn mark_search_failed(&mut self, now: Instant) {
        self.search_status = LookupStatus::Failed { since: now };
    }

    /// Apply finished lookups and expire old error indicators
    ///
    /// Returns the first point index of a successful search.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        let mut found = None;

        while let Ok(event) = self.rx.try_recv() {
            match event {
                LookupEvent::Search { generation, result } if generation == self.search_generation => {
                    match result.map(|indices| indices.first().copied()) {
                        Ok(Some(index)) => {
                            self.search_status = LookupStatus::Idle;
                            found = Some(index);
                        }
                        Ok(None) => {
                            log::info!("Search found nothing");
                            self.search_status = LookupStatus::Failed { since: now };
                        }
                        Err(e) => {
                            log::warn!("Search failed: {}", e);
                            self.search_status = LookupStatus::Failed { since: now };
                        }
                    }
                }
                LookupEvent::Record { generation, record } if generation == self.detail_generation => {
                    self.record = Some(record);
                    if self.services.article.is_none() {
                        self.detail_status = LookupStatus::Idle;
                    }
                }
                LookupEvent::Article { generation, article } if generation == self.detail_generation => {
                    self.article = Some(article);
                    self.detail_status = LookupStatus::Idle;
                }
                LookupEvent::DetailFailed { generation, error } if generation == self.detail_generation => {
                    log::warn!("Detail lookup failed: {}", error);
                    self.detail_status = LookupStatus::Failed { since: now };
                }
                _ => log::debug!("Dropping stale lookup result"),
            }
        }

        for status in [&mut self.search_status, &mut self.detail_status] {
            if let LookupStatus::Failed { since } = *status {
                if now.saturating_duration_since(since) >= self.error_display {
                    *status = LookupStatus::Idle;
                }
            }
        }

        found
    }
}

impl Drop for LookupCoordinator {
    fn drop(&mut self) {
        for task in [self.search_task.take(), self.detail_task.take()].into_iter().flatten() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfield_core::{LookupFuture, SimbadRecord, TwoMrsRecord};
    use tokio::runtime::Runtime;

    struct FixedSearch(Vec<usize>);

    impl SearchService for FixedSearch {
        fn find_by_identifier<'a>(&'a self, _ident: &'a str) -> LookupFuture<'a, Vec<usize>> {
            let indices = self.0.clone();
            Box::pin(async move { Ok(indices) })
        }
    }

    struct FailingSearch;

    impl SearchService for FailingSearch {
        fn find_by_identifier<'a>(&'a self, ident: &'a str) -> LookupFuture<'a, Vec<usize>> {
            Box::pin(async move { Err(Error::Lookup(format!("{} unreachable", ident))) })
        }
    }

    /// Point 0 answers slowly, everything else right away
    struct Catalog;

    impl DetailService for Catalog {
        fn describe_point(&self, kind: DatasetKind, index: usize) -> LookupFuture<'_, PointRecord> {
            Box::pin(async move {
                if index == 0 {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                }
                Ok(match kind {
                    DatasetKind::Simbad => PointRecord::Simbad(SimbadRecord {
                        id: format!("obj {}", index),
                        otype: "G".to_string(),
                    }),
                    _ => PointRecord::TwoMrs(TwoMrsRecord {
                        two_mass_id: index.to_string(),
                        bibliographic_code: String::new(),
                        galaxy_name: "NGC_0224".to_string(),
                        galaxy_type: String::new(),
                        source_of_type: String::new(),
                    }),
                })
            })
        }
    }

    struct Encyclopedia;

    impl ArticleService for Encyclopedia {
        fn fetch_article<'a>(&'a self, title: &'a str) -> LookupFuture<'a, Article> {
            Box::pin(async move {
                Ok(Article {
                    title: title.to_string(),
                    html: "<p>spiral</p>".to_string(),
                })
            })
        }
    }

    fn settle(coordinator: &LookupCoordinator) {
        for _ in 0..400 {
            if !coordinator.is_busy() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("lookup tasks did not finish");
    }

    #[test]
    fn test_search_returns_first_index() {
        let runtime = Runtime::new().unwrap();
        let services = LookupServices::none().with_search(Arc::new(FixedSearch(vec![7, 2])));
        let mut lookup = LookupCoordinator::new(runtime.handle().clone(), services, Duration::from_secs(3));

        lookup.search("M31");
        assert_eq!(lookup.search_status(), LookupStatus::Pending);
        settle(&lookup);
        assert_eq!(lookup.poll(Instant::now()), Some(7));
        assert_eq!(lookup.search_status(), LookupStatus::Idle);
    }

    #[test]
    fn test_empty_search_fails_then_clears() {
        let runtime = Runtime::new().unwrap();
        let services = LookupServices::none().with_search(Arc::new(FixedSearch(Vec::new())));
        let mut lookup = LookupCoordinator::new(runtime.handle().clone(), services, Duration::from_secs(3));

        lookup.search("nothing");
        settle(&lookup);
        let t0 = Instant::now();
        assert_eq!(lookup.poll(t0), None);
        assert_eq!(lookup.search_status(), LookupStatus::Failed { since: t0 });

        lookup.poll(t0 + Duration::from_millis(2999));
        assert!(matches!(lookup.search_status(), LookupStatus::Failed { .. }));
        lookup.poll(t0 + Duration::from_secs(3));
        assert_eq!(lookup.search_status(), LookupStatus::Idle);
    }

    #[test]
    fn test_service_error_is_transient() {
        let runtime = Runtime::new().unwrap();
        let services = LookupServices::none().with_search(Arc::new(FailingSearch));
        let mut lookup = LookupCoordinator::new(runtime.handle().clone(), services, Duration::from_secs(3));

        lookup.search("M31");
        settle(&lookup);
        let t0 = Instant::now();
        assert_eq!(lookup.poll(t0), None);
        assert!(matches!(lookup.search_status(), LookupStatus::Failed { .. }));
        lookup.poll(t0 + Duration::from_secs(4));
        assert_eq!(lookup.search_status(), LookupStatus::Idle);
    }

    #[test]
    fn test_missing_search_service_fails() {
        let runtime = Runtime::new().unwrap();
        let mut lookup =
            LookupCoordinator::new(runtime.handle().clone(), LookupServices::none(), Duration::from_secs(3));
        lookup.search("M31");
        assert_eq!(lookup.poll(Instant::now()), None);
        assert!(matches!(lookup.search_status(), LookupStatus::Failed { .. }));
    }

    #[test]
    fn test_detail_then_article() {
        let runtime = Runtime::new().unwrap();
        let services = LookupServices::none()
            .with_detail(Arc::new(Catalog))
            .with_article(Arc::new(Encyclopedia));
        let mut lookup = LookupCoordinator::new(runtime.handle().clone(), services, Duration::from_secs(3));

        lookup.request_detail(DatasetKind::TwoMrs, 5);
        settle(&lookup);
        lookup.poll(Instant::now());

        assert_eq!(lookup.record().map(|r| r.kind()), Some(DatasetKind::TwoMrs));
        assert_eq!(lookup.article().map(|a| a.title.as_str()), Some("NGC 224"));
        assert_eq!(lookup.detail_status(), LookupStatus::Idle);
    }

    #[test]
    fn test_newer_selection_wins() {
        let runtime = Runtime::new().unwrap();
        let services = LookupServices::none().with_detail(Arc::new(Catalog));
        let mut lookup = LookupCoordinator::new(runtime.handle().clone(), services, Duration::from_secs(3));

        lookup.request_detail(DatasetKind::Simbad, 0);
        lookup.request_detail(DatasetKind::Simbad, 4);
        settle(&lookup);
        std::thread::sleep(Duration::from_millis(400));
        lookup.poll(Instant::now());

        match lookup.record() {
            Some(PointRecord::Simbad(r)) => assert_eq!(r.id, "obj 4"),
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_kind_without_lookup_clears_record() {
        let runtime = Runtime::new().unwrap();
        let services = LookupServices::none().with_detail(Arc::new(Catalog));
        let mut lookup = LookupCoordinator::new(runtime.handle().clone(), services, Duration::from_secs(3));

        lookup.request_detail(DatasetKind::Simbad, 3);
        settle(&lookup);
        lookup.poll(Instant::now());
        assert!(lookup.record().is_some());

        lookup.request_detail(DatasetKind::Gaia, 3);
        assert!(lookup.record().is_none());
        assert!(!lookup.is_busy());
        assert_eq!(lookup.detail_status(), LookupStatus::Idle);
    }
}
