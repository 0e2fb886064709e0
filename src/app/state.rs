use crate::api::MatchApi;
use crate::errors::ClientError;
use crate::results::{
    export_to_spreadsheet, MatchResult, RequestId, ResultSet, EXPORT_FILE_NAME,
};
use crate::session::SessionStore;
use crate::upload::{FileSelection, UploadOrchestrator};
use crate::utils::task;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tracing::warn;

/// Everything the authenticated workspace holds: the current file picks,
/// the upload in flight and the last successful result set.
pub struct WorkspaceState {
    pub selection: FileSelection,
    pub error_message: Option<String>,
    pub status_message: Option<String>,
    orchestrator: UploadOrchestrator,
    results: Option<ResultSet>,
    export_dir: PathBuf,
}

impl WorkspaceState {
    pub fn new(api: Arc<dyn MatchApi>, export_dir: PathBuf) -> Self {
        Self {
            selection: FileSelection::default(),
            error_message: None,
            status_message: None,
            orchestrator: UploadOrchestrator::new(api),
            results: None,
            export_dir,
        }
    }

    /// Validates the selection and starts an upload. Nothing is sent when the
    /// selection is incomplete or there is no session.
    pub fn submit(&mut self, session: &SessionStore) -> Result<(), ClientError> {
        let selection = self.selection.validate_for_submit()?;
        self.orchestrator.submit(selection, session)
    }

    /// Applies a settled upload. Returns the number of results on success.
    ///
    /// Results that belong to an earlier session are dropped.
    pub fn poll(&mut self, session: &SessionStore) -> Option<Result<usize, ClientError>> {
        let settled = self.orchestrator.poll()?;
        if !session.is_current(&settled.ticket) {
            warn!("Discarding upload result from a previous session");
            return None;
        }

        match settled.result {
            Ok(outcome) => {
                let count = outcome.results.len();
                match &mut self.results {
                    Some(set) => set.replace(outcome.request_id, outcome.results),
                    None => {
                        self.results = Some(ResultSet::new(outcome.request_id, outcome.results))
                    }
                }
                Some(Ok(count))
            }
            Err(e) => Some(Err(e)),
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.orchestrator.is_busy()
    }

    pub fn progress(&self) -> u8 {
        self.orchestrator.progress()
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    pub fn results_mut(&mut self) -> Option<&mut ResultSet> {
        self.results.as_mut()
    }

    pub fn default_export_path(&self) -> PathBuf {
        self.export_dir.join(EXPORT_FILE_NAME)
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn export(&self, path: &Path) -> Result<PathBuf, ClientError> {
        let results = self.results.as_ref().map(|r| r.results()).unwrap_or(&[]);
        export_to_spreadsheet(results, path)
    }

    pub fn download_url(
        &self,
        request_id: &RequestId,
        result: &MatchResult,
    ) -> Result<Url, ClientError> {
        self.orchestrator
            .api()
            .download_url(request_id, &result.resume_filename)
    }
}

/// The pre-login page. Fetches the service banner once in the background.
pub struct LandingState {
    pub service_status: Option<Result<String, String>>,
    pending: Option<Receiver<Result<String, ClientError>>>,
}

impl LandingState {
    pub fn new(api: Arc<dyn MatchApi>) -> Self {
        let pending = task::spawn(move || async move { api.health().await });
        Self {
            service_status: None,
            pending: Some(pending),
        }
    }

    pub fn poll(&mut self) {
        let Some(receiver) = &self.pending else {
            return;
        };
        if let Some(result) = task::try_take(receiver) {
            self.service_status = Some(result.map_err(|e| e.to_string()));
            self.pending = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;
    use crate::testing::{
        ann_and_bob, logged_in_session, outcome, result, selection_in, wait_for, FakeMatchApi,
    };
    use std::time::Duration;

    fn workspace(api: &Arc<FakeMatchApi>, dir: &Path) -> WorkspaceState {
        WorkspaceState::new(Arc::clone(api) as Arc<dyn MatchApi>, dir.to_path_buf())
    }

    fn many(n: usize, request_id: &str) -> crate::upload::UploadOutcome {
        let results: Vec<_> = (0..n)
            .map(|i| result("C", &format!("c{i}@x.com"), 50.0, "Eng", &format!("{i}.pdf")))
            .collect();
        outcome(&results, request_id)
    }

    #[test]
    fn test_example_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeMatchApi::succeeding(ann_and_bob()));
        let mut workspace = workspace(&api, dir.path());
        let session = logged_in_session();
        workspace.selection = selection_in(dir.path(), &["a.pdf", "b.pdf"]);

        workspace.submit(&session).unwrap();
        let count = wait_for(|| workspace.poll(&session)).unwrap();

        assert_eq!(count, 2);
        let results = workspace.results().unwrap();
        assert_eq!(results.request_id().as_str(), "r1");
        assert_eq!(results.pager().current_page(), 1);
        assert_eq!(results.pager().current_items().len(), 2);

        let url = workspace
            .download_url(results.request_id(), &results.results()[0])
            .unwrap();
        assert_eq!(url.path(), "/download/r1/a.pdf");
    }

    #[test]
    fn test_missing_input_makes_no_request() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeMatchApi::succeeding(ann_and_bob()));
        let mut workspace = workspace(&api, dir.path());
        let session = logged_in_session();

        let err = workspace.submit(&session).unwrap_err();

        assert!(matches!(err, ClientError::MissingInput));
        assert!(!workspace.is_uploading());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(api.uploads(), 0);
    }

    #[test]
    fn test_missing_input_is_reported_before_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeMatchApi::succeeding(ann_and_bob()));
        let mut workspace = workspace(&api, dir.path());
        let session = SessionStore::hydrate(Box::new(MemoryStorage::new()));

        assert!(matches!(
            workspace.submit(&session),
            Err(ClientError::MissingInput)
        ));

        workspace.selection = selection_in(dir.path(), &["a.pdf"]);
        assert!(matches!(
            workspace.submit(&session),
            Err(ClientError::Unauthenticated)
        ));
    }

    #[test]
    fn test_failed_upload_keeps_previous_results() {
        let dir = tempfile::tempdir().unwrap();
        let session = logged_in_session();
        let first = Arc::new(FakeMatchApi::succeeding(ann_and_bob()));
        let mut workspace = workspace(&first, dir.path());
        workspace.selection = selection_in(dir.path(), &["a.pdf", "b.pdf"]);
        workspace.submit(&session).unwrap();
        wait_for(|| workspace.poll(&session)).unwrap();

        // swap in a failing service but keep the stored results
        let failing = Arc::new(FakeMatchApi::failing("boom"));
        let previous = workspace.results.take();
        let selection = workspace.selection.clone();
        let mut workspace =
            WorkspaceState::new(failing as Arc<dyn MatchApi>, dir.path().to_path_buf());
        workspace.results = previous;
        workspace.selection = selection;

        workspace.submit(&session).unwrap();
        let err = wait_for(|| workspace.poll(&session)).unwrap_err();

        assert!(matches!(err, ClientError::UploadFailed(_)));
        let results = workspace.results().unwrap();
        assert_eq!(results.request_id().as_str(), "r1");
        assert_eq!(results.results().len(), 2);
        assert!(!workspace.is_uploading());
    }

    #[test]
    fn test_new_results_reset_page() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeMatchApi::succeeding(many(25, "r2")));
        let mut workspace = workspace(&api, dir.path());
        let session = logged_in_session();
        workspace.selection = selection_in(dir.path(), &["a.pdf"]);

        workspace.submit(&session).unwrap();
        wait_for(|| workspace.poll(&session)).unwrap();
        workspace.results_mut().unwrap().pager_mut().go_to(3);
        assert_eq!(workspace.results().unwrap().pager().current_page(), 3);

        workspace.submit(&session).unwrap();
        wait_for(|| workspace.poll(&session)).unwrap();
        assert_eq!(workspace.results().unwrap().pager().current_page(), 1);
        assert_eq!(api.uploads(), 2);
    }

    #[test]
    fn test_result_arriving_after_logout_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(
            FakeMatchApi::succeeding(ann_and_bob()).with_delay(Duration::from_millis(100)),
        );
        let mut workspace = workspace(&api, dir.path());
        let mut session = logged_in_session();
        workspace.selection = selection_in(dir.path(), &["a.pdf"]);

        workspace.submit(&session).unwrap();
        session.logout().unwrap();

        wait_for(|| {
            (!workspace.is_uploading() || workspace.poll(&session).is_some()).then_some(())
        });
        assert!(workspace.results().is_none());
    }

    #[test]
    fn test_export_without_results_is_nothing_to_export() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeMatchApi::succeeding(ann_and_bob()));
        let workspace = workspace(&api, dir.path());

        let err = workspace.export(&workspace.default_export_path()).unwrap_err();

        assert!(matches!(err, ClientError::NothingToExport));
        assert!(!workspace.default_export_path().exists());
    }

    #[test]
    fn test_export_after_upload_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeMatchApi::succeeding(many(12, "r3")));
        let mut workspace = workspace(&api, dir.path());
        let session = logged_in_session();
        workspace.selection = selection_in(dir.path(), &["a.pdf"]);
        workspace.submit(&session).unwrap();
        wait_for(|| workspace.poll(&session)).unwrap();

        let path = workspace.export(&workspace.default_export_path()).unwrap();

        assert!(path.ends_with(EXPORT_FILE_NAME));
        assert!(path.exists());
    }

    #[test]
    fn test_landing_fetches_service_status() {
        let api = Arc::new(FakeMatchApi::succeeding(ann_and_bob()));
        let mut landing = LandingState::new(api as Arc<dyn MatchApi>);
        wait_for(|| {
            landing.poll();
            landing.service_status.clone()
        });
        assert_eq!(
            landing.service_status,
            Some(Ok("Resume Matcher Backend".to_string()))
        );
    }
}
