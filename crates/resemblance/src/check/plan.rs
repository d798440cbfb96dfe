use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

use resemblance::Pipeline;

use super::job::CheckJob;
use super::runner::{CheckResult, check_all};
use crate::store::Store;

/// Work for one `check` run: current images to compare, and references that
/// have no current image.
pub struct CheckPlan {
    jobs: Vec<CheckJob>,
    missing: Vec<String>,
}

impl CheckPlan {
    pub fn plan(store: &Store, filter: Option<&glob::Pattern>) -> Self {
        let keep = |job: &CheckJob| filter.is_none_or(|p| job.matches_filter(p));

        let current = store.list_current_ids();
        let jobs: Vec<CheckJob> = current
            .iter()
            .map(CheckJob::new)
            .filter(|job| keep(job))
            .collect();

        let missing: Vec<String> = store
            .list_reference_ids()
            .into_iter()
            .filter(|id| !current.contains(id))
            .filter(|id| keep(&CheckJob::new(id.as_str())))
            .collect();

        debug!(jobs = jobs.len(), missing = missing.len(), "planned check");
        Self { jobs, missing }
    }

    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    /// References with no current image.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Start comparing. Results stream in as each comparison finishes.
    pub fn execute(
        self,
        store: Store,
        pipeline: Pipeline,
        parallel: usize,
    ) -> Result<mpsc::Receiver<(CheckJob, CheckResult)>> {
        check_all(self.jobs, store, pipeline, parallel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(plan: &CheckPlan) -> Vec<&str> {
        plan.jobs.iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn splits_jobs_and_missing_references() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        store.write_reference("a", b"x").unwrap();
        store.write_reference("gone", b"x").unwrap();
        store.write_current("a", b"x").unwrap();
        store.write_current("fresh", b"x").unwrap();

        let plan = CheckPlan::plan(&store, None);
        assert_eq!(ids(&plan), ["a", "fresh"]);
        assert_eq!(plan.missing(), ["gone"]);
    }

    #[test]
    fn filter_applies_to_both_lists() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        store.write_reference("maps/gone", b"x").unwrap();
        store.write_reference("other/gone", b"x").unwrap();
        store.write_current("maps/a", b"x").unwrap();
        store.write_current("other/b", b"x").unwrap();

        let pattern = glob::Pattern::new("maps/*").unwrap();
        let plan = CheckPlan::plan(&store, Some(&pattern));
        assert_eq!(plan.total(), 1);
        assert_eq!(ids(&plan), ["maps/a"]);
        assert_eq!(plan.missing(), ["maps/gone"]);
    }
}
