use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use resemblance::{Comparator, Pipeline};

use super::{compile_filter, encode_png};
use crate::check::{CheckPlan, SnapshotStatus};
use crate::config::ResolvedRunConfig;
use crate::report::json::{self, JsonEntry, JsonSummary};
use crate::report::terminal::{self, Tally};
use crate::store::{DiagnosticKind, Store};

/// `resemblance check`: compare every current image with its reference.
/// Returns exit code: 0 = all pass, 1 = any fail, new or error.
pub async fn check(
    store: Store,
    config: ResolvedRunConfig,
    filter: Option<&str>,
    as_json: bool,
) -> Result<i32> {
    let pattern = compile_filter(filter)?;
    let plan = CheckPlan::plan(&store, pattern.as_ref());
    let missing = plan.missing().to_vec();

    let pipeline = Pipeline {
        comparator: Comparator::new(config.options),
        normalize_scale: config.normalize_scale,
        region: config.region,
    };

    let run_start = Instant::now();
    let mut tally = Tally {
        total: plan.total(),
        missing: missing.len(),
        ..Default::default()
    };
    let total = tally.total;
    let mut rx = plan.execute(store.clone(), pipeline, config.parallel)?;

    let mut done = 0usize;
    let mut failed_names: Vec<String> = Vec::new();
    let mut new_names: Vec<String> = Vec::new();
    let mut errored_names: Vec<String> = Vec::new();
    let mut entries: Vec<JsonEntry> = Vec::new();

    debug!(total, root = %store.root().display(), "waiting for check results");
    while let Some((job, result)) = rx.recv().await {
        done += 1;
        let name = job.id;
        debug!(done, total, name = %name, "received result");

        match &result.status {
            SnapshotStatus::Pass { .. } => store.clean_difference(&name),
            SnapshotStatus::Fail { .. } | SnapshotStatus::Resized { .. } => {
                store.clean_difference(&name);
                if let Some(d) = &result.diagnostics {
                    store.write_difference(&name, DiagnosticKind::Debug, &encode_png(&d.debug)?)?;
                    store.write_difference(&name, DiagnosticKind::Mask, &encode_png(&d.mask)?)?;
                }
                failed_names.push(name.clone());
            }
            SnapshotStatus::New => new_names.push(name.clone()),
            SnapshotStatus::Error { .. } => errored_names.push(name.clone()),
        }
        tally.record(&result.status);

        if !as_json {
            terminal::print_line(&name, &result.status, result.elapsed);
            terminal::show_progress(done, total);
        }
        entries.push(JsonEntry {
            id: name,
            status: result.status,
            elapsed_ms: result.elapsed.as_millis() as u64,
        });
    }

    if as_json {
        json::print(&JsonSummary::new(&tally, entries, &missing, run_start.elapsed()))?;
    } else {
        for id in &missing {
            terminal::print_missing_line(id);
        }
        failed_names.sort();
        new_names.sort();
        errored_names.sort();
        terminal::print_actionable_summary(&failed_names, &new_names, &errored_names, &missing);
        terminal::print_summary(&tally, run_start.elapsed());
    }

    Ok(tally.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use resemblance::{CompareOptions, Region};

    fn config() -> ResolvedRunConfig {
        ResolvedRunConfig {
            options: CompareOptions::default(),
            normalize_scale: false,
            region: Region::Full,
            parallel: 2,
        }
    }

    fn png(color: [u8; 4]) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(6, 6, Rgba(color))).unwrap()
    }

    #[tokio::test]
    async fn failing_image_gets_diagnostics_and_exit_one() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        store.write_reference("ok", &png([1, 2, 3, 255])).unwrap();
        store.write_current("ok", &png([1, 2, 3, 255])).unwrap();
        store.write_reference("bad", &png([1, 2, 3, 255])).unwrap();
        store.write_current("bad", &png([200, 2, 3, 255])).unwrap();

        let code = check(store.clone(), config(), None, true).await.unwrap();
        assert_eq!(code, 1);
        assert!(store.has_difference("bad"));
        assert!(store.difference_path("bad", DiagnosticKind::Mask).exists());
        assert!(!store.has_difference("ok"));
    }

    #[tokio::test]
    async fn passing_run_clears_stale_diagnostics() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        store.write_reference("ok", &png([1, 2, 3, 255])).unwrap();
        store.write_current("ok", &png([1, 2, 3, 255])).unwrap();
        store.write_difference("ok", DiagnosticKind::Debug, b"stale").unwrap();
        store.write_reference("gone", &png([1, 2, 3, 255])).unwrap();

        let code = check(store.clone(), config(), None, true).await.unwrap();
        assert_eq!(code, 0, "missing references do not fail the run");
        assert!(!store.has_difference("ok"));
    }

    #[tokio::test]
    async fn invalid_filter_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let result = check(Store::new(tmp.path()), config(), Some("[unclosed"), true).await;
        assert!(result.is_err());
    }
}
