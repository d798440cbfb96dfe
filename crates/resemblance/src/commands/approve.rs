use anyhow::{Result, bail};

use super::compile_filter;
use crate::check::CheckJob;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    New,
    Failed,
    Unchanged,
}

/// `resemblance approve`: promote current/ images to reference/.
pub fn approve(store: &Store, filter: Option<&str>) -> Result<usize> {
    let pattern = compile_filter(filter)?;
    let ids = store.list_current_ids();
    if ids.is_empty() {
        println!("Nothing to approve, current/ is empty.");
        return Ok(0);
    }

    let selected: Vec<(&str, Kind)> = ids
        .iter()
        .filter(|id| {
            pattern
                .as_ref()
                .is_none_or(|p| CheckJob::new(id.as_str()).matches_filter(p))
        })
        .map(|id| {
            let kind = if store.has_difference(id) {
                Kind::Failed
            } else if store.read_reference(id).is_none() {
                Kind::New
            } else {
                Kind::Unchanged
            };
            (id.as_str(), kind)
        })
        .collect();

    if selected.is_empty() {
        println!("No images matched the given filter.");
        return Ok(0);
    }

    let mut count_new = 0usize;
    let mut count_failed = 0usize;

    for (id, kind) in &selected {
        let Some(png) = store.read_current(id) else {
            bail!("Could not read current/{id}.png");
        };
        store.write_reference(id, &png)?;
        let label = match kind {
            Kind::Failed => {
                count_failed += 1;
                "\x1b[31mFAIL\x1b[0m"
            }
            Kind::New => {
                count_new += 1;
                "\x1b[33m NEW\x1b[0m"
            }
            Kind::Unchanged => "    ",
        };
        println!("  Approved  {label}  {id}");
    }

    let total = selected.len();
    println!();
    println!("{total} image(s) approved ({count_new} new, {count_failed} failed).");

    Ok(total)
}
