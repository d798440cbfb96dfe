use std::path::Path;

use anyhow::{Context, Result};

use super::CONFIG_FILE;

/// Hand-crafted config template with commented-out keys.
/// Written by `resemblance init` so users can see every knob without
/// uncommenting section headers.
const CONFIG_TEMPLATE: &str = r#"# ─────────────────────────────────────────────────────────
# Comparison (all fields optional).
# ─────────────────────────────────────────────────────────
[compare]
# ignore_colors = false             # compare brightness only
# large_image_sample_step = 1       # stride for images above the threshold
# large_image_threshold = 1200      # px, either dimension
# normalize_scale = false           # resample @2x/@3x captures to 1x first
# region = "full"                   # full | center | top-left | top-right | bottom-left | bottom-right

# ─────────────────────────────────────────────────────────
# Batch check (all fields optional).
# ─────────────────────────────────────────────────────────
[check]
# parallel = 4                      # concurrent comparisons
"#;

pub fn config_file_exists(dir: &Path) -> bool {
    dir.join(CONFIG_FILE).exists()
}

pub fn write_gitignore(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(".gitignore");
    if !force && path.exists() {
        return Ok(());
    }
    std::fs::write(&path, "current/\ndifference/\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn write_template(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(CONFIG_FILE);
    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
