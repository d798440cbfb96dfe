use std::path::Path;

use anyhow::{Result, bail};

use crate::config;

/// `resemblance init`: create .resemblance/config.toml.
pub fn init(dir: &Path, force: bool) -> Result<()> {
    if !force && config::config_file_exists(dir) {
        bail!(
            "{}/config.toml already exists (use --force to overwrite)",
            dir.display()
        );
    }

    config::write_template(dir)?;
    config::write_gitignore(dir, force)?;

    let verb = if force { "Regenerated" } else { "Created" };
    println!("{verb} {}/config.toml", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".resemblance");
        init(&dir, false).unwrap();
        assert!(dir.join(".gitignore").exists());
        assert!(init(&dir, false).is_err());
        init(&dir, true).unwrap();
    }
}
