// src/config/validate.rs

use globset::Glob;

use crate::config::model::{RawTomfile, Tomfile};
use crate::errors::{Result, TomError};

impl TryFrom<RawTomfile> for Tomfile {
    type Error = TomError;

    fn try_from(raw: RawTomfile) -> std::result::Result<Self, Self::Error> {
        validate_raw_tomfile(&raw)?;
        Ok(Tomfile::new_unchecked(raw))
    }
}

fn validate_raw_tomfile(cfg: &RawTomfile) -> Result<()> {
    validate_build_section(cfg)?;
    validate_scan_patterns(cfg)?;
    validate_environment(cfg)?;
    Ok(())
}

fn validate_build_section(cfg: &RawTomfile) -> Result<()> {
    if cfg.build.jobs == 0 {
        return Err(TomError::Config(
            "[build].jobs must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.build.max_tasks == 0 {
        return Err(TomError::Config(
            "[build].max_tasks must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_scan_patterns(cfg: &RawTomfile) -> Result<()> {
    if cfg.scan.include.is_empty() {
        return Err(TomError::Config(
            "[scan].include must list at least one pattern".to_string(),
        ));
    }

    for pat in cfg.scan.include.iter().chain(cfg.scan.exclude.iter()) {
        Glob::new(pat).map_err(|e| {
            TomError::Config(format!("invalid glob pattern '{}' in [scan]: {}", pat, e))
        })?;
    }
    Ok(())
}

fn validate_environment(cfg: &RawTomfile) -> Result<()> {
    for name in cfg.environment.keys() {
        let valid = !name.is_empty()
            && !name.starts_with(|c: char| c.is_ascii_digit())
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(TomError::Config(format!(
                "[environment] key '{}' is not a valid variable name",
                name
            )));
        }
    }
    Ok(())
}
