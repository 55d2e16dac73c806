// src/qualify/night.rs

//! Day/night check for VIIRS granules.
//!
//! `h5dump -x -A <file>` prints the file's attributes as XML. A granule holds
//! night data when any `Ascending/Descending_Indicator` attribute carries a
//! value other than `0`.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::debug;

use crate::exec::CommandRunner;
use crate::qualify::Qualifier;

const INDICATOR_ATTRIBUTE: &str =
    r#"(?s)<(?:[\w-]+:)?Attribute\b[^>]*\bName="[^"]*Ascending/Descending_Indicator[^"]*"[^>]*>(.*?)</(?:[\w-]+:)?Attribute>"#;
const DATA_FROM_FILE: &str = r"(?s)<(?:[\w-]+:)?DataFromFile>(.*?)</(?:[\w-]+:)?DataFromFile>";
const DOCUMENT: &str = r"<\?xml\b|<(?:[\w-]+:)?HDF5-File\b";

pub struct NightDataQualifier {
    h5dump: String,
    runner: Arc<dyn CommandRunner>,
    scan: IndicatorScan,
}

impl std::fmt::Debug for NightDataQualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NightDataQualifier")
            .field("h5dump", &self.h5dump)
            .finish_non_exhaustive()
    }
}

impl NightDataQualifier {
    pub fn new(h5dump: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        Ok(Self {
            h5dump: h5dump.into(),
            runner,
            scan: IndicatorScan::new()?,
        })
    }
}

impl Qualifier for NightDataQualifier {
    fn qualifies<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>> {
        Box::pin(async move {
            let args = vec![
                "-x".to_string(),
                "-A".to_string(),
                path.to_string_lossy().into_owned(),
            ];
            let output = self
                .runner
                .run(&self.h5dump, &args)
                .await
                .with_context(|| format!("running {} on {:?}", self.h5dump, path))?;

            if !output.success() {
                return Err(anyhow!(
                    "{} exited with {:?}: {}",
                    self.h5dump,
                    output.code,
                    output.stderr.trim()
                ));
            }

            let night = self
                .scan
                .night(&output.stdout)
                .with_context(|| format!("reading {} output for {:?}", self.h5dump, path))?;
            debug!(?path, night, "day/night indicator checked");
            Ok(night)
        })
    }
}

/// Standalone form of the attribute scan, for callers holding XML already.
///
/// Output that is not an h5dump XML document is an error, never "day".
pub fn has_night_data(xml: &str) -> Result<bool> {
    IndicatorScan::new()?.night(xml)
}

struct IndicatorScan {
    document: Regex,
    attribute: Regex,
    data: Regex,
}

impl IndicatorScan {
    fn new() -> Result<Self> {
        Ok(Self {
            document: Regex::new(DOCUMENT).context("compiling document regex")?,
            attribute: Regex::new(INDICATOR_ATTRIBUTE).context("compiling attribute regex")?,
            data: Regex::new(DATA_FROM_FILE).context("compiling data regex")?,
        })
    }

    fn night(&self, xml: &str) -> Result<bool> {
        if !self.document.is_match(xml) {
            return Err(anyhow!("not an h5dump XML document"));
        }
        Ok(self
            .attribute
            .captures_iter(xml)
            .filter_map(|attr| attr.get(1))
            .flat_map(|body| self.data.captures_iter(body.as_str()))
            .filter_map(|data| data.get(1))
            .any(|value| value.as_str().trim() != "0"))
    }
}
