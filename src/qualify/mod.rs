// src/qualify/mod.rs

//! Quality gate applied to a group before its pipeline runs.
//!
//! The dispatcher calls [`Qualifier::qualifies`] with the group's
//! representative file. An `Err` counts as "qualifies": dropping a group
//! because a check tool misbehaved would silently lose data.

pub mod night;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use anyhow::Result;

pub use night::{has_night_data, NightDataQualifier};

pub trait Qualifier: Send + Sync {
    fn qualifies<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>>;
}

/// Gate used when `[qualify]` is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysQualifies;

impl Qualifier for AlwaysQualifies {
    fn qualifies<'a>(
        &'a self,
        _path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>> {
        Box::pin(async { Ok(true) })
    }
}
