//! Session-owned template registry and detection cache.
//!
//! Definitions are cached per source identity together with the source's
//! last-modified stamp at detection time. A cached entry stays valid while
//! the source's current stamp is not newer than the recorded one; a newer
//! stamp forces full re-detection.

use crate::template::TemplateDefinition;
use crate::trace::trace_event;
use crate::util::{HoleMatchError, HoleMatchResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cached definition and the source stamp it was detected from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub last_modified: u64,
    pub definition: TemplateDefinition,
}

impl CacheEntry {
    /// Valid while the source has not been modified after detection.
    pub fn is_valid_for(&self, last_modified: u64) -> bool {
        last_modified <= self.last_modified
    }
}

/// Template definitions known to one working session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRegistry {
    by_source: BTreeMap<String, CacheEntry>,
}

impl TemplateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached sources.
    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }

    /// Returns the cached definition if it is still valid for `last_modified`.
    pub fn lookup(&self, identity: &str, last_modified: u64) -> Option<&TemplateDefinition> {
        self.by_source
            .get(identity)
            .filter(|entry| entry.is_valid_for(last_modified))
            .map(|entry| &entry.definition)
    }

    /// Records a definition for a source, replacing any previous entry.
    pub fn insert(
        &mut self,
        identity: impl Into<String>,
        last_modified: u64,
        definition: TemplateDefinition,
    ) {
        self.by_source.insert(
            identity.into(),
            CacheEntry {
                last_modified,
                definition,
            },
        );
    }

    /// Returns the cached definition or runs `detect` and caches its result.
    ///
    /// Detection errors are returned and leave the cache untouched.
    pub fn get_or_detect<F>(
        &mut self,
        identity: &str,
        last_modified: u64,
        detect: F,
    ) -> HoleMatchResult<&TemplateDefinition>
    where
        F: FnOnce() -> HoleMatchResult<TemplateDefinition>,
    {
        let valid = self
            .by_source
            .get(identity)
            .is_some_and(|entry| entry.is_valid_for(last_modified));
        if valid {
            trace_event!("cache_hit", last_modified = last_modified);
        } else {
            trace_event!("cache_miss", last_modified = last_modified);
            let definition = detect()?;
            self.insert(identity, last_modified, definition);
        }
        self.by_source
            .get(identity)
            .map(|entry| &entry.definition)
            .ok_or(HoleMatchError::TemplateNotFound {
                template_id: identity.to_owned(),
            })
    }

    /// Finds a definition by its template id.
    pub fn template(&self, template_id: &str) -> Option<&TemplateDefinition> {
        self.by_source
            .values()
            .map(|entry| &entry.definition)
            .find(|def| def.id == template_id)
    }

    /// Drops the entry for a source, returning it if present.
    pub fn invalidate(&mut self, identity: &str) -> Option<CacheEntry> {
        self.by_source.remove(identity)
    }
}
