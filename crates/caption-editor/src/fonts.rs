//! Font catalog and web-font loading.
//!
//! Loading a family is a retry task: the loader is asked once to fetch the
//! family, then polled on a fixed interval until it reports the face ready or
//! the attempt budget runs out. Tasks advance only from `FontLoads::poll`,
//! which the editor calls from `tick`.

use caption_core::config::EditorConfig;
use caption_core::error::EditorError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Font families offered to the user, as served by the catalog endpoint:
/// `{ "fonts": ["Inter", "Roboto", ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontCatalog {
    #[serde(default)]
    pub fonts: Vec<String>,
}

impl FontCatalog {
    /// Parse a catalog response. Anything unreadable yields an empty catalog.
    pub fn parse(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("font catalog unavailable: {e}");
            Self::default()
        })
    }

    pub fn contains(&self, family: &str) -> bool {
        self.fonts.iter().any(|f| f == family)
    }
}

/// Host side of font loading (stylesheet injection, `document.fonts`).
pub trait FontLoader {
    /// Start fetching `family`.
    fn request(&mut self, family: &str);
    /// Whether a face for `family` can be used for drawing.
    fn is_ready(&self, family: &str) -> bool;
}

/// Loader for hosts that draw with installed fonts: every family is ready.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFonts;

impl FontLoader for SystemFonts {
    fn request(&mut self, _family: &str) {}

    fn is_ready(&self, _family: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStatus {
    Loading { attempts: u32, next_due: u64 },
    Ready,
    Failed,
}

/// All font load tasks of one editor session.
#[derive(Debug, Clone)]
pub struct FontLoads {
    status: HashMap<String, FontStatus>,
    max_attempts: u32,
    interval_ms: u64,
    fallback: String,
}

impl FontLoads {
    pub fn new(max_attempts: u32, interval_ms: u64, fallback: impl Into<String>) -> Self {
        Self {
            status: HashMap::new(),
            max_attempts: max_attempts.max(1),
            interval_ms,
            fallback: fallback.into(),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(
            config.font_retry_attempts,
            config.font_retry_interval_ms,
            config.fallback_font.clone(),
        )
    }

    /// Start loading `family` unless it is already ready or in flight.
    /// A family that failed before gets a fresh attempt budget.
    pub fn load(&mut self, loader: &mut dyn FontLoader, family: &str, now_ms: u64) {
        match self.status.get(family) {
            Some(FontStatus::Ready | FontStatus::Loading { .. }) => return,
            _ => {}
        }
        if loader.is_ready(family) {
            self.status.insert(family.to_owned(), FontStatus::Ready);
            return;
        }
        log::debug!("fonts: loading {family:?}");
        loader.request(family);
        self.status.insert(
            family.to_owned(),
            FontStatus::Loading {
                attempts: 0,
                next_due: now_ms + self.interval_ms,
            },
        );
    }

    /// Probe every due task. Returns the families whose status settled.
    pub fn poll(&mut self, loader: &dyn FontLoader, now_ms: u64) -> Vec<(String, FontStatus)> {
        let mut settled = Vec::new();
        for (family, status) in self.status.iter_mut() {
            let FontStatus::Loading { attempts, next_due } = *status else {
                continue;
            };
            if next_due > now_ms {
                continue;
            }
            let attempts = attempts + 1;
            *status = if loader.is_ready(family) {
                log::debug!("fonts: {family:?} ready after {attempts} probes");
                FontStatus::Ready
            } else if attempts >= self.max_attempts {
                let err = EditorError::FontTimeout {
                    family: family.clone(),
                    attempts,
                };
                log::warn!("{err}; falling back to {:?}", self.fallback);
                FontStatus::Failed
            } else {
                FontStatus::Loading {
                    attempts,
                    next_due: next_due + self.interval_ms,
                }
            };
            if !matches!(status, FontStatus::Loading { .. }) {
                settled.push((family.clone(), *status));
            }
        }
        settled
    }

    /// Abandon every in-flight task.
    pub fn cancel_all(&mut self) {
        let before = self.status.len();
        self.status
            .retain(|_, s| !matches!(s, FontStatus::Loading { .. }));
        let cancelled = before - self.status.len();
        if cancelled > 0 {
            log::debug!("fonts: cancelled {cancelled} load(s)");
        }
    }

    pub fn status(&self, family: &str) -> Option<FontStatus> {
        self.status.get(family).copied()
    }

    pub fn is_ready(&self, family: &str) -> bool {
        self.status(family) == Some(FontStatus::Ready)
    }

    /// The family to draw with: the fallback once loading has failed.
    pub fn resolve<'a>(&'a self, family: &'a str) -> &'a str {
        match self.status(family) {
            Some(FontStatus::Failed) => &self.fallback,
            _ => family,
        }
    }

    pub fn next_due(&self) -> Option<u64> {
        self.status
            .values()
            .filter_map(|s| match s {
                FontStatus::Loading { next_due, .. } => Some(*next_due),
                _ => None,
            })
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    /// Loader that reports the families in `ready` as loaded.
    #[derive(Default)]
    struct FakeLoader {
        requested: Vec<String>,
        ready: HashSet<String>,
    }

    impl FontLoader for FakeLoader {
        fn request(&mut self, family: &str) {
            self.requested.push(family.to_owned());
        }
        fn is_ready(&self, family: &str) -> bool {
            self.ready.contains(family)
        }
    }

    #[test]
    fn catalog_parses_or_degrades() {
        let catalog = FontCatalog::parse(r#"{"fonts": ["Inter", "Roboto"]}"#);
        assert!(catalog.contains("Roboto"));
        assert_eq!(FontCatalog::parse("<html>").fonts, Vec::<String>::new());
        assert_eq!(FontCatalog::parse("{}").fonts, Vec::<String>::new());
    }

    #[test]
    fn load_becomes_ready_on_probe() {
        let mut loader = FakeLoader::default();
        let mut loads = FontLoads::new(20, 100, "Inter");
        loads.load(&mut loader, "Roboto", 0);
        loads.load(&mut loader, "Roboto", 0);
        assert_eq!(loader.requested, vec!["Roboto".to_string()]);

        assert!(loads.poll(&loader, 50).is_empty());
        loader.ready.insert("Roboto".into());
        let settled = loads.poll(&loader, 100);
        assert_eq!(settled, vec![("Roboto".to_string(), FontStatus::Ready)]);
        assert!(loads.is_ready("Roboto"));
    }

    #[test]
    fn load_gives_up_after_budget() {
        let mut loader = FakeLoader::default();
        let mut loads = FontLoads::new(20, 100, "Inter");
        loads.load(&mut loader, "Missing", 0);
        for step in 1..20 {
            loads.poll(&loader, step * 100);
            assert!(matches!(
                loads.status("Missing"),
                Some(FontStatus::Loading { .. })
            ));
        }
        loads.poll(&loader, 2_000);
        assert_eq!(loads.status("Missing"), Some(FontStatus::Failed));
        assert_eq!(loads.resolve("Missing"), "Inter");
        assert_eq!(loads.next_due(), None);
    }

    #[test]
    fn cancel_drops_in_flight_only() {
        let mut loader = FakeLoader::default();
        loader.ready.insert("Inter".into());
        let mut loads = FontLoads::new(20, 100, "Inter");
        loads.load(&mut loader, "Inter", 0);
        loads.load(&mut loader, "Lobster", 0);
        loads.cancel_all();
        assert!(loads.is_ready("Inter"));
        assert_eq!(loads.status("Lobster"), None);
    }
}
