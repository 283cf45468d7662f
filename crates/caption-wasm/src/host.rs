//! Browser implementations of the editor's host collaborators.

use caption_core::error::{EditorError, Result};
use caption_editor::{Clock, FontLoader, SessionStorage};
use wasm_bindgen::JsValue;

fn storage_error(e: JsValue) -> EditorError {
    EditorError::Storage(format!("{e:?}"))
}

/// Wall clock from `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebStorage;

impl WebStorage {
    fn storage(&self) -> Result<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| EditorError::Storage("no window".into()))?
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| EditorError::Storage("localStorage unavailable".into()))
    }
}

impl SessionStorage for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?.get_item(key).map_err(storage_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage()?.set_item(key, value).map_err(storage_error)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage()?.remove_item(key).map_err(storage_error)
    }
}

/// Loads Google Fonts families by injecting their stylesheet, then asks
/// `document.fonts` whether a face is usable.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebFontLoader;

fn font_query(family: &str) -> String {
    format!("16px \"{family}\"")
}

/// Stylesheet URL for a family: spaces become `+`.
pub fn stylesheet_url(family: &str) -> String {
    let family = family.split_whitespace().collect::<Vec<_>>().join("+");
    format!("https://fonts.googleapis.com/css2?family={family}&display=swap")
}

fn link_id(family: &str) -> String {
    format!("gf-{}", family.split_whitespace().collect::<Vec<_>>().join("-"))
}

impl FontLoader for WebFontLoader {
    fn request(&mut self, family: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let id = link_id(family);
        if document.get_element_by_id(&id).is_none() {
            let injected = document.create_element("link").and_then(|link| {
                link.set_id(&id);
                link.set_attribute("rel", "stylesheet")?;
                link.set_attribute("href", &stylesheet_url(family))?;
                match document.head() {
                    Some(head) => head.append_child(&link).map(|_| ()),
                    None => Err(JsValue::from_str("document has no <head>")),
                }
            });
            if let Err(e) = injected {
                log::warn!("could not request font {family:?}: {e:?}");
                return;
            }
        }
        let _ = document.fonts().load(&font_query(family));
    }

    fn is_ready(&self, family: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .is_some_and(|d| d.fonts().check(&font_query(family)).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stylesheet_url_joins_words() {
        assert_eq!(
            stylesheet_url("Press Start 2P"),
            "https://fonts.googleapis.com/css2?family=Press+Start+2P&display=swap"
        );
        assert_eq!(link_id("Mea Culpa"), "gf-Mea-Culpa");
    }
}
