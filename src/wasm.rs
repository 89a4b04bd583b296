//! WASM bindings for enhancing pages in the browser.
//!
//! The host page fetches `toc.json` itself and hands the text over, so the
//! binding never performs I/O.

use wasm_bindgen::prelude::*;

use crate::config::{EnhanceOptions, PageConfig, Profile};
use crate::source::StaticSource;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Enhance a page's HTML and return the rewritten document.
///
/// `toc_json` is the text of the cross-reference table, or `undefined` when
/// it could not be fetched; placeholders are then left unresolved.
#[wasm_bindgen]
pub fn enhance_page(html: &str, root: bool, toc_json: Option<String>) -> Result<String, JsValue> {
    enhance_page_with_profile(html, root, "full", toc_json)
}

/// Enhance a page with the given profile (`full`, `no-cross-refs`, `minimal`).
#[wasm_bindgen]
pub fn enhance_page_with_profile(
    html: &str,
    root: bool,
    profile: &str,
    toc_json: Option<String>,
) -> Result<String, JsValue> {
    let profile: Profile = profile.parse().map_err(|e: String| JsValue::from_str(&e))?;
    let options = EnhanceOptions::new(PageConfig { root }).with_profile(profile);
    let source = match toc_json {
        Some(json) => StaticSource::from_json(&json),
        None => StaticSource::failed("toc.json not provided"),
    };

    let (output, _) = crate::enhance_html(html, &options, &source)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(output)
}
