//! Attaches the page-fx behaviors to the current document.
//!
//! Loaded as a WebAssembly module; [`start`] runs on instantiation, waits for
//! the DOM to be ready, then binds copy triggers, section reveal and the hero
//! parallax. Each behavior is installed on its own: one failing is logged and
//! does not stop the others.

use std::cell::RefCell;

use anyhow::Context;
use gloo::events::EventListener;
use page_fx_config::Config;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

mod copy;
mod dom;
mod error;
mod parallax;
mod reveal;

pub use error::WebError;

/// `<script type="application/toml" id="page-fx-config">` holding config overrides
pub const CONFIG_ELEMENT_ID: &str = "page-fx-config";

thread_local! {
    static INSTALLED: RefCell<Option<PageFx>> = const { RefCell::new(None) };
}

/// Everything bound to the page. Dropping it detaches all listeners.
pub struct PageFx {
    copy: Vec<copy::CopyBinding>,
    reveal: Option<reveal::RevealObserver>,
    parallax: Option<parallax::ParallaxBinding>,
}

impl PageFx {
    pub fn copy_triggers(&self) -> usize {
        self.copy.len()
    }

    pub fn reveal_installed(&self) -> bool {
        self.reveal.is_some()
    }

    pub fn parallax_installed(&self) -> bool {
        self.parallax.is_some()
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    run().map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

fn run() -> anyhow::Result<()> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;

    let inline = inline_config(&document);
    let (config, config_error) = resolve_config(inline.as_deref());

    init_logging(config.log_level().unwrap_or(log::Level::Info));
    if let Some(e) = config_error {
        log::warn!("{e:#}; using default config");
    }

    log::info!("page-fx starting up");

    let ready_document = document.clone();
    when_ready(&document, move || {
        let page_fx = install(&window, &ready_document, &config);
        INSTALLED.with(|installed| *installed.borrow_mut() = Some(page_fx));
    });

    Ok(())
}

/// Text of the page's inline config block, if it carries one
fn inline_config(document: &Document) -> Option<String> {
    document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .map(|element| element.text_content().unwrap_or_default())
}

/// Config from the inline block; defaults when it is absent or invalid.
/// An invalid block is returned alongside so the caller can log it.
fn resolve_config(inline: Option<&str>) -> (Config, Option<anyhow::Error>) {
    let Some(content) = inline else {
        return (Config::default(), None);
    };
    match Config::from_toml_str(content)
        .with_context(|| format!("Invalid config in #{CONFIG_ELEMENT_ID}"))
    {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    }
}

#[cfg(target_arch = "wasm32")]
fn init_logging(level: log::Level) {
    // Fails only if a logger is already set, e.g. by the host page's own module
    if let Err(e) = console_log::init_with_level(level) {
        log::debug!("Keeping the existing logger: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging(_level: log::Level) {}

fn when_ready(document: &Document, f: impl FnOnce() + 'static) {
    if document.ready_state() == "loading" {
        EventListener::once(document, "DOMContentLoaded", move |_event| f()).forget();
    } else {
        f();
    }
}

/// Bind all three behaviors to `document`
pub fn install(window: &Window, document: &Document, config: &Config) -> PageFx {
    let copy = copy::install(document, &config.selectors, &config.copy).unwrap_or_else(|e| {
        log::error!("Copy buttons not installed: {e}");
        Vec::new()
    });

    let reveal = reveal::install(document, &config.selectors, &config.reveal).unwrap_or_else(|e| {
        log::error!("Section reveal not installed: {e}");
        None
    });

    let parallax = parallax::install(window, document, &config.selectors, &config.parallax)
        .unwrap_or_else(|e| {
            log::error!("Hero parallax not installed: {e}");
            None
        });

    let page_fx = PageFx {
        copy,
        reveal,
        parallax,
    };
    log::info!(
        "page-fx ready: {} copy trigger(s), reveal {}, parallax {}",
        page_fx.copy_triggers(),
        if page_fx.reveal_installed() { "on" } else { "off" },
        if page_fx.parallax_installed() { "on" } else { "off" },
    );
    page_fx
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_fx_engine::RevertPolicy;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_config_block_uses_defaults() {
        let (config, error) = resolve_config(None);

        assert_eq!(config, Config::default());
        assert!(error.is_none());
    }

    #[test]
    fn test_empty_config_block_uses_defaults() {
        let (config, error) = resolve_config(Some("\n    \n"));

        assert_eq!(config, Config::default());
        assert!(error.is_none());
    }

    #[test]
    fn test_inline_config_overrides_defaults() {
        let inline = r#"
            log_level = "debug"

            [copy]
            revert_policy = "ignore-while-pending"
        "#;

        let (config, error) = resolve_config(Some(inline));

        assert!(error.is_none());
        assert_eq!(config.log_level().unwrap(), log::Level::Debug);
        assert_eq!(config.copy.revert_policy, RevertPolicy::IgnoreWhilePending);
        assert_eq!(config.selectors, Config::default().selectors);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults_and_reports() {
        let (config, error) = resolve_config(Some("[reveal]\nthreshold = 3.0"));

        assert_eq!(config, Config::default());
        let message = format!("{:#}", error.expect("invalid block is reported"));
        assert!(message.starts_with("Invalid config in #page-fx-config"));
        assert!(message.contains("reveal.threshold"));
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let (config, error) = resolve_config(Some("[copy\nidle_label ="));

        assert_eq!(config, Config::default());
        assert!(error.is_some());
    }
}
