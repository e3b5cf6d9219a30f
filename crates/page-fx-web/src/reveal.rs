use js_sys::Array;
use page_fx_config::Selectors;
use page_fx_engine::{IntersectionSample, RevealSettings, RevealTracker, SectionId};
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::dom;
use crate::error::WebError;

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// The shared viewport observer for all content sections
pub struct RevealObserver {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl Drop for RevealObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub fn install(
    document: &Document,
    selectors: &Selectors,
    settings: &RevealSettings,
) -> Result<Option<RevealObserver>, WebError> {
    let sections = dom::query_all(document, &selectors.section)?;
    if sections.is_empty() {
        log::debug!("No sections match `{}`, reveal skipped", selectors.section);
        return Ok(None);
    }

    let mut tracker = RevealTracker::new(settings.threshold);
    for _ in &sections {
        tracker.register();
    }

    let callback = on_intersection(sections.clone(), tracker, settings.visible_class.clone());

    let init = IntersectionObserverInit::new();
    init.set_root_margin(&settings.root_margin);
    init.set_threshold(&JsValue::from_f64(settings.threshold));

    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
        .map_err(|e| WebError::js("could not create IntersectionObserver", &e))?;

    for section in &sections {
        observer.observe(section);
    }

    log::debug!("Watching {} section(s) for reveal", sections.len());
    Ok(Some(RevealObserver {
        observer,
        _callback: callback,
    }))
}

fn on_intersection(
    sections: Vec<Element>,
    mut tracker: RevealTracker,
    visible_class: String,
) -> ObserverCallback {
    Closure::new(move |entries: Array, observer: IntersectionObserver| {
        let samples: Vec<IntersectionSample> = entries
            .iter()
            .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
            .filter_map(|entry| {
                let target = entry.target();
                let index = sections.iter().position(|section| *section == target)?;
                Some(IntersectionSample {
                    section: SectionId(index),
                    is_intersecting: entry.is_intersecting(),
                    ratio: entry.intersection_ratio(),
                })
            })
            .collect();

        for SectionId(index) in tracker.process(samples) {
            let section = &sections[index];
            if let Err(e) = section.class_list().add_1(&visible_class) {
                log::warn!("{}", WebError::js("could not mark section visible", &e));
            }
            observer.unobserve(section);
        }

        if tracker.is_settled() {
            log::debug!("All sections revealed");
            observer.disconnect();
        }
    })
}
