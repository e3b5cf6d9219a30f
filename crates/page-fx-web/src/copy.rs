//! Copy-to-clipboard triggers.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use page_fx_config::Selectors;
use page_fx_engine::{ClickOutcome, CopyButton, CopyEffect, CopySettings, TargetRef};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, Element};

use crate::dom;
use crate::error::WebError;

/// A bound trigger. The click listener is removed when this is dropped.
pub struct CopyBinding {
    _trigger: Rc<Trigger>,
    _listener: EventListener,
}

struct Trigger {
    element: Element,
    /// Resolved once at bind time
    target: Option<Element>,
    button: RefCell<CopyButton>,
    /// At most one pending revert; replacing it cancels the previous timer
    revert: RefCell<Option<Timeout>>,
}

pub fn install(
    document: &Document,
    selectors: &Selectors,
    settings: &CopySettings,
) -> Result<Vec<CopyBinding>, WebError> {
    let triggers = dom::query_all(document, &selectors.copy_trigger)?;

    let bindings: Vec<CopyBinding> = triggers
        .into_iter()
        .map(|element| {
            let target = resolve_target(document, &element, &selectors.copy_target_attribute);
            bind(element, target, settings.clone())
        })
        .collect();

    log::debug!(
        "Bound {} copy trigger(s) matching `{}`",
        bindings.len(),
        selectors.copy_trigger
    );
    Ok(bindings)
}

fn resolve_target(document: &Document, trigger: &Element, attribute: &str) -> Option<Element> {
    let target_ref = TargetRef::from_attribute(trigger.get_attribute(attribute).as_deref());
    resolve_target_with(
        &target_ref,
        |id| document.get_element_by_id(id),
        || trigger.previous_element_sibling(),
    )
}

/// An explicit id never falls back to the sibling: a dangling id leaves the
/// trigger without a target.
fn resolve_target_with<E>(
    target_ref: &TargetRef,
    by_id: impl FnOnce(&str) -> Option<E>,
    preceding_sibling: impl FnOnce() -> Option<E>,
) -> Option<E> {
    match target_ref {
        TargetRef::Id(id) => {
            let target = by_id(id);
            if target.is_none() {
                log::warn!("Copy trigger points at #{id}, which is not in the document");
            }
            target
        }
        TargetRef::PrecedingSibling => preceding_sibling(),
    }
}

fn bind(element: Element, target: Option<Element>, settings: CopySettings) -> CopyBinding {
    let trigger = Rc::new(Trigger {
        element,
        target,
        button: RefCell::new(CopyButton::new(settings)),
        revert: RefCell::new(None),
    });

    let handler = Rc::clone(&trigger);
    let listener = EventListener::new(&trigger.element, "click", move |_event| {
        Trigger::click(&handler);
    });

    CopyBinding {
        _trigger: trigger,
        _listener: listener,
    }
}

impl Trigger {
    fn click(trigger: &Rc<Trigger>) {
        let text = trigger
            .target
            .as_ref()
            .map(|target| target.text_content().unwrap_or_default());

        let outcome = trigger.button.borrow_mut().click(text);
        match outcome {
            Err(e) => log::error!("{e}"),
            Ok(ClickOutcome::Ignored) => log::debug!("Copy ignored, revert still pending"),
            Ok(ClickOutcome::Write(text)) => {
                let trigger = Rc::clone(trigger);
                spawn_local(async move {
                    match write_clipboard(&text).await {
                        Ok(()) => {
                            let effects = trigger.button.borrow_mut().write_succeeded();
                            Trigger::apply(&trigger, effects);
                        }
                        Err(e) => {
                            let error = trigger.button.borrow().write_failed(e.to_string());
                            log::error!("{error}");
                        }
                    }
                });
            }
        }
    }

    fn apply(trigger: &Rc<Trigger>, effects: Vec<CopyEffect>) {
        for effect in effects {
            match effect {
                CopyEffect::SetLabel(label) => trigger.element.set_text_content(Some(&label)),
                CopyEffect::AddClass(class) => {
                    if let Err(e) = trigger.element.class_list().add_1(&class) {
                        log::warn!("{}", WebError::js("could not add copy marker", &e));
                    }
                }
                CopyEffect::RemoveClass(class) => {
                    if let Err(e) = trigger.element.class_list().remove_1(&class) {
                        log::warn!("{}", WebError::js("could not remove copy marker", &e));
                    }
                }
                CopyEffect::ScheduleRevert { ticket, after } => {
                    let weak = Rc::downgrade(trigger);
                    let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
                    let timeout = Timeout::new(millis, move || {
                        if let Some(trigger) = weak.upgrade() {
                            let effects = trigger.button.borrow_mut().revert(ticket);
                            Trigger::apply(&trigger, effects);
                        }
                    });
                    // Dropping the previous Timeout clears it
                    *trigger.revert.borrow_mut() = Some(timeout);
                }
            }
        }
    }
}

async fn write_clipboard(text: &str) -> Result<(), WebError> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| WebError::js("clipboard write rejected", &e))
}
