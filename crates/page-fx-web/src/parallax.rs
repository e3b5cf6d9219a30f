use gloo::events::EventListener;
use page_fx_config::Selectors;
use page_fx_engine::{
    ClientRect, HeroParallax, ParallaxSettings, PointerCapability, PointerOffset,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, MouseEvent, Window};

use crate::dom;
use crate::error::{WebError, describe};

type Hero = HeroParallax<HtmlElement, HtmlElement>;

pub struct ParallaxBinding {
    _listener: EventListener,
}

pub fn install(
    window: &Window,
    document: &Document,
    selectors: &Selectors,
    settings: &ParallaxSettings,
) -> Result<Option<ParallaxBinding>, WebError> {
    let hero = dom::query_html(document, &selectors.hero)?;
    let content = dom::query_html(document, &selectors.hero_content)?;
    let capability = pointer_capability(window, &settings.pointer_query);

    let Some(parallax) = HeroParallax::install(capability, hero, content, settings.clone()) else {
        log::debug!("Hero parallax skipped (pointer {capability:?})");
        return Ok(None);
    };

    let target = parallax.hero().clone();
    let listener = EventListener::new(&target, "mousemove", move |event| {
        if let Some(event) = event.dyn_ref::<MouseEvent>() {
            on_mouse_move(&parallax, event);
        }
    });

    Ok(Some(ParallaxBinding {
        _listener: listener,
    }))
}

fn pointer_capability(window: &Window, query: &str) -> PointerCapability {
    let matches = match window.match_media(query) {
        Ok(Some(list)) => list.matches(),
        Ok(None) => false,
        Err(e) => {
            log::warn!("matchMedia(`{query}`) failed: {}", describe(&e));
            false
        }
    };
    PointerCapability::from_query_match(matches)
}

fn on_mouse_move(parallax: &Hero, event: &MouseEvent) {
    let hero = parallax.hero();
    let rect = hero.get_bounding_client_rect();
    let rect = ClientRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    };

    let Some(offset) = PointerOffset::from_client(
        f64::from(event.client_x()),
        f64::from(event.client_y()),
        &rect,
    ) else {
        return;
    };

    let frame = parallax.frame(offset);
    if let Err(e) = parallax
        .content()
        .style()
        .set_property("transform", &frame.content_transform)
    {
        log::warn!("{}", WebError::js("could not move hero content", &e));
    }
    if let Err(e) = hero
        .style()
        .set_property("background-position", &frame.background_position)
    {
        log::warn!("{}", WebError::js("could not move hero background", &e));
    }
}
