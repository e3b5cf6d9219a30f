use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::error::WebError;

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, WebError> {
    let list = document
        .query_selector_all(selector)
        .map_err(|e| WebError::selector(selector, &e))?;

    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub fn query_html(document: &Document, selector: &str) -> Result<Option<HtmlElement>, WebError> {
    let element = document
        .query_selector(selector)
        .map_err(|e| WebError::selector(selector, &e))?;

    Ok(element.and_then(|e| e.dyn_into::<HtmlElement>().ok()))
}
