use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("No global `window` available")]
    NoWindow,
    #[error("Window has no `document`")]
    NoDocument,
    #[error("Invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
    #[error("{context}: {message}")]
    Js {
        context: &'static str,
        message: String,
    },
}

impl WebError {
    pub fn js(context: &'static str, value: &JsValue) -> Self {
        WebError::Js {
            context,
            message: describe(value),
        }
    }

    pub fn selector(selector: &str, value: &JsValue) -> Self {
        WebError::Selector {
            selector: selector.to_string(),
            message: describe(value),
        }
    }
}

/// Best-effort readable text for a thrown JS value
pub fn describe(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return format!("{}: {}", String::from(error.name()), String::from(error.message()));
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
