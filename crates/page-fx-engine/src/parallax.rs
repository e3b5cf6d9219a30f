use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxSettings {
    /// Media query that must match for the effect to be installed
    pub pointer_query: String,
    /// Maximum content shift in pixels, applied against the cursor
    pub content_intensity: f64,
    /// Maximum background shift in pixels, applied with the cursor
    pub background_intensity: f64,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            pointer_query: "(pointer: fine)".to_string(),
            content_intensity: 20.0,
            background_intensity: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCapability {
    /// Precise continuous positioning, e.g. a mouse
    Fine,
    /// Touch or no pointer at all
    Coarse,
}

impl PointerCapability {
    pub fn from_query_match(matches: bool) -> Self {
        if matches {
            PointerCapability::Fine
        } else {
            PointerCapability::Coarse
        }
    }
}

/// Cursor position relative to the container center, each axis in [-0.5, 0.5]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerOffset {
    pub x: f64,
    pub y: f64,
}

impl PointerOffset {
    pub const CENTER: PointerOffset = PointerOffset { x: 0.0, y: 0.0 };

    /// `px`/`py` are measured from the container's top-left corner.
    /// Returns `None` for a container with no area.
    pub fn from_position(px: f64, py: f64, width: f64, height: f64) -> Option<Self> {
        if !(width > 0.0 && height > 0.0 && px.is_finite() && py.is_finite()) {
            return None;
        }
        Some(Self {
            x: (px / width - 0.5).clamp(-0.5, 0.5),
            y: (py / height - 0.5).clamp(-0.5, 0.5),
        })
    }

    /// Offset of a viewport-space pointer within `rect`
    pub fn from_client(client_x: f64, client_y: f64, rect: &ClientRect) -> Option<Self> {
        Self::from_position(
            client_x - rect.left,
            client_y - rect.top,
            rect.width,
            rect.height,
        )
    }
}

/// An element's box in viewport coordinates, as from `getBoundingClientRect()`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Style values for one pointer position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallaxFrame {
    /// Value for the content element's `transform`
    pub content_transform: String,
    /// Value for the hero's `background-position`
    pub background_position: String,
}

impl ParallaxFrame {
    pub fn compute(offset: PointerOffset, settings: &ParallaxSettings) -> Self {
        let content_x = -offset.x * settings.content_intensity;
        let content_y = -offset.y * settings.content_intensity;
        let bg_x = offset.x * settings.background_intensity;
        let bg_y = offset.y * settings.background_intensity;

        Self {
            content_transform: format!(
                "translate({}px, {}px)",
                css_number(content_x),
                css_number(content_y)
            ),
            background_position: format!("{} {}", centered(bg_x), centered(bg_y)),
        }
    }
}

fn css_number(value: f64) -> String {
    // -0.0 prints as "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}")
}

fn centered(shift: f64) -> String {
    if shift == 0.0 {
        "50%".to_string()
    } else {
        format!("calc(50% + {}px)", css_number(shift))
    }
}

/// The installed hero parallax effect.
///
/// Only constructible when the pointer is fine and both elements exist, so
/// a page without the capability simply has no `HeroParallax` at all.
#[derive(Debug)]
pub struct HeroParallax<H, C> {
    hero: H,
    content: C,
    settings: ParallaxSettings,
}

impl<H, C> HeroParallax<H, C> {
    pub fn install(
        capability: PointerCapability,
        hero: Option<H>,
        content: Option<C>,
        settings: ParallaxSettings,
    ) -> Option<Self> {
        if capability != PointerCapability::Fine {
            return None;
        }
        Some(Self {
            hero: hero?,
            content: content?,
            settings,
        })
    }

    pub fn hero(&self) -> &H {
        &self.hero
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn frame(&self, offset: PointerOffset) -> ParallaxFrame {
        ParallaxFrame::compute(offset, &self.settings)
    }
}
