//! Browser helpers
//!
//! Thin wrappers over `web_sys` for the handful of things the frame driver
//! needs from the page:
//! - High-resolution time
//! - Canvas sizing
//! - Visibility detection
//! - The optional inline show config

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, Window};

use crate::config::ShowConfig;
use crate::error::RenderError;
use crate::sim::Viewport;

/// Id of the `<script type="application/json">` element holding a show config
pub const CONFIG_ELEMENT_ID: &str = "skyburst-config";

/// Monotonic milliseconds since page load
pub fn now_ms(window: &Window) -> f64 {
    window
        .performance()
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

pub fn find_canvas(document: &Document, id: &str) -> Result<HtmlCanvasElement, RenderError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(|| RenderError::NoCanvas(id.to_string()))
}

/// Size the canvas backing store to the window
///
/// Returns the logical viewport (CSS pixels) and the physical surface size.
pub fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> (Viewport, (u32, u32)) {
    let css_w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let css_h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let dpr = window.device_pixel_ratio().max(1.0);
    let width = (css_w * dpr) as u32;
    let height = (css_h * dpr) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    (Viewport::new(css_w as f32, css_h as f32), (width, height))
}

pub fn is_hidden(document: &Document) -> bool {
    document.visibility_state() == web_sys::VisibilityState::Hidden
}

/// Show config from the page, or defaults when there is none
///
/// A config that fails to parse is reported and replaced by defaults.
pub fn page_config(document: &Document) -> ShowConfig {
    let Some(json) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return ShowConfig::default();
    };
    match ShowConfig::from_json(&json) {
        Ok(config) => {
            log::info!("Loaded show config from #{}", CONFIG_ELEMENT_ID);
            config
        }
        Err(e) => {
            log::warn!("{} - using defaults", e);
            ShowConfig::default()
        }
    }
}
