use crate::constants::*;
use effect_core::{Config, EngineConfig, PaneCell, TargetId};
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn query_all(document: &web::Document, selector: &str) -> Vec<web::HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web::HtmlElement>().ok())
        .collect()
}

pub fn set_hidden(document: &web::Document, element_id: &str, hidden: bool) {
    if let Some(el) = document.get_element_by_id(element_id) {
        if hidden {
            _ = el.set_attribute("hidden", "");
        } else {
            _ = el.remove_attribute("hidden");
        }
    }
}

/// `?effects=off` or a reduced-motion preference disables the engine.
pub fn effects_disabled(window: &web::Window) -> bool {
    let by_query = window
        .location()
        .search()
        .map(|s| s.contains(DISABLE_QUERY_FLAG))
        .unwrap_or(false);
    let reduced_motion = window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|mql| mql.matches())
        .unwrap_or(false);
    by_query || reduced_motion
}

pub fn viewport_size(window: &web::Window) -> (f32, f32) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w as f32, h as f32)
}

/// Defaults, overridden by the page's JSON config block when it parses and
/// validates.
pub fn load_config(document: &web::Document) -> Config {
    let Some(raw) = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|el| el.text_content())
    else {
        return Config::default();
    };
    match serde_json::from_str::<EngineConfig>(&raw) {
        Ok(cfg) => match cfg.validate() {
            Ok(cfg) => {
                log::info!("[config] loaded overrides from #{}", CONFIG_SCRIPT_ID);
                cfg
            }
            Err(e) => {
                log::warn!("[config] rejected ({}); using defaults", e);
                Config::default()
            }
        },
        Err(e) => {
            log::warn!("[config] unparseable ({}); using defaults", e);
            Config::default()
        }
    }
}

/// Replace the text of every `[data-split]` element with one glyph span per
/// character. Whitespace stays as plain text so line breaking is unchanged.
pub fn split_glyphs(document: &web::Document) {
    for el in query_all(document, SPLIT_SELECTOR) {
        let Some(text) = el.text_content() else {
            continue;
        };
        let fixed = el.has_attribute(FIXED_ATTR);
        el.set_text_content(None);
        for ch in text.chars() {
            if ch.is_whitespace() {
                let node = document.create_text_node(&ch.to_string());
                _ = el.append_child(&node);
                continue;
            }
            let Ok(span) = document.create_element("span") else {
                continue;
            };
            _ = span.set_attribute("data-glyph", "");
            if fixed {
                _ = span.set_attribute(FIXED_ATTR, "");
            }
            span.set_text_content(Some(&ch.to_string()));
            _ = el.append_child(&span);
        }
    }
}

/// Rebuild the pane layer from a fresh grid layout.
pub fn rebuild_panes(
    document: &web::Document,
    cells: &[(TargetId, PaneCell)],
) -> Vec<(TargetId, web::HtmlElement)> {
    let Some(layer) = document.get_element_by_id(PANE_LAYER_ID) else {
        return Vec::new();
    };
    layer.set_inner_html("");
    let mut panes = Vec::with_capacity(cells.len());
    for (id, cell) in cells {
        let Some(el) = document
            .create_element("div")
            .ok()
            .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
        else {
            continue;
        };
        el.set_class_name(PANE_CLASS);
        let g = cell.geometry;
        let style = el.style();
        _ = style.set_property("left", &format!("{:.2}px", g.left));
        _ = style.set_property("top", &format!("{:.2}px", g.top));
        _ = style.set_property("width", &format!("{:.2}px", g.width));
        _ = style.set_property("height", &format!("{:.2}px", g.height));
        _ = el.set_attribute("data-row", &cell.row.to_string());
        _ = el.set_attribute("data-col", &cell.col.to_string());
        if layer.append_child(&el).is_ok() {
            panes.push((*id, el));
        }
    }
    panes
}
