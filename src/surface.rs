//! DOM-backed geometry source and render surface.

use crate::constants::*;
use effect_core::{Effect, Geometry, GeometrySource, RenderSurface, SurfaceError, TargetId, TargetKind};
use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Elements backing each registered target.
#[derive(Default)]
pub struct TargetElements {
    elements: FnvHashMap<TargetId, web::HtmlElement>,
    pane_ids: Vec<TargetId>,
}

impl TargetElements {
    pub fn insert(&mut self, id: TargetId, el: web::HtmlElement) {
        self.elements.insert(id, el);
    }

    pub fn replace_panes(&mut self, panes: Vec<(TargetId, web::HtmlElement)>) {
        for id in self.pane_ids.drain(..) {
            self.elements.remove(&id);
        }
        for (id, el) in panes {
            self.pane_ids.push(id);
            self.elements.insert(id, el);
        }
    }

    pub fn get(&self, id: TargetId) -> Option<&web::HtmlElement> {
        self.elements.get(&id)
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.pane_ids.clear();
    }
}

pub type SharedElements = Rc<RefCell<TargetElements>>;

pub fn supports_font_variations() -> bool {
    web::css::supports_with_value(FONT_VARIATION_PROPERTY, FONT_VARIATION_PROBE).unwrap_or(false)
}

pub struct DomGeometry {
    elements: SharedElements,
}

impl DomGeometry {
    pub fn new(elements: SharedElements) -> Self {
        Self { elements }
    }
}

impl GeometrySource for DomGeometry {
    fn measure(&mut self, id: TargetId, _kind: TargetKind) -> Option<Geometry> {
        let elements = self.elements.borrow();
        let el = elements.get(id)?;
        if !el.is_connected() {
            return None;
        }
        let r = el.get_bounding_client_rect();
        Some(Geometry::new(
            r.left() as f32,
            r.top() as f32,
            r.width() as f32,
            r.height() as f32,
        ))
    }
}

/// Writes glyph font variations and pane custom properties.
pub struct CssSurface {
    elements: SharedElements,
    variations: bool,
    weight_min: f32,
    weight_max: f32,
    distortion_max: f32,
}

impl CssSurface {
    pub fn new(elements: SharedElements, variations: bool, config: &effect_core::Config) -> Self {
        if !variations {
            log::warn!("[surface] no font-variation support, glyphs will use the fallback transform");
        }
        Self {
            elements,
            variations,
            weight_min: config.weight.min,
            weight_max: config.weight.max,
            distortion_max: config.distortion.max,
        }
    }

    fn element(&self, id: TargetId) -> Result<web::HtmlElement, SurfaceError> {
        match self.elements.borrow().get(id) {
            Some(el) if el.is_connected() => Ok(el.clone()),
            _ => Err(SurfaceError::Detached),
        }
    }

    fn write_pane(&self, el: &web::HtmlElement, effect: Effect) -> Result<(), SurfaceError> {
        let span = (self.weight_max - self.weight_min).max(1.0);
        let weight = ((effect.weight - self.weight_min) / span).clamp(0.0, 1.0);
        let distortion = (effect.distortion / self.distortion_max).clamp(0.0, 1.0);
        let style = el.style();
        style
            .set_property(PANE_WEIGHT_PROPERTY, &format!("{:.3}", weight))
            .and_then(|_| style.set_property(PANE_DISTORTION_PROPERTY, &format!("{:.3}", distortion)))
            .map_err(|_| SurfaceError::Detached)
    }
}

impl RenderSurface for CssSurface {
    fn write(&mut self, id: TargetId, kind: TargetKind, effect: Effect) -> Result<(), SurfaceError> {
        let el = self.element(id)?;
        match kind {
            TargetKind::Pane => self.write_pane(&el, effect),
            TargetKind::Glyph if !self.variations => Err(SurfaceError::Unsupported),
            TargetKind::Glyph => el
                .style()
                .set_property(
                    FONT_VARIATION_PROPERTY,
                    &format!("'wght' {:.1}, 'DIST' {:.1}", effect.weight, effect.distortion),
                )
                .map_err(|_| SurfaceError::Unsupported),
        }
    }

    fn write_fallback(&mut self, id: TargetId, kind: TargetKind, effect: Effect) -> Result<(), SurfaceError> {
        let el = self.element(id)?;
        if kind == TargetKind::Pane {
            return self.write_pane(&el, effect);
        }
        let weight = (effect.weight / FALLBACK_WEIGHT_STEP).round() * FALLBACK_WEIGHT_STEP;
        let skew = effect.distortion * FALLBACK_SKEW_DEG_PER_UNIT;
        let style = el.style();
        style
            .set_property("font-weight", &format!("{}", weight as i32))
            .and_then(|_| style.set_property("transform", &format!("skewX({:.2}deg)", -skew)))
            .map_err(|_| SurfaceError::Detached)
    }
}
