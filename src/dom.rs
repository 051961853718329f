//! Browser stage: applies sequencer effects to the page
//!
//! Every element is looked up once, up front. A page missing any of them
//! fails setup instead of half-animating.

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::consts::PILL_START_TY;
use crate::error::SetupError;
use crate::seq::{Bubble, Effect, PillColor, SeaSide, Stage, StatsBar};

impl From<SetupError> for JsValue {
    fn from(err: SetupError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn js_err(err: JsValue) -> SetupError {
    SetupError::Js(format!("{:?}", err))
}

fn into_html(el: Element, selector: &str) -> Result<HtmlElement, SetupError> {
    el.dyn_into::<HtmlElement>()
        .map_err(|_| SetupError::NotHtmlElement {
            selector: selector.to_string(),
        })
}

/// Look up `#id` as an HTML element
pub fn element_by_id(document: &Document, id: &str) -> Result<HtmlElement, SetupError> {
    let el = document
        .get_element_by_id(id)
        .ok_or_else(|| SetupError::missing(format!("#{}", id)))?;
    into_html(el, &format!("#{}", id))
}

/// First descendant of `parent` matching `selector`
fn child(parent: &Element, parent_name: &str, selector: &str) -> Result<HtmlElement, SetupError> {
    let full = format!("{} {}", parent_name, selector);
    let el = parent
        .query_selector(selector)
        .map_err(js_err)?
        .ok_or_else(|| SetupError::missing(full.clone()))?;
    into_html(el, &full)
}

/// A pill and its dissolve overlay
struct PillElements {
    pill: HtmlElement,
    overlay: HtmlElement,
}

/// A stats bar and its value label
struct BarElements {
    bar: HtmlElement,
    value: HtmlElement,
}

/// Handles to every element the sequence touches
pub struct DomStage {
    document: Document,
    blue: PillElements,
    pink: PillElements,
    sea_left: HtmlElement,
    sea_right: HtmlElement,
    stats: HtmlElement,
    man: BarElements,
    woman: BarElements,
    /// Live bubble elements by id
    bubbles: HashMap<u32, (SeaSide, HtmlElement)>,
}

impl DomStage {
    /// Resolve all elements, failing on the first one missing
    pub fn from_document(document: &Document) -> Result<Self, SetupError> {
        let pill = |id: &str| -> Result<PillElements, SetupError> {
            let pill = element_by_id(document, id)?;
            let overlay = child(&pill, &format!("#{}", id), ".overlay")?;
            Ok(PillElements { pill, overlay })
        };
        let stats = element_by_id(document, "stats")?;
        let bar = |class: &str| -> Result<BarElements, SetupError> {
            let bar = child(&stats, "#stats", &format!(".bar.{}", class))?;
            let value = child(&bar, &format!("#stats .bar.{}", class), ".value")?;
            Ok(BarElements { bar, value })
        };

        let man = bar(StatsBar::Man.class())?;
        let woman = bar(StatsBar::Woman.class())?;

        Ok(Self {
            document: document.clone(),
            blue: pill("pill-blue")?,
            pink: pill("pill-pink")?,
            sea_left: element_by_id(document, "sea-left")?,
            sea_right: element_by_id(document, "sea-right")?,
            stats,
            man,
            woman,
            bubbles: HashMap::new(),
        })
    }

    fn pill(&self, color: PillColor) -> &PillElements {
        match color {
            PillColor::Blue => &self.blue,
            PillColor::Pink => &self.pink,
        }
    }

    fn sea(&self, side: SeaSide) -> &HtmlElement {
        match side {
            SeaSide::Left => &self.sea_left,
            SeaSide::Right => &self.sea_right,
        }
    }

    fn bar(&self, bar: StatsBar) -> &BarElements {
        match bar {
            StatsBar::Man => &self.man,
            StatsBar::Woman => &self.woman,
        }
    }

    fn reset_pill(&self, color: PillColor) {
        let els = self.pill(color);
        let _ = els.pill.class_list().remove_2("dropped", "dissolving");
        let style = els.pill.style();
        let _ = style.set_property("--ty", PILL_START_TY);
        for prop in ["--land-y", "transform", "opacity", "transition"] {
            let _ = style.remove_property(prop);
        }
        let overlay = els.overlay.style();
        let _ = overlay.remove_property("transition");
        let _ = overlay.set_property("height", "0%");
    }

    fn clear_bubbles(&mut self, side: SeaSide) {
        if let Ok(nodes) = self.sea(side).query_selector_all(".bubble") {
            for i in 0..nodes.length() {
                if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    el.remove();
                }
            }
        }
        self.bubbles.retain(|_, (s, _)| *s != side);
    }

    fn spawn_bubble(&mut self, side: SeaSide, bubble: &Bubble) {
        let Some(el) = self
            .document
            .create_element("div")
            .ok()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        else {
            log::warn!("Could not create bubble element");
            return;
        };
        el.set_class_name("bubble");
        let style = el.style();
        let size = format!("{}px", bubble.size);
        let _ = style.set_property("width", &size);
        let _ = style.set_property("height", &size);
        let _ = style.set_property("left", &format!("{}%", bubble.left_percent));
        let _ = style.set_property("animation-duration", &format!("{}s", bubble.lifetime_secs));
        let _ = self.sea(side).append_child(&el);
        self.bubbles.insert(bubble.id, (side, el));
    }
}

impl Stage for DomStage {
    fn sea_height(&self, sea: SeaSide) -> f64 {
        self.sea(sea).client_height() as f64
    }

    fn apply(&mut self, _at: f64, effect: &Effect) {
        match effect {
            Effect::ResetPill { pill } => self.reset_pill(*pill),
            Effect::ClearBubbles { sea } => self.clear_bubbles(*sea),
            Effect::SetStatsHidden { hidden } => {
                let classes = self.stats.class_list();
                let _ = if *hidden {
                    classes.add_1("hidden")
                } else {
                    classes.remove_1("hidden")
                };
            }
            Effect::SetLandingOffset { pill, px } => {
                let _ = self
                    .pill(*pill)
                    .pill
                    .style()
                    .set_property("--land-y", &format!("{}px", px));
            }
            Effect::AddPillClass { pill, class } => {
                let _ = self.pill(*pill).pill.class_list().add_1(class.as_str());
            }
            Effect::SetOverlayTransition { pill, duration_ms } => {
                let _ = self
                    .pill(*pill)
                    .overlay
                    .style()
                    .set_property("transition", &Effect::overlay_transition_css(*duration_ms));
            }
            Effect::SetOverlayFill { pill, percent } => {
                let _ = self
                    .pill(*pill)
                    .overlay
                    .style()
                    .set_property("height", &format!("{}%", percent));
            }
            Effect::SetPillTransition {
                pill,
                transform_ms,
                opacity_ms,
            } => {
                let _ = self.pill(*pill).pill.style().set_property(
                    "transition",
                    &Effect::pill_transition_css(*transform_ms, *opacity_ms),
                );
            }
            Effect::FadePill {
                pill,
                opacity,
                translate_y_px,
                scale,
            } => {
                let style = self.pill(*pill).pill.style();
                let _ = style.set_property("opacity", &opacity.to_string());
                let _ = style.set_property(
                    "transform",
                    &Effect::fade_transform_css(*translate_y_px, *scale),
                );
            }
            Effect::SpawnBubble { sea, bubble } => self.spawn_bubble(*sea, bubble),
            Effect::RemoveBubble { id, .. } => {
                if let Some((_, el)) = self.bubbles.remove(id) {
                    el.remove();
                }
            }
            Effect::SetBarWidth { bar, percent } => {
                let _ = self
                    .bar(*bar)
                    .bar
                    .style()
                    .set_property("width", &format!("{}%", percent));
            }
            Effect::SetBarValueOpacity { bar, opacity } => {
                let _ = self
                    .bar(*bar)
                    .value
                    .style()
                    .set_property("opacity", &opacity.to_string());
            }
        }
    }
}
