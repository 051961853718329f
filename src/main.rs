//! Pill Drop entry point
//!
//! Wires the sequencer to the page and drives it from the animation frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlElement;

    use pill_drop::dom::{DomStage, element_by_id};
    use pill_drop::{Sequencer, Settings, SetupError, Triggers};

    /// Page instance holding all state
    struct Page {
        sequencer: Sequencer,
        stage: DomStage,
        triggers: Triggers,
    }

    impl Page {
        fn new(sequencer: Sequencer, stage: DomStage) -> Self {
            Self {
                sequencer,
                stage,
                triggers: Triggers::default(),
            }
        }

        /// Handle queued triggers and run every step due by `now`
        fn frame(&mut self, now: f64) {
            if self.triggers.poll(now) {
                self.sequencer.run(now, &mut self.stage);
            }
            self.sequencer.advance_to(now, &mut self.stage);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Pill Drop starting...");

        let window = web_sys::window().ok_or(SetupError::NoWindow)?;
        let document = window.document().ok_or(SetupError::NoDocument)?;

        let stage = DomStage::from_document(&document)
            .inspect_err(|e| log::error!("Page setup failed: {}", e))?;
        let replay_btn = element_by_id(&document, "replay")?;
        let stage_area = element_by_id(&document, "stage")?;

        let mut settings = Settings::load();
        if let Ok(query) = window.location().search() {
            settings.apply_query(&query);
        }
        let seed = js_sys::Date::now() as u64;
        let page = Rc::new(RefCell::new(Page::new(Sequencer::new(settings, seed), stage)));
        log::info!("Sequencer initialized with seed: {}", seed);

        setup_trigger(&replay_btn, page.clone());
        setup_trigger(&stage_area, page.clone());
        setup_autostart(&document, page.clone());

        request_animation_frame(page);

        log::info!("Pill Drop running!");
        Ok(())
    }

    /// Clicking `target` requests a replay
    fn setup_trigger(target: &HtmlElement, page: Rc<RefCell<Page>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            page.borrow_mut().triggers.request_replay();
        });
        let _ = target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Start once after the page has loaded
    fn setup_autostart(document: &web_sys::Document, page: Rc<RefCell<Page>>) {
        if document.ready_state() == "complete" {
            page.borrow_mut().triggers.page_loaded();
            return;
        }

        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            page.borrow_mut().triggers.page_loaded();
        });
        let _ = window.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(page: Rc<RefCell<Page>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, frame loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(page, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(page: Rc<RefCell<Page>>, time: f64) {
        page.borrow_mut().frame(time);
        request_animation_frame(page);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_page::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pill Drop (native) starting...");
    log::info!("Native mode has no page - run with `trunk serve` for the web version");

    // Same overrides as the page's query string, e.g. `replay=ignore&reduced-motion=1`
    let query = std::env::args().nth(1).unwrap_or_default();

    println!("\nDry run (sea height 400px):");
    dry_run(400.0, &query);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one run against a recording stage and print the effect trace
#[cfg(not(target_arch = "wasm32"))]
fn dry_run(sea_height: f64, query: &str) {
    use pill_drop::seq::{Effect, run_length, run_plan};
    use pill_drop::{RecordingStage, Sequencer, Settings};

    let mut settings = Settings::load();
    settings.apply_query(query);
    let length = run_length(&run_plan(&settings.timings, &settings.stats));
    let mut sequencer = Sequencer::new(settings, 1);
    let mut stage = RecordingStage::new(sea_height);

    sequencer.run(0.0, &mut stage);
    // Long enough for the last bubbles to pop
    sequencer.advance_to(length + 5000.0, &mut stage);
    if sequencer.pending() > 0 {
        log::warn!("{} steps still pending after the run", sequencer.pending());
    }

    let mut bubbles = 0;
    for (at, effect) in &stage.log {
        match effect {
            Effect::SpawnBubble { .. } => bubbles += 1,
            Effect::RemoveBubble { .. } => {}
            _ => println!("{:>7.0}ms  {:?}", at, effect),
        }
    }
    println!("\n✓ {} bubbles spawned, run finished ({:?})", bubbles, sequencer.phase());
}
