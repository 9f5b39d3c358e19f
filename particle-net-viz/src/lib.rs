//! Canvas bindings for the particle-net page background
//!
//! This crate provides WASM bindings that run the particle field on an HTML
//! canvas and expose the form field rules to page scripts.

use std::cell::RefCell;
use std::rc::Rc;

use particle_net::validation::{self, FieldKind};
use particle_net::{Animation, HostEvent, ParticleField, SimulationConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub mod canvas2d;
pub mod host;
pub mod logging;

use canvas2d::CanvasSurface;
use host::{Dispatch, Listeners, RafClock};

/// Element id of the background canvas on the page
pub const DEFAULT_CANVAS_ID: &str = "particles-canvas";

/// Initialize WASM panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(logging::DEFAULT_FILTER);
}

/// State touched by both the frame loop and the event listeners
struct Runtime {
    animation: Animation,
    surface: CanvasSurface,
}

/// A running particle-network background
#[wasm_bindgen]
pub struct ParticleNetwork {
    runtime: Rc<RefCell<Runtime>>,
    clock: RafClock,
    listeners: Option<Listeners>,
}

impl ParticleNetwork {
    fn start(canvas: HtmlCanvasElement, config: SimulationConfig) -> Result<Self, String> {
        let window = web_sys::window().ok_or("no global window")?;
        let (width, height) = host::viewport_size(&window)?;

        let mut surface = CanvasSurface::new(canvas)?;
        surface.resize(width, height);

        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let field = ParticleField::new(width, height, config, StdRng::seed_from_u64(seed));
        let particles = field.particles().len();

        let runtime = Rc::new(RefCell::new(Runtime {
            animation: Animation::new(field),
            surface,
        }));

        let clock = RafClock::new(window.clone());
        let frame_runtime = runtime.clone();
        let mut frame_clock = clock.clone();
        clock.install(Closure::new(move || {
            let mut runtime = frame_runtime.borrow_mut();
            let Runtime { animation, surface } = &mut *runtime;
            animation.tick(surface, &mut frame_clock);
        }));

        let event_runtime = runtime.clone();
        let dispatch: Dispatch = Rc::new(move |event: HostEvent| {
            let mut runtime = event_runtime.borrow_mut();
            if let HostEvent::Resize { width, height } = event {
                runtime.surface.resize(width, height);
            }
            runtime.animation.handle_event(event);
        });
        let listeners = Listeners::attach(&window, dispatch)?;

        runtime.borrow_mut().animation.start(&mut clock.clone());

        tracing::info!(width, height, particles, "particle network mounted");

        Ok(Self {
            runtime,
            clock,
            listeners: Some(listeners),
        })
    }
}

#[wasm_bindgen]
impl ParticleNetwork {
    /// Start the background on `canvas` with the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<ParticleNetwork, JsValue> {
        Self::start(canvas, SimulationConfig::default()).map_err(|e| JsValue::from_str(&e))
    }

    /// Start the background with a JSON configuration object
    ///
    /// Fields left out keep their defaults.
    pub fn with_config(
        canvas: HtmlCanvasElement,
        config_json: &str,
    ) -> Result<ParticleNetwork, JsValue> {
        let config = SimulationConfig::from_json(config_json).map_err(|e| {
            tracing::warn!(error = %e, "rejected particle network configuration");
            JsValue::from_str(&e.to_string())
        })?;
        Self::start(canvas, config).map_err(|e| JsValue::from_str(&e))
    }

    /// Start the background on the canvas with id `canvas_id`
    ///
    /// Returns `None` without starting anything when the page has no such
    /// element.
    pub fn mount(canvas_id: &str) -> Result<Option<ParticleNetwork>, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let Some(element) = document.get_element_by_id(canvas_id) else {
            tracing::debug!(canvas_id, "no canvas found, particle network not started");
            return Ok(None);
        };
        let canvas = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("#{canvas_id} is not a canvas")))?;

        Self::new(canvas).map(Some)
    }

    /// [`ParticleNetwork::mount`] on the page's `particles-canvas` element
    pub fn mount_default() -> Result<Option<ParticleNetwork>, JsValue> {
        Self::mount(DEFAULT_CANVAS_ID)
    }

    /// Stop the frame loop and remove the window listeners
    pub fn destroy(&mut self) {
        let Some(mut listeners) = self.listeners.take() else {
            return;
        };
        listeners.detach();
        self.clock.cancel();

        let mut runtime = self.runtime.borrow_mut();
        runtime.animation.stop();
        tracing::info!(
            frames = runtime.animation.frames(),
            "particle network destroyed"
        );
    }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> usize {
        self.runtime.borrow().animation.field().particles().len()
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.runtime.borrow().animation.is_running()
    }
}

impl Drop for ParticleNetwork {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Check one required input; returns the message to show, or nothing
#[wasm_bindgen]
pub fn validate_field(input_type: &str, value: &str) -> Option<String> {
    validation::validate_field(FieldKind::from_input_type(input_type), value)
        .err()
        .map(|e| e.to_string())
}

/// Check every required input of a form before it is submitted
///
/// `input_types` and `values` are parallel arrays of strings.
#[wasm_bindgen]
pub fn form_is_valid(input_types: js_sys::Array, values: js_sys::Array) -> bool {
    let input_types = input_types.iter().map(|t| t.as_string()).collect();
    let values = values.iter().map(|v| v.as_string()).collect();
    form_fields(input_types, values).is_some_and(|fields| fields_are_valid(&fields))
}

/// Pair up the form's input types and values
///
/// Returns `None` when the lists differ in length. A missing type gets the
/// text rules and a missing value is treated as empty, so it fails as
/// required.
fn form_fields(
    input_types: Vec<Option<String>>,
    values: Vec<Option<String>>,
) -> Option<Vec<(FieldKind, String)>> {
    if input_types.len() != values.len() {
        tracing::warn!(
            types = input_types.len(),
            values = values.len(),
            "form validation called with mismatched arrays"
        );
        return None;
    }

    let fields = input_types
        .into_iter()
        .zip(values)
        .map(|(t, v)| {
            (
                FieldKind::from_input_type(t.as_deref().unwrap_or_default()),
                v.unwrap_or_default(),
            )
        })
        .collect();
    Some(fields)
}

fn fields_are_valid(fields: &[(FieldKind, String)]) -> bool {
    let failures =
        validation::validate_all(fields.iter().map(|(kind, value)| (*kind, value.as_str())));
    if !failures.is_empty() {
        tracing::debug!(invalid = failures.len(), "form has invalid fields");
    }
    failures.is_empty()
}
