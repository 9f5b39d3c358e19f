//! Browser host wiring
//!
//! Turns window events into [`HostEvent`]s and `requestAnimationFrame` into a
//! [`FrameClock`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use particle_net::{FrameClock, HostEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, MouseEvent, Window};

/// Slot holding the per-frame closure
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Handler receiving translated host events
pub type Dispatch = Rc<dyn Fn(HostEvent)>;

/// Current viewport size in CSS pixels
pub fn viewport_size(window: &Window) -> Result<(u32, u32), String> {
    let width = window
        .inner_width()
        .map_err(|e| format!("Failed to read innerWidth: {:?}", e))?
        .as_f64()
        .ok_or("innerWidth is not a number")?;
    let height = window
        .inner_height()
        .map_err(|e| format!("Failed to read innerHeight: {:?}", e))?
        .as_f64()
        .ok_or("innerHeight is not a number")?;

    Ok((width.max(0.0) as u32, height.max(0.0) as u32))
}

/// `requestAnimationFrame` as a frame clock
///
/// Clones share the frame closure and the pending request handle.
#[derive(Clone)]
pub struct RafClock {
    window: Window,
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl RafClock {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
            pending: Rc::new(Cell::new(None)),
        }
    }

    /// Set the closure run on every frame
    pub fn install(&self, frame: Closure<dyn FnMut()>) {
        *self.callback.borrow_mut() = Some(frame);
    }

    /// Cancel the pending frame and drop the frame closure
    ///
    /// Must not be called from inside the frame closure.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
        self.callback.borrow_mut().take();
    }
}

impl FrameClock for RafClock {
    fn request_frame(&mut self) {
        let callback = self.callback.borrow();
        let Some(frame) = callback.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(frame.as_ref().unchecked_ref())
        {
            Ok(handle) => self.pending.set(Some(handle)),
            Err(e) => tracing::error!("requestAnimationFrame failed: {:?}", e),
        }
    }
}

/// Window listeners for resize and pointer events
///
/// Listeners are removed on [`Listeners::detach`] or drop.
pub struct Listeners {
    window: Window,
    registered: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl Listeners {
    /// Register `resize`, `mousemove` and `mouseout` on the window
    pub fn attach(window: &Window, dispatch: Dispatch) -> Result<Self, String> {
        let mut listeners = Self {
            window: window.clone(),
            registered: Vec::new(),
        };

        let resize_window = window.clone();
        let on_resize = dispatch.clone();
        listeners.add("resize", move |_event: Event| {
            match viewport_size(&resize_window) {
                Ok((width, height)) => on_resize(HostEvent::Resize { width, height }),
                Err(e) => tracing::warn!("ignoring resize: {}", e),
            }
        })?;

        let on_move = dispatch.clone();
        listeners.add("mousemove", move |event: Event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                on_move(HostEvent::PointerMove {
                    x: mouse.client_x() as f32,
                    y: mouse.client_y() as f32,
                });
            }
        })?;

        listeners.add("mouseout", move |event: Event| {
            // relatedTarget is null only when the pointer leaves the window
            let left_window = event
                .dyn_ref::<MouseEvent>()
                .is_some_and(|mouse| mouse.related_target().is_none());
            if left_window {
                dispatch(HostEvent::PointerLeave);
            }
        })?;

        Ok(listeners)
    }

    fn add<F>(&mut self, name: &'static str, handler: F) -> Result<(), String>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        self.window
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .map_err(|e| format!("Failed to add {} listener: {:?}", name, e))?;
        self.registered.push((name, closure));
        Ok(())
    }

    /// Remove every registered listener
    pub fn detach(&mut self) {
        for (name, closure) in self.registered.drain(..) {
            let _ = self
                .window
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.detach();
    }
}
