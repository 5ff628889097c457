//! `SignaturePad` class exported to the page
//!
//! Mounts a [`SignatureCapture`] on a `<canvas>`, feeds it mouse, touch and
//! resize events, and copies changed pixels back to the canvas.

use std::cell::RefCell;
use std::rc::Rc;

use ecoreport_config::{SignatureConfig, ValidationPolicy};
use ecoreport_ipc::{PointerInput, TouchPoint};
use signature::{
    ImportOutcome, ListenerId, LoadFormat, PendingImport, SaveFormat, SavedSignature,
    SignatureCapture, Stroke, load_signature, save_signature, validate_signature,
};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement,
    ImageData, MouseEvent, TouchEvent,
};

use crate::bridge::{self, js_error};
use crate::host::CanvasHost;

/// Canvas element and its 2D context
struct Canvas {
    element: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl Canvas {
    fn find(canvas_id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let element = document
            .get_element_by_id(canvas_id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let context = element
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { element, context })
    }

    /// Match the canvas buffer to the capture surface while keeping its
    /// on-screen size
    fn fit(&self, capture: &SignatureCapture) {
        let rect = self.element.get_bounding_client_rect();
        let style = self.element.style();
        for (name, value) in [("width", rect.width()), ("height", rect.height())] {
            if let Err(e) = style.set_property(name, &format!("{value}px")) {
                warn!("Failed to set canvas {}: {:?}", name, e);
            }
        }
        self.element.set_width(capture.width());
        self.element.set_height(capture.height());
    }
}

struct PadState {
    capture: SignatureCapture,
    canvas: Option<Canvas>,
}

impl PadState {
    /// Copy the surface's dirty region to the canvas
    fn blit(&mut self) {
        let Some(canvas) = &self.canvas else {
            return;
        };
        let Some(region) = self.capture.take_dirty_region() else {
            return;
        };
        let Some(surface) = self.capture.surface() else {
            return;
        };
        if region.width == 0 || region.height == 0 {
            return;
        }

        let bytes = surface.region_rgba8(region);
        let result = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(bytes.as_slice()),
            region.width,
            region.height,
        )
        .and_then(|data| {
            canvas
                .context
                .put_image_data(&data, region.x as f64, region.y as f64)
        });
        if let Err(e) = result {
            warn!("Failed to upload signature pixels: {:?}", e);
        }
    }
}

type SharedState = Rc<RefCell<PadState>>;

/// Run `f` on the pad, then upload pixels and dispatch queued events
fn update<R>(state: &SharedState, f: impl FnOnce(&mut PadState) -> R) -> Option<R> {
    let result = match state.try_borrow_mut() {
        Ok(mut pad) => {
            let result = f(&mut pad);
            pad.blit();
            Some(result)
        }
        Err(_) => {
            warn!("Signature pad is busy; event dropped");
            None
        }
    };
    bridge::flush_events();
    result
}

/// A DOM listener that is removed when dropped
struct DomListener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl DomListener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        passive: Option<bool>,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        match passive {
            Some(passive) => {
                let options = AddEventListenerOptions::new();
                options.set_passive(passive);
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    kind,
                    closure.as_ref().unchecked_ref(),
                    &options,
                )?;
            }
            None => {
                target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
            }
        }
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for DomListener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
        {
            warn!("Failed to remove {} listener: {:?}", self.kind, e);
        }
    }
}

fn mouse_input(event: &Event) -> Option<PointerInput> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(PointerInput::mouse(mouse.client_x() as f32, mouse.client_y() as f32))
}

fn touch_input(event: &Event) -> Option<PointerInput> {
    let touch_event = event.dyn_ref::<TouchEvent>()?;
    let list = touch_event.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| TouchPoint {
            client_x: t.client_x() as f32,
            client_y: t.client_y() as f32,
        })
        .collect();
    Some(PointerInput::Touch { touches })
}

/// Parse an optional JS options object through its JSON form
fn from_js_json<T: serde::de::DeserializeOwned + Default>(value: &JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    let json = js_sys::JSON::stringify(value)?
        .as_string()
        .unwrap_or_default();
    serde_json::from_str(&json).map_err(js_error)
}

/// Signature pad bound to a canvas element
#[wasm_bindgen]
pub struct SignaturePad {
    state: SharedState,
    listeners: Vec<DomListener>,
    change_listener: Option<ListenerId>,
}

#[wasm_bindgen]
impl SignaturePad {
    /// Mount on the canvas with id `canvas_id`. A missing canvas gives an
    /// inert pad rather than an error.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, options: JsValue) -> Result<SignaturePad, JsValue> {
        let config: SignatureConfig = from_js_json(&options)?;
        let canvas = Canvas::find(canvas_id);

        let host = canvas
            .as_ref()
            .map(|c| Box::new(CanvasHost::new(c.element.clone())) as Box<dyn signature::SurfaceHost>);
        let mut capture = SignatureCapture::new(host, &config).map_err(js_error)?;

        let change_listener = canvas.as_ref().map(|c| {
            let target: EventTarget = c.element.clone().into();
            capture.on_change(move |change| bridge::queue_change(&target, change.clone()))
        });

        if let Some(canvas) = &canvas {
            canvas.fit(&capture);
        } else {
            warn!("Canvas #{} not found; signature pad is inert", canvas_id);
        }

        let state = Rc::new(RefCell::new(PadState { capture, canvas }));
        let mut pad = SignaturePad {
            state,
            listeners: Vec::new(),
            change_listener,
        };
        pad.attach_listeners()?;
        update(&pad.state, |_| ());
        info!("Signature pad ready on #{}", canvas_id);
        Ok(pad)
    }

    fn attach_listeners(&mut self) -> Result<(), JsValue> {
        let target: EventTarget = match &self.state.borrow().canvas {
            Some(canvas) => canvas.element.clone().into(),
            None => return Ok(()),
        };

        let s = self.state.clone();
        self.listeners.push(DomListener::attach(&target, "mousedown", None, move |e| {
            if let Some(input) = mouse_input(&e) {
                update(&s, |pad| pad.capture.start_stroke(&input));
            }
        })?);

        let s = self.state.clone();
        self.listeners.push(DomListener::attach(&target, "mousemove", None, move |e| {
            if let Some(input) = mouse_input(&e) {
                update(&s, |pad| pad.capture.extend_stroke(&input));
            }
        })?);

        for kind in ["mouseup", "mouseleave", "touchend"] {
            let s = self.state.clone();
            self.listeners.push(DomListener::attach(&target, kind, None, move |_| {
                update(&s, |pad| pad.capture.end_stroke());
            })?);
        }

        // Non-passive so preventDefault can stop the page from scrolling
        let s = self.state.clone();
        self.listeners.push(DomListener::attach(&target, "touchstart", Some(false), move |e| {
            e.prevent_default();
            if let Some(input) = touch_input(&e) {
                update(&s, |pad| pad.capture.start_stroke(&input));
            }
        })?);

        let s = self.state.clone();
        self.listeners.push(DomListener::attach(&target, "touchmove", Some(false), move |e| {
            e.prevent_default();
            if let Some(input) = touch_input(&e) {
                update(&s, |pad| pad.capture.extend_stroke(&input));
            }
        })?);

        if let Some(window) = web_sys::window() {
            let s = self.state.clone();
            self.listeners.push(DomListener::attach(&window, "resize", None, move |_| {
                update(&s, PadState::resize);
            })?);
        }

        debug!("Attached {} listener(s)", self.listeners.len());
        Ok(())
    }

    pub fn clear(&self) {
        update(&self.state, |pad| pad.capture.clear());
    }

    /// Remove the last stroke; false if there was none
    pub fn undo(&self) -> bool {
        update(&self.state, |pad| pad.capture.undo()).unwrap_or(false)
    }

    /// Re-fit the canvas to its current on-screen size
    pub fn resize(&self) {
        update(&self.state, PadState::resize);
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().capture.is_empty()
    }

    #[wasm_bindgen(js_name = isValid)]
    pub fn is_valid(&self, min_strokes: Option<usize>, min_points: Option<usize>) -> bool {
        self.state.borrow().capture.is_valid(
            min_strokes.unwrap_or(ecoreport_config::DEFAULT_MIN_STROKES),
            min_points.unwrap_or(ecoreport_config::DEFAULT_MIN_POINTS),
        )
    }

    /// `{isEmpty, isValid, strokeCount, totalPoints, width, height}`
    pub fn info(&self) -> Result<JsValue, JsValue> {
        let info = self.state.borrow().capture.info();
        let json = serde_json::to_string(&info).map_err(js_error)?;
        js_sys::JSON::parse(&json)
    }

    /// Throws the policy's message if the signature is not acceptable
    pub fn validate(&self, policy: JsValue) -> Result<(), JsValue> {
        let policy: ValidationPolicy = from_js_json(&policy)?;
        validate_signature(&self.state.borrow().capture, &policy).map_err(js_error)
    }

    #[wasm_bindgen(js_name = toDataURL)]
    pub fn to_data_url(&self, mime: Option<String>, quality: Option<f32>) -> Result<String, JsValue> {
        let mime = mime.unwrap_or_else(|| signature::PNG_MIME.to_string());
        self.state
            .borrow()
            .capture
            .export_image(&mime, quality)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = toBase64)]
    pub fn to_base64(&self) -> Result<String, JsValue> {
        self.state.borrow().capture.export_base64().map_err(js_error)
    }

    /// Encoded image bytes, returned to JS as a `Uint8Array`
    #[wasm_bindgen(js_name = toBlob)]
    pub fn to_blob(&self, mime: Option<String>, quality: Option<f32>) -> Result<Vec<u8>, JsValue> {
        let mime = mime.unwrap_or_else(|| signature::PNG_MIME.to_string());
        self.state
            .borrow()
            .capture
            .export_blob(&mime, quality)
            .map_err(js_error)
    }

    /// Resolves to true when the image was applied, false when a later
    /// import or clear superseded it
    #[wasm_bindgen(js_name = fromDataURL)]
    pub fn from_data_url(&self, data_url: String) -> js_sys::Promise {
        let pending = self.state.borrow_mut().capture.import_image(data_url);
        complete(self.state.clone(), pending)
    }

    #[wasm_bindgen(js_name = fromBase64)]
    pub fn from_base64(&self, base64: &str) -> js_sys::Promise {
        let pending = self.state.borrow_mut().capture.import_base64(base64);
        complete(self.state.clone(), pending)
    }

    /// Save as `"base64"` (default), `"dataURL"` or `"blob"`
    pub fn save(&self, format: Option<String>) -> Result<JsValue, JsValue> {
        let format = match format {
            Some(f) => f.parse::<SaveFormat>().map_err(js_error)?,
            None => SaveFormat::default(),
        };
        match save_signature(&self.state.borrow().capture, format).map_err(js_error)? {
            SavedSignature::Text(text) => Ok(JsValue::from_str(&text)),
            SavedSignature::Bytes(bytes) => Ok(js_sys::Uint8Array::from(bytes.as_slice()).into()),
        }
    }

    /// Load from `"base64"` (default) or `"dataURL"`
    pub fn load(&self, data: &str, format: Option<String>) -> Result<js_sys::Promise, JsValue> {
        let format = match format {
            Some(f) => f.parse::<LoadFormat>().map_err(js_error)?,
            None => LoadFormat::default(),
        };
        let pending = load_signature(&mut self.state.borrow_mut().capture, data, format);
        Ok(complete(self.state.clone(), pending))
    }

    /// Committed strokes as JSON (`[[{x, y}, ...], ...]`)
    pub fn strokes(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.state.borrow().capture.strokes()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = loadStrokes)]
    pub fn load_strokes(&self, json: &str) -> Result<(), JsValue> {
        let strokes: Vec<Stroke> = serde_json::from_str(json).map_err(js_error)?;
        update(&self.state, |pad| pad.capture.load_strokes(strokes));
        Ok(())
    }

    #[wasm_bindgen(js_name = setPenColor)]
    pub fn set_pen_color(&self, color: &str) -> Result<(), JsValue> {
        self.state
            .borrow_mut()
            .capture
            .set_pen_color(color)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = setPenWidth)]
    pub fn set_pen_width(&self, width: f32) {
        self.state.borrow_mut().capture.set_pen_width(width);
    }

    #[wasm_bindgen(js_name = setBackgroundColor)]
    pub fn set_background_color(&self, color: &str) -> Result<(), JsValue> {
        update(&self.state, |pad| pad.capture.set_background_color(color))
            .unwrap_or(Ok(()))
            .map_err(js_error)
    }

    /// Detach every listener. The pad keeps its content but stops
    /// responding to input.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        if let Some(id) = self.change_listener.take() {
            self.state.borrow_mut().capture.off_change(id);
        }
        info!("Signature pad destroyed");
    }
}

impl PadState {
    fn resize(&mut self) {
        self.capture.handle_resize();
        if let Some(canvas) = &self.canvas {
            canvas.fit(&self.capture);
        }
    }
}

/// Decode off the calling handler and apply the result
fn complete(state: SharedState, pending: PendingImport) -> js_sys::Promise {
    future_to_promise(async move {
        // Yield so the caller's handler returns before the decode runs
        JsFuture::from(js_sys::Promise::resolve(&JsValue::UNDEFINED)).await?;

        let decoded = pending.decode();
        let outcome = update(&state, |pad| pad.capture.complete_import(decoded))
            .ok_or_else(|| js_error("signature pad is busy"))?
            .map_err(js_error)?;

        Ok(JsValue::from_bool(outcome == ImportOutcome::Applied))
    })
}
