//! Event bridge to the page
//!
//! Change notifications raised while a pad is borrowed are queued and
//! dispatched as `signaturechange` CustomEvents once the borrow ends, so
//! page listeners may call back into the pad.

use std::cell::RefCell;
use std::collections::VecDeque;

use ecoreport_ipc::{SIGNATURE_CHANGE_EVENT, SignatureChange};
use wasm_bindgen::prelude::*;
use web_sys::EventTarget;

thread_local! {
    /// Notifications waiting to be dispatched, with the element they target
    static EVENT_QUEUE: RefCell<VecDeque<(EventTarget, SignatureChange)>> =
        RefCell::new(VecDeque::new());
}

/// Queue a change notification for `target`
pub fn queue_change(target: &EventTarget, change: SignatureChange) {
    EVENT_QUEUE.with(|queue| {
        queue.borrow_mut().push_back((target.clone(), change));
    });
}

/// Dispatch every queued notification
pub fn flush_events() {
    while let Some((target, change)) = EVENT_QUEUE.with(|queue| queue.borrow_mut().pop_front()) {
        if let Err(e) = dispatch_change(&target, &change) {
            tracing::error!("Failed to dispatch {}: {:?}", SIGNATURE_CHANGE_EVENT, e);
        }
    }
}

/// Fire a `signaturechange` event whose `detail` is `{isEmpty, dataURL}`
fn dispatch_change(target: &EventTarget, change: &SignatureChange) -> Result<(), JsValue> {
    let json = change
        .to_json()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let detail = js_sys::JSON::parse(&json)?;

    let init = web_sys::CustomEventInit::new();
    init.set_detail(&detail);
    let event = web_sys::CustomEvent::new_with_event_init_dict(SIGNATURE_CHANGE_EVENT, &init)?;

    target.dispatch_event(&event)?;
    Ok(())
}

/// Convert a Rust error into a JS `Error`
pub fn js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}
