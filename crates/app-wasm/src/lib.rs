//! Report page WASM build
//!
//! Exposes the signature pad, the derived-parameter calculator, and the
//! template and physician helpers to the report page.

use wasm_bindgen::prelude::*;

mod bridge;
mod forms;
mod host;
mod pad;

pub use forms::{ReportCalculator, ReportTemplates};
pub use pad::SignaturePad;

/// Main entry point for the WASM module
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        if tracing_wasm::try_set_as_global_default().is_err() {
            web_sys::console::warn_1(&"tracing subscriber already installed".into());
        }
    }

    tracing::info!("Report WASM module initialized");
}
