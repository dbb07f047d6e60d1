//! TrueType font registration for chart text.
//!
//! Plotters is built without its system font stack, so text only renders once
//! a font has been registered under [`FONT_FAMILY`]. DejaVu Sans ships with the
//! binary and is used unless `--font` names another file.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use plotters::style::FontStyle;
use tracing::{debug, info};

use crate::error::AppError;

/// Family name every text element in a chart asks for.
pub const FONT_FAMILY: &str = "sans-serif";

static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

static REGISTERED: AtomicBool = AtomicBool::new(false);

/// Register the chart font: `font` when given (it must load), else the
/// bundled DejaVu Sans.
pub fn register_chart_font(font: Option<&Path>) -> Result<(), AppError> {
    match font {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| {
                AppError::config(format!("Failed to read font '{}': {e}", path.display()))
            })?;
            // Plotters keeps registered font data for the life of the process.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if !register(bytes) {
                return Err(AppError::config(format!(
                    "Invalid TrueType font '{}'",
                    path.display()
                )));
            }
            info!(font = %path.display(), "registered chart font");
            Ok(())
        }
        None => register_bundled(),
    }
}

/// Make sure some font is registered before drawing text.
pub fn ensure_chart_font() -> Result<(), AppError> {
    if REGISTERED.load(Ordering::Acquire) {
        return Ok(());
    }
    register_bundled()
}

fn register_bundled() -> Result<(), AppError> {
    if !register(BUNDLED_FONT) {
        return Err(AppError::output("Bundled chart font failed to load"));
    }
    debug!("registered bundled DejaVu Sans");
    Ok(())
}

fn register(bytes: &'static [u8]) -> bool {
    let ok = plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok();
    if ok {
        REGISTERED.store(true, Ordering::Release);
    }
    ok
}
