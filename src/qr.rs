//! Scannable codes for the back of the cards.

use std::fmt::Write;

use qrcode::{Color, EcLevel, QrCode};
use thiserror::Error;

use crate::sheet::num;

/// Width of one QR module. Equivalent to a box size of 8 at 10 units per mm.
pub const MODULE_MM: f64 = 0.8;
/// Light border required around the symbol, in modules.
pub const QUIET_ZONE: usize = 4;

#[derive(Debug, Error)]
pub enum CodeError {
    #[error("cannot encode '{payload}' as a code: {reason}")]
    Encode { payload: String, reason: String },
}

/// Vector drawing of one code, with its origin at the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeSymbol {
    /// Self-contained SVG element(s) in millimeter units.
    pub path: String,
    /// Side length of the square symbol, quiet zone included.
    pub side_mm: f64,
}

/// Turns a payload into a positioned-at-origin vector code.
pub trait CodeGenerator {
    fn generate(&self, payload: &str) -> Result<CodeSymbol, CodeError>;
}

/// QR codes at medium error correction.
#[derive(Debug, Clone)]
pub struct QrCodeGenerator {
    pub module_mm: f64,
    pub quiet_zone: usize,
}

impl Default for QrCodeGenerator {
    fn default() -> Self {
        Self {
            module_mm: MODULE_MM,
            quiet_zone: QUIET_ZONE,
        }
    }
}

impl CodeGenerator for QrCodeGenerator {
    fn generate(&self, payload: &str) -> Result<CodeSymbol, CodeError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M).map_err(
            |err| CodeError::Encode {
                payload: payload.to_string(),
                reason: err.to_string(),
            },
        )?;
        let width = code.width();
        let colors = code.to_colors();
        let path = modules_to_path(&colors, width, self.quiet_zone, self.module_mm);
        Ok(CodeSymbol {
            path,
            side_mm: (width + 2 * self.quiet_zone) as f64 * self.module_mm,
        })
    }
}

/// Draw every horizontal run of dark modules as one closed subpath.
fn modules_to_path(colors: &[Color], width: usize, quiet_zone: usize, module_mm: f64) -> String {
    let mut d = String::new();
    for (y, row) in colors.chunks(width).enumerate() {
        let mut x = 0;
        while x < row.len() {
            if row[x] != Color::Dark {
                x += 1;
                continue;
            }
            let start = x;
            while x < row.len() && row[x] == Color::Dark {
                x += 1;
            }
            let run = (x - start) as f64 * module_mm;
            let _ = write!(
                d,
                "M{},{}h{}v{}h-{}z",
                num((start + quiet_zone) as f64 * module_mm),
                num((y + quiet_zone) as f64 * module_mm),
                num(run),
                num(module_mm),
                num(run),
            );
        }
    }
    format!(r##"<path d="{d}" fill="#000000" stroke="none"/>"##)
}
