use qrcode::{Color as Module, EcLevel, QrCode};

use crate::core::{InvoiceError, Section};
use crate::render::layout::{Color, Page, mm};

/// Printed size of the code, without quiet zone.
pub const CODE_SIZE: f32 = mm(46.0);
const CROSS_SIZE: f32 = mm(7.0);

/// Module matrix of an encoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl QrMatrix {
    /// Encode with error correction level M, as the QR-bill requires.
    pub fn encode(payload: &str) -> Result<Self, InvoiceError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
            .map_err(|e| InvoiceError::render(Section::PaymentPart, format!("QR encoding failed: {e}")))?;
        let dark = code
            .to_colors()
            .into_iter()
            .map(|m| m == Module::Dark)
            .collect();
        Ok(Self {
            width: code.width(),
            dark,
        })
    }

    /// Modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.dark[y * self.width + x]
    }

    /// Horizontal runs of dark modules as `(row, first column, length)`.
    pub fn dark_runs(&self) -> Vec<(usize, usize, usize)> {
        let mut runs = Vec::new();
        for y in 0..self.width {
            let mut x = 0;
            while x < self.width {
                if !self.is_dark(x, y) {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < self.width && self.is_dark(x, y) {
                    x += 1;
                }
                runs.push((y, start, x - start));
            }
        }
        runs
    }

    /// Draw the code as a `CODE_SIZE` square at (`left`, `top`) with the
    /// Swiss cross in its centre.
    pub fn draw(&self, page: &mut Page, left: f32, top: f32) {
        let module = CODE_SIZE / self.width as f32;
        for (row, start, len) in self.dark_runs() {
            page.rect(
                left + start as f32 * module,
                top + row as f32 * module,
                len as f32 * module,
                module,
                Color::BLACK,
            );
        }
        draw_swiss_cross(page, left + CODE_SIZE / 2.0, top + CODE_SIZE / 2.0);
    }
}

/// White-bordered black square with a white cross, centred on (`cx`, `cy`).
fn draw_swiss_cross(page: &mut Page, cx: f32, cy: f32) {
    let half = CROSS_SIZE / 2.0;
    page.rect(cx - half, cy - half, CROSS_SIZE, CROSS_SIZE, Color::WHITE);

    let border = mm(0.5);
    let inner = CROSS_SIZE - 2.0 * border;
    page.rect(cx - half + border, cy - half + border, inner, inner, Color::BLACK);

    let arm_long = inner * 0.6;
    let arm_short = inner * 0.19;
    page.rect(cx - arm_short / 2.0, cy - arm_long / 2.0, arm_short, arm_long, Color::WHITE);
    page.rect(cx - arm_long / 2.0, cy - arm_short / 2.0, arm_long, arm_short, Color::WHITE);
}
