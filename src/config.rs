use serde::{Serialize, Deserialize};
use crate::geometry::{CANVAS_HEIGHT, CANVAS_WIDTH};

pub const DEFAULT_EXPORT_QUALITY: f64 = 0.8;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    pub width: f64,
    pub height: f64,
    /// JPEG quality of the flattened export, 0.0..=1.0.
    pub export_quality: f64,
}

impl HostConfig {
    /// Quality on the 1..=100 scale the JPEG encoder takes.
    pub fn jpeg_quality(&self) -> u8 {
        (self.export_quality.clamp(0.01, 1.0) * 100.0).round() as u8
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.max(1.0).round() as u32, self.height.max(1.0).round() as u32)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            export_quality: DEFAULT_EXPORT_QUALITY,
        }
    }
}
