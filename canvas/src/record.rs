//! Saved-drawing record handed back to the host after export.

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::input::EditorMode;
use crate::scale::{Scale, Viewport};

const PNG_DATA_URL: &str = "data:image/png;base64,";

/// Unit system of the saved drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Feet,
    Pixels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Effective pixels per foot at export time.
    pub scale: f64,
    pub units: Units,
}

/// One exported drawing. Images serialize as PNG data URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingRecord {
    pub id: Uuid,
    pub mode: EditorMode,
    /// Unix milliseconds.
    pub created_at: i64,
    /// Unix milliseconds.
    pub last_modified: i64,
    #[serde(serialize_with = "png_to_data_url", deserialize_with = "png_from_data_url")]
    pub thumbnail: Vec<u8>,
    #[serde(serialize_with = "png_to_data_url", deserialize_with = "png_from_data_url")]
    pub full_image: Vec<u8>,
    pub metadata: RecordMetadata,
}

impl DrawingRecord {
    /// A fresh record stamped with the current time. Auto-generated drawings
    /// are measured in feet; the other modes in pixels.
    #[must_use]
    pub fn new(mode: EditorMode, viewport: Viewport, scale: Scale, full_image: Vec<u8>, thumbnail: Vec<u8>) -> Self {
        let now = now_ms();
        let units = if mode == EditorMode::AutoGenerated { Units::Feet } else { Units::Pixels };
        Self {
            id: Uuid::new_v4(),
            mode,
            created_at: now,
            last_modified: now,
            thumbnail,
            full_image,
            metadata: RecordMetadata {
                canvas_width: viewport.width,
                canvas_height: viewport.height,
                scale: scale.effective(),
                units,
            },
        }
    }

    /// Replace both images and bump `last_modified`.
    pub fn update_images(&mut self, full_image: Vec<u8>, thumbnail: Vec<u8>) {
        self.full_image = full_image;
        self.thumbnail = thumbnail;
        self.last_modified = now_ms().max(self.created_at);
    }

    /// Pretty JSON for hosts and the CLI.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

fn png_to_data_url<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{PNG_DATA_URL}{}", STANDARD.encode(bytes)))
}

fn png_from_data_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    let payload = s.strip_prefix(PNG_DATA_URL).unwrap_or(&s);
    STANDARD.decode(payload).map_err(serde::de::Error::custom)
}
