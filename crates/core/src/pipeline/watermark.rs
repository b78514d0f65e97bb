//! Watermark configuration and drawtext filter construction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the main watermark text is anchored in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkAnchor {
    Center,
    Bottom,
    BottomRight,
    TopLeft,
    TopRight,
}

impl WatermarkAnchor {
    /// The drawtext x/y expressions for this anchor.
    fn position_expr(&self) -> (&'static str, &'static str) {
        match self {
            Self::Center => ("(w-text_w)/2", "(h-text_h)/2"),
            Self::Bottom => ("(w-text_w)/2", "h-text_h-20"),
            Self::BottomRight => ("w-text_w-20", "h-text_h-20"),
            Self::TopLeft => ("20", "20"),
            Self::TopRight => ("w-text_w-20", "20"),
        }
    }
}

/// Fixed watermark configuration, immutable after process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkSpec {
    /// The main mark, rendered at `anchor`.
    pub main_text: String,
    /// Contact line, always centered at the top of the frame.
    pub contact_text: String,
    /// Font file used for both text elements.
    pub font_file: PathBuf,
    pub font_size: u32,
    pub color: String,
    pub anchor: WatermarkAnchor,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            main_text: "made with clipstitch".to_string(),
            contact_text: "t.me/clipstitch_bot".to_string(),
            font_file: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
            font_size: 28,
            color: "white@0.8".to_string(),
            anchor: WatermarkAnchor::BottomRight,
        }
    }
}

/// Escapes text for embedding into a drawtext filter expression.
///
/// The filter grammar treats these characters as syntax; an unescaped quote
/// or colon in the text would truncate or malform the filter. The inputs are
/// fixed configuration, so this is a correctness concern, not a security
/// boundary.
pub fn escape_drawtext(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '\'' | ':' | '%' | ',' | '[' | ']' | ';' | '=' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Builds the complete `-vf` filter value: the main mark at its anchor plus
/// the contact line centered at the top.
pub fn drawtext_filter(spec: &WatermarkSpec) -> String {
    let font_file = escape_drawtext(&spec.font_file.to_string_lossy());
    let (main_x, main_y) = spec.anchor.position_expr();

    let main = format!(
        "drawtext=fontfile={}:text={}:fontsize={}:fontcolor={}:x={}:y={}",
        font_file,
        escape_drawtext(&spec.main_text),
        spec.font_size,
        spec.color,
        main_x,
        main_y,
    );
    let contact = format!(
        "drawtext=fontfile={}:text={}:fontsize={}:fontcolor={}:x=(w-text_w)/2:y=20",
        font_file,
        escape_drawtext(&spec.contact_text),
        spec.font_size,
        spec.color,
    );

    format!("{},{}", main, contact)
}
