//! Image-based ingredient detection
//!
//! The vision model itself lives behind [`ImageAnalyzer`]. This module owns
//! what surrounds the call: validating and encoding the image, the prompts,
//! and turning the model's free-form reply into [`DetectedIngredient`]s.
//! Registering them is [`crate::services::InventoryItem`]'s job.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Largest image accepted for analysis (20 MiB)
pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// Instructions given to the model as the system message
pub const SYSTEM_PROMPT: &str = "You are the manager of a refrigerator's food inventory. \
Given an image of a shopping cart, analyze it and extract the ingredients.\n\
1. Extract the ingredients to be stored in the refrigerator.\n\
2. Extract the quantity of each ingredient and the unit used to count it.\n\
3. Choose a typical storage period for each ingredient.";

/// Output format requested from the model
pub const USER_PROMPT: &str = r#"Analyze the image and list the ingredients to keep in the refrigerator as JSON:
{
  "ingredients": [
    {"name": "사과", "quantity": 3, "unit": "개", "expiry_days": 14},
    {"name": "파프리카", "quantity": 2, "unit": "개", "expiry_days": 10}
  ]
}
- Only include ingredients stored in the refrigerator.
- name: a common Korean name without color or brand details.
- expiry_days: whole days.
- unit: the usual unit for the ingredient.
- quantity: an integer or decimal, e.g. 2.5, 3, 4.5."#;

/// Errors from image analysis
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Image is {size} bytes; the limit is {limit} bytes")]
    ImageTooLarge { size: u64, limit: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Analyzer service error: {0}")]
    Service(String),

    #[error("Could not read analyzer response: {0}")]
    Parse(#[from] ParseError),
}

/// Errors turning a model reply into ingredients
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An image ready to send to an analyzer
#[derive(Debug, Clone)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl ImagePayload {
    /// Reads an image file, rejecting anything over [`MAX_IMAGE_BYTES`]
    pub fn from_file(path: &Path) -> Result<Self, AnalyzerError> {
        let size = std::fs::metadata(path)?.len();
        check_size(size)?;
        let bytes = std::fs::read(path)?;
        Ok(Self {
            bytes,
            mime_type: mime_type_for(path),
        })
    }

    /// Wraps bytes already in memory; `file_name` only decides the MIME type
    pub fn from_bytes(bytes: Vec<u8>, file_name: &str) -> Result<Self, AnalyzerError> {
        check_size(bytes.len() as u64)?;
        Ok(Self {
            bytes,
            mime_type: mime_type_for(Path::new(file_name)),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// `data:<mime>;base64,<payload>` form accepted by vision APIs
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

fn check_size(size: u64) -> Result<(), AnalyzerError> {
    if size > MAX_IMAGE_BYTES {
        return Err(AnalyzerError::ImageTooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// MIME type by file extension; unknown extensions are sent as JPEG
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// A vision model that answers a prompt about an image
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        image: &ImagePayload,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AnalyzerError>;
}

/// Asks the analyzer for the ingredients in `image` using the stock prompts
pub async fn detect_ingredients<A>(
    analyzer: &A,
    image: &ImagePayload,
) -> Result<Vec<DetectedIngredient>, AnalyzerError>
where
    A: ImageAnalyzer + ?Sized,
{
    let reply = analyzer.analyze(image, SYSTEM_PROMPT, USER_PROMPT).await?;
    let ingredients = parse_ingredient_response(&reply)?;
    tracing::info!("Analyzer detected {} ingredients", ingredients.len());
    Ok(ingredients)
}

/// Quantity as the model wrote it: usually a number, sometimes text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(t) => write!(f, "{}", t),
        }
    }
}

/// One ingredient recognized in an image
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectedIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<Quantity>,
    #[serde(default)]
    pub unit: String,
    #[serde(default, deserialize_with = "lenient_days")]
    pub expiry_days: Option<i64>,
}

#[derive(Deserialize)]
struct IngredientReply {
    #[serde(default)]
    ingredients: Vec<DetectedIngredient>,
}

fn lenient_days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    })
}

/// Parses a model reply into ingredients
///
/// The JSON object may be wrapped in a ```` ```json ```` fence, a bare
/// fence, or surrounded by prose. A reply without an `ingredients` key
/// yields an empty list; anything that is not valid JSON is an error.
pub fn parse_ingredient_response(text: &str) -> Result<Vec<DetectedIngredient>, ParseError> {
    let json_text = extract_json(text);
    let reply: IngredientReply = serde_json::from_str(json_text)?;
    Ok(reply.ingredients)
}

fn extract_json(text: &str) -> &str {
    if let Some(start) = text.find("```json") {
        return fenced_body(&text[start + "```json".len()..]);
    }
    if let Some(start) = text.find("```") {
        return fenced_body(&text[start + "```".len()..]);
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

fn fenced_body(rest: &str) -> &str {
    let body = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    body.trim()
}
