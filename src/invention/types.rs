//! Invention data types
//!
//! An `Invention` is one generated record: a structured text concept, an
//! optional embedded image, and the request that produced it. Concept fields
//! are serde-defaulted so that sparse records from older snapshots still
//! deserialize; the absence of `visual` is the canonical representation of
//! "no image", whether generation failed, is still pending, or the payload
//! was stripped to recover storage space.

use serde::{Deserialize, Serialize};

/// Resource mode steering both concept guidelines and visual style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    /// Buildable from cheap hardware-store materials
    Diy,
    /// High-end commercial product design
    #[default]
    Pro,
    /// Printable on a hobbyist FDM printer
    #[serde(rename = "3dprint")]
    ThreeDPrint,
    /// Bait recipe rather than a physical tool
    Bait,
    /// Practical everyday tackle
    Normal,
}

impl ResourceMode {
    /// Stable lowercase label, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceMode::Diy => "diy",
            ResourceMode::Pro => "pro",
            ResourceMode::ThreeDPrint => "3dprint",
            ResourceMode::Bait => "bait",
            ResourceMode::Normal => "normal",
        }
    }
}

impl std::str::FromStr for ResourceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "diy" => Ok(ResourceMode::Diy),
            "pro" => Ok(ResourceMode::Pro),
            "3dprint" => Ok(ResourceMode::ThreeDPrint),
            "bait" => Ok(ResourceMode::Bait),
            "normal" => Ok(ResourceMode::Normal),
            other => Err(format!("unknown resource mode '{}'", other)),
        }
    }
}

/// A point-in-time weather snapshot the invention should adapt to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature in degrees Celsius
    pub temperature: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Barometric pressure in hPa
    pub pressure: f64,
    /// Sky condition label ("Overcast", "Clear", ...)
    pub condition: String,
}

/// Parameters for one generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventionRequest {
    /// The problem the invention should solve; must be non-empty
    pub challenge: String,
    /// Fishing environment description (lake, river, winter pond, ...)
    #[serde(default)]
    pub environment: String,
    /// Resource mode
    #[serde(default)]
    pub resource_mode: ResourceMode,
    /// Ingredients or materials the user already has
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_supplies: Option<String>,
    /// Current weather, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
}

/// The structured text concept returned by the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Catchy product name
    #[serde(default)]
    pub name: String,
    /// Short slogan
    #[serde(default)]
    pub tagline: String,
    /// What it is and what it does
    #[serde(default)]
    pub description: String,
    /// How it works (or the attraction profile, for bait)
    #[serde(default)]
    pub mechanism: String,
    /// Materials or ingredients
    #[serde(default)]
    pub materials: Vec<String>,
    /// Prompt used for the visual generation step
    #[serde(default)]
    pub visual_prompt: String,
    /// 1-100; meaning depends on resource mode (ease of build,
    /// printability, ease of preparation, or commercial viability)
    #[serde(default)]
    pub feasibility_score: u8,
    /// Analysis justifying the score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feasibility_analysis: Option<String>,
    /// Ordered build / recipe / usage steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    /// Benefits
    #[serde(default)]
    pub pros: Vec<String>,
    /// Drawbacks
    #[serde(default)]
    pub cons: Vec<String>,
}

/// An embeddable generated image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualPayload {
    /// Image MIME type, e.g. "image/png"
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

/// One generated invention record, the unit of gallery persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invention {
    /// Opaque unique identifier, stable for the record's lifetime
    pub id: String,
    /// Creation timestamp in milliseconds since the epoch
    #[serde(default)]
    pub created_at: i64,
    /// The generated text concept
    #[serde(flatten)]
    pub concept: Concept,
    /// Generated image; absent if generation failed, is pending, or the
    /// payload was degraded away
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<VisualPayload>,
    /// The request that produced this invention. Optional: records saved
    /// before this field existed deserialize with `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<InventionRequest>,
}

impl Invention {
    /// Materialize a new record from a freshly generated concept.
    /// The visual arrives later (or never).
    pub fn new(id: String, created_at: i64, concept: Concept, request: InventionRequest) -> Self {
        Self {
            id,
            created_at,
            concept,
            visual: None,
            request: Some(request),
        }
    }

    /// Whether this record carries an image payload
    pub fn has_visual(&self) -> bool {
        self.visual.is_some()
    }

    /// Drop the image payload, keeping all textual data
    pub fn strip_visual(&mut self) {
        self.visual = None;
    }
}
