//! Lead and report records.
//!
//! These types are shared by the analysis client, the lead flow and the
//! rendered views. They are created once and never mutated afterwards: a new
//! submission or analysis replaces them wholesale.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contact details and property address captured by the lead form.
///
/// Absent form fields deserialize as empty so [`LeadInfo::validate`] can
/// name them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadInfo {
    /// Full name of the prospect.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Free-text property address to analyze.
    pub address: String,
}

/// Lead validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeadError {
    /// A required form field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl LeadInfo {
    /// Check that every field is present.
    ///
    /// Presence is the only rule; format checks are left to the browser's
    /// `email`/`tel` input types.
    pub fn validate(&self) -> Result<(), LeadError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(LeadError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// Foundation classification reported by the model.
///
/// Deserialization never fails: anything outside the four known labels
/// collapses to [`FoundationType::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum FoundationType {
    Slab,
    #[serde(rename = "Crawl Space")]
    CrawlSpace,
    Basement,
    #[default]
    Unknown,
}

impl FoundationType {
    /// All variants, in the order the provider schema lists them.
    pub const ALL: [Self; 4] = [Self::Slab, Self::CrawlSpace, Self::Basement, Self::Unknown];

    /// Wire label used by the provider schema and the JSON API.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slab => "Slab",
            Self::CrawlSpace => "Crawl Space",
            Self::Basement => "Basement",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<&str> for FoundationType {
    fn from(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str() == label.trim())
            .unwrap_or_default()
    }
}

impl From<String> for FoundationType {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl fmt::Display for FoundationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A web page the model cited while answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

/// Property report assembled from one successful analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub foundation_type: FoundationType,
    pub year_built: String,
    pub sq_ft: String,
    pub beds: String,
    pub baths: String,
    pub estimated_value: String,
    pub flood_zone: String,
    pub tax_history: String,
    pub listing_status: String,
    pub layout_description: String,
    /// Contractor notes, markdown.
    pub reasoning: String,
    /// Map search deep link for the analyzed address.
    pub map_link: String,
    /// Cited sources, unique by uri, in first-seen order.
    pub grounding_sources: Vec<GroundingSource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> LeadInfo {
        LeadInfo {
            name: "Jane Smith".to_string(),
            email: "jane@x.com".to_string(),
            phone: "5551234567".to_string(),
            address: "123 Maple Ave, Springfield, IL".to_string(),
        }
    }

    #[test]
    fn test_complete_lead_is_valid() {
        assert_eq!(lead().validate(), Ok(()));
    }

    #[test]
    fn test_blank_field_is_rejected() {
        let mut missing_phone = lead();
        missing_phone.phone = "   ".to_string();
        assert_eq!(
            missing_phone.validate(),
            Err(LeadError::MissingField("phone"))
        );
        assert_eq!(
            LeadError::MissingField("phone").to_string(),
            "phone is required"
        );
    }

    #[test]
    fn test_foundation_labels() {
        assert_eq!(FoundationType::from("Crawl Space"), FoundationType::CrawlSpace);
        assert_eq!(FoundationType::from("Basement"), FoundationType::Basement);
        assert_eq!(FoundationType::from("slab-ish"), FoundationType::Unknown);
        assert_eq!(FoundationType::from(""), FoundationType::Unknown);
    }

    #[test]
    fn test_foundation_serde() {
        let json = serde_json::to_string(&FoundationType::CrawlSpace).unwrap();
        assert_eq!(json, "\"Crawl Space\"");

        let parsed: FoundationType = serde_json::from_str("\"Pier and Beam\"").unwrap();
        assert_eq!(parsed, FoundationType::Unknown);
    }

    #[test]
    fn test_result_uses_camel_case() {
        let result = AnalysisResult {
            foundation_type: FoundationType::Slab,
            year_built: "1987".to_string(),
            sq_ft: "1,850".to_string(),
            beds: "3".to_string(),
            baths: "2".to_string(),
            estimated_value: "$245,000".to_string(),
            flood_zone: "X".to_string(),
            tax_history: "Not available".to_string(),
            listing_status: "Off Market".to_string(),
            layout_description: "Single story ranch".to_string(),
            reasoning: String::new(),
            map_link: "https://www.google.com/maps/search/?api=1&query=x".to_string(),
            grounding_sources: vec![],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["foundationType"], "Slab");
        assert_eq!(value["sqFt"], "1,850");
        assert_eq!(value["mapLink"], "https://www.google.com/maps/search/?api=1&query=x");
        assert!(value["groundingSources"].as_array().unwrap().is_empty());
    }
}
