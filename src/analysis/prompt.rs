//! Extraction prompt and structured output schema.

use serde_json::{Map, Value, json};

use crate::model::FoundationType;

/// Report fields the model must return, all as strings.
pub const REQUIRED_FIELDS: [&str; 11] = [
    "foundationType",
    "yearBuilt",
    "sqFt",
    "beds",
    "baths",
    "estimatedValue",
    "floodZone",
    "taxHistory",
    "listingStatus",
    "layoutDescription",
    "reasoning",
];

/// Build the natural-language extraction instruction for one address.
#[must_use]
pub fn instruction(address: &str) -> String {
    let foundations = FoundationType::ALL
        .iter()
        .map(|f| format!("\"{f}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Extract public property data for {address} for a general contractor site assessment.\n\
         Provide details including beds, baths, sqft, year built, foundation type, estimated value, \
         flood zone, tax assessment history, listing status, layout description, and professional reasoning.\n\
         \n\
         For foundation type, it must be one of: {foundations}.\n\
         \n\
         In the reasoning section, provide \"Contractor Notes\" focusing on site access, potential \
         structural age concerns, and foundation implications for renovation or repair work."
    )
}

fn describe(field: &str) -> &'static str {
    match field {
        "foundationType" => "The type of foundation.",
        "yearBuilt" => "Year the property was built.",
        "sqFt" => "Square footage of the property.",
        "beds" => "Number of bedrooms.",
        "baths" => "Number of bathrooms.",
        "estimatedValue" => "Estimated value of the property.",
        "floodZone" => "Flood zone classification.",
        "taxHistory" => "Brief summary of recent tax assessment history.",
        "listingStatus" => "Current listing status (e.g. Active, Sold, Off Market).",
        "layoutDescription" => "Brief description of the layout.",
        "reasoning" => {
            "Contractor notes on site conditions, foundation implications, and age-related concerns."
        }
        _ => "",
    }
}

/// Response schema constraining the reply to one flat object of strings.
#[must_use]
pub fn response_schema() -> Value {
    let mut properties = Map::new();
    for field in REQUIRED_FIELDS {
        let mut property = json!({
            "type": "STRING",
            "description": describe(field),
        });
        if field == "foundationType" {
            property["enum"] = FoundationType::ALL
                .iter()
                .map(|f| Value::from(f.as_str()))
                .collect();
        }
        properties.insert(field.to_string(), property);
    }

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": REQUIRED_FIELDS,
    })
}
