use serde::{Deserialize, Serialize};

/// Category of scrap a customer can schedule for pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapType {
    Paper,
    Metal,
    Plastic,
    Electronics,
    Glass,
    Mixed,
}

impl ScrapType {
    pub fn all() -> &'static [ScrapType] {
        &[
            ScrapType::Paper,
            ScrapType::Metal,
            ScrapType::Plastic,
            ScrapType::Electronics,
            ScrapType::Glass,
            ScrapType::Mixed,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            ScrapType::Paper => "Paper",
            ScrapType::Metal => "Metal",
            ScrapType::Plastic => "Plastic",
            ScrapType::Electronics => "E-Waste",
            ScrapType::Glass => "Glass",
            ScrapType::Mixed => "Mixed",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ScrapType::Paper => "📄",
            ScrapType::Metal => "🔩",
            ScrapType::Plastic => "♻️",
            ScrapType::Electronics => "📱",
            ScrapType::Glass => "🫙",
            ScrapType::Mixed => "📦",
        }
    }

    /// Store identifier, matching the serialized form. Used to build row
    /// filters without going through the JSON encoder.
    pub fn wire_name(self) -> &'static str {
        match self {
            ScrapType::Paper => "paper",
            ScrapType::Metal => "metal",
            ScrapType::Plastic => "plastic",
            ScrapType::Electronics => "electronics",
            ScrapType::Glass => "glass",
            ScrapType::Mixed => "mixed",
        }
    }

    /// Indicative buy rate shown on the selection card. Actual amounts are
    /// computed by the backend after weighing.
    pub fn rate_hint(self) -> &'static str {
        match self {
            ScrapType::Paper => "₹12/kg",
            ScrapType::Metal => "₹35/kg",
            ScrapType::Plastic => "₹8/kg",
            ScrapType::Electronics => "₹50/kg",
            ScrapType::Glass => "₹3/kg",
            ScrapType::Mixed => "Varies",
        }
    }
}

/// Approximate weight bracket selected by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightBracket {
    #[serde(rename = "less_than_5kg")]
    LessThan5Kg,
    #[serde(rename = "5_to_10kg")]
    FiveToTenKg,
    #[serde(rename = "10_to_25kg")]
    TenToTwentyFiveKg,
    #[serde(rename = "25_to_50kg")]
    TwentyFiveToFiftyKg,
    #[serde(rename = "more_than_50kg")]
    MoreThan50Kg,
}

impl WeightBracket {
    pub fn all() -> &'static [WeightBracket] {
        &[
            WeightBracket::LessThan5Kg,
            WeightBracket::FiveToTenKg,
            WeightBracket::TenToTwentyFiveKg,
            WeightBracket::TwentyFiveToFiftyKg,
            WeightBracket::MoreThan50Kg,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            WeightBracket::LessThan5Kg => "Less than 5 kg",
            WeightBracket::FiveToTenKg => "5 - 10 kg",
            WeightBracket::TenToTwentyFiveKg => "10 - 25 kg",
            WeightBracket::TwentyFiveToFiftyKg => "25 - 50 kg",
            WeightBracket::MoreThan50Kg => "More than 50 kg",
        }
    }
}

/// Fixed pickup windows offered in step 2 of the wizard.
pub const TIME_SLOTS: [&str; 4] = [
    "9:00 AM - 11:00 AM",
    "11:00 AM - 1:00 PM",
    "2:00 PM - 4:00 PM",
    "4:00 PM - 6:00 PM",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrap_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&ScrapType::Electronics).unwrap(),
            "\"electronics\""
        );
        let t: ScrapType = serde_json::from_str("\"mixed\"").unwrap();
        assert_eq!(t, ScrapType::Mixed);
    }

    #[test]
    fn weight_bracket_wire_names_match_store_ids() {
        assert_eq!(
            serde_json::to_string(&WeightBracket::FiveToTenKg).unwrap(),
            "\"5_to_10kg\""
        );
        let w: WeightBracket = serde_json::from_str("\"more_than_50kg\"").unwrap();
        assert_eq!(w, WeightBracket::MoreThan50Kg);
    }

    #[test]
    fn wire_name_matches_serialized_form() {
        for t in ScrapType::all() {
            let json = serde_json::to_string(t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.wire_name()));
        }
    }

    #[test]
    fn every_scrap_type_has_card_metadata() {
        for t in ScrapType::all() {
            assert!(!t.label().is_empty());
            assert!(!t.icon().is_empty());
            assert!(!t.rate_hint().is_empty());
        }
    }
}
