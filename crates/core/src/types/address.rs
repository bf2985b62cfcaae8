//! Shipping address persisted between checkout pages.

use serde::{Deserialize, Serialize};

use super::country;

/// A delivery address collected before the order summary page.
///
/// Serialized as camelCase JSON, which is the shape stored in the checkout
/// session and sent to the shop API.
///
/// ## Constraints
///
/// - An address is only deliverable when its primary line is non-empty
///   (see [`ShippingAddress::is_deliverable`]).
/// - `country` holds an ISO 3166-1 alpha-2 code.
///
/// ## Examples
///
/// ```
/// use teslo_core::ShippingAddress;
///
/// let json = r#"{"firstName":"Ada","lastName":"Lovelace","address":"12 St James's Sq",
///     "zipCode":"SW1Y 4JH","city":"London","country":"GB","phone":"+44 20 7946 0000"}"#;
/// let address: ShippingAddress = serde_json::from_str(json).unwrap();
///
/// assert!(address.is_deliverable());
/// assert_eq!(address.country_name(), "United Kingdom");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Primary address line.
    #[serde(default)]
    pub address: String,
    /// Secondary address line (apartment, suite, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    /// Postal/ZIP code, stored as `zipCode` by the address page.
    #[serde(default, rename = "zipCode", alias = "zip")]
    pub zip: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default)]
    pub country: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
}

impl ShippingAddress {
    /// Whether the address can be used to place an order.
    ///
    /// A primary line made only of whitespace counts as missing.
    #[must_use]
    pub fn is_deliverable(&self) -> bool {
        !self.address.trim().is_empty()
    }

    /// Recipient name, e.g. "Ada Lovelace".
    #[must_use]
    pub fn full_name(&self) -> String {
        match (self.first_name.trim(), self.last_name.trim()) {
            ("", "") => String::new(),
            (first, "") => first.to_string(),
            ("", last) => last.to_string(),
            (first, last) => format!("{first} {last}"),
        }
    }

    /// Street line with the secondary line appended when present.
    #[must_use]
    pub fn street_line(&self) -> String {
        match self.address2.as_deref().map(str::trim) {
            Some(line2) if !line2.is_empty() => format!("{}, {line2}", self.address),
            _ => self.address.clone(),
        }
    }

    /// City and postal code, e.g. "London, SW1Y 4JH".
    #[must_use]
    pub fn city_line(&self) -> String {
        format!("{}, {}", self.city, self.zip)
    }

    /// Display name of the country, or the raw code when it is unknown.
    #[must_use]
    pub fn country_name(&self) -> &str {
        country::name_for_code(&self.country).map_or(self.country.as_str(), |name| name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> ShippingAddress {
        ShippingAddress {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            address: "1 Navy Way".to_string(),
            address2: None,
            zip: "20350".to_string(),
            city: "Arlington".to_string(),
            country: "US".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    #[test]
    fn test_deliverable_requires_primary_line() {
        assert!(sample().is_deliverable());

        let empty = ShippingAddress {
            address: String::new(),
            ..sample()
        };
        assert!(!empty.is_deliverable());

        let blank = ShippingAddress {
            address: "   ".to_string(),
            ..sample()
        };
        assert!(!blank.is_deliverable());
    }

    #[test]
    fn test_missing_primary_line_deserializes_as_undeliverable() {
        let address: ShippingAddress = serde_json::from_str("{}").unwrap();
        assert!(!address.is_deliverable());
    }

    #[test]
    fn test_street_line_appends_secondary() {
        assert_eq!(sample().street_line(), "1 Navy Way");

        let with_suite = ShippingAddress {
            address2: Some("Suite 4".to_string()),
            ..sample()
        };
        assert_eq!(with_suite.street_line(), "1 Navy Way, Suite 4");

        let blank_suite = ShippingAddress {
            address2: Some(" ".to_string()),
            ..sample()
        };
        assert_eq!(blank_suite.street_line(), "1 Navy Way");
    }

    #[test]
    fn test_full_name_and_city_line() {
        assert_eq!(sample().full_name(), "Grace Hopper");
        assert_eq!(sample().city_line(), "Arlington, 20350");

        let first_only = ShippingAddress {
            last_name: String::new(),
            ..sample()
        };
        assert_eq!(first_only.full_name(), "Grace");
    }

    #[test]
    fn test_country_name_falls_back_to_code() {
        assert_eq!(sample().country_name(), "United States");

        let unknown = ShippingAddress {
            country: "ZZ".to_string(),
            ..sample()
        };
        assert_eq!(unknown.country_name(), "ZZ");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["firstName"], "Grace");
        assert_eq!(json["lastName"], "Hopper");
        assert!(json.get("address2").is_none());
        assert_eq!(json["zipCode"], "20350");
        assert!(json.get("zip").is_none());
    }

    #[test]
    fn test_zip_code_reads_both_shapes() {
        let stored: ShippingAddress =
            serde_json::from_str(r#"{"address":"1 Main St","zipCode":"10001"}"#).unwrap();
        assert_eq!(stored.zip, "10001");

        let legacy: ShippingAddress =
            serde_json::from_str(r#"{"address":"1 Main St","zip":"10002"}"#).unwrap();
        assert_eq!(legacy.zip, "10002");
    }
}
