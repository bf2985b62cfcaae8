//! Country code lookup for address display.

/// A selectable delivery country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code.
    pub code: &'static str,
    /// English display name.
    pub name: &'static str,
}

const fn c(code: &'static str, name: &'static str) -> Country {
    Country { code, name }
}

/// Countries the storefront ships to, sorted by name.
pub const COUNTRIES: &[Country] = &[
    c("AF", "Afghanistan"),
    c("AL", "Albania"),
    c("DZ", "Algeria"),
    c("AD", "Andorra"),
    c("AO", "Angola"),
    c("AG", "Antigua and Barbuda"),
    c("AR", "Argentina"),
    c("AM", "Armenia"),
    c("AU", "Australia"),
    c("AT", "Austria"),
    c("AZ", "Azerbaijan"),
    c("BS", "Bahamas"),
    c("BH", "Bahrain"),
    c("BD", "Bangladesh"),
    c("BB", "Barbados"),
    c("BY", "Belarus"),
    c("BE", "Belgium"),
    c("BZ", "Belize"),
    c("BJ", "Benin"),
    c("BT", "Bhutan"),
    c("BO", "Bolivia"),
    c("BA", "Bosnia and Herzegovina"),
    c("BW", "Botswana"),
    c("BR", "Brazil"),
    c("BN", "Brunei"),
    c("BG", "Bulgaria"),
    c("BF", "Burkina Faso"),
    c("BI", "Burundi"),
    c("KH", "Cambodia"),
    c("CM", "Cameroon"),
    c("CA", "Canada"),
    c("CV", "Cape Verde"),
    c("CF", "Central African Republic"),
    c("TD", "Chad"),
    c("CL", "Chile"),
    c("CN", "China"),
    c("CO", "Colombia"),
    c("KM", "Comoros"),
    c("CG", "Congo"),
    c("CD", "Congo (Democratic Republic)"),
    c("CR", "Costa Rica"),
    c("CI", "Côte d'Ivoire"),
    c("HR", "Croatia"),
    c("CU", "Cuba"),
    c("CY", "Cyprus"),
    c("CZ", "Czech Republic"),
    c("DK", "Denmark"),
    c("DJ", "Djibouti"),
    c("DM", "Dominica"),
    c("DO", "Dominican Republic"),
    c("EC", "Ecuador"),
    c("EG", "Egypt"),
    c("SV", "El Salvador"),
    c("GQ", "Equatorial Guinea"),
    c("ER", "Eritrea"),
    c("EE", "Estonia"),
    c("SZ", "Eswatini"),
    c("ET", "Ethiopia"),
    c("FJ", "Fiji"),
    c("FI", "Finland"),
    c("FR", "France"),
    c("GA", "Gabon"),
    c("GM", "Gambia"),
    c("GE", "Georgia"),
    c("DE", "Germany"),
    c("GH", "Ghana"),
    c("GR", "Greece"),
    c("GD", "Grenada"),
    c("GT", "Guatemala"),
    c("GN", "Guinea"),
    c("GW", "Guinea-Bissau"),
    c("GY", "Guyana"),
    c("HT", "Haiti"),
    c("HN", "Honduras"),
    c("HK", "Hong Kong"),
    c("HU", "Hungary"),
    c("IS", "Iceland"),
    c("IN", "India"),
    c("ID", "Indonesia"),
    c("IR", "Iran"),
    c("IQ", "Iraq"),
    c("IE", "Ireland"),
    c("IL", "Israel"),
    c("IT", "Italy"),
    c("JM", "Jamaica"),
    c("JP", "Japan"),
    c("JO", "Jordan"),
    c("KZ", "Kazakhstan"),
    c("KE", "Kenya"),
    c("KI", "Kiribati"),
    c("KW", "Kuwait"),
    c("KG", "Kyrgyzstan"),
    c("LA", "Laos"),
    c("LV", "Latvia"),
    c("LB", "Lebanon"),
    c("LS", "Lesotho"),
    c("LR", "Liberia"),
    c("LY", "Libya"),
    c("LI", "Liechtenstein"),
    c("LT", "Lithuania"),
    c("LU", "Luxembourg"),
    c("MG", "Madagascar"),
    c("MW", "Malawi"),
    c("MY", "Malaysia"),
    c("MV", "Maldives"),
    c("ML", "Mali"),
    c("MT", "Malta"),
    c("MH", "Marshall Islands"),
    c("MR", "Mauritania"),
    c("MU", "Mauritius"),
    c("MX", "Mexico"),
    c("FM", "Micronesia"),
    c("MD", "Moldova"),
    c("MC", "Monaco"),
    c("MN", "Mongolia"),
    c("ME", "Montenegro"),
    c("MA", "Morocco"),
    c("MZ", "Mozambique"),
    c("MM", "Myanmar"),
    c("NA", "Namibia"),
    c("NR", "Nauru"),
    c("NP", "Nepal"),
    c("NL", "Netherlands"),
    c("NZ", "New Zealand"),
    c("NI", "Nicaragua"),
    c("NE", "Niger"),
    c("NG", "Nigeria"),
    c("KP", "North Korea"),
    c("MK", "North Macedonia"),
    c("NO", "Norway"),
    c("OM", "Oman"),
    c("PK", "Pakistan"),
    c("PW", "Palau"),
    c("PS", "Palestine"),
    c("PA", "Panama"),
    c("PG", "Papua New Guinea"),
    c("PY", "Paraguay"),
    c("PE", "Peru"),
    c("PH", "Philippines"),
    c("PL", "Poland"),
    c("PT", "Portugal"),
    c("PR", "Puerto Rico"),
    c("QA", "Qatar"),
    c("RO", "Romania"),
    c("RU", "Russia"),
    c("RW", "Rwanda"),
    c("KN", "Saint Kitts and Nevis"),
    c("LC", "Saint Lucia"),
    c("VC", "Saint Vincent and the Grenadines"),
    c("WS", "Samoa"),
    c("SM", "San Marino"),
    c("ST", "Sao Tome and Principe"),
    c("SA", "Saudi Arabia"),
    c("SN", "Senegal"),
    c("RS", "Serbia"),
    c("SC", "Seychelles"),
    c("SL", "Sierra Leone"),
    c("SG", "Singapore"),
    c("SK", "Slovakia"),
    c("SI", "Slovenia"),
    c("SB", "Solomon Islands"),
    c("SO", "Somalia"),
    c("ZA", "South Africa"),
    c("KR", "South Korea"),
    c("SS", "South Sudan"),
    c("ES", "Spain"),
    c("LK", "Sri Lanka"),
    c("SD", "Sudan"),
    c("SR", "Suriname"),
    c("SE", "Sweden"),
    c("CH", "Switzerland"),
    c("SY", "Syria"),
    c("TW", "Taiwan"),
    c("TJ", "Tajikistan"),
    c("TZ", "Tanzania"),
    c("TH", "Thailand"),
    c("TL", "Timor-Leste"),
    c("TG", "Togo"),
    c("TO", "Tonga"),
    c("TT", "Trinidad and Tobago"),
    c("TN", "Tunisia"),
    c("TR", "Turkey"),
    c("TM", "Turkmenistan"),
    c("TV", "Tuvalu"),
    c("UG", "Uganda"),
    c("UA", "Ukraine"),
    c("AE", "United Arab Emirates"),
    c("GB", "United Kingdom"),
    c("US", "United States"),
    c("UY", "Uruguay"),
    c("UZ", "Uzbekistan"),
    c("VU", "Vanuatu"),
    c("VA", "Vatican City"),
    c("VE", "Venezuela"),
    c("VN", "Vietnam"),
    c("YE", "Yemen"),
    c("ZM", "Zambia"),
    c("ZW", "Zimbabwe"),
];

/// Look up a country by its ISO code (case-insensitive).
#[must_use]
pub fn find(code: &str) -> Option<&'static Country> {
    let code = code.trim();
    COUNTRIES
        .iter()
        .find(|country| country.code.eq_ignore_ascii_case(code))
}

/// Display name for an ISO code, if the country is known.
#[must_use]
pub fn name_for_code(code: &str) -> Option<&'static str> {
    find(code).map(|country| country.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(name_for_code("mx"), Some("Mexico"));
        assert_eq!(name_for_code(" CR "), Some("Costa Rica"));
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(name_for_code("XX"), None);
        assert_eq!(name_for_code(""), None);
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<_> = COUNTRIES.iter().map(|c| c.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), COUNTRIES.len());
    }
}
