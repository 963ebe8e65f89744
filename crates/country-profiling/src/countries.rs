//! ISO 3166-1 country database and fuzzy name lookup
//!
//! Matching works on normalized names (lowercase, accents folded,
//! punctuation collapsed to single spaces):
//!
//! 1. exact match on alpha-2, alpha-3, short name, official name or a
//!    common name
//! 2. otherwise the best partial match, whole words beating substrings;
//!    ties go to the earlier table entry
//!
//! Anything else is a [`ProfilingError::UnresolvedCountry`].

use crate::geocode::CountryCodeResolver;
use crate::{ProfilingError, Result};
use serde::Serialize;
use tracing::debug;

/// One ISO 3166-1 entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IsoCountry {
    pub alpha2: &'static str,
    pub alpha3: &'static str,
    pub name: &'static str,
    pub official_name: Option<&'static str>,
    /// Everyday names not covered by the ISO short and official names
    pub common_names: &'static [&'static str],
}

impl IsoCountry {
    fn names(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name)
            .chain(self.official_name)
            .chain(self.common_names.iter().copied())
    }
}

const fn iso(
    alpha2: &'static str,
    alpha3: &'static str,
    name: &'static str,
    official_name: Option<&'static str>,
    common_names: &'static [&'static str],
) -> IsoCountry {
    IsoCountry {
        alpha2,
        alpha3,
        name,
        official_name,
        common_names,
    }
}

/// ISO 3166-1 table, ordered by alpha-3
pub static ISO_COUNTRIES: &[IsoCountry] = &[
    iso("AW", "ABW", "Aruba", None, &[]),
    iso("AF", "AFG", "Afghanistan", Some("Islamic Republic of Afghanistan"), &[]),
    iso("AO", "AGO", "Angola", Some("Republic of Angola"), &[]),
    iso("AI", "AIA", "Anguilla", None, &[]),
    iso("AX", "ALA", "Åland Islands", None, &[]),
    iso("AL", "ALB", "Albania", Some("Republic of Albania"), &[]),
    iso("AD", "AND", "Andorra", Some("Principality of Andorra"), &[]),
    iso("AE", "ARE", "United Arab Emirates", None, &["UAE", "Emirates"]),
    iso("AR", "ARG", "Argentina", Some("Argentine Republic"), &[]),
    iso("AM", "ARM", "Armenia", Some("Republic of Armenia"), &[]),
    iso("AS", "ASM", "American Samoa", None, &[]),
    iso("AQ", "ATA", "Antarctica", None, &[]),
    iso("TF", "ATF", "French Southern Territories", None, &[]),
    iso("AG", "ATG", "Antigua and Barbuda", None, &["Antigua"]),
    iso("AU", "AUS", "Australia", None, &[]),
    iso("AT", "AUT", "Austria", Some("Republic of Austria"), &[]),
    iso("AZ", "AZE", "Azerbaijan", Some("Republic of Azerbaijan"), &[]),
    iso("BI", "BDI", "Burundi", Some("Republic of Burundi"), &[]),
    iso("BE", "BEL", "Belgium", Some("Kingdom of Belgium"), &[]),
    iso("BJ", "BEN", "Benin", Some("Republic of Benin"), &[]),
    iso("BQ", "BES", "Bonaire, Sint Eustatius and Saba", None, &["Caribbean Netherlands"]),
    iso("BF", "BFA", "Burkina Faso", None, &[]),
    iso("BD", "BGD", "Bangladesh", Some("People's Republic of Bangladesh"), &[]),
    iso("BG", "BGR", "Bulgaria", Some("Republic of Bulgaria"), &[]),
    iso("BH", "BHR", "Bahrain", Some("Kingdom of Bahrain"), &[]),
    iso("BS", "BHS", "Bahamas", Some("Commonwealth of the Bahamas"), &["The Bahamas"]),
    iso("BA", "BIH", "Bosnia and Herzegovina", None, &["Bosnia"]),
    iso("BL", "BLM", "Saint Barthélemy", None, &["St Barthelemy", "St Barts"]),
    iso("BY", "BLR", "Belarus", Some("Republic of Belarus"), &[]),
    iso("BZ", "BLZ", "Belize", None, &[]),
    iso("BM", "BMU", "Bermuda", None, &[]),
    iso("BO", "BOL", "Bolivia, Plurinational State of", Some("Plurinational State of Bolivia"), &["Bolivia"]),
    iso("BR", "BRA", "Brazil", Some("Federative Republic of Brazil"), &[]),
    iso("BB", "BRB", "Barbados", None, &[]),
    iso("BN", "BRN", "Brunei Darussalam", None, &["Brunei"]),
    iso("BT", "BTN", "Bhutan", Some("Kingdom of Bhutan"), &[]),
    iso("BV", "BVT", "Bouvet Island", None, &[]),
    iso("BW", "BWA", "Botswana", Some("Republic of Botswana"), &[]),
    iso("CF", "CAF", "Central African Republic", None, &["CAR"]),
    iso("CA", "CAN", "Canada", None, &[]),
    iso("CC", "CCK", "Cocos (Keeling) Islands", None, &["Cocos Islands"]),
    iso("CH", "CHE", "Switzerland", Some("Swiss Confederation"), &[]),
    iso("CL", "CHL", "Chile", Some("Republic of Chile"), &[]),
    iso("CN", "CHN", "China", Some("People's Republic of China"), &["Mainland China"]),
    iso("CI", "CIV", "Côte d'Ivoire", Some("Republic of Côte d'Ivoire"), &["Ivory Coast", "Cote dIvoire"]),
    iso("CM", "CMR", "Cameroon", Some("Republic of Cameroon"), &[]),
    iso(
        "CD",
        "COD",
        "Congo, The Democratic Republic of the",
        Some("Democratic Republic of the Congo"),
        &["Democratic Republic of Congo", "DR Congo", "DRC", "Congo Kinshasa"],
    ),
    iso("CG", "COG", "Congo", Some("Republic of the Congo"), &["Congo Brazzaville", "Republic of Congo"]),
    iso("CK", "COK", "Cook Islands", None, &[]),
    iso("CO", "COL", "Colombia", Some("Republic of Colombia"), &[]),
    iso("KM", "COM", "Comoros", Some("Union of the Comoros"), &[]),
    iso("CV", "CPV", "Cabo Verde", Some("Republic of Cabo Verde"), &["Cape Verde"]),
    iso("CR", "CRI", "Costa Rica", Some("Republic of Costa Rica"), &[]),
    iso("CU", "CUB", "Cuba", Some("Republic of Cuba"), &[]),
    iso("CW", "CUW", "Curaçao", None, &[]),
    iso("CX", "CXR", "Christmas Island", None, &[]),
    iso("KY", "CYM", "Cayman Islands", None, &[]),
    iso("CY", "CYP", "Cyprus", Some("Republic of Cyprus"), &[]),
    iso("CZ", "CZE", "Czechia", Some("Czech Republic"), &[]),
    iso("DE", "DEU", "Germany", Some("Federal Republic of Germany"), &[]),
    iso("DJ", "DJI", "Djibouti", Some("Republic of Djibouti"), &[]),
    iso("DM", "DMA", "Dominica", Some("Commonwealth of Dominica"), &[]),
    iso("DK", "DNK", "Denmark", Some("Kingdom of Denmark"), &[]),
    iso("DO", "DOM", "Dominican Republic", None, &[]),
    iso("DZ", "DZA", "Algeria", Some("People's Democratic Republic of Algeria"), &[]),
    iso("EC", "ECU", "Ecuador", Some("Republic of Ecuador"), &[]),
    iso("EG", "EGY", "Egypt", Some("Arab Republic of Egypt"), &[]),
    iso("ER", "ERI", "Eritrea", Some("the State of Eritrea"), &[]),
    iso("EH", "ESH", "Western Sahara", None, &[]),
    iso("ES", "ESP", "Spain", Some("Kingdom of Spain"), &[]),
    iso("EE", "EST", "Estonia", Some("Republic of Estonia"), &[]),
    iso("ET", "ETH", "Ethiopia", Some("Federal Democratic Republic of Ethiopia"), &[]),
    iso("FI", "FIN", "Finland", Some("Republic of Finland"), &[]),
    iso("FJ", "FJI", "Fiji", Some("Republic of Fiji"), &[]),
    iso("FK", "FLK", "Falkland Islands (Malvinas)", None, &["Falkland Islands", "Falklands"]),
    iso("FR", "FRA", "France", Some("French Republic"), &[]),
    iso("FO", "FRO", "Faroe Islands", None, &[]),
    iso("FM", "FSM", "Micronesia, Federated States of", Some("Federated States of Micronesia"), &["Micronesia"]),
    iso("GA", "GAB", "Gabon", Some("Gabonese Republic"), &[]),
    iso(
        "GB",
        "GBR",
        "United Kingdom",
        Some("United Kingdom of Great Britain and Northern Ireland"),
        &["UK", "Great Britain", "Britain"],
    ),
    iso("GE", "GEO", "Georgia", None, &[]),
    iso("GG", "GGY", "Guernsey", None, &[]),
    iso("GH", "GHA", "Ghana", Some("Republic of Ghana"), &[]),
    iso("GI", "GIB", "Gibraltar", None, &[]),
    iso("GN", "GIN", "Guinea", Some("Republic of Guinea"), &[]),
    iso("GP", "GLP", "Guadeloupe", None, &[]),
    iso("GM", "GMB", "Gambia", Some("Republic of the Gambia"), &["The Gambia"]),
    iso("GW", "GNB", "Guinea-Bissau", Some("Republic of Guinea-Bissau"), &[]),
    iso("GQ", "GNQ", "Equatorial Guinea", Some("Republic of Equatorial Guinea"), &[]),
    iso("GR", "GRC", "Greece", Some("Hellenic Republic"), &[]),
    iso("GD", "GRD", "Grenada", None, &[]),
    iso("GL", "GRL", "Greenland", None, &[]),
    iso("GT", "GTM", "Guatemala", Some("Republic of Guatemala"), &[]),
    iso("GF", "GUF", "French Guiana", None, &[]),
    iso("GU", "GUM", "Guam", None, &[]),
    iso("GY", "GUY", "Guyana", Some("Republic of Guyana"), &[]),
    iso("HK", "HKG", "Hong Kong", Some("Hong Kong Special Administrative Region of China"), &[]),
    iso("HM", "HMD", "Heard Island and McDonald Islands", None, &[]),
    iso("HN", "HND", "Honduras", Some("Republic of Honduras"), &[]),
    iso("HR", "HRV", "Croatia", Some("Republic of Croatia"), &[]),
    iso("HT", "HTI", "Haiti", Some("Republic of Haiti"), &[]),
    iso("HU", "HUN", "Hungary", None, &[]),
    iso("ID", "IDN", "Indonesia", Some("Republic of Indonesia"), &[]),
    iso("IM", "IMN", "Isle of Man", None, &[]),
    iso("IN", "IND", "India", Some("Republic of India"), &[]),
    iso("IO", "IOT", "British Indian Ocean Territory", None, &[]),
    iso("IE", "IRL", "Ireland", None, &[]),
    iso("IR", "IRN", "Iran, Islamic Republic of", Some("Islamic Republic of Iran"), &["Iran"]),
    iso("IQ", "IRQ", "Iraq", Some("Republic of Iraq"), &[]),
    iso("IS", "ISL", "Iceland", Some("Republic of Iceland"), &[]),
    iso("IL", "ISR", "Israel", Some("State of Israel"), &[]),
    iso("IT", "ITA", "Italy", Some("Italian Republic"), &[]),
    iso("JM", "JAM", "Jamaica", None, &[]),
    iso("JE", "JEY", "Jersey", None, &[]),
    iso("JO", "JOR", "Jordan", Some("Hashemite Kingdom of Jordan"), &[]),
    iso("JP", "JPN", "Japan", None, &[]),
    iso("KZ", "KAZ", "Kazakhstan", Some("Republic of Kazakhstan"), &[]),
    iso("KE", "KEN", "Kenya", Some("Republic of Kenya"), &[]),
    iso("KG", "KGZ", "Kyrgyzstan", Some("Kyrgyz Republic"), &[]),
    iso("KH", "KHM", "Cambodia", Some("Kingdom of Cambodia"), &[]),
    iso("KI", "KIR", "Kiribati", Some("Republic of Kiribati"), &[]),
    iso("KN", "KNA", "Saint Kitts and Nevis", None, &["St Kitts and Nevis"]),
    iso("KR", "KOR", "Korea, Republic of", None, &["South Korea", "Republic of Korea"]),
    iso("KW", "KWT", "Kuwait", Some("State of Kuwait"), &[]),
    iso("LA", "LAO", "Lao People's Democratic Republic", None, &["Laos"]),
    iso("LB", "LBN", "Lebanon", Some("Lebanese Republic"), &[]),
    iso("LR", "LBR", "Liberia", Some("Republic of Liberia"), &[]),
    iso("LY", "LBY", "Libya", None, &[]),
    iso("LC", "LCA", "Saint Lucia", None, &["St Lucia"]),
    iso("LI", "LIE", "Liechtenstein", Some("Principality of Liechtenstein"), &[]),
    iso("LK", "LKA", "Sri Lanka", Some("Democratic Socialist Republic of Sri Lanka"), &[]),
    iso("LS", "LSO", "Lesotho", Some("Kingdom of Lesotho"), &[]),
    iso("LT", "LTU", "Lithuania", Some("Republic of Lithuania"), &[]),
    iso("LU", "LUX", "Luxembourg", Some("Grand Duchy of Luxembourg"), &[]),
    iso("LV", "LVA", "Latvia", Some("Republic of Latvia"), &[]),
    iso("MO", "MAC", "Macao", Some("Macao Special Administrative Region of China"), &["Macau"]),
    iso("MF", "MAF", "Saint Martin (French part)", None, &["St Martin"]),
    iso("MA", "MAR", "Morocco", Some("Kingdom of Morocco"), &[]),
    iso("MC", "MCO", "Monaco", Some("Principality of Monaco"), &[]),
    iso("MD", "MDA", "Moldova, Republic of", Some("Republic of Moldova"), &["Moldova"]),
    iso("MG", "MDG", "Madagascar", Some("Republic of Madagascar"), &[]),
    iso("MV", "MDV", "Maldives", Some("Republic of Maldives"), &[]),
    iso("MX", "MEX", "Mexico", Some("United Mexican States"), &[]),
    iso("MH", "MHL", "Marshall Islands", Some("Republic of the Marshall Islands"), &[]),
    iso("MK", "MKD", "North Macedonia", Some("Republic of North Macedonia"), &["Macedonia"]),
    iso("ML", "MLI", "Mali", Some("Republic of Mali"), &[]),
    iso("MT", "MLT", "Malta", Some("Republic of Malta"), &[]),
    iso("MM", "MMR", "Myanmar", Some("Republic of Myanmar"), &["Burma"]),
    iso("ME", "MNE", "Montenegro", None, &[]),
    iso("MN", "MNG", "Mongolia", None, &[]),
    iso("MP", "MNP", "Northern Mariana Islands", Some("Commonwealth of the Northern Mariana Islands"), &[]),
    iso("MZ", "MOZ", "Mozambique", Some("Republic of Mozambique"), &[]),
    iso("MR", "MRT", "Mauritania", Some("Islamic Republic of Mauritania"), &[]),
    iso("MS", "MSR", "Montserrat", None, &[]),
    iso("MQ", "MTQ", "Martinique", None, &[]),
    iso("MU", "MUS", "Mauritius", Some("Republic of Mauritius"), &[]),
    iso("MW", "MWI", "Malawi", Some("Republic of Malawi"), &[]),
    iso("MY", "MYS", "Malaysia", None, &[]),
    iso("YT", "MYT", "Mayotte", None, &[]),
    iso("NA", "NAM", "Namibia", Some("Republic of Namibia"), &[]),
    iso("NC", "NCL", "New Caledonia", None, &[]),
    iso("NE", "NER", "Niger", Some("Republic of the Niger"), &[]),
    iso("NF", "NFK", "Norfolk Island", None, &[]),
    iso("NG", "NGA", "Nigeria", Some("Federal Republic of Nigeria"), &[]),
    iso("NI", "NIC", "Nicaragua", Some("Republic of Nicaragua"), &[]),
    iso("NU", "NIU", "Niue", None, &[]),
    iso("NL", "NLD", "Netherlands", Some("Kingdom of the Netherlands"), &["Holland", "The Netherlands"]),
    iso("NO", "NOR", "Norway", Some("Kingdom of Norway"), &[]),
    iso("NP", "NPL", "Nepal", Some("Federal Democratic Republic of Nepal"), &[]),
    iso("NR", "NRU", "Nauru", Some("Republic of Nauru"), &[]),
    iso("NZ", "NZL", "New Zealand", None, &[]),
    iso("OM", "OMN", "Oman", Some("Sultanate of Oman"), &[]),
    iso("PK", "PAK", "Pakistan", Some("Islamic Republic of Pakistan"), &[]),
    iso("PA", "PAN", "Panama", Some("Republic of Panama"), &[]),
    iso("PN", "PCN", "Pitcairn", None, &["Pitcairn Islands"]),
    iso("PE", "PER", "Peru", Some("Republic of Peru"), &[]),
    iso("PH", "PHL", "Philippines", Some("Republic of the Philippines"), &[]),
    iso("PW", "PLW", "Palau", Some("Republic of Palau"), &[]),
    iso("PG", "PNG", "Papua New Guinea", Some("Independent State of Papua New Guinea"), &[]),
    iso("PL", "POL", "Poland", Some("Republic of Poland"), &[]),
    iso("PR", "PRI", "Puerto Rico", None, &[]),
    iso(
        "KP",
        "PRK",
        "Korea, Democratic People's Republic of",
        Some("Democratic People's Republic of Korea"),
        &["North Korea"],
    ),
    iso("PT", "PRT", "Portugal", Some("Portuguese Republic"), &[]),
    iso("PY", "PRY", "Paraguay", Some("Republic of Paraguay"), &[]),
    iso("PS", "PSE", "Palestine, State of", Some("the State of Palestine"), &["Palestine"]),
    iso("PF", "PYF", "French Polynesia", None, &[]),
    iso("QA", "QAT", "Qatar", Some("State of Qatar"), &[]),
    iso("RE", "REU", "Réunion", None, &[]),
    iso("RO", "ROU", "Romania", None, &[]),
    iso("RU", "RUS", "Russian Federation", None, &["Russia"]),
    iso("RW", "RWA", "Rwanda", Some("Rwandese Republic"), &[]),
    iso("SA", "SAU", "Saudi Arabia", Some("Kingdom of Saudi Arabia"), &[]),
    iso("SD", "SDN", "Sudan", Some("Republic of the Sudan"), &[]),
    iso("SN", "SEN", "Senegal", Some("Republic of Senegal"), &[]),
    iso("SG", "SGP", "Singapore", Some("Republic of Singapore"), &[]),
    iso("GS", "SGS", "South Georgia and the South Sandwich Islands", None, &[]),
    iso("SH", "SHN", "Saint Helena, Ascension and Tristan da Cunha", None, &["Saint Helena"]),
    iso("SJ", "SJM", "Svalbard and Jan Mayen", None, &[]),
    iso("SB", "SLB", "Solomon Islands", None, &[]),
    iso("SL", "SLE", "Sierra Leone", Some("Republic of Sierra Leone"), &[]),
    iso("SV", "SLV", "El Salvador", Some("Republic of El Salvador"), &[]),
    iso("SM", "SMR", "San Marino", Some("Republic of San Marino"), &[]),
    iso("SO", "SOM", "Somalia", Some("Federal Republic of Somalia"), &[]),
    iso("PM", "SPM", "Saint Pierre and Miquelon", None, &[]),
    iso("RS", "SRB", "Serbia", Some("Republic of Serbia"), &[]),
    iso("SS", "SSD", "South Sudan", Some("Republic of South Sudan"), &[]),
    iso("ST", "STP", "Sao Tome and Principe", Some("Democratic Republic of Sao Tome and Principe"), &[]),
    iso("SR", "SUR", "Suriname", Some("Republic of Suriname"), &[]),
    iso("SK", "SVK", "Slovakia", Some("Slovak Republic"), &[]),
    iso("SI", "SVN", "Slovenia", Some("Republic of Slovenia"), &[]),
    iso("SE", "SWE", "Sweden", Some("Kingdom of Sweden"), &[]),
    iso("SZ", "SWZ", "Eswatini", Some("Kingdom of Eswatini"), &["Swaziland"]),
    iso("SX", "SXM", "Sint Maarten (Dutch part)", None, &["Sint Maarten"]),
    iso("SC", "SYC", "Seychelles", Some("Republic of Seychelles"), &[]),
    iso("SY", "SYR", "Syrian Arab Republic", None, &["Syria"]),
    iso("TC", "TCA", "Turks and Caicos Islands", None, &[]),
    iso("TD", "TCD", "Chad", Some("Republic of Chad"), &[]),
    iso("TG", "TGO", "Togo", Some("Togolese Republic"), &[]),
    iso("TH", "THA", "Thailand", Some("Kingdom of Thailand"), &[]),
    iso("TJ", "TJK", "Tajikistan", Some("Republic of Tajikistan"), &[]),
    iso("TK", "TKL", "Tokelau", None, &[]),
    iso("TM", "TKM", "Turkmenistan", None, &[]),
    iso("TL", "TLS", "Timor-Leste", Some("Democratic Republic of Timor-Leste"), &["East Timor"]),
    iso("TO", "TON", "Tonga", Some("Kingdom of Tonga"), &[]),
    iso("TT", "TTO", "Trinidad and Tobago", Some("Republic of Trinidad and Tobago"), &[]),
    iso("TN", "TUN", "Tunisia", Some("Republic of Tunisia"), &[]),
    iso("TR", "TUR", "Türkiye", Some("Republic of Türkiye"), &["Turkey"]),
    iso("TV", "TUV", "Tuvalu", None, &[]),
    iso("TW", "TWN", "Taiwan, Province of China", None, &["Taiwan"]),
    iso("TZ", "TZA", "Tanzania, United Republic of", Some("United Republic of Tanzania"), &["Tanzania"]),
    iso("UG", "UGA", "Uganda", Some("Republic of Uganda"), &[]),
    iso("UA", "UKR", "Ukraine", None, &[]),
    iso("UM", "UMI", "United States Minor Outlying Islands", None, &[]),
    iso("UY", "URY", "Uruguay", Some("Eastern Republic of Uruguay"), &[]),
    iso("US", "USA", "United States", Some("United States of America"), &["USA", "America"]),
    iso("UZ", "UZB", "Uzbekistan", Some("Republic of Uzbekistan"), &[]),
    iso("VA", "VAT", "Holy See (Vatican City State)", None, &["Vatican", "Vatican City"]),
    iso("VC", "VCT", "Saint Vincent and the Grenadines", None, &["St Vincent and the Grenadines"]),
    iso(
        "VE",
        "VEN",
        "Venezuela, Bolivarian Republic of",
        Some("Bolivarian Republic of Venezuela"),
        &["Venezuela"],
    ),
    iso("VG", "VGB", "Virgin Islands, British", Some("British Virgin Islands"), &[]),
    iso("VI", "VIR", "Virgin Islands, U.S.", Some("Virgin Islands of the United States"), &["US Virgin Islands"]),
    iso("VN", "VNM", "Viet Nam", Some("Socialist Republic of Viet Nam"), &["Vietnam"]),
    iso("VU", "VUT", "Vanuatu", Some("Republic of Vanuatu"), &[]),
    iso("WF", "WLF", "Wallis and Futuna", None, &[]),
    iso("WS", "WSM", "Samoa", Some("Independent State of Samoa"), &[]),
    iso("YE", "YEM", "Yemen", Some("Republic of Yemen"), &[]),
    iso("ZA", "ZAF", "South Africa", Some("Republic of South Africa"), &[]),
    iso("ZM", "ZMB", "Zambia", Some("Republic of Zambia"), &[]),
    iso("ZW", "ZWE", "Zimbabwe", Some("Republic of Zimbabwe"), &[]),
];

/// Normalize a country name for comparison
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            c if c.is_alphanumeric() => c,
            _ => ' ',
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// How well a normalized query matches a normalized name
fn partial_match_points(name: &str, query: &str) -> u8 {
    if format!(" {} ", name).contains(&format!(" {} ", query)) {
        2
    } else if name.contains(query) {
        1
    } else {
        0
    }
}

/// In-memory ISO 3166-1 lookup
#[derive(Debug, Clone)]
pub struct IsoCountryDatabase {
    countries: &'static [IsoCountry],
}

impl Default for IsoCountryDatabase {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl IsoCountryDatabase {
    /// Database over the built-in ISO 3166-1 table
    pub fn with_defaults() -> Self {
        Self {
            countries: ISO_COUNTRIES,
        }
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Look up by alpha-2 or alpha-3 code
    pub fn get(&self, code: &str) -> Option<&IsoCountry> {
        let code = code.trim().to_uppercase();
        self.countries
            .iter()
            .find(|c| c.alpha2 == code || c.alpha3 == code)
    }

    /// Best match for a free-form country name
    pub fn search_fuzzy(&self, query: &str) -> Option<&IsoCountry> {
        let query = normalize_name(query);
        if query.is_empty() {
            return None;
        }

        let exact = self.countries.iter().find(|c| {
            c.alpha2.eq_ignore_ascii_case(&query)
                || c.alpha3.eq_ignore_ascii_case(&query)
                || c.names().any(|n| normalize_name(n) == query)
        });
        if exact.is_some() {
            return exact;
        }

        let mut best: Option<(&IsoCountry, u8)> = None;
        for country in self.countries {
            let points = country
                .names()
                .map(|n| partial_match_points(&normalize_name(n), &query))
                .max()
                .unwrap_or(0);
            if points > best.map(|(_, p)| p).unwrap_or(0) {
                best = Some((country, points));
            }
        }

        if let Some((country, points)) = best {
            debug!("Partial match {:?} -> {} ({} points)", query, country.alpha3, points);
        }
        best.map(|(country, _)| country)
    }
}

impl CountryCodeResolver for IsoCountryDatabase {
    fn resolve_alpha3(&self, country: &str) -> Result<String> {
        self.search_fuzzy(country)
            .map(|c| c.alpha3.to_string())
            .ok_or_else(|| ProfilingError::UnresolvedCountry(country.to_string()))
    }
}
