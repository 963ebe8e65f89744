//! Data loading from JSON files
//!
//! Both documents are JSON objects whose key order is significant: country
//! order breaks score ties and weight order drives the scoring loop, so
//! everything is kept in [`IndexMap`]s.

use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{error, info};

/// A raw property value or weight as it appears in the input documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Flag(bool),
    Null,
    /// Strings, arrays and objects; never contribute to a score
    Other(serde_json::Value),
}

impl PropertyValue {
    /// Numeric factor when the value is truthy and numeric, `None` otherwise.
    ///
    /// `true` counts as 1.
    pub fn factor(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) if *n != 0.0 => Some(*n),
            PropertyValue::Flag(true) => Some(1.0),
            _ => None,
        }
    }

    /// Zero, `false`, `null` and empty strings, arrays or objects
    pub fn is_falsy(&self) -> bool {
        match self {
            PropertyValue::Number(n) => *n == 0.0,
            PropertyValue::Flag(b) => !b,
            PropertyValue::Null => true,
            PropertyValue::Other(v) => match v {
                Value::String(s) => s.is_empty(),
                Value::Array(a) => a.is_empty(),
                Value::Object(o) => o.is_empty(),
                Value::Null => true,
                Value::Bool(b) => !b,
                Value::Number(n) => n.as_f64() == Some(0.0),
            },
        }
    }

    pub fn is_truthy(&self) -> bool {
        self.factor().is_some()
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Flag(b) => write!(f, "{}", b),
            PropertyValue::Null => f.write_str("null"),
            PropertyValue::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Attributes of a single country, keyed by property name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryRecord {
    pub properties: IndexMap<String, PropertyValue>,
}

impl CountryRecord {
    pub fn get(&self, property: &str) -> Option<&PropertyValue> {
        self.properties.get(property)
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for CountryRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Country name (underscores for spaces) → attributes, in document order
pub type CountryData = IndexMap<String, CountryRecord>;

/// Property name → importance weight, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyWeights {
    pub weights: IndexMap<String, PropertyValue>,
}

impl PropertyWeights {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.weights.iter()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyWeights {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Both input documents of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub countries: CountryData,
    pub weights: PropertyWeights,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.weights.is_empty()
    }
}

/// Load the country attribute document
pub fn load_country_data(path: impl AsRef<Path>) -> Result<CountryData> {
    let path = path.as_ref();
    info!("Loading country data from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let countries: CountryData = serde_json::from_reader(reader)?;

    info!("Loaded {} countries", countries.len());
    Ok(countries)
}

/// Load the property weights document
pub fn load_weights(path: impl AsRef<Path>) -> Result<PropertyWeights> {
    let path = path.as_ref();
    info!("Loading property weights from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let weights: PropertyWeights = serde_json::from_reader(reader)?;

    info!("Loaded {} property weights", weights.len());
    Ok(weights)
}

/// Load both documents, failing if either one is missing or malformed
pub fn load_dataset(
    data_path: impl AsRef<Path>,
    weights_path: impl AsRef<Path>,
) -> Result<Dataset> {
    let countries = load_country_data(data_path)?;
    let weights = load_weights(weights_path)?;
    Ok(Dataset { countries, weights })
}

/// Load both documents, degrading to an empty dataset on any failure
pub fn load_or_empty(data_path: impl AsRef<Path>, weights_path: impl AsRef<Path>) -> Dataset {
    match load_dataset(data_path, weights_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Error occurred during data retrieval: {}", e);
            Dataset::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_country_data_preserves_order() {
        let file = json_file(
            r#"{
                "Zimbabwe": {"beds": 1.7, "gdp": 0},
                "Albania": {"beds": 2.9, "gdp": null},
                "Mexico": {"beds": 1.5, "gdp": false}
            }"#,
        );

        let countries = load_country_data(file.path()).unwrap();
        let names: Vec<&str> = countries.keys().map(String::as_str).collect();
        assert_eq!(names, ["Zimbabwe", "Albania", "Mexico"]);
        assert_eq!(countries["Zimbabwe"].get("gdp"), Some(&PropertyValue::Number(0.0)));
        assert_eq!(countries["Albania"].get("gdp"), Some(&PropertyValue::Null));
        assert_eq!(countries["Mexico"].get("gdp"), Some(&PropertyValue::Flag(false)));
    }

    #[test]
    fn test_load_weights_preserves_order() {
        let file = json_file(r#"{"z_prop": 2, "a_prop": 0, "m_prop": false}"#);

        let weights = load_weights(file.path()).unwrap();
        let names: Vec<&str> = weights.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["z_prop", "a_prop", "m_prop"]);
    }

    #[test]
    fn test_load_or_empty_on_missing_file() {
        let weights = json_file(r#"{"beds": 1}"#);
        let dataset = load_or_empty("does/not/exist.json", weights.path());
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_load_or_empty_on_malformed_document() {
        let data = json_file(r#"{"France": {"beds": 6.0}}"#);
        let weights = json_file(r#"["beds", "doctors"]"#);

        // Both maps are reset even though the data document itself was valid
        let dataset = load_or_empty(data.path(), weights.path());
        assert!(dataset.countries.is_empty());
        assert!(dataset.weights.is_empty());
    }

    #[test]
    fn test_load_country_data_keeps_non_numeric_attributes() {
        let file = json_file(
            r#"{
                "France": {"beds": 6, "doctors": "", "continent": "Europe"},
                "Peru": {"beds": 1.6, "doctors": 1.3, "regions": [], "meta": {}}
            }"#,
        );

        let countries = load_country_data(file.path()).unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(
            countries["France"].get("continent"),
            Some(&PropertyValue::Other(Value::String("Europe".into())))
        );
        assert!(countries["France"].get("doctors").unwrap().is_falsy());
        assert!(countries["Peru"].get("regions").unwrap().is_falsy());
        assert!(countries["Peru"].get("meta").unwrap().is_falsy());
    }

    #[test]
    fn test_load_or_empty_keeps_string_attributes() {
        let data = json_file(r#"{"France": {"beds": 6, "continent": "Europe"}}"#);
        let weights = json_file(r#"{"beds": 1}"#);

        let dataset = load_or_empty(data.path(), weights.path());
        assert_eq!(dataset.countries.len(), 1);
        assert_eq!(dataset.weights.len(), 1);
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(PropertyValue::Number(2.5).factor(), Some(2.5));
        assert_eq!(PropertyValue::Number(-1.0).factor(), Some(-1.0));
        assert_eq!(PropertyValue::Flag(true).factor(), Some(1.0));
        assert!(!PropertyValue::Number(0.0).is_truthy());
        assert!(!PropertyValue::Flag(false).is_truthy());
        assert!(!PropertyValue::Null.is_truthy());

        let text = PropertyValue::Other(Value::String("Europe".into()));
        assert!(!text.is_truthy());
        assert!(!text.is_falsy());
        assert!(PropertyValue::Other(Value::String(String::new())).is_falsy());
        assert!(PropertyValue::Number(-0.0).is_falsy());
        assert_eq!(text.to_string(), "\"Europe\"");
    }
}
