//! Word pools, name templates and country tables feeding the generator.
//!
//! The built-in dictionary is always available; a JSON file with the same
//! field names can override any subset of it.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A country with its user-base weight and the regions users come from
#[derive(Debug, Clone, Deserialize)]
pub struct Country {
    pub code: String,
    pub weight: f64,
    #[serde(default)]
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Dictionary {
    pub adjectives: Vec<String>,
    pub nouns: Vec<String>,
    pub mythical_creatures: Vec<String>,
    pub colors: Vec<String>,
    pub prefixes: Vec<String>,
    pub locations: Vec<String>,
    pub subtitles: Vec<String>,
    pub roman_numerals: Vec<String>,
    pub studio_suffixes: Vec<String>,
    pub edition_suffixes: Vec<String>,
    pub verbs: Vec<String>,
    pub game_title_templates: Vec<String>,
    pub studio_name_templates: Vec<String>,
    pub countries: Vec<Country>,
}

impl Dictionary {
    /// Load a dictionary from a JSON file; missing fields keep their
    /// built-in defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dictionary file: {:?}", path))?;
        let dict = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse dictionary file: {:?}", path))?;
        Ok(dict)
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn country(code: &str, weight: f64, regions: &[&str]) -> Country {
    Country {
        code: code.to_string(),
        weight,
        regions: words(regions),
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self {
            adjectives: words(&["Shadow", "Dark", "Epic", "Golden", "Mystic", "Iron", "Silent"]),
            nouns: words(&["Realm", "Kingdom", "Dragon", "Phoenix", "Warrior", "Empire", "Blade"]),
            mythical_creatures: words(&["Dragon", "Phoenix", "Griffin", "Unicorn", "Kraken"]),
            colors: words(&["Red", "Blue", "Black", "White", "Golden", "Crimson"]),
            prefixes: words(&["Shadow", "Dark", "Epic", "Golden", "Star"]),
            locations: words(&["Forest", "Mountain", "Castle", "Temple", "Harbor"]),
            subtitles: words(&["Awakening", "Rebirth", "Origins", "Legacy", "Exodus"]),
            roman_numerals: words(&["II", "III", "IV", "V", "VI"]),
            studio_suffixes: words(&["Games", "Studios", "Interactive", "Works"]),
            edition_suffixes: words(&["HD", "Remastered", "Definitive Edition"]),
            verbs: words(&["Rising", "Falling", "Awakening", "Hunting"]),
            game_title_templates: words(&[
                "{adjective} {noun}",
                "The {adjective} {noun}",
                "{noun} {roman_numeral}",
                "{mythical} {noun}",
                "{noun} of the {location}",
                "{color} {noun}: {subtitle}",
            ]),
            studio_name_templates: words(&["{word1} {word2} {suffix}", "{word1} {suffix}"]),
            // User-base shares roughly following Steam's country statistics
            countries: vec![
                country("US", 0.142, &["California", "New York", "Texas", "Florida"]),
                country("CN", 0.118, &["Guangdong", "Beijing", "Shanghai"]),
                country("RU", 0.096, &["Moscow", "Saint Petersburg", "Novosibirsk"]),
                country("DE", 0.054, &["Berlin", "Bavaria", "Hamburg"]),
                country("BR", 0.047, &["São Paulo", "Rio de Janeiro", "Minas Gerais"]),
                country("GB", 0.037, &["England", "Scotland", "Wales"]),
                country("FR", 0.036, &["Île-de-France", "Occitanie"]),
                country("TR", 0.035, &["Istanbul", "Ankara"]),
                country("PL", 0.034, &["Masovia", "Silesia"]),
                country("CA", 0.027, &["Ontario", "Quebec", "British Columbia"]),
                country("JP", 0.024, &["Tokyo", "Osaka", "Hokkaido"]),
                country("UA", 0.021, &["Kyiv", "Lviv"]),
                country("AU", 0.020, &["New South Wales", "Victoria"]),
                country("TW", 0.019, &["Taipei", "Kaohsiung"]),
                country("NL", 0.019, &["North Holland", "South Holland"]),
                country("KR", 0.018, &["Seoul", "Busan"]),
                country("SE", 0.017, &["Stockholm", "Skåne"]),
                country("IT", 0.016, &["Lombardy", "Lazio"]),
                country("CZ", 0.015, &["Prague", "Moravia"]),
                country("RO", 0.014, &["Bucharest", "Cluj"]),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pools_nonempty() {
        let dict = Dictionary::default();
        assert!(!dict.adjectives.is_empty());
        assert!(!dict.game_title_templates.is_empty());
        assert!(!dict.countries.is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let dict: Dictionary =
            serde_json::from_str(r#"{"adjectives": ["Rusty"]}"#).expect("parse");
        assert_eq!(dict.adjectives, vec!["Rusty"]);
        assert!(!dict.nouns.is_empty());
    }
}
