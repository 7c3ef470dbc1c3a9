//! Synthetic storefront data: users, studios and game catalogs drawn from
//! weighted distributions, with in-memory uniqueness guarantees matching the
//! schema's UNIQUE columns.

pub mod words;

pub use words::{Country, Dictionary};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

use crate::model::{MonetizationType, NewDeveloper, NewGame, NewUser};

// Genre shares roughly following storefront statistics
const GENRES: &[(&str, f64)] = &[
    ("Action", 0.22),
    ("Role-Playing (RPG)", 0.18),
    ("Adventure", 0.15),
    ("Strategy", 0.12),
    ("Simulation", 0.10),
    ("Sports", 0.08),
    ("Shooter", 0.07),
    ("Racing", 0.04),
    ("Puzzle", 0.04),
];

const AGE_RATINGS: &[(&str, f64)] = &[
    ("3+", 0.05),
    ("7+", 0.15),
    ("12+", 0.40),
    ("16+", 0.30),
    ("18+", 0.10),
];

/// Share of games that are paid rather than free-to-play
const PAID_SHARE: f64 = 0.75;

// Developer studios cluster in different countries than players do
const DEVELOPER_COUNTRIES: &[(&str, f64)] = &[
    ("US", 0.35),
    ("JP", 0.15),
    ("DE", 0.10),
    ("GB", 0.08),
    ("CA", 0.07),
    ("FR", 0.06),
    ("PL", 0.05),
    ("RU", 0.04),
    ("UA", 0.03),
    ("KR", 0.03),
    ("CN", 0.02),
    ("AU", 0.02),
];

const EMAIL_DOMAINS: &[&str] = &["gmail.com", "outlook.com", "yahoo.com", "proton.me"];

const CORPORATE_SUFFIXES: &[&str] = &["Inc.", "LLC", "Corp.", "Ltd."];

const EXTRA_TAGS: &[&str] = &[
    "multiplayer",
    "singleplayer",
    "co-op",
    "online",
    "offline",
    "vr",
    "controller-friendly",
    "moddable",
];

fn base_tags(genre: &str) -> &'static [&'static str] {
    match genre {
        "Action" => &["action", "fast-paced", "combat", "adventure"],
        "Role-Playing (RPG)" => &["rpg", "story-rich", "character-development", "quests"],
        "Adventure" => &["adventure", "exploration", "puzzle", "narrative"],
        "Strategy" => &["strategy", "tactical", "resource-management"],
        "Simulation" => &["simulation", "realistic", "management", "sandbox"],
        "Sports" => &["sports", "competitive", "realistic", "team-based"],
        "Shooter" => &["shooter", "fps", "multiplayer", "competitive"],
        "Racing" => &["racing", "driving", "simulation", "arcade"],
        "Puzzle" => &["puzzle", "casual", "brain-teaser", "logic"],
        _ => &["indie", "casual"],
    }
}

pub struct DataGenerator {
    dict: Dictionary,
    rng: StdRng,
    used_usernames: HashSet<String>,
    used_emails: HashSet<String>,
    used_studios: HashSet<String>,
    used_titles: HashSet<String>,
    /// Last release date per developer, spacing their catalog out
    last_release: HashMap<i64, NaiveDate>,
}

impl DataGenerator {
    pub fn new(dict: Dictionary) -> Self {
        Self::with_rng(dict, StdRng::from_entropy())
    }

    /// Seeded variant for reproducible output
    pub fn with_seed(dict: Dictionary, seed: u64) -> Self {
        Self::with_rng(dict, StdRng::seed_from_u64(seed))
    }

    fn with_rng(dict: Dictionary, rng: StdRng) -> Self {
        Self {
            dict,
            rng,
            used_usernames: HashSet::new(),
            used_emails: HashSet::new(),
            used_studios: HashSet::new(),
            used_titles: HashSet::new(),
            last_release: HashMap::new(),
        }
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub fn next_user(&mut self, now: NaiveDateTime) -> NewUser {
        let username = self.next_username();
        let email = self.next_email(&username);
        let (country_code, region) = self.next_country_region();
        NewUser {
            username,
            email,
            country_code,
            region,
            registration_date: now,
        }
    }

    fn next_username(&mut self) -> String {
        let adjective = pick(&mut self.rng, &self.dict.adjectives).to_lowercase();
        let noun = pick(&mut self.rng, &self.dict.nouns).to_lowercase();

        // Most players go by a single word
        let mut username = if self.rng.gen_bool(0.7) {
            adjective
        } else {
            format!("{}_{}", adjective, noun)
        };
        while self.used_usernames.contains(&username) {
            username.push(char::from_digit(self.rng.gen_range(1..10), 10).unwrap_or('7'));
        }
        self.used_usernames.insert(username.clone());
        username
    }

    fn next_email(&mut self, username: &str) -> String {
        let domain = pick_str(&mut self.rng, EMAIL_DOMAINS);
        let mut local = username.to_string();
        let mut email = format!("{}@{}", local, domain);
        while self.used_emails.contains(&email) {
            local.push(char::from_digit(self.rng.gen_range(1..10), 10).unwrap_or('3'));
            email = format!("{}@{}", local, domain);
        }
        self.used_emails.insert(email.clone());
        email
    }

    fn next_country_region(&mut self) -> (String, Option<String>) {
        let country = match self
            .dict
            .countries
            .choose_weighted(&mut self.rng, |c| c.weight)
        {
            Ok(country) => country,
            Err(_) => match self.dict.countries.choose(&mut self.rng) {
                Some(country) => country,
                None => return ("US".to_string(), Some("California".to_string())),
            },
        };
        let region = country
            .regions
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| "Central".to_string());
        (country.code.clone(), Some(region))
    }

    // =========================================================================
    // Developers
    // =========================================================================

    pub fn next_developer(&mut self, now: NaiveDateTime) -> NewDeveloper {
        let studio_name = self.next_studio_name();
        let contact_email = studio_email(&studio_name);
        let country_code = weighted_str(&mut self.rng, DEVELOPER_COUNTRIES).to_string();
        NewDeveloper {
            studio_name,
            country_code,
            foundation_year: Some(now.year()),
            contact_email,
        }
    }

    fn next_studio_name(&mut self) -> String {
        let template = pick(&mut self.rng, &self.dict.studio_name_templates);
        let mut name = template;

        for placeholder in ["{word1}", "{word2}"] {
            if name.contains(placeholder) {
                let pool = match self.rng.gen_range(0..5) {
                    0 => &self.dict.adjectives,
                    1 => &self.dict.nouns,
                    2 => &self.dict.prefixes,
                    3 => &self.dict.locations,
                    _ => &self.dict.colors,
                };
                let word = pick(&mut self.rng, pool);
                name = name.replace(placeholder, &word);
            }
        }
        if name.contains("{suffix}") {
            let suffix = pick(&mut self.rng, &self.dict.studio_suffixes);
            name = name.replace("{suffix}", &suffix);
        }

        let mut name = title_case(&name);
        if self.rng.gen_bool(0.3) {
            name = format!("{} {}", name, pick_str(&mut self.rng, CORPORATE_SUFFIXES));
        }
        while self.used_studios.contains(&name) {
            name.push(char::from_digit(self.rng.gen_range(1..10), 10).unwrap_or('9'));
        }
        self.used_studios.insert(name.clone());
        name
    }

    // =========================================================================
    // Games
    // =========================================================================

    pub fn next_game(&mut self, today: NaiveDate, developer_id: i64) -> NewGame {
        let title = self.next_game_title();
        let monetization_type = if self.rng.gen_bool(PAID_SHARE) {
            MonetizationType::Paid
        } else {
            MonetizationType::Free
        };
        let price = self.next_price(monetization_type);
        let (genre_main, tags) = self.next_genre();
        let age_rating = weighted_str(&mut self.rng, AGE_RATINGS).to_string();
        let release_date = self.next_release_date(today, developer_id);

        NewGame {
            title,
            developer_id,
            release_date,
            base_price: price,
            current_price: price,
            monetization_type,
            genre_main,
            genre_tags: serde_json::to_string(&tags).ok(),
            age_rating,
        }
    }

    fn next_game_title(&mut self) -> String {
        let template = pick(&mut self.rng, &self.dict.game_title_templates);
        let mut title = template;

        let plural = format!("{}s", pick(&mut self.rng, &self.dict.nouns));
        let replacements = [
            ("{adjective}", pick(&mut self.rng, &self.dict.adjectives)),
            ("{noun}", pick(&mut self.rng, &self.dict.nouns)),
            ("{mythical}", pick(&mut self.rng, &self.dict.mythical_creatures)),
            ("{color}", pick(&mut self.rng, &self.dict.colors)),
            ("{prefix}", pick(&mut self.rng, &self.dict.prefixes)),
            ("{verb}", pick(&mut self.rng, &self.dict.verbs)),
            ("{location}", pick(&mut self.rng, &self.dict.locations)),
            ("{subtitle}", pick(&mut self.rng, &self.dict.subtitles)),
            ("{roman_numeral}", pick(&mut self.rng, &self.dict.roman_numerals)),
            ("{plural_noun}", plural),
        ];
        for (placeholder, replacement) in replacements {
            if title.contains(placeholder) {
                title = title.replace(placeholder, &replacement);
            }
        }

        let mut title = title_case(&title);
        if self.rng.gen_bool(0.1) && !self.dict.edition_suffixes.is_empty() {
            let edition = pick(&mut self.rng, &self.dict.edition_suffixes);
            title = format!("{} - {}", title, edition);
        }
        while self.used_titles.contains(&title) {
            title.push(char::from_digit(self.rng.gen_range(1..10), 10).unwrap_or('2'));
        }
        self.used_titles.insert(title.clone());
        title
    }

    fn next_genre(&mut self) -> (String, Vec<String>) {
        let genre = weighted_str(&mut self.rng, GENRES).to_string();
        let pool = base_tags(&genre);

        let tag_count = self.rng.gen_range(2..=4).min(pool.len());
        let mut tags: Vec<String> = pool
            .choose_multiple(&mut self.rng, tag_count)
            .map(|t| t.to_string())
            .collect();
        if tags.len() < 4 && self.rng.gen_bool(0.7) {
            let extra = pick_str(&mut self.rng, EXTRA_TAGS).to_string();
            if !tags.contains(&extra) {
                tags.push(extra);
            }
        }
        (genre, tags)
    }

    /// Paid prices cluster around 15 with a wide spread and a 1.00 floor
    fn next_price(&mut self, monetization: MonetizationType) -> f64 {
        match monetization {
            MonetizationType::Free => 0.0,
            MonetizationType::Paid => {
                let spread: f64 = self.rng.gen::<f64>() + self.rng.gen::<f64>() - 1.0;
                let price = (15.0 + 12.0 * spread).max(1.0);
                (price * 100.0).round() / 100.0
            }
        }
    }

    /// A developer's releases land roughly two years apart, never more than
    /// half a year into the future
    fn next_release_date(&mut self, today: NaiveDate, developer_id: i64) -> NaiveDate {
        let release = match self.last_release.get(&developer_id) {
            Some(last) => {
                let variation = self.rng.gen_range(-90..=90);
                let next = *last + Duration::days(730 + variation);
                next.min(today + Duration::days(180))
            }
            None => today,
        };
        self.last_release.insert(developer_id, release);
        release
    }
}

/// Derive a studio contact address from its name
fn studio_email(studio_name: &str) -> String {
    let clean: String = studio_name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    format!("{}@gmail.com", clean)
}

fn pick(rng: &mut StdRng, pool: &[String]) -> String {
    pool.choose(rng)
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string())
}

fn pick_str(rng: &mut StdRng, pool: &[&'static str]) -> &'static str {
    pool.choose(rng).copied().unwrap_or("unknown")
}

fn weighted_str(rng: &mut StdRng, table: &[(&'static str, f64)]) -> &'static str {
    table
        .choose_weighted(rng, |entry| entry.1)
        .map(|entry| entry.0)
        .unwrap_or("unknown")
}

/// Title-case with small connective words lowered (except at the front)
fn title_case(text: &str) -> String {
    const SMALL_WORDS: &[&str] = &["the", "of", "and", "to", "in", "for", "on", "at", "by"];

    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i != 0 && SMALL_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
