//! Format-aware string synthesis (`format: email`, `uuid`, `date`, ...).
//!
//! Everything draws from the caller's seeded RNG so output stays
//! reproducible per generation call.

use crate::config::GenConfig;
use chrono::{Duration, NaiveDate};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::rngs::StdRng;
use rand::Rng;

/// Day zero for synthesized dates; offsets keep values in a plausible range.
const BASE_DATE: (i32, u32, u32) = (2020, 1, 1);
const DATE_SPAN_DAYS: i64 = 3650;

/// Synthesize a value for a known string format. Returns `None` for
/// formats this generator does not know, so the caller can fall back to a
/// plain string.
pub fn format_value(format: &str, rng: &mut StdRng, config: &GenConfig) -> Option<String> {
    match format {
        "email" => Some(SafeEmail().fake_with_rng::<String, _>(rng)),
        "uuid" => Some(
            uuid::Builder::from_random_bytes(rng.gen())
                .into_uuid()
                .to_string(),
        ),
        "date" => Some(random_date(rng).format(&config.date_format).to_string()),
        "date-time" => {
            let date = random_date(rng);
            let secs = rng.gen_range(0..86_400);
            date.and_hms_opt(secs / 3600, (secs % 3600) / 60, secs % 60)
                .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        }
        "uri" | "url" => Some(format!("https://example.com/{}", alnum(rng, 8).to_lowercase())),
        "hostname" => Some(format!("{}.example.com", alnum(rng, 6).to_lowercase())),
        "ipv4" => Some(format!(
            "{}.{}.{}.{}",
            rng.gen_range(1..=254),
            rng.gen_range(0..=254),
            rng.gen_range(0..=254),
            rng.gen_range(1..=254)
        )),
        "name" => Some(Name().fake_with_rng::<String, _>(rng)),
        _ => None,
    }
}

/// Plain alphanumeric string of a given length.
pub fn alnum(rng: &mut StdRng, len: usize) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

fn random_date(rng: &mut StdRng) -> NaiveDate {
    let (y, m, d) = BASE_DATE;
    let base = NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    base + Duration::days(rng.gen_range(0..DATE_SPAN_DAYS))
}
