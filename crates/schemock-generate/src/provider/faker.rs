use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use fake::Fake;
use fake::faker::internet::{en as internet_en, pt_br as internet_pt_br};
use fake::faker::lorem::{en as lorem_en, pt_br as lorem_pt_br};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_regex::Regex as RandRegex;
use uuid::{Builder, Variant, Version};

use super::{LocaleKey, PatternError, UuidVersion, ValueProvider};

const MAX_REPEAT: u32 = 8;
const NANOID_ALPHABET: &[u8] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";
const CROCKFORD_ALPHABET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const EMOJIS: &[&str] = &[
    "😀", "😂", "😍", "🤔", "😎", "🙌", "👍", "🎉", "🔥", "🌟", "🍕", "🚀", "🐱", "🌈", "⚡", "💡",
];

/// Default provider: `fake` fakers and `rand_regex` over a seeded ChaCha stream.
pub struct FakerProvider {
    rng: ChaCha8Rng,
    locale: LocaleKey,
    patterns: HashMap<String, RandRegex>,
}

impl FakerProvider {
    pub fn new(seed: u64, locale: LocaleKey) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            locale,
            patterns: HashMap::new(),
        }
    }

    pub fn locale(&self) -> LocaleKey {
        self.locale
    }

    fn random_chars(&mut self, alphabet: &[u8], len: usize) -> String {
        (0..len)
            .map(|_| alphabet[self.rng.random_range(0..alphabet.len())] as char)
            .collect()
    }

    fn domain_suffix(&mut self) -> String {
        match self.locale {
            LocaleKey::EnUs => internet_en::DomainSuffix().fake_with_rng(&mut self.rng),
            LocaleKey::PtBr => internet_pt_br::DomainSuffix().fake_with_rng(&mut self.rng),
        }
    }
}

impl ValueProvider for FakerProvider {
    fn word(&mut self) -> String {
        let word: String = match self.locale {
            LocaleKey::EnUs => lorem_en::Word().fake_with_rng(&mut self.rng),
            LocaleKey::PtBr => lorem_pt_br::Word().fake_with_rng(&mut self.rng),
        };
        word.to_lowercase()
    }

    fn text(&mut self, len: usize) -> String {
        let mut text = String::with_capacity(len);
        let mut count = 0;
        while count < len {
            if count > 0 {
                text.push(' ');
                count += 1;
                if count == len {
                    // Filler must not end on a separator.
                    text.pop();
                    text.push('a');
                    break;
                }
            }
            let mut word = self.word();
            if word.is_empty() {
                word.push_str("lorem");
            }
            for ch in word.chars() {
                if count == len {
                    break;
                }
                text.push(ch);
                count += 1;
            }
        }
        text
    }

    fn email(&mut self) -> String {
        match self.locale {
            LocaleKey::EnUs => internet_en::SafeEmail().fake_with_rng(&mut self.rng),
            LocaleKey::PtBr => internet_pt_br::SafeEmail().fake_with_rng(&mut self.rng),
        }
    }

    fn url(&mut self) -> String {
        let host = self.word();
        let suffix = self.domain_suffix();
        let path = self.word();
        format!("https://{host}.{suffix}/{path}")
    }

    fn jwt(&mut self) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let subject = self.uuid(UuidVersion::V4);
        let issued_at = self.rng.random_range(1_700_000_000_i64..1_800_000_000);
        let payload = URL_SAFE_NO_PAD
            .encode(format!(r#"{{"sub":"{subject}","iat":{issued_at}}}"#).as_bytes());
        let mut signature = [0_u8; 32];
        self.rng.fill_bytes(&mut signature);
        format!("{header}.{payload}.{}", URL_SAFE_NO_PAD.encode(signature))
    }

    fn emoji(&mut self) -> String {
        EMOJIS[self.rng.random_range(0..EMOJIS.len())].to_string()
    }

    fn uuid(&mut self, version: UuidVersion) -> String {
        let mut bytes = [0_u8; 16];
        self.rng.fill_bytes(&mut bytes);
        let version = match version {
            UuidVersion::Any | UuidVersion::V4 => Version::Random,
            UuidVersion::V6 => Version::SortMac,
            UuidVersion::V7 => Version::SortRand,
        };
        Builder::from_bytes(bytes)
            .with_variant(Variant::RFC4122)
            .with_version(version)
            .into_uuid()
            .hyphenated()
            .to_string()
    }

    fn nanoid(&mut self) -> String {
        self.random_chars(NANOID_ALPHABET, 21)
    }

    fn ulid(&mut self) -> String {
        // First character carries the top 3 bits of the 48-bit timestamp.
        let head = self.random_chars(&CROCKFORD_ALPHABET[..8], 1);
        let tail = self.random_chars(CROCKFORD_ALPHABET, 25);
        format!("{head}{tail}")
    }

    fn ipv4(&mut self) -> String {
        match self.locale {
            LocaleKey::EnUs => internet_en::IPv4().fake_with_rng(&mut self.rng),
            LocaleKey::PtBr => internet_pt_br::IPv4().fake_with_rng(&mut self.rng),
        }
    }

    fn ipv6(&mut self) -> String {
        match self.locale {
            LocaleKey::EnUs => internet_en::IPv6().fake_with_rng(&mut self.rng),
            LocaleKey::PtBr => internet_pt_br::IPv6().fake_with_rng(&mut self.rng),
        }
    }

    fn date(&mut self, min: DateTime<Utc>, max: DateTime<Utc>) -> DateTime<Utc> {
        let (low, high) = (min.timestamp_millis(), max.timestamp_millis());
        if low >= high {
            return min;
        }
        let millis = self.rng.random_range(low..=high);
        DateTime::from_timestamp_millis(millis).unwrap_or(min)
    }

    fn int(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn float(&mut self, min: f64, max: f64) -> f64 {
        if min.is_nan() || max.is_nan() || min >= max {
            return min;
        }
        let unit: f64 = self.rng.random();
        let span = max - min;
        let value = if span.is_finite() {
            min + span * unit
        } else {
            min + (max / 2.0 - min / 2.0) * 2.0 * unit
        };
        value.clamp(min, max)
    }

    fn big_int(&mut self, min: i128, max: i128) -> i128 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn boolean(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn matching(&mut self, pattern: &str) -> Result<String, PatternError> {
        if !self.patterns.contains_key(pattern) {
            let compiled = RandRegex::compile(strip_anchors(pattern), MAX_REPEAT).map_err(
                |err| PatternError {
                    pattern: pattern.to_string(),
                    message: err.to_string(),
                },
            )?;
            self.patterns.insert(pattern.to_string(), compiled);
        }
        let regex = self.patterns.get(pattern).ok_or_else(|| PatternError {
            pattern: pattern.to_string(),
            message: "pattern cache miss".to_string(),
        })?;
        Ok(self.rng.sample(regex))
    }
}

/// Drops a leading `^` and an unescaped trailing `$`.
fn strip_anchors(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
    match pattern.strip_suffix('$') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => pattern,
    }
}
