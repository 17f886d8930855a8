//! Search request construction
//!
//! Every search URL carries a campaign `form` code and a random subset of the
//! optional parameters a real browser session would send. The catalogs below
//! must stay exactly as they are; the search service scores them.

use rand::Rng;

/// Campaign codes for the mandatory `form` parameter
pub const FORM_CODES: [&str; 24] = [
    "QBLH", "QBRE", "QSRE", "CONMHP", "ANAB01", "SBIES", "GESBIES", "HPBSBI", "HPBSB", "HDRSC2",
    "PRUSEN", "ENTLNK", "MSNSEA", "MSNLIF", "MSNINT", "MSNHPH", "MSNHPS", "EDGSPH", "EDGGTC",
    "EDGSI", "EDGDCT", "EDGLIS", "EDGNSP", "EDGSNS",
];

const QS_VALUES: [&str; 5] = ["n", "SSE", "n", "SS", "n"];

const SP_VALUES: [&str; 12] = ["-1", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10"];

const BINARY_VALUES: [&str; 2] = ["0", "1"];

const SC_PREFIXES: [u32; 5] = [10, 11, 16, 7, 19];

const GH_BLOCKS: [&str; 4] = [
    "&ghsh=0&ghacc=0&",
    "&ghsh=1&ghacc=1&ghpl=",
    "&ghsh=0&ghacc=1&",
    "&ghsh=1&ghacc=0&ghpl=",
];

/// Chance that each optional parameter is included
pub const INCLUDE_PROBABILITY: f64 = 0.7;

/// Path every search request goes to
pub const SEARCH_PATH: &str = "/search";

/// Per-request tokens derived from one 16-byte random sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTokens {
    /// Lowercase hex, one unpadded group per byte
    pub refig: String,
    /// Uppercase form of `refig`
    pub cvid: String,
}

impl SearchTokens {
    pub fn from_bytes(bytes: &[u8; 16]) -> Self {
        let refig: String = bytes.iter().map(|b| format!("{:x}", b)).collect();
        Self {
            cvid: refig.to_uppercase(),
            refig,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill(&mut bytes);
        Self::from_bytes(&bytes)
    }
}

/// Builds a search URL for a term
///
/// # Arguments
///
/// * `rng` - Randomness for the catalogs, tokens and inclusion draws
/// * `base_url` - Scheme and host of the search engine
/// * `term` - Search term; spaces become underscores
///
/// # Example
///
/// ```
/// use search_quest::quest::build_search_url;
///
/// let url = build_search_url(&mut rand::rng(), "https://www.bing.com", "rust lang");
/// assert!(url.starts_with("https://www.bing.com/search?q=rust_lang&form="));
/// ```
pub fn build_search_url<R: Rng + ?Sized>(rng: &mut R, base_url: &str, term: &str) -> String {
    let word = term.replace(' ', "_");
    let tokens = SearchTokens::random(rng);

    let mut url = format!(
        "{}{}?q={}",
        base_url.trim_end_matches('/'),
        SEARCH_PATH,
        word
    );

    // Searches without a form code are not credited
    url.push_str(&format!("&form={}", pick(rng, &FORM_CODES)));

    if include(rng) {
        url.push_str(&format!("&refig={}", tokens.refig));
    }
    if include(rng) {
        url.push_str(&format!("&pq={}", word));
    }
    if include(rng) {
        url.push_str(&format!("&qs={}", pick(rng, &QS_VALUES)));
    }
    if include(rng) {
        url.push_str(&format!("&sp={}", pick(rng, &SP_VALUES)));
    }
    if include(rng) {
        url.push_str(&format!("&ghc={}", pick(rng, &BINARY_VALUES)));
    }
    if include(rng) {
        url.push_str(&format!("&lq={}", pick(rng, &BINARY_VALUES)));
    }
    if include(rng) {
        url.push_str(&format!(
            "&sc={}-{}",
            pick(rng, &SC_PREFIXES),
            sc_length(&word)
        ));
    }
    if include(rng) {
        url.push_str(&format!("&cvid={}", tokens.cvid));
    }
    if include(rng) {
        url.push_str(pick(rng, &GH_BLOCKS));
    }

    url
}

/// Term length as the search page measures it, in UTF-16 code units
fn sc_length(word: &str) -> usize {
    word.encode_utf16().count()
}

/// Draws the pause after a credited search, uniform over `[min_ms, max_ms]`
pub fn random_delay_ms<R: Rng + ?Sized>(rng: &mut R, min_ms: u64, max_ms: u64) -> u64 {
    rng.random_range(min_ms..=max_ms)
}

fn include<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random_bool(INCLUDE_PROBABILITY)
}

fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    items[rng.random_range(0..items.len())]
}
