//! Indonesian amount-in-words ("terbilang") converter.
//!
//! Spells a whole rupiah amount the way it is written on a receipt, e.g.
//! `480000` becomes `"Empat Ratus Delapan Puluh Ribu Rupiah"`.
//!
//! The decomposition is driven by [`TIERS`], an ordered table of magnitude
//! tiers. Each tier either looks a word up directly, prefixes a fixed
//! irregular word (`Seratus`, `Seribu`), or multiplies a recursively spelled
//! group by a scale word (`Puluh`, `Ratus`, `Ribu`, `Juta`, `Milyar`).

use std::borrow::Cow;
use thiserror::Error;

/// Largest amount the converter can spell (just below one trillion).
pub const MAX_AMOUNT: u64 = 999_999_999_999;

/// Words for 0 through 11. Zero is empty so that empty groups vanish.
const DIGITS: [&str; 12] = [
    "", "Satu", "Dua", "Tiga", "Empat", "Lima", "Enam", "Tujuh", "Delapan", "Sembilan", "Sepuluh",
    "Sebelas",
];

#[derive(Debug, Clone, Copy)]
enum TierKind {
    /// Direct lookup in [`DIGITS`].
    Lookup,
    /// `DIGITS[n - 10]` followed by the suffix.
    Teen { suffix: &'static str },
    /// A lexically irregular word followed by the spelling of `n - base`.
    Irregular { base: u64, word: &'static str },
    /// `spell(n / divisor)` + suffix + `spell(n % divisor)`.
    Scaled { divisor: u64, suffix: &'static str },
}

#[derive(Debug, Clone, Copy)]
struct Tier {
    /// Exclusive upper bound of the tier.
    below: u64,
    kind: TierKind,
}

const TIERS: [Tier; 9] = [
    Tier { below: 12, kind: TierKind::Lookup },
    Tier { below: 20, kind: TierKind::Teen { suffix: "Belas" } },
    Tier { below: 100, kind: TierKind::Scaled { divisor: 10, suffix: "Puluh" } },
    Tier { below: 200, kind: TierKind::Irregular { base: 100, word: "Seratus" } },
    Tier { below: 1_000, kind: TierKind::Scaled { divisor: 100, suffix: "Ratus" } },
    Tier { below: 2_000, kind: TierKind::Irregular { base: 1_000, word: "Seribu" } },
    Tier { below: 1_000_000, kind: TierKind::Scaled { divisor: 1_000, suffix: "Ribu" } },
    Tier { below: 1_000_000_000, kind: TierKind::Scaled { divisor: 1_000_000, suffix: "Juta" } },
    Tier {
        below: 1_000_000_000_000,
        kind: TierKind::Scaled { divisor: 1_000_000_000, suffix: "Milyar" },
    },
];

/// Errors returned for amounts outside the supported domain.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TerbilangError {
    #[error("amount {0} exceeds the supported maximum of 999999999999")]
    OutOfRange(u64),
    #[error("negative amount {0} cannot be spelled")]
    Negative(i64),
}

/// Amount-in-words converter parameterised by its currency unit.
///
/// The default converter spells rupiah; [`Terbilang::new`] swaps the unit
/// word without touching the decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terbilang {
    currency_unit: Cow<'static, str>,
    zero_phrase: Cow<'static, str>,
}

/// The converter used across the server.
pub const RUPIAH: Terbilang = Terbilang {
    currency_unit: Cow::Borrowed("Rupiah"),
    zero_phrase: Cow::Borrowed("Nol Rupiah"),
};

impl Default for Terbilang {
    fn default() -> Self {
        RUPIAH
    }
}

impl Terbilang {
    pub fn new(currency_unit: impl Into<String>) -> Self {
        let currency_unit = currency_unit.into();
        let zero_phrase = format!("Nol {}", currency_unit);
        Self {
            currency_unit: Cow::Owned(currency_unit),
            zero_phrase: Cow::Owned(zero_phrase),
        }
    }

    pub fn with_zero_phrase(mut self, zero_phrase: impl Into<String>) -> Self {
        self.zero_phrase = Cow::Owned(zero_phrase.into());
        self
    }

    pub fn currency_unit(&self) -> &str {
        &self.currency_unit
    }

    /// Spell `amount` followed by the currency unit.
    pub fn convert(&self, amount: u64) -> Result<String, TerbilangError> {
        if amount == 0 {
            return Ok(self.zero_phrase.to_string());
        }
        if amount > MAX_AMOUNT {
            return Err(TerbilangError::OutOfRange(amount));
        }

        let mut words = Vec::with_capacity(16);
        spell(amount, &mut words);
        words.push(self.currency_unit.as_ref());

        Ok(words.join(" "))
    }

    /// Signed entry point for callers holding database or JSON integers.
    pub fn convert_signed(&self, amount: i64) -> Result<String, TerbilangError> {
        let amount = u64::try_from(amount).map_err(|_| TerbilangError::Negative(amount))?;
        self.convert(amount)
    }
}

/// Spell `amount` in rupiah.
pub fn convert(amount: u64) -> Result<String, TerbilangError> {
    RUPIAH.convert(amount)
}

/// Spell a signed `amount` in rupiah, rejecting negatives.
pub fn convert_signed(amount: i64) -> Result<String, TerbilangError> {
    RUPIAH.convert_signed(amount)
}

/// Push the words for `n` onto `words`. Zero contributes nothing.
fn spell<'a>(n: u64, words: &mut Vec<&'a str>) {
    if n == 0 {
        return;
    }

    let Some(tier) = TIERS.iter().find(|tier| n < tier.below) else {
        // Callers bound `n` by MAX_AMOUNT.
        return;
    };

    match tier.kind {
        TierKind::Lookup => push_word(DIGITS[n as usize], words),
        TierKind::Teen { suffix } => {
            push_word(DIGITS[(n - 10) as usize], words);
            words.push(suffix);
        }
        TierKind::Irregular { base, word } => {
            words.push(word);
            spell(n - base, words);
        }
        TierKind::Scaled { divisor, suffix } => {
            let before = words.len();
            spell(n / divisor, words);
            if words.len() > before {
                words.push(suffix);
            }
            spell(n % divisor, words);
        }
    }
}

fn push_word<'a>(word: &'a str, words: &mut Vec<&'a str>) {
    if !word.is_empty() {
        words.push(word);
    }
}
