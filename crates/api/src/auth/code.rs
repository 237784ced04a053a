//! Random numeric verification codes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::EntropyError;

/// Default lower bound (inclusive): six-digit codes.
const DEFAULT_CODE_MIN: u64 = 100_000;
/// Default upper bound (exclusive).
const DEFAULT_CODE_MAX: u64 = 999_999;
/// Default verification window: 15 minutes.
const DEFAULT_CODE_TTL_SECS: u64 = 900;

/// Bounds and lifetime of email verification codes.
#[derive(Debug, Clone)]
pub struct CodeConfig {
    /// Smallest code that may be issued.
    pub min: u64,
    /// Codes are strictly below this value.
    pub max: u64,
    /// How long a code stays valid after it is issued.
    pub ttl_secs: u64,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            min: DEFAULT_CODE_MIN,
            max: DEFAULT_CODE_MAX,
            ttl_secs: DEFAULT_CODE_TTL_SECS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodeError {
    #[error("empty code range: min {min} must be below max {max}")]
    EmptyRange { min: u64, max: u64 },

    #[error(transparent)]
    Entropy(#[from] EntropyError),
}

/// Draw a uniformly random code in `[min, max)`.
///
/// Uses a ChaCha-based CSPRNG freshly seeded from the operating system, so
/// the only runtime failure is an unreadable entropy source.
pub fn generate_code(min: u64, max: u64) -> Result<u64, CodeError> {
    if min >= max {
        return Err(CodeError::EmptyRange { min, max });
    }
    let mut rng = StdRng::try_from_os_rng().map_err(|e| EntropyError(e.to_string()))?;
    Ok(rng.random_range(min..max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_stay_in_range() {
        for _ in 0..1000 {
            let code = generate_code(100_000, 999_999).expect("generation should succeed");
            assert!((100_000..999_999).contains(&code), "code {code} out of range");
        }
    }

    #[test]
    fn single_value_range() {
        assert_eq!(generate_code(7, 8).unwrap(), 7);
    }

    #[test]
    fn empty_range_is_rejected() {
        assert!(matches!(
            generate_code(10, 10),
            Err(CodeError::EmptyRange { min: 10, max: 10 })
        ));
        assert!(generate_code(11, 10).is_err());
    }

    #[test]
    fn codes_vary() {
        let first = generate_code(0, u64::MAX).unwrap();
        let differs = (0..10).any(|_| generate_code(0, u64::MAX).unwrap() != first);
        assert!(differs, "ten draws from a 64-bit range should not all collide");
    }
}
