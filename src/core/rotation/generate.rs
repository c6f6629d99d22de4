//! Secret value generators.
//!
//! All randomness comes from the OS CSPRNG.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::domain::{GeneratorType, RegenerationStrategy};
use crate::error::{ExecutionError, Result};

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.<>?";
const HEX: &[u8] = b"0123456789abcdef";

fn pick(charset: &[u8]) -> char {
    char::from(charset[OsRng.gen_range(0..charset.len())])
}

fn from_charset(charset: &[u8], length: usize) -> String {
    (0..length).map(|_| pick(charset)).collect()
}

/// `length` characters from `[A-Za-z0-9]`.
pub fn alphanumeric(length: usize) -> String {
    let charset = [UPPER, LOWER, DIGITS].concat();
    from_charset(&charset, length)
}

/// `[0-9a-f]` of the given length.
pub fn hex(length: usize) -> String {
    from_charset(HEX, length)
}

pub fn uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A password with at least one upper, lower, digit and symbol.
///
/// # Errors
///
/// Returns `ExecutionError::Generator` if `length < 4`.
pub fn strong_password(length: usize) -> Result<String> {
    if length < 4 {
        return Err(ExecutionError::Generator(format!(
            "strong_password needs at least 4 characters, got {}",
            length
        ))
        .into());
    }

    let full = [UPPER, LOWER, DIGITS, SYMBOLS].concat();
    let mut chars: Vec<char> = vec![pick(UPPER), pick(LOWER), pick(DIGITS), pick(SYMBOLS)];
    chars.extend((4..length).map(|_| pick(&full)));
    chars.shuffle(&mut OsRng);

    Ok(chars.into_iter().collect())
}

/// Produce a new value for `strategy`.
///
/// # Errors
///
/// Returns `ExecutionError::UnsupportedStrategy` for strategies that
/// delegate to external systems or agents.
pub fn regenerate(strategy: &RegenerationStrategy) -> Result<String> {
    match strategy {
        RegenerationStrategy::InternalGenerator {
            generator_type,
            length,
        } => match generator_type {
            GeneratorType::Alphanumeric => Ok(alphanumeric(*length)),
            GeneratorType::StrongPassword => strong_password(*length),
            GeneratorType::Uuid => Ok(uuid()),
            GeneratorType::Hex => Ok(hex(*length)),
        },
        RegenerationStrategy::ExternalSystem { .. } | RegenerationStrategy::AgentTask { .. } => {
            Err(ExecutionError::UnsupportedStrategy(strategy.name()).into())
        }
    }
}
