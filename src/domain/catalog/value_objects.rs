use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

/// Display name shared by clients, items, routes and bank accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
  const MAX_LENGTH: usize = 255;

  pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
    let name = name.into().trim().to_string();

    if name.is_empty() {
      return Err(ValidationError::NameEmpty);
    }

    if name.len() > Self::MAX_LENGTH {
      return Err(ValidationError::NameTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Route code such as `RT001`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCode(String);

impl RouteCode {
  const MAX_LENGTH: usize = 16;

  pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
    let code = code.into().trim().to_uppercase();

    if code.is_empty() || code.len() > Self::MAX_LENGTH {
      return Err(ValidationError::RouteCodeInvalidLength {
        max: Self::MAX_LENGTH,
      });
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
      return Err(ValidationError::RouteCodeInvalidCharacters);
    }

    Ok(Self(code))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// IBAN (International Bank Account Number) value object with strict validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iban(String);

impl Iban {
  const MIN_LENGTH: usize = 15;
  const MAX_LENGTH: usize = 34;

  pub fn new(iban: impl Into<String>) -> Result<Self, ValidationError> {
    let iban = iban
      .into()
      .chars()
      .filter(|c| !c.is_whitespace())
      .collect::<String>()
      .to_uppercase();

    if iban.len() < Self::MIN_LENGTH || iban.len() > Self::MAX_LENGTH {
      return Err(ValidationError::IbanInvalidLength {
        min: Self::MIN_LENGTH,
        max: Self::MAX_LENGTH,
      });
    }

    // 2 letters (country) + 2 digits (check) + alphanumeric BBAN
    let bytes = iban.as_bytes();
    let well_formed = bytes[..2].iter().all(u8::is_ascii_alphabetic)
      && bytes[2..4].iter().all(u8::is_ascii_digit)
      && bytes[4..].iter().all(u8::is_ascii_alphanumeric);
    if !well_formed {
      return Err(ValidationError::IbanInvalidFormat);
    }

    if Self::checksum(&iban) != 1 {
      return Err(ValidationError::IbanInvalidChecksum);
    }

    Ok(Self(iban))
  }

  // ISO 13616 mod-97 over the rearranged, letter-expanded string
  fn checksum(iban: &str) -> u32 {
    iban[4..]
      .chars()
      .chain(iban[..4].chars())
      .fold(0u32, |remainder, c| match c.to_digit(36) {
        Some(value) if value >= 10 => (remainder * 100 + value) % 97,
        Some(value) => (remainder * 10 + value) % 97,
        None => remainder,
      })
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Format IBAN with spaces every 4 characters for display
  pub fn formatted(&self) -> String {
    self
      .0
      .chars()
      .enumerate()
      .fold(String::new(), |mut acc, (i, c)| {
        if i > 0 && i % 4 == 0 {
          acc.push(' ');
        }
        acc.push(c);
        acc
      })
  }
}

/// BIC / SWIFT code: 4 bank letters, 2 country letters, 2 location chars, optional 3 branch chars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bic(String);

impl Bic {
  pub fn new(bic: impl Into<String>) -> Result<Self, ValidationError> {
    let bic = bic
      .into()
      .chars()
      .filter(|c| !c.is_whitespace())
      .collect::<String>()
      .to_uppercase();

    if bic.len() != 8 && bic.len() != 11 {
      return Err(ValidationError::BicInvalidLength);
    }

    let bytes = bic.as_bytes();
    let well_formed = bytes[..6].iter().all(u8::is_ascii_alphabetic)
      && bytes[6..].iter().all(u8::is_ascii_alphanumeric);
    if !well_formed {
      return Err(ValidationError::BicInvalidFormat);
    }

    Ok(Self(bic))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}
