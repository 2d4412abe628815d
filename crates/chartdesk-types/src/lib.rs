//! Validated text primitives shared across the chartdesk crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Prefix of the conventional sequential identifier form (`P001`, `P002`, ...).
pub const PATIENT_ID_PREFIX: char = 'P';

/// Minimum digit width of a sequential identifier.
pub const PATIENT_ID_MIN_DIGITS: usize = 3;

/// A patient identifier.
///
/// Identifiers are compared case-insensitively by [`PatientId::matches`]; the stored
/// spelling is kept as given so a record reads back exactly as it was loaded or inserted.
/// The `P<digits>` shape is a convention only and is not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatientId(NonEmptyText);

impl PatientId {
    /// Creates an identifier from raw input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        NonEmptyText::new(input).map(Self)
    }

    /// Creates an identifier in canonical (upper-case) form.
    ///
    /// This is the form new records are stored under and the form search input is
    /// normalised to before lookup.
    pub fn canonical(input: impl AsRef<str>) -> Result<Self, TextError> {
        Self::new(input.as_ref().trim().to_uppercase())
    }

    /// Builds the sequential identifier for `n`, e.g. `7` -> `P007`, `1234` -> `P1234`.
    pub fn from_sequence(n: u64) -> Self {
        Self(NonEmptyText(format!(
            "{PATIENT_ID_PREFIX}{n:0width$}",
            width = PATIENT_ID_MIN_DIGITS
        )))
    }

    /// Case-insensitive comparison against a raw identifier.
    pub fn matches(&self, other: &str) -> bool {
        let ours = self.0.as_str();
        ours.eq_ignore_ascii_case(other) || ours.to_uppercase() == other.to_uppercase()
    }

    /// Numeric part of a `P<digits>` identifier.
    ///
    /// The prefix is matched case-insensitively and the digit run directly after it is
    /// read, so `P050A` gives 50. No digits after the prefix, or a run too large for
    /// `u64`, yields `None`.
    pub fn sequence_number(&self) -> Option<u64> {
        let rest = self
            .0
            .as_str()
            .strip_prefix(|c: char| c.eq_ignore_ascii_case(&PATIENT_ID_PREFIX))?;
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        rest[..digits_end].parse().ok()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl serde::Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        NonEmptyText::deserialize(deserializer).map(Self)
    }
}
