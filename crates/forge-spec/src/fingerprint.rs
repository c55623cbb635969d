//! Request fingerprinting
//!
//! Provides [`Fingerprint`], a strongly-typed 32-byte Blake3 key over the
//! semantically relevant fields of a request. Request identity, user, and
//! timestamps never participate, so equivalent requests share a key.

use crate::request::{GenerationInput, GenerationRequest};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte request fingerprint (Blake3)
///
/// Cache key for generation results. Literal-match semantics: two prompts
/// that mean the same thing but are worded differently do not share a
/// fingerprint. Immutable and cheap to clone (Copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Create a new Fingerprint from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create fingerprint from byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 32 bytes
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FingerprintError> {
        if bytes.len() != 32 {
            return Err(FingerprintError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Compute Blake3 fingerprint of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        let hash = blake3::hash(data);
        Self::new(*hash.as_bytes())
    }

    /// Fingerprint of a request's semantically relevant fields
    ///
    /// Covers the input mode, target language/framework, and the
    /// authoritative input variant's content, with zero-byte separators
    /// between fields. Deterministic for equivalent requests regardless
    /// of request identity.
    #[must_use]
    pub fn of_request(request: &GenerationRequest) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(request.mode().name().as_bytes());
        hasher.update(&[0]);
        hasher.update(request.language.as_bytes());
        hasher.update(&[0]);
        hasher.update(request.framework.as_deref().unwrap_or("").as_bytes());
        hasher.update(&[0]);
        match &request.input {
            GenerationInput::Prompt(prompt) => {
                hasher.update(prompt.as_bytes());
            }
            GenerationInput::Blueprint(blueprint) => {
                hasher.update(blueprint.id.as_bytes());
            }
            GenerationInput::Specification(spec) => {
                // An unserializable spec keys on its identifying fields
                // instead of an empty (colliding) digest.
                match serde_json::to_vec(spec.as_ref()) {
                    Ok(json) => {
                        hasher.update(&json);
                    }
                    Err(_) => {
                        hasher.update(spec.name.as_bytes());
                        hasher.update(&[0]);
                        hasher.update(spec.description.as_bytes());
                    }
                }
            }
            GenerationInput::ExampleCode(code) => {
                hasher.update(code.as_bytes());
            }
        }
        Self::new(*hasher.finalize().as_bytes())
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8; 32]> for Fingerprint {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

// Serde implementations for compact serialization
impl serde::Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FingerprintVisitor;

        impl<'de> serde::de::Visitor<'de> for FingerprintVisitor {
            type Value = Fingerprint;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 32-byte fingerprint as hex string or byte array")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Fingerprint::from_slice(value).map_err(serde::de::Error::custom)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut arr = [0u8; 32];
                for (i, byte) in arr.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &"32 bytes"))?;
                }
                Ok(Fingerprint::new(arr))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(FingerprintVisitor)
        } else {
            deserializer.deserialize_bytes(FingerprintVisitor)
        }
    }
}

/// Errors that can occur when working with fingerprints
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    /// Invalid fingerprint length
    #[error("invalid fingerprint length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{BlueprintRef, GenerationContext, GenerationInput, GenerationRequest};
    use crate::specification::TechnicalSpecification;
    use proptest::prelude::*;

    fn prompt_request(prompt: &str) -> GenerationRequest {
        GenerationRequest::new(GenerationInput::Prompt(prompt.to_string()), "typescript")
    }

    #[test]
    fn fingerprint_from_slice_invalid_length() {
        let bytes = vec![1u8; 31];
        let result = Fingerprint::from_slice(&bytes);
        assert!(matches!(
            result,
            Err(FingerprintError::InvalidLength { expected: 32, actual: 31 })
        ));
    }

    #[test]
    fn fingerprint_deterministic_across_requests() {
        let f1 = Fingerprint::of_request(&prompt_request("Create a login form"));
        let f2 = Fingerprint::of_request(&prompt_request("Create a login form"));
        assert_eq!(f1, f2);
    }

    #[test]
    fn fingerprint_literal_match_only() {
        // Same meaning, different wording: distinct keys.
        let f1 = Fingerprint::of_request(&prompt_request("Create a login form"));
        let f2 = Fingerprint::of_request(&prompt_request("Make a sign-in form"));
        assert_ne!(f1, f2);
    }

    #[test]
    fn fingerprint_distinguishes_mode() {
        let prompt = prompt_request("shared text");
        let example = GenerationRequest::new(
            GenerationInput::ExampleCode("shared text".to_string()),
            "typescript",
        );
        assert_ne!(
            Fingerprint::of_request(&prompt),
            Fingerprint::of_request(&example)
        );
    }

    #[test]
    fn fingerprint_distinguishes_target() {
        let base = prompt_request("Create a login form");
        let with_framework = prompt_request("Create a login form").with_framework("react");
        assert_ne!(
            Fingerprint::of_request(&base),
            Fingerprint::of_request(&with_framework)
        );
    }

    #[test]
    fn fingerprint_distinguishes_specifications() {
        let spec_request = |name: &str| {
            let mut specification = TechnicalSpecification::minimal(name, "typescript");
            specification.description = format!("{name} service");
            GenerationRequest::new(
                GenerationInput::Specification(Box::new(specification)),
                "typescript",
            )
        };
        assert_ne!(
            Fingerprint::of_request(&spec_request("orders")),
            Fingerprint::of_request(&spec_request("billing"))
        );
    }

    #[test]
    fn fingerprint_uses_blueprint_reference() {
        let a = GenerationRequest::new(
            GenerationInput::Blueprint(BlueprintRef::unresolved("bp-1")),
            "typescript",
        );
        let b = GenerationRequest::new(
            GenerationInput::Blueprint(BlueprintRef::unresolved("bp-2")),
            "typescript",
        );
        assert_ne!(Fingerprint::of_request(&a), Fingerprint::of_request(&b));
    }

    #[test]
    fn fingerprint_display_and_parse() {
        let fingerprint = Fingerprint::compute(b"test");
        let s = fingerprint.to_string();
        let parsed: Fingerprint = s.parse().unwrap();
        assert_eq!(fingerprint, parsed);
    }

    #[test]
    fn fingerprint_short() {
        let fingerprint = Fingerprint::compute(b"test");
        let short = fingerprint.short();
        assert_eq!(short.len(), 16);
        assert!(fingerprint.to_string().starts_with(&short));
    }

    #[test]
    fn fingerprint_serde_json() {
        let fingerprint = Fingerprint::compute(b"test");
        let json = serde_json::to_string(&fingerprint).unwrap();
        let decoded: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fingerprint, decoded);
    }

    proptest! {
        #[test]
        fn fingerprint_ignores_request_identity(
            prompt in ".{0,64}",
            user in "[a-z]{1,12}",
            project in "[a-z]{1,12}",
        ) {
            let a = prompt_request(&prompt);
            let b = prompt_request(&prompt)
                .with_user(user)
                .with_project(project)
                .with_context(GenerationContext::new().with_domain("e-commerce"));
            prop_assert_eq!(Fingerprint::of_request(&a), Fingerprint::of_request(&b));
        }

        #[test]
        fn fingerprint_roundtrips_hex(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let fingerprint = Fingerprint::compute(&data);
            let parsed: Fingerprint = fingerprint.to_string().parse().unwrap();
            prop_assert_eq!(fingerprint, parsed);
        }
    }
}
