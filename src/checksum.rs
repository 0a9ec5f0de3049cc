//! Checksum of generated output, for comparing runs

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA256 checksum of generated text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    pub fn of(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines
    pub fn short(&self) -> &str {
        &self.0[..12]
    }

    pub fn verify(&self, content: &str) -> bool {
        *self == Self::of(content)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = "pub const Position = struct {};\n";
        assert_eq!(Checksum::of(content), Checksum::of(content));
    }

    #[test]
    fn test_checksum_different_content() {
        assert_ne!(Checksum::of("a"), Checksum::of("b"));
    }

    #[test]
    fn test_checksum_verification() {
        let checksum = Checksum::of("pub const A = B;\n");
        assert!(checksum.verify("pub const A = B;\n"));
        assert!(!checksum.verify("pub const A = C;\n"));
        assert_eq!(checksum.short().len(), 12);
    }
}
