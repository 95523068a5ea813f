//! Media references: what a clip points at.

use serde::{Deserialize, Serialize};

use crate::time::TimeRange;
use crate::timeline::Metadata;

/// Generator-kind tag for procedurally generated media.
///
/// Identifies that the reference came from the editing application's
/// generator effect; the specific algorithm, if recorded at all, lives in
/// the opaque parameter blob.
pub const GENERATOR_KIND: &str = "premiere.generator";

/// A reference to an external media file.
///
/// The target is the path as declared by the source project, used as a
/// placeholder locator; it is never verified against the filesystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalReference {
    /// Declared media path.
    pub target_path: String,
    /// Portion of the media available for editing.
    pub available_range: TimeRange,
    /// Namespaced provenance facts.
    pub metadata: Metadata,
}

/// A reference to procedurally generated media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorReference {
    /// Display name of the generator instance.
    pub name: String,
    /// Fixed provenance tag, see [`GENERATOR_KIND`].
    pub generator_kind: String,
    /// Opaque decoded import-configuration payload, when embedded.
    pub parameters: Option<Vec<u8>>,
    /// Namespaced provenance facts.
    pub metadata: Metadata,
}

/// What a clip's media resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaReference {
    /// External file on disk.
    External(ExternalReference),
    /// Procedural generator.
    Generator(GeneratorReference),
}

impl MediaReference {
    /// True when the reference denotes generated rather than file media.
    pub fn is_generator(&self) -> bool {
        matches!(self, MediaReference::Generator(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_generator() {
        let gen = MediaReference::Generator(GeneratorReference {
            name: "Bars and Tone".into(),
            generator_kind: GENERATOR_KIND.into(),
            parameters: None,
            metadata: Metadata::new(),
        });
        assert!(gen.is_generator());
    }
}
