use prproj_core::TrackKind;
use thiserror::Error;

use crate::index::IdKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("gzip stream failed to decompress: {source}")]
    GzipDecode { source: std::io::Error },

    #[error("data is neither XML nor gzip-compressed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("no object with {kind} '{id}'")]
    ObjectNotFound { kind: IdKind, id: String },

    #[error("object with {kind} '{id}' has no child elements")]
    ObjectMalformed { kind: IdKind, id: String },

    #[error("node <{tag}> carries neither ObjectRef nor ObjectURef")]
    MissingReferenceAttribute { tag: String },

    #[error("missing required element <{tag}> under <{context}>")]
    MissingElement { tag: String, context: String },

    #[error("invalid value '{value}' in <{tag}>")]
    MalformedValue { tag: String, value: String },

    #[error("unknown track type: <{tag}> (ObjectID: {id})")]
    UnknownTrackKind { tag: String, id: String },

    #[error("cannot build a media reference for {kind:?} tracks")]
    UnsupportedMediaKind { kind: TrackKind },

    #[error("sequence '{name}' transitively contains itself")]
    CyclicSequence { name: String },

    #[error("no sequence named '{name}' in project")]
    SequenceNotFound { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for lookup failures the caller can recover from, as opposed to
    /// parse failures that make the whole document unusable.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SequenceNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownTrackKind {
            tag: "SubtitleTrack".into(),
            id: "42".into(),
        };
        assert_eq!(
            err.to_string(),
            "unknown track type: <SubtitleTrack> (ObjectID: 42)"
        );
    }

    #[test]
    fn test_not_found_is_recoverable() {
        assert!(Error::SequenceNotFound { name: "x".into() }.is_not_found());
        assert!(!Error::ObjectNotFound {
            kind: IdKind::Primary,
            id: "1".into()
        }
        .is_not_found());
    }
}
