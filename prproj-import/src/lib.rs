//! # prproj-import
//!
//! Read Adobe Premiere Pro project files (`.prproj`) into the neutral
//! timeline model from [`prproj_core`].
//!
//! A project file is raw or gzip-compressed XML whose top-level children
//! form an object graph keyed by `ObjectID` / `ObjectUID` attributes. The
//! importer indexes that graph, converts Premiere's 254 016 000 000
//! ticks-per-second time values into frame counts at a derived (or
//! caller-overridden) rational frame rate, and recursively rebuilds every
//! sequence into a stack of tracks holding clips, gaps, and nested stacks.
//!
//! ## Example
//!
//! ```no_run
//! use prproj_import::PremiereProject;
//!
//! fn main() -> prproj_import::Result<()> {
//!     let collection = prproj_import::read_from_file("cut.prproj")?;
//!     for timeline in &collection.timelines {
//!         println!("{}", timeline.name);
//!     }
//!
//!     // Or pick a single sequence at an explicit frame rate:
//!     let bytes = std::fs::read("cut.prproj")?;
//!     let project = PremiereProject::from_slice(&bytes)?
//!         .with_frame_rate(prproj_core::Rational::new(24, 1));
//!     let timeline = project.to_timeline("Seq1")?;
//!     println!("{:?}", timeline.duration());
//!     Ok(())
//! }
//! ```

pub mod decode;
pub mod document;
pub mod error;
pub mod index;
pub mod ticks;

mod media;
mod reconstruct;

use std::path::Path;

use prproj_core::{Collection, Rational, Timeline};

use crate::document::Document;
use crate::reconstruct::Reconstructor;

pub use crate::error::{Error, Result};
pub use crate::reconstruct::METADATA_NAMESPACE;

/// A decoded project ready for conversion.
///
/// Holds the parsed document and the per-invocation configuration; each
/// conversion call runs its own session with its own object cache.
pub struct PremiereProject {
    document: Document,
    frame_rate: Option<Rational>,
}

impl PremiereProject {
    /// Decode a project from bytes (raw XML or gzip-compressed XML).
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw = decode::decode(bytes)?;
        Ok(Self {
            document: Document::from_slice(&raw)?,
            frame_rate: None,
        })
    }

    /// Decode a project from a file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    /// Override the frame rate for subsequent conversions.
    ///
    /// Suppresses the document-derived rate entirely; every sequence,
    /// nested ones included, is quantized at this rate.
    pub fn with_frame_rate(mut self, rate: Rational) -> Self {
        self.frame_rate = Some(rate);
        self
    }

    /// Convert every sequence at the document root, in document order.
    ///
    /// Returns either a fully-built collection or the first error of the
    /// traversal; there is no partial output.
    pub fn to_collection(&self) -> Result<Collection> {
        let mut session = Reconstructor::new(&self.document, self.frame_rate);
        let mut collection = Collection::new("");

        let root = self.document.root();
        for &child in self.document.children(root) {
            if self.document.tag(child) != "Sequence" {
                continue;
            }
            let stack = session.stack_from_sequence(child)?;
            collection.timelines.push(Timeline::from_stack(stack));
        }
        Ok(collection)
    }

    /// Convert and return only the sequence with the given name.
    ///
    /// A missing name is [`Error::SequenceNotFound`], distinct from parse
    /// errors so callers can list available sequences and retry.
    pub fn to_timeline(&self, name: &str) -> Result<Timeline> {
        let mut collection = self.to_collection()?;
        match collection.timelines.iter().position(|t| t.name == name) {
            Some(position) => Ok(collection.timelines.remove(position)),
            None => Err(Error::SequenceNotFound {
                name: name.to_string(),
            }),
        }
    }
}

/// Read a collection from project bytes (raw or gzip-compressed XML).
pub fn read_from_slice(bytes: &[u8]) -> Result<Collection> {
    PremiereProject::from_slice(bytes)?.to_collection()
}

/// Read a collection from an XML string.
pub fn read_from_str(input: &str) -> Result<Collection> {
    read_from_slice(input.as_bytes())
}

/// Read a collection from a project file on disk.
pub fn read_from_file(path: impl AsRef<Path>) -> Result<Collection> {
    PremiereProject::from_file(path)?.to_collection()
}
