//! Hierarchical timeline model: collections, timelines, stacks, and tracks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effect::Effect;
use crate::media::MediaReference;
use crate::time::{RationalTime, TimeRange};

/// Open, namespaced mapping of provenance facts.
///
/// Keys are namespaces (e.g. `"premiere"`); values are arbitrary JSON.
/// Metadata is carried for round-trip fidelity and is never required to
/// interpret the structures it is attached to.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Kind of content a track holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TrackKind {
    Video,
    Audio,
}

/// An empty span on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    /// Length of the hole.
    pub duration: RationalTime,
}

/// A positioned piece of media on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Display name; may be empty.
    pub name: String,
    /// Source span: clip-relative start time and placed duration.
    pub source_range: TimeRange,
    /// What the clip plays.
    pub media_reference: MediaReference,
    /// Effects applied to the clip.
    pub effects: Vec<Effect>,
    /// Namespaced provenance facts.
    pub metadata: Metadata,
}

/// An occupant of a track, resolved at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    /// Empty span.
    Gap(Gap),
    /// Media clip.
    Clip(Clip),
    /// Nested timeline standing in as a single occupant.
    Stack(Stack),
}

impl Item {
    /// Placed duration of the occupant, when known.
    pub fn duration(&self) -> Option<RationalTime> {
        match self {
            Item::Gap(g) => Some(g.duration),
            Item::Clip(c) => Some(c.source_range.duration),
            Item::Stack(s) => s.source_range.map(|r| r.duration).or_else(|| s.duration()),
        }
    }
}

/// An ordered sequence of items of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Video or audio.
    pub kind: TrackKind,
    /// Occupants in timeline order.
    pub items: Vec<Item>,
}

impl Track {
    /// Create an empty track of the given kind.
    pub fn new(kind: TrackKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Total duration of the track's items, when any item has one.
    ///
    /// Items are laid out back to back, so the duration is the sum.
    pub fn duration(&self) -> Option<RationalTime> {
        self.items
            .iter()
            .filter_map(Item::duration)
            .reduce(|acc, d| acc + d)
    }
}

/// A group of parallel tracks; one editable timeline's body.
///
/// A stack embedded as a track item represents a nested sequence; its
/// `source_range` is then the span it occupies on the parent track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    /// Name of the source sequence; may be empty.
    pub name: String,
    /// Present when the stack is nested inside a parent track.
    pub source_range: Option<TimeRange>,
    /// Parallel tracks, video and audio.
    pub tracks: Vec<Track>,
    /// Effects applied to the stack as a whole.
    pub effects: Vec<Effect>,
    /// Namespaced provenance facts.
    pub metadata: Metadata,
}

impl Stack {
    /// Create an empty named stack.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_range: None,
            tracks: Vec::new(),
            effects: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Duration of the longest track, when any track has one.
    pub fn duration(&self) -> Option<RationalTime> {
        let mut longest: Option<RationalTime> = None;
        for track in &self.tracks {
            if let Some(d) = track.duration() {
                let replace = longest.map_or(true, |l| d.to_seconds_f64() > l.to_seconds_f64());
                if replace {
                    longest = Some(d);
                }
            }
        }
        longest
    }

    /// Tracks of the given kind, in order.
    pub fn tracks_of_kind(&self, kind: TrackKind) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |t| t.kind == kind)
    }
}

/// A named, self-contained timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Name of the source sequence.
    pub name: String,
    /// The timeline's track stack.
    pub tracks: Stack,
}

impl Timeline {
    /// Wrap a stack into a timeline named after it.
    pub fn from_stack(stack: Stack) -> Self {
        Self {
            name: stack.name.clone(),
            tracks: stack,
        }
    }

    /// Duration of the longest track.
    pub fn duration(&self) -> Option<RationalTime> {
        self.tracks.duration()
    }
}

/// An ordered, named collection of timelines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Collection {
    /// Collection name; may be empty.
    pub name: String,
    /// Timelines in source document order.
    pub timelines: Vec<Timeline>,
}

impl Collection {
    /// Create an empty named collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timelines: Vec::new(),
        }
    }

    /// Number of timelines.
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    /// True when the collection holds no timelines.
    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Find a timeline by name.
    pub fn timeline(&self, name: &str) -> Option<&Timeline> {
        self.timelines.iter().find(|t| t.name == name)
    }

    /// Names of all timelines, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.timelines.iter().map(|t| t.name.as_str())
    }
}
