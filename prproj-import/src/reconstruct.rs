//! Recursive reconstruction of sequences into stacks.
//!
//! One [`Reconstructor`] is one conversion session: it owns the object
//! cache and the set of sequences currently being expanded (the cycle
//! guard), and is threaded through the recursion rather than living in any
//! global state. A sequence referenced from another sequence's track item
//! is rebuilt by the same procedure and stands in as a nested stack.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, trace};

use prproj_core::{
    Clip, Effect, Gap, Item, LinearTimeWarp, Metadata, Rational, RationalTime, Stack, TimeRange,
    Track, TrackKind,
};

use crate::document::{Document, NodeId};
use crate::error::{Error, Result};
use crate::index::ObjectIndex;
use crate::media::media_reference;
use crate::ticks::{frame_rate_from_interval, frames_from_ticks, time_from_ticks};

/// Metadata namespace for provenance facts carried through a conversion.
pub const METADATA_NAMESPACE: &str = "premiere";

/// One conversion session over one document.
pub(crate) struct Reconstructor<'doc> {
    doc: &'doc Document,
    index: ObjectIndex<'doc>,
    rate_override: Option<Rational>,
    in_progress: HashSet<NodeId>,
}

impl<'doc> Reconstructor<'doc> {
    pub(crate) fn new(doc: &'doc Document, rate_override: Option<Rational>) -> Self {
        Self {
            doc,
            index: ObjectIndex::new(doc),
            rate_override,
            in_progress: HashSet::new(),
        }
    }

    /// Rebuild one sequence node into a stack.
    pub(crate) fn stack_from_sequence(&mut self, sequence: NodeId) -> Result<Stack> {
        let name = self
            .doc
            .child_text(sequence, "Name")
            .unwrap_or_default()
            .to_string();
        if !self.in_progress.insert(sequence) {
            return Err(Error::CyclicSequence { name });
        }
        let result = self.build_stack(sequence, name);
        self.in_progress.remove(&sequence);
        result
    }

    fn build_stack(&mut self, sequence: NodeId, name: String) -> Result<Stack> {
        let doc = self.doc;
        debug!(sequence = %name, "reconstructing sequence");

        let mut groups = Vec::new();
        for group_ref in doc.find_all(sequence, "TrackGroups/TrackGroup/Second") {
            groups.push(self.index.dereference(group_ref)?);
        }

        let mut stack = Stack::new(name);
        let rate = match self.rate_override {
            Some(rate) => rate,
            None => self.derive_rate(&groups, &mut stack.metadata)?,
        };

        for &group in &groups {
            for track_ref in doc.find_all(group, "TrackGroup/Tracks/Track") {
                let track_node = self.index.dereference(track_ref)?;
                let track = self.build_track(track_node, rate)?;
                stack.tracks.push(track);
            }
        }
        Ok(stack)
    }

    /// Effective frame rate: the first video track group's tick interval,
    /// else 25 fps. The raw interval is recorded as provenance.
    fn derive_rate(&mut self, groups: &[NodeId], metadata: &mut Metadata) -> Result<Rational> {
        let doc = self.doc;
        for &group in groups {
            if doc.tag(group) != "VideoTrackGroup" {
                continue;
            }
            let interval_node = doc.required(group, "TrackGroup/FrameRate")?;
            let text = doc.text(interval_node).trim();
            let interval: i64 = text.parse().map_err(|_| Error::MalformedValue {
                tag: "FrameRate".into(),
                value: text.into(),
            })?;
            let rate = frame_rate_from_interval(interval)?;
            debug!(interval, rate = %rate, "derived frame rate from video track group");
            namespace_entry(metadata).insert("frame_rate_ticks".into(), Value::from(interval));
            return Ok(rate);
        }
        debug!("no video track group; defaulting to 25 fps");
        Ok(Rational::new(25, 1))
    }

    fn build_track(&mut self, track_node: NodeId, rate: Rational) -> Result<Track> {
        let doc = self.doc;
        let kind = match doc.tag(track_node) {
            "VideoClipTrack" => TrackKind::Video,
            "AudioClipTrack" => TrackKind::Audio,
            other => {
                return Err(Error::UnknownTrackKind {
                    tag: other.to_string(),
                    id: doc
                        .attribute(track_node, "ObjectID")
                        .unwrap_or_default()
                        .to_string(),
                })
            }
        };

        let mut track = Track::new(kind);
        let mut last_end_ticks: i64 = 0;
        for item_ref in doc.find_all(track_node, "ClipTrack/ClipItems/TrackItems/TrackItem") {
            let top_item = self.index.dereference(item_ref)?;
            let item = self.build_item(top_item, kind, rate, &mut last_end_ticks, &mut track)?;
            track.items.push(item);
        }
        Ok(track)
    }

    /// Resolve one track item down to its clip and media, emitting a gap
    /// first when the item starts past the last occupied end.
    fn build_item(
        &mut self,
        top_item: NodeId,
        kind: TrackKind,
        rate: Rational,
        last_end_ticks: &mut i64,
        track: &mut Track,
    ) -> Result<Item> {
        let doc = self.doc;
        let clip_track_item = doc.required(top_item, "ClipTrackItem")?;
        let position = doc.required(clip_track_item, "TrackItem")?;
        let start_ticks = doc.int_text(position, "Start")?;
        let end_ticks = doc.int_text(position, "End")?;

        if start_ticks > *last_end_ticks {
            let hole = start_ticks - *last_end_ticks;
            trace!(ticks = hole, "gap before track item");
            track.items.push(Item::Gap(Gap {
                duration: RationalTime::new(frames_from_ticks(hole, rate), rate),
            }));
        }

        let sub_clip = self
            .index
            .dereference(doc.required(clip_track_item, "SubClip")?)?;
        let top_clip = self.index.dereference(doc.required(sub_clip, "Clip")?)?;
        let clip_node = doc.required(top_clip, "Clip")?;
        let in_ticks = doc.int_text(clip_node, "InPoint")?;
        let out_ticks = doc.int_text(clip_node, "OutPoint")?;

        // Placed duration is the track-position span; a playback-speed
        // effect carries the rate change separately, leaving the span
        // unscaled regardless of the scalar.
        let source_range = TimeRange::new(
            time_from_ticks(in_ticks, rate),
            RationalTime::new(frames_from_ticks(end_ticks - start_ticks, rate), rate),
        );

        let mut effects = Vec::new();
        if doc.child(clip_node, "PlaybackSpeed").is_some() {
            let scalar = doc.float_text(clip_node, "PlaybackSpeed")?;
            trace!(scalar, "playback speed effect");
            effects.push(Effect::LinearTimeWarp(LinearTimeWarp::new(scalar)));
        }

        let mut provenance = Metadata::new();
        let entry = namespace_entry(&mut provenance);
        entry.insert("start_ticks".into(), Value::from(start_ticks));
        entry.insert("end_ticks".into(), Value::from(end_ticks));
        entry.insert("in_point_ticks".into(), Value::from(in_ticks));
        entry.insert("out_point_ticks".into(), Value::from(out_ticks));

        let media_source = self.index.dereference(doc.required(clip_node, "Source")?)?;
        let item = if let Some(media_ref) = doc.find(media_source, "MediaSource/Media") {
            let media = self.index.dereference(media_ref)?;
            let media_reference = media_reference(doc, &mut self.index, media, kind, rate)?;
            Item::Clip(Clip {
                name: String::new(),
                source_range,
                media_reference,
                effects,
                metadata: provenance,
            })
        } else {
            let sequence_ref = doc.required(media_source, "SequenceSource/Sequence")?;
            let nested_sequence = self.index.dereference(sequence_ref)?;
            let mut nested = self.stack_from_sequence(nested_sequence)?;
            nested.source_range = Some(source_range);
            nested.effects = effects;
            merge_metadata(&mut nested.metadata, provenance);
            Item::Stack(nested)
        };

        *last_end_ticks = end_ticks;
        Ok(item)
    }
}

/// The mutable `premiere` namespace object inside a metadata mapping.
pub(crate) fn namespace_entry(metadata: &mut Metadata) -> &mut serde_json::Map<String, Value> {
    let slot = metadata
        .entry(METADATA_NAMESPACE.to_string())
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(serde_json::Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("namespace slot was just normalized to an object"),
    }
}

/// Merge provenance facts into existing metadata, namespace by namespace.
fn merge_metadata(target: &mut Metadata, additions: Metadata) {
    for (namespace, value) in additions {
        match (target.get_mut(&namespace), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                existing.extend(incoming);
            }
            (_, value) => {
                target.insert(namespace, value);
            }
        }
    }
}
