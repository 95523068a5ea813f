//! Media reference construction for resolved media objects.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;
use tracing::trace;

use prproj_core::{
    ExternalReference, GeneratorReference, MediaReference, Metadata, Rational, RationalTime,
    TimeRange, TrackKind, GENERATOR_KIND,
};

use crate::document::{Document, NodeId};
use crate::error::{Error, Result};
use crate::index::ObjectIndex;
use crate::reconstruct::namespace_entry;
use crate::ticks::{frames_from_ticks, time_from_ticks};

/// Build the media reference for a resolved `Media` object.
///
/// A media object with a non-empty declared file path is external media;
/// anything else came from the application's generator effect.
pub(crate) fn media_reference(
    doc: &Document,
    index: &mut ObjectIndex<'_>,
    media: NodeId,
    kind: TrackKind,
    rate: Rational,
) -> Result<MediaReference> {
    match doc.child_text(media, "ActualMediaFilePath").filter(|path| !path.is_empty()) {
        Some(path) => external_reference(doc, index, media, kind, rate, path.to_string()),
        None => generator_reference(doc, media),
    }
}

fn external_reference(
    doc: &Document,
    index: &mut ObjectIndex<'_>,
    media: NodeId,
    kind: TrackKind,
    rate: Rational,
    target_path: String,
) -> Result<MediaReference> {
    // Availability start offset; absent means the media starts at zero.
    let start_ticks = match doc.child(media, "Start") {
        Some(_) => doc.int_text(media, "Start")?,
        None => 0,
    };

    let stream_tag = match kind {
        TrackKind::Video => "VideoStream",
        TrackKind::Audio => "AudioStream",
        _ => return Err(Error::UnsupportedMediaKind { kind }),
    };
    let stream = index.dereference(doc.required(media, stream_tag)?)?;
    let duration_ticks = doc.int_text(stream, "Duration")?;
    trace!(target = %target_path, start_ticks, duration_ticks, "external media");

    let mut metadata = Metadata::new();
    let entry = namespace_entry(&mut metadata);
    entry.insert("media_start_ticks".into(), Value::from(start_ticks));
    entry.insert("media_duration_ticks".into(), Value::from(duration_ticks));

    Ok(MediaReference::External(ExternalReference {
        target_path,
        available_range: TimeRange::new(
            time_from_ticks(start_ticks, rate),
            RationalTime::new(frames_from_ticks(duration_ticks, rate), rate),
        ),
        metadata,
    }))
}

fn generator_reference(doc: &Document, media: NodeId) -> Result<MediaReference> {
    let name = doc.child_text(media, "Title").unwrap_or_default().to_string();
    let parameters = match doc.child(media, "ImporterPrefs") {
        Some(prefs) => decode_importer_prefs(doc, prefs)?,
        None => None,
    };
    trace!(name = %name, has_parameters = parameters.is_some(), "generator media");

    Ok(MediaReference::Generator(GeneratorReference {
        name,
        generator_kind: GENERATOR_KIND.to_string(),
        parameters,
        metadata: Metadata::new(),
    }))
}

/// Decode an embedded import-configuration payload.
///
/// The payload is opaque to the reconstruction; it is carried only so a
/// consumer can hand it back to the generator. An `Encoding` attribute
/// other than base64 leaves the bytes as written.
fn decode_importer_prefs(doc: &Document, prefs: NodeId) -> Result<Option<Vec<u8>>> {
    let text = doc.text(prefs).trim();
    if text.is_empty() {
        return Ok(None);
    }
    match doc.attribute(prefs, "Encoding") {
        None | Some("base64") => {
            let blob = BASE64.decode(text).map_err(|_| Error::MalformedValue {
                tag: "ImporterPrefs".into(),
                value: text.to_string(),
            })?;
            Ok(Some(blob))
        }
        Some(_) => Ok(Some(text.as_bytes().to_vec())),
    }
}
