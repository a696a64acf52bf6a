//! Sparse-key codec between [`SlideIndex`] and each stage's JSON shape.
//!
//! | Schema | Primary key | Companion keys | Start |
//! |--------|-------------|----------------|-------|
//! | [`StageSchema::Script`] | `s{i}paragraph1` | `storytitle`, `hookline` | 1 |
//! | [`StageSchema::TtsAnnotated`] | `slide{i}` object | text field, `audio_url`, `voice` | 1 |
//! | [`StageSchema::MarkupInput`] | `slide{i}` object | `s{i}paragraph1`, `audio_url{i}`, `voice` | 2 |
//! | [`StageSchema::RenderInput`] | `s{i}paragraph1` | `s{i}audio1`, `s{i}image1`, `s{i}paragraph2` | 1 |
//!
//! Decoding scans `i = start, start + 1, …` and stops at the first `i` whose
//! primary key is missing; holes are never skipped.  Missing companion keys
//! default to empty.  Anything that is not a JSON object decodes to an empty
//! index.
//!
//! Encoding emits keys in position order and leaves out fields that are not
//! populated (no `audio_url` without audio, no `voice` when empty).
//! [`Role::CallToAction`] slides only have a dedicated shape in render input;
//! the other encoders write them as plain paragraphs.

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};

use super::model::{Role, Slide, SlideIndex, SlideIndexBuilder};

// ---------------------------------------------------------------------------
// Key vocabulary
// ---------------------------------------------------------------------------

const STORYTITLE_KEY: &str = "storytitle";
const HOOKLINE_KEY: &str = "hookline";
const AUDIO_URL_KEY: &str = "audio_url";
const VOICE_KEY: &str = "voice";

pub(crate) fn paragraph_key(i: u32) -> String {
    format!("s{i}paragraph1")
}

pub(crate) fn slide_key(i: u32) -> String {
    format!("slide{i}")
}

fn numbered_audio_key(i: u32) -> String {
    format!("audio_url{i}")
}

pub(crate) fn render_audio_key(i: u32) -> String {
    format!("s{i}audio1")
}

pub(crate) fn render_image_key(i: u32) -> String {
    format!("s{i}image1")
}

pub(crate) fn render_caption_key(i: u32) -> String {
    format!("s{i}paragraph2")
}

// ---------------------------------------------------------------------------
// StageSchema
// ---------------------------------------------------------------------------

/// The external key layout of one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageSchema {
    /// Flat script: `storytitle`, `hookline`, `s{i}paragraph1`.
    Script,
    /// `slide{i}` objects with a text field plus `audio_url` and `voice`.
    TtsAnnotated,
    /// Re-based body slides: `slide{i}` with `s{i}paragraph1` and `audio_url{i}`.
    MarkupInput,
    /// Flat `s{i}…` keys consumed by the video renderer.
    RenderInput,
}

impl StageSchema {
    /// Position of the first slide in this stage.
    pub fn start(self) -> u32 {
        match self {
            StageSchema::MarkupInput => 2,
            _ => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StageSchema::Script => "script",
            StageSchema::TtsAnnotated => "tts-annotated",
            StageSchema::MarkupInput => "markup-input",
            StageSchema::RenderInput => "render-input",
        }
    }
}

impl fmt::Display for StageSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

/// Decode `raw` under `schema`.
///
/// Never fails: non-object input or a missing first key yields an empty
/// index, and a gap truncates the result at the gap.
pub fn decode(raw: &Value, schema: StageSchema) -> SlideIndex {
    match raw.as_object() {
        Some(map) => decode_map(map, schema),
        None => {
            log::warn!("codec: {schema} input is not a JSON object; decoding to an empty index");
            SlideIndex::empty(schema.start())
        }
    }
}

/// Decode an already-extracted JSON object under `schema`.
pub fn decode_map(map: &Map<String, Value>, schema: StageSchema) -> SlideIndex {
    let mut seen = Consumed::default();
    let mut builder = SlideIndex::builder(schema.start());

    match schema {
        StageSchema::Script => decode_script(map, &mut builder, &mut seen),
        StageSchema::TtsAnnotated => decode_tts(map, &mut builder, &mut seen),
        StageSchema::MarkupInput => decode_markup(map, &mut builder, &mut seen),
        StageSchema::RenderInput => decode_render(map, &mut builder, &mut seen),
    }

    seen.report_ignored(map, schema);
    let index = builder.build();
    log::debug!("codec: decoded {} {schema} slide(s)", index.len());
    index
}

fn decode_script(map: &Map<String, Value>, b: &mut SlideIndexBuilder, seen: &mut Consumed) {
    if let Some(text) = seen.text(map, STORYTITLE_KEY) {
        b.push_lenient(Slide::title(text));
    }
    if let Some(text) = seen.text(map, HOOKLINE_KEY) {
        b.push_lenient(Slide::hook(text));
    }
    for i in 1.. {
        match seen.text(map, &paragraph_key(i)) {
            Some(text) => b.push_lenient(Slide::body(text)),
            None => break,
        };
    }
}

fn decode_tts(map: &Map<String, Value>, b: &mut SlideIndexBuilder, seen: &mut Consumed) {
    for i in 1.. {
        let Some(entry) = seen.object(map, &slide_key(i)) else {
            break;
        };

        let (role, text) = if let Some(text) = entry.get(STORYTITLE_KEY).and_then(text_of) {
            (Role::Title, text)
        } else if let Some(text) = entry.get(HOOKLINE_KEY).and_then(text_of) {
            (Role::Hook, text)
        } else {
            let text = entry
                .iter()
                .find(|(k, _)| k.ends_with("paragraph1"))
                .and_then(|(_, v)| text_of(v))
                .unwrap_or_default();
            (Role::Body, text)
        };

        let mut slide = Slide::new(role, text);
        slide.audio_ref = entry.get(AUDIO_URL_KEY).and_then(non_empty_text);
        slide.voice = entry.get(VOICE_KEY).and_then(text_of).unwrap_or_default();
        b.push_lenient(slide);
    }
}

fn decode_markup(map: &Map<String, Value>, b: &mut SlideIndexBuilder, seen: &mut Consumed) {
    for i in StageSchema::MarkupInput.start().. {
        let Some(entry) = seen.object(map, &slide_key(i)) else {
            break;
        };

        let mut slide = Slide::body(
            entry
                .get(&paragraph_key(i))
                .and_then(text_of)
                .unwrap_or_default(),
        );
        slide.audio_ref = entry.get(&numbered_audio_key(i)).and_then(non_empty_text);
        slide.voice = entry.get(VOICE_KEY).and_then(text_of).unwrap_or_default();
        b.push_lenient(slide);
    }
}

fn decode_render(map: &Map<String, Value>, b: &mut SlideIndexBuilder, seen: &mut Consumed) {
    for i in 1.. {
        let Some(text) = seen.text(map, &paragraph_key(i)) else {
            break;
        };

        let mut slide = Slide::body(text);
        slide.audio_ref = seen.text(map, &render_audio_key(i)).filter(|s| !s.is_empty());
        slide.image_ref = seen.text(map, &render_image_key(i)).filter(|s| !s.is_empty());
        slide.caption = seen.text(map, &render_caption_key(i));
        b.push_lenient(slide);
    }
}

// ---------------------------------------------------------------------------
// encode
// ---------------------------------------------------------------------------

/// Encode `index` under `schema`, keys in position order.
pub fn encode(index: &SlideIndex, schema: StageSchema) -> Map<String, Value> {
    let mut out = Map::new();
    let mut body_ordinal = 0u32;

    for slide in index {
        let p = slide.position();
        match schema {
            StageSchema::Script => {
                let key = text_key(slide.role, &mut body_ordinal);
                out.insert(key, Value::String(slide.text.clone()));
            }
            StageSchema::TtsAnnotated => {
                let mut entry = Map::new();
                entry.insert(
                    text_key(slide.role, &mut body_ordinal),
                    Value::String(slide.text.clone()),
                );
                if let Some(audio) = &slide.audio_ref {
                    entry.insert(AUDIO_URL_KEY.into(), Value::String(audio.clone()));
                }
                if !slide.voice.is_empty() {
                    entry.insert(VOICE_KEY.into(), Value::String(slide.voice.clone()));
                }
                out.insert(slide_key(p), Value::Object(entry));
            }
            StageSchema::MarkupInput => {
                let mut entry = Map::new();
                entry.insert(paragraph_key(p), Value::String(slide.text.clone()));
                if let Some(audio) = &slide.audio_ref {
                    entry.insert(numbered_audio_key(p), Value::String(audio.clone()));
                }
                if !slide.voice.is_empty() {
                    entry.insert(VOICE_KEY.into(), Value::String(slide.voice.clone()));
                }
                out.insert(slide_key(p), Value::Object(entry));
            }
            StageSchema::RenderInput => {
                out.insert(paragraph_key(p), Value::String(slide.text.clone()));
                if let Some(audio) = &slide.audio_ref {
                    out.insert(render_audio_key(p), Value::String(audio.clone()));
                }
                if let Some(image) = &slide.image_ref {
                    out.insert(render_image_key(p), Value::String(image.clone()));
                }
                if let Some(caption) = &slide.caption {
                    out.insert(render_caption_key(p), Value::String(caption.clone()));
                }
            }
        }
    }

    out
}

/// Text key of a slide in the script and TTS shapes.
fn text_key(role: Role, body_ordinal: &mut u32) -> String {
    match role {
        Role::Title => STORYTITLE_KEY.into(),
        Role::Hook => HOOKLINE_KEY.into(),
        Role::Body | Role::CallToAction => {
            *body_ordinal += 1;
            paragraph_key(*body_ordinal)
        }
    }
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

/// Text content of a scalar JSON value; `null`, arrays and objects have none.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn non_empty_text(value: &Value) -> Option<String> {
    text_of(value).filter(|s| !s.is_empty())
}

/// Tracks which top-level keys a decode pass consumed.
#[derive(Default)]
struct Consumed {
    keys: HashSet<String>,
}

impl Consumed {
    fn text(&mut self, map: &Map<String, Value>, key: &str) -> Option<String> {
        let text = map.get(key).and_then(text_of)?;
        self.keys.insert(key.to_string());
        Some(text)
    }

    fn object<'m>(&mut self, map: &'m Map<String, Value>, key: &str) -> Option<&'m Map<String, Value>> {
        let value = map.get(key)?;
        match value.as_object() {
            Some(obj) => {
                self.keys.insert(key.to_string());
                Some(obj)
            }
            None => {
                log::warn!("codec: `{key}` is not an object; truncating at this position");
                None
            }
        }
    }

    fn report_ignored(&self, map: &Map<String, Value>, schema: StageSchema) {
        let ignored: Vec<&str> = map
            .keys()
            .map(String::as_str)
            .filter(|k| !self.keys.contains(*k))
            .collect();
        if !ignored.is_empty() {
            log::debug!(
                "codec: {} key(s) outside the decoded {schema} run ignored: {:?}",
                ignored.len(),
                ignored
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texts(index: &SlideIndex) -> Vec<&str> {
        index.iter().map(|s| s.text.as_str()).collect()
    }

    fn narrated_script() -> SlideIndex {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::title("Title").with_audio("https://cdn/t.mp3", "alloy"))
            .unwrap();
        b.push(Slide::hook("Hook").with_audio("https://cdn/h.mp3", "alloy"))
            .unwrap();
        b.push(Slide::body("One").with_audio("https://cdn/1.mp3", "alloy"))
            .unwrap();
        b.push(Slide::body("Two").with_audio("https://cdn/2.mp3", "alloy"))
            .unwrap();
        b.build()
    }

    #[test]
    fn script_scenario_decodes_title_hook_and_bodies() {
        let raw = json!({
            "storytitle": "A",
            "hookline": "B",
            "s1paragraph1": "C",
            "s2paragraph1": "D"
        });
        let index = decode(&raw, StageSchema::Script);

        assert_eq!(index.positions(), vec![1, 2, 3, 4]);
        assert_eq!(texts(&index), vec!["A", "B", "C", "D"]);
        assert_eq!(index.get(1).unwrap().role, Role::Title);
        assert_eq!(index.get(2).unwrap().role, Role::Hook);
        assert_eq!(index.get(3).unwrap().role, Role::Body);
        assert_eq!(index.get(4).unwrap().role, Role::Body);
    }

    #[test]
    fn script_decode_stops_at_first_gap() {
        let raw = json!({ "s1paragraph1": "first", "s3paragraph1": "third" });
        let index = decode(&raw, StageSchema::Script);
        assert_eq!(index.positions(), vec![1]);
        assert_eq!(texts(&index), vec!["first"]);
    }

    #[test]
    fn script_decode_gap_after_title_and_hook() {
        let raw = json!({
            "storytitle": "T",
            "hookline": "H",
            "s1paragraph1": "one",
            "s3paragraph1": "three"
        });
        let index = decode(&raw, StageSchema::Script);
        assert_eq!(index.positions(), vec![1, 2, 3]);
        assert_eq!(texts(&index), vec!["T", "H", "one"]);
    }

    #[test]
    fn script_without_title_starts_with_first_present_role() {
        let raw = json!({ "hookline": "H", "s1paragraph1": "one" });
        let index = decode(&raw, StageSchema::Script);
        assert_eq!(index.positions(), vec![1, 2]);
        assert_eq!(index.get(1).unwrap().role, Role::Hook);
    }

    #[test]
    fn empty_and_non_object_inputs_decode_to_empty_index() {
        assert!(decode(&json!({}), StageSchema::Script).is_empty());
        assert!(decode(&json!([1, 2, 3]), StageSchema::TtsAnnotated).is_empty());
        assert!(decode(&json!("slide1"), StageSchema::MarkupInput).is_empty());
        assert!(decode(&json!({ "s2paragraph1": "x" }), StageSchema::RenderInput).is_empty());
    }

    #[test]
    fn null_primary_key_counts_as_absent() {
        let raw = json!({ "s1paragraph1": "x", "s2paragraph1": null, "s3paragraph1": "z" });
        let index = decode(&raw, StageSchema::Script);
        assert_eq!(texts(&index), vec!["x"]);
    }

    #[test]
    fn script_round_trip() {
        let raw = json!({
            "storytitle": "A",
            "hookline": "B",
            "s1paragraph1": "C",
            "s2paragraph1": "D"
        });
        let index = decode(&raw, StageSchema::Script);
        let encoded = encode(&index, StageSchema::Script);
        assert_eq!(decode_map(&encoded, StageSchema::Script), index);
    }

    #[test]
    fn script_round_trip_over_every_buildable_ordering() {
        const ROLES: [Role; 3] = [Role::Title, Role::Hook, Role::Body];

        let mut sequences: Vec<Vec<Role>> = vec![Vec::new()];
        let mut level: Vec<Vec<Role>> = vec![Vec::new()];
        for _ in 0..4 {
            level = level
                .iter()
                .flat_map(|seq| {
                    ROLES.iter().map(move |role| {
                        let mut next = seq.clone();
                        next.push(*role);
                        next
                    })
                })
                .collect();
            sequences.extend(level.iter().cloned());
        }

        let mut built = 0;
        for roles in &sequences {
            let mut b = SlideIndex::builder(1);
            let accepted = roles
                .iter()
                .enumerate()
                .all(|(i, role)| b.push(Slide::new(*role, format!("{role}{i}"))).is_ok());
            if !accepted {
                continue;
            }

            let index = b.build();
            let back = decode_map(&encode(&index, StageSchema::Script), StageSchema::Script);
            assert_eq!(back, index, "roles {roles:?}");
            built += 1;
        }

        // Optional title, optional hook, then bodies: 5 + 4 + 4 + 3 layouts.
        assert_eq!(built, 16);
    }

    #[test]
    fn script_encode_orders_keys_by_position() {
        let raw = json!({
            "s1paragraph1": "C",
            "hookline": "B",
            "storytitle": "A"
        });
        let encoded = encode(&decode(&raw, StageSchema::Script), StageSchema::Script);
        let keys: Vec<&str> = encoded.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["storytitle", "hookline", "s1paragraph1"]);
    }

    #[test]
    fn tts_round_trip_preserves_audio_and_voice() {
        let index = narrated_script();
        let encoded = encode(&index, StageSchema::TtsAnnotated);

        assert_eq!(
            Value::Object(encoded.clone()),
            json!({
                "slide1": { "storytitle": "Title", "audio_url": "https://cdn/t.mp3", "voice": "alloy" },
                "slide2": { "hookline": "Hook", "audio_url": "https://cdn/h.mp3", "voice": "alloy" },
                "slide3": { "s1paragraph1": "One", "audio_url": "https://cdn/1.mp3", "voice": "alloy" },
                "slide4": { "s2paragraph1": "Two", "audio_url": "https://cdn/2.mp3", "voice": "alloy" }
            })
        );
        assert_eq!(decode_map(&encoded, StageSchema::TtsAnnotated), index);
    }

    #[test]
    fn tts_encode_omits_unpopulated_fields() {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::body("plain")).unwrap();
        let encoded = encode(&b.build(), StageSchema::TtsAnnotated);
        assert_eq!(
            Value::Object(encoded),
            json!({ "slide1": { "s1paragraph1": "plain" } })
        );
    }

    #[test]
    fn tts_decode_tolerates_missing_companions() {
        let raw = json!({
            "slide1": { "storytitle": "T" },
            "slide2": { "s1paragraph1": "body", "audio_url": "" }
        });
        let index = decode(&raw, StageSchema::TtsAnnotated);
        assert_eq!(index.len(), 2);
        assert!(index.get(1).unwrap().audio_ref.is_none());
        assert!(index.get(2).unwrap().audio_ref.is_none());
        assert_eq!(index.get(2).unwrap().voice, "");
    }

    #[test]
    fn tts_decode_ignores_non_numeric_suffixes() {
        let raw = json!({
            "slide1": { "storytitle": "T", "audio_url": "a" },
            "slideX": { "s1paragraph1": "junk" },
            "slide_extra": 5
        });
        let index = decode(&raw, StageSchema::TtsAnnotated);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn tts_decode_truncates_at_non_object_entry() {
        let raw = json!({
            "slide1": { "storytitle": "T" },
            "slide2": "oops",
            "slide3": { "s1paragraph1": "unreachable" }
        });
        assert_eq!(decode(&raw, StageSchema::TtsAnnotated).len(), 1);
    }

    #[test]
    fn markup_round_trip_starts_at_two() {
        let mut b = SlideIndex::builder(2);
        b.push(Slide::body("C").with_audio("u3", "nova")).unwrap();
        b.push(Slide::body("D").with_audio("u4", "nova")).unwrap();
        let index = b.build();

        let encoded = encode(&index, StageSchema::MarkupInput);
        assert_eq!(
            Value::Object(encoded.clone()),
            json!({
                "slide2": { "s2paragraph1": "C", "audio_url2": "u3", "voice": "nova" },
                "slide3": { "s3paragraph1": "D", "audio_url3": "u4", "voice": "nova" }
            })
        );
        assert_eq!(decode_map(&encoded, StageSchema::MarkupInput), index);
    }

    #[test]
    fn markup_decode_ignores_slide_one() {
        let raw = json!({
            "slide1": { "s1paragraph1": "never read" },
            "slide2": { "s2paragraph1": "x", "audio_url2": "a" }
        });
        let index = decode(&raw, StageSchema::MarkupInput);
        assert_eq!(index.positions(), vec![2]);
        assert_eq!(index.get(2).unwrap().text, "x");
    }

    #[test]
    fn render_encode_is_flat_and_decode_recovers_fields() {
        let mut b = SlideIndex::builder(1);
        b.push(
            Slide::title("T")
                .with_audio("a1", "alloy")
                .with_image("img")
                .with_caption("- Suvichaar"),
        )
        .unwrap();
        let index = b.build();

        let encoded = encode(&index, StageSchema::RenderInput);
        assert_eq!(
            Value::Object(encoded.clone()),
            json!({
                "s1paragraph1": "T",
                "s1audio1": "a1",
                "s1image1": "img",
                "s1paragraph2": "- Suvichaar"
            })
        );

        let decoded = decode_map(&encoded, StageSchema::RenderInput);
        let slide = decoded.get(1).unwrap();
        assert_eq!(slide.text, "T");
        assert_eq!(slide.audio_ref.as_deref(), Some("a1"));
        assert_eq!(slide.image_ref.as_deref(), Some("img"));
        assert_eq!(slide.caption.as_deref(), Some("- Suvichaar"));
    }

    #[test]
    fn numeric_values_are_read_as_text() {
        let raw = json!({ "s1paragraph1": 42 });
        assert_eq!(decode(&raw, StageSchema::Script).get(1).unwrap().text, "42");
    }
}
