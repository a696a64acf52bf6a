//! In-memory slide model: [`Slide`], [`Role`], [`SlideIndex`].
//!
//! A [`SlideIndex`] can only be produced by a [`SlideIndexBuilder`], which
//! assigns positions itself.  Gaps, duplicate positions, a second title or
//! hook slide, and a title that is not first are therefore unrepresentable
//! once an index exists; transforms read an index and build a fresh one.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Semantic kind of a slide.
///
/// At most one [`Role::Title`], one [`Role::Hook`] and one
/// [`Role::CallToAction`] may exist per [`SlideIndex`]; any number of
/// [`Role::Body`] slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Story title, narrated as the opening slide.
    Title,
    /// One-line hook that pulls the reader in.
    Hook,
    /// Regular narrated content slide.
    Body,
    /// Fixed closing slide appended for the video renderer.
    CallToAction,
}

impl Role {
    /// Whether at most one slide of this role may appear in an index.
    pub fn is_unique(self) -> bool {
        !matches!(self, Role::Body)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Title => "title",
            Role::Hook => "hook",
            Role::Body => "body",
            Role::CallToAction => "call-to-action",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Slide
// ---------------------------------------------------------------------------

/// One entry of a [`SlideIndex`].
///
/// `position` is assigned by the builder and is read-only afterwards; the
/// remaining fields are plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    position: u32,
    /// Semantic kind of the slide.
    pub role: Role,
    /// Narration / script text.
    pub text: String,
    /// URL of the synthesized narration for `text`, once available.
    pub audio_ref: Option<String>,
    /// Voice used to synthesize `audio_ref`; empty until narrated.
    pub voice: String,
    /// Slide-specific image; renderers fall back to a platform asset.
    pub image_ref: Option<String>,
    /// Attribution line shown under the text by the video renderer.
    pub caption: Option<String>,
}

impl Slide {
    /// Unpositioned slide with the given role and text.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            position: 0,
            role,
            text: text.into(),
            audio_ref: None,
            voice: String::new(),
            image_ref: None,
            caption: None,
        }
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::new(Role::Title, text)
    }

    pub fn hook(text: impl Into<String>) -> Self {
        Self::new(Role::Hook, text)
    }

    pub fn body(text: impl Into<String>) -> Self {
        Self::new(Role::Body, text)
    }

    /// Attach narration audio and the voice that produced it.
    pub fn with_audio(mut self, audio_ref: impl Into<String>, voice: impl Into<String>) -> Self {
        self.audio_ref = Some(audio_ref.into());
        self.voice = voice.into();
        self
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// 1-based position inside the owning index (`0` before insertion).
    pub fn position(&self) -> u32 {
        self.position
    }

    /// `true` when the slide carries a non-empty audio reference.
    pub fn is_narrated(&self) -> bool {
        self.audio_ref.as_deref().is_some_and(|url| !url.is_empty())
    }
}

// ---------------------------------------------------------------------------
// CallToAction
// ---------------------------------------------------------------------------

/// Constant closing slide appended to every render-input document.
///
/// Nothing here is derived from the story itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallToAction {
    pub text: String,
    pub caption: String,
    pub audio_ref: String,
    pub image_ref: String,
}

impl CallToAction {
    /// The CTA as an unpositioned [`Slide`].
    pub fn to_slide(&self) -> Slide {
        Slide::new(Role::CallToAction, self.text.clone())
            .with_audio(self.audio_ref.clone(), "")
            .with_image(self.image_ref.clone())
            .with_caption(self.caption.clone())
    }
}

impl Default for CallToAction {
    fn default() -> Self {
        Self {
            text: "Get Such\nInspirational\nContent".into(),
            caption: "Like | Subscribe | Share\nwww.suvichaar.org".into(),
            audio_ref: "https://cdn.suvichaar.org/media/tts_407078a4ff494fb5bed8c35050ffd1a7.mp3"
                .into(),
            image_ref: "https://media.suvichaar.org/upload/polaris/polariscover.png".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SlideIndexError
// ---------------------------------------------------------------------------

/// Violations rejected by [`SlideIndexBuilder::push`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlideIndexError {
    /// A second slide with a role that may appear only once.
    #[error("duplicate {role} slide (already at position {existing})")]
    DuplicateRole { role: Role, existing: u32 },
    /// A title after any other slide, or a hook after a body slide.
    #[error("{role} slide cannot sit at position {position}")]
    OutOfOrder { role: Role, position: u32 },
}

// ---------------------------------------------------------------------------
// SlideIndex
// ---------------------------------------------------------------------------

/// Ordered, contiguously numbered sequence of slides.
///
/// Positions run `start, start + 1, …` with no gaps.  The start is `1` for
/// most stages and `2` for the markup stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideIndex {
    start: u32,
    slides: Vec<Slide>,
}

impl SlideIndex {
    /// An index with no slides.
    pub fn empty(start: u32) -> Self {
        Self {
            start: start.max(1),
            slides: Vec::new(),
        }
    }

    /// Start building an index whose first slide sits at `start`.
    ///
    /// Positions are positive; a `start` of `0` is treated as `1`.
    pub fn builder(start: u32) -> SlideIndexBuilder {
        SlideIndexBuilder {
            start: start.max(1),
            slides: Vec::new(),
            hook_last: false,
        }
    }

    /// Position of the first slide (also for an empty index).
    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Slides in ascending position order.
    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides.iter()
    }

    /// Slide at `position`, if inside the run.
    pub fn get(&self, position: u32) -> Option<&Slide> {
        let offset = position.checked_sub(self.start)?;
        self.slides.get(offset as usize)
    }

    /// All positions, ascending.
    pub fn positions(&self) -> Vec<u32> {
        self.slides.iter().map(Slide::position).collect()
    }

    /// The single slide carrying a unique `role`, if present.
    pub fn find_role(&self, role: Role) -> Option<&Slide> {
        self.slides.iter().find(|s| s.role == role)
    }

    pub fn title(&self) -> Option<&Slide> {
        self.find_role(Role::Title)
    }

    pub fn hook(&self) -> Option<&Slide> {
        self.find_role(Role::Hook)
    }

    /// Body slides in position order.
    pub fn bodies(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter().filter(|s| s.role == Role::Body)
    }

    /// New index with the same positions and roles, content rewritten by `f`.
    ///
    /// `f` may change text, audio, voice, image and caption; position and role
    /// of every slide are kept.
    pub fn map_content<F>(&self, mut f: F) -> SlideIndex
    where
        F: FnMut(&Slide) -> Slide,
    {
        let slides = self
            .slides
            .iter()
            .map(|old| {
                let mut new = f(old);
                new.position = old.position;
                new.role = old.role;
                new
            })
            .collect();

        SlideIndex {
            start: self.start,
            slides,
        }
    }
}

impl<'a> IntoIterator for &'a SlideIndex {
    type Item = &'a Slide;
    type IntoIter = std::slice::Iter<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}

// ---------------------------------------------------------------------------
// SlideIndexBuilder
// ---------------------------------------------------------------------------

/// Appends slides at the next free position.
///
/// The title may only be the first slide and the hook may not follow a body
/// slide, unless [`SlideIndexBuilder::hook_last`] relaxes the hook rule.
#[derive(Debug)]
pub struct SlideIndexBuilder {
    start: u32,
    slides: Vec<Slide>,
    hook_last: bool,
}

impl SlideIndexBuilder {
    /// Allow the hook after body slides (video renderer layout).
    pub fn hook_last(mut self) -> Self {
        self.hook_last = true;
        self
    }

    /// Position the next pushed slide will receive.
    pub fn next_position(&self) -> u32 {
        self.start + self.slides.len() as u32
    }

    /// Append `slide`, rejecting a second title, hook or call-to-action and
    /// a title or hook out of place.
    pub fn push(&mut self, mut slide: Slide) -> Result<&mut Self, SlideIndexError> {
        self.check(slide.role)?;
        slide.position = self.next_position();
        self.slides.push(slide);
        Ok(self)
    }

    /// Append `slide`; a duplicate or misplaced unique role is demoted to
    /// [`Role::Body`].
    ///
    /// Used at decode boundaries where malformed input must shorten or
    /// degrade the result rather than fail.
    pub fn push_lenient(&mut self, mut slide: Slide) -> &mut Self {
        if let Err(e) = self.check(slide.role) {
            log::warn!("slide: {e}; demoted to body");
            slide.role = Role::Body;
        }
        slide.position = self.next_position();
        self.slides.push(slide);
        self
    }

    fn check(&self, role: Role) -> Result<(), SlideIndexError> {
        if role.is_unique() {
            if let Some(existing) = self.slides.iter().find(|s| s.role == role) {
                return Err(SlideIndexError::DuplicateRole {
                    role,
                    existing: existing.position,
                });
            }
        }

        let misplaced = match role {
            Role::Title => !self.slides.is_empty(),
            Role::Hook => !self.hook_last && self.slides.iter().any(|s| s.role == Role::Body),
            Role::Body | Role::CallToAction => false,
        };
        if misplaced {
            return Err(SlideIndexError::OutOfOrder {
                role,
                position: self.next_position(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn build(self) -> SlideIndex {
        SlideIndex {
            start: self.start,
            slides: self.slides,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SlideIndex {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::title("A")).unwrap();
        b.push(Slide::hook("B")).unwrap();
        b.push(Slide::body("C")).unwrap();
        b.push(Slide::body("D")).unwrap();
        b.build()
    }

    #[test]
    fn builder_assigns_contiguous_positions() {
        let index = sample();
        assert_eq!(index.positions(), vec![1, 2, 3, 4]);
        assert_eq!(index.get(3).unwrap().text, "C");
        assert!(index.get(0).is_none());
        assert!(index.get(5).is_none());
    }

    #[test]
    fn builder_honours_start() {
        let mut b = SlideIndex::builder(2);
        b.push(Slide::body("x")).unwrap();
        b.push(Slide::body("y")).unwrap();
        let index = b.build();
        assert_eq!(index.start(), 2);
        assert_eq!(index.positions(), vec![2, 3]);
        assert_eq!(index.get(2).unwrap().text, "x");
        assert!(index.get(1).is_none());
    }

    #[test]
    fn zero_start_is_clamped() {
        assert_eq!(SlideIndex::builder(0).next_position(), 1);
        assert_eq!(SlideIndex::empty(0).start(), 1);
    }

    #[test]
    fn duplicate_title_rejected() {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::title("first")).unwrap();
        let err = b.push(Slide::title("second")).unwrap_err();
        assert_eq!(
            err,
            SlideIndexError::DuplicateRole {
                role: Role::Title,
                existing: 1
            }
        );
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn lenient_push_demotes_duplicate_hook() {
        let mut b = SlideIndex::builder(1);
        b.push_lenient(Slide::hook("h1"));
        b.push_lenient(Slide::hook("h2"));
        let index = b.build();
        assert_eq!(index.get(1).unwrap().role, Role::Hook);
        assert_eq!(index.get(2).unwrap().role, Role::Body);
    }

    #[test]
    fn late_title_rejected() {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::body("body first")).unwrap();
        let err = b.push(Slide::title("late title")).unwrap_err();
        assert_eq!(
            err,
            SlideIndexError::OutOfOrder {
                role: Role::Title,
                position: 2
            }
        );

        let mut b = SlideIndex::builder(1);
        b.push(Slide::hook("h")).unwrap();
        assert!(b.push(Slide::title("t")).is_err());
    }

    #[test]
    fn hook_after_body_needs_hook_last() {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::title("t")).unwrap();
        b.push(Slide::body("x")).unwrap();
        assert!(matches!(
            b.push(Slide::hook("h")),
            Err(SlideIndexError::OutOfOrder { role: Role::Hook, position: 3 })
        ));

        let mut b = SlideIndex::builder(1).hook_last();
        b.push(Slide::title("t")).unwrap();
        b.push(Slide::body("x")).unwrap();
        b.push(Slide::hook("h")).unwrap();
        assert_eq!(b.build().get(3).unwrap().role, Role::Hook);
    }

    #[test]
    fn lenient_push_demotes_misplaced_title() {
        let mut b = SlideIndex::builder(1);
        b.push_lenient(Slide::body("body first"));
        b.push_lenient(Slide::title("late title"));
        let index = b.build();
        assert!(index.title().is_none());
        assert_eq!(index.get(2).unwrap().role, Role::Body);
        assert_eq!(index.get(2).unwrap().text, "late title");
    }

    #[test]
    fn role_lookups() {
        let index = sample();
        assert_eq!(index.title().unwrap().text, "A");
        assert_eq!(index.hook().unwrap().text, "B");
        let bodies: Vec<_> = index.bodies().map(|s| s.text.as_str()).collect();
        assert_eq!(bodies, vec!["C", "D"]);
    }

    #[test]
    fn map_content_keeps_positions_and_roles() {
        let index = sample();
        let mapped = index.map_content(|s| {
            let mut s = s.clone().with_audio(format!("u{}", s.position()), "nova");
            s.role = Role::Body;
            s
        });

        assert_eq!(mapped.positions(), index.positions());
        assert_eq!(mapped.get(1).unwrap().role, Role::Title);
        assert_eq!(mapped.get(4).unwrap().audio_ref.as_deref(), Some("u4"));
        // The source index is untouched.
        assert!(index.get(4).unwrap().audio_ref.is_none());
    }

    #[test]
    fn cta_slide_carries_constants() {
        let slide = CallToAction::default().to_slide();
        assert_eq!(slide.role, Role::CallToAction);
        assert!(slide.is_narrated());
        assert!(slide.image_ref.is_some());
        assert!(slide.caption.as_deref().unwrap().contains("Subscribe"));
    }
}
