//! AMP `<amp-story-page>` fragment for one body slide.
//!
//! The page auto-advances when its background audio ends.  Element ids are
//! derived from the slide position so every page in a story is unique.

/// Inputs of one rendered page; `text` must already be shortened and
/// escaped.
#[derive(Debug, Clone, Copy)]
pub struct PageFragment<'a> {
    pub position: u32,
    pub text: &'a str,
    pub audio_url: &'a str,
    pub image_url: &'a str,
}

impl PageFragment<'_> {
    /// `id` attribute of the `<amp-story-page>`.
    pub fn page_id(&self) -> String {
        format!("slide-{}", self.position)
    }

    /// Render the page markup.
    pub fn render(&self) -> String {
        let page_id = self.page_id();
        let audio_id = format!("{page_id}-background-audio");
        let fade_id = format!("{page_id}-anim-fade");
        let slide_id = format!("{page_id}-anim-slide");
        let audio_url = escape_attr(self.audio_url);
        let image_url = escape_attr(self.image_url);
        let text = self.text;

        format!(
            r##"
<amp-story-page id="{page_id}" auto-advance-after="{audio_id}">
  <amp-story-animation layout="nodisplay" trigger="visibility">
    <script type="application/json">[{{"selector":"#{fade_id}","keyframes":{{"opacity":[0,1]}},"delay":0,"duration":600,"easing":"cubic-bezier(0.2, 0.6, 0.0, 1)","fill":"both"}}]</script>
  </amp-story-animation>
  <amp-story-animation layout="nodisplay" trigger="visibility">
    <script type="application/json">[{{"selector":"#{slide_id}","keyframes":{{"transform":["translate3d(-115%, 0px, 0)","translate3d(0px, 0px, 0)"]}},"delay":0,"duration":600,"easing":"cubic-bezier(0.2, 0.6, 0.0, 1)","fill":"both"}}]</script>
  </amp-story-animation>
  <amp-story-grid-layer template="fill">
    <amp-video autoplay="autoplay" layout="fixed" width="1" height="1" poster="" id="{audio_id}" cache="google">
      <source type="audio/mpeg" src="{audio_url}">
    </amp-video>
  </amp-story-grid-layer>
  <amp-story-grid-layer template="vertical" aspect-ratio="412:618" class="grid-layer">
    <div class="page-fullbleed-area"><div class="page-safe-area">
      <amp-img layout="fill" src="{image_url}" alt="slide background"></amp-img>
      <div id="{fade_id}" class="animation-wrapper">
        <div id="{slide_id}" class="animation-wrapper">
          <h3 class="fill text-wrapper"><span>{text}</span></h3>
        </div>
      </div>
    </div></div>
  </amp-story-grid-layer>
</amp-story-page>
"##
        )
    }
}

/// Attribute values only need quotes and ampersands neutralised.
pub(crate) fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(position: u32) -> PageFragment<'static> {
        PageFragment {
            position,
            text: "Rain &amp; wind",
            audio_url: "https://cdn.example/media/tts_a.mp3",
            image_url: "https://media.example/slide.png",
        }
    }

    #[test]
    fn page_contains_text_audio_and_image() {
        let html = fragment(2).render();
        assert!(html.contains(r#"<amp-story-page id="slide-2" auto-advance-after="slide-2-background-audio">"#));
        assert!(html.contains(r#"src="https://cdn.example/media/tts_a.mp3""#));
        assert!(html.contains(r#"src="https://media.example/slide.png""#));
        assert!(html.contains("<span>Rain &amp; wind</span>"));
    }

    #[test]
    fn ids_differ_between_positions() {
        let a = fragment(2).render();
        let b = fragment(3).render();
        assert!(a.contains("slide-2-anim-fade"));
        assert!(!b.contains("slide-2-"));
        assert!(b.contains("slide-3-anim-slide"));
    }

    #[test]
    fn animation_json_braces_are_literal() {
        let html = fragment(4).render();
        assert!(html.contains(r##"[{"selector":"#slide-4-anim-fade","keyframes":{"opacity":[0,1]}"##));
    }

    #[test]
    fn audio_url_quotes_are_escaped() {
        let page = PageFragment {
            audio_url: "https://x/\"a\".mp3",
            ..fragment(2)
        };
        assert!(page.render().contains("https://x/&quot;a&quot;.mp3"));
    }
}
