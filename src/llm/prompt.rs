//! Prompt builder for story scripting.
//!
//! [`PromptBuilder`] produces one [`ChatPrompt`] per generation step:
//! classification, hookline, storytitle, slide outline, intro narration,
//! per-slide narration, transliteration and SEO metadata.
//!
//! The content language is selected at construction time; English and
//! Hindi have dedicated instructions.

use std::fmt;
use std::str::FromStr;

use super::generator::ChatPrompt;

/// Characters of article text forwarded to the model.
const ARTICLE_EXCERPT_CHARS: usize = 3000;

/// Maximum narration length requested per slide.
const NARRATION_MAX_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Content language of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }

    /// ISO-639-1 code, written into story metadata.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Hindi => "hi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" | "en-us" => Ok(Language::English),
            "hindi" | "hi" => Ok(Language::Hindi),
            other => Err(format!("unsupported language `{other}` (expected English or Hindi)")),
        }
    }
}

// ---------------------------------------------------------------------------
// System instructions
// ---------------------------------------------------------------------------

const CLASSIFY_SYSTEM: &str = "Classify the news into category, subcategory, and emotion.";
const HOOKLINE_SYSTEM: &str = "You create viral hooklines for news stories.";
const STORYTITLE_SYSTEM: &str = "You generate clear and catchy news headlines.";
const OUTLINE_SYSTEM: &str = "You are a digital content editor.";
const INTRO_SYSTEM: &str = "You are a news presenter generating opening lines.";
const NARRATION_SYSTEM: &str = "You write concise narrations for web story slides.";
const TRANSLITERATE_SYSTEM: &str = "You are a Hindi transliteration expert.";
const METADATA_SYSTEM: &str = "You write SEO metadata for web stories.";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the chat prompts used while scripting a story.
///
/// # Example
/// ```rust
/// use web_story::llm::{Language, PromptBuilder};
///
/// let builder = PromptBuilder::new(Language::English);
/// let prompt = builder.hookline("Rains flood the city", "Heavy rain ...");
/// assert!(prompt.user.contains("Rains flood the city"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    language: Language,
}

impl PromptBuilder {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Category / subcategory / emotion as a JSON object.
    pub fn classify(&self, article_text: &str) -> ChatPrompt {
        let excerpt = excerpt(article_text);
        let user = match self.language {
            Language::Hindi => format!(
                "आप एक समाचार विश्लेषण विशेषज्ञ हैं।\n\n\
                 इस समाचार लेख का विश्लेषण करें और नीचे तीन बातें बताएं:\n\n\
                 1. category (श्रेणी)\n2. subcategory (उपश्रेणी)\n3. emotion (भावना)\n\n\
                 लेख:\n\"\"\"{excerpt}\"\"\"\n\n\
                 जवाब केवल JSON में दें:\n\
                 {{\n  \"category\": \"...\",\n  \"subcategory\": \"...\",\n  \"emotion\": \"...\"\n}}"
            ),
            Language::English => format!(
                "You are an expert news analyst.\n\n\
                 Analyze the following news article and return:\n\n\
                 1. category\n2. subcategory\n3. emotion\n\n\
                 Article:\n\"\"\"{excerpt}\"\"\"\n\n\
                 Return ONLY as JSON:\n\
                 {{\n  \"category\": \"...\",\n  \"subcategory\": \"...\",\n  \"emotion\": \"...\"\n}}"
            ),
        };
        ChatPrompt::new(CLASSIFY_SYSTEM, user).with_max_tokens(150)
    }

    /// One attention-grabbing sentence under 120 characters.
    pub fn hookline(&self, title: &str, summary: &str) -> ChatPrompt {
        let user = match self.language {
            Language::Hindi => format!(
                "आप 'पोलारिस' नामक एक सोशल मीडिया रणनीतिकार हैं और चैनल 'सुविचार' के लिए कार्य करते हैं। \
                 आपका कार्य है एक संक्षिप्त, ध्यान खींचने वाली हुकलाइन बनाना जो इस समाचार की ओर दर्शकों का ध्यान आकर्षित करे।\n\n\
                 शीर्षक: {title}\nसारांश: {summary}\n\nभाषा: हिंदी\n\n\
                 अनुरोध:\n\
                 - केवल एक वाक्य हो\n\
                 - हैशटैग, इमोजी या अधिक विराम चिह्न न हो\n\
                 - भाषा सरल और भावनात्मक रूप से आकर्षक हो\n\
                 - 120 वर्णों से कम होनी चाहिए\n\
                 - उद्धरण (\"\") शामिल न करें\n\n\
                 अब कृपया पोलारिस की आवाज़ में हुकलाइन दीजिए:"
            ),
            Language::English => format!(
                "You are Polaris, a social media strategist for the news channel 'Suvichaar'. \
                 Your job is to create a short, attention-grabbing hookline for a news story.\n\n\
                 Title: {title}\nSummary: {summary}\n\nLanguage: English\n\n\
                 Requirements:\n\
                 - One sentence only\n\
                 - Avoid hashtags, emojis, and excessive punctuation\n\
                 - Use simple and emotionally engaging language\n\
                 - Must be under 120 characters\n\
                 - Do not include quotes in output\n\n\
                 Now generate the hookline in Polaris' tone:"
            ),
        };
        ChatPrompt::new(HOOKLINE_SYSTEM, user)
    }

    /// Localised headline.  English stories keep the article title, so
    /// there is no prompt for them.
    pub fn storytitle(&self, title: &str, summary: &str) -> Option<ChatPrompt> {
        match self.language {
            Language::English => None,
            Language::Hindi => Some(ChatPrompt::new(
                STORYTITLE_SYSTEM,
                format!(
                    "आप एक समाचार शीर्षक विशेषज्ञ हैं। नीचे दी गई अंग्रेज़ी समाचार शीर्षक और सारांश को पढ़कर, \
                     उसी का अर्थ बनाए रखते हुए एक नया आकर्षक हिंदी शीर्षक बनाइए।\n\n\
                     अंग्रेज़ी शीर्षक: {title}\nसारांश: {summary}\n\n\
                     अनुरोध:\n\
                     - केवल एक पंक्ति\n\
                     - भाषा सरल और स्पष्ट हो\n\
                     - भावनात्मक रूप से आकर्षक हो\n\
                     - उद्धरण (\"\") शामिल न करें\n\n\
                     अब कृपया हिंदी शीर्षक दीजिए:"
                ),
            )),
        }
    }

    /// Slide outline: `{"slides": [{"title": …, "prompt": …}, …]}`.
    pub fn outline(
        &self,
        category: &str,
        subcategory: &str,
        emotion: &str,
        article_text: &str,
        slide_count: usize,
    ) -> ChatPrompt {
        let lang = self.language.name();
        let hindi_rules = if self.language == Language::Hindi {
            "- The title must be written in Hindi (Devanagari script).\n\
             - The narration prompt must also be in Hindi (Devanagari script).\n"
        } else {
            ""
        };

        let system = format!(
            "{OUTLINE_SYSTEM}\n\n\
             Create a structured {slide_count}-slide web story from the article below.\n\n\
             Language: {lang}\n\n\
             Each slide must contain:\n\
             - A short title in {lang}\n\
             - A narration prompt (instruction only, don't write narration)\n\
             {hindi_rules}\n\
             Format:\n\
             {{\n  \"slides\": [\n    {{ \"title\": \"...\", \"prompt\": \"...\" }},\n    ...\n  ]\n}}"
        );
        let user = format!(
            "Category: {category}\nSubcategory: {subcategory}\nEmotion: {emotion}\n\n\
             Article:\n\"\"\"{}\"\"\"",
            excerpt(article_text)
        );
        ChatPrompt::new(system, user)
    }

    /// Greeting plus headline for the opening narration.
    pub fn intro(&self, headline: &str) -> ChatPrompt {
        let user = match self.language {
            Language::Hindi => format!(
                "Generate a greeting and news headline narration in Hindi for the story: {headline}"
            ),
            Language::English => format!(
                "Generate a greeting and headline intro narration in English for: {headline}"
            ),
        };
        ChatPrompt::new(INTRO_SYSTEM, user)
    }

    /// Narration for one outlined slide, in the voice of `character_sketch`.
    pub fn narration(&self, instruction: &str, character_sketch: &str) -> ChatPrompt {
        let script_language = match self.language {
            Language::Hindi => "Hindi (use Devanagari script)",
            Language::English => "English",
        };
        ChatPrompt::new(
            NARRATION_SYSTEM,
            format!(
                "Write a narration in {script_language} (max {NARRATION_MAX_CHARS} characters),\n\
                 in the voice of Polaris.\n\n\
                 Instruction: {instruction}\n\
                 Tone: Warm, clear, informative. No self-intro.\n\n\
                 Character sketch:\n{character_sketch}"
            ),
        )
    }

    /// Default narrator description for [`PromptBuilder::narration`].
    pub fn default_character_sketch(&self) -> String {
        format!(
            "Polaris is a sincere and articulate {} news anchor. \
             They present facts clearly, concisely, and warmly, connecting deeply with their audience.",
            self.language.name()
        )
    }

    /// Latin-script Hindi to Devanagari.
    pub fn transliterate(&self, text: &str) -> ChatPrompt {
        ChatPrompt::new(
            TRANSLITERATE_SYSTEM,
            format!(
                "Transliterate this Hindi sentence (written in Latin script) into Hindi Devanagari script. \
                 Return only the transliterated text:\n\n{text}"
            ),
        )
    }

    /// SEO description, keywords and filter tags with fixed labels.
    pub fn metadata(&self, story_title: &str) -> ChatPrompt {
        ChatPrompt::new(
            METADATA_SYSTEM,
            format!(
                "Generate metadata for a web story titled '{story_title}'. \
                 Please provide the response in this exact format:\n\n\
                 Description: [Write a short SEO-friendly meta description here]\n\
                 Keywords: [Write comma-separated meta keywords here]\n\
                 Filter Tags: [Write comma-separated filter tags here]\n\n\
                 Make sure to use the exact labels \"Description:\", \"Keywords:\", and \"Filter Tags:\" in your response."
            ),
        )
        .with_max_tokens(300)
    }
}

/// First [`ARTICLE_EXCERPT_CHARS`] characters of `text`.
fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(ARTICLE_EXCERPT_CHARS) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_names_and_codes() {
        assert_eq!("Hindi".parse::<Language>(), Ok(Language::Hindi));
        assert_eq!("en".parse::<Language>(), Ok(Language::English));
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn classify_prompt_asks_for_json_and_caps_tokens() {
        let prompt = PromptBuilder::new(Language::English).classify("Some article");
        assert!(prompt.user.contains("Return ONLY as JSON"));
        assert!(prompt.user.contains("Some article"));
        assert_eq!(prompt.max_tokens, Some(150));
    }

    #[test]
    fn hindi_classify_prompt_is_localised() {
        let prompt = PromptBuilder::new(Language::Hindi).classify("लेख");
        assert!(prompt.user.contains("श्रेणी"));
    }

    #[test]
    fn article_excerpt_is_char_bounded() {
        let long = "अ".repeat(ARTICLE_EXCERPT_CHARS + 50);
        let prompt = PromptBuilder::new(Language::Hindi).classify(&long);
        let count = prompt.user.matches('अ').count();
        assert_eq!(count, ARTICLE_EXCERPT_CHARS);
    }

    #[test]
    fn english_storytitle_needs_no_prompt() {
        let builder = PromptBuilder::new(Language::English);
        assert!(builder.storytitle("T", "S").is_none());
        assert!(PromptBuilder::new(Language::Hindi)
            .storytitle("T", "S")
            .is_some());
    }

    #[test]
    fn outline_mentions_slide_count_and_format() {
        let prompt = PromptBuilder::new(Language::English).outline("News", "Weather", "Calm", "text", 4);
        assert!(prompt.system.contains("4-slide"));
        assert!(prompt.system.contains("\"slides\""));
        assert!(prompt.user.contains("Subcategory: Weather"));
        assert!(!prompt.system.contains("Devanagari"));

        let hindi = PromptBuilder::new(Language::Hindi).outline("a", "b", "c", "d", 5);
        assert!(hindi.system.contains("Devanagari"));
    }

    #[test]
    fn narration_embeds_instruction_and_sketch() {
        let builder = PromptBuilder::new(Language::English);
        let sketch = builder.default_character_sketch();
        let prompt = builder.narration("Explain the flood", &sketch);
        assert!(prompt.user.contains("Instruction: Explain the flood"));
        assert!(prompt.user.contains("English news anchor"));
        assert!(prompt.user.contains("max 200 characters"));
    }

    #[test]
    fn metadata_prompt_uses_fixed_labels() {
        let prompt = PromptBuilder::new(Language::English).metadata("Monsoon");
        assert!(prompt.user.contains("'Monsoon'"));
        assert!(prompt.user.contains("Filter Tags:"));
        assert_eq!(prompt.max_tokens, Some(300));
    }
}
