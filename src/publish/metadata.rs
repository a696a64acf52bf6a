//! Story metadata document uploaded next to the HTML.

use serde::{Deserialize, Serialize};

use super::slug::StoryUrls;
use crate::config::PublishConfig;
use crate::llm::{Language, SeoMetadata};

/// Key names are consumed by the publishing backend as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryMetadata {
    pub story_title: String,
    pub categories: u32,
    #[serde(rename = "filterTags")]
    pub filter_tags: Vec<String>,
    pub story_uid: String,
    pub story_link: String,
    pub storyhtmlurl: String,
    pub urlslug: String,
    pub cover_image_link: String,
    pub publisher_id: u32,
    pub story_logo_link: String,
    pub keywords: String,
    pub metadescription: String,
    pub lang: String,
}

impl StoryMetadata {
    pub fn new(
        story_title: &str,
        category_id: u32,
        seo: &SeoMetadata,
        urls: &StoryUrls,
        cover_image_link: &str,
        language: Language,
        config: &PublishConfig,
    ) -> Self {
        Self {
            story_title: story_title.to_string(),
            categories: category_id,
            filter_tags: seo.tag_list(),
            story_uid: urls.nano.clone(),
            story_link: urls.canonical_url.clone(),
            storyhtmlurl: urls.html_url.clone(),
            urlslug: urls.slug_nano.clone(),
            cover_image_link: cover_image_link.to_string(),
            publisher_id: config.publisher_id,
            story_logo_link: config.story_logo.clone(),
            keywords: seo.keywords.clone(),
            metadescription: seo.description.clone(),
            lang: language.code().to_string(),
        }
    }
}

/// Numeric id of a category name (case-insensitive).
pub fn category_id(config: &PublishConfig, name: &str) -> Option<u32> {
    config
        .categories
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name.trim()))
        .map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_backend_key_names() {
        let config = PublishConfig::default();
        let urls = StoryUrls::with_nano("Eclipse", "0123456789_G".into(), &config).unwrap();
        let seo = SeoMetadata {
            description: "Sun hides.".into(),
            keywords: "eclipse, sun".into(),
            filter_tags: "Space, Sky ,".into(),
        };
        let meta = StoryMetadata::new(
            "Eclipse",
            category_id(&config, "science").unwrap_or(0),
            &seo,
            &urls,
            "https://media.suvichaar.org/media/c.png",
            Language::Hindi,
            &config,
        );

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["filterTags"], serde_json::json!(["Space", "Sky"]));
        assert_eq!(json["story_uid"], "0123456789_G");
        assert_eq!(json["urlslug"], "eclipse_0123456789_G");
        assert_eq!(json["storyhtmlurl"], "https://stories.suvichaar.org/eclipse_0123456789_G.html");
        assert_eq!(json["publisher_id"], 1);
        assert_eq!(json["lang"], "hi");
        assert_eq!(json["metadescription"], "Sun hides.");
        assert!(json.get("filter_tags").is_none());
    }

    #[test]
    fn category_lookup_ignores_case() {
        let config = PublishConfig::default();
        assert_eq!(category_id(&config, "art"), Some(1));
        assert_eq!(category_id(&config, " Food "), Some(11));
        assert_eq!(category_id(&config, "Gardening"), None);
    }
}
