//! Content block schema
//!
//! A page body is an ordered list of blocks. Each block is tagged by the
//! JSON `type` field and has exactly one shape per tag. Decoding is lenient
//! at the block level: a block with an unrecognised tag, or a known tag
//! whose fields do not decode, becomes [`ContentBlock::Unknown`] instead of
//! failing the whole page.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::RichText;

/// Every tag the renderer knows how to draw
pub const BLOCK_TAGS: [&str; 15] = [
    "hero",
    "heading",
    "paragraph",
    "bullets",
    "cta",
    "image",
    "map",
    "two-column",
    "services-grid",
    "testimonials",
    "contact-form",
    "practice-areas-grid",
    "google-reviews",
    "attorney-bio",
    "stats",
];

/// One tagged unit of page content
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentBlock {
    Hero(HeroBlock),
    Heading(HeadingBlock),
    Paragraph(ParagraphBlock),
    Bullets(BulletsBlock),
    Cta(CtaBlock),
    Image(ImageBlock),
    Map(MapBlock),
    TwoColumn(TwoColumnBlock),
    ServicesGrid(ServicesGridBlock),
    Testimonials(TestimonialsBlock),
    ContactForm(ContactFormBlock),
    PracticeAreasGrid(PracticeAreasGridBlock),
    GoogleReviews(GoogleReviewsBlock),
    AttorneyBio(AttorneyBioBlock),
    Stats(StatsBlock),
    /// Never produced by serde directly, see [`ContentBlock::from_value`]
    #[serde(skip)]
    Unknown(UnknownBlock),
}

impl ContentBlock {
    /// Decode a single block, degrading to `Unknown` instead of failing
    pub fn from_value(value: Value) -> Self {
        let tag = match value.get("type").and_then(Value::as_str) {
            Some(tag) => tag.to_string(),
            None => {
                return Self::Unknown(UnknownBlock {
                    tag: String::new(),
                    error: Some("block has no type tag".to_string()),
                })
            }
        };

        if !BLOCK_TAGS.contains(&tag.as_str()) {
            tracing::debug!("Unknown block type: {}", tag);
            return Self::Unknown(UnknownBlock { tag, error: None });
        }

        match serde_json::from_value::<ContentBlock>(value) {
            Ok(block) => block,
            Err(e) => {
                tracing::warn!("Malformed {} block: {}", tag, e);
                Self::Unknown(UnknownBlock {
                    tag,
                    error: Some(e.to_string()),
                })
            }
        }
    }

    /// The wire tag of this block
    pub fn tag(&self) -> &str {
        match self {
            Self::Hero(_) => "hero",
            Self::Heading(_) => "heading",
            Self::Paragraph(_) => "paragraph",
            Self::Bullets(_) => "bullets",
            Self::Cta(_) => "cta",
            Self::Image(_) => "image",
            Self::Map(_) => "map",
            Self::TwoColumn(_) => "two-column",
            Self::ServicesGrid(_) => "services-grid",
            Self::Testimonials(_) => "testimonials",
            Self::ContactForm(_) => "contact-form",
            Self::PracticeAreasGrid(_) => "practice-areas-grid",
            Self::GoogleReviews(_) => "google-reviews",
            Self::AttorneyBio(_) => "attorney-bio",
            Self::Stats(_) => "stats",
            Self::Unknown(unknown) => &unknown.tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

/// Decode a JSON value into a block list if it is an array
pub fn parse_blocks(value: &Value) -> Option<Vec<ContentBlock>> {
    value
        .as_array()
        .map(|items| items.iter().cloned().map(ContentBlock::from_value).collect())
}

/// Lenient deserializer for nested block lists
pub fn deserialize_blocks<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.into_iter().map(ContentBlock::from_value).collect())
}

/// Accepts `"500+"` as well as `500`
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroBlock {
    pub title: String,
    pub subtitle: Option<String>,
    pub background_image: Option<String>,
    #[serde(rename = "showCTA", default)]
    pub show_cta: bool,
    pub cta_text: Option<String>,
    pub cta_phone: Option<String>,
}

/// Heading level, clamped into 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "f64")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl From<f64> for HeadingLevel {
    fn from(level: f64) -> Self {
        if level < 1.5 {
            Self::H1
        } else if level < 2.5 {
            Self::H2
        } else {
            Self::H3
        }
    }
}

impl HeadingLevel {
    pub fn tag_name(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeadingBlock {
    pub level: HeadingLevel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParagraphBlock {
    pub content: RichText,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BulletsBlock {
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaVariant {
    #[default]
    Primary,
    Outline,
    Solid,
}

impl CtaVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Outline => "outline",
            Self::Solid => "solid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CtaBlock {
    pub text: String,
    pub phone: String,
    #[serde(default)]
    pub variant: CtaVariant,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageBlock {
    pub src: String,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBlock {
    pub address: String,
    pub embed_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwoColumnBlock {
    #[serde(deserialize_with = "deserialize_blocks")]
    pub left: Vec<ContentBlock>,
    #[serde(deserialize_with = "deserialize_blocks")]
    pub right: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServicesGridBlock {
    pub heading: Option<String>,
    pub services: Vec<ServiceItem>,
}

/// Star rating, clamped into 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "f64")]
pub struct Rating(u8);

impl Rating {
    pub fn new(stars: u8) -> Self {
        Self(stars.clamp(1, 5))
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

impl From<f64> for Rating {
    fn from(value: f64) -> Self {
        Self(value.round().clamp(1.0, 5.0) as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub initials: String,
    pub rating: Rating,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestimonialsBlock {
    pub heading: Option<String>,
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactFormBlock {
    pub heading: String,
    #[serde(default)]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeAreaItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PracticeAreasGridBlock {
    pub areas: Vec<PracticeAreaItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: Rating,
    pub text: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoogleReviewsBlock {
    pub heading: Option<String>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttorneyBioBlock {
    pub name: String,
    pub title: String,
    pub image: String,
    pub bio: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatsBlock {
    pub stats: Vec<Stat>,
}

/// A block the renderer cannot draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBlock {
    /// Tag as written by the author, empty when the block had none
    pub tag: String,
    /// Decode error when the tag was known but the fields were not
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_hero() {
        let block = ContentBlock::from_value(json!({
            "type": "hero",
            "title": "Injured? We Can Help",
            "backgroundImage": "/img/hero.jpg",
            "showCTA": true,
            "ctaText": "Call Now",
            "ctaPhone": "(555) 010-2000"
        }));
        match block {
            ContentBlock::Hero(hero) => {
                assert_eq!(hero.title, "Injured? We Can Help");
                assert!(hero.show_cta);
                assert_eq!(hero.background_image.as_deref(), Some("/img/hero.jpg"));
                assert_eq!(hero.cta_phone.as_deref(), Some("(555) 010-2000"));
                assert!(hero.subtitle.is_none());
            }
            other => panic!("expected hero, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_is_kept() {
        let block = ContentBlock::from_value(json!({"type": "marquee", "text": "hi"}));
        assert_eq!(
            block,
            ContentBlock::Unknown(UnknownBlock {
                tag: "marquee".to_string(),
                error: None
            })
        );
        assert!(!block.is_known());
        assert_eq!(block.tag(), "marquee");
    }

    #[test]
    fn test_malformed_known_block() {
        let block = ContentBlock::from_value(json!({"type": "cta", "text": "Call"}));
        match block {
            ContentBlock::Unknown(unknown) => {
                assert_eq!(unknown.tag, "cta");
                assert!(unknown.error.unwrap().contains("phone"));
            }
            other => panic!("expected unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_tag() {
        let block = ContentBlock::from_value(json!({"text": "orphan"}));
        assert!(!block.is_known());
        assert_eq!(block.tag(), "");
    }

    #[test]
    fn test_two_column_nests_leniently() {
        let block = ContentBlock::from_value(json!({
            "type": "two-column",
            "left": [{"type": "heading", "level": 2, "text": "Left"}],
            "right": [
                {"type": "marquee"},
                {"type": "bullets", "items": ["a", "b"]}
            ]
        }));
        let ContentBlock::TwoColumn(columns) = block else {
            panic!("expected two-column");
        };
        assert_eq!(columns.left.len(), 1);
        assert_eq!(columns.right.len(), 2);
        assert!(!columns.right[0].is_known());
        assert_eq!(columns.right[1].tag(), "bullets");
    }

    #[test]
    fn test_clamping() {
        let heading = ContentBlock::from_value(json!({"type": "heading", "level": 7, "text": "x"}));
        let ContentBlock::Heading(heading) = heading else {
            panic!("expected heading");
        };
        assert_eq!(heading.level, HeadingLevel::H3);

        let testimonials = ContentBlock::from_value(json!({
            "type": "testimonials",
            "testimonials": [{"initials": "JD", "rating": 9, "text": "Great"}]
        }));
        let ContentBlock::Testimonials(block) = testimonials else {
            panic!("expected testimonials");
        };
        assert_eq!(block.testimonials[0].rating.stars(), 5);
        assert_eq!(Rating::new(0).stars(), 1);
    }

    #[test]
    fn test_stats_accept_numbers() {
        let block = ContentBlock::from_value(json!({
            "type": "stats",
            "stats": [{"value": 500, "label": "Cases"}, {"value": "25+", "label": "Years"}]
        }));
        let ContentBlock::Stats(stats) = block else {
            panic!("expected stats");
        };
        assert_eq!(stats.stats[0].value, "500");
        assert_eq!(stats.stats[1].value, "25+");
    }

    #[test]
    fn test_cta_variant_default() {
        let block =
            ContentBlock::from_value(json!({"type": "cta", "text": "Call", "phone": "555"}));
        let ContentBlock::Cta(cta) = block else {
            panic!("expected cta");
        };
        assert_eq!(cta.variant, CtaVariant::Primary);
    }

    #[test]
    fn test_every_tag_has_a_variant() {
        for tag in BLOCK_TAGS {
            let block = ContentBlock::from_value(json!({ "type": tag }));
            // Missing fields make it malformed, but never unrecognised.
            if let ContentBlock::Unknown(unknown) = &block {
                assert!(unknown.error.is_some(), "tag {} was not recognised", tag);
            }
        }
    }

    #[test]
    fn test_parse_blocks_requires_array() {
        assert!(parse_blocks(&json!({"type": "hero"})).is_none());
        assert_eq!(parse_blocks(&json!([])).map(|b| b.len()), Some(0));
    }
}
