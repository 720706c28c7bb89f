//! Structured content for the named pages and the site-wide settings
//!
//! Every document here has a complete `Default`. The content store only
//! supplies partial overrides, which are deep-merged over these defaults,
//! so a merged document always has every field its page needs.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::block::{
    AttorneyBioBlock, BulletsBlock, ContactFormBlock, ContentBlock, CtaBlock, CtaVariant,
    HeadingBlock, HeadingLevel, HeroBlock, MapBlock, ParagraphBlock, PracticeAreaItem,
    PracticeAreasGridBlock, Rating, ServiceItem, ServicesGridBlock, Stat, StatsBlock, Testimonial,
    TestimonialsBlock, TwoColumnBlock,
};
use super::page::Layout;
use super::RichText;

/// The fixed pages with structured defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedPage {
    Home,
    About,
    Contact,
    PracticeAreas,
}

impl NamedPage {
    pub const ALL: [NamedPage; 4] = [
        NamedPage::Home,
        NamedPage::About,
        NamedPage::Contact,
        NamedPage::PracticeAreas,
    ];

    /// Normalized URL path the page is served at
    pub fn url_path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::About => "/about/",
            Self::Contact => "/contact/",
            Self::PracticeAreas => "/practice-areas/",
        }
    }

    /// Look up a named page by normalized path
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.url_path() == path)
    }

    pub fn slot(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Contact => "contact",
            Self::PracticeAreas => "practice-areas",
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            Self::Home => Layout::Landing,
            Self::About | Self::Contact | Self::PracticeAreas => Layout::Standard,
        }
    }
}

/// Where the override document for a section lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionSource {
    /// The `content` column of the page row at this named page's path
    Page(NamedPage),
    /// The `content` column of the site settings row
    Settings,
}

impl SectionSource {
    pub fn slot(self) -> &'static str {
        match self {
            Self::Page(page) => page.slot(),
            Self::Settings => "settings",
        }
    }
}

/// A document that a named loader merges over its defaults
pub trait SectionContent:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    const SOURCE: SectionSource;
}

/// A section document that renders as a whole page
pub trait NamedPageContent: SectionContent {
    const PAGE: NamedPage;

    fn meta(&self) -> &MetaSection;

    fn title(&self) -> &str;

    /// Project the document into blocks for the block renderer
    fn to_blocks(&self) -> Vec<ContentBlock>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaSection {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub og_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(rename = "showCTA", default)]
    pub show_cta: bool,
    pub cta_text: String,
    pub cta_phone: String,
}

impl HeroSection {
    fn to_block(&self) -> ContentBlock {
        ContentBlock::Hero(HeroBlock {
            title: self.title.clone(),
            subtitle: Some(self.subtitle.clone()).filter(|s| !s.is_empty()),
            background_image: self.background_image.clone(),
            show_cta: self.show_cta,
            cta_text: Some(self.cta_text.clone()),
            cta_phone: Some(self.cta_phone.clone()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsSection {
    pub heading: String,
    pub points: Vec<String>,
}

impl PointsSection {
    fn to_blocks(&self) -> [ContentBlock; 2] {
        [
            heading(HeadingLevel::H2, &self.heading),
            ContentBlock::Bullets(BulletsBlock {
                items: self.points.clone(),
            }),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtaSection {
    pub text: String,
    pub phone: String,
}

impl CtaSection {
    fn to_block(&self, variant: CtaVariant) -> ContentBlock {
        ContentBlock::Cta(CtaBlock {
            text: self.text.clone(),
            phone: self.phone.clone(),
            variant,
        })
    }
}

fn heading(level: HeadingLevel, text: &str) -> ContentBlock {
    ContentBlock::Heading(HeadingBlock {
        level,
        text: text.to_string(),
    })
}

fn paragraph(content: &RichText) -> ContentBlock {
    ContentBlock::Paragraph(ParagraphBlock {
        content: content.clone(),
    })
}

fn meta(title: &str, description: &str) -> MetaSection {
    MetaSection {
        title: title.to_string(),
        description: description.to_string(),
        og_image: None,
    }
}

const DEFAULT_PHONE: &str = "(555) 014-2290";

// Home

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicesSection {
    pub heading: String,
    pub items: Vec<ServiceItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestimonialsSection {
    pub heading: String,
    pub items: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeContent {
    pub meta: MetaSection,
    pub hero: HeroSection,
    pub stats: Vec<Stat>,
    pub services: ServicesSection,
    pub why_choose_us: PointsSection,
    pub testimonials: TestimonialsSection,
    pub cta: CtaSection,
}

impl Default for HomeContent {
    fn default() -> Self {
        Self {
            meta: meta(
                "Harbor Legal Clinic | Injury & Family Law Attorneys",
                "Trusted attorneys for personal injury, family law and immigration. Free consultations.",
            ),
            hero: HeroSection {
                title: "Experienced Attorneys On Your Side".to_string(),
                subtitle: "Personal injury, family law and immigration help, with a free first consultation."
                    .to_string(),
                background_image: Some("/assets/images/hero-home.jpg".to_string()),
                show_cta: true,
                cta_text: "Call for a Free Consultation".to_string(),
                cta_phone: DEFAULT_PHONE.to_string(),
            },
            stats: vec![
                stat("25+", "Years of Experience"),
                stat("3,000+", "Clients Served"),
                stat("$40M+", "Recovered for Clients"),
                stat("24/7", "Availability"),
            ],
            services: ServicesSection {
                heading: "How We Can Help".to_string(),
                items: vec![
                    service(
                        "Personal Injury",
                        "Car accidents, slip and fall, and workplace injuries.",
                        "/practice-areas/personal-injury/",
                    ),
                    service(
                        "Family Law",
                        "Divorce, custody and support matters handled with care.",
                        "/practice-areas/family-law/",
                    ),
                    service(
                        "Immigration",
                        "Visas, green cards and citizenship applications.",
                        "/practice-areas/immigration/",
                    ),
                ],
            },
            why_choose_us: PointsSection {
                heading: "Why Choose Us".to_string(),
                points: vec![
                    "No fee unless we win your injury case".to_string(),
                    "Se habla español".to_string(),
                    "Direct access to your attorney".to_string(),
                ],
            },
            testimonials: TestimonialsSection {
                heading: "What Our Clients Say".to_string(),
                items: vec![
                    testimonial("M.R.", "They answered every question and fought for a fair settlement."),
                    testimonial("J.T.", "Professional, patient and honest from the first call."),
                    testimonial("A.L.", "My custody case was handled quickly and with compassion."),
                ],
            },
            cta: CtaSection {
                text: "Talk to an attorney today".to_string(),
                phone: DEFAULT_PHONE.to_string(),
            },
        }
    }
}

impl SectionContent for HomeContent {
    const SOURCE: SectionSource = SectionSource::Page(NamedPage::Home);
}

impl NamedPageContent for HomeContent {
    const PAGE: NamedPage = NamedPage::Home;

    fn meta(&self) -> &MetaSection {
        &self.meta
    }

    fn title(&self) -> &str {
        &self.hero.title
    }

    fn to_blocks(&self) -> Vec<ContentBlock> {
        let mut blocks = vec![
            self.hero.to_block(),
            ContentBlock::Stats(StatsBlock {
                stats: self.stats.clone(),
            }),
            ContentBlock::ServicesGrid(ServicesGridBlock {
                heading: Some(self.services.heading.clone()),
                services: self.services.items.clone(),
            }),
        ];
        blocks.extend(self.why_choose_us.to_blocks());
        blocks.push(ContentBlock::Testimonials(TestimonialsBlock {
            heading: Some(self.testimonials.heading.clone()),
            testimonials: self.testimonials.items.clone(),
        }));
        blocks.push(self.cta.to_block(CtaVariant::Solid));
        blocks
    }
}

fn stat(value: &str, label: &str) -> Stat {
    Stat {
        value: value.to_string(),
        label: label.to_string(),
    }
}

fn service(title: &str, description: &str, link: &str) -> ServiceItem {
    ServiceItem {
        title: title.to_string(),
        description: description.to_string(),
        icon: None,
        link: Some(link.to_string()),
    }
}

fn testimonial(initials: &str, text: &str) -> Testimonial {
    Testimonial {
        initials: initials.to_string(),
        rating: Rating::new(5),
        text: text.to_string(),
        author: None,
    }
}

// About

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySection {
    pub heading: String,
    pub paragraphs: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttorneyProfile {
    pub name: String,
    pub title: String,
    pub image: String,
    pub bio: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutContent {
    pub meta: MetaSection,
    pub hero: HeroSection,
    pub story: StorySection,
    pub attorney: AttorneyProfile,
    pub values: PointsSection,
    pub cta: CtaSection,
}

impl Default for AboutContent {
    fn default() -> Self {
        Self {
            meta: meta(
                "About Us | Harbor Legal Clinic",
                "Meet the attorneys of Harbor Legal Clinic and learn how we work for our clients.",
            ),
            hero: HeroSection {
                title: "About Our Firm".to_string(),
                subtitle: "A community law practice built on trust.".to_string(),
                background_image: None,
                show_cta: false,
                cta_text: "Call Us".to_string(),
                cta_phone: DEFAULT_PHONE.to_string(),
            },
            story: StorySection {
                heading: "Our Story".to_string(),
                paragraphs: vec![
                    RichText::trusted(
                        "<p>Harbor Legal Clinic was founded to give working families access to \
                         experienced, bilingual legal counsel.</p>",
                    ),
                    RichText::trusted(
                        "<p>Today we represent clients across the region in injury, family \
                         and immigration matters.</p>",
                    ),
                ],
            },
            attorney: AttorneyProfile {
                name: "Elena Marquez".to_string(),
                title: "Founding Attorney".to_string(),
                image: "/assets/images/attorney.jpg".to_string(),
                bio: "Elena has practiced law for over 25 years and is admitted to the state and federal bars."
                    .to_string(),
                phone: DEFAULT_PHONE.to_string(),
            },
            values: PointsSection {
                heading: "Our Values".to_string(),
                points: vec![
                    "Honest advice, even when it is hard to hear".to_string(),
                    "Clear communication at every step".to_string(),
                    "Relentless preparation".to_string(),
                ],
            },
            cta: CtaSection {
                text: "Schedule your free consultation".to_string(),
                phone: DEFAULT_PHONE.to_string(),
            },
        }
    }
}

impl SectionContent for AboutContent {
    const SOURCE: SectionSource = SectionSource::Page(NamedPage::About);
}

impl NamedPageContent for AboutContent {
    const PAGE: NamedPage = NamedPage::About;

    fn meta(&self) -> &MetaSection {
        &self.meta
    }

    fn title(&self) -> &str {
        &self.hero.title
    }

    fn to_blocks(&self) -> Vec<ContentBlock> {
        let mut blocks = vec![heading(HeadingLevel::H2, &self.story.heading)];
        blocks.extend(self.story.paragraphs.iter().map(paragraph));
        blocks.push(ContentBlock::AttorneyBio(AttorneyBioBlock {
            name: self.attorney.name.clone(),
            title: self.attorney.title.clone(),
            image: self.attorney.image.clone(),
            bio: self.attorney.bio.clone(),
            phone: self.attorney.phone.clone(),
        }));
        blocks.extend(self.values.to_blocks());
        blocks.push(self.cta.to_block(CtaVariant::Primary));
        blocks
    }
}

// Contact

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub heading: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub hours: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    pub heading: String,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSection {
    pub address: String,
    #[serde(default)]
    pub embed_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactContent {
    pub meta: MetaSection,
    pub hero: HeroSection,
    pub info: ContactInfo,
    pub form: FormSection,
    pub map: MapSection,
}

const DEFAULT_ADDRESS: &str = "200 Harbor Street, Suite 4, Port City, CA 90000";

impl Default for ContactContent {
    fn default() -> Self {
        Self {
            meta: meta(
                "Contact Us | Harbor Legal Clinic",
                "Call, email or visit Harbor Legal Clinic to schedule a free consultation.",
            ),
            hero: HeroSection {
                title: "Contact Us".to_string(),
                subtitle: "We respond to every inquiry within one business day.".to_string(),
                background_image: None,
                show_cta: false,
                cta_text: "Call Us".to_string(),
                cta_phone: DEFAULT_PHONE.to_string(),
            },
            info: ContactInfo {
                heading: "Get in Touch".to_string(),
                phone: DEFAULT_PHONE.to_string(),
                email: "info@harborlegal.example".to_string(),
                address: DEFAULT_ADDRESS.to_string(),
                hours: vec![
                    "Monday to Friday: 8am to 6pm".to_string(),
                    "Saturday: by appointment".to_string(),
                ],
            },
            form: FormSection {
                heading: "Request a Free Consultation".to_string(),
                services: vec![
                    "Personal Injury".to_string(),
                    "Family Law".to_string(),
                    "Immigration".to_string(),
                    "Other".to_string(),
                ],
            },
            map: MapSection {
                address: DEFAULT_ADDRESS.to_string(),
                embed_url: None,
            },
        }
    }
}

impl SectionContent for ContactContent {
    const SOURCE: SectionSource = SectionSource::Page(NamedPage::Contact);
}

impl NamedPageContent for ContactContent {
    const PAGE: NamedPage = NamedPage::Contact;

    fn meta(&self) -> &MetaSection {
        &self.meta
    }

    fn title(&self) -> &str {
        &self.hero.title
    }

    fn to_blocks(&self) -> Vec<ContentBlock> {
        let details = RichText::trusted(format!(
            "<p>{}<br>{}<br>{}</p>",
            crate::helpers::html_escape(&self.info.phone),
            crate::helpers::html_escape(&self.info.email),
            crate::helpers::html_escape(&self.info.address),
        ));
        vec![
            ContentBlock::TwoColumn(TwoColumnBlock {
                left: vec![
                    heading(HeadingLevel::H2, &self.info.heading),
                    paragraph(&details),
                    ContentBlock::Bullets(BulletsBlock {
                        items: self.info.hours.clone(),
                    }),
                ],
                right: vec![ContentBlock::ContactForm(ContactFormBlock {
                    heading: self.form.heading.clone(),
                    services: self.form.services.clone(),
                })],
            }),
            ContentBlock::Map(MapBlock {
                address: self.map.address.clone(),
                embed_url: self.map.embed_url.clone(),
            }),
        ]
    }
}

// Practice areas

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeAreasContent {
    pub meta: MetaSection,
    pub hero: HeroSection,
    pub intro: RichText,
    pub areas: Vec<PracticeAreaItem>,
    pub cta: CtaSection,
}

impl Default for PracticeAreasContent {
    fn default() -> Self {
        Self {
            meta: meta(
                "Practice Areas | Harbor Legal Clinic",
                "Personal injury, family law and immigration representation.",
            ),
            hero: HeroSection {
                title: "Practice Areas".to_string(),
                subtitle: "Focused experience where it matters most.".to_string(),
                background_image: None,
                show_cta: false,
                cta_text: "Call Us".to_string(),
                cta_phone: DEFAULT_PHONE.to_string(),
            },
            intro: RichText::trusted(
                "<p>Our attorneys concentrate on a small number of practice areas so that \
                 every client benefits from deep experience.</p>",
            ),
            areas: vec![
                area("Personal Injury", "/practice-areas/personal-injury/"),
                area("Car Accidents", "/practice-areas/car-accidents/"),
                area("Family Law", "/practice-areas/family-law/"),
                area("Immigration", "/practice-areas/immigration/"),
            ],
            cta: CtaSection {
                text: "Not sure where your case fits? Call us.".to_string(),
                phone: DEFAULT_PHONE.to_string(),
            },
        }
    }
}

impl SectionContent for PracticeAreasContent {
    const SOURCE: SectionSource = SectionSource::Page(NamedPage::PracticeAreas);
}

impl NamedPageContent for PracticeAreasContent {
    const PAGE: NamedPage = NamedPage::PracticeAreas;

    fn meta(&self) -> &MetaSection {
        &self.meta
    }

    fn title(&self) -> &str {
        &self.hero.title
    }

    fn to_blocks(&self) -> Vec<ContentBlock> {
        vec![
            paragraph(&self.intro),
            ContentBlock::PracticeAreasGrid(PracticeAreasGridBlock {
                areas: self.areas.clone(),
            }),
            self.cta.to_block(CtaVariant::Outline),
        ]
    }
}

fn area(title: &str, link: &str) -> PracticeAreaItem {
    PracticeAreaItem {
        title: title.to_string(),
        icon: None,
        description: None,
        image: None,
        link: Some(link.to_string()),
    }
}

// Site settings

/// Firm-wide details shown in the header and footer of every page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub firm_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub tagline: RichText,
    pub hours: Vec<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            firm_name: "Harbor Legal Clinic".to_string(),
            phone: DEFAULT_PHONE.to_string(),
            email: "info@harborlegal.example".to_string(),
            address: DEFAULT_ADDRESS.to_string(),
            tagline: RichText::trusted("Attorneys for <strong>working families</strong>"),
            hours: vec!["Monday to Friday: 8am to 6pm".to_string()],
        }
    }
}

impl SectionContent for SiteSettings {
    const SOURCE: SectionSource = SectionSource::Settings;
}
