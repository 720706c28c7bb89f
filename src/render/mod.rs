//! Block renderer
//!
//! Walks a block list and produces one markup section per block, in order.
//! Every string field is escaped except [`RichText`], which the CMS is
//! trusted to produce. Unknown blocks are dropped unless preview mode is on,
//! in which case they show a diagnostic in their place.

mod breadcrumb;
mod carousel;
mod contact_form;

use serde::Serialize;

use crate::content::block::{
    AttorneyBioBlock, BulletsBlock, ContactFormBlock, CtaBlock, GoogleReviewsBlock, HeadingBlock,
    HeroBlock, ImageBlock, MapBlock, PracticeAreasGridBlock, Rating, Review, ServicesGridBlock,
    StatsBlock, Testimonial, TestimonialsBlock, TwoColumnBlock,
};
use crate::content::{ContentBlock, RichText, UnknownBlock};
use crate::helpers::{encode_query_value, html_escape, image_tag, is_external, phone_link};
use crate::i18n::I18n;

pub use breadcrumb::{breadcrumbs, Crumb};
pub use carousel::{paginate, Autoplay, Carousel, AUTOPLAY_INTERVAL, SLIDE_SIZE};
pub use contact_form::ContactFormState;

/// Markup for one top-level block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub tag: String,
    pub html: String,
}

pub struct BlockRenderer<'a> {
    i18n: &'a I18n,
    preview: bool,
    contact: Option<&'a ContactFormState>,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(i18n: &'a I18n, preview: bool) -> Self {
        Self {
            i18n,
            preview,
            contact: None,
        }
    }

    /// Render contact forms with this state instead of an empty form
    pub fn with_contact_state(mut self, state: &'a ContactFormState) -> Self {
        self.contact = Some(state);
        self
    }

    /// Render a block list, one section per drawable block
    pub fn render(&self, blocks: &[ContentBlock]) -> Vec<RenderedSection> {
        blocks
            .iter()
            .filter_map(|block| {
                self.render_block(block).map(|html| RenderedSection {
                    tag: block.tag().to_string(),
                    html,
                })
            })
            .collect()
    }

    /// Render a block list into one string
    pub fn render_html(&self, blocks: &[ContentBlock]) -> String {
        self.render(blocks)
            .into_iter()
            .map(|section| section.html)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `None` when the block is skipped
    pub fn render_block(&self, block: &ContentBlock) -> Option<String> {
        let html = match block {
            ContentBlock::Hero(b) => self.hero(b),
            ContentBlock::Heading(b) => heading(b),
            ContentBlock::Paragraph(b) => paragraph(&b.content),
            ContentBlock::Bullets(b) => bullets(b),
            ContentBlock::Cta(b) => self.cta(b),
            ContentBlock::Image(b) => image(b),
            ContentBlock::Map(b) => self.map(b),
            ContentBlock::TwoColumn(b) => self.two_column(b),
            ContentBlock::ServicesGrid(b) => services_grid(b),
            ContentBlock::Testimonials(b) => self.testimonials(b),
            ContentBlock::ContactForm(b) => self.contact_form(b),
            ContentBlock::PracticeAreasGrid(b) => practice_areas_grid(b),
            ContentBlock::GoogleReviews(b) => self.google_reviews(b),
            ContentBlock::AttorneyBio(b) => self.attorney_bio(b),
            ContentBlock::Stats(b) => stats(b),
            ContentBlock::Unknown(b) => return self.unknown(b),
        };
        Some(html)
    }

    fn unknown(&self, block: &UnknownBlock) -> Option<String> {
        if !self.preview {
            tracing::debug!("Skipping unknown block {:?}", block.tag);
            return None;
        }

        let headline = if block.tag.is_empty() {
            self.i18n.get("preview.missing_tag")
        } else {
            self.i18n
                .format("preview.unknown_block", &[("tag", block.tag.as_str())])
        };
        let detail = block
            .error
            .as_deref()
            .map(|e| {
                format!(
                    r#"<p class="preview-detail">{}</p>"#,
                    html_escape(&self.i18n.format("preview.malformed", &[("error", e)]))
                )
            })
            .unwrap_or_default();

        Some(format!(
            r#"<div class="block block-unknown preview-diagnostic" role="note"><p>{}</p>{}</div>"#,
            html_escape(&headline),
            detail
        ))
    }

    fn call_button(&self, phone: &str, text: Option<&str>, class: &str) -> String {
        let label = match text.filter(|t| !t.is_empty()) {
            Some(text) => text.to_string(),
            None => self.i18n.format("cta.call", &[("phone", phone)]),
        };
        phone_link(phone, &label, class)
    }

    fn hero(&self, b: &HeroBlock) -> String {
        let style = b
            .background_image
            .as_deref()
            .map(|img| format!(r#" style="background-image: url('{}')""#, html_escape(img)))
            .unwrap_or_default();
        let subtitle = b
            .subtitle
            .as_deref()
            .map(|s| format!(r#"<p class="hero-subtitle">{}</p>"#, html_escape(s)))
            .unwrap_or_default();
        let cta = match (&b.cta_phone, b.show_cta) {
            (Some(phone), true) => {
                self.call_button(phone, b.cta_text.as_deref(), "btn btn-primary btn-lg")
            }
            _ => String::new(),
        };

        format!(
            r#"<section class="block block-hero"{}><div class="hero-overlay"><div class="container"><h1 class="hero-title">{}</h1>{}{}</div></div></section>"#,
            style,
            html_escape(&b.title),
            subtitle,
            cta
        )
    }

    fn cta(&self, b: &CtaBlock) -> String {
        let variant = b.variant.as_str();
        format!(
            r#"<section class="block block-cta cta-{}"><div class="container"><p class="cta-text">{}</p>{}</div></section>"#,
            variant,
            html_escape(&b.text),
            self.call_button(&b.phone, None, &format!("btn btn-{}", variant))
        )
    }

    fn map(&self, b: &MapBlock) -> String {
        let search = format!(
            "https://www.google.com/maps/search/?api=1&query={}",
            encode_query_value(&b.address)
        );
        let frame = b
            .embed_url
            .as_deref()
            .filter(|url| is_external(url))
            .map(|url| {
                format!(
                    r#"<iframe class="map-frame" src="{}" title="{}" loading="lazy" referrerpolicy="no-referrer-when-downgrade" allowfullscreen></iframe>"#,
                    html_escape(url),
                    html_escape(&self.i18n.format("map.title", &[("address", b.address.as_str())]))
                )
            })
            .unwrap_or_default();

        format!(
            r#"<section class="block block-map"><div class="container">{}<address>{}</address><a class="map-directions" href="{}" target="_blank" rel="noopener">{}</a></div></section>"#,
            frame,
            html_escape(&b.address),
            html_escape(&search),
            html_escape(&self.i18n.get("map.directions"))
        )
    }

    fn two_column(&self, b: &TwoColumnBlock) -> String {
        format!(
            r#"<section class="block block-two-column"><div class="container columns"><div class="column column-left">{}</div><div class="column column-right">{}</div></div></section>"#,
            self.render_html(&b.left),
            self.render_html(&b.right)
        )
    }

    fn slider<T>(
        &self,
        kind: &str,
        heading: Option<&str>,
        items: &[T],
        item: impl Fn(&T) -> String,
        footer: &str,
    ) -> String {
        let slides = paginate(items, SLIDE_SIZE);
        let carousel = Carousel::new(slides.len());

        let mut html = format!(
            r#"<section class="block block-{kind}"><div class="container">"#,
            kind = kind
        );
        if let Some(heading) = heading {
            html.push_str(&format!(
                r#"<h2 class="section-heading">{}</h2>"#,
                html_escape(heading)
            ));
        }
        html.push_str(&format!(
            r#"<div class="slider" data-slider data-interval="{}">"#,
            AUTOPLAY_INTERVAL.as_millis()
        ));

        for (i, slide) in slides.iter().enumerate() {
            let active = if i == carousel.index() { " is-active" } else { "" };
            html.push_str(&format!(
                r#"<div class="slide{}" data-slide="{}"{}>"#,
                active,
                i,
                if active.is_empty() { r#" hidden"# } else { "" }
            ));
            for entry in slide.iter() {
                html.push_str(&item(entry));
            }
            html.push_str("</div>");
        }

        if carousel.slide_count() > 1 {
            html.push_str(r#"<div class="slider-dots">"#);
            for i in 0..carousel.slide_count() {
                let n = (i + 1).to_string();
                html.push_str(&format!(
                    r#"<button type="button" class="slider-dot{}" data-goto="{}" aria-label="{}"></button>"#,
                    if i == carousel.index() { " is-active" } else { "" },
                    i,
                    html_escape(&self.i18n.format("slider.slide", &[("n", n.as_str())]))
                ));
            }
            html.push_str("</div>");
        }

        html.push_str("</div>");
        html.push_str(footer);
        html.push_str("</div></section>");
        html
    }

    fn stars(&self, rating: Rating) -> String {
        let n = rating.stars() as usize;
        let count = n.to_string();
        format!(
            r#"<span class="stars" role="img" aria-label="{}">{}{}</span>"#,
            html_escape(&self.i18n.format("reviews.rating", &[("stars", count.as_str())])),
            "★".repeat(n),
            "☆".repeat(5 - n)
        )
    }

    fn testimonials(&self, b: &TestimonialsBlock) -> String {
        let item = |t: &Testimonial| {
            let author = t
                .author
                .as_deref()
                .map(|a| format!(r#"<cite>{}</cite>"#, html_escape(a)))
                .unwrap_or_default();
            format!(
                r#"<figure class="testimonial"><span class="avatar">{}</span>{}<blockquote>{}</blockquote>{}</figure>"#,
                html_escape(&t.initials),
                self.stars(t.rating),
                html_escape(&t.text),
                author
            )
        };
        self.slider("testimonials", b.heading.as_deref(), &b.testimonials, item, "")
    }

    fn google_reviews(&self, b: &GoogleReviewsBlock) -> String {
        let source = format!(
            r#"<p class="review-source">{}</p>"#,
            html_escape(&self.i18n.get("reviews.source"))
        );
        let item = |r: &Review| {
            format!(
                r#"<figure class="review">{}<blockquote>{}</blockquote><cite>{}</cite></figure>"#,
                self.stars(r.rating),
                html_escape(&r.text),
                html_escape(&r.author)
            )
        };
        self.slider("google-reviews", b.heading.as_deref(), &b.reviews, item, &source)
    }

    fn contact_form(&self, b: &ContactFormBlock) -> String {
        let i18n = self.i18n;
        if let Some(state) = self.contact.filter(|s| s.is_submitted()) {
            return format!(
                r#"<section class="block block-contact-form"><div class="form-thanks" role="status"><h2>{}</h2><p>{}</p>{}</div></section>"#,
                html_escape(&i18n.get("contact.thanks_title")),
                html_escape(&i18n.get("contact.thanks")),
                if state.name.is_empty() {
                    String::new()
                } else {
                    format!(r#"<p class="form-name">{}</p>"#, html_escape(&state.name))
                }
            );
        }

        let empty = ContactFormState::default();
        let state = self.contact.unwrap_or(&empty);
        let input = |name: &str, kind: &str, value: &str, required: bool| {
            format!(
                r#"<label>{}<input type="{}" name="{}" value="{}"{}></label>"#,
                html_escape(&i18n.get(&format!("contact.{}", name))),
                kind,
                name,
                html_escape(value),
                if required { " required" } else { "" }
            )
        };

        let service_select = if b.services.is_empty() {
            String::new()
        } else {
            let options: String = b
                .services
                .iter()
                .map(|s| {
                    format!(
                        r#"<option value="{0}"{1}>{0}</option>"#,
                        html_escape(s),
                        if *s == state.service { " selected" } else { "" }
                    )
                })
                .collect();
            format!(
                r#"<label>{}<select name="service"><option value="">{}</option>{}</select></label>"#,
                html_escape(&i18n.get("contact.service")),
                html_escape(&i18n.get("contact.select_service")),
                options
            )
        };

        format!(
            r#"<section class="block block-contact-form"><form class="contact-form" method="post" action="/__contact"><h2>{}</h2>{}{}{}{}<label>{}<textarea name="message" rows="5">{}</textarea></label><button type="submit" class="btn btn-primary">{}</button></form></section>"#,
            html_escape(&b.heading),
            input("name", "text", &state.name, true),
            input("email", "email", &state.email, true),
            input("phone", "tel", &state.phone, false),
            service_select,
            html_escape(&i18n.get("contact.message")),
            html_escape(&state.message),
            html_escape(&i18n.get("contact.submit"))
        )
    }

    fn attorney_bio(&self, b: &AttorneyBioBlock) -> String {
        let bio: String = b
            .bio
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| format!("<p>{}</p>", html_escape(p)))
            .collect();
        let call = self
            .i18n
            .format("attorney.call", &[("name", b.name.as_str())]);
        format!(
            r#"<section class="block block-attorney-bio"><div class="container bio"><div class="bio-photo">{}</div><div class="bio-text"><h2>{}</h2><p class="bio-title">{}</p>{}{}</div></div></section>"#,
            image_tag(&b.image, Some(b.name.as_str()), Some("bio-image")),
            html_escape(&b.name),
            html_escape(&b.title),
            bio,
            self.call_button(&b.phone, Some(call.as_str()), "btn btn-outline")
        )
    }
}

fn heading(b: &HeadingBlock) -> String {
    let tag = b.level.tag_name();
    format!(
        r#"<div class="block block-heading container"><{0}>{1}</{0}></div>"#,
        tag,
        html_escape(&b.text)
    )
}

fn paragraph(content: &RichText) -> String {
    format!(
        r#"<div class="block block-paragraph container-narrow prose">{}</div>"#,
        content.as_html()
    )
}

fn bullets(b: &BulletsBlock) -> String {
    let items: String = b
        .items
        .iter()
        .map(|item| format!("<li>{}</li>", html_escape(item)))
        .collect();
    format!(
        r#"<div class="block block-bullets container-narrow"><ul class="checklist">{}</ul></div>"#,
        items
    )
}

fn image(b: &ImageBlock) -> String {
    format!(
        r#"<figure class="block block-image container">{}</figure>"#,
        image_tag(&b.src, b.alt.as_deref(), None)
    )
}

fn icon(name: Option<&str>) -> String {
    name.filter(|n| !n.is_empty())
        .map(|n| {
            format!(
                r#"<span class="icon icon-{}" aria-hidden="true"></span>"#,
                html_escape(n)
            )
        })
        .unwrap_or_default()
}

/// Wrap `inner` in a link when one is given
fn linked(href: Option<&str>, class: &str, inner: String) -> String {
    match href.filter(|h| !h.is_empty()) {
        Some(href) => format!(
            r#"<a class="{}" href="{}">{}</a>"#,
            class,
            html_escape(href),
            inner
        ),
        None => format!(r#"<div class="{}">{}</div>"#, class, inner),
    }
}

fn section_heading(heading: Option<&str>) -> String {
    heading
        .map(|h| format!(r#"<h2 class="section-heading">{}</h2>"#, html_escape(h)))
        .unwrap_or_default()
}

fn services_grid(b: &ServicesGridBlock) -> String {
    let cards: String = b
        .services
        .iter()
        .map(|s| {
            linked(
                s.link.as_deref(),
                "card service-card",
                format!(
                    "{}<h3>{}</h3><p>{}</p>",
                    icon(s.icon.as_deref()),
                    html_escape(&s.title),
                    html_escape(&s.description)
                ),
            )
        })
        .collect();
    format!(
        r#"<section class="block block-services-grid"><div class="container">{}<div class="grid grid-3">{}</div></div></section>"#,
        section_heading(b.heading.as_deref()),
        cards
    )
}

fn practice_areas_grid(b: &PracticeAreasGridBlock) -> String {
    let cards: String = b
        .areas
        .iter()
        .map(|area| {
            let image = area
                .image
                .as_deref()
                .map(|src| image_tag(src, Some(area.title.as_str()), Some("card-image")))
                .unwrap_or_default();
            let description = area
                .description
                .as_deref()
                .map(|d| format!("<p>{}</p>", html_escape(d)))
                .unwrap_or_default();
            linked(
                area.link.as_deref(),
                "card practice-area-card",
                format!(
                    "{}{}<h3>{}</h3>{}",
                    image,
                    icon(area.icon.as_deref()),
                    html_escape(&area.title),
                    description
                ),
            )
        })
        .collect();
    format!(
        r#"<section class="block block-practice-areas-grid"><div class="container"><div class="grid grid-3">{}</div></div></section>"#,
        cards
    )
}

fn stats(b: &StatsBlock) -> String {
    let items: String = b
        .stats
        .iter()
        .map(|s| {
            format!(
                r#"<div class="stat"><span class="stat-value">{}</span><span class="stat-label">{}</span></div>"#,
                html_escape(&s.value),
                html_escape(&s.label)
            )
        })
        .collect();
    format!(
        r#"<section class="block block-stats"><div class="container stats-row">{}</div></section>"#,
        items
    )
}
