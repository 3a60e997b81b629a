//! HTML rendering of [`PageViewModel`]s.
//!
//! Handlers only depend on the [`Renderer`] trait; [`HtmlRenderer`] is the
//! built-in implementation producing a complete HTML5 document.

use anyhow::Result;
use std::fmt::Write;

use crate::i18n::{self, t, Label, StaticPage};
use crate::locale::Locale;
use crate::models::{genre_path, year_path, MediaDetail, MediaItem, MediaType};
use crate::tmdb::image_url;
use crate::utils::{escape_html, extract_year};
use crate::view::{Listing, PageBody, PageViewModel, Pagination, SectionBlock};

pub const SCRIPT_PATH: &str = "/assets/app.js";

pub trait Renderer: Send + Sync {
    fn render(&self, view: &PageViewModel) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    site_name: String,
}

impl HtmlRenderer {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
        }
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, view: &PageViewModel) -> Result<String> {
        let mut out = String::with_capacity(16 * 1024);
        self.head(&mut out, view)?;
        self.header(&mut out, view)?;
        out.push_str("<main class=\"container\">\n");
        match &view.body {
            PageBody::Home { sections } => self.home(&mut out, view.locale, sections)?,
            PageBody::Detail(detail) => self.detail(&mut out, view.locale, detail)?,
            PageBody::Listing(listing) => self.listing(&mut out, view.locale, listing)?,
            PageBody::Static(page) => self.static_page(&mut out, view.locale, *page)?,
            PageBody::NotFound => not_found(&mut out, view.locale)?,
        }
        out.push_str("</main>\n");
        self.footer(&mut out, view.locale)?;
        Ok(out)
    }
}

impl HtmlRenderer {
    fn head(&self, out: &mut String, view: &PageViewModel) -> Result<()> {
        let title = escape_html(&view.title);
        let description = escape_html(&view.description);
        let canonical = escape_html(&view.canonical);
        let og_type = match &view.body {
            PageBody::Detail(d) if d.item.media_type == MediaType::Movie => "video.movie",
            PageBody::Detail(_) => "video.tv_show",
            _ => "website",
        };

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"{}\">", view.locale.code())?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(
            out,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
        )?;
        writeln!(out, "<title>{title}</title>")?;
        writeln!(out, "<meta name=\"description\" content=\"{description}\">")?;
        writeln!(out, "<meta name=\"robots\" content=\"{}\">", view.robots)?;
        writeln!(out, "<link rel=\"canonical\" href=\"{canonical}\">")?;
        for locale in Locale::ALL {
            writeln!(
                out,
                "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}\">",
                locale.code(),
                escape_html(&with_lang(&view.canonical, locale))
            )?;
        }
        writeln!(
            out,
            "<link rel=\"alternate\" hreflang=\"x-default\" href=\"{canonical}\">"
        )?;
        writeln!(out, "<meta property=\"og:type\" content=\"{og_type}\">")?;
        writeln!(out, "<meta property=\"og:title\" content=\"{title}\">")?;
        writeln!(
            out,
            "<meta property=\"og:description\" content=\"{description}\">"
        )?;
        writeln!(out, "<meta property=\"og:url\" content=\"{canonical}\">")?;
        writeln!(
            out,
            "<meta property=\"og:site_name\" content=\"{}\">",
            escape_html(&self.site_name)
        )?;
        writeln!(
            out,
            "<meta property=\"og:locale\" content=\"{}\">",
            view.locale.og_locale()
        )?;
        if let Some(image) = &view.image {
            writeln!(
                out,
                "<meta property=\"og:image\" content=\"{}\">",
                escape_html(image)
            )?;
            writeln!(
                out,
                "<meta name=\"twitter:card\" content=\"summary_large_image\">"
            )?;
        } else {
            writeln!(out, "<meta name=\"twitter:card\" content=\"summary\">")?;
        }
        if let Some(data) = &view.structured_data {
            let json = serde_json::to_string(data)?.replace("</", "<\\/");
            writeln!(out, "<script type=\"application/ld+json\">{json}</script>")?;
        }
        writeln!(out, "<link rel=\"preconnect\" href=\"https://image.tmdb.org\">")?;
        writeln!(out, "<style>{}</style>", STYLES)?;
        writeln!(out, "</head>")?;
        Ok(())
    }

    fn header(&self, out: &mut String, view: &PageViewModel) -> Result<()> {
        let locale = view.locale;
        let query = match &view.body {
            PageBody::Listing(Listing { query: Some(q), .. }) => escape_html(q),
            _ => String::new(),
        };
        writeln!(out, "<body>")?;
        writeln!(out, "<header class=\"site-header\"><div class=\"container bar\">")?;
        writeln!(
            out,
            "<a class=\"brand\" href=\"/\">{}</a>",
            escape_html(&self.site_name)
        )?;
        writeln!(
            out,
            "<form class=\"search\" action=\"/search\" method=\"get\" role=\"search\">\
             <input type=\"search\" name=\"q\" value=\"{query}\" placeholder=\"{}\" aria-label=\"{}\" required>\
             <button type=\"submit\">{}</button></form>",
            t(locale, Label::SearchPlaceholder),
            t(locale, Label::SearchButton),
            t(locale, Label::SearchButton)
        )?;
        writeln!(
            out,
            "<label class=\"lang\"><span>{}</span><select data-locale-switch>",
            t(locale, Label::Language)
        )?;
        for option in Locale::ALL {
            let selected = if option == locale { " selected" } else { "" };
            writeln!(
                out,
                "<option value=\"{}\"{selected}>{}</option>",
                option.code(),
                option.native_name()
            )?;
        }
        writeln!(out, "</select></label>")?;
        writeln!(out, "</div></header>")?;
        Ok(())
    }

    fn footer(&self, out: &mut String, locale: Locale) -> Result<()> {
        writeln!(out, "<footer class=\"site-footer\"><div class=\"container\">")?;
        writeln!(out, "<nav class=\"trust\">")?;
        for page in StaticPage::ALL {
            writeln!(out, "<a href=\"{}\">{}</a>", page.path(), page.title(locale))?;
        }
        writeln!(out, "</nav>")?;
        writeln!(
            out,
            "<p class=\"muted\">{} &middot; {}. Data by TMDB.</p>",
            escape_html(&self.site_name),
            t(locale, Label::Tagline)
        )?;
        writeln!(out, "</div></footer>")?;
        writeln!(
            out,
            "<button class=\"to-top\" type=\"button\" data-scroll-top hidden aria-label=\"{0}\">&uarr;</button>",
            t(locale, Label::BackToTop)
        )?;
        writeln!(out, "<script src=\"{SCRIPT_PATH}\" defer></script>")?;
        writeln!(out, "</body>\n</html>")?;
        Ok(())
    }

    fn home(&self, out: &mut String, locale: Locale, sections: &[SectionBlock]) -> Result<()> {
        writeln!(
            out,
            "<section class=\"hero\"><h1>{}</h1><p>{}</p></section>",
            t(locale, Label::HomeTitle),
            t(locale, Label::HomeDescription)
        )?;
        for block in sections {
            let id = block.section.as_str();
            writeln!(out, "<section class=\"section\" id=\"{id}\">")?;
            writeln!(
                out,
                "<h2>{}</h2>",
                i18n::section_heading(locale, block.section)
            )?;
            writeln!(out, "<div class=\"grid\" data-grid=\"{id}\">")?;
            if block.items.is_empty() {
                writeln!(out, "<p class=\"muted\">{}</p>", t(locale, Label::NoResults))?;
            }
            for item in &block.items {
                card(out, item)?;
            }
            writeln!(out, "</div>")?;
            let hidden = if block.page >= block.total_pages {
                " hidden disabled"
            } else {
                ""
            };
            writeln!(
                out,
                "<button class=\"load-more\" type=\"button\" data-load-more data-section=\"{id}\" \
                 data-page=\"{}\" data-total-pages=\"{}\" data-lang=\"{}\"{hidden}>{}</button>",
                block.page,
                block.total_pages,
                locale.code(),
                t(locale, Label::LoadMore)
            )?;
            writeln!(out, "</section>")?;
        }
        Ok(())
    }

    fn detail(&self, out: &mut String, locale: Locale, detail: &MediaDetail) -> Result<()> {
        let item = &detail.item;
        let title = escape_html(&item.title);
        let media = item.media_type;

        writeln!(out, "<article class=\"detail\">")?;
        writeln!(
            out,
            "<nav class=\"breadcrumb\"><a href=\"/\">{}</a> &rsaquo; <span>{}</span> &rsaquo; <span>{title}</span></nav>",
            t(locale, Label::Home),
            i18n::media_label(locale, media)
        )?;
        if let Some(backdrop) = &item.backdrop_path {
            writeln!(
                out,
                "<div class=\"backdrop\" style=\"background-image:url('{}')\"></div>",
                escape_html(&image_url(backdrop, "w1280"))
            )?;
        }
        writeln!(out, "<div class=\"detail-main\">")?;
        if let Some(poster) = &item.poster_path {
            writeln!(
                out,
                "<img class=\"poster\" src=\"{}\" alt=\"{title}\" width=\"342\" height=\"513\">",
                escape_html(&image_url(poster, "w342"))
            )?;
        }
        writeln!(out, "<div class=\"facts\">")?;
        match item.year() {
            Some(year) => writeln!(out, "<h1>{title} <span class=\"muted\">({year})</span></h1>")?,
            None => writeln!(out, "<h1>{title}</h1>")?,
        }
        if let Some(tagline) = &detail.tagline {
            writeln!(out, "<p class=\"tagline\">{}</p>", escape_html(tagline))?;
        }
        writeln!(out, "<dl>")?;
        if let Some(date) = &item.date {
            let shown = match extract_year(date).and_then(|y| y.parse::<i32>().ok()) {
                Some(year) => format!(
                    "<a href=\"{}\">{}</a>",
                    year_path(media, year),
                    escape_html(date)
                ),
                None => escape_html(date),
            };
            fact(out, t(locale, Label::Released), &shown)?;
        }
        if let Some(minutes) = detail.runtime_minutes {
            fact(
                out,
                t(locale, Label::Runtime),
                &format!("{minutes} {}", t(locale, Label::Minutes)),
            )?;
        }
        if let Some(seasons) = detail.seasons {
            fact(out, t(locale, Label::Seasons), &seasons.to_string())?;
        }
        if let Some(episodes) = detail.episodes {
            fact(out, t(locale, Label::Episodes), &episodes.to_string())?;
        }
        if let Some(score) = item.vote_average.filter(|_| detail.vote_count > 0) {
            fact(
                out,
                t(locale, Label::Rating),
                &format!("&#9733; {score:.1}/10 ({})", detail.vote_count),
            )?;
        }
        if let Some(status) = &detail.status {
            fact(out, t(locale, Label::Status), &escape_html(status))?;
        }
        if !detail.directors.is_empty() {
            let label = match media {
                MediaType::Movie => Label::Director,
                MediaType::Tv => Label::Creator,
            };
            fact(out, t(locale, label), &escape_html(&detail.directors.join(", ")))?;
        }
        if !detail.genres.is_empty() {
            let links: Vec<String> = detail
                .genres
                .iter()
                .map(|g| {
                    format!(
                        "<a class=\"chip\" href=\"{}\">{}</a>",
                        genre_path(media, g),
                        escape_html(&g.name)
                    )
                })
                .collect();
            fact(out, t(locale, Label::Genres), &links.join(" "))?;
        }
        writeln!(out, "</dl>")?;
        if let Some(overview) = &item.overview {
            writeln!(
                out,
                "<h2>{}</h2><p class=\"overview\">{}</p>",
                t(locale, Label::Overview),
                escape_html(overview)
            )?;
        }
        writeln!(out, "</div></div>")?;

        if let Some(key) = &detail.trailer {
            writeln!(
                out,
                "<section class=\"section\"><h2>{}</h2><div class=\"trailer\">\
                 <iframe src=\"https://www.youtube-nocookie.com/embed/{}\" title=\"{title}\" \
                 loading=\"lazy\" allowfullscreen></iframe></div></section>",
                t(locale, Label::Trailer),
                escape_html(key)
            )?;
        }

        if !detail.cast.is_empty() {
            writeln!(
                out,
                "<section class=\"section\"><h2>{}</h2><ul class=\"cast\">",
                t(locale, Label::Cast)
            )?;
            for member in &detail.cast {
                let name = escape_html(&member.name);
                write!(out, "<li>")?;
                if let Some(profile) = &member.profile_path {
                    write!(
                        out,
                        "<img class=\"lazy\" data-src=\"{}\" alt=\"{name}\" width=\"92\" height=\"138\">",
                        escape_html(&image_url(profile, "w185"))
                    )?;
                }
                write!(out, "<strong>{name}</strong>")?;
                if let Some(character) = &member.character {
                    write!(out, "<span class=\"muted\">{}</span>", escape_html(character))?;
                }
                writeln!(out, "</li>")?;
            }
            writeln!(out, "</ul></section>")?;
        }

        if !detail.recommendations.is_empty() {
            writeln!(
                out,
                "<section class=\"section\"><h2>{}</h2><div class=\"grid\">",
                t(locale, Label::Recommendations)
            )?;
            for rec in detail.recommendations.iter().take(12) {
                card(out, rec)?;
            }
            writeln!(out, "</div></section>")?;
        }
        writeln!(out, "</article>")?;
        Ok(())
    }

    fn listing(&self, out: &mut String, locale: Locale, listing: &Listing) -> Result<()> {
        writeln!(out, "<h1>{}</h1>", escape_html(&listing.heading))?;
        if listing.items.is_empty() {
            writeln!(out, "<p class=\"muted\">{}</p>", t(locale, Label::NoResults))?;
            return Ok(());
        }
        writeln!(out, "<div class=\"grid\">")?;
        for item in &listing.items {
            card(out, item)?;
        }
        writeln!(out, "</div>")?;
        pagination(out, locale, &listing.pagination)
    }

    fn static_page(&self, out: &mut String, locale: Locale, page: StaticPage) -> Result<()> {
        writeln!(out, "<article class=\"prose\">")?;
        writeln!(out, "<h1>{}</h1>", page.title(locale))?;
        for paragraph in page.paragraphs(locale) {
            let text = paragraph.replace("{site}", &self.site_name);
            writeln!(out, "<p>{}</p>", escape_html(&text))?;
        }
        writeln!(out, "</article>")?;
        Ok(())
    }
}

fn not_found(out: &mut String, locale: Locale) -> Result<()> {
    writeln!(
        out,
        "<section class=\"prose\"><h1>{}</h1><p>{}</p><p><a href=\"/\">{}</a></p></section>",
        t(locale, Label::NotFoundTitle),
        t(locale, Label::NotFoundBody),
        t(locale, Label::BackHome)
    )?;
    Ok(())
}

/// `value` must already be escaped.
fn fact(out: &mut String, label: &str, value: &str) -> Result<()> {
    writeln!(out, "<div><dt>{label}</dt><dd>{value}</dd></div>")?;
    Ok(())
}

fn card(out: &mut String, item: &MediaItem) -> Result<()> {
    let path = escape_html(&item.path());
    let title = escape_html(&item.title);
    write!(out, "<article class=\"card\"><a href=\"{path}\">")?;
    match &item.poster_path {
        Some(poster) => write!(
            out,
            "<img class=\"lazy\" data-src=\"{}\" alt=\"{title}\" width=\"185\" height=\"278\">",
            escape_html(&image_url(poster, "w342"))
        )?,
        None => write!(out, "<div class=\"no-poster\">{title}</div>")?,
    }
    write!(out, "</a><h3><a href=\"{path}\">{title}</a></h3><p class=\"meta\">")?;
    if let Some(score) = item.vote_average.filter(|s| *s > 0.0) {
        write!(out, "&#9733; {score:.1}")?;
    }
    if let Some(year) = item.year() {
        write!(out, " <span>{year}</span>")?;
    }
    writeln!(out, "</p></article>")?;
    Ok(())
}

fn pagination(out: &mut String, locale: Locale, pagination: &Pagination) -> Result<()> {
    if pagination.total_pages <= 1 && pagination.prev.is_none() {
        return Ok(());
    }
    writeln!(out, "<nav class=\"pagination\">")?;
    if let Some(prev) = &pagination.prev {
        writeln!(
            out,
            "<a rel=\"prev\" href=\"{}\">&larr; {}</a>",
            escape_html(prev),
            t(locale, Label::Previous)
        )?;
    }
    writeln!(
        out,
        "<span>{}</span>",
        i18n::page_of(locale, pagination.page, pagination.total_pages)
    )?;
    if let Some(next) = &pagination.next {
        writeln!(
            out,
            "<a rel=\"next\" href=\"{}\">{} &rarr;</a>",
            escape_html(next),
            t(locale, Label::Next)
        )?;
    }
    writeln!(out, "</nav>")?;
    Ok(())
}

fn with_lang(url: &str, locale: Locale) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}lang={}", locale.code())
}

const STYLES: &str = "\
*{box-sizing:border-box}body{margin:0;font-family:system-ui,sans-serif;background:#0f1115;color:#e8e8ea;line-height:1.5}\
a{color:#8ab4ff;text-decoration:none}a:hover{text-decoration:underline}\
.container{max-width:1200px;margin:0 auto;padding:0 16px}\
.site-header{background:#151821;position:sticky;top:0;z-index:10}\
.bar{display:flex;gap:16px;align-items:center;padding:12px 16px;flex-wrap:wrap}\
.brand{font-weight:700;font-size:1.3rem;color:#fff}\
.search{flex:1;display:flex;gap:8px}.search input{flex:1;padding:8px;border-radius:6px;border:0}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(150px,1fr));gap:16px}\
.card img,.no-poster{width:100%;height:auto;aspect-ratio:2/3;border-radius:8px;background:#222;object-fit:cover}\
.no-poster{display:flex;align-items:center;justify-content:center;padding:8px;text-align:center}\
.card h3{font-size:.95rem;margin:6px 0 0}.meta,.muted{color:#9aa0aa;font-size:.85rem}\
img.lazy{opacity:0;transition:opacity .3s}img.lazy.loaded{opacity:1}\
.load-more{display:block;margin:16px auto;padding:10px 24px;border-radius:20px;border:0;cursor:pointer}\
.detail-main{display:flex;gap:24px;flex-wrap:wrap;margin-top:24px}.poster{border-radius:8px;max-width:100%}\
.facts{flex:1;min-width:280px}dl div{display:flex;gap:8px}dt{font-weight:600}dd{margin:0}\
.backdrop{height:240px;background-size:cover;background-position:center;opacity:.35;border-radius:8px;margin-top:16px}\
.breadcrumb{margin-top:16px;font-size:.9rem;color:#9aa0aa}\
.chip{display:inline-block;padding:2px 10px;border-radius:12px;background:#232838;margin:2px}\
.trailer iframe{width:100%;aspect-ratio:16/9;border:0}\
.cast{list-style:none;padding:0;display:grid;grid-template-columns:repeat(auto-fill,minmax(140px,1fr));gap:12px}\
.cast li{display:flex;flex-direction:column}\
.pagination{display:flex;gap:16px;justify-content:center;margin:24px 0}\
.site-footer{margin-top:48px;padding:24px 0;background:#151821}.trust{display:flex;gap:16px;flex-wrap:wrap}\
.to-top{position:fixed;right:16px;bottom:16px;border-radius:50%;width:44px;height:44px;border:0;cursor:pointer}";
