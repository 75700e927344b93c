//! Catalog client
//!
//! Finds detail-page links by catalog code and parses detail pages into
//! structured records. Detail pages carry their fields in a bounded info
//! panel as label/value pairs; every field except code and title is optional
//! at the parse level, and absence is represented explicitly rather than as
//! an empty string.
//!
//! One shared HTTP client is built at startup and lives for the whole run.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ScrapeError;

/// Role labels used by the catalog's actor markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Female,
    Male,
}

impl ActorRole {
    /// Human-readable label written to the metadata document.
    pub fn label(self) -> &'static str {
        match self {
            ActorRole::Female => "女演员",
            ActorRole::Male => "男演员",
        }
    }

    /// Classify a marker element's class attribute. `female` must be tested
    /// first: the female marker class contains `male` as a substring.
    fn from_marker(class: &str) -> Option<Self> {
        if class.contains("female") {
            Some(ActorRole::Female)
        } else if class.contains("male") {
            Some(ActorRole::Male)
        } else {
            None
        }
    }
}

/// One credited performer on a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub role: Option<ActorRole>,
    /// Billing order (carried in the model, not written to the document)
    #[allow(dead_code)]
    pub order: Option<u32>,
    /// Thumbnail URL (carried in the model, not written to the document)
    #[allow(dead_code)]
    pub thumb: Option<String>,
}

/// Structured metadata for one release. `code` and `title` are always
/// present; every other field may be absent on the source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    pub code: String,
    pub title: String,
    pub premiered: Option<NaiveDate>,
    pub runtime: Option<u32>,
    pub director: Option<String>,
    pub studio: Option<String>,
    pub series: Option<String>,
    /// Rating (carried in the model, not written to the document)
    #[allow(dead_code)]
    pub rating: Option<String>,
    pub genres: Vec<String>,
    pub actors: Vec<Actor>,
}

/// Catalog HTTP client, shared across the whole run.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    image_base_url: String,
}

impl CatalogClient {
    /// Build the shared HTTP client. The catalog fronts its pages behind TLS
    /// setups that fail strict verification, so certificates are not
    /// verified.
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Search the catalog for `code` and return the first result item's
    /// detail link. No result item is an explicit [ScrapeError::NotFound],
    /// never a dangling link handed to the detail parser.
    pub async fn find_detail_link(&self, code: &str) -> Result<String, ScrapeError> {
        let url = format!("{}/search?q={}", self.base_url, urlencoding::encode(code));
        debug!(code = %code, url = %url, "Searching catalog");

        let body = self.get_text(&url).await?;
        parse_search_result(&body).ok_or_else(|| ScrapeError::NotFound(code.to_string()))
    }

    /// Fetch a detail page and parse it into a [MovieRecord].
    pub async fn fetch_detail(&self, link: &str) -> Result<MovieRecord, ScrapeError> {
        let url = format!("{}{}", self.base_url, link);
        debug!(url = %url, "Fetching detail page");

        let body = self.get_text(&url).await?;
        let record = parse_detail_page(&body)?;
        info!(code = %record.code, title = %record.title, "Fetched release metadata");
        Ok(record)
    }

    pub(crate) async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    pub(crate) async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Pull the first result item's link out of a search results page.
fn parse_search_result(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let item_sel = Selector::parse("div.item > a").unwrap();
    doc.select(&item_sel)
        .find_map(|a| a.value().attr("href"))
        .map(str::to_string)
}

/// Parse a detail page. Code and title come from the page heading; the rest
/// is read from the info panel by label. A page without code and title is
/// unusable and fails with [ScrapeError::Parse].
fn parse_detail_page(html: &str) -> Result<MovieRecord, ScrapeError> {
    let doc = Html::parse_document(html);

    let heading_sel = Selector::parse("h2.title.is-4 strong").unwrap();
    let mut headings = doc.select(&heading_sel);
    let code = headings.next().map(element_text).filter(|s| !s.is_empty());
    let title = headings.next().map(element_text).filter(|s| !s.is_empty());
    let (Some(code), Some(title)) = (code, title) else {
        return Err(ScrapeError::Parse(
            "detail page is missing its code/title heading".to_string(),
        ));
    };

    let mut record = MovieRecord {
        code,
        title,
        premiered: None,
        runtime: None,
        director: None,
        studio: None,
        series: None,
        rating: None,
        genres: Vec::new(),
        actors: Vec::new(),
    };

    let block_sel = Selector::parse("nav.panel.movie-panel-info .panel-block").unwrap();
    let label_sel = Selector::parse("strong").unwrap();
    let value_sel = Selector::parse("span.value").unwrap();
    let link_sel = Selector::parse("a").unwrap();

    for block in doc.select(&block_sel) {
        let Some(label) = block.select(&label_sel).next() else {
            continue;
        };
        let label_text = element_text(label);
        let Some(value) = block.select(&value_sel).next() else {
            continue;
        };

        if label_text.contains("日期:") {
            record.premiered =
                NaiveDate::parse_from_str(element_text(value).as_str(), "%Y-%m-%d").ok();
        } else if label_text.contains("時長:") {
            record.runtime = parse_runtime(&element_text(value));
        } else if label_text.contains("導演:") {
            record.director = non_empty(element_text(value));
        } else if label_text.contains("片商:") {
            record.studio = non_empty(element_text(value));
        } else if label_text.contains("系列:") {
            record.series = non_empty(element_text(value));
        } else if label_text.contains("評分:") {
            record.rating = non_empty(element_text(value));
        } else if label_text.contains("類別:") {
            record.genres = value
                .select(&link_sel)
                .map(element_text)
                .filter(|s| !s.is_empty())
                .collect();
        } else if label_text.contains("演員:") {
            record.actors = parse_actors(value, &link_sel);
        }
    }

    Ok(record)
}

/// Extract the actor list from the 演員 panel value. Each actor link is
/// followed by a `strong` marker whose class identifies the role; actors
/// with an unrecognized marker are dropped.
fn parse_actors(value: ElementRef<'_>, link_sel: &Selector) -> Vec<Actor> {
    let mut actors = Vec::new();
    for a in value.select(link_sel) {
        let name = element_text(a);
        if name.is_empty() {
            continue;
        }
        let role = a
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "strong")
            .and_then(|el| el.value().attr("class"))
            .and_then(ActorRole::from_marker);
        if let Some(role) = role {
            actors.push(Actor {
                name,
                role: Some(role),
                order: None,
                thumb: None,
            });
        }
    }
    actors
}

/// Leading integer of a runtime value such as "120 分鍾".
fn parse_runtime(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    const SEARCH_PAGE: &str = r#"
        <html><body>
          <div class="movie-list">
            <div class="item">
              <a href="/v/8aW5z4" class="box" title="ABC-123 Some Title"></a>
            </div>
            <div class="item">
              <a href="/v/other" class="box"></a>
            </div>
          </div>
        </body></html>
    "#;

    const DETAIL_PAGE: &str = r#"
        <html><body>
          <h2 class="title is-4"><strong>ABC-123</strong> <strong>Some Title</strong></h2>
          <nav class="panel movie-panel-info">
            <div class="panel-block"><strong>日期:</strong> <span class="value">2023-05-15</span></div>
            <div class="panel-block"><strong>時長:</strong> <span class="value">120 分鍾</span></div>
            <div class="panel-block"><strong>導演:</strong> <span class="value"><a href="/directors/x">Some Director</a></span></div>
            <div class="panel-block"><strong>片商:</strong> <span class="value"><a href="/makers/y">Studio Y</a></span></div>
            <div class="panel-block"><strong>系列:</strong> <span class="value"><a href="/series/z">Series Z</a></span></div>
            <div class="panel-block"><strong>評分:</strong> <span class="value">4.5分, 由100人評價</span></div>
            <div class="panel-block"><strong>類別:</strong> <span class="value"><a href="/tags?c=1">GenreA</a>, <a href="/tags?c=2">GenreB</a></span></div>
            <div class="panel-block"><strong>演員:</strong> <span class="value"><a href="/actors/a1">Actress One</a><strong class="symbol female">&#9792;</strong> <a href="/actors/a2">Actor Two</a><strong class="symbol male">&#9794;</strong> <a href="/actors/a3">Mystery</a><strong class="symbol">?</strong></span></div>
          </nav>
        </body></html>
    "#;

    #[test]
    fn test_search_result_link() {
        assert_eq!(
            parse_search_result(SEARCH_PAGE).as_deref(),
            Some("/v/8aW5z4")
        );
    }

    #[test]
    fn test_search_without_results() {
        assert_eq!(
            parse_search_result("<html><body><p>no hits</p></body></html>"),
            None
        );
    }

    #[test]
    fn test_detail_page_full() {
        let record = parse_detail_page(DETAIL_PAGE).unwrap();
        assert_eq!(record.code, "ABC-123");
        assert_eq!(record.title, "Some Title");
        assert_eq!(
            record.premiered,
            NaiveDate::from_ymd_opt(2023, 5, 15)
        );
        assert_eq!(record.runtime, Some(120));
        assert_eq!(record.director.as_deref(), Some("Some Director"));
        assert_eq!(record.studio.as_deref(), Some("Studio Y"));
        assert_eq!(record.series.as_deref(), Some("Series Z"));
        assert_eq!(record.rating.as_deref(), Some("4.5分, 由100人評價"));
        assert_eq!(record.genres, vec!["GenreA", "GenreB"]);
    }

    #[test]
    fn test_actor_roles_classified_and_unknown_dropped() {
        let record = parse_detail_page(DETAIL_PAGE).unwrap();
        assert_eq!(record.actors.len(), 2);
        assert_eq!(record.actors[0].name, "Actress One");
        assert_eq!(record.actors[0].role, Some(ActorRole::Female));
        assert_eq!(record.actors[1].name, "Actor Two");
        assert_eq!(record.actors[1].role, Some(ActorRole::Male));
    }

    #[test]
    fn test_detail_page_with_only_heading() {
        let html = r#"<h2 class="title is-4"><strong>XYZ-001</strong> <strong>Bare</strong></h2>"#;
        let record = parse_detail_page(html).unwrap();
        assert_eq!(record.code, "XYZ-001");
        assert_eq!(record.title, "Bare");
        assert_eq!(record.premiered, None);
        assert_eq!(record.runtime, None);
        assert_eq!(record.director, None);
        assert!(record.genres.is_empty());
        assert!(record.actors.is_empty());
    }

    #[test]
    fn test_detail_page_without_heading_is_a_parse_error() {
        assert_matches!(
            parse_detail_page("<html><body></body></html>"),
            Err(ScrapeError::Parse(_))
        );
    }

    #[test]
    fn test_female_marker_takes_precedence_over_male_substring() {
        assert_eq!(
            ActorRole::from_marker("symbol female"),
            Some(ActorRole::Female)
        );
        assert_eq!(ActorRole::from_marker("symbol male"), Some(ActorRole::Male));
        assert_eq!(ActorRole::from_marker("symbol"), None);
    }

    #[test]
    fn test_parse_runtime() {
        assert_eq!(parse_runtime("120 分鍾"), Some(120));
        assert_eq!(parse_runtime("95"), Some(95));
        assert_eq!(parse_runtime("unknown"), None);
    }
}
