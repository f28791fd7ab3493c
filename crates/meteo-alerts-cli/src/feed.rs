//! Alert feed client: one HTTP GET plus RSS envelope parsing.
//!
//! The envelope is read with a `quick_xml` event loop; each `<item>` becomes
//! a [`RawItem`] whose description is left as opaque HTML.

use std::time::Duration;

use meteo_alerts::RawItem;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, info};

/// A parsed feed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    /// Channel title, empty if the feed has none.
    pub title: String,
    pub items: Vec<RawItem>,
}

/// Errors raised while fetching or parsing the feed.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("XML error: {0}")]
    Xml(String),
}

/// Parse an RSS 2.0 document into its items.
///
/// Reads `title`, `link`, `description` (escaped text or CDATA) and
/// `pubDate` from each `channel/item`. Unknown elements are skipped.
pub fn parse_feed(xml: &str) -> Result<Feed, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut feed = Feed::default();
    let mut in_item = false;
    let mut in_channel_title = false;
    let mut current_tag = String::new();
    let mut current = RawItem::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "item" => {
                        in_item = true;
                        current = RawItem::default();
                    }
                    "title" if !in_item && feed.title.is_empty() => {
                        in_channel_title = true;
                    }
                    _ => {}
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "item" && in_item {
                    feed.items.push(finish_item(std::mem::take(&mut current)));
                    in_item = false;
                }
                in_channel_title = false;
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                let text = match e.unescape() {
                    Ok(text) => text.into_owned(),
                    Err(err) => {
                        debug!(error = %err, "keeping unescapable feed text verbatim");
                        String::from_utf8_lossy(&e).into_owned()
                    }
                };
                append_text(&mut feed, &mut current, in_item, in_channel_title, &current_tag, &text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                append_text(&mut feed, &mut current, in_item, in_channel_title, &current_tag, &text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FeedError::Xml(format!(
                    "at byte {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(feed)
}

fn append_text(
    feed: &mut Feed,
    item: &mut RawItem,
    in_item: bool,
    in_channel_title: bool,
    tag: &str,
    text: &str,
) {
    if in_item {
        match tag {
            "title" => item.title.push_str(text),
            "link" => item.link.push_str(text),
            "description" => item.description_html.push_str(text),
            "pubDate" => item.published_raw.push_str(text),
            _ => {}
        }
    } else if in_channel_title {
        feed.title.push_str(text);
    }
}

fn finish_item(item: RawItem) -> RawItem {
    RawItem {
        title: item.title.trim().to_string(),
        link: item.link.trim().to_string(),
        description_html: item.description_html,
        published_raw: item.published_raw.trim().to_string(),
    }
}

/// HTTP client for the alert feed.
#[derive(Clone)]
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new(timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("meteo-alerts/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Fetch and parse the feed at `url`. A single attempt; no retries.
    pub async fn fetch(&self, url: &str) -> Result<Feed, FeedError> {
        info!(url, "fetching alert feed");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().await?;
        debug!(bytes = body.len(), "feed downloaded");
        parse_feed(&body)
    }
}
