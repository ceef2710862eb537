use indexpush_transport::{HttpRequest, HttpTransport};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::Duration;
use tracing::{debug, info};

use crate::FeedError;

const ID_PATH: [&[u8]; 3] = [b"feed", b"entry", b"id"];

/// Liveness check run before anything is submitted: HEAD must answer 200
pub async fn precheck(
    transport: &dyn HttpTransport,
    feed_url: &str,
    timeout: Duration,
) -> Result<(), FeedError> {
    let response = transport
        .send(HttpRequest::head(feed_url).timeout(timeout))
        .await?;

    if !response.is_ok() {
        return Err(FeedError::Unreachable {
            url: feed_url.to_string(),
            status: response.status,
        });
    }

    debug!(feed = %feed_url, "Feed precheck passed");
    Ok(())
}

/// Download the feed and return every `feed/entry/id` in document order
pub async fn fetch_candidate_ids(
    transport: &dyn HttpTransport,
    feed_url: &str,
    timeout: Duration,
) -> Result<Vec<String>, FeedError> {
    let response = transport
        .send(HttpRequest::get(feed_url).timeout(timeout))
        .await?;

    if !response.is_ok() {
        return Err(FeedError::Unreachable {
            url: feed_url.to_string(),
            status: response.status,
        });
    }

    let ids = parse_entry_ids(&response.body)?;
    info!(feed = %feed_url, count = ids.len(), "Fetched feed entries");
    Ok(ids)
}

/// Extract entry ids from an Atom document
///
/// Namespace prefixes are ignored; blank ids are dropped.
pub fn parse_entry_ids(xml: &str) -> Result<Vec<String>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut current = String::new();
    let mut ids = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            FeedError::Parse(format!("at byte {}: {e}", reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => {
                path.push(e.local_name().as_ref().to_vec());
                if at_id(&path) {
                    current.clear();
                }
            }
            Event::Text(e) if at_id(&path) => {
                let text = e.unescape().map_err(|e| FeedError::Parse(e.to_string()))?;
                current.push_str(&text);
            }
            Event::CData(e) if at_id(&path) => {
                current.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::End(_) => {
                if at_id(&path) {
                    let id = current.trim();
                    if !id.is_empty() {
                        ids.push(id.to_string());
                    }
                    current.clear();
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ids)
}

fn at_id(path: &[Vec<u8>]) -> bool {
    path.len() == ID_PATH.len() && path.iter().zip(ID_PATH).all(|(a, b)| a.as_slice() == b)
}
