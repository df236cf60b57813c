#![allow(dead_code)]

use async_trait::async_trait;
use pantry_harvest::config::{Config, CrawlerConfig, FetchConfig, OutputConfig, SelectorConfig};
use pantry_harvest::crawler::{FetchError, FetchErrorKind, PageFetchResult, PageFetcher};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Creates a test configuration with no pacing delays
pub fn test_config(listing_url: &str, target_count: usize, dataset_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            listing_url: listing_url.to_string(),
            site_origin: None,
            target_count,
            max_pages: 50,
            page_delay_ms: 0,
            request_delay_ms: 0,
            max_retries: 0,
            retry_backoff_ms: 0,
        },
        fetch: FetchConfig {
            timeout_secs: 5,
            ..FetchConfig::default()
        },
        output: OutputConfig {
            dataset_path: dataset_path.to_string(),
            summary_path: None,
            write_bom: false,
        },
        selectors: SelectorConfig::default(),
    }
}

/// A listing page linking to the given recipe ids
pub fn listing_html(ids: &[u32]) -> String {
    let items: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<li class="common_sp_list_li"><a class="common_sp_link" href="/recipe/{id}"><img src="/img/{id}.jpg"></a></li>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><a href="/login">Login</a><ul class="common_sp_list_ul">{items}</ul></body></html>"#
    )
}

/// A complete recipe detail page
pub fn detail_html(title: &str, ingredients: &[&str], steps: &[&str]) -> String {
    let ingredients: String = ingredients
        .iter()
        .map(|i| format!("<li>{i}</li>"))
        .collect();
    let steps: String = steps
        .iter()
        .map(|s| format!(r#"<div class="view_step_cont media">{s}</div>"#))
        .collect();
    format!(
        r#"<html><head><title>{title} - 만개의레시피</title></head><body>
        <div class="view2_summary"><h3>{title}</h3></div>
        <div class="ready_ingre3"><ul>{ingredients}</ul></div>
        <div class="view_step">{steps}</div>
        </body></html>"#
    )
}

/// A detail page with a title but no ingredient or step content
pub fn incomplete_html(title: &str) -> String {
    format!(r#"<html><body><div class="view2_summary"><h3>{title}</h3></div></body></html>"#)
}

/// A recipe page that extracts cleanly
pub fn good_recipe(n: u32) -> String {
    detail_html(
        &format!("Recipe {n}"),
        &["두부 1모", "간장 2큰술"],
        &["Cut the tofu into cubes", "Simmer with the soy sauce"],
    )
}

/// A fetcher answering from a script, recording every request
///
/// Each URL maps to a queue of responses. The last response in a queue is
/// repeated once the others are used up; unknown URLs get a 404.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, VecDeque<PageFetchResult>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.respond(url, Ok(html.into()))
    }

    pub fn error(self, url: impl Into<String>, kind: FetchErrorKind) -> Self {
        self.respond(url, Err(FetchError::new(kind, "scripted failure")))
    }

    pub fn respond(self, url: impl Into<String>, result: PageFetchResult) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(url.into())
            .or_default()
            .push_back(result);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> PageFetchResult {
        self.requests.lock().unwrap().push(url.to_string());

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(FetchError::new(FetchErrorKind::HttpStatus(404), "404"))),
            None => Err(FetchError::new(FetchErrorKind::HttpStatus(404), "404 Not Found")),
        }
    }
}

/// A listing that never runs dry: every page links to one new recipe
pub struct EndlessListing {
    pub requests: Mutex<u32>,
}

impl EndlessListing {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(0),
        }
    }

    pub fn request_count(&self) -> u32 {
        *self.requests.lock().unwrap()
    }
}

#[async_trait]
impl PageFetcher for EndlessListing {
    async fn fetch(&self, _url: &str) -> PageFetchResult {
        let mut count = self.requests.lock().unwrap();
        *count += 1;
        Ok(listing_html(&[*count]))
    }
}

pub fn recipe_url(n: u32) -> String {
    format!("https://www.example.com/recipe/{n}")
}
