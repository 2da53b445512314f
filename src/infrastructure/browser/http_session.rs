//! Headless browser session over plain HTTP.
//!
//! Pages are fetched with `reqwest` and queried with `scraper`. Forms are
//! submitted the way a browser would submit them without scripts: the
//! enclosing `<form>` of the clicked control supplies the action, method and
//! encoding, and its successful controls become the request fields.
//! Redirects are followed and the final URL becomes the current URL.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use super::BrowserSession;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::response::normalize_whitespace;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; automail-e2e/0.1)";

pub struct HttpBrowserSession {
    client: Client,
    current_url: Option<Url>,
    html: String,
    /// Values typed into named fields on the current page.
    filled: HashMap<String, String>,
}

impl HttpBrowserSession {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            current_url: None,
            html: String::new(),
            filled: HashMap::new(),
        })
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        match &self.current_url {
            Some(current) => current.join(url).map_err(AppError::from),
            None => Url::parse(url).map_err(AppError::from),
        }
    }

    async fn load(&mut self, request: reqwest::RequestBuilder, label: &str) -> Result<()> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("{} failed: {}", label, e)))?;

        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                url = %final_url,
                "{} returned an error page",
                label
            );
        }

        let html = response.text().await.map_err(|e| {
            AppError::NetworkError(format!("Failed to read page {}: {}", final_url, e))
        })?;

        tracing::debug!(url = %final_url, bytes = html.len(), "Page loaded");
        self.current_url = Some(final_url);
        self.html = html;
        self.filled.clear();
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for HttpBrowserSession {
    async fn visit(&mut self, url: &str) -> Result<()> {
        let target = self.resolve(url)?;
        let request = self.client.get(target.clone());
        self.load(request, &format!("GET {}", target)).await
    }

    fn fill(&mut self, selector: &str, text: &str) -> Result<()> {
        let name = {
            let document = Html::parse_document(&self.html);
            let parsed = parse_selector(selector)?;
            let element = document.select(&parsed).next().ok_or_else(|| {
                AppError::ValidationError(format!("No element matches '{}'", selector))
            })?;
            let tag = element.value().name();
            if tag != "textarea" && tag != "input" {
                return Err(AppError::ValidationError(format!(
                    "'{}' matched a <{}>, which cannot be typed into",
                    selector, tag
                )));
            }
            let name = element.value().attr("name").map(str::to_string);
            name.ok_or_else(|| {
                AppError::ValidationError(format!("Field '{}' has no name attribute", selector))
            })?
        };
        self.filled.insert(name, text.to_string());
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        let current = self.current_url.clone().ok_or_else(|| {
            AppError::ValidationError("No page loaded; call visit first".to_string())
        })?;
        let prepared = prepare_submission(&self.html, &current, selector, &self.filled)?;

        tracing::debug!(
            method = %prepared.method,
            action = %prepared.action,
            multipart = prepared.multipart,
            fields = prepared.entries.len(),
            "Submitting form"
        );

        let label = format!("{} {}", prepared.method, prepared.action);
        let request = if prepared.method == Method::GET {
            let mut action = prepared.action.clone();
            action
                .query_pairs_mut()
                .clear()
                .extend_pairs(prepared.pairs());
            self.client.get(action)
        } else if prepared.multipart {
            let mut form = Form::new();
            for entry in prepared.entries {
                form = match entry {
                    FormEntry::Text(name, value) => form.text(name, value),
                    FormEntry::EmptyFile(name) => {
                        let part = Part::bytes(Vec::new())
                            .file_name("")
                            .mime_str("application/octet-stream")?;
                        form.part(name, part)
                    }
                };
            }
            self.client.post(prepared.action).multipart(form)
        } else {
            self.client.post(prepared.action.clone()).form(&prepared.pairs())
        };

        self.load(request, &label).await
    }

    fn current_url(&self) -> String {
        self.current_url
            .as_ref()
            .map(Url::to_string)
            .unwrap_or_default()
    }

    fn count(&self, selector: &str) -> Result<usize> {
        let parsed = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        let count = document.select(&parsed).count();
        Ok(count)
    }

    fn page_contains(&self, text: &str) -> bool {
        let document = Html::parse_document(&self.html);
        let page_text = visible_text(document.root_element());
        page_text.contains(text)
    }

    fn texts(&self, selector: &str) -> Result<Vec<String>> {
        let parsed = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        let texts = document.select(&parsed).map(visible_text).collect();
        Ok(texts)
    }
}

/// One successful control, in document order.
#[derive(Debug, Clone, PartialEq)]
enum FormEntry {
    Text(String, String),
    /// File input with no file chosen.
    EmptyFile(String),
}

#[derive(Debug)]
struct PreparedSubmission {
    method: Method,
    action: Url,
    multipart: bool,
    entries: Vec<FormEntry>,
}

impl PreparedSubmission {
    /// Name/value pairs for url-encoded bodies and query strings, where an
    /// empty file input is sent as an empty value.
    fn pairs(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|entry| match entry {
                FormEntry::Text(name, value) => (name.as_str(), value.as_str()),
                FormEntry::EmptyFile(name) => (name.as_str(), ""),
            })
            .collect()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| AppError::ValidationError(format!("Invalid selector '{}': {:?}", selector, e)))
}

/// Text a user would see inside `element`, skipping script and style bodies.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|el| el.name()))
            .map(|name| name == "script" || name == "style")
            .unwrap_or(false);
        if !hidden {
            text.push_str(chunk);
        }
    }
    normalize_whitespace(&text)
}

fn prepare_submission(
    html: &str,
    current: &Url,
    selector: &str,
    filled: &HashMap<String, String>,
) -> Result<PreparedSubmission> {
    let document = Html::parse_document(html);
    let parsed = parse_selector(selector)?;
    let control = document
        .select(&parsed)
        .next()
        .ok_or_else(|| AppError::ValidationError(format!("No element matches '{}'", selector)))?;

    let form = control
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "form")
        .ok_or_else(|| {
            AppError::ValidationError(format!("'{}' is not inside a form", selector))
        })?;

    let attr = |name: &str, override_name: &str| {
        control
            .value()
            .attr(override_name)
            .or_else(|| form.value().attr(name))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let action = match attr("action", "formaction") {
        Some(action) => current.join(&action)?,
        None => {
            let mut url = current.clone();
            url.set_fragment(None);
            url
        }
    };
    let method = match attr("method", "formmethod") {
        Some(method) if method.eq_ignore_ascii_case("post") => Method::POST,
        _ => Method::GET,
    };
    let multipart = attr("enctype", "formenctype")
        .map(|enctype| enctype.eq_ignore_ascii_case("multipart/form-data"))
        .unwrap_or(false);

    let controls = parse_selector("input, textarea, select, button")?;
    let mut entries = Vec::new();
    for el in form.select(&controls) {
        let element = el.value();
        let Some(name) = element.attr("name").filter(|name| !name.is_empty()) else {
            continue;
        };
        if element.attr("disabled").is_some() {
            continue;
        }

        let value = match element.name() {
            "textarea" => Some(el.text().collect::<String>()),
            "select" => selected_option(el),
            "button" => {
                if el.id() == control.id() {
                    Some(element.attr("value").unwrap_or_default().to_string())
                } else {
                    None
                }
            }
            _ => {
                let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
                match kind.as_str() {
                    "submit" | "image" => {
                        if el.id() == control.id() {
                            Some(element.attr("value").unwrap_or_default().to_string())
                        } else {
                            None
                        }
                    }
                    "file" => {
                        entries.push(FormEntry::EmptyFile(name.to_string()));
                        None
                    }
                    "reset" | "button" => None,
                    "checkbox" | "radio" => element
                        .attr("checked")
                        .map(|_| element.attr("value").unwrap_or("on").to_string()),
                    _ => Some(element.attr("value").unwrap_or_default().to_string()),
                }
            }
        };

        if let Some(value) = value {
            let value = filled.get(name).cloned().unwrap_or(value);
            entries.push(FormEntry::Text(name.to_string(), value));
        }
    }

    Ok(PreparedSubmission {
        method,
        action,
        multipart,
        entries,
    })
}

fn selected_option(select: ElementRef<'_>) -> Option<String> {
    let options = Selector::parse("option").ok()?;
    let mut all = select.select(&options);
    let first = select.select(&options).next();
    let chosen = all
        .find(|option| option.value().attr("selected").is_some())
        .or(first)?;
    Some(
        chosen
            .value()
            .attr("value")
            .map(str::to_string)
            .unwrap_or_else(|| normalize_whitespace(&chosen.text().collect::<String>())),
    )
}
