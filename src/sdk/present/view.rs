use std::fmt::Write as _;
use std::io::{self, Write};

use serde::Serialize;

use super::link::directions_link;
use crate::sdk::recommend::RecommendationResult;

pub const LOADING_TEXT: &str = "Loading recommendations...";
pub const RESULTS_HEADING: &str = "Top recommendations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Info,
    Warning,
    Error,
}

/// One rendered row of the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub name: String,
    pub category: String,
    pub avg_cost: f64,
    pub distance_km: Option<f64>,
    pub open_hour: Option<u32>,
    pub description: String,
    /// Navigation deep link, absent when the result has no coordinates.
    pub directions: Option<String>,
}

impl From<&RecommendationResult> for ListItem {
    fn from(result: &RecommendationResult) -> Self {
        Self {
            name: result.name.clone(),
            category: result.kind.clone(),
            avg_cost: result.avg_cost,
            distance_km: result.distance(),
            open_hour: result.open_hour,
            description: result.short_description.clone(),
            directions: result.position().map(directions_link),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListContent {
    Loading,
    Message { tone: Tone, text: String },
    Results(Vec<ListItem>),
}

/// The page region results are rendered into. Every `render` replaces what was there.
pub trait ResultView {
    fn render(&mut self, content: ListContent);

    /// Transient user-visible warning that does not touch the list region.
    fn notice(&mut self, tone: Tone, text: &str);
}

/// Renders into an HTML fragment, the way the page's results container is filled.
#[derive(Debug, Default, Clone)]
pub struct HtmlView {
    html: String,
    notices: Vec<(Tone, String)>,
}

impl HtmlView {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn notices(&self) -> &[(Tone, String)] {
        &self.notices
    }
}

impl ResultView for HtmlView {
    fn render(&mut self, content: ListContent) {
        self.html = match content {
            ListContent::Loading => format!("<p class=\"loading\">{LOADING_TEXT}</p>"),
            ListContent::Message { tone, text } => format!(
                "<p class=\"message {}\">{}</p>",
                tone_class(tone),
                escape_html(&text)
            ),
            ListContent::Results(items) => render_items(&items),
        };
    }

    fn notice(&mut self, tone: Tone, text: &str) {
        self.notices.push((tone, text.to_string()));
    }
}

fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Info => "info",
        Tone::Warning => "warning",
        Tone::Error => "error",
    }
}

fn render_items(items: &[ListItem]) -> String {
    let mut html = format!("<h4>{RESULTS_HEADING}</h4>");
    for item in items {
        // Writing into a String cannot fail.
        let _ = write!(
            html,
            "<div class=\"result\"><strong>{}</strong> — {} — ₹{} — {}<br/><small>{}{}</small>",
            escape_html(&item.name),
            escape_html(&item.category),
            item.avg_cost,
            distance_label(item.distance_km),
            item.open_hour
                .map(|hour| format!("Open hour: {hour}. "))
                .unwrap_or_default(),
            escape_html(&item.description),
        );
        if let Some(link) = &item.directions {
            let _ = write!(
                html,
                " <a class=\"navigate\" href=\"{}\" target=\"_blank\" rel=\"noopener\">Navigate</a>",
                escape_html(link)
            );
        }
        html.push_str("</div>");
    }
    html
}

pub(crate) fn distance_label(distance_km: Option<f64>) -> String {
    match distance_km {
        Some(km) => format!("{km:.2} km"),
        None => "distance unknown".to_string(),
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Plain-text rendering for terminals and logs.
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_content(&mut self, content: &ListContent) -> io::Result<()> {
        match content {
            ListContent::Loading => writeln!(self.out, "{LOADING_TEXT}"),
            ListContent::Message { tone, text } => {
                writeln!(self.out, "[{}] {}", tone_class(*tone), text)
            }
            ListContent::Results(items) => {
                writeln!(self.out, "{RESULTS_HEADING}")?;
                for (rank, item) in items.iter().enumerate() {
                    writeln!(
                        self.out,
                        "{}. {} — {} — ₹{} — {}",
                        rank + 1,
                        item.name,
                        item.category,
                        item.avg_cost,
                        distance_label(item.distance_km)
                    )?;
                    if let Some(hour) = item.open_hour {
                        write!(self.out, "   Open hour: {hour}.")?;
                    } else {
                        write!(self.out, "  ")?;
                    }
                    writeln!(self.out, " {}", item.description)?;
                    if let Some(link) = &item.directions {
                        writeln!(self.out, "   {link}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl<W: Write> ResultView for TerminalView<W> {
    fn render(&mut self, content: ListContent) {
        if let Err(e) = self.write_content(&content) {
            log::error!("Failed to write results: {}", e);
        }
    }

    fn notice(&mut self, tone: Tone, text: &str) {
        if let Err(e) = writeln!(self.out, "[{}] {}", tone_class(tone), text) {
            log::error!("Failed to write notice: {}", e);
        }
    }
}
