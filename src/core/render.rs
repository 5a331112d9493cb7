//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet, Severity};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render to a writer, with a trailing newline when there is output
    pub fn render_to<W: Write>(
        &self,
        result_set: &ResultSet,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(result_set);
        if output.is_empty() {
            return Ok(());
        }
        writer.write_all(output.as_bytes())?;
        if !output.ends_with('\n') {
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut pages = Vec::new();
        let mut sections = Vec::new();
        let mut navs = Vec::new();
        let mut scrolls = Vec::new();
        let mut events = Vec::new();
        let mut issues = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Page => pages.push(item),
                Kind::Section => sections.push(item),
                Kind::Nav => navs.push(item),
                Kind::Scroll => scrolls.push(item),
                Kind::Event => events.push(item),
                Kind::Issue => issues.push(item),
            }
        }

        if !issues.is_empty() {
            output.push_str("## Issues\n\n");
            for item in issues {
                let severity = match item.severity {
                    Some(Severity::Error) => "error",
                    _ => "warning",
                };
                let code = item.errors.first().map(|e| e.code.as_str()).unwrap_or("");
                output.push_str(&format!(
                    "- {} **{}** `{}`",
                    severity,
                    code,
                    item.path.as_deref().unwrap_or("")
                ));
                if let Some(excerpt) = &item.excerpt {
                    output.push_str(&format!(": {}", excerpt));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if !pages.is_empty() {
            output.push_str("## Pages\n\n");
            for item in pages {
                if let Some(path) = &item.path {
                    output.push_str(&format!("- `{}`\n", path));
                }
            }
            output.push('\n');
        }

        if !sections.is_empty() {
            output.push_str("## Sections\n\n");
            output.push_str("| id | offset | closest |\n|---|---|---|\n");
            for item in sections {
                output.push_str(&format!(
                    "| `{}` | {} | {} |\n",
                    item.id.as_deref().unwrap_or(""),
                    item.meta.offset.map(|o| o.to_string()).unwrap_or_default(),
                    if item.meta.active == Some(true) { "yes" } else { "" }
                ));
            }
            output.push('\n');
        }

        if !navs.is_empty() {
            output.push_str("## Navigation\n\n");
            for item in navs {
                let marker = if item.meta.active == Some(true) { "x" } else { " " };
                output.push_str(&format!(
                    "- [{}] {}",
                    marker,
                    item.excerpt.as_deref().unwrap_or("")
                ));
                if let Some(id) = &item.id {
                    output.push_str(&format!(" (`#{}`)", id));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if !scrolls.is_empty() {
            output.push_str("## Scrolls\n\n");
            for item in scrolls {
                self.render_item_md(&mut output, item);
            }
        }

        if !events.is_empty() {
            output.push_str("## Events\n\n");
            for item in events {
                self.render_item_md(&mut output, item);
            }
        }

        output
    }

    fn render_item_md(&self, output: &mut String, item: &ResultItem) {
        output.push_str("### ");
        if let Some(step) = item.meta.step {
            output.push_str(&format!("{}. ", step + 1));
        }
        output.push_str(item.element.as_deref().unwrap_or("-"));
        if let Some(top) = item.meta.scroll_top {
            output.push_str(&format!(" (scroll top {})", top));
        }
        output.push('\n');

        if let Some(excerpt) = &item.excerpt {
            output.push_str(&format!("\n{}\n", excerpt));
        }

        if let Some(data) = &item.data {
            output.push_str("\n```json\n");
            output.push_str(&serde_json::to_string_pretty(data).unwrap_or_default());
            output.push_str("\n```\n");
        }

        output.push('\n');
    }

    /// Raw mode: one excerpt per line
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.excerpt.clone())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Write raw mode warning to stderr
pub fn write_raw_warning() {
    eprintln!("# WARNING: Raw mode output - not parseable, unstable format");
}
