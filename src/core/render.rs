//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};
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
    /// Create a new render config with default options
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
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

    /// Create a new renderer with render config
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

    /// Render to a writer
    pub fn render_to<W: Write>(
        &self,
        result_set: &ResultSet,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(result_set);
        writer.write_all(output.as_bytes())
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

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut networks = Vec::new();
        let mut sites = Vec::new();
        let mut channels = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Error => errors.push(item),
                Kind::Warning => warnings.push(item),
                Kind::Network => networks.push(item),
                Kind::Site => sites.push(item),
                Kind::Channel => channels.push(item),
            }
        }

        for (title, issues) in [("Errors", &errors), ("Warnings", &warnings)] {
            if issues.is_empty() {
                continue;
            }
            output.push_str(&format!("## {}\n\n", title));
            for item in issues {
                for issue in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", issue.code, issue.message));
                }
            }
            output.push('\n');
        }

        if !networks.is_empty() {
            output.push_str("## Networks\n\n");
            for item in networks {
                let name = item.label.as_deref().unwrap_or("(unnamed)");
                output.push_str(&format!("- `{}`", name));
                if let Some(data) = &item.data {
                    output.push_str(&format!(" {}", data));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if !sites.is_empty() {
            output.push_str("## Sites\n\n");
            for item in sites {
                self.render_item_md(&mut output, item);
            }
            output.push('\n');
        }

        if !channels.is_empty() {
            output.push_str("## Channels\n\n");
            for item in channels {
                self.render_item_md(&mut output, item);
            }
            output.push('\n');
        }

        output
    }

    fn render_item_md(&self, output: &mut String, item: &ResultItem) {
        output.push_str(&format!(
            "- `{}` {}",
            item.id.as_deref().unwrap_or("?"),
            item.label.as_deref().unwrap_or("")
        ));
        if let Some(level) = item.level {
            output.push_str(&format!(" (level {})", level));
        }
        output.push('\n');

        if let Some(data) = &item.data {
            for key in ["sources", "targets", "members"] {
                if let Some(values) = data.get(key).and_then(|v| v.as_array()) {
                    if values.is_empty() {
                        continue;
                    }
                    let joined = values
                        .iter()
                        .filter_map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    output.push_str(&format!("  - {}: {}\n", key, joined));
                }
            }
        }
    }

    /// Render as raw output (labels only, for debugging)
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| match item.kind {
                Kind::Warning | Kind::Error => item.errors.first().map(|e| e.message.clone()),
                _ => item.label.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::FlowIssue;

    fn sample() -> ResultSet {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::site("_s0", "raw data", 0));
        result_set.push(
            ResultItem::channel("_c0", "clean", 0).with_data(serde_json::json!({
                "sources": ["raw data"],
                "targets": ["clean data"],
            })),
        );
        result_set
    }

    #[test]
    fn test_render_jsonl() {
        let renderer = Renderer::new(OutputFormat::Jsonl);
        let output = renderer.render(&sample());

        assert!(output.contains("raw data"));
        assert!(output.contains("\"kind\":\"channel\""));
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_render_json() {
        let renderer = Renderer::new(OutputFormat::Json);
        let output = renderer.render(&sample());

        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(
            "jsonl".parse::<OutputFormat>().unwrap(),
            OutputFormat::Jsonl
        );
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
    }

    #[test]
    fn test_output_format_parse_invalid() {
        let result = "yaml".parse::<OutputFormat>();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_render_jsonl_pretty() {
        let config = RenderConfig::with_pretty(OutputFormat::Jsonl, true);
        let output = Renderer::with_config(config).render(&sample());
        assert!(output.contains("\n\n"));
        assert!(output.contains("  \"kind\""));
    }

    #[test]
    fn test_render_markdown_empty() {
        let output = Renderer::new(OutputFormat::Markdown).render(&ResultSet::new());
        assert!(output.is_empty());
    }

    #[test]
    fn test_render_markdown_sections() {
        let mut result_set = sample();
        result_set.push(ResultItem::warning(FlowIssue::new(
            "ORPHANED_SITE",
            "Site x is orphaned",
        )));
        let output = Renderer::new(OutputFormat::Markdown).render(&result_set);

        assert!(output.contains("## Warnings"));
        assert!(output.contains("**ORPHANED_SITE**"));
        assert!(output.contains("## Sites"));
        assert!(output.contains("`_s0` raw data (level 0)"));
        assert!(output.contains("## Channels"));
        assert!(output.contains("  - sources: raw data"));
        assert!(!output.contains("## Errors"));
    }

    #[test]
    fn test_render_markdown_section_order() {
        let mut result_set = sample();
        result_set.push(ResultItem::network(Some("demo".into())));
        result_set.push(ResultItem::warning(FlowIssue::new("W", "w")));
        result_set.push(ResultItem::error(FlowIssue::new("E", "e")));
        let output = Renderer::new(OutputFormat::Markdown).render(&result_set);

        let positions: Vec<usize> = [
            "## Errors",
            "## Warnings",
            "## Networks",
            "## Sites",
            "## Channels",
        ]
        .iter()
        .map(|heading| output.find(heading).unwrap())
        .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_render_raw() {
        let output = Renderer::new(OutputFormat::Raw).render(&sample());
        assert_eq!(output, "raw data\nclean");
    }

    #[test]
    fn test_render_to_writer() {
        let renderer = Renderer::new(OutputFormat::Json);
        let mut buffer = Vec::new();
        renderer.render_to(&sample(), &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("_c0"));
    }
}
