//! Document renderers for networks
//!
//! Each renderer walks channels in evaluation order, so callers normally run
//! [`Network::compute_order`] first.

pub mod dot;
pub mod html;
pub mod table;
pub mod tex;

use crate::core::error::Result;
use crate::loader::definition::NetworkDefinition;
use crate::network::graph::Network;

/// Document format produced by [`export`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Tex,
    Html,
    Dot,
    Mermaid,
    Table,
    Definition,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tex" | "tikz" => Ok(ExportFormat::Tex),
            "html" => Ok(ExportFormat::Html),
            "dot" | "graphviz" => Ok(ExportFormat::Dot),
            "mermaid" => Ok(ExportFormat::Mermaid),
            "table" => Ok(ExportFormat::Table),
            "definition" | "json" => Ok(ExportFormat::Definition),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Wrap HTML output in a complete document
    pub standalone: bool,
    /// Colorize table output
    pub color: bool,
}

pub fn export(network: &Network, format: ExportFormat, options: ExportOptions) -> Result<String> {
    let output = match format {
        ExportFormat::Tex => tex::network_tex(network),
        ExportFormat::Html => html::network_html(network, options.standalone),
        ExportFormat::Dot => dot::format_dot(network),
        ExportFormat::Mermaid => dot::format_mermaid(network),
        ExportFormat::Table => table::format_table(network, options.color),
        ExportFormat::Definition => NetworkDefinition::from_network(network).to_json_pretty()?,
    };
    Ok(output)
}
