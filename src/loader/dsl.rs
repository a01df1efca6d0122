//! Line-oriented network description language
//!
//! ```text
//! # comment
//! name  ingestion
//! spec  IF0.2
//! site  unused source
//! group inputs = raw, meta
//! raw, meta -> clean : normalize
//! clean -> report
//! -> seed : generate
//! ```
//!
//! Sites are referenced by id or label and created on first mention.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::{FlowError, Result};
use crate::network::graph::Network;
use crate::network::site::SiteSpec;

/// `<sources> -> <targets> [: <label>]`
pub static CHANNEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)\s*->\s*(.+?)\s*(?::\s*(.+?))?\s*$").expect("Invalid CHANNEL_RE regex")
});

/// `group <label> = <a>, <b>`
pub static GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^group\s+(.+?)\s*=\s*(.+?)\s*$").expect("Invalid GROUP_RE regex")
});

/// `name|spec|site <value>`
pub static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(name|spec|site)\s+(.+?)\s*$").expect("Invalid DIRECTIVE_RE regex")
});

fn split_list(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_error(line: usize, message: impl Into<String>) -> FlowError {
    FlowError::Parse {
        line,
        message: message.into(),
    }
}

/// Parse a network description
pub fn parse_dsl(text: &str) -> Result<Network> {
    let mut network = Network::default();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        // Lift network errors onto the offending line
        let at_line = |e: FlowError| match e {
            FlowError::Parse { .. } => e,
            other => parse_error(line_no, other.to_string()),
        };

        if let Some(caps) = GROUP_RE.captures(line) {
            let label = &caps[1];
            let members = split_list(&caps[2])
                .into_iter()
                .map(|key| network.site(key))
                .collect::<Result<Vec<_>>>()
                .map_err(at_line)?;
            network.add_group(label, &members).map_err(at_line)?;
            continue;
        }

        // `site -> x` is a channel out of a site labelled "site"
        if let Some(caps) = DIRECTIVE_RE
            .captures(line)
            .filter(|caps| !caps[2].starts_with("->"))
        {
            let value = caps[2].to_string();
            match &caps[1] {
                "name" => network.set_name(Some(value)),
                "spec" => {
                    if network.site_count() > 0 || network.channel_count() > 0 {
                        return Err(parse_error(
                            line_no,
                            "spec must come before any site or channel",
                        ));
                    }
                    let name = network.name().map(str::to_string);
                    network = Network::new(&value).map_err(at_line)?;
                    network.set_name(name);
                }
                _ => {
                    network
                        .add_site(SiteSpec::Labeled(value))
                        .map_err(at_line)?;
                }
            }
            continue;
        }

        if !line.contains("->") {
            return Err(parse_error(
                line_no,
                format!("unrecognized statement: {}", line),
            ));
        }
        let caps = CHANNEL_RE
            .captures(line)
            .ok_or_else(|| parse_error(line_no, format!("malformed channel: {}", line)))?;
        let sources: Vec<_> = split_list(caps.get(1).map_or("", |m| m.as_str()))
            .into_iter()
            .map(|key| network.site_or_create(key))
            .collect();
        let target_list = split_list(caps.get(2).map_or("", |m| m.as_str()));
        if target_list.is_empty() {
            return Err(parse_error(line_no, "channel has no targets"));
        }
        let targets: Vec<_> = target_list
            .into_iter()
            .map(|key| network.site_or_create(key))
            .collect();
        let label = caps.get(3).map(|m| m.as_str());
        network
            .add_channel(&sources, &targets, label)
            .map_err(at_line)?;
    }

    Ok(network)
}
