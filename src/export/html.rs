//! HTML rows with an SVG arrow per channel

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::network::channel::ChannelId;
use crate::network::graph::Network;
use crate::network::site::SiteId;

/// Marker ids must be unique across every fragment this process emits
static NEXT_MARKER: AtomicUsize = AtomicUsize::new(0);

fn next_marker() -> usize {
    NEXT_MARKER.fetch_add(1, Ordering::Relaxed)
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn paragraphs(network: &Network, sites: &[SiteId]) -> String {
    sites
        .iter()
        .map(|sid| format!("<p>{}</p>", escape(network.site_ref(*sid).display_label())))
        .collect()
}

/// One flex row: sources, arrow, targets
pub fn channel_html(network: &Network, cid: ChannelId) -> String {
    let ch = network.channel_ref(cid);
    let marker = next_marker();
    let mut output = String::new();
    output.push_str("<div style=\"display: flex; align-items: center; justify-content: space-between; width: 100%; font-family: Arial; font-size: 16px;\">\n");
    output.push_str(&format!(
        "  <div style=\"text-align: right; margin-right: 12px; width: 30%\">{}</div>\n",
        paragraphs(network, ch.sources())
    ));
    output.push_str("  <div style=\"text-align: center; position: relative; flex: 1;\">\n");
    output.push_str("    <svg height=\"50\" width=\"150\" style=\"overflow: visible;\">\n");
    output.push_str("      <defs>\n");
    output.push_str(&format!(
        "        <marker id=\"arrowhead_{}\" markerWidth=\"10\" markerHeight=\"7\" refX=\"10\" refY=\"3.5\" orient=\"auto\">\n",
        marker
    ));
    output.push_str("          <polygon points=\"0 0, 10 3.5, 0 7\" fill=\"currentColor\" />\n");
    output.push_str("        </marker>\n");
    output.push_str("      </defs>\n");
    output.push_str(&format!(
        "      <line x1=\"0\" y1=\"25\" x2=\"150\" y2=\"25\" stroke=\"currentColor\" stroke-width=\"2\" marker-end=\"url(#arrowhead_{})\" />\n",
        marker
    ));
    output.push_str("    </svg>\n");
    output.push_str(&format!(
        "    <div style=\"position: absolute; top: 0; left: 50%; transform: translateX(-50%); font-size: 14px;\">{}</div>\n",
        escape(ch.label())
    ));
    output.push_str("  </div>\n");
    output.push_str(&format!(
        "  <div style=\"text-align: left; margin-left: 12px; width: 30%\">{}</div>\n",
        paragraphs(network, ch.targets())
    ));
    output.push_str("</div>\n");
    output
}

/// All channels in evaluation order, optionally wrapped in a full document
pub fn network_html(network: &Network, standalone: bool) -> String {
    let rows: String = network
        .channels_iter()
        .map(|(cid, _)| channel_html(network, cid))
        .collect();

    if !standalone {
        return rows;
    }

    let title = escape(network.name().unwrap_or("flow network"));
    let mut output = String::new();
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html>\n<head>\n<meta charset=\"utf-8\">\n");
    output.push_str(&format!("<title>{}</title>\n", title));
    output.push_str("</head>\n<body>\n");
    output.push_str(&rows);
    output.push_str("</body>\n</html>\n");
    output
}
