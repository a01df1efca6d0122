//! Graphviz and Mermaid graphs of a network
//!
//! Sites are round nodes and channels are boxes; edges run
//! source -> channel -> target. Group membership is drawn dashed, from the
//! group to each member.

use crate::network::graph::Network;
use crate::network::site::SiteId;

fn dot_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn mermaid_escape(text: &str) -> String {
    text.replace('"', "#quot;")
}

/// Format the network as DOT (Graphviz)
pub fn format_dot(network: &Network) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "digraph \"{}\" {{\n",
        dot_escape(network.name().unwrap_or("flow"))
    ));
    output.push_str("    rankdir=LR;\n");
    output.push_str("    node [shape=ellipse];\n\n");

    for (_, site) in network.sites_iter() {
        output.push_str(&format!(
            "    \"{}\" [label=\"{}\"];\n",
            site.id(),
            dot_escape(site.display_label())
        ));
    }
    for (_, ch) in network.channels_iter() {
        output.push_str(&format!(
            "    \"{}\" [label=\"{}\", shape=box];\n",
            ch.id(),
            dot_escape(ch.label())
        ));
    }

    output.push('\n');

    for (_, ch) in network.channels_iter() {
        for sid in ch.sources() {
            output.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                network.site_ref(*sid).id(),
                ch.id()
            ));
        }
        for sid in ch.targets() {
            output.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                ch.id(),
                network.site_ref(*sid).id()
            ));
        }
    }
    for (_, site) in network.sites_iter() {
        for member in site.member_ids() {
            output.push_str(&format!(
                "    \"{}\" -> \"{}\" [style=dashed];\n",
                site.id(),
                network.site_ref(member).id()
            ));
        }
    }

    output.push_str("}\n");
    output
}

/// Format the network as a Mermaid flowchart
pub fn format_mermaid(network: &Network) -> String {
    let mut output = String::new();
    output.push_str("graph LR\n");

    // Mermaid node ids can't have special chars, use indices
    let site_node = |sid: SiteId| format!("S{}", sid.index());

    for (sid, site) in network.sites_iter() {
        output.push_str(&format!(
            "    {}([\"{}\"])\n",
            site_node(sid),
            mermaid_escape(site.display_label())
        ));
    }
    for (cid, ch) in network.channels_iter() {
        output.push_str(&format!(
            "    C{}[\"{}\"]\n",
            cid.index(),
            mermaid_escape(ch.label())
        ));
    }

    for (cid, ch) in network.channels_iter() {
        for sid in ch.sources() {
            output.push_str(&format!("    {} --> C{}\n", site_node(*sid), cid.index()));
        }
        for sid in ch.targets() {
            output.push_str(&format!("    C{} --> {}\n", cid.index(), site_node(*sid)));
        }
    }
    for (sid, site) in network.sites_iter() {
        for member in site.member_ids() {
            output.push_str(&format!("    {} -.-> {}\n", site_node(sid), site_node(member)));
        }
    }

    output
}
