//! TikZ pictures, one per channel

use crate::network::channel::ChannelId;
use crate::network::graph::Network;
use crate::network::site::SiteId;

/// TikZ node names cannot contain `_`
fn node_name(id: &str) -> String {
    id.replace('_', "")
}

/// Vertical offset (in em) of node `k` out of `n` stacked nodes
fn yshift(k: usize, n: usize) -> f64 {
    0.5 + k as f64 - n as f64 / 2.0
}

fn push_nodes(output: &mut String, network: &Network, sites: &[SiteId], anchor: &str) {
    for (k, sid) in sites.iter().enumerate() {
        let site = network.site_ref(*sid);
        output.push_str(&format!(
            "    \\node ({}) [{}, yshift={:?}em] {{{}}};\n",
            node_name(site.id()),
            anchor,
            yshift(k, sites.len()),
            site.display_label()
        ));
    }
}

/// Picture of a single channel: sources left of the arrow, targets right
pub fn channel_tex(network: &Network, cid: ChannelId) -> String {
    let ch = network.channel_ref(cid);
    let mut output = String::new();
    output.push_str("\\[\n");
    output.push_str("\\begin{tikzpicture}[node distance=1em, auto]\n");
    output.push_str("    % Define nodes\n");
    output.push_str(&format!(
        "    \\node (lab) at (-4, 0) {{{}}};\n",
        node_name(ch.id())
    ));
    output.push_str("    \\node (mr) at (10, 0) {};\n");
    output.push_str("    \\node (ml) at (-5, 0) {};\n");
    output.push_str("    \\node (r) at (0, 0) {};\n");
    output.push_str("    \\node (l) at (3, 0) {};\n");
    push_nodes(&mut output, network, ch.sources(), "left=of r");
    push_nodes(&mut output, network, ch.targets(), "right=of l");
    output.push_str("    % Draw arrow\n");
    output.push_str(&format!(
        "    \\draw[->] (r.east) -- (l.west) node[midway, above] {{\\textit{{{}}}}};\n",
        ch.label()
    ));
    output.push_str("\\end{tikzpicture}\n");
    output.push_str("\\]\n");
    output
}

/// Every channel in evaluation order, each preceded by its summary as a comment
pub fn network_tex(network: &Network) -> String {
    network
        .channels_iter()
        .map(|(cid, _)| {
            format!(
                "%{}\n{}",
                network.channel_summary(cid),
                channel_tex(network, cid)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yshift() {
        assert_eq!(yshift(0, 1), 0.0);
        assert_eq!(yshift(0, 2), -0.5);
        assert_eq!(yshift(1, 2), 0.5);
        assert_eq!(format!("{:?}", yshift(2, 3)), "1.0");
    }

    #[test]
    fn test_channel_tex() {
        let mut nw = Network::default();
        let a = nw.site_or_create("a");
        let b = nw.site_or_create("b");
        let out = nw.site_or_create("out");
        let cid = nw.add_channel(&[a, b], &[out], Some("merge")).unwrap();

        let tex = channel_tex(&nw, cid);
        assert!(tex.contains("\\node (lab) at (-4, 0) {c0};"));
        assert!(tex.contains("\\node (s0) [left=of r, yshift=-0.5em] {a};"));
        assert!(tex.contains("\\node (s1) [left=of r, yshift=0.5em] {b};"));
        assert!(tex.contains("\\node (s2) [right=of l, yshift=0.0em] {out};"));
        assert!(tex.contains("node[midway, above] {\\textit{merge}};"));
        assert!(tex.starts_with("\\[\n\\begin{tikzpicture}"));
    }

    #[test]
    fn test_network_tex_comments() {
        let mut nw = Network::chain(&["a", "b", "c"], &[]).unwrap();
        nw.compute_order();
        let tex = network_tex(&nw);
        assert!(tex.starts_with("%_c0: [a] --> {b}\n"));
        assert!(tex.contains("\n%_c1: [b] --> {c}\n"));
        assert_eq!(tex.matches("\\begin{tikzpicture}").count(), 2);
    }

    #[test]
    fn test_empty_network() {
        assert_eq!(network_tex(&Network::default()), "");
    }
}
