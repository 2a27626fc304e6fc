// GEXF export.
//
// Converts the accumulator into a petgraph directed graph (one node per
// handle, one edge per aggregated pair) and serializes it as GEXF 1.2
// with quick-xml. One pass at the end of the run; the output file is
// overwritten.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::accumulator::InteractionMap;

/// Aggregated edge payload: every reply interaction between an ordered
/// pair of users, collapsed into one weighted edge.
#[derive(Debug, Clone)]
pub struct Interaction {
    /// Number of qualifying replies from source to target.
    pub weight: usize,
    /// The reply texts, in discovery order.
    pub comments: Vec<String>,
}

/// Build the directed interaction graph from the accumulator.
///
/// Node order and edge order both follow the accumulator's discovery
/// order, so the exported file is stable run-to-run for identical input.
pub fn build_graph(acc: &InteractionMap) -> DiGraph<String, Interaction> {
    let mut graph = DiGraph::new();
    let mut nodes: HashMap<String, petgraph::graph::NodeIndex> = HashMap::new();

    for ((source, target), texts) in acc.iter() {
        let source_ix = *nodes
            .entry(source.clone())
            .or_insert_with(|| graph.add_node(source.clone()));
        let target_ix = *nodes
            .entry(target.clone())
            .or_insert_with(|| graph.add_node(target.clone()));
        graph.add_edge(
            source_ix,
            target_ix,
            Interaction {
                weight: texts.len(),
                comments: texts.to_vec(),
            },
        );
    }

    graph
}

/// Render the interaction graph as a GEXF 1.2 document.
///
/// Edges carry a `weight` attribute (interaction count) and a
/// `comments_list` attvalue holding the JSON rendering of the text list.
pub fn render_gexf(graph: &DiGraph<String, Interaction>) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut gexf = BytesStart::new("gexf");
    gexf.push_attribute(("xmlns", "http://www.gexf.net/1.2draft"));
    gexf.push_attribute(("version", "1.2"));
    writer.write_event(Event::Start(gexf))?;

    let mut meta = BytesStart::new("meta");
    let date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    meta.push_attribute(("lastmodifieddate", date.as_str()));
    writer.write_event(Event::Start(meta))?;
    writer.write_event(Event::Start(BytesStart::new("creator")))?;
    writer.write_event(Event::Text(BytesText::new("replygraph")))?;
    writer.write_event(Event::End(BytesEnd::new("creator")))?;
    writer.write_event(Event::End(BytesEnd::new("meta")))?;

    let mut g = BytesStart::new("graph");
    g.push_attribute(("defaultedgetype", "directed"));
    g.push_attribute(("mode", "static"));
    writer.write_event(Event::Start(g))?;

    // Edge attribute declaration for the comments list.
    let mut attrs = BytesStart::new("attributes");
    attrs.push_attribute(("class", "edge"));
    writer.write_event(Event::Start(attrs))?;
    let mut attr = BytesStart::new("attribute");
    attr.push_attribute(("id", "0"));
    attr.push_attribute(("title", "comments_list"));
    attr.push_attribute(("type", "string"));
    writer.write_event(Event::Empty(attr))?;
    writer.write_event(Event::End(BytesEnd::new("attributes")))?;

    writer.write_event(Event::Start(BytesStart::new("nodes")))?;
    for ix in graph.node_indices() {
        if let Some(handle) = graph.node_weight(ix) {
            let mut node = BytesStart::new("node");
            node.push_attribute(("id", handle.as_str()));
            node.push_attribute(("label", handle.as_str()));
            writer.write_event(Event::Empty(node))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("nodes")))?;

    writer.write_event(Event::Start(BytesStart::new("edges")))?;
    for (edge_id, edge) in graph.edge_references().enumerate() {
        let (Some(source), Some(target)) = (
            graph.node_weight(edge.source()),
            graph.node_weight(edge.target()),
        ) else {
            continue;
        };
        let interaction = edge.weight();

        let mut e = BytesStart::new("edge");
        let id = edge_id.to_string();
        let weight = interaction.weight.to_string();
        e.push_attribute(("id", id.as_str()));
        e.push_attribute(("source", source.as_str()));
        e.push_attribute(("target", target.as_str()));
        e.push_attribute(("weight", weight.as_str()));
        writer.write_event(Event::Start(e))?;

        let comments = serde_json::to_string(&interaction.comments)
            .context("Failed to render comments list")?;
        writer.write_event(Event::Start(BytesStart::new("attvalues")))?;
        let mut attvalue = BytesStart::new("attvalue");
        attvalue.push_attribute(("for", "0"));
        attvalue.push_attribute(("value", comments.as_str()));
        writer.write_event(Event::Empty(attvalue))?;
        writer.write_event(Event::End(BytesEnd::new("attvalues")))?;

        writer.write_event(Event::End(BytesEnd::new("edge")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("edges")))?;

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("gexf")))?;

    let bytes = writer.into_inner();
    String::from_utf8(bytes).context("GEXF output was not valid UTF-8")
}

/// Serialize the graph to `path`, truncating any previous run's file.
pub fn write_gexf(graph: &DiGraph<String, Interaction>, path: &Path) -> Result<()> {
    let xml = render_gexf(graph)?;
    fs::write(path, xml).with_context(|| format!("Failed to write {}", path.display()))
}
