//! Turns a flat transaction list into a deduplicated, weighted, directed
//! multigraph centered on the queried address.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::explorer::Transaction;

use super::types::{CENTER_NODE_VALUE, GraphData, GraphLink, GraphNode, NORMAL_NODE_VALUE};

/// Only the most recent transactions are visualized; the caller supplies the
/// list pre-sorted newest-first and anything past this cap is dropped.
pub const MAX_TRANSACTIONS: usize = 50;

/// Smallest-unit to whole-unit divisor (wei per ETH).
pub const WEI_PER_ETH: f64 = 1e18;

/// Build the transaction graph for `focal_address`.
///
/// The focal address must already be validated (`explorer::is_valid_address`);
/// it is normalized to lowercase and inserted as the single center node.
/// Malformed individual transactions are skipped, never an error: a transfer
/// with no counterparty or a non-positive converted value produces no nodes
/// and no edges. Two transactions over the same ordered `(from, to)` pair
/// merge into one edge, summing value and bumping the count; the reverse
/// direction is a separate edge.
pub fn build_graph(focal_address: &str, transactions: &[Transaction]) -> GraphData {
	let focal = focal_address.to_ascii_lowercase();

	let mut nodes: Vec<GraphNode> = Vec::new();
	let mut node_index: HashMap<String, usize> = HashMap::new();
	let mut links: Vec<GraphLink> = Vec::new();
	let mut link_index: HashMap<(String, String), usize> = HashMap::new();

	node_index.insert(focal.clone(), 0);
	nodes.push(GraphNode::new(focal, CENTER_NODE_VALUE, true));

	for tx in transactions.iter().take(MAX_TRANSACTIONS) {
		let Some(to) = tx.to.as_deref().filter(|t| !t.is_empty()) else {
			continue;
		};
		// Unparseable values fall through as 0 and are filtered with the rest.
		let amount = tx.value.parse::<f64>().unwrap_or(0.0) / WEI_PER_ETH;
		if !(amount > 0.0) {
			continue;
		}

		let from = tx.from.to_ascii_lowercase();
		let to = to.to_ascii_lowercase();

		for id in [&from, &to] {
			if !node_index.contains_key(id.as_str()) {
				node_index.insert(id.clone(), nodes.len());
				nodes.push(GraphNode::new(id.clone(), NORMAL_NODE_VALUE, false));
			}
		}

		match link_index.entry((from.clone(), to.clone())) {
			Entry::Occupied(slot) => {
				let link = &mut links[*slot.get()];
				link.value += amount;
				link.count += 1;
			}
			Entry::Vacant(slot) => {
				slot.insert(links.len());
				links.push(GraphLink {
					source: from,
					target: to,
					value: amount,
					count: 1,
				});
			}
		}
	}

	GraphData { nodes, links }
}

#[cfg(test)]
mod tests {
	use super::*;

	const FOCAL: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA0001";
	const PEER_B: &str = "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB0002";
	const PEER_C: &str = "0xCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC0003";

	fn tx(from: &str, to: Option<&str>, value: &str) -> Transaction {
		Transaction {
			from: from.into(),
			to: to.map(Into::into),
			value: value.into(),
			time_stamp: "1700000000".into(),
		}
	}

	fn addr(prefix: u32) -> String {
		format!("0x{:040x}", prefix)
	}

	#[test]
	fn merges_same_ordered_pair_summing_value_and_count() {
		let txs = vec![
			tx(FOCAL, Some(PEER_B), "2000000000000000000"),
			tx(FOCAL, Some(PEER_B), "1000000000000000000"),
		];
		let graph = build_graph(FOCAL, &txs);

		assert_eq!(graph.links.len(), 1);
		let link = &graph.links[0];
		assert_eq!(link.source, FOCAL.to_ascii_lowercase());
		assert_eq!(link.target, PEER_B.to_ascii_lowercase());
		assert!((link.value - 3.0).abs() < 1e-9);
		assert_eq!(link.count, 2);
	}

	#[test]
	fn reversed_direction_is_a_separate_edge() {
		let txs = vec![
			tx(FOCAL, Some(PEER_B), "1000000000000000000"),
			tx(PEER_B, Some(FOCAL), "1000000000000000000"),
		];
		let graph = build_graph(FOCAL, &txs);

		assert_eq!(graph.links.len(), 2);
		assert_ne!(
			(&graph.links[0].source, &graph.links[0].target),
			(&graph.links[1].source, &graph.links[1].target)
		);
		for link in &graph.links {
			assert_eq!(link.count, 1);
		}
	}

	#[test]
	fn filters_missing_counterparty_and_non_positive_values() {
		let txs = vec![
			tx(FOCAL, None, "1000000000000000000"),
			tx(FOCAL, Some(""), "1000000000000000000"),
			tx(FOCAL, Some(PEER_B), "0"),
			tx(FOCAL, Some(PEER_B), "not-a-number"),
		];
		let graph = build_graph(FOCAL, &txs);

		assert_eq!(graph.links, vec![]);
		assert_eq!(graph.nodes.len(), 1);
		assert!(graph.nodes[0].is_center);
		assert!(!graph.has_activity());
	}

	#[test]
	fn caps_at_the_first_fifty_transactions() {
		let txs: Vec<Transaction> = (0..60)
			.map(|i| tx(FOCAL, Some(&addr(0x1000 + i)), "1000000000000000000"))
			.collect();
		let graph = build_graph(FOCAL, &txs);

		assert_eq!(graph.links.len(), MAX_TRANSACTIONS);
		// center + one distinct counterparty per retained transaction
		assert_eq!(graph.nodes.len(), MAX_TRANSACTIONS + 1);
		assert!(
			graph
				.links
				.iter()
				.all(|l| l.target != addr(0x1000 + 59)),
			"transactions past the cap must not appear"
		);
	}

	#[test]
	fn exactly_one_center_with_the_normalized_focal_id() {
		let txs = vec![tx(PEER_B, Some(PEER_C), "1000000000000000000")];
		let graph = build_graph(FOCAL, &txs);

		let centers: Vec<_> = graph.nodes.iter().filter(|n| n.is_center).collect();
		assert_eq!(centers.len(), 1);
		assert_eq!(centers[0].id, FOCAL.to_ascii_lowercase());
		// the focal address keeps its center weight even when transactions
		// reference it
		let graph = build_graph(FOCAL, &[tx(PEER_B, Some(FOCAL), "1000000000000000000")]);
		let center = graph.center().unwrap();
		assert_eq!(center.value, CENTER_NODE_VALUE);
	}

	#[test]
	fn identical_inputs_build_identical_graphs() {
		let txs = vec![
			tx(FOCAL, Some(PEER_B), "2000000000000000000"),
			tx(PEER_C, Some(FOCAL), "500000000000000000"),
			tx(FOCAL, Some(PEER_B), "1000000000000000000"),
		];
		assert_eq!(build_graph(FOCAL, &txs), build_graph(FOCAL, &txs));
	}

	#[test]
	fn worked_scenario_from_three_transfers() {
		let txs = vec![
			tx(FOCAL, Some(PEER_B), "2000000000000000000"),
			tx(FOCAL, Some(PEER_B), "1000000000000000000"),
			tx(PEER_C, Some(FOCAL), "500000000000000000"),
		];
		let graph = build_graph(FOCAL, &txs);

		let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(
			ids,
			vec![
				FOCAL.to_ascii_lowercase(),
				PEER_B.to_ascii_lowercase(),
				PEER_C.to_ascii_lowercase()
			]
		);
		assert!(graph.nodes[0].is_center);
		assert_eq!(graph.nodes[0].value, CENTER_NODE_VALUE);
		assert_eq!(graph.nodes[1].value, NORMAL_NODE_VALUE);

		assert_eq!(graph.links.len(), 2);
		let outgoing = &graph.links[0];
		assert!((outgoing.value - 3.0).abs() < 1e-9);
		assert_eq!(outgoing.count, 2);
		let incoming = &graph.links[1];
		assert_eq!(incoming.source, PEER_C.to_ascii_lowercase());
		assert!((incoming.value - 0.5).abs() < 1e-9);
		assert_eq!(incoming.count, 1);
	}

	#[test]
	fn uppercase_and_lowercase_counterparties_merge() {
		let txs = vec![
			tx(FOCAL, Some(&PEER_B.to_ascii_uppercase().replace("0X", "0x")), "1000000000000000000"),
			tx(FOCAL, Some(&PEER_B.to_ascii_lowercase()), "1000000000000000000"),
		];
		let graph = build_graph(FOCAL, &txs);
		assert_eq!(graph.links.len(), 1);
		assert_eq!(graph.links[0].count, 2);
	}
}
