use valuenet::parse::{GateKind, ModelGraph, ModelNode, NodeKind, ValueNetwork};

// =============================================================================
// Network builder
// =============================================================================

/// Builds value networks node by node. Owners of a signal dot get it as
/// `<id>.dot`; gates get `<id>.unit` and `<id>.fan1`, `<id>.fan2`, ...
#[derive(Default)]
pub struct NetworkBuilder {
    nodes: Vec<ModelNode>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, id: &str, parent: Option<&str>, kind: NodeKind) -> &mut Self {
        self.nodes.push(ModelNode::new(id, parent, kind));
        self
    }

    pub fn actor(&mut self, id: &str) -> &mut Self {
        self.node(id, None, NodeKind::Actor { name: Some(id.into()) })
    }

    pub fn start(&mut self, id: &str, parent: Option<&str>, occurrences: Option<&str>) -> &mut Self {
        self.node(
            id,
            parent,
            NodeKind::StartSignal {
                occurrences: occurrences.map(str::to_string),
            },
        );
        self.node(&dot(id), Some(id), NodeKind::SignalDot)
    }

    pub fn end(&mut self, id: &str, parent: Option<&str>) -> &mut Self {
        self.node(id, parent, NodeKind::EndSignal);
        self.node(&dot(id), Some(id), NodeKind::SignalDot)
    }

    pub fn interface(&mut self, id: &str, parent: Option<&str>) -> &mut Self {
        self.node(id, parent, NodeKind::ValueInterface { name: None });
        self.node(&dot(id), Some(id), NodeKind::SignalDot)
    }

    pub fn port(&mut self, id: &str, interface: &str, incoming: bool) -> &mut Self {
        self.node(id, Some(interface), NodeKind::ValuePort { incoming })
    }

    pub fn gate(&mut self, id: &str, gate: GateKind, fans: usize) -> &mut Self {
        self.node(id, None, NodeKind::LogicBase { gate });
        self.node(
            &format!("{}.unit", id),
            Some(id),
            NodeKind::LogicDot {
                is_unit: true,
                proportion: 1,
            },
        );
        for n in 1..=fans {
            self.node(
                &format!("{}.fan{}", id, n),
                Some(id),
                NodeKind::LogicDot {
                    is_unit: false,
                    proportion: 1,
                },
            );
        }
        self
    }

    pub fn connect(&mut self, id: &str, source: &str, target: &str) -> &mut Self {
        self.node(
            id,
            None,
            NodeKind::ConnectionElement {
                source: source.into(),
                target: target.into(),
            },
        )
    }

    pub fn exchange(&mut self, id: &str, source: &str, target: &str, object: Option<&str>) -> &mut Self {
        self.node(
            id,
            None,
            NodeKind::ValueExchange {
                source: source.into(),
                target: target.into(),
                value_object: object.map(str::to_string),
            },
        )
    }

    pub fn remove(&mut self, id: &str) -> &mut Self {
        self.nodes.retain(|n| n.id != id);
        self
    }

    pub fn set_occurrences(&mut self, start: &str, occurrences: Option<&str>) -> &mut Self {
        for node in &mut self.nodes {
            if node.id == start {
                node.kind = NodeKind::StartSignal {
                    occurrences: occurrences.map(str::to_string),
                };
            }
        }
        self
    }

    pub fn network(&self) -> ValueNetwork {
        ValueNetwork {
            id: "test-network".into(),
            name: "Test Network".into(),
            nodes: self.nodes.clone(),
        }
    }

    pub fn graph(&self) -> ModelGraph {
        ModelGraph::build(&self.network()).expect("network should build")
    }
}

pub fn dot(owner: &str) -> String {
    format!("{}.dot", owner)
}

// =============================================================================
// Networks
// =============================================================================

/// Buyer pays seller for goods. The signal starts at the buyer, runs through
/// both exchanges and ends at the seller.
pub fn buyer_seller() -> NetworkBuilder {
    let mut b = NetworkBuilder::new();
    b.actor("buyer")
        .actor("seller")
        .start("s", Some("buyer"), Some("10"))
        .end("e", Some("seller"))
        .interface("buyer_vi", Some("buyer"))
        .port("buyer_out", "buyer_vi", false)
        .port("buyer_in", "buyer_vi", true)
        .interface("seller_vi", Some("seller"))
        .port("seller_in", "seller_vi", true)
        .port("seller_out", "seller_vi", false)
        .exchange("pay", "buyer_out", "seller_in", Some("money"))
        .exchange("deliver", "seller_out", "buyer_in", Some("goods"))
        .connect("ce1", "s.dot", "buyer_vi.dot")
        .connect("ce2", "seller_vi.dot", "e.dot");
    b
}

/// Two start signals merge in an AND gate that leads to one end signal.
pub fn merging_gate(first_rate: &str, second_rate: &str) -> NetworkBuilder {
    let mut b = NetworkBuilder::new();
    b.start("s1", None, Some(first_rate))
        .start("s2", None, Some(second_rate))
        .end("e", None)
        .gate("g", GateKind::And, 2)
        .connect("ce1", "s1.dot", "g.fan1")
        .connect("ce2", "s2.dot", "g.fan2")
        .connect("ce3", "g.unit", "e.dot");
    b
}

/// One start signal forks in an OR gate into two end signals.
pub fn forking_gate() -> NetworkBuilder {
    let mut b = NetworkBuilder::new();
    b.start("s", None, Some("1"))
        .end("e1", None)
        .end("e2", None)
        .gate("g", GateKind::Or, 2)
        .connect("ce0", "s.dot", "g.unit")
        .connect("ce1", "g.fan1", "e1.dot")
        .connect("ce2", "g.fan2", "e2.dot");
    b
}
