use crate::ethernet::ByteSerializable;
use crate::lan::{BridgeIndex, LanSimulator};
use crate::stp::{
    Bpdu, BridgeId, ConfigBpdu, PortId, DEFAULT_FORWARD_DELAY, DEFAULT_HELLO_TIME, DEFAULT_MAX_AGE,
};
use crate::{mac_addr, Bridge, BridgeConfig, FrameQueue, PortConfig, PortNo, PortState};

/// Installs a test log writer when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a stopped bridge with `ports` ports numbered from 1. Port `n` has the address
/// `mac_addr!(seed + n)`, so the bridge address is `mac_addr!(seed + 1)`.
pub fn bridge_from_seed(seed: u64, priority: u16, ports: u8) -> Bridge<FrameQueue> {
    init_tracing();

    let mut bridge = Bridge::new(BridgeConfig::default().with_priority(priority), FrameQueue::new())
        .expect("default config is valid");
    for n in 1..=ports {
        bridge
            .add_port(PortNo(n), mac_addr!(seed + n as u64), PortConfig::default())
            .expect("port enrolls");
    }
    bridge
}

/// A running bridge with its first round of BPDUs drained and its hold timers expired.
pub fn settled_bridge(seed: u64, priority: u16, ports: u8) -> Bridge<FrameQueue> {
    use crate::Tickable;

    let mut bridge = bridge_from_seed(seed, priority, ports);
    bridge.init();
    bridge.tick();
    bridge.link_mut().drain_outgoing();
    bridge.link_mut().drain_flushed();
    bridge
}

/// Configuration advertised by `bridge` on behalf of `root`, with default timer values.
pub fn config(root: BridgeId, cost: u32, bridge: BridgeId, port_id: PortId) -> ConfigBpdu {
    ConfigBpdu {
        root_id: root,
        root_path_cost: cost,
        bridge_id: bridge,
        port_id,
        message_age: 0,
        max_age: DEFAULT_MAX_AGE,
        hello_time: DEFAULT_HELLO_TIME,
        forward_delay: DEFAULT_FORWARD_DELAY,
        topology_change: false,
        topology_change_ack: false,
    }
}

/// Decodes everything the bridge has queued.
pub fn sent(bridge: &Bridge<FrameQueue>) -> Vec<(PortNo, Bpdu)> {
    bridge
        .link()
        .outgoing()
        .iter()
        .map(|(no, bytes)| (*no, Bpdu::from_bytes(bytes).expect("engine emits valid BPDUs")))
        .collect()
}

pub fn sent_configs(bridge: &Bridge<FrameQueue>) -> Vec<(PortNo, ConfigBpdu)> {
    sent(bridge)
        .into_iter()
        .filter_map(|(no, bpdu)| match bpdu {
            Bpdu::Config(cu) => Some((no, cu)),
            Bpdu::Tcn => None,
        })
        .collect()
}

pub fn sent_tcns(bridge: &Bridge<FrameQueue>) -> Vec<PortNo> {
    sent(bridge)
        .into_iter()
        .filter(|(_, bpdu)| *bpdu == Bpdu::Tcn)
        .map(|(no, _)| no)
        .collect()
}

pub fn state(bridge: &Bridge<FrameQueue>, no: u8) -> PortState {
    bridge.port(PortNo(no)).expect("port exists").state()
}

/// Panics if the forwarding ports of running bridges close a loop, or if following root ports
/// from any running bridge does not end at the root.
pub fn assert_loop_free(sim: &LanSimulator, segments: &[Vec<(BridgeIndex, PortNo)>]) {
    let bridges = sim.bridges();
    let mut parent: Vec<usize> = (0..bridges.len()).collect();

    fn find(parent: &mut Vec<usize>, i: usize) -> usize {
        let mut root = i;
        while parent[root] != root {
            root = parent[root];
        }
        parent[i] = root;
        root
    }

    for segment in segments {
        let forwarding: Vec<BridgeIndex> = segment
            .iter()
            .filter(|(b, no)| {
                bridges[*b].is_running()
                    && bridges[*b].port(*no).map(|p| p.state()) == Some(PortState::Forwarding)
            })
            .map(|(b, _)| *b)
            .collect();

        for pair in forwarding.windows(2) {
            let (x, y) = (find(&mut parent, pair[0]), find(&mut parent, pair[1]));
            assert_ne!(x, y, "forwarding loop through segment {:?}", segment);
            parent[x] = y;
        }
    }

    for (index, bridge) in bridges.iter().enumerate().filter(|(_, b)| b.is_running()) {
        let mut current = index;
        for _ in 0..=bridges.len() {
            let here = &bridges[current];
            let root_port = match here.root_port() {
                Some(no) => no,
                None => break,
            };
            let upstream = here.port(root_port).expect("root port exists").designated_bridge();
            current = bridges
                .iter()
                .position(|b| b.bridge_id() == upstream)
                .expect("upstream bridge is part of the simulation");
        }
        assert!(
            bridges[current].is_root_bridge(),
            "root port chain from bridge {} ({}) does not reach a root",
            index,
            bridge.bridge_id()
        );
    }
}
