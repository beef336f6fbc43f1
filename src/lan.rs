use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::ethernet::{ByteSerializable, Ethernet802_3Frame, STP_GROUP_ADDRESS};
use crate::link::{FrameQueue, LinkStatus, PortLink};
use crate::stp::{Bridge, PortNo};
use crate::tick::Tickable;

pub type BridgeIndex = usize;

/// Upper bound on delivery rounds per tick; each round can only trigger replies, never loops.
const MAX_ROUNDS_PER_TICK: usize = 64;

/// Simulates the movement of BPDUs between bridges.
///
/// Holds a collection of bridges and the segments joining their ports, and moves queued frames
/// between them in a synchronous manner. A segment may join any number of ports, so shared media
/// are modelled as well as point-to-point cables.
pub struct LanSimulator {
    bridges: Vec<Bridge<FrameQueue>>,
    segments: Vec<Vec<(BridgeIndex, PortNo)>>,
    loss: Option<(f64, StdRng)>,
    delivered: usize,
    dropped: usize,
}

impl Default for LanSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl LanSimulator {
    pub fn new() -> LanSimulator {
        LanSimulator {
            bridges: Vec::new(),
            segments: Vec::new(),
            loss: None,
            delivered: 0,
            dropped: 0,
        }
    }

    /// Drops each delivered frame with the given probability, reproducibly for a given seed.
    pub fn with_loss(mut self, probability: f64, seed: u64) -> LanSimulator {
        self.loss = Some((probability.clamp(0.0, 1.0), StdRng::seed_from_u64(seed)));
        self
    }

    /// Adds a bridge to the simulator.
    pub fn add(&mut self, bridge: Bridge<FrameQueue>) -> BridgeIndex {
        self.bridges.push(bridge);
        self.bridges.len() - 1
    }

    pub fn bridge(&self, index: BridgeIndex) -> &Bridge<FrameQueue> {
        &self.bridges[index]
    }

    pub fn bridge_mut(&mut self, index: BridgeIndex) -> &mut Bridge<FrameQueue> {
        &mut self.bridges[index]
    }

    pub fn bridges(&self) -> &[Bridge<FrameQueue>] {
        &self.bridges
    }

    /// Joins the given ports into one segment. A port belongs to at most one segment; joining it
    /// again moves it.
    pub fn segment(&mut self, members: &[(BridgeIndex, PortNo)]) {
        for member in members {
            for segment in self.segments.iter_mut() {
                segment.retain(|m| m != member);
            }
        }
        self.segments.retain(|s| !s.is_empty());
        self.segments.push(members.to_vec());
    }

    /// Shorthand for a point-to-point cable between two bridge ports.
    pub fn connect(&mut self, a: BridgeIndex, a_port: PortNo, b: BridgeIndex, b_port: PortNo) {
        self.segment(&[(a, a_port), (b, b_port)]);
    }

    /// Reports the link behind a bridge port as up or down; the bridge notices on its next tick.
    pub fn set_link(&mut self, index: BridgeIndex, port: PortNo, up: bool) {
        let status = if up { LinkStatus::Up } else { LinkStatus::Down };
        self.bridges[index].link_mut().set_link_status(port, status);
    }

    pub fn init_all(&mut self) {
        for bridge in self.bridges.iter_mut() {
            bridge.init();
        }
        self.settle();
    }

    /// Moves every queued frame once. Returns the number of frames handed to a receiving port.
    pub fn transmit(&mut self) -> usize {
        let mut deliveries: Vec<(BridgeIndex, PortNo, Bytes)> = Vec::new();

        for (index, bridge) in self.bridges.iter_mut().enumerate() {
            for (port, payload) in bridge.link_mut().drain_outgoing() {
                let source = match bridge.port(port) {
                    Some(p) => p.address(),
                    None => continue,
                };
                if !bridge.link().link_status(port).is_up() {
                    continue; // No carrier, the frame goes nowhere
                }

                let frame = Ethernet802_3Frame::new(STP_GROUP_ADDRESS, source, payload).to_bytes();
                let peers = self
                    .segments
                    .iter()
                    .filter(|s| s.contains(&(index, port)))
                    .flat_map(|s| s.iter().copied())
                    .filter(|member| *member != (index, port));

                for (peer, peer_port) in peers {
                    deliveries.push((peer, peer_port, frame.clone()));
                }
            }
        }

        let mut moved = 0;
        for (peer, peer_port, frame) in deliveries {
            if !self.bridges[peer].link().link_status(peer_port).is_up() {
                continue;
            }
            if let Some((probability, rng)) = self.loss.as_mut() {
                if rng.gen_bool(*probability) {
                    trace!(bridge = peer, port = %peer_port, "frame lost");
                    self.dropped += 1;
                    continue;
                }
            }

            self.bridges[peer].input_frame(peer_port, &frame);
            moved += 1;
        }

        self.delivered += moved;
        moved
    }

    /// Delivers frames until no bridge has anything left to send.
    pub fn settle(&mut self) {
        for _ in 0..MAX_ROUNDS_PER_TICK {
            if self.transmit() == 0 && self.is_quiet() {
                return;
            }
        }
    }

    fn is_quiet(&self) -> bool {
        self.bridges
            .iter()
            .all(|b| b.link().outgoing().is_empty())
    }

    /// Advances every bridge by one second and lets the resulting frames settle.
    pub fn tick(&mut self) {
        for bridge in self.bridges.iter_mut() {
            bridge.tick();
        }
        self.settle();
    }

    pub fn run(&mut self, seconds: usize) {
        for _ in 0..seconds {
            self.tick();
        }
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
