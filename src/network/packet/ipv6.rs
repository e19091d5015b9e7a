use crate::network::packet::ipv4::ip_protocol_name;
use pnet::packet::ipv6::Ipv6Packet;
use std::fmt;

pub const IPV6_HEADER_LEN: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IPv6Header {
    pub version: u8,
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_length: u16,
    pub next_header: u8,
    pub hop_limit: u8,
    pub source: std::net::Ipv6Addr,
    pub destination: std::net::Ipv6Addr,
}

impl IPv6Header {
    pub fn from_packet(packet: &Ipv6Packet) -> Self {
        Self {
            version: packet.get_version(),
            traffic_class: packet.get_traffic_class(),
            flow_label: packet.get_flow_label(),
            payload_length: packet.get_payload_length(),
            next_header: packet.get_next_header().0,
            hop_limit: packet.get_hop_limit(),
            source: packet.get_source(),
            destination: packet.get_destination(),
        }
    }
}

impl fmt::Display for IPv6Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[IPv6+{} {}>{} (tc:{} fl:{} pl:{} hl:{})]",
            ip_protocol_name(self.next_header),
            self.source,
            self.destination,
            self.traffic_class,
            self.flow_label,
            self.payload_length,
            self.hop_limit
        )
    }
}
