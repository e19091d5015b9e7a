use pnet::packet::ipv4::Ipv4Packet;
use std::fmt;

pub const PROTOCOL_ICMP: u8 = 1;
pub const PROTOCOL_TCP: u8 = 6;
pub const PROTOCOL_UDP: u8 = 17;
pub const PROTOCOL_ICMPV6: u8 = 58;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IPv4Header {
    pub version: u8,
    pub ihl: u8,
    pub dscp: u8,
    pub ecn: u8,
    pub total_length: u16,
    pub identification: u16,
    pub flags: u8,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub source: std::net::Ipv4Addr,
    pub destination: std::net::Ipv4Addr,
}

impl IPv4Header {
    pub fn from_packet(packet: &Ipv4Packet) -> Self {
        Self {
            version: packet.get_version(),
            ihl: packet.get_header_length(),
            dscp: packet.get_dscp(),
            ecn: packet.get_ecn(),
            total_length: packet.get_total_length(),
            identification: packet.get_identification(),
            flags: packet.get_flags(),
            fragment_offset: packet.get_fragment_offset(),
            ttl: packet.get_ttl(),
            protocol: packet.get_next_level_protocol().0,
            checksum: packet.get_checksum(),
            source: packet.get_source(),
            destination: packet.get_destination(),
        }
    }

    /// ヘッダー長 (バイト)
    pub fn header_len(&self) -> usize {
        self.ihl as usize * 4
    }

    pub fn is_fragment(&self) -> bool {
        self.fragment_offset != 0
    }
}

/// IPプロトコル番号の表示名
pub fn ip_protocol_name(protocol: u8) -> String {
    match protocol {
        PROTOCOL_ICMP => "ICMP".to_string(),
        PROTOCOL_TCP => "TCP".to_string(),
        PROTOCOL_UDP => "UDP".to_string(),
        PROTOCOL_ICMPV6 => "ICMPv6".to_string(),
        other => other.to_string(),
    }
}

impl fmt::Display for IPv4Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[IP+{} {}>{} (cs:{:#06x} v:{} hl:{} l:{} t:{})]",
            ip_protocol_name(self.protocol),
            self.source,
            self.destination,
            self.checksum,
            self.version,
            self.ihl,
            self.total_length,
            self.ttl
        )
    }
}
