use pnet::packet::udp::UdpPacket;
use std::fmt;

pub const UDP_HEADER_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UDPHeader {
    pub source_port: u16,
    pub destination_port: u16,
    pub length: u16,
    pub checksum: u16,
}

impl UDPHeader {
    pub fn from_packet(packet: &UdpPacket) -> Self {
        Self {
            source_port: packet.get_source(),
            destination_port: packet.get_destination(),
            length: packet.get_length(),
            checksum: packet.get_checksum(),
        }
    }
}

impl fmt::Display for UDPHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[UDP {}>{} l:{} c:{:#06x}]",
            self.source_port, self.destination_port, self.length, self.checksum
        )
    }
}
