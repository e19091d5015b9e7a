use pnet::packet::arp::ArpPacket;
use pnet::util::MacAddr;
use std::fmt;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ARPHeader {
    pub hardware_type: u16,
    pub protocol_type: u16,
    pub operation: u16,
    pub sender_hw_addr: MacAddr,
    pub sender_proto_addr: Ipv4Addr,
    pub target_hw_addr: MacAddr,
    pub target_proto_addr: Ipv4Addr,
}

impl ARPHeader {
    pub fn from_packet(packet: &ArpPacket) -> Self {
        Self {
            hardware_type: packet.get_hardware_type().0,
            protocol_type: packet.get_protocol_type().0,
            operation: packet.get_operation().0,
            sender_hw_addr: packet.get_sender_hw_addr(),
            sender_proto_addr: packet.get_sender_proto_addr(),
            target_hw_addr: packet.get_target_hw_addr(),
            target_proto_addr: packet.get_target_proto_addr(),
        }
    }

    fn operation_name(&self) -> String {
        match self.operation {
            1 => "REQUEST".to_string(),
            2 => "REPLY".to_string(),
            3 => "REV_REQUEST".to_string(),
            4 => "REV_REPLY".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ARPHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ARP {} hw:{} p:{:#06x} {}>{} {}>{}]",
            self.operation_name(),
            self.hardware_type,
            self.protocol_type,
            self.sender_hw_addr,
            self.target_hw_addr,
            self.sender_proto_addr,
            self.target_proto_addr
        )
    }
}
