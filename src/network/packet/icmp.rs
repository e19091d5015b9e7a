use pnet::packet::icmp::IcmpPacket;
use std::fmt;

pub const ICMP_HEADER_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ICMPHeader {
    pub icmp_type: u8,
    pub icmp_code: u8,
    pub checksum: u16,
}

impl ICMPHeader {
    pub fn from_packet(packet: &IcmpPacket) -> Self {
        Self {
            icmp_type: packet.get_icmp_type().0,
            icmp_code: packet.get_icmp_code().0,
            checksum: packet.get_checksum(),
        }
    }

    fn type_name(&self) -> String {
        match self.icmp_type {
            0 => "ECHO_REPLY".to_string(),
            3 => "DEST_UNREACH".to_string(),
            5 => "REDIRECT".to_string(),
            8 => "ECHO_REQUEST".to_string(),
            11 => "TIME_EXCEEDED".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ICMPHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ICMP t:{} c:{} chk:{:#x}]",
            self.type_name(),
            self.icmp_code,
            self.checksum
        )
    }
}
