use pnet::packet::ethernet::EthernetPacket;
use pnet::util::MacAddr;
use std::fmt;

pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const ETHERTYPE_ARP: u16 = 0x0806;
pub const ETHERTYPE_VLAN: u16 = 0x8100;
pub const ETHERTYPE_IPV6: u16 = 0x86dd;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetHeader {
    pub source: MacAddr,
    pub destination: MacAddr,
    pub ethertype: u16,
}

impl EthernetHeader {
    pub fn new(source: MacAddr, destination: MacAddr, ethertype: u16) -> Self {
        Self {
            source,
            destination,
            ethertype,
        }
    }

    pub fn from_packet(packet: &EthernetPacket) -> Self {
        Self::new(
            packet.get_source(),
            packet.get_destination(),
            packet.get_ethertype().0,
        )
    }
}

/// イーサタイプの表示名 (未知のものは16進数)
pub fn ethertype_name(ethertype: u16) -> String {
    match ethertype {
        ETHERTYPE_IPV4 => "IP".to_string(),
        ETHERTYPE_ARP => "ARP".to_string(),
        ETHERTYPE_VLAN => "VLAN".to_string(),
        ETHERTYPE_IPV6 => "IPV6".to_string(),
        other => format!("{:#06x}", other),
    }
}

impl fmt::Display for EthernetHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}>{} {}]",
            self.source,
            self.destination,
            ethertype_name(self.ethertype)
        )
    }
}
