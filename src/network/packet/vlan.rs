use crate::network::packet::ethernet::ethertype_name;
use pnet::packet::vlan::VlanPacket;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VLANHeader {
    pub priority: u8,
    pub drop_eligible: bool,
    pub vlan_id: u16,
    pub ethertype: u16,
}

impl VLANHeader {
    pub fn from_packet(packet: &VlanPacket) -> Self {
        Self {
            priority: packet.get_priority_code_point().0,
            drop_eligible: packet.get_drop_eligible_indicator() != 0,
            vlan_id: packet.get_vlan_identifier(),
            ethertype: packet.get_ethertype().0,
        }
    }
}

impl fmt::Display for VLANHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[VLAN vlan:{} pcp:{} {}]",
            self.vlan_id,
            self.priority,
            ethertype_name(self.ethertype)
        )
    }
}
