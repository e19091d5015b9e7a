use crate::network::packet::arp::ARPHeader;
use crate::network::packet::ethernet::{
    EthernetHeader, ETHERTYPE_ARP, ETHERTYPE_IPV4, ETHERTYPE_IPV6, ETHERTYPE_VLAN,
};
use crate::network::packet::icmp::{ICMPHeader, ICMP_HEADER_LEN};
use crate::network::packet::ipv4::{IPv4Header, PROTOCOL_ICMP, PROTOCOL_TCP, PROTOCOL_UDP};
use crate::network::packet::ipv6::{IPv6Header, IPV6_HEADER_LEN};
use crate::network::packet::tcp::TCPHeader;
use crate::network::packet::udp::{UDPHeader, UDP_HEADER_LEN};
use crate::network::packet::vlan::VLANHeader;
use crate::network::packet::{Header, LayerChain};
use bytes::Bytes;
use pnet::packet::arp::ArpPacket;
use pnet::packet::ethernet::EthernetPacket;
use pnet::packet::icmp::IcmpPacket;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::tcp::TcpPacket;
use pnet::packet::udp::UdpPacket;
use pnet::packet::vlan::VlanPacket;

const ETHERNET_HEADER_LEN: usize = 14;
const VLAN_HEADER_LEN: usize = 4;
const ARP_HEADER_LEN: usize = 28;

/// 次にデコードする層
enum Next<'a> {
    EtherType(u16, &'a [u8]),
    Protocol(u8, &'a [u8]),
    Payload(&'a [u8]),
}

/// イーサネットフレームを層の連結リストにデコードする
///
/// ヘッダーとして解釈できなかった残りのバイト列は終端のペイロードになる。
/// 切り詰められたフレームもエラーにはならない。空のペイロードは連結しない。
pub fn decode_frame(frame: &[u8]) -> LayerChain {
    let mut headers = Vec::new();

    let mut next = match EthernetPacket::new(frame) {
        Some(ethernet) => {
            let header = EthernetHeader::from_packet(&ethernet);
            let ethertype = header.ethertype;
            headers.push(Header::Ethernet(header));
            Next::EtherType(ethertype, &frame[ETHERNET_HEADER_LEN..])
        }
        None => Next::Payload(frame),
    };

    let payload = loop {
        next = match next {
            Next::EtherType(ethertype, data) => decode_ethertype(ethertype, data, &mut headers),
            Next::Protocol(protocol, data) => decode_protocol(protocol, data, &mut headers),
            Next::Payload(data) => break data,
        };
    };

    let payload = if payload.is_empty() {
        None
    } else {
        Some(Bytes::copy_from_slice(payload))
    };

    LayerChain::from_layers(headers, payload)
}

fn decode_ethertype<'a>(ethertype: u16, data: &'a [u8], headers: &mut Vec<Header>) -> Next<'a> {
    match ethertype {
        ETHERTYPE_VLAN => match VlanPacket::new(data) {
            Some(vlan) => {
                let header = VLANHeader::from_packet(&vlan);
                let inner = header.ethertype;
                headers.push(Header::VLAN(header));
                Next::EtherType(inner, &data[VLAN_HEADER_LEN..])
            }
            None => Next::Payload(data),
        },
        ETHERTYPE_ARP => match ArpPacket::new(data) {
            Some(arp) => {
                headers.push(Header::ARP(ARPHeader::from_packet(&arp)));
                Next::Payload(&data[ARP_HEADER_LEN..])
            }
            None => Next::Payload(data),
        },
        ETHERTYPE_IPV4 => decode_ipv4(data, headers),
        ETHERTYPE_IPV6 => match Ipv6Packet::new(data) {
            Some(ipv6) => {
                let header = IPv6Header::from_packet(&ipv6);
                let protocol = header.next_header;
                let end = (IPV6_HEADER_LEN + header.payload_length as usize).min(data.len());
                headers.push(Header::IPv6(header));
                Next::Protocol(protocol, &data[IPV6_HEADER_LEN..end])
            }
            None => Next::Payload(data),
        },
        _ => Next::Payload(data),
    }
}

fn decode_ipv4<'a>(data: &'a [u8], headers: &mut Vec<Header>) -> Next<'a> {
    let ipv4 = match Ipv4Packet::new(data) {
        Some(ipv4) => IPv4Header::from_packet(&ipv4),
        None => return Next::Payload(data),
    };

    let header_len = ipv4.header_len();
    if header_len < 20 || header_len > data.len() {
        return Next::Payload(data);
    }

    // total_length はキャプチャ長より長いことがある (切り詰め)
    let total_length = ipv4.total_length as usize;
    let end = if total_length >= header_len {
        total_length.min(data.len())
    } else {
        data.len()
    };

    let protocol = ipv4.protocol;
    let fragment = ipv4.is_fragment();
    headers.push(Header::IPv4(ipv4));

    if fragment {
        // 後続フラグメントにはトランスポートヘッダーがない
        Next::Payload(&data[header_len..end])
    } else {
        Next::Protocol(protocol, &data[header_len..end])
    }
}

fn decode_protocol<'a>(protocol: u8, data: &'a [u8], headers: &mut Vec<Header>) -> Next<'a> {
    match protocol {
        PROTOCOL_TCP => match TcpPacket::new(data) {
            Some(tcp) => {
                let header = TCPHeader::from_packet(&tcp);
                let header_len = header.header_len();
                if header_len < 20 || header_len > data.len() {
                    return Next::Payload(data);
                }
                headers.push(Header::TCP(header));
                Next::Payload(&data[header_len..])
            }
            None => Next::Payload(data),
        },
        PROTOCOL_UDP => match UdpPacket::new(data) {
            Some(udp) => {
                headers.push(Header::UDP(UDPHeader::from_packet(&udp)));
                Next::Payload(&data[UDP_HEADER_LEN..])
            }
            None => Next::Payload(data),
        },
        PROTOCOL_ICMP => match IcmpPacket::new(data) {
            Some(icmp) => {
                headers.push(Header::ICMP(ICMPHeader::from_packet(&icmp)));
                Next::Payload(&data[ICMP_HEADER_LEN..])
            }
            None => Next::Payload(data),
        },
        _ => Next::Payload(data),
    }
}
