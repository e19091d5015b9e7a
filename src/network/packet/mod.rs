pub mod arp;
pub mod ethernet;
pub mod icmp;
pub mod ipv4;
pub mod ipv6;
pub mod tcp;
pub mod udp;
pub mod vlan;

use bytes::Bytes;
use std::fmt;

/// デコード済みのプロトコルヘッダー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Ethernet(ethernet::EthernetHeader),
    VLAN(vlan::VLANHeader),
    ARP(arp::ARPHeader),
    IPv4(ipv4::IPv4Header),
    IPv6(ipv6::IPv6Header),
    ICMP(icmp::ICMPHeader),
    TCP(tcp::TCPHeader),
    UDP(udp::UDPHeader),
}

impl Header {
    /// フィルタと簡易表示で使う小文字のタイプ名
    pub fn type_name(&self) -> &'static str {
        match self {
            Header::Ethernet(_) => "ethernet",
            Header::VLAN(_) => "vlan",
            Header::ARP(_) => "arp",
            Header::IPv4(_) => "ipv4",
            Header::IPv6(_) => "ipv6",
            Header::ICMP(_) => "icmp",
            Header::TCP(_) => "tcp",
            Header::UDP(_) => "udp",
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Header::Ethernet(h) => fmt::Display::fmt(h, f),
            Header::VLAN(h) => fmt::Display::fmt(h, f),
            Header::ARP(h) => fmt::Display::fmt(h, f),
            Header::IPv4(h) => fmt::Display::fmt(h, f),
            Header::IPv6(h) => fmt::Display::fmt(h, f),
            Header::ICMP(h) => fmt::Display::fmt(h, f),
            Header::TCP(h) => fmt::Display::fmt(h, f),
            Header::UDP(h) => fmt::Display::fmt(h, f),
        }
    }
}

/// パケットを構成する1つの層。ヘッダーは内側の層を所有し、ペイロードは常に終端
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolLayer {
    Header {
        header: Header,
        next: Option<Box<ProtocolLayer>>,
    },
    Payload(Bytes),
}

impl ProtocolLayer {
    pub fn next(&self) -> Option<&ProtocolLayer> {
        match self {
            ProtocolLayer::Header { next, .. } => next.as_deref(),
            ProtocolLayer::Payload(_) => None,
        }
    }

    /// ペイロードには型名がない
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            ProtocolLayer::Header { header, .. } => Some(header.type_name()),
            ProtocolLayer::Payload(_) => None,
        }
    }
}

const PAYLOAD_PREVIEW_BYTES: usize = 5;

impl fmt::Display for ProtocolLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolLayer::Header { header, .. } => fmt::Display::fmt(header, f),
            ProtocolLayer::Payload(data) if data.is_empty() => write!(f, "[0 bytes]"),
            ProtocolLayer::Payload(data) => {
                let preview = data
                    .iter()
                    .take(PAYLOAD_PREVIEW_BYTES)
                    .map(|b| format!("{:02x}", b))
                    .collect::<Vec<_>>()
                    .join(" ");
                if data.len() > PAYLOAD_PREVIEW_BYTES {
                    write!(f, "[{} bytes: {} ...]", data.len(), preview)
                } else {
                    write!(f, "[{} bytes: {}]", data.len(), preview)
                }
            }
        }
    }
}

/// 1パケット分の層の連結リスト (外側から内側の順)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerChain {
    head: Option<Box<ProtocolLayer>>,
}

impl LayerChain {
    pub fn empty() -> Self {
        Self { head: None }
    }

    /// 外側から順に並んだヘッダーと、任意の終端ペイロードから連結リストを組み立てる
    pub fn from_layers(headers: Vec<Header>, payload: Option<Bytes>) -> Self {
        let tail = payload.map(|data| Box::new(ProtocolLayer::Payload(data)));
        let head = headers.into_iter().rev().fold(tail, |next, header| {
            Some(Box::new(ProtocolLayer::Header { header, next }))
        });
        Self { head }
    }

    pub fn head(&self) -> Option<&ProtocolLayer> {
        self.head.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn iter(&self) -> Layers<'_> {
        Layers {
            current: self.head(),
        }
    }
}

impl<'a> IntoIterator for &'a LayerChain {
    type Item = &'a ProtocolLayer;
    type IntoIter = Layers<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 連結リストを読み取り専用でたどるイテレータ
pub struct Layers<'a> {
    current: Option<&'a ProtocolLayer>,
}

impl<'a> Iterator for Layers<'a> {
    type Item = &'a ProtocolLayer;

    fn next(&mut self) -> Option<Self::Item> {
        let layer = self.current?;
        self.current = layer.next();
        Some(layer)
    }
}
