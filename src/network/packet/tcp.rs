use pnet::packet::tcp::TcpPacket;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TCPHeader {
    pub source_port: u16,
    pub destination_port: u16,
    pub sequence_number: u32,
    pub acknowledgment_number: u32,
    pub data_offset: u8,
    pub flags: TCPFlags,
    pub window_size: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TCPFlags {
    pub urg: bool,
    pub ack: bool,
    pub psh: bool,
    pub rst: bool,
    pub syn: bool,
    pub fin: bool,
}

impl TCPFlags {
    pub fn from_bits(bits: u8) -> Self {
        Self {
            urg: (bits & 0x20) != 0,
            ack: (bits & 0x10) != 0,
            psh: (bits & 0x08) != 0,
            rst: (bits & 0x04) != 0,
            syn: (bits & 0x02) != 0,
            fin: (bits & 0x01) != 0,
        }
    }
}

impl fmt::Display for TCPFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = [
            (self.urg, 'U'),
            (self.ack, 'A'),
            (self.psh, 'P'),
            (self.rst, 'R'),
            (self.syn, 'S'),
            (self.fin, 'F'),
        ];
        for (set, letter) in letters {
            if set {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

impl TCPHeader {
    pub fn from_packet(packet: &TcpPacket) -> Self {
        Self {
            source_port: packet.get_source(),
            destination_port: packet.get_destination(),
            sequence_number: packet.get_sequence(),
            acknowledgment_number: packet.get_acknowledgement(),
            data_offset: packet.get_data_offset(),
            flags: TCPFlags::from_bits(packet.get_flags() as u8),
            window_size: packet.get_window(),
            checksum: packet.get_checksum(),
            urgent_pointer: packet.get_urgent_ptr(),
        }
    }

    /// オプションを含むヘッダー長 (バイト)
    pub fn header_len(&self) -> usize {
        self.data_offset as usize * 4
    }
}

impl fmt::Display for TCPHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[TCP {}>{} seq:{} ack:{} f:{} win:{}]",
            self.source_port,
            self.destination_port,
            self.sequence_number,
            self.acknowledgment_number,
            self.flags,
            self.window_size
        )
    }
}
