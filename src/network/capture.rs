use crate::core::error::{DumpError, DumpResult};
use crate::dump::event::{ChannelSource, PacketEvent};
use crate::network::decoder::decode_frame;
use log::{debug, error, warn};
use pnet::datalink::{self, Channel, DataLinkReceiver, NetworkInterface};
use std::io;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::Sender;

/// キャプチャ上限の最大値
pub const MAX_CAPTURE_LENGTH: u16 = 0xffff;
/// 既定のキャプチャ上限 (バイト)
pub const DEFAULT_CAPTURE_LENGTH: u16 = 128;

const EVENT_CHANNEL_CAPACITY: usize = 1024;
/// 受信側の終了を確認する間隔
const READ_TIMEOUT: Duration = Duration::from_millis(500);
/// 連続した読み取りエラーがこの回数に達したらキャプチャを止める
const MAX_CONSECUTIVE_READ_ERRORS: u32 = 10;
/// 読み取りエラー1回あたりの待機時間 (連続回数に比例して伸ばす)
const READ_ERROR_BACKOFF: Duration = Duration::from_millis(10);

/// キャプチャ層の設定操作
pub trait CaptureControl {
    /// 1パケットあたりのキャプチャ上限を設定する
    fn set_capture_limit(&mut self, limit: u16);
}

pub struct PacketCapture {
    interface: NetworkInterface,
    capture_limit: u16,
}

impl PacketCapture {
    pub fn new(interface: NetworkInterface) -> Self {
        Self {
            interface,
            capture_limit: DEFAULT_CAPTURE_LENGTH,
        }
    }

    pub fn capture_limit(&self) -> u16 {
        self.capture_limit
    }

    /// キャプチャを開始し、デコード済みのイベントを流すソースを返す
    pub fn start(self) -> DumpResult<ChannelSource> {
        let config = datalink::Config {
            read_buffer_size: (self.capture_limit as usize).max(4096),
            read_timeout: Some(READ_TIMEOUT),
            ..Default::default()
        };

        let mut rx = match datalink::channel(&self.interface, config) {
            Ok(Channel::Ethernet(_, rx)) => rx,
            Ok(_) => {
                return Err(DumpError::Capture(io::Error::new(
                    io::ErrorKind::Other,
                    "未サポートのチャネルタイプです",
                )))
            }
            Err(e) => return Err(DumpError::Capture(e)),
        };

        let (sender, source) = ChannelSource::channel(EVENT_CHANNEL_CAPACITY);
        let device_id = self.interface.name.clone();
        let capture_limit = self.capture_limit as usize;

        tokio::task::spawn_blocking(move || {
            let stop = pump_frames(&mut *rx, &sender, &device_id, capture_limit);
            debug!("キャプチャを停止しました: {} ({:?})", device_id, stop);
        });

        Ok(source)
    }
}

/// キャプチャループが終了した理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureStop {
    /// イベントの受信側が閉じられた
    ReceiverClosed,
    /// 読み取りエラーが続いた
    ReadErrors,
}

/// 受信側が閉じられるか、読み取りエラーが続くまでフレームを流し続ける
fn pump_frames(
    rx: &mut dyn DataLinkReceiver,
    sender: &Sender<PacketEvent>,
    device_id: &str,
    capture_limit: usize,
) -> CaptureStop {
    let mut consecutive_errors = 0;

    loop {
        match rx.next() {
            Ok(frame) => {
                consecutive_errors = 0;
                let captured = &frame[..frame.len().min(capture_limit)];
                let event = PacketEvent::new(device_id, decode_frame(captured));
                if sender.blocking_send(event).is_err() {
                    return CaptureStop::ReceiverClosed;
                }
            }
            Err(e) if is_idle(&e) => {
                if sender.is_closed() {
                    return CaptureStop::ReceiverClosed;
                }
            }
            Err(e) => {
                consecutive_errors += 1;
                if consecutive_errors >= MAX_CONSECUTIVE_READ_ERRORS {
                    error!(
                        "読み取りエラーが{}回続いたため、キャプチャを停止します: {}: {}",
                        consecutive_errors, device_id, e
                    );
                    return CaptureStop::ReadErrors;
                }
                warn!("パケットの読み取り中にエラーが発生しました: {}", e);
                if sender.is_closed() {
                    return CaptureStop::ReceiverClosed;
                }
                thread::sleep(READ_ERROR_BACKOFF * consecutive_errors);
            }
        }
    }
}

/// 読み取りタイムアウトとシグナル割り込みはエラーとして数えない
fn is_idle(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

impl CaptureControl for PacketCapture {
    fn set_capture_limit(&mut self, limit: u16) {
        self.capture_limit = limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::packet::{Header, ProtocolLayer};
    use std::collections::VecDeque;
    use tokio::sync::mpsc;

    /// 決められた順に結果を返す受信器。尽きたらタイムアウトを返し続ける
    struct ScriptedReceiver {
        script: VecDeque<io::Result<Vec<u8>>>,
        current: Vec<u8>,
    }

    impl ScriptedReceiver {
        fn new(script: Vec<io::Result<Vec<u8>>>) -> Self {
            Self {
                script: script.into(),
                current: Vec::new(),
            }
        }
    }

    impl DataLinkReceiver for ScriptedReceiver {
        fn next(&mut self) -> io::Result<&[u8]> {
            match self.script.pop_front() {
                Some(Ok(frame)) => {
                    self.current = frame;
                    Ok(&self.current)
                }
                Some(Err(e)) => Err(e),
                None => {
                    thread::sleep(Duration::from_millis(1));
                    Err(io::Error::new(io::ErrorKind::TimedOut, "Timed out"))
                }
            }
        }
    }

    fn ethernet_frame(len: usize) -> Vec<u8> {
        let mut frame = vec![0u8; len];
        frame[0..6].copy_from_slice(&[0xff; 6]);
        frame[6..12].copy_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        // 未知のイーサタイプ
        frame[12..14].copy_from_slice(&[0x88, 0xb5]);
        frame
    }

    fn failure() -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::Other, "device gone"))
    }

    #[test]
    fn test_timeout_with_closed_receiver_stops_capture() {
        let (sender, receiver) = mpsc::channel(4);
        drop(receiver);
        let mut rx = ScriptedReceiver::new(Vec::new());

        let stop = pump_frames(&mut rx, &sender, "eth0", 128);

        assert_eq!(stop, CaptureStop::ReceiverClosed);
    }

    #[test]
    fn test_idle_capture_stops_once_receiver_is_dropped() {
        let (sender, mut receiver) = mpsc::channel(4);
        let pump = thread::spawn(move || {
            let mut rx = ScriptedReceiver::new(vec![Ok(ethernet_frame(60))]);
            pump_frames(&mut rx, &sender, "eth0", 128)
        });

        let event = receiver.blocking_recv().unwrap();
        assert_eq!(event.device_id, "eth0");
        drop(receiver);

        assert_eq!(pump.join().unwrap(), CaptureStop::ReceiverClosed);
    }

    #[test]
    fn test_frames_are_cut_to_capture_limit() {
        let (sender, mut receiver) = mpsc::channel(4);
        let mut script: Vec<_> = (0..MAX_CONSECUTIVE_READ_ERRORS).map(|_| failure()).collect();
        script.insert(0, Ok(ethernet_frame(200)));
        let mut rx = ScriptedReceiver::new(script);

        pump_frames(&mut rx, &sender, "eth1", 64);

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.device_id, "eth1");
        let layers: Vec<_> = event.chain.iter().collect();
        assert!(matches!(layers[0], ProtocolLayer::Header { header: Header::Ethernet(_), .. }));
        assert!(matches!(layers[1], ProtocolLayer::Payload(data) if data.len() == 64 - 14));
    }

    #[test]
    fn test_repeated_read_errors_stop_capture() {
        let (sender, _receiver) = mpsc::channel(4);
        let mut script: Vec<_> = (0..MAX_CONSECUTIVE_READ_ERRORS + 5).map(|_| failure()).collect();
        script.insert(0, Ok(ethernet_frame(60)));
        let mut rx = ScriptedReceiver::new(script);

        let stop = pump_frames(&mut rx, &sender, "eth0", 128);

        assert_eq!(stop, CaptureStop::ReadErrors);
        assert_eq!(rx.script.len(), 5);
    }

    #[test]
    fn test_good_frame_resets_error_count() {
        let (sender, _receiver) = mpsc::channel(16);
        let half = MAX_CONSECUTIVE_READ_ERRORS - 1;
        let mut script: Vec<_> = (0..half).map(|_| failure()).collect();
        script.push(Ok(ethernet_frame(60)));
        script.extend((0..MAX_CONSECUTIVE_READ_ERRORS).map(|_| failure()));
        script.push(Ok(ethernet_frame(60)));
        let mut rx = ScriptedReceiver::new(script);

        let stop = pump_frames(&mut rx, &sender, "eth0", 128);

        assert_eq!(stop, CaptureStop::ReadErrors);
        assert_eq!(rx.script.len(), 1);
    }

    #[test]
    fn test_interrupted_reads_are_not_counted() {
        assert!(is_idle(&io::Error::new(io::ErrorKind::TimedOut, "Timed out")));
        assert!(is_idle(&io::Error::from(io::ErrorKind::Interrupted)));
        assert!(!is_idle(&io::Error::new(io::ErrorKind::Other, "device gone")));
    }
}
