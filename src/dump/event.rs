use crate::network::packet::LayerChain;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// 1パケット分の受信通知
#[derive(Debug, Clone)]
pub struct PacketEvent {
    /// 受信したデバイス (インターフェース) の識別子
    pub device_id: String,
    pub chain: LayerChain,
}

impl PacketEvent {
    pub fn new(device_id: impl Into<String>, chain: LayerChain) -> Self {
        Self {
            device_id: device_id.into(),
            chain,
        }
    }
}

/// パケット受信イベントの供給元
#[async_trait]
pub trait PacketEventSource: Send {
    /// 次のイベントを待つ。供給が終わった場合は None
    async fn next_event(&mut self) -> Option<PacketEvent>;
}

pub struct ChannelSource {
    receiver: mpsc::Receiver<PacketEvent>,
}

impl ChannelSource {
    pub fn new(receiver: mpsc::Receiver<PacketEvent>) -> Self {
        Self { receiver }
    }

    pub fn channel(capacity: usize) -> (mpsc::Sender<PacketEvent>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self::new(receiver))
    }
}

#[async_trait]
impl PacketEventSource for ChannelSource {
    async fn next_event(&mut self) -> Option<PacketEvent> {
        self.receiver.recv().await
    }
}
