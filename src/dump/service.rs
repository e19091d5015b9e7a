use crate::core::config::DumpConfig;
use crate::dump::classifier::should_show;
use crate::dump::event::{PacketEvent, PacketEventSource};
use crate::dump::renderer::render;
use crate::network::capture::{CaptureControl, MAX_CAPTURE_LENGTH};
use log::{debug, info};

/// デバイスごとのログチャネル名
pub fn log_channel(device_id: &str) -> String {
    format!("dump:{}", device_id)
}

/// 受信パケットを判定し、表示対象だけをログに書き出す
pub struct DumpService {
    config: DumpConfig,
}

impl DumpService {
    /// 設定を確定させてダンパーを起動する
    ///
    /// `full_packets` が有効ならキャプチャ層の上限を最大にする (起動時に一度だけ)。
    pub fn launch<C: CaptureControl + ?Sized>(config: DumpConfig, capture: &mut C) -> Self {
        if config.full_packets {
            capture.set_capture_limit(MAX_CAPTURE_LENGTH);
        }

        info!("パケットダンパーを起動しました");
        Self { config }
    }

    pub fn config(&self) -> &DumpConfig {
        &self.config
    }

    /// 表示対象ならログに書く文字列を返す。非表示なら None
    pub fn summarize(&self, event: &PacketEvent) -> Option<String> {
        if !should_show(&event.chain, &self.config.filter) {
            return None;
        }

        Some(render(&event.chain, self.config.verbose, self.config.max_length))
    }

    /// 1パケット分の受信を処理する。ログに書いた場合は true
    pub fn handle_packet_in(&self, event: &PacketEvent) -> bool {
        match self.summarize(event) {
            Some(msg) => {
                let channel = log_channel(&event.device_id);
                debug!(target: channel.as_str(), "{}", msg);
                true
            }
            None => false,
        }
    }

    /// ソースが尽きるまでイベントを1件ずつ処理する。ログに書いたパケット数を返す
    pub async fn run<S: PacketEventSource + ?Sized>(&self, source: &mut S) -> usize {
        let mut shown = 0;
        while let Some(event) = source.next_event().await {
            if self.handle_packet_in(&event) {
                shown += 1;
            }
        }
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::event::ChannelSource;
    use crate::dump::filter::FilterSet;
    use crate::network::capture::DEFAULT_CAPTURE_LENGTH;
    use crate::network::packet::fixtures::*;
    use crate::network::packet::ipv4::{PROTOCOL_TCP, PROTOCOL_UDP};
    use crate::network::packet::LayerChain;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::sync::{Mutex, OnceLock};

    /// テスト中に書かれたログを (レベル, ターゲット, 本文) で保持する
    struct CapturedLog {
        records: Mutex<Vec<(Level, String, String)>>,
    }

    impl Log for CapturedLog {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if let Ok(mut records) = self.records.lock() {
                records.push((
                    record.level(),
                    record.target().to_string(),
                    record.args().to_string(),
                ));
            }
        }

        fn flush(&self) {}
    }

    fn captured_log() -> &'static CapturedLog {
        static LOGGER: OnceLock<CapturedLog> = OnceLock::new();
        static INSTALLED: OnceLock<()> = OnceLock::new();

        let logger = LOGGER.get_or_init(|| CapturedLog {
            records: Mutex::new(Vec::new()),
        });
        INSTALLED.get_or_init(|| {
            log::set_logger(logger).unwrap();
            log::set_max_level(LevelFilter::Trace);
        });
        logger
    }

    /// テストは並行に走るため、デバイスごとのターゲットで絞り込む
    fn records_for(device_id: &str) -> Vec<(Level, String)> {
        let target = log_channel(device_id);
        captured_log()
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, t, _)| *t == target)
            .map(|(level, _, msg)| (*level, msg.clone()))
            .collect()
    }

    struct RecordingCapture {
        limit: u16,
        calls: usize,
    }

    impl RecordingCapture {
        fn new() -> Self {
            Self {
                limit: DEFAULT_CAPTURE_LENGTH,
                calls: 0,
            }
        }
    }

    impl CaptureControl for RecordingCapture {
        fn set_capture_limit(&mut self, limit: u16) {
            self.limit = limit;
            self.calls += 1;
        }
    }

    fn service(config: DumpConfig) -> DumpService {
        DumpService::launch(config, &mut RecordingCapture::new())
    }

    fn hide(types: &str) -> DumpConfig {
        DumpConfig {
            filter: FilterSet::build(types, "").unwrap(),
            ..DumpConfig::default()
        }
    }

    #[test]
    fn test_full_packets_raises_capture_limit_once() {
        let mut capture = RecordingCapture::new();
        DumpService::launch(DumpConfig::default(), &mut capture);

        assert_eq!(capture.limit, MAX_CAPTURE_LENGTH);
        assert_eq!(capture.calls, 1);
    }

    #[test]
    fn test_capture_limit_untouched_without_full_packets() {
        let mut capture = RecordingCapture::new();
        let config = DumpConfig {
            full_packets: false,
            ..DumpConfig::default()
        };
        DumpService::launch(config, &mut capture);

        assert_eq!(capture.limit, DEFAULT_CAPTURE_LENGTH);
        assert_eq!(capture.calls, 0);
    }

    #[test]
    fn test_log_channel_is_scoped_by_device() {
        assert_eq!(log_channel("eth0"), "dump:eth0");
    }

    #[test]
    fn test_shown_packet_is_summarized_without_device_prefix() {
        let service = service(DumpConfig::default());
        let event = PacketEvent::new("eth0", tcp_chain());

        assert_eq!(
            service.summarize(&event).as_deref(),
            Some("[ethernet][ipv4][tcp][54 bytes]")
        );
        assert!(service.handle_packet_in(&event));
    }

    #[test]
    fn test_hidden_packet_is_not_logged() {
        let service = service(hide("tcp"));
        let event = PacketEvent::new("eth0", tcp_chain());

        assert_eq!(service.summarize(&event), None);
        assert!(!service.handle_packet_in(&event));
    }

    #[test]
    fn test_shown_packet_is_logged_at_debug_on_device_channel() {
        captured_log();
        let service = service(DumpConfig::default());

        assert!(service.handle_packet_in(&PacketEvent::new("cap-shown", tcp_chain())));

        assert_eq!(
            records_for("cap-shown"),
            vec![(Level::Debug, "[ethernet][ipv4][tcp][54 bytes]".to_string())]
        );
    }

    #[test]
    fn test_hidden_packet_writes_no_record() {
        captured_log();
        let service = service(hide("ipv4"));

        assert!(!service.handle_packet_in(&PacketEvent::new("cap-hidden", tcp_chain())));

        assert!(records_for("cap-hidden").is_empty());
    }

    #[tokio::test]
    async fn test_run_logs_each_shown_event_once() {
        captured_log();
        let service = service(hide("udp"));
        let (sender, mut source) = ChannelSource::channel(8);

        let udp_chain = LayerChain::from_layers(vec![ethernet(), ipv4(PROTOCOL_UDP), udp()], None);
        sender.send(PacketEvent::new("cap-run", udp_chain)).await.unwrap();
        sender.send(PacketEvent::new("cap-run", tcp_chain())).await.unwrap();
        sender.send(PacketEvent::new("cap-run", tcp_chain())).await.unwrap();
        drop(sender);

        assert_eq!(service.run(&mut source).await, 2);
        let records = records_for("cap-run");
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|(level, msg)| *level == Level::Debug && msg == "[ethernet][ipv4][tcp][54 bytes]"));
    }

    #[test]
    fn test_hide_list_without_matching_layer_is_logged() {
        let service = service(hide("tcp"));
        let chain = LayerChain::from_layers(vec![ethernet(), ipv4(PROTOCOL_TCP)], None);

        assert_eq!(
            service.summarize(&PacketEvent::new("s1", chain)).as_deref(),
            Some("[ethernet][ipv4]")
        );
    }

    #[test]
    fn test_verbose_output_is_truncated() {
        let service = service(DumpConfig {
            verbose: true,
            max_length: 40,
            ..DumpConfig::default()
        });
        let msg = service.summarize(&PacketEvent::new("eth0", tcp_chain())).unwrap();

        assert_eq!(msg.chars().count(), 40);
        assert!(msg.starts_with("[00:11:22:33:44:55>"));
        assert!(msg.ends_with("..."));
    }

    #[tokio::test]
    async fn test_run_handles_events_until_source_ends() {
        let service = service(DumpConfig {
            filter: FilterSet::build("", "udp").unwrap(),
            ..DumpConfig::default()
        });
        let (sender, mut source) = ChannelSource::channel(8);

        let udp_chain = LayerChain::from_layers(vec![ethernet(), ipv4(PROTOCOL_UDP), udp()], None);
        sender.send(PacketEvent::new("eth0", tcp_chain())).await.unwrap();
        sender.send(PacketEvent::new("eth0", udp_chain.clone())).await.unwrap();
        sender.send(PacketEvent::new("eth1", udp_chain)).await.unwrap();
        drop(sender);

        assert_eq!(service.run(&mut source).await, 2);
    }
}
