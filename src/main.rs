mod core;
mod dump;
mod network;
mod select_device;
mod setup_logger;

use crate::core::{Configuration, DumpError};
use crate::dump::DumpService;
use crate::network::PacketCapture;
use crate::select_device::select_device;
use crate::setup_logger::setup_logger;
use log::{info, warn};

#[tokio::main]
async fn main() -> Result<(), DumpError> {
    let config = Configuration::from_env()?;
    setup_logger(&config.logging)?;

    // デバイスの選択
    let interface = select_device(config.capture.interface.as_deref())?;
    info!("デバイスの選択に成功しました: {}", interface.name);

    let mut capture = PacketCapture::new(interface);
    let service = DumpService::launch(config.dump, &mut capture);
    match serde_json::to_string(service.config()) {
        Ok(json) => info!("ダンプ設定: {}", json),
        Err(e) => warn!("設定の出力に失敗しました: {}", e),
    }
    info!("フィルタ: {}", service.config().filter);
    info!("キャプチャ上限: {} バイト", capture.capture_limit());

    let mut source = capture.start()?;

    tokio::select! {
        shown = service.run(&mut source) => {
            info!("キャプチャが終了しました (表示したパケット: {})", shown);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("停止要求を受け取りました");
        }
    }

    // 受信側を閉じるとキャプチャスレッドは次の読み取りタイムアウトで終了する
    drop(source);

    Ok(())
}
