use thiserror::Error;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("パケットタイプの表示と非表示を同時に指定することはできません")]
    ConflictingFilters,

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("キャプチャエラー: {0}")]
    Capture(#[from] std::io::Error),

    #[error("デバイス選択エラー: {0}")]
    DeviceSelection(String),

    #[error("ロガーのセットアップに失敗しました: {0}")]
    Logger(String),
}

pub type DumpResult<T> = Result<T, DumpError>;
