use crate::core::config::LoggingConfig;
use crate::core::error::{DumpError, DumpResult};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::File;
use std::io::{self, Write};
use std::str::FromStr;

/// 標準出力とファイルの両方に書き込む
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

pub fn setup_logger(config: &LoggingConfig) -> DumpResult<()> {
    let level = LevelFilter::from_str(&config.level)
        .map_err(|e| DumpError::Logger(format!("無効なログレベル {}: {}", config.level, e)))?;

    let target = match &config.file {
        Some(path) => {
            // ログファイルを開く
            let file = File::create(path)
                .map_err(|e| DumpError::Logger(format!("{}: {}", path.display(), e)))?;
            Target::Pipe(Box::new(Tee { file }))
        }
        None => Target::Stdout,
    };

    // ビルダーでロガーをカスタマイズ
    Builder::new()
        // ログレベルの設定
        .filter_level(level)
        // タイムスタンプ付きのフォーマット
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(), // dump:<デバイス> またはモジュールパス
                record.args()
            )
        })
        .target(target)
        .try_init()
        .map_err(|e| DumpError::Logger(e.to_string()))?;

    Ok(())
}
