use crate::core::error::{DumpError, DumpResult};
use pnet::datalink::{self, NetworkInterface};
use std::io::{self, BufRead, Write};

/// キャプチャするデバイスを選ぶ。名前の指定がなければ対話的に選択する
pub fn select_device(name: Option<&str>) -> DumpResult<NetworkInterface> {
    let interfaces = datalink::interfaces();

    if let Some(name) = name {
        return interfaces
            .into_iter()
            .find(|interface| interface.name == name)
            .ok_or_else(|| DumpError::DeviceSelection(format!("デバイスが見つかりません: {}", name)));
    }

    prompt_device(interfaces, &mut io::stdin().lock(), &mut io::stdout())
}

fn prompt_device<R: BufRead, W: Write>(
    interfaces: Vec<NetworkInterface>,
    input: &mut R,
    output: &mut W,
) -> DumpResult<NetworkInterface> {
    let console_error = |e: io::Error| DumpError::DeviceSelection(format!("コンソールの入出力に失敗しました: {}", e));

    writeln!(output, "利用可能なデバイス:").map_err(console_error)?;
    for (index, interface) in interfaces.iter().enumerate() {
        writeln!(output, "{}. {}", index + 1, interface.name).map_err(console_error)?;
    }

    write!(output, "キャプチャするデバイスの番号を入力してください: ").map_err(console_error)?;
    output.flush().map_err(console_error)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(console_error)?;
    let device_index: usize = line
        .trim()
        .parse()
        .map_err(|e| DumpError::DeviceSelection(format!("無効な入力です: {}", e)))?;

    if device_index == 0 || device_index > interfaces.len() {
        return Err(DumpError::DeviceSelection("無効なデバイス番号です".to_string()));
    }

    Ok(interfaces[device_index - 1].clone())
}
