use crate::network::packet::{LayerChain, ProtocolLayer};

const ELLIPSIS: &str = "...";

/// パケットをログ用の文字列にする
pub fn render(chain: &LayerChain, verbose: bool, max_length: usize) -> String {
    let msg = if verbose {
        render_verbose(chain)
    } else {
        render_compact(chain)
    };
    truncate(msg, max_length)
}

/// 全ての層の詳細表示を連結する
pub fn render_verbose(chain: &LayerChain) -> String {
    chain.iter().map(|layer| layer.to_string()).collect()
}

/// 層の名前だけを並べる (例: `[ethernet][ipv4][tcp][54 bytes]`)
pub fn render_compact(chain: &LayerChain) -> String {
    let mut msg = String::new();
    for layer in chain {
        match layer {
            ProtocolLayer::Header { header, .. } => {
                msg.push('[');
                msg.push_str(header.type_name());
                msg.push(']');
            }
            ProtocolLayer::Payload(data) => {
                msg.push_str(&format!("[{} bytes]", data.len()));
                break;
            }
        }
    }
    msg
}

/// `max_length` 文字を超える場合は末尾を `...` に置き換える。0 は無制限
///
/// 結果は `max_length` 文字を超えない。`max_length` が3未満の場合は `...` を
/// その長さに切り詰めたものになる。
pub fn truncate(msg: String, max_length: usize) -> String {
    if max_length == 0 || msg.chars().count() <= max_length {
        return msg;
    }

    let keep = max_length.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = msg.chars().take(keep).collect();
    truncated.push_str(&ELLIPSIS[..max_length.min(ELLIPSIS.len())]);
    truncated
}
