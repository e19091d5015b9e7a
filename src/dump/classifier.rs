use crate::dump::filter::{FilterSet, Policy};
use crate::network::packet::LayerChain;

/// パケットを表示するかどうかを判定する
///
/// 外側の層から順にたどり、最初にフィルタのタイプと一致した層で判定を確定する。
/// 一致がなければ非表示リストでは表示、表示リストでは非表示になる。
pub fn should_show(chain: &LayerChain, filter: &FilterSet) -> bool {
    let matched = chain
        .iter()
        .filter_map(|layer| layer.type_name())
        .any(|name| filter.contains(name));

    match filter.policy() {
        Policy::Hide => !matched,
        Policy::Show => matched,
    }
}
