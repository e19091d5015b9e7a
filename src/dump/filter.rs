use crate::core::error::{DumpError, DumpResult};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// フィルタに列挙したタイプの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Policy {
    /// 列挙したタイプを含むパケットを隠す
    Hide,
    /// 列挙したタイプを含むパケットだけを表示する
    Show,
}

/// 表示・非表示を決めるプロトコルタイプ名の集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSet {
    types: BTreeSet<String>,
    policy: Policy,
}

impl Default for FilterSet {
    /// 何も隠さない非表示リスト (全パケットを表示)
    fn default() -> Self {
        Self {
            types: BTreeSet::new(),
            policy: Policy::Hide,
        }
    }
}

impl FilterSet {
    /// 非表示リストと表示リストの指定からフィルタを構築する
    ///
    /// どちらもカンマ、パイプ、空白の任意の組み合わせで区切る。大文字小文字は区別しない。
    /// 両方が指定された場合は `DumpError::ConflictingFilters`。
    pub fn build(hide: &str, show: &str) -> DumpResult<Self> {
        let hide = parse_types(hide);
        let show = parse_types(show);

        match (hide.is_empty(), show.is_empty()) {
            (false, false) => Err(DumpError::ConflictingFilters),
            (true, false) => Ok(Self {
                types: show,
                policy: Policy::Show,
            }),
            _ => Ok(Self {
                types: hide,
                policy: Policy::Hide,
            }),
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn hide_listed(&self) -> bool {
        self.policy == Policy::Hide
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains(&type_name.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "なし (全パケットを表示)");
        }

        let kind = if self.hide_listed() { "非表示" } else { "表示" };
        write!(f, "{}: {}", kind, self.types().collect::<Vec<_>>().join(", "))
    }
}

fn parse_types(list: &str) -> BTreeSet<String> {
    list.split(|c: char| c == ',' || c == '|' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .map(str::to_lowercase)
        .collect()
}
