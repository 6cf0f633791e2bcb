// utils.rs - 公共工具模組
//
// 提供各種通用的工具函數和輔助方法，用於簡化系統其他部分的代碼。

pub mod serde_helpers;

// 重新導出序列化輔助函數，使其可以通過 utils::function_name 直接訪問
pub use serde_helpers::{
    double_option,
    empty_string_as_none,
    nullable_flexible_i64,
};
