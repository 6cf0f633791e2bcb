pub mod entry;
pub mod hei;
pub mod saved_chart;
pub mod user;

// 重新匯出常用模型類型
pub use entry::*;
pub use hei::*;
pub use saved_chart::*;
pub use user::*;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// 請求內容驗證錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("缺少必要欄位: {0}")]
    MissingField(&'static str),

    #[error("欄位不可為 null: {0}")]
    NullField(&'static str),

    #[error("無法解析請求內容: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for PayloadError {
    fn from(err: serde_json::Error) -> Self {
        PayloadError::Malformed(err.to_string())
    }
}

/// 解析請求內容，只接受 JSON 物件
///
/// 衍生的 `Deserialize` 也會依欄位順序接受陣列，必須先排除。
pub(crate) fn from_json_object<T: DeserializeOwned>(value: Value) -> Result<T, PayloadError> {
    if !value.is_object() {
        return Err(PayloadError::Malformed(format!(
            "請求內容必須是 JSON 物件，收到: {}",
            json_kind(&value)
        )));
    }
    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 取出必填欄位：缺席與 null 都視為錯誤
pub(crate) fn required<T>(value: Option<Option<T>>, field: &'static str) -> Result<T, PayloadError> {
    match value {
        None => Err(PayloadError::MissingField(field)),
        Some(None) => Err(PayloadError::NullField(field)),
        Some(Some(v)) => Ok(v),
    }
}

/// 部分更新必填欄位：缺席時保留原值，null 視為錯誤
pub(crate) fn patch_required<T>(
    target: &mut T,
    value: Option<Option<T>>,
    field: &'static str,
) -> Result<(), PayloadError> {
    match value {
        None => Ok(()),
        Some(None) => Err(PayloadError::NullField(field)),
        Some(Some(v)) => {
            *target = v;
            Ok(())
        }
    }
}

/// 部分更新可空欄位：缺席時保留原值，null 清空
pub(crate) fn patch_nullable<T>(target: &mut Option<T>, value: Option<Option<T>>) {
    if let Some(v) = value {
        *target = v;
    }
}
