// utils/serde_helpers.rs - 序列化與反序列化輔助函數
use serde::de::{self, Deserializer};
use serde::Deserialize;

/// 將空字符串反序列化為None
///
/// CSV 與表單資料常以空字串表示缺值。
///
/// # 使用範例
///
/// ```
/// use serde::Deserialize;
/// use estates_server::utils::serde_helpers::empty_string_as_none;
///
/// #[derive(Deserialize)]
/// struct Row {
///     #[serde(deserialize_with = "empty_string_as_none")]
///     lat: Option<String>,
/// }
///
/// let row: Row = serde_json::from_str(r#"{"lat": ""}"#).unwrap();
/// assert!(row.lat.is_none());
/// ```
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// 區分「欄位缺席」與「欄位為 null」
///
/// 搭配 `#[serde(default)]` 使用：缺席時為 `None`，`null` 時為 `Some(None)`。
/// 部分更新（PATCH）需要依此判斷是否覆寫欄位。
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

impl IntOrString {
    fn into_i64<E: de::Error>(self) -> Result<i64, E> {
        match self {
            IntOrString::Int(n) => Ok(n),
            IntOrString::Str(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| E::custom(format!("無法將 {:?} 解析為整數", s))),
        }
    }
}

/// 可空的整數欄位，接受 JSON 數字或整數字串（例如 `"100000"`），
/// 並像 [`double_option`] 一樣區分缺席與 null
pub fn nullable_flexible_i64<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<IntOrString>::deserialize(deserializer)
        .map_err(|_| de::Error::custom("預期為整數或整數字串"))?;

    match value {
        None => Ok(Some(None)),
        Some(v) => v.into_i64().map(|n| Some(Some(n))),
    }
}
