use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::storage::models::{from_json_object, patch_nullable, patch_required, required, PayloadError};
use crate::utils::serde_helpers::{double_option, empty_string_as_none, nullable_flexible_i64};

/// Estates Management Record 條目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub entry_id: i64,
    pub academic_year: String,
    pub classification: String,
    pub category_marker: String,
    pub category: String,
    pub value: Option<String>,
    #[serde(rename = "UKPRN")]
    pub ukprn: Option<i64>,
    pub he_name: Option<String>,
}

/// 條目插入模型，`entry_id` 為空時由資料庫分配
///
/// 欄位順序與 `entry_data.csv` 的欄位順序一致。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryInsert {
    #[serde(default)]
    pub entry_id: Option<i64>,
    pub academic_year: String,
    pub classification: String,
    pub category_marker: String,
    pub category: String,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub ukprn: Option<i64>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub he_name: Option<String>,
}

impl EntryInsert {
    /// 指定主鍵後轉換為完整記錄
    pub fn with_id(self, entry_id: i64) -> Entry {
        Entry {
            entry_id,
            academic_year: self.academic_year,
            classification: self.classification,
            category_marker: self.category_marker,
            category: self.category,
            value: self.value,
            ukprn: self.ukprn,
            he_name: self.he_name,
        }
    }
}

/// 條目請求內容
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryPayload {
    #[serde(default, deserialize_with = "nullable_flexible_i64")]
    pub entry_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub academic_year: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub classification: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_marker: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub value: Option<Option<String>>,
    #[serde(rename = "UKPRN", default, deserialize_with = "nullable_flexible_i64")]
    pub ukprn: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub he_name: Option<Option<String>>,
}

impl EntryPayload {
    /// 從 JSON 值解析
    pub fn from_json(value: serde_json::Value) -> Result<Self, PayloadError> {
        from_json_object(value)
    }

    /// 轉換為插入模型；請求未帶 `entry_id` 時使用 `default_id`
    pub fn into_insert(self, default_id: Option<i64>) -> Result<EntryInsert, PayloadError> {
        let entry_id = match self.entry_id {
            None => default_id,
            Some(id) => Some(id.ok_or(PayloadError::NullField("entry_id"))?),
        };

        Ok(EntryInsert {
            entry_id,
            academic_year: required(self.academic_year, "academic_year")?,
            classification: required(self.classification, "classification")?,
            category_marker: required(self.category_marker, "category_marker")?,
            category: required(self.category, "category")?,
            value: self.value.flatten(),
            ukprn: self.ukprn.flatten(),
            he_name: self.he_name.flatten(),
        })
    }

    /// 只套用請求中出現的欄位
    pub fn apply_to(self, entry: &mut Entry) -> Result<(), PayloadError> {
        patch_required(&mut entry.entry_id, self.entry_id, "entry_id")?;
        patch_required(&mut entry.academic_year, self.academic_year, "academic_year")?;
        patch_required(&mut entry.classification, self.classification, "classification")?;
        patch_required(&mut entry.category_marker, self.category_marker, "category_marker")?;
        patch_required(&mut entry.category, self.category, "category")?;
        patch_nullable(&mut entry.value, self.value);
        patch_nullable(&mut entry.ukprn, self.ukprn);
        patch_nullable(&mut entry.he_name, self.he_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_entry() -> Entry {
        Entry {
            entry_id: 755,
            academic_year: "2021/22".to_string(),
            classification: "Environmental information".to_string(),
            category_marker: "Energy".to_string(),
            category: "Total energy consumption (kWh)".to_string(),
            value: Some("123456".to_string()),
            ukprn: Some(10007788),
            he_name: Some("The University of Cambridge".to_string()),
        }
    }

    #[test]
    fn test_payload_accepts_string_integers() {
        let payload = EntryPayload::from_json(json!({
            "entry_id": "100000",
            "academic_year": "20/20",
            "classification": "dummy",
            "category_marker": "dummy",
            "category": "dummy",
            "value": "70",
            "UKPRN": "111111",
            "he_name": "University of Naomi"
        }))
        .unwrap();

        let insert = payload.into_insert(None).unwrap();
        assert_eq!(insert.entry_id, Some(100000));
        assert_eq!(insert.ukprn, Some(111111));
        assert_eq!(insert.value.as_deref(), Some("70"));
    }

    #[test]
    fn test_payload_without_id_is_left_to_database() {
        let payload = EntryPayload::from_json(json!({
            "academic_year": "2021/22",
            "classification": "c",
            "category_marker": "m",
            "category": "k"
        }))
        .unwrap();

        let insert = payload.into_insert(None).unwrap();
        assert_eq!(insert.entry_id, None);
        assert_eq!(insert.ukprn, None);
    }

    #[test]
    fn test_payload_requires_descriptive_fields() {
        let payload = EntryPayload::from_json(json!({"entry_id": 1, "academic_year": "2021/22"})).unwrap();
        assert_eq!(payload.into_insert(None), Err(PayloadError::MissingField("classification")));

        let payload = EntryPayload::from_json(json!({"entry_id": null})).unwrap();
        assert_eq!(payload.into_insert(Some(3)), Err(PayloadError::NullField("entry_id")));
    }

    #[test]
    fn test_partial_update() {
        let mut entry = sample_entry();
        let payload = EntryPayload::from_json(json!({
            "academic_year": "21/22",
            "value": "80",
            "UKPRN": "222222"
        }))
        .unwrap();
        payload.apply_to(&mut entry).unwrap();

        assert_eq!(entry.entry_id, 755);
        assert_eq!(entry.academic_year, "21/22");
        assert_eq!(entry.value.as_deref(), Some("80"));
        assert_eq!(entry.ukprn, Some(222222));
        assert_eq!(entry.category, "Total energy consumption (kWh)");
    }

    #[test]
    fn test_with_id_keeps_fields() {
        let insert = EntryInsert {
            entry_id: None,
            academic_year: "2021/22".to_string(),
            classification: "c".to_string(),
            category_marker: "m".to_string(),
            category: "k".to_string(),
            value: None,
            ukprn: Some(1),
            he_name: None,
        };
        let entry = insert.with_id(9);
        assert_eq!(entry.entry_id, 9);
        assert_eq!(entry.ukprn, Some(1));
    }

    #[test]
    fn test_array_payload_is_not_bound_by_position() {
        let err = EntryPayload::from_json(json!([999])).unwrap_err();
        assert!(matches!(err, PayloadError::Malformed(_)));
    }
}
