use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::storage::models::{from_json_object, patch_nullable, patch_required, required, PayloadError};
use crate::utils::serde_helpers::{double_option, nullable_flexible_i64};

/// 高等教育機構模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Hei {
    /// UK Provider Reference Number
    #[serde(rename = "UKPRN")]
    pub ukprn: i64,
    pub he_name: String,
    pub region: String,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// 高等教育機構請求內容
///
/// 每個欄位都區分缺席（`None`）與 null（`Some(None)`），
/// 整體替換與部分更新共用同一結構。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeiPayload {
    #[serde(rename = "UKPRN", default, deserialize_with = "nullable_flexible_i64")]
    pub ukprn: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub he_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub region: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub lat: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub lon: Option<Option<String>>,
}

impl HeiPayload {
    /// 從 JSON 值解析
    pub fn from_json(value: serde_json::Value) -> Result<Self, PayloadError> {
        from_json_object(value)
    }

    /// 轉換為完整記錄；請求未帶 UKPRN 時使用 `default_ukprn`
    pub fn into_hei(self, default_ukprn: Option<i64>) -> Result<Hei, PayloadError> {
        let ukprn = match self.ukprn {
            None => default_ukprn.ok_or(PayloadError::MissingField("UKPRN"))?,
            other => required(other, "UKPRN")?,
        };

        Ok(Hei {
            ukprn,
            he_name: required(self.he_name, "he_name")?,
            region: required(self.region, "region")?,
            lat: self.lat.flatten(),
            lon: self.lon.flatten(),
        })
    }

    /// 只套用請求中出現的欄位
    pub fn apply_to(self, hei: &mut Hei) -> Result<(), PayloadError> {
        patch_required(&mut hei.ukprn, self.ukprn, "UKPRN")?;
        patch_required(&mut hei.he_name, self.he_name, "he_name")?;
        patch_required(&mut hei.region, self.region, "region")?;
        patch_nullable(&mut hei.lat, self.lat);
        patch_nullable(&mut hei.lon, self.lon);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cambridge() -> Hei {
        Hei {
            ukprn: 10007788,
            he_name: "The University of Cambridge".to_string(),
            region: "East of England".to_string(),
            lat: Some("52.2043".to_string()),
            lon: Some("0.1149".to_string()),
        }
    }

    #[test]
    fn test_serializes_with_upper_case_ukprn() {
        let value = serde_json::to_value(cambridge()).unwrap();
        assert_eq!(value["UKPRN"], 10007788);
        assert!(value.get("ukprn").is_none());
    }

    #[test]
    fn test_full_payload_requires_name_and_region() {
        let payload = HeiPayload::from_json(json!({"UKPRN": 11111111})).unwrap();
        assert_eq!(payload.into_hei(None), Err(PayloadError::MissingField("he_name")));

        let payload = HeiPayload::from_json(json!({
            "UKPRN": "11111111",
            "he_name": "University of Me",
            "region": "London"
        }))
        .unwrap();
        let hei = payload.into_hei(None).unwrap();
        assert_eq!(hei.ukprn, 11111111);
        assert_eq!(hei.lat, None);
    }

    #[test]
    fn test_full_payload_falls_back_to_path_ukprn() {
        let payload = HeiPayload::from_json(json!({"he_name": "New", "region": "Wales"})).unwrap();
        assert_eq!(payload.clone().into_hei(Some(10000001)).unwrap().ukprn, 10000001);
        assert_eq!(payload.into_hei(None), Err(PayloadError::MissingField("UKPRN")));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = HeiPayload::from_json(json!({"name": "Updated University"})).unwrap_err();
        assert!(matches!(err, PayloadError::Malformed(_)));
    }

    #[test]
    fn test_partial_update_keeps_absent_fields() {
        let mut hei = cambridge();
        let payload = HeiPayload::from_json(json!({"region": "Updated Region", "lat": null})).unwrap();
        payload.apply_to(&mut hei).unwrap();

        assert_eq!(hei.region, "Updated Region");
        assert_eq!(hei.lat, None);
        assert_eq!(hei.lon.as_deref(), Some("0.1149"));
        assert_eq!(hei.he_name, "The University of Cambridge");
    }

    #[test]
    fn test_partial_update_rejects_null_required_field() {
        let mut hei = cambridge();
        let payload = HeiPayload::from_json(json!({"he_name": null})).unwrap();
        assert_eq!(payload.apply_to(&mut hei), Err(PayloadError::NullField("he_name")));
    }

    #[test]
    fn test_non_object_payloads_are_rejected() {
        for body in [json!([11111111, "Array University", "London"]), json!("x"), json!(null)] {
            let err = HeiPayload::from_json(body).unwrap_err();
            assert!(matches!(err, PayloadError::Malformed(_)));
        }
    }
}
