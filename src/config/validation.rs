use thiserror::Error;

/// 配置驗證錯誤
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("缺少必要配置項: {0}")]
    MissingField(String),

    #[error("無效的配置值: {0}")]
    InvalidValue(String),

    #[error("配置範圍錯誤: {field} 的值 {value} 不在範圍 {min}..{max} 內")]
    RangeError {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("依賴錯誤: {dependent} 依賴於 {dependency} 的配置")]
    DependencyError {
        dependent: String,
        dependency: String,
    },
}

/// 配置驗證器trait
pub trait Validator {
    /// 驗證配置
    fn validate(&self) -> Result<(), ValidationError>;
}

/// 驗證工具函數
pub struct ValidationUtils;

impl ValidationUtils {
    /// 驗證配置值是否在指定範圍內（含端點）
    pub fn in_range<T>(
        value: T,
        min: T,
        max: T,
        field_name: &str
    ) -> Result<(), ValidationError>
    where
        T: PartialOrd + ToString
    {
        if value < min || value > max {
            return Err(ValidationError::RangeError {
                field: field_name.to_string(),
                value: value.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(())
    }

    /// 驗證一個選項是否為某些值中的一個
    pub fn one_of<T>(
        value: &T,
        options: &[T],
        field_name: &str
    ) -> Result<(), ValidationError>
    where
        T: PartialEq + ToString
    {
        if !options.contains(value) {
            return Err(ValidationError::InvalidValue(format!(
                "{} 的值 {} 不是有效選項: {:?}",
                field_name,
                value.to_string(),
                options.iter().map(ToString::to_string).collect::<Vec<_>>()
            )));
        }
        Ok(())
    }

    /// 檢查必要的字串欄位是否有值
    pub fn not_empty(
        value: &str,
        field_name: &str
    ) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field_name.to_string()));
        }
        Ok(())
    }

    /// 檢查字串是否以指定前綴開頭
    pub fn has_prefix(
        value: &str,
        prefix: &str,
        field_name: &str
    ) -> Result<(), ValidationError> {
        if !value.starts_with(prefix) {
            return Err(ValidationError::InvalidValue(format!(
                "{} 必須以 {} 開頭: {}",
                field_name, prefix, value
            )));
        }
        Ok(())
    }

    /// 檢查兩個欄位的依賴關係
    pub fn check_dependency(
        has_dependent: bool,
        has_dependency: bool,
        dependent_name: &str,
        dependency_name: &str
    ) -> Result<(), ValidationError> {
        if has_dependent && !has_dependency {
            return Err(ValidationError::DependencyError {
                dependent: dependent_name.to_string(),
                dependency: dependency_name.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_in_range() {
        assert!(ValidationUtils::in_range(10, 1, 1000, "rest_api.default_per_page").is_ok());
        assert!(ValidationUtils::in_range(1000, 1, 1000, "rest_api.default_per_page").is_ok());

        let err = ValidationUtils::in_range(0u16, 1, 65535, "server.port").unwrap_err();
        assert_matches!(
            err,
            ValidationError::RangeError { ref field, ref value, .. } if field == "server.port" && value == "0"
        );
    }

    #[test]
    fn test_one_of() {
        let formats = ["pretty", "json"];
        assert!(ValidationUtils::one_of(&"json", &formats, "log.format").is_ok());
        assert!(ValidationUtils::one_of(&"xml", &formats, "log.format").is_err());
    }

    #[test]
    fn test_not_empty() {
        assert!(ValidationUtils::not_empty("127.0.0.1", "server.host").is_ok());
        assert_matches!(
            ValidationUtils::not_empty("  ", "server.host"),
            Err(ValidationError::MissingField(field)) if field == "server.host"
        );
    }

    #[test]
    fn test_has_prefix() {
        assert!(ValidationUtils::has_prefix("sqlite::memory:", "sqlite:", "database.url").is_ok());
        assert!(ValidationUtils::has_prefix("postgres://localhost", "sqlite:", "database.url").is_err());
    }

    #[test]
    fn test_check_dependency() {
        assert!(ValidationUtils::check_dependency(true, true, "log.directory", "log.file_name").is_ok());
        assert!(ValidationUtils::check_dependency(false, false, "log.directory", "log.file_name").is_ok());
        assert_matches!(
            ValidationUtils::check_dependency(true, false, "log.directory", "log.file_name"),
            Err(ValidationError::DependencyError { .. })
        );
    }
}
