//! Configuration for the index rotation loader.

use serde::Deserialize;

use crate::errors::ConfigError;

/// Days an old index survives cleanup when `daysToKeep` is unset.
pub const DEFAULT_DAYS_TO_KEEP: u32 = 10;

/// Indices always kept by cleanup when `minIndexesToKeep` is unset.
pub const DEFAULT_MIN_INDEXES_TO_KEEP: u32 = 2;

const COMPONENT: &str = "elastic loader";

const SOCKET_LIMIT_MESSAGE: &str = "socketLimit must be a number greater than 0";

type Rule = fn(&ElasticLoaderConfig) -> Option<ConfigError>;

/// Rules in reporting order.
const RULES: [Rule; 7] = [
    eshosts_rule,
    alias_name_rule,
    mapping_path_rule,
    settings_path_rule,
    days_to_keep_rule,
    min_indexes_to_keep_rule,
    socket_limit_rule,
];

/// Configuration of the index rotation loader.
///
/// Numeric settings are signed so that out-of-range values can be reported
/// rather than rejected by the parser.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElasticLoaderConfig {
    /// Search engine node URLs.
    pub eshosts: Option<Vec<String>>,
    /// The stable published name.
    pub alias_name: Option<String>,
    /// Path to the index mappings JSON file.
    pub mapping_path: Option<String>,
    /// Path to the index settings JSON file.
    pub settings_path: Option<String>,
    /// Age in days after which old indices are pruned. Defaults to 10.
    pub days_to_keep: Option<i64>,
    /// Number of newest indices always kept. Defaults to 2.
    pub min_indexes_to_keep: Option<i64>,
    /// Maximum number of concurrent requests. Unset leaves it unbounded.
    pub socket_limit: Option<i64>,
}

/// The validated settings the rotation itself needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSettings {
    pub alias_name: String,
    pub days_to_keep: u32,
    pub min_indexes_to_keep: u32,
}

/// Validate a rotation loader configuration without side effects.
///
/// Returns every problem found, in a fixed order; an empty list means valid.
pub fn validate_config(config: &ElasticLoaderConfig) -> Vec<ConfigError> {
    config.validate()
}

impl ElasticLoaderConfig {
    /// Every problem with this configuration.
    pub fn validate(&self) -> Vec<ConfigError> {
        RULES.iter().filter_map(|rule| rule(self)).collect()
    }

    /// The first problem with this configuration, if any.
    pub fn check(&self) -> Result<(), ConfigError> {
        match RULES.iter().find_map(|rule| rule(self)) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Check only what the rotation needs and resolve defaults.
    ///
    /// Used when the index manager and schemas are supplied directly, so hosts
    /// and schema paths are not required.
    pub fn rotation_settings(&self) -> Result<RotationSettings, ConfigError> {
        let rules: [Rule; 3] = [alias_name_rule, days_to_keep_rule, min_indexes_to_keep_rule];
        for rule in rules {
            if let Some(err) = rule(self) {
                return Err(err);
            }
        }

        Ok(RotationSettings {
            alias_name: self.alias_name.clone().unwrap_or_default(),
            days_to_keep: self.days_to_keep_or_default(),
            min_indexes_to_keep: self.min_indexes_to_keep_or_default(),
        })
    }

    /// `daysToKeep`, or its default when unset or out of range.
    pub fn days_to_keep_or_default(&self) -> u32 {
        self.days_to_keep
            .and_then(|days| u32::try_from(days).ok())
            .unwrap_or(DEFAULT_DAYS_TO_KEEP)
    }

    /// `minIndexesToKeep`, or its default when unset or out of range.
    pub fn min_indexes_to_keep_or_default(&self) -> u32 {
        self.min_indexes_to_keep
            .and_then(|count| u32::try_from(count).ok())
            .unwrap_or(DEFAULT_MIN_INDEXES_TO_KEEP)
    }

    /// `socketLimit` as a pool size, when set and valid.
    pub fn socket_limit_size(&self) -> Option<usize> {
        self.socket_limit
            .filter(|limit| *limit > 0)
            .and_then(|limit| usize::try_from(limit).ok())
    }

    /// Parse a numeric setting given as text, e.g. from the environment.
    ///
    /// Unparseable text is reported with the same message as an invalid value.
    pub fn parse_number(field: &'static str, raw: &str) -> Result<i64, ConfigError> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| invalid_number(field))
    }
}

fn invalid_number(field: &'static str) -> ConfigError {
    match field {
        "socketLimit" => ConfigError::invalid(field, SOCKET_LIMIT_MESSAGE),
        _ => ConfigError::invalid(field, format!("{} is required for the {}", field, COMPONENT)),
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn eshosts_rule(config: &ElasticLoaderConfig) -> Option<ConfigError> {
    let valid = config
        .eshosts
        .as_ref()
        .is_some_and(|hosts| !hosts.is_empty() && hosts.iter().all(|h| !h.trim().is_empty()));
    (!valid).then(|| ConfigError::required("eshosts", COMPONENT))
}

fn alias_name_rule(config: &ElasticLoaderConfig) -> Option<ConfigError> {
    blank(&config.alias_name).then(|| ConfigError::required("aliasName", COMPONENT))
}

fn mapping_path_rule(config: &ElasticLoaderConfig) -> Option<ConfigError> {
    blank(&config.mapping_path).then(|| ConfigError::required("mappingPath", COMPONENT))
}

fn settings_path_rule(config: &ElasticLoaderConfig) -> Option<ConfigError> {
    blank(&config.settings_path).then(|| ConfigError::required("settingsPath", COMPONENT))
}

fn days_to_keep_rule(config: &ElasticLoaderConfig) -> Option<ConfigError> {
    config
        .days_to_keep
        .filter(|days| u32::try_from(*days).is_err())
        .map(|_| invalid_number("daysToKeep"))
}

fn min_indexes_to_keep_rule(config: &ElasticLoaderConfig) -> Option<ConfigError> {
    config
        .min_indexes_to_keep
        .filter(|count| u32::try_from(*count).is_err())
        .map(|_| invalid_number("minIndexesToKeep"))
}

fn socket_limit_rule(config: &ElasticLoaderConfig) -> Option<ConfigError> {
    config
        .socket_limit
        .filter(|limit| *limit <= 0)
        .map(|_| invalid_number("socketLimit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigErrorKind;

    fn good_config() -> ElasticLoaderConfig {
        ElasticLoaderConfig {
            eshosts: Some(vec!["http://localhost:9200/".to_string()]),
            alias_name: Some("bestbets_v1".to_string()),
            mapping_path: Some("es-mappings/mappings.json".to_string()),
            settings_path: Some("es-mappings/settings.json".to_string()),
            days_to_keep: Some(10),
            min_indexes_to_keep: Some(5),
            socket_limit: None,
        }
    }

    fn messages(errors: &[ConfigError]) -> Vec<String> {
        errors.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_valid_config_has_no_errors() {
        assert!(validate_config(&good_config()).is_empty());
        assert!(good_config().check().is_ok());
    }

    #[test]
    fn test_each_missing_required_field() {
        let cases: Vec<(ElasticLoaderConfig, &str)> = vec![
            (
                ElasticLoaderConfig {
                    eshosts: None,
                    ..good_config()
                },
                "eshosts is required for the elastic loader",
            ),
            (
                ElasticLoaderConfig {
                    eshosts: Some(vec![]),
                    ..good_config()
                },
                "eshosts is required for the elastic loader",
            ),
            (
                ElasticLoaderConfig {
                    alias_name: None,
                    ..good_config()
                },
                "aliasName is required for the elastic loader",
            ),
            (
                ElasticLoaderConfig {
                    mapping_path: None,
                    ..good_config()
                },
                "mappingPath is required for the elastic loader",
            ),
            (
                ElasticLoaderConfig {
                    settings_path: Some("  ".to_string()),
                    ..good_config()
                },
                "settingsPath is required for the elastic loader",
            ),
        ];

        for (config, expected) in cases {
            let errors = validate_config(&config);
            assert_eq!(messages(&errors), vec![expected.to_string()]);
            assert_eq!(errors[0].kind, ConfigErrorKind::Missing);
        }
    }

    #[test]
    fn test_invalid_numbers() {
        let config = ElasticLoaderConfig {
            days_to_keep: Some(-1),
            min_indexes_to_keep: Some(-3),
            socket_limit: Some(0),
            ..good_config()
        };

        let errors = validate_config(&config);

        assert_eq!(
            messages(&errors),
            vec![
                "daysToKeep is required for the elastic loader",
                "minIndexesToKeep is required for the elastic loader",
                "socketLimit must be a number greater than 0",
            ]
        );
        assert!(errors.iter().all(|e| e.kind == ConfigErrorKind::Invalid));
    }

    #[test]
    fn test_errors_accumulate_in_order() {
        let errors = validate_config(&ElasticLoaderConfig::default());

        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["eshosts", "aliasName", "mappingPath", "settingsPath"]
        );
    }

    #[test]
    fn test_check_stops_at_first_error() {
        let config = ElasticLoaderConfig {
            alias_name: None,
            socket_limit: Some(-1),
            ..good_config()
        };

        let err = config.check().unwrap_err();

        assert_eq!(err.field, "aliasName");
    }

    #[test]
    fn test_rotation_settings_defaults() {
        let config = ElasticLoaderConfig {
            alias_name: Some("testAlias".to_string()),
            ..Default::default()
        };

        let settings = config.rotation_settings().unwrap();

        assert_eq!(settings.alias_name, "testAlias");
        assert_eq!(settings.days_to_keep, 10);
        assert_eq!(settings.min_indexes_to_keep, 2);
    }

    #[test]
    fn test_rotation_settings_ignores_hosts_and_paths() {
        let config = ElasticLoaderConfig {
            alias_name: Some("bestbets_v1".to_string()),
            days_to_keep: Some(10),
            min_indexes_to_keep: Some(7),
            ..Default::default()
        };

        let settings = config.rotation_settings().unwrap();

        assert_eq!(settings.min_indexes_to_keep, 7);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(ElasticLoaderConfig::parse_number("daysToKeep", " 12 "), Ok(12));

        let err = ElasticLoaderConfig::parse_number("daysToKeep", "chicken").unwrap_err();
        assert_eq!(err.to_string(), "daysToKeep is required for the elastic loader");

        let err = ElasticLoaderConfig::parse_number("socketLimit", "chicken").unwrap_err();
        assert_eq!(err.to_string(), "socketLimit must be a number greater than 0");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let config: ElasticLoaderConfig = serde_json::from_value(serde_json::json!({
            "eshosts": ["http://localhost:9200/"],
            "aliasName": "bestbets_v1",
            "mappingPath": "es-mappings/mappings.json",
            "settingsPath": "es-mappings/settings.json",
            "daysToKeep": 10,
            "socketLimit": 50
        }))
        .unwrap();

        assert_eq!(config.alias_name.as_deref(), Some("bestbets_v1"));
        assert_eq!(config.min_indexes_to_keep, None);
        assert_eq!(config.socket_limit_size(), Some(50));
    }
}
