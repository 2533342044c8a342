use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, Map, Source, Value, ValueKind};
use serde::{Deserialize, Serialize};

use crate::{ApiKey, StorageError, StorageResult};

/// Endpoint of the Airtable REST API.
pub const DEFAULT_AIRTABLE_ENDPOINT: &str = "https://api.airtable.com/";

/// Prefix of the environment variables read by [StorageConfiguration::environment_source].
const ENVIRONMENT_PREFIX: &str = "AIRTABLE";

/// Configuration as given by the caller, nothing checked yet.
///
/// The table names are kept untyped so that each malformed input is reported with its own
/// message by [RawStorageConfiguration::validate].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStorageConfiguration {
    /// Airtable personal access token.
    pub api_key: Option<ApiKey>,

    /// Identifier of the base holding the tables (`app...`).
    pub base_id: Option<String>,

    /// Names of the tables, expected to be a list of strings.
    pub table_names: Option<serde_json::Value>,

    /// Url of the Airtable API, [DEFAULT_AIRTABLE_ENDPOINT] if not set.
    pub endpoint: Option<String>,

    /// Timeout applied to each request, in milliseconds.
    pub request_timeout_ms: Option<u64>,
}

impl RawStorageConfiguration {
    /// Check the configuration, returning the typed [StorageConfiguration].
    pub fn validate(&self) -> StorageResult<StorageConfiguration> {
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| configuration_error("airtable apiKey is required."))?;
        let base_id = self
            .base_id
            .clone()
            .filter(|base| !base.is_empty())
            .ok_or_else(|| configuration_error("airtable root base is required."))?;
        let table_names = validate_table_names(self.table_names.as_ref())?;

        Ok(StorageConfiguration {
            api_key,
            base_id,
            table_names,
            endpoint: self
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_AIRTABLE_ENDPOINT.to_string()),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
        })
    }
}

fn configuration_error(message: &str) -> StorageError {
    StorageError::Configuration(message.to_string())
}

fn validate_table_names(table_names: Option<&serde_json::Value>) -> StorageResult<Vec<String>> {
    let entries = match table_names {
        None | Some(serde_json::Value::Null) => {
            return Err(configuration_error(
                "at least one airtable base table is required.",
            ));
        }
        Some(serde_json::Value::Array(entries)) => entries,
        Some(_) => return Err(configuration_error("tables must be an array.")),
    };
    if entries.is_empty() {
        return Err(configuration_error(
            "at least one airtable base table is required.",
        ));
    }

    entries
        .iter()
        .map(|entry| match entry {
            serde_json::Value::String(name)
                if !name.is_empty() && !name.chars().all(|c| c.is_ascii_digit()) =>
            {
                Ok(name.clone())
            }
            _ => Err(configuration_error(
                "airtable base table name must be a string.",
            )),
        })
        .collect()
}

/// Validated configuration of the storage.
///
/// Only obtained through [RawStorageConfiguration::validate], [StorageConfiguration::new] or
/// [StorageConfiguration::load], so the api key, the base id and the table names always hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageConfiguration {
    api_key: ApiKey,
    base_id: String,
    table_names: Vec<String>,
    endpoint: String,
    request_timeout: Option<Duration>,
}

impl StorageConfiguration {
    /// Build a configuration in code, with the same checks as a loaded one.
    pub fn new<K, B, I, N>(api_key: K, base_id: B, table_names: I) -> StorageResult<Self>
    where
        K: Into<ApiKey>,
        B: Into<String>,
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        RawStorageConfiguration {
            api_key: Some(api_key.into()),
            base_id: Some(base_id.into()),
            table_names: Some(serde_json::Value::Array(
                table_names
                    .into_iter()
                    .map(|name| serde_json::Value::String(name.into()))
                    .collect(),
            )),
            ..RawStorageConfiguration::default()
        }
        .validate()
    }

    /// Airtable personal access token.
    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Identifier of the base holding the tables.
    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// Names of the tables, in configuration order.
    pub fn table_names(&self) -> &[String] {
        &self.table_names
    }

    /// Url of the Airtable API.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Timeout applied to each request.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Set the url of the Airtable API.
    pub fn with_endpoint<U: Into<String>>(mut self, endpoint: U) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the timeout applied to each request.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the sources of the given builder on top of the [DefaultConfiguration] and
    /// validate the result.
    pub fn load(config_builder: ConfigBuilder<DefaultState>) -> StorageResult<Self> {
        let caller_config = config_builder
            .build()
            .map_err(|e| StorageError::Configuration(format!("configuration build error: {e}")))?;
        let raw_configuration: RawStorageConfiguration = Config::builder()
            .add_source(DefaultConfiguration::default())
            .add_source(caller_config)
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| {
                StorageError::Configuration(format!("configuration deserialize error: {e}"))
            })?;

        raw_configuration.validate()
    }

    /// Source reading `AIRTABLE_API_KEY`, `AIRTABLE_BASE_ID`, `AIRTABLE_TABLE_NAMES`
    /// (comma separated), `AIRTABLE_ENDPOINT` and `AIRTABLE_REQUEST_TIMEOUT_MS`.
    pub fn environment_source() -> Environment {
        Environment::with_prefix(ENVIRONMENT_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("table_names")
    }
}

/// Default values of the configuration.
#[derive(Debug, Clone)]
pub struct DefaultConfiguration {
    /// Url of the Airtable API.
    pub endpoint: String,
}

impl Default for DefaultConfiguration {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_AIRTABLE_ENDPOINT.to_string(),
        }
    }
}

impl Source for DefaultConfiguration {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        let mut result = Map::new();
        let namespace = "default configuration".to_string();
        result.insert(
            "endpoint".to_string(),
            Value::new(Some(&namespace), ValueKind::from(self.endpoint.clone())),
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::test::assert_error_matches;

    use super::*;

    fn raw_configuration(table_names: serde_json::Value) -> RawStorageConfiguration {
        RawStorageConfiguration {
            api_key: Some(ApiKey::new("patKey")),
            base_id: Some("appBase".to_string()),
            table_names: Some(table_names),
            ..RawStorageConfiguration::default()
        }
    }

    fn assert_configuration_error(
        result: StorageResult<StorageConfiguration>,
        expected_message: &str,
    ) {
        match result {
            Err(StorageError::Configuration(message)) => assert_eq!(expected_message, message),
            other => panic!("Expected a configuration error '{expected_message}', got {other:?}"),
        }
    }

    #[test]
    fn validate_keeps_table_names_order_and_applies_defaults() {
        let configuration = raw_configuration(json!(["users", "teams"])).validate().unwrap();

        assert_eq!(vec!["users", "teams"], configuration.table_names);
        assert_eq!(DEFAULT_AIRTABLE_ENDPOINT, configuration.endpoint);
        assert_eq!(None, configuration.request_timeout);
    }

    #[test]
    fn validate_fails_without_api_key() {
        for api_key in [None, Some(ApiKey::new(""))] {
            let configuration = RawStorageConfiguration {
                api_key,
                ..raw_configuration(json!(["users"]))
            };

            assert_configuration_error(configuration.validate(), "airtable apiKey is required.");
        }
    }

    #[test]
    fn validate_fails_without_base_id() {
        for base_id in [None, Some(String::new())] {
            let configuration = RawStorageConfiguration {
                base_id,
                ..raw_configuration(json!(["users"]))
            };

            assert_configuration_error(configuration.validate(), "airtable root base is required.");
        }
    }

    #[test]
    fn validate_fails_without_table_names() {
        let configuration = RawStorageConfiguration {
            table_names: None,
            ..raw_configuration(json!([]))
        };

        assert_configuration_error(
            configuration.validate(),
            "at least one airtable base table is required.",
        );
        assert_configuration_error(
            raw_configuration(json!([])).validate(),
            "at least one airtable base table is required.",
        );
    }

    #[test]
    fn validate_fails_when_table_names_is_not_a_list() {
        for table_names in [json!("users"), json!({ "name": "users" }), json!(12)] {
            assert_configuration_error(
                raw_configuration(table_names).validate(),
                "tables must be an array.",
            );
        }
    }

    #[test]
    fn validate_fails_on_invalid_table_name() {
        for table_names in [json!(["users", 12]), json!([""]), json!(["123"]), json!([null])] {
            assert_configuration_error(
                raw_configuration(table_names).validate(),
                "airtable base table name must be a string.",
            );
        }
    }

    #[test]
    fn table_names_mixing_digits_and_letters_are_valid() {
        let configuration = raw_configuration(json!(["2024 sales"])).validate().unwrap();

        assert_eq!(vec!["2024 sales"], configuration.table_names);
    }

    #[test]
    fn new_applies_same_checks() {
        let configuration = StorageConfiguration::new("patKey", "appBase", ["users"])
            .unwrap()
            .with_endpoint("http://localhost:8080")
            .with_request_timeout(Duration::from_secs(3));

        assert_eq!("http://localhost:8080", configuration.endpoint);
        assert_eq!(Some(Duration::from_secs(3)), configuration.request_timeout);
        assert_configuration_error(
            StorageConfiguration::new("patKey", "appBase", Vec::<String>::new()),
            "at least one airtable base table is required.",
        );
    }

    #[test]
    fn load_applies_default_endpoint_below_caller_sources() {
        let configuration = StorageConfiguration::load(
            Config::builder()
                .set_override("api_key", "patKey")
                .unwrap()
                .set_override("base_id", "appBase")
                .unwrap()
                .set_override("table_names", vec!["users", "teams"])
                .unwrap()
                .set_override("request_timeout_ms", 1500)
                .unwrap(),
        )
        .unwrap();

        assert_eq!(DEFAULT_AIRTABLE_ENDPOINT, configuration.endpoint);
        assert_eq!(vec!["users", "teams"], configuration.table_names);
        assert_eq!(Some(Duration::from_millis(1500)), configuration.request_timeout);
    }

    #[test]
    fn load_reports_same_errors_as_direct_validation() {
        let result = StorageConfiguration::load(
            Config::builder()
                .set_override("api_key", "patKey")
                .unwrap()
                .set_override("base_id", "appBase")
                .unwrap(),
        );

        assert_configuration_error(result, "at least one airtable base table is required.");
    }

    #[test]
    fn load_reads_environment_source() {
        let environment = StorageConfiguration::environment_source().source(Some(Map::from([
            ("AIRTABLE_API_KEY".to_string(), "patKey.secret".to_string()),
            ("AIRTABLE_BASE_ID".to_string(), "appBase".to_string()),
            ("AIRTABLE_TABLE_NAMES".to_string(), "users,teams".to_string()),
            ("AIRTABLE_ENDPOINT".to_string(), "http://localhost:8080".to_string()),
        ])));

        let configuration =
            StorageConfiguration::load(Config::builder().add_source(environment)).unwrap();

        assert_eq!("patKey.secret", configuration.api_key.expose_secret());
        assert_eq!("appBase", configuration.base_id);
        assert_eq!(vec!["users", "teams"], configuration.table_names);
        assert_eq!("http://localhost:8080", configuration.endpoint);
    }

    #[test]
    fn load_fails_on_malformed_value() {
        let result = StorageConfiguration::load(
            Config::builder()
                .set_override("request_timeout_ms", "not a number")
                .unwrap(),
        );

        assert_error_matches!(result, Err(StorageError::Configuration(_)));
    }

    #[test]
    fn api_key_is_redacted_when_configuration_is_printed() {
        let configuration =
            StorageConfiguration::new("patKey.secret", "appBase", ["users"]).unwrap();

        assert!(!format!("{configuration:?}").contains("patKey.secret"));
        assert!(
            !serde_json::to_string(&configuration)
                .unwrap()
                .contains("patKey.secret")
        );
    }
}
