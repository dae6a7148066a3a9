use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::storage::constants::{
    DEFAULT_AZURE_ENDPOINT_SUFFIX, DEFAULT_FS_ROOT, DEFAULT_MINIO_ENDPOINT, DEFAULT_OSS_ENDPOINT,
};
use crate::storage::{StorageConfig, StorageProvider};

pub const CONNECTION_STRING_VAR: &str = "STORAGE_CONNECTION_STRING";

/// Load storage configuration from the process environment.
pub fn load_storage_config() -> Result<StorageConfig> {
    load_storage_config_from(|key| env::var(key).ok())
}

/// Load storage configuration through an arbitrary variable lookup.
///
/// A connection string wins over the per-provider variables.
pub fn load_storage_config_from<F>(lookup: F) -> Result<StorageConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let vars = Vars { lookup };

    if let Some(connection_string) = vars.get(CONNECTION_STRING_VAR) {
        return parse_connection_string(&connection_string, vars.get("STORAGE_BUCKET"));
    }

    let provider_str = vars.get("STORAGE_PROVIDER").unwrap_or_else(|| "fs".to_string());
    let provider = StorageProvider::from_str(&provider_str)?;

    match provider {
        StorageProvider::Oss => load_oss_config(&vars),
        StorageProvider::S3 => load_s3_config(&vars, &provider_str),
        StorageProvider::Azblob => load_azblob_config(&vars),
        StorageProvider::Fs => Ok(load_fs_config(&vars)),
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn first(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.get(key))
    }

    // Primary key first, then the provider specific fallback.
    fn require(&self, primary_key: &str, secondary_key: &str) -> Result<String> {
        self.first(&[primary_key, secondary_key])
            .ok_or_else(|| Error::MissingEnvVar {
                key: format!("{primary_key} or {secondary_key}"),
            })
    }
}

/// Load OSS (Alibaba Cloud) configuration
fn load_oss_config<F: Fn(&str) -> Option<String>>(vars: &Vars<F>) -> Result<StorageConfig> {
    let bucket = vars.require("STORAGE_BUCKET", "OSS_BUCKET")?;
    let access_key_id = vars.require("STORAGE_ACCESS_KEY_ID", "OSS_ACCESS_KEY_ID")?;
    let access_key_secret = vars.require("STORAGE_ACCESS_KEY_SECRET", "OSS_ACCESS_KEY_SECRET")?;
    let region = vars.first(&["STORAGE_REGION", "OSS_REGION"]);
    let endpoint = vars
        .first(&["STORAGE_ENDPOINT", "OSS_ENDPOINT"])
        .unwrap_or_else(|| DEFAULT_OSS_ENDPOINT.to_string());

    let mut config = StorageConfig::oss(bucket, access_key_id, access_key_secret, region);
    config.endpoint = Some(endpoint);
    Ok(config)
}

/// Load S3 (AWS) or MinIO configuration
fn load_s3_config<F: Fn(&str) -> Option<String>>(
    vars: &Vars<F>,
    provider_str: &str,
) -> Result<StorageConfig> {
    let is_minio = provider_str.eq_ignore_ascii_case("minio");
    let (bucket_key, id_key, secret_key) = if is_minio {
        ("MINIO_BUCKET", "MINIO_ACCESS_KEY", "MINIO_SECRET_KEY")
    } else {
        ("AWS_S3_BUCKET", "AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY")
    };

    let bucket = vars.require("STORAGE_BUCKET", bucket_key)?;
    let access_key_id = vars.require("STORAGE_ACCESS_KEY_ID", id_key)?;
    let secret_access_key = vars.require("STORAGE_ACCESS_KEY_SECRET", secret_key)?;
    let region = vars.first(&["STORAGE_REGION", "AWS_DEFAULT_REGION", "MINIO_DEFAULT_REGION"]);

    let endpoint = if is_minio {
        Some(
            vars.first(&["STORAGE_ENDPOINT", "MINIO_ENDPOINT"])
                .unwrap_or_else(|| DEFAULT_MINIO_ENDPOINT.to_string()),
        )
    } else {
        vars.get("STORAGE_ENDPOINT")
    };

    let mut config = StorageConfig::s3(bucket, access_key_id, secret_access_key, region);
    config.endpoint = endpoint;
    Ok(config)
}

/// Load Azure Blob configuration
fn load_azblob_config<F: Fn(&str) -> Option<String>>(vars: &Vars<F>) -> Result<StorageConfig> {
    let bucket = vars.require("STORAGE_BUCKET", "AZURE_STORAGE_CONTAINER")?;
    let account_name = vars.require("STORAGE_ACCESS_KEY_ID", "AZURE_STORAGE_ACCOUNT_NAME")?;
    let account_key = vars.require("STORAGE_ACCESS_KEY_SECRET", "AZURE_STORAGE_ACCOUNT_KEY")?;
    let endpoint = vars
        .get("STORAGE_ENDPOINT")
        .unwrap_or_else(|| azure_endpoint("https", &account_name, DEFAULT_AZURE_ENDPOINT_SUFFIX));

    Ok(StorageConfig::azblob(bucket, account_name, account_key, endpoint))
}

/// Load filesystem configuration (for dry runs and testing)
fn load_fs_config<F: Fn(&str) -> Option<String>>(vars: &Vars<F>) -> StorageConfig {
    let root_path = vars
        .get("STORAGE_ROOT_PATH")
        .unwrap_or_else(|| DEFAULT_FS_ROOT.to_string());
    StorageConfig::fs(root_path)
}

fn azure_endpoint(protocol: &str, account_name: &str, suffix: &str) -> String {
    format!("{protocol}://{account_name}.blob.{suffix}")
}

fn invalid(reason: impl Into<String>) -> Error {
    Error::InvalidConnectionString {
        reason: reason.into(),
    }
}

/// Parse a `Key=Value;Key=Value` connection string.
///
/// Keys are case-insensitive and values are split at the first `=` only.
/// `fallback_bucket` is used when the string names no bucket.
pub fn parse_connection_string(
    connection_string: &str,
    fallback_bucket: Option<String>,
) -> Result<StorageConfig> {
    let mut pairs: HashMap<String, String> = HashMap::new();
    for segment in connection_string.split(';').map(str::trim) {
        if segment.is_empty() {
            continue;
        }
        let (key, value) = segment
            .split_once('=')
            .ok_or_else(|| invalid(format!("segment '{segment}' is not a Key=Value pair")))?;
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(invalid(format!("segment '{segment}' has an empty key")));
        }
        pairs.insert(key, value.trim().to_string());
    }
    if pairs.is_empty() {
        return Err(invalid("connection string is empty"));
    }

    let get = |keys: &[&str]| -> Option<String> {
        keys.iter()
            .find_map(|key| pairs.get(*key))
            .filter(|v| !v.is_empty())
            .cloned()
    };

    let provider = match get(&["provider"]) {
        Some(p) => StorageProvider::from_str(&p)?,
        None if get(&["accountname"]).is_some() => StorageProvider::Azblob,
        None => StorageProvider::S3,
    };

    let endpoint = get(&["endpoint", "blobendpoint"]);
    let region = get(&["region"]);
    let credentials = || -> Result<(String, String, String)> {
        let bucket = get(&["bucket", "container"])
            .or_else(|| fallback_bucket.clone())
            .ok_or_else(|| invalid("missing Bucket (or STORAGE_BUCKET)"))?;
        let access_key_id = get(&["accesskeyid", "accountname"])
            .ok_or_else(|| invalid("missing AccessKeyId/AccountName"))?;
        let access_key_secret = get(&["accesskeysecret", "accountkey"])
            .ok_or_else(|| invalid("missing AccessKeySecret/AccountKey"))?;
        Ok((bucket, access_key_id, access_key_secret))
    };

    let config = match provider {
        StorageProvider::Fs => {
            StorageConfig::fs(get(&["root"]).unwrap_or_else(|| DEFAULT_FS_ROOT.to_string()))
        }
        StorageProvider::Oss => {
            let (bucket, access_key_id, access_key_secret) = credentials()?;
            let mut config = StorageConfig::oss(bucket, access_key_id, access_key_secret, region);
            config.endpoint = Some(endpoint.unwrap_or_else(|| DEFAULT_OSS_ENDPOINT.to_string()));
            config
        }
        StorageProvider::S3 => {
            let (bucket, access_key_id, access_key_secret) = credentials()?;
            let mut config = StorageConfig::s3(bucket, access_key_id, access_key_secret, region);
            config.endpoint = endpoint;
            config
        }
        StorageProvider::Azblob => {
            let (bucket, account_name, account_key) = credentials()?;
            let endpoint = endpoint.unwrap_or_else(|| {
                let protocol =
                    get(&["defaultendpointsprotocol"]).unwrap_or_else(|| "https".to_string());
                let suffix = get(&["endpointsuffix"])
                    .unwrap_or_else(|| DEFAULT_AZURE_ENDPOINT_SUFFIX.to_string());
                azure_endpoint(&protocol, &account_name, &suffix)
            });
            StorageConfig::azblob(bucket, account_name, account_key, endpoint)
        }
    };
    Ok(config)
}
