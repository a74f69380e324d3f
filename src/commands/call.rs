use crate::config::Config;
use crate::errors::{Result, WechatError};
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use wechat_api::{ApiClient, Wechat};

/// Handles `wechat get <URL>`: prints the decoded response as pretty JSON
pub async fn handle_get(url: &str, config: &Config) -> Result<()> {
    let sdk = build_sdk(config)?;
    let response = sdk.get(url).await?;
    print_json(&response)
}

/// Handles `wechat post <URL>` with a body from `--data`, `--file`, or `{}` when neither is given
pub async fn handle_post(
    url: &str,
    data: Option<String>,
    file: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let body = read_body(data.as_deref(), file.as_deref())?;
    let sdk = build_sdk(config)?;
    let response = sdk.post(url, &body).await?;
    print_json(&response)
}

fn build_sdk(config: &Config) -> Result<Wechat> {
    let client = ApiClient::from_config(config)?;
    debug!("Using API family {}", client.family());
    Ok(Wechat::from_client(client))
}

fn read_body(data: Option<&str>, file: Option<&Path>) -> Result<Value> {
    let raw = match (data, file) {
        (Some(_), Some(_)) => {
            return Err(WechatError::InvalidInput(
                "Use either --data or --file, not both".to_string(),
            ))
        }
        (Some(data), None) => data.to_string(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => return Ok(Value::Object(Default::default())),
    };

    serde_json::from_str(&raw)
        .map_err(|e| WechatError::InvalidInput(format!("Request body is not valid JSON: {}", e)))
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
