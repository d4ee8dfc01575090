// src/api/register.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;

use crate::{
    api::{raw::row_from_value, RegisterLookup, RegisterSnapshot},
    common::error::AppError,
    mappers::map_register_snapshot,
};

/// Consulta ao registo público de indivíduos (uma requisição por pessoa).
#[derive(Clone)]
pub struct HttpRegisterLookup {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRegisterLookup {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RegisterLookup for HttpRegisterLookup {
    async fn lookup(&self, irn: &str) -> Result<RegisterSnapshot, AppError> {
        let response = self
            .http
            .request(Method::GET, format!("{}/individuals/{}", self.base_url, irn.trim()))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api {
                status: Some(status.as_u16()),
                message: format!("Register lookup for {irn} failed with {status}"),
            });
        }

        let value = response.json::<serde_json::Value>().await?;
        Ok(map_register_snapshot(&row_from_value(value)))
    }
}
