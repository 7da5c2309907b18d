use crate::config::Config;
use crate::inference_client::interface::{InferenceClient, InferenceError, InferenceResponse};
use crate::library::logger::interface::Logger;
use crate::selected_file::SelectedFile;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

pub const INFER_PATH: &str = "/infer";
pub const FILES_FIELD: &str = "files";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

pub struct InferenceClientHttp {
    client: Client,
    url: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl InferenceClientHttp {
    pub fn new(
        config: &Config,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            url: infer_url(&config.endpoint),
            logger: logger.with_namespace("inference_client").with_namespace("http"),
        })
    }

    fn form(files: &[SelectedFile]) -> Result<Form, InferenceError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.to_vec())
                .file_name(file.name.clone())
                .mime_str(&file.mime_type())?;
            form = form.part(FILES_FIELD, part);
        }
        Ok(form)
    }
}

pub fn infer_url(endpoint: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), INFER_PATH)
}

/// Maps a status code and raw body to the outcome of a batch request.
pub fn parse_response(status: u16, body: &[u8]) -> Result<InferenceResponse, InferenceError> {
    if (200..300).contains(&status) {
        return Ok(serde_json::from_slice(body)?);
    }

    let detail = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => format!("HTTP {}", status),
    };

    Err(InferenceError::Rejected { status, detail })
}

impl InferenceClient for InferenceClientHttp {
    fn infer(&self, files: &[SelectedFile]) -> Result<InferenceResponse, InferenceError> {
        let _ = self.logger.info(&format!(
            "POST {} with {} file(s)",
            self.url,
            files.len()
        ));
        let started = Instant::now();

        let response = self
            .client
            .post(&self.url)
            .multipart(Self::form(files)?)
            .send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?;

        let _ = self.logger.info(&format!(
            "Response {} ({} bytes) after {:.3}s",
            status,
            body.len(),
            started.elapsed().as_secs_f64()
        ));

        parse_response(status, &body)
    }
}
