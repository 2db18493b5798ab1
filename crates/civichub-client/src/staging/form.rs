//! Upload form state and the destination it is submitted to.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use civichub_core::error::AppError;
use civichub_core::result::AppResult;

use super::StagedFile;
use crate::api::{check_response, transport_error};

/// Text fields entered alongside the staged media.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    /// Display name of the item being created. Required.
    pub name: String,
    /// Additional text fields, sent verbatim.
    pub fields: BTreeMap<String, String>,
}

impl UploadForm {
    /// Create a form with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a text field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Reset every field.
    pub fn clear(&mut self) {
        self.name.clear();
        self.fields.clear();
    }
}

/// What a sink receives on submit.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Trimmed name.
    pub name: String,
    /// Additional text fields.
    pub fields: BTreeMap<String, String>,
    /// Staged media, in selection order.
    pub media: Vec<StagedFile>,
}

/// Destination for a completed form.
#[async_trait]
pub trait UploadSink: Send + Sync {
    /// Deliver the submission.
    async fn send(&self, submission: Submission) -> AppResult<()>;
}

/// Posts submissions as `multipart/form-data`.
#[derive(Debug, Clone)]
pub struct HttpUploadSink {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    media_field: String,
}

impl HttpUploadSink {
    /// Create a sink posting to `url`, attaching media under `media_field`.
    pub fn new(url: impl Into<String>, media_field: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            token: None,
            media_field: media_field.into(),
        }
    }

    /// Send `token` as a bearer credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn form(&self, submission: Submission) -> AppResult<Form> {
        let mut form = Form::new().text("name", submission.name);
        for (key, value) in submission.fields {
            form = form.text(key, value);
        }
        for file in submission.media {
            let part = Part::bytes(file.bytes.to_vec())
                .file_name(file.name)
                .mime_str(&file.content_type)
                .map_err(|e| AppError::validation(format!("Invalid media type: {e}")))?;
            form = form.part(self.media_field.clone(), part);
        }
        Ok(form)
    }
}

#[async_trait]
impl UploadSink for HttpUploadSink {
    async fn send(&self, submission: Submission) -> AppResult<()> {
        let form = self.form(submission)?;
        let mut request = self.client.post(&self.url).multipart(form);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(transport_error)?;
        check_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_fields() {
        let mut form = UploadForm::new("Acme").with_field("link", "https://acme.test");
        form.clear();
        assert_eq!(form, UploadForm::default());
    }

    #[test]
    fn test_invalid_mime_is_rejected() {
        let sink = HttpUploadSink::new("http://localhost/api/partners", "image");
        let submission = Submission {
            name: "Acme".into(),
            fields: BTreeMap::new(),
            media: vec![StagedFile::new("a", "not a mime", &b"x"[..])],
        };
        assert!(sink.form(submission).is_err());
    }
}
