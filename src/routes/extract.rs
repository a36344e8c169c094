//! Request extractors
//!
//! [`AppJson`] turns JSON rejections into the usual error body. [`AdminForm`]
//! accepts the admin endpoints' body in any of the encodings browsers send:
//! multipart (with an optional photo), urlencoded, JSON or nothing at all.

use crate::auth::ADMIN_SECRET_FIELD;
use crate::error::AppError;
use crate::upload::UploadedFile;
use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection,
        rejection::{BytesRejection, FormRejection, JsonRejection},
        FromRequest, Multipart, Request,
    },
    http::header::CONTENT_TYPE,
    Form,
};
use serde_json::Value;
use std::collections::HashMap;

/// Name of the multipart part carrying the animal photo
pub const PHOTO_FIELD: &str = "photo";

/// `axum::Json` with `AppError` as its rejection
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Flattened admin request body
#[derive(Debug, Default)]
pub struct AdminForm {
    pub fields: HashMap<String, String>,
    pub photo: Option<UploadedFile>,
}

impl AdminForm {
    /// Secret supplied in the body, if any
    pub fn admin_secret(&self) -> Option<&str> {
        self.fields.get(ADMIN_SECRET_FIELD).map(String::as_str)
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            let Some(file_name) = field.file_name().map(str::to_string) else {
                let text = field.text().await?;
                form.fields.insert(name, text);
                continue;
            };

            let bytes = field.bytes().await?;
            // An untouched file input still sends an empty part
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            if name != PHOTO_FIELD {
                return Err(AppError::BadRequest(format!("Unexpected file field: {}", name)));
            }
            if form.photo.is_some() {
                return Err(AppError::BadRequest("Only one photo may be uploaded".to_string()));
            }
            form.photo = Some(UploadedFile {
                field_name: name,
                file_name,
                bytes: bytes.to_vec(),
            });
        }

        Ok(form)
    }

    fn from_json(bytes: &[u8]) -> Result<Self, AppError> {
        let object: serde_json::Map<String, Value> = serde_json::from_slice(bytes)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;

        let fields = object
            .into_iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::Null => return None,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                Some((key, text))
            })
            .collect();

        Ok(Self {
            fields,
            photo: None,
        })
    }
}

impl<S> FromRequest<S> for AdminForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            return Self::from_multipart(multipart).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state).await?;
            return Ok(Self {
                fields,
                photo: None,
            });
        }

        // JSON, or no declared type at all
        let bytes = Bytes::from_request(req, state).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Self::from_json(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use pretty_assertions::assert_eq;

    async fn extract(content_type: Option<&str>, body: impl Into<Body>) -> Result<AdminForm, AppError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        AdminForm::from_request(builder.body(body.into()).unwrap(), &()).await
    }

    #[tokio::test]
    async fn test_empty_body_yields_no_fields() {
        let form = extract(None, Body::empty()).await.unwrap();
        assert!(form.fields.is_empty());
        assert!(form.photo.is_none());
    }

    #[tokio::test]
    async fn test_json_values_become_strings() {
        let form = extract(
            Some("application/json"),
            r#"{"name":"Rex","adopted":true,"breed":null,"adminSecret":"s"}"#,
        )
        .await
        .unwrap();
        assert_eq!(form.fields.get("name").map(String::as_str), Some("Rex"));
        assert_eq!(form.fields.get("adopted").map(String::as_str), Some("true"));
        assert!(!form.fields.contains_key("breed"));
        assert_eq!(form.admin_secret(), Some("s"));
    }

    #[tokio::test]
    async fn test_urlencoded_fields() {
        let form = extract(Some("application/x-www-form-urlencoded"), "name=Tom&type=cat")
            .await
            .unwrap();
        assert_eq!(form.fields.get("type").map(String::as_str), Some("cat"));
    }

    #[tokio::test]
    async fn test_non_object_json_is_rejected() {
        let err = extract(Some("application/json"), "[1,2]").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_multipart_photo_and_empty_file_part() {
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nRex\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"rex.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
            b = boundary
        );
        let form = extract(Some(&format!("multipart/form-data; boundary={}", boundary)), body)
            .await
            .unwrap();
        assert_eq!(form.fields.get("name").map(String::as_str), Some("Rex"));
        let photo = form.photo.unwrap();
        assert_eq!(photo.file_name, "rex.png");
        assert_eq!(photo.bytes, b"PNGDATA");

        let empty = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\r\n--{b}--\r\n",
            b = boundary
        );
        let form = extract(Some(&format!("multipart/form-data; boundary={}", boundary)), empty)
            .await
            .unwrap();
        assert!(form.photo.is_none());
    }
}
