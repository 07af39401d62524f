//! Form validation layer
//!
//! Parses and validates incoming post and comment submissions.
//! Validation collects field-level errors instead of failing on the
//! first problem, so clients can re-render the whole form.

use std::collections::BTreeMap;
use std::fmt;

use axum::extract::Multipart;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Maximum accepted size for an uploaded post image
pub const MAX_IMAGE_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const REQUIRED_MESSAGE: &str = "This field is required.";

/// Field-level validation errors, keyed by field name
///
/// BTreeMap keeps serialization order deterministic.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into a result: `Ok` when no field errored.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Form(self))
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// An image uploaded alongside a post form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// File extension for the upload, by MIME type.
    pub fn extension(&self) -> Option<&'static str> {
        match self.content_type.as_str() {
            "image/jpeg" => Some("jpg"),
            "image/png" => Some("png"),
            "image/gif" => Some("gif"),
            "image/webp" => Some("webp"),
            _ => None,
        }
    }
}

/// A post create/edit submission
///
/// Parsed from a multipart form with `text`, optional `group` (slug)
/// and optional `image` fields.
#[derive(Debug, Default)]
pub struct PostForm {
    pub text: String,
    pub group: Option<String>,
    pub image: Option<ImageUpload>,
}

impl PostForm {
    /// Read a post form out of a multipart request body.
    ///
    /// Unknown fields are skipped. Size and content-type problems on
    /// the image field are deferred to [`PostForm::validate`] so they
    /// surface as field errors, not transport errors.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to parse multipart: {}", e)))?
        {
            let field_name = field.name().unwrap_or("").to_string();

            match field_name.as_str() {
                "text" => {
                    form.text = field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Invalid text field: {}", e)))?;
                }
                "group" => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Invalid group field: {}", e)))?;
                    let value = value.trim().to_string();
                    if !value.is_empty() {
                        form.group = Some(value);
                    }
                }
                "image" => {
                    let content_type = field
                        .content_type()
                        .map(ToOwned::to_owned)
                        .unwrap_or_default();

                    let mut bytes = Vec::new();
                    while let Some(chunk) = field.chunk().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read image upload: {}", e))
                    })? {
                        if bytes.len() + chunk.len() > MAX_IMAGE_UPLOAD_BYTES {
                            return Err(AppError::Validation(format!(
                                "image must be at most {} bytes",
                                MAX_IMAGE_UPLOAD_BYTES
                            )));
                        }
                        bytes.extend_from_slice(&chunk);
                    }

                    // Browsers send an empty image part when the file
                    // input is left blank.
                    if !bytes.is_empty() {
                        form.image = Some(ImageUpload {
                            content_type,
                            bytes,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Validate the submission, collecting field errors.
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if self.text.trim().is_empty() {
            errors.add("text", REQUIRED_MESSAGE);
        }

        if let Some(image) = &self.image {
            if image.extension().is_none() {
                errors.add(
                    "image",
                    format!("Unsupported image type: {}", image.content_type),
                );
            }
        }

        errors
    }
}

/// A comment submission (urlencoded form body)
#[derive(Debug, Default, Deserialize)]
pub struct CommentForm {
    pub text: Option<String>,
}

impl CommentForm {
    /// Normalized comment text, or `None` when the submission is
    /// invalid (absent or blank).
    pub fn normalized_text(&self) -> Option<String> {
        let text = self.text.as_deref()?.trim();
        if text.is_empty() {
            return None;
        }
        Some(text.to_string())
    }
}

/// Signup form fields
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub password: Option<String>,
}

impl SignupForm {
    const MIN_PASSWORD_CHARS: usize = 8;
    const MAX_USERNAME_CHARS: usize = 150;

    /// Validate and normalize the signup submission.
    pub fn validate(&self) -> Result<ValidSignup, AppError> {
        let mut errors = FormErrors::new();

        let username = self.username.as_deref().unwrap_or("").trim().to_string();
        if username.is_empty() {
            errors.add("username", REQUIRED_MESSAGE);
        } else if username.chars().count() > Self::MAX_USERNAME_CHARS {
            errors.add("username", "Username is too long.");
        } else if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            errors.add(
                "username",
                "Username may only contain letters, digits, '_', '-' and '.'.",
            );
        }

        let email = self.email.as_deref().unwrap_or("").trim().to_string();
        if email.is_empty() {
            errors.add("email", REQUIRED_MESSAGE);
        } else if !email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }

        let password = self.password.clone().unwrap_or_default();
        if password.chars().count() < Self::MIN_PASSWORD_CHARS {
            errors.add(
                "password",
                format!(
                    "Password must be at least {} characters.",
                    Self::MIN_PASSWORD_CHARS
                ),
            );
        }

        let display_name = self
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToOwned::to_owned);

        errors.into_result()?;

        Ok(ValidSignup {
            username,
            email,
            display_name,
            password,
        })
    }
}

/// A validated signup submission
#[derive(Debug)]
pub struct ValidSignup {
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password: String,
}
