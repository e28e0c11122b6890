//! Add and Edit dialogs.
//!
//! Both dialogs run the same `Idle -> Submitting -> Success | Failed` state
//! machine: validate the draft, upload the chosen image (if any), then write
//! the row. Any failure is logged with its cause and reported to the caller
//! as one generic message per operation.

use crate::upload::{ImageFile, ImageUploader};
use content_admin_error::{backend::BackendError, form::SubmitError};
use content_admin_models::{Record, RecordFields, RecordId};
use content_admin_repository::Repository;
use serde_json::Value;
use tracing::{error, info};
use validator::Validate;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload image. Please try again.";

pub fn add_failed_message<R: Record>() -> String {
    format!("Failed to add {}. Please try again.", R::LABEL)
}

pub fn update_failed_message<R: Record>() -> String {
    format!("Failed to update {}. Please try again.", R::LABEL)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
    Success,
    /// Holds the message shown to the user.
    Failed(String),
}

/// What an Edit submission does with the stored image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChoice {
    /// Leave the stored URL untouched; the column is not sent.
    #[default]
    Keep,
    Replace(ImageFile),
    /// Write `null`.
    Clear,
}

pub struct AddDialog<R: Record> {
    repo: Repository<R>,
    uploader: ImageUploader,
    draft: R::Draft,
    image: Option<ImageFile>,
    state: FormState,
}

impl<R: Record> AddDialog<R> {
    pub fn new(repo: Repository<R>, uploader: ImageUploader) -> Self {
        Self {
            repo,
            uploader,
            draft: R::Draft::default(),
            image: None,
            state: FormState::Idle,
        }
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut R::Draft {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: R::Draft) {
        self.draft = draft;
    }

    pub fn attach_image(&mut self, file: ImageFile) {
        self.image = Some(file);
    }

    pub fn detach_image(&mut self) -> Option<ImageFile> {
        self.image.take()
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Validate, upload, insert. On success the form is reset.
    pub async fn submit(&mut self) -> Result<R, SubmitError> {
        self.state = FormState::Submitting;
        match self.run().await {
            Ok(record) => {
                info!(table = R::TABLE, id = record.id(), "Added {}", R::LABEL);
                self.draft = R::Draft::default();
                self.image = None;
                self.state = FormState::Success;
                Ok(record)
            }
            Err(e) => {
                error!(table = R::TABLE, cause = %e.cause, "{}", e.message);
                self.state = FormState::Failed(e.message.clone());
                Err(e)
            }
        }
    }

    async fn run(&self) -> Result<R, SubmitError> {
        validate(&self.draft)?;

        let image = match &self.image {
            Some(file) => Some(upload::<R>(&self.uploader, file).await?),
            None => None,
        };

        let mut fields = draft_fields(&self.draft)
            .map_err(|e| SubmitError::new(add_failed_message::<R>(), e))?;
        fields.insert("image".into(), image.map_or(Value::Null, Value::String));

        self.repo
            .insert(fields)
            .await
            .map_err(|e| SubmitError::new(add_failed_message::<R>(), e))
    }
}

pub struct EditDialog<R: Record> {
    repo: Repository<R>,
    uploader: ImageUploader,
    id: RecordId,
    current_image: Option<String>,
    draft: R::Draft,
    image: ImageChoice,
    state: FormState,
}

impl<R: Record> EditDialog<R> {
    /// Open the dialog seeded with `record`.
    pub fn open(repo: Repository<R>, uploader: ImageUploader, record: &R) -> Self {
        Self {
            repo,
            uploader,
            id: record.id(),
            current_image: record.image().map(str::to_string),
            draft: record.draft(),
            image: ImageChoice::Keep,
            state: FormState::Idle,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    /// The stored image URL the dialog was opened with.
    pub fn current_image(&self) -> Option<&str> {
        self.current_image.as_deref()
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut R::Draft {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: R::Draft) {
        self.draft = draft;
    }

    pub fn choose_image(&mut self, file: ImageFile) {
        self.image = ImageChoice::Replace(file);
    }

    pub fn clear_image(&mut self) {
        self.image = ImageChoice::Clear;
    }

    pub fn keep_image(&mut self) {
        self.image = ImageChoice::Keep;
    }

    pub fn image_choice(&self) -> &ImageChoice {
        &self.image
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Validate, upload a replacement image if one was chosen, then
    /// overwrite every editable field of the row.
    pub async fn submit(&mut self) -> Result<R, SubmitError> {
        self.state = FormState::Submitting;
        match self.run().await {
            Ok(record) => {
                info!(table = R::TABLE, id = self.id, "Updated {}", R::LABEL);
                self.current_image = record.image().map(str::to_string);
                self.draft = record.draft();
                self.image = ImageChoice::Keep;
                self.state = FormState::Success;
                Ok(record)
            }
            Err(e) => {
                error!(table = R::TABLE, id = self.id, cause = %e.cause, "{}", e.message);
                self.state = FormState::Failed(e.message.clone());
                Err(e)
            }
        }
    }

    async fn run(&self) -> Result<R, SubmitError> {
        validate(&self.draft)?;

        let image = match &self.image {
            ImageChoice::Keep => None,
            ImageChoice::Replace(file) => {
                Some(Value::String(upload::<R>(&self.uploader, file).await?))
            }
            ImageChoice::Clear => Some(Value::Null),
        };

        let mut fields = draft_fields(&self.draft)
            .map_err(|e| SubmitError::new(update_failed_message::<R>(), e))?;
        if let Some(image) = image {
            fields.insert("image".into(), image);
        }

        self.repo
            .update(self.id, fields)
            .await
            .map_err(|e| SubmitError::new(update_failed_message::<R>(), e))
    }
}

fn validate<D: Validate>(draft: &D) -> Result<(), SubmitError> {
    draft.validate().map_err(|errors| {
        SubmitError::new(
            REQUIRED_FIELDS_MESSAGE,
            BackendError::Validation(errors.to_string()),
        )
    })
}

async fn upload<R: Record>(
    uploader: &ImageUploader,
    file: &ImageFile,
) -> Result<String, SubmitError> {
    uploader
        .upload(R::FOLDER, file)
        .await
        .map_err(|e| SubmitError::new(UPLOAD_FAILED_MESSAGE, e))
}

/// The draft as a column map. Unset optional fields are sent as `null`.
fn draft_fields<D: serde::Serialize>(draft: &D) -> Result<RecordFields, BackendError> {
    match serde_json::to_value(draft)? {
        Value::Object(fields) => Ok(fields),
        other => Err(BackendError::Write(format!("draft is not an object: {other}"))),
    }
}
