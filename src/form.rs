//! Create / update form with an optional image attachment

use std::sync::Arc;
use tracing::{debug, warn};

use item_manager_api::{ApiError, Attachment, Item, ItemFields, ItemService};

use crate::config::ClientOptions;
use crate::navigation::{Navigator, Route};
use crate::notify::Notifier;
use crate::{ImageRef, LoadGuard, LoadState};

/// File types offered by the picker
pub const ACCEPTED_FILE_TYPES: &str = "image/*,application/pdf";

/// Editable inputs of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Type,
    Category,
    Price,
}

/// Raw input values; price stays text until submit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub item_type: String,
    pub category: String,
    pub price: String,
}

impl FormFields {
    fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            item_type: item.item_type.clone(),
            category: item.category.clone(),
            price: item.price.to_string(),
        }
    }

    /// The request body these inputs produce.
    pub fn to_request(&self) -> ItemFields {
        ItemFields {
            name: self.name.clone(),
            item_type: self.item_type.clone(),
            category: self.category.clone(),
            price: parse_price(&self.price),
        }
    }
}

/// What happened to the attachment after the record was saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// No file was attached
    Skipped,
    Uploaded,
    /// The record is saved but has no new image
    Failed(String),
}

/// Result of [`FormController::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A submit is already running
    Busy,
    Saved { item: Item, upload: UploadOutcome },
    /// Create or update was rejected; the form keeps its input
    Failed(String),
}

/// Owns one record's editable state and saves it in two steps:
/// the record first, then its image.
pub struct FormController {
    service: Arc<dyn ItemService>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    options: ClientOptions,
    item_id: Option<i64>,
    fields: FormFields,
    attachment: Option<Attachment>,
    current_image: Option<String>,
    submitting: bool,
    state: LoadState,
}

impl FormController {
    /// A blank form that creates a new item.
    pub fn create(
        service: Arc<dyn ItemService>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        options: ClientOptions,
    ) -> Self {
        Self {
            service,
            notifier,
            navigator,
            options,
            item_id: None,
            fields: FormFields::default(),
            attachment: None,
            current_image: None,
            submitting: false,
            state: LoadState::Idle,
        }
    }

    /// A form bound to an existing item; call [`initialize`](Self::initialize) to load it.
    pub fn edit(
        service: Arc<dyn ItemService>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        options: ClientOptions,
        item_id: i64,
    ) -> Self {
        let mut form = Self::create(service, notifier, navigator, options);
        form.item_id = Some(item_id);
        form
    }

    pub fn item_id(&self) -> Option<i64> {
        self.item_id
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn current_image(&self) -> Option<&str> {
        self.current_image.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Populate the form from the backend when editing.
    ///
    /// A failed fetch leaves the form empty.
    pub async fn initialize(&mut self) {
        let Some(id) = self.item_id else {
            return;
        };

        let loading = LoadGuard::begin(&mut self.state);
        match self.service.get(id).await {
            Ok(item) => {
                self.fields = FormFields::from_item(&item);
                self.current_image = item.image_path().map(str::to_string);
                loading.finish(LoadState::Populated);
            }
            Err(e) => {
                warn!(id, error = %e, "failed to load item for editing");
                self.notifier.error("Failed to load item details");
                loading.finish(LoadState::Idle);
            }
        }
    }

    pub fn set_field(&mut self, field: FormField, value: &str) {
        let slot = match field {
            FormField::Name => &mut self.fields.name,
            FormField::Type => &mut self.fields.item_type,
            FormField::Category => &mut self.fields.category,
            FormField::Price => &mut self.fields.price,
        };
        *slot = value.to_string();
    }

    /// Pick or clear the file to upload.
    pub fn attach(&mut self, file: Option<Attachment>) {
        self.attachment = file;
    }

    /// Save the record, then upload the attachment if there is one.
    ///
    /// Dropping the returned future before it completes re-enables the form.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.submitting {
            return SubmitOutcome::Busy;
        }

        let item_id = self.item_id;
        let body = self.fields.to_request();
        debug!(?item_id, price = ?body.price, "submitting item form");
        let _submitting = Submitting::begin(&mut self.submitting);

        let saved = match item_id {
            Some(id) => self.service.update(id, &body).await,
            None => self.service.create(&body).await,
        };

        let item = match saved {
            Ok(item) => item,
            Err(e) => {
                warn!(?item_id, error = %e, "failed to save item");
                let message = e.server_message().unwrap_or("Failed to save item").to_string();
                self.notifier.error(&message);
                return SubmitOutcome::Failed(message);
            }
        };

        self.notifier.success(if item_id.is_some() {
            "Item updated successfully!"
        } else {
            "Item created successfully!"
        });

        let upload = match &self.attachment {
            Some(file) => {
                upload_attachment(self.service.as_ref(), self.notifier.as_ref(), item.id, file).await
            }
            None => UploadOutcome::Skipped,
        };

        self.navigator.navigate(Route::List);
        SubmitOutcome::Saved { item, upload }
    }

    pub fn title(&self) -> &'static str {
        if self.item_id.is_some() {
            "Update Item"
        } else {
            "Create New Item"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.submitting, self.item_id) {
            (true, _) => "Saving...",
            (false, Some(_)) => "Update",
            (false, None) => "Save",
        }
    }

    /// The stored image, resolved against the base address. `None` hides the preview.
    pub fn current_image_ref(&self) -> Option<ImageRef> {
        self.current_image
            .as_deref()
            .map(|path| ImageRef::Url(self.options.resolve_image_url(path)))
    }
}

// Holds the submit flag for as long as a save is in flight.
struct Submitting<'a>(&'a mut bool);

impl<'a> Submitting<'a> {
    fn begin(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

async fn upload_attachment(
    service: &dyn ItemService,
    notifier: &dyn Notifier,
    id: i64,
    file: &Attachment,
) -> UploadOutcome {
    match service.upload_image(id, file).await {
        Ok(()) => {
            notifier.success("File uploaded successfully!");
            UploadOutcome::Uploaded
        }
        Err(e) => {
            warn!(id, error = %e, "image upload failed after save");
            let message = upload_message(&e);
            notifier.error(&message);
            UploadOutcome::Failed(message)
        }
    }
}

fn upload_message(e: &ApiError) -> String {
    match e.server_message() {
        Some(message) => format!("Failed to upload file: {}", message),
        None => "Failed to upload file".to_string(),
    }
}

/// Lenient number parsing: the longest leading decimal literal wins,
/// `"12.5kg"` is 12.5 and `"abc"` is `None`.
pub fn parse_price(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
