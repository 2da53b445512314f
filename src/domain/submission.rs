use serde::{Deserialize, Serialize};

/// Value carried by one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    File {
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
}

/// Ordered snapshot of a form's fields at the moment of submission.
///
/// Fields are forwarded exactly as captured: order is kept and repeated
/// names are allowed, the same way a browser builds `FormData`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub fields: Vec<FormField>,
}

impl SubmissionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField {
            name: name.into(),
            value: FieldValue::Text(value.into()),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.fields.push(FormField {
            name: name.into(),
            value: FieldValue::File {
                file_name: file_name.into(),
                content_type,
                bytes,
            },
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Short description for log lines; never includes field contents.
    pub fn summary(&self) -> String {
        let names: Vec<String> = self
            .fields
            .iter()
            .map(|field| match &field.value {
                FieldValue::Text(value) => format!("{}(text,{}b)", field.name, value.len()),
                FieldValue::File { bytes, .. } => format!("{}(file,{}b)", field.name, bytes.len()),
            })
            .collect();
        format!("fields=[{}]", names.join(", "))
    }
}

/// Where a submission ended up once its request resolved.
///
/// `Superseded` only occurs with sequenced ordering, when a newer submission
/// has already rendered before this one resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    RenderedSuccess,
    RenderedError,
    Superseded,
}

/// How concurrent submissions share the output region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderOrdering {
    /// Whichever response resolves last is rendered last.
    LastWriterWins,
    /// Responses older than the last rendered submission are dropped.
    #[default]
    Sequenced,
}

/// A submit event as delivered by the hosting page.
#[derive(Debug, Clone)]
pub struct SubmitEvent {
    request: SubmissionRequest,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(request: SubmissionRequest) -> Self {
        Self {
            request,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn request(&self) -> &SubmissionRequest {
        &self.request
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    pub sequence: u64,
    pub state: SubmissionState,
    /// What was written into the output region, if anything.
    pub rendered: Option<String>,
}
