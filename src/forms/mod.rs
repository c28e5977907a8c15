pub mod relay;

use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use relay::{ FormEndpoints, FormRelay, SubmissionReceipt };

pub const MAX_ATTACHMENT_BYTES: usize = 2 * 1024 * 1024;
pub const RETRY_MESSAGE: &str = "Something went wrong. Please try again.";

const WORD_MIME_TYPES: [&str; 2] = [
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
const WORD_EXTENSIONS: [&str; 2] = [".doc", ".docx"];

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unknown form '{0}'")]
    UnknownForm(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Please upload your CV to proceed.")]
    MissingAttachment,
    #[error("File size exceeds 2MB limit. Please upload a smaller file.")]
    AttachmentTooLarge(usize),
    #[error("Please upload a Word document (.doc or .docx).")]
    UnsupportedAttachment(String),
    #[error("Malformed submission: {0}")]
    Malformed(String),
    #[error("Form intake rejected the submission with status {0}")]
    Rejected(u16),
    #[error("Invalid intake endpoint for {kind}: '{endpoint}'")]
    InvalidEndpoint {
        kind: FormKind,
        endpoint: String,
    },
    #[error("Form intake unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FormError {
    /// Relay failures are shown as a retryable banner; everything else is a
    /// problem with what the visitor entered.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FormError::Rejected(_) | FormError::Transport(_))
    }

    pub fn user_message(&self) -> String {
        if self.is_retryable() { RETRY_MESSAGE.to_string() } else { self.to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    JobApplication,
    ConsultancyRequest,
    TrainingRegistration,
    ServiceBooking,
}

impl FormKind {
    pub const ALL: [FormKind; 4] = [
        FormKind::JobApplication,
        FormKind::ConsultancyRequest,
        FormKind::TrainingRegistration,
        FormKind::ServiceBooking,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            FormKind::JobApplication => "job-application",
            FormKind::ConsultancyRequest => "consultancy-request",
            FormKind::TrainingRegistration => "training-registration",
            FormKind::ServiceBooking => "book-service",
        }
    }

    /// Site path of the page hosting the form.
    pub fn path(&self) -> &'static str {
        match self {
            FormKind::JobApplication => "/apply/job-application",
            FormKind::ConsultancyRequest => "/apply/consultancy-request",
            FormKind::TrainingRegistration => "/apply/training-registration",
            FormKind::ServiceBooking => "/book-service",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormKind::JobApplication => "Job Application",
            FormKind::ConsultancyRequest => "Request Consultancy",
            FormKind::TrainingRegistration => "Training Registration",
            FormKind::ServiceBooking => "Book a Service",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            FormKind::JobApplication => "Submit your details and CV to join our talent pool.",
            FormKind::ConsultancyRequest => "Tell us about your organizational needs.",
            FormKind::TrainingRegistration => "Register for our upcoming training sessions.",
            FormKind::ServiceBooking => "Schedule a service with our experts.",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FormKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormKind::ALL
            .iter()
            .copied()
            .find(|k| k.slug() == s)
            .ok_or_else(|| FormError::UnknownForm(s.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(FormError::AttachmentTooLarge(self.bytes.len()));
        }
        let name = self.file_name.to_lowercase();
        let by_extension = WORD_EXTENSIONS.iter().any(|ext| name.ends_with(ext));
        let by_mime = self.content_type
            .as_deref()
            .map(|ct| WORD_MIME_TYPES.contains(&ct))
            .unwrap_or(false);
        if !by_extension && !by_mime {
            return Err(FormError::UnsupportedAttachment(self.file_name.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobDetails {
    pub state_of_residence: String,
    pub area_of_job_interest: String,
    pub cv: Option<Attachment>,
}

#[derive(Debug, Clone, Default)]
pub struct ConsultancyDetails {
    pub area: String,
    pub office_location: String,
    pub preferred_date: String,
    pub preferred_time: String,
}

#[derive(Debug, Clone, Default)]
pub struct TrainingDetails {
    pub training_area: String,
    pub location: String,
}

#[derive(Debug, Clone)]
pub enum FormDetails {
    Job(JobDetails),
    Consultancy(ConsultancyDetails),
    Training(TrainingDetails),
    Booking,
}

impl FormDetails {
    pub fn empty(kind: FormKind) -> Self {
        match kind {
            FormKind::JobApplication => FormDetails::Job(JobDetails::default()),
            FormKind::ConsultancyRequest => FormDetails::Consultancy(ConsultancyDetails::default()),
            FormKind::TrainingRegistration => FormDetails::Training(TrainingDetails::default()),
            FormKind::ServiceBooking => FormDetails::Booking,
        }
    }

    pub fn kind(&self) -> FormKind {
        match self {
            FormDetails::Job(_) => FormKind::JobApplication,
            FormDetails::Consultancy(_) => FormKind::ConsultancyRequest,
            FormDetails::Training(_) => FormKind::TrainingRegistration,
            FormDetails::Booking => FormKind::ServiceBooking,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormSubmission {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub service_interest: Option<String>,
    pub details: FormDetails,
}

fn require(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() { Err(FormError::MissingField(field)) } else { Ok(()) }
}

impl FormSubmission {
    pub fn new(kind: FormKind) -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            message: String::new(),
            service_interest: None,
            details: FormDetails::empty(kind),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.details.kind()
    }

    /// Sets a field by its wire name. Unknown names are ignored so extra
    /// inputs from the page do not break submission.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "fullName" => self.full_name = value,
            "email" => self.email = value,
            "phone" => self.phone = value,
            "message" => self.message = value,
            "serviceInterest" => {
                self.service_interest = Some(value).filter(|v| !v.trim().is_empty());
            }
            _ => match &mut self.details {
                FormDetails::Job(job) => match name {
                    "stateOfResidence" => job.state_of_residence = value,
                    "areaOfJobInterest" => job.area_of_job_interest = value,
                    _ => {}
                }
                FormDetails::Consultancy(c) => match name {
                    "consultancyArea" => c.area = value,
                    "officeLocation" => c.office_location = value,
                    "date" => c.preferred_date = value,
                    "time" => c.preferred_time = value,
                    _ => {}
                }
                FormDetails::Training(t) => match name {
                    "trainingArea" => t.training_area = value,
                    "participantLocation" => t.location = value,
                    _ => {}
                }
                FormDetails::Booking => {}
            }
        }
    }

    pub fn attach_cv(&mut self, attachment: Attachment) -> Result<(), FormError> {
        let kind = self.kind();
        match &mut self.details {
            FormDetails::Job(job) => {
                job.cv = Some(attachment);
                Ok(())
            }
            _ => Err(FormError::Malformed(format!("{} does not take an attachment", kind))),
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.full_name, "fullName")?;
        require(&self.email, "email")?;
        if !self.email.contains('@') {
            return Err(FormError::Malformed(format!("'{}' is not an email address", self.email)));
        }
        require(&self.phone, "phone")?;

        match &self.details {
            FormDetails::Job(job) => {
                require(&job.state_of_residence, "stateOfResidence")?;
                require(&job.area_of_job_interest, "areaOfJobInterest")?;
                job.cv.as_ref().ok_or(FormError::MissingAttachment)?.validate()?;
            }
            FormDetails::Consultancy(c) => {
                require(&c.area, "consultancyArea")?;
                require(&c.office_location, "officeLocation")?;
                require(&c.preferred_date, "date")?;
                require(&c.preferred_time, "time")?;
            }
            FormDetails::Training(t) => {
                require(&t.training_area, "trainingArea")?;
                require(&t.location, "participantLocation")?;
            }
            FormDetails::Booking => {
                require(self.service_interest.as_deref().unwrap_or_default(), "serviceInterest")?;
            }
        }

        require(&self.message, "message")
    }
}
