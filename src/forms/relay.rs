use super::{ FormDetails, FormError, FormKind, FormSubmission };
use crate::site::THANK_YOU_PATH;
use log::{ error, info, warn };
use reqwest::multipart::{ Form, Part };
use serde::Serialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_JOB_ENDPOINT: &str = "https://formspree.io/f/xyzqenln";
pub const DEFAULT_CONSULTANCY_ENDPOINT: &str = "https://formspree.io/f/xgvjanqr";
pub const DEFAULT_TRAINING_ENDPOINT: &str = "https://formspree.io/f/xgvjanjr";
pub const DEFAULT_BOOKING_ENDPOINT: &str = "https://formspree.io/f/xldyjpaw";

#[derive(Debug, Clone)]
pub struct FormEndpoints {
    pub job_application: String,
    pub consultancy_request: String,
    pub training_registration: String,
    pub service_booking: String,
}

impl FormEndpoints {
    pub fn for_kind(&self, kind: FormKind) -> &str {
        match kind {
            FormKind::JobApplication => &self.job_application,
            FormKind::ConsultancyRequest => &self.consultancy_request,
            FormKind::TrainingRegistration => &self.training_registration,
            FormKind::ServiceBooking => &self.service_booking,
        }
    }
}

impl Default for FormEndpoints {
    fn default() -> Self {
        Self {
            job_application: DEFAULT_JOB_ENDPOINT.to_string(),
            consultancy_request: DEFAULT_CONSULTANCY_ENDPOINT.to_string(),
            training_registration: DEFAULT_TRAINING_ENDPOINT.to_string(),
            service_booking: DEFAULT_BOOKING_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub redirect: String,
    pub name: String,
}

/// Forwards validated submissions to the external form-intake service.
pub struct FormRelay {
    client: reqwest::Client,
    endpoints: FormEndpoints,
}

impl FormRelay {
    pub fn new(endpoints: FormEndpoints, timeout: Duration) -> Result<Self, FormError> {
        for kind in FormKind::ALL {
            let endpoint = endpoints.for_kind(kind);
            match Url::parse(endpoint) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                _ => {
                    return Err(FormError::InvalidEndpoint { kind, endpoint: endpoint.to_string() });
                }
            }
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &FormEndpoints {
        &self.endpoints
    }

    pub async fn submit(&self, submission: &FormSubmission) -> Result<SubmissionReceipt, FormError> {
        submission.validate()?;
        let kind = submission.kind();
        let endpoint = self.endpoints.for_kind(kind);
        let form = build_multipart(submission)?;

        info!("Relaying {} submission to {}", kind, endpoint);
        let response = self.client
            .post(endpoint)
            .header("Accept", "application/json")
            .multipart(form)
            .send().await
            .map_err(|e| {
                error!("Form relay for {} failed: {}", kind, e);
                FormError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Form intake rejected {} submission with status {}", kind, status);
            return Err(FormError::Rejected(status.as_u16()));
        }

        Ok(SubmissionReceipt {
            redirect: THANK_YOU_PATH.to_string(),
            name: submission.full_name.clone(),
        })
    }
}

fn build_multipart(submission: &FormSubmission) -> Result<Form, FormError> {
    let mut form = Form::new()
        .text("fullName", submission.full_name.clone())
        .text("email", submission.email.clone())
        .text("phone", submission.phone.clone())
        .text("message", submission.message.clone());

    if let Some(interest) = &submission.service_interest {
        form = form.text("serviceInterest", interest.clone());
    }

    match &submission.details {
        FormDetails::Consultancy(c) => {
            form = form
                .text("Area of Consultancy", c.area.clone())
                .text("Office Location/Address", c.office_location.clone())
                .text("Preferred Date", c.preferred_date.clone())
                .text("Preferred Time", c.preferred_time.clone());
        }
        FormDetails::Job(job) => {
            form = form
                .text("State of Residence", job.state_of_residence.clone())
                .text("Area of Job Interest", job.area_of_job_interest.clone());
            if let Some(cv) = &job.cv {
                let mut part = Part::bytes(cv.bytes.clone()).file_name(cv.file_name.clone());
                if let Some(ct) = &cv.content_type {
                    part = part
                        .mime_str(ct)
                        .map_err(|e| FormError::Malformed(format!("bad content type '{}': {}", ct, e)))?;
                }
                form = form.part("cv", part);
            }
        }
        FormDetails::Training(t) => {
            form = form
                .text("Desired Training Area", t.training_area.clone())
                .text("Location/Address", t.location.clone());
        }
        FormDetails::Booking => {}
    }

    Ok(form)
}
