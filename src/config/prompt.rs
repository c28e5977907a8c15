use crate::knowledge::KnowledgeBase;

/// In-app destinations the assistant is instructed to link to. The rendered
/// markup is what `markup::extract_segments` turns back into navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    BookService,
    JobApplication,
    TrainingRegistration,
    ContactUs,
}

impl Affordance {
    pub const ALL: [Affordance; 4] = [
        Affordance::BookService,
        Affordance::JobApplication,
        Affordance::TrainingRegistration,
        Affordance::ContactUs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Affordance::BookService => "Book This Service",
            Affordance::JobApplication => "Job Application Portal",
            Affordance::TrainingRegistration => "Training Registration",
            Affordance::ContactUs => "Contact Us",
        }
    }

    pub fn target(&self) -> &'static str {
        match self {
            Affordance::BookService => "/book-service",
            Affordance::JobApplication => "/apply/job-application",
            Affordance::TrainingRegistration => "/apply/training-registration",
            Affordance::ContactUs => "/contact",
        }
    }

    pub fn markup(&self) -> String {
        format!("[{}]({})", self.label(), self.target())
    }

    fn rule(&self) -> String {
        match self {
            Affordance::BookService =>
                format!(
                    "If the user signifies interest in any service, asks to book, or asks how to proceed, YOU MUST provide the direct booking link using exactly this format: {}.",
                    self.markup()
                ),
            Affordance::JobApplication =>
                format!(
                    "If a user asks about job applications, submitting a CV, or looking for work, direct them using this link format: {}.",
                    self.markup()
                ),
            Affordance::TrainingRegistration =>
                format!("If they want to register for training, use: {}.", self.markup()),
            Affordance::ContactUs =>
                format!(
                    "If they need to contact support or find the office location, you can direct them to: {}.",
                    self.markup()
                ),
        }
    }
}

const PERSONA_NAME: &str = "DRMC-Bot";

pub fn build_system_instruction(kb: &KnowledgeBase) -> String {
    let company = &kb.company;
    let values = company.values
        .iter()
        .map(|v| v.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let services = kb.services
        .iter()
        .map(|s| format!("- {}: {} (Details: {})", s.title, s.short_description, s.details.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    let mut rules = vec![
        "Always be polite and professional.".to_string(),
        "Keep answers concise but informative.".to_string(),
    ];
    rules.extend(Affordance::ALL.iter().map(|a| a.rule()));
    rules.push(
        "If you don't know the answer based on the provided info, politely suggest they contact the support team.".to_string()
    );
    let rules = rules
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}", i + 1, r))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are {persona}, the intelligent Customer Care agent for {name}.\n\
Your tone should be professional, corporate, yet approachable and helpful.\n\
Use the following company knowledge base to answer user queries:\n\
\n\
Company Name: {name}\n\
Tagline: {tagline}\n\
About: {about}\n\
Mission: {mission}\n\
Vision: {vision}\n\
Values: {values}\n\
Location: {address}\n\
Contact: Phones: {phones}, Email: {email}\n\
\n\
Services Offered:\n\
{services}\n\
\n\
Rules:\n\
{rules}\n",
        persona = PERSONA_NAME,
        name = company.name,
        tagline = company.tagline,
        about = company.about,
        mission = company.mission,
        vision = company.vision,
        values = values,
        address = company.contact.address,
        phones = company.contact.phones.join(", "),
        email = company.contact.primary_email().unwrap_or_default(),
        services = services,
        rules = rules
    )
}
