mod builtin;

use serde::{ Deserialize, Serialize };
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Knowledge file IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Knowledge JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid knowledge base: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub address: String,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub whatsapp: String,
}

impl Contact {
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(|s| s.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    pub tagline: String,
    pub about: String,
    pub vision: String,
    pub mission: String,
    pub values: Vec<Value>,
    pub contact: Contact,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    pub details: Vec<String>,
    pub benefits: Vec<String>,
    pub icon_name: String,
    pub image: String,
}

/// Static company profile and service catalogue. Loaded once at startup and
/// shared read-only behind an `Arc`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    pub company: CompanyInfo,
    pub services: Vec<Service>,
}

impl KnowledgeBase {
    pub fn builtin() -> Self {
        builtin::knowledge_base()
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn validate(&self) -> Result<(), KnowledgeError> {
        if self.services.is_empty() {
            return Err(KnowledgeError::Invalid("service list is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for service in &self.services {
            if service.id.trim().is_empty() {
                return Err(
                    KnowledgeError::Invalid(format!("service '{}' has an empty id", service.title))
                );
            }
            if !seen.insert(service.id.as_str()) {
                return Err(KnowledgeError::Invalid(format!("duplicate service id '{}'", service.id)));
            }
        }
        if self.company.contact.primary_email().is_none() {
            return Err(KnowledgeError::Invalid("contact has no email address".to_string()));
        }
        Ok(())
    }
}

pub fn load_knowledge<P: AsRef<Path>>(path: P) -> Result<KnowledgeBase, KnowledgeError> {
    let content = fs::read_to_string(path.as_ref())?;
    let kb: KnowledgeBase = serde_json::from_str(&content)?;
    kb.validate()?;
    info!(
        "Loaded knowledge base from '{}' ({} services)",
        path.as_ref().display(),
        kb.services.len()
    );
    Ok(kb)
}

/// Uses the file at `path` when given, otherwise the built-in profile.
pub fn initialize_knowledge(path: Option<&str>) -> Result<Arc<KnowledgeBase>, KnowledgeError> {
    match path.filter(|p| !p.trim().is_empty()) {
        Some(p) => Ok(Arc::new(load_knowledge(p)?)),
        None => {
            let kb = KnowledgeBase::builtin();
            info!("Using built-in knowledge base ({} services)", kb.services.len());
            Ok(Arc::new(kb))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_is_valid() {
        let kb = KnowledgeBase::builtin();
        kb.validate().unwrap();
        assert_eq!(kb.services.len(), 5);
        assert!(kb.service("hr-consultancy").is_some());
        assert!(kb.service("payroll").is_none());
    }

    #[test]
    fn rejects_duplicate_service_ids() {
        let mut kb = KnowledgeBase::builtin();
        let copy = kb.services[0].clone();
        kb.services.push(copy);
        assert!(matches!(kb.validate(), Err(KnowledgeError::Invalid(_))));
    }

    #[test]
    fn loads_json_file_round_trip() {
        let kb = KnowledgeBase::builtin();
        let path = std::env::temp_dir().join(format!("kb-{}.json", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(serde_json::to_string(&kb).unwrap().as_bytes()).unwrap();

        let loaded = load_knowledge(&path).unwrap();
        assert_eq!(loaded, kb);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_knowledge("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, KnowledgeError::Io(_)));
    }
}
