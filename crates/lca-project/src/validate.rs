//! Project validation logic.

use std::collections::{HashMap, HashSet};

use crate::schema::{CriticalRuleDef, Project, StoreDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    if project.name.trim().is_empty() {
        return Err(invalid("name", "", "must not be empty"));
    }

    if project.inventory.path.as_os_str().is_empty() {
        return Err(invalid("inventory.path", "", "must not be empty"));
    }

    if let StoreDef::Ipc {
        host,
        port,
        timeout_s,
    } = &project.store
    {
        if host.trim().is_empty() {
            return Err(invalid("store.host", host, "must not be empty"));
        }
        if *port == 0 {
            return Err(invalid("store.port", port, "must be non-zero"));
        }
        if let Some(t) = timeout_s
            && (!t.is_finite() || *t <= 0.0)
        {
            return Err(invalid("store.timeout_s", t, "must be positive"));
        }
    }

    match project.aggregation.rule {
        CriticalRuleDef::TiedMax { tolerance } => {
            if !tolerance.is_finite() || !(0.0..1.0).contains(&tolerance) {
                return Err(invalid(
                    "aggregation.rule.tolerance",
                    tolerance,
                    "must be in [0, 1)",
                ));
            }
        }
        CriticalRuleDef::MinShare { share } => {
            if !share.is_finite() || share <= 0.0 || share > 1.0 {
                return Err(invalid(
                    "aggregation.rule.share",
                    share,
                    "must be in (0, 1]",
                ));
            }
        }
    }

    let mut labels = HashSet::new();
    let mut member_owner: HashMap<&str, &str> = HashMap::new();
    for candidate in &project.aggregation.candidates {
        if candidate.label.trim().is_empty() {
            return Err(invalid("aggregation.candidates.label", "", "must not be empty"));
        }
        if !labels.insert(candidate.label.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: candidate.label.clone(),
                context: "aggregation candidates".to_string(),
            });
        }
        let members: Vec<&str> = if candidate.members.is_empty() {
            vec![candidate.label.as_str()]
        } else {
            candidate.members.iter().map(String::as_str).collect()
        };
        for member in members {
            if let Some(owner) = member_owner.insert(member, candidate.label.as_str()) {
                return Err(ValidationError::DuplicateId {
                    id: member.to_string(),
                    context: format!(
                        "candidate members ('{}' and '{}')",
                        owner, candidate.label
                    ),
                });
            }
        }
    }

    Ok(())
}
