//! The static job listing shown beside the chat.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub role: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub salary: String,
    pub equity: String,
    pub remote: String,
    pub experience: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub posted: String,
    pub recruiter: String,
    pub locations: Vec<String>,
    pub visa: String,
    pub hires: String,
    pub remote_policy: String,
    pub hours: String,
    pub timezones: Vec<String>,
    pub relocation: String,
    pub skills: Vec<String>,
    pub contact: Contact,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Contact {
    /// Avatar initials: first character of each part of the name
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

impl JobListing {
    /// The built-in listing
    pub fn sample() -> Self {
        Self {
            id: "1".to_string(),
            title: "EdTech Learning & Sales Enablement".to_string(),
            salary: "$40K - $65K".to_string(),
            equity: "No equity".to_string(),
            remote: "Remote".to_string(),
            experience: "3-5 years".to_string(),
            job_type: "Full Time".to_string(),
            posted: "yesterday".to_string(),
            recruiter: "Recruiter recently active".to_string(),
            locations: strings(&[
                "Alabama", "Ohio", "Texas", "Illinois", "Michigan", "Georgia", "Wisconsin",
                "Indiana", "Oklahoma",
            ]),
            visa: "Not Available".to_string(),
            hires: "Everywhere".to_string(),
            remote_policy: "Remote only".to_string(),
            hours: "9:00 AM - 6:00 PM".to_string(),
            timezones: strings(&["Mountain Time", "Central Time", "Eastern Time", "Atlantic Time"]),
            relocation: "Allowed".to_string(),
            skills: strings(&["CRM", "Sales", "Presentation Skills", "Onboarding"]),
            contact: Contact {
                name: "Mason Hillgoss".to_string(),
                role: "Employee".to_string(),
                location: "Prague".to_string(),
            },
        }
    }

    /// Load a listing from a JSON file with the same keys as the built-in one
    pub fn load_from_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading job listing {}", path.display()))?;
        let listing = serde_json::from_str(&content)
            .with_context(|| format!("parsing job listing {}", path.display()))?;
        Ok(listing)
    }

    /// Locations shown under the "Show all" toggle; none while collapsed
    pub fn visible_locations(&self, expanded: bool) -> &[String] {
        if expanded {
            &self.locations
        } else {
            &[]
        }
    }

    pub fn timezones_display(&self) -> String {
        self.timezones.join(", ")
    }

    /// Short tags shown under the title
    pub fn headline_tags(&self) -> [&str; 4] {
        [
            self.salary.as_str(),
            self.job_type.as_str(),
            self.experience.as_str(),
            self.remote.as_str(),
        ]
    }
}
