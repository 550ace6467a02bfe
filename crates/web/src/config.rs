use std::sync::Arc;

use anyhow::{Context, Result, bail};
use domain::{AdminOnly, ApprovalPolicy, OrganizerOrAdmin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPolicyKind {
    OrganizerOrAdmin,
    AdminOnly,
}

impl ApprovalPolicyKind {
    fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "" | "organizer" => Ok(Self::OrganizerOrAdmin),
            "admin-only" => Ok(Self::AdminOnly),
            other => bail!(
                "Unknown APPROVAL_POLICY '{}', expected 'organizer' or 'admin-only'",
                other
            ),
        }
    }

    pub fn build(self) -> Arc<dyn ApprovalPolicy> {
        match self {
            Self::OrganizerOrAdmin => Arc::new(OrganizerOrAdmin),
            Self::AdminOnly => Arc::new(AdminOnly),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub approval_policy: ApprovalPolicyKind,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            approval_policy: ApprovalPolicyKind::parse(
                &std::env::var("APPROVAL_POLICY").unwrap_or_default(),
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_policy_parsing() {
        assert_eq!(
            ApprovalPolicyKind::parse("").unwrap(),
            ApprovalPolicyKind::OrganizerOrAdmin
        );
        assert_eq!(
            ApprovalPolicyKind::parse("admin-only").unwrap(),
            ApprovalPolicyKind::AdminOnly
        );
        assert!(ApprovalPolicyKind::parse("anyone").is_err());
    }
}
