/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription tier attached to an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Premium,
}

impl Plan {
    /// Parse a plan claim. Accepts bare names ("premium") and Clerk billing
    /// claims scoped to a user ("u:premium"). Anything unknown is free.
    pub fn from_claim(claim: Option<&str>) -> Self {
        let Some(raw) = claim else {
            return Plan::Free;
        };
        let name = raw.trim();
        let name = name.strip_prefix("u:").unwrap_or(name);
        if name.eq_ignore_ascii_case("premium") {
            Plan::Premium
        } else {
            Plan::Free
        }
    }

    pub fn is_premium(&self) -> bool {
        matches!(self, Plan::Premium)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Premium => "premium",
        }
    }
}

/// Kind of artifact stored in the creations table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreationKind {
    #[serde(rename = "article")]
    Article,
    #[serde(rename = "blog-title")]
    BlogTitle,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "resume-review")]
    ResumeReview,
}

impl CreationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationKind::Article => "article",
            CreationKind::BlogTitle => "blog-title",
            CreationKind::Image => "image",
            CreationKind::ResumeReview => "resume-review",
        }
    }
}

impl fmt::Display for CreationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(CreationKind::Article),
            "blog-title" => Ok(CreationKind::BlogTitle),
            "image" => Ok(CreationKind::Image),
            "resume-review" => Ok(CreationKind::ResumeReview),
            other => Err(format!("unknown creation kind '{}'", other)),
        }
    }
}

/// Operations exposed by the gateway, one per endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    GenerateArticle,
    GenerateBlogTitle,
    GenerateImage,
    RemoveBackground,
    RemoveObject,
    ReviewResume,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::GenerateArticle,
        Operation::GenerateBlogTitle,
        Operation::GenerateImage,
        Operation::RemoveBackground,
        Operation::RemoveObject,
        Operation::ReviewResume,
    ];

    /// The kind of creation record a successful run produces
    pub fn creation_kind(&self) -> CreationKind {
        match self {
            Operation::GenerateArticle => CreationKind::Article,
            Operation::GenerateBlogTitle => CreationKind::BlogTitle,
            Operation::GenerateImage | Operation::RemoveBackground | Operation::RemoveObject => {
                CreationKind::Image
            }
            Operation::ReviewResume => CreationKind::ResumeReview,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GenerateArticle => "generate-article",
            Operation::GenerateBlogTitle => "generate-blog-title",
            Operation::GenerateImage => "generate-image",
            Operation::RemoveBackground => "remove-image-background",
            Operation::RemoveObject => "remove-image-object",
            Operation::ReviewResume => "resume-review",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown operation '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_claims() {
        assert_eq!(Plan::from_claim(Some("premium")), Plan::Premium);
        assert_eq!(Plan::from_claim(Some("u:premium")), Plan::Premium);
        assert_eq!(Plan::from_claim(Some("free_user")), Plan::Free);
        assert_eq!(Plan::from_claim(None), Plan::Free);
    }

    #[test]
    fn operations_map_to_creation_kinds() {
        assert_eq!(Operation::GenerateArticle.creation_kind(), CreationKind::Article);
        assert_eq!(Operation::RemoveObject.creation_kind(), CreationKind::Image);
        assert_eq!(Operation::ReviewResume.creation_kind().as_str(), "resume-review");
        assert_eq!("remove-image-background".parse::<Operation>(), Ok(Operation::RemoveBackground));
        assert!("transcode".parse::<Operation>().is_err());
    }
}
