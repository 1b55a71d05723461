//! Catalog resources and their pagination modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// How a resource's endpoint delivers items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pagination {
    /// The server filters and pages; each page is fetched separately.
    Paged,
    /// The server returns the whole collection at once; filtering is local.
    WholeCollection,
}

/// A listable catalog resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Colleges,
    Exams,
    Blogs,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Colleges, Resource::Exams, Resource::Blogs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Colleges => "colleges",
            Resource::Exams => "exams",
            Resource::Blogs => "blogs",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            Resource::Colleges => "college",
            Resource::Exams => "exam",
            Resource::Blogs => "blog",
        }
    }

    /// Capitalised singular name for user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Colleges => "College",
            Resource::Exams => "Exam",
            Resource::Blogs => "Blog",
        }
    }

    /// Name of the category facet in query keys and request parameters.
    pub fn category_facet(&self) -> &'static str {
        match self {
            Resource::Colleges => "country",
            Resource::Exams => "type",
            Resource::Blogs => "category",
        }
    }

    /// Name of the secondary facet, if the resource has one.
    pub fn secondary_facet(&self) -> Option<&'static str> {
        match self {
            Resource::Colleges => Some("exam"),
            Resource::Exams => Some("mode"),
            Resource::Blogs => None,
        }
    }

    pub fn pagination(&self) -> Pagination {
        match self {
            Resource::Colleges => Pagination::Paged,
            Resource::Exams | Resource::Blogs => Pagination::WholeCollection,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "colleges" | "college" => Ok(Resource::Colleges),
            "exams" | "exam" => Ok(Resource::Exams),
            "blogs" | "blog" => Ok(Resource::Blogs),
            other => Err(InvalidInputError::Other {
                message: format!("unknown resource '{}'", other),
            }
            .into()),
        }
    }
}
