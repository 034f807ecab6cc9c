//! Structured faults returned by the PSI services.
//!
//! A failing PSI call answers with a non-2xx status and a JSON body that
//! lists every sub-error with its attributes. The whole structure is kept
//! so the console can show it verbatim.

use std::fmt;

use serde::Deserialize;

const RULE: &str = "==============================";

/// A fault body as returned by a PSI service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFault {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<FaultDetail>,
}

/// One sub-error inside a [`RemoteFault`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FaultDetail {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<FaultAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FaultAttribute {
    pub name: String,
    pub value: String,
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Error: {}", self.message)?;

        for detail in &self.errors {
            writeln!(f, "{RULE}")?;
            writeln!(f, "PSClientError Output:")?;
            writeln!(f)?;
            if detail.name.is_empty() {
                writeln!(f, "{}", detail.id)?;
            } else {
                writeln!(f, "{} {}", detail.id, detail.name)?;
            }
            for attr in &detail.attributes {
                writeln!(f, "\t{}: {}", attr.name, attr.value)?;
            }
        }

        write!(f, "{RULE}")
    }
}
