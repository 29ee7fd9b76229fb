//! Dialog purpose - why the user opened the category/item picker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The intent a dialog was started with.
///
/// Carried explicitly in callback tokens and the dialog accumulator from
/// the moment the dialog starts; never re-derived from rendered prompt
/// wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// Collect a free-text feedback entry.
    Feedback,
    /// Browse existing feedback and the average rating.
    View,
    /// Collect a 1-5 score.
    Rate,
}

impl Purpose {
    /// Returns the stable token fragment for this purpose.
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Feedback => "feedback",
            Purpose::View => "view",
            Purpose::Rate => "rate",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Purpose {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feedback" => Ok(Purpose::Feedback),
            "view" => Ok(Purpose::View),
            "rate" => Ok(Purpose::Rate),
            other => Err(ValidationError::invalid_format(
                "purpose",
                format!("unknown purpose '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purpose_round_trips_through_str() {
        for purpose in [Purpose::Feedback, Purpose::View, Purpose::Rate] {
            let parsed: Purpose = purpose.as_str().parse().unwrap();
            assert_eq!(parsed, purpose);
        }
    }

    #[test]
    fn purpose_rejects_unknown_value() {
        let result: Result<Purpose, _> = "browse".parse();
        assert!(result.is_err());
    }
}
