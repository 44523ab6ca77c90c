//! Closed vocabulary of question types.

/// Question type, parsed from the normalized `type` tag of a question record.
///
/// Matching is case-sensitive against the exact tags the export uses; any
/// other tag maps to [`QuestionKind::Other`], which selects the generic
/// answer rule.
///
/// # Examples
///
/// ```
/// use form_flatten_core::QuestionKind;
///
/// assert_eq!(QuestionKind::from_tag("Date of birth"), QuestionKind::DateOfBirth);
/// assert_eq!(QuestionKind::from_tag("date of birth"), QuestionKind::Other);
/// assert_eq!(QuestionKind::Signature.tag(), Some("Signature"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    /// Informational text; no response is expected.
    Statement,
    ShortAnswer,
    Paragraph,
    YesNo,
    PatientName,
    DateOfBirth,
    Checkboxes,
    MultipleChoice,
    Signature,
    /// Any unrecognized tag.
    Other,
}

impl QuestionKind {
    /// Every kind with a recognized tag, in vocabulary order.
    pub const RECOGNIZED: [QuestionKind; 9] = [
        QuestionKind::Statement,
        QuestionKind::ShortAnswer,
        QuestionKind::Paragraph,
        QuestionKind::YesNo,
        QuestionKind::PatientName,
        QuestionKind::DateOfBirth,
        QuestionKind::Checkboxes,
        QuestionKind::MultipleChoice,
        QuestionKind::Signature,
    ];

    /// Maps an already-normalized type tag to its kind.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Statement" => Self::Statement,
            "Short answer" => Self::ShortAnswer,
            "Paragraph" => Self::Paragraph,
            "Yes/No" => Self::YesNo,
            "Patient name" => Self::PatientName,
            "Date of birth" => Self::DateOfBirth,
            "Checkboxes" => Self::Checkboxes,
            "Multiple choice" => Self::MultipleChoice,
            "Signature" => Self::Signature,
            _ => Self::Other,
        }
    }

    /// The export tag for this kind, or `None` for [`QuestionKind::Other`].
    pub fn tag(self) -> Option<&'static str> {
        match self {
            Self::Statement => Some("Statement"),
            Self::ShortAnswer => Some("Short answer"),
            Self::Paragraph => Some("Paragraph"),
            Self::YesNo => Some("Yes/No"),
            Self::PatientName => Some("Patient name"),
            Self::DateOfBirth => Some("Date of birth"),
            Self::Checkboxes => Some("Checkboxes"),
            Self::MultipleChoice => Some("Multiple choice"),
            Self::Signature => Some("Signature"),
            Self::Other => None,
        }
    }

    /// Returns `false` for kinds that never get an output column.
    pub fn expects_response(self) -> bool {
        !matches!(self, Self::Statement)
    }
}
