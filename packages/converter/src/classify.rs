//! Normative/informative classification of policy text.

/// Decides whether text states a requirement.
///
/// Text is normative when it contains any configured keyword as a
/// case-sensitive substring, regardless of where it appears.
#[derive(Debug, Clone)]
pub struct NormativeClassifier {
    keywords: Vec<String>,
}

impl NormativeClassifier {
    /// Create a classifier; empty keywords are ignored.
    #[must_use]
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(Into::into)
                .filter(|k: &String| !k.is_empty())
                .collect(),
        }
    }

    /// Check whether `text` contains a normative keyword.
    ///
    /// # Examples
    /// ```
    /// use pki_policy_converter::classify::NormativeClassifier;
    ///
    /// let classifier = NormativeClassifier::new(["SHALL", "MUST"]);
    /// assert!(classifier.is_normative("The CA SHALL publish its CRL."));
    /// assert!(!classifier.is_normative("The CA shall publish its CRL."));
    /// ```
    #[must_use]
    pub fn is_normative(&self, text: &str) -> bool {
        self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
    }

    /// The keywords in configured order.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}
