use serde::Deserialize;

/// Verdict returned by the CAPTCHA provider for one token.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CaptchaVerification {
    pub success: bool,

    #[serde(default)]
    pub score: Option<f64>,

    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

impl CaptchaVerification {
    /// Scoreless verdicts (checkbox challenges) pass on `success` alone.
    pub fn passes(&self, min_score: f64) -> bool {
        self.success && self.score.is_none_or(|score| score >= min_score)
    }
}
