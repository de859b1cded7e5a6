//! Boundary to the external insight text service.
//!
//! The advisor is an opaque text generator. Whatever goes wrong with it,
//! the dashboard shows a fixed fallback line instead.

use serde::Serialize;
use thiserror::Error;

use crate::config::AgendaSettings;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Insight service unavailable: {0}")]
    Unavailable(String),

    #[error("Insight service returned an empty response")]
    EmptyResponse,
}

/// Figures the advisor gets to comment on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightContext {
    pub period_label: String,
    pub revenue: f64,
    pub profit: f64,
    pub volume: usize,
    pub average_ticket: f64,
}

pub trait InsightAdvisor: Send + Sync {
    fn advise(&self, context: &InsightContext) -> Result<String, InsightError>;
}

/// Advisor text, or the configured fallback.
pub fn insight_or_fallback(
    advisor: Option<&dyn InsightAdvisor>,
    context: &InsightContext,
    settings: &AgendaSettings,
) -> String {
    let Some(advisor) = advisor else {
        return settings.unconfigured_insight.clone();
    };

    match advisor.advise(context) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!(error = %InsightError::EmptyResponse, "insight fallback used");
            settings.fallback_insight.clone()
        }
        Err(e) => {
            tracing::warn!(error = %e, "insight fallback used");
            settings.fallback_insight.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<&'static str, &'static str>);

    impl InsightAdvisor for Fixed {
        fn advise(&self, _context: &InsightContext) -> Result<String, InsightError> {
            self.0
                .map(str::to_string)
                .map_err(|e| InsightError::Unavailable(e.to_string()))
        }
    }

    fn context() -> InsightContext {
        InsightContext {
            period_label: "Outubro 2024".into(),
            revenue: 930.0,
            profit: 820.0,
            volume: 3,
            average_ticket: 310.0,
        }
    }

    #[test]
    fn advisor_text_is_used() {
        let advisor = Fixed(Ok("  Ótimo mês!  "));
        let text = insight_or_fallback(Some(&advisor), &context(), &AgendaSettings::default());
        assert_eq!(text, "Ótimo mês!");
    }

    #[test]
    fn failure_falls_back() {
        let settings = AgendaSettings::default();
        let advisor = Fixed(Err("quota exceeded"));
        let text = insight_or_fallback(Some(&advisor), &context(), &settings);
        assert_eq!(text, settings.fallback_insight);
    }

    #[test]
    fn blank_response_falls_back() {
        let settings = AgendaSettings::default();
        let advisor = Fixed(Ok("   "));
        assert_eq!(
            insight_or_fallback(Some(&advisor), &context(), &settings),
            settings.fallback_insight
        );
    }

    #[test]
    fn missing_advisor_asks_for_configuration() {
        let settings = AgendaSettings::default();
        assert_eq!(
            insight_or_fallback(None, &context(), &settings),
            settings.unconfigured_insight
        );
    }
}
