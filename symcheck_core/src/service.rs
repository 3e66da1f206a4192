//! Symptom checking with doctor recommendations and history recording.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{MatchError, MatchWarning};
use crate::matcher::{Diagnosis, SymptomMatcher};
use crate::repository::{DoctorRepo, HistoryRepo};
use crate::types::{Alternative, Doctor, NewHistoryEntry};

/// Everything returned for one successful query.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub diagnosis: Diagnosis,
    /// Specialty whose doctors were actually recommended
    pub doctor_specialty: Option<String>,
    pub doctors: Vec<Doctor>,
    /// Id of the history record written for this query
    pub history_id: Option<Uuid>,
    pub warnings: Vec<MatchWarning>,
}

pub struct SymptomChecker {
    matcher: SymptomMatcher,
    doctors: Arc<dyn DoctorRepo>,
    history: Arc<dyn HistoryRepo>,
}

impl SymptomChecker {
    #[must_use]
    pub fn new(
        matcher: SymptomMatcher,
        doctors: Arc<dyn DoctorRepo>,
        history: Arc<dyn HistoryRepo>,
    ) -> Self {
        Self {
            matcher,
            doctors,
            history,
        }
    }

    #[must_use]
    pub const fn matcher(&self) -> &SymptomMatcher {
        &self.matcher
    }

    /// Match a query for a user.
    ///
    /// Validation and column resolution failures are returned as
    /// [`MatchError`]. Problems looking up doctors or writing history only
    /// add entries to [`MatchOutcome::warnings`].
    pub async fn match_symptoms(
        &self,
        query: &str,
        user_id: &Uuid,
    ) -> Result<MatchOutcome, MatchError> {
        let diagnosis = self.matcher.diagnose(query)?;
        let mut warnings = Vec::new();

        let (doctor_specialty, doctors) = match diagnosis.specialty.as_deref() {
            Some(specialty) => match self.recommend_doctors(specialty).await {
                Ok(found) => found,
                Err(e) => {
                    warn!("Doctor lookup failed: {e:#}");
                    warnings.push(MatchWarning::ProviderLookup(e.to_string()));
                    (None, Vec::new())
                }
            },
            None => (None, Vec::new()),
        };

        let history_id = match self.record_history(&diagnosis, user_id).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Failed to save search history for {user_id}: {e:#}");
                warnings.push(MatchWarning::PersistenceWarning(e.to_string()));
                None
            }
        };

        Ok(MatchOutcome {
            diagnosis,
            doctor_specialty,
            doctors,
            history_id,
            warnings,
        })
    }

    /// Available doctors for a specialty, else for the default specialty.
    async fn recommend_doctors(
        &self,
        specialty: &str,
    ) -> anyhow::Result<(Option<String>, Vec<Doctor>)> {
        let settings = &self.matcher.context().settings;
        let limit = settings.doctors_per_specialty;

        let doctors = self.doctors.available_by_specialty(specialty, limit).await?;
        if !doctors.is_empty() {
            return Ok((Some(specialty.to_string()), doctors));
        }

        let fallback = settings.default_specialty.as_str();
        if fallback.eq_ignore_ascii_case(specialty) {
            return Ok((None, Vec::new()));
        }

        info!("No {specialty} available, recommending {fallback}");
        let doctors = self.doctors.available_by_specialty(fallback, limit).await?;
        let specialty = (!doctors.is_empty()).then(|| fallback.to_string());
        Ok((specialty, doctors))
    }

    async fn record_history(
        &self,
        diagnosis: &Diagnosis,
        user_id: &Uuid,
    ) -> anyhow::Result<Option<Uuid>> {
        let Some(top) = diagnosis.top() else {
            return Ok(None);
        };

        let max_alternatives = self.matcher.context().settings.max_alternatives;
        let entry = NewHistoryEntry {
            user_id: *user_id,
            query: diagnosis.query.clone(),
            top_prediction: top.label.clone(),
            confidence: top.confidence,
            alternatives: diagnosis
                .runners_up(max_alternatives)
                .iter()
                .map(|p| Alternative {
                    label: p.label.clone(),
                    confidence: p.confidence,
                })
                .collect(),
        };

        let saved = self.history.append(&entry).await?;
        Ok(Some(saved.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::matcher::MatcherContext;
    use crate::testing::{FailingHistory, MemoryDoctors, MemoryHistory};

    const CSV: &str = "\
fever,cough,headache,wheezing,Disease
1,1,0,0,Flu
1,0,1,0,Flu
1,1,0,0,Cold
1,1,1,0,Dengue
1,1,0,0,Allergy
1,0,0,0,Migraine
1,0,0,0,Typhoid
0,1,0,1,Bronchial Asthma
";

    fn matcher() -> SymptomMatcher {
        let dataset = Arc::new(Dataset::from_csv_str(CSV));
        SymptomMatcher::new(Arc::new(MatcherContext::new(dataset)))
    }

    fn checker(history: Arc<dyn HistoryRepo>) -> SymptomChecker {
        SymptomChecker::new(matcher(), Arc::new(MemoryDoctors::sample()), history)
    }

    #[tokio::test]
    async fn records_history_for_ranked_result() -> anyhow::Result<()> {
        let history = Arc::new(MemoryHistory::default());
        let checker = checker(history.clone());
        let user = Uuid::now_v7();

        let outcome = checker.match_symptoms("fever", &user).await?;
        assert!(outcome.warnings.is_empty());
        assert!(outcome.history_id.is_some());

        let page = history.list(&user, 1, 10).await?;
        assert_eq!(page.items.len(), 1);
        let record = &page.items[0];
        assert_eq!(record.top_prediction, "Flu");
        assert_eq!(record.query, "fever");
        assert_eq!(record.alternatives.len(), 5);
        assert_eq!(record.alternatives[0].label, "Cold");
        Ok(())
    }

    #[tokio::test]
    async fn identical_queries_are_not_deduplicated() -> anyhow::Result<()> {
        let history = Arc::new(MemoryHistory::default());
        let checker = checker(history.clone());
        let user = Uuid::now_v7();

        let first = checker.match_symptoms("fever, cough", &user).await?;
        let second = checker.match_symptoms("fever, cough", &user).await?;
        assert_ne!(first.history_id, second.history_id);
        assert_eq!(history.list(&user, 1, 10).await?.total_items, 2);
        Ok(())
    }

    #[tokio::test]
    async fn history_failure_is_only_a_warning() -> anyhow::Result<()> {
        let checker = checker(Arc::new(FailingHistory));
        let outcome = checker.match_symptoms("fever", &Uuid::now_v7()).await?;

        assert_eq!(
            outcome.diagnosis.top().map(|p| p.label.as_str()),
            Some("Flu")
        );
        assert!(outcome.history_id.is_none());
        assert!(matches!(
            outcome.warnings.as_slice(),
            [MatchWarning::PersistenceWarning(_)]
        ));
        Ok(())
    }

    #[tokio::test]
    async fn validation_errors_are_terminal() {
        let history = Arc::new(MemoryHistory::default());
        let checker = checker(history.clone());
        let user = Uuid::now_v7();

        let err = checker.match_symptoms("!!!", &user).await.err();
        assert_eq!(err, Some(MatchError::InvalidCharacters));
        let err = checker.match_symptoms("rash", &user).await.err();
        assert_eq!(
            err,
            Some(MatchError::NoMatchingColumns(vec!["rash".to_string()]))
        );
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn empty_ranking_writes_no_history() -> anyhow::Result<()> {
        let history = Arc::new(MemoryHistory::default());
        let checker = checker(history.clone());

        let outcome = checker
            .match_symptoms("headache, wheezing", &Uuid::now_v7())
            .await?;
        assert!(outcome.diagnosis.predictions.is_empty());
        assert!(outcome.doctors.is_empty());
        assert!(outcome.history_id.is_none());
        assert!(history.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn recommends_doctors_of_resolved_specialty() -> anyhow::Result<()> {
        let checker = checker(Arc::new(MemoryHistory::default()));
        let outcome = checker
            .match_symptoms("wheezing", &Uuid::now_v7())
            .await?;

        assert_eq!(outcome.diagnosis.specialty.as_deref(), Some("Pulmonologist"));
        assert_eq!(outcome.doctor_specialty.as_deref(), Some("Pulmonologist"));
        assert_eq!(outcome.doctors.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn falls_back_to_general_physicians() -> anyhow::Result<()> {
        let checker = checker(Arc::new(MemoryHistory::default()));
        // Dengue maps to an infectious disease specialist; none is available
        let outcome = checker
            .match_symptoms("fever, headache, cough", &Uuid::now_v7())
            .await?;

        assert_eq!(
            outcome.diagnosis.specialty.as_deref(),
            Some("Infectious Disease Specialist")
        );
        assert_eq!(
            outcome.doctor_specialty.as_deref(),
            Some("General Physician")
        );
        assert_eq!(outcome.doctors.len(), 2);
        assert!(outcome.doctors.iter().all(|d| d.available));
        Ok(())
    }
}
