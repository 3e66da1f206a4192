use std::sync::Arc;
use symcheck_core::{MatchError, MatchOutcome, MatcherContext, SymptomChecker, SymptomMatcher};
use tracing::warn;

use super::init_common_components;

/// Strategy for matching a symptom query.
///
/// Requires a logged-in user; every ranked result is added to their history.
#[derive(Debug, Clone, Copy)]
pub struct CheckStrategy;

impl super::CommandStrategy for CheckStrategy {
    type Input = String;

    async fn execute(&self, query: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components().await?;
        let user = common.current_user().await?;

        let dataset = common.load_dataset();
        if dataset.is_empty() {
            warn!(
                "No dataset loaded from {}, nothing can match",
                common.config.dataset.dir.display()
            );
        }

        let context = MatcherContext::new(dataset).with_settings(common.config.matcher.clone());
        let checker = SymptomChecker::new(
            SymptomMatcher::new(Arc::new(context)),
            common.store.doctors(),
            common.store.history(),
        );

        match checker.match_symptoms(&query, &user.id).await {
            Ok(outcome) => {
                print_outcome(&outcome);
                Ok(())
            }
            Err(e @ MatchError::NoMatchingColumns(_)) => {
                println!("Run 'symcheck symptoms' to see the symptoms this dataset knows.");
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn print_outcome(outcome: &MatchOutcome) {
    let diagnosis = &outcome.diagnosis;

    println!("Matched symptoms: {}", diagnosis.matched_columns.join(", "));
    if !diagnosis.unresolved.is_empty() {
        println!("Not recognized:   {}", diagnosis.unresolved.join(", "));
    }
    println!("Matching cases:   {}", diagnosis.matching_rows);
    println!();

    if diagnosis.predictions.is_empty() {
        println!("No condition in the dataset has all of these symptoms.");
    } else {
        println!("Possible conditions:");
        for (i, p) in diagnosis.predictions.iter().enumerate() {
            println!(
                "  {:>2}. {:<30} {:>5.1}%  ({} cases)",
                i + 1,
                p.label,
                p.confidence * 100.0,
                p.count
            );
        }
    }

    if !diagnosis.remedies.is_empty() {
        println!();
        println!("Home remedies:");
        for remedy in &diagnosis.remedies {
            println!("  - {remedy}");
        }
    }

    if let Some(specialty) = &diagnosis.specialty {
        println!();
        println!("Suggested specialist: {specialty}");
    }
    if !outcome.doctors.is_empty() {
        match (
            diagnosis.specialty.as_deref(),
            outcome.doctor_specialty.as_deref(),
        ) {
            (Some(wanted), Some(shown)) if wanted != shown => {
                println!("No {wanted} available right now, showing {shown}s:");
            }
            _ => println!("Available doctors:"),
        }
        for d in &outcome.doctors {
            println!("  [{}] {} ({}) {}", d.id, d.name, d.specialty, d.contact);
        }
        println!("Book with 'symcheck book --doctor <ID> --at \"YYYY-MM-DD HH:MM\"'");
    }

    for warning in &outcome.warnings {
        println!();
        println!("⚠️  {warning}");
    }

    println!();
    println!("This is not medical advice. Please consult a doctor.");
}
