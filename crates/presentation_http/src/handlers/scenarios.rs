//! Practice scenario catalogue

use axum::{Json, extract::Path};
use domain::{DomainError, Scenario};
use serde::Serialize;

use super::common::{ApiResponse, ok};
use crate::error::ApiError;

/// Public description of a scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    pub id: &'static str,
    pub name_kr: &'static str,
    pub name_en: &'static str,
    pub description: &'static str,
    pub difficulty: &'static str,
}

impl From<Scenario> for ScenarioSummary {
    fn from(scenario: Scenario) -> Self {
        Self {
            id: scenario.id(),
            name_kr: scenario.name_kr(),
            name_en: scenario.name_en(),
            description: scenario.description(),
            difficulty: scenario.difficulty(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioList {
    pub scenarios: Vec<ScenarioSummary>,
    pub total: usize,
}

/// Role-play settings a learner can pick
///
/// `General` is only the fallback persona for free conversation and is not
/// listed.
fn selectable() -> impl Iterator<Item = Scenario> {
    Scenario::all()
        .into_iter()
        .filter(|scenario| *scenario != Scenario::General)
}

pub async fn list_scenarios() -> Json<ApiResponse<ScenarioList>> {
    let scenarios: Vec<ScenarioSummary> = selectable().map(ScenarioSummary::from).collect();
    ok(ScenarioList {
        total: scenarios.len(),
        scenarios,
    })
}

pub async fn get_scenario(
    Path(scenario_id): Path<String>,
) -> Result<Json<ApiResponse<ScenarioSummary>>, ApiError> {
    selectable()
        .find(|scenario| scenario.id() == scenario_id)
        .map(|scenario| ok(scenario.into()))
        .ok_or_else(|| {
            application::ApplicationError::from(DomainError::ScenarioNotFound(scenario_id)).into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_excludes_general() {
        let Json(body) = list_scenarios().await;
        let ids: Vec<_> = body.data.scenarios.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["market", "transport", "workplace"]);
        assert_eq!(body.data.total, 3);
    }

    #[tokio::test]
    async fn unknown_scenario_is_not_found() {
        let err = get_scenario(Path("airport".to_string())).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "Scenario 'airport' not found"));
    }

    #[tokio::test]
    async fn workplace_is_intermediate() {
        let Json(body) = get_scenario(Path("workplace".to_string())).await.unwrap();
        assert_eq!(body.data.difficulty, "intermediate");
    }
}
