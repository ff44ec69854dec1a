//! # Contract Runner
//!
//! Runs the pagination scenarios serially against one [`UsersClient`]. The
//! baseline scenario goes first; its `total` becomes the [`ScenarioContext`]
//! that the boundary scenarios are planned from. A failing scenario never
//! stops its siblings, and a scenario that cannot be planned is reported as
//! skipped.

pub mod scenario;

use std::fmt::{self, Display};
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::http::{ListUsersResponse, PageResponse, UsersClient};
use crate::validation::{self, FieldViolation, Mismatch};

pub use scenario::{
    CUSTOM_PER_PAGE, DEFAULT_PER_PAGE, EXPECTED_STATUS, PlanError, Scenario, ScenarioContext,
    ScenarioPlan,
};

/// A single reason a scenario failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "failure", rename_all = "snake_case")]
pub enum Failure {
    Plan { message: String },
    Request { message: String },
    Mismatch(Mismatch),
    Field(FieldViolation),
}

impl Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Plan { message } | Failure::Request { message } => write!(f, "{message}"),
            Failure::Mismatch(mismatch) => write!(f, "{mismatch}"),
            Failure::Field(violation) => write!(f, "{violation}"),
        }
    }
}

/// How a scenario ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed { failures: Vec<Failure> },
    Skipped { reason: String },
}

/// Result of running one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub description: &'static str,
    pub request: String,
    pub duration_ms: u128,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }
}

impl Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match &self.outcome {
            Outcome::Passed => "PASS",
            Outcome::Failed { .. } => "FAIL",
            Outcome::Skipped { .. } => "SKIP",
        };
        write!(
            f,
            "[{label}] {} ({}) {} [{} ms]",
            self.scenario, self.request, self.description, self.duration_ms
        )?;
        match &self.outcome {
            Outcome::Passed => {}
            Outcome::Failed { failures } => {
                for failure in failures {
                    write!(f, "\n    - {failure}")?;
                }
            }
            Outcome::Skipped { reason } => write!(f, "\n    - {reason}")?,
        }
        Ok(())
    }
}

/// Summary report for a full run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u128,
    pub context: Option<ScenarioContext>,
    pub results: Vec<ScenarioResult>,
}

impl RunReport {
    fn record(&mut self, result: ScenarioResult) {
        self.total += 1;
        match result.outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed { .. } => self.failed += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
        }
        self.results.push(result);
    }

    pub fn success(&self) -> bool {
        self.total > 0 && self.passed == self.total
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{result}")?;
        }
        write!(
            f,
            "{} scenarios: {} passed, {} failed, {} skipped in {} ms",
            self.total, self.passed, self.failed, self.skipped, self.duration_ms
        )
    }
}

/// Run the baseline scenario and capture its context. The context is taken
/// from any decodable response, even one that fails its own expectations.
pub async fn run_baseline(client: &UsersClient) -> (ScenarioResult, Option<ScenarioContext>) {
    let (result, response) = execute(client, Scenario::BASELINE, None).await;
    let context = response.map(|response| ScenarioContext::from_baseline(&response.body));
    if let Some(context) = context {
        info!(total = context.total, "captured baseline total");
    }
    (result, context)
}

/// Run one scenario. Boundary scenarios without a context are skipped.
pub async fn run_scenario(
    client: &UsersClient,
    scenario: Scenario,
    context: Option<ScenarioContext>,
) -> ScenarioResult {
    execute(client, scenario, context).await.0
}

/// Run every scenario in [`Scenario::ALL`] order.
pub async fn run_suite(client: &UsersClient) -> RunReport {
    let started = Instant::now();
    let mut report = RunReport::default();

    let (baseline, context) = run_baseline(client).await;
    report.context = context;
    report.record(baseline);

    for scenario in Scenario::ALL.into_iter().filter(|s| *s != Scenario::BASELINE) {
        report.record(run_scenario(client, scenario, context).await);
    }

    report.duration_ms = started.elapsed().as_millis();
    info!(
        passed = report.passed,
        failed = report.failed,
        skipped = report.skipped,
        "contract run finished"
    );
    report
}

async fn execute(
    client: &UsersClient,
    scenario: Scenario,
    context: Option<ScenarioContext>,
) -> (ScenarioResult, Option<ListUsersResponse>) {
    let plan = match scenario.plan(context) {
        Ok(plan) => plan,
        Err(err) => return (unplanned(err), None),
    };

    let (duration_ms, outcome, response) = match client.list_users(&plan.request).await {
        Ok(response) => {
            let failures = evaluate(&plan, &response);
            let outcome = if failures.is_empty() {
                Outcome::Passed
            } else {
                Outcome::Failed { failures }
            };
            (response.duration_ms, outcome, Some(response))
        }
        Err(err) => {
            let failures = vec![Failure::Request {
                message: err.to_string(),
            }];
            (0, Outcome::Failed { failures }, None)
        }
    };

    let result = ScenarioResult {
        scenario,
        description: scenario.description(),
        request: plan.request.to_string(),
        duration_ms,
        outcome,
    };
    if result.passed() {
        info!(%scenario, "scenario passed");
    } else {
        warn!(%scenario, "scenario failed");
    }
    (result, response)
}

/// Result for a scenario that never sent a request. A missing baseline is a
/// skip; a baseline total that cannot be planned from is a failure.
fn unplanned(err: PlanError) -> ScenarioResult {
    let (scenario, outcome) = match err {
        PlanError::MissingBaseline(scenario) => {
            warn!(%scenario, "skipping scenario without baseline");
            let reason = err.to_string();
            (scenario, Outcome::Skipped { reason })
        }
        PlanError::TotalOutOfRange { scenario, total } => {
            warn!(%scenario, total, "baseline total out of range");
            let failures = vec![Failure::Plan {
                message: err.to_string(),
            }];
            (scenario, Outcome::Failed { failures })
        }
    };
    ScenarioResult {
        scenario,
        description: scenario.description(),
        request: "-".to_string(),
        duration_ms: 0,
        outcome,
    }
}

/// `(reported, implied)` when `total_pages` is present and disagrees with
/// `ceil(total / per_page)`.
pub fn total_pages_drift(body: &PageResponse) -> Option<(u64, u64)> {
    let reported = body.total_pages?;
    let implied = body.implied_total_pages();
    (reported != implied).then_some((reported, implied))
}

/// Every failed expectation for one response. `total_pages` drift is logged,
/// never failed.
pub fn evaluate(plan: &ScenarioPlan, response: &ListUsersResponse) -> Vec<Failure> {
    let mut failures = Vec::new();

    if let Some(mismatch) = validation::check_status(EXPECTED_STATUS, response.status) {
        failures.push(Failure::Mismatch(mismatch));
    }
    failures.extend(
        validation::check_page(&response.body, &plan.expected)
            .into_iter()
            .map(Failure::Mismatch),
    );
    if let Err(report) = validation::validate_users(&response.body.data) {
        failures.extend(report.violations.into_iter().map(Failure::Field));
    }

    if let Some((reported, implied)) = total_pages_drift(&response.body) {
        warn!(reported, implied, "total_pages disagrees with total and per_page");
    }

    failures
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(status: u16, body: serde_json::Value) -> ListUsersResponse {
        ListUsersResponse {
            status,
            duration_ms: 1,
            body: serde_json::from_value::<PageResponse>(body).unwrap(),
        }
    }

    fn users(count: usize) -> Vec<serde_json::Value> {
        (1..=count)
            .map(|id| {
                json!({
                    "id": id,
                    "email": format!("user{id}@reqres.in"),
                    "first_name": "Emma",
                    "last_name": "Wong",
                    "avatar": format!("https://reqres.in/img/faces/{id}-image.jpg"),
                })
            })
            .collect()
    }

    #[test]
    fn conforming_response_has_no_failures() {
        let plan = Scenario::DefaultPage.plan(None).unwrap();
        let response = response(
            200,
            json!({"page": 1, "per_page": 6, "total": 12, "total_pages": 2, "data": users(6)}),
        );
        assert!(evaluate(&plan, &response).is_empty());
    }

    #[test]
    fn clamped_echo_and_bad_record_both_reported() {
        let plan = Scenario::OversizedPage
            .plan(Some(ScenarioContext { total: 12 }))
            .unwrap();
        let mut data = users(12);
        data[4]["email"] = json!("nope");
        let response = response(
            200,
            json!({"page": 1, "per_page": 12, "total": 12, "total_pages": 1, "data": data}),
        );

        let failures = evaluate(&plan, &response);
        assert_eq!(failures.len(), 2);
        assert!(matches!(
            &failures[0],
            Failure::Mismatch(m) if m.expected == 13 && m.actual == 12
        ));
        assert!(matches!(&failures[1], Failure::Field(v) if v.index == 4));
    }

    #[test]
    fn report_counts_outcomes() {
        let mut report = RunReport::default();
        let base = ScenarioResult {
            scenario: Scenario::DefaultPage,
            description: Scenario::DefaultPage.description(),
            request: "(no params)".to_string(),
            duration_ms: 3,
            outcome: Outcome::Passed,
        };
        report.record(base.clone());
        report.record(ScenarioResult {
            scenario: Scenario::PastLastPage,
            outcome: Outcome::Skipped {
                reason: PlanError::MissingBaseline(Scenario::PastLastPage).to_string(),
            },
            ..base.clone()
        });
        report.record(ScenarioResult {
            scenario: Scenario::SecondPage,
            outcome: Outcome::Failed {
                failures: vec![Failure::Request {
                    message: "boom".to_string(),
                }],
            },
            ..base
        });

        assert_eq!(
            (report.total, report.passed, report.failed, report.skipped),
            (3, 1, 1, 1)
        );
        assert!(!report.success());
        assert!(
            report
                .to_string()
                .ends_with("3 scenarios: 1 passed, 1 failed, 1 skipped in 0 ms")
        );
    }

    #[test]
    fn missing_baseline_is_skipped() {
        let result = unplanned(PlanError::MissingBaseline(Scenario::WholeDatasetPage));
        assert_eq!(result.scenario, Scenario::WholeDatasetPage);
        assert_eq!(result.request, "-");
        assert!(matches!(result.outcome, Outcome::Skipped { .. }));
    }

    #[test]
    fn unplannable_total_fails_the_scenario() {
        let context = ScenarioContext { total: u64::MAX };
        let err = Scenario::OversizedPage.plan(Some(context)).unwrap_err();
        let result = unplanned(err);

        assert_eq!(result.scenario, Scenario::OversizedPage);
        let Outcome::Failed { failures } = &result.outcome else {
            panic!("expected a failure, got {:?}", result.outcome);
        };
        assert_eq!(
            failures[0].to_string(),
            format!("`oversized_page` cannot be planned from baseline total {}", u64::MAX)
        );
    }

    #[test]
    fn total_pages_drift_is_detected_but_not_failed() {
        let plan = Scenario::DefaultPage.plan(None).unwrap();
        let drifting = response(
            200,
            json!({"page": 1, "per_page": 6, "total": 12, "total_pages": 5, "data": users(6)}),
        );
        assert_eq!(total_pages_drift(&drifting.body), Some((5, 2)));
        assert!(evaluate(&plan, &drifting).is_empty());

        let consistent = response(
            200,
            json!({"page": 1, "per_page": 6, "total": 13, "total_pages": 3, "data": users(6)}),
        );
        assert_eq!(total_pages_drift(&consistent.body), None);

        let absent = response(
            200,
            json!({"page": 1, "per_page": 6, "total": 12, "data": users(6)}),
        );
        assert_eq!(total_pages_drift(&absent.body), None);
    }

    #[test]
    fn report_serializes_flat_outcome() {
        let result = ScenarioResult {
            scenario: Scenario::CustomPageSize,
            description: Scenario::CustomPageSize.description(),
            request: "per_page=10".to_string(),
            duration_ms: 5,
            outcome: Outcome::Passed,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["scenario"], "custom_page_size");
        assert_eq!(value["outcome"], "passed");
    }

    #[test]
    fn empty_report_is_not_a_success() {
        assert!(!RunReport::default().success());
    }
}
