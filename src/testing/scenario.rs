use std::fmt::{self, Display};

use serde::Serialize;

use crate::http::{PageRequest, PageResponse};
use crate::validation::PageExpectation;

/// Page size the service applies when `per_page` is not sent.
pub const DEFAULT_PER_PAGE: u64 = 6;
/// Explicit page size used by [`Scenario::CustomPageSize`].
pub const CUSTOM_PER_PAGE: u64 = 10;
/// Status every listing call must return.
pub const EXPECTED_STATUS: u16 = 200;

/// Values captured from the baseline response and fed into the boundary
/// scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScenarioContext {
    pub total: u64,
}

impl ScenarioContext {
    pub fn from_baseline(baseline: &PageResponse) -> Self {
        Self {
            total: baseline.total,
        }
    }
}

/// The listing calls that make up the pagination contract, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    DefaultPage,
    ExplicitFirstPage,
    CustomPageSize,
    SecondPage,
    WholeDatasetPage,
    OversizedPage,
    PastLastPage,
}

/// Request to send and what the response must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioPlan {
    pub request: PageRequest,
    pub expected: PageExpectation,
}

/// Why a scenario could not be turned into a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// A boundary scenario was planned without a baseline.
    MissingBaseline(Scenario),
    /// The baseline `total` cannot be turned into a page size or record count.
    TotalOutOfRange { scenario: Scenario, total: u64 },
}

impl Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::MissingBaseline(scenario) => {
                write!(f, "`{scenario}` needs the baseline total, which was not captured")
            }
            PlanError::TotalOutOfRange { scenario, total } => {
                write!(f, "`{scenario}` cannot be planned from baseline total {total}")
            }
        }
    }
}

impl Scenario {
    pub const ALL: [Scenario; 7] = [
        Scenario::DefaultPage,
        Scenario::ExplicitFirstPage,
        Scenario::CustomPageSize,
        Scenario::SecondPage,
        Scenario::WholeDatasetPage,
        Scenario::OversizedPage,
        Scenario::PastLastPage,
    ];

    /// The scenario whose response seeds [`ScenarioContext`].
    pub const BASELINE: Scenario = Scenario::DefaultPage;

    pub fn requires_baseline(self) -> bool {
        matches!(
            self,
            Scenario::WholeDatasetPage | Scenario::OversizedPage | Scenario::PastLastPage
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            Scenario::DefaultPage => "returns 6 users when no page or per_page is passed",
            Scenario::ExplicitFirstPage => "returns the first 6 users when page is 1",
            Scenario::CustomPageSize => "returns 10 users when per_page is 10",
            Scenario::SecondPage => "returns the next 6 users when page is 2",
            Scenario::WholeDatasetPage => "returns every user when per_page equals the total",
            Scenario::OversizedPage => "caps the records at the total when per_page exceeds it",
            Scenario::PastLastPage => "returns no users on page 2 when page 1 held them all",
        }
    }

    pub fn plan(self, context: Option<ScenarioContext>) -> Result<ScenarioPlan, PlanError> {
        let fixed = |request: PageRequest,
                     page: u64,
                     per_page: u64,
                     data_len: usize|
         -> Result<ScenarioPlan, PlanError> {
            Ok(ScenarioPlan {
                request,
                expected: PageExpectation {
                    page,
                    per_page,
                    data_len,
                },
            })
        };
        let default_len = DEFAULT_PER_PAGE as usize;

        match self {
            Scenario::DefaultPage => fixed(PageRequest::new(), 1, DEFAULT_PER_PAGE, default_len),
            Scenario::ExplicitFirstPage => {
                fixed(PageRequest::new().page(1), 1, DEFAULT_PER_PAGE, default_len)
            }
            Scenario::CustomPageSize => fixed(
                PageRequest::new().per_page(CUSTOM_PER_PAGE),
                1,
                CUSTOM_PER_PAGE,
                CUSTOM_PER_PAGE as usize,
            ),
            Scenario::SecondPage => {
                fixed(PageRequest::new().page(2), 2, DEFAULT_PER_PAGE, default_len)
            }
            Scenario::WholeDatasetPage | Scenario::OversizedPage | Scenario::PastLastPage => {
                let total = context.ok_or(PlanError::MissingBaseline(self))?.total;
                let out_of_range = PlanError::TotalOutOfRange {
                    scenario: self,
                    total,
                };
                match self {
                    Scenario::WholeDatasetPage => {
                        let len = usize::try_from(total).map_err(|_| out_of_range)?;
                        fixed(PageRequest::new().per_page(total), 1, total, len)
                    }
                    Scenario::OversizedPage => {
                        let len = usize::try_from(total).map_err(|_| out_of_range)?;
                        let per_page = total.checked_add(1).ok_or(out_of_range)?;
                        fixed(PageRequest::new().per_page(per_page), 1, per_page, len)
                    }
                    _ => fixed(PageRequest::new().per_page(total).page(2), 2, total, 0),
                }
            }
        }
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Scenario::DefaultPage => "default_page",
            Scenario::ExplicitFirstPage => "explicit_first_page",
            Scenario::CustomPageSize => "custom_page_size",
            Scenario::SecondPage => "second_page",
            Scenario::WholeDatasetPage => "whole_dataset_page",
            Scenario::OversizedPage => "oversized_page",
            Scenario::PastLastPage => "past_last_page",
        };
        write!(f, "{label}")
    }
}
