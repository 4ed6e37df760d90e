#![forbid(unsafe_code)]

//! Transport collaborator: fetches precomputed traces from the external
//! solver.
//!
//! The solver computes the steps; this crate only ships the request and
//! classifies what came back. Every transport-level problem (connection
//! failure, non-2xx status, unparseable body) surfaces as one
//! [`FetchFailed`] condition, reported to the caller without retry; retry
//! policy belongs to the caller.
//!
//! An empty-but-present `steps` array is **not** an error here: the
//! response flows back unchanged and the caller reports "already sorted"
//! (the sequencer independently rejects the empty trace).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sortviz_core::{
    AlgorithmKind, Complexity, Metrics, RecursionTreeNode, SpeedHint, Trace, TreeShapeError,
    validate_tree,
};

/// What the caller asks the solver to run.
#[derive(Debug, Clone, Serialize)]
pub struct SortRequest {
    pub algorithm: AlgorithmKind,
    pub array: Vec<i64>,
    pub speed: SpeedHint,
}

/// The solver's full answer for one sort request.
#[derive(Debug, Clone, Deserialize)]
pub struct SortResponse {
    /// Ordered steps to replay. May be empty for already-sorted input.
    pub steps: Trace,
    /// The input after sorting, echoed for convenience.
    #[serde(default)]
    pub sorted_array: Vec<i64>,
    /// Final operation counts and measured wall-clock time.
    pub metrics: Metrics,
    /// Asymptotic complexity labels for display.
    pub complexity: Complexity,
    /// Recursion tree, present for divide-and-conquer algorithms.
    #[serde(default)]
    pub dc_tree: Option<RecursionTreeNode>,
}

/// Transport or parse failure between the caller and the solver.
#[derive(Debug, Error)]
pub enum FetchFailed {
    /// The solver was unreachable or the connection broke mid-exchange.
    #[error("transport failure reaching the solver: {0}")]
    Transport(#[from] reqwest::Error),
    /// The solver answered with a non-success status.
    #[error("solver responded with status {status}")]
    Status { status: u16 },
    /// The body was not a well-formed solver response (missing `steps`,
    /// wrong field shapes, truncated JSON).
    #[error("malformed solver response: {0}")]
    MalformedBody(#[source] serde_json::Error),
    /// The recursion tree violated its nesting/ordering invariants.
    #[error("malformed recursion tree in solver response: {0}")]
    MalformedTree(#[from] TreeShapeError),
}

/// Blocking client for the solver's `/sort/` endpoint.
pub struct SolverClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl SolverClient {
    /// Client for a solver rooted at `base_url`
    /// (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::blocking::Client::new())
    }

    /// Inject a preconfigured client (timeouts, proxies).
    pub fn with_client(base_url: impl Into<String>, http: reqwest::blocking::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, http }
    }

    /// POST the request and classify the answer.
    pub fn sort(&self, request: &SortRequest) -> Result<SortResponse, FetchFailed> {
        let url = format!("{}/sort/", self.base_url);
        tracing::debug!(
            %url,
            algorithm = ?request.algorithm,
            elements = request.array.len(),
            "requesting trace from solver"
        );
        let response = self.http.post(&url).json(request).send()?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "solver rejected sort request");
            return Err(FetchFailed::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text()?;
        let parsed: SortResponse =
            serde_json::from_str(&body).map_err(FetchFailed::MalformedBody)?;
        if let Some(tree) = parsed.dc_tree.as_ref() {
            validate_tree(tree)?;
        }
        tracing::debug!(
            steps = parsed.steps.len(),
            has_tree = parsed.dc_tree.is_some(),
            "solver trace received"
        );
        Ok(parsed)
    }
}
