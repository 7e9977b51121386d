use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::config::Config;
use crate::error::SolvemarkError;
use crate::upload;

#[derive(Debug, Deserialize)]
pub struct SolveResponse {
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarResponse {
    #[serde(default)]
    pub similar_problems: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct Solved {
    pub problem: String,
    pub solution: String,
}

pub struct SolverClient {
    http: reqwest::Client,
    base_url: String,
    domain: Option<String>,
}

impl SolverClient {
    pub fn new(config: &Config) -> Result<Self, SolvemarkError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: config.solver_url.trim_end_matches('/').to_string(),
            domain: config.domain.clone(),
        })
    }

    fn domain_for(&self, problem: &str) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| detect_domain(problem).to_string())
    }

    pub async fn solve_text(&self, problem: &str) -> Result<Solved, SolvemarkError> {
        let form = [
            ("problem_text", problem.to_string()),
            ("domain", self.domain_for(problem)),
        ];
        let response = self
            .http
            .post(format!("{}/solve", self.base_url))
            .form(&form)
            .send()
            .await?;
        read_solved(response).await
    }

    pub async fn solve_image(&self, path: &Path) -> Result<Solved, SolvemarkError> {
        let mime = upload::mime_for_path(path).ok_or_else(|| {
            SolvemarkError::Upload(
                "Please upload a valid image file (JPEG, PNG, GIF, or WebP)".into(),
            )
        })?;
        let bytes = tokio::fs::read(path).await?;
        upload::validate(mime, bytes.len() as u64)?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime)?;
        let mut multipart = reqwest::multipart::Form::new().part("problem_image", part);
        if let Some(domain) = &self.domain {
            multipart = multipart.text("domain", domain.clone());
        }

        let response = self
            .http
            .post(format!("{}/solve", self.base_url))
            .multipart(multipart)
            .send()
            .await?;
        read_solved(response).await
    }

    pub async fn similar(&self, problem: &str) -> Result<Vec<String>, SolvemarkError> {
        let form = [
            ("problem_text", problem.to_string()),
            ("domain", self.domain_for(problem)),
        ];
        let response = self
            .http
            .post(format!("{}/similar", self.base_url))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SolvemarkError::Status(status.as_u16()));
        }
        let body: SimilarResponse = response.json().await?;
        if let Some(message) = body.error {
            return Err(SolvemarkError::Solver(message));
        }
        Ok(body.similar_problems)
    }
}

async fn read_solved(response: reqwest::Response) -> Result<Solved, SolvemarkError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SolvemarkError::Status(status.as_u16()));
    }
    let body: SolveResponse = response.json().await?;
    if let Some(message) = body.error {
        return Err(SolvemarkError::Solver(message));
    }
    Ok(Solved {
        problem: body.problem,
        solution: body.solution,
    })
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// Keyword heuristic used to fill the `domain` form field when none is
/// configured.
pub fn detect_domain(problem: &str) -> &'static str {
    let text = problem.to_lowercase();

    if contains_any(
        &text,
        &["derivative", "integral", "differentiate", "integrate", "limit"],
    ) {
        "calculus"
    } else if contains_any(
        &text,
        &[
            "matrix",
            "vector",
            "linear",
            "determinant",
            "eigenvalue",
            "eigenvector",
            "span",
        ],
    ) {
        "linear_algebra"
    } else if contains_any(
        &text,
        &[
            "probability",
            "distribution",
            "random",
            "variance",
            "standard deviation",
            "mean",
            "median",
            "hypothesis",
        ],
    ) {
        "statistics"
    } else if contains_any(
        &text,
        &["differential equation", "ode", "pde", "solve for y", "d/dx", "∂/∂t"],
    ) {
        "differential_equations"
    } else {
        "general"
    }
}
