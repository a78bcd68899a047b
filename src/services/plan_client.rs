// src/services/plan_client.rs
use crate::models::{
    AuthResponse, ContentPlan, CreatePlanRequest, LoginRequest, PlanResponse, PlanStatus,
    UpdatePlanRequest,
};
use crate::services::plan_workflow::{check_status_change, local_today, PlanForm, WorkflowError};
use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;
use futures::future::join_all;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Display)]
pub enum ClientError {
    /// Refused locally; nothing was sent.
    #[display(fmt = "{}", _0)]
    Rejected(WorkflowError),
    #[display(fmt = "{}", message)]
    Api { status: u16, message: String },
    #[display(fmt = "{}", _0)]
    Transport(String),
}

impl std::error::Error for ClientError {}

impl From<WorkflowError> for ClientError {
    fn from(err: WorkflowError) -> Self {
        ClientError::Rejected(err)
    }
}

/// The plan endpoints the workflow drives.
#[async_trait(?Send)]
pub trait PlanGateway {
    async fn create_plan(&self, request: &CreatePlanRequest) -> Result<PlanResponse, ClientError>;

    async fn update_plan(
        &self,
        plan_id: &str,
        request: &UpdatePlanRequest,
    ) -> Result<PlanResponse, ClientError>;
}

// Gateway over the service's REST API
pub struct HttpPlanGateway {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPlanGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    // Log in and keep the issued token for later calls
    pub async fn login(&mut self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        };
        let response: AuthResponse = self
            .send(self.client.post(self.url("/auth/login")), Some(&body))
            .await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B, T>(
        &self,
        mut request: reqwest::RequestBuilder,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| "Something went wrong".to_string());
            warn!("⚠️ API call failed with {}: {}", status, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }
}

#[async_trait(?Send)]
impl PlanGateway for HttpPlanGateway {
    async fn create_plan(&self, request: &CreatePlanRequest) -> Result<PlanResponse, ClientError> {
        self.send(self.client.post(self.url("/plans")), Some(request)).await
    }

    async fn update_plan(
        &self,
        plan_id: &str,
        request: &UpdatePlanRequest,
    ) -> Result<PlanResponse, ClientError> {
        let url = self.url(&format!("/plans/{}", plan_id));
        self.send(self.client.put(url), Some(request)).await
    }
}

/// Applies the workflow rules, then drives a gateway.
pub struct PlanWorkflow<G> {
    gateway: G,
    today: Option<NaiveDate>,
}

impl<G: PlanGateway> PlanWorkflow<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            today: None,
        }
    }

    // Pin "today" instead of reading the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(local_today)
    }

    /// Creates one plan per selected account. Creates run independently: on
    /// failure the first error is returned and plans already created remain.
    pub async fn create(&self, form: &PlanForm) -> Result<Vec<PlanResponse>, ClientError> {
        form.validate(self.today())?;

        let requests = form.create_requests();
        let results = join_all(requests.iter().map(|request| self.gateway.create_plan(request))).await;

        let created = collect_all(results)?;
        info!("✅ {} plan(s) added", created.len());
        Ok(created)
    }

    /// Updates the plan and copies it to any additional selected accounts.
    /// The updated plan comes first in the result.
    pub async fn edit(&self, plan_id: &str, form: &PlanForm) -> Result<Vec<PlanResponse>, ClientError> {
        form.validate(self.today())?;

        let (update, extras) = form.edit_requests();
        let updated = self.gateway.update_plan(plan_id, &update).await?;

        let results = join_all(extras.iter().map(|request| self.gateway.create_plan(request))).await;
        let mut plans = vec![updated];
        plans.extend(collect_all(results)?);

        if plans.len() > 1 {
            info!("✅ Plan updated & copied to {} other account(s)", plans.len() - 1);
        }
        Ok(plans)
    }

    /// Quick status change from the board or table. Moving to `posted` sends
    /// the link in the same update.
    pub async fn change_status(
        &self,
        plan: &ContentPlan,
        status: PlanStatus,
        link: Option<&str>,
    ) -> Result<PlanResponse, ClientError> {
        if let Err(err) = check_status_change(plan.posting_date, status, link, self.today()) {
            debug!("Refused status change of {} to {}: {}", plan.id, status, err);
            return Err(err.into());
        }

        let request = UpdatePlanRequest {
            status: Some(status),
            link: match status {
                PlanStatus::Posted => link.map(|link| link.trim().to_string()),
                _ => None,
            },
            ..Default::default()
        };

        self.gateway.update_plan(&plan.id, &request).await
    }
}

fn collect_all(results: Vec<Result<PlanResponse, ClientError>>) -> Result<Vec<PlanResponse>, ClientError> {
    let total = results.len();
    let mut created = Vec::with_capacity(total);
    let mut first_error = None;

    for result in results {
        match result {
            Ok(plan) => created.push(plan),
            Err(err) => {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) => {
            warn!("⚠️ {} of {} plan create(s) succeeded before failure", created.len(), total);
            Err(err)
        }
        None => Ok(created),
    }
}
