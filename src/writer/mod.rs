//! Blog-post generation: turns repository activity into prompts and asks the
//! configured provider for markdown.

use crate::error::{BlogResult, LlmError, ValidationError};
use crate::github::{Commit, PullRequest};
use crate::llm::Provider;
use crate::prompt::{
    TeraEngine, blog_prompt_engine, build_commits_prompt, build_pull_requests_prompt,
    build_single_commit_prompt,
};
use std::sync::Arc;

const GENERATION_FAILED: &str = "Failed to generate blog post with Gemini";
const CHAT_FAILED: &str = "Failed to chat with Gemini";

pub struct BlogWriter {
    provider: Arc<dyn Provider>,
    prompts: TeraEngine,
    model: String,
    temperature: f64,
}

impl BlogWriter {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f64,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            provider,
            prompts: blog_prompt_engine()?,
            model: model.into(),
            temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn ensure_configured(&self) -> Result<(), LlmError> {
        if self.provider.is_configured() {
            Ok(())
        } else {
            Err(LlmError::MissingApiKey)
        }
    }

    async fn complete(&self, prompt: &str, failure: &'static str) -> BlogResult<String> {
        match self.provider.chat(prompt, &self.model, self.temperature).await {
            Ok(text) => Ok(text),
            Err(LlmError::MissingApiKey) => Err(LlmError::MissingApiKey.into()),
            Err(e) => {
                tracing::error!(provider = self.provider.name(), error = %e, "generation failed");
                Err(LlmError::Failed(failure).into())
            }
        }
    }

    /// Post summarizing a batch of commits.
    pub async fn generate_from_commits(
        &self,
        commits: &[Commit],
        owner: &str,
        repo: &str,
    ) -> BlogResult<String> {
        self.ensure_configured()?;
        if commits.is_empty() {
            return Err(ValidationError::NoCommits.into());
        }
        let prompt = build_commits_prompt(&self.prompts, commits, owner, repo)
            .map_err(|e| LlmError::Prompt(e.to_string()))?;
        tracing::info!(owner, repo, commits = commits.len(), "generating commit digest");
        self.complete(&prompt, GENERATION_FAILED).await
    }

    /// Post summarizing recent pull requests.
    pub async fn generate_from_pull_requests(
        &self,
        pull_requests: &[PullRequest],
        owner: &str,
        repo: &str,
    ) -> BlogResult<String> {
        self.ensure_configured()?;
        if pull_requests.is_empty() {
            return Err(ValidationError::NoPullRequests.into());
        }
        let prompt = build_pull_requests_prompt(&self.prompts, pull_requests, owner, repo)
            .map_err(|e| LlmError::Prompt(e.to_string()))?;
        tracing::info!(owner, repo, pull_requests = pull_requests.len(), "generating PR digest");
        self.complete(&prompt, GENERATION_FAILED).await
    }

    /// In-depth post about a single commit.
    pub async fn generate_from_commit(
        &self,
        commit: &Commit,
        owner: &str,
        repo: &str,
    ) -> BlogResult<String> {
        self.ensure_configured()?;
        let prompt = build_single_commit_prompt(&self.prompts, commit, owner, repo)
            .map_err(|e| LlmError::Prompt(e.to_string()))?;
        tracing::info!(owner, repo, sha = commit.short_sha(), "generating commit post");
        self.complete(&prompt, GENERATION_FAILED).await
    }

    /// Free-form message, sent as is.
    pub async fn chat(&self, message: &str) -> BlogResult<String> {
        self.ensure_configured()?;
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        self.complete(message, CHAT_FAILED).await
    }
}
