//! Research runtime: performs stages with the search and scrape capabilities.
//!
//! The runtime is deterministic given provider responses. It runs the stage
//! queries concurrently, merges hits by URL, fetches the top page when the
//! worker can scrape, and asks a scraping colleague for help otherwise.
//! Provider failures never fail the stage; they become `Gaps:` lines.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, instrument};

use crate::adapters::providers::scrape::truncate_chars;
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Capability, Roster, SearchHit, SearchOptions, Worker, WorkerId, ACCOUNTS_FOUND, NO_DATA_FOUND,
};
use crate::domain::ports::{
    RequestKind, ScrapeProvider, SearchProvider, StageRequest, WorkerRuntime, WorkerTurn,
};

/// Prefix of sub-questions asking a colleague to fetch a page.
pub const FETCH_PREFIX: &str = "fetch and summarize ";

const EXCERPT_CHARS: usize = 1500;
const PRIOR_FINDING_CHARS: usize = 200;

pub struct ResearchRuntime {
    search: Arc<dyn SearchProvider>,
    scrape: Arc<dyn ScrapeProvider>,
    roster: Roster,
    options: SearchOptions,
}

impl ResearchRuntime {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        scrape: Arc<dyn ScrapeProvider>,
        roster: Roster,
        options: SearchOptions,
    ) -> Self {
        Self {
            search,
            scrape,
            roster,
            options,
        }
    }

    /// Run all queries concurrently; hits keep first-seen order, deduplicated by URL.
    async fn gather(&self, queries: &[String], gaps: &mut Vec<String>) -> Vec<SearchHit> {
        let results = join_all(queries.iter().map(|q| self.search.search(q, &self.options))).await;

        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for (query, result) in queries.iter().zip(results) {
            match result {
                Ok(found) => {
                    debug!(query = %query, hits = found.len(), "search returned");
                    hits.extend(found.into_iter().filter(|h| seen.insert(h.url.clone())));
                }
                Err(e) => gaps.push(format!("search \"{query}\": {e}")),
            }
        }
        hits
    }

    async fn excerpt(&self, url: &str, gaps: &mut Vec<String>) -> Option<String> {
        match self.scrape.scrape(url).await {
            Ok(text) if !text.trim().is_empty() => Some(truncate_chars(text.trim(), EXCERPT_CHARS)),
            Ok(_) => {
                gaps.push(format!("fetch {url}: empty page"));
                None
            }
            Err(e) => {
                gaps.push(format!("fetch {url}: {e}"));
                None
            }
        }
    }

    async fn answer_sub_question(&self, worker: &Worker, question: &str) -> String {
        let mut gaps = Vec::new();
        let mut out = String::new();

        if let Some(url) = question.strip_prefix(FETCH_PREFIX).map(str::trim) {
            if worker.has(Capability::Scrape) {
                if let Some(text) = self.excerpt(url, &mut gaps).await {
                    out.push_str(&format!("Page {url}:\n{text}\n"));
                }
            } else {
                gaps.push(format!("fetch {url}: {} cannot fetch pages", worker.id));
            }
        } else if worker.has(Capability::Search) {
            let hits = self.gather(&[question.to_string()], &mut gaps).await;
            push_hits(&mut out, &hits);
        }

        push_gaps(&mut out, &gaps);
        if out.is_empty() {
            out.push_str(NO_DATA_FOUND);
        }
        out
    }

    async fn perform_stage(&self, worker: &Worker, request: &StageRequest) -> WorkerTurn {
        let stage = &request.stage;
        let mut gaps = Vec::new();

        let queries = if stage.queries.is_empty() {
            vec![request.target.clone()]
        } else {
            stage.queries.clone()
        };

        let hits = if worker.has(Capability::Search) {
            self.gather(&queries, &mut gaps).await
        } else {
            Vec::new()
        };

        let excerpt = match hits.first() {
            Some(top) if worker.has(Capability::Scrape) => self
                .excerpt(&top.url, &mut gaps)
                .await
                .map(|text| (top.url.clone(), text)),
            _ => None,
        };

        let mut out = format!("{} for {}\n", stage.title, request.target);
        if let Some(instructions) = &request.instructions {
            out.push_str(&format!("Manager instructions: {instructions}\n"));
        }
        let notes: Vec<&str> = request
            .feedback
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect();
        if !notes.is_empty() {
            out.push_str("Reviewer feedback addressed:\n");
            for note in notes {
                out.push_str(&format!("- {note}\n"));
            }
        }
        out.push('\n');

        push_hits(&mut out, &hits);
        if let Some((url, text)) = &excerpt {
            out.push_str(&format!("\nPage excerpt ({url}):\n{text}\n"));
        }
        if !request.delegated.is_empty() {
            out.push_str("\nDelegated findings:\n");
            for answer in &request.delegated {
                out.push_str(&format!("- {} ({}):\n{}\n", answer.worker, answer.question, answer.answer.trim()));
            }
        }
        if !request.background.is_empty() {
            let sections: Vec<&str> = request.background.iter().map(|b| b.title.as_str()).collect();
            out.push_str(&format!("\nBuilds on: {}\n", sections.join(", ")));
        }
        if !request.prior_findings.is_empty() {
            out.push_str("\nEarlier investigations:\n");
            for finding in &request.prior_findings {
                out.push_str(&format!(
                    "- {} [{}]: {}\n",
                    finding.stage_title,
                    finding.investigation_id,
                    truncate_chars(first_line(&finding.content), PRIOR_FINDING_CHARS)
                ));
            }
        }
        push_gaps(&mut out, &gaps);
        if hits.is_empty() {
            out.push('\n');
            out.push_str(NO_DATA_FOUND);
            out.push('\n');
        }

        match self.delegation_target(worker, request, &hits) {
            Some((to, url)) => WorkerTurn::Delegate {
                to,
                question: format!("{FETCH_PREFIX}{url}"),
                draft: out,
            },
            None => WorkerTurn::Final(out),
        }
    }

    fn delegation_target(
        &self,
        worker: &Worker,
        request: &StageRequest,
        hits: &[SearchHit],
    ) -> Option<(WorkerId, String)> {
        if !worker.delegation_allowed || worker.has(Capability::Scrape) || !request.delegated.is_empty() {
            return None;
        }
        let top = hits.first()?;
        let colleague = self.roster.first_with(Capability::Scrape, &worker.id)?;
        Some((colleague.id.clone(), top.url.clone()))
    }
}

fn push_hits(out: &mut String, hits: &[SearchHit]) {
    if hits.is_empty() {
        return;
    }
    out.push_str(&format!("{ACCOUNTS_FOUND}:\n"));
    for hit in hits {
        out.push_str(&format!("- {}: {}\n", hit.title.trim(), hit.url));
        if !hit.snippet.trim().is_empty() {
            out.push_str(&format!("  {}\n", hit.snippet.trim()));
        }
    }
}

fn push_gaps(out: &mut String, gaps: &[String]) {
    if gaps.is_empty() {
        return;
    }
    out.push_str("\nGaps:\n");
    for gap in gaps {
        out.push_str(&format!("- {gap}\n"));
    }
}

fn first_line(text: &str) -> &str {
    text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim()
}

#[async_trait]
impl WorkerRuntime for ResearchRuntime {
    fn name(&self) -> &'static str {
        "research"
    }

    #[instrument(skip(self, worker, request), fields(worker = %worker.id, stage = request.stage.index))]
    async fn execute(&self, worker: &Worker, request: &StageRequest) -> DomainResult<WorkerTurn> {
        match &request.kind {
            RequestKind::SubQuestion { question, .. } => {
                Ok(WorkerTurn::Final(self.answer_sub_question(worker, question).await))
            }
            RequestKind::Stage => Ok(self.perform_stage(worker, request).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::providers::{MockScrapeProvider, MockSearchProvider};
    use crate::domain::errors::ProviderError;
    use crate::domain::models::{Dimension, Profile, StageTemplate};

    fn request(stage_worker: &str, queries: &[&str]) -> StageRequest {
        let stage = StageTemplate::new(Dimension::Forum, "Forum analysis", stage_worker, "{target}", "x")
            .with_queries(queries.iter().copied())
            .render(0, "alice");
        StageRequest {
            investigation_id: "inv".to_string(),
            target: "alice".to_string(),
            stage,
            kind: RequestKind::Stage,
            instructions: None,
            background: Vec::new(),
            prior_findings: Vec::new(),
            feedback: Vec::new(),
            delegated: Vec::new(),
        }
    }

    async fn runtime(search: MockSearchProvider, scrape: MockScrapeProvider) -> ResearchRuntime {
        let profile = Profile::darknet().unwrap();
        ResearchRuntime::new(Arc::new(search), Arc::new(scrape), profile.roster, SearchOptions::default())
    }

    #[tokio::test]
    async fn test_merges_hits_and_scrapes_top_result() {
        let search = MockSearchProvider::new();
        search
            .respond("forum", vec![SearchHit::new("Profile", "alice on forum", "https://f.example/alice")])
            .await;
        search
            .respond("posts", vec![
                SearchHit::new("Profile again", "dup", "https://f.example/alice"),
                SearchHit::new("Thread", "alice thread", "https://f.example/t/1"),
            ])
            .await;
        let scrape = MockScrapeProvider::new();
        scrape.page("https://f.example/alice", "alice joined in 2019").await;

        let rt = runtime(search, scrape).await;
        let worker = rt.roster.get(&WorkerId::from("forum_expert")).unwrap().clone();
        let turn = rt
            .execute(&worker, &request("forum_expert", &["alice forum", "alice posts"]))
            .await
            .unwrap();

        let WorkerTurn::Final(out) = turn else { panic!("expected final output") };
        assert!(out.contains(ACCOUNTS_FOUND));
        assert_eq!(out.matches("https://f.example/alice").count(), 2); // hit line + excerpt header
        assert!(out.contains("https://f.example/t/1"));
        assert!(out.contains("alice joined in 2019"));
        assert!(!out.contains(NO_DATA_FOUND));
    }

    #[tokio::test]
    async fn test_provider_errors_become_gaps() {
        let search = MockSearchProvider::new();
        search.fail("alice", ProviderError::RateLimited { retry_after_secs: None }).await;

        let rt = runtime(search, MockScrapeProvider::new()).await;
        let worker = rt.roster.get(&WorkerId::from("forum_expert")).unwrap().clone();
        let out = rt
            .execute(&worker, &request("forum_expert", &["alice forum"]))
            .await
            .unwrap()
            .into_output();

        assert!(out.contains("Gaps:"));
        assert!(out.contains("rate limited"));
        assert!(out.contains(NO_DATA_FOUND));
    }

    #[tokio::test]
    async fn test_non_scraping_delegator_asks_colleague() {
        let search = MockSearchProvider::new();
        search
            .respond("darknet", vec![SearchHit::new("Market", "vendor alice", "https://m.example/v/alice")])
            .await;

        let rt = runtime(search, MockScrapeProvider::new()).await;
        let worker = rt.roster.get(&WorkerId::from("darknet_researcher")).unwrap().clone();
        let turn = rt
            .execute(&worker, &request("darknet_researcher", &["alice darknet"]))
            .await
            .unwrap();

        match turn {
            WorkerTurn::Delegate { to, question, draft } => {
                assert_eq!(to.as_str(), "marketplace_analyst");
                assert_eq!(question, "fetch and summarize https://m.example/v/alice");
                assert!(draft.contains(ACCOUNTS_FOUND));
            }
            WorkerTurn::Final(_) => panic!("expected delegation"),
        }
    }

    #[tokio::test]
    async fn test_sub_question_fetches_page() {
        let scrape = MockScrapeProvider::new();
        scrape.page("https://m.example/v/alice", "vendor since 2021").await;

        let rt = runtime(MockSearchProvider::new(), scrape).await;
        let worker = rt.roster.get(&WorkerId::from("marketplace_analyst")).unwrap().clone();
        let parent = request("darknet_researcher", &["alice darknet"]);
        let sub = parent.sub_question(WorkerId::from("darknet_researcher"), "fetch and summarize https://m.example/v/alice");

        let out = rt.execute(&worker, &sub).await.unwrap().into_output();
        assert!(out.contains("vendor since 2021"));
    }
}
