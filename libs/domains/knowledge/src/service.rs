use std::sync::Arc;

use domain_tenants::{TenantId, TenantSelector};
use tracing::{instrument, warn};

use crate::composer::PromptComposer;
use crate::engine::{RetrievalEngine, RetrievalQuery, RetrievalResult, validate_question};
use crate::error::KnowledgeResult;
use crate::generation::Generator;
use crate::models::{ChatRequest, ChatResponse, DebugInfo};

/// Retrieval, prompt composition and generation for one visitor question
#[derive(Clone)]
pub struct ChatService {
    engine: RetrievalEngine,
    composer: PromptComposer,
    generator: Arc<dyn Generator>,
}

impl ChatService {
    pub fn new(
        engine: RetrievalEngine,
        composer: PromptComposer,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            engine,
            composer,
            generator,
        }
    }

    /// Answers `request` for the tenant it names.
    ///
    /// `requester` is the authenticated caller, if any. Diagnostics are
    /// attached only when asked for by the tenant themselves. A failed
    /// generation call becomes an apology, not an error.
    #[instrument(skip_all, fields(debug = request.debug))]
    pub async fn ask(
        &self,
        request: ChatRequest,
        requester: Option<TenantId>,
    ) -> KnowledgeResult<ChatResponse> {
        let question = validate_question(&request.question)?;
        let selector =
            TenantSelector::from_parts(request.tenant_id, request.tenant_handle.as_deref())?;
        let query = RetrievalQuery::new(question, selector)?;

        let retrieval = self.engine.retrieve(&query).await?;
        let prompt = self
            .composer
            .compose(&retrieval.tenant, &retrieval.entries, query.question());

        let answer = match self.generator.generate(&prompt.messages).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(tenant_id = %retrieval.tenant.id, error = %e, "Generation failed; replying with apology");
                self.composer.apology(&retrieval.tenant)
            }
        };

        let debug = (request.debug && requester == Some(retrieval.tenant.id))
            .then(|| debug_info(&retrieval));

        Ok(ChatResponse {
            answer,
            context_used: prompt.context_used(),
            entries_used: prompt.entries_used,
            debug,
        })
    }
}

fn debug_info(retrieval: &RetrievalResult) -> DebugInfo {
    let diagnostics = &retrieval.diagnostics;
    DebugInfo {
        semantic_match_count: diagnostics.semantic_match_count,
        candidate_ids: diagnostics.candidate_ids.clone(),
        post_filter_count: diagnostics.post_filter_count,
        matching_ids: diagnostics.matching_ids.clone(),
        entries_retrieved: diagnostics.entries_retrieved,
        tenant_id: retrieval.tenant.id,
        tenant_handle: retrieval.tenant.handle.clone(),
        source: retrieval.source,
        fallback_reason: diagnostics.fallback_reason,
    }
}
