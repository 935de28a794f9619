use domain_tenants::TenantProfile;

use crate::models::{ChatMessage, KnowledgeEntry};

/// Messages for the generation call plus how many entries made it in
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub messages: Vec<ChatMessage>,
    pub entries_used: usize,
}

impl ComposedPrompt {
    pub fn context_used(&self) -> bool {
        self.entries_used > 0
    }
}

/// Builds the personalized prompt. Pure: no I/O, no clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptComposer {
    max_context_chars: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(4000)
    }
}

impl PromptComposer {
    pub fn new(max_context_chars: usize) -> Self {
        Self {
            max_context_chars: max_context_chars.max(1),
        }
    }

    /// System prompt, then the context block when there is one, then the question.
    pub fn compose(
        &self,
        tenant: &TenantProfile,
        entries: &[KnowledgeEntry],
        question: &str,
    ) -> ComposedPrompt {
        let (context, entries_used) = self.context_block(entries);

        let mut messages = Vec::with_capacity(3);
        messages.push(ChatMessage::system(system_prompt(tenant, entries_used > 0)));
        if let Some(context) = context {
            messages.push(ChatMessage::system(context));
        }
        messages.push(ChatMessage::user(question.trim()));

        ComposedPrompt {
            messages,
            entries_used,
        }
    }

    /// In-character reply used when generation fails
    pub fn apology(&self, tenant: &TenantProfile) -> String {
        format!(
            "Sorry, I'm having trouble answering for {} right now. Please try again in a moment.",
            tenant.display_name
        )
    }

    fn context_block(&self, entries: &[KnowledgeEntry]) -> (Option<String>, usize) {
        let mut body = String::new();
        let mut used_chars = 0;
        let mut used = 0;

        for entry in entries {
            let separator = if used == 0 { "" } else { "\n\n" };
            let block = format_entry(entry);
            let cost = separator.chars().count() + block.chars().count();

            if used_chars + cost <= self.max_context_chars {
                body.push_str(separator);
                body.push_str(&block);
                used_chars += cost;
                used += 1;
            } else if used == 0 {
                // The best match always goes in, cut to the budget.
                body.push_str(&truncate_chars(&block, self.max_context_chars));
                used = 1;
                break;
            } else {
                break;
            }
        }

        if used == 0 {
            (None, 0)
        } else {
            (
                Some(format!(
                    "Knowledge base entries (most relevant first):\n\n{}",
                    body
                )),
                used,
            )
        }
    }
}

fn system_prompt(tenant: &TenantProfile, has_context: bool) -> String {
    let name = &tenant.display_name;
    let mut prompt = format!(
        "You are the assistant on {name}'s page, answering visitors' questions on {name}'s behalf."
    );

    if let Some(bio) = tenant.bio() {
        prompt.push_str(&format!(" About {name}: {bio}"));
    }

    if has_context {
        prompt.push_str(
            " Answer confidently and concisely using the knowledge base entries provided. \
             Speak in a friendly voice consistent with those answers. \
             If the entries do not cover the question, say so instead of guessing.",
        );
    } else {
        prompt.push_str(&format!(
            " {name} has not added information that covers this question. \
             Apologize briefly and explain that you don't have that information, \
             then offer whatever general help you can without inventing details about {name}."
        ));
    }

    prompt
}

fn format_entry(entry: &KnowledgeEntry) -> String {
    format!("Q: {}\nA: {}", entry.question.trim(), entry.answer.trim())
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
