//! Prompt construction for AI-generated commit messages.

use std::fmt;

/// Placeholder replaced by the diff in user-prompt templates.
pub const DIFF_PLACEHOLDER: &str = "{diff}";

/// Default user-prompt template.
pub const DEFAULT_USER_TEMPLATE: &str = "Here's the git diff:\n\n{diff}";

/// Maximum diff characters embedded in the user prompt.
const MAX_DIFF_CHARS: usize = 60_000;

const SYSTEM_PROMPT_EN: &str = r#"You write Git commit messages following the Conventional Commits specification.

You receive a unified diff of the staged changes. Reply with the commit message only: no preamble, no markdown fences, no explanation.

Subject line:
- Format: `type(scope): description`
- Type: one of feat, fix, build, chore, ci, docs, style, refactor, perf, test
- Scope: the main module affected; omit it if the change is spread out
- Imperative mood, lowercase after the colon, no trailing period, at most 72 characters

Body (optional, after a blank line):
- Explain why the change was made, not what the diff already shows
- Wrap lines at 72 characters
- Omit the body for trivial changes"#;

const SYSTEM_PROMPT_PT_BR: &str = r#"Você escreve mensagens de commit do Git seguindo a especificação Conventional Commits.

Você recebe um diff unificado das alterações staged. Responda apenas com a mensagem de commit: sem introdução, sem blocos markdown, sem explicações.

Linha de assunto:
- Formato: `tipo(escopo): descrição`
- Tipo: um de feat, fix, build, chore, ci, docs, style, refactor, perf, test
- Escopo: o principal módulo afetado; omita se a mudança for espalhada
- Modo imperativo, minúsculas após os dois-pontos, sem ponto final, no máximo 72 caracteres

Corpo (opcional, após uma linha em branco):
- Explique por que a mudança foi feita, não o que o diff já mostra
- Quebre as linhas em 72 caracteres
- Omita o corpo para mudanças triviais

Escreva a mensagem em português do Brasil."#;

/// Language of the built-in system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PromptLanguage {
    En,
    #[default]
    #[value(name = "pt-br", alias = "pt_br")]
    PtBr,
}

impl PromptLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptLanguage::En => "EN",
            PromptLanguage::PtBr => "PT_BR",
        }
    }

    /// Built-in system prompt for this language.
    pub fn default_system_prompt(&self) -> &'static str {
        match self {
            PromptLanguage::En => SYSTEM_PROMPT_EN,
            PromptLanguage::PtBr => SYSTEM_PROMPT_PT_BR,
        }
    }
}

impl fmt::Display for PromptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Embed `diff` in `template`.
///
/// Every `{diff}` placeholder is replaced; a template without one gets the
/// diff appended after a blank line. Oversized diffs are cut at a character
/// boundary with a note for the model.
pub fn build_user_prompt(template: &str, diff: &str) -> String {
    let diff = truncate_diff(diff, MAX_DIFF_CHARS);

    if template.contains(DIFF_PLACEHOLDER) {
        template.replace(DIFF_PLACEHOLDER, &diff)
    } else {
        format!("{}\n\n{}", template.trim_end(), diff)
    }
}

fn truncate_diff(diff: &str, max_chars: usize) -> String {
    match diff.char_indices().nth(max_chars) {
        None => diff.to_string(),
        Some((end, _)) => format!(
            "{}\n\n[diff truncated: showing the first {} characters]",
            &diff[..end],
            max_chars
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_embeds_diff() {
        let prompt = build_user_prompt(DEFAULT_USER_TEMPLATE, "diff --git a/x b/x\n+x\n");
        assert_eq!(prompt, "Here's the git diff:\n\ndiff --git a/x b/x\n+x\n");
    }

    #[test]
    fn test_template_without_placeholder_appends_diff() {
        let prompt = build_user_prompt("Summarize this change.\n", "+added");
        assert_eq!(prompt, "Summarize this change.\n\n+added");
    }

    #[test]
    fn test_truncate_diff_respects_char_boundaries() {
        let diff = "é".repeat(10);
        let truncated = truncate_diff(&diff, 4);
        assert!(truncated.starts_with("éééé\n\n[diff truncated"));
    }

    #[test]
    fn test_short_diff_not_truncated() {
        assert_eq!(truncate_diff("+a\n", 100), "+a\n");
    }

    #[test]
    fn test_language_prompts_differ() {
        assert!(PromptLanguage::En.default_system_prompt().contains("Conventional Commits"));
        assert!(PromptLanguage::PtBr.default_system_prompt().contains("português"));
        assert_eq!(PromptLanguage::default(), PromptLanguage::PtBr);
    }
}
