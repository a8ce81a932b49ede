//! Prompt set for the repair flow.
//!
//! Templates are embedded at compile time and rendered through a stateless
//! set. The controller receives an instance; there is no global registry.

use minijinja::{Environment, context};

const ANALYSIS_TEMPLATE: &str = include_str!("prompts/analysis.md");
const GENERATE_TEMPLATE: &str = include_str!("prompts/generate.md");
const DIAGNOSE_TEMPLATE: &str = include_str!("prompts/diagnose.md");
const REPAIR_TEMPLATE: &str = include_str!("prompts/repair.md");

/// System prompts paired with each flow step.
pub mod system {
    pub const ANALYST: &str = "You are an expert algorithm analyst.";
    pub const ENGINEER: &str =
        "You are a senior software engineer. Return only code that uses stdin/stdout.";
    pub const DEBUGGER: &str = "You are a world-class debugging agent.";
    pub const MAINTAINER: &str = "You are a senior software engineer.";
}

/// Stateless prompt construction for every reasoner call the flow makes.
pub struct PromptSet {
    env: Environment<'static>,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptSet {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template("analysis", ANALYSIS_TEMPLATE)
            .expect("analysis template should be valid");
        env.add_template("generate", GENERATE_TEMPLATE)
            .expect("generate template should be valid");
        env.add_template("diagnose", DIAGNOSE_TEMPLATE)
            .expect("diagnose template should be valid");
        env.add_template("repair", REPAIR_TEMPLATE)
            .expect("repair template should be valid");
        Self { env }
    }

    /// Prompt for the one-time constraint extraction step.
    pub fn semantic_analysis(&self, problem: &str) -> String {
        self.render("analysis", context! { problem })
    }

    /// Prompt for drafting the initial solution.
    pub fn generate_solution(&self, problem: &str, constraints: &str) -> String {
        self.render("generate", context! { problem, constraints })
    }

    /// Prompt for diagnosing a root cause from the harness log.
    pub fn analyze_failure(&self, code: &str, log: &str, problem: &str) -> String {
        self.render("diagnose", context! { code, log, problem })
    }

    /// Prompt for patching the code against a diagnosed cause.
    pub fn targeted_repair(&self, code: &str, cause: &str) -> String {
        self.render("repair", context! { code, cause })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> String {
        let template = self
            .env
            .get_template(name)
            .expect("template registered at construction");
        template
            .render(ctx)
            .expect("static template rendering should not fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_embeds_the_problem() {
        let prompts = PromptSet::new();
        let prompt = prompts.semantic_analysis("sum the evens");
        assert!(prompt.contains("sum the evens"));
        assert!(prompt.contains("Do NOT write code yet"));
    }

    #[test]
    fn generation_prompt_embeds_problem_and_constraints() {
        let prompts = PromptSet::new();
        let prompt = prompts.generate_solution("sum the evens", "- Algo: iteration");
        assert!(prompt.contains("sum the evens"));
        assert!(prompt.contains("- Algo: iteration"));
    }

    #[test]
    fn diagnosis_prompt_embeds_code_and_log() {
        let prompts = PromptSet::new();
        let prompt = prompts.analyze_failure("print(1)", "test 1: output mismatch", "sum");
        assert!(prompt.contains("print(1)"));
        assert!(prompt.contains("test 1: output mismatch"));
        assert!(prompt.contains("ROOT CAUSE:"));
    }

    #[test]
    fn repair_prompt_embeds_code_and_cause() {
        let prompts = PromptSet::new();
        let prompt = prompts.targeted_repair("print(1)", "ROOT CAUSE: wrong literal");
        assert!(prompt.contains("print(1)"));
        assert!(prompt.contains("ROOT CAUSE: wrong literal"));
    }
}
