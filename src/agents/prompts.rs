//! Instruction templates wrapped around a user question.
//!
//! The question is embedded literally; every template asks for the final
//! answer in Turkish.

use crate::types::AgentKind;

const WEB_INSTRUCTIONS: &str = "\
1. Search the web for the most up-to-date information related to this query.
2. Focus on university legislation during your search.
3. Generate an answer using the most relevant and reliable sources.
4. Ensure the answer is clear, understandable, and comprehensive.
5. Specify the source of the information and highlight uncertainties when necessary.
6. Return the answer in an academic tone and professional format.
7. Provide the final answer in Turkish.
";

const DB_INSTRUCTIONS: &str = "\
1. Locate the most relevant documents in the legislation database related to this query.
2. Focus the search on university regulations and legislation.
3. Select the most accurate and comprehensive information.
4. Simplify the legislative language to produce a clear answer.
5. Specify the sources and regulation numbers used.
6. Return the answer in a clear, formal, and structured format.
7. Provide the final answer in Turkish.
";

const MULTI_INSTRUCTIONS: &str = "\
1. Send this query to both web_agent and hybrid_agent.
2. Combine the results from both sources to create a comprehensive answer.
3. Use both database information and current web information in the answer.
4. If there is conflicting information, indicate this and, if possible, explain which source may be more reliable.
5. Give your answer in a clear, understandable and professional style.
6. Give the final answer in Turkish.
";

/// Numbered instructions for one agent kind
pub fn instructions(kind: AgentKind) -> &'static str {
    match kind {
        AgentKind::Web => WEB_INSTRUCTIONS,
        AgentKind::Db => DB_INSTRUCTIONS,
        AgentKind::Multi => MULTI_INSTRUCTIONS,
    }
}

/// Full prompt sent to the agent selected by `kind`
pub fn build_prompt(kind: AgentKind, question: &str) -> String {
    format!(
        "\nUser asked: \"{}\"\n\n{}",
        question,
        instructions(kind)
    )
}
