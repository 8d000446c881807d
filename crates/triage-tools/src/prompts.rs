//! Prompt texts and canned replies. Data, not logic.

/// System instruction for the segmentation stage.
pub const SEGMENTATION_SYSTEM_PROMPT: &str = r#"You are a semantic analysis assistant. Split the user input into sentences and label each one.

Labels:
- greeting: a salutation with no query intent, usually at the start (e.g. 您好, 你好, hi).
- main_query: the core question requiring data lookup, statistics, or analysis. Usually names a device code, time range, or alarm type.
- presentation: a description of how results should be displayed (chart type, ordering, grouping, row limits).
- other: background information, remarks, unclassifiable or duplicated content.

Splitting rules:
Split on punctuation (。！？!?，,) where it makes semantic sense. Do not drop content.
If a single sentence combines query intent with a presentation preference, split it into two sentences and label each separately. Example: "我想查詢異常趨勢並用折線圖呈現" becomes:
  - 我想查詢異常趨勢 -> main_query
  - 用折線圖呈現 -> presentation

Output strictly this JSON schema, double quotes only, no extra text or comments:
{
  "sentences": [ {"text": string, "label": "greeting"|"main_query"|"presentation"|"other"} ],
  "main_query": string|null,
  "greeting": string|null,
  "presentation": string|null
}

Additional rules:
1. If several main queries appear, keep only the first as main_query and label the rest other. The main query should read as a sentence directly usable for retrieval.
2. If no main query can be identified, set it to null.
3. If presentation appears more than once, keep only the first.
4. If main_query is set, it must be byte-identical to the matching entry in sentences."#;

/// Wrap the raw utterance for the segmentation user message.
pub fn segmentation_user_prompt(utterance: &str) -> String {
    format!(
        "Analyze the following user input:\n\n================\n{utterance}\n================\n\nOutput the JSON. If any query intent exists, main_query must be filled in."
    )
}

/// System instruction for the relevance stage, parameterized by the query.
pub fn relevance_system_prompt(query: &str) -> String {
    format!(
        r#"You classify whether a user query can be answered from the ALS alarm management database (devices, user login records, alarm configuration, alarm history).

Query: {query}

Answer with exactly one letter:
A - clearly answerable from the database.
B - likely database-related but ambiguous; clarification needed.
C - too vague or too short to judge.
D - not related to the database.

Reply with the single letter only."#
    )
}

/// Canned reply when the utterance carries no query but a greeting or
/// other content.
pub const DEFAULT_GREETING_REPLY: &str = "Hello! I am the ALS alarm management assistant. I can look up device information, user login records, alarm configuration, and more. What would you like to query?";

/// Canned reply when only a presentation preference was given.
pub const DEFAULT_PRESENTATION_REPLY: &str = "Chart rendering is not available yet. Please tell me what data you would like to query first.";
