// src/analysis/mod.rs
pub mod llm_client;
pub mod match_score;
pub mod prompts;
pub mod section_parser;

pub use llm_client::{AnalysisGenerator, LlmClient};
pub use match_score::{extract_match_score, MatchScore};
pub use section_parser::{parse_analysis, split_sections, AnalysisSection, HeaderPolicy, ParsedAnalysis};
