//! Ready-to-dispatch request builders for the domain tasks the application
//! needs.
//!
//! Each builder is a pure function: identical arguments always produce an
//! identical `(messages, options)` pair. The temperature and token budget of
//! each template are contractual, they encode a deliberate precision versus
//! creativity tradeoff per task type.

use crate::{CallOptions, ChatMessage};

/// How exhaustive a prior-art scan should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDepth {
    Quick,
    Comprehensive,
}

/// Opportunity-gap scan over a patent portfolio, optionally against market
/// context. Analytical task, so the temperature favors consistency.
pub fn opportunity_gap_request(
    patent_context: &str,
    market_context: Option<&str>,
) -> (Vec<ChatMessage>, CallOptions) {
    let mut prompt = format!(
        "Analyze the following patent context for unexploited opportunity gaps.\n\n\
         Patent context:\n{patent_context}\n"
    );
    if let Some(market) = market_context {
        prompt.push_str(&format!("\nMarket context:\n{market}\n"));
    }
    prompt.push_str(
        "\nStructure the response as exactly five numbered points:\n\
         1. White space identified\n\
         2. Competitive density assessment\n\
         3. Licensing potential\n\
         4. Risk factors\n\
         5. Recommended next step\n",
    );

    let messages = vec![
        ChatMessage::system(
            "You are an innovation analyst specializing in patent landscapes. \
             You identify commercial white space by combining filing activity, \
             citation patterns, and market signals into concrete, defensible \
             opportunity assessments.",
        ),
        ChatMessage::user(prompt),
    ];
    let options = CallOptions {
        model: None,
        max_output_tokens: None,
        temperature: Some(0.3),
    };
    (messages, options)
}

/// Technology trajectory prediction for an area over a given timeframe.
pub fn trajectory_request(
    technology_area: &str,
    timeframe: &str,
) -> (Vec<ChatMessage>, CallOptions) {
    let messages = vec![
        ChatMessage::system(
            "You are a technology forecaster who grounds predictions in patent \
             filing trends, citation velocity, and standardization activity. \
             State confidence levels and name the leading indicators behind \
             each prediction.",
        ),
        ChatMessage::user(format!(
            "Predict the development trajectory of {technology_area} over {timeframe}. \
             Cover near-term incremental moves, mid-term convergence with adjacent \
             technologies, and the long-term standardization outlook.",
        )),
    ];
    let options = CallOptions {
        model: None,
        max_output_tokens: None,
        temperature: Some(0.4),
    };
    (messages, options)
}

/// Patent claim drafting from an invention description, optionally informed by
/// known prior art. The lowest-creativity analytical template besides search.
pub fn claim_draft_request(
    invention_description: &str,
    prior_art: Option<&str>,
) -> (Vec<ChatMessage>, CallOptions) {
    let mut prompt = format!(
        "Draft patent claims for the following invention.\n\n\
         Invention description:\n{invention_description}\n"
    );
    if let Some(art) = prior_art {
        prompt.push_str(&format!("\nKnown prior art to design around:\n{art}\n"));
    }
    prompt.push_str(
        "\nProduce:\n\
         - One broad independent claim\n\
         - Two to three medium-scope dependent claims\n\
         - One to two narrow dependent claims\n\
         - A short prosecution strategy note\n",
    );

    let messages = vec![
        ChatMessage::system(
            "You are an experienced patent attorney drafting claims for \
             utility patent applications. You write claims in proper claim \
             format with careful antecedent basis, layering claim scope from \
             broad to narrow so the application survives examination.",
        ),
        ChatMessage::user(prompt),
    ];
    let options = CallOptions {
        model: None,
        max_output_tokens: None,
        temperature: Some(0.2),
    };
    (messages, options)
}

/// Prior-art search over an invention concept. Maximum determinism; the token
/// budget scales with the requested depth.
pub fn prior_art_search_request(
    invention_concept: &str,
    depth: SearchDepth,
) -> (Vec<ChatMessage>, CallOptions) {
    let scope = match depth {
        SearchDepth::Quick => "Focus on the five closest references.",
        SearchDepth::Comprehensive => {
            "Be exhaustive: cover granted patents, published applications, and \
             non-patent literature, and assess each reference's relevance."
        }
    };
    let messages = vec![
        ChatMessage::system(
            "You are a prior-art search specialist. You identify the patent \
             classifications, key terminology, and candidate references most \
             relevant to a claimed concept, and you assess novelty risks \
             conservatively.",
        ),
        ChatMessage::user(format!(
            "Search for prior art relevant to this invention concept:\n\n\
             {invention_concept}\n\n{scope}",
        )),
    ];
    let options = CallOptions {
        model: None,
        max_output_tokens: Some(match depth {
            SearchDepth::Quick => 3000,
            SearchDepth::Comprehensive => 6000,
        }),
        temperature: Some(0.1),
    };
    (messages, options)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
