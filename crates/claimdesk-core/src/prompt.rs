//! Prompt templates for the validation and RTI conversations.
//!
//! Every function here is pure string assembly; the caller decides which
//! messages to send and with what sampling limits.

use std::fmt::Write as _;

use serde::Deserialize;

use crate::{
  claim::Claim,
  completion::ChatMessage,
  methodology,
  report::ValidationReport,
};

/// Persona sent ahead of the long-form validation report prompt.
pub const REPORT_PERSONA: &str = "You are an expert fact-checker and investigator. Your task is to generate a comprehensive validation report based on the claim details, conversation history, and methodology provided.";

/// Persona sent ahead of the conclusion summary prompt.
pub const CONCLUSION_PERSONA: &str = "You are a fact-checker summarizing the conclusion of a validation report. Be concise and clear.";

/// Persona sent ahead of the long-form RTI request prompt.
pub const REQUEST_PERSONA: &str = "You are an expert in formulating Right to Information (RTI) requests. Your task is to generate a comprehensive RTI request based on the claim details, validation history, conversation history, and methodology provided that could be used as an email to the appropriate authority.";

const FORMATTING_NOTES: &str = "IMPORTANT FORMATTING NOTES:
1. Start with \"Claim Summary:\" on its own line
2. Follow with the claim summary in a new paragraph
3. Add a blank line before \"{heading}:\"
4. List each methodology step on a new line with proper numbering
5. End with your question about additional considerations in a new paragraph
6. Do not write this as a letter - no greetings or signatures
7. Use line breaks to separate major sections and enhance readability";

/// Claim fields as supplied by the client when opening a conversation.
///
/// Missing fields render as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimBrief {
  #[serde(default)]
  pub claim_nb_tx:    Option<String>,
  #[serde(default)]
  pub claim_title:    Option<String>,
  #[serde(default)]
  pub date_published: Option<String>,
  #[serde(default)]
  pub published_url:  Option<String>,
  #[serde(default)]
  pub description:    Option<String>,
  #[serde(default)]
  pub comments:       Option<String>,
}

fn field(value: &Option<String>) -> &str { value.as_deref().unwrap_or_default() }

fn formatting_notes(heading: &str) -> String {
  FORMATTING_NOTES.replace("{heading}", heading)
}

/// Render a conversation as `ROLE: content` paragraphs.
pub fn transcript(history: &[ChatMessage]) -> String {
  history
    .iter()
    .map(|m| format!("{}: {}", m.role.as_str().to_uppercase(), m.content))
    .collect::<Vec<_>>()
    .join("\n\n")
}

fn claim_details(claim: &Claim) -> String {
  format!(
    "Claim Title: {}\nDescription: {}\nSource: {}\nCategory: {}",
    claim.claim_title, claim.description, claim.published_url, claim.category
  )
}

// ─── Start ───────────────────────────────────────────────────────────────────

/// Opening message of a validation conversation.
pub fn validation_start(brief: &ClaimBrief) -> String {
  format!(
    "You are a principal investigator preparing to validate an online published claim. \
Your responses should be to the point, friendly, and conversational as this is the start of the validation process.

Please first summarize the following claim concisely:
Claim Number: {number}
Claim Title: {title}
Date Published: {date}
Source URL: {url}
Description: {description}
Additional Comments: {comments}

Please remind the user of the Validation Methodology that will be used to validate this claim:
{outline}

Please structure your response in a short friendly conversational way, as you are the principal investigator guiding this validation process. \
You need to ask if there any other considerations before starting the validation process.

{notes}",
    number = field(&brief.claim_nb_tx),
    title = field(&brief.claim_title),
    date = field(&brief.date_published),
    url = field(&brief.published_url),
    description = field(&brief.description),
    comments = field(&brief.comments),
    outline = methodology::outline(methodology::VALIDATION),
    notes = formatting_notes("Validation Methodology"),
  )
}

/// Opening message of an RTI conversation. The latest validation conclusion,
/// when one exists, is included for context.
pub fn rti_start(brief: &ClaimBrief, latest: Option<&ValidationReport>) -> String {
  let mut out = format!(
    "Please first summarize the following claim concisely:
{title}
Published: {date}
URL: {url}
Description: {description}
Comments: {comments}

",
    title = field(&brief.claim_title),
    date = field(&brief.date_published),
    url = field(&brief.published_url),
    description = field(&brief.description),
    comments = field(&brief.comments),
  );

  if let Some(report) = latest {
    let _ = write!(out, "Latest Validation Summary:\n{}\n\n", report.ai_generated_conclusion);
  }

  let _ = write!(
    out,
    "Please remind the user of the RTI Methodology that will be used to generate any RTI requests as necessary:
{outline}

Please structure your response in a short friendly conversational way, as you are the principal investigator guiding this Right to Information process. \
You need to ask if there any other considerations before starting the RTI process.

{notes}",
    outline = methodology::outline(methodology::RTI),
    notes = formatting_notes("RTI Methodology"),
  );
  out
}

// ─── Chat ────────────────────────────────────────────────────────────────────

/// System message framing a validation chat turn.
pub fn validation_chat_system(claim: &Claim) -> String {
  format!(
    "You are a principal investigator helping to validate a claim. The claim details are:
Claim Number: {number}
Title: {title}
Description: {description}
Source: {url}
Category: {category}

Your role is to help investigate this claim following our validation methodology. Be thorough but concise in your responses.
Keep the conversation focused on validating this specific claim.
If the user asks about something unrelated, politely redirect them back to the claim validation process.",
    number = claim.claim_nb_tx,
    title = claim.claim_title,
    description = claim.description,
    url = claim.published_url,
    category = claim.category,
  )
}

/// System message framing an RTI chat turn.
pub fn rti_chat_system(claim: &Claim) -> String {
  format!(
    "You are an AI assistant helping to formulate RTI (Right to Information) requests for the following claim:
Claim Number: {number}
Title: {title}
Description: {description}
Source: {url}
Category: {category}

Your job is not to generate RTI requests, but to help the user understand the claim and the RTI process. \
The Generate RTI Request step will do the detailed work.
If the user asks about something unrelated, politely redirect them back to the RTI process.",
    number = claim.claim_nb_tx,
    title = claim.claim_title,
    description = claim.description,
    url = claim.published_url,
    category = claim.category,
  )
}

// ─── Generation ──────────────────────────────────────────────────────────────

/// Long-form validation report prompt.
pub fn validation_report(
  claim: &Claim,
  history: &[ChatMessage],
  previous: &[ValidationReport],
) -> String {
  let previous = if previous.is_empty() {
    "None".to_owned()
  } else {
    previous
      .iter()
      .map(|v| format!("- {}: {} - {}", v.validator_username, v.status, v.ai_generated_conclusion))
      .collect::<Vec<_>>()
      .join("\n")
  };

  format!(
    "Please generate a comprehensive validation report for the following claim, taking into account the conversation history and following our structured methodology:

CLAIM DETAILS:
{details}

CONVERSATION HISTORY:
{transcript}

PREVIOUS VALIDATIONS:
{previous}

VALIDATION METHODOLOGY:
{methodology}

Please provide a final comprehensive report that includes:
1. A clear executive summary of the claim validation
2. Key findings from each step of the methodology
3. Evidence and sources consulted
4. Final determination (True/False/Needs More Investigation)
5. Confidence level in the determination
6. Recommendations for further verification if needed

Format the report with clear sections and bullet points for readability.",
    details = claim_details(claim),
    transcript = transcript(history),
    methodology = methodology::full_text(methodology::VALIDATION),
  )
}

/// Prompt condensing a full report into a one-paragraph conclusion.
pub fn conclusion(report: &str) -> String {
  format!(
    "Based on the following validation report, please provide a one-paragraph conclusion that summarizes the final determination and confidence level:

{report}

Keep your response focused only on the conclusion, determination (True/False/Needs More Investigation), and confidence level."
  )
}

/// Long-form RTI request prompt.
pub fn rti_request(
  claim: &Claim,
  latest: Option<&ValidationReport>,
  history: &[ChatMessage],
) -> String {
  let validation = latest
    .map(|v| format!("LATEST VALIDATION REPORT:\n{}\n\n", v.ai_generated_full_report))
    .unwrap_or_default();

  format!(
    "Please generate a comprehensive RTI (Right to Information) request in the form of a letter or email for the following claim, taking into account the conversation history and following our structured methodology:

CLAIM DETAILS:
{details}

{validation}CONVERSATION HISTORY:
{transcript}

RTI METHODOLOGY USED:
{methodology}

Please provide a final RTI request that includes:
1. A clear subject line
2. Brief context about the claim and why information is being requested
3. Specific, well-structured information requests based on gaps identified
4. Clear timeline requirements
5. References to relevant RTI laws and regulations
6. Contact information requirements
7. Any necessary attachments or supporting documents needed

Format the request with clear sections and bullet points for readability.",
    details = claim_details(claim),
    transcript = transcript(history),
    methodology = methodology::full_text(methodology::RTI),
  )
}

/// One-shot draft RTI request built only from client-supplied fields.
pub fn rti_draft(brief: &ClaimBrief) -> String {
  format!(
    "Based on the following claim details, generate a draft RTI request:

Claim: {title}
Published: {date}
URL: {url}
Description: {description}
Additional Comments: {comments}

Please format the RTI request according to standard guidelines, including:
1. Clear subject line
2. Proper salutation
3. Brief context
4. Specific information requests
5. Time period specification
6. Relevant reference numbers
7. Closing and signature",
    title = field(&brief.claim_title),
    date = field(&brief.date_published),
    url = field(&brief.published_url),
    description = field(&brief.description),
    comments = field(&brief.comments),
  )
}
