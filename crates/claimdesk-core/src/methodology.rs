//! The fixed investigative checklists embedded in prompts.

/// One step of a methodology: a title and the tasks it covers.
#[derive(Debug, Clone, Copy)]
pub struct Step {
  pub title: &'static str,
  pub tasks: &'static [&'static str],
}

/// Steps followed when validating a claim.
pub const VALIDATION: &[Step] = &[
  Step {
    title: "Clearly Define the Claim",
    tasks: &[
      "Identify and document:",
      "- Exact wording of the claim",
      "- Source and date of publication",
      "- Key details provided in the initial claim (e.g., dates, locations, names, figures)",
    ],
  },
  Step {
    title: "Verify Through Official Sources",
    tasks: &[
      "Check official websites, press releases, or announcements from relevant authorities (government websites, corporate pages, official social media accounts)",
      "Look for direct confirmations or related documentation (official statements, budgets, timelines, reports)",
    ],
  },
  Step {
    title: "Cross-Reference with Independent Online Media",
    tasks: &[
      "Search reputable online news organizations (local, national, international) to validate or challenge the claim",
      "Note discrepancies, additional details, or corroborating evidence reported independently",
    ],
  },
  Step {
    title: "Gather Stakeholder and Community Feedback Digitally",
    tasks: &[
      "Scan social media platforms, local forums, and community discussion boards for reactions and discussions about the claim",
      "Document and verify public sentiment, eyewitness accounts, or independent photographic/video evidence shared publicly",
    ],
  },
  Step {
    title: "Review Public Records and Documentation",
    tasks: &[
      "Access online transparency portals, Freedom of Information (FOI) databases, public budget reports, or inspection and compliance records",
      "Confirm that records align with the claim's stated facts and timelines",
    ],
  },
  Step {
    title: "Consult Additional Credible Third-party Sources",
    tasks: &[
      "Check websites of independent authorities, industry experts, watchdog organizations, or NGOs to further substantiate or challenge the claim",
      "Identify expert opinions, analysis, or independent verification reports online",
    ],
  },
  Step {
    title: "Analyze and Document Findings",
    tasks: &[
      "Clearly document evidence gathered from each step",
      "Highlight confirmations, contradictions, or gaps uncovered in verification",
    ],
  },
  Step {
    title: "Prepare a Verification Summary Report",
    tasks: &[
      "Summarize the results clearly, identifying:",
      "- Verified facts",
      "- Discrepancies found",
      "- Unverifiable elements",
      "Cite all online sources with clear references (URLs, timestamps, documents)",
    ],
  },
];

/// Steps followed when deciding on and drafting Right to Information
/// requests.
pub const RTI: &[Step] = &[
  Step {
    title: "Preliminary Review",
    tasks: &[
      "Read the full report carefully to gain a comprehensive understanding of the content, purpose, findings, and conclusions",
      "Note initial impressions about clarity, completeness, and transparency",
    ],
  },
  Step {
    title: "Identify the Scope and Objectives",
    tasks: &[
      "Clearly understand the report's stated objectives, scope, and intended audience",
      "Document if these objectives appear fully met or if there are noticeable gaps or ambiguities",
    ],
  },
  Step {
    title: "Analyze Completeness and Transparency",
    tasks: &[
      "Evaluate whether all relevant data, evidence, and supporting documentation referenced are adequately presented",
      "Identify areas that lack clear supporting details or where claims are not fully substantiated",
    ],
  },
  Step {
    title: "Cross-Check Data and References",
    tasks: &[
      "Verify the references cited within the report (such as footnotes, appendices, and data tables)",
      "Determine if essential supporting documents or datasets referenced are publicly available or missing",
    ],
  },
  Step {
    title: "Highlight Missing or Unclear Information",
    tasks: &[
      "Clearly document gaps, unclear conclusions, or missing evidence identified during the analysis",
      "Assess whether these gaps significantly impact the report's overall credibility or your ability to verify its claims",
    ],
  },
  Step {
    title: "Ensure Compliance with Jurisdictional RTI Laws",
    tasks: &[
      "Review applicable local, provincial, or federal Right to Information laws and regulations relevant to the report",
      "Ensure that all potential RTI requests formulated comply with jurisdictional requirements and procedures",
    ],
  },
  Step {
    title: "Formulate Potential RTI Requests",
    tasks: &[
      "Develop clear, specific RTI questions aimed directly at obtaining the missing or incomplete information",
      "Prioritize RTI questions based on their relevance, importance, and potential impact on understanding the report",
    ],
  },
  Step {
    title: "Evaluate Necessity and Impact",
    tasks: &[
      "Critically assess if obtaining the identified information through RTI is essential to achieve clarity or transparency",
      "Decide whether an RTI request is justified or if the existing gaps are minor enough not to warrant additional action",
    ],
  },
  Step {
    title: "Document the Decision",
    tasks: &[
      "Clearly document the decision-making process, highlighting:",
      "- Any RTI requests to proceed with",
      "- Rationale for why an RTI request may or may not be necessary",
      "- The anticipated outcome or benefit of submitting the request",
    ],
  },
];

/// Numbered step titles, one per line.
pub fn outline(steps: &[Step]) -> String {
  steps
    .iter()
    .enumerate()
    .map(|(i, step)| format!("{}. {}", i + 1, step.title))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Every step with its tasks indented beneath it, steps separated by a blank
/// line.
pub fn full_text(steps: &[Step]) -> String {
  steps
    .iter()
    .map(|step| {
      let tasks = step
        .tasks
        .iter()
        .map(|task| format!("  {task}"))
        .collect::<Vec<_>>()
        .join("\n");
      format!("{}:\n{tasks}", step.title)
    })
    .collect::<Vec<_>>()
    .join("\n\n")
}
