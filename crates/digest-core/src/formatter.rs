//! Issue rendering.
//!
//! [`format_issue`] is a pure function of a validated digest and the current
//! instant. The instant only feeds the relative "Posted:" phrases; the header
//! date comes from `metadata.generated_at`.
//!
//! ## Body layout
//!
//! | Section | Emitted when |
//! |---------|--------------|
//! | Header + summary | always |
//! | Empty-results suggestions | `jobs` is empty (rendering stops here) |
//! | Job listings | `jobs` is non-empty |
//! | Next steps + tip | `jobs` is non-empty |
//! | Collapsible details footer | `jobs` is non-empty |

use std::cmp::Ordering;

use crate::{DigestResult, IssueContent, JobListing, JobSummary, ProcessingMetadata, Timestamp};

/// Maximum rendered description length, in characters.
pub const DESCRIPTION_LIMIT: usize = 300;

/// Maximum rendered requirements length, in characters.
pub const REQUIREMENTS_LIMIT: usize = 200;

/// Placeholder for dates that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const SEARCH_URL: &str = "https://www.google.com/search?q=";
const LISTING_SEPARATOR: &str = "\n---\n\n";

/// Renders a digest into an issue title and Markdown body.
pub fn format_issue(digest: &DigestResult, now: Timestamp) -> IssueContent {
    IssueContent {
        title: format_title(digest.summary.total_jobs_found, digest.summary.new_jobs),
        body: format_body(digest, now),
    }
}

/// Picks the issue title from the job counts.
pub fn format_title(total_jobs_found: u64, new_jobs: u64) -> String {
    match (total_jobs_found, new_jobs) {
        (0, _) => "📭 No New Job Opportunities Today".to_string(),
        (1, _) => "🎯 1 New Job Opportunity".to_string(),
        (total, 0) => format!("🎯 {total} Job Opportunities"),
        (total, new) => format!("🎯 {total} Job Opportunities ({new} new)"),
    }
}

/// Shortens `text` to at most `max_len` characters plus an ellipsis.
///
/// When the hard cut leaves a space beyond 80% of `max_len`, the text is cut
/// back to that space so words are not split.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_len).collect();
    let threshold = max_len as f64 * 0.8;
    match cut.rfind(' ') {
        Some(space) if cut[..space].chars().count() as f64 > threshold => {
            format!("{}...", &cut[..space])
        }
        _ => format!("{cut}..."),
    }
}

/// Describes when a listing was posted relative to `now`.
///
/// `Today`, `Yesterday`, `N days ago` for up to six days, otherwise a short
/// calendar date. Dates in the future also use the calendar form. Unparseable
/// input renders as [`INVALID_DATE`].
pub fn posted_label(posted_date: &str, now: Timestamp) -> String {
    let Some(posted) = Timestamp::parse(posted_date) else {
        return INVALID_DATE.to_string();
    };

    match posted.whole_days_until(now) {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days @ 2..=6 => format!("{days} days ago"),
        _ => posted.short_date(),
    }
}

/// Orders listings for display: highest score first (absent counts as zero),
/// then most recently posted.
///
/// Listings whose date cannot be parsed follow every dated listing with the
/// same score. The sort is stable, so remaining ties keep input order.
pub fn sort_listings(jobs: &[JobListing]) -> Vec<&JobListing> {
    let mut keyed: Vec<(&JobListing, Option<Timestamp>)> = jobs
        .iter()
        .map(|job| (job, Timestamp::parse(&job.posted_date)))
        .collect();

    keyed.sort_by(|(a, a_posted), (b, b_posted)| {
        b.sort_score()
            .total_cmp(&a.sort_score())
            .then_with(|| newest_first(*a_posted, *b_posted))
    });

    keyed.into_iter().map(|(job, _)| job).collect()
}

fn newest_first(a: Option<Timestamp>, b: Option<Timestamp>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Body sections
// ---------------------------------------------------------------------------

fn format_body(digest: &DigestResult, now: Timestamp) -> String {
    let mut body = header(&digest.metadata);
    body.push_str(&summary_section(&digest.summary));

    if digest.jobs.is_empty() {
        body.push_str(&empty_results_section());
        return body;
    }

    body.push_str(&listings_section(&digest.jobs, now));
    body.push_str(&next_steps_section(digest.jobs.len()));
    body.push_str(&footer(&digest.metadata));
    body
}

fn header(metadata: &ProcessingMetadata) -> String {
    let generated = Timestamp::parse(&metadata.generated_at)
        .map_or_else(|| INVALID_DATE.to_string(), Timestamp::long_display);
    format!("# Job Search Results - {generated}\n\n")
}

fn summary_section(summary: &JobSummary) -> String {
    let mut section = String::from("## 📊 Summary\n\n");

    let mut total = format!("- **Total Jobs Found:** {}", summary.total_jobs_found);
    if summary.new_jobs > 0 {
        total.push_str(&format!(" ({} new since last run)", summary.new_jobs));
    }
    section.push_str(&total);
    section.push('\n');

    section.push_str(&format!(
        "- **Sources:** {}\n",
        summary.sources_queried.join(", ")
    ));
    section.push_str(&format!(
        "- **Processing Time:** {:.2}s\n",
        summary.processing_time_seconds.unwrap_or(0.0)
    ));
    if let Some(removed) = summary.duplicates_removed.filter(|removed| *removed > 0) {
        section.push_str(&format!("- **Duplicates Removed:** {removed}\n"));
    }

    section.push('\n');
    section
}

fn empty_results_section() -> String {
    [
        "## 🔍 No Jobs Found\n",
        "No job opportunities matched your search criteria this time. A few ways to widen the search:\n",
        "- **Broaden your keywords:** try more general terms or related job titles",
        "- **Expand your location:** include nearby cities or remote positions",
        "- **Adjust salary filters:** a wider range surfaces more listings",
        "- **Check the date range:** extend the window to include older postings\n",
        "New roles are posted every day, and the next digest will pick them up automatically.\n",
    ]
    .join("\n")
}

fn listings_section(jobs: &[JobListing], now: Timestamp) -> String {
    let rendered: Vec<String> = sort_listings(jobs)
        .into_iter()
        .enumerate()
        .map(|(index, job)| listing(index + 1, job, now))
        .collect();

    format!("## 💼 Job Listings\n\n{}\n", rendered.join(LISTING_SEPARATOR))
}

fn listing(position: usize, job: &JobListing, now: Timestamp) -> String {
    let mut block = format!("### {position}. {} at **{}**\n\n", job.title, job.company);

    let badges = badges(job);
    if !badges.is_empty() {
        block.push_str(&badges.join(" | "));
        block.push_str("\n\n");
    }

    block.push_str(&truncate(&job.description, DESCRIPTION_LIMIT));
    block.push_str("\n\n");

    if let Some(requirements) = non_empty(&job.requirements) {
        block.push_str(&format!(
            "**Requirements:** {}\n\n",
            truncate(requirements, REQUIREMENTS_LIMIT)
        ));
    }

    if let Some(reasons) = job.match_reasons.as_ref().filter(|r| !r.is_empty()) {
        block.push_str(&format!("**Why it matches:** {}\n\n", reasons.join(", ")));
    }

    block.push_str(&format!(
        "**Posted:** {}\n\n",
        posted_label(&job.posted_date, now)
    ));
    block.push_str(&actions(job));
    block
}

/// Present-only metadata badges, in display order.
fn badges(job: &JobListing) -> Vec<String> {
    let mut badges = Vec::new();
    if let Some(location) = non_empty(&job.location) {
        badges.push(format!("📍 {location}"));
    }
    if let Some(salary) = non_empty(&job.salary) {
        badges.push(format!("💰 {salary}"));
    }
    if let Some(job_type) = non_empty(&job.job_type) {
        badges.push(format!("⏰ {job_type}"));
    }
    if let Some(level) = non_empty(&job.experience_level) {
        badges.push(format!("👨‍💼 {level}"));
    }
    if job.remote_option == Some(true) {
        badges.push("🏠 Remote Available".to_string());
    }
    // A score of exactly zero shows no badge, same as an absent score.
    if let Some(score) = job.match_score.filter(|score| score.as_f64() > 0.0) {
        badges.push(format!("🎯 {}% match", score.as_percent()));
    }
    badges
}

/// Empty strings render like absent fields.
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|text| !text.is_empty())
}

fn actions(job: &JobListing) -> String {
    let research = search_link(&format!("{} company review salary culture", job.company));
    let prep = search_link(&format!("{} {} interview questions", job.title, job.company));
    format!(
        "[🚀 Apply Now]({}) | [🏢 Research Company]({research}) | [💡 Interview Prep]({prep})\n",
        job.url
    )
}

fn search_link(query: &str) -> String {
    format!("{SEARCH_URL}{}", urlencoding::encode(query))
}

fn next_steps_section(job_count: usize) -> String {
    let mut section = String::from("## 🚀 Next Steps\n\n");
    if job_count == 1 {
        section.push_str(
            "This one looks promising! Review the details above and apply while the posting is fresh.\n\n",
        );
    } else {
        section.push_str(
            "1. **Review** the listings above, starting with the highest match scores\n\
             2. **Research** each company's culture, reviews, and salary ranges\n\
             3. **Click Apply** on the roles that fit your goals\n\
             4. **Prepare** for interviews with the prep links provided\n\n",
        );
    }
    section.push_str(
        "> 💡 **Tip:** Listings with higher match scores line up more closely with your search criteria. Start there.\n\n",
    );
    section
}

fn footer(metadata: &ProcessingMetadata) -> String {
    let mut details = vec![format!("- **Generated At:** {}", metadata.generated_at)];
    if let Some(version) = &metadata.version {
        details.push(format!("- **Version:** {version}"));
    }
    if let Some(warnings) = metadata.warnings.as_ref().filter(|w| !w.is_empty()) {
        details.push(format!("- **Warnings:** {}", warnings.len()));
    }
    if let Some(errors) = metadata.errors.as_ref().filter(|e| !e.is_empty()) {
        details.push(format!("- **Errors:** {}", errors.len()));
    }

    format!(
        "<details>\n<summary>📋 Digest Details</summary>\n\n{}\n\n\
         *This issue was generated automatically from a job search digest.*\n\n</details>\n",
        details.join("\n")
    )
}
