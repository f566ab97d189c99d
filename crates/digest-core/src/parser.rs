//! Digest validation.
//!
//! [`parse`] turns untrusted text into a [`DigestResult`] or fails with the
//! first schema violation found. Checks run in a fixed order (summary, jobs
//! array, each job in index order, metadata, then the optional query) so the
//! reported error is deterministic for a given input.
//!
//! Every check is an explicit predicate over the decoded JSON value. Nothing is
//! coerced: a numeric string is not a number, and an absent optional field
//! stays absent. JSON `null` in an optional position is read as absent, except
//! for `match_score`, which must be a number whenever the key is present.

use serde_json::{Map, Value};

use crate::{
    DigestFormatError, DigestResult, FilterMap, JobId, JobListing, JobSummary, MatchScore,
    ProcessingMetadata, SearchQuery, SummaryStats,
};

type JsonObject = Map<String, Value>;

/// Required string fields of a listing, in the order they are checked.
const REQUIRED_JOB_FIELDS: [&str; 7] = [
    "id",
    "title",
    "company",
    "url",
    "description",
    "source",
    "posted_date",
];

/// Parses and validates a serialized digest.
///
/// # Errors
///
/// Returns [`DigestFormatError`] naming the first violation: malformed JSON,
/// a missing or mistyped required field, or a `match_score` outside `[0, 1]`.
/// One bad listing rejects the whole digest.
pub fn parse(raw: &str) -> Result<DigestResult, DigestFormatError> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|e| DigestFormatError::new(format!("input is not valid JSON ({e})")))?;
    let root = root
        .as_object()
        .ok_or_else(|| DigestFormatError::new("digest must be a JSON object"))?;

    let summary = parse_summary(root.get("summary"))?;
    let jobs = parse_jobs(root.get("jobs"))?;
    let metadata = parse_metadata(root.get("metadata"))?;
    let query = parse_query(root.get("query"))?;

    Ok(DigestResult {
        query,
        summary,
        jobs,
        metadata,
    })
}

/// Computes the read-only statistics used for logging and validation reports.
///
/// Never fails. `avg_match_score` is the mean of the scores that are present,
/// rounded to two decimals, or `0.0` when no listing has one.
pub fn summarize(digest: &DigestResult) -> SummaryStats {
    let scores: Vec<f64> = digest
        .jobs
        .iter()
        .filter_map(|job| job.match_score.map(MatchScore::as_f64))
        .collect();

    let avg_match_score = if scores.is_empty() {
        0.0
    } else {
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        (mean * 100.0).round() / 100.0
    };

    SummaryStats {
        total_jobs: digest.summary.total_jobs_found,
        new_jobs: digest.summary.new_jobs,
        sources: digest.summary.sources_queried.clone(),
        avg_match_score,
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn parse_summary(value: Option<&Value>) -> Result<JobSummary, DigestFormatError> {
    let summary = value
        .and_then(Value::as_object)
        .ok_or_else(|| DigestFormatError::new("Missing or invalid summary object"))?;

    let total_jobs_found = required_count(summary, "total_jobs_found")?;
    let new_jobs = required_count(summary, "new_jobs")?;

    let sources_queried = match summary.get("sources_queried") {
        Some(Value::Array(items)) => string_items(items).ok_or_else(|| {
            DigestFormatError::new("summary.sources_queried must contain only strings")
        })?,
        _ => {
            return Err(DigestFormatError::new(
                "Missing or invalid summary.sources_queried",
            ))
        }
    };

    let summary_field = |field: &str| {
        DigestFormatError::new(format!("summary.{field} has an invalid type"))
    };

    Ok(JobSummary {
        total_jobs_found,
        new_jobs,
        updated_jobs: optional_count(summary, "updated_jobs")
            .map_err(|_| summary_field("updated_jobs"))?,
        duplicates_removed: optional_count(summary, "duplicates_removed")
            .map_err(|_| summary_field("duplicates_removed"))?,
        processing_time_seconds: optional_duration(summary, "processing_time_seconds")
            .map_err(|_| summary_field("processing_time_seconds"))?,
        sources_queried,
        date_range_processed: optional_string(summary, "date_range_processed")
            .map_err(|_| summary_field("date_range_processed"))?,
        filters_applied: optional_object(summary, "filters_applied")
            .map_err(|_| summary_field("filters_applied"))?,
    })
}

fn parse_jobs(value: Option<&Value>) -> Result<Vec<JobListing>, DigestFormatError> {
    let items = value
        .and_then(Value::as_array)
        .ok_or_else(|| DigestFormatError::new("Missing or invalid jobs array"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_job(index, item))
        .collect()
}

fn parse_job(index: usize, value: &Value) -> Result<JobListing, DigestFormatError> {
    let job_error = |detail: String| DigestFormatError::new(format!("Job at index {index}: {detail}"));

    let job = value
        .as_object()
        .ok_or_else(|| job_error("expected an object".to_string()))?;

    for field in REQUIRED_JOB_FIELDS {
        if required_string(job, field).is_none() {
            return Err(job_error(format!("missing or invalid {field} field")));
        }
    }

    // Unlike other optionals, an explicit `null` score is rejected.
    let match_score = match job.get("match_score") {
        None => None,
        Some(raw) => Some(
            raw.as_f64()
                .and_then(MatchScore::new)
                .ok_or_else(|| job_error("match_score must be a number between 0 and 1".into()))?,
        ),
    };

    let invalid = |field: &str| job_error(format!("invalid {field} field"));
    let text = |field: &str| optional_string(job, field).map_err(|_| invalid(field));
    let list = |field: &str| optional_strings(job, field).map_err(|_| invalid(field));

    // Presence of the required fields was checked above.
    let required = |field: &str| required_string(job, field).unwrap_or_default();

    Ok(JobListing {
        id: JobId::new(required("id"))
            .ok_or_else(|| job_error("missing or invalid id field".into()))?,
        title: required("title"),
        company: required("company"),
        description: required("description"),
        url: required("url"),
        source: required("source"),
        posted_date: required("posted_date"),
        location: text("location")?,
        salary: text("salary")?,
        requirements: text("requirements")?,
        benefits: text("benefits")?,
        application_deadline: text("application_deadline")?,
        job_type: text("job_type")?,
        experience_level: text("experience_level")?,
        remote_option: optional_bool(job, "remote_option").map_err(|_| invalid("remote_option"))?,
        tags: list("tags")?,
        match_reasons: list("match_reasons")?,
        match_score,
    })
}

fn parse_metadata(value: Option<&Value>) -> Result<ProcessingMetadata, DigestFormatError> {
    let metadata = value
        .and_then(Value::as_object)
        .ok_or_else(|| DigestFormatError::new("Missing or invalid metadata object"))?;

    let generated_at = metadata
        .get("generated_at")
        .and_then(Value::as_str)
        .ok_or_else(|| DigestFormatError::new("Missing or invalid metadata.generated_at"))?
        .to_string();

    let invalid = |field: &str| {
        DigestFormatError::new(format!("metadata.{field} has an invalid type"))
    };

    Ok(ProcessingMetadata {
        generated_at,
        version: optional_string(metadata, "version").map_err(|_| invalid("version"))?,
        config_snapshot: optional_object(metadata, "config_snapshot")
            .map_err(|_| invalid("config_snapshot"))?,
        errors: optional_strings(metadata, "errors").map_err(|_| invalid("errors"))?,
        warnings: optional_strings(metadata, "warnings").map_err(|_| invalid("warnings"))?,
    })
}

fn parse_query(value: Option<&Value>) -> Result<Option<SearchQuery>, DigestFormatError> {
    let query = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(query)) => query,
        Some(_) => return Err(DigestFormatError::new("Invalid query object")),
    };

    let invalid = |field: &str| DigestFormatError::new(format!("query.{field} has an invalid type"));
    let text = |field: &str| optional_string(query, field).map_err(|_| invalid(field));

    Ok(Some(SearchQuery {
        keywords: text("keywords")?,
        location: text("location")?,
        job_title: text("job_title")?,
        company: text("company")?,
        date_range: text("date_range")?,
        additional_filters: optional_object(query, "additional_filters")
            .map_err(|_| invalid("additional_filters"))?,
    }))
}

// ---------------------------------------------------------------------------
// Field predicates
// ---------------------------------------------------------------------------

/// A present field holds a value of the wrong JSON type.
#[derive(Debug)]
struct Mistyped;

/// Returns the field unless it is absent or `null`.
fn present<'a>(object: &'a JsonObject, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

/// A required string must exist, be a string, and be non-empty.
fn required_string(object: &JsonObject, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn required_count(summary: &JsonObject, key: &str) -> Result<u64, DigestFormatError> {
    let number = summary
        .get(key)
        .filter(|value| value.is_number())
        .ok_or_else(|| DigestFormatError::new(format!("Missing or invalid summary.{key}")))?;
    // Whole-number floats such as `3.0` count too.
    number
        .as_u64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
                .map(|n| n as u64)
        })
        .ok_or_else(|| {
            DigestFormatError::new(format!("summary.{key} must be a non-negative integer"))
        })
}

fn optional_string(object: &JsonObject, key: &str) -> Result<Option<String>, Mistyped> {
    present(object, key)
        .map(|value| value.as_str().map(str::to_string).ok_or(Mistyped))
        .transpose()
}

fn optional_bool(object: &JsonObject, key: &str) -> Result<Option<bool>, Mistyped> {
    present(object, key)
        .map(|value| value.as_bool().ok_or(Mistyped))
        .transpose()
}

fn optional_count(object: &JsonObject, key: &str) -> Result<Option<u64>, Mistyped> {
    present(object, key)
        .map(|value| value.as_u64().ok_or(Mistyped))
        .transpose()
}

fn optional_duration(object: &JsonObject, key: &str) -> Result<Option<f64>, Mistyped> {
    present(object, key)
        .map(|value| {
            value
                .as_f64()
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .ok_or(Mistyped)
        })
        .transpose()
}

fn optional_object(object: &JsonObject, key: &str) -> Result<Option<FilterMap>, Mistyped> {
    present(object, key)
        .map(|value| value.as_object().cloned().ok_or(Mistyped))
        .transpose()
}

fn optional_strings(object: &JsonObject, key: &str) -> Result<Option<Vec<String>>, Mistyped> {
    present(object, key)
        .map(|value| {
            value
                .as_array()
                .and_then(|items| string_items(items))
                .ok_or(Mistyped)
        })
        .transpose()
}

/// Collects an array of strings, or `None` if any element is not a string.
fn string_items(items: &[Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(id: &str, score: Option<f64>) -> Value {
        let mut job = json!({
            "id": id,
            "title": "Backend Engineer",
            "company": "Acme",
            "description": "Build services.",
            "url": format!("https://jobs.example.com/{id}"),
            "source": "linkedin",
            "posted_date": "2025-01-14",
        });
        if let Some(score) = score {
            job["match_score"] = json!(score);
        }
        job
    }

    fn digest(jobs: Vec<Value>) -> Value {
        json!({
            "query": { "keywords": "rust" },
            "summary": {
                "total_jobs_found": jobs.len(),
                "new_jobs": 1,
                "updated_jobs": 0,
                "duplicates_removed": 2,
                "processing_time_seconds": 1.5,
                "sources_queried": ["linkedin", "indeed"],
            },
            "jobs": jobs,
            "metadata": { "generated_at": "2025-01-15T09:30:00Z", "version": "1.2.0" },
        })
    }

    fn parse_value(value: &Value) -> Result<DigestResult, DigestFormatError> {
        parse(&value.to_string())
    }

    #[test]
    fn parses_a_complete_digest() {
        let parsed = parse_value(&digest(vec![job("a", Some(0.9)), job("b", None)])).unwrap();
        assert_eq!(parsed.summary.total_jobs_found, 2);
        assert_eq!(parsed.summary.sources_queried, vec!["linkedin", "indeed"]);
        assert_eq!(parsed.jobs.len(), 2);
        assert_eq!(parsed.jobs[0].match_score, MatchScore::new(0.9));
        assert_eq!(parsed.jobs[1].match_score, None);
        assert_eq!(parsed.metadata.version.as_deref(), Some("1.2.0"));
        assert_eq!(
            parsed.query.and_then(|q| q.keywords).as_deref(),
            Some("rust")
        );
    }

    #[test]
    fn reserialized_digest_parses_to_the_same_value() {
        let mut first = job("a", Some(0.75));
        first["tags"] = json!(["remote", "senior"]);
        first["remote_option"] = json!(true);
        let parsed = parse_value(&digest(vec![first, job("b", None)])).unwrap();

        let again = parse(&serde_json::to_string(&parsed).unwrap()).unwrap();
        assert_eq!(again, parsed);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse("{not json").unwrap_err();
        assert!(err.reason.contains("not valid JSON"), "{err}");
        assert!(parse("").is_err());
        assert!(parse("[]").is_err());
    }

    #[test]
    fn missing_total_jobs_found_is_named() {
        let raw = r#"{"summary":{"new_jobs":0,"sources_queried":["x"]}, "jobs":[], "metadata":{"generated_at":"2025-01-01T00:00:00Z"}}"#;
        let err = parse(raw).unwrap_err();
        assert!(err.to_string().contains("total_jobs_found"), "{err}");
    }

    #[test]
    fn numeric_strings_are_not_counts() {
        let mut value = digest(vec![]);
        value["summary"]["new_jobs"] = json!("3");
        let err = parse_value(&value).unwrap_err();
        assert_eq!(err.reason, "Missing or invalid summary.new_jobs");
    }

    #[test]
    fn whole_number_floats_are_counts() {
        let mut value = digest(vec![]);
        value["summary"]["total_jobs_found"] = json!(3.0);
        let parsed = parse_value(&value).unwrap();
        assert_eq!(parsed.summary.total_jobs_found, 3);

        value["summary"]["total_jobs_found"] = json!(1.5);
        let err = parse_value(&value).unwrap_err();
        assert_eq!(err.reason, "summary.total_jobs_found must be a non-negative integer");

        value["summary"]["total_jobs_found"] = json!(-2.0);
        assert!(parse_value(&value).is_err());
    }

    #[test]
    fn sources_must_be_an_array() {
        let mut value = digest(vec![]);
        value["summary"]["sources_queried"] = json!("linkedin");
        let err = parse_value(&value).unwrap_err();
        assert_eq!(err.reason, "Missing or invalid summary.sources_queried");
    }

    #[test]
    fn empty_sources_are_allowed() {
        let mut value = digest(vec![]);
        value["summary"]["sources_queried"] = json!([]);
        assert!(parse_value(&value).is_ok());
    }

    #[test]
    fn jobs_must_be_an_array() {
        let mut value = digest(vec![]);
        value["jobs"] = json!({});
        let err = parse_value(&value).unwrap_err();
        assert_eq!(err.reason, "Missing or invalid jobs array");
    }

    #[test]
    fn missing_title_names_index_and_field() {
        let mut broken = job("c", None);
        broken.as_object_mut().unwrap().remove("title");
        let value = digest(vec![job("a", None), job("b", None), broken]);
        let err = parse_value(&value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid digest data: Job at index 2: missing or invalid title field"
        );
    }

    #[test]
    fn wrong_typed_required_field_is_rejected() {
        let mut broken = job("a", None);
        broken["url"] = json!(42);
        let err = parse_value(&digest(vec![broken])).unwrap_err();
        assert_eq!(err.reason, "Job at index 0: missing or invalid url field");
    }

    #[test]
    fn first_violation_wins() {
        // Both summary and metadata are broken; summary is checked first.
        let mut value = digest(vec![]);
        value["summary"]["total_jobs_found"] = json!(null);
        value["metadata"] = json!("nope");
        let err = parse_value(&value).unwrap_err();
        assert!(err.reason.contains("total_jobs_found"));

        // Two fields missing from one job: the earlier field in check order wins.
        let mut broken = job("a", None);
        broken.as_object_mut().unwrap().remove("company");
        broken.as_object_mut().unwrap().remove("posted_date");
        let err = parse_value(&digest(vec![broken])).unwrap_err();
        assert!(err.reason.contains("company"));
    }

    #[test]
    fn out_of_range_match_score_rejects_whole_digest() {
        let value = digest(vec![job("a", Some(0.5)), job("b", Some(1.5))]);
        let err = parse_value(&value).unwrap_err();
        assert_eq!(
            err.reason,
            "Job at index 1: match_score must be a number between 0 and 1"
        );

        let mut textual = job("a", None);
        textual["match_score"] = json!("0.5");
        assert!(parse_value(&digest(vec![textual])).is_err());
    }

    #[test]
    fn zero_match_score_is_kept_distinct_from_absent() {
        let parsed = parse_value(&digest(vec![job("a", Some(0.0))])).unwrap();
        assert_eq!(parsed.jobs[0].match_score, MatchScore::new(0.0));
    }

    #[test]
    fn null_optional_fields_read_as_absent() {
        let mut listing = job("a", None);
        listing["salary"] = Value::Null;
        let parsed = parse_value(&digest(vec![listing])).unwrap();
        assert_eq!(parsed.jobs[0].salary, None);
    }

    #[test]
    fn null_match_score_is_rejected() {
        let mut listing = job("a", None);
        listing["match_score"] = Value::Null;
        let err = parse_value(&digest(vec![listing])).unwrap_err();
        assert_eq!(
            err.reason,
            "Job at index 0: match_score must be a number between 0 and 1"
        );
    }

    #[test]
    fn mistyped_optional_job_field_is_rejected() {
        let mut listing = job("a", None);
        listing["remote_option"] = json!("yes");
        let err = parse_value(&digest(vec![listing])).unwrap_err();
        assert_eq!(err.reason, "Job at index 0: invalid remote_option field");
    }

    #[test]
    fn metadata_requires_generated_at_string() {
        let mut value = digest(vec![]);
        value["metadata"] = json!({ "generated_at": 1736932200 });
        let err = parse_value(&value).unwrap_err();
        assert_eq!(err.reason, "Missing or invalid metadata.generated_at");

        value.as_object_mut().unwrap().remove("metadata");
        let err = parse_value(&value).unwrap_err();
        assert_eq!(err.reason, "Missing or invalid metadata object");
    }

    #[test]
    fn summary_stats_average_present_scores() {
        let parsed = parse_value(&digest(vec![
            job("a", Some(0.95)),
            job("b", Some(0.87)),
            job("c", Some(0.72)),
            job("d", None),
        ]))
        .unwrap();
        let stats = summarize(&parsed);
        assert_eq!(stats.avg_match_score, 0.85);
        assert_eq!(stats.total_jobs, 4);
        assert_eq!(stats.new_jobs, 1);
        assert_eq!(stats.sources, vec!["linkedin", "indeed"]);
    }

    #[test]
    fn summary_stats_default_to_zero() {
        let empty = parse_value(&digest(vec![])).unwrap();
        assert_eq!(summarize(&empty).avg_match_score, 0.0);

        let unscored = parse_value(&digest(vec![job("a", None)])).unwrap();
        assert_eq!(summarize(&unscored).avg_match_score, 0.0);
    }

    #[test]
    fn summary_stats_serialize_camel_case() {
        let parsed = parse_value(&digest(vec![job("a", Some(0.5))])).unwrap();
        let json = serde_json::to_value(summarize(&parsed)).unwrap();
        assert_eq!(json["totalJobs"], 1);
        assert_eq!(json["avgMatchScore"], 0.5);
    }
}
