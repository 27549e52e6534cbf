//! Reply parsing — turns the model's free text into a `RecommendationOutcome`.
//!
//! A surrounding markdown code fence is removed first. Then the first offset
//! at which exactly one JSON object can be deserialized is "the JSON object".
//! That object must match the recommendation schema; otherwise the outcome is
//! a parse error carrying the unfenced text. Text with no JSON object at all
//! is shown as-is.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::catalog::StudySpot;

/// One ranked entry, as the model named it plus the catalog id it resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedSpot {
    pub rank: usize,
    pub spot_name: String,
    /// `None` when the name matches no spot in the catalog.
    pub spot_id: Option<u32>,
    pub reason: Option<String>,
    pub best_time: Option<String>,
    pub distance: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub recommendations: Vec<RecommendedSpot>,
    /// Resolved ids in ranked order, without duplicates. Always a subset of the catalog.
    pub ranked_ids: Vec<u32>,
    pub top_pick: Option<String>,
    pub top_pick_id: Option<u32>,
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    Structured(RecommendationResult),
    RawText { text: String },
    ParseError { message: String, raw: String },
}

impl RecommendationOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendationOutcome::Structured(_) => "structured",
            RecommendationOutcome::RawText { .. } => "raw_text",
            RecommendationOutcome::ParseError { .. } => "parse_error",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationPayload {
    recommendations: Vec<RawRecommendation>,
    #[serde(default)]
    top_pick: Option<String>,
    #[serde(default)]
    rationale: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecommendation {
    spot_name: String,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    best_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    distance: Option<String>,
}

/// Models sometimes answer `"distance": 120` instead of a string.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Removes a surrounding ```` ```json ```` or ```` ``` ```` fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let body = body.trim_start();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Locates the first JSON object literal in `text`.
fn find_json_object(text: &str) -> Option<Map<String, Value>> {
    text.match_indices('{').find_map(|(offset, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[offset..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Object(map))) => Some(map),
            _ => None,
        }
    })
}

fn resolve(name: &str, spots: &[StudySpot]) -> Option<u32> {
    let name = name.trim();
    spots
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
        .map(|s| s.id)
}

/// Parses a model reply against the given spot list.
pub fn parse_reply(text: &str, spots: &[StudySpot]) -> RecommendationOutcome {
    let text = strip_code_fence(text);

    let Some(object) = find_json_object(text) else {
        return RecommendationOutcome::RawText {
            text: text.to_string(),
        };
    };

    let payload: RecommendationPayload = match serde_json::from_value(Value::Object(object)) {
        Ok(p) => p,
        Err(e) => {
            return RecommendationOutcome::ParseError {
                message: e.to_string(),
                raw: text.to_string(),
            }
        }
    };

    let recommendations: Vec<RecommendedSpot> = payload
        .recommendations
        .into_iter()
        .enumerate()
        .map(|(idx, rec)| RecommendedSpot {
            rank: idx + 1,
            spot_id: resolve(&rec.spot_name, spots),
            spot_name: rec.spot_name,
            reason: rec.reason,
            best_time: rec.best_time,
            distance: rec.distance,
        })
        .collect();

    let mut ranked_ids = Vec::with_capacity(recommendations.len());
    for id in recommendations.iter().filter_map(|r| r.spot_id) {
        if !ranked_ids.contains(&id) {
            ranked_ids.push(id);
        }
    }

    let top_pick_id = payload
        .top_pick
        .as_deref()
        .and_then(|name| resolve(name, spots));

    RecommendationOutcome::Structured(RecommendationResult {
        recommendations,
        ranked_ids,
        top_pick: payload.top_pick,
        top_pick_id,
        rationale: payload.rationale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn uw_spots() -> &'static [StudySpot] {
        &Catalog::builtin().campus("uw").unwrap().spots
    }

    fn structured(outcome: RecommendationOutcome) -> RecommendationResult {
        match outcome {
            RecommendationOutcome::Structured(r) => r,
            other => panic!("expected structured outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_single_recommendation_resolves_to_catalog_id() {
        let result = structured(parse_reply(
            r#"{"recommendations":[{"spotName":"Odegaard Library"}]}"#,
            uw_spots(),
        ));
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].rank, 1);
        assert_eq!(result.recommendations[0].spot_id, Some(2));
        assert_eq!(result.ranked_ids, vec![2]);
        assert!(result.top_pick.is_none());
    }

    #[test]
    fn test_json_embedded_in_prose_is_extracted() {
        let reply = "Sure! Here are my picks {as requested}:\n\
            {\"recommendations\":[{\"spotName\":\"Allen Library\",\"reason\":\"Closest quiet spot\",\"bestTime\":\"Morning\",\"distance\":\"2 min walk\"}],\
            \"topPick\":\"Allen Library\",\"rationale\":\"Close and quiet\"}\n\
            Let me know if you need more.";
        let result = structured(parse_reply(reply, uw_spots()));
        let first = &result.recommendations[0];
        assert_eq!(first.spot_id, Some(3));
        assert_eq!(first.reason.as_deref(), Some("Closest quiet spot"));
        assert_eq!(first.best_time.as_deref(), Some("Morning"));
        assert_eq!(first.distance.as_deref(), Some("2 min walk"));
        assert_eq!(result.top_pick_id, Some(3));
        assert_eq!(result.rationale.as_deref(), Some("Close and quiet"));
    }

    #[test]
    fn test_fenced_json_is_extracted() {
        let reply = "```json\n{\"recommendations\":[{\"spotName\":\"HUB Study Lounge\"}]}\n```";
        assert_eq!(structured(parse_reply(reply, uw_spots())).ranked_ids, vec![5]);
    }

    #[test]
    fn test_fenced_prose_is_raw_text_without_backticks() {
        let outcome = parse_reply("```\nJust go to Odegaard Library.\n```", uw_spots());
        assert_eq!(
            outcome,
            RecommendationOutcome::RawText {
                text: "Just go to Odegaard Library.".to_string()
            }
        );
    }

    #[test]
    fn test_fenced_object_without_schema_keeps_unfenced_raw() {
        let outcome = parse_reply("```json\n{\"picks\":[]}\n```", uw_spots());
        match outcome {
            RecommendationOutcome::ParseError { raw, .. } => assert_eq!(raw, r#"{"picks":[]}"#),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```json\n{} and no closing fence"), "{} and no closing fence");
        assert_eq!(strip_code_fence("  plain text  "), "plain text");
    }

    #[test]
    fn test_no_json_falls_back_to_raw_text() {
        let outcome = parse_reply("  Try Suzzallo, it is lovely in the morning.  ", uw_spots());
        assert_eq!(
            outcome,
            RecommendationOutcome::RawText {
                text: "Try Suzzallo, it is lovely in the morning.".to_string()
            }
        );
    }

    #[test]
    fn test_object_without_schema_is_parse_error() {
        let outcome = parse_reply(r#"{"picks":["Odegaard Library"]}"#, uw_spots());
        match outcome {
            RecommendationOutcome::ParseError { message, raw } => {
                assert!(message.contains("recommendations"), "message was {message}");
                assert_eq!(raw, r#"{"picks":["Odegaard Library"]}"#);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_and_duplicate_names_do_not_fail() {
        let reply = r#"{"recommendations":[
            {"spotName":"Odegaard Library"},
            {"spotName":"Library of Alexandria"},
            {"spotName":"odegaard library "},
            {"spotName":"Allen Library"}
        ]}"#;
        let result = structured(parse_reply(reply, uw_spots()));
        assert_eq!(result.recommendations.len(), 4);
        assert_eq!(result.recommendations[1].spot_id, None);
        assert_eq!(result.ranked_ids, vec![2, 3]);

        let catalog_ids = Catalog::builtin().spot_ids();
        assert!(result.ranked_ids.iter().all(|id| catalog_ids.contains(id)));
    }

    #[test]
    fn test_empty_ranking_is_empty_result() {
        let result = structured(parse_reply(r#"{"recommendations":[]}"#, uw_spots()));
        assert!(result.recommendations.is_empty());
        assert!(result.ranked_ids.is_empty());
    }

    #[test]
    fn test_numeric_distance_is_accepted() {
        let reply = r#"{"recommendations":[{"spotName":"Allen Library","distance":45}]}"#;
        let result = structured(parse_reply(reply, uw_spots()));
        assert_eq!(result.recommendations[0].distance.as_deref(), Some("45"));
    }

    #[test]
    fn test_truncated_reply_is_parse_error_not_panic() {
        let reply = r#"{"recommendations":[{"spotName":"Allen Library","reason":"quiet"},{"spotNa"#;
        assert_eq!(parse_reply(reply, uw_spots()).kind(), "parse_error");
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let value = serde_json::to_value(RecommendationOutcome::RawText {
            text: "hello".to_string(),
        })
        .unwrap();
        assert_eq!(value["kind"], "raw_text");
        assert_eq!(value["text"], "hello");
    }
}
