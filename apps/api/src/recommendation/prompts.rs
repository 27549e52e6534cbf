// Recommendation prompt templates.

use crate::catalog::{Campus, Coordinate, StudySpot};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Replace `{latitude}`, `{longitude}`, `{campus}` and `{spots}` before sending.
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"You are an AI assistant helping students find the best study spots. Based on the user's location and preferences, recommend the top 3 study spots from this list.

User Location: {latitude}, {longitude}
Campus: {campus}

Available Study Spots:
{spots}

Please provide:
1. Top 3 recommended spots based on proximity and quality
2. Brief reasoning for each recommendation (1-2 sentences)
3. Best times to visit each spot
4. Your single top pick and a one-sentence overall rationale

Use the spot names exactly as listed above.

Format your response as JSON:
{
  "recommendations": [
    {
      "spotName": "name",
      "reason": "why this spot",
      "bestTime": "suggested time",
      "distance": "approximate distance"
    }
  ],
  "topPick": "name",
  "rationale": "overall reasoning"
}"#;

fn render_spot(spot: &StudySpot) -> String {
    let amenities: Vec<&str> = spot.amenities.iter().map(|a| a.as_str()).collect();
    format!(
        "- {}\n  Location: {}, {}\n  Description: {}\n  Noise Level: {}\n  Capacity: {}\n  Hours: {}\n  Amenities: {}",
        spot.name,
        spot.coordinate.latitude,
        spot.coordinate.longitude,
        spot.description,
        spot.noise.as_str(),
        spot.capacity.as_str(),
        spot.hours,
        amenities.join(", ")
    )
}

/// Builds the full prompt for one campus and one user position.
pub fn build_recommendation_prompt(campus: &Campus, origin: Coordinate) -> String {
    let spots = campus
        .spots
        .iter()
        .map(render_spot)
        .collect::<Vec<_>>()
        .join("\n\n");

    let prompt = RECOMMENDATION_PROMPT_TEMPLATE
        .replace("{latitude}", &origin.latitude.to_string())
        .replace("{longitude}", &origin.longitude.to_string())
        .replace("{campus}", &campus.name)
        .replace("{spots}", &spots);

    format!("{prompt}\n\n{JSON_ONLY_INSTRUCTION}")
}
